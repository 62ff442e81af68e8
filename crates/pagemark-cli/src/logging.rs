use tracing_subscriber::fmt;

/// Install a stderr subscriber when `verbose` is set; otherwise stay silent.
pub fn init(verbose: bool) {
    if !verbose {
        return;
    }
    let _ = fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

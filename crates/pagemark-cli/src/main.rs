mod commands;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use pagemark_core::region::FilterPolicy;
use std::path::PathBuf;

use commands::{parse_quad, Space};

#[derive(Parser)]
#[command(
    name = "pagemark",
    version,
    about = "Mark named regions on PDF pages and extract the text inside them"
)]
struct Cli {
    /// Directory holding saved templates
    #[arg(long, global = true, env = "PAGEMARK_STORE", default_value = ".pagemark")]
    store: PathBuf,

    /// Log extraction and store activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the positioned words on a page
    Words {
        /// Path to PDF file
        input_file: PathBuf,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Extract the text inside a rectangle
    Extract {
        /// Path to PDF file
        input_file: PathBuf,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Region as x,y,width,height (display) or blx,bly,trx,try (document)
        #[arg(short, long, value_parser = parse_quad, allow_hyphen_values = true)]
        rect: [f64; 4],

        /// Coordinate space of --rect
        #[arg(long, value_enum, default_value_t = Space::Display)]
        space: Space,

        /// Inclusion rule: contain or intersect
        #[arg(long, default_value = "contain")]
        policy: FilterPolicy,

        /// Zoom of the surface a display rectangle was drawn on
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,

        /// Put each detected text line on its own output line
        #[arg(long)]
        lines: bool,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// List the text blocks overlapping a rectangle
    Blocks {
        /// Path to PDF file
        input_file: PathBuf,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Region as x,y,width,height (display) or blx,bly,trx,try (document)
        #[arg(short, long, value_parser = parse_quad, allow_hyphen_values = true)]
        rect: [f64; 4],

        /// Coordinate space of --rect
        #[arg(long, value_enum, default_value_t = Space::Display)]
        space: Space,

        /// Zoom of the surface a display rectangle was drawn on
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Convert a rectangle between display and document coordinates
    Convert {
        /// Total page height in document units
        #[arg(long)]
        page_height: f64,

        /// Display rectangle as x,y,width,height
        #[arg(long, value_parser = parse_quad, allow_hyphen_values = true, conflicts_with = "document", required_unless_present = "document")]
        display: Option<[f64; 4]>,

        /// Document rectangle as blx,bly,trx,try
        #[arg(long, value_parser = parse_quad, allow_hyphen_values = true)]
        document: Option<[f64; 4]>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Manage saved templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// List saved templates
    List,
    /// Show a template and its selections
    Show {
        id: String,
    },
    /// Create an empty template
    Create {
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },
    /// Add a named selection drawn in display coordinates
    Add {
        /// Template id
        id: String,

        /// Selection name
        name: String,

        /// Display rectangle as x,y,width,height
        #[arg(short, long, value_parser = parse_quad, allow_hyphen_values = true)]
        rect: [f64; 4],

        /// Total page height in document units
        #[arg(long)]
        page_height: f64,

        /// Zoom of the surface the rectangle was drawn on
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,
    },
    /// Remove a selection from a template
    Remove {
        id: String,
        selection_id: String,
    },
    /// Delete a template
    Delete {
        id: String,
    },
    /// Extract every selection of a template from a PDF page
    Apply {
        id: String,

        /// Path to PDF file
        input_file: PathBuf,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Inclusion rule: contain or intersect
        #[arg(long, default_value = "contain")]
        policy: FilterPolicy,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let store = cli.store;
    let result = match cli.command {
        Commands::Words {
            input_file,
            page,
            output,
        } => commands::words::run(input_file, page, &output),
        Commands::Extract {
            input_file,
            page,
            rect,
            space,
            policy,
            zoom,
            lines,
            output,
        } => commands::extract::run(
            input_file,
            page,
            commands::RegionArgs { rect, space, zoom },
            policy,
            lines,
            &output,
        ),
        Commands::Blocks {
            input_file,
            page,
            rect,
            space,
            zoom,
            output,
        } => commands::extract::blocks(
            input_file,
            page,
            commands::RegionArgs { rect, space, zoom },
            &output,
        ),
        Commands::Convert {
            page_height,
            display,
            document,
            output,
        } => commands::convert::run(page_height, display, document, &output),
        Commands::Template { action } => match action {
            TemplateAction::List => commands::template::list(&store),
            TemplateAction::Show { id } => commands::template::show(&store, &id),
            TemplateAction::Create { name, description } => {
                commands::template::create(&store, name, description)
            }
            TemplateAction::Add {
                id,
                name,
                rect,
                page_height,
                zoom,
            } => commands::template::add(&store, &id, name, rect, page_height, zoom),
            TemplateAction::Remove { id, selection_id } => {
                commands::template::remove(&store, &id, &selection_id)
            }
            TemplateAction::Delete { id } => commands::template::delete(&store, &id),
            TemplateAction::Apply {
                id,
                input_file,
                page,
                policy,
                output,
            } => commands::template::apply(&store, &id, input_file, page, policy, &output),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

use pagemark_core::extraction::page_at;
use std::path::PathBuf;

use crate::commands::load_pages;
use crate::output;

pub fn run(
    pdf_file: PathBuf,
    page_number: usize,
    output_format: &str,
) -> Result<(), pagemark_core::error::PagemarkError> {
    let pages = load_pages(&pdf_file)?;
    let page = page_at(&pages, page_number)?;

    match output_format {
        "json" => output::json::print(page)?,
        _ => output::table::print_words(page),
    }

    Ok(())
}

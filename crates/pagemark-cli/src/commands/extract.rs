use pagemark_core::extraction::page_at;
use pagemark_core::region::{self, FilterPolicy};
use std::path::PathBuf;

use crate::commands::{load_pages, RegionArgs};
use crate::output;

pub fn run(
    pdf_file: PathBuf,
    page_number: usize,
    region_args: RegionArgs,
    policy: FilterPolicy,
    lines: bool,
    output_format: &str,
) -> Result<(), pagemark_core::error::PagemarkError> {
    let pages = load_pages(&pdf_file)?;
    let page = page_at(&pages, page_number)?;
    let region = region_args.to_document(page.page_height()?)?;

    let tokens = region::tokens_in_region(&page.words, &region, policy)?;
    let text = if lines {
        region::join_lines(&tokens)
    } else {
        region::join_tokens(&tokens)
    };

    match output_format {
        "json" => {
            output::json::print(&serde_json::json!({
                "page_number": page_number,
                "policy": policy,
                "region": region,
                "text": text,
                "words": tokens,
            }))?;
        }
        _ => println!("{text}"),
    }

    Ok(())
}

pub fn blocks(
    pdf_file: PathBuf,
    page_number: usize,
    region_args: RegionArgs,
    output_format: &str,
) -> Result<(), pagemark_core::error::PagemarkError> {
    let pages = load_pages(&pdf_file)?;
    let page = page_at(&pages, page_number)?;
    let region = region_args.to_document(page.page_height()?)?;
    let matched = region::blocks_intersecting_region(&page.blocks, &region)?;

    match output_format {
        "json" => output::json::print(&matched)?,
        _ => output::table::print_blocks(&matched),
    }

    Ok(())
}

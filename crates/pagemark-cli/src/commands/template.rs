use pagemark_core::error::PagemarkError;
use pagemark_core::extraction::pdftotext::PdftotextExtractor;
use pagemark_core::geometry::{DisplayRect, PageHeight};
use pagemark_core::region::FilterPolicy;
use pagemark_core::store::{FileBlobStore, TemplateRepository};
use pagemark_core::template::{NamedSelection, Template};
use pagemark_core::viewer::Viewport;
use std::path::{Path, PathBuf};

use crate::output;

fn repository(store: &Path) -> TemplateRepository<FileBlobStore> {
    TemplateRepository::new(FileBlobStore::new(store))
}

pub fn list(store: &Path) -> Result<(), PagemarkError> {
    let templates = repository(store).get_all()?;
    if templates.is_empty() {
        println!("No templates saved in {}", store.display());
        return Ok(());
    }
    output::table::print_template_list(&templates);
    Ok(())
}

pub fn show(store: &Path, id: &str) -> Result<(), PagemarkError> {
    let template = repository(store).require(id)?;
    output::table::print_template(&template);
    Ok(())
}

pub fn create(
    store: &Path,
    name: String,
    description: Option<String>,
) -> Result<(), PagemarkError> {
    let mut template = Template::new(name);
    template.description = description;
    let saved = repository(store).save(template)?;
    println!("Created template '{}' ({})", saved.name, saved.id);
    Ok(())
}

pub fn add(
    store: &Path,
    id: &str,
    name: String,
    rect: [f64; 4],
    page_height: f64,
    zoom: f64,
) -> Result<(), PagemarkError> {
    let repo = repository(store);
    let mut template = repo.require(id)?;

    let [x, y, w, h] = rect;
    let drawn = Viewport::new(zoom)?.to_page_units(&DisplayRect::new(x, y, w, h)?);
    let selection = NamedSelection::from_display(name, drawn, PageHeight::new(page_height)?)?;
    let selection_id = template.add_selection(selection).id.clone();

    repo.save(template)?;
    println!("Added selection {selection_id} to template {id}");
    Ok(())
}

pub fn remove(store: &Path, id: &str, selection_id: &str) -> Result<(), PagemarkError> {
    let repo = repository(store);
    let mut template = repo.require(id)?;
    let removed = template.remove_selection(selection_id)?;
    repo.save(template)?;
    println!("Removed selection '{}' from template {id}", removed.name);
    Ok(())
}

pub fn delete(store: &Path, id: &str) -> Result<(), PagemarkError> {
    let repo = repository(store);
    repo.require(id)?;
    repo.delete(id)?;
    println!("Deleted template {id}");
    Ok(())
}

pub fn apply(
    store: &Path,
    id: &str,
    pdf_file: PathBuf,
    page_number: usize,
    policy: FilterPolicy,
    output_format: &str,
) -> Result<(), PagemarkError> {
    let template = repository(store).require(id)?;
    let pdf_bytes = std::fs::read(&pdf_file)?;
    let extractor = PdftotextExtractor::new();
    let result =
        pagemark_core::extract_template(&pdf_bytes, &extractor, &template, page_number, policy)?;

    match output_format {
        "json" => output::json::print(&result)?,
        _ => output::table::print_extraction(&result),
    }

    Ok(())
}

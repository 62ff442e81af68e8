pub mod error;
pub mod extraction;
pub mod geometry;
pub mod region;
pub mod store;
pub mod template;
pub mod viewer;

use serde::{Deserialize, Serialize};

use error::PagemarkError;
use extraction::{page_at, PdfExtractor};
use geometry::DocumentRect;
use region::FilterPolicy;
use template::{apply_template, SelectionText, Template};

/// Text pulled from one page by every selection of a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateExtraction {
    pub template_id: String,
    pub template_name: String,
    pub page_number: usize,
    pub fields: Vec<SelectionText>,
}

/// Extract the text inside `region` on one page of a PDF.
///
/// `page_number` is 1-based; an out-of-range page is reported by the
/// extraction layer as [`PagemarkError::PageOutOfRange`].
pub fn extract_region(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    page_number: usize,
    region: &DocumentRect,
    policy: FilterPolicy,
) -> Result<String, PagemarkError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    let page = page_at(&pages, page_number)?;
    region::extract_text(&page.words, region, policy)
}

/// Main API entry point: run a template's selections against one page of a PDF.
pub fn extract_template(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    template: &Template,
    page_number: usize,
    policy: FilterPolicy,
) -> Result<TemplateExtraction, PagemarkError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    let page = page_at(&pages, page_number)?;

    tracing::debug!(
        template = %template.name,
        selections = template.selections.len(),
        page = page_number,
        backend = extractor.backend_name(),
        "applying template"
    );

    Ok(TemplateExtraction {
        template_id: template.id.clone(),
        template_name: template.name.clone(),
        page_number,
        fields: apply_template(template, page, policy)?,
    })
}

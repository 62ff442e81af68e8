pub mod pdftotext;

use serde::{Deserialize, Serialize};

use crate::error::PagemarkError;
use crate::geometry::PageHeight;
use crate::region::{TextBlock, TextToken};

/// Positioned content extracted from a single page of a PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    /// 1-based.
    pub page_number: usize,
    pub width: f64,
    pub height: f64,
    pub words: Vec<TextToken>,
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

impl PageContent {
    pub fn page_height(&self) -> Result<PageHeight, PagemarkError> {
        PageHeight::new(self.height)
    }
}

/// Trait for PDF extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract positioned words and blocks from PDF bytes, one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, PagemarkError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Look up a page by its 1-based number.
pub fn page_at(pages: &[PageContent], page_number: usize) -> Result<&PageContent, PagemarkError> {
    if page_number == 0 || page_number > pages.len() {
        return Err(PagemarkError::PageOutOfRange {
            page: page_number,
            count: pages.len(),
        });
    }
    Ok(&pages[page_number - 1])
}

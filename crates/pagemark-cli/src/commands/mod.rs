pub mod convert;
pub mod extract;
pub mod template;
pub mod words;

use clap::ValueEnum;
use pagemark_core::error::PagemarkError;
use pagemark_core::extraction::pdftotext::PdftotextExtractor;
use pagemark_core::extraction::{PageContent, PdfExtractor};
use pagemark_core::geometry::{display_to_document, DisplayRect, DocumentRect, PageHeight};
use pagemark_core::viewer::Viewport;
use std::path::Path;

/// Which coordinate system a `--rect` argument is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Space {
    /// x,y,width,height with a top-left origin
    Display,
    /// bottom-left x,y and top-right x,y with a bottom-left origin
    Document,
}

pub struct RegionArgs {
    pub rect: [f64; 4],
    pub space: Space,
    pub zoom: f64,
}

impl RegionArgs {
    /// Resolve the argument into a document-space region for a page of the given height.
    pub fn to_document(&self, page_height: PageHeight) -> Result<DocumentRect, PagemarkError> {
        let [a, b, c, d] = self.rect;
        match self.space {
            Space::Display => {
                let drawn = DisplayRect::new(a, b, c, d)?;
                let viewport = Viewport::new(self.zoom)?;
                display_to_document(&viewport.to_page_units(&drawn), page_height)
            }
            Space::Document => DocumentRect::new(a, b, c, d),
        }
    }
}

/// Parse four comma-separated numbers.
pub fn parse_quad(s: &str) -> Result<[f64; 4], String> {
    let values: Vec<f64> = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("'{}' is not a number: {e}", part.trim()))
        })
        .collect::<Result<_, _>>()?;
    match values.as_slice() {
        [a, b, c, d] => Ok([*a, *b, *c, *d]),
        _ => Err(format!("expected 4 comma-separated numbers, got {}", values.len())),
    }
}

/// Read a PDF and extract every page with the pdftotext backend.
pub fn load_pages(input_file: &Path) -> Result<Vec<PageContent>, PagemarkError> {
    let pdf_bytes = std::fs::read(input_file)?;
    let extractor = PdftotextExtractor::new();
    extractor.extract_pages(&pdf_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quad() {
        assert_eq!(parse_quad("1, 2.5,-3,4").unwrap(), [1.0, 2.5, -3.0, 4.0]);
        assert!(parse_quad("1,2,3").is_err());
        assert!(parse_quad("1,2,x,4").is_err());
    }

    #[test]
    fn test_region_args_display_with_zoom() {
        let args = RegionArgs {
            rect: [200.0, 100.0, 400.0, 60.0],
            space: Space::Display,
            zoom: 2.0,
        };
        let region = args.to_document(PageHeight::new(792.0).unwrap()).unwrap();
        assert_eq!(region, DocumentRect::new(100.0, 712.0, 300.0, 742.0).unwrap());
    }

    #[test]
    fn test_region_args_document_must_be_normalized() {
        let args = RegionArgs {
            rect: [10.0, 10.0, 0.0, 0.0],
            space: Space::Document,
            zoom: 1.0,
        };
        assert!(args.to_document(PageHeight::new(100.0).unwrap()).is_err());
    }
}

use pagemark_core::error::PagemarkError;
use pagemark_core::geometry::{
    display_to_document, document_to_display, DisplayRect, DocumentRect, PageHeight,
};

use crate::output;

pub fn run(
    page_height: f64,
    display: Option<[f64; 4]>,
    document: Option<[f64; 4]>,
    output_format: &str,
) -> Result<(), PagemarkError> {
    let page_height = PageHeight::new(page_height)?;

    let (display, document) = match (display, document) {
        (Some([x, y, w, h]), _) => {
            let display = DisplayRect::new(x, y, w, h)?;
            (display, display_to_document(&display, page_height)?)
        }
        (None, Some([blx, bly, trx, try_])) => {
            let document = DocumentRect::new(blx, bly, trx, try_)?;
            (document_to_display(&document, page_height)?, document)
        }
        (None, None) => {
            return Err(PagemarkError::InvalidArgument(
                "one of --display or --document is required".into(),
            ))
        }
    };

    match output_format {
        "json" => output::json::print(&serde_json::json!({
            "page_height": page_height,
            "display": display,
            "document": document,
        }))?,
        _ => output::table::print_conversion(&display, &document),
    }

    Ok(())
}

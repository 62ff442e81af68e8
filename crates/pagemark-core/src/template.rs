//! Named selections and the templates that group them.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::PagemarkError;
use crate::extraction::PageContent;
use crate::geometry::{
    display_to_document, document_to_display, points_to_display_rect, DisplayPoint, DisplayRect,
    DocumentRect, PageHeight,
};
use crate::region::{extract_text, FilterPolicy};

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A short unique id: millisecond timestamp plus a process-wide counter.
pub fn generate_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{millis:x}-{seq:x}")
}

/// A named region held in both coordinate spaces at once.
///
/// The two rectangles are only ever produced from each other through the
/// transform, and both sit on the whole-unit pixel grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSelection {
    pub id: String,
    pub name: String,
    pub display: DisplayRect,
    pub document: DocumentRect,
}

impl NamedSelection {
    pub fn from_display(
        name: impl Into<String>,
        display: DisplayRect,
        page_height: PageHeight,
    ) -> Result<Self, PagemarkError> {
        display.validate()?;
        let display = display.snapped();
        let document = display_to_document(&display, page_height)?.snapped();
        Ok(NamedSelection {
            id: generate_id(),
            name: name.into(),
            display,
            document,
        })
    }

    /// Finalize a drag from `start` to `end` (either order).
    pub fn from_points(
        name: impl Into<String>,
        start: DisplayPoint,
        end: DisplayPoint,
        page_height: PageHeight,
    ) -> Result<Self, PagemarkError> {
        Self::from_display(name, points_to_display_rect(start, end), page_height)
    }

    pub fn from_document(
        name: impl Into<String>,
        document: DocumentRect,
        page_height: PageHeight,
    ) -> Result<Self, PagemarkError> {
        document.validate()?;
        let document = document.snapped();
        let display = document_to_display(&document, page_height)?.snapped();
        Ok(NamedSelection {
            id: generate_id(),
            name: name.into(),
            display,
            document,
        })
    }

    /// Recompute the document rectangle after `display` changed.
    pub fn rederive_from_display(&mut self, page_height: PageHeight) -> Result<(), PagemarkError> {
        self.display = self.display.snapped();
        self.document = display_to_document(&self.display, page_height)?.snapped();
        Ok(())
    }

    /// Recompute the display rectangle after `document` changed.
    pub fn rederive_from_document(&mut self, page_height: PageHeight) -> Result<(), PagemarkError> {
        self.document = self.document.snapped();
        self.display = document_to_display(&self.document, page_height)?.snapped();
        Ok(())
    }
}

/// An ordered, named collection of selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub selections: Vec<NamedSelection>,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Template {
            id: generate_id(),
            name: name.into(),
            description: None,
            selections: Vec::new(),
        }
    }

    pub fn add_selection(&mut self, selection: NamedSelection) -> &NamedSelection {
        self.selections.push(selection);
        &self.selections[self.selections.len() - 1]
    }

    pub fn selection(&self, id: &str) -> Option<&NamedSelection> {
        self.selections.iter().find(|s| s.id == id)
    }

    pub fn remove_selection(&mut self, id: &str) -> Result<NamedSelection, PagemarkError> {
        let index = self
            .selections
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| PagemarkError::SelectionNotFound {
                template: self.id.clone(),
                selection: id.to_string(),
            })?;
        Ok(self.selections.remove(index))
    }
}

/// Index of the selection under `point`, preferring the most recently drawn.
pub fn hit_test(selections: &[NamedSelection], point: DisplayPoint) -> Option<usize> {
    selections
        .iter()
        .rposition(|s| s.display.contains_point(point))
}

/// Text captured by one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionText {
    pub selection_id: String,
    pub name: String,
    pub text: String,
}

/// Extract the text under every selection of `template` from `page`.
pub fn apply_template(
    template: &Template,
    page: &PageContent,
    policy: FilterPolicy,
) -> Result<Vec<SelectionText>, PagemarkError> {
    template
        .selections
        .iter()
        .map(|sel| {
            Ok(SelectionText {
                selection_id: sel.id.clone(),
                name: sel.name.clone(),
                text: extract_text(&page.words, &sel.document, policy)?,
            })
        })
        .collect()
}

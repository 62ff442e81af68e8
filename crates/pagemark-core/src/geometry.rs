//! Rectangles in display space and document space, and the transforms between them.
//!
//! Display space has its origin at the top-left of the rendered surface with Y
//! growing downward. Document space has its origin at the bottom-left of the
//! page with Y growing upward. The two are separate types so one can never be
//! passed where the other is expected.

use serde::{Deserialize, Serialize};

use crate::error::PagemarkError;

/// Total vertical extent of a page in document units. Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PageHeight(f64);

impl PageHeight {
    pub fn new(height: f64) -> Result<Self, PagemarkError> {
        if !height.is_finite() || height <= 0.0 {
            return Err(PagemarkError::invalid(format!(
                "page height must be a positive number, got {height}"
            )));
        }
        Ok(PageHeight(height))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for PageHeight {
    type Error = PagemarkError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        PageHeight::new(value)
    }
}

impl From<PageHeight> for f64 {
    fn from(h: PageHeight) -> f64 {
        h.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayPoint {
    pub x: f64,
    pub y: f64,
}

impl DisplayPoint {
    pub fn new(x: f64, y: f64) -> Self {
        DisplayPoint { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentPoint {
    pub x: f64,
    pub y: f64,
}

impl DocumentPoint {
    pub fn new(x: f64, y: f64) -> Self {
        DocumentPoint { x, y }
    }
}

/// A box on the display surface: top-left origin, extending right and down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, PagemarkError> {
        let rect = DisplayRect {
            x,
            y,
            width,
            height,
        };
        rect.validate()?;
        Ok(rect)
    }

    /// Reject non-finite coordinates and negative sizes.
    pub fn validate(&self) -> Result<(), PagemarkError> {
        if ![self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(PagemarkError::invalid(format!(
                "display rectangle has non-finite coordinates: {self:?}"
            )));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(PagemarkError::invalid(format!(
                "display rectangle has negative size: width {}, height {}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Lower edge on screen (largest display Y).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Edges are inclusive.
    pub fn contains_point(&self, p: DisplayPoint) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Truncate every field onto the whole-unit pixel grid.
    pub fn snapped(&self) -> DisplayRect {
        DisplayRect {
            x: self.x.trunc(),
            y: self.y.trunc(),
            width: self.width.trunc(),
            height: self.height.trunc(),
        }
    }
}

/// A box in the page's native coordinates, stored as its bottom-left and
/// top-right corners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRect {
    pub bottom_left_x: f64,
    pub bottom_left_y: f64,
    pub top_right_x: f64,
    pub top_right_y: f64,
}

impl DocumentRect {
    pub fn new(
        bottom_left_x: f64,
        bottom_left_y: f64,
        top_right_x: f64,
        top_right_y: f64,
    ) -> Result<Self, PagemarkError> {
        let rect = DocumentRect {
            bottom_left_x,
            bottom_left_y,
            top_right_x,
            top_right_y,
        };
        rect.validate()?;
        Ok(rect)
    }

    /// Build a normalized rectangle from any two opposite corners.
    pub fn from_corners(a: DocumentPoint, b: DocumentPoint) -> Self {
        DocumentRect {
            bottom_left_x: a.x.min(b.x),
            bottom_left_y: a.y.min(b.y),
            top_right_x: a.x.max(b.x),
            top_right_y: a.y.max(b.y),
        }
    }

    /// Reject non-finite coordinates and inverted corners.
    pub fn validate(&self) -> Result<(), PagemarkError> {
        if ![
            self.bottom_left_x,
            self.bottom_left_y,
            self.top_right_x,
            self.top_right_y,
        ]
        .iter()
        .all(|v| v.is_finite())
        {
            return Err(PagemarkError::invalid(format!(
                "document rectangle has non-finite coordinates: {self:?}"
            )));
        }
        if self.bottom_left_x > self.top_right_x || self.bottom_left_y > self.top_right_y {
            return Err(PagemarkError::invalid(format!(
                "document rectangle is not normalized: bottom-left ({}, {}) exceeds top-right ({}, {})",
                self.bottom_left_x, self.bottom_left_y, self.top_right_x, self.top_right_y
            )));
        }
        Ok(())
    }

    pub fn left(&self) -> f64 {
        self.bottom_left_x
    }

    pub fn right(&self) -> f64 {
        self.top_right_x
    }

    pub fn bottom(&self) -> f64 {
        self.bottom_left_y
    }

    pub fn top(&self) -> f64 {
        self.top_right_y
    }

    pub fn width(&self) -> f64 {
        self.top_right_x - self.bottom_left_x
    }

    pub fn height(&self) -> f64 {
        self.top_right_y - self.bottom_left_y
    }

    /// True when `other` lies entirely inside `self`. Shared edges count as inside.
    pub fn contains(&self, other: &DocumentRect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.bottom() >= self.bottom()
            && other.top() <= self.top()
    }

    /// True unless one rectangle lies strictly to one side of the other.
    /// Touching edges count as overlap.
    pub fn intersects(&self, other: &DocumentRect) -> bool {
        !(other.right() < self.left()
            || other.left() > self.right()
            || other.top() < self.bottom()
            || other.bottom() > self.top())
    }

    pub fn contains_point(&self, p: DocumentPoint) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.bottom() && p.y <= self.top()
    }

    /// Truncate every corner onto the whole-unit pixel grid.
    pub fn snapped(&self) -> DocumentRect {
        DocumentRect {
            bottom_left_x: self.bottom_left_x.trunc(),
            bottom_left_y: self.bottom_left_y.trunc(),
            top_right_x: self.top_right_x.trunc(),
            top_right_y: self.top_right_y.trunc(),
        }
    }
}

/// Convert a display rectangle into document space.
///
/// The display rectangle's lower screen edge (`y + height`) becomes the
/// document rectangle's bottom, and its upper screen edge (`y`) becomes the top.
pub fn display_to_document(
    rect: &DisplayRect,
    page_height: PageHeight,
) -> Result<DocumentRect, PagemarkError> {
    rect.validate()?;
    let h = page_height.get();
    Ok(DocumentRect {
        bottom_left_x: rect.x,
        bottom_left_y: h - rect.bottom(),
        top_right_x: rect.right(),
        top_right_y: h - rect.y,
    })
}

/// Convert a document rectangle into display space. Inverse of [`display_to_document`].
pub fn document_to_display(
    rect: &DocumentRect,
    page_height: PageHeight,
) -> Result<DisplayRect, PagemarkError> {
    rect.validate()?;
    Ok(DisplayRect {
        x: rect.bottom_left_x,
        y: page_height.get() - rect.top_right_y,
        width: rect.width(),
        height: rect.height(),
    })
}

/// Normalize two drag corners (in any order) into a display rectangle.
pub fn points_to_display_rect(a: DisplayPoint, b: DisplayPoint) -> DisplayRect {
    DisplayRect {
        x: a.x.min(b.x),
        y: a.y.min(b.y),
        width: (a.x - b.x).abs(),
        height: (a.y - b.y).abs(),
    }
}

/// Normalize two drag corners directly into document space.
///
/// The larger display Y maps to the document bottom and the smaller to the top.
pub fn points_to_document_rect(
    a: DisplayPoint,
    b: DisplayPoint,
    page_height: PageHeight,
) -> DocumentRect {
    let h = page_height.get();
    let min_x = a.x.min(b.x);
    let max_x = a.x.max(b.x);
    let min_y = a.y.min(b.y);
    let max_y = a.y.max(b.y);

    DocumentRect {
        bottom_left_x: min_x,
        bottom_left_y: h - max_y,
        top_right_x: max_x,
        top_right_y: h - min_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(v: f64) -> PageHeight {
        PageHeight::new(v).unwrap()
    }

    fn assert_close(a: &DisplayRect, b: &DisplayRect) {
        assert!((a.x - b.x).abs() <= 1.0, "{a:?} vs {b:?}");
        assert!((a.y - b.y).abs() <= 1.0, "{a:?} vs {b:?}");
        assert!((a.width - b.width).abs() <= 1.0, "{a:?} vs {b:?}");
        assert!((a.height - b.height).abs() <= 1.0, "{a:?} vs {b:?}");
    }

    #[test]
    fn test_letter_page_scenario() {
        let rect = DisplayRect::new(100.0, 50.0, 200.0, 30.0).unwrap();
        let doc = display_to_document(&rect, h(792.0)).unwrap();
        assert_eq!(doc, DocumentRect::new(100.0, 712.0, 300.0, 742.0).unwrap());
    }

    #[test]
    fn test_round_trip() {
        let cases = [
            (0.0, 0.0, 0.0, 0.0, 792.0),
            (100.0, 50.0, 200.0, 30.0, 792.0),
            (12.5, 700.25, 33.75, 91.5, 792.0),
            (0.0, 0.0, 612.0, 792.0, 792.0),
            (5.0, 900.0, 10.0, 10.0, 842.0),
        ];
        for (x, y, w, ht, page) in cases {
            let rect = DisplayRect::new(x, y, w, ht).unwrap();
            let back = document_to_display(&display_to_document(&rect, h(page)).unwrap(), h(page))
                .unwrap();
            assert_close(&rect, &back);
        }
    }

    #[test]
    fn test_round_trip_survives_snapping() {
        let rect = DisplayRect::new(10.7, 20.2, 30.9, 40.4).unwrap();
        let doc = display_to_document(&rect, h(792.0)).unwrap().snapped();
        let back = document_to_display(&doc, h(792.0)).unwrap().snapped();
        assert_close(&rect, &back);
    }

    #[test]
    fn test_document_bounds_normalized_by_construction() {
        let rect = DisplayRect::new(1.0, 1.0, 4.0, 9.0).unwrap();
        let doc = display_to_document(&rect, h(100.0)).unwrap();
        assert!(doc.bottom_left_y <= doc.top_right_y);
        assert!(doc.bottom_left_x <= doc.top_right_x);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_increasing_display_y_decreases_document_y() {
        let page = h(500.0);
        let mut prev: Option<DocumentRect> = None;
        for y in [0.0, 10.0, 55.5, 200.0, 499.0] {
            let doc = display_to_document(&DisplayRect::new(0.0, y, 10.0, 10.0).unwrap(), page)
                .unwrap();
            if let Some(p) = prev {
                assert!(doc.bottom_left_y < p.bottom_left_y);
                assert!(doc.top_right_y < p.top_right_y);
            }
            prev = Some(doc);
        }
    }

    #[test]
    fn test_points_to_display_rect_normalizes() {
        let expected = DisplayRect::new(1.0, 1.0, 4.0, 4.0).unwrap();
        assert_eq!(
            points_to_display_rect(DisplayPoint::new(5.0, 5.0), DisplayPoint::new(1.0, 1.0)),
            expected
        );
        assert_eq!(
            points_to_display_rect(DisplayPoint::new(1.0, 5.0), DisplayPoint::new(5.0, 1.0)),
            expected
        );
    }

    #[test]
    fn test_points_to_document_rect_uses_matching_axis() {
        // Start X (300) is larger than both Y values. Taking the Y maximum
        // against the start X would give a bottom of 792 - 300 = 492.
        let a = DisplayPoint::new(300.0, 20.0);
        let b = DisplayPoint::new(100.0, 10.0);
        let doc = points_to_document_rect(a, b, h(792.0));
        assert_eq!(doc, DocumentRect::new(100.0, 772.0, 300.0, 782.0).unwrap());
    }

    #[test]
    fn test_points_to_document_rect_matches_two_step_path() {
        let a = DisplayPoint::new(40.0, 400.0);
        let b = DisplayPoint::new(10.0, 25.0);
        let direct = points_to_document_rect(a, b, h(792.0));
        let via_display = display_to_document(&points_to_display_rect(a, b), h(792.0)).unwrap();
        assert_eq!(direct, via_display);
    }

    #[test]
    fn test_invalid_page_height_rejected() {
        assert!(PageHeight::new(0.0).is_err());
        assert!(PageHeight::new(-10.0).is_err());
        assert!(PageHeight::new(f64::NAN).is_err());
        assert!(serde_json::from_str::<PageHeight>("0").is_err());
        assert_eq!(serde_json::from_str::<PageHeight>("792").unwrap().get(), 792.0);
    }

    #[test]
    fn test_negative_display_size_rejected() {
        assert!(DisplayRect::new(0.0, 0.0, -1.0, 5.0).is_err());
        let bad = DisplayRect {
            x: 0.0,
            y: 0.0,
            width: 5.0,
            height: -5.0,
        };
        assert!(matches!(
            display_to_document(&bad, h(100.0)),
            Err(PagemarkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_inverted_document_rect_rejected() {
        assert!(DocumentRect::new(10.0, 10.0, 5.0, 20.0).is_err());
        let inverted = DocumentRect {
            bottom_left_x: 0.0,
            bottom_left_y: 50.0,
            top_right_x: 10.0,
            top_right_y: 40.0,
        };
        assert!(document_to_display(&inverted, h(100.0)).is_err());
    }

    #[test]
    fn test_from_corners_normalizes() {
        let r = DocumentRect::from_corners(DocumentPoint::new(9.0, 1.0), DocumentPoint::new(2.0, 7.0));
        assert_eq!(r, DocumentRect::new(2.0, 1.0, 9.0, 7.0).unwrap());
    }

    #[test]
    fn test_intersects_and_contains() {
        let query = DocumentRect::new(15.0, 15.0, 25.0, 25.0).unwrap();
        let token = DocumentRect::new(10.0, 10.0, 20.0, 20.0).unwrap();
        assert!(query.intersects(&token));
        assert!(!query.contains(&token));

        let touching = DocumentRect::new(25.0, 0.0, 30.0, 15.0).unwrap();
        assert!(query.intersects(&touching));

        let apart = DocumentRect::new(26.0, 26.0, 30.0, 30.0).unwrap();
        assert!(!query.intersects(&apart));
    }

    #[test]
    fn test_document_contains_point_includes_edges() {
        let r = DocumentRect::new(10.0, 20.0, 30.0, 40.0).unwrap();
        assert!(r.contains_point(DocumentPoint::new(20.0, 30.0)));
        assert!(r.contains_point(DocumentPoint::new(10.0, 40.0)));
        assert!(!r.contains_point(DocumentPoint::new(9.9, 30.0)));
        assert!(!r.contains_point(DocumentPoint::new(20.0, 40.1)));
    }

    #[test]
    fn test_snapped_truncates() {
        let r = DisplayRect::new(1.9, 2.1, 3.5, 4.99).unwrap().snapped();
        assert_eq!(r, DisplayRect::new(1.0, 2.0, 3.0, 4.0).unwrap());
    }
}

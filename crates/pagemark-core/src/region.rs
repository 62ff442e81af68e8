//! Region queries over a page's positioned text.
//!
//! Every query takes a region already expressed in document space. Results
//! never alias or mutate the inputs.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::PagemarkError;
use crate::geometry::DocumentRect;

/// Bottom-Y distance within which two tokens are treated as the same line.
pub const LINE_TOLERANCE: f64 = 1.0;

/// A single positioned word on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextToken {
    pub text: String,
    pub bbox: DocumentRect,
}

/// A cluster of tokens produced by block segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub bbox: DocumentRect,
    pub text: String,
}

/// Anything with a document-space bounding box.
pub trait Bounded {
    fn bbox(&self) -> &DocumentRect;
}

impl Bounded for TextToken {
    fn bbox(&self) -> &DocumentRect {
        &self.bbox
    }
}

impl Bounded for TextBlock {
    fn bbox(&self) -> &DocumentRect {
        &self.bbox
    }
}

/// Inclusion rule for region queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPolicy {
    /// The box must lie fully inside the region.
    #[default]
    Containment,
    /// Any overlap with the region, touching edges included.
    Intersection,
}

impl FilterPolicy {
    pub fn matches(self, region: &DocumentRect, bbox: &DocumentRect) -> bool {
        match self {
            FilterPolicy::Containment => region.contains(bbox),
            FilterPolicy::Intersection => region.intersects(bbox),
        }
    }
}

impl fmt::Display for FilterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterPolicy::Containment => write!(f, "containment"),
            FilterPolicy::Intersection => write!(f, "intersection"),
        }
    }
}

impl FromStr for FilterPolicy {
    type Err = PagemarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contain" | "containment" | "within" => Ok(FilterPolicy::Containment),
            "intersect" | "intersection" | "overlap" => Ok(FilterPolicy::Intersection),
            other => Err(PagemarkError::InvalidArgument(format!(
                "unknown filter policy '{other}' (expected 'contain' or 'intersect')"
            ))),
        }
    }
}

/// Tokens relevant to `region` under `policy`, in reading order.
///
/// Ordered by bottom-Y ascending, then left-X ascending. Bottoms within
/// [`LINE_TOLERANCE`] of a line's first token count as the same line and are
/// read left to right. The sorts are stable, so tokens with identical boxes
/// keep their input order.
pub fn tokens_in_region<'a>(
    tokens: &'a [TextToken],
    region: &DocumentRect,
    policy: FilterPolicy,
) -> Result<Vec<&'a TextToken>, PagemarkError> {
    let mut matched = filter_in_region(tokens, region, policy)?;
    matched.sort_by(|a, b| {
        coord_cmp(a.bbox.bottom(), b.bbox.bottom())
            .then_with(|| coord_cmp(a.bbox.left(), b.bbox.left()))
    });
    Ok(group_lines(&matched, LINE_TOLERANCE)
        .into_iter()
        .flat_map(|mut line| {
            line.sort_by(|a, b| coord_cmp(a.bbox.left(), b.bbox.left()));
            line
        })
        .collect())
}

/// Text under `region`, tokens joined by a single space. Empty when nothing matches.
pub fn extract_text(
    tokens: &[TextToken],
    region: &DocumentRect,
    policy: FilterPolicy,
) -> Result<String, PagemarkError> {
    let matched = tokens_in_region(tokens, region, policy)?;
    Ok(join_tokens(&matched))
}

/// Blocks overlapping `region`, in input order.
pub fn blocks_intersecting_region<'a>(
    blocks: &'a [TextBlock],
    region: &DocumentRect,
) -> Result<Vec<&'a TextBlock>, PagemarkError> {
    filter_in_region(blocks, region, FilterPolicy::Intersection)
}

/// Split already-ordered tokens into lines.
///
/// A token starts a new line when its bottom-Y is more than `tolerance` away
/// from the bottom-Y of the first token on the current line.
pub fn group_lines<'a>(tokens: &[&'a TextToken], tolerance: f64) -> Vec<Vec<&'a TextToken>> {
    let mut lines: Vec<Vec<&'a TextToken>> = Vec::new();
    for &token in tokens {
        let same_line = lines
            .last()
            .and_then(|line| line.first())
            .is_some_and(|first| (token.bbox.bottom() - first.bbox.bottom()).abs() <= tolerance);
        if same_line {
            if let Some(line) = lines.last_mut() {
                line.push(token);
            }
        } else {
            lines.push(vec![token]);
        }
    }
    lines
}

/// Like [`extract_text`], but one output line per detected text line.
pub fn extract_lines(
    tokens: &[TextToken],
    region: &DocumentRect,
    policy: FilterPolicy,
) -> Result<String, PagemarkError> {
    let matched = tokens_in_region(tokens, region, policy)?;
    Ok(join_lines(&matched))
}

/// Words joined by a single space.
pub fn join_tokens(tokens: &[&TextToken]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered tokens rendered one text line per output line.
pub fn join_lines(tokens: &[&TextToken]) -> String {
    group_lines(tokens, LINE_TOLERANCE)
        .iter()
        .map(|line| join_tokens(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn filter_in_region<'a, T: Bounded>(
    items: &'a [T],
    region: &DocumentRect,
    policy: FilterPolicy,
) -> Result<Vec<&'a T>, PagemarkError> {
    region.validate()?;
    let matched: Vec<&T> = items
        .iter()
        .filter(|item| policy.matches(region, item.bbox()))
        .collect();
    tracing::debug!(
        policy = %policy,
        candidates = items.len(),
        matched = matched.len(),
        "region query"
    );
    Ok(matched)
}

/// Coordinates are finite once a region or box is validated; `-0.0` and `0.0` compare equal.
fn coord_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

use crate::error::PagemarkError;
use crate::extraction::{PageContent, PdfExtractor};
use crate::geometry::{display_to_document, DisplayRect, DocumentRect, PageHeight};
use crate::region::{TextBlock, TextToken};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -bbox-layout`, which reports every word, line and block
/// with a top-left-origin bounding box. Boxes are flipped into document space
/// using each page's height.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, PagemarkError> {
        let mut tmpfile = tempfile::NamedTempFile::new()
            .map_err(|e| PagemarkError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| PagemarkError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-bbox-layout")
            .arg(tmpfile.path())
            .arg("-")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PagemarkError::PdftotextNotFound
                } else {
                    PagemarkError::Extraction(format!("pdftotext -bbox-layout failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(PagemarkError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let pages = parse_bbox_layout(&xml)?;
        tracing::debug!(
            backend = self.backend_name(),
            pages = pages.len(),
            "extracted pages"
        );
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

#[derive(Default)]
struct PageBuilder {
    width: f64,
    height: Option<PageHeight>,
    words: Vec<TextToken>,
    blocks: Vec<TextBlock>,
    block_box: Option<DocumentRect>,
    block_lines: Vec<String>,
    line_words: Vec<String>,
    word_box: Option<DocumentRect>,
    word_text: String,
}

impl PageBuilder {
    fn height(&self) -> Result<PageHeight, PagemarkError> {
        self.height
            .ok_or_else(|| PagemarkError::ParseError("word or block outside of a <page>".into()))
    }

    fn finish(self, page_number: usize) -> PageContent {
        PageContent {
            page_number,
            width: self.width,
            height: self.height.map(f64::from).unwrap_or(0.0),
            words: self.words,
            blocks: self.blocks,
        }
    }
}

/// Parse the XHTML written by `pdftotext -bbox-layout`.
fn parse_bbox_layout(xml: &str) -> Result<Vec<PageContent>, PagemarkError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages = Vec::new();
    let mut page = PageBuilder::default();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| PagemarkError::ParseError(e.to_string()))?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"page" => {
                    page = PageBuilder {
                        width: attr_f64(&e, b"width")?,
                        height: Some(PageHeight::new(attr_f64(&e, b"height")?)?),
                        ..PageBuilder::default()
                    };
                }
                b"block" => {
                    page.block_box = Some(element_box(&e, page.height()?)?);
                    page.block_lines.clear();
                }
                b"line" => page.line_words.clear(),
                b"word" => {
                    page.word_box = Some(element_box(&e, page.height()?)?);
                    page.word_text.clear();
                }
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"page" => {
                pages.push(PageContent {
                    page_number: pages.len() + 1,
                    width: attr_f64(&e, b"width")?,
                    height: attr_f64(&e, b"height")?,
                    words: vec![],
                    blocks: vec![],
                });
            }
            Event::Text(t) => {
                if page.word_box.is_some() {
                    let text = t
                        .unescape()
                        .map_err(|e| PagemarkError::ParseError(e.to_string()))?;
                    page.word_text.push_str(&text);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"word" => {
                    if let Some(bbox) = page.word_box.take() {
                        let text = page.word_text.trim().to_string();
                        if !text.is_empty() {
                            page.line_words.push(text.clone());
                            page.words.push(TextToken { text, bbox });
                        }
                    }
                }
                b"line" => {
                    if !page.line_words.is_empty() {
                        let line = page.line_words.join(" ");
                        page.block_lines.push(line);
                    }
                    page.line_words.clear();
                }
                b"block" => {
                    if let Some(bbox) = page.block_box.take() {
                        if !page.block_lines.is_empty() {
                            let text = page.block_lines.join("\n");
                            page.blocks.push(TextBlock { bbox, text });
                        }
                    }
                    page.block_lines.clear();
                }
                b"page" => {
                    let finished = std::mem::take(&mut page);
                    pages.push(finished.finish(pages.len() + 1));
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pages)
}

/// Read an `xMin`/`yMin`/`xMax`/`yMax` box and flip it into document space.
fn element_box(e: &BytesStart<'_>, page_height: PageHeight) -> Result<DocumentRect, PagemarkError> {
    let x_min = attr_f64(e, b"xMin")?;
    let y_min = attr_f64(e, b"yMin")?;
    let x_max = attr_f64(e, b"xMax")?;
    let y_max = attr_f64(e, b"yMax")?;
    let top_down = DisplayRect::new(x_min, y_min, x_max - x_min, y_max - y_min)?;
    display_to_document(&top_down, page_height)
}

fn attr_f64(e: &BytesStart<'_>, name: &[u8]) -> Result<f64, PagemarkError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| PagemarkError::ParseError(err.to_string()))?;
        if attr.key.as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|err| PagemarkError::ParseError(err.to_string()))?;
            return value.trim().parse::<f64>().map_err(|err| {
                PagemarkError::ParseError(format!(
                    "attribute '{}' is not a number ({}): {}",
                    String::from_utf8_lossy(name),
                    value,
                    err
                ))
            });
        }
    }
    Err(PagemarkError::ParseError(format!(
        "<{}> is missing attribute '{}'",
        String::from_utf8_lossy(e.name().as_ref()),
        String::from_utf8_lossy(name)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<title></title>
<meta name="Producer" content="Test"/>
</head>
<body>
<doc>
  <page width="612.000000" height="792.000000">
    <flow>
      <block xMin="50.000000" yMin="40.000000" xMax="200.000000" yMax="72.000000">
        <line xMin="50.000000" yMin="40.000000" xMax="200.000000" yMax="52.000000">
          <word xMin="50.000000" yMin="40.000000" xMax="110.000000" yMax="52.000000">Invoice</word>
          <word xMin="115.000000" yMin="40.000000" xMax="200.000000" yMax="52.000000">#1042</word>
        </line>
        <line xMin="50.000000" yMin="60.000000" xMax="120.000000" yMax="72.000000">
          <word xMin="50.000000" yMin="60.000000" xMax="120.000000" yMax="72.000000">Smith&amp;Co</word>
        </line>
      </block>
    </flow>
  </page>
  <page width="595.000000" height="842.000000">
  </page>
</doc>
</body>
</html>
"#;

    #[test]
    fn test_parse_bbox_layout_pages() {
        let pages = parse_bbox_layout(SAMPLE).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[0].width, 612.0);
        assert_eq!(pages[0].height, 792.0);
        assert_eq!(pages[1].page_number, 2);
        assert_eq!(pages[1].height, 842.0);
        assert!(pages[1].words.is_empty());
    }

    #[test]
    fn test_words_flipped_into_document_space() {
        let pages = parse_bbox_layout(SAMPLE).unwrap();
        let words = &pages[0].words;
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].text, "Invoice");
        assert_eq!(
            words[0].bbox,
            DocumentRect::new(50.0, 740.0, 110.0, 752.0).unwrap()
        );
        assert_eq!(words[2].text, "Smith&Co");
    }

    #[test]
    fn test_blocks_join_lines() {
        let pages = parse_bbox_layout(SAMPLE).unwrap();
        let blocks = &pages[0].blocks;
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Invoice #1042\nSmith&Co");
        assert_eq!(
            blocks[0].bbox,
            DocumentRect::new(50.0, 720.0, 200.0, 752.0).unwrap()
        );
    }

    #[test]
    fn test_self_closing_page_is_empty_page() {
        let xml = r#"<doc><page width="612" height="792"/><page width="595" height="842"></page></doc>"#;
        let pages = parse_bbox_layout(xml).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[0].width, 612.0);
        assert_eq!(pages[0].height, 792.0);
        assert!(pages[0].words.is_empty());
        assert!(pages[0].blocks.is_empty());
        assert_eq!(pages[1].page_number, 2);
        assert_eq!(pages[1].height, 842.0);
    }

    #[test]
    fn test_missing_attribute_is_parse_error() {
        let xml = r#"<doc><page width="612"></page></doc>"#;
        assert!(matches!(
            parse_bbox_layout(xml),
            Err(PagemarkError::ParseError(_))
        ));
    }
}

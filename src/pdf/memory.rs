//! In-memory document backend.
//!
//! Holds pre-extracted page text, typically loaded from a JSON text dump.
//! Used by the CLI for `.json` inputs and throughout the test suite.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::document::{DocumentSource, PdfPage};
use super::error::{Result, ViewerError};
use super::types::{OutlineItem, PageViewport, RenderedImage, TextContent, TextItem};

/// US Letter in PDF points
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Largest RGB buffer a single render may allocate
const MAX_RENDER_BYTES: usize = 256 * 1024 * 1024;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryDocument {
    pub pages: Vec<TextContent>,
    #[serde(default)]
    pub outline: Vec<OutlineItem>,
    /// Named destinations mapped to zero-based page indices
    #[serde(default)]
    pub destinations: HashMap<String, usize>,
    /// Pages (1-based) from which text extraction fails
    #[serde(skip)]
    fail_from: Option<usize>,
}

impl MemoryDocument {
    /// Build a document from per-page token lists
    #[must_use]
    pub fn from_pages<S: Into<String>>(pages: Vec<Vec<S>>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|tokens| TextContent {
                    items: tokens.into_iter().map(TextItem::new).collect(),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    #[must_use]
    pub fn with_outline(mut self, outline: Vec<OutlineItem>) -> Self {
        self.outline = outline;
        self
    }

    #[must_use]
    pub fn with_destination(mut self, name: impl Into<String>, page_index: usize) -> Self {
        self.destinations.insert(name.into(), page_index);
        self
    }

    /// Make text extraction fail for `page` (1-based) and every page after it
    #[must_use]
    pub fn failing_from(mut self, page: usize) -> Self {
        self.fail_from = Some(page);
        self
    }
}

struct MemoryPage<'a> {
    number: usize,
    content: &'a TextContent,
    failing: bool,
}

impl PdfPage for MemoryPage<'_> {
    fn number(&self) -> usize {
        self.number
    }

    fn text_content(&self) -> Result<TextContent> {
        if self.failing {
            return Err(ViewerError::engine(format!(
                "text extraction failed on page {}",
                self.number
            )));
        }
        Ok(self.content.clone())
    }

    fn viewport(&self, scale: f32) -> Result<PageViewport> {
        Ok(PageViewport {
            width: DEFAULT_PAGE_SIZE.0 * scale,
            height: DEFAULT_PAGE_SIZE.1 * scale,
            scale,
        })
    }

    fn render(&self, scale: f32) -> Result<RenderedImage> {
        let viewport = self.viewport(scale)?;
        let width_px = viewport.width.max(1.0) as u32;
        let height_px = viewport.height.max(1.0) as u32;

        let len = (width_px as usize)
            .checked_mul(height_px as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .filter(|&len| len <= MAX_RENDER_BYTES)
            .ok_or_else(|| {
                ViewerError::engine(format!(
                    "page {} at scale {scale} is too large to render ({width_px}x{height_px})",
                    self.number
                ))
            })?;

        Ok(RenderedImage {
            pixels: vec![0xFF; len],
            width_px,
            height_px,
        })
    }
}

impl DocumentSource for MemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, number: usize) -> Result<Box<dyn PdfPage + '_>> {
        let content = number
            .checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .ok_or(ViewerError::PageOutOfRange {
                page: number,
                count: self.pages.len(),
            })?;

        Ok(Box::new(MemoryPage {
            number,
            content,
            failing: self.fail_from.is_some_and(|from| number >= from),
        }))
    }

    fn outline(&self) -> Result<Vec<OutlineItem>> {
        Ok(self.outline.clone())
    }

    fn resolve_destination(&self, name: &str) -> Result<Option<usize>> {
        Ok(self.destinations.get(name).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_dump() {
        let doc = MemoryDocument::from_json(
            r#"{
                "pages": [
                    {"items": [{"text": "Hello"}, {"str": "world"}]},
                    {"items": []}
                ],
                "destinations": {"intro": 1}
            }"#,
        )
        .unwrap();

        assert_eq!(doc.page_count(), 2);
        let tokens = doc.page(1).unwrap().text_content().unwrap().into_tokens();
        assert_eq!(tokens, vec!["Hello", "world"]);
        assert_eq!(doc.resolve_destination("intro").unwrap(), Some(1));
        assert_eq!(doc.resolve_destination("missing").unwrap(), None);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            MemoryDocument::from_json("{\"pages\": 3}"),
            Err(ViewerError::Parse(_))
        ));
    }

    #[test]
    fn failing_pages_reject_text_extraction() {
        let doc = MemoryDocument::from_pages(vec![vec!["a"], vec!["b"], vec!["c"]]).failing_from(2);

        assert!(doc.page(1).unwrap().text_content().is_ok());
        assert!(doc.page(2).unwrap().text_content().is_err());
        assert!(doc.page(3).unwrap().text_content().is_err());
    }

    #[test]
    fn render_scales_viewport() {
        let doc = MemoryDocument::from_pages(vec![vec!["a"]]);
        let image = doc.page(1).unwrap().render(0.5).unwrap();
        assert_eq!(image.width_px, 306);
        assert_eq!(image.height_px, 396);
        assert_eq!(image.pixels.len(), 306 * 396 * 3);
    }

    #[test]
    fn oversized_render_is_an_error() {
        let doc = MemoryDocument::from_pages(vec![vec!["a"]]);

        assert!(matches!(doc.page(1).unwrap().render(60.0), Err(ViewerError::Engine { .. })));
        assert!(matches!(
            doc.page(1).unwrap().render(f32::MAX),
            Err(ViewerError::Engine { .. })
        ));
    }
}

//! Core types shared between the document accessor and viewer services

use serde::{Deserialize, Serialize};

/// One positioned text run as reported by the PDF engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextItem {
    #[serde(alias = "str")]
    pub text: String,
}

impl TextItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Text content of a single page
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub items: Vec<TextItem>,
}

impl TextContent {
    /// Token strings in content-stream order
    #[must_use]
    pub fn into_tokens(self) -> Vec<String> {
        self.items.into_iter().map(|item| item.text).collect()
    }
}

/// Page dimensions at a given scale
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PageViewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

/// Raw rendered page image.
///
/// RGB pixel data produced by the PDF engine; the viewer core only caches and
/// hands these out, it never draws.
#[derive(Clone)]
pub struct RenderedImage {
    /// Raw RGB pixel data (3 bytes per pixel)
    pub pixels: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

impl std::fmt::Debug for RenderedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedImage")
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("bytes", &self.pixels.len())
            .finish_non_exhaustive()
    }
}

/// Where an outline entry points to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Zero-based page index
    Page(usize),
    /// Named destination, resolved through the document
    Named(String),
}

/// A single entry in the document outline
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineItem {
    pub title: String,
    pub destination: Option<Destination>,
    #[serde(default)]
    pub items: Vec<OutlineItem>,
}

/// Size of the last rendered page, used by fit/auto zoom
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_landscape(self) -> bool {
        self.width > self.height
    }
}

//! MuPDF-backed document source

use std::path::Path;

use log::{debug, warn};
use mupdf::text_page::TextBlockType;
use mupdf::{Colorspace, Document, Matrix, Page, TextPageFlags};

use super::document::{DocumentSource, PdfPage};
use super::error::{Result, ViewerError};
use super::types::{
    Destination, OutlineItem, PageViewport, RenderedImage, TextContent, TextItem,
};

/// A PDF opened through MuPDF
pub struct MupdfDocument {
    doc: Document,
    page_count: usize,
}

impl MupdfDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let doc = Document::open(path.to_string_lossy().as_ref())?;
        let page_count = doc.page_count()?.max(0) as usize;
        debug!("Opened {path:?} with {page_count} pages");
        Ok(Self { doc, page_count })
    }
}

struct MupdfPage {
    number: usize,
    page: Page,
}

impl PdfPage for MupdfPage {
    fn number(&self) -> usize {
        self.number
    }

    /// One token per text line, in reading order
    fn text_content(&self) -> Result<TextContent> {
        let text_page = self.page.to_text_page(TextPageFlags::empty())?;
        let mut items = Vec::new();

        for block in text_page.blocks() {
            if block.r#type() != TextBlockType::Text {
                continue;
            }
            for line in block.lines() {
                let text: String = line.chars().filter_map(|ch| ch.char()).collect();
                items.push(TextItem::new(text));
            }
        }

        Ok(TextContent { items })
    }

    fn viewport(&self, scale: f32) -> Result<PageViewport> {
        let bounds = self.page.bounds()?;
        Ok(PageViewport {
            width: (bounds.x1 - bounds.x0) * scale,
            height: (bounds.y1 - bounds.y0) * scale,
            scale,
        })
    }

    fn render(&self, scale: f32) -> Result<RenderedImage> {
        let rgb = Colorspace::device_rgb();
        let pixmap = self
            .page
            .to_pixmap(&Matrix::new_scale(scale, scale), &rgb, false, false)?;

        let pixels = packed_rgb(
            pixmap.samples(),
            pixmap.width() as usize,
            pixmap.height() as usize,
            pixmap.stride() as usize,
            pixmap.n() as usize,
        )?;

        Ok(RenderedImage {
            pixels,
            width_px: pixmap.width(),
            height_px: pixmap.height(),
        })
    }
}

impl DocumentSource for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page(&self, number: usize) -> Result<Box<dyn PdfPage + '_>> {
        if number == 0 || number > self.page_count {
            return Err(ViewerError::PageOutOfRange {
                page: number,
                count: self.page_count,
            });
        }
        let page = self.doc.load_page((number - 1) as i32)?;
        Ok(Box::new(MupdfPage { number, page }))
    }

    fn outline(&self) -> Result<Vec<OutlineItem>> {
        match self.doc.outlines() {
            Ok(outlines) => Ok(convert_outlines(&outlines)),
            Err(e) => {
                warn!("Failed to read outline: {e}");
                Ok(Vec::new())
            }
        }
    }
}

/// Copy `height` rows of `width` pixels with `n` components each out of a
/// buffer whose rows are `stride` bytes apart, keeping RGB only
fn packed_rgb(
    samples: &[u8],
    width: usize,
    height: usize,
    stride: usize,
    n: usize,
) -> Result<Vec<u8>> {
    if n < 3 {
        return Err(ViewerError::engine(format!(
            "unsupported pixmap with {n} components"
        )));
    }

    let row_bytes = width * n;
    if stride == 0 || row_bytes > stride || samples.len() < stride.saturating_mul(height) {
        return Err(ViewerError::engine("pixmap buffer size mismatch"));
    }

    let mut out = Vec::with_capacity(width * height * 3);
    for row in samples.chunks(stride).take(height) {
        let row = &row[..row_bytes];
        if n == 3 {
            out.extend_from_slice(row);
        } else {
            for px in row.chunks_exact(n) {
                out.extend_from_slice(&px[..3]);
            }
        }
    }
    Ok(out)
}

fn convert_outlines(outlines: &[mupdf::Outline]) -> Vec<OutlineItem> {
    outlines
        .iter()
        .map(|outline| OutlineItem {
            title: outline.title.trim().to_string(),
            destination: outline
                .dest
                .map(|dest| Destination::Page(dest.loc.page_number as usize)),
            items: convert_outlines(&outline.down),
        })
        .collect()
}

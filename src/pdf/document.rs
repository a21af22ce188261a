//! Document accessor - the seam between the viewer core and the PDF engine

use log::{debug, info};

use super::error::{Result, ViewerError};
use super::types::{OutlineItem, PageViewport, RenderedImage, TextContent};

/// A single page handed out by the PDF engine
pub trait PdfPage {
    /// Page number (1-based)
    fn number(&self) -> usize;

    /// Extract the page's text runs
    fn text_content(&self) -> Result<TextContent>;

    /// Page dimensions at the given scale
    fn viewport(&self, scale: f32) -> Result<PageViewport>;

    /// Rasterize the page at the given scale
    fn render(&self, scale: f32) -> Result<RenderedImage>;
}

/// An opened document in the PDF engine
pub trait DocumentSource {
    fn page_count(&self) -> usize;

    /// Load a page (1-based)
    fn page(&self, number: usize) -> Result<Box<dyn PdfPage + '_>>;

    fn outline(&self) -> Result<Vec<OutlineItem>> {
        Ok(Vec::new())
    }

    /// Resolve a named destination to a zero-based page index
    fn resolve_destination(&self, _name: &str) -> Result<Option<usize>> {
        Ok(None)
    }
}

/// Load state of the document service
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DocumentState {
    #[default]
    Unknown,
    Inited,
    Loaded,
}

/// Guards access to the open document.
///
/// Every accessor except [`DocumentService::pages_count`] rejects with
/// [`ViewerError::NotLoaded`] until a source has been loaded.
#[derive(Default)]
pub struct DocumentService {
    source: Option<Box<dyn DocumentSource>>,
    state: DocumentState,
    pages_count: usize,
}

impl DocumentService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading a document.
    ///
    /// The service stays `Inited` (and rejects every accessor) when no source
    /// is passed.
    pub fn initialize(&mut self, source: Option<Box<dyn DocumentSource>>) -> Result<()> {
        self.cleanup();
        self.state = DocumentState::Inited;
        let Some(source) = source else {
            return Err(ViewerError::NoDocument);
        };
        self.attach(source);
        Ok(())
    }

    /// Take ownership of an opened engine document
    pub fn load(&mut self, source: Box<dyn DocumentSource>) {
        self.cleanup();
        self.attach(source);
    }

    fn attach(&mut self, source: Box<dyn DocumentSource>) {
        self.pages_count = source.page_count();
        self.source = Some(source);
        self.state = DocumentState::Loaded;
        info!("Document loaded with {} pages", self.pages_count);
    }

    /// Drop the document and return to the initial state
    pub fn cleanup(&mut self) {
        if self.source.take().is_some() {
            debug!("Document closed");
        }
        self.pages_count = 0;
        self.state = DocumentState::Unknown;
    }

    #[must_use]
    pub fn state(&self) -> DocumentState {
        self.state
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state == DocumentState::Loaded
    }

    /// Number of pages, 0 when nothing is loaded
    #[must_use]
    pub fn pages_count(&self) -> usize {
        self.pages_count
    }

    fn source(&self) -> Result<&dyn DocumentSource> {
        match (&self.source, self.state) {
            (Some(source), DocumentState::Loaded) => Ok(source.as_ref()),
            _ => Err(ViewerError::NotLoaded),
        }
    }

    /// Fetch a page (1-based)
    pub fn page(&self, number: usize) -> Result<Box<dyn PdfPage + '_>> {
        let source = self.source()?;
        if number == 0 || number > self.pages_count {
            return Err(ViewerError::PageOutOfRange {
                page: number,
                count: self.pages_count,
            });
        }
        source.page(number)
    }

    pub fn outline(&self) -> Result<Vec<OutlineItem>> {
        self.source()?.outline()
    }

    pub fn resolve_destination(&self, name: &str) -> Result<Option<usize>> {
        self.source()?.resolve_destination(name)
    }
}

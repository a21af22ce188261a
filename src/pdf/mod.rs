//! PDF viewer infrastructure: document access, render scheduling and the
//! services a viewer coordinates

mod cache;
mod document;
mod error;
mod events;
mod extract;
mod memory;
#[cfg(feature = "pdf")]
mod mupdf_source;
mod outline;
mod render_window;
mod service;
mod types;
mod zoom;

pub use cache::{ThumbnailCache, ThumbnailKey};
pub use document::{DocumentService, DocumentSource, DocumentState, PdfPage};
pub use error::{Result, ViewerError};
pub use events::{EventBus, ViewerEvent};
pub use extract::{ExtractionState, TextExtractor};
pub use memory::MemoryDocument;
#[cfg(feature = "pdf")]
pub use mupdf_source::MupdfDocument;
pub use outline::Outline;
pub use render_window::{
    DEFAULT_MAX_DISPLAYED_PAGES, RenderWindow, WINDOW_RADIUS, WINDOW_SPAN, WindowUpdate,
};
pub use service::Viewer;
pub use types::*;
pub use zoom::*;

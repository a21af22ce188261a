//! Error types for the viewer core

/// Errors surfaced by the document accessor and viewer services
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Any document access before loading has completed
    #[error("Document is not loaded")]
    NotLoaded,

    /// Viewer operations that need an open document
    #[error("No document source passed")]
    NoDocument,

    #[error("Page {page} is out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    /// Failure reported by the PDF engine
    #[error("PDF engine: {detail}")]
    Engine { detail: String },

    #[error("Invalid text dump: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ViewerError {
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine { detail: msg.into() }
    }
}

#[cfg(feature = "pdf")]
impl From<mupdf::error::Error> for ViewerError {
    fn from(err: mupdf::error::Error) -> Self {
        Self::engine(err.to_string())
    }
}

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;

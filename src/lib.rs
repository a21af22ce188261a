// Export modules for use in tests
pub mod match_index;
pub mod panic_handler;
pub mod pdf;
pub mod search;
pub mod search_engine;
pub mod settings;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export the viewer entry points
pub use pdf::{MemoryDocument, Viewer, ViewerError, ViewerEvent};
pub use search::NavOutcome;
pub use settings::ViewerSettings;

//! Viewer notifications and the bus that delivers them to the UI host

use flume::{Receiver, Sender};
use log::debug;

use super::types::PageViewport;

/// Notification sent to the UI host.
///
/// The core never touches rendering primitives; everything the host must draw
/// or drop is announced through one of these.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewerEvent {
    /// Pages (1-based) that should be materialized. Already shown pages may be
    /// repeated and can be ignored by the host.
    PageNeedRender(Vec<usize>),

    /// Pages (1-based) to drop. `purge` forces content removal even for pages
    /// that are still displayed (zoom change).
    PageNeedDelete { pages: Vec<usize>, purge: bool },

    /// Re-render the text layer of a page (1-based). `generation` identifies
    /// the search that requested it.
    RenderTextLayer { page: usize, generation: u64 },

    /// Strip highlight markup from every text layer
    ClearTextLayer,

    /// Drop the "selected" marker from the previously selected match
    ClearSelection,

    /// Bring a page (1-based) into view
    SetPage(usize),

    /// Current page changed (1-based)
    PageChanged(usize),

    DocumentLoaded,
    DocumentError(String),

    /// True when the document has no outline
    OutlineDisabled(bool),

    /// Page dimensions at the current scale
    SetPageSize { page: usize, viewport: PageViewport },

    /// Scroll to a page (1-based) after outline navigation
    ScrollToPage(usize),

    ThumbnailsToggled(bool),
}

/// Fan-out of viewer events to every subscriber.
///
/// Subscribers whose receiver has been dropped are pruned on the next emit.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Sender<ViewerEvent>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener
    pub fn subscribe(&mut self) -> Receiver<ViewerEvent> {
        let (tx, rx) = flume::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver an event to all live subscribers
    pub fn emit(&mut self, event: ViewerEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    /// Remove all listeners
    pub fn cleanup(&mut self) {
        debug!("Dropping {} event subscribers", self.subscribers.len());
        self.subscribers.clear();
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

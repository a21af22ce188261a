//! Outline (table of contents) access and destination navigation

use std::collections::HashMap;

use log::{debug, warn};

use super::document::DocumentService;
use super::error::Result;
use super::events::{EventBus, ViewerEvent};
use super::types::{Destination, OutlineItem};

#[derive(Debug, Default)]
pub struct Outline {
    items: Option<Vec<OutlineItem>>,
    /// Named destinations already resolved to 1-based page numbers
    resolved: HashMap<String, usize>,
}

impl Outline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cleanup(&mut self) {
        self.items = None;
        self.resolved.clear();
    }

    /// Outline of the document, fetched once and cached
    pub fn items(&mut self, document: &DocumentService) -> Result<&[OutlineItem]> {
        if self.items.is_none() {
            let items = document.outline()?;
            debug!("Loaded outline with {} top-level entries", items.len());
            self.items = Some(items);
        }
        Ok(self.items.as_deref().unwrap_or_default())
    }

    /// Resolve a destination and ask the host to scroll there.
    ///
    /// Returns the 1-based page scrolled to, clamped to the page count, or
    /// `None` when the destination cannot be resolved.
    pub fn navigate_to(
        &mut self,
        destination: &Destination,
        document: &DocumentService,
        events: &mut EventBus,
    ) -> Result<Option<usize>> {
        let page = match destination {
            Destination::Page(index) => Some(index + 1),
            Destination::Named(name) => self.resolve_named(name, document)?,
        };

        let Some(page) = page else {
            warn!("Cannot resolve destination {destination:?}");
            return Ok(None);
        };

        let page = page.min(document.pages_count());
        if page == 0 {
            return Ok(None);
        }

        events.emit(ViewerEvent::ScrollToPage(page));
        Ok(Some(page))
    }

    fn resolve_named(&mut self, name: &str, document: &DocumentService) -> Result<Option<usize>> {
        if let Some(&page) = self.resolved.get(name) {
            return Ok(Some(page));
        }

        let page = document.resolve_destination(name)?.map(|index| index + 1);
        if let Some(page) = page {
            self.resolved.insert(name.to_string(), page);
        }
        Ok(page)
    }
}

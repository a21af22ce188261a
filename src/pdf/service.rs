//! Viewer service - coordinates the document, render window, search and the
//! supporting services for one open document

use std::sync::Arc;

use flume::Receiver;
use log::{debug, error, info};

use super::cache::ThumbnailCache;
use super::document::{DocumentService, DocumentSource, DocumentState};
use super::error::Result;
use super::events::{EventBus, ViewerEvent};
use super::extract::{ExtractionState, TextExtractor};
use super::outline::Outline;
use super::render_window::{RenderWindow, WindowUpdate};
use super::types::{Destination, OutlineItem, PageSize, PageViewport, RenderedImage};
use super::zoom::{ContainerSize, ScaleRequest, Zoom};
use crate::search::{MatchData, NavOutcome};
use crate::search_engine::{SearchContext, SearchEngine};
use crate::settings::ViewerSettings;

/// One viewer instance: owns every piece of per-document state.
pub struct Viewer {
    document: DocumentService,
    window: RenderWindow,
    search: SearchEngine,
    extractor: TextExtractor,
    outline: Outline,
    thumbnails: ThumbnailCache,
    events: EventBus,
    zoom: Zoom,
    scale: f32,
    current_page: usize,
    thumbnails_shown: bool,
    last_page_size: Option<PageSize>,
}

impl Viewer {
    #[must_use]
    pub fn new(settings: &ViewerSettings) -> Self {
        Self {
            document: DocumentService::new(),
            window: RenderWindow::new(settings.max_displayed_pages),
            search: SearchEngine::new(),
            extractor: TextExtractor::new(),
            outline: Outline::new(),
            thumbnails: ThumbnailCache::new(
                settings.thumbnail_cache_size,
                settings.thumbnail_scale,
            ),
            events: EventBus::new(),
            zoom: Zoom {
                step: settings.zoom_step,
                max_auto: settings.max_auto_zoom,
            },
            scale: 1.0,
            current_page: 0,
            thumbnails_shown: false,
            last_page_size: None,
        }
    }

    /// Register an event listener
    pub fn subscribe(&mut self) -> Receiver<ViewerEvent> {
        self.events.subscribe()
    }

    /// Open a document, resetting all previous state.
    ///
    /// Text extraction is started but not run; drive it with
    /// [`Viewer::pump_extraction`] or [`Viewer::extract_all`].
    pub fn open(&mut self, source: Option<Box<dyn DocumentSource>>) -> Result<()> {
        self.cleanup();

        if let Err(e) = self.document.initialize(source) {
            error!("Failed to open document: {e}");
            self.events.emit(ViewerEvent::DocumentError(e.to_string()));
            return Err(e);
        }

        let pages_count = self.document.pages_count();
        self.window.initialize(pages_count);
        self.search.initialize();
        self.extractor.start();

        let outline_empty = match self.outline.items(&self.document) {
            Ok(items) => items.is_empty(),
            Err(e) => {
                error!("Failed to load outline: {e}");
                true
            }
        };

        self.events.emit(ViewerEvent::DocumentLoaded);
        self.events.emit(ViewerEvent::OutlineDisabled(outline_empty));
        info!("Opened document with {pages_count} pages");
        Ok(())
    }

    /// Tear the viewer down: reset every service and disconnect all
    /// listeners
    pub fn destroy(&mut self) {
        self.cleanup();
        self.events.cleanup();
    }

    /// Reset every service to its initial state
    pub fn cleanup(&mut self) {
        self.document.cleanup();
        self.window.cleanup();
        self.outline.cleanup();
        self.thumbnails.clear();
        self.search.cleanup();
        self.extractor.reset();

        self.scale = 1.0;
        self.current_page = 0;
        self.thumbnails_shown = false;
        self.last_page_size = None;
    }

    #[must_use]
    pub fn pages_count(&self) -> usize {
        self.document.pages_count()
    }

    #[must_use]
    pub fn document_state(&self) -> DocumentState {
        self.document.state()
    }

    /// Viewport of one page (1-based) at `scale`, or at the document scale
    pub fn page_viewport(&self, page: usize, scale: Option<f32>) -> Result<PageViewport> {
        self.document
            .page(page)?
            .viewport(scale.unwrap_or(self.scale))
    }

    /// Current page (1-based), 0 before the first focus
    #[must_use]
    pub fn page_number(&self) -> usize {
        self.current_page
    }

    /// Focus a page (1-based)
    pub fn set_page(&mut self, page: usize) -> WindowUpdate {
        let update = self.window.set_page(page, &mut self.events);
        if (1..=self.document.pages_count()).contains(&page) {
            self.note_page_change(page);
        }
        update
    }

    #[must_use]
    pub fn rendered_pages(&self) -> &[usize] {
        self.window.rendered_pages()
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Change the document scale.
    ///
    /// Every page materialized since the last scale change is purged, the
    /// current page is refocused and page sizes are re-announced.
    pub fn set_scale(
        &mut self,
        request: ScaleRequest,
        container: Option<ContainerSize>,
    ) -> Result<f32> {
        let scale = self
            .zoom
            .resolve(request, self.scale, self.last_page_size, container);
        if (scale - self.scale).abs() <= f32::EPSILON {
            return Ok(self.scale);
        }

        debug!("Scale {} -> {scale}", self.scale);
        self.scale = scale;

        let pages = self.window.pages_to_clean();
        self.events
            .emit(ViewerEvent::PageNeedDelete { pages, purge: true });
        if self.current_page > 0 {
            self.set_page(self.current_page);
        }
        self.prepare_page_sizes()?;
        Ok(self.scale)
    }

    pub fn zoom_in(&mut self) -> Result<f32> {
        self.set_scale(ScaleRequest::Value(self.zoom.step_in(self.scale)), None)
    }

    pub fn zoom_out(&mut self) -> Result<f32> {
        self.set_scale(ScaleRequest::Value(self.zoom.step_out(self.scale)), None)
    }

    /// Announce the size of every page at the current scale
    pub fn prepare_page_sizes(&mut self) -> Result<()> {
        for page in 1..=self.document.pages_count() {
            let viewport = self.document.page(page)?.viewport(self.scale)?;
            self.events
                .emit(ViewerEvent::SetPageSize { page, viewport });
        }
        Ok(())
    }

    /// Record the size of the last rendered page for fit zoom modes
    pub fn set_last_page_size(&mut self, size: PageSize) {
        self.last_page_size = Some(size);
    }

    pub fn toggle_thumbnails(&mut self) -> bool {
        self.thumbnails_shown = !self.thumbnails_shown;
        self.events
            .emit(ViewerEvent::ThumbnailsToggled(self.thumbnails_shown));
        self.thumbnails_shown
    }

    /// Thumbnail of a page (1-based)
    pub fn thumbnail(&mut self, page: usize) -> Result<Arc<RenderedImage>> {
        self.thumbnails.get_or_render(&self.document, page)
    }

    pub fn outline(&mut self) -> Result<&[OutlineItem]> {
        self.outline.items(&self.document)
    }

    /// Scroll to an outline destination, returning the 1-based page
    pub fn navigate_to(&mut self, destination: &Destination) -> Result<Option<usize>> {
        self.outline
            .navigate_to(destination, &self.document, &mut self.events)
    }

    /// Extract text of up to `budget` more pages
    pub fn pump_extraction(&mut self, budget: usize) -> Result<usize> {
        self.extractor
            .pump(&self.document, &mut self.search, budget)
    }

    /// Extract text of every remaining page
    pub fn extract_all(&mut self) -> Result<usize> {
        self.extractor.run_to_end(&self.document, &mut self.search)
    }

    #[must_use]
    pub fn extraction_state(&self) -> ExtractionState {
        self.extractor.state()
    }

    /// Search, or move to the next match when the query is unchanged
    pub fn find(&mut self, query: &str) -> NavOutcome {
        let mut ctx = SearchContext {
            window: &mut self.window,
            document: &self.document,
            events: &mut self.events,
        };
        let outcome = self.search.find(query, &mut ctx);
        self.follow_focus(outcome)
    }

    pub fn find_next(&mut self) -> NavOutcome {
        let mut ctx = SearchContext {
            window: &mut self.window,
            document: &self.document,
            events: &mut self.events,
        };
        let outcome = self.search.find_next(&mut ctx);
        self.follow_focus(outcome)
    }

    pub fn find_prev(&mut self) -> NavOutcome {
        let mut ctx = SearchContext {
            window: &mut self.window,
            document: &self.document,
            events: &mut self.events,
        };
        let outcome = self.search.find_prev(&mut ctx);
        self.follow_focus(outcome)
    }

    /// Selected match ordinal, optionally moved by `diff`
    pub fn current_selected(&mut self, diff: isize) -> usize {
        self.search.current_number(diff)
    }

    #[must_use]
    pub fn found_count(&self) -> usize {
        self.search.found_count()
    }

    #[must_use]
    pub fn match_data(&self, page_index: usize, item_id: usize) -> Option<MatchData<'_>> {
        self.search.match_data(page_index, item_id)
    }

    #[must_use]
    pub fn search(&self) -> &SearchEngine {
        &self.search
    }

    fn follow_focus(&mut self, outcome: NavOutcome) -> NavOutcome {
        if let Some(page) = outcome.focused_page() {
            self.note_page_change(page);
        }
        outcome
    }

    fn note_page_change(&mut self, page: usize) {
        if page != self.current_page {
            self.current_page = page;
            self.events.emit(ViewerEvent::PageChanged(page));
        }
    }
}

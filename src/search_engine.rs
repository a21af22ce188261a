use log::{debug, info, warn};

use crate::match_index::{MatchIndex, MatchPosition};
use crate::pdf::{DocumentService, EventBus, RenderWindow, ViewerEvent};
use crate::search::{Direction, MatchData, NavOutcome, SelectionCursor};

/// Collaborators a search step needs: the render window to check and move,
/// the document to fetch pages from, and the bus to notify the host on
pub struct SearchContext<'a> {
    pub window: &'a mut RenderWindow,
    pub document: &'a DocumentService,
    pub events: &'a mut EventBus,
}

/// Incremental text search over the extracted text of a document.
///
/// Holds the per-page token lists, the match index for the current search
/// string and the committed selection. Navigation walks the index in document
/// order and keeps the render window showing the selected match.
#[derive(Debug, Default)]
pub struct SearchEngine {
    page_contents: Vec<Vec<String>>,
    search_text: String,
    index: MatchIndex,
    selected: SelectionCursor,
    generation: u64,
}

impl SearchEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a newly opened document
    pub fn initialize(&mut self) {
        self.cleanup();
    }

    /// Drop extracted text, matches and selection
    pub fn cleanup(&mut self) {
        self.page_contents.clear();
        self.search_text.clear();
        self.index = MatchIndex::default();
        self.selected = SelectionCursor::null();
        self.generation += 1;
    }

    /// Store the tokens of one page (zero-based)
    pub fn set_page_content(&mut self, page_index: usize, tokens: Vec<String>) {
        if page_index >= self.page_contents.len() {
            self.page_contents.resize_with(page_index + 1, Vec::new);
        }
        self.page_contents[page_index] = tokens;
    }

    #[must_use]
    pub fn page_contents(&self) -> &[Vec<String>] {
        &self.page_contents
    }

    /// Run a search.
    ///
    /// An empty query clears the search. A query that differs from the active
    /// one (ignoring case) rebuilds the index and selects the first match.
    /// Repeating the active query moves to the next match.
    pub fn find(&mut self, query: &str, ctx: &mut SearchContext<'_>) -> NavOutcome {
        if query.is_empty() {
            self.clear_matches(ctx);
            return NavOutcome::Cleared;
        }

        let normalized = query.to_lowercase();
        if normalized != self.search_text {
            self.search_text = normalized;
            self.find_matches(ctx)
        } else {
            self.step(Direction::Forward, ctx)
        }
    }

    /// Select the next match in document order
    pub fn find_next(&mut self, ctx: &mut SearchContext<'_>) -> NavOutcome {
        self.step(Direction::Forward, ctx)
    }

    /// Select the previous match in document order
    pub fn find_prev(&mut self, ctx: &mut SearchContext<'_>) -> NavOutcome {
        self.step(Direction::Backward, ctx)
    }

    /// Read the selected ordinal, optionally moving it by `diff`.
    ///
    /// A move that would leave `0..=found_count` is ignored.
    pub fn current_number(&mut self, diff: isize) -> usize {
        if diff != 0 {
            let next = self.selected.number as isize + diff;
            if next >= 0 && next as usize <= self.found_count() {
                self.selected.number = next as usize;
            }
        }
        self.selected.number
    }

    /// Highlight data for one token, `None` unless it holds a match of the
    /// active search
    #[must_use]
    pub fn match_data(&self, page_index: usize, item_id: usize) -> Option<MatchData<'_>> {
        if self.search_text.is_empty() {
            return None;
        }
        let matches = self.index.offsets(page_index, item_id)?;
        if matches.is_empty() {
            return None;
        }

        let selected_idx = self
            .selected
            .position
            .filter(|pos| pos.page == page_index && pos.item_id == item_id)
            .map(|pos| pos.idx);

        Some(MatchData {
            search_text: &self.search_text,
            matches,
            selected: self.selected,
            selected_idx,
        })
    }

    #[must_use]
    pub fn found_count(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    #[must_use]
    pub fn selected(&self) -> SelectionCursor {
        self.selected
    }

    #[must_use]
    pub fn match_index(&self) -> &MatchIndex {
        &self.index
    }

    /// Bumped on every new search, clear and cleanup
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a text-layer request stamped with `generation` is still valid
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    fn clear_matches(&mut self, ctx: &mut SearchContext<'_>) {
        debug!("Clearing search");
        self.search_text.clear();
        self.index = MatchIndex::default();
        self.selected = SelectionCursor::null();
        self.generation += 1;
        self.rerender_text_layer(ctx);
    }

    fn find_matches(&mut self, ctx: &mut SearchContext<'_>) -> NavOutcome {
        self.index = MatchIndex::build(&self.page_contents, &self.search_text);
        self.selected = SelectionCursor::null();
        self.generation += 1;

        info!(
            "Search for '{}' found {} matches in {} extracted pages",
            self.search_text,
            self.index.len(),
            self.page_contents.len()
        );

        self.rerender_text_layer(ctx);
        self.step(Direction::Forward, ctx)
    }

    fn step(&mut self, direction: Direction, ctx: &mut SearchContext<'_>) -> NavOutcome {
        if self.search_text.is_empty() {
            return NavOutcome::Unchanged;
        }
        if self.found_count() == 1 && self.selected.number == 1 {
            return NavOutcome::Unchanged;
        }

        let Some(position) = self
            .selected
            .step(&self.index, direction)
            .and_then(|rank| self.index.get(rank))
        else {
            debug!("No match {direction:?} of {:?}", self.selected.position);
            return NavOutcome::Unchanged;
        };

        self.commit(position, direction, ctx)
    }

    fn commit(
        &mut self,
        position: MatchPosition,
        direction: Direction,
        ctx: &mut SearchContext<'_>,
    ) -> NavOutcome {
        self.selected.position = Some(position);
        ctx.events.emit(ViewerEvent::ClearSelection);

        let page_number = position.page + 1;
        let focused = !ctx.window.is_rendered(page_number);
        if focused {
            ctx.window.set_page(page_number, ctx.events);
            ctx.events.emit(ViewerEvent::SetPage(page_number));
        }
        self.render_text_layer(page_number, ctx);
        let number = self.current_number(direction.ordinal_diff());

        NavOutcome::Selected {
            position,
            number,
            focused,
        }
    }

    fn render_text_layer(&self, page_number: usize, ctx: &mut SearchContext<'_>) {
        match ctx.document.page(page_number) {
            Ok(_) => ctx.events.emit(ViewerEvent::RenderTextLayer {
                page: page_number,
                generation: self.generation,
            }),
            Err(e) => warn!("Failed to render text layer of page {page_number}: {e}"),
        }
    }

    fn rerender_text_layer(&self, ctx: &mut SearchContext<'_>) {
        ctx.events.emit(ViewerEvent::ClearTextLayer);
        let pages = ctx.window.rendered_pages().to_vec();
        for page_number in pages {
            self.render_text_layer(page_number, ctx);
        }
    }
}

//! Render window - the bounded set of pages currently materialized

use log::{debug, warn};

use super::events::{EventBus, ViewerEvent};

/// Pages rendered on each side of the focused page
pub const WINDOW_RADIUS: usize = 4;

/// Largest number of pages a single focus change can request
pub const WINDOW_SPAN: usize = 2 * WINDOW_RADIUS + 1;

/// Default capacity of the render window
pub const DEFAULT_MAX_DISPLAYED_PAGES: usize = 9;

/// Result of a focus change
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WindowUpdate {
    /// Pages (1-based) requested around the focus page
    pub to_render: Vec<usize>,
    /// Pages evicted to stay within capacity
    pub to_delete: Vec<usize>,
}

/// Tracks which pages should be materialized around the focused page.
///
/// `rendered` keeps insertion order so eviction always drops the least
/// recently added pages that fall outside the current window.
#[derive(Clone, Debug)]
pub struct RenderWindow {
    rendered: Vec<usize>,
    created: Vec<usize>,
    pages_count: usize,
    max_displayed_pages: usize,
}

impl Default for RenderWindow {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DISPLAYED_PAGES)
    }
}

impl RenderWindow {
    #[must_use]
    pub fn new(max_displayed_pages: usize) -> Self {
        let max_displayed_pages = if max_displayed_pages < WINDOW_SPAN {
            warn!(
                "max_displayed_pages {max_displayed_pages} is smaller than the render window, using {WINDOW_SPAN}"
            );
            WINDOW_SPAN
        } else {
            max_displayed_pages
        };

        Self {
            rendered: Vec::new(),
            created: Vec::new(),
            pages_count: 0,
            max_displayed_pages,
        }
    }

    /// Reset for a newly opened document
    pub fn initialize(&mut self, pages_count: usize) {
        self.cleanup();
        self.pages_count = pages_count;
    }

    pub fn cleanup(&mut self) {
        self.rendered.clear();
        self.created.clear();
        self.pages_count = 0;
    }

    /// Focus `target` (1-based), requesting its neighbourhood and evicting
    /// stale pages beyond capacity
    pub fn set_page(&mut self, target: usize, events: &mut EventBus) -> WindowUpdate {
        let to_render = self.window_around(target);

        for &page in &to_render {
            if !self.created.contains(&page) {
                self.created.push(page);
            }
            if !self.rendered.contains(&page) {
                self.rendered.push(page);
            }
        }

        if !to_render.is_empty() {
            events.emit(ViewerEvent::PageNeedRender(to_render.clone()));
        }

        let mut to_delete = Vec::new();
        let mut i = 0;
        while self.rendered.len() > self.max_displayed_pages && i < self.rendered.len() {
            if to_render.contains(&self.rendered[i]) {
                i += 1;
            } else {
                to_delete.push(self.rendered.remove(i));
            }
        }

        if !to_delete.is_empty() {
            debug!("Evicting pages {to_delete:?} while focusing page {target}");
            events.emit(ViewerEvent::PageNeedDelete {
                pages: to_delete.clone(),
                purge: false,
            });
        }

        WindowUpdate {
            to_render,
            to_delete,
        }
    }

    /// Take every page created since the last drain
    pub fn pages_to_clean(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.created)
    }

    #[must_use]
    pub fn rendered_pages(&self) -> &[usize] {
        &self.rendered
    }

    #[must_use]
    pub fn is_rendered(&self, page: usize) -> bool {
        self.rendered.contains(&page)
    }

    #[must_use]
    pub fn pages_count(&self) -> usize {
        self.pages_count
    }

    #[must_use]
    pub fn max_displayed_pages(&self) -> usize {
        self.max_displayed_pages
    }

    fn window_around(&self, target: usize) -> Vec<usize> {
        let first = target.saturating_sub(WINDOW_RADIUS).max(1);
        let last = target.saturating_add(WINDOW_RADIUS).min(self.pages_count);
        (first..=last).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(pages: usize) -> (RenderWindow, EventBus) {
        let mut window = RenderWindow::default();
        window.initialize(pages);
        (window, EventBus::new())
    }

    #[test]
    fn requests_radius_around_target() {
        let (mut window, mut events) = window(100);
        let update = window.set_page(50, &mut events);
        assert_eq!(update.to_render, (46..=54).collect::<Vec<_>>());
        assert!(update.to_delete.is_empty());
    }

    #[test]
    fn window_is_clipped_at_document_bounds() {
        let (mut window, mut events) = window(6);
        assert_eq!(window.set_page(1, &mut events).to_render, vec![1, 2, 3, 4, 5]);
        assert_eq!(window.set_page(6, &mut events).to_render, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn radius_property_holds_for_any_target() {
        for pages_count in [0, 1, 3, 9, 20] {
            for target in 0..=pages_count + 6 {
                let (mut window, mut events) = window(pages_count);
                let update = window.set_page(target, &mut events);
                let expected: Vec<usize> = (1..=pages_count)
                    .filter(|&p| p + WINDOW_RADIUS >= target && p <= target + WINDOW_RADIUS)
                    .collect();
                assert_eq!(update.to_render, expected, "target {target} of {pages_count}");
            }
        }
    }

    #[test]
    fn evicts_oldest_pages_outside_window() {
        let (mut window, mut events) = window(100);
        window.set_page(10, &mut events);
        let update = window.set_page(12, &mut events);

        assert_eq!(update.to_render, (8..=16).collect::<Vec<_>>());
        assert_eq!(update.to_delete, vec![6, 7]);
        assert_eq!(window.rendered_pages(), &[8, 9, 10, 11, 12, 13, 14, 15, 16]);
    }

    #[test]
    fn capacity_never_exceeded_and_window_never_evicted() {
        let (mut window, mut events) = window(40);
        for target in [1, 20, 3, 40, 39, 15, 16, 2, 33] {
            let update = window.set_page(target, &mut events);
            assert!(window.rendered_pages().len() <= window.max_displayed_pages());
            for page in &update.to_render {
                assert!(!update.to_delete.contains(page));
                assert!(window.is_rendered(*page));
            }
        }
    }

    #[test]
    fn larger_capacity_keeps_previous_pages() {
        let mut window = RenderWindow::new(12);
        let mut events = EventBus::new();
        window.initialize(100);

        window.set_page(10, &mut events);
        let update = window.set_page(11, &mut events);

        assert!(update.to_delete.is_empty());
        assert_eq!(window.rendered_pages().len(), 10);
    }

    #[test]
    fn capacity_below_span_is_raised() {
        let window = RenderWindow::new(3);
        assert_eq!(window.max_displayed_pages(), WINDOW_SPAN);
    }

    #[test]
    fn emits_render_and_delete_notifications() {
        let (mut window, mut events) = window(100);
        let rx = events.subscribe();

        window.set_page(10, &mut events);
        window.set_page(30, &mut events);

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            received,
            vec![
                ViewerEvent::PageNeedRender((6..=14).collect()),
                ViewerEvent::PageNeedRender((26..=34).collect()),
                ViewerEvent::PageNeedDelete {
                    pages: (6..=14).collect(),
                    purge: false,
                },
            ]
        );
    }

    #[test]
    fn empty_window_sends_nothing() {
        let (mut window, mut events) = window(5);
        let rx = events.subscribe();

        let update = window.set_page(20, &mut events);

        assert_eq!(update, WindowUpdate::default());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn pages_to_clean_drains_created_pages() {
        let (mut window, mut events) = window(100);
        window.set_page(5, &mut events);
        window.set_page(20, &mut events);

        let created = window.pages_to_clean();
        let mut expected: Vec<usize> = (1..=9).collect();
        expected.extend(16..=24);
        assert_eq!(created, expected);
        assert!(window.pages_to_clean().is_empty());
        // Displayed pages are untouched by the drain
        assert_eq!(window.rendered_pages(), (16..=24).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn cleanup_resets_everything() {
        let (mut window, mut events) = window(100);
        window.set_page(5, &mut events);
        window.cleanup();

        assert!(window.rendered_pages().is_empty());
        assert!(window.pages_to_clean().is_empty());
        assert_eq!(window.pages_count(), 0);
    }
}

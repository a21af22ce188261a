pub mod test_helpers {
    use flume::Receiver;

    use crate::pdf::{MemoryDocument, Viewer, ViewerEvent};
    use crate::settings::ViewerSettings;

    /// Build a document of `pages` pages where every page holds `filler`,
    /// then overwrite selected pages (zero-based) with their own tokens
    pub fn document_with(
        pages: usize,
        filler: &str,
        overrides: &[(usize, &[&str])],
    ) -> MemoryDocument {
        let mut contents: Vec<Vec<String>> = vec![vec![filler.to_string()]; pages];
        for (index, tokens) in overrides {
            contents[*index] = tokens.iter().map(|t| t.to_string()).collect();
        }
        MemoryDocument::from_pages(contents)
    }

    /// Viewer with default settings, `document` opened and fully extracted
    pub fn open_viewer(document: MemoryDocument) -> (Viewer, Receiver<ViewerEvent>) {
        let mut viewer = Viewer::new(&ViewerSettings::default());
        let events = viewer.subscribe();
        viewer
            .open(Some(Box::new(document)))
            .expect("memory document opens");
        viewer.extract_all().expect("memory document extracts");
        drain(&events);
        (viewer, events)
    }

    /// Take every pending event
    pub fn drain(events: &Receiver<ViewerEvent>) -> Vec<ViewerEvent> {
        events.try_iter().collect()
    }

    /// Page lists of every `PageNeedRender` in `events`
    pub fn render_requests(events: &[ViewerEvent]) -> Vec<Vec<usize>> {
        events
            .iter()
            .filter_map(|event| match event {
                ViewerEvent::PageNeedRender(pages) => Some(pages.clone()),
                _ => None,
            })
            .collect()
    }

    /// Pages of every `RenderTextLayer` in `events`
    pub fn text_layer_pages(events: &[ViewerEvent]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|event| match event {
                ViewerEvent::RenderTextLayer { page, .. } => Some(*page),
                _ => None,
            })
            .collect()
    }
}

use pdfsight::pdf::{ExtractionState, MemoryDocument, Viewer, ViewerEvent};
use pdfsight::search::NavOutcome;
use pdfsight::settings::ViewerSettings;
use pdfsight::test_utils::test_helpers::{
    document_with, drain, open_viewer, render_requests, text_layer_pages,
};

fn selected_number(outcome: NavOutcome) -> Option<usize> {
    match outcome {
        NavOutcome::Selected { number, .. } => Some(number),
        _ => None,
    }
}

fn alpha_document() -> MemoryDocument {
    document_with(
        30,
        "filler",
        &[
            (0, &["Alpha beta", "alpha"]),
            (12, &["nothing", "ALPHA alpha"]),
            (29, &["alphabet"]),
        ],
    )
}

#[test]
fn walks_every_match_forward_then_back() {
    let (mut viewer, _events) = open_viewer(alpha_document());
    viewer.set_page(1);

    let mut numbers = vec![selected_number(viewer.find("Alpha"))];
    let mut focused = vec![None];
    assert_eq!(viewer.found_count(), 5);

    for _ in 0..4 {
        let outcome = viewer.find_next();
        numbers.push(selected_number(outcome));
        focused.push(outcome.focused_page());
    }
    assert_eq!(numbers, vec![Some(1), Some(2), Some(3), Some(4), Some(5)]);
    assert_eq!(focused, vec![None, None, Some(13), None, Some(30)]);
    assert_eq!(viewer.find_next(), NavOutcome::Unchanged);
    assert_eq!(viewer.page_number(), 30);

    let mut numbers = Vec::new();
    let mut focused = Vec::new();
    for _ in 0..4 {
        let outcome = viewer.find_prev();
        numbers.push(selected_number(outcome));
        focused.push(outcome.focused_page());
    }
    assert_eq!(numbers, vec![Some(4), Some(3), Some(2), Some(1)]);
    assert_eq!(focused, vec![Some(13), None, Some(1), None]);
    assert_eq!(viewer.find_prev(), NavOutcome::Unchanged);
    assert_eq!(viewer.current_selected(0), 1);
    assert_eq!(viewer.page_number(), 1);
}

#[test]
fn repeating_the_query_advances() {
    let (mut viewer, _events) = open_viewer(alpha_document());
    viewer.set_page(1);

    viewer.find("alpha");
    assert_eq!(selected_number(viewer.find("ALPHA")), Some(2));
    assert_eq!(selected_number(viewer.find("alpha")), Some(3));

    // A different query starts over
    assert_eq!(selected_number(viewer.find("alphab")), Some(1));
    assert_eq!(viewer.found_count(), 1);
}

#[test]
fn focusing_a_far_match_moves_the_window() {
    let (mut viewer, events) = open_viewer(alpha_document());
    viewer.set_page(1);
    viewer.find("alpha");
    viewer.find_next();
    drain(&events);

    viewer.find_next();
    let emitted = drain(&events);

    assert_eq!(render_requests(&emitted), vec![(9..=17).collect::<Vec<_>>()]);
    assert!(emitted.contains(&ViewerEvent::SetPage(13)));
    assert!(emitted.contains(&ViewerEvent::PageChanged(13)));
    assert_eq!(text_layer_pages(&emitted), vec![13]);
    assert!(viewer.rendered_pages().contains(&13));
}

#[test]
fn singleton_match_is_not_reselected() {
    let (mut viewer, events) = open_viewer(document_with(3, "x", &[(1, &["needle"])]));
    viewer.set_page(1);

    assert_eq!(selected_number(viewer.find("needle")), Some(1));
    drain(&events);

    assert_eq!(viewer.find("needle"), NavOutcome::Unchanged);
    assert_eq!(viewer.find_next(), NavOutcome::Unchanged);
    assert_eq!(viewer.find_prev(), NavOutcome::Unchanged);
    assert!(drain(&events).is_empty());
}

#[test]
fn clearing_the_query_strips_highlights() {
    let (mut viewer, events) = open_viewer(alpha_document());
    viewer.set_page(1);
    viewer.find("alpha");
    drain(&events);

    assert_eq!(viewer.find(""), NavOutcome::Cleared);
    let emitted = drain(&events);

    assert_eq!(emitted.first(), Some(&ViewerEvent::ClearTextLayer));
    assert_eq!(text_layer_pages(&emitted), vec![1, 2, 3, 4, 5]);
    assert_eq!(viewer.found_count(), 0);
    assert_eq!(viewer.match_data(0, 0), None);
    assert_eq!(viewer.find_next(), NavOutcome::Unchanged);
}

#[test]
fn match_data_describes_highlights() {
    let (mut viewer, _events) = open_viewer(alpha_document());
    viewer.set_page(1);
    viewer.find("alpha");
    viewer.find_next();
    viewer.find_next();

    let data = viewer.match_data(12, 1).unwrap();
    assert_eq!(data.search_text, "alpha");
    assert_eq!(data.matches, &[0, 6]);
    assert_eq!(
        data.highlight_ranges().collect::<Vec<_>>(),
        vec![(0, 5, true), (6, 11, false)]
    );

    assert_eq!(viewer.match_data(12, 0), None);
    assert_eq!(viewer.match_data(0, 0).unwrap().selected_idx, None);
}

#[test]
fn extraction_failure_keeps_earlier_pages_searchable() {
    let document = MemoryDocument::from_pages(vec![vec!["word"]; 5]).failing_from(3);
    let mut viewer = Viewer::new(&ViewerSettings::default());
    viewer.open(Some(Box::new(document))).unwrap();

    assert!(viewer.extract_all().is_err());
    assert_eq!(viewer.extraction_state(), ExtractionState::Failed { page: 2 });

    viewer.set_page(1);
    viewer.find("word");
    assert_eq!(viewer.found_count(), 2);
}

#[test]
fn json_dump_can_be_searched() {
    let document = MemoryDocument::from_json(
        r#"{
            "pages": [
                {"items": [{"str": "The quick brown fox"}]},
                {"items": [{"str": "jumps over"}, {"str": "the lazy dog"}]}
            ]
        }"#,
    )
    .unwrap();
    let (mut viewer, _events) = open_viewer(document);
    viewer.set_page(1);

    viewer.find("the");
    assert_eq!(viewer.found_count(), 2);
    let NavOutcome::Selected { position, .. } = viewer.find_next() else {
        panic!("expected a second match");
    };
    assert_eq!((position.page, position.item_id, position.idx), (1, 1, 0));
}

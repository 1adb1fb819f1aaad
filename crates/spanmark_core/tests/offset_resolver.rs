use spanmark_core::{resolve_boundary, resolve_selection, SelectionBoundary, TextRun};

const CONTENT: &str = "Dear John, congrats.";

// The walk a host would report after composing one highlight over "John":
// three text nodes, with the marker wrapper contributing no characters.
fn walk() -> Vec<TextRun<&'static str>> {
    vec![
        TextRun::new("t0", 5),  // "Dear "
        TextRun::new("t1", 4),  // "John"
        TextRun::new("t2", 11), // ", congrats."
    ]
}

#[test]
fn boundary_resolves_via_running_count() {
    let runs = walk();
    assert_eq!(
        resolve_boundary(&runs, &SelectionBoundary::new("t0", 0)),
        Some(0)
    );
    assert_eq!(
        resolve_boundary(&runs, &SelectionBoundary::new("t1", 0)),
        Some(5)
    );
    assert_eq!(
        resolve_boundary(&runs, &SelectionBoundary::new("t2", 3)),
        Some(12)
    );
}

#[test]
fn boundary_outside_the_walk_is_not_found() {
    let runs = walk();
    assert_eq!(
        resolve_boundary(&runs, &SelectionBoundary::new("elsewhere", 2)),
        None
    );
}

#[test]
fn selection_across_wrappers_resolves_to_canonical_offsets() {
    let runs = walk();
    let selection = resolve_selection(
        &runs,
        CONTENT,
        &SelectionBoundary::new("t0", 2),
        &SelectionBoundary::new("t2", 2),
    )
    .expect("selection should resolve");

    assert_eq!(selection.start_offset, 2);
    assert_eq!(selection.end_offset, 11);
    assert_eq!(selection.text, "ar John, ");
}

#[test]
fn selection_of_exactly_one_node_snapshots_its_text() {
    let runs = walk();
    let selection = resolve_selection(
        &runs,
        CONTENT,
        &SelectionBoundary::new("t1", 0),
        &SelectionBoundary::new("t1", 4),
    )
    .expect("selection should resolve");

    assert_eq!(selection.start_offset, 5);
    assert_eq!(selection.end_offset, 9);
    assert_eq!(selection.text, "John");
}

#[test]
fn end_boundary_at_next_node_start_is_equivalent() {
    let runs = walk();
    let selection = resolve_selection(
        &runs,
        CONTENT,
        &SelectionBoundary::new("t1", 0),
        &SelectionBoundary::new("t2", 0),
    )
    .expect("selection should resolve");

    assert_eq!((selection.start_offset, selection.end_offset), (5, 9));
}

#[test]
fn collapsed_selection_is_discarded() {
    let runs = walk();
    assert_eq!(
        resolve_selection(
            &runs,
            CONTENT,
            &SelectionBoundary::new("t1", 2),
            &SelectionBoundary::new("t1", 2),
        ),
        None
    );
}

#[test]
fn inverted_selection_is_discarded() {
    let runs = walk();
    assert_eq!(
        resolve_selection(
            &runs,
            CONTENT,
            &SelectionBoundary::new("t2", 1),
            &SelectionBoundary::new("t0", 1),
        ),
        None
    );
}

#[test]
fn unresolvable_boundary_aborts_the_selection() {
    let runs = walk();
    assert_eq!(
        resolve_selection(
            &runs,
            CONTENT,
            &SelectionBoundary::new("elsewhere", 0),
            &SelectionBoundary::new("t1", 3),
        ),
        None
    );
}

#[test]
fn selection_overrunning_the_content_is_discarded() {
    // Host walk longer than the document it claims to render.
    let runs = vec![TextRun::new("t0", 40)];
    assert_eq!(
        resolve_selection(
            &runs,
            CONTENT,
            &SelectionBoundary::new("t0", 0),
            &SelectionBoundary::new("t0", 30),
        ),
        None
    );
}

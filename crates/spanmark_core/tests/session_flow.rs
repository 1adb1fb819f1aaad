use spanmark_core::{
    resolve_selection, AnnotationSession, AnnotationStore, Document, FieldDefinition, FieldKey,
    FieldKind, KnowledgeUnitSchema, MemoryAnnotationStore, SchemaCatalog, SelectionBoundary,
    ServiceError, TextSelection,
};

const CONTENT: &str = "Dear John, congrats.";

fn catalog() -> SchemaCatalog {
    let schema = KnowledgeUnitSchema {
        id: "employment".to_string(),
        label: "employment".to_string(),
        fields: vec![
            FieldDefinition {
                id: "person".to_string(),
                name: "person".to_string(),
                kind: FieldKind::Options(vec!["PERSON_1".to_string()]),
                required: true,
                multiple: false,
            },
            FieldDefinition {
                id: "company".to_string(),
                name: "company".to_string(),
                kind: FieldKind::Named("string".to_string()),
                required: false,
                multiple: false,
            },
        ],
    };
    SchemaCatalog::new(vec![schema], Vec::new())
}

fn session() -> AnnotationSession<MemoryAnnotationStore> {
    let store = MemoryAnnotationStore::new(
        catalog(),
        vec![
            Document::new("doc-1", "Offer letter", CONTENT),
            Document::new("doc-2", "Follow-up", "Thanks again!"),
        ],
    );
    AnnotationSession::new(store)
}

fn selection(start: usize, end: usize) -> TextSelection {
    TextSelection {
        start_offset: start,
        end_offset: end,
        text: CONTENT.chars().skip(start).take(end - start).collect(),
    }
}

#[test]
fn annotate_person_then_switch_field_then_clear() {
    let mut session = session();
    session.select_document("doc-1").unwrap();
    let ku_id = session.add_knowledge_unit("employment").unwrap();

    session
        .toggle_highlighting(Some(FieldKey::new(ku_id, "person")))
        .unwrap();

    let highlight = session
        .commit_selection(&selection(5, 9))
        .unwrap()
        .expect("armed commit should create a highlight");
    assert_eq!(highlight.start_offset, 5);
    assert_eq!(highlight.end_offset, 9);
    assert_eq!(highlight.text, "John");
    assert!(session.active_highlight_ids().contains(&highlight.id));

    let listed = session.store().document_highlights("doc-1").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].field_id, "person");
    assert_eq!(listed[0].ku_id, ku_id);

    // Toggle off, then arm a field with no highlights yet: the active set is
    // exactly that field's highlights, never a union.
    session
        .toggle_highlighting(Some(FieldKey::new(ku_id, "person")))
        .unwrap();
    session
        .toggle_highlighting(Some(FieldKey::new(ku_id, "company")))
        .unwrap();
    assert_eq!(session.armed_field(), Some(&FieldKey::new(ku_id, "company")));
    assert!(session.active_highlight_ids().is_empty());

    session.clear_highlights(ku_id, "person").unwrap();
    assert!(session
        .store()
        .document_highlights("doc-1")
        .unwrap()
        .is_empty());
}

#[test]
fn commit_is_a_noop_when_idle_or_selection_is_invalid() {
    let mut session = session();
    session.select_document("doc-1").unwrap();
    let ku_id = session.add_knowledge_unit("employment").unwrap();

    // Idle: ordinary browsing selection, nothing happens.
    assert_eq!(session.commit_selection(&selection(5, 9)).unwrap(), None);

    session
        .toggle_highlighting(Some(FieldKey::new(ku_id, "person")))
        .unwrap();

    // Collapsed and overrunning selections degrade to no-ops, not errors.
    let collapsed = TextSelection {
        start_offset: 5,
        end_offset: 5,
        text: String::new(),
    };
    assert_eq!(session.commit_selection(&collapsed).unwrap(), None);

    let overrun = TextSelection {
        start_offset: 5,
        end_offset: 999,
        text: String::new(),
    };
    assert_eq!(session.commit_selection(&overrun).unwrap(), None);

    assert!(session
        .store()
        .document_highlights("doc-1")
        .unwrap()
        .is_empty());
}

#[test]
fn operations_without_a_selected_document_are_rejected() {
    let mut session = session();
    let result = session.add_knowledge_unit("employment");
    assert!(matches!(result, Err(ServiceError::NoDocumentSelected)));
}

#[test]
fn selecting_a_document_resets_highlighting_mode() {
    let mut session = session();
    session.select_document("doc-1").unwrap();
    let ku_id = session.add_knowledge_unit("employment").unwrap();
    session
        .toggle_highlighting(Some(FieldKey::new(ku_id, "person")))
        .unwrap();
    session.commit_selection(&selection(5, 9)).unwrap();
    assert!(session.armed_field().is_some());

    session.select_document("doc-2").unwrap();
    assert!(session.armed_field().is_none());
    assert!(session.active_highlight_ids().is_empty());
}

#[test]
fn removing_a_unit_cascades_into_the_composed_view() {
    let mut session = session();
    session.select_document("doc-1").unwrap();
    let ku_id = session.add_knowledge_unit("employment").unwrap();
    session
        .toggle_highlighting(Some(FieldKey::new(ku_id, "person")))
        .unwrap();
    session.commit_selection(&selection(5, 9)).unwrap();
    assert_eq!(session.compose_document().marks().len(), 1);

    session.remove_knowledge_unit(ku_id).unwrap();
    assert!(session
        .store()
        .document_highlights("doc-1")
        .unwrap()
        .is_empty());
    assert!(session.compose_document().marks().is_empty());
}

#[test]
fn rendered_highlight_round_trips_through_the_resolver() {
    let mut session = session();
    session.select_document("doc-1").unwrap();
    let ku_id = session.add_knowledge_unit("employment").unwrap();
    session
        .toggle_highlighting(Some(FieldKey::new(ku_id, "person")))
        .unwrap();
    let highlight = session
        .commit_selection(&selection(5, 9))
        .unwrap()
        .expect("highlight created");

    // Re-render and walk the plan's text nodes the way a host would.
    let plan = session.compose_document();
    let runs = plan.text_runs();
    assert_eq!(runs.len(), 3); // "Dear " / "John" / ", congrats."

    // Select exactly the rendered highlighted region (the middle run).
    let resolved = resolve_selection(
        &runs,
        CONTENT,
        &SelectionBoundary::new(runs[1].key, 0),
        &SelectionBoundary::new(runs[1].key, runs[1].len),
    )
    .expect("rendered region should resolve");

    assert_eq!(resolved.start_offset, highlight.start_offset);
    assert_eq!(resolved.end_offset, highlight.end_offset);
    assert_eq!(resolved.text, highlight.text);
}

#[test]
fn clicking_a_highlight_jumps_into_its_field() {
    let mut session = session();
    session.select_document("doc-1").unwrap();
    let ku_id = session.add_knowledge_unit("employment").unwrap();
    session
        .toggle_highlighting(Some(FieldKey::new(ku_id, "person")))
        .unwrap();
    let highlight = session
        .commit_selection(&selection(5, 9))
        .unwrap()
        .expect("highlight created");

    // Disarm, then click the rendered highlight.
    session.toggle_highlighting(None).unwrap();
    let armed = session.click_highlight(highlight.id).unwrap();
    assert_eq!(armed, Some(FieldKey::new(ku_id, "person")));
    assert_eq!(session.active_highlight_ids(), &[highlight.id]);
}

#[test]
fn document_summaries_track_annotations() {
    let mut session = session();
    session.select_document("doc-1").unwrap();
    session.add_knowledge_unit("employment").unwrap();

    let summaries = session.document_summaries();
    assert_eq!(summaries.len(), 2);
    assert!(summaries[0].has_annotations);
    assert!(!summaries[1].has_annotations);
}

#[test]
fn views_skip_units_with_unknown_schemas() {
    // A document loaded with a unit whose schema is no longer in the catalog
    // must not break rendering for the rest.
    let document: Document = serde_json::from_str(
        r#"{
            "id": "doc-1",
            "title": "Offer letter",
            "content": "Dear John, congrats.",
            "knowledgeUnits": [
                { "id": "00000000-0000-4000-8000-000000000001", "schemaId": "ghost", "fields": [] },
                { "id": "00000000-0000-4000-8000-000000000002", "schemaId": "employment", "fields": [] }
            ]
        }"#,
    )
    .unwrap();

    let store = MemoryAnnotationStore::new(catalog(), vec![document]);
    let mut session = AnnotationSession::new(store);
    session.select_document("doc-1").unwrap();

    let views = session.knowledge_unit_views();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].schema_id, "employment");
    assert_eq!(views[0].schema_label, "employment");
    assert_eq!(views[0].fields.len(), 2);
    assert_eq!(views[0].fields[0].field_id, "person");
    assert!(views[0].fields[0].required);
}

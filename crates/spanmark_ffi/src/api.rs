//! FFI use-case API for the host rendering layer.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions over one process-wide
//!   annotation session.
//! - Keep error semantics simple for UI integration: envelopes and strings,
//!   never exceptions.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The host passes selection data in; core never reads ambient selection
//!   state.

use spanmark_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    resolve_selection, AnnotationSession, Document, FieldData, FieldKey, MemoryAnnotationStore,
    SchemaCatalog, SelectionBoundary, TextRun, TextSelection,
};
use std::sync::{Mutex, OnceLock};
use uuid::Uuid;

type Session = AnnotationSession<MemoryAnnotationStore>;

static SESSION: OnceLock<Mutex<Option<Session>>> = OnceLock::new();

fn session_slot() -> &'static Mutex<Option<Session>> {
    SESSION.get_or_init(|| Mutex::new(None))
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> Result<T, String>) -> Result<T, String> {
    let mut guard = session_slot()
        .lock()
        .map_err(|_| "session lock poisoned".to_string())?;
    match guard.as_mut() {
        Some(session) => f(session),
        None => Err("no workspace loaded".to_string()),
    }
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Idempotent for the same `level + log_dir`; reconfiguration attempts
///   return an error message.
/// - Never panics; returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope for session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Created or affected entity id, when one exists.
    pub entity_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, entity_id: Option<String>) -> Self {
        Self {
            ok: true,
            entity_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entity_id: None,
            message: message.into(),
        }
    }
}

/// Document-list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentListItem {
    pub id: String,
    pub title: String,
    pub has_annotations: bool,
}

/// One rendered text node reported by the host's text walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRun {
    /// Host-chosen stable key for the text node.
    pub key: i64,
    /// Text length in Unicode scalar values.
    pub len: u32,
}

/// Result of resolving a host selection into canonical offsets.
///
/// `found == false` means the selection was collapsed, unresolvable or
/// inverted; the host simply does nothing with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResponse {
    pub found: bool,
    pub start_offset: u32,
    pub end_offset: u32,
    pub text: String,
}

/// Loads schemas, custom types and documents, replacing any prior session.
///
/// # FFI contract
/// - Sync call; parses host-supplied JSON in the original catalog formats.
/// - Never panics; malformed JSON yields a failure envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn load_workspace(
    schemas_json: String,
    custom_types_json: String,
    documents_json: String,
) -> ActionResponse {
    let schemas = match serde_json::from_str(&schemas_json) {
        Ok(schemas) => schemas,
        Err(err) => return ActionResponse::failure(format!("invalid schemas JSON: {err}")),
    };
    let custom_types = match serde_json::from_str(&custom_types_json) {
        Ok(custom_types) => custom_types,
        Err(err) => return ActionResponse::failure(format!("invalid custom types JSON: {err}")),
    };
    let documents: Vec<Document> = match serde_json::from_str(&documents_json) {
        Ok(documents) => documents,
        Err(err) => return ActionResponse::failure(format!("invalid documents JSON: {err}")),
    };

    let store = MemoryAnnotationStore::new(SchemaCatalog::new(schemas, custom_types), documents);
    match session_slot().lock() {
        Ok(mut guard) => {
            *guard = Some(AnnotationSession::new(store));
            ActionResponse::success("Workspace loaded.", None)
        }
        Err(_) => ActionResponse::failure("session lock poisoned"),
    }
}

/// Lists documents for the browsing pane.
///
/// # FFI contract
/// - Sync call; empty list when no workspace is loaded.
#[flutter_rust_bridge::frb(sync)]
pub fn list_documents() -> Vec<DocumentListItem> {
    with_session(|session| {
        Ok(session
            .document_summaries()
            .into_iter()
            .map(|summary| DocumentListItem {
                id: summary.id,
                title: summary.title,
                has_annotations: summary.has_annotations,
            })
            .collect())
    })
    .unwrap_or_default()
}

/// Selects the document the session operates on; resets highlighting mode.
#[flutter_rust_bridge::frb(sync)]
pub fn select_document(doc_id: String) -> ActionResponse {
    match with_session(|session| {
        session
            .select_document(&doc_id)
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => ActionResponse::success("Document selected.", Some(doc_id)),
        Err(err) => ActionResponse::failure(format!("select_document failed: {err}")),
    }
}

/// Adds a knowledge unit of the given schema to the selected document.
#[flutter_rust_bridge::frb(sync)]
pub fn add_knowledge_unit(schema_id: String) -> ActionResponse {
    match with_session(|session| {
        session
            .add_knowledge_unit(&schema_id)
            .map_err(|err| err.to_string())
    }) {
        Ok(ku_id) => ActionResponse::success("Knowledge unit added.", Some(ku_id.to_string())),
        Err(err) => ActionResponse::failure(format!("add_knowledge_unit failed: {err}")),
    }
}

/// Removes a knowledge unit and, with it, all highlights its fields own.
#[flutter_rust_bridge::frb(sync)]
pub fn remove_knowledge_unit(ku_id: String) -> ActionResponse {
    match parse_ku_id(&ku_id).and_then(|ku_id| {
        with_session(|session| {
            session
                .remove_knowledge_unit(ku_id)
                .map_err(|err| err.to_string())
        })
    }) {
        Ok(()) => ActionResponse::success("Knowledge unit removed.", Some(ku_id)),
        Err(err) => ActionResponse::failure(format!("remove_knowledge_unit failed: {err}")),
    }
}

/// Writes a field value. `value_json` uses the original loose value shape
/// (string, integer, or object); an empty string clears the value.
#[flutter_rust_bridge::frb(sync)]
pub fn set_field_value(ku_id: String, field_id: String, value_json: String) -> ActionResponse {
    let value: Option<FieldData> = if value_json.trim().is_empty() {
        None
    } else {
        match serde_json::from_str(&value_json) {
            Ok(value) => Some(value),
            Err(err) => return ActionResponse::failure(format!("invalid value JSON: {err}")),
        }
    };

    match parse_ku_id(&ku_id).and_then(|ku_id| {
        with_session(|session| {
            session
                .set_field_value(ku_id, &field_id, value)
                .map_err(|err| err.to_string())
        })
    }) {
        Ok(()) => ActionResponse::success("Field updated.", None),
        Err(err) => ActionResponse::failure(format!("set_field_value failed: {err}")),
    }
}

/// Removes a field slot together with its value and highlights.
#[flutter_rust_bridge::frb(sync)]
pub fn remove_field(ku_id: String, field_id: String) -> ActionResponse {
    match parse_ku_id(&ku_id).and_then(|ku_id| {
        with_session(|session| {
            session
                .remove_field(ku_id, &field_id)
                .map_err(|err| err.to_string())
        })
    }) {
        Ok(()) => ActionResponse::success("Field removed.", None),
        Err(err) => ActionResponse::failure(format!("remove_field failed: {err}")),
    }
}

/// Clears one field's highlights; the field value survives.
#[flutter_rust_bridge::frb(sync)]
pub fn clear_highlights(ku_id: String, field_id: String) -> ActionResponse {
    match parse_ku_id(&ku_id).and_then(|ku_id| {
        with_session(|session| {
            session
                .clear_highlights(ku_id, &field_id)
                .map_err(|err| err.to_string())
        })
    }) {
        Ok(()) => ActionResponse::success("Highlights cleared.", None),
        Err(err) => ActionResponse::failure(format!("clear_highlights failed: {err}")),
    }
}

/// Toggles highlighting mode for a field slot.
///
/// # FFI contract
/// - Empty `field_id` or `ku_id` disarms (the host uses this when closing
///   the panel or switching documents).
/// - Toggling a different slot while armed switches the target atomically.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_highlighting(field_id: String, ku_id: String) -> ActionResponse {
    if field_id.is_empty() || ku_id.is_empty() {
        return match with_session(|session| {
            session
                .toggle_highlighting(None)
                .map_err(|err| err.to_string())
        }) {
            Ok(()) => ActionResponse::success("Highlighting off.", None),
            Err(err) => ActionResponse::failure(format!("toggle_highlighting failed: {err}")),
        };
    }

    match parse_ku_id(&ku_id).and_then(|ku_id| {
        with_session(|session| {
            session
                .toggle_highlighting(Some(FieldKey::new(ku_id, field_id.clone())))
                .map_err(|err| err.to_string())
        })
    }) {
        Ok(()) => ActionResponse::success("Highlighting toggled.", None),
        Err(err) => ActionResponse::failure(format!("toggle_highlighting failed: {err}")),
    }
}

/// Resolves a host selection into canonical document offsets.
///
/// # FFI contract
/// - `runs` is the in-order text-node walk of the rendered document; wrapper
///   elements contribute nothing.
/// - `found == false` for collapsed, inverted or unresolvable selections.
#[flutter_rust_bridge::frb(sync)]
pub fn resolve_document_selection(
    runs: Vec<SelectionRun>,
    start_key: i64,
    start_offset: u32,
    end_key: i64,
    end_offset: u32,
) -> SelectionResponse {
    let not_found = SelectionResponse {
        found: false,
        start_offset: 0,
        end_offset: 0,
        text: String::new(),
    };

    let content = match with_session(|session| {
        Ok(session
            .selected_document()
            .map(|doc| doc.content().to_string()))
    }) {
        Ok(Some(content)) => content,
        _ => return not_found,
    };

    let walk: Vec<TextRun<i64>> = runs
        .into_iter()
        .map(|run| TextRun::new(run.key, run.len as usize))
        .collect();
    let start = SelectionBoundary::new(start_key, start_offset as usize);
    let end = SelectionBoundary::new(end_key, end_offset as usize);

    match resolve_selection(&walk, &content, &start, &end) {
        Some(selection) => SelectionResponse {
            found: true,
            start_offset: selection.start_offset as u32,
            end_offset: selection.end_offset as u32,
            text: selection.text,
        },
        None => not_found,
    }
}

/// Commits a resolved selection to the armed field slot.
///
/// # FFI contract
/// - No-op success with empty `entity_id` when highlighting mode is idle or
///   the selection does not fit the document.
/// - Returns the created highlight id otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn commit_selection(start_offset: u32, end_offset: u32) -> ActionResponse {
    let result = with_session(|session| {
        let text = session
            .selected_document()
            .map(|doc| {
                doc.content()
                    .chars()
                    .skip(start_offset as usize)
                    .take((end_offset as usize).saturating_sub(start_offset as usize))
                    .collect::<String>()
            })
            .unwrap_or_default();
        let selection = TextSelection {
            start_offset: start_offset as usize,
            end_offset: end_offset as usize,
            text,
        };
        session
            .commit_selection(&selection)
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(Some(highlight)) => {
            ActionResponse::success("Highlight added.", Some(highlight.id.to_string()))
        }
        Ok(None) => ActionResponse::success("Nothing to highlight.", None),
        Err(err) => ActionResponse::failure(format!("commit_selection failed: {err}")),
    }
}

/// Reports a click on a rendered highlight; re-arms onto its field slot.
#[flutter_rust_bridge::frb(sync)]
pub fn click_highlight(highlight_id: String) -> ActionResponse {
    let parsed = match Uuid::parse_str(&highlight_id) {
        Ok(id) => id,
        Err(err) => return ActionResponse::failure(format!("invalid highlight id: {err}")),
    };

    match with_session(|session| session.click_highlight(parsed).map_err(|err| err.to_string())) {
        Ok(Some(key)) => ActionResponse::success(
            format!("Armed on field `{}`.", key.field_id),
            Some(key.ku_id.to_string()),
        ),
        Ok(None) => ActionResponse::success("Highlight not found; ignored.", None),
        Err(err) => ActionResponse::failure(format!("click_highlight failed: {err}")),
    }
}

/// Composes the selected document and projects it to HTML markup.
///
/// # FFI contract
/// - Pure read; identical state yields identical markup.
/// - Empty string when no document is selected.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_markup() -> String {
    with_session(|session| Ok(session.compose_document().to_markup())).unwrap_or_default()
}

/// Ids of highlights currently rendered emphasized.
#[flutter_rust_bridge::frb(sync)]
pub fn active_highlight_ids() -> Vec<String> {
    with_session(|session| {
        Ok(session
            .active_highlight_ids()
            .iter()
            .map(|id| id.to_string())
            .collect())
    })
    .unwrap_or_default()
}

fn parse_ku_id(ku_id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(ku_id).map_err(|err| format!("invalid knowledge unit id: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{
        active_highlight_ids, add_knowledge_unit, clear_highlights, commit_selection,
        compose_markup, core_version, init_logging, list_documents, load_workspace, ping,
        resolve_document_selection, select_document, toggle_highlighting, SelectionRun,
    };

    const SCHEMAS_JSON: &str = r#"[
        {
            "Frame Label": "employment",
            "Frame ID": "employment",
            "Fields": [
                { "id": "person", "name": "person", "type": ["PERSON_1"], "required": true },
                { "id": "company", "name": "company", "type": "string" }
            ]
        }
    ]"#;

    const DOCUMENTS_JSON: &str = r#"[
        { "id": "doc-1", "title": "Offer letter", "content": "Dear John, congrats." }
    ]"#;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn full_annotation_flow_over_ffi() {
        let loaded = load_workspace(
            SCHEMAS_JSON.to_string(),
            "[]".to_string(),
            DOCUMENTS_JSON.to_string(),
        );
        assert!(loaded.ok, "{}", loaded.message);

        let documents = list_documents();
        assert_eq!(documents.len(), 1);
        assert!(!documents[0].has_annotations);

        let selected = select_document("doc-1".to_string());
        assert!(selected.ok, "{}", selected.message);

        let unit = add_knowledge_unit("employment".to_string());
        assert!(unit.ok, "{}", unit.message);
        let ku_id = unit.entity_id.expect("unit id");

        let armed = toggle_highlighting("person".to_string(), ku_id.clone());
        assert!(armed.ok, "{}", armed.message);

        // One text node covering the whole document; select "John" at [5, 9).
        let runs = vec![SelectionRun { key: 7, len: 20 }];
        let resolved = resolve_document_selection(runs, 7, 5, 7, 9);
        assert!(resolved.found);
        assert_eq!(resolved.text, "John");

        let committed = commit_selection(resolved.start_offset, resolved.end_offset);
        assert!(committed.ok, "{}", committed.message);
        let highlight_id = committed.entity_id.expect("highlight id");

        assert_eq!(active_highlight_ids(), vec![highlight_id.clone()]);
        let markup = compose_markup();
        assert!(markup.contains(&format!("data-highlight-id=\"{highlight_id}\"")));
        assert!(markup.contains(">John</span>"));

        let cleared = clear_highlights(ku_id, "person".to_string());
        assert!(cleared.ok, "{}", cleared.message);
        assert!(!compose_markup().contains("data-highlight-id"));
    }
}

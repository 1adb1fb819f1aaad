//! Annotation session service.
//!
//! # Responsibility
//! - Tie document selection, the mode controller, the store and the
//!   compositor into one synchronous session API.
//! - Keep the composed view consistent with the store within each call.
//!
//! # Invariants
//! - Highlighting mode is document-session-scoped: selecting a document
//!   resets the controller to Idle.
//! - `compose` always reads the store's current highlight set; nothing is
//!   cached across mutations.
//! - Invalid selections degrade to a no-op, never an error.

use crate::model::document::Document;
use crate::model::highlight::{FieldKey, Highlight, HighlightId};
use crate::model::knowledge_unit::{FieldData, KuId};
use crate::render::{compose, RenderPlan};
use crate::select::TextSelection;
use crate::service::highlighting::HighlightingController;
use crate::store::annotation_store::{AnnotationStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from session-level operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Operation requires a selected document.
    NoDocumentSelected,
    /// Store-level failure.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDocumentSelected => write!(f, "no document selected"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoDocumentSelected => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Document-list row for the host's browsing pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub has_annotations: bool,
}

/// One field of a unit view: schema definition joined with current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub field_id: String,
    pub name: String,
    pub required: bool,
    pub value: Option<FieldData>,
    pub highlight_count: usize,
}

/// Renderable snapshot of one knowledge unit with schema labels applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeUnitView {
    pub ku_id: KuId,
    pub schema_id: String,
    pub schema_label: String,
    pub fields: Vec<FieldView>,
}

/// One user's synchronous annotation session over a set of documents.
pub struct AnnotationSession<S: AnnotationStore> {
    store: S,
    controller: HighlightingController,
    selected: Option<String>,
}

impl<S: AnnotationStore> AnnotationSession<S> {
    /// Creates a session with no document selected.
    pub fn new(store: S) -> Self {
        Self {
            store,
            controller: HighlightingController::new(),
            selected: None,
        }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rows for the document list, derived per call.
    pub fn document_summaries(&self) -> Vec<DocumentSummary> {
        self.store
            .documents()
            .iter()
            .map(|doc| DocumentSummary {
                id: doc.id.clone(),
                title: doc.title.clone(),
                has_annotations: doc.has_annotations(),
            })
            .collect()
    }

    /// Selects the document the session operates on.
    ///
    /// Always drops back to Idle: highlighting mode never crosses documents.
    pub fn select_document(&mut self, doc_id: &str) -> ServiceResult<()> {
        if self.store.document(doc_id).is_none() {
            return Err(StoreError::DocumentNotFound(doc_id.to_string()).into());
        }
        self.selected = Some(doc_id.to_string());
        self.controller.reset();
        info!("event=document_selected module=service doc_id={doc_id}");
        Ok(())
    }

    pub fn selected_document(&self) -> Option<&Document> {
        self.store.document(self.selected.as_deref()?)
    }

    fn selected_id(&self) -> ServiceResult<&str> {
        self.selected
            .as_deref()
            .ok_or(ServiceError::NoDocumentSelected)
    }

    /// Adds a knowledge unit of `schema_id` to the selected document.
    pub fn add_knowledge_unit(&mut self, schema_id: &str) -> ServiceResult<KuId> {
        let doc_id = self.selected_id()?.to_string();
        Ok(self.store.add_knowledge_unit(&doc_id, schema_id)?)
    }

    pub fn remove_knowledge_unit(&mut self, ku_id: KuId) -> ServiceResult<()> {
        let doc_id = self.selected_id()?.to_string();
        Ok(self.store.remove_knowledge_unit(&doc_id, ku_id)?)
    }

    pub fn set_field_value(
        &mut self,
        ku_id: KuId,
        field_id: &str,
        value: Option<FieldData>,
    ) -> ServiceResult<()> {
        let doc_id = self.selected_id()?.to_string();
        Ok(self.store.set_field_value(&doc_id, ku_id, field_id, value)?)
    }

    pub fn remove_field(&mut self, ku_id: KuId, field_id: &str) -> ServiceResult<()> {
        let doc_id = self.selected_id()?.to_string();
        Ok(self.store.remove_field(&doc_id, ku_id, field_id)?)
    }

    pub fn clear_highlights(&mut self, ku_id: KuId, field_id: &str) -> ServiceResult<()> {
        let doc_id = self.selected_id()?.to_string();
        Ok(self.store.clear_highlights(&doc_id, ku_id, field_id)?)
    }

    /// Toggles highlighting mode for a field slot on the selected document.
    ///
    /// `None` disarms and is legal with no document selected (the host uses
    /// it when closing the panel).
    pub fn toggle_highlighting(&mut self, target: Option<FieldKey>) -> ServiceResult<()> {
        let Some(key) = target else {
            self.controller.toggle(None, &[]);
            return Ok(());
        };
        let doc_id = self.selected_id()?.to_string();
        let highlights = self.store.document_highlights(&doc_id)?;
        self.controller.toggle(Some(key), &highlights);
        Ok(())
    }

    pub fn armed_field(&self) -> Option<&FieldKey> {
        self.controller.armed()
    }

    pub fn active_highlight_ids(&self) -> &[HighlightId] {
        self.controller.active_ids()
    }

    /// Routes a resolved selection to the armed field slot.
    ///
    /// Returns `Ok(None)` without touching state when the controller is Idle
    /// or the selection does not fit the document: both are ordinary no-ops,
    /// not faults. On success the new highlight is returned already marked
    /// active.
    pub fn commit_selection(
        &mut self,
        selection: &TextSelection,
    ) -> ServiceResult<Option<Highlight>> {
        let Some(key) = self.controller.armed().cloned() else {
            return Ok(None);
        };
        let doc_id = self.selected_id()?.to_string();

        let content_len = match self.store.document(&doc_id) {
            Some(doc) => doc.content_len(),
            None => return Err(StoreError::DocumentNotFound(doc_id).into()),
        };
        if selection.start_offset >= selection.end_offset
            || selection.end_offset > content_len
        {
            return Ok(None);
        }

        let highlight = self.store.add_highlight(
            &doc_id,
            key.ku_id,
            &key.field_id,
            selection.start_offset,
            selection.end_offset,
        )?;
        self.controller.record_created(&highlight);
        Ok(Some(highlight))
    }

    /// Re-arms onto the clicked highlight's field slot.
    ///
    /// Lets the user jump into editing a field by clicking its evidence.
    /// Unknown ids are ignored.
    pub fn click_highlight(&mut self, highlight_id: HighlightId) -> ServiceResult<Option<FieldKey>> {
        let doc_id = self.selected_id()?.to_string();
        let highlights = self.store.document_highlights(&doc_id)?;
        Ok(self.controller.click(highlight_id, &highlights))
    }

    /// Composes the selected document's render plan from current state.
    ///
    /// Reads the store synchronously, so the plan can never lag a mutation
    /// made earlier in the same event handler. No selection yields an empty
    /// plan.
    pub fn compose_document(&self) -> RenderPlan {
        let Some(document) = self.selected_document() else {
            return RenderPlan::default();
        };
        let highlights = self
            .store
            .document_highlights(&document.id)
            .unwrap_or_default();
        compose(
            document.content(),
            &highlights,
            self.controller.active_ids(),
        )
    }

    /// Schema-joined views of the selected document's units.
    ///
    /// A unit referencing an unknown schema is skipped with a warning rather
    /// than failing the whole panel; likewise slots not declared by the
    /// schema.
    pub fn knowledge_unit_views(&self) -> Vec<KnowledgeUnitView> {
        let Some(document) = self.selected_document() else {
            return Vec::new();
        };

        let mut views = Vec::new();
        for unit in document.knowledge_units() {
            let Some(schema) = self.store.catalog().schema(&unit.schema_id) else {
                warn!(
                    "event=unknown_schema_skipped module=service ku_id={} schema_id={}",
                    unit.id, unit.schema_id
                );
                continue;
            };

            let fields = schema
                .fields
                .iter()
                .map(|definition| {
                    let slot = unit.field(&definition.id);
                    FieldView {
                        field_id: definition.id.clone(),
                        name: definition.name.clone(),
                        required: definition.required,
                        value: slot.and_then(|field| field.value.clone()),
                        highlight_count: slot.map_or(0, |field| field.highlights().len()),
                    }
                })
                .collect();

            views.push(KnowledgeUnitView {
                ku_id: unit.id,
                schema_id: unit.schema_id.clone(),
                schema_label: schema.label.clone(),
                fields,
            });
        }
        views
    }
}

//! Annotation store contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide the add / clear / flatten operations for highlights and the
//!   knowledge-unit CRUD they hang off.
//! - Validate spans and schema references before mutating state.
//!
//! # Invariants
//! - Highlight spans are validated against the owning document's content
//!   length before creation; the text snapshot is sliced by the store.
//! - Removing a unit or field slot drops its highlights with it (cascade);
//!   clearing a field's highlights never touches the field's value.
//! - `document_highlights` is recomputed per call, never cached across
//!   mutations.

use crate::model::document::Document;
use crate::model::highlight::Highlight;
use crate::model::knowledge_unit::{FieldData, KnowledgeUnit, KuId};
use crate::model::schema::SchemaCatalog;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for annotation state operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    DocumentNotFound(String),
    UnitNotFound(KuId),
    UnknownSchema(String),
    UnknownField {
        schema_id: String,
        field_id: String,
    },
    /// Span does not fit the document content. Selections are screened
    /// before they reach the store, so hitting this is a caller bug.
    InvalidSpan {
        start: usize,
        end: usize,
        len: usize,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
            Self::UnitNotFound(id) => write!(f, "knowledge unit not found: {id}"),
            Self::UnknownSchema(id) => write!(f, "unknown knowledge unit schema: {id}"),
            Self::UnknownField {
                schema_id,
                field_id,
            } => write!(f, "field `{field_id}` is not part of schema `{schema_id}`"),
            Self::InvalidSpan { start, end, len } => write!(
                f,
                "invalid highlight span [{start}, {end}) for content length {len}"
            ),
        }
    }
}

impl Error for StoreError {}

/// Contract for the highlight store / field binding layer.
///
/// The session and the FFI boundary talk to this trait only; the in-memory
/// implementation below is the single production one.
pub trait AnnotationStore {
    /// The static schema configuration this store validates against.
    fn catalog(&self) -> &SchemaCatalog;

    fn documents(&self) -> &[Document];

    fn document(&self, doc_id: &str) -> Option<&Document>;

    /// Creates an empty knowledge unit of the given schema on a document.
    fn add_knowledge_unit(&mut self, doc_id: &str, schema_id: &str) -> StoreResult<KuId>;

    /// Removes a unit and, with it, every highlight its fields own.
    fn remove_knowledge_unit(&mut self, doc_id: &str, ku_id: KuId) -> StoreResult<()>;

    /// Writes a field value, creating the sparse slot on first touch.
    fn set_field_value(
        &mut self,
        doc_id: &str,
        ku_id: KuId,
        field_id: &str,
        value: Option<FieldData>,
    ) -> StoreResult<()>;

    /// Drops a field slot together with its value and highlights.
    ///
    /// A slot that was never created is a no-op, not an error.
    fn remove_field(&mut self, doc_id: &str, ku_id: KuId, field_id: &str) -> StoreResult<()>;

    /// Appends a highlight to a field slot, creating the slot if needed.
    ///
    /// The span is validated against the content length and the text snapshot
    /// is sliced from the document, so callers cannot smuggle in stale text.
    /// Returns the created highlight for immediate UI feedback.
    fn add_highlight(
        &mut self,
        doc_id: &str,
        ku_id: KuId,
        field_id: &str,
        start_offset: usize,
        end_offset: usize,
    ) -> StoreResult<Highlight>;

    /// Empties one field slot's highlight list; value and slot survive.
    fn clear_highlights(&mut self, doc_id: &str, ku_id: KuId, field_id: &str) -> StoreResult<()>;

    /// Flattens all highlights across a document's units, in unit and field
    /// order. Recomputed on every call.
    fn document_highlights(&self, doc_id: &str) -> StoreResult<Vec<Highlight>>;
}

/// Session-lived in-memory annotation store.
pub struct MemoryAnnotationStore {
    catalog: SchemaCatalog,
    documents: Vec<Document>,
}

impl MemoryAnnotationStore {
    /// Creates a store over host-supplied documents and schema configuration.
    pub fn new(catalog: SchemaCatalog, documents: Vec<Document>) -> Self {
        Self { catalog, documents }
    }

    fn document_mut(&mut self, doc_id: &str) -> StoreResult<&mut Document> {
        self.documents
            .iter_mut()
            .find(|doc| doc.id == doc_id)
            .ok_or_else(|| StoreError::DocumentNotFound(doc_id.to_string()))
    }

    fn unit_mut<'doc>(
        document: &'doc mut Document,
        ku_id: KuId,
    ) -> StoreResult<&'doc mut KnowledgeUnit> {
        document
            .knowledge_units
            .iter_mut()
            .find(|unit| unit.id == ku_id)
            .ok_or(StoreError::UnitNotFound(ku_id))
    }

    /// Ensures `field_id` is declared by the unit's schema.
    fn check_field(&self, schema_id: &str, field_id: &str) -> StoreResult<()> {
        let schema = self
            .catalog
            .schema(schema_id)
            .ok_or_else(|| StoreError::UnknownSchema(schema_id.to_string()))?;
        if schema.field(field_id).is_none() {
            return Err(StoreError::UnknownField {
                schema_id: schema_id.to_string(),
                field_id: field_id.to_string(),
            });
        }
        Ok(())
    }
}

impl AnnotationStore for MemoryAnnotationStore {
    fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    fn documents(&self) -> &[Document] {
        &self.documents
    }

    fn document(&self, doc_id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == doc_id)
    }

    fn add_knowledge_unit(&mut self, doc_id: &str, schema_id: &str) -> StoreResult<KuId> {
        if self.catalog.schema(schema_id).is_none() {
            return Err(StoreError::UnknownSchema(schema_id.to_string()));
        }

        let unit = KnowledgeUnit::new(schema_id);
        let ku_id = unit.id;
        self.document_mut(doc_id)?.knowledge_units.push(unit);

        info!("event=ku_added module=store ku_id={ku_id} schema_id={schema_id} doc_id={doc_id}");
        Ok(ku_id)
    }

    fn remove_knowledge_unit(&mut self, doc_id: &str, ku_id: KuId) -> StoreResult<()> {
        let document = self.document_mut(doc_id)?;
        let before = document.knowledge_units.len();
        document.knowledge_units.retain(|unit| unit.id != ku_id);
        if document.knowledge_units.len() == before {
            return Err(StoreError::UnitNotFound(ku_id));
        }

        info!("event=ku_removed module=store ku_id={ku_id} doc_id={doc_id}");
        Ok(())
    }

    fn set_field_value(
        &mut self,
        doc_id: &str,
        ku_id: KuId,
        field_id: &str,
        value: Option<FieldData>,
    ) -> StoreResult<()> {
        let schema_id = Self::unit_mut(self.document_mut(doc_id)?, ku_id)?
            .schema_id
            .clone();
        self.check_field(&schema_id, field_id)?;

        let unit = Self::unit_mut(self.document_mut(doc_id)?, ku_id)?;
        unit.ensure_field(field_id).value = value;
        Ok(())
    }

    fn remove_field(&mut self, doc_id: &str, ku_id: KuId, field_id: &str) -> StoreResult<()> {
        let unit = Self::unit_mut(self.document_mut(doc_id)?, ku_id)?;
        unit.fields.retain(|field| field.field_id != field_id);
        Ok(())
    }

    fn add_highlight(
        &mut self,
        doc_id: &str,
        ku_id: KuId,
        field_id: &str,
        start_offset: usize,
        end_offset: usize,
    ) -> StoreResult<Highlight> {
        let document = self.document_mut(doc_id)?;
        let len = document.content_len();
        if start_offset >= end_offset || end_offset > len {
            return Err(StoreError::InvalidSpan {
                start: start_offset,
                end: end_offset,
                len,
            });
        }
        let text: String = document
            .content()
            .chars()
            .skip(start_offset)
            .take(end_offset - start_offset)
            .collect();

        let schema_id = Self::unit_mut(self.document_mut(doc_id)?, ku_id)?
            .schema_id
            .clone();
        self.check_field(&schema_id, field_id)?;

        let highlight = Highlight::new(ku_id, field_id, start_offset, end_offset, text);
        let unit = Self::unit_mut(self.document_mut(doc_id)?, ku_id)?;
        unit.ensure_field(field_id)
            .highlights
            .push(highlight.clone());

        info!(
            "event=highlight_added module=store highlight_id={} ku_id={ku_id} \
             field_id={field_id} start={start_offset} end={end_offset} doc_id={doc_id}",
            highlight.id
        );
        Ok(highlight)
    }

    fn clear_highlights(&mut self, doc_id: &str, ku_id: KuId, field_id: &str) -> StoreResult<()> {
        let unit = Self::unit_mut(self.document_mut(doc_id)?, ku_id)?;
        if let Some(field) = unit.field_mut(field_id) {
            let cleared = field.highlights.len();
            field.highlights.clear();
            info!(
                "event=highlights_cleared module=store ku_id={ku_id} field_id={field_id} \
                 count={cleared} doc_id={doc_id}"
            );
        }
        Ok(())
    }

    fn document_highlights(&self, doc_id: &str) -> StoreResult<Vec<Highlight>> {
        let document = self
            .document(doc_id)
            .ok_or_else(|| StoreError::DocumentNotFound(doc_id.to_string()))?;

        let mut highlights = Vec::new();
        for unit in document.knowledge_units() {
            for field in unit.fields() {
                highlights.extend(field.highlights().iter().cloned());
            }
        }
        Ok(highlights)
    }
}

//! Document record: the canonical offset space for all highlights.
//!
//! # Responsibility
//! - Hold one document's immutable plain text and its knowledge units.
//!
//! # Invariants
//! - `content` is set at load time and never mutated afterwards; every
//!   highlight offset in this document is relative to it.
//! - Knowledge units are mutated only through the annotation store, which is
//!   what keeps cascade deletion airtight (no orphaned highlights).

use crate::model::knowledge_unit::KnowledgeUnit;
use serde::{Deserialize, Serialize};

/// One annotatable document supplied by the host's document source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    content: String,
    #[serde(default)]
    pub(crate) knowledge_units: Vec<KnowledgeUnit>,
}

impl Document {
    /// Creates a document with no annotations yet.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            knowledge_units: Vec::new(),
        }
    }

    /// The immutable plain text all highlight offsets index into.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content length in Unicode scalar values, the unit highlights use.
    pub fn content_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Knowledge units annotated on this document.
    pub fn knowledge_units(&self) -> &[KnowledgeUnit] {
        &self.knowledge_units
    }

    /// True iff at least one knowledge unit exists. Derived, never stored.
    pub fn has_annotations(&self) -> bool {
        !self.knowledge_units.is_empty()
    }
}

//! Highlight record and field-slot addressing.
//!
//! # Responsibility
//! - Represent one evidentiary text span tied to exactly one (unit, field).
//! - Keep offsets in the canonical plain-text space of the owning document.
//!
//! # Invariants
//! - `start_offset < end_offset` and both are valid against the owning
//!   document's content length at creation time.
//! - Offsets count Unicode scalar values, not bytes.
//! - `color` equals `field_color(field_id)` always; it is stored only so the
//!   rendering layer does not need the derivation rule.

use crate::model::color::field_color;
use crate::model::knowledge_unit::KuId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a single highlight.
pub type HighlightId = Uuid;

/// Composite key naming exactly one field-slot on one knowledge unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldKey {
    pub ku_id: KuId,
    pub field_id: String,
}

impl FieldKey {
    pub fn new(ku_id: KuId, field_id: impl Into<String>) -> Self {
        Self {
            ku_id,
            field_id: field_id.into(),
        }
    }
}

/// One highlighted span of document text backing a field value.
///
/// `text` is a snapshot of the covered substring. Document content never
/// mutates, so the snapshot cannot drift from the offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: HighlightId,
    pub field_id: String,
    pub ku_id: KuId,
    pub start_offset: usize,
    pub end_offset: usize,
    pub text: String,
    pub color: String,
}

impl Highlight {
    /// Creates a highlight with a generated id and a derived color.
    pub fn new(
        ku_id: KuId,
        field_id: impl Into<String>,
        start_offset: usize,
        end_offset: usize,
        text: impl Into<String>,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4(),
            ku_id,
            field_id,
            start_offset,
            end_offset,
            text,
        )
    }

    /// Creates a highlight with a caller-provided id.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(
        id: HighlightId,
        ku_id: KuId,
        field_id: impl Into<String>,
        start_offset: usize,
        end_offset: usize,
        text: impl Into<String>,
    ) -> Self {
        let field_id = field_id.into();
        let color = field_color(&field_id);
        Self {
            id,
            field_id,
            ku_id,
            start_offset,
            end_offset,
            text: text.into(),
            color,
        }
    }

    /// Returns the field-slot this highlight belongs to.
    pub fn field_key(&self) -> FieldKey {
        FieldKey::new(self.ku_id, self.field_id.clone())
    }
}

//! Knowledge unit instances and their sparse field values.
//!
//! # Responsibility
//! - Hold one schema-conforming annotation instance with its field values.
//! - Own the highlights backing each field value.
//!
//! # Invariants
//! - The fields list is sparse: a slot exists only once the field has been
//!   edited or has received a highlight.
//! - At most one `FieldValue` exists per field id on a unit.
//! - Highlights live inside their field slot; removing the slot removes them.

use crate::model::highlight::Highlight;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Stable identifier of a knowledge unit instance.
pub type KuId = Uuid;

/// Current value of one field, kept alongside its backing highlights.
///
/// The original wire shape allows integers, free text, enum choices (carried
/// as text) and custom-type maps, so the value stays loosely typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldData {
    Integer(i64),
    Text(String),
    Custom(BTreeMap<String, String>),
}

/// One field-slot on a knowledge unit: value plus evidentiary highlights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    pub field_id: String,
    pub value: Option<FieldData>,
    pub(crate) highlights: Vec<Highlight>,
}

impl FieldValue {
    pub(crate) fn empty(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            value: None,
            highlights: Vec::new(),
        }
    }

    /// Highlights backing this field's value, in creation order.
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }
}

/// One annotation instance conforming to a knowledge unit schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeUnit {
    pub id: KuId,
    pub schema_id: String,
    pub(crate) fields: Vec<FieldValue>,
}

impl KnowledgeUnit {
    /// Creates an empty unit with a generated stable id.
    pub fn new(schema_id: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), schema_id)
    }

    /// Creates an empty unit with a caller-provided stable id.
    pub fn with_id(id: KuId, schema_id: impl Into<String>) -> Self {
        Self {
            id,
            schema_id: schema_id.into(),
            fields: Vec::new(),
        }
    }

    /// Field slots in first-touched order.
    pub fn fields(&self) -> &[FieldValue] {
        &self.fields
    }

    /// Looks up one field slot by field id.
    pub fn field(&self, field_id: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|field| field.field_id == field_id)
    }

    pub(crate) fn field_mut(&mut self, field_id: &str) -> Option<&mut FieldValue> {
        self.fields
            .iter_mut()
            .find(|field| field.field_id == field_id)
    }

    /// Returns the slot for `field_id`, creating an empty one on first touch.
    pub(crate) fn ensure_field(&mut self, field_id: &str) -> &mut FieldValue {
        let index = match self
            .fields
            .iter()
            .position(|field| field.field_id == field_id)
        {
            Some(index) => index,
            None => {
                self.fields.push(FieldValue::empty(field_id));
                self.fields.len() - 1
            }
        };
        &mut self.fields[index]
    }
}

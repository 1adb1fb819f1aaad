//! Knowledge unit schemas and the read-only schema catalog.
//!
//! # Responsibility
//! - Describe which units and fields are legal, as static host-supplied
//!   configuration.
//! - Provide lookup tables keyed by schema / custom-type id.
//!
//! # Invariants
//! - The catalog is read-only after construction; core never mutates it.
//! - Wire names match the original catalog format (`"Frame ID"`,
//!   `"Frame Label"`, `"Fields"`, `"type ID"`, `"Type Label"`).

use serde::{Deserialize, Serialize};

/// Declared type of a schema field.
///
/// A field is either a closed list of options or a named type: the built-ins
/// `"string"` / `"integer"`, or a reference to a custom type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldKind {
    Options(Vec<String>),
    Named(String),
}

impl FieldKind {
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Named(name) if name == "string")
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Named(name) if name == "integer")
    }

    /// The referenced custom type id, when this is neither a built-in named
    /// type nor an options list.
    pub fn custom_type_id(&self) -> Option<&str> {
        match self {
            Self::Named(name) if name != "string" && name != "integer" => Some(name),
            _ => None,
        }
    }
}

/// One field definition inside a schema or custom type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multiple: bool,
}

/// Static definition of one knowledge unit kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeUnitSchema {
    #[serde(rename = "Frame ID")]
    pub id: String,
    #[serde(rename = "Frame Label")]
    pub label: String,
    #[serde(rename = "Fields")]
    pub fields: Vec<FieldDefinition>,
}

impl KnowledgeUnitSchema {
    pub fn field(&self, field_id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.id == field_id)
    }
}

/// Reusable structured type referenced from schema fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTypeDefinition {
    #[serde(rename = "type ID")]
    pub id: String,
    #[serde(rename = "Type Label")]
    pub label: String,
    #[serde(rename = "Fields")]
    pub fields: Vec<FieldDefinition>,
}

/// Read-only lookup tables for schemas and custom types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaCatalog {
    schemas: Vec<KnowledgeUnitSchema>,
    custom_types: Vec<CustomTypeDefinition>,
}

impl SchemaCatalog {
    pub fn new(
        schemas: Vec<KnowledgeUnitSchema>,
        custom_types: Vec<CustomTypeDefinition>,
    ) -> Self {
        Self {
            schemas,
            custom_types,
        }
    }

    pub fn schemas(&self) -> &[KnowledgeUnitSchema] {
        &self.schemas
    }

    pub fn schema(&self, schema_id: &str) -> Option<&KnowledgeUnitSchema> {
        self.schemas.iter().find(|schema| schema.id == schema_id)
    }

    pub fn custom_type(&self, type_id: &str) -> Option<&CustomTypeDefinition> {
        self.custom_types.iter().find(|ty| ty.id == type_id)
    }

    /// Looks up a field definition through its schema.
    pub fn field(&self, schema_id: &str, field_id: &str) -> Option<&FieldDefinition> {
        self.schema(schema_id)?.field(field_id)
    }
}

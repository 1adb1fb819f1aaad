//! Core highlight-to-text mapping engine for spanmark.
//!
//! Users annotate documents by filling structured knowledge units whose field
//! values are backed by highlighted spans of the source text. This crate is
//! the single source of truth for the offset resolution, highlight
//! composition, field binding and mode-control invariants; host UIs are thin
//! projections over it.

pub mod logging;
pub mod model;
pub mod render;
pub mod select;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::color::field_color;
pub use model::document::Document;
pub use model::highlight::{FieldKey, Highlight, HighlightId};
pub use model::knowledge_unit::{FieldData, FieldValue, KnowledgeUnit, KuId};
pub use model::schema::{
    CustomTypeDefinition, FieldDefinition, FieldKind, KnowledgeUnitSchema, SchemaCatalog,
};
pub use render::{compose, Mark, MarkSummary, RenderNode, RenderPlan};
pub use select::{resolve_boundary, resolve_selection, SelectionBoundary, TextRun, TextSelection};
pub use service::annotation_service::{
    AnnotationSession, DocumentSummary, FieldView, KnowledgeUnitView, ServiceError, ServiceResult,
};
pub use service::highlighting::HighlightingController;
pub use store::annotation_store::{
    AnnotationStore, MemoryAnnotationStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

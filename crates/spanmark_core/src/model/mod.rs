//! Domain model for documents, knowledge units and evidence highlights.
//!
//! # Responsibility
//! - Define the canonical data structures used by core annotation logic.
//! - Keep the document's plain text as the single offset space for highlights.
//!
//! # Invariants
//! - Document content is immutable for the lifetime of the document.
//! - Every highlight belongs to exactly one (unit, field) slot.
//! - Highlight colors are a pure function of the owning field id.

pub mod color;
pub mod document;
pub mod highlight;
pub mod knowledge_unit;
pub mod schema;

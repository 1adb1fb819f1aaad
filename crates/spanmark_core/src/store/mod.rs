//! Annotation store: the data layer binding highlights to field slots.
//!
//! # Responsibility
//! - Define the store contract the session orchestrates against.
//! - Keep document / knowledge-unit / highlight state consistent under
//!   mutation, including cascade deletion.
//!
//! # Invariants
//! - All mutation of annotation state flows through `AnnotationStore`;
//!   callers never receive `&mut` access to documents.
//! - No highlight outlives its owning field slot or unit.

pub mod annotation_store;

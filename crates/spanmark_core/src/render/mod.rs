//! Highlight compositor: plain text plus highlight ranges to a render plan.
//!
//! # Responsibility
//! - Overlay highlight markers onto document text deterministically.
//! - Expose projections the host needs: markup, text runs, mark identities.
//!
//! # Invariants
//! - Composition is a pure function of (content, highlights, active ids);
//!   recomposing identical inputs yields identical plans.
//! - The plan's concatenated text is byte-identical to the input content.

pub mod compositor;

pub use compositor::{compose, Mark, MarkSummary, RenderNode, RenderPlan};

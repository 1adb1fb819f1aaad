//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `spanmark_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use spanmark_core::{compose, Highlight, KnowledgeUnit};

fn main() {
    println!("spanmark_core ping={}", spanmark_core::ping());
    println!("spanmark_core version={}", spanmark_core::core_version());

    // Tiny composition probe: one highlight over a fixed sentence.
    let unit = KnowledgeUnit::new("employment");
    let highlight = Highlight::new(unit.id, "person", 5, 9, "John");
    let plan = compose("Dear John, congrats.", &[highlight.clone()], &[highlight.id]);
    println!("spanmark_core compose_marks={}", plan.marks().len());
}

//! Deterministic field-color derivation.
//!
//! Highlight colors are never stored independently of the owning field:
//! identical field ids always map to identical colors, which is what lets the
//! UI visually group a field's highlights without a color registry.

/// Returns the hsla background color for a field id.
///
/// Pure function: equal `field_id` yields an equal color across calls and
/// across highlights. The hue comes from a char-code fold hash over the id.
pub fn field_color(field_id: &str) -> String {
    let hash = field_id.chars().fold(0_i32, |acc, ch| {
        (ch as i32).wrapping_add(acc.wrapping_shl(5).wrapping_sub(acc))
    });
    let hue = hash.unsigned_abs() % 360;
    format!("hsla({hue}, 70%, 80%, 0.5)")
}

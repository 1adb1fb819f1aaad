//! Highlighting-mode controller.
//!
//! # Responsibility
//! - Track which single (unit, field) slot is armed to receive the next
//!   committed selection.
//! - Maintain the set of visually emphasized ("active") highlight ids.
//!
//! # Invariants
//! - At most one field slot is armed at any time.
//! - Arming a slot recomputes the active set to exactly that slot's current
//!   highlights; switching slots never unions the two sets.
//! - Disarming leaves the active set as-is; only a session reset clears it.

use crate::model::highlight::{FieldKey, Highlight, HighlightId};
use log::debug;

/// State machine over Idle / Armed(field slot).
#[derive(Debug, Clone, Default)]
pub struct HighlightingController {
    armed: Option<FieldKey>,
    active_ids: Vec<HighlightId>,
}

impl HighlightingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently armed field slot, if any.
    pub fn armed(&self) -> Option<&FieldKey> {
        self.armed.as_ref()
    }

    /// Highlight ids currently rendered emphasized.
    pub fn active_ids(&self) -> &[HighlightId] {
        &self.active_ids
    }

    pub fn is_active(&self, id: HighlightId) -> bool {
        self.active_ids.contains(&id)
    }

    /// Toggles highlighting mode for a field slot.
    ///
    /// `None` or re-toggling the armed slot returns to Idle. Toggling a
    /// different slot while armed switches the target atomically, recomputing
    /// the active set for the new slot from `doc_highlights` (the flattened
    /// highlights of the current document).
    pub fn toggle(&mut self, target: Option<FieldKey>, doc_highlights: &[Highlight]) {
        let Some(key) = target else {
            self.armed = None;
            return;
        };

        if self.armed.as_ref() == Some(&key) {
            debug!(
                "event=highlighting_disarmed module=service ku_id={} field_id={}",
                key.ku_id, key.field_id
            );
            self.armed = None;
            return;
        }

        self.active_ids = ids_for_field(&key, doc_highlights);
        debug!(
            "event=highlighting_armed module=service ku_id={} field_id={} active={}",
            key.ku_id,
            key.field_id,
            self.active_ids.len()
        );
        self.armed = Some(key);
    }

    /// Marks a freshly created highlight active so it renders undimmed.
    pub fn record_created(&mut self, highlight: &Highlight) {
        self.active_ids.push(highlight.id);
    }

    /// Re-arms onto a clicked highlight's field slot.
    ///
    /// Works regardless of the current mode and recomputes the active set to
    /// all highlights sharing the slot. An id not present in
    /// `doc_highlights` is a no-op.
    pub fn click(
        &mut self,
        highlight_id: HighlightId,
        doc_highlights: &[Highlight],
    ) -> Option<FieldKey> {
        let clicked = doc_highlights.iter().find(|h| h.id == highlight_id)?;
        let key = clicked.field_key();
        self.active_ids = ids_for_field(&key, doc_highlights);
        self.armed = Some(key.clone());
        Some(key)
    }

    /// Returns to Idle with an empty active set. Used on document switch.
    pub fn reset(&mut self) {
        self.armed = None;
        self.active_ids.clear();
    }
}

fn ids_for_field(key: &FieldKey, doc_highlights: &[Highlight]) -> Vec<HighlightId> {
    doc_highlights
        .iter()
        .filter(|h| h.ku_id == key.ku_id && h.field_id == key.field_id)
        .map(|h| h.id)
        .collect()
}

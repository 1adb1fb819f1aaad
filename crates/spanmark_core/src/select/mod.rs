//! Offset resolver: rendered selection boundaries to canonical offsets.
//!
//! # Responsibility
//! - Map a host selection (node + local offset) back to character offsets in
//!   the document's plain text.
//! - Reject meaningless selections silently; nothing here is a failure.
//!
//! # Invariants
//! - The host supplies text runs in document order; highlight wrapper
//!   elements contribute no characters of their own, only their text runs do.
//! - Offsets count Unicode scalar values, matching the highlight model.
//!
//! The node key type is generic: a browser host walks DOM text nodes, the
//! core's own render plan exposes runs keyed by in-order index.

/// One rendered text node, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun<K> {
    pub key: K,
    pub len: usize,
}

impl<K> TextRun<K> {
    pub fn new(key: K, len: usize) -> Self {
        Self { key, len }
    }
}

/// One endpoint of a host selection: a text node and an offset inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionBoundary<K> {
    pub key: K,
    pub offset: usize,
}

impl<K> SelectionBoundary<K> {
    pub fn new(key: K, offset: usize) -> Self {
        Self { key, offset }
    }
}

/// A committed selection resolved into the canonical offset space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSelection {
    pub start_offset: usize,
    pub end_offset: usize,
    /// Snapshot of the covered substring of the document content.
    pub text: String,
}

/// Resolves one boundary to an absolute offset via a running character count.
///
/// Returns `None` when the boundary's node is not part of the walk, in which
/// case the caller abandons the selection.
pub fn resolve_boundary<K: PartialEq>(
    runs: &[TextRun<K>],
    boundary: &SelectionBoundary<K>,
) -> Option<usize> {
    let mut total = 0;
    for run in runs {
        if run.key == boundary.key {
            return Some(total + boundary.offset);
        }
        total += run.len;
    }
    None
}

/// Resolves a full selection against the document content.
///
/// `start` and `end` are the range-ordered selection endpoints as the host's
/// selection API reports them. Returns `None` for anything that should not
/// become a highlight: an unresolvable boundary, a collapsed selection, an
/// inverted range, or offsets that overrun the content. All of these are
/// ordinary "nothing selected meaningfully" outcomes.
pub fn resolve_selection<K: PartialEq>(
    runs: &[TextRun<K>],
    content: &str,
    start: &SelectionBoundary<K>,
    end: &SelectionBoundary<K>,
) -> Option<TextSelection> {
    let start_offset = resolve_boundary(runs, start)?;
    let end_offset = resolve_boundary(runs, end)?;
    if end_offset <= start_offset {
        return None;
    }
    if end_offset > content.chars().count() {
        return None;
    }

    let text: String = content
        .chars()
        .skip(start_offset)
        .take(end_offset - start_offset)
        .collect();

    Some(TextSelection {
        start_offset,
        end_offset,
        text,
    })
}

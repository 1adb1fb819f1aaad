//! Render-plan construction by descending-offset interval folding.
//!
//! Ranges are applied from the rightmost start leftward, so placing a marker
//! never shifts the positions of ranges still to be processed. When two
//! ranges genuinely overlap, the leftward (later-processed) marker swallows
//! the whole rightward marker that starts inside it, so overlapping
//! highlights nest outer-around-inner. That mirrors the behavior annotators
//! already rely on; it is not an overlap-merge algorithm.

use crate::model::highlight::{Highlight, HighlightId};
use crate::select::TextRun;

/// One node of the render plan tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    /// A run of unadorned document text.
    Text(String),
    /// A highlight marker wrapping the nodes it covers.
    Mark(Mark),
}

/// Highlight marker: identity, derived color, and emphasis state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mark {
    pub highlight_id: HighlightId,
    pub color: String,
    pub active: bool,
    pub children: Vec<RenderNode>,
}

/// Flat view of one mark for hosts doing click hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkSummary {
    pub highlight_id: HighlightId,
    pub active: bool,
}

/// Ordered rendering plan for one document's content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPlan {
    nodes: Vec<RenderNode>,
}

/// Builds the render plan for `content` with the given highlights applied.
///
/// Highlights whose span does not fit the content are skipped; a bad span
/// must not corrupt composition for the rest of the document. `active_ids`
/// decides which marks render emphasized rather than dimmed.
pub fn compose(content: &str, highlights: &[Highlight], active_ids: &[HighlightId]) -> RenderPlan {
    let content_len = content.chars().count();
    let mut nodes = Vec::new();
    if !content.is_empty() {
        nodes.push(RenderNode::Text(content.to_string()));
    }

    let mut ordered: Vec<&Highlight> = highlights
        .iter()
        .filter(|h| h.start_offset < h.end_offset && h.end_offset <= content_len)
        .collect();
    ordered.sort_by(|a, b| b.start_offset.cmp(&a.start_offset));

    for highlight in ordered {
        let active = active_ids.contains(&highlight.id);
        apply_range(&mut nodes, highlight, active);
    }

    RenderPlan { nodes }
}

/// Wraps `[start, end)` of the canonical space in a mark node.
///
/// Only text nodes are ever split. Marks placed earlier start at or to the
/// right of `start`, so a mark overlapping the range is swallowed whole.
fn apply_range(nodes: &mut Vec<RenderNode>, highlight: &Highlight, active: bool) {
    let start = highlight.start_offset;
    let end = highlight.end_offset;

    let mut out: Vec<RenderNode> = Vec::with_capacity(nodes.len() + 2);
    let mut covered: Vec<RenderNode> = Vec::new();
    let mut emitted = false;
    let mut pos = 0;

    for node in nodes.drain(..) {
        let node_start = pos;
        let node_end = pos + node_len(&node);
        pos = node_end;

        if node_end <= start {
            out.push(node);
            continue;
        }
        if node_start >= end {
            if !emitted {
                out.push(make_mark(highlight, active, std::mem::take(&mut covered)));
                emitted = true;
            }
            out.push(node);
            continue;
        }

        match node {
            RenderNode::Text(text) => {
                let lo = start.saturating_sub(node_start);
                let hi = end.min(node_end) - node_start;
                let (before, rest) = split_chars(&text, lo);
                let (middle, after) = split_chars(rest, hi - lo);
                if !before.is_empty() {
                    out.push(RenderNode::Text(before.to_string()));
                }
                if !middle.is_empty() {
                    covered.push(RenderNode::Text(middle.to_string()));
                }
                if !after.is_empty() {
                    out.push(make_mark(highlight, active, std::mem::take(&mut covered)));
                    emitted = true;
                    out.push(RenderNode::Text(after.to_string()));
                }
            }
            RenderNode::Mark(mark) => {
                covered.push(RenderNode::Mark(mark));
            }
        }
    }

    if !emitted {
        out.push(make_mark(highlight, active, covered));
    }

    *nodes = out;
}

fn make_mark(highlight: &Highlight, active: bool, children: Vec<RenderNode>) -> RenderNode {
    RenderNode::Mark(Mark {
        highlight_id: highlight.id,
        color: highlight.color.clone(),
        active,
        children,
    })
}

fn node_len(node: &RenderNode) -> usize {
    match node {
        RenderNode::Text(text) => text.chars().count(),
        RenderNode::Mark(mark) => mark.children.iter().map(node_len).sum(),
    }
}

/// Splits at a character index, tolerating an index past the end.
fn split_chars(text: &str, at: usize) -> (&str, &str) {
    let byte_index = text
        .char_indices()
        .nth(at)
        .map(|(index, _)| index)
        .unwrap_or(text.len());
    text.split_at(byte_index)
}

impl RenderPlan {
    pub fn nodes(&self) -> &[RenderNode] {
        &self.nodes
    }

    /// Concatenates all text nodes in order; equals the composed content.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        collect_text(&self.nodes, &mut text);
        text
    }

    /// In-order text runs keyed by traversal index, for the offset resolver.
    ///
    /// This is the inverse-mapping feed: marks contribute no characters, so a
    /// walk over these runs reproduces canonical offsets exactly.
    pub fn text_runs(&self) -> Vec<TextRun<usize>> {
        let mut runs = Vec::new();
        collect_runs(&self.nodes, &mut runs);
        runs
    }

    /// All marks in document order (outer before inner for nested marks).
    pub fn marks(&self) -> Vec<MarkSummary> {
        let mut marks = Vec::new();
        collect_marks(&self.nodes, &mut marks);
        marks
    }

    /// Projects the plan to HTML markup for webview hosts.
    ///
    /// Each marked region carries `data-highlight-id` so the host's click
    /// handler can report the highlight identity upward. Active marks render
    /// at full opacity, the rest dimmed.
    pub fn to_markup(&self) -> String {
        let mut markup = String::new();
        write_markup(&self.nodes, &mut markup);
        markup
    }
}

fn collect_text(nodes: &[RenderNode], text: &mut String) {
    for node in nodes {
        match node {
            RenderNode::Text(run) => text.push_str(run),
            RenderNode::Mark(mark) => collect_text(&mark.children, text),
        }
    }
}

fn collect_runs(nodes: &[RenderNode], runs: &mut Vec<TextRun<usize>>) {
    for node in nodes {
        match node {
            RenderNode::Text(run) => {
                let key = runs.len();
                runs.push(TextRun::new(key, run.chars().count()));
            }
            RenderNode::Mark(mark) => collect_runs(&mark.children, runs),
        }
    }
}

fn collect_marks(nodes: &[RenderNode], marks: &mut Vec<MarkSummary>) {
    for node in nodes {
        if let RenderNode::Mark(mark) = node {
            marks.push(MarkSummary {
                highlight_id: mark.highlight_id,
                active: mark.active,
            });
            collect_marks(&mark.children, marks);
        }
    }
}

fn write_markup(nodes: &[RenderNode], markup: &mut String) {
    for node in nodes {
        match node {
            RenderNode::Text(text) => {
                markup.push_str(&html_escape::encode_text(text));
            }
            RenderNode::Mark(mark) => {
                let opacity = if mark.active {
                    "opacity-100"
                } else {
                    "opacity-30"
                };
                markup.push_str(&format!(
                    "<span class=\"highlight rounded {opacity} cursor-pointer transition-opacity\" \
                     style=\"background-color: {};\" data-highlight-id=\"{}\">",
                    mark.color, mark.highlight_id
                ));
                write_markup(&mark.children, markup);
                markup.push_str("</span>");
            }
        }
    }
}

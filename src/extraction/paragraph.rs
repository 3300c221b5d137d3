// src/extraction/paragraph.rs
//! Open paragraph buffer for one container walk

use crate::types::{Block, TextSpan};

/// Keep spans with visible content plus exact single-space delimiters
pub fn clean_spans(spans: Vec<TextSpan>) -> Vec<TextSpan> {
    spans
        .into_iter()
        .filter(|span| !span.content.trim().is_empty() || span.is_space())
        .collect()
}

/// Whether the spans carry any non-whitespace text at all
pub fn has_meaningful_content(spans: &[TextSpan]) -> bool {
    spans.iter().any(|span| !span.content.trim().is_empty())
}

/// Pending spans and whitespace-merge state, scoped to a single extraction.
#[derive(Debug, Default)]
pub struct ExtractionState {
    pending: Vec<TextSpan>,
    pending_space: bool,
}

impl ExtractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[TextSpan] {
        &self.pending
    }

    pub fn has_pending_space(&self) -> bool {
        self.pending_space
    }

    /// Record whitespace seen since the last content
    pub fn mark_space(&mut self) {
        self.pending_space = true;
    }

    /// Materialize a pending space, never as the first span of a paragraph.
    /// The flag is consumed either way.
    pub fn push_space_if_pending(&mut self) {
        if self.pending_space && !self.pending.is_empty() {
            self.pending.push(TextSpan::space());
        }
        self.pending_space = false;
    }

    /// Append a raw text run, merging any pending whitespace first
    pub fn push_text(&mut self, content: &str) {
        self.push_space_if_pending();
        self.pending.push(TextSpan::plain(content));
    }

    pub fn extend<I: IntoIterator<Item = TextSpan>>(&mut self, spans: I) {
        self.pending.extend(spans);
    }

    /// Flush the buffer into a paragraph block if it holds visible text
    pub fn finalize(&mut self, output: &mut Vec<Block>) {
        let spans = clean_spans(std::mem::take(&mut self.pending));
        if has_meaningful_content(&spans) {
            output.push(Block::Paragraph { spans });
        }
        self.reset();
    }

    pub fn reset(&mut self) {
        self.pending.clear();
        self.pending_space = false;
    }
}

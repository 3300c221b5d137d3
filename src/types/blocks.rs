// src/types/blocks.rs
//! Block-level output of the description extractor

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

/// One run of inline text sharing the same formatting and link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub content: String,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl TextSpan {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            annotations: Annotations::default(),
            link: None,
        }
    }

    /// The single-space delimiter inserted between merged text runs
    pub fn space() -> Self {
        Self::plain(" ")
    }

    pub fn bold(mut self) -> Self {
        self.annotations.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.annotations.italic = true;
        self
    }

    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    pub fn is_space(&self) -> bool {
        self.content == " "
    }
}

/// Item produced by the rich-text extractor: a span or a hard line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineItem {
    Span(TextSpan),
    Break,
}

impl InlineItem {
    pub fn is_break(&self) -> bool {
        matches!(self, Self::Break)
    }

    pub fn into_span(self) -> Option<TextSpan> {
        match self {
            Self::Span(span) => Some(span),
            Self::Break => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    BulletedListItem,
    NumberedListItem,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::BulletedListItem => "bulleted_list_item",
            Self::NumberedListItem => "numbered_list_item",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph { spans: Vec<TextSpan> },
    #[serde(rename = "bulleted_list_item")]
    BulletItem { spans: Vec<TextSpan> },
    #[serde(rename = "numbered_list_item")]
    NumberedItem { spans: Vec<TextSpan> },
}

impl Block {
    pub fn new(kind: BlockKind, spans: Vec<TextSpan>) -> Self {
        match kind {
            BlockKind::Paragraph => Self::Paragraph { spans },
            BlockKind::BulletedListItem => Self::BulletItem { spans },
            BlockKind::NumberedListItem => Self::NumberedItem { spans },
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Paragraph { .. } => BlockKind::Paragraph,
            Self::BulletItem { .. } => BlockKind::BulletedListItem,
            Self::NumberedItem { .. } => BlockKind::NumberedListItem,
        }
    }

    pub fn spans(&self) -> &[TextSpan] {
        match self {
            Self::Paragraph { spans } | Self::BulletItem { spans } | Self::NumberedItem { spans } => {
                spans
            }
        }
    }

    /// Concatenated span content without formatting
    pub fn plain_text(&self) -> String {
        self.spans().iter().map(|s| s.content.as_str()).collect()
    }
}

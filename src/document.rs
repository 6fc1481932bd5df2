//! The block-structured document model.
//!
//! A converted document is an ordered sequence of blocks; a block is either a
//! styled paragraph of spans, a resolved image, a resolved embed, or a
//! horizontal rule. The variant sets are closed so the compiler can dispatch
//! over them exhaustively.

use crate::platform::Platform;

/// An ordered sequence of blocks.
///
/// A document is a pure value: it has no identity beyond the position of its
/// blocks, and two conversions of the same input produce equal documents.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    /// A document holding a single structurally-empty paragraph.
    ///
    /// Downstream consumers expect at least one block, so this is what an
    /// input with no extractable content converts to.
    pub fn empty() -> Self {
        Document {
            blocks: vec![Block::Paragraph(Paragraph {
                style: ParagraphStyle::Normal,
                spans: vec![Span::empty()],
            })],
        }
    }
}

/// One top-level structural unit of the output document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Image(Image),
    Embed(Embed),
    HorizontalRule,
}

/// Marker for ordered vs. unordered list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// The style of a paragraph block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    Normal,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Blockquote,
    ListItem(ListKind),
}

/// A run of spans rendered as one paragraph-like block.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub spans: Vec<Span>,
}

impl Paragraph {
    /// The concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// An image block referencing an uploaded asset.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Asset reference supplied by the caller's asset resolver.
    pub asset_ref: String,
    pub alt_text: String,
    pub caption: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub alignment: Option<String>,
}

/// A resolved third-party media embed.
#[derive(Debug, Clone, PartialEq)]
pub struct Embed {
    pub platform: Platform,
    pub media_id: Option<String>,
    /// The canonical embeddable URL when the platform defines one, otherwise
    /// the original URL (twitter/x embeds go through an external script and
    /// keep their original form).
    pub url: String,
    pub caption: Option<String>,
}

/// A contiguous run of text carrying zero or more marks.
///
/// Adjacent sibling spans with the same mark set are not required to merge;
/// non-merging is always safe for the consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub marks: Vec<Mark>,
}

impl Span {
    pub fn empty() -> Self {
        Span {
            text: String::new(),
            marks: Vec::new(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Span {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// True if the span holds nothing a reader would see. No-break spaces
    /// count as blank here so that padding-only paragraphs can be stripped.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(|c| c.is_whitespace())
    }
}

/// An inline formatting or linking annotation applied to a span.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Strong,
    Em,
    Code,
    Link { href: String, new_tab: bool },
}

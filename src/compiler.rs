//! Tree-to-document compilation.
//!
//! Walks the normalized markup tree and produces the ordered block sequence.
//! Every element is block-forming, transparent, inline, or ignored; sibling
//! inline nodes accumulate and flush as a single paragraph, which is what
//! keeps a run of text and mark elements from fragmenting into one block per
//! sibling. Compilation is total: structural irregularities degrade to
//! flattened-text paragraphs and unresolvable references are counted and
//! skipped, never fatal.

mod inline;

use crate::document::{
    Block, Document, Embed, Image, ListKind, Paragraph, ParagraphStyle, Span,
};
use crate::markup::{self, Element, Node};
use crate::platform;
use crate::resolve::{Report, Resolvers};

/// Plain grouping containers: no block meaning of their own, children are
/// walked in place. Unknown elements are treated the same way.
const TRANSPARENT_TAGS: &[&str] = &[
    "div", "span", "section", "article", "aside", "header", "footer", "main", "center", "font",
    "small", "u", "figure", "figcaption",
];

/// Elements that produce no output at all. A line break is structurally
/// ignored and never a paragraph separator.
const IGNORED_TAGS: &[&str] = &["br", "script", "style"];

enum Class {
    Block(BlockKind),
    Transparent,
    Inline,
    Ignored,
}

#[derive(Clone, Copy)]
enum BlockKind {
    /// A styled paragraph container: headings, `p`, `blockquote`.
    Container(ParagraphStyle),
    List(ListKind),
    Image,
    CaptionFigure,
    GalleryFigure,
    Embed,
    Rule,
}

fn classify(el: &Element) -> Class {
    match el.name.as_str() {
        "h1" => Class::Block(BlockKind::Container(ParagraphStyle::Heading1)),
        "h2" => Class::Block(BlockKind::Container(ParagraphStyle::Heading2)),
        "h3" => Class::Block(BlockKind::Container(ParagraphStyle::Heading3)),
        // The block model stops at heading 4.
        "h4" | "h5" | "h6" => Class::Block(BlockKind::Container(ParagraphStyle::Heading4)),
        "p" | "li" => Class::Block(BlockKind::Container(ParagraphStyle::Normal)),
        "blockquote" => Class::Block(BlockKind::Container(ParagraphStyle::Blockquote)),
        "ul" => Class::Block(BlockKind::List(ListKind::Unordered)),
        "ol" => Class::Block(BlockKind::List(ListKind::Ordered)),
        "img" => Class::Block(BlockKind::Image),
        "hr" => Class::Block(BlockKind::Rule),
        "oembed" => Class::Block(BlockKind::Embed),
        "figure" if el.has_attr("data-caption-marker") => Class::Block(BlockKind::CaptionFigure),
        "figure" if el.has_class("gallery-image") => Class::Block(BlockKind::GalleryFigure),
        "a" | "em" | "i" | "strong" | "b" | "code" | "tt" => Class::Inline,
        name if IGNORED_TAGS.contains(&name) => Class::Ignored,
        name if TRANSPARENT_TAGS.contains(&name) => Class::Transparent,
        _ => Class::Transparent,
    }
}

/// Compiles normalized markup into a [`Document`].
///
/// The compiler owns the conversion report; [`TreeCompiler::compile`]
/// consumes the compiler and returns the document together with it.
pub struct TreeCompiler<'a> {
    resolvers: &'a Resolvers<'a>,
    report: Report,
}

impl<'a> TreeCompiler<'a> {
    pub fn new(resolvers: &'a Resolvers<'a>) -> Self {
        TreeCompiler {
            resolvers,
            report: Report::default(),
        }
    }

    /// Never fails: a document always comes back, with at least one block.
    pub fn compile(mut self, normalized: &str) -> (Document, Report) {
        let nodes = markup::parse(normalized);
        let mut blocks = Vec::new();
        self.walk(&nodes, ParagraphStyle::Normal, &mut blocks);
        let document = if blocks.is_empty() {
            log::debug!("no extractable content, emitting empty-paragraph document");
            Document::empty()
        } else {
            Document { blocks }
        };
        (document, self.report)
    }

    fn walk<'t>(&mut self, nodes: &'t [Node], style: ParagraphStyle, out: &mut Vec<Block>) {
        let mut pending: Vec<&'t Node> = Vec::new();
        self.walk_siblings(nodes, style, &mut pending, out);
        self.flush(&mut pending, style, out);
    }

    fn walk_siblings<'t>(
        &mut self,
        nodes: &'t [Node],
        style: ParagraphStyle,
        pending: &mut Vec<&'t Node>,
        out: &mut Vec<Block>,
    ) {
        let mut i = 0;
        while i < nodes.len() {
            match &nodes[i] {
                text @ Node::Text(_) => pending.push(text),
                Node::Element(el) => match classify(el) {
                    Class::Inline => pending.push(&nodes[i]),
                    Class::Ignored => {}
                    Class::Transparent => self.walk_siblings(&el.children, style, pending, out),
                    Class::Block(kind) => {
                        self.flush(pending, style, out);
                        let caption = match kind {
                            BlockKind::Embed => consume_caption(nodes, &mut i),
                            _ => None,
                        };
                        self.emit(el, kind, style, caption, out);
                    }
                },
            }
            i += 1;
        }
    }

    /// Flush the accumulated inline run as one paragraph. Runs holding
    /// nothing visible (whitespace, no-break spaces, line breaks) vanish
    /// here; runs whose whole text is a dash literal become a rule.
    fn flush(&mut self, pending: &mut Vec<&Node>, style: ParagraphStyle, out: &mut Vec<Block>) {
        if pending.is_empty() {
            return;
        }
        let spans = inline::compile_inline(pending);
        pending.clear();

        if spans.iter().all(Span::is_blank) {
            return;
        }
        if style == ParagraphStyle::Normal && is_rule_text(&spans) {
            out.push(Block::HorizontalRule);
            return;
        }
        out.push(Block::Paragraph(Paragraph {
            style,
            spans: trim_edges(spans),
        }));
    }

    fn emit(
        &mut self,
        el: &Element,
        kind: BlockKind,
        parent_style: ParagraphStyle,
        caption: Option<String>,
        out: &mut Vec<Block>,
    ) {
        match kind {
            BlockKind::Container(style) => {
                // A plain paragraph nested in a blockquote or list item keeps
                // the enclosing style.
                let effective = match style {
                    ParagraphStyle::Normal => parent_style,
                    other => other,
                };
                self.walk(&el.children, effective, out);
            }
            BlockKind::List(list_kind) => self.emit_list(el, list_kind, out),
            BlockKind::Image => self.emit_image(el, None, None, None, out),
            BlockKind::CaptionFigure => self.emit_caption_figure(el, out),
            BlockKind::GalleryFigure => self.emit_gallery_figure(el, out),
            BlockKind::Embed => self.emit_embed(el, caption, out),
            BlockKind::Rule => out.push(Block::HorizontalRule),
        }
    }

    fn emit_list(&mut self, el: &Element, kind: ListKind, out: &mut Vec<Block>) {
        for child in &el.children {
            match child {
                Node::Element(item) if item.name == "li" => {
                    self.walk(&item.children, ParagraphStyle::ListItem(kind), out);
                }
                Node::Element(item) if item.name == "ul" => {
                    self.emit_list(item, ListKind::Unordered, out);
                }
                Node::Element(item) if item.name == "ol" => {
                    self.emit_list(item, ListKind::Ordered, out);
                }
                Node::Text(t) if t.chars().all(char::is_whitespace) => {}
                // Stray non-item content inside a list: keep it rather than
                // drop it.
                other => {
                    self.walk(std::slice::from_ref(other), ParagraphStyle::ListItem(kind), out);
                }
            }
        }
    }

    fn emit_image(
        &mut self,
        img: &Element,
        caption: Option<String>,
        width: Option<u32>,
        alignment: Option<String>,
        out: &mut Vec<Block>,
    ) {
        let Some(src) = img.attr("src").filter(|s| !s.is_empty()) else {
            self.report.images_skipped += 1;
            log::warn!("image without a source skipped");
            return;
        };
        let Some(asset_ref) = self.resolvers.assets.resolve_asset(src) else {
            self.report.images_skipped += 1;
            log::warn!("unresolvable image skipped: {}", src);
            return;
        };
        let caption = caption
            .or_else(|| img.attr("title").map(str::to_string))
            .filter(|c| !c.is_empty());
        out.push(Block::Image(Image {
            asset_ref,
            alt_text: img.attr("alt").unwrap_or_default().to_string(),
            caption,
            width: width.or_else(|| img.attr("width").and_then(|w| w.parse().ok())),
            height: img.attr("height").and_then(|h| h.parse().ok()),
            alignment,
        }));
    }

    /// A caption marker figure yields exactly one image block carrying the
    /// figcaption text; the caption never becomes its own paragraph.
    fn emit_caption_figure(&mut self, figure: &Element, out: &mut Vec<Block>) {
        let Some(img) = figure.find("img") else {
            // Marker figure with no image: keep the flattened text rather
            // than dropping content.
            let text = figure.text();
            let trimmed = text.trim_matches(|c: char| c.is_ascii_whitespace());
            if !trimmed.chars().all(char::is_whitespace) {
                out.push(Block::Paragraph(Paragraph {
                    style: ParagraphStyle::Normal,
                    spans: vec![Span::plain(trimmed)],
                }));
            }
            return;
        };
        let caption = figure
            .find("figcaption")
            .map(|c| c.text().trim().to_string())
            .filter(|c| !c.is_empty());
        let width = figure.attr("data-width").and_then(|w| w.parse().ok());
        let alignment = figure.attr("data-align").and_then(alignment_value);
        self.emit_image(img, caption, width, alignment, out);
    }

    fn emit_gallery_figure(&mut self, figure: &Element, out: &mut Vec<Block>) {
        let id = figure.attr("data-id").and_then(|v| v.parse::<u64>().ok());
        let Some(attachment) = id.and_then(|id| self.resolvers.attachments.resolve_attachment(id))
        else {
            self.report.gallery_items_skipped += 1;
            log::warn!("gallery attachment {:?} skipped", figure.attr("data-id"));
            return;
        };
        let Some(asset_ref) = self.resolvers.assets.resolve_asset(&attachment.url) else {
            self.report.gallery_items_skipped += 1;
            log::warn!("gallery image unresolvable: {}", attachment.url);
            return;
        };
        out.push(Block::Image(Image {
            asset_ref,
            alt_text: String::new(),
            caption: None,
            width: None,
            height: None,
            alignment: None,
        }));
    }

    fn emit_embed(&mut self, el: &Element, caption: Option<String>, out: &mut Vec<Block>) {
        let url = el.attr("url").unwrap_or_default();
        let resolution = platform::resolve(url);
        if !resolution.is_known() {
            // Unresolved raw URLs must not leak into the document as text.
            self.report.embeds_skipped += 1;
            log::warn!("embed with no known platform dropped: {}", url);
            return;
        }
        out.push(Block::Embed(Embed {
            platform: resolution.platform,
            media_id: resolution.media_id,
            url: resolution
                .canonical_url
                .unwrap_or_else(|| url.to_string()),
            caption,
        }));
    }
}

/// A figcaption immediately following an embed placeholder (whitespace
/// permitting) supplies its caption and is consumed.
fn consume_caption(nodes: &[Node], i: &mut usize) -> Option<String> {
    let mut j = *i + 1;
    loop {
        match nodes.get(j) {
            Some(Node::Text(t)) if t.chars().all(char::is_whitespace) => j += 1,
            Some(Node::Element(el)) if el.name == "figcaption" => {
                *i = j;
                let text = el.text().trim().to_string();
                return (!text.is_empty()).then_some(text);
            }
            _ => return None,
        }
    }
}

/// Legacy alignment values carry an `align` prefix; `none` means unset.
fn alignment_value(raw: &str) -> Option<String> {
    let value = raw.strip_prefix("align").unwrap_or(raw);
    (!value.is_empty() && value != "none").then(|| value.to_string())
}

fn is_rule_text(spans: &[Span]) -> bool {
    let text: String = spans.iter().map(|s| s.text.as_str()).collect();
    matches!(text.trim(), "---" | "\u{2014}" | "\u{2013}")
}

/// Trim ASCII whitespace from the paragraph edges only. No-break padding
/// inside a kept paragraph survives verbatim.
fn trim_edges(mut spans: Vec<Span>) -> Vec<Span> {
    while let Some(first) = spans.first_mut() {
        first.text = first
            .text
            .trim_start_matches(|c: char| c.is_ascii_whitespace())
            .to_string();
        if first.text.is_empty() {
            spans.remove(0);
        } else {
            break;
        }
    }
    while let Some(last) = spans.last_mut() {
        last.text = last
            .text
            .trim_end_matches(|c: char| c.is_ascii_whitespace())
            .to_string();
        if last.text.is_empty() {
            spans.pop();
        } else {
            break;
        }
    }
    if spans.is_empty() {
        spans.push(Span::empty());
    }
    spans
}

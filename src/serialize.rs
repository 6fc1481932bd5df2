//! Portable block-array serialization.
//!
//! Maps a [`Document`] onto the downstream store's rich-text shape: an array
//! of `_type`-discriminated objects. Link marks become `markDefs` entries
//! referenced by key from the span's mark list; keys are deterministic
//! (`link-0`, `link-1`, … per block, in first-appearance order) so two
//! conversions of the same input serialize identically.

use serde_json::{Map, Value, json};

use crate::document::{Block, Document, Embed, Image, ListKind, Mark, Paragraph, ParagraphStyle};

impl Document {
    /// The document as the consumer's block array.
    pub fn to_portable(&self) -> Value {
        Value::Array(self.blocks.iter().map(block_to_value).collect())
    }
}

fn block_to_value(block: &Block) -> Value {
    match block {
        Block::Paragraph(p) => paragraph_to_value(p),
        Block::Image(image) => image_to_value(image),
        Block::Embed(embed) => embed_to_value(embed),
        Block::HorizontalRule => json!({ "_type": "horizontalRule" }),
    }
}

fn paragraph_to_value(paragraph: &Paragraph) -> Value {
    let mut mark_defs: Vec<Value> = Vec::new();
    let mut link_keys: Vec<(String, bool, String)> = Vec::new();

    let children: Vec<Value> = paragraph
        .spans
        .iter()
        .map(|span| {
            let marks: Vec<Value> = span
                .marks
                .iter()
                .map(|mark| match mark {
                    Mark::Strong => json!("strong"),
                    Mark::Em => json!("em"),
                    Mark::Code => json!("code"),
                    Mark::Link { href, new_tab } => {
                        let key = link_key(href, *new_tab, &mut link_keys, &mut mark_defs);
                        json!(key)
                    }
                })
                .collect();
            json!({
                "_type": "span",
                "text": span.text,
                "marks": marks,
            })
        })
        .collect();

    let mut block = Map::new();
    block.insert("_type".into(), json!("block"));
    block.insert("style".into(), json!(style_name(paragraph.style)));
    if let ParagraphStyle::ListItem(kind) = paragraph.style {
        let list = match kind {
            ListKind::Ordered => "number",
            ListKind::Unordered => "bullet",
        };
        block.insert("listItem".into(), json!(list));
        block.insert("level".into(), json!(1));
    }
    block.insert("markDefs".into(), Value::Array(mark_defs));
    block.insert("children".into(), Value::Array(children));
    Value::Object(block)
}

/// Key for a link mark, creating the markDef on first appearance.
fn link_key(
    href: &str,
    new_tab: bool,
    seen: &mut Vec<(String, bool, String)>,
    mark_defs: &mut Vec<Value>,
) -> String {
    if let Some((_, _, key)) = seen
        .iter()
        .find(|(h, t, _)| h == href && *t == new_tab)
    {
        return key.clone();
    }
    let key = format!("link-{}", seen.len());
    mark_defs.push(json!({
        "_key": key,
        "_type": "link",
        "href": href,
        "blank": new_tab,
    }));
    seen.push((href.to_string(), new_tab, key.clone()));
    key
}

fn style_name(style: ParagraphStyle) -> &'static str {
    match style {
        ParagraphStyle::Normal | ParagraphStyle::ListItem(_) => "normal",
        ParagraphStyle::Heading1 => "h1",
        ParagraphStyle::Heading2 => "h2",
        ParagraphStyle::Heading3 => "h3",
        ParagraphStyle::Heading4 => "h4",
        ParagraphStyle::Blockquote => "blockquote",
    }
}

fn image_to_value(image: &Image) -> Value {
    let mut block = Map::new();
    block.insert("_type".into(), json!("image"));
    block.insert(
        "asset".into(),
        json!({ "_type": "reference", "_ref": image.asset_ref }),
    );
    if !image.alt_text.is_empty() {
        block.insert("alt".into(), json!(image.alt_text));
    }
    if let Some(caption) = &image.caption {
        block.insert("caption".into(), json!(caption));
    }
    if let Some(width) = image.width {
        block.insert("width".into(), json!(width));
    }
    if let Some(height) = image.height {
        block.insert("height".into(), json!(height));
    }
    if let Some(alignment) = &image.alignment {
        block.insert("alignment".into(), json!(alignment));
    }
    Value::Object(block)
}

fn embed_to_value(embed: &Embed) -> Value {
    let mut block = Map::new();
    block.insert("_type".into(), json!("embed"));
    block.insert("platform".into(), json!(embed.platform.as_str()));
    block.insert("url".into(), json!(embed.url));
    if let Some(id) = &embed.media_id {
        block.insert("embedId".into(), json!(id));
    }
    if let Some(caption) = &embed.caption {
        block.insert("caption".into(), json!(caption));
    }
    Value::Object(block)
}

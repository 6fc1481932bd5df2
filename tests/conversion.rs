//! End-to-end conversion properties.
//!
//! Every test runs the full pipeline — normalize, parse, compile — through
//! the public API with deterministic in-memory resolvers, so nothing here
//! touches the network.

use portage::{
    Attachment, Block, Conversion, ListKind, Mark, Paragraph, ParagraphStyle, Platform, Resolvers,
    convert,
};

/// Asset resolver used throughout: anything under the legacy host resolves
/// to a reference derived from its file name.
fn resolve_asset(url: &str) -> Option<String> {
    url.starts_with("https://legacy.example.com/")
        .then(|| format!("image-{}", url.rsplit('/').next().unwrap()))
}

fn resolve_attachment(id: u64) -> Option<Attachment> {
    [4u64, 15].contains(&id).then(|| Attachment {
        url: format!("https://legacy.example.com/attachment-{id}.jpg"),
    })
}

fn run(input: &str) -> Conversion {
    let assets = |url: &str| resolve_asset(url);
    let attachments = |id: u64| resolve_attachment(id);
    let resolvers = Resolvers::new(&assets, &attachments);
    convert(input, &resolvers)
}

fn paragraphs(conversion: &Conversion) -> Vec<&Paragraph> {
    conversion
        .document
        .blocks
        .iter()
        .filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
        .collect()
}

#[test]
fn plain_text_loses_nothing() {
    let conversion = run("Just a plain sentence with no markup at all.");
    assert_eq!(conversion.document.blocks.len(), 1);
    let paragraphs = paragraphs(&conversion);
    assert_eq!(paragraphs[0].text(), "Just a plain sentence with no markup at all.");
    assert!(conversion.report.is_clean());
}

#[test]
fn mixed_inline_runs_stay_one_paragraph() {
    let conversion = run(
        "Start <em>emphasis</em> middle <strong>strong</strong> and \
         <a href=\"https://example.com\" target=\"_blank\">a link</a> end.",
    );
    assert_eq!(conversion.document.blocks.len(), 1);
    let p = &paragraphs(&conversion)[0];
    assert_eq!(p.text(), "Start emphasis middle strong and a link end.");
    assert!(p.spans.iter().any(|s| s.marks.contains(&Mark::Em)));
    assert!(p.spans.iter().any(|s| {
        s.marks.iter().any(|m| matches!(m, Mark::Link { href, new_tab: true } if href == "https://example.com"))
    }));
}

#[test]
fn caption_idiom_merges_into_one_image_block() {
    let conversion = run(
        "<p>[caption id=\"attachment_3\" align=\"alignleft\" width=\"640\"]\
         <img src=\"https://legacy.example.com/photo.jpg\" alt=\"A photo\" /> \
         Taken at dawn[/caption]</p>",
    );
    assert_eq!(conversion.document.blocks.len(), 1);
    match &conversion.document.blocks[0] {
        Block::Image(image) => {
            assert_eq!(image.asset_ref, "image-photo.jpg");
            assert_eq!(image.alt_text, "A photo");
            assert_eq!(image.caption.as_deref(), Some("Taken at dawn"));
            assert_eq!(image.width, Some(640));
            assert_eq!(image.alignment.as_deref(), Some("left"));
        }
        other => panic!("expected image block, got {:?}", other),
    }
    // The caption text must not also appear as a paragraph.
    assert!(paragraphs(&conversion).is_empty());
}

#[test]
fn paragraph_wrapped_caption_parts_still_merge() {
    let conversion = run(
        "[caption align=\"aligncenter\" width=\"300\"]</p>\n\
         <p><img src=\"https://legacy.example.com/b.jpg\" /></p>\n\
         <p>Wrapped caption[/caption]",
    );
    let images: Vec<_> = conversion
        .document
        .blocks
        .iter()
        .filter(|b| matches!(b, Block::Image(_)))
        .collect();
    assert_eq!(images.len(), 1);
    assert!(paragraphs(&conversion).is_empty());
}

#[test]
fn empty_paragraphs_between_content_are_stripped() {
    let conversion = run("<p>one</p><p>&nbsp;</p><p><br></p><p> \u{a0} </p><p>two</p>");
    let paragraphs = paragraphs(&conversion);
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[0].text(), "one");
    assert_eq!(paragraphs[1].text(), "two");
}

#[test]
fn nbsp_padding_inside_real_content_survives() {
    let conversion = run("<p>before\u{a0}after&nbsp;end</p>");
    let paragraphs = paragraphs(&conversion);
    assert_eq!(paragraphs[0].text(), "before\u{a0}after\u{a0}end");
}

#[test]
fn gallery_yields_resolved_images_in_order() {
    let conversion = run("[gallery ids=\"4,8,15\"]");
    let refs: Vec<&str> = conversion
        .document
        .blocks
        .iter()
        .filter_map(|b| match b {
            Block::Image(image) => Some(image.asset_ref.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(refs, vec!["image-attachment-4.jpg", "image-attachment-15.jpg"]);
    assert_eq!(conversion.report.gallery_items_skipped, 1);
}

#[test]
fn script_embed_idiom_compiles_to_one_buzzsprout_embed() {
    let canonical = "https://www.buzzsprout.com/293/1234567?client_source=small_player&iframe=true";
    let variants = [
        // Container plus script, entity-encoded ampersand.
        "<div id=\"buzzsprout-player-1234567\"></div>\n\
         <script src=\"https://www.buzzsprout.com/293/1234567-episode.js?container_id=buzzsprout-player-1234567&amp;player=small\" type=\"text/javascript\"></script>",
        // No container, raw ampersand.
        "<script src=\"https://www.buzzsprout.com/293/1234567-episode.js?container_id=buzzsprout-player-1234567&player=small\"></script>",
        // episodes/ infix path variant.
        "<script src=\"https://www.buzzsprout.com/293/episodes/1234567.js?player=small\"></script>",
    ];
    for input in variants {
        let conversion = run(input);
        assert_eq!(conversion.document.blocks.len(), 1, "input: {input}");
        match &conversion.document.blocks[0] {
            Block::Embed(embed) => {
                assert_eq!(embed.platform, Platform::Buzzsprout);
                assert_eq!(embed.url, canonical);
                assert_eq!(embed.media_id.as_deref(), Some("293/1234567"));
            }
            other => panic!("expected embed block, got {:?}", other),
        }
    }
}

#[test]
fn bare_platform_url_on_its_own_line_embeds() {
    let conversion = run("intro text\nhttps://youtu.be/abc123\nclosing text");
    assert_eq!(conversion.document.blocks.len(), 3);
    match &conversion.document.blocks[1] {
        Block::Embed(embed) => {
            assert_eq!(embed.platform, Platform::Youtube);
            assert_eq!(embed.url, "https://www.youtube.com/embed/abc123");
        }
        other => panic!("expected embed block, got {:?}", other),
    }
}

#[test]
fn in_sentence_urls_stay_text() {
    let conversion = run("<p>watch https://youtu.be/abc123 later</p>");
    assert_eq!(conversion.document.blocks.len(), 1);
    assert_eq!(paragraphs(&conversion)[0].text(), "watch https://youtu.be/abc123 later");
}

#[test]
fn embed_shortcode_with_unknown_platform_is_dropped_silently() {
    let conversion = run("<p>keep</p>[embed]https://unknown.example.org/clip[/embed]");
    assert_eq!(conversion.document.blocks.len(), 1);
    assert_eq!(conversion.report.embeds_skipped, 1);
    // The raw URL must not leak into the document text.
    assert!(!paragraphs(&conversion)[0].text().contains("unknown.example.org"));
}

#[test]
fn heading_list_and_quote_styles_come_through() {
    let conversion = run(
        "<h2>Title</h2>\
         <blockquote>Quoted words</blockquote>\
         <ul><li>first</li><li>second</li></ul>",
    );
    let paragraphs = paragraphs(&conversion);
    assert_eq!(paragraphs[0].style, ParagraphStyle::Heading2);
    assert_eq!(paragraphs[1].style, ParagraphStyle::Blockquote);
    assert_eq!(paragraphs[2].style, ParagraphStyle::ListItem(ListKind::Unordered));
    assert_eq!(paragraphs[3].style, ParagraphStyle::ListItem(ListKind::Unordered));
}

#[test]
fn dash_paragraph_becomes_horizontal_rule() {
    let conversion = run("<p>above</p><p>---</p><p>below</p>");
    assert!(matches!(conversion.document.blocks[1], Block::HorizontalRule));
}

#[test]
fn empty_input_yields_one_empty_paragraph() {
    for input in ["", "   \n ", "<p>&nbsp;</p>", "<div><br></div>"] {
        let conversion = run(input);
        assert_eq!(conversion.document.blocks.len(), 1, "input: {input:?}");
        let paragraphs = paragraphs(&conversion);
        assert_eq!(paragraphs[0].text(), "");
    }
}

#[test]
fn malformed_markup_never_loses_text() {
    let conversion = run("start <div><b>bold</i> tail");
    let all_text: String = paragraphs(&conversion)
        .iter()
        .map(|p| p.text())
        .collect::<Vec<_>>()
        .join(" ");
    assert!(all_text.contains("start"));
    assert!(all_text.contains("bold"));
    assert!(all_text.contains("tail"));
}

#[test]
fn normalization_is_idempotent_end_to_end() {
    let input = "<p>[caption width=\"10\"]<img src=\"https://legacy.example.com/x.jpg\"/>cap[/caption]</p>\
                 [gallery ids=\"4\"]\n[embed]https://vimeo.com/55555[/embed]\nhttps://youtu.be/zzz\n";
    let once = portage::normalize(input);
    similar_asserts::assert_eq!(once, portage::normalize(&once));
}

#[test]
fn serialization_matches_the_consumer_shape() {
    let conversion = run("<p>go <a href=\"https://example.com\">there</a></p>");
    let value = conversion.document.to_portable();
    let block = &value[0];
    assert_eq!(block["_type"], "block");
    assert_eq!(block["style"], "normal");
    assert_eq!(block["markDefs"][0]["_type"], "link");
    assert_eq!(block["markDefs"][0]["href"], "https://example.com");
    let key = block["markDefs"][0]["_key"].as_str().unwrap();
    let linked = block["children"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["text"] == "there")
        .unwrap();
    assert_eq!(linked["marks"][0].as_str().unwrap(), key);
}

#[test]
fn blocks_come_out_in_input_order() {
    let conversion = run(
        "<h3>Header</h3>\n<p>prose</p>\n[gallery ids=\"4\"]\n<p>more prose</p>\nhttps://youtu.be/tail9\n",
    );
    let kinds: Vec<&str> = conversion
        .document
        .blocks
        .iter()
        .map(|b| match b {
            Block::Paragraph(_) => "paragraph",
            Block::Image(_) => "image",
            Block::Embed(_) => "embed",
            Block::HorizontalRule => "rule",
        })
        .collect();
    assert_eq!(kinds, vec!["paragraph", "paragraph", "image", "paragraph", "embed"]);
}

//! Shortcode and script-embed normalization.
//!
//! A pure text-to-text pass applied before the markup tree is built. Legacy
//! embed idioms (bracketed shortcodes, bare platform URLs, host-specific
//! script tags) are rewritten into uniform placeholder elements the compiler
//! can consume. Malformed idioms are left untouched as literal text, and each
//! pass is idempotent: normalizing already-normalized content is a no-op.

mod captions;
mod embeds;
mod galleries;
mod scripts;

/// The canonical placeholder for a detected embed. It exists only between
/// the normalizer and the tree compiler and never appears in a document.
pub(crate) fn placeholder(url: &str) -> String {
    format!("<oembed url=\"{url}\"></oembed>")
}

/// Rewrite all legacy embed idioms in `raw` into canonical placeholders.
///
/// Passes run in a fixed order: caption shortcodes, gallery shortcodes,
/// `[embed]` shortcodes, bare platform URLs on their own line, then
/// script-tag embeds.
pub fn normalize(raw: &str) -> String {
    let out = captions::rewrite(raw);
    let out = galleries::rewrite(&out);
    let out = embeds::rewrite_shortcodes(&out);
    let out = embeds::rewrite_bare_urls(&out);
    scripts::rewrite(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        let input = "Nothing to see here.\n\nJust paragraphs.";
        assert_eq!(normalize(input), input);
    }

    #[test]
    fn normalization_is_idempotent_across_all_idioms() {
        let input = concat!(
            "[caption id=\"attachment_9\" align=\"alignright\" width=\"300\"]",
            "<img src=\"https://legacy.example.com/a.jpg\" alt=\"a\" /> A caption[/caption]\n",
            "[gallery ids=\"4,8,15\"]\n",
            "[embed]https://vimeo.com/55555[/embed]\n",
            "https://youtu.be/abc123\n",
            "<div id=\"buzzsprout-player-777\"></div>\n",
            "<script src=\"https://www.buzzsprout.com/11/777-x.js?container_id=buzzsprout-player-777&amp;player=small\" type=\"text/javascript\" charset=\"utf-8\"></script>\n",
        );
        let once = normalize(input);
        let twice = normalize(&once);
        similar_asserts::assert_eq!(once, twice);
    }

    #[test]
    fn malformed_shortcodes_are_left_alone() {
        let input = "[caption id=\"1\"]no image here[/caption] and [gallery] and [embed]not a url[/embed]";
        assert_eq!(normalize(input), input);
    }

    #[test]
    fn in_paragraph_links_are_not_placeholders() {
        let input = "<p>Watch https://youtu.be/abc123 tonight</p>";
        assert_eq!(normalize(input), input);
    }
}

//! Embed shortcodes and bare platform URLs.

use std::sync::LazyLock;

use regex::Regex;

use crate::platform;

use super::placeholder;

static EMBED_SHORTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\[embed[^\]]*\]\s*(https?://[^\s\[\]<>"]+)\s*\[/embed\]"#).unwrap()
});

/// `[embed]URL[/embed]` wraps a bare URL; anything else inside the brackets
/// is not an embed shortcode and stays literal.
pub(super) fn rewrite_shortcodes(input: &str) -> String {
    EMBED_SHORTCODE
        .replace_all(input, |caps: &regex::Captures| placeholder(&caps[1]))
        .into_owned()
}

/// A URL with only whitespace or a paragraph wrapper around it on its line.
/// Requiring the line boundary keeps in-paragraph hyperlinks from turning
/// into embeds.
static BARE_URL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^(\s*(?:<p[^>]*>\s*)?)(https?://[^\s<>"]+)(\s*(?:</p>)?\s*)$"#).unwrap()
});

pub(super) fn rewrite_bare_urls(input: &str) -> String {
    BARE_URL_LINE
        .replace_all(input, |caps: &regex::Captures| {
            let url = &caps[2];
            if platform::resolve(url).is_known() {
                log::debug!("isolated platform URL rewritten to placeholder: {}", url);
                format!("{}{}{}", &caps[1], placeholder(url), &caps[3])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

//! The bracketed caption idiom.
//!
//! `[caption id=".." align=".." width=".."]<img ../> trailing text[/caption]`
//! becomes a single marker figure wrapping the image and a `<figcaption>`,
//! with the width and alignment copied onto the figure. The three parts may
//! each be wrapped in a paragraph tag; anything less recognizable is left as
//! literal text.

use std::sync::LazyLock;

use regex::Regex;

static CAPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[caption\b([^\]]*)\](.*?)\[/caption\]").unwrap());

static BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(.*?)(<img\b[^>]*>)(.*)$").unwrap());

/// Whitespace and paragraph-wrapper tags, the only things allowed before the
/// image inside a caption body.
static LEADING_WRAPPERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:\s|</?p[^>]*>)*$").unwrap());

static EDGE_WRAPPERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:</?p[^>]*>\s*)+|(?:\s*</?p[^>]*>)+\s*$").unwrap());

pub(super) fn rewrite(input: &str) -> String {
    CAPTION
        .replace_all(input, |caps: &regex::Captures| {
            match rewrite_one(&caps[1], &caps[2]) {
                Some(figure) => figure,
                None => {
                    log::debug!("leaving malformed caption shortcode untouched");
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

fn rewrite_one(attrs: &str, body: &str) -> Option<String> {
    let body_caps = BODY.captures(body)?;
    if !LEADING_WRAPPERS.is_match(&body_caps[1]) {
        return None;
    }
    let img = &body_caps[2];
    let caption = EDGE_WRAPPERS.replace_all(&body_caps[3], "");
    let caption = caption.trim();

    let mut figure = String::from("<figure data-caption-marker");
    if let Some(align) = shortcode_attr(attrs, "align") {
        figure.push_str(&format!(" data-align=\"{align}\""));
    }
    if let Some(width) = shortcode_attr(attrs, "width") {
        figure.push_str(&format!(" data-width=\"{width}\""));
    }
    figure.push('>');
    figure.push_str(img);
    if !caption.is_empty() {
        figure.push_str(&format!("<figcaption>{caption}</figcaption>"));
    }
    figure.push_str("</figure>");
    Some(figure)
}

/// A `name="value"` or `name=value` attribute inside the shortcode's opening
/// bracket.
pub(super) fn shortcode_attr(attrs: &str, name: &str) -> Option<String> {
    static QUOTED: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"(\w+)\s*=\s*(?:"([^"]*)"|(\S+))"#).unwrap());
    QUOTED.captures_iter(attrs).find_map(|caps| {
        if &caps[1] != name {
            return None;
        }
        caps.get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().to_string())
    })
}

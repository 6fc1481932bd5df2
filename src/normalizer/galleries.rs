//! The gallery shortcode.
//!
//! `[gallery ids="4,8,15"]` expands to one marker figure per identifier, in
//! the given order. Whether an identifier resolves to an attachment is not
//! this pass's concern; the compiler reports and skips unresolvable ones.

use std::sync::LazyLock;

use regex::Regex;

use super::captions::shortcode_attr;

static GALLERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[gallery\b([^\]]*)\]").unwrap());

pub(super) fn rewrite(input: &str) -> String {
    GALLERY
        .replace_all(input, |caps: &regex::Captures| {
            match expand(&caps[1]) {
                Some(figures) => figures,
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn expand(attrs: &str) -> Option<String> {
    let ids = shortcode_attr(attrs, "ids")?;
    let items: Vec<String> = ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
        .map(|id| format!("<figure class=\"gallery-image\" data-id=\"{id}\"></figure>"))
        .collect();
    if items.is_empty() {
        return None;
    }
    log::debug!("expanded gallery shortcode into {} figures", items.len());
    Some(items.concat())
}

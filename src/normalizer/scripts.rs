//! The script-tag embed idiom.
//!
//! Podcast episodes were embedded as a numbered container div followed by a
//! loader script whose `src` carries the show/episode pair and the playback
//! size. Both elements collapse into one placeholder whose URL is the fixed
//! canonical player form. The container is optional, the `src` may use an
//! `episodes/` infix and entity-encoded ampersands, and any trailing slug is
//! dropped.

use std::sync::LazyLock;

use regex::Regex;

use crate::platform::{self, Platform};

use super::placeholder;

static SCRIPT_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?is)(?:<div[^>]*\bid\s*=\s*"buzzsprout-player-\d+"[^>]*>\s*(?:</div>\s*)?)?"#,
        r#"<script[^>]*\bsrc\s*=\s*"([^"]*buzzsprout\.com[^"]*)"[^>]*>[^<]*</script>"#,
    ))
    .unwrap()
});

pub(super) fn rewrite(input: &str) -> String {
    SCRIPT_EMBED
        .replace_all(input, |caps: &regex::Captures| {
            let src = html_escape::decode_html_entities(&caps[1]);
            let resolution = platform::resolve(&src);
            match (resolution.platform, resolution.canonical_url) {
                (Platform::Buzzsprout, Some(canonical)) => {
                    log::debug!("script embed canonicalized to {}", canonical);
                    placeholder(&canonical)
                }
                _ => {
                    log::debug!("unrecognized player script left untouched: {}", src);
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str =
        "<oembed url=\"https://www.buzzsprout.com/293/1234567?client_source=small_player&iframe=true\"></oembed>";

    #[test]
    fn container_and_script_collapse_to_one_placeholder() {
        let input = concat!(
            "<div id=\"buzzsprout-player-1234567\"></div>\n",
            "<script src=\"https://www.buzzsprout.com/293/1234567-episode-title.js?",
            "container_id=buzzsprout-player-1234567&player=small\" type=\"text/javascript\" charset=\"utf-8\"></script>"
        );
        similar_asserts::assert_eq!(rewrite(input), CANONICAL);
    }

    #[test]
    fn entity_encoded_ampersand_is_tolerated() {
        let input = concat!(
            "<script src=\"https://www.buzzsprout.com/293/1234567-title.js?",
            "container_id=buzzsprout-player-1234567&amp;player=small\"></script>"
        );
        similar_asserts::assert_eq!(rewrite(input), CANONICAL);
    }

    #[test]
    fn episodes_infix_path_is_tolerated() {
        let input = concat!(
            "<script src=\"https://www.buzzsprout.com/293/episodes/1234567-title.js?",
            "player=small\"></script>"
        );
        similar_asserts::assert_eq!(rewrite(input), CANONICAL);
    }

    #[test]
    fn missing_container_is_tolerated() {
        let input =
            "<script src=\"https://www.buzzsprout.com/293/1234567.js?player=large\"></script>";
        similar_asserts::assert_eq!(
            rewrite(input),
            "<oembed url=\"https://www.buzzsprout.com/293/1234567?client_source=large_player&iframe=true\"></oembed>"
        );
    }

    #[test]
    fn unrelated_scripts_are_untouched() {
        let input = "<script src=\"https://cdn.example.com/analytics.js\"></script>";
        assert_eq!(rewrite(input), input);
    }
}

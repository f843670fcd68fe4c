use regex::Regex;
use std::sync::LazyLock;

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:ftp|git|https?)://(?:\w+:?\w*@)?\S+").expect("link pattern is valid")
});

/// Pull candidate urls out of a chat message, in order of appearance.
///
/// Duplicates are kept. No normalization happens here: the url is stored
/// exactly as typed, trailing punctuation included.
pub fn extract_links(text: &str) -> Vec<String> {
    LINK_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

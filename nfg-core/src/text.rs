//! Small text normalizers shared by the admin forms and the CLI.

use regex::Regex;
use std::sync::LazyLock;

static NON_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

static LIST_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\n,]+").unwrap());

static YOUTUBE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtu\.be/|youtube\.com/(?:watch\?v=|embed/|shorts/))?([A-Za-z0-9_-]{11})")
        .unwrap()
});

/// Lowercase `text` and collapse every run of non `[a-z0-9]` characters into
/// a single dash, trimming dashes at both ends.
pub fn slugify(text: &str) -> String {
    NON_SLUG
        .replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Split a free-form list typed into a textarea. Commas and newlines both
/// separate entries; blank entries are dropped.
pub fn split_list(text: &str) -> Vec<String> {
    LIST_SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pull the 11-character video id out of a YouTube URL.
///
/// Accepts `youtu.be/<id>`, `youtube.com/watch?v=<id>`, `/embed/<id>`,
/// `/shorts/<id>` or a bare id. Anything unrecognised is returned trimmed,
/// so an admin can still paste an id in an unusual shape.
pub fn extract_youtube_id(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }

    match YOUTUBE_ID.captures(value).and_then(|caps| caps.get(1)) {
        Some(id) => Some(id.as_str().to_string()),
        None => Some(value.to_string()),
    }
}

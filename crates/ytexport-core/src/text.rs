//! Text and video ID normalization

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Zero-width and directional format characters.
static INVISIBLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{200B}-\u{200F}\u{FEFF}]").expect("valid regex"));

static UNSAFE_NAME_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid regex"));

/// YouTube video IDs are 11 characters of base64url. The final character
/// only carries 4 significant bits, so it is one of 16 values.
static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_-]{10}[AEIMQUYcgkosw048]").expect("valid regex"));

/// Strip invisible characters, map NBSP and ONE DOT LEADER to ASCII, trim.
///
/// Replacement happens before trimming so the result is stable under a second
/// pass.
pub fn clean_text(s: Option<&str>) -> String {
    let Some(s) = s else {
        return String::new();
    };
    let replaced = s.replace('\u{00A0}', " ").replace('\u{2024}', ".");
    INVISIBLE.replace_all(&replaced, "").trim().to_string()
}

/// Keep only the ASCII digits of `val`.
pub fn to_int_string(val: Option<&str>) -> String {
    val.map(|v| v.chars().filter(|c| c.is_ascii_digit()).collect())
        .unwrap_or_default()
}

/// Digit-only coercion to an integer; anything unparseable is zero.
pub fn to_int(val: Option<&str>) -> u64 {
    to_int_string(val).parse().unwrap_or(0)
}

/// Collapse runs of characters outside `[A-Za-z0-9._-]` into `_` and trim
/// underscores from both ends. May return an empty string.
pub fn sanitize_name(name: &str) -> String {
    UNSAFE_NAME_RUN
        .replace_all(name, "_")
        .trim_matches('_')
        .to_string()
}

/// First 11-character video ID found anywhere in `text`.
pub fn extract_video_id(text: &str) -> Option<&str> {
    VIDEO_ID.find(text).map(|m| m.as_str())
}

/// One ID per line: blank and `#` lines are skipped, the first match on a
/// line wins, lines without a match are dropped.
pub fn parse_ids(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(extract_video_id)
        .map(String::from)
        .collect()
}

pub fn read_ids_file(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_ids(&content))
}

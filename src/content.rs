//! Text helpers shared by the post editor, the quality checker and the link suggester.

use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

pub const WORDS_PER_MINUTE: usize = 200;

/// slugify
///
/// Lowercases the text and collapses every run of characters outside `[a-z0-9]` into a
/// single `-`, trimming the dash at either end. "10 Tips: Sleep Better!" → "10-tips-sleep-better".
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let dashed = NON_SLUG_RE.replace_all(&lowered, "-");
    let trimmed = dashed.strip_prefix('-').unwrap_or(&dashed);
    trimmed.strip_suffix('-').unwrap_or(trimmed).to_string()
}

/// Removes anything that looks like an HTML tag. Entities are left alone.
pub fn strip_html(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Whitespace-separated words of the tag-stripped text.
pub fn word_count(text: &str) -> usize {
    strip_html(text).split_whitespace().count()
}

/// Estimated reading time in whole minutes, never less than one.
pub fn reading_time_minutes(text: &str) -> i32 {
    let minutes = word_count(text).div_ceil(WORDS_PER_MINUTE).max(1);
    i32::try_from(minutes).unwrap_or(i32::MAX)
}

/// Public path of a post.
pub fn post_path(slug: &str) -> String {
    format!("/blog/{}", slug)
}

/// Anchor markup the editor appends to content when inserting an internal link.
pub fn related_link_html(title: &str, slug: &str) -> String {
    format!("<a href=\"{}\">{}</a>", post_path(slug), escape_html(title))
}

/// Minimal escaping for text placed into HTML or XML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

//! Content-quality scorer.
//!
//! A pure heuristic over the editor fields: a Flesch reading-ease approximation, a handful of
//! SEO length/keyword checks, and health-content compliance checks (disclaimer, sources,
//! reviewer). The same function backs the live preview and the stored per-post score.

use crate::{
    content::strip_html,
    models::{IssueKind, QualityIssue, QualityReport},
};
use regex::Regex;
use std::sync::LazyLock;

static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));
static VOWEL_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[aeiouy]+").expect("valid vowel regex"));

pub const MIN_WORDS: usize = 300;
pub const RECOMMENDED_WORDS: usize = 800;
pub const MAX_TITLE_CHARS: usize = 60;
pub const MAX_DESCRIPTION_CHARS: usize = 160;

const DISCLAIMER_MARKERS: [&str; 3] = ["disclaimer", "medical advice", "consult"];
const SOURCE_MARKERS: [&str; 4] = ["source", "reference", "study", "research"];

/// QualityInput
///
/// Borrowed view of the fields the scorer reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityInput<'a> {
    pub content: &'a str,
    pub title: &'a str,
    pub excerpt: &'a str,
    pub seo_title: &'a str,
    pub seo_description: &'a str,
    pub has_reviewer: bool,
}

fn issue(kind: IssueKind, message: impl Into<String>) -> QualityIssue {
    QualityIssue {
        kind,
        message: message.into(),
    }
}

fn or_fallback<'a>(primary: &'a str, fallback: &'a str) -> &'a str {
    if primary.is_empty() { fallback } else { primary }
}

/// readability_score
///
/// Flesch reading ease, clamped to 0..=100 (higher reads easier). Syllables are
/// approximated by the number of segments left after splitting on vowel runs.
pub fn readability_score(text: &str) -> f64 {
    let plain = strip_html(text);

    let sentences = SENTENCE_RE
        .split(&plain)
        .filter(|piece| !piece.is_empty())
        .count()
        .max(1) as f64;
    let words = plain.split_whitespace().count().max(1) as f64;
    let syllables = VOWEL_RUN_RE.split(&plain).count() as f64;

    let score = 206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words);
    score.clamp(0.0, 100.0)
}

/// seo_score
///
/// Four checks worth up to 25 points each: title length, description length, a title
/// keyword (longer than four characters) repeated in the description, and whether the
/// dedicated SEO fields are filled in.
pub fn seo_score(title: &str, seo_title: &str, seo_description: &str, excerpt: &str) -> f64 {
    let mut score = 0.0;

    let effective_title = or_fallback(seo_title, title);
    let title_len = effective_title.chars().count();
    if (30..=60).contains(&title_len) {
        score += 25.0;
    } else if title_len >= 20 {
        score += 15.0;
    }

    let effective_desc = or_fallback(seo_description, excerpt);
    let desc_len = effective_desc.chars().count();
    if (120..=160).contains(&desc_len) {
        score += 25.0;
    } else if desc_len >= 80 {
        score += 15.0;
    }

    if !effective_title.is_empty() && !effective_desc.is_empty() {
        let desc_lower = effective_desc.to_lowercase();
        let title_lower = effective_title.to_lowercase();
        let keyword_hit = title_lower
            .split_whitespace()
            .any(|word| word.chars().count() > 4 && desc_lower.contains(word));
        if keyword_hit {
            score += 25.0;
        }
    }

    if !seo_title.is_empty() && !seo_description.is_empty() {
        score += 25.0;
    } else if !title.is_empty() && !excerpt.is_empty() {
        score += 15.0;
    }

    score
}

/// analyze
///
/// Scores the post and lists what the editor should fix. Each error costs 10 points and
/// each warning 5 from the overall score; info items are free.
pub fn analyze(input: &QualityInput<'_>) -> QualityReport {
    let plain = strip_html(input.content);
    let word_count = plain.split_whitespace().count();
    let mut issues = Vec::new();

    if word_count < MIN_WORDS {
        issues.push(issue(
            IssueKind::Error,
            format!(
                "Content is too short ({} words). Aim for at least {} words for SEO.",
                word_count, MIN_WORDS
            ),
        ));
    } else if word_count < RECOMMENDED_WORDS {
        issues.push(issue(
            IssueKind::Warning,
            format!(
                "Content is {} words. For health topics, 800-1500 words performs better.",
                word_count
            ),
        ));
    }

    if input.title.is_empty() {
        issues.push(issue(IssueKind::Error, "Title is required."));
    } else if input.title.chars().count() > MAX_TITLE_CHARS {
        issues.push(issue(
            IssueKind::Warning,
            "Title exceeds 60 characters and may be truncated in search results.",
        ));
    }

    let effective_desc = or_fallback(input.seo_description, input.excerpt);
    if effective_desc.is_empty() {
        issues.push(issue(
            IssueKind::Error,
            "Meta description is missing. Add an excerpt or SEO description.",
        ));
    } else if effective_desc.chars().count() > MAX_DESCRIPTION_CHARS {
        issues.push(issue(
            IssueKind::Warning,
            "Meta description exceeds 160 characters.",
        ));
    }

    let lowered = input.content.to_lowercase();

    let has_disclaimer = DISCLAIMER_MARKERS.iter().any(|m| lowered.contains(m));
    if !has_disclaimer {
        issues.push(issue(
            IssueKind::Warning,
            "No medical disclaimer detected in content. One will be auto-appended.",
        ));
    }

    let has_sources =
        SOURCE_MARKERS.iter().any(|m| lowered.contains(m)) || input.content.contains("http");
    if !has_sources {
        issues.push(issue(
            IssueKind::Warning,
            "No sources or references detected. Health content should cite sources.",
        ));
    }

    if !input.has_reviewer {
        issues.push(issue(
            IssueKind::Info,
            "No medical reviewer assigned. Consider adding one for credibility.",
        ));
    }

    let readability = readability_score(input.content);
    let seo = seo_score(
        input.title,
        input.seo_title,
        input.seo_description,
        input.excerpt,
    );

    let length_points = if word_count >= RECOMMENDED_WORDS {
        20.0
    } else if word_count >= MIN_WORDS {
        10.0
    } else {
        0.0
    };

    let errors = issues.iter().filter(|i| i.kind == IssueKind::Error).count() as f64;
    let warnings = issues.iter().filter(|i| i.kind == IssueKind::Warning).count() as f64;

    let overall = readability * 0.3
        + seo * 0.3
        + length_points
        + if has_disclaimer { 10.0 } else { 0.0 }
        + if has_sources { 10.0 } else { 0.0 }
        - errors * 10.0
        - warnings * 5.0;

    QualityReport {
        overall: overall.clamp(0.0, 100.0).round() as i32,
        readability: readability.round() as i32,
        seo: seo.round() as i32,
        word_count: i32::try_from(word_count).unwrap_or(i32::MAX),
        issues,
        has_disclaimer,
        has_sources,
        has_reviewer: input.has_reviewer,
    }
}

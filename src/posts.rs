//! Derivation of stored post rows from editor input.

use crate::{
    content::{reading_time_minutes, slugify},
    error::AppError,
    models::{BlogPost, PostDraft, PostStatus, UpsertPostRequest},
    related::unique_in_order,
    validation::validate_post,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// build_post_draft
///
/// Validates the request and derives slug, reading time and publication fields.
///
/// * `published` follows the status; `published_at` is set on first publication and kept
///   across every later edit, including a move back to draft, matching the publish toggle.
/// * `scheduled_at` is only kept for `scheduled` posts.
/// * On update (`existing` is set) the original author is preserved.
pub fn build_post_draft(
    req: UpsertPostRequest,
    editor_id: Uuid,
    existing: Option<&BlogPost>,
    now: DateTime<Utc>,
) -> Result<PostDraft, AppError> {
    validate_post(&req)?;

    let title = req.title.trim().to_string();
    let slug = slugify(&title);
    if slug.is_empty() {
        return Err(AppError::Validation(
            "Title must contain at least one letter or digit".to_string(),
        ));
    }

    let published = req.status == PostStatus::Published;
    let first_published_at = existing.and_then(|post| post.published_at);
    let published_at = if published {
        first_published_at.or(Some(now))
    } else {
        first_published_at
    };
    let scheduled_at = match req.status {
        PostStatus::Scheduled => req.scheduled_at,
        _ => None,
    };

    Ok(PostDraft {
        reading_time: reading_time_minutes(&req.content),
        title,
        slug,
        excerpt: non_empty(req.excerpt),
        content: req.content,
        featured_image: non_empty(req.featured_image),
        status: req.status,
        published,
        published_at,
        scheduled_at,
        seo_title: non_empty(req.seo_title),
        seo_description: non_empty(req.seo_description),
        author_id: existing.map(|post| post.author_id).unwrap_or(editor_id),
        reviewer_id: req.reviewer_id,
        category_ids: unique_in_order(req.category_ids, None),
        tag_ids: unique_in_order(req.tag_ids, None),
    })
}

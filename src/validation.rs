//! Input validation for dashboard and public forms.
//!
//! Every check returns the first failing rule as `AppError::Validation`, carrying the message
//! the dashboard shows to the editor.

use crate::{
    error::AppError,
    models::{
        CategoryRequest, DisclaimerRequest, PostStatus, PresignedUrlRequest, UpsertPostRequest,
    },
};
use regex::Regex;
use std::sync::LazyLock;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_EXCERPT_LEN: usize = 300;
pub const MAX_SEO_TITLE_LEN: usize = 60;
pub const MAX_SEO_DESCRIPTION_LEN: usize = 160;
pub const MAX_CATEGORY_NAME_LEN: usize = 100;
pub const MAX_TAG_NAME_LEN: usize = 50;
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Validation(message.into())
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// validate_post
///
/// Rules of the post editor form. An empty featured image is allowed; a non-empty one must
/// be an absolute URL.
pub fn validate_post(req: &UpsertPostRequest) -> Result<(), AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(invalid("Title is required"));
    }
    if char_len(title) > MAX_TITLE_LEN {
        return Err(invalid(format!("Title must be at most {} characters", MAX_TITLE_LEN)));
    }

    if let Some(excerpt) = &req.excerpt {
        if char_len(excerpt) > MAX_EXCERPT_LEN {
            return Err(invalid(format!(
                "Excerpt must be at most {} characters",
                MAX_EXCERPT_LEN
            )));
        }
    }

    if req.content.trim().is_empty() {
        return Err(invalid("Content is required"));
    }

    if let Some(image) = req.featured_image.as_deref().map(str::trim) {
        if !image.is_empty() && reqwest::Url::parse(image).is_err() {
            return Err(invalid("Invalid URL"));
        }
    }

    if let Some(seo_title) = &req.seo_title {
        if char_len(seo_title) > MAX_SEO_TITLE_LEN {
            return Err(invalid(format!(
                "SEO title must be at most {} characters",
                MAX_SEO_TITLE_LEN
            )));
        }
    }

    if let Some(seo_description) = &req.seo_description {
        if char_len(seo_description) > MAX_SEO_DESCRIPTION_LEN {
            return Err(invalid(format!(
                "SEO description must be at most {} characters",
                MAX_SEO_DESCRIPTION_LEN
            )));
        }
    }

    if req.status == PostStatus::Scheduled && req.scheduled_at.is_none() {
        return Err(invalid("Scheduled posts need a publish date"));
    }

    Ok(())
}

pub fn validate_category(req: &CategoryRequest) -> Result<(), AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(invalid("Category name is required"));
    }
    if char_len(name) > MAX_CATEGORY_NAME_LEN {
        return Err(invalid(format!(
            "Category name must be at most {} characters",
            MAX_CATEGORY_NAME_LEN
        )));
    }
    Ok(())
}

pub fn validate_tag_name(name: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid("Tag name is required"));
    }
    if char_len(name) > MAX_TAG_NAME_LEN {
        return Err(invalid(format!(
            "Tag name must be at most {} characters",
            MAX_TAG_NAME_LEN
        )));
    }
    Ok(())
}

pub fn validate_disclaimer(req: &DisclaimerRequest) -> Result<(), AppError> {
    if req.name.trim().is_empty() || req.content.trim().is_empty() {
        return Err(invalid("Name and content are required"));
    }
    Ok(())
}

/// Trims and lowercases the address after checking its shape.
pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(invalid("Please enter a valid email address"));
    }
    Ok(email)
}

pub fn validate_upload(req: &PresignedUrlRequest) -> Result<(), AppError> {
    if !ALLOWED_IMAGE_TYPES.contains(&req.file_type.as_str()) {
        return Err(invalid(
            "Invalid file type. Please upload JPEG, PNG, WebP, or GIF.",
        ));
    }
    if req.file_size > MAX_IMAGE_BYTES {
        return Err(invalid("File too large. Maximum size is 5MB."));
    }
    Ok(())
}

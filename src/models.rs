use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Row of the `profiles` table, resolved during authentication.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    // The RBAC field: 'admin' unlocks the dashboard.
    pub role: String,
}

/// PostStatus
///
/// Editorial lifecycle of a post. Mirrors the Postgres `post_status` enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, sqlx::Type, Default,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "post_status", rename_all = "snake_case")]
pub enum PostStatus {
    #[default]
    Draft,
    EditorReview,
    Scheduled,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::EditorReview => "editor_review",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
        }
    }
}

/// BlogPost
///
/// Row of the `blog_posts` table. `published` and `status` move together except while a
/// scheduled post waits for the sweep (`status = scheduled`, `published = false`).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image: Option<String>,
    pub status: PostStatus,
    pub published: bool,
    #[ts(type = "string | null")]
    pub published_at: Option<DateTime<Utc>>,
    #[ts(type = "string | null")]
    pub scheduled_at: Option<DateTime<Utc>>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    // Minutes, derived from the content at save time.
    pub reading_time: i32,
    pub author_id: Uuid,
    // Medical reviewer, surfaced by the quality checker.
    pub reviewer_id: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Disclaimer
///
/// Versioned legal text rendered around post content. Every edit bumps `version`;
/// readers always get the highest active version for a given `name`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Disclaimer {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    pub is_active: bool,
    pub version: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct NewsletterSubscriber {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    #[ts(type = "string")]
    pub subscribed_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// ActivityLog
///
/// Row of `admin_activity_logs`. `details` is free-form JSON (e.g. `{"title": ...}`).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// NewActivityLog
///
/// Insert payload for the activity log. Internal only.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivityLog {
    pub user_id: Uuid,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
}

impl NewActivityLog {
    pub fn new(user_id: Uuid, action: &str, entity_type: &str, entity_id: Option<Uuid>) -> Self {
        Self {
            user_id,
            action: action.to_string(),
            entity_type: Some(entity_type.to_string()),
            entity_id,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

// --- Content Quality ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Error,
    Warning,
    Info,
}

/// QualityIssue
///
/// One finding of the content-quality checker. Serialized as `{"type": ..., "message": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct QualityIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
}

/// QualityReport
///
/// Output of `quality::analyze`. All scores are 0..=100 integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct QualityReport {
    pub overall: i32,
    pub readability: i32,
    pub seo: i32,
    pub word_count: i32,
    pub issues: Vec<QualityIssue>,
    pub has_disclaimer: bool,
    pub has_sources: bool,
    pub has_reviewer: bool,
}

/// ContentQualityScore
///
/// Persisted quality report, one row per post (`content_quality_scores`).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct ContentQualityScore {
    pub post_id: Uuid,
    pub overall_score: i32,
    pub readability_score: i32,
    pub seo_score: i32,
    pub word_count: i32,
    pub has_disclaimer: bool,
    pub has_sources: bool,
    pub has_reviewer: bool,
    #[sqlx(json)]
    pub issues: Vec<QualityIssue>,
    #[ts(type = "string")]
    pub checked_at: DateTime<Utc>,
}

/// QualityCheckRequest
///
/// Ad-hoc quality check of unsaved editor contents (POST /admin/quality/preview).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct QualityCheckRequest {
    pub content: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub seo_title: String,
    #[serde(default)]
    pub seo_description: String,
    #[serde(default)]
    pub reviewer_id: Option<Uuid>,
}

// --- Related Posts ---

/// RelatedPost
///
/// Minimal published-post projection used for internal-link suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct RelatedPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
}

/// RelatedSuggestion
///
/// A related post plus the ready-to-insert anchor markup for the editor.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RelatedSuggestion {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub path: String,
    pub link_html: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RelatedPostsRequest {
    #[serde(default)]
    pub post_id: Option<Uuid>,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

// --- Request Payloads (Input Schemas) ---

/// UpsertPostRequest
///
/// Body of POST /admin/posts and PUT /admin/posts/{id}. Slug, reading time and
/// publication timestamps are derived server-side.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpsertPostRequest {
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub content: String,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
    #[serde(default)]
    pub reviewer_id: Option<Uuid>,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

/// PostDraft
///
/// A validated, fully derived post row ready for insert or update. Internal only.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image: Option<String>,
    pub status: PostStatus,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub reading_time: i32,
    pub author_id: Uuid,
    pub reviewer_id: Option<Uuid>,
    pub category_ids: Vec<Uuid>,
    pub tag_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Publish,
    Unpublish,
    Delete,
}

impl BulkAction {
    /// Activity-log action name.
    pub fn log_action(&self) -> &'static str {
        match self {
            BulkAction::Publish => "bulk_publish",
            BulkAction::Unpublish => "bulk_unpublish",
            BulkAction::Delete => "bulk_delete",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct BulkPostRequest {
    pub ids: Vec<Uuid>,
    pub action: BulkAction,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct BulkPostResponse {
    pub affected: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateTagRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DisclaimerRequest {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SubscribeRequest {
    pub email: String,
}

/// PresignedUrlRequest
///
/// Input payload for requesting a short-lived upload URL for a post image.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, TS, Default)]
#[ts(export)]
pub struct PresignedUrlRequest {
    /// The original filename, used to derive the file extension.
    #[schema(example = "hero.webp")]
    pub filename: String,
    /// The MIME type; the signed URL only accepts this Content-Type.
    #[schema(example = "image/webp")]
    pub file_type: String,
    /// Declared size in bytes, checked against the 5 MiB limit.
    pub file_size: u64,
}

/// PresignedUrlResponse
///
/// The time-limited PUT URL plus where the object will be readable once uploaded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS, Default)]
#[ts(export)]
pub struct PresignedUrlResponse {
    pub upload_url: String,
    pub resource_key: String,
    pub public_url: String,
}

// --- Composite Responses ---

/// PostDetail
///
/// Public article payload: the post, its taxonomy and the disclaimer to render around it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PostDetail {
    pub post: BlogPost,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
    pub disclaimer: Option<Disclaimer>,
}

/// AdminPostDetail
///
/// Editor payload: the post in any status with the ids of its selected categories and tags.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AdminPostDetail {
    pub post: BlogPost,
    pub category_ids: Vec<Uuid>,
    pub tag_ids: Vec<Uuid>,
    pub quality: Option<ContentQualityScore>,
}

/// MediaFile
///
/// An image stored under the `posts/` prefix of the bucket.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MediaFile {
    pub name: String,
    pub key: String,
    pub url: String,
    pub size: i64,
    #[ts(type = "string | null")]
    pub created_at: Option<DateTime<Utc>>,
}

/// SitemapPost
///
/// The three columns sitemap generation needs from a published post.
#[derive(Debug, Clone, FromRow, Default)]
pub struct SitemapPost {
    pub slug: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
}

// --- Scheduled Publishing ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PublishedPostRef {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PublishFailure {
    pub id: Uuid,
    pub title: String,
    pub error: String,
}

/// PublishReport
///
/// Result of one scheduled-publish sweep. `errors` is omitted when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PublishReport {
    pub message: String,
    pub published: usize,
    pub posts: Vec<PublishedPostRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<PublishFailure>,
}

// --- Dashboard & Profile Schemas (Output) ---

/// AdminDashboardStats
///
/// Counters for the dashboard overview (GET /admin/stats).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct AdminDashboardStats {
    pub total_posts: i64,
    pub published_posts: i64,
    pub draft_posts: i64,
    pub in_review_posts: i64,
    pub scheduled_posts: i64,
    pub total_categories: i64,
    pub total_tags: i64,
    pub active_subscribers: i64,
}

/// UserProfile
///
/// Output schema for the authenticated user's profile (GET /me).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub is_admin: bool,
}

// --- Query Filters ---

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// PublicPostFilter
///
/// Query parameters of GET /posts. Category and tag are matched by slug.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PublicPostFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PublicPostFilter {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// PostFilter
///
/// Query parameters of GET /admin/posts.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    pub search: Option<String>,
}

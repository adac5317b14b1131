use crate::{
    AppState, activity,
    auth::AuthUser,
    content::{post_path, related_link_html, slugify},
    error::AppError,
    media::{self, MEDIA_PREFIX},
    models::{
        ActivityLog, AdminDashboardStats, AdminPostDetail, BlogPost, BulkAction, BulkPostRequest,
        BulkPostResponse, Category, CategoryRequest, ContentQualityScore, CreateTagRequest,
        Disclaimer, DisclaimerRequest, MediaFile, NewActivityLog, NewsletterSubscriber,
        PostDetail, PostFilter, PresignedUrlRequest, PresignedUrlResponse, PublicPostFilter,
        PublishReport, QualityCheckRequest, QualityReport, RelatedPost, RelatedPostsRequest,
        RelatedSuggestion, SubscribeRequest, Tag, UpsertPostRequest, UserProfile,
    },
    posts::build_post_draft,
    quality::{self, QualityInput},
    related::suggest_related,
    scheduler,
    sitemap::{self, ROBOTS_CACHE_CONTROL, SITEMAP_CACHE_CONTROL},
    storage::key_from_public_url,
    validation::{
        normalize_email, validate_category, validate_disclaimer, validate_tag_name,
        validate_upload,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// Disclaimer rendered under every article unless the reader asks for another one.
pub const DEFAULT_DISCLAIMER: &str = "medical_disclaimer";

// --- Query Structs ---

/// SiteQuery
///
/// Optional override of the canonical site URL for sitemap.xml and robots.txt.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SiteQuery {
    pub site_url: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostDetailQuery {
    /// Name of the disclaimer to attach (default `medical_disclaimer`).
    pub disclaimer: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// MediaDeleteQuery
///
/// A library file is addressed either by its name under `posts/` or by its public URL.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MediaDeleteQuery {
    pub name: Option<String>,
    pub url: Option<String>,
}

fn non_empty_trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn site_url_for(state: &AppState, query: SiteQuery) -> String {
    non_empty_trimmed(query.site_url.as_deref()).unwrap_or_else(|| state.config.site_url.clone())
}

// --- Public: SEO ---

/// get_sitemap
///
/// [Public Route] XML sitemap of static pages, published posts and category pages.
#[utoipa::path(
    get,
    path = "/sitemap.xml",
    params(SiteQuery),
    responses(
        (status = 200, description = "Sitemap", body = String, content_type = "application/xml"),
        (status = 500, description = "Posts could not be read")
    )
)]
pub async fn get_sitemap(
    State(state): State<AppState>,
    Query(query): Query<SiteQuery>,
) -> Result<Response, AppError> {
    let site_url = site_url_for(&state, query);
    let posts = state.repo.list_sitemap_posts().await?;
    // Categories are optional: a failure only drops the category entries.
    let categories = state.repo.list_category_slugs().await.unwrap_or_else(|e| {
        tracing::warn!("Sitemap generated without categories: {}", e);
        vec![]
    });

    let xml = sitemap::render_sitemap(&site_url, &posts, &categories, Utc::now().date_naive());

    Ok((
        [
            (header::CONTENT_TYPE, "application/xml"),
            (header::CACHE_CONTROL, SITEMAP_CACHE_CONTROL),
        ],
        xml,
    )
        .into_response())
}

/// get_robots
///
/// [Public Route] Crawl policy pointing at the sitemap.
#[utoipa::path(
    get,
    path = "/robots.txt",
    params(SiteQuery),
    responses((status = 200, description = "robots.txt", body = String, content_type = "text/plain"))
)]
pub async fn get_robots(State(state): State<AppState>, Query(query): Query<SiteQuery>) -> Response {
    let site_url = site_url_for(&state, query);
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, ROBOTS_CACHE_CONTROL),
        ],
        sitemap::render_robots(&site_url),
    )
        .into_response()
}

// --- Public: Articles ---

/// list_published_posts
///
/// [Public Route] Published articles, newest first. The repository enforces
/// `published = true` unconditionally.
#[utoipa::path(
    get,
    path = "/posts",
    params(PublicPostFilter),
    responses((status = 200, description = "Published posts", body = [BlogPost]))
)]
pub async fn list_published_posts(
    State(state): State<AppState>,
    Query(filter): Query<PublicPostFilter>,
) -> Json<Vec<BlogPost>> {
    Json(state.repo.list_published_posts(&filter).await)
}

/// get_published_post
///
/// [Public Route] One article by slug with its taxonomy and active disclaimer.
#[utoipa::path(
    get,
    path = "/posts/{slug}",
    params(("slug" = String, Path, description = "Post slug"), PostDetailQuery),
    responses(
        (status = 200, description = "Found", body = PostDetail),
        (status = 404, description = "No published post with this slug")
    )
)]
pub async fn get_published_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PostDetailQuery>,
) -> Result<Json<PostDetail>, AppError> {
    let post = state
        .repo
        .get_published_post_by_slug(&slug)
        .await
        .ok_or(AppError::NotFound)?;

    let disclaimer_name = non_empty_trimmed(query.disclaimer.as_deref())
        .unwrap_or_else(|| DEFAULT_DISCLAIMER.to_string());

    let categories = state.repo.get_post_categories(post.id).await;
    let tags = state.repo.get_post_tags(post.id).await;
    let disclaimer = state.repo.get_active_disclaimer(&disclaimer_name).await;

    Ok(Json(PostDetail {
        post,
        categories,
        tags,
        disclaimer,
    }))
}

/// get_public_related_posts
///
/// [Public Route] "Read next" list for an article, from its own categories and tags.
#[utoipa::path(
    get,
    path = "/posts/{slug}/related",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Related posts", body = [RelatedPost]),
        (status = 404, description = "No published post with this slug")
    )
)]
pub async fn get_public_related_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<RelatedPost>>, AppError> {
    let post = state
        .repo
        .get_published_post_by_slug(&slug)
        .await
        .ok_or(AppError::NotFound)?;

    let category_ids: Vec<Uuid> = state
        .repo
        .get_post_categories(post.id)
        .await
        .into_iter()
        .map(|c| c.id)
        .collect();
    let tag_ids: Vec<Uuid> = state
        .repo
        .get_post_tags(post.id)
        .await
        .into_iter()
        .map(|t| t.id)
        .collect();

    let related =
        suggest_related(state.repo.as_ref(), Some(post.id), &category_ids, &tag_ids).await;
    Ok(Json(related))
}

#[utoipa::path(
    get,
    path = "/categories",
    responses((status = 200, description = "Categories by name", body = [Category]))
)]
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.repo.list_categories().await)
}

#[utoipa::path(
    get,
    path = "/tags",
    responses((status = 200, description = "Tags by name", body = [Tag]))
)]
pub async fn list_tags(State(state): State<AppState>) -> Json<Vec<Tag>> {
    Json(state.repo.list_tags().await)
}

/// get_active_disclaimer
///
/// [Public Route] Highest active version of a named disclaimer.
#[utoipa::path(
    get,
    path = "/disclaimers/{name}",
    params(("name" = String, Path, description = "Disclaimer name")),
    responses(
        (status = 200, description = "Found", body = Disclaimer),
        (status = 404, description = "No active disclaimer with this name")
    )
)]
pub async fn get_active_disclaimer(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Disclaimer>, AppError> {
    state
        .repo
        .get_active_disclaimer(&name)
        .await
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// subscribe
///
/// [Public Route] Newsletter signup. Subscribing twice reactivates the existing address.
#[utoipa::path(
    post,
    path = "/newsletter/subscribe",
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "Subscribed", body = NewsletterSubscriber),
        (status = 400, description = "Invalid email")
    )
)]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<Json<NewsletterSubscriber>, AppError> {
    let email = normalize_email(&payload.email)?;
    let subscriber = state.repo.subscribe(&email).await?;
    tracing::info!("Newsletter subscription for {}", subscriber.id);
    Ok(Json(subscriber))
}

// --- Authenticated ---

/// get_me
///
/// [Authenticated Route] The caller's profile and whether the dashboard is open to them.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, AppError> {
    let user = state.repo.get_user(auth.id).await.ok_or(AppError::NotFound)?;
    Ok(Json(UserProfile {
        is_admin: auth.is_admin(),
        id: user.id,
        email: user.email,
        role: user.role,
    }))
}

// --- Admin: Posts ---

#[utoipa::path(
    get,
    path = "/admin/posts",
    params(PostFilter),
    responses((status = 200, description = "All posts, newest first", body = [BlogPost]))
)]
pub async fn admin_list_posts(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<PostFilter>,
) -> Result<Json<Vec<BlogPost>>, AppError> {
    auth.require_admin()?;
    Ok(Json(state.repo.list_posts(&filter).await))
}

/// admin_get_post
///
/// [Admin Route] A post in any status, with the selected taxonomy ids and its stored
/// quality score.
#[utoipa::path(
    get,
    path = "/admin/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Found", body = AdminPostDetail),
        (status = 404, description = "Not Found")
    )
)]
pub async fn admin_get_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdminPostDetail>, AppError> {
    auth.require_admin()?;
    let post = state.repo.get_post(id).await.ok_or(AppError::NotFound)?;

    let category_ids = state
        .repo
        .get_post_categories(id)
        .await
        .into_iter()
        .map(|c| c.id)
        .collect();
    let tag_ids = state
        .repo
        .get_post_tags(id)
        .await
        .into_iter()
        .map(|t| t.id)
        .collect();
    let quality = state.repo.get_quality_score(id).await;

    Ok(Json(AdminPostDetail {
        post,
        category_ids,
        tag_ids,
        quality,
    }))
}

/// admin_create_post
///
/// [Admin Route] Creates a post authored by the caller. Slug, reading time and publication
/// fields are derived from the payload.
#[utoipa::path(
    post,
    path = "/admin/posts",
    request_body = UpsertPostRequest,
    responses(
        (status = 201, description = "Created", body = BlogPost),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Slug already in use")
    )
)]
pub async fn admin_create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UpsertPostRequest>,
) -> Result<(StatusCode, Json<BlogPost>), AppError> {
    auth.require_admin()?;
    let draft = build_post_draft(payload, auth.id, None, Utc::now())?;
    let post = state.repo.create_post(draft).await?;

    activity::record(
        state.repo.as_ref(),
        NewActivityLog::new(auth.id, "create_post", "blog_post", Some(post.id))
            .with_details(json!({ "title": post.title })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(post)))
}

#[utoipa::path(
    put,
    path = "/admin/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = UpsertPostRequest,
    responses(
        (status = 200, description = "Updated", body = BlogPost),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Slug already in use")
    )
)]
pub async fn admin_update_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpsertPostRequest>,
) -> Result<Json<BlogPost>, AppError> {
    auth.require_admin()?;
    let existing = state.repo.get_post(id).await.ok_or(AppError::NotFound)?;
    let draft = build_post_draft(payload, auth.id, Some(&existing), Utc::now())?;
    let post = state
        .repo
        .update_post(id, draft)
        .await?
        .ok_or(AppError::NotFound)?;

    activity::record(
        state.repo.as_ref(),
        NewActivityLog::new(auth.id, "update_post", "blog_post", Some(post.id))
            .with_details(json!({ "title": post.title })),
    )
    .await;

    Ok(Json(post))
}

#[utoipa::path(
    delete,
    path = "/admin/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn admin_delete_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;
    let post = state.repo.get_post(id).await.ok_or(AppError::NotFound)?;
    if !state.repo.delete_post(id).await? {
        return Err(AppError::NotFound);
    }

    activity::record(
        state.repo.as_ref(),
        NewActivityLog::new(auth.id, "delete_post", "blog_post", Some(id))
            .with_details(json!({ "title": post.title })),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// set_post_published
///
/// [Admin Route] Publish/unpublish toggle. Publishing moves the status to `published`,
/// unpublishing back to `draft`.
#[utoipa::path(
    put,
    path = "/admin/posts/{id}/published",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = bool,
    responses(
        (status = 200, description = "Updated", body = BlogPost),
        (status = 404, description = "Not Found")
    )
)]
pub async fn set_post_published(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(published): Json<bool>,
) -> Result<Json<BlogPost>, AppError> {
    auth.require_admin()?;
    let post = state
        .repo
        .set_post_published(id, published, Utc::now())
        .await?
        .ok_or(AppError::NotFound)?;

    activity::record(
        state.repo.as_ref(),
        NewActivityLog::new(auth.id, "update_status", "blog_post", Some(id))
            .with_details(json!({ "title": post.title, "published": published })),
    )
    .await;

    Ok(Json(post))
}

#[utoipa::path(
    post,
    path = "/admin/posts/bulk",
    request_body = BulkPostRequest,
    responses(
        (status = 200, description = "Applied", body = BulkPostResponse),
        (status = 400, description = "No posts selected")
    )
)]
pub async fn bulk_update_posts(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<BulkPostRequest>,
) -> Result<Json<BulkPostResponse>, AppError> {
    auth.require_admin()?;
    if payload.ids.is_empty() {
        return Err(AppError::Validation("No posts selected".to_string()));
    }

    let affected = match payload.action {
        BulkAction::Publish => {
            state
                .repo
                .bulk_set_published(&payload.ids, true, Utc::now())
                .await?
        }
        BulkAction::Unpublish => {
            state
                .repo
                .bulk_set_published(&payload.ids, false, Utc::now())
                .await?
        }
        BulkAction::Delete => state.repo.bulk_delete_posts(&payload.ids).await?,
    };

    activity::record(
        state.repo.as_ref(),
        NewActivityLog::new(auth.id, payload.action.log_action(), "blog_post", None)
            .with_details(json!({ "count": affected })),
    )
    .await;

    Ok(Json(BulkPostResponse { affected }))
}

// --- Admin: Quality & Related ---

/// preview_quality
///
/// [Admin Route] Scores unsaved editor contents. Nothing is stored.
#[utoipa::path(
    post,
    path = "/admin/quality/preview",
    request_body = QualityCheckRequest,
    responses((status = 200, description = "Report", body = QualityReport))
)]
pub async fn preview_quality(
    auth: AuthUser,
    Json(payload): Json<QualityCheckRequest>,
) -> Result<Json<QualityReport>, AppError> {
    auth.require_admin()?;
    let report = quality::analyze(&QualityInput {
        content: &payload.content,
        title: &payload.title,
        excerpt: &payload.excerpt,
        seo_title: &payload.seo_title,
        seo_description: &payload.seo_description,
        has_reviewer: payload.reviewer_id.is_some(),
    });
    Ok(Json(report))
}

/// check_post_quality
///
/// [Admin Route] Scores the stored post and keeps the result as its current score.
#[utoipa::path(
    post,
    path = "/admin/posts/{id}/quality",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Stored score", body = ContentQualityScore),
        (status = 404, description = "Not Found")
    )
)]
pub async fn check_post_quality(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContentQualityScore>, AppError> {
    auth.require_admin()?;
    let post = state.repo.get_post(id).await.ok_or(AppError::NotFound)?;

    let report = quality::analyze(&QualityInput {
        content: &post.content,
        title: &post.title,
        excerpt: post.excerpt.as_deref().unwrap_or_default(),
        seo_title: post.seo_title.as_deref().unwrap_or_default(),
        seo_description: post.seo_description.as_deref().unwrap_or_default(),
        has_reviewer: post.reviewer_id.is_some(),
    });

    let score = state.repo.save_quality_score(id, &report).await?;
    Ok(Json(score))
}

#[utoipa::path(
    get,
    path = "/admin/posts/{id}/quality",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Stored score", body = ContentQualityScore),
        (status = 404, description = "Never checked")
    )
)]
pub async fn get_post_quality(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContentQualityScore>, AppError> {
    auth.require_admin()?;
    state
        .repo
        .get_quality_score(id)
        .await
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// suggest_related_posts
///
/// [Admin Route] Internal-link suggestions for the editor's current category/tag selection.
#[utoipa::path(
    post,
    path = "/admin/related",
    request_body = RelatedPostsRequest,
    responses((status = 200, description = "Suggestions", body = [RelatedSuggestion]))
)]
pub async fn suggest_related_posts(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<RelatedPostsRequest>,
) -> Result<Json<Vec<RelatedSuggestion>>, AppError> {
    auth.require_admin()?;
    let related = suggest_related(
        state.repo.as_ref(),
        payload.post_id,
        &payload.category_ids,
        &payload.tag_ids,
    )
    .await;

    let suggestions = related
        .into_iter()
        .map(|post| RelatedSuggestion {
            path: post_path(&post.slug),
            link_html: related_link_html(&post.title, &post.slug),
            id: post.id,
            title: post.title,
            slug: post.slug,
        })
        .collect();

    Ok(Json(suggestions))
}

// --- Admin: Categories & Tags ---

#[utoipa::path(
    post,
    path = "/admin/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Created", body = Category),
        (status = 409, description = "Duplicate slug")
    )
)]
pub async fn create_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    auth.require_admin()?;
    validate_category(&payload)?;
    let name = payload.name.trim();
    let description = non_empty_trimmed(payload.description.as_deref());

    let category = state
        .repo
        .create_category(name, &slugify(name), description.as_deref())
        .await?;

    activity::record(
        state.repo.as_ref(),
        NewActivityLog::new(auth.id, "create_category", "category", Some(category.id))
            .with_details(json!({ "name": category.name })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(category)))
}

/// update_category
///
/// [Admin Route] Renames a category; the slug is regenerated from the new name.
#[utoipa::path(
    put,
    path = "/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Updated", body = Category),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Duplicate slug")
    )
)]
pub async fn update_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<Category>, AppError> {
    auth.require_admin()?;
    validate_category(&payload)?;
    let name = payload.name.trim();
    let description = non_empty_trimmed(payload.description.as_deref());

    let category = state
        .repo
        .update_category(id, name, &slugify(name), description.as_deref())
        .await?
        .ok_or(AppError::NotFound)?;

    activity::record(
        state.repo.as_ref(),
        NewActivityLog::new(auth.id, "update_category", "category", Some(id))
            .with_details(json!({ "name": category.name })),
    )
    .await;

    Ok(Json(category))
}

/// delete_category
///
/// [Admin Route] Deletes a category. Its posts stay, uncategorized.
#[utoipa::path(
    delete,
    path = "/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;
    if !state.repo.delete_category(id).await? {
        return Err(AppError::NotFound);
    }

    activity::record(
        state.repo.as_ref(),
        NewActivityLog::new(auth.id, "delete_category", "category", Some(id)),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/admin/tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Created", body = Tag),
        (status = 409, description = "A tag with this name already exists")
    )
)]
pub async fn create_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>), AppError> {
    auth.require_admin()?;
    validate_tag_name(&payload.name)?;
    let name = payload.name.trim();

    let tag = state
        .repo
        .create_tag(name, &slugify(name))
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => {
                AppError::Conflict("A tag with this name already exists".to_string())
            }
            other => other,
        })?;

    activity::record(
        state.repo.as_ref(),
        NewActivityLog::new(auth.id, "create_tag", "tag", Some(tag.id))
            .with_details(json!({ "name": tag.name })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(tag)))
}

#[utoipa::path(
    delete,
    path = "/admin/tags/{id}",
    params(("id" = Uuid, Path, description = "Tag ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;
    if !state.repo.delete_tag(id).await? {
        return Err(AppError::NotFound);
    }

    activity::record(
        state.repo.as_ref(),
        NewActivityLog::new(auth.id, "delete_tag", "tag", Some(id)),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// --- Admin: Disclaimers ---

#[utoipa::path(
    get,
    path = "/admin/disclaimers",
    responses((status = 200, description = "Every disclaimer version", body = [Disclaimer]))
)]
pub async fn admin_list_disclaimers(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Disclaimer>>, AppError> {
    auth.require_admin()?;
    Ok(Json(state.repo.list_disclaimers().await))
}

#[utoipa::path(
    post,
    path = "/admin/disclaimers",
    request_body = DisclaimerRequest,
    responses(
        (status = 201, description = "Created at version 1", body = Disclaimer),
        (status = 400, description = "Name and content are required")
    )
)]
pub async fn create_disclaimer(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<DisclaimerRequest>,
) -> Result<(StatusCode, Json<Disclaimer>), AppError> {
    auth.require_admin()?;
    validate_disclaimer(&payload)?;

    let disclaimer = state
        .repo
        .create_disclaimer(
            payload.name.trim(),
            payload.content.trim(),
            payload.is_active.unwrap_or(true),
        )
        .await?;

    activity::record(
        state.repo.as_ref(),
        NewActivityLog::new(auth.id, "create_disclaimer", "disclaimer", Some(disclaimer.id))
            .with_details(json!({ "name": disclaimer.name })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(disclaimer)))
}

/// update_disclaimer
///
/// [Admin Route] Replaces the text and bumps the version. `is_active` is kept when omitted.
#[utoipa::path(
    put,
    path = "/admin/disclaimers/{id}",
    params(("id" = Uuid, Path, description = "Disclaimer ID")),
    request_body = DisclaimerRequest,
    responses(
        (status = 200, description = "Updated", body = Disclaimer),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_disclaimer(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DisclaimerRequest>,
) -> Result<Json<Disclaimer>, AppError> {
    auth.require_admin()?;
    validate_disclaimer(&payload)?;

    let is_active = match payload.is_active {
        Some(active) => active,
        None => {
            state
                .repo
                .get_disclaimer(id)
                .await
                .ok_or(AppError::NotFound)?
                .is_active
        }
    };

    let disclaimer = state
        .repo
        .update_disclaimer(id, payload.name.trim(), payload.content.trim(), is_active)
        .await?
        .ok_or(AppError::NotFound)?;

    activity::record(
        state.repo.as_ref(),
        NewActivityLog::new(auth.id, "update_disclaimer", "disclaimer", Some(id)).with_details(
            json!({ "name": disclaimer.name, "version": disclaimer.version }),
        ),
    )
    .await;

    Ok(Json(disclaimer))
}

#[utoipa::path(
    put,
    path = "/admin/disclaimers/{id}/active",
    params(("id" = Uuid, Path, description = "Disclaimer ID")),
    request_body = bool,
    responses(
        (status = 200, description = "Updated", body = Disclaimer),
        (status = 404, description = "Not Found")
    )
)]
pub async fn set_disclaimer_active(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(is_active): Json<bool>,
) -> Result<Json<Disclaimer>, AppError> {
    auth.require_admin()?;
    let disclaimer = state
        .repo
        .set_disclaimer_active(id, is_active)
        .await?
        .ok_or(AppError::NotFound)?;

    activity::record(
        state.repo.as_ref(),
        NewActivityLog::new(auth.id, "toggle_disclaimer", "disclaimer", Some(id))
            .with_details(json!({ "name": disclaimer.name, "is_active": is_active })),
    )
    .await;

    Ok(Json(disclaimer))
}

#[utoipa::path(
    delete,
    path = "/admin/disclaimers/{id}",
    params(("id" = Uuid, Path, description = "Disclaimer ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_disclaimer(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;
    let disclaimer = state
        .repo
        .get_disclaimer(id)
        .await
        .ok_or(AppError::NotFound)?;
    if !state.repo.delete_disclaimer(id).await? {
        return Err(AppError::NotFound);
    }

    activity::record(
        state.repo.as_ref(),
        NewActivityLog::new(auth.id, "delete_disclaimer", "disclaimer", Some(id))
            .with_details(json!({ "name": disclaimer.name })),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// --- Admin: Newsletter ---

#[utoipa::path(
    get,
    path = "/admin/subscribers",
    params(SearchQuery),
    responses((status = 200, description = "Subscribers, newest first", body = [NewsletterSubscriber]))
)]
pub async fn list_subscribers(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<NewsletterSubscriber>>, AppError> {
    auth.require_admin()?;
    Ok(Json(
        state.repo.list_subscribers(query.search.as_deref()).await,
    ))
}

#[utoipa::path(
    put,
    path = "/admin/subscribers/{id}/active",
    params(("id" = Uuid, Path, description = "Subscriber ID")),
    request_body = bool,
    responses(
        (status = 200, description = "Updated", body = NewsletterSubscriber),
        (status = 404, description = "Not Found")
    )
)]
pub async fn set_subscriber_active(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(is_active): Json<bool>,
) -> Result<Json<NewsletterSubscriber>, AppError> {
    auth.require_admin()?;
    state
        .repo
        .set_subscriber_active(id, is_active)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

#[utoipa::path(
    delete,
    path = "/admin/subscribers/{id}",
    params(("id" = Uuid, Path, description = "Subscriber ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_subscriber(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;
    if state.repo.delete_subscriber(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

// --- Admin: Dashboard ---

#[utoipa::path(
    get,
    path = "/admin/activity",
    responses((status = 200, description = "Latest 100 actions", body = [ActivityLog]))
)]
pub async fn list_activity(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ActivityLog>>, AppError> {
    auth.require_admin()?;
    Ok(Json(
        state.repo.list_activity(activity::ACTIVITY_FEED_LIMIT).await,
    ))
}

#[utoipa::path(
    get,
    path = "/admin/stats",
    responses((status = 200, description = "Stats", body = AdminDashboardStats))
)]
pub async fn get_admin_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AdminDashboardStats>, AppError> {
    auth.require_admin()?;
    Ok(Json(state.repo.get_stats().await))
}

/// publish_scheduled
///
/// [Admin Route] Runs the scheduled-publish sweep now instead of waiting for the timer.
#[utoipa::path(
    post,
    path = "/admin/publish-scheduled",
    responses((status = 200, description = "Sweep report", body = PublishReport))
)]
pub async fn publish_scheduled(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<PublishReport>, AppError> {
    auth.require_admin()?;
    let report = scheduler::publish_due_posts(&state.repo, Utc::now()).await?;
    Ok(Json(report))
}

// --- Admin: Media ---

/// get_upload_url
///
/// [Admin Route] Validates the image and returns a 10-minute presigned PUT URL. The browser
/// uploads straight to storage; the server never sees the bytes.
#[utoipa::path(
    post,
    path = "/admin/media/upload",
    request_body = PresignedUrlRequest,
    responses(
        (status = 200, description = "URL", body = PresignedUrlResponse),
        (status = 400, description = "Unsupported type or too large"),
        (status = 502, description = "Storage unavailable")
    )
)]
pub async fn get_upload_url(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<PresignedUrlRequest>,
) -> Result<Json<PresignedUrlResponse>, AppError> {
    auth.require_admin()?;
    validate_upload(&payload)?;

    let object_key = media::upload_key(
        &payload.filename,
        Utc::now().timestamp_millis(),
        Uuid::new_v4(),
    );

    let upload_url = state
        .storage
        .get_presigned_upload_url(&object_key, &payload.file_type)
        .await
        .map_err(|e| {
            tracing::error!("Presigning {} failed: {}", object_key, e);
            AppError::Storage(e)
        })?;

    Ok(Json(PresignedUrlResponse {
        upload_url,
        public_url: state.storage.public_url(&object_key),
        resource_key: object_key,
    }))
}

#[utoipa::path(
    get,
    path = "/admin/media",
    params(SearchQuery),
    responses(
        (status = 200, description = "Images, newest first", body = [MediaFile]),
        (status = 502, description = "Storage unavailable")
    )
)]
pub async fn list_media(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<MediaFile>>, AppError> {
    auth.require_admin()?;
    let objects = state
        .storage
        .list_objects(MEDIA_PREFIX)
        .await
        .map_err(AppError::Storage)?;
    Ok(Json(media::to_media_files(
        state.storage.as_ref(),
        objects,
        query.search.as_deref(),
    )))
}

#[utoipa::path(
    delete,
    path = "/admin/media",
    params(MediaDeleteQuery),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Neither a name nor a recognizable URL"),
        (status = 502, description = "Storage unavailable")
    )
)]
pub async fn delete_media(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<MediaDeleteQuery>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;

    let by_name = non_empty_trimmed(query.name.as_deref())
        .map(|name| media::key_for_name(&name))
        .filter(|key| key.len() > MEDIA_PREFIX.len());
    let by_url = non_empty_trimmed(query.url.as_deref())
        .and_then(|url| key_from_public_url(&url, &state.config.s3_bucket));

    let key = by_name
        .or(by_url)
        .ok_or_else(|| AppError::Validation("Provide a file name or URL".to_string()))?;

    state
        .storage
        .delete_object(&key)
        .await
        .map_err(AppError::Storage)?;

    tracing::info!("User {} deleted media {}", auth.id, key);
    Ok(StatusCode::NO_CONTENT)
}

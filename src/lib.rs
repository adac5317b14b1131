use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// HTTP-facing services.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod storage;

// Domain logic, free of HTTP concerns.
pub mod activity;
pub mod content;
pub mod media;
pub mod posts;
pub mod quality;
pub mod related;
pub mod scheduler;
pub mod sitemap;
pub mod validation;

// Routing segregation (Public, Authenticated, Admin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::AppError;
pub use repository::{PostgresRepository, RepositoryState};
pub use storage::{MockStorageService, S3StorageClient, StorageState};

/// ApiDoc
///
/// OpenAPI document aggregated from every `#[utoipa::path]` handler and `ToSchema` model.
/// Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        // Public
        handlers::get_sitemap, handlers::get_robots, handlers::list_published_posts,
        handlers::get_published_post, handlers::get_public_related_posts,
        handlers::list_categories, handlers::list_tags, handlers::get_active_disclaimer,
        handlers::subscribe,
        // Authenticated
        handlers::get_me,
        // Admin
        handlers::admin_list_posts, handlers::admin_get_post, handlers::admin_create_post,
        handlers::admin_update_post, handlers::admin_delete_post, handlers::set_post_published,
        handlers::bulk_update_posts, handlers::preview_quality, handlers::check_post_quality,
        handlers::get_post_quality, handlers::suggest_related_posts, handlers::create_category,
        handlers::update_category, handlers::delete_category, handlers::create_tag,
        handlers::delete_tag, handlers::admin_list_disclaimers, handlers::create_disclaimer,
        handlers::update_disclaimer, handlers::set_disclaimer_active, handlers::delete_disclaimer,
        handlers::list_subscribers, handlers::set_subscriber_active, handlers::delete_subscriber,
        handlers::list_activity, handlers::get_admin_stats, handlers::publish_scheduled,
        handlers::get_upload_url, handlers::list_media, handlers::delete_media
    ),
    components(
        schemas(
            models::BlogPost, models::PostStatus, models::Category, models::Tag,
            models::Disclaimer, models::NewsletterSubscriber, models::ActivityLog,
            models::IssueKind, models::QualityIssue, models::QualityReport,
            models::ContentQualityScore, models::QualityCheckRequest, models::RelatedPost,
            models::RelatedSuggestion, models::RelatedPostsRequest, models::UpsertPostRequest,
            models::BulkAction, models::BulkPostRequest, models::BulkPostResponse,
            models::CategoryRequest, models::CreateTagRequest, models::DisclaimerRequest,
            models::SubscribeRequest, models::PresignedUrlRequest, models::PresignedUrlResponse,
            models::PostDetail, models::AdminPostDetail, models::MediaFile,
            models::PublishedPostRef, models::PublishFailure, models::PublishReport,
            models::AdminDashboardStats, models::UserProfile,
        )
    ),
    tags(
        (name = "health-blog", description = "Health & wellness blog CMS API")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// The single shared container of application services, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Persistence (Postgres in production, in-memory in tests).
    pub repo: RepositoryState,
    /// Object storage for post images.
    pub storage: StorageState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Runs the `AuthUser` extractor in front of the authenticated routes; a failed extraction
/// rejects the request with 401 before the handler is reached.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing tiers, the documentation endpoints and the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        // The admin role check happens inside each handler.
        .nest("/admin", admin::admin_routes())
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for every request, carrying method, uri and the `x-request-id` so all log lines of
/// one request correlate.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}

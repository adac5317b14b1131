use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Admin Router Module
///
/// The editorial dashboard, nested under `/admin`. Every handler takes `AuthUser` (401 when
/// unauthenticated) and calls `require_admin` (403 for any role other than 'admin').
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // --- Posts ---
        .route(
            "/posts",
            get(handlers::admin_list_posts).post(handlers::admin_create_post),
        )
        // POST /admin/posts/bulk
        // publish | unpublish | delete on a list of ids.
        .route("/posts/bulk", post(handlers::bulk_update_posts))
        .route(
            "/posts/{id}",
            get(handlers::admin_get_post)
                .put(handlers::admin_update_post)
                .delete(handlers::admin_delete_post),
        )
        // PUT /admin/posts/{id}/published
        // Body is a bare JSON boolean.
        .route("/posts/{id}/published", put(handlers::set_post_published))
        // GET returns the stored score; POST recomputes and stores it.
        .route(
            "/posts/{id}/quality",
            get(handlers::get_post_quality).post(handlers::check_post_quality),
        )
        // --- Editor helpers ---
        .route("/quality/preview", post(handlers::preview_quality))
        .route("/related", post(handlers::suggest_related_posts))
        // --- Taxonomy ---
        // Listing is public (GET /categories, GET /tags).
        .route("/categories", post(handlers::create_category))
        .route(
            "/categories/{id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .route("/tags", post(handlers::create_tag))
        .route("/tags/{id}", axum::routing::delete(handlers::delete_tag))
        // --- Disclaimers ---
        .route(
            "/disclaimers",
            get(handlers::admin_list_disclaimers).post(handlers::create_disclaimer),
        )
        .route(
            "/disclaimers/{id}",
            put(handlers::update_disclaimer).delete(handlers::delete_disclaimer),
        )
        .route(
            "/disclaimers/{id}/active",
            put(handlers::set_disclaimer_active),
        )
        // --- Newsletter ---
        .route("/subscribers", get(handlers::list_subscribers))
        .route(
            "/subscribers/{id}",
            axum::routing::delete(handlers::delete_subscriber),
        )
        .route(
            "/subscribers/{id}/active",
            put(handlers::set_subscriber_active),
        )
        // --- Media library ---
        // GET lists posts/, DELETE takes ?name= or ?url=.
        .route(
            "/media",
            get(handlers::list_media).delete(handlers::delete_media),
        )
        .route("/media/upload", post(handlers::get_upload_url))
        // --- Dashboard ---
        .route("/stats", get(handlers::get_admin_stats))
        .route("/activity", get(handlers::list_activity))
        // POST /admin/publish-scheduled
        // Runs the scheduled-publish sweep immediately.
        .route("/publish-scheduled", post(handlers::publish_scheduled))
}

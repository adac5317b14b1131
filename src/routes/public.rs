use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Unauthenticated endpoints for the article site and crawlers. Every post query behind
/// these routes enforces `published = true` at the repository level, so drafts, posts in
/// review and scheduled posts never leak.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // GET /sitemap.xml?site_url=...
        // Static pages, published posts and category pages. Cached for an hour.
        .route("/sitemap.xml", get(handlers::get_sitemap))
        // GET /robots.txt?site_url=...
        .route("/robots.txt", get(handlers::get_robots))
        // GET /posts?category=...&tag=...&search=...&limit=...&offset=...
        .route("/posts", get(handlers::list_published_posts))
        // GET /posts/{slug}?disclaimer=...
        // Article with categories, tags and the active disclaimer.
        .route("/posts/{slug}", get(handlers::get_published_post))
        // GET /posts/{slug}/related
        .route("/posts/{slug}/related", get(handlers::get_public_related_posts))
        .route("/categories", get(handlers::list_categories))
        .route("/tags", get(handlers::list_tags))
        // GET /disclaimers/{name}
        // Highest active version of a named disclaimer.
        .route("/disclaimers/{name}", get(handlers::get_active_disclaimer))
        // POST /newsletter/subscribe
        // Idempotent: re-subscribing reactivates the address.
        .route("/newsletter/subscribe", post(handlers::subscribe))
}

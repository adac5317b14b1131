use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Routes for any signed-in user. The `auth_middleware` layered on this router in
/// `create_router` rejects unauthenticated requests with 401 before a handler runs.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        // The caller's profile; the dashboard uses `is_admin` to decide whether to open.
        .route("/me", get(handlers::get_me))
}

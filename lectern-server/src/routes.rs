//! API routes

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    // Configure CORS based on environment
    // LECTERN_CORS_ORIGINS can be comma-separated list of origins, or "*" for any
    let cors = match std::env::var("LECTERN_CORS_ORIGINS").ok() {
        Some(origins) if origins == "*" => {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        Some(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => {
            // Default: allow localhost origins for development
            CorsLayer::new()
                .allow_origin(AllowOrigin::list([
                    "http://localhost:3000".parse().unwrap(),
                    "http://localhost:5173".parse().unwrap(),
                    "http://127.0.0.1:3000".parse().unwrap(),
                    "http://127.0.0.1:5173".parse().unwrap(),
                ]))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    let api_routes = Router::new()
        // Reading endpoints
        .route("/versions", get(handlers::list_versions))
        .route("/read/:version/:book/:chapter", get(handlers::read_chapter))
        .route("/search/:version", get(handlers::search_corpus))
        .route("/daily", get(handlers::daily))
        // Auth endpoints
        .route("/auth/signup", post(handlers::sign_up))
        .route("/auth/signin", post(handlers::sign_in))
        .route("/auth/federated", post(handlers::sign_in_federated))
        .route("/auth/signout", post(handlers::sign_out))
        .route("/auth/password", post(handlers::change_password))
        // Account endpoints
        .route(
            "/account",
            get(handlers::get_account).delete(handlers::delete_account),
        )
        .route(
            "/account/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route(
            "/preferences",
            get(handlers::get_preferences).put(handlers::put_preferences),
        )
        // Annotation endpoints
        .route("/annotations/toggle", post(handlers::toggle_annotation))
        .route("/bookmarks", get(handlers::list_bookmarks))
        // SSE endpoint
        .route("/sync", get(handlers::sync_events));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

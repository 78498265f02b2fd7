//! Public HTML pages, login and health checks.

mod browse;
mod health;
mod home;
mod login;
mod recipes;
mod search;
mod workouts;

use axum::{
    http::{Method, Uri},
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::require_admin;
use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let signed_in = Router::new()
        .route("/logout", post(login::logout))
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    Router::new()
        .route("/", get(home::home))
        .route("/workouts", get(workouts::landing))
        .route("/workouts/all", get(workouts::all))
        .route("/workouts/styles", get(workouts::styles_index))
        .route("/workouts/body-parts", get(workouts::body_parts_index))
        .route("/workouts/browse", get(browse::browse))
        .route("/workouts/{slug}", get(workouts::detail))
        .route("/recipes", get(recipes::list))
        .route("/search", get(search::search))
        .route("/login", get(login::form).post(login::submit))
        .route("/health", get(health::health))
        .route("/healthz", get(health::healthz))
        .merge(signed_in)
}

/// Fallback for unmatched routes.
pub async fn not_found(method: Method, uri: Uri) -> AppError {
    tracing::warn!(%method, path = %uri.path(), "no route matched");
    AppError::NotFound
}

//! Login-gated admin area under `/admin`.

mod recipes;
mod styles;
mod workouts;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::auth::require_admin;
use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(workouts::index))
        .route(
            "/workouts/new",
            get(workouts::new_form).post(workouts::create),
        )
        .route(
            "/workouts/{id}/edit",
            get(workouts::edit_form).post(workouts::update),
        )
        .route("/workouts/{id}/delete", post(workouts::delete))
        .route("/styles", get(styles::index).post(styles::create))
        .route("/styles/{id}/toggle", post(styles::toggle))
        .route("/styles/{id}/delete", post(styles::delete))
        .route("/recipes", get(recipes::index))
        .route("/recipes/new", get(recipes::new_form).post(recipes::create))
        .route(
            "/recipes/{id}/edit",
            get(recipes::edit_form).post(recipes::update),
        )
        .route("/recipes/{id}/delete", post(recipes::delete))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

/// Ids in admin URLs; anything that is not a UUID is treated as missing.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

fn is_unique_violation(e: &diesel::result::Error) -> bool {
    matches!(
        e,
        diesel::result::Error::DatabaseError(diesel::result::DatabaseErrorKind::UniqueViolation, _)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_id("not-a-uuid"), Err(AppError::NotFound)));
    }

    #[test]
    fn test_unique_violation_detection() {
        use diesel::result::{DatabaseErrorKind, Error};

        let duplicate = Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_string()),
        );
        assert!(is_unique_violation(&duplicate));

        let other = Error::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("violates foreign key constraint".to_string()),
        );
        assert!(!is_unique_violation(&other));
        assert!(!is_unique_violation(&Error::NotFound));
    }
}

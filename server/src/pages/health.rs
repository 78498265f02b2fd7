use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::db::{self, DbPool};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Always 200; `db` reports whether the database answered.
pub async fn healthz(State(pool): State<Arc<DbPool>>) -> Json<Value> {
    let db = match db::ping(&pool) {
        Ok(()) => "up",
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            "down"
        }
    };
    Json(json!({ "status": "ok", "db": db }))
}

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::api::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    database: &'static str,
    version: &'static str,
    uptime_seconds: u64,
}

static STARTED_AT: OnceLock<Instant> = OnceLock::new();

/// Record the process start so uptime counts from boot, not the first request
pub fn mark_started() {
    STARTED_AT.get_or_init(Instant::now);
}

/// Liveness plus a round trip to SQLite; 503 when the database is unreachable
pub async fn health_handler(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let started_at = STARTED_AT.get_or_init(Instant::now);

    let database_ok = match sqlx::query("SELECT 1")
        .execute(state.game_repo.get_db())
        .await
    {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Health check database query failed: {}", e);
            false
        }
    };

    let (code, status, database) = if database_ok {
        (StatusCode::OK, "ok", "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unreachable")
    };

    (
        code,
        Json(HealthResponse {
            status,
            database,
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds: started_at.elapsed().as_secs(),
        }),
    )
}

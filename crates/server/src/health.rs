//! Liveness endpoint

use api_types::Health;
use axum::Json;

/// Report that the process is up. Does not touch the database.
pub async fn get() -> Json<Health> {
    Json(Health {
        status: "OK".to_string(),
        timestamp: chrono::Utc::now(),
    })
}

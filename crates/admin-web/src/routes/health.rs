//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
    pub contacts: Option<i64>,
}

/// Health check endpoint. Reports 503 when the database cannot be queried.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    match database::contact::count_contacts(state.db.pool()).await {
        Ok(count) => (
            StatusCode::OK,
            Json(Health {
                status: "ok".to_string(),
                contacts: Some(count),
            }),
        ),
        Err(err) => {
            tracing::warn!("Health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Health {
                    status: "unavailable".to_string(),
                    contacts: None,
                }),
            )
        }
    }
}

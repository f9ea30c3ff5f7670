//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{ClientCountDto, HealthDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// Number of currently connected clients
pub async fn get_client_count(State(state): State<Arc<AppState>>) -> Json<ClientCountDto> {
    let count = state.get_client_count_usecase.execute().await;
    Json(ClientCountDto { count })
}

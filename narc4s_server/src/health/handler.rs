use std::sync::Arc;

use axum::extract::{Json, State};
use chrono::{SecondsFormat, Utc};

use crate::{health::dto::Health, state::ServerState};

pub const SERVICE_NAME: &str = "NARC4S Backend";

#[utoipa::path(
    get,
    path = "/api/health",
    description = "Liveness probe",
    responses(
        (status = 200, description = "Service is up", body = Health),
    )
)]
pub async fn health(State(server_state): State<Arc<ServerState>>) -> Json<Health> {
    Json(Health {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: server_state.environment(),
    })
}

use std::sync::Arc;

use axum::{
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
};
use log::{error, warn};
use narc4s_core::raffle::{
    dto::{ProcessRaffleRequest, ProcessRaffleResponse, RaffleRequest},
    handler::run_raffle,
};

use crate::{error::ErrorServer, state::ServerState};

#[utoipa::path(
    post,
    path = "/api/process-raffle",
    request_body = ProcessRaffleRequest,
    description = "Fetch the tweet's likers or retweeters and draw winners and backups",
    responses(
        (status = 200, description = "Success", body = ProcessRaffleResponse),
        (status = 400, description = "Bad Request", body = crate::error::ErrorBody),
        (status = 404, description = "No participants", body = crate::error::ErrorBody),
        (status = 429, description = "Twitter API rate limited", body = crate::error::ErrorBody),
        (status = 500, description = "Internal Server Error", body = crate::error::ErrorBody),
    )
)]
#[axum::debug_handler]
pub async fn process_raffle(
    State(server_state): State<Arc<ServerState>>,
    payload: Result<Json<ProcessRaffleRequest>, JsonRejection>,
) -> Result<Json<ProcessRaffleResponse>, ErrorServer> {
    let Json(payload) = payload?;

    let request = RaffleRequest::try_from(payload)?;

    let selection = run_raffle(server_state.fetcher(), &request)
        .await
        .map_err(|e| {
            let err = ErrorServer::from(e);
            if err.status == u16::from(StatusCode::INTERNAL_SERVER_ERROR) {
                error!(
                    "Error processing raffle {}: {}",
                    request.raffle_id,
                    err.details.as_deref().unwrap_or_default()
                );
            } else {
                warn!("Raffle {} rejected: {}", request.raffle_id, err);
            }
            err
        })?;

    Ok(Json(ProcessRaffleResponse::from((request, selection))))
}

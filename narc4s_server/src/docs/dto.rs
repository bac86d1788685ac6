use crate::{error::ErrorBody, health, raffle};
use narc4s_core::raffle::dto::{ParticipantEntry, ProcessRaffleRequest, ProcessRaffleResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(raffle::handler::process_raffle, health::handler::health),
    components(schemas(
        health::dto::Health,
        ProcessRaffleRequest,
        ProcessRaffleResponse,
        ParticipantEntry,
        ErrorBody
    ))
)]
pub struct ApiDoc;

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::{get, post},
};
use narc4s_core::twitter::fetcher::{DEFAULT_TWITTER_API_URL, ParticipantFetcher, TwitterFetcher};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use crate::{
    docs::{dto::ApiDoc, handler::api_docs},
    health::handler::health,
    middlewares::handler::{NGROK_SKIP_BROWSER_WARNING, method_not_allowed, ngrok_bypass},
    raffle::handler::process_raffle,
    state::ServerState,
};

const DEFAULT_TIMEOUT_SECS: u64 = 15;

pub async fn router() -> anyhow::Result<Router> {
    let bearer_token = env::var("TWITTER_BEARER_TOKEN")
        .context("TWITTER_BEARER_TOKEN environment variable not set")?;
    let api_url =
        env::var("TWITTER_API_URL").unwrap_or_else(|_| DEFAULT_TWITTER_API_URL.to_string());
    let timeout_secs = match env::var("TWITTER_TIMEOUT_SECS") {
        Ok(secs) => secs
            .parse::<u64>()
            .context("TWITTER_TIMEOUT_SECS must be a whole number of seconds")?,
        Err(_) => DEFAULT_TIMEOUT_SECS,
    };
    let environment = env::var("NODE_ENV")
        .or_else(|_| env::var("ENVIRONMENT"))
        .unwrap_or_else(|_| "production".to_string());
    let allowed_origins = env::var("ALLOWED_ORIGINS").unwrap_or_default();

    let fetcher = TwitterFetcher::new(api_url, bearer_token, Duration::from_secs(timeout_secs))
        .context("Failed to build Twitter API client")?;
    let fetcher: Arc<dyn ParticipantFetcher> = Arc::new(fetcher);

    let state = Arc::new(ServerState::from((fetcher, environment)));

    Ok(app(state).layer(cors(&allowed_origins)))
}

pub fn app(state: Arc<ServerState>) -> Router {
    let doc = ApiDoc::openapi();

    let api_router = Router::new()
        .route("/api/process-raffle", post(process_raffle))
        .route("/api/health", get(health))
        .method_not_allowed_fallback(method_not_allowed);

    Router::new()
        .merge(Redoc::with_url("/redoc", doc))
        .merge(api_router)
        .route("/docs", get(api_docs))
        .layer(middleware::from_fn(ngrok_bypass))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors(allowed_origins: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, NGROK_SKIP_BROWSER_WARNING]);

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}

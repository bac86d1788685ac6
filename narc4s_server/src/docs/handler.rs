use axum::Json;
use utoipa::OpenApi;

use crate::docs::dto::ApiDoc;

pub async fn api_docs() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

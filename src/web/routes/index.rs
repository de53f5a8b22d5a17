use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};

use crate::{
    model::{ResourceType, calc_online_school_stats},
    web::{AppState, WebError, WebResult, dto::index::IndexResponse, error::ErrorResponse},
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(index_handler))
}

/// Counts shown on the landing page.
pub(crate) async fn landing(state: &AppState) -> WebResult<IndexResponse> {
    let stats = calc_online_school_stats(state.mm())
        .await
        .map_err(|e| WebError::resource_fetch_error(ResourceType::Course, e))?;

    Ok(IndexResponse::from(stats))
}

#[utoipa::path(
    get,
    path = "/",
    description = "Number of courses, teachers and students",
    responses(
        (status = 200, description = "Current counts", body = IndexResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "index"
)]
pub(crate) async fn index_handler(State(state): State<AppState>) -> WebResult<impl IntoResponse> {
    let body = landing(&state).await?;

    Ok((StatusCode::OK, Json(body)))
}

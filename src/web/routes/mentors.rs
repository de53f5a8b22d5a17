use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    model::{
        Page,
        entity::{Mentor, MentorFilter},
    },
    web::{
        AppState, RequestContext, WebResult,
        error::ErrorResponse,
        routes::{PaginationQuery, detail_resource, list_resource, login_required},
    },
};

pub fn routes() -> Router<AppState> {
    let protected = login_required(Router::new().route("/mentors/", get(mentor_list_handler)));

    Router::new()
        .route("/mentors/{id}/", get(mentor_detail_handler))
        .merge(protected)
}

#[utoipa::path(
    get,
    path = "/mentors/",
    params(PaginationQuery, MentorFilter),
    responses(
        (status = 200, description = "Requested page of mentors", body = Page<Mentor>),
        (status = 303, description = "Not signed in, redirect to the login page"),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "mentors",
    security(("cookie" = []))
)]
pub(crate) async fn mentor_list_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(page): Query<PaginationQuery>,
    Query(filter): Query<MentorFilter>,
) -> WebResult<impl IntoResponse> {
    list_resource::<Mentor>(&state, &ctx, &filter, &page).await
}

#[utoipa::path(
    get,
    path = "/mentors/{id}/",
    params(("id" = Uuid, Path, description = "Mentor id")),
    responses(
        (status = 200, description = "Mentor with account details", body = Mentor),
        (status = 404, description = "No such mentor", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "mentors"
)]
pub(crate) async fn mentor_detail_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let found = detail_resource::<Mentor>(&state, &ctx, id).await?;

    Ok(Json(found))
}

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
        entity::{Teacher, TeacherFilter},
    },
    web::{
        AppState, RequestContext, WebResult,
        error::ErrorResponse,
        routes::{PaginationQuery, detail_resource, list_resource},
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/teachers/", get(teacher_list_handler))
        .route("/teachers/{id}/", get(teacher_detail_handler))
}

#[utoipa::path(
    get,
    path = "/teachers/",
    params(PaginationQuery, TeacherFilter),
    responses(
        (status = 200, description = "Requested page of teachers", body = Page<Teacher>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "teachers"
)]
pub(crate) async fn teacher_list_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(page): Query<PaginationQuery>,
    Query(filter): Query<TeacherFilter>,
) -> WebResult<impl IntoResponse> {
    list_resource::<Teacher>(&state, &ctx, &filter, &page).await
}

#[utoipa::path(
    get,
    path = "/teachers/{id}/",
    params(("id" = Uuid, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Teacher with account details", body = Teacher),
        (status = 404, description = "No such teacher", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "teachers"
)]
pub(crate) async fn teacher_detail_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let found = detail_resource::<Teacher>(&state, &ctx, id).await?;

    Ok(Json(found))
}

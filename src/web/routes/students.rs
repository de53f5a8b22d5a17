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
        entity::{Student, StudentFilter},
    },
    web::{
        AppState, RequestContext, WebResult,
        error::ErrorResponse,
        routes::{PaginationQuery, detail_resource, list_resource, login_required},
    },
};

pub fn routes() -> Router<AppState> {
    let protected = login_required(Router::new().route("/students/", get(student_list_handler)));

    Router::new()
        .route("/students/{id}/", get(student_detail_handler))
        .merge(protected)
}

#[utoipa::path(
    get,
    path = "/students/",
    params(PaginationQuery, StudentFilter),
    responses(
        (status = 200, description = "Requested page of students", body = Page<Student>),
        (status = 303, description = "Not signed in, redirect to the login page"),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "students",
    security(("cookie" = []))
)]
pub(crate) async fn student_list_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(page): Query<PaginationQuery>,
    Query(filter): Query<StudentFilter>,
) -> WebResult<impl IntoResponse> {
    list_resource::<Student>(&state, &ctx, &filter, &page).await
}

#[utoipa::path(
    get,
    path = "/students/{id}/",
    params(("id" = Uuid, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student with account details", body = Student),
        (status = 404, description = "No such student", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "students"
)]
pub(crate) async fn student_detail_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let found = detail_resource::<Student>(&state, &ctx, id).await?;

    Ok(Json(found))
}

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    model::{
        Page, ResourceTyped,
        entity::{Course, CourseFilter, Lesson},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::courses::CourseDetail,
        error::ErrorResponse,
        routes::{PaginationQuery, detail_resource, list_resource},
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/courses/", get(course_list_handler))
        .route("/courses/{id}/", get(course_detail_handler))
}

#[utoipa::path(
    get,
    path = "/courses/",
    params(PaginationQuery, CourseFilter),
    responses(
        (status = 200, description = "Requested page of courses", body = Page<Course>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
pub(crate) async fn course_list_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(page): Query<PaginationQuery>,
    Query(filter): Query<CourseFilter>,
) -> WebResult<impl IntoResponse> {
    list_resource::<Course>(&state, &ctx, &filter, &page).await
}

#[utoipa::path(
    get,
    path = "/courses/{id}/",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course with its lessons", body = CourseDetail),
        (status = 404, description = "No such course", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
pub(crate) async fn course_detail_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let course = detail_resource::<Course>(&state, &ctx, id).await?;
    let lessons = Lesson::all_by_course(state.mm(), course.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok(Json(CourseDetail { course, lessons }))
}

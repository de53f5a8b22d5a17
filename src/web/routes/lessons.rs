use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    model::{
        DatabaseError, Page, ReadRepository, ResourceTyped,
        entity::{Course, Lesson, LessonFilter, Teacher},
    },
    web::{
        AppState, RequestContext, UserRole, WebError, WebResult,
        dto::lessons::LessonForm,
        error::ErrorResponse,
        form::ValidatedJson,
        routes::{PaginationQuery, detail_resource, list_resource, login_required, role_required},
    },
};

const LESSONS_URL: &str = "/lessons/";
const INVALID_COURSE: &str = "Select a valid course.";
const INVALID_TEACHER: &str = "Select a valid teacher.";

pub fn routes() -> Router<AppState> {
    let listing = login_required(Router::new().route(LESSONS_URL, get(lesson_list_handler)));
    let teaching = role_required(
        Router::new()
            .route("/lessons/create", post(lesson_create_handler))
            .route("/lessons/{id}/delete", post(lesson_delete_handler)),
        UserRole::Teacher,
    );

    Router::new()
        .route("/lessons/{id}/", get(lesson_detail_handler))
        .merge(listing)
        .merge(teaching)
}

#[utoipa::path(
    get,
    path = "/lessons/",
    description = "Students only get the lessons of their own course",
    params(PaginationQuery, LessonFilter),
    responses(
        (status = 200, description = "Requested page of lessons", body = Page<Lesson>),
        (status = 303, description = "Not signed in, redirect to the login page"),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons",
    security(("cookie" = []))
)]
pub(crate) async fn lesson_list_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(page): Query<PaginationQuery>,
    Query(filter): Query<LessonFilter>,
) -> WebResult<impl IntoResponse> {
    list_resource::<Lesson>(&state, &ctx, &filter, &page).await
}

#[utoipa::path(
    get,
    path = "/lessons/{id}/",
    params(("id" = Uuid, Path, description = "Lesson id")),
    responses(
        (status = 200, description = "Lesson", body = Lesson),
        (status = 404, description = "No such lesson", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
pub(crate) async fn lesson_detail_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let lesson = detail_resource::<Lesson>(&state, &ctx, id).await?;

    Ok(Json(lesson))
}

#[utoipa::path(
    post,
    path = "/lessons/create",
    request_body = LessonForm,
    responses(
        (status = 303, description = "Created, redirect to the lesson list"),
        (status = 400, description = "Form error", body = ErrorResponse),
        (status = 403, description = "Only teachers can create lessons", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons",
    security(("cookie" = []))
)]
pub(crate) async fn lesson_create_handler(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<LessonForm>,
) -> WebResult<impl IntoResponse> {
    let data = form.into_create()?;

    let course_exists = Course::exists(state.mm(), data.course_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;
    if !course_exists {
        return Err(WebError::form_field("course_id", INVALID_COURSE));
    }

    let teacher_exists = Teacher::exists(state.mm(), data.teacher_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Teacher::get_resource_type(), e))?;
    if !teacher_exists {
        return Err(WebError::form_field("teacher_id", INVALID_TEACHER));
    }

    Lesson::create(state.mm(), data).await.map_err(|e| {
        lesson_conflict(e)
            .unwrap_or_else(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))
    })?;

    Ok(Redirect::to(LESSONS_URL))
}

/// A course or teacher removed after the existence checks surfaces as a
/// foreign key violation. That becomes a form error, anything else is
/// handed back.
pub fn lesson_conflict(error: DatabaseError) -> Result<WebError, DatabaseError> {
    match error.foreign_key_violation() {
        Some(constraint) if constraint.contains("teacher_id") => {
            Ok(WebError::form_field("teacher_id", INVALID_TEACHER))
        }
        Some(_) => Ok(WebError::form_field("course_id", INVALID_COURSE)),
        None => Err(error),
    }
}

#[utoipa::path(
    post,
    path = "/lessons/{id}/delete",
    params(("id" = Uuid, Path, description = "Lesson id")),
    responses(
        (status = 303, description = "Deleted, redirect to the lesson list"),
        (status = 403, description = "Only teachers can delete lessons", body = ErrorResponse),
        (status = 404, description = "No such lesson", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons",
    security(("cookie" = []))
)]
pub(crate) async fn lesson_delete_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let lesson = Lesson::find_by_id(state.mm(), &ctx, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))?;

    lesson
        .delete(state.mm())
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok(Redirect::to(LESSONS_URL))
}

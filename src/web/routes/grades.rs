use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    model::{
        ResourceTyped,
        entity::{Course, Grade, GradeWithCourse, Student},
    },
    web::{
        AppState, RequestContext, UserRole, WebError, WebResult,
        dto::grades::GradeForm,
        error::ErrorResponse,
        form::{NON_FIELD, ValidatedJson},
        routes::role_required,
    },
};

pub fn routes() -> Router<AppState> {
    let own = role_required(
        Router::new().route("/grades/", get(grade_list_handler)),
        UserRole::Student,
    );
    let grading = role_required(
        Router::new().route("/grades/{id}/update", post(grade_update_handler)),
        UserRole::Teacher,
    );

    Router::new().merge(own).merge(grading)
}

#[utoipa::path(
    get,
    path = "/grades/",
    description = "Grades of the signed in student",
    responses(
        (status = 200, description = "Grades with course titles", body = Vec<GradeWithCourse>),
        (status = 403, description = "Only students have grades", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "grades",
    security(("cookie" = []))
)]
pub(crate) async fn grade_list_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let user = ctx.require_role(UserRole::Student)?;

    let student = Student::find_by_user(state.mm(), user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Student::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Student::get_resource_type()))?;

    let grades = Grade::all_by_student(state.mm(), student.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Grade::get_resource_type(), e))?;

    Ok(Json(grades))
}

#[utoipa::path(
    post,
    path = "/grades/{id}/update",
    params(("id" = Uuid, Path, description = "Grade id")),
    request_body = GradeForm,
    responses(
        (status = 303, description = "Updated, redirect to the student list"),
        (status = 400, description = "Form error", body = ErrorResponse),
        (status = 403, description = "Only teachers can grade", body = ErrorResponse),
        (status = 404, description = "No such grade", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "grades",
    security(("cookie" = []))
)]
pub(crate) async fn grade_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(form): ValidatedJson<GradeForm>,
) -> WebResult<impl IntoResponse> {
    let fetch_error = |e| WebError::resource_fetch_error(Grade::get_resource_type(), e);

    let grade = Grade::find_by_id(state.mm(), id)
        .await
        .map_err(fetch_error)?
        .ok_or_else(|| WebError::resource_not_found(Grade::get_resource_type()))?;

    let data = form.into_update()?;

    let course_exists = Course::exists(state.mm(), data.course_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;
    if !course_exists {
        return Err(WebError::form_field("course_id", "Select a valid course."));
    }

    let student_exists = Student::exists(state.mm(), data.student_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Student::get_resource_type(), e))?;
    if !student_exists {
        return Err(WebError::form_field("student_id", "Select a valid student."));
    }

    grade.update(state.mm(), data).await.map_err(|e| {
        if e.unique_violation().is_some() {
            WebError::form_field(NON_FIELD, "Grade with this Course and Student already exists.")
        } else {
            fetch_error(e)
        }
    })?;

    Ok(Redirect::to("/students/"))
}

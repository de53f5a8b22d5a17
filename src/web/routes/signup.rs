use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::get,
};
use tower_cookies::Cookies;

use crate::{
    auth::hash_password,
    model::{
        DatabaseError, ResourceTyped,
        entity::{Account, Course},
    },
    web::{
        AppState, UserRole, WebError, WebResult,
        dto::{
            index::IndexResponse,
            signup::{SignUpForm, SignupChoiceForm, SignupChoices, SignupFormInfo, signup_url},
        },
        error::ErrorResponse,
        form::ValidatedJson,
        routes::{account::start_session, index::landing},
    },
};

const USERNAME_TAKEN: &str = "A user with that username already exists.";
const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup/", get(signup_choices_handler).post(signup_choose_handler))
        .route(
            "/signup/{role}/",
            get(signup_form_handler).post(signup_handler),
        )
}

fn signup_role(value: &str) -> WebResult<UserRole> {
    UserRole::from_signup(value).ok_or_else(|| WebError::resource_not_found(Account::get_resource_type()))
}

#[utoipa::path(
    get,
    path = "/signup/",
    description = "Roles a visitor can sign up as",
    responses(
        (status = 200, description = "Role chooser", body = SignupChoices),
    ),
    tag = "signup"
)]
pub(crate) async fn signup_choices_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(SignupChoices::all()))
}

#[utoipa::path(
    post,
    path = "/signup/",
    description = "Sends the visitor to the registration form of the chosen role",
    request_body = SignupChoiceForm,
    responses(
        (status = 303, description = "Redirect to /signup/{role}/"),
        (status = 400, description = "Unknown role", body = ErrorResponse),
    ),
    tag = "signup"
)]
pub(crate) async fn signup_choose_handler(
    ValidatedJson(form): ValidatedJson<SignupChoiceForm>,
) -> WebResult<impl IntoResponse> {
    let role = signup_role(&form.role)?;

    Ok(Redirect::to(&signup_url(role)))
}

#[utoipa::path(
    get,
    path = "/signup/{role}/",
    description = "Fields of the registration form for a role",
    params(("role" = String, Path, description = "student, teacher or mentor")),
    responses(
        (status = 200, description = "Form description", body = SignupFormInfo),
        (status = 404, description = "Unknown role", body = ErrorResponse),
    ),
    tag = "signup"
)]
pub(crate) async fn signup_form_handler(Path(role): Path<String>) -> WebResult<impl IntoResponse> {
    let role = signup_role(&role)?;

    Ok((StatusCode::OK, Json(SignupFormInfo::for_role(role))))
}

#[utoipa::path(
    post,
    path = "/signup/{role}/",
    description = "Creates an account with its role profile and signs it in",
    params(("role" = String, Path, description = "student, teacher or mentor")),
    request_body = SignUpForm,
    responses(
        (status = 200, description = "Signed up, landing page counts", body = IndexResponse),
        (status = 400, description = "Form error", body = ErrorResponse),
        (status = 404, description = "Unknown role", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "signup"
)]
pub(crate) async fn signup_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(role): Path<String>,
    ValidatedJson(form): ValidatedJson<SignUpForm>,
) -> WebResult<impl IntoResponse> {
    let role = signup_role(&role)?;
    let fetch_error = |e| WebError::resource_fetch_error(Account::get_resource_type(), e);

    let found = Account::find_by_username(state.mm(), &form.username)
        .await
        .map_err(fetch_error)?;
    if found.is_some() {
        return Err(WebError::form_field("username", USERNAME_TAKEN));
    }

    if let Some(course_id) = form.course_for(role) {
        let exists = Course::exists(state.mm(), course_id)
            .await
            .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;
        if !exists {
            return Err(WebError::form_field("course_id", INVALID_CHOICE));
        }
    }

    let hash = hash_password(&form.password1).map_err(WebError::server_crypt_error)?;
    let (account, profile) = form
        .into_parts(role, hash)
        .ok_or_else(|| WebError::resource_not_found(Account::get_resource_type()))?;

    let created = Account::create_with_profile(state.mm(), account, profile)
        .await
        .map_err(|e| signup_conflict(e).unwrap_or_else(fetch_error))?;

    start_session(&cookies, created.id()).await?;
    let body = landing(&state).await?;

    Ok((StatusCode::OK, Json(body)))
}

/// Races with a concurrent signup surface as constraint violations. Those
/// become form errors, anything else is handed back.
pub fn signup_conflict(error: DatabaseError) -> Result<WebError, DatabaseError> {
    if error.unique_violation().is_some() {
        return Ok(WebError::form_field("username", USERNAME_TAKEN));
    }
    if error.is_foreign_key_violation() {
        return Ok(WebError::form_field("course_id", INVALID_CHOICE));
    }
    Err(error)
}

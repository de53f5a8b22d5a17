use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::post,
};
use tower_cookies::{
    Cookie, Cookies,
    cookie::{SameSite, time::Duration},
};
use uuid::Uuid;

use crate::{
    Config,
    auth::{self, UserClaims, verify_password},
    model::{ResourceTyped, entity::Account},
    web::{
        AppState, WebError, WebResult,
        dto::account::LoginForm,
        error::ErrorResponse,
        form::ValidatedJson,
        middlewares::{AUTH_TOKEN, session_cookie_stub},
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login/", post(login_handler))
        .route("/logout/", post(logout_handler))
}

/// Signs the session token for `user_id` and stores it in the `SID` cookie.
pub(crate) async fn start_session(cookies: &Cookies, user_id: Uuid) -> WebResult<()> {
    let app = Config::get_or_init(false).await.app();
    let claims = UserClaims::for_user(user_id, app.session_hours());
    let token = auth::generate_token(claims, app.jwt())
        .map_err(|e| WebError::server_crypt_error(e.into()))?;

    let mut cookie = Cookie::new(AUTH_TOKEN, token);
    cookie.set_max_age(Duration::hours(app.session_hours()));
    cookie.set_same_site(SameSite::Lax);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookies.add(cookie);

    Ok(())
}

#[utoipa::path(
    post,
    path = "/login/",
    description = "Authorizes an account and sets the session cookie",
    request_body = LoginForm,
    responses(
        (status = 200, description = "Signed in", body = Account),
        (status = 400, description = "Form error", body = ErrorResponse),
        (status = 401, description = "Credentials invalid", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "account"
)]
pub(crate) async fn login_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    ValidatedJson(form): ValidatedJson<LoginForm>,
) -> WebResult<impl IntoResponse> {
    let found = Account::find_by_username(state.mm(), &form.username)
        .await
        .map_err(|e| WebError::resource_fetch_error(Account::get_resource_type(), e))?
        .ok_or_else(WebError::auth_invalid_credentials)?;

    let is_verified =
        verify_password(found.hash(), &form.password).map_err(WebError::server_crypt_error)?;
    if !is_verified {
        return Err(WebError::auth_invalid_credentials());
    }

    start_session(&cookies, found.id()).await?;
    tracing::info!(user_id = %found.id(), "signed in");

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    post,
    path = "/logout/",
    description = "Drops the session cookie",
    responses(
        (status = 303, description = "Back to the landing page"),
    ),
    tag = "account"
)]
pub(crate) async fn logout_handler(cookies: Cookies) -> impl IntoResponse {
    cookies.remove(session_cookie_stub());

    Redirect::to("/")
}

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::{Cookie, Cookies};

use crate::{
    Config, auth,
    model::{ResourceTyped, entity::Account},
    web::{AppState, AuthenticatedUser, RequestContext, UserRole, WebError, error::LOGIN_URL},
};

pub static AUTH_TOKEN: &str = "SID";

/// Name and path of the session cookie, enough to remove it.
pub fn session_cookie_stub() -> Cookie<'static> {
    let mut cookie = Cookie::from(AUTH_TOKEN);
    cookie.set_path("/");
    cookie
}

/// Resolves the session cookie into a [`RequestContext`]. A missing cookie,
/// an expired or forged token, or one pointing at a deleted account yields
/// an anonymous context. Unusable tokens are dropped from the jar.
pub async fn extract_context_fn(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = match cookies.get(AUTH_TOKEN) {
        Some(token) => token,
        None => {
            req.extensions_mut().insert(RequestContext::anonymous());
            return Ok(next.run(req).await);
        }
    };

    let claims = match auth::process_token(token.value(), Config::get_or_init(false).await.app().jwt()) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("dropping unusable session cookie: {e}");
            cookies.remove(session_cookie_stub());
            req.extensions_mut().insert(RequestContext::anonymous());
            return Ok(next.run(req).await);
        }
    };

    let Ok(id) = claims.claims.sub.parse::<uuid::Uuid>() else {
        tracing::warn!("session token carries a malformed subject");
        cookies.remove(session_cookie_stub());
        req.extensions_mut().insert(RequestContext::anonymous());
        return Ok(next.run(req).await);
    };

    let account = Account::find_by_id(state.mm(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Account::get_resource_type(), e))?;

    let ctx = match account {
        Some(account) => RequestContext::new(Some(AuthenticatedUser::new(id, account.role()))),
        None => RequestContext::anonymous(),
    };
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

/// Sends anonymous visitors to the login page, remembering where they were
/// headed. Must run after [`extract_context_fn`].
pub async fn login_required(ctx: RequestContext, req: Request, next: Next) -> Response {
    if ctx.maybe_user().is_none() {
        let target = format!("{LOGIN_URL}?next={}", req.uri().path());
        return Redirect::to(&target).into_response();
    }

    next.run(req).await
}

/// Lets only accounts holding the role given as layer state through. Layer
/// it inside [`login_required`] so anonymous visitors get the redirect.
pub async fn role_required_fn(
    State(role): State<UserRole>,
    ctx: RequestContext,
    req: Request,
    next: Next,
) -> Result<Response, WebError> {
    ctx.require_role(role)?;

    Ok(next.run(req).await)
}

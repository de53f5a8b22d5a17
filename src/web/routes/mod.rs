use crate::{
    Config,
    model::{Page, PaginatableRepository, ReadRepository, Window},
    web::{AppState, RequestContext, UserRole, WebError, WebResult, doc::ApiDoc, middlewares},
};
use axum::{Json, Router, middleware};
use serde::Deserialize;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod account;
pub mod courses;
pub mod grades;
pub mod index;
pub mod lessons;
pub mod mentors;
pub mod signup;
pub mod students;
pub mod teachers;

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Page size, the whole collection when omitted
    limit: Option<i64>,
    offset: Option<i64>,
}

impl PaginationQuery {
    pub fn window(&self) -> Window {
        Window::new(self.limit, self.offset)
    }
}

pub fn build_app(state: AppState, config: &'static Config) -> Router {
    let mut router = Router::new()
        .merge(index::routes())
        .merge(account::routes())
        .merge(signup::routes())
        .merge(courses::routes())
        .merge(teachers::routes())
        .merge(students::routes())
        .merge(mentors::routes())
        .merge(lessons::routes())
        .merge(grades::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .layer(CookieManagerLayer::default())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    if config.app().docs() {
        let openapi = ApiDoc::openapi();

        router = router.merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", openapi));
    }

    router
}

/// Anonymous visitors of `router` are redirected to the login page.
fn login_required(router: Router<AppState>) -> Router<AppState> {
    router.route_layer(middleware::from_fn(middlewares::login_required))
}

/// Logged in and holding `role`, everyone else is forbidden.
fn role_required(router: Router<AppState>, role: UserRole) -> Router<AppState> {
    login_required(router.route_layer(middleware::from_fn_with_state(
        role,
        middlewares::role_required_fn,
    )))
}

/// Fetches one page of `T` with `filter` applied.
pub(crate) async fn list_resource<T>(
    state: &AppState,
    ctx: &RequestContext,
    filter: &T::Filter,
    page: &PaginationQuery,
) -> WebResult<Json<Page<T>>>
where
    T: PaginatableRepository,
{
    let page = T::page(state.mm(), ctx, filter, page.window())
        .await
        .map_err(|e| WebError::resource_fetch_error(T::get_resource_type(), e))?;

    Ok(Json(page))
}

/// Fetches a single `T`, not found when absent.
pub(crate) async fn detail_resource<T>(
    state: &AppState,
    ctx: &RequestContext,
    id: uuid::Uuid,
) -> WebResult<T>
where
    T: ReadRepository,
{
    T::find_by_id(state.mm(), ctx, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(T::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(T::get_resource_type()))
}

mod auth;
pub use auth::{AUTH_TOKEN, extract_context_fn, login_required, role_required_fn, session_cookie_stub};

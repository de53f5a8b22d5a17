mod context;
pub use context::{AuthenticatedUser, RequestContext, UserRole};

mod error;
pub use error::{LOGIN_URL, WebError, WebResult};

pub mod dto;
pub mod form;
pub mod middlewares;

mod state;
pub use state::AppState;

pub mod routes;

pub mod doc;

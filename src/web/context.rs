//! Request context, e.g. user id, its role, etc.
//!

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};

use crate::web::{WebResult, error::WebError};

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    user_id: uuid::Uuid,
    user_role: UserRole,
}

impl AuthenticatedUser {
    pub fn new(user_id: uuid::Uuid, user_role: UserRole) -> Self {
        Self { user_id, user_role }
    }

    pub fn user_id(&self) -> uuid::Uuid {
        self.user_id
    }

    pub fn user_role(&self) -> UserRole {
        self.user_role
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.user_role == role
    }

    pub fn is_student(&self) -> bool {
        self.has_role(UserRole::Student)
    }

    pub fn is_teacher(&self) -> bool {
        self.has_role(UserRole::Teacher)
    }

    pub fn is_mentor(&self) -> bool {
        self.has_role(UserRole::Mentor)
    }
}

/// Role discriminator of an account. Fixed at signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Teacher,
    Mentor,
    Unspecified,
}

impl UserRole {
    /// Roles a visitor may sign up as.
    pub const SIGNUP: [UserRole; 3] = [Self::Student, Self::Teacher, Self::Mentor];

    pub fn from_signup(value: &str) -> Option<Self> {
        Self::SIGNUP.into_iter().find(|role| role.as_str() == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Mentor => "mentor",
            Self::Unspecified => "unspecified",
        }
    }
}

impl From<&str> for UserRole {
    fn from(value: &str) -> Self {
        match value {
            "student" => Self::Student,
            "teacher" => Self::Teacher,
            "mentor" => Self::Mentor,
            _ => Self::Unspecified,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    maybe_user: Option<AuthenticatedUser>,
}

impl RequestContext {
    pub fn new(maybe_user: Option<AuthenticatedUser>) -> Self {
        Self { maybe_user }
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }

    pub fn maybe_user(&self) -> Option<&AuthenticatedUser> {
        self.maybe_user.as_ref()
    }

    pub fn user(&self) -> WebResult<&AuthenticatedUser> {
        self.maybe_user.as_ref().ok_or(WebError::auth_required())
    }

    /// Logged in *and* holding `role`. Anonymous requests get the login
    /// redirect, everyone else a forbidden error.
    pub fn require_role(&self, role: UserRole) -> WebResult<&AuthenticatedUser> {
        let user = self.user()?;
        if !user.has_role(role) {
            return Err(WebError::role_required(role, user.user_role()));
        }
        Ok(user)
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts.extensions.get::<RequestContext>();
        if let Some(ctx) = ctx {
            Ok(ctx.clone())
        } else {
            Ok(RequestContext::anonymous())
        }
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;

    use super::*;

    fn ctx(role: UserRole) -> RequestContext {
        RequestContext::new(Some(AuthenticatedUser::new(uuid::Uuid::new_v4(), role)))
    }

    #[test]
    fn predicates_match_only_their_role() {
        let teacher = AuthenticatedUser::new(uuid::Uuid::nil(), UserRole::Teacher);
        assert!(teacher.is_teacher());
        assert!(!teacher.is_student());
        assert!(!teacher.is_mentor());

        let nobody = AuthenticatedUser::new(uuid::Uuid::nil(), UserRole::Unspecified);
        assert!(!nobody.is_teacher() && !nobody.is_student() && !nobody.is_mentor());
    }

    #[test]
    fn require_role_accepts_matching_role() {
        for role in UserRole::SIGNUP {
            assert!(ctx(role).require_role(role).is_ok());
        }
    }

    #[test]
    fn require_role_forbids_other_roles() {
        let err = ctx(UserRole::Student)
            .require_role(UserRole::Teacher)
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let err = ctx(UserRole::Unspecified)
            .require_role(UserRole::Mentor)
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn require_role_sends_anonymous_to_login() {
        let err = RequestContext::anonymous()
            .require_role(UserRole::Teacher)
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::SEE_OTHER);
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [
            UserRole::Student,
            UserRole::Teacher,
            UserRole::Mentor,
            UserRole::Unspecified,
        ] {
            assert_eq!(UserRole::from(role.to_string().as_str()), role);
        }
        assert_eq!(UserRole::from("admin"), UserRole::Unspecified);
    }

    #[test]
    fn only_three_roles_can_sign_up() {
        assert_eq!(UserRole::from_signup("mentor"), Some(UserRole::Mentor));
        assert_eq!(UserRole::from_signup("unspecified"), None);
        assert_eq!(UserRole::from_signup("Teacher"), None);
    }
}

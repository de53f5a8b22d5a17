use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::model::entity::{AccountCreate, ProfileCreate};
use crate::web::UserRole;

pub const USERNAME_MAX: usize = 150;

/// One entry of the role chooser.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SignupChoice {
    pub role: UserRole,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SignupChoices {
    pub choices: Vec<SignupChoice>,
}

impl SignupChoices {
    pub fn all() -> Self {
        Self {
            choices: UserRole::SIGNUP
                .into_iter()
                .map(|role| SignupChoice {
                    role,
                    url: signup_url(role),
                })
                .collect(),
        }
    }
}

pub fn signup_url(role: UserRole) -> String {
    format!("/signup/{role}/")
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct SignupChoiceForm {
    #[serde(default)]
    #[validate(custom(function = "validate_signup_role"))]
    pub role: String,
}

fn validate_signup_role(value: &str) -> Result<(), ValidationError> {
    match UserRole::from_signup(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("role")
            .with_message("Select a valid choice: student, teacher or mentor.".into())),
    }
}

/// What the registration page for one role renders.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SignupFormInfo {
    pub user_type: UserRole,
    pub fields: Vec<String>,
}

impl SignupFormInfo {
    pub fn for_role(role: UserRole) -> Self {
        let mut fields = vec![
            "username",
            "password1",
            "password2",
            "first_name",
            "last_name",
            "email",
        ];
        match role {
            UserRole::Student => fields.push("course_id"),
            UserRole::Teacher => fields.extend(["course_id", "bio"]),
            UserRole::Mentor => fields.push("about"),
            UserRole::Unspecified => {}
        }
        Self {
            user_type: role,
            fields: fields.into_iter().map(String::from).collect(),
        }
    }
}

/// Registration form shared by all roles. Fields outside the role's
/// sub-schema are ignored.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct SignUpForm {
    #[serde(default)]
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[serde(default)]
    #[validate(
        length(
            min = 8,
            message = "This password is too short. It must contain at least 8 characters."
        ),
        must_match(other = "password2", message = "The two password fields didn't match.")
    )]
    pub password1: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password2: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[serde(default)]
    pub course_id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub bio: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub about: String,
}

/// Form clients submit untouched optional fields as `""`.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

fn validate_username(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required").with_message("This field is required.".into()));
    }
    if value.chars().count() > USERNAME_MAX {
        return Err(ValidationError::new("length")
            .with_message("Ensure this value has at most 150 characters.".into()));
    }
    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(ValidationError::new("username").with_message(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .into(),
        ));
    }
    Ok(())
}

impl SignUpForm {
    /// Course referenced by the role's sub-schema, if any.
    pub fn course_for(&self, role: UserRole) -> Option<Uuid> {
        match role {
            UserRole::Student | UserRole::Teacher => self.course_id,
            _ => None,
        }
    }

    /// `None` for roles nobody can sign up as.
    pub fn into_parts(
        self,
        role: UserRole,
        password_hash: String,
    ) -> Option<(AccountCreate, ProfileCreate)> {
        let profile = match role {
            UserRole::Student => ProfileCreate::Student {
                course_id: self.course_id,
            },
            UserRole::Teacher => ProfileCreate::Teacher {
                course_id: self.course_id,
                bio: self.bio,
            },
            UserRole::Mentor => ProfileCreate::Mentor { about: self.about },
            UserRole::Unspecified => return None,
        };

        let account = AccountCreate {
            username: self.username,
            password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email.unwrap_or_default(),
        };
        Some((account, profile))
    }
}

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::model::entity::LessonCreate;
use crate::web::{WebError, WebResult, form::REQUIRED};

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct LessonForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Required, at most 200 characters."))]
    pub title: String,
    #[serde(default)]
    #[validate(required(message = "This field is required."))]
    pub course_id: Option<Uuid>,
    #[serde(default)]
    #[validate(required(message = "This field is required."))]
    pub teacher_id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(max = 200), url(message = "Enter a valid URL."))]
    pub link: String,
}

impl LessonForm {
    pub fn into_create(self) -> WebResult<LessonCreate> {
        let course_id = self
            .course_id
            .ok_or_else(|| WebError::form_field("course_id", REQUIRED))?;
        let teacher_id = self
            .teacher_id
            .ok_or_else(|| WebError::form_field("teacher_id", REQUIRED))?;

        Ok(LessonCreate {
            title: self.title,
            course_id,
            teacher_id,
            link: self.link,
        })
    }
}

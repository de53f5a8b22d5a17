use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::model::entity::GradeUpdate;
use crate::web::{WebError, WebResult, form::REQUIRED};

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct GradeForm {
    #[serde(default)]
    #[validate(required(message = "This field is required."))]
    pub course_id: Option<Uuid>,
    #[serde(default)]
    #[validate(required(message = "This field is required."))]
    pub student_id: Option<Uuid>,
    #[serde(default)]
    #[validate(required(message = "This field is required."), range(min = 0, max = 100, message = "Must be between 0 and 100."))]
    pub homework1: Option<i32>,
    #[serde(default)]
    #[validate(required(message = "This field is required."), range(min = 0, max = 100, message = "Must be between 0 and 100."))]
    pub homework2: Option<i32>,
    #[serde(default)]
    #[validate(required(message = "This field is required."), range(min = 0, max = 100, message = "Must be between 0 and 100."))]
    pub project: Option<i32>,
    #[serde(default)]
    #[validate(required(message = "This field is required."), range(min = 0, max = 100, message = "Must be between 0 and 100."))]
    pub final_mark: Option<i32>,
}

fn required<T>(field: &str, value: Option<T>) -> WebResult<T> {
    value.ok_or_else(|| WebError::form_field(field, REQUIRED))
}

impl GradeForm {
    pub fn into_update(self) -> WebResult<GradeUpdate> {
        Ok(GradeUpdate {
            course_id: required("course_id", self.course_id)?,
            student_id: required("student_id", self.student_id)?,
            homework1: required("homework1", self.homework1)?,
            homework2: required("homework2", self.homework2)?,
            project: required("project", self.project)?,
            final_mark: required("final_mark", self.final_mark)?,
        })
    }
}

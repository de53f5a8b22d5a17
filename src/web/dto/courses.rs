use serde::{Deserialize, Serialize};

use crate::model::entity::{Course, Lesson};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<Lesson>,
}

use serde::{Deserialize, Serialize};

/// Landing page context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct IndexResponse {
    pub num_courses: i64,
    pub num_teachers: i64,
    pub num_students: i64,
}

impl From<(i64, i64, i64)> for IndexResponse {
    fn from((num_courses, num_teachers, num_students): (i64, i64, i64)) -> Self {
        Self {
            num_courses,
            num_teachers,
            num_students,
        }
    }
}

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::repo::{ResourceType, ResourceTyped};
use crate::model::{ModelManager, error::DatabaseResult};

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Grade {
    id: Uuid,
    course_id: Uuid,
    student_id: Uuid,
    homework1: i32,
    homework2: i32,
    project: i32,
    final_mark: i32,
}

/// Full set of grade columns, used for both insert and update.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct GradeUpdate {
    pub course_id: Uuid,
    pub student_id: Uuid,
    pub homework1: i32,
    pub homework2: i32,
    pub project: i32,
    pub final_mark: i32,
}

/// A grade together with the title of its course.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct GradeWithCourse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub course_title: String,
    pub homework1: i32,
    pub homework2: i32,
    pub project: i32,
    pub final_mark: i32,
}

impl ResourceTyped for Grade {
    fn get_resource_type() -> ResourceType {
        ResourceType::Grade
    }
}

impl Grade {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn project(&self) -> i32 {
        self.project
    }

    pub fn final_mark(&self) -> i32 {
        self.final_mark
    }
}

impl Grade {
    pub async fn create(mm: &ModelManager, data: GradeUpdate) -> DatabaseResult<Self> {
        let grade = sqlx::query_as(
            r#"
            INSERT INTO grades (id, course_id, student_id, homework1, homework2, project, final_mark)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.course_id)
        .bind(data.student_id)
        .bind(data.homework1)
        .bind(data.homework2)
        .bind(data.project)
        .bind(data.final_mark)
        .fetch_one(mm.executor())
        .await?;
        Ok(grade)
    }

    pub async fn update(mut self, mm: &ModelManager, data: GradeUpdate) -> DatabaseResult<Self> {
        sqlx::query(
            r#"
            UPDATE grades
            SET course_id = $1, student_id = $2, homework1 = $3, homework2 = $4,
                project = $5, final_mark = $6
            WHERE id = $7
            "#,
        )
        .bind(data.course_id)
        .bind(data.student_id)
        .bind(data.homework1)
        .bind(data.homework2)
        .bind(data.project)
        .bind(data.final_mark)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.course_id = data.course_id;
        self.student_id = data.student_id;
        self.homework1 = data.homework1;
        self.homework2 = data.homework2;
        self.project = data.project;
        self.final_mark = data.final_mark;

        tracing::info!(grade_id = %self.id, student_id = %self.student_id, "grade updated");
        Ok(self)
    }

    pub async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM grades WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn all_by_student(
        mm: &ModelManager,
        student_id: Uuid,
    ) -> DatabaseResult<Vec<GradeWithCourse>> {
        let result = sqlx::query_as(
            r#"
            SELECT
                g.id,
                g.course_id,
                c.title AS course_title,
                g.homework1,
                g.homework2,
                g.project,
                g.final_mark
            FROM grades g
            JOIN courses c ON c.id = g.course_id
            WHERE g.student_id = $1
            ORDER BY c.title
            "#,
        )
        .bind(student_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}

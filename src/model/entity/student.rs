use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::impl_paginatable_for;
use crate::model::filter::{FilterSet, WhereClause};
use crate::model::repo::{ReadRepository, ResourceType, ResourceTyped, Window};
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::RequestContext;

const SELECT_STUDENTS: &str = r#"
    SELECT
        s.id,
        s.user_id,
        u.username,
        u.first_name,
        u.last_name,
        u.email,
        s.course_id,
        c.title AS course_title
    FROM students s
    JOIN users u ON u.id = s.user_id
    LEFT JOIN courses c ON c.id = s.course_id"#;

const COUNT_STUDENTS: &str = "SELECT COUNT(*) FROM students s JOIN users u ON u.id = s.user_id";

/// Student profile joined with its account.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Student {
    id: Uuid,
    user_id: Uuid,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    course_id: Option<Uuid>,
    course_title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentFilter {
    /// Case-insensitive substring of the first name
    pub first_name: Option<String>,
    /// Case-insensitive substring of the last name
    pub last_name: Option<String>,
    /// Exact course id
    pub course: Option<Uuid>,
}

impl FilterSet for StudentFilter {
    fn apply<'args>(&self, clause: &mut WhereClause<'_, 'args>) {
        clause
            .icontains("u.first_name", self.first_name.as_deref())
            .icontains("u.last_name", self.last_name.as_deref())
            .exact("s.course_id", self.course);
    }
}

impl ResourceTyped for Student {
    fn get_resource_type() -> ResourceType {
        ResourceType::Student
    }
}

impl Student {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

#[async_trait]
impl ReadRepository for Student {
    type Filter = StudentFilter;

    async fn find_by_id(
        mm: &ModelManager,
        _ctx: &RequestContext,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(&format!("{SELECT_STUDENTS} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(
        mm: &ModelManager,
        _ctx: &RequestContext,
        filter: &StudentFilter,
        window: Window,
    ) -> DatabaseResult<Vec<Self>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_STUDENTS);
        filter.apply(&mut WhereClause::new(&mut qb));
        qb.push(" ORDER BY u.last_name, u.first_name, u.username");
        window.push_to(&mut qb);

        let result = qb.build_query_as::<Self>().fetch_all(mm.executor()).await?;
        Ok(result)
    }

    async fn count(
        mm: &ModelManager,
        _ctx: &RequestContext,
        filter: &StudentFilter,
    ) -> DatabaseResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new(COUNT_STUDENTS);
        filter.apply(&mut WhereClause::new(&mut qb));

        let result: i64 = qb.build_query_scalar::<i64>().fetch_one(mm.executor()).await?;
        Ok(result)
    }
}

impl_paginatable_for!(Student);

impl Student {
    pub(crate) async fn insert(
        conn: &mut PgConnection,
        user_id: Uuid,
        course_id: Option<Uuid>,
    ) -> DatabaseResult<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO students (id, user_id, course_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(course_id)
        .fetch_one(conn)
        .await?;
        Ok(id)
    }

    pub async fn find_by_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(&format!("{SELECT_STUDENTS} WHERE s.user_id = $1"))
            .bind(user_id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn exists(mm: &ModelManager, id: Uuid) -> DatabaseResult<bool> {
        let result: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
            .bind(id)
            .fetch_one(mm.executor())
            .await?;
        Ok(result)
    }

    /// Moves the student to `course_id`, or out of any course.
    pub async fn enroll(
        mm: &ModelManager,
        id: Uuid,
        course_id: Option<Uuid>,
    ) -> DatabaseResult<bool> {
        let result = sqlx::query("UPDATE students SET course_id = $1 WHERE id = $2")
            .bind(course_id)
            .bind(id)
            .execute(mm.executor())
            .await?;
        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn filter_targets_joined_columns() {
        let filter = StudentFilter {
            first_name: Some("ann".into()),
            last_name: None,
            course: Some(Uuid::nil()),
        };
        let mut qb = QueryBuilder::<Postgres>::new(COUNT_STUDENTS);
        filter.apply(&mut WhereClause::new(&mut qb));
        assert!(qb.sql().ends_with("WHERE u.first_name ILIKE $1 AND s.course_id = $2"));
    }
}

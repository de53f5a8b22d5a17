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

const SELECT_TEACHERS: &str = r#"
    SELECT
        t.id,
        t.user_id,
        u.username,
        u.first_name,
        u.last_name,
        u.email,
        t.course_id,
        c.title AS course_title,
        t.bio
    FROM teachers t
    JOIN users u ON u.id = t.user_id
    LEFT JOIN courses c ON c.id = t.course_id"#;

const COUNT_TEACHERS: &str = "SELECT COUNT(*) FROM teachers t JOIN users u ON u.id = t.user_id";

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Teacher {
    id: Uuid,
    user_id: Uuid,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    course_id: Option<Uuid>,
    course_title: Option<String>,
    bio: String,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeacherFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub course: Option<Uuid>,
}

impl FilterSet for TeacherFilter {
    fn apply<'args>(&self, clause: &mut WhereClause<'_, 'args>) {
        clause
            .icontains("u.first_name", self.first_name.as_deref())
            .icontains("u.last_name", self.last_name.as_deref())
            .exact("t.course_id", self.course);
    }
}

impl ResourceTyped for Teacher {
    fn get_resource_type() -> ResourceType {
        ResourceType::Teacher
    }
}

impl Teacher {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

#[async_trait]
impl ReadRepository for Teacher {
    type Filter = TeacherFilter;

    async fn find_by_id(
        mm: &ModelManager,
        _ctx: &RequestContext,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(&format!("{SELECT_TEACHERS} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(
        mm: &ModelManager,
        _ctx: &RequestContext,
        filter: &TeacherFilter,
        window: Window,
    ) -> DatabaseResult<Vec<Self>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_TEACHERS);
        filter.apply(&mut WhereClause::new(&mut qb));
        qb.push(" ORDER BY u.last_name, u.first_name, u.username");
        window.push_to(&mut qb);

        let result = qb.build_query_as::<Self>().fetch_all(mm.executor()).await?;
        Ok(result)
    }

    async fn count(
        mm: &ModelManager,
        _ctx: &RequestContext,
        filter: &TeacherFilter,
    ) -> DatabaseResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new(COUNT_TEACHERS);
        filter.apply(&mut WhereClause::new(&mut qb));

        let result: i64 = qb.build_query_scalar::<i64>().fetch_one(mm.executor()).await?;
        Ok(result)
    }
}

impl_paginatable_for!(Teacher);

impl Teacher {
    pub(crate) async fn insert(
        conn: &mut PgConnection,
        user_id: Uuid,
        course_id: Option<Uuid>,
        bio: &str,
    ) -> DatabaseResult<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO teachers (id, user_id, course_id, bio) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(course_id)
        .bind(bio)
        .fetch_one(conn)
        .await?;
        Ok(id)
    }

    pub async fn find_by_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(&format!("{SELECT_TEACHERS} WHERE t.user_id = $1"))
            .bind(user_id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn exists(mm: &ModelManager, id: Uuid) -> DatabaseResult<bool> {
        let result: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1)")
            .bind(id)
            .fetch_one(mm.executor())
            .await?;
        Ok(result)
    }
}

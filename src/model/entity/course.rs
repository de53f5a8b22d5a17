use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::impl_paginatable_for;
use crate::model::filter::{FilterSet, WhereClause};
use crate::model::repo::{ReadRepository, ResourceType, ResourceTyped, Window};
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::RequestContext;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Course {
    id: Uuid,
    title: String,
    description: String,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CourseCreate {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
}

impl FilterSet for CourseFilter {
    fn apply<'args>(&self, clause: &mut WhereClause<'_, 'args>) {
        clause.icontains("c.title", self.title.as_deref());
    }
}

impl ResourceTyped for Course {
    fn get_resource_type() -> ResourceType {
        ResourceType::Course
    }
}

impl Course {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

#[async_trait]
impl ReadRepository for Course {
    type Filter = CourseFilter;

    async fn find_by_id(
        mm: &ModelManager,
        _ctx: &RequestContext,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT c.id, c.title, c.description FROM courses c WHERE c.id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(
        mm: &ModelManager,
        _ctx: &RequestContext,
        filter: &CourseFilter,
        window: Window,
    ) -> DatabaseResult<Vec<Self>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT c.id, c.title, c.description FROM courses c");
        filter.apply(&mut WhereClause::new(&mut qb));
        qb.push(" ORDER BY c.title, c.id");
        window.push_to(&mut qb);

        let result = qb.build_query_as::<Self>().fetch_all(mm.executor()).await?;
        Ok(result)
    }

    async fn count(
        mm: &ModelManager,
        _ctx: &RequestContext,
        filter: &CourseFilter,
    ) -> DatabaseResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM courses c");
        filter.apply(&mut WhereClause::new(&mut qb));

        let result: i64 = qb.build_query_scalar::<i64>().fetch_one(mm.executor()).await?;
        Ok(result)
    }
}

impl_paginatable_for!(Course);

impl Course {
    pub async fn create(mm: &ModelManager, data: CourseCreate) -> DatabaseResult<Self> {
        let course = sqlx::query_as(
            "INSERT INTO courses (id, title, description) VALUES ($1, $2, $3) RETURNING id, title, description",
        )
        .bind(Uuid::new_v4())
        .bind(&data.title)
        .bind(&data.description)
        .fetch_one(mm.executor())
        .await?;
        Ok(course)
    }

    pub async fn exists(mm: &ModelManager, id: Uuid) -> DatabaseResult<bool> {
        let result: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1)")
            .bind(id)
            .fetch_one(mm.executor())
            .await?;
        Ok(result)
    }
}

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

const SELECT_MENTORS: &str = r#"
    SELECT
        m.id,
        m.user_id,
        u.username,
        u.first_name,
        u.last_name,
        u.email,
        m.about
    FROM mentors m
    JOIN users u ON u.id = m.user_id"#;

const COUNT_MENTORS: &str = "SELECT COUNT(*) FROM mentors m JOIN users u ON u.id = m.user_id";

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Mentor {
    id: Uuid,
    user_id: Uuid,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    about: String,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MentorFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl FilterSet for MentorFilter {
    fn apply<'args>(&self, clause: &mut WhereClause<'_, 'args>) {
        clause
            .icontains("u.first_name", self.first_name.as_deref())
            .icontains("u.last_name", self.last_name.as_deref());
    }
}

impl ResourceTyped for Mentor {
    fn get_resource_type() -> ResourceType {
        ResourceType::Mentor
    }
}

impl Mentor {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

#[async_trait]
impl ReadRepository for Mentor {
    type Filter = MentorFilter;

    async fn find_by_id(
        mm: &ModelManager,
        _ctx: &RequestContext,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(&format!("{SELECT_MENTORS} WHERE m.id = $1"))
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(
        mm: &ModelManager,
        _ctx: &RequestContext,
        filter: &MentorFilter,
        window: Window,
    ) -> DatabaseResult<Vec<Self>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_MENTORS);
        filter.apply(&mut WhereClause::new(&mut qb));
        qb.push(" ORDER BY u.last_name, u.first_name, u.username");
        window.push_to(&mut qb);

        let result = qb.build_query_as::<Self>().fetch_all(mm.executor()).await?;
        Ok(result)
    }

    async fn count(
        mm: &ModelManager,
        _ctx: &RequestContext,
        filter: &MentorFilter,
    ) -> DatabaseResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new(COUNT_MENTORS);
        filter.apply(&mut WhereClause::new(&mut qb));

        let result: i64 = qb.build_query_scalar::<i64>().fetch_one(mm.executor()).await?;
        Ok(result)
    }
}

impl_paginatable_for!(Mentor);

impl Mentor {
    pub(crate) async fn insert(
        conn: &mut PgConnection,
        user_id: Uuid,
        about: &str,
    ) -> DatabaseResult<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO mentors (id, user_id, about) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(about)
        .fetch_one(conn)
        .await?;
        Ok(id)
    }
}

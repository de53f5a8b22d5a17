use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::impl_paginatable_for;
use crate::model::filter::{FilterSet, WhereClause};
use crate::model::repo::{ReadRepository, ResourceType, ResourceTyped, Window};
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::RequestContext;

const SELECT_LESSONS: &str =
    "SELECT l.id, l.title, l.course_id, l.teacher_id, l.link, l.created_at FROM lessons l";

const COUNT_LESSONS: &str = "SELECT COUNT(*) FROM lessons l";

// lesson -> course -> student -> account
const STUDENT_SCOPE: &str = " JOIN courses c ON c.id = l.course_id JOIN students s ON s.course_id = c.id";

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Lesson {
    id: Uuid,
    title: String,
    course_id: Uuid,
    teacher_id: Uuid,
    link: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LessonCreate {
    pub title: String,
    pub course_id: Uuid,
    pub teacher_id: Uuid,
    pub link: String,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LessonFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Exact course id
    pub course: Option<Uuid>,
    /// Exact teacher id
    pub teacher: Option<Uuid>,
}

impl FilterSet for LessonFilter {
    fn apply<'args>(&self, clause: &mut WhereClause<'_, 'args>) {
        clause
            .icontains("l.title", self.title.as_deref())
            .exact("l.course_id", self.course)
            .exact("l.teacher_id", self.teacher);
    }
}

impl ResourceTyped for Lesson {
    fn get_resource_type() -> ResourceType {
        ResourceType::Lesson
    }
}

impl Lesson {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// Students only see lessons of the course they are enrolled in, everybody
/// else sees all of them.
fn scoped_query<'args>(
    head: &str,
    ctx: &RequestContext,
    filter: &LessonFilter,
) -> QueryBuilder<'args, Postgres> {
    let student = ctx
        .maybe_user()
        .filter(|user| user.is_student())
        .map(|user| user.user_id());

    let mut qb = QueryBuilder::new(head);
    if student.is_some() {
        qb.push(STUDENT_SCOPE);
    }

    let mut clause = WhereClause::new(&mut qb);
    if let Some(user_id) = student {
        clause.and().push("s.user_id = ").push_bind(user_id);
    }
    filter.apply(&mut clause);

    qb
}

#[async_trait]
impl ReadRepository for Lesson {
    type Filter = LessonFilter;

    async fn find_by_id(
        mm: &ModelManager,
        _ctx: &RequestContext,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(&format!("{SELECT_LESSONS} WHERE l.id = $1"))
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(
        mm: &ModelManager,
        ctx: &RequestContext,
        filter: &LessonFilter,
        window: Window,
    ) -> DatabaseResult<Vec<Self>> {
        let mut qb = scoped_query(SELECT_LESSONS, ctx, filter);
        qb.push(" ORDER BY l.created_at, l.id");
        window.push_to(&mut qb);

        let result = qb.build_query_as::<Self>().fetch_all(mm.executor()).await?;
        Ok(result)
    }

    async fn count(
        mm: &ModelManager,
        ctx: &RequestContext,
        filter: &LessonFilter,
    ) -> DatabaseResult<i64> {
        let mut qb = scoped_query(COUNT_LESSONS, ctx, filter);

        let result: i64 = qb.build_query_scalar::<i64>().fetch_one(mm.executor()).await?;
        Ok(result)
    }
}

impl_paginatable_for!(Lesson);

impl Lesson {
    pub async fn create(mm: &ModelManager, data: LessonCreate) -> DatabaseResult<Self> {
        let lesson: Lesson = sqlx::query_as(
            r#"
            INSERT INTO lessons (id, title, course_id, teacher_id, link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, course_id, teacher_id, link, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.title)
        .bind(data.course_id)
        .bind(data.teacher_id)
        .bind(&data.link)
        .fetch_one(mm.executor())
        .await?;

        tracing::info!(lesson_id = %lesson.id, course_id = %lesson.course_id, "lesson created");
        Ok(lesson)
    }

    pub async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        tracing::info!(lesson_id = %self.id, "lesson deleted");
        Ok(())
    }

    pub async fn all_by_course(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(&format!(
            "{SELECT_LESSONS} WHERE l.course_id = $1 ORDER BY l.created_at, l.id"
        ))
        .bind(course_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}

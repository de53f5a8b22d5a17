use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

use crate::{
    model::{ModelManager, error::DatabaseResult, filter::FilterSet},
    web::RequestContext,
};

pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResourceType {
    Account,
    Course,
    Teacher,
    Student,
    Mentor,
    Lesson,
    Grade,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: Option<i64>,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, window: Window) -> Self {
        Self {
            items,
            total,
            limit: window.limit(),
            offset: window.offset(),
        }
    }
}

/// Slice of a listing. Without a limit the whole collection is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Window {
    limit: Option<i64>,
    offset: i64,
}

impl Window {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.map(|l| l.clamp(1, MAX_PAGE_SIZE)),
            offset: offset.unwrap_or(0).max(0),
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub(crate) fn push_to(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(limit) = self.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }
        if self.offset > 0 {
            qb.push(" OFFSET ").push_bind(self.offset);
        }
    }
}

pub trait ResourceTyped {
    fn get_resource_type() -> ResourceType;
}

/// Read side shared by every list/detail view.
#[async_trait::async_trait]
pub trait ReadRepository: ResourceTyped + Sized {
    type Filter: FilterSet + Send + Sync;

    async fn find_by_id(
        mm: &ModelManager,
        ctx: &RequestContext,
        id: uuid::Uuid,
    ) -> DatabaseResult<Option<Self>>;

    async fn list(
        mm: &ModelManager,
        ctx: &RequestContext,
        filter: &Self::Filter,
        window: Window,
    ) -> DatabaseResult<Vec<Self>>;

    async fn count(
        mm: &ModelManager,
        ctx: &RequestContext,
        filter: &Self::Filter,
    ) -> DatabaseResult<i64>;
}

#[async_trait::async_trait]
pub trait PaginatableRepository: ReadRepository {
    async fn page(
        mm: &ModelManager,
        ctx: &RequestContext,
        filter: &Self::Filter,
        window: Window,
    ) -> DatabaseResult<Page<Self>>;
}

#[macro_export]
macro_rules! impl_paginatable_for {
    ($ent:ident) => {
        #[async_trait::async_trait]
        impl $crate::model::PaginatableRepository for $ent {
            async fn page(
                mm: &$crate::model::ModelManager,
                ctx: &$crate::web::RequestContext,
                filter: &<$ent as $crate::model::ReadRepository>::Filter,
                window: $crate::model::Window,
            ) -> $crate::model::DatabaseResult<$crate::model::Page<$ent>> {
                let items = <$ent as $crate::model::ReadRepository>::list(mm, ctx, filter, window).await?;
                let count = <$ent as $crate::model::ReadRepository>::count(mm, ctx, filter).await?;
                Ok($crate::model::Page::new(items, count, window))
            }
        }
    };
}

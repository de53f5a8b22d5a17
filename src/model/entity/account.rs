use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::entity::{Mentor, Student, Teacher};
use crate::model::repo::{ResourceType, ResourceTyped};
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::UserRole;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Account {
    id: Uuid,
    username: String,
    #[serde(skip)]
    password_hash: String,
    role: String,
    first_name: String,
    last_name: String,
    email: String,
    date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AccountCreate {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Role-specific half of a signup. The variant decides the account's role.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileCreate {
    Student { course_id: Option<Uuid> },
    Teacher { course_id: Option<Uuid>, bio: String },
    Mentor { about: String },
}

impl ProfileCreate {
    pub fn role(&self) -> UserRole {
        match self {
            Self::Student { .. } => UserRole::Student,
            Self::Teacher { .. } => UserRole::Teacher,
            Self::Mentor { .. } => UserRole::Mentor,
        }
    }

    async fn insert(&self, conn: &mut PgConnection, user_id: Uuid) -> DatabaseResult<Uuid> {
        match self {
            Self::Student { course_id } => Student::insert(conn, user_id, *course_id).await,
            Self::Teacher { course_id, bio } => Teacher::insert(conn, user_id, *course_id, bio).await,
            Self::Mentor { about } => Mentor::insert(conn, user_id, about).await,
        }
    }
}

impl ResourceTyped for Account {
    fn get_resource_type() -> ResourceType {
        ResourceType::Account
    }
}

impl Account {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> UserRole {
        UserRole::from(self.role.as_str())
    }
}

impl Account {
    async fn insert(
        conn: &mut PgConnection,
        data: &AccountCreate,
        role: UserRole,
    ) -> DatabaseResult<Self> {
        let account = sqlx::query_as(
            r#"
            INSERT INTO users (id, username, password_hash, role, first_name, last_name, email)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.username)
        .bind(&data.password_hash)
        .bind(role.to_string())
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .fetch_one(conn)
        .await?;

        Ok(account)
    }

    /// Account without any profile, role `unspecified`.
    pub async fn create(mm: &ModelManager, data: AccountCreate) -> DatabaseResult<Self> {
        let mut conn = mm.executor().acquire().await?;
        Self::insert(&mut conn, &data, UserRole::Unspecified).await
    }

    /// Inserts the account and its role profile in one transaction. Either
    /// both rows exist afterwards or neither does.
    pub async fn create_with_profile(
        mm: &ModelManager,
        data: AccountCreate,
        profile: ProfileCreate,
    ) -> DatabaseResult<Self> {
        let mut tx = mm.begin().await?;

        let account = Self::insert(&mut tx, &data, profile.role()).await?;
        let profile_id = profile.insert(&mut tx, account.id).await?;

        tx.commit().await?;

        tracing::info!(
            user_id = %account.id,
            %profile_id,
            role = %account.role,
            "account created"
        );
        Ok(account)
    }

    pub async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn find_by_username(
        mm: &ModelManager,
        username: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

use thiserror::Error;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Name of the violated unique constraint, if that is what happened.
    pub fn unique_violation(&self) -> Option<&str> {
        match self {
            Self::SqlxError(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Some(e.constraint().unwrap_or_default())
            }
            _ => None,
        }
    }

    /// Name of the violated foreign key, e.g. `lessons_teacher_id_fkey`.
    pub fn foreign_key_violation(&self) -> Option<&str> {
        match self {
            Self::SqlxError(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Some(e.constraint().unwrap_or_default())
            }
            _ => None,
        }
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.foreign_key_violation().is_some()
    }
}

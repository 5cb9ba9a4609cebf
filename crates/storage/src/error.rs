use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::NotFound | StorageError::Database(sqlx::Error::RowNotFound)
        )
    }

    /// True when a conditional write lost against a concurrent writer or a
    /// unique/foreign key constraint.
    pub fn is_conflict(&self) -> bool {
        match self {
            StorageError::ConstraintViolation(_) => true,
            StorageError::Database(sqlx::Error::Database(e)) => {
                matches!(e.code().as_deref(), Some("23505") | Some("23503"))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_variants() {
        assert!(StorageError::NotFound.is_not_found());
        assert!(StorageError::Database(sqlx::Error::RowNotFound).is_not_found());
        assert!(!StorageError::Unavailable("down".into()).is_not_found());
    }

    #[test]
    fn test_constraint_violation_is_conflict() {
        assert!(StorageError::ConstraintViolation("taken".into()).is_conflict());
        assert!(!StorageError::NotFound.is_conflict());
    }
}

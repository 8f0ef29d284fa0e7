//! Helpers for reading Postgres errors out of `anyhow` chains.

/// True when the chain carries a unique-constraint violation.
pub fn is_unique_violation(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db)) if db.is_unique_violation()
    )
}

/// A unique-violation error as sqlx would report it, for handler tests.
#[cfg(test)]
pub(crate) fn unique_violation(context: &'static str) -> anyhow::Error {
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::error::Error as StdError;

    #[derive(Debug, thiserror::Error)]
    #[error("duplicate key value violates unique constraint")]
    struct Duplicate;

    impl DatabaseError for Duplicate {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }
        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }
        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    anyhow::Error::new(sqlx::Error::Database(Box::new(Duplicate))).context(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&anyhow::anyhow!("boom")));
        let wrapped = anyhow::Error::new(sqlx::Error::RowNotFound).context("insert user");
        assert!(!is_unique_violation(&wrapped));
    }

    #[test]
    fn detects_violation_behind_context() {
        assert!(is_unique_violation(&unique_violation("insert user")));
    }
}

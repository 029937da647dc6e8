use rusqlite::ffi::ErrorCode;
use thiserror::Error;

/// Errors surfaced by ledger operations.
///
/// Compound operations run inside a single store transaction, so any of these
/// means nothing was written.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("referential integrity violation: {0}")]
    ReferentialIntegrity(String),

    #[error("duplicate: {0}")]
    Duplicate(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(rusqlite::Error),
}

impl LedgerError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &err {
            if failure.code == ErrorCode::ConstraintViolation {
                let detail = message.clone().unwrap_or_else(|| failure.to_string());
                match failure.extended_code {
                    SQLITE_CONSTRAINT_FOREIGNKEY => return Self::ReferentialIntegrity(detail),
                    SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY => {
                        return Self::Duplicate(detail)
                    }
                    _ => {}
                }
            }
        }
        Self::Storage(err)
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rusqlite::Connection;

    fn constraint_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys=ON;
             CREATE TABLE parent (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);
             CREATE TABLE child (id INTEGER PRIMARY KEY, parent_id INTEGER NOT NULL REFERENCES parent(id));
             INSERT INTO parent (id, name) VALUES (1, 'a');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_foreign_key_failure_is_referential_integrity() {
        let conn = constraint_db();
        let err = conn
            .execute("INSERT INTO child (parent_id) VALUES (42)", [])
            .unwrap_err();
        assert!(matches!(
            LedgerError::from(err),
            LedgerError::ReferentialIntegrity(_)
        ));
    }

    #[test]
    fn test_unique_failure_is_duplicate() {
        let conn = constraint_db();
        let err = conn
            .execute("INSERT INTO parent (name) VALUES ('a')", [])
            .unwrap_err();
        assert!(matches!(LedgerError::from(err), LedgerError::Duplicate(_)));
    }

    #[test]
    fn test_other_failures_are_storage() {
        let conn = constraint_db();
        let err = conn.execute("SELECT * FROM missing", []).unwrap_err();
        assert!(matches!(LedgerError::from(err), LedgerError::Storage(_)));
    }

    #[test]
    fn test_not_found_message() {
        let err = LedgerError::not_found("installation", 7);
        assert_eq!(err.to_string(), "installation 7 not found");
    }
}

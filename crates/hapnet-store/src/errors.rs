//! Error handling for hapnet-store
//!
//! Wraps the hapnet-core ExError facility with store-specific helpers

use hapnet_core::errors::{ExError, ExErrorKind, VersionError};
use rusqlite::ErrorCode;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_entity_id(migration_id)
        .with_message(format!(
            "Checksum mismatch for migration {}: recorded {}, embedded {}",
            migration_id, expected, actual
        ))
}

/// Create a seed validation error
pub fn seed_validation(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("seed_parse")
        .with_message(reason.to_string())
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Whether a rusqlite error is a UNIQUE (or PRIMARY KEY) constraint violation
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        }
        _ => false,
    }
}

/// Map an insert failure on `versions`: a unique violation is a duplicate tag
pub fn from_version_insert(err: rusqlite::Error, tag: &str) -> ExError {
    if is_unique_violation(&err) {
        VersionError::DuplicateTag {
            tag: tag.to_string(),
        }
        .into()
    } else {
        ExError::new(ExErrorKind::Persistence)
            .with_op("insert_version")
            .with_entity_id(tag)
            .with_message(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unique_violation_detected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (tag TEXT NOT NULL UNIQUE, n INTEGER CHECK (n > 0))")
            .unwrap();
        conn.execute("INSERT INTO t (tag, n) VALUES ('a', 1)", [])
            .unwrap();

        let dup = conn
            .execute("INSERT INTO t (tag, n) VALUES ('a', 1)", [])
            .unwrap_err();
        assert!(is_unique_violation(&dup));
        assert_eq!(
            from_version_insert(dup, "a").kind(),
            ExErrorKind::DuplicateTag
        );

        let check = conn
            .execute("INSERT INTO t (tag, n) VALUES ('b', 0)", [])
            .unwrap_err();
        assert!(!is_unique_violation(&check));
        assert_eq!(
            from_version_insert(check, "b").kind(),
            ExErrorKind::Persistence
        );
    }
}

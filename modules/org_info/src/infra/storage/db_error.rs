//! Translation of SeaORM errors into the domain taxonomy. Nothing driver
//! specific leaves this module.

use sea_orm::{DbErr, SqlErr};
use tracing::error;

use crate::domain::error::DomainError;

/// Returns true if the given SQLSTATE/extended code is a unique violation
/// (Postgres 23505, SQLite 2067/1555, MySQL 1062).
pub fn is_unique_violation_code(code: &str) -> bool {
    matches!(code, "23505" | "2067" | "1555" | "1062")
}

/// Returns true if the given code is a foreign key violation
/// (Postgres 23503, SQLite 787 and 1811 for RESTRICT actions, MySQL 1451/1452).
pub fn is_foreign_key_violation_code(code: &str) -> bool {
    matches!(code, "23503" | "787" | "1811" | "1451" | "1452")
}

fn constraint_code(err: &DbErr) -> Option<String> {
    let runtime = match err {
        DbErr::Exec(e) | DbErr::Query(e) | DbErr::Conn(e) => e,
        _ => return None,
    };
    match runtime {
        sea_orm::RuntimeErr::SqlxError(sea_orm::sqlx::Error::Database(db)) => {
            db.code().map(|c| c.into_owned())
        }
        _ => None,
    }
}

/// Map a store error for `operation` onto one of the four domain kinds.
///
/// Constraint violations become `Conflict`; a missing row on update becomes
/// `NotFound` via `not_found`; everything else is an outage.
pub fn map_db_err(
    err: DbErr,
    operation: &str,
    not_found: impl FnOnce() -> DomainError,
) -> DomainError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            return DomainError::conflict(format!("{operation}: unique constraint violated: {detail}"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            return DomainError::conflict(format!(
                "{operation}: foreign key constraint violated: {detail}"
            ))
        }
        _ => {}
    }

    if let Some(code) = constraint_code(&err) {
        if is_unique_violation_code(&code) {
            return DomainError::conflict(format!("{operation}: unique constraint violated"));
        }
        if is_foreign_key_violation_code(&code) {
            return DomainError::conflict(format!("{operation}: foreign key constraint violated"));
        }
    }

    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => not_found(),
        other => {
            error!(operation, error = %other, "store operation failed");
            DomainError::store_unavailable(format!("{operation} failed: {other}"))
        }
    }
}

use thiserror::Error;

/// Failures raised by a [`crate::Table`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DbError {
    #[error("{table} {id} not found")]
    NotFound { table: &'static str, id: u64 },

    #[error("{table}.{field} must be unique; '{value}' already exists")]
    UniqueViolation {
        table: &'static str,
        field: &'static str,
        value: String,
    },
}

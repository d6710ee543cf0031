use thiserror::Error;

use crate::libs::schema::FieldType;

pub type Result<T> = std::result::Result<T, TableError>;

/// SQLSTATE for `duplicate_table`.
const DUPLICATE_TABLE: &str = "42P07";
/// SQLSTATE for `duplicate_column`.
const DUPLICATE_COLUMN: &str = "42701";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid field type '{0}', expected one of string, number, boolean")]
    InvalidFieldType(String),

    #[error("Invalid value for field '{field}': expected {expected}")]
    InvalidFieldValue { field: String, expected: String },

    #[error("Table '{0}' already exists")]
    DuplicateTable(String),

    #[error("Column '{column}' already exists on table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Column '{column}' has unsupported type '{data_type}'")]
    UnsupportedColumnType { column: String, data_type: String },

    #[error("Table creation failed: {0}")]
    TableCreationFailed(#[source] sqlx::Error),

    #[error("Column addition failed after applying [{}]: {source}", .applied.join(", "))]
    ColumnAdditionFailed {
        applied: Vec<String>,
        #[source]
        source: sqlx::Error,
    },

    #[error("Row insert failed: {0}")]
    RowInsertFailed(#[source] sqlx::Error),

    #[error("Row fetch failed: {0}")]
    RowFetchFailed(#[source] sqlx::Error),
}

impl TableError {
    pub fn invalid_value(field: &str, expected: impl Into<String>) -> Self {
        TableError::InvalidFieldValue {
            field: field.to_string(),
            expected: expected.into(),
        }
    }

    pub fn expected_kind(field: &str, ty: FieldType) -> Self {
        Self::invalid_value(field, ty.as_str())
    }

    /// Stable machine-readable code, also used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            TableError::InvalidInput(_) => "INVALID_INPUT",
            TableError::InvalidFieldType(_) => "INVALID_FIELD_TYPE",
            TableError::InvalidFieldValue { .. } => "INVALID_FIELD_VALUE",
            TableError::DuplicateTable(_) => "DUPLICATE_TABLE",
            TableError::DuplicateColumn { .. } => "DUPLICATE_COLUMN",
            TableError::TableNotFound(_) => "TABLE_NOT_FOUND",
            TableError::UnsupportedColumnType { .. } => "UNSUPPORTED_COLUMN_TYPE",
            TableError::TableCreationFailed(_) => "TABLE_CREATION_FAILED",
            TableError::ColumnAdditionFailed { .. } => "COLUMN_ADDITION_FAILED",
            TableError::RowInsertFailed(_) => "ROW_INSERT_FAILED",
            TableError::RowFetchFailed(_) => "ROW_FETCH_FAILED",
        }
    }
}

fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

pub(crate) fn is_duplicate_table(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(DUPLICATE_TABLE)
}

pub(crate) fn is_duplicate_column(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(DUPLICATE_COLUMN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = TableError::expected_kind("field2", FieldType::Number);
        assert_eq!(
            err.to_string(),
            "Invalid value for field 'field2': expected number"
        );
        assert_eq!(err.code(), "INVALID_FIELD_VALUE");
    }

    #[test]
    fn column_addition_lists_applied_columns() {
        let err = TableError::ColumnAdditionFailed {
            applied: vec!["a".into(), "b".into()],
            source: sqlx::Error::PoolTimedOut,
        };
        assert!(err.to_string().starts_with("Column addition failed after applying [a, b]"));
    }

    #[test]
    fn non_database_errors_have_no_sqlstate() {
        assert!(!is_duplicate_table(&sqlx::Error::PoolTimedOut));
        assert!(!is_duplicate_column(&sqlx::Error::RowNotFound));
    }
}

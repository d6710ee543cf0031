// schema.rs
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::libs::error::TableError;

/// Name of the implicit primary key column every dynamic table carries.
pub const ID_COLUMN: &str = "id";

/// Postgres truncates identifiers beyond NAMEDATALEN - 1 bytes.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Declared length of every `string` column.
pub const STRING_MAX_LEN: i32 = 255;

/// The caller-facing column vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

impl FieldType {
    /// Physical column type issued in DDL.
    pub fn sql_type(&self) -> String {
        match self {
            FieldType::String => format!("VARCHAR({})", STRING_MAX_LEN),
            FieldType::Number => "INTEGER".to_string(),
            FieldType::Boolean => "BOOLEAN".to_string(),
        }
    }

    /// Maps an `information_schema.columns.data_type` value back to a field type.
    pub fn from_catalog(data_type: &str) -> Option<Self> {
        match data_type {
            "character varying" => Some(FieldType::String),
            "integer" => Some(FieldType::Number),
            "boolean" => Some(FieldType::Boolean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(FieldType::String),
            "number" => Ok(FieldType::Number),
            "boolean" => Ok(FieldType::Boolean),
            other => Err(TableError::InvalidFieldType(other.to_string())),
        }
    }
}

/// A validated `(name, type)` pair supplied for table creation or alteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    /// Validates a raw descriptor as it arrives from a request body.
    pub fn parse(name: &str, field_type: &str) -> Result<Self, TableError> {
        validate_identifier(name, "field name")?;
        if name.eq_ignore_ascii_case(ID_COLUMN) {
            return Err(TableError::InvalidInput(format!(
                "field name '{}' is reserved for the implicit primary key",
                name
            )));
        }
        Ok(Self::new(name, field_type.parse()?))
    }

    /// Column definition fragment, e.g. `"field1" VARCHAR(255) NULL`.
    pub fn column_definition(&self) -> String {
        format!(
            "{} {} NULL",
            quote_ident(&self.name),
            self.field_type.sql_type()
        )
    }
}

/// A validated create request: normalized table id plus its ordered fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    pub table_id: String,
    pub fields: Vec<FieldDescriptor>,
}

impl TableDescriptor {
    pub fn new(name: &str, fields: Vec<FieldDescriptor>) -> Result<Self, TableError> {
        if name.is_empty() {
            return Err(TableError::InvalidInput("table name is required".into()));
        }
        if fields.is_empty() {
            return Err(TableError::InvalidInput(
                "at least one field is required".into(),
            ));
        }
        ensure_unique_fields(&fields)?;
        Ok(Self {
            table_id: normalize_table_id(name)?,
            fields,
        })
    }
}

/// One physical column as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub field_type: FieldType,
    /// `character_maximum_length` for string columns.
    pub max_length: Option<i32>,
}

/// The live shape of a physical table, in column position order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Lower-cases and validates a table name or path segment into a table id.
pub fn normalize_table_id(name: &str) -> Result<String, TableError> {
    let table_id = name.to_lowercase();
    validate_identifier(&table_id, "table name")?;
    Ok(table_id)
}

pub fn validate_identifier(ident: &str, what: &str) -> Result<(), TableError> {
    if ident.is_empty() {
        return Err(TableError::InvalidInput(format!("{} is required", what)));
    }
    if ident.len() > MAX_IDENTIFIER_LEN {
        return Err(TableError::InvalidInput(format!(
            "{} '{}' is longer than {} bytes",
            what, ident, MAX_IDENTIFIER_LEN
        )));
    }
    let mut chars = ident.chars();
    let head_ok = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if !head_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(TableError::InvalidInput(format!(
            "{} '{}' is not a valid identifier",
            what, ident
        )));
    }
    Ok(())
}

pub fn ensure_unique_fields(fields: &[FieldDescriptor]) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for f in fields {
        if !seen.insert(f.name.as_str()) {
            return Err(TableError::InvalidInput(format!(
                "field '{}' is listed more than once",
                f.name
            )));
        }
    }
    Ok(())
}

/// Double-quotes an identifier for Postgres.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

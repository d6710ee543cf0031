use serde_json::{Map, Value};
use sqlx::Row;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;

use crate::libs::error::{Result, TableError};
use crate::libs::schema::{FieldType, ID_COLUMN, TableSchema};

/// A caller value after it has been checked against its column's type.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(Option<String>),
    Integer(Option<i32>),
    Boolean(Option<bool>),
}

impl CellValue {
    fn null_of(ty: FieldType) -> Self {
        match ty {
            FieldType::String => CellValue::Text(None),
            FieldType::Number => CellValue::Integer(None),
            FieldType::Boolean => CellValue::Boolean(None),
        }
    }

    pub fn bind<'q>(
        self,
        query: Query<'q, sqlx::Postgres, PgArguments>,
    ) -> Query<'q, sqlx::Postgres, PgArguments> {
        match self {
            CellValue::Text(v) => query.bind(v),
            CellValue::Integer(v) => query.bind(v),
            CellValue::Boolean(v) => query.bind(v),
        }
    }
}

/// Checks every supplied value against the live schema.
///
/// Returns `(column, value)` pairs in the caller's key order, ready to bind.
pub fn validate_row(
    schema: &TableSchema,
    values: &Map<String, Value>,
) -> Result<Vec<(String, CellValue)>> {
    let mut cells = Vec::with_capacity(values.len());
    for (field, value) in values {
        if field == ID_COLUMN {
            return Err(TableError::invalid_value(
                field,
                "no value, the id is assigned by the database",
            ));
        }
        let column = schema
            .column(field)
            .ok_or_else(|| TableError::invalid_value(field, "an existing field"))?;

        let cell = match (column.field_type, value) {
            (ty, Value::Null) => CellValue::null_of(ty),
            (FieldType::String, Value::String(s)) => {
                if let Some(max) = column.max_length {
                    if s.chars().count() > max as usize {
                        return Err(TableError::invalid_value(
                            field,
                            format!("string of at most {} characters", max),
                        ));
                    }
                }
                CellValue::Text(Some(s.clone()))
            }
            (FieldType::Number, Value::Number(n)) => {
                let v = n
                    .as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(|| TableError::invalid_value(field, "32-bit integer"))?;
                CellValue::Integer(Some(v))
            }
            (FieldType::Boolean, Value::Bool(b)) => CellValue::Boolean(Some(*b)),
            (ty, _) => return Err(TableError::expected_kind(field, ty)),
        };
        cells.push((field.clone(), cell));
    }
    Ok(cells)
}

/// Renders one fetched row as a JSON object keyed by column name.
pub fn decode_row(schema: &TableSchema, row: &PgRow) -> sqlx::Result<Map<String, Value>> {
    let mut map = Map::new();
    for col in &schema.columns {
        let name = col.name.as_str();
        let value = match col.field_type {
            FieldType::String => row
                .try_get::<Option<String>, _>(name)?
                .map(Value::from)
                .unwrap_or(Value::Null),
            FieldType::Number => row
                .try_get::<Option<i32>, _>(name)?
                .map(Value::from)
                .unwrap_or(Value::Null),
            FieldType::Boolean => row
                .try_get::<Option<bool>, _>(name)?
                .map(Value::from)
                .unwrap_or(Value::Null),
        };
        map.insert(name.to_string(), value);
    }
    Ok(map)
}

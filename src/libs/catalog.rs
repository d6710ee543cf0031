use sqlx::PgPool;

use crate::libs::error::{Result, TableError};
use crate::libs::query_builder::CATALOG_COLUMNS_SQL;
use crate::libs::schema::{ColumnSchema, FieldType, TableSchema};

/// A column row as `information_schema.columns` reports it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CatalogColumn {
    pub column_name: String,
    pub data_type: String,
    pub character_maximum_length: Option<i32>,
}

/// Reads the raw column list of `table`. An empty list means the table does not exist.
pub async fn fetch_columns(pool: &PgPool, table: &str) -> sqlx::Result<Vec<CatalogColumn>> {
    sqlx::query_as::<_, CatalogColumn>(CATALOG_COLUMNS_SQL)
        .bind(table)
        .fetch_all(pool)
        .await
}

/// Turns catalog rows into a [`TableSchema`], or `None` when there are none.
pub fn build_schema(table: &str, columns: Vec<CatalogColumn>) -> Result<Option<TableSchema>> {
    if columns.is_empty() {
        return Ok(None);
    }
    let columns = columns
        .into_iter()
        .map(|c| {
            let field_type = FieldType::from_catalog(&c.data_type).ok_or_else(|| {
                TableError::UnsupportedColumnType {
                    column: c.column_name.clone(),
                    data_type: c.data_type.clone(),
                }
            })?;
            Ok(ColumnSchema {
                name: c.column_name,
                field_type,
                max_length: c.character_maximum_length,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(TableSchema {
        name: table.to_string(),
        columns,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, ty: &str, len: Option<i32>) -> CatalogColumn {
        CatalogColumn {
            column_name: name.into(),
            data_type: ty.into(),
            character_maximum_length: len,
        }
    }

    #[test]
    fn empty_catalog_means_missing_table() {
        assert_eq!(build_schema("t", vec![]).unwrap(), None);
    }

    #[test]
    fn keeps_catalog_order_and_lengths() {
        let schema = build_schema(
            "t",
            vec![
                col("id", "integer", None),
                col("field1", "character varying", Some(255)),
                col("field3", "boolean", None),
            ],
        )
        .unwrap()
        .unwrap();
        assert_eq!(schema.column_names(), vec!["id", "field1", "field3"]);
        let f1 = schema.column("field1").unwrap();
        assert_eq!(f1.field_type, FieldType::String);
        assert_eq!(f1.max_length, Some(255));
    }

    #[test]
    fn unknown_physical_type_is_reported() {
        let err = build_schema("t", vec![col("created", "timestamp with time zone", None)])
            .unwrap_err();
        assert!(matches!(
            err,
            TableError::UnsupportedColumnType { column, .. } if column == "created"
        ));
    }
}

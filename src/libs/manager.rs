use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info, warn};

use crate::libs::catalog;
use crate::libs::error::{Result, TableError, is_duplicate_column, is_duplicate_table};
use crate::libs::query_builder::QueryBuilder;
use crate::libs::row::{decode_row, validate_row};
use crate::libs::schema::{FieldDescriptor, TableDescriptor, TableSchema, ensure_unique_fields};

/// Creates, alters, fills, and reads runtime-defined tables.
///
/// Holds nothing but the pool: every call re-reads the catalog it needs.
#[derive(Clone)]
pub struct TableManager {
    pool: PgPool,
}

impl TableManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> sqlx::Result<Self> {
        info!(max_connections, "Connecting to database");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Live schema of `table_id`, or `None` when the table does not exist.
    pub async fn describe(&self, table_id: &str) -> Result<Option<TableSchema>> {
        let columns = catalog::fetch_columns(&self.pool, table_id)
            .await
            .map_err(TableError::RowFetchFailed)?;
        catalog::build_schema(table_id, columns)
    }

    // -------- Create table --------
    pub async fn create_table(&self, descriptor: &TableDescriptor) -> Result<String> {
        let table_id = descriptor.table_id.as_str();
        let sql = QueryBuilder::new(table_id).create_table(&descriptor.fields);
        debug!(%sql, "create table");

        match sqlx::query(&sql).execute(&self.pool).await {
            Ok(_) => {
                info!(table_id, fields = descriptor.fields.len(), "Table created");
                Ok(table_id.to_string())
            }
            Err(e) if is_duplicate_table(&e) => {
                warn!(table_id, "Table already exists");
                Err(TableError::DuplicateTable(table_id.to_string()))
            }
            Err(e) => {
                warn!(table_id, error = %e, "Table creation failed");
                Err(TableError::TableCreationFailed(e))
            }
        }
    }

    // -------- Add columns --------
    /// Appends `fields` one `ALTER TABLE` at a time.
    ///
    /// DDL is not wrapped in a transaction: if statement N fails, columns
    /// 0..N stay applied and are listed in the returned error.
    pub async fn add_columns(&self, table_id: &str, fields: &[FieldDescriptor]) -> Result<()> {
        if fields.is_empty() {
            return Err(TableError::InvalidInput(
                "at least one field is required".into(),
            ));
        }
        ensure_unique_fields(fields)?;

        let columns = catalog::fetch_columns(&self.pool, table_id)
            .await
            .map_err(|source| TableError::ColumnAdditionFailed {
                applied: Vec::new(),
                source,
            })?;
        if columns.is_empty() {
            return Err(TableError::TableNotFound(table_id.to_string()));
        }
        if let Some(existing) = fields
            .iter()
            .find(|f| columns.iter().any(|c| c.column_name == f.name))
        {
            return Err(TableError::DuplicateColumn {
                table: table_id.to_string(),
                column: existing.name.clone(),
            });
        }

        let qb = QueryBuilder::new(table_id);
        let mut applied = Vec::with_capacity(fields.len());
        for field in fields {
            let sql = qb.add_column(field);
            debug!(%sql, "add column");
            if let Err(e) = sqlx::query(&sql).execute(&self.pool).await {
                warn!(table_id, column = %field.name, error = %e, "Column addition failed");
                if is_duplicate_column(&e) && applied.is_empty() {
                    return Err(TableError::DuplicateColumn {
                        table: table_id.to_string(),
                        column: field.name.clone(),
                    });
                }
                return Err(TableError::ColumnAdditionFailed { applied, source: e });
            }
            applied.push(field.name.clone());
        }
        info!(table_id, added = ?applied, "Table updated");
        Ok(())
    }

    // -------- Insert a row --------
    pub async fn add_row(&self, table_id: &str, values: &Map<String, Value>) -> Result<()> {
        let columns = catalog::fetch_columns(&self.pool, table_id)
            .await
            .map_err(TableError::RowInsertFailed)?;
        let schema = catalog::build_schema(table_id, columns)?
            .ok_or_else(|| TableError::TableNotFound(table_id.to_string()))?;

        let cells = validate_row(&schema, values)?;
        let names: Vec<&str> = cells.iter().map(|(name, _)| name.as_str()).collect();
        let sql = QueryBuilder::new(table_id).insert(&names);
        debug!(%sql, "insert row");

        let mut query = sqlx::query(&sql);
        for (_, cell) in cells {
            query = cell.bind(query);
        }

        let mut tx = self.pool.begin().await.map_err(TableError::RowInsertFailed)?;
        query
            .execute(&mut *tx)
            .await
            .map_err(TableError::RowInsertFailed)?;
        tx.commit().await.map_err(TableError::RowInsertFailed)?;

        info!(table_id, "Row added");
        Ok(())
    }

    // -------- Get all rows --------
    pub async fn get_all_rows(&self, table_id: &str) -> Result<Vec<Map<String, Value>>> {
        let schema = self
            .describe(table_id)
            .await?
            .ok_or_else(|| TableError::TableNotFound(table_id.to_string()))?;

        let sql = QueryBuilder::new(table_id).select_all(&schema.column_names());
        debug!(%sql, "select rows");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(TableError::RowFetchFailed)?;

        rows.iter()
            .map(|r| decode_row(&schema, r).map_err(TableError::RowFetchFailed))
            .collect()
    }
}

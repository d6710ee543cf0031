use crate::libs::schema::{FieldDescriptor, ID_COLUMN, quote_ident};

/// Column metadata for one table in the session's current schema.
pub const CATALOG_COLUMNS_SQL: &str = "SELECT column_name::text, data_type::text, \
     character_maximum_length::int4 \
     FROM information_schema.columns \
     WHERE table_schema = current_schema() AND table_name = $1 \
     ORDER BY ordinal_position";

/// Builds the DDL and DML statements issued against one dynamic table.
///
/// Identifiers are always quoted; values are always bound as `$n` parameters.
pub struct QueryBuilder {
    table: String,
}

impl QueryBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: quote_ident(table),
        }
    }

    fn placeholders(count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("${}", i)).collect()
    }

    /// `CREATE TABLE` with the implicit serial key followed by each field.
    pub fn create_table(&self, fields: &[FieldDescriptor]) -> String {
        let mut cols = vec![format!("{} SERIAL PRIMARY KEY", quote_ident(ID_COLUMN))];
        cols.extend(fields.iter().map(FieldDescriptor::column_definition));
        format!("CREATE TABLE {} ({})", self.table, cols.join(", "))
    }

    pub fn add_column(&self, field: &FieldDescriptor) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.table,
            field.column_definition()
        )
    }

    /// `INSERT` naming only the supplied columns; an empty list inserts defaults.
    pub fn insert(&self, columns: &[&str]) -> String {
        if columns.is_empty() {
            return format!("INSERT INTO {} DEFAULT VALUES", self.table);
        }
        let cols: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            cols.join(", "),
            Self::placeholders(columns.len()).join(", ")
        )
    }

    /// Full-table read in insertion order.
    pub fn select_all(&self, columns: &[&str]) -> String {
        let cols: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
        format!(
            "SELECT {} FROM {} ORDER BY {}",
            cols.join(", "),
            self.table,
            quote_ident(ID_COLUMN)
        )
    }
}

pub mod catalog;
pub mod error;
pub mod manager;
pub mod query_builder;
pub mod row;
pub mod schema;

// Re-export them for easier access from the server and tests
pub use error::{Result, TableError};
pub use manager::TableManager;
pub use query_builder::QueryBuilder;
pub use schema::{FieldDescriptor, FieldType, TableDescriptor, TableSchema};

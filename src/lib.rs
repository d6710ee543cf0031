//! Runtime-defined Postgres tables behind a small REST API.
//!
//! Callers describe a table as a name plus `{name, type}` fields drawn from
//! `string`, `number` and `boolean`. The [`TableManager`] turns that into DDL,
//! later adds columns, inserts type-checked rows, and reads rows back as JSON.
//! No schema is cached in process; each call asks the database catalog.

pub mod api;
pub mod config;
pub mod libs;
pub mod logging;

pub use libs::*;

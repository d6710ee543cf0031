//! Axum-based HTTP surface over [`TableManager`](crate::libs::TableManager).

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{AppError, ErrorResponse};
pub use routes::router;
pub use server::{serve, shutdown_signal};
pub use state::AppState;

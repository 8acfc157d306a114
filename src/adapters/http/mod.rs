pub mod client;
pub mod routes;
pub mod server;

pub use client::ApiClient;
pub use routes::{AppState, ApiError};
pub use server::{build_router, cors_layer, serve, shutdown_signal};

//! Web layer for the fare search engine.
//!
//! Provides HTTP endpoints for running searches.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;

//! Web layer for the bus feed.
//!
//! Serves reconciled upstream data under `/api` and the catalog snapshots
//! under `/static`.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;

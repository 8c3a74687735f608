//! Web layer for the arrivals board.
//!
//! Serves the cached snapshot as JSON and plain text, plus a health check.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;

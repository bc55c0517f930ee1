//! Web layer for the short-distance map.
//!
//! Serves the map page, the JSON API the frontend draws from, and the
//! view-state transition endpoints.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{create_router, AppError};
pub use state::AppState;
pub use templates::*;

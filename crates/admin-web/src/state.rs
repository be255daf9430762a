//! Application state shared across handlers.

use database::Database;
use pipeline::TargetRegion;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// City and region used for the target listings.
    pub target: TargetRegion,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, target: TargetRegion) -> Self {
        Self { db, target }
    }
}

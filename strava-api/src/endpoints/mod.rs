pub mod activities;
pub mod athlete;

use serde::{Deserialize, Serialize};

/// Minimal athlete reference embedded in other resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaAthlete {
    pub id: u64,
}

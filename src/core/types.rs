//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Simulation step counter (one host scheduler invocation)
pub type Tick = u64;

/// Designer-assigned squad number.
///
/// Units carrying the same number are gated as one squad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SquadId(pub i64);

impl SquadId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SquadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "squad#{}", self.0)
    }
}

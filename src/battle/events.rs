//! Squad gate event log
//!
//! One entry per notable step of the enemy turn: roster built, each squad
//! decision, and the hand-off to the host's own turn processing.

use serde::{Deserialize, Serialize};

use crate::battle::units::UnitId;
use crate::core::types::{SquadId, Tick};

/// Log entry for squad events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadEvent {
    pub tick: Tick,
    pub event_type: SquadEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquadEventType {
    RosterBuilt { squads: Vec<SquadId> },
    SquadActivated { squad: SquadId, units: Vec<UnitId> },
    SquadHeld { squad: SquadId, eligible: usize, qualifying: usize },
    SquadSkipped { squad: SquadId },
    ReadinessComplete,
}

/// Events recorded during one or more turns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SquadEventLog {
    pub events: Vec<SquadEvent>,
}

impl SquadEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: SquadEventType, description: String, tick: Tick) {
        self.events.push(SquadEvent {
            tick,
            event_type,
            description,
        });
    }

    /// Units activated across all logged events, in activation order
    pub fn activated_units(&self) -> Vec<UnitId> {
        self.events
            .iter()
            .filter_map(|e| match &e.event_type {
                SquadEventType::SquadActivated { units, .. } => Some(units.iter().copied()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

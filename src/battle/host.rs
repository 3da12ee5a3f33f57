//! Seams into the host engine
//!
//! The squad gate never owns units, maps or the scheduler. It reaches them
//! through [`TurnHost`] during the turn cycle and plugs into the host's
//! action construction through [`ApproachActionBuilder`].

use serde::{Deserialize, Serialize};

use crate::battle::units::{Faction, SquadMember, UnitId};

/// Whose turn the session is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnType {
    Player,
    #[default]
    Enemy,
    Ally,
}

impl TurnType {
    /// Faction whose units act during this turn
    pub fn acting_faction(&self) -> Faction {
        match self {
            TurnType::Enemy => Faction::Enemy,
            TurnType::Ally => Faction::Ally,
            TurnType::Player => Faction::Player,
        }
    }
}

/// Result of one turn-cycle step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveResult {
    /// Call again next frame
    Continue,
    /// The turn is over
    End,
}

/// Host engine surface used by the squad turn cycle
pub trait TurnHost {
    type Unit: SquadMember;

    /// Current turn type of the session
    fn turn_type(&self) -> TurnType;

    /// Units scheduled to act this turn, in scheduling order
    fn actor_ids(&self) -> Vec<UnitId>;

    /// Every unit of a faction, including dead and fused ones
    fn faction_units(&self, faction: Faction) -> Vec<UnitId>;

    fn unit(&self, id: UnitId) -> Option<&Self::Unit>;

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut Self::Unit>;

    /// Can this unit reach an attack against some target right now?
    fn has_attack_opportunity(&self, id: UnitId) -> bool;

    /// Re-establish the turn's action flow and order marks
    fn prepare_turn_flow(&mut self);

    /// Refresh danger markings after reinforcements may have appeared
    fn refresh_markings(&mut self) {}

    /// One step of the host's own turn cycle
    fn move_default_cycle(&mut self) -> MoveResult;
}

/// Builds a unit's approach/attack action for the turn
///
/// `Context` is whatever world view the builder needs to choose a target.
pub trait ApproachActionBuilder<U> {
    type Action;
    type Context: ?Sized;

    fn build_approach_action(&mut self, unit: &U, context: &Self::Context) -> Self::Action;

    /// An action that does nothing (the unit stands by)
    fn build_empty_action(&mut self) -> Self::Action;
}

//! Enemy squad AI
//!
//! Architecture: decorators around host seams
//! - SquadTurnCycle splices the squad phases into the enemy turn
//! - SquadGatedBuilder holds back squad members that are not yet activated
//! - Roster and readiness logic are plain functions over a TurnHost

pub mod action_builder;
pub mod readiness;
pub mod roster;
pub mod turn_cycle;

pub use action_builder::SquadGatedBuilder;
pub use readiness::{count_qualifying, evaluate_squad, ReadinessOutcome};
pub use roster::{
    eligible_members, is_activated, is_squad_gated, mark_activated, squad_id_of, squad_members,
    validate_squad_member, SquadRoster,
};
pub use turn_cycle::{EnemyTurnMode, SquadTurnCycle, SquadTurnSession};

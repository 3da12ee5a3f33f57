//! Battle system - squad-gated enemy turns
//!
//! Enemy squads hold position until enough of them can strike, then move
//! together. Everything engine-specific sits behind the `host` traits.

pub mod ai;
pub mod events;
pub mod hex;
pub mod host;
pub mod sandbox;
pub mod units;

// Re-exports for convenient access
pub use events::{SquadEvent, SquadEventLog, SquadEventType};
pub use hex::HexCoord;
pub use host::{ApproachActionBuilder, MoveResult, TurnHost, TurnType};
pub use sandbox::{
    load_scenario, ActionRecord, NearestTargetBuilder, SandboxAction, SandboxBattle, Scenario,
    UnitSpec,
};
pub use units::{AliveState, BattleUnit, CustomParams, Faction, SquadMember, UnitId};

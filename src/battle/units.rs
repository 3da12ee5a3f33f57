//! Battle units as seen by the squad gate
//!
//! The host engine owns its unit model. The gate only needs the alive state,
//! the fusion parent, and the free-form custom parameter store where the
//! designer's squad number and the activation marker live.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::battle::hex::HexCoord;

/// Unique identifier for units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// Side a unit fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Player,
    Enemy,
    Ally,
}

impl Faction {
    /// Player and ally units fight on the same side
    pub fn is_hostile_to(&self, other: Faction) -> bool {
        matches!(
            (self, other),
            (Faction::Enemy, Faction::Player | Faction::Ally)
                | (Faction::Player | Faction::Ally, Faction::Enemy)
        )
    }
}

/// Alive state of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliveState {
    #[default]
    Alive,
    Injured, // Retreated from the map, not dead
    Dead,
}

/// Per-unit custom parameters, authored in the unit editor
///
/// Values are free-form; readers decide what a well-formed entry looks like.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomParams(BTreeMap<String, Value>);

impl CustomParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Integer entry, `None` when missing or not an integer
    pub fn integer(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    /// True only for a boolean `true` entry
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(Value::Bool(true)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What the squad gate reads and writes on a host unit
pub trait SquadMember {
    fn id(&self) -> UnitId;

    fn alive_state(&self) -> AliveState;

    /// The unit this one is fused into (carried, captured), if any
    fn fusion_parent(&self) -> Option<UnitId>;

    fn custom(&self) -> &CustomParams;

    fn custom_mut(&mut self) -> &mut CustomParams;

    /// Alive and acting on its own
    fn is_independent(&self) -> bool {
        self.alive_state() == AliveState::Alive && self.fusion_parent().is_none()
    }
}

/// A unit on the sandbox battle map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleUnit {
    pub id: UnitId,
    pub name: String,
    pub faction: Faction,

    // Position
    pub position: HexCoord,

    // Reach
    pub movement: u32,
    pub range: u32,

    // State
    pub alive: AliveState,
    pub fusion_parent: Option<UnitId>,

    pub custom: CustomParams,
}

impl BattleUnit {
    pub fn new(name: impl Into<String>, faction: Faction, position: HexCoord) -> Self {
        Self {
            id: UnitId::new(),
            name: name.into(),
            faction,
            position,
            movement: 4,
            range: 1,
            alive: AliveState::Alive,
            fusion_parent: None,
            custom: CustomParams::new(),
        }
    }

    pub fn with_reach(mut self, movement: u32, range: u32) -> Self {
        self.movement = movement;
        self.range = range;
        self
    }

    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom.set(key, value);
        self
    }

    /// Hexes this unit can strike this turn (move then attack)
    pub fn reach(&self) -> u32 {
        self.movement + self.range
    }
}

impl SquadMember for BattleUnit {
    fn id(&self) -> UnitId {
        self.id
    }

    fn alive_state(&self) -> AliveState {
        self.alive
    }

    fn fusion_parent(&self) -> Option<UnitId> {
        self.fusion_parent
    }

    fn custom(&self) -> &CustomParams {
        &self.custom
    }

    fn custom_mut(&mut self) -> &mut CustomParams {
        &mut self.custom
    }
}

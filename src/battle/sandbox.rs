//! In-memory reference host
//!
//! A hex map with units, a reach-based attack opportunity, and a plain
//! per-unit action loop. Enough to drive the squad gate end to end from
//! tests and the runner; there is no combat resolution.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::hex::HexCoord;
use crate::battle::host::{ApproachActionBuilder, MoveResult, TurnHost, TurnType};
use crate::battle::units::{AliveState, BattleUnit, CustomParams, Faction, SquadMember, UnitId};
use crate::core::error::{Result, SquadError};

/// What a sandbox unit does with its turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SandboxAction {
    Wait,
    Attack { target: UnitId },
    Approach { target: UnitId, to: HexCoord },
}

/// Action taken by one unit during a turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub unit: UnitId,
    pub action: SandboxAction,
}

/// Nearest hostile unit to `unit`, by hex distance
fn nearest_hostile<'a>(unit: &BattleUnit, units: &'a [BattleUnit]) -> Option<&'a BattleUnit> {
    units
        .iter()
        .filter(|other| other.is_independent() && unit.faction.is_hostile_to(other.faction))
        .min_by_key(|other| unit.position.distance(&other.position))
}

/// Attack the nearest hostile in reach, otherwise walk toward it
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestTargetBuilder;

impl ApproachActionBuilder<BattleUnit> for NearestTargetBuilder {
    type Action = SandboxAction;
    type Context = [BattleUnit];

    fn build_approach_action(&mut self, unit: &BattleUnit, units: &[BattleUnit]) -> SandboxAction {
        let Some(target) = nearest_hostile(unit, units) else {
            return SandboxAction::Wait;
        };

        if unit.position.distance(&target.position) <= unit.reach() {
            SandboxAction::Attack { target: target.id }
        } else {
            SandboxAction::Approach {
                target: target.id,
                to: unit.position.step_toward(&target.position, unit.movement),
            }
        }
    }

    fn build_empty_action(&mut self) -> SandboxAction {
        SandboxAction::Wait
    }
}

/// Sandbox battle acting as the host engine
#[derive(Debug, Clone)]
pub struct SandboxBattle<B> {
    units: Vec<BattleUnit>,
    builder: B,
    turn_type: TurnType,
    turn_actors: Vec<UnitId>,
    actor_cursor: usize,
    actions: Vec<ActionRecord>,
    markings_refreshed: u32,
}

impl<B> SandboxBattle<B>
where
    B: ApproachActionBuilder<BattleUnit, Action = SandboxAction, Context = [BattleUnit]>,
{
    pub fn new(units: Vec<BattleUnit>, builder: B) -> Self {
        Self {
            units,
            builder,
            turn_type: TurnType::Enemy,
            turn_actors: Vec::new(),
            actor_cursor: 0,
            actions: Vec::new(),
            markings_refreshed: 0,
        }
    }

    pub fn units(&self) -> &[BattleUnit] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut [BattleUnit] {
        &mut self.units
    }

    pub fn set_turn_type(&mut self, turn_type: TurnType) {
        self.turn_type = turn_type;
    }

    pub fn find_by_name(&self, name: &str) -> Option<&BattleUnit> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Actions taken since the current turn started
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    pub fn markings_refreshed(&self) -> u32 {
        self.markings_refreshed
    }

    /// Player side closes in: every independent player/ally unit walks its
    /// movement toward the nearest enemy
    pub fn advance_player_side(&mut self) {
        let moves: Vec<(usize, HexCoord)> = self
            .units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.is_independent() && u.faction != Faction::Enemy)
            .filter_map(|(i, u)| {
                nearest_hostile(u, &self.units)
                    .map(|target| (i, u.position.step_toward(&target.position, u.movement)))
            })
            .collect();

        for (i, to) in moves {
            self.units[i].position = to;
        }
    }

    /// Let the current actor take its action
    fn act(&mut self, unit_id: UnitId) {
        let Some(index) = self.units.iter().position(|u| u.id == unit_id) else {
            return;
        };

        let action = self
            .builder
            .build_approach_action(&self.units[index], self.units.as_slice());

        if let SandboxAction::Approach { to, .. } = action {
            self.units[index].position = to;
        }

        tracing::debug!("{} -> {:?}", self.units[index].name, action);
        self.actions.push(ActionRecord {
            unit: unit_id,
            action,
        });
    }
}

impl<B> TurnHost for SandboxBattle<B>
where
    B: ApproachActionBuilder<BattleUnit, Action = SandboxAction, Context = [BattleUnit]>,
{
    type Unit = BattleUnit;

    fn turn_type(&self) -> TurnType {
        self.turn_type
    }

    fn actor_ids(&self) -> Vec<UnitId> {
        let faction = self.turn_type.acting_faction();
        self.units
            .iter()
            .filter(|u| u.faction == faction && u.is_independent())
            .map(|u| u.id)
            .collect()
    }

    fn faction_units(&self, faction: Faction) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|u| u.faction == faction)
            .map(|u| u.id)
            .collect()
    }

    fn unit(&self, id: UnitId) -> Option<&BattleUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut BattleUnit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    fn has_attack_opportunity(&self, id: UnitId) -> bool {
        let Some(unit) = self.unit(id) else {
            return false;
        };

        nearest_hostile(unit, &self.units)
            .is_some_and(|target| unit.position.distance(&target.position) <= unit.reach())
    }

    fn prepare_turn_flow(&mut self) {
        self.turn_actors = self.actor_ids();
        self.actor_cursor = 0;
        self.actions.clear();
    }

    fn refresh_markings(&mut self) {
        self.markings_refreshed += 1;
    }

    fn move_default_cycle(&mut self) -> MoveResult {
        let Some(&unit_id) = self.turn_actors.get(self.actor_cursor) else {
            return MoveResult::End;
        };

        self.actor_cursor += 1;
        self.act(unit_id);
        MoveResult::Continue
    }
}

/// One unit in a scenario file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    pub faction: Faction,
    pub q: i32,
    pub r: i32,
    #[serde(default = "default_movement")]
    pub movement: u32,
    #[serde(default = "default_range")]
    pub range: u32,
    #[serde(default)]
    pub alive: AliveState,
    /// Name of the unit carrying this one
    #[serde(default)]
    pub fused_into: Option<String>,
    #[serde(default, skip_serializing_if = "CustomParams::is_empty")]
    pub custom: CustomParams,
}

fn default_movement() -> u32 {
    4
}

fn default_range() -> u32 {
    1
}

/// Units placed on a sandbox map
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub units: Vec<UnitSpec>,
}

impl Scenario {
    /// Build battle units, resolving fusion references by name
    pub fn into_units(self) -> Result<Vec<BattleUnit>> {
        let mut ids: BTreeMap<String, UnitId> = BTreeMap::new();
        let mut units = Vec::with_capacity(self.units.len());

        for spec in &self.units {
            let mut unit = BattleUnit::new(
                spec.name.clone(),
                spec.faction,
                HexCoord::new(spec.q, spec.r),
            )
            .with_reach(spec.movement, spec.range);
            unit.alive = spec.alive;
            unit.custom = spec.custom.clone();

            if ids.insert(spec.name.clone(), unit.id).is_some() {
                return Err(SquadError::InvalidScenario(format!(
                    "duplicate unit name '{}'",
                    spec.name
                )));
            }
            units.push(unit);
        }

        for (unit, spec) in units.iter_mut().zip(&self.units) {
            if let Some(parent) = &spec.fused_into {
                let parent_id = ids.get(parent).copied().ok_or_else(|| {
                    SquadError::InvalidScenario(format!(
                        "'{}' is fused into unknown unit '{}'",
                        spec.name, parent
                    ))
                })?;
                unit.fusion_parent = Some(parent_id);
            }
        }

        Ok(units)
    }
}

/// Load a scenario from a `.toml` or `.json` file
pub fn load_scenario(path: impl AsRef<Path>) -> Result<Scenario> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let scenario: Scenario = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&contents)?,
        Some("json") => serde_json::from_str(&contents)?,
        other => {
            return Err(SquadError::UnsupportedFormat(format!(
                "{:?} (expected .toml or .json)",
                other.unwrap_or("")
            )))
        }
    };

    tracing::debug!("Loaded scenario '{}' with {} units", scenario.name, scenario.units.len());
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCENARIO: &str = r#"
name = "bridge"

[[units]]
name = "hero"
faction = "player"
q = 0
r = 0

[[units]]
name = "captain"
faction = "enemy"
q = 6
r = 0
custom = { GroupApproachId = 1 }

[[units]]
name = "page"
faction = "enemy"
q = 6
r = 0
fused_into = "captain"
"#;

    #[test]
    fn test_scenario_from_toml() {
        let scenario: Scenario = toml::from_str(SCENARIO).unwrap();
        let units = scenario.into_units().unwrap();

        assert_eq!(units.len(), 3);
        assert_eq!(units[1].custom.integer("GroupApproachId"), Some(1));
        assert_eq!(units[1].movement, 4);
        assert_eq!(units[2].fusion_parent, Some(units[1].id));
    }

    #[test]
    fn test_scenario_unknown_fusion_parent() {
        let scenario = Scenario {
            name: String::new(),
            units: vec![UnitSpec {
                name: "page".into(),
                faction: Faction::Enemy,
                q: 0,
                r: 0,
                movement: 4,
                range: 1,
                alive: AliveState::Alive,
                fused_into: Some("nobody".into()),
                custom: CustomParams::new(),
            }],
        };
        assert!(matches!(scenario.into_units(), Err(SquadError::InvalidScenario(_))));
    }

    #[test]
    fn test_scenario_json_omits_empty_custom_params() {
        let scenario: Scenario = toml::from_str(SCENARIO).unwrap();
        let json = serde_json::to_value(&scenario).unwrap();

        assert!(json["units"][0].get("custom").is_none());
        assert_eq!(json["units"][1]["custom"]["GroupApproachId"], 1);
    }

    #[test]
    fn test_load_scenario_rejects_unknown_extension() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "name: x").unwrap();
        assert!(matches!(
            load_scenario(file.path()),
            Err(SquadError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_scenario_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"name":"j","units":[{{"name":"a","faction":"ally","q":1,"r":2}}]}}"#
        )
        .unwrap();

        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.units[0].faction, Faction::Ally);
    }

    #[test]
    fn test_attack_opportunity_uses_reach() {
        let hero = BattleUnit::new("hero", Faction::Player, HexCoord::new(0, 0));
        let near = BattleUnit::new("near", Faction::Enemy, HexCoord::new(5, 0)).with_reach(4, 1);
        let far = BattleUnit::new("far", Faction::Enemy, HexCoord::new(6, 0)).with_reach(4, 1);
        let (near_id, far_id) = (near.id, far.id);
        let battle = SandboxBattle::new(vec![hero, near, far], NearestTargetBuilder);

        assert!(battle.has_attack_opportunity(near_id));
        assert!(!battle.has_attack_opportunity(far_id));
    }

    #[test]
    fn test_dead_targets_do_not_count() {
        let mut hero = BattleUnit::new("hero", Faction::Player, HexCoord::new(0, 0));
        hero.alive = AliveState::Dead;
        let grunt = BattleUnit::new("grunt", Faction::Enemy, HexCoord::new(1, 0));
        let id = grunt.id;
        let battle = SandboxBattle::new(vec![hero, grunt], NearestTargetBuilder);

        assert!(!battle.has_attack_opportunity(id));
    }

    #[test]
    fn test_default_cycle_acts_once_per_actor() {
        let hero = BattleUnit::new("hero", Faction::Player, HexCoord::new(0, 0));
        let grunt = BattleUnit::new("grunt", Faction::Enemy, HexCoord::new(12, 0));
        let mut battle = SandboxBattle::new(vec![hero, grunt], NearestTargetBuilder);

        battle.prepare_turn_flow();
        assert_eq!(battle.move_default_cycle(), MoveResult::Continue);
        assert_eq!(battle.move_default_cycle(), MoveResult::End);

        assert_eq!(battle.actions().len(), 1);
        assert_eq!(battle.find_by_name("grunt").unwrap().position, HexCoord::new(8, 0));
    }

    #[test]
    fn test_player_side_advances() {
        let hero = BattleUnit::new("hero", Faction::Player, HexCoord::new(0, 0)).with_reach(2, 1);
        let grunt = BattleUnit::new("grunt", Faction::Enemy, HexCoord::new(10, 0));
        let mut battle = SandboxBattle::new(vec![hero, grunt], NearestTargetBuilder);

        battle.advance_player_side();
        assert_eq!(battle.find_by_name("hero").unwrap().position, HexCoord::new(2, 0));
    }
}

//! Squad readiness: does enough of a squad have something to hit?
//!
//! A squad moves as one. Its eligible members are polled for an attack
//! opportunity; once the threshold is met, every eligible member is
//! activated, including those that had nothing in reach themselves.

use serde::{Deserialize, Serialize};

use crate::battle::ai::roster::{eligible_members, mark_activated};
use crate::battle::host::TurnHost;
use crate::battle::units::UnitId;
use crate::core::config::SquadConfig;
use crate::core::types::SquadId;

/// Decision for one squad on one readiness tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessOutcome {
    /// No eligible members left
    Empty,
    /// Threshold not met, nobody changes
    Held { eligible: usize, qualifying: usize },
    /// Every listed unit is now activated
    Activated { units: Vec<UnitId> },
}

impl ReadinessOutcome {
    pub fn is_activated(&self) -> bool {
        matches!(self, ReadinessOutcome::Activated { .. })
    }
}

/// Count members with an attack opportunity, stopping at `cap`
pub fn count_qualifying(
    eligible: &[UnitId],
    cap: usize,
    mut can_attack: impl FnMut(UnitId) -> bool,
) -> usize {
    let mut count = 0;
    for &id in eligible {
        if count >= cap {
            break;
        }
        if can_attack(id) {
            count += 1;
        }
    }
    count
}

/// Evaluate squad `id` and activate its eligible set if ready
pub fn evaluate_squad<H: TurnHost>(
    host: &mut H,
    id: SquadId,
    config: &SquadConfig,
) -> ReadinessOutcome {
    let eligible = eligible_members(&*host, id, config);
    if eligible.is_empty() {
        tracing::trace!("{} has no eligible members", id);
        return ReadinessOutcome::Empty;
    }

    let required = config.required_qualifying(eligible.len());
    let qualifying = count_qualifying(&eligible, required, |unit_id| {
        let can_attack = host.has_attack_opportunity(unit_id);
        tracing::trace!("{} member {:?}: attack opportunity = {}", id, unit_id, can_attack);
        can_attack
    });

    if qualifying < required {
        return ReadinessOutcome::Held {
            eligible: eligible.len(),
            qualifying,
        };
    }

    for &unit_id in &eligible {
        if let Some(unit) = host.unit_mut(unit_id) {
            mark_activated(unit, config);
        }
    }

    tracing::info!(
        "{} activated: {} of {} members can attack",
        id,
        qualifying,
        eligible.len()
    );

    ReadinessOutcome::Activated { units: eligible }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::ai::roster::is_activated;
    use crate::battle::hex::HexCoord;
    use crate::battle::sandbox::{NearestTargetBuilder, SandboxBattle};
    use crate::battle::units::{AliveState, BattleUnit, Faction};
    use proptest::prelude::*;
    use std::cell::Cell;

    fn squad_enemy(name: &str, squad: i64, q: i32) -> BattleUnit {
        BattleUnit::new(name, Faction::Enemy, HexCoord::new(q, 0))
            .with_reach(3, 1)
            .with_custom("GroupApproachId", squad)
    }

    fn player_at(q: i32) -> BattleUnit {
        BattleUnit::new("hero", Faction::Player, HexCoord::new(q, 0))
    }

    fn activated(battle: &SandboxBattle<NearestTargetBuilder>, id: UnitId) -> bool {
        is_activated(battle.unit(id).unwrap(), &SquadConfig::default())
    }

    #[test]
    fn test_count_qualifying_short_circuits() {
        let ids: Vec<UnitId> = (0..5).map(|_| UnitId::new()).collect();
        let polled = Cell::new(0);

        let count = count_qualifying(&ids, 2, |_| {
            polled.set(polled.get() + 1);
            true
        });

        assert_eq!(count, 2);
        assert_eq!(polled.get(), 2, "Should stop polling once two qualify");
    }

    #[test]
    fn test_three_member_squad_two_in_reach_activates_all() {
        // Hero at 0; A and B within reach 4, C far away
        let a = squad_enemy("A", 5, 3);
        let b = squad_enemy("B", 5, 4);
        let c = squad_enemy("C", 5, 20);
        let ids = [a.id, b.id, c.id];
        let mut battle = SandboxBattle::new(vec![player_at(0), a, b, c], NearestTargetBuilder);

        let outcome = evaluate_squad(&mut battle, SquadId(5), &SquadConfig::default());

        assert!(outcome.is_activated());
        for id in ids {
            assert!(activated(&battle, id));
        }
    }

    #[test]
    fn test_two_member_squad_one_in_reach_holds() {
        let a = squad_enemy("A", 3, 2);
        let b = squad_enemy("B", 3, 15);
        let ids = [a.id, b.id];
        let mut battle = SandboxBattle::new(vec![player_at(0), a, b], NearestTargetBuilder);

        let outcome = evaluate_squad(&mut battle, SquadId(3), &SquadConfig::default());

        assert_eq!(
            outcome,
            ReadinessOutcome::Held {
                eligible: 2,
                qualifying: 1
            }
        );
        for id in ids {
            assert!(!activated(&battle, id));
        }
    }

    #[test]
    fn test_solo_squad_activates_once_in_reach() {
        let lone = squad_enemy("Lone", 7, 10);
        let id = lone.id;
        let mut battle = SandboxBattle::new(vec![player_at(0), lone], NearestTargetBuilder);
        let config = SquadConfig::default();

        assert!(!evaluate_squad(&mut battle, SquadId(7), &config).is_activated());
        assert!(!activated(&battle, id));

        // Next turn the hero has walked into reach
        battle.units_mut()[0].position = HexCoord::new(7, 0);
        assert!(evaluate_squad(&mut battle, SquadId(7), &config).is_activated());
        assert!(activated(&battle, id));
    }

    #[test]
    fn test_empty_squad_is_skipped() {
        let mut dead = squad_enemy("Dead", 4, 1);
        dead.alive = AliveState::Dead;
        let mut battle = SandboxBattle::new(vec![player_at(0), dead], NearestTargetBuilder);

        let outcome = evaluate_squad(&mut battle, SquadId(4), &SquadConfig::default());
        assert_eq!(outcome, ReadinessOutcome::Empty);
    }

    #[test]
    fn test_dead_member_shrinks_threshold_to_survivor() {
        // Partner is dead, so the survivor is judged as a one-unit squad
        let mut partner = squad_enemy("Partner", 8, 1);
        partner.alive = AliveState::Dead;
        let survivor = squad_enemy("Survivor", 8, 2);
        let id = survivor.id;
        let mut battle =
            SandboxBattle::new(vec![player_at(0), partner, survivor], NearestTargetBuilder);

        assert!(evaluate_squad(&mut battle, SquadId(8), &SquadConfig::default()).is_activated());
        assert!(activated(&battle, id));
    }

    #[test]
    fn test_activated_members_leave_the_eligible_set() {
        let config = SquadConfig::default();
        let a = squad_enemy("A", 2, 1);
        let b = squad_enemy("B", 2, 2);
        let mut battle = SandboxBattle::new(vec![player_at(0), a, b], NearestTargetBuilder);

        assert!(evaluate_squad(&mut battle, SquadId(2), &config).is_activated());
        assert_eq!(evaluate_squad(&mut battle, SquadId(2), &config), ReadinessOutcome::Empty);
    }

    #[test]
    fn test_higher_threshold_needs_more_members() {
        let config = SquadConfig {
            group_threshold: 3,
            ..SquadConfig::default()
        };
        let a = squad_enemy("A", 1, 1);
        let b = squad_enemy("B", 1, 2);
        let c = squad_enemy("C", 1, 30);
        let mut battle = SandboxBattle::new(vec![player_at(0), a, b, c], NearestTargetBuilder);

        assert!(!evaluate_squad(&mut battle, SquadId(1), &config).is_activated());
    }

    proptest! {
        #[test]
        fn prop_activation_rule(in_reach in prop::collection::vec(any::<bool>(), 1..8)) {
            let config = SquadConfig::default();
            let mut units = vec![player_at(0)];
            for (i, close) in in_reach.iter().enumerate() {
                let q = if *close { 2 } else { 40 + i as i32 };
                units.push(squad_enemy(&format!("m{}", i), 9, q));
            }
            let member_ids: Vec<UnitId> = units[1..].iter().map(|u| u.id).collect();
            let mut battle = SandboxBattle::new(units, NearestTargetBuilder);

            let qualifying = in_reach.iter().filter(|c| **c).count();
            let expected = if in_reach.len() == 1 { qualifying == 1 } else { qualifying >= 2 };

            let outcome = evaluate_squad(&mut battle, SquadId(9), &config);
            prop_assert_eq!(outcome.is_activated(), expected);
            for id in member_ids {
                prop_assert_eq!(activated(&battle, id), expected);
            }
        }
    }
}

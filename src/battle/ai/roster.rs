//! Squad roster and membership filters
//!
//! Squads are never stored. Membership is re-derived from the host's unit
//! lists every time it is needed, so deaths and fusions between turns are
//! picked up without invalidation.

use ahash::AHashSet;

use crate::battle::host::TurnHost;
use crate::battle::units::{SquadMember, UnitId};
use crate::core::config::SquadConfig;
use crate::core::types::SquadId;

/// Squad number declared by a unit, if it is a well-formed integer
pub fn squad_id_of<U: SquadMember>(unit: &U, config: &SquadConfig) -> Option<SquadId> {
    unit.custom().integer(&config.squad_id_key).map(SquadId)
}

/// Has this unit been activated?
pub fn is_activated<U: SquadMember>(unit: &U, config: &SquadConfig) -> bool {
    unit.custom().flag(&config.active_key)
}

/// Mark a unit as activated. The marker is never cleared.
pub fn mark_activated<U: SquadMember>(unit: &mut U, config: &SquadConfig) {
    unit.custom_mut().set(config.active_key.clone(), true);
}

/// Is this unit gated by its squad (tagged and not yet activated)?
pub fn is_squad_gated<U: SquadMember>(unit: &U, config: &SquadConfig) -> bool {
    squad_id_of(unit, config).is_some() && !is_activated(unit, config)
}

/// Does `unit` belong to squad `id` with the given activation state?
///
/// A missing unit validates to `false`.
pub fn validate_squad_member<U: SquadMember>(
    unit: Option<&U>,
    id: SquadId,
    active: bool,
    config: &SquadConfig,
) -> bool {
    let Some(unit) = unit else {
        return false;
    };

    squad_id_of(unit, config) == Some(id) && is_activated(unit, config) == active
}

/// Live, independently acting units of squad `id` with the given activation
/// state, taken from one host unit list (in list order)
pub fn squad_members<H: TurnHost>(
    host: &H,
    list: &[UnitId],
    id: SquadId,
    active: bool,
    config: &SquadConfig,
) -> Vec<UnitId> {
    list.iter()
        .copied()
        .filter(|&unit_id| {
            let unit = host.unit(unit_id);
            unit.is_some_and(|u| u.is_independent())
                && validate_squad_member(unit, id, active, config)
        })
        .collect()
}

/// Eligible set of squad `id`: acting-faction members not yet activated
///
/// The faction list is chosen from the session's turn type.
pub fn eligible_members<H: TurnHost>(host: &H, id: SquadId, config: &SquadConfig) -> Vec<UnitId> {
    let faction = host.turn_type().acting_faction();
    let list = host.faction_units(faction);
    squad_members(host, &list, id, false, config)
}

/// Distinct squad numbers seen among a turn's actors, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SquadRoster {
    squads: Vec<SquadId>,
}

impl SquadRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the actor list once
    pub fn build<H: TurnHost>(host: &H, actors: &[UnitId], config: &SquadConfig) -> Self {
        Self::from_ids(
            actors
                .iter()
                .filter_map(|&id| host.unit(id))
                .filter_map(|unit| squad_id_of(unit, config)),
        )
    }

    /// Deduplicate squad numbers, keeping first-seen order
    pub fn from_ids(ids: impl IntoIterator<Item = SquadId>) -> Self {
        let mut seen = AHashSet::new();
        let squads = ids.into_iter().filter(|id| seen.insert(*id)).collect();
        Self { squads }
    }

    pub fn get(&self, index: usize) -> Option<SquadId> {
        self.squads.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.squads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squads.is_empty()
    }

    pub fn as_slice(&self) -> &[SquadId] {
        &self.squads
    }
}

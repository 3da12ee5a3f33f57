//! Squad Approach - coordinated enemy squads for turn-based tactics battles

pub mod battle;
pub mod core;

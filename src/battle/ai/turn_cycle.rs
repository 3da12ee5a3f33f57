//! Enemy turn cycle with squad phases spliced in front
//!
//! Each turn: RosterBuild (one tick) -> ReadinessCheck (one squad per tick)
//! -> the host's own turn processing. The session holding the roster and
//! cursor is owned here and rebuilt at every turn start.

use serde::{Deserialize, Serialize};

use crate::battle::ai::readiness::{evaluate_squad, ReadinessOutcome};
use crate::battle::ai::roster::SquadRoster;
use crate::battle::events::{SquadEventLog, SquadEventType};
use crate::battle::host::{MoveResult, TurnHost};
use crate::core::config::SquadConfig;
use crate::core::types::Tick;

/// Modes of the enemy turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyTurnMode {
    #[default]
    RosterBuild,
    ReadinessCheck,
    /// Delegated to the host's turn cycle
    Host,
}

/// Per-turn squad state
#[derive(Debug, Clone, Default)]
pub struct SquadTurnSession {
    roster: SquadRoster,
    cursor: usize,
    mode: EnemyTurnMode,
    tick: Tick,
}

impl SquadTurnSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roster(&self) -> &SquadRoster {
        &self.roster
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> EnemyTurnMode {
        self.mode
    }

    /// Steps taken since the turn started
    pub fn tick(&self) -> Tick {
        self.tick
    }
}

/// Squad-aware wrapper around a host's enemy turn cycle
#[derive(Debug, Clone)]
pub struct SquadTurnCycle {
    config: SquadConfig,
    session: SquadTurnSession,
    events: SquadEventLog,
}

impl SquadTurnCycle {
    pub fn new(config: SquadConfig) -> Self {
        Self {
            config,
            session: SquadTurnSession::new(),
            events: SquadEventLog::new(),
        }
    }

    pub fn config(&self) -> &SquadConfig {
        &self.config
    }

    pub fn session(&self) -> &SquadTurnSession {
        &self.session
    }

    pub fn events(&self) -> &SquadEventLog {
        &self.events
    }

    /// Drain the events recorded so far
    pub fn take_events(&mut self) -> SquadEventLog {
        std::mem::take(&mut self.events)
    }

    /// Start a turn: fresh session, host flow rebuilt, RosterBuild next
    pub fn begin_turn<H: TurnHost>(&mut self, host: &mut H) {
        self.prepare_turn_member_data();
        self.complete_turn_member_data(host);
    }

    /// Discard last turn's roster and cursor
    pub fn prepare_turn_member_data(&mut self) {
        self.session = SquadTurnSession::new();
    }

    /// Re-establish the host's action flow and enter RosterBuild
    pub fn complete_turn_member_data<H: TurnHost>(&mut self, host: &mut H) {
        host.prepare_turn_flow();
        self.session.mode = EnemyTurnMode::RosterBuild;
        // Reinforcements may have arrived at the end of the player turn
        host.refresh_markings();
    }

    /// One scheduler step
    pub fn move_turn_cycle<H: TurnHost>(&mut self, host: &mut H) -> MoveResult {
        self.session.tick += 1;

        match self.session.mode {
            EnemyTurnMode::RosterBuild => self.move_roster_build(host),
            EnemyTurnMode::ReadinessCheck => self.move_readiness_check(host),
            EnemyTurnMode::Host => host.move_default_cycle(),
        }
    }

    /// Build the whole roster in one tick
    fn move_roster_build<H: TurnHost>(&mut self, host: &mut H) -> MoveResult {
        let actors = host.actor_ids();
        self.session.roster = SquadRoster::build(&*host, &actors, &self.config);
        self.session.cursor = 0;

        tracing::debug!(
            "Squad roster built: {} squads among {} actors",
            self.session.roster.len(),
            actors.len()
        );
        self.events.push(
            SquadEventType::RosterBuilt {
                squads: self.session.roster.as_slice().to_vec(),
            },
            format!("{} squads on the roster", self.session.roster.len()),
            self.session.tick,
        );

        self.session.mode = EnemyTurnMode::ReadinessCheck;
        MoveResult::Continue
    }

    /// Evaluate the squad under the cursor, then advance it
    fn move_readiness_check<H: TurnHost>(&mut self, host: &mut H) -> MoveResult {
        let tick = self.session.tick;

        if let Some(squad) = self.session.roster.get(self.session.cursor) {
            let outcome = evaluate_squad(host, squad, &self.config);
            tracing::debug!("Readiness check for {}: {:?}", squad, outcome);

            let (event_type, description) = match outcome {
                ReadinessOutcome::Empty => (
                    SquadEventType::SquadSkipped { squad },
                    format!("{} has no eligible members", squad),
                ),
                ReadinessOutcome::Held {
                    eligible,
                    qualifying,
                } => (
                    SquadEventType::SquadHeld {
                        squad,
                        eligible,
                        qualifying,
                    },
                    format!("{} holds: {} of {} can attack", squad, qualifying, eligible),
                ),
                ReadinessOutcome::Activated { units } => {
                    let description = format!("{} advances with {} units", squad, units.len());
                    (SquadEventType::SquadActivated { squad, units }, description)
                }
            };
            self.events.push(event_type, description, tick);
            self.session.cursor += 1;
        }

        if self.session.cursor >= self.session.roster.len() {
            self.session.mode = EnemyTurnMode::Host;
            self.events.push(
                SquadEventType::ReadinessComplete,
                "Squad checks done, handing over to unit actions".into(),
                tick,
            );
        }

        MoveResult::Continue
    }
}

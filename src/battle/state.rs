use crate::errors::{ConfigError, ConfigResult, InvariantViolation};
use crate::pokemon::Combatant;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::StatusType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn to_index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Opponent => write!(f, "opponent"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    AwaitingMove,
    Resolving,
    TurnComplete,
    BattleOver,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusChange {
    Applied,
    Removed,
    /// End-of-turn residual damage.
    Damaged,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderReason {
    PriorityCounter,
    Priority,
    Speed,
    TieBreak,
}

/// One atomic happening within a turn. Every variant carries the text the
/// presentation layer shows for it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleEvent {
    Move {
        attacker: String,
        defender: String,
        move_name: String,
        damage: u16,
        defender_hp: u16,
        critical: bool,
        healed: u16,
        attacker_hp: u16,
        message: String,
    },
    Effectiveness {
        multiplier: f64,
        message: String,
    },
    StatusChange {
        target: String,
        status: StatusType,
        change: StatusChange,
        damage: u16,
        hp: u16,
        message: String,
    },
    Faint {
        target: String,
        message: String,
    },
    PriorityExplanation {
        first: Side,
        reason: OrderReason,
        message: String,
    },
    PriorityCounterSuccess {
        message: String,
    },
    PriorityCounterFailure {
        message: String,
    },
}

impl BattleEvent {
    pub fn message(&self) -> &str {
        match self {
            BattleEvent::Move { message, .. }
            | BattleEvent::Effectiveness { message, .. }
            | BattleEvent::StatusChange { message, .. }
            | BattleEvent::Faint { message, .. }
            | BattleEvent::PriorityExplanation { message, .. }
            | BattleEvent::PriorityCounterSuccess { message }
            | BattleEvent::PriorityCounterFailure { message } => message,
        }
    }

    pub fn is_faint(&self) -> bool {
        matches!(self, BattleEvent::Faint { .. })
    }

    /// Text for an effectiveness multiplier; `None` for neutral hits.
    pub fn effectiveness_text(multiplier: f64) -> Option<&'static str> {
        match multiplier {
            m if m == 0.0 => Some("It had no effect!"),
            m if m > 1.0 => Some("It's super effective!"),
            m if m < 1.0 => Some("It's not very effective..."),
            _ => None,
        }
    }
}

/// An event stamped with its causal position in the turn and the side it
/// concerns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoggedEvent {
    pub timestamp: u32,
    pub side: Side,
    #[serde(flatten)]
    pub event: BattleEvent,
}

/// Event bus for collecting battle events in causal order.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<LoggedEvent>,
    next_timestamp: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps the event with the next timestamp and records it.
    pub fn push(&mut self, side: Side, event: BattleEvent) {
        log::debug!("[t{}] {}: {}", self.next_timestamp, side, event.message());
        self.events.push(LoggedEvent {
            timestamp: self.next_timestamp,
            side,
            event,
        });
        self.next_timestamp += 1;
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<LoggedEvent> {
        self.events
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Scripted { outcomes: Vec<u8>, index: usize },
    Seeded(StdRng),
}

/// The single source of randomness for a turn. Draws are integer outcomes
/// in `1..=100` or derived from the seeded generator; every draw names the
/// roll it serves.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    /// Replays a fixed list of outcomes. Panics when the list runs out.
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_random() -> Self {
        Self {
            source: RngSource::Seeded(StdRng::from_os_rng()),
        }
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        let outcome = match &mut self.source {
            RngSource::Scripted { outcomes, index } => {
                if *index >= outcomes.len() {
                    panic!(
                        "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                        reason
                    );
                }
                let outcome = outcomes[*index];
                *index += 1;

                #[cfg(test)]
                println!("[RNG] Consumed {} for: {}", outcome, reason);

                outcome
            }
            RngSource::Seeded(rng) => rng.random_range(1..=100),
        };
        log::trace!("rng outcome {} for {}", outcome, reason);
        outcome
    }

    /// True with probability `numerator / denominator`.
    pub fn chance(&mut self, numerator: u32, denominator: u32, reason: &str) -> bool {
        if denominator == 0 || numerator == 0 {
            return false;
        }
        if numerator >= denominator {
            return true;
        }
        let hit = match &mut self.source {
            RngSource::Scripted { .. } => {
                let outcome = self.next_outcome(reason) as u32;
                outcome * denominator <= numerator * 100
            }
            RngSource::Seeded(rng) => rng.random_ratio(numerator, denominator),
        };
        log::trace!("rng chance {}/{} for {}: {}", numerator, denominator, reason, hit);
        hit
    }

    /// Uniform value in `min..=max`.
    pub fn range(&mut self, min: u8, max: u8, reason: &str) -> u8 {
        if min >= max {
            return min;
        }
        let value = match &mut self.source {
            RngSource::Scripted { .. } => {
                let outcome = self.next_outcome(reason).clamp(1, 100) as u32;
                let span = (max - min) as u32 + 1;
                min + ((outcome - 1) * span / 100) as u8
            }
            RngSource::Seeded(rng) => rng.random_range(min..=max),
        };
        log::trace!("rng range {}..={} for {}: {}", min, max, reason, value);
        value
    }
}

/// Both combatants plus the turn bookkeeping. The event log holds only the
/// most recently resolved turn and is not persisted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleState {
    pub player: Combatant,
    pub opponent: Combatant,
    pub turn_number: u32,
    pub game_state: GameState,
    pub winner: Option<Side>,
    #[serde(skip)]
    pub last_turn_log: Vec<LoggedEvent>,
}

impl BattleState {
    pub fn new(player: Combatant, opponent: Combatant) -> Self {
        Self {
            player,
            opponent,
            turn_number: 1,
            game_state: GameState::AwaitingMove,
            winner: None,
            last_turn_log: Vec::new(),
        }
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_state == GameState::BattleOver
    }

    /// Records `winner` and moves the battle to its terminal state.
    pub fn end_battle(&mut self, winner: Side) {
        log::info!("battle over after turn {}: {} wins", self.turn_number, winner);
        self.winner = Some(winner);
        self.game_state = GameState::BattleOver;
    }

    pub fn to_snapshot(&self) -> ConfigResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|e| ConfigError::Parse {
            source_name: "battle snapshot".to_string(),
            details: e.to_string(),
        })
    }

    pub fn from_snapshot(bytes: &[u8]) -> ConfigResult<Self> {
        postcard::from_bytes(bytes).map_err(|e| ConfigError::Parse {
            source_name: "battle snapshot".to_string(),
            details: e.to_string(),
        })
    }

    /// Verifies HP and PP bounds on both sides. Out-of-range values are
    /// clamped before the first violation is reported.
    pub fn check_invariants(&mut self) -> Result<(), InvariantViolation> {
        let mut first_violation = None;

        for side in [Side::Player, Side::Opponent] {
            let combatant = self.combatant_mut(side);
            if combatant.current_hp > combatant.max_hp {
                log::warn!(
                    "{} HP {} exceeds max {}, clamping",
                    side,
                    combatant.current_hp,
                    combatant.max_hp
                );
                first_violation.get_or_insert(InvariantViolation::HpOutOfRange {
                    side,
                    current_hp: combatant.current_hp,
                    max_hp: combatant.max_hp,
                });
                combatant.current_hp = combatant.max_hp;
            }
            for move_instance in &mut combatant.moves {
                if move_instance.pp > move_instance.max_pp() {
                    first_violation.get_or_insert(InvariantViolation::PpOutOfRange {
                        side,
                        move_name: move_instance.name().to_string(),
                        pp: move_instance.pp,
                        max_pp: move_instance.max_pp(),
                    });
                    move_instance.pp = move_instance.max_pp();
                }
            }
        }

        match first_violation {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }
}

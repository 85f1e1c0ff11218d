use crate::{PokemonType, StatusType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl MoveCategory {
    pub fn is_damaging(self) -> bool {
        matches!(self, MoveCategory::Physical | MoveCategory::Special)
    }
}

/// Standard priority tiers.
pub mod priority {
    pub const HELPING_HAND: i8 = 5;
    pub const PROTECT: i8 = 4;
    pub const FAKE_OUT: i8 = 3;
    pub const EXTREME_SPEED: i8 = 2;
    pub const QUICK_ATTACK: i8 = 1;
    pub const NORMAL: i8 = 0;
    pub const VITAL_THROW: i8 = -1;
    pub const BEAK_BLAST: i8 = -3;
    pub const AVALANCHE: i8 = -4;
    pub const ROAR: i8 = -6;

    pub const MIN: i8 = -6;
    pub const MAX: i8 = 5;

    /// Priority given to a counter move whose activation condition failed.
    /// Sits below `MIN` so the failed counter always acts last.
    pub const FAILED_COUNTER: i8 = -7;

    pub fn clamp(priority: i8) -> i8 {
        priority.clamp(MIN, MAX)
    }
}

/// Secondary effects a move can carry. Chances are percentages (1-100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveEffect {
    /// Inflict a major status on the target.
    InflictStatus(StatusType, u8),
    /// Restore a percentage of the user's max HP.
    Heal(u8),
    /// Restore a percentage of the damage dealt.
    Drain(u8),
}

/// Activation rule for moves whose priority depends on the opponent's choice
/// (e.g. Sucker Punch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityCounter {
    pub succeeds_against: Vec<MoveCategory>,
    pub priority_on_success: i8,
}

impl PriorityCounter {
    pub fn activates_against(&self, category: MoveCategory) -> bool {
        self.succeeds_against.contains(&category)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: Option<u16>,
    /// `None` means the move never misses.
    #[serde(default)]
    pub accuracy: Option<u8>,
    pub max_pp: u8,
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub effects: Vec<MoveEffect>,
    #[serde(default)]
    pub counter: Option<PriorityCounter>,
}

impl MoveData {
    pub fn is_priority_counter(&self) -> bool {
        self.counter.is_some()
    }

    pub fn base_power(&self) -> u16 {
        self.power.unwrap_or(0)
    }
}

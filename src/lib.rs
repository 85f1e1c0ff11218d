//! Pokemon Battle Engine
//!
//! Resolves single-combatant Pokemon battles one turn at a time: move
//! validation, priority and speed ordering, damage with type effectiveness,
//! status conditions and an ordered event log for the presentation layer.
//! All randomness goes through an injectable `TurnRng`, so a fixed seed or
//! script reproduces a turn exactly.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod dex;
pub mod errors;
pub mod pokemon;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, MoveCategory, MoveData, MoveEffect, PokemonType, PriorityCounter, SpeciesData,
    StatusType,
};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::ai::{Behavior, FirstMoveAI, RandomAI, ScoringAI, ScriptedAI};
pub use battle::commands::TurnResult;
pub use battle::engine::{execute_turn, resolve_turn, validate_choice};
pub use battle::event_log::EventLog;
pub use battle::state::{BattleEvent, BattleState, GameState, LoggedEvent, Side, TurnRng};

// Core runtime types for a battle.
pub use pokemon::{Combatant, MoveInstance, StatusCondition};

// Reference data and settings.
pub use config::{EngineConfig, PpPolicy, TieBreak};
pub use dex::{bundled_dex, parse_type, DataProvider, Dex};

// Crate-specific error and result types.
pub use errors::{
    BattleEngineError, BattleResult, ConfigError, ConfigResult, InvalidMoveError, InvariantViolation,
};

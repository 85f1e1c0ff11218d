use crate::battle::state::Side;
use thiserror::Error;

/// Main error type for the battle engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    /// The chosen move cannot be used. Recoverable: re-prompt, nothing changed.
    #[error("Invalid move: {0}")]
    InvalidMove(#[from] InvalidMoveError),
    /// Reference data or engine settings are missing or malformed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The engine produced a state that should be impossible.
    #[error("Engine invariant violated: {0}")]
    InvariantViolation(#[from] InvariantViolation),
}

/// Errors for a move selection that cannot be executed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMoveError {
    #[error("{side} does not know the move '{move_name}'")]
    UnknownMove { side: Side, move_name: String },
    #[error("{side}'s {move_name} has no PP left")]
    NoPpRemaining { side: Side, move_name: String },
    #[error("{side} still has moves with PP and cannot Struggle")]
    StruggleNotAllowed { side: Side },
    #[error("the battle is already over")]
    BattleOver,
}

/// Errors related to reference data and engine settings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Move not found: {0}")]
    UnknownMove(String),
    #[error("Species not found: {0}")]
    UnknownSpecies(String),
    #[error("Unknown type: {0}")]
    UnknownType(String),
    #[error("A defender must have one or two types, got {0}")]
    InvalidTypeCount(usize),
    #[error("Duplicate entry in reference data: {0}")]
    DuplicateEntry(String),
    #[error("Failed to parse {source_name}: {details}")]
    Parse { source_name: String, details: String },
    #[error("Failed to read {path}: {details}")]
    Io { path: String, details: String },
    #[error("Invalid engine setting: {0}")]
    InvalidSetting(String),
}

/// Impossible states detected after a turn
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{side}'s HP {current_hp} is outside 0..={max_hp}")]
    HpOutOfRange { side: Side, current_hp: u16, max_hp: u16 },
    #[error("{side}'s {move_name} PP {pp} is outside 0..={max_pp}")]
    PpOutOfRange {
        side: Side,
        move_name: String,
        pp: u8,
        max_pp: u8,
    },
    #[error("{side} was given a second major status ({attempted}) while {existing} is active")]
    StatusStacking {
        side: Side,
        existing: String,
        attempted: String,
    },
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

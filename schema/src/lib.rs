// Battle Engine Schema - Shared type definitions
// This crate contains the static reference types that are shared between
// the battle engine and its RON data files.

// Re-export the main types
pub use battle_data::*;
pub use move_types::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod battle_data;
pub mod move_types;
pub mod pokemon_types;
pub mod species_data;

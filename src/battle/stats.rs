use crate::battle::state::TurnRng;
use crate::config::EngineConfig;
use crate::errors::{ConfigError, ConfigResult};
use crate::pokemon::Combatant;
use schema::{MoveCategory, MoveData, PokemonType, StatusType};

/// Type-chart multiplier of `attack_type` against a one- or two-type defender.
/// Dual types multiply their factors, so the result is one of
/// 0, 0.25, 0.5, 1, 2 or 4.
pub fn effectiveness(attack_type: PokemonType, defender_types: &[PokemonType]) -> ConfigResult<f64> {
    if defender_types.is_empty() || defender_types.len() > 2 {
        return Err(ConfigError::InvalidTypeCount(defender_types.len()));
    }
    Ok(type_multiplier(attack_type, defender_types))
}

/// Product of the pairwise chart lookups. Callers must have checked the
/// type count; an empty slice yields 1.0.
pub(crate) fn type_multiplier(attack_type: PokemonType, defender_types: &[PokemonType]) -> f64 {
    defender_types
        .iter()
        .map(|&defending| PokemonType::type_effectiveness(attack_type, defending) as f64)
        .product()
}

/// Offensive stat for the move's category, halved by burn for physical moves.
pub fn effective_attack(combatant: &Combatant, move_data: &MoveData, config: &EngineConfig) -> u16 {
    match move_data.category {
        MoveCategory::Physical => {
            let attack = combatant.stats.attack;
            if combatant.status_type() == Some(StatusType::Burn) {
                (attack / config.burn_attack_divisor).max(1)
            } else {
                attack
            }
        }
        MoveCategory::Special => combatant.stats.sp_attack,
        MoveCategory::Status => 0,
    }
}

/// Defensive stat for the move's category. Never zero.
pub fn effective_defense(combatant: &Combatant, move_data: &MoveData) -> u16 {
    match move_data.category {
        MoveCategory::Physical => combatant.stats.defense.max(1),
        MoveCategory::Special => combatant.stats.sp_defense.max(1),
        MoveCategory::Status => 1,
    }
}

/// Speed used for turn order; paralysis divides it.
pub fn effective_speed(combatant: &Combatant, config: &EngineConfig) -> u16 {
    let speed = combatant.stats.speed;
    if combatant.status_type() == Some(StatusType::Paralysis) {
        speed / config.paralysis_speed_divisor
    } else {
        speed
    }
}

/// Rolls accuracy. Moves without an accuracy value, or with 100 or more,
/// hit without drawing.
pub fn move_hits(move_data: &MoveData, rng: &mut TurnRng) -> bool {
    let Some(accuracy) = move_data.accuracy else {
        return true;
    };
    if accuracy >= 100 {
        return true;
    }
    let roll = rng.next_outcome("accuracy");
    roll <= accuracy
}

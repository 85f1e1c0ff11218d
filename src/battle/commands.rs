use crate::battle::state::{BattleEvent, BattleState, EventBus, GameState, LoggedEvent, Side};
use crate::errors::InvariantViolation;
use crate::pokemon::StatusCondition;
use serde::{Deserialize, Serialize};

/// Atomic commands representing final state changes
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    // Direct state changes
    SetGameState(GameState),
    IncrementTurnNumber,
    EndBattle {
        winner: Side,
    },

    // Combatant modifications
    DealDamage {
        target: Side,
        amount: u16,
    },
    Heal {
        target: Side,
        amount: u16,
    },
    /// Sets a status on a combatant that has none.
    ApplyStatus {
        target: Side,
        status: StatusCondition,
    },
    /// Replaces or clears the current status (counters, wake-up, thaw).
    UpdateStatus {
        target: Side,
        status: Option<StatusCondition>,
    },
    SpendPp {
        target: Side,
        move_slot: usize,
    },

    EmitEvent {
        side: Side,
        event: BattleEvent,
    },
}

impl BattleCommand {
    pub fn emit(side: Side, event: BattleEvent) -> Self {
        BattleCommand::EmitEvent { side, event }
    }
}

/// Execute a single command against the battle state
pub fn execute_command(
    command: BattleCommand,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), InvariantViolation> {
    match command {
        BattleCommand::SetGameState(game_state) => {
            state.game_state = game_state;
        }
        BattleCommand::IncrementTurnNumber => {
            state.turn_number += 1;
        }
        BattleCommand::EndBattle { winner } => {
            state.end_battle(winner);
        }
        BattleCommand::DealDamage { target, amount } => {
            state.combatant_mut(target).take_damage(amount);
        }
        BattleCommand::Heal { target, amount } => {
            state.combatant_mut(target).heal(amount);
        }
        BattleCommand::ApplyStatus { target, status } => {
            let combatant = state.combatant_mut(target);
            if let Some(existing) = combatant.status {
                return Err(InvariantViolation::StatusStacking {
                    side: target,
                    existing: existing.kind.to_string(),
                    attempted: status.kind.to_string(),
                });
            }
            combatant.status = Some(status);
        }
        BattleCommand::UpdateStatus { target, status } => {
            state.combatant_mut(target).status = status;
        }
        BattleCommand::SpendPp { target, move_slot } => {
            let combatant = state.combatant_mut(target);
            if let Some(move_instance) = combatant.moves.get_mut(move_slot) {
                if !move_instance.use_move() {
                    return Err(InvariantViolation::PpOutOfRange {
                        side: target,
                        move_name: move_instance.name().to_string(),
                        pp: 0,
                        max_pp: move_instance.max_pp(),
                    });
                }
            }
        }
        BattleCommand::EmitEvent { side, event } => {
            bus.push(side, event);
        }
    }
    Ok(())
}

pub fn execute_command_batch(
    commands: Vec<BattleCommand>,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), InvariantViolation> {
    for command in commands {
        execute_command(command, state, bus)?;
    }
    Ok(())
}

/// The response envelope for one resolved turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub state: BattleState,
    pub events: Vec<LoggedEvent>,
    pub player_hp: u16,
    pub opponent_hp: u16,
    pub player_max_hp: u16,
    pub opponent_max_hp: u16,
    pub is_game_over: bool,
    pub winner: Option<Side>,
    /// "You won!" or "You lost!" once the battle is over.
    pub battle_result: Option<String>,
}

impl TurnResult {
    pub fn new(state: BattleState, events: Vec<LoggedEvent>) -> Self {
        let is_game_over = state.is_game_over();
        let winner = state.winner;
        let battle_result = match (is_game_over, winner) {
            (true, Some(Side::Player)) => Some("You won!".to_string()),
            (true, Some(Side::Opponent)) => Some("You lost!".to_string()),
            _ => None,
        };

        Self {
            player_hp: state.player.current_hp,
            opponent_hp: state.opponent.current_hp,
            player_max_hp: state.player.max_hp,
            opponent_max_hp: state.opponent.max_hp,
            is_game_over,
            winner,
            battle_result,
            events,
            state,
        }
    }
}

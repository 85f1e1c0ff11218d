use crate::battle::ai::Behavior;
use crate::battle::calculators::{calculate_attack_outcome, move_event};
use crate::battle::commands::{execute_command_batch, BattleCommand, TurnResult};
use crate::battle::conditions::{self, ActionOutcome};
use crate::battle::event_log::EventLog;
use crate::battle::priority::{counter_success_message, resolve_order, CounterStatus, OrderInput, TurnOrder};
use crate::battle::state::{BattleEvent, BattleState, EventBus, GameState, Side, TurnRng};
use crate::battle::stats::{effective_speed, effectiveness};
use crate::config::{EngineConfig, PpPolicy};
use crate::dex::{display_name, normalize_name, struggle, STRUGGLE};
use crate::errors::{BattleResult, InvalidMoveError, InvariantViolation};
use schema::MoveData;

/// A validated move choice. `slot` is `None` for Struggle.
#[derive(Debug, Clone, PartialEq)]
pub struct ChosenMove {
    pub slot: Option<usize>,
    pub data: MoveData,
}

/// Checks that `side` may use `move_name` right now.
pub fn validate_choice(
    state: &BattleState,
    side: Side,
    move_name: &str,
) -> Result<ChosenMove, InvalidMoveError> {
    if state.is_game_over() {
        return Err(InvalidMoveError::BattleOver);
    }
    let key = normalize_name(move_name);
    let combatant = state.combatant(side);

    if key == STRUGGLE {
        if combatant.has_usable_moves() {
            return Err(InvalidMoveError::StruggleNotAllowed { side });
        }
        return Ok(ChosenMove {
            slot: None,
            data: struggle(),
        });
    }

    let Some(slot) = combatant.find_move(&key) else {
        return Err(InvalidMoveError::UnknownMove {
            side,
            move_name: key,
        });
    };
    let move_instance = &combatant.moves[slot];
    if move_instance.pp == 0 {
        return Err(InvalidMoveError::NoPpRemaining {
            side,
            move_name: key,
        });
    }
    Ok(ChosenMove {
        slot: Some(slot),
        data: move_instance.data.clone(),
    })
}

/// Resolves one full turn in place and returns the raw event trace.
///
/// Both choices are validated before anything changes; an invalid choice
/// returns an error and leaves `battle_state` untouched.
pub fn resolve_turn(
    battle_state: &mut BattleState,
    player_move: &str,
    opponent_move: &str,
    config: &EngineConfig,
    rng: &mut TurnRng,
) -> BattleResult<EventBus> {
    let choices = [
        validate_choice(battle_state, Side::Player, player_move)?,
        validate_choice(battle_state, Side::Opponent, opponent_move)?,
    ];
    for side in [Side::Player, Side::Opponent] {
        if let Err(err) = effectiveness(schema::PokemonType::Normal, &battle_state.combatant(side).types) {
            log::warn!("{} combatant has malformed type data: {}", side, err);
            return Err(err.into());
        }
    }

    let mut bus = EventBus::new();

    // 1. Initialization
    initialize_turn(battle_state, &choices, config, &mut bus)?;

    // 2. Action Prioritization
    let order = determine_action_order(battle_state, &choices, config, rng);
    bus.push(order.first, order.explanation_event());

    // 3. Execute Actions in Order
    execute_move_phase(battle_state, &choices, &order, config, &mut bus, rng)?;

    // 4. End-of-Turn Phase
    if !battle_state.is_game_over() {
        execute_end_turn_phase(battle_state, config, &mut bus)?;
    }

    // 5. Cleanup & Finalization
    finalize_turn(battle_state, &mut bus)?;

    Ok(bus)
}

/// Pure form of a turn: selects the opponent's move, resolves the turn on a
/// copy of `state` and returns the new state with the ordered event log.
pub fn execute_turn(
    state: &BattleState,
    player_move_name: &str,
    opponent_selector: &dyn Behavior,
    config: &EngineConfig,
    rng: &mut TurnRng,
) -> BattleResult<TurnResult> {
    validate_choice(state, Side::Player, player_move_name)?;

    let mut next_state = state.clone();
    let opponent_move = opponent_selector.select_move(Side::Opponent, &next_state, rng);
    log::debug!(
        "turn {}: player chose {}, opponent chose {}",
        next_state.turn_number,
        player_move_name,
        opponent_move
    );

    let bus = resolve_turn(&mut next_state, player_move_name, &opponent_move, config, rng)?;
    let log = EventLog::build(bus);
    Ok(TurnResult::new(next_state, log.into_events()))
}

fn initialize_turn(
    battle_state: &mut BattleState,
    choices: &[ChosenMove; 2],
    config: &EngineConfig,
    bus: &mut EventBus,
) -> Result<(), InvariantViolation> {
    let mut commands = vec![BattleCommand::SetGameState(GameState::Resolving)];
    if config.pp_policy == PpPolicy::SpendBeforeStatusCheck {
        for side in [Side::Player, Side::Opponent] {
            if let Some(move_slot) = choices[side.to_index()].slot {
                commands.push(BattleCommand::SpendPp {
                    target: side,
                    move_slot,
                });
            }
        }
    }
    execute_command_batch(commands, battle_state, bus)
}

fn determine_action_order(
    battle_state: &BattleState,
    choices: &[ChosenMove; 2],
    config: &EngineConfig,
    rng: &mut TurnRng,
) -> TurnOrder {
    resolve_order(
        order_input(battle_state, choices, Side::Player, config),
        order_input(battle_state, choices, Side::Opponent, config),
        config.tie_break,
        rng,
    )
}

fn order_input<'a>(
    battle_state: &'a BattleState,
    choices: &'a [ChosenMove; 2],
    side: Side,
    config: &EngineConfig,
) -> OrderInput<'a> {
    let combatant = battle_state.combatant(side);
    OrderInput {
        name: &combatant.name,
        move_data: &choices[side.to_index()].data,
        speed: effective_speed(combatant, config),
    }
}

fn execute_move_phase(
    battle_state: &mut BattleState,
    choices: &[ChosenMove; 2],
    order: &TurnOrder,
    config: &EngineConfig,
    bus: &mut EventBus,
    rng: &mut TurnRng,
) -> Result<(), InvariantViolation> {
    for side in order.sides() {
        if battle_state.combatant(side).is_fainted() {
            break;
        }
        execute_action(battle_state, side, choices, order, config, bus, rng)?;
        if check_win_conditions(battle_state, [side.opponent(), side], bus)? {
            break;
        }
    }
    Ok(())
}

fn execute_action(
    battle_state: &mut BattleState,
    side: Side,
    choices: &[ChosenMove; 2],
    order: &TurnOrder,
    config: &EngineConfig,
    bus: &mut EventBus,
    rng: &mut TurnRng,
) -> Result<(), InvariantViolation> {
    let chosen = &choices[side.to_index()];

    let (outcome, gate_commands) =
        conditions::on_turn_start(side, battle_state.combatant(side), config, rng);
    execute_command_batch(gate_commands, battle_state, bus)?;
    if let ActionOutcome::Skip(message) = outcome {
        let event = move_event(
            battle_state.combatant(side),
            battle_state.combatant(side.opponent()),
            &chosen.data,
            message,
        );
        bus.push(side, event);
        return Ok(());
    }

    if config.pp_policy == PpPolicy::SpendOnExecution {
        if let Some(move_slot) = chosen.slot {
            execute_command_batch(
                vec![BattleCommand::SpendPp {
                    target: side,
                    move_slot,
                }],
                battle_state,
                bus,
            )?;
        }
    }

    match order.counter(side) {
        Some(CounterStatus::Failed) => {
            let attacker = battle_state.combatant(side);
            let used = format!("{} used {}!", attacker.name, display_name(&chosen.data.name));
            let event = move_event(attacker, battle_state.combatant(side.opponent()), &chosen.data, used);
            bus.push(side, event);
            bus.push(
                side,
                BattleEvent::PriorityCounterFailure {
                    message: "But it failed!".to_string(),
                },
            );
            return Ok(());
        }
        Some(CounterStatus::Succeeded) if order.first == side => {
            let message = counter_success_message(
                &battle_state.combatant(side).name,
                &battle_state.combatant(side.opponent()).name,
                &chosen.data.name,
                &choices[side.opponent().to_index()].data.name,
            );
            bus.push(side, BattleEvent::PriorityCounterSuccess { message });
        }
        Some(CounterStatus::Succeeded) | None => {}
    }

    let commands = calculate_attack_outcome(battle_state, side, &chosen.data, config, rng);
    execute_command_batch(commands, battle_state, bus)
}

fn execute_end_turn_phase(
    battle_state: &mut BattleState,
    config: &EngineConfig,
    bus: &mut EventBus,
) -> Result<(), InvariantViolation> {
    for side in [Side::Player, Side::Opponent] {
        let commands = conditions::on_turn_end(side, battle_state.combatant(side), config);
        execute_command_batch(commands, battle_state, bus)?;
        if check_win_conditions(battle_state, [side, side.opponent()], bus)? {
            break;
        }
    }
    Ok(())
}

/// Emits a faint for the first fainted side in `check_order` and ends the
/// battle in the other side's favour. Returns whether the battle ended.
fn check_win_conditions(
    battle_state: &mut BattleState,
    check_order: [Side; 2],
    bus: &mut EventBus,
) -> Result<bool, InvariantViolation> {
    let Some(fainted) = check_order
        .into_iter()
        .find(|side| battle_state.combatant(*side).is_fainted())
    else {
        return Ok(false);
    };

    let name = battle_state.combatant(fainted).name.clone();
    execute_command_batch(
        vec![
            BattleCommand::emit(
                fainted,
                BattleEvent::Faint {
                    message: format!("{} fainted!", name),
                    target: name,
                },
            ),
            BattleCommand::EndBattle {
                winner: fainted.opponent(),
            },
        ],
        battle_state,
        bus,
    )?;
    Ok(true)
}

fn finalize_turn(battle_state: &mut BattleState, bus: &mut EventBus) -> BattleResult<()> {
    let mut commands = vec![BattleCommand::IncrementTurnNumber];
    if !battle_state.is_game_over() {
        commands.push(BattleCommand::SetGameState(GameState::TurnComplete));
    }
    execute_command_batch(commands, battle_state, bus)?;

    battle_state.check_invariants()?;
    battle_state.last_turn_log = EventLog::from_events(bus.events().to_vec()).into_events();
    Ok(())
}

use crate::battle::commands::BattleCommand;
use crate::battle::conditions;
use crate::battle::state::{BattleEvent, BattleState, Side, TurnRng};
use crate::battle::stats::{effective_attack, effective_defense, move_hits, type_multiplier};
use crate::config::EngineConfig;
use crate::dex::display_name;
use crate::pokemon::Combatant;
use schema::{MoveData, MoveEffect};

/// Result of one damage roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub damage: u16,
    pub effectiveness: f64,
    pub critical: bool,
}

/// Rolls damage for `move_data` from `attacker` against `defender`.
///
/// Status moves and immune defenders short-circuit to zero damage without
/// drawing. Otherwise the critical-hit chance and the variance are drawn,
/// in that order, and any hit that is not fully resisted deals at least 1.
pub fn compute_damage(
    attacker: &Combatant,
    defender: &Combatant,
    move_data: &MoveData,
    config: &EngineConfig,
    rng: &mut TurnRng,
) -> DamageOutcome {
    let effectiveness = type_multiplier(move_data.move_type, &defender.types);
    if !move_data.category.is_damaging() || move_data.base_power() == 0 || effectiveness == 0.0 {
        return DamageOutcome {
            damage: 0,
            effectiveness,
            critical: false,
        };
    }

    let critical = rng.chance(
        config.crit_chance.numerator,
        config.crit_chance.denominator,
        "critical hit",
    );
    let variance = rng.range(
        config.variance_min_percent,
        config.variance_max_percent,
        "damage variance",
    );

    let level = attacker.level as u64;
    let power = move_data.base_power() as u64;
    let attack = effective_attack(attacker, move_data, config) as u64;
    let defense = effective_defense(defender, move_data) as u64;
    let base = ((2 * level / 5 + 2) * power * attack / defense) / 50 + 2;

    let stab = if attacker.has_type(move_data.move_type) {
        config.stab_multiplier
    } else {
        1.0
    };
    let crit = if critical { config.crit_multiplier } else { 1.0 };
    let scaled = (base as f64 * stab * effectiveness * crit * variance as f64 / 100.0).floor();
    let damage = scaled.clamp(1.0, u16::MAX as f64) as u16;

    log::debug!(
        "{} vs {} with {}: base {} stab {} eff {} crit {} variance {}% -> {}",
        attacker.name,
        defender.name,
        move_data.name,
        base,
        stab,
        effectiveness,
        critical,
        variance,
        damage
    );

    DamageOutcome {
        damage,
        effectiveness,
        critical,
    }
}

/// Builds the commands for `side` using `move_data` on the other side:
/// accuracy, then damage or the status effect, then secondary effects.
/// Fainting is left to the caller.
pub fn calculate_attack_outcome(
    state: &BattleState,
    side: Side,
    move_data: &MoveData,
    config: &EngineConfig,
    rng: &mut TurnRng,
) -> Vec<BattleCommand> {
    let attacker = state.combatant(side);
    let defender = state.combatant(side.opponent());

    if !move_hits(move_data, rng) {
        return vec![BattleCommand::emit(
            side,
            move_event(
                attacker,
                defender,
                move_data,
                format!("{}'s attack missed!", attacker.name),
            ),
        )];
    }

    if move_data.category.is_damaging() {
        damaging_move_commands(side, attacker, defender, move_data, config, rng)
    } else {
        status_move_commands(side, attacker, defender, move_data, config, rng)
    }
}

/// A `move` event that changed nothing.
pub fn move_event(
    attacker: &Combatant,
    defender: &Combatant,
    move_data: &MoveData,
    message: String,
) -> BattleEvent {
    BattleEvent::Move {
        attacker: attacker.name.clone(),
        defender: defender.name.clone(),
        move_name: display_name(&move_data.name),
        damage: 0,
        defender_hp: defender.current_hp,
        critical: false,
        healed: 0,
        attacker_hp: attacker.current_hp,
        message,
    }
}

fn used_text(attacker: &Combatant, move_data: &MoveData) -> String {
    format!("{} used {}!", attacker.name, display_name(&move_data.name))
}

fn damaging_move_commands(
    side: Side,
    attacker: &Combatant,
    defender: &Combatant,
    move_data: &MoveData,
    config: &EngineConfig,
    rng: &mut TurnRng,
) -> Vec<BattleCommand> {
    let defender_side = side.opponent();
    let outcome = compute_damage(attacker, defender, move_data, config, rng);

    if outcome.effectiveness == 0.0 {
        return vec![
            BattleCommand::emit(
                side,
                move_event(attacker, defender, move_data, used_text(attacker, move_data)),
            ),
            BattleCommand::emit(
                side,
                BattleEvent::Effectiveness {
                    multiplier: 0.0,
                    message: "It had no effect!".to_string(),
                },
            ),
        ];
    }

    let dealt = outcome.damage.min(defender.current_hp);
    let defender_hp = defender.current_hp - dealt;

    let drained: u32 = move_data
        .effects
        .iter()
        .filter_map(|effect| match effect {
            MoveEffect::Drain(percent) => Some((dealt as u32 * *percent as u32 / 100).max(1)),
            _ => None,
        })
        .sum();
    let missing_hp = attacker.max_hp.saturating_sub(attacker.current_hp);
    let healed = (drained.min(u16::MAX as u32) as u16).min(missing_hp);

    let mut message = used_text(attacker, move_data);
    if outcome.critical {
        message.push_str(" A critical hit!");
    }
    if healed > 0 {
        message.push_str(&format!(" {} had its energy drained!", defender.name));
    }

    let mut commands = vec![BattleCommand::DealDamage {
        target: defender_side,
        amount: outcome.damage,
    }];
    if healed > 0 {
        commands.push(BattleCommand::Heal {
            target: side,
            amount: healed,
        });
    }
    commands.push(BattleCommand::emit(
        side,
        BattleEvent::Move {
            attacker: attacker.name.clone(),
            defender: defender.name.clone(),
            move_name: display_name(&move_data.name),
            damage: dealt,
            defender_hp,
            critical: outcome.critical,
            healed,
            attacker_hp: attacker.current_hp + healed,
            message,
        },
    ));
    if let Some(text) = BattleEvent::effectiveness_text(outcome.effectiveness) {
        commands.push(BattleCommand::emit(
            side,
            BattleEvent::Effectiveness {
                multiplier: outcome.effectiveness,
                message: text.to_string(),
            },
        ));
    }

    if defender_hp > 0 && defender.status.is_none() {
        let mut after_hit = defender.clone();
        after_hit.current_hp = defender_hp;
        for effect in &move_data.effects {
            if let MoveEffect::InflictStatus(kind, chance) = effect {
                if *chance >= 100 || rng.chance(*chance as u32, 100, "secondary effect") {
                    commands.extend(conditions::apply(defender_side, &after_hit, *kind, config, rng));
                }
                break;
            }
        }
    }

    commands
}

fn status_move_commands(
    side: Side,
    attacker: &Combatant,
    defender: &Combatant,
    move_data: &MoveData,
    config: &EngineConfig,
    rng: &mut TurnRng,
) -> Vec<BattleCommand> {
    let defender_side = side.opponent();
    let mut healed = 0;
    let mut status_commands = Vec::new();

    for effect in &move_data.effects {
        match effect {
            MoveEffect::Heal(percent) => {
                let amount = (attacker.max_hp as u32 * *percent as u32 / 100).max(1);
                let missing_hp = attacker.max_hp.saturating_sub(attacker.current_hp);
                healed = (amount.min(u16::MAX as u32) as u16).min(missing_hp);
            }
            MoveEffect::InflictStatus(kind, chance) => {
                if defender.status.is_some() || defender.is_fainted() || !status_commands.is_empty() {
                    continue;
                }
                if *chance >= 100 || rng.chance(*chance as u32, 100, "status effect") {
                    status_commands = conditions::apply(defender_side, defender, *kind, config, rng);
                }
            }
            MoveEffect::Drain(_) => {}
        }
    }

    let used = used_text(attacker, move_data);
    let message = if healed > 0 {
        format!("{} {} regained health!", used, attacker.name)
    } else if status_commands.is_empty() {
        format!("{} But it failed!", used)
    } else {
        used
    };

    let mut commands = Vec::new();
    if healed > 0 {
        commands.push(BattleCommand::Heal {
            target: side,
            amount: healed,
        });
    }
    let mut event = move_event(attacker, defender, move_data, message);
    if let BattleEvent::Move {
        healed: event_healed,
        attacker_hp,
        ..
    } = &mut event
    {
        *event_healed = healed;
        *attacker_hp = attacker.current_hp + healed;
    }
    commands.push(BattleCommand::emit(side, event));
    commands.extend(status_commands);
    commands
}

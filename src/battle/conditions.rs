//! Major status conditions as a per-combatant state machine.
//!
//! Every transition is expressed as a list of [`BattleCommand`]s so the
//! caller decides when the state actually changes.

use crate::battle::commands::BattleCommand;
use crate::battle::state::{BattleEvent, Side, StatusChange, TurnRng};
use crate::config::EngineConfig;
use crate::pokemon::{Combatant, StatusCondition};
use schema::StatusType;

/// Whether a combatant may act this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Proceed,
    /// The action is prevented; carries the message to show.
    Skip(String),
}

pub fn applied_text(kind: StatusType) -> &'static str {
    match kind {
        StatusType::Burn => "was burned!",
        StatusType::Paralysis => "is paralyzed! It may be unable to move!",
        StatusType::Freeze => "was frozen solid!",
        StatusType::Sleep => "fell asleep!",
        StatusType::Poison => "was poisoned!",
        StatusType::Toxic => "was badly poisoned!",
    }
}

pub fn removed_text(kind: StatusType) -> String {
    match kind {
        StatusType::Sleep => "woke up!".to_string(),
        StatusType::Freeze => "thawed out!".to_string(),
        other => format!("was cured of its {}!", other),
    }
}

/// Applies `kind` to `target`. A no-op when the target already has a
/// status or has fainted. Sleep draws its duration here.
pub fn apply(
    side: Side,
    target: &Combatant,
    kind: StatusType,
    config: &EngineConfig,
    rng: &mut TurnRng,
) -> Vec<BattleCommand> {
    if target.status.is_some() || target.is_fainted() {
        return Vec::new();
    }

    let status = match kind {
        StatusType::Sleep => {
            let turns = rng.range(config.sleep_turns_min, config.sleep_turns_max, "sleep duration");
            StatusCondition::sleeping(turns)
        }
        other => StatusCondition::new(other),
    };
    log::debug!("{} {} gains {}", side, target.name, kind);

    vec![
        BattleCommand::ApplyStatus {
            target: side,
            status,
        },
        BattleCommand::emit(
            side,
            BattleEvent::StatusChange {
                target: target.name.clone(),
                status: kind,
                change: StatusChange::Applied,
                damage: 0,
                hp: target.current_hp,
                message: format!("{} {}", target.name, applied_text(kind)),
            },
        ),
    ]
}

/// Clears whatever status `target` carries.
pub fn cure(side: Side, target: &Combatant) -> Vec<BattleCommand> {
    let Some(status) = target.status else {
        return Vec::new();
    };

    vec![
        BattleCommand::UpdateStatus {
            target: side,
            status: None,
        },
        BattleCommand::emit(
            side,
            BattleEvent::StatusChange {
                target: target.name.clone(),
                status: status.kind,
                change: StatusChange::Removed,
                damage: 0,
                hp: target.current_hp,
                message: format!("{} {}", target.name, removed_text(status.kind)),
            },
        ),
    ]
}

/// The status gate run before a combatant acts.
///
/// Paralysis skips with a fixed chance. Freeze thaws with a fixed chance and
/// otherwise skips. Sleep counts down first; the combatant wakes and acts
/// on the turn the count reaches zero, and skips otherwise.
pub fn on_turn_start(
    side: Side,
    combatant: &Combatant,
    config: &EngineConfig,
    rng: &mut TurnRng,
) -> (ActionOutcome, Vec<BattleCommand>) {
    let Some(status) = combatant.status else {
        return (ActionOutcome::Proceed, Vec::new());
    };
    let name = &combatant.name;

    match status.kind {
        StatusType::Paralysis => {
            if rng.chance(config.paralysis_skip_percent as u32, 100, "full paralysis") {
                log::debug!("{} {} is fully paralyzed", side, name);
                let message = format!("{} is paralyzed! It can't move!", name);
                (ActionOutcome::Skip(message), Vec::new())
            } else {
                (ActionOutcome::Proceed, Vec::new())
            }
        }
        StatusType::Freeze => {
            if rng.chance(config.freeze_thaw_percent as u32, 100, "thaw") {
                log::debug!("{} {} thawed", side, name);
                (ActionOutcome::Proceed, cure(side, combatant))
            } else {
                let message = format!("{} is frozen solid!", name);
                (ActionOutcome::Skip(message), Vec::new())
            }
        }
        StatusType::Sleep => match status.duration.map(|turns| turns.saturating_sub(1)) {
            Some(left) if left > 0 => {
                let remaining = StatusCondition {
                    duration: Some(left),
                    counter: status.counter.saturating_add(1),
                    ..status
                };
                log::debug!("{} {} sleeps, {} turns left", side, name, left);
                let commands = vec![BattleCommand::UpdateStatus {
                    target: side,
                    status: Some(remaining),
                }];
                let message = format!("{} is fast asleep.", name);
                (ActionOutcome::Skip(message), commands)
            }
            _ => (ActionOutcome::Proceed, cure(side, combatant)),
        },
        StatusType::Burn | StatusType::Poison | StatusType::Toxic => {
            (ActionOutcome::Proceed, Vec::new())
        }
    }
}

/// Residual damage at the end of the turn. Burn may faint; poison and
/// toxic stop at 1 HP unless the config allows fainting. Toxic's counter
/// grows by one each tick and scales the damage.
pub fn on_turn_end(side: Side, combatant: &Combatant, config: &EngineConfig) -> Vec<BattleCommand> {
    let Some(status) = combatant.status else {
        return Vec::new();
    };
    if combatant.is_fainted() {
        return Vec::new();
    }

    let max_hp = combatant.max_hp as u32;
    let mut commands = Vec::new();
    let raw_damage = match status.kind {
        StatusType::Burn => max_hp / config.burn_damage_divisor as u32,
        StatusType::Poison => max_hp / config.poison_damage_divisor as u32,
        StatusType::Toxic => {
            let counter = status.counter.saturating_add(1);
            commands.push(BattleCommand::UpdateStatus {
                target: side,
                status: Some(StatusCondition { counter, ..status }),
            });
            max_hp * counter as u32 / config.toxic_damage_divisor as u32
        }
        StatusType::Paralysis | StatusType::Freeze | StatusType::Sleep => return Vec::new(),
    };

    let mut damage = raw_damage.clamp(1, u16::MAX as u32) as u16;
    if status.kind.is_poison() && !config.poison_can_faint {
        damage = damage.min(combatant.current_hp.saturating_sub(1));
    }
    if damage == 0 {
        return commands;
    }

    let message = match status.kind {
        StatusType::Burn => format!("{} is hurt by its burn!", combatant.name),
        _ => format!("{} is hurt by poison!", combatant.name),
    };
    log::debug!("{} {} takes {} residual damage", side, combatant.name, damage);

    commands.push(BattleCommand::DealDamage {
        target: side,
        amount: damage,
    });
    commands.push(BattleCommand::emit(
        side,
        BattleEvent::StatusChange {
            target: combatant.name.clone(),
            status: status.kind,
            change: StatusChange::Damaged,
            damage,
            hp: combatant.current_hp - damage.min(combatant.current_hp),
            message,
        },
    ));
    commands
}

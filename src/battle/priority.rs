use crate::battle::state::{BattleEvent, OrderReason, Side, TurnRng};
use crate::config::TieBreak;
use crate::dex::display_name;
use schema::{priority, MoveData};
use std::cmp::Ordering;

/// What the resolver needs to know about one side.
#[derive(Debug, Clone, Copy)]
pub struct OrderInput<'a> {
    pub name: &'a str,
    pub move_data: &'a MoveData,
    /// Effective speed, after status modifiers.
    pub speed: u16,
}

/// Whether a priority counter move found something to counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterStatus {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnOrder {
    pub first: Side,
    pub second: Side,
    pub reason: OrderReason,
    pub player_priority: i8,
    pub opponent_priority: i8,
    counters: [Option<CounterStatus>; 2],
    pub explanation: String,
}

impl TurnOrder {
    /// Counter outcome for `side`, or `None` if its move is not a counter.
    pub fn counter(&self, side: Side) -> Option<CounterStatus> {
        self.counters[side.to_index()]
    }

    pub fn sides(&self) -> [Side; 2] {
        [self.first, self.second]
    }

    pub fn explanation_event(&self) -> BattleEvent {
        BattleEvent::PriorityExplanation {
            first: self.first,
            reason: self.reason,
            message: self.explanation.clone(),
        }
    }
}

/// Priority a move acts at this turn given the move the other side chose.
/// A counter move takes its success priority if the other move's category
/// activates it, and drops below every normal tier otherwise.
pub fn effective_priority(move_data: &MoveData, other_move: &MoveData) -> (i8, Option<CounterStatus>) {
    match &move_data.counter {
        Some(counter) if counter.activates_against(other_move.category) => {
            (priority::clamp(counter.priority_on_success), Some(CounterStatus::Succeeded))
        }
        Some(_) => (priority::FAILED_COUNTER, Some(CounterStatus::Failed)),
        None => (priority::clamp(move_data.priority), None),
    }
}

/// Orders the two actions: priority counters are settled first, then the
/// higher priority tier acts first, then the higher speed, then `tie_break`.
/// Only an exact priority and speed tie under `TieBreak::Random` draws.
pub fn resolve_order(
    player: OrderInput<'_>,
    opponent: OrderInput<'_>,
    tie_break: TieBreak,
    rng: &mut TurnRng,
) -> TurnOrder {
    let (player_priority, player_counter) = effective_priority(player.move_data, opponent.move_data);
    let (opponent_priority, opponent_counter) = effective_priority(opponent.move_data, player.move_data);
    let counter_involved = player_counter.is_some() || opponent_counter.is_some();

    let (first, reason) = match player_priority.cmp(&opponent_priority) {
        Ordering::Greater | Ordering::Less => {
            let first = if player_priority > opponent_priority {
                Side::Player
            } else {
                Side::Opponent
            };
            let reason = if counter_involved {
                OrderReason::PriorityCounter
            } else {
                OrderReason::Priority
            };
            (first, reason)
        }
        Ordering::Equal => match player.speed.cmp(&opponent.speed) {
            Ordering::Greater => (Side::Player, OrderReason::Speed),
            Ordering::Less => (Side::Opponent, OrderReason::Speed),
            Ordering::Equal => (break_tie(tie_break, rng), OrderReason::TieBreak),
        },
    };

    let counters = [player_counter, opponent_counter];
    let inputs = [player, opponent];
    let priorities = [player_priority, opponent_priority];
    let lead = inputs[first.to_index()];
    let trail = inputs[first.opponent().to_index()];

    let explanation = match reason {
        OrderReason::PriorityCounter => {
            if counters[first.to_index()] == Some(CounterStatus::Succeeded) {
                format!(
                    "{}'s {} will strike before {}'s {}.",
                    lead.name,
                    display_name(&lead.move_data.name),
                    trail.name,
                    display_name(&trail.move_data.name)
                )
            } else if counters[first.opponent().to_index()] == Some(CounterStatus::Succeeded) {
                format!(
                    "{}'s {} has higher priority than {}'s {} ({:+} vs {:+}).",
                    lead.name,
                    display_name(&lead.move_data.name),
                    trail.name,
                    display_name(&trail.move_data.name),
                    priorities[first.to_index()],
                    priorities[first.opponent().to_index()]
                )
            } else {
                format!(
                    "{}'s {} has nothing to counter, so {} moves first.",
                    trail.name,
                    display_name(&trail.move_data.name),
                    lead.name
                )
            }
        }
        OrderReason::Priority => format!(
            "{}'s {} has higher priority ({:+} vs {:+}).",
            lead.name,
            display_name(&lead.move_data.name),
            priorities[first.to_index()],
            priorities[first.opponent().to_index()]
        ),
        OrderReason::Speed => format!(
            "{} is faster ({} vs {}).",
            lead.name, lead.speed, trail.speed
        ),
        OrderReason::TieBreak => format!(
            "{} and {} are tied at speed {}; {} moves first.",
            lead.name, trail.name, lead.speed, lead.name
        ),
    };
    log::debug!(
        "turn order: {} first ({:?}), priorities {}/{}, speeds {}/{}",
        first,
        reason,
        player_priority,
        opponent_priority,
        player.speed,
        opponent.speed
    );

    TurnOrder {
        first,
        second: first.opponent(),
        reason,
        player_priority,
        opponent_priority,
        counters,
        explanation,
    }
}

fn break_tie(tie_break: TieBreak, rng: &mut TurnRng) -> Side {
    match tie_break {
        TieBreak::PlayerFirst => Side::Player,
        TieBreak::OpponentFirst => Side::Opponent,
        TieBreak::Random => {
            if rng.chance(1, 2, "speed tie") {
                Side::Player
            } else {
                Side::Opponent
            }
        }
    }
}

/// Message for a priority counter that activated, tailored to the move it
/// intercepted.
pub fn counter_success_message(attacker: &str, target: &str, counter_move: &str, target_move: &str) -> String {
    let counter_label = display_name(counter_move);
    match target_move {
        "quick-attack" | "aqua-jet" | "bullet-punch" | "mach-punch" => format!(
            "{} anticipated {}'s priority move and struck first with {}!",
            attacker, target, counter_label
        ),
        "extreme-speed" => format!(
            "{} intercepted {}'s Extreme Speed with a perfectly timed {}!",
            attacker, target, counter_label
        ),
        _ => format!(
            "{} read {}'s attack and countered with {}!",
            attacker, target, counter_label
        ),
    }
}

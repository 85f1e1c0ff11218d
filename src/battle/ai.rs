//! Opponent move selection strategies.

use crate::battle::state::{BattleState, Side, TurnRng};
use crate::battle::stats::type_multiplier;
use crate::dex::STRUGGLE;
use crate::pokemon::{Combatant, MoveInstance};
use ordered_float::OrderedFloat;
use schema::{MoveData, MoveEffect};
use std::cell::RefCell;
use std::collections::VecDeque;

/// A source of move choices for one side of a battle.
///
/// Implementations must return the name of a move the side can legally use:
/// a known move with PP left, or Struggle when nothing has PP.
pub trait Behavior {
    fn select_move(&self, side: Side, battle_state: &BattleState, rng: &mut TurnRng) -> String;
}

fn usable_names(combatant: &Combatant) -> Vec<&str> {
    combatant.usable_moves().map(MoveInstance::name).collect()
}

fn pick_random(names: &[&str], rng: &mut TurnRng) -> String {
    match names.len() {
        0 => STRUGGLE.to_string(),
        len => {
            let index = rng.range(0, (len - 1) as u8, "ai random move") as usize;
            names[index.min(len - 1)].to_string()
        }
    }
}

/// Prefers the move with the highest expected damage.
///
/// Moves are scored as power × type effectiveness × STAB. The best move is
/// picked 80% of the time; otherwise a random usable move is chosen so the
/// opponent does not become fully predictable.
#[derive(Debug, Clone)]
pub struct ScoringAI {
    best_move_percent: u8,
    stab_multiplier: f64,
}

impl Default for ScoringAI {
    fn default() -> Self {
        Self {
            best_move_percent: 80,
            stab_multiplier: 1.5,
        }
    }
}

impl ScoringAI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best_move_percent(mut self, percent: u8) -> Self {
        self.best_move_percent = percent.min(100);
        self
    }

    /// Scores a move against `defender`.
    pub fn score_move(&self, attacker: &Combatant, defender: &Combatant, move_data: &MoveData) -> f64 {
        if move_data.category.is_damaging() {
            let effectiveness = type_multiplier(move_data.move_type, &defender.types);
            let stab = if attacker.has_type(move_data.move_type) {
                self.stab_multiplier
            } else {
                1.0
            };
            return move_data.base_power() as f64 * effectiveness * stab;
        }

        // Status moves only earn a score when they would do something.
        move_data
            .effects
            .iter()
            .map(|effect| match effect {
                MoveEffect::InflictStatus(_, chance) if defender.status.is_none() && !defender.is_fainted() => {
                    40.0 * (*chance as f64 / 100.0)
                }
                MoveEffect::Heal(percent) if attacker.current_hp < attacker.max_hp => {
                    let missing = 1.0 - attacker.current_hp as f64 / attacker.max_hp.max(1) as f64;
                    missing * *percent as f64
                }
                _ => 0.0,
            })
            .sum()
    }

    fn best_move<'a>(&self, attacker: &'a Combatant, defender: &Combatant) -> Option<&'a MoveInstance> {
        attacker
            .usable_moves()
            .max_by_key(|m| OrderedFloat(self.score_move(attacker, defender, &m.data)))
    }
}

impl Behavior for ScoringAI {
    fn select_move(&self, side: Side, battle_state: &BattleState, rng: &mut TurnRng) -> String {
        let attacker = battle_state.combatant(side);
        let defender = battle_state.combatant(side.opponent());

        let Some(best) = self.best_move(attacker, defender) else {
            return STRUGGLE.to_string();
        };
        if rng.chance(self.best_move_percent as u32, 100, "ai choice") {
            log::debug!("{} picks its best move {}", attacker.name, best.name());
            return best.name().to_string();
        }
        let choice = pick_random(&usable_names(attacker), rng);
        log::debug!("{} picks {} at random", attacker.name, choice);
        choice
    }
}

/// Picks uniformly among usable moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAI;

impl Behavior for RandomAI {
    fn select_move(&self, side: Side, battle_state: &BattleState, rng: &mut TurnRng) -> String {
        pick_random(&usable_names(battle_state.combatant(side)), rng)
    }
}

/// Always uses the first move that still has PP.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMoveAI;

impl Behavior for FirstMoveAI {
    fn select_move(&self, side: Side, battle_state: &BattleState, _rng: &mut TurnRng) -> String {
        battle_state
            .combatant(side)
            .usable_moves()
            .next()
            .map(|m| m.name().to_string())
            .unwrap_or_else(|| STRUGGLE.to_string())
    }
}

/// Replays a queue of move names, then falls back to the first usable move.
/// Queued names are returned as given, even if they are no longer legal.
#[derive(Debug, Default)]
pub struct ScriptedAI {
    queue: RefCell<VecDeque<String>>,
}

impl ScriptedAI {
    pub fn new<S: AsRef<str>>(moves: &[S]) -> Self {
        Self {
            queue: RefCell::new(moves.iter().map(|m| m.as_ref().to_string()).collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl Behavior for ScriptedAI {
    fn select_move(&self, side: Side, battle_state: &BattleState, rng: &mut TurnRng) -> String {
        match self.queue.borrow_mut().pop_front() {
            Some(name) => name,
            None => FirstMoveAI.select_move(side, battle_state, rng),
        }
    }
}

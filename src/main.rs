use pokemon_battle_engine::battle::stats::effectiveness;
use pokemon_battle_engine::{
    bundled_dex, execute_turn, parse_type, BattleState, Combatant, EngineConfig, ScoringAI, Side,
    TurnRng, TurnResult,
};
use std::io::{self, BufRead, Write};

const USAGE: &str = "usage: pokemon-battle [--seed N] [--json] [PLAYER_SPECIES] [OPPONENT_SPECIES]";

struct Options {
    seed: Option<u64>,
    json: bool,
    player_species: String,
    opponent_species: String,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut seed = None;
    let mut json = false;
    let mut species = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                seed = Some(value.parse::<u64>().map_err(|_| format!("invalid seed '{}'", value))?);
            }
            "--json" => json = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            other if other.starts_with("--") => return Err(format!("unknown flag {}\n{}", other, USAGE)),
            _ => species.push(arg),
        }
    }
    if species.len() > 2 {
        return Err(USAGE.to_string());
    }

    let mut species = species.into_iter();
    Ok(Options {
        seed,
        json,
        player_species: species.next().unwrap_or_else(|| "pikachu".to_string()),
        opponent_species: species.next().unwrap_or_else(|| "charmander".to_string()),
    })
}

fn print_status(state: &BattleState) {
    for side in [Side::Player, Side::Opponent] {
        let combatant = state.combatant(side);
        let status = combatant
            .status
            .map(|s| format!(" [{}]", s.kind))
            .unwrap_or_default();
        println!(
            "  {:<10} HP {:>3}/{:<3}{}",
            combatant.name, combatant.current_hp, combatant.max_hp, status
        );
    }
    let moves: Vec<String> = state
        .player
        .moves
        .iter()
        .map(|m| format!("{} ({}/{})", m.name(), m.pp, m.max_pp()))
        .collect();
    println!("  Moves: {}", moves.join(", "));
}

fn print_turn(result: &TurnResult, json: bool) {
    if json {
        match serde_json::to_string_pretty(result) {
            Ok(text) => println!("{}", text),
            Err(e) => println!("Error encoding turn: {}", e),
        }
        return;
    }
    for event in &result.events {
        println!("  {}", event.event.message());
    }
}

/// Answers `type <TYPE>` with that attack type's multiplier against the opponent.
fn print_matchup(state: &BattleState, type_name: &str) {
    let attack_type = match parse_type(type_name) {
        Ok(attack_type) => attack_type,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };
    match effectiveness(attack_type, &state.opponent.types) {
        Ok(multiplier) => println!("  {} vs {}: x{}", attack_type, state.opponent.name, multiplier),
        Err(e) => println!("{}", e),
    }
}

fn main() {
    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            println!("{}", message);
            return;
        }
    };

    let dex = match bundled_dex() {
        Ok(dex) => dex,
        Err(e) => {
            println!("Error loading reference data: {}", e);
            return;
        }
    };
    let config = match EngineConfig::bundled() {
        Ok(config) => config,
        Err(e) => {
            println!("Error loading engine config: {}", e);
            return;
        }
    };

    let build = |species: &str| Combatant::from_species(dex, species, config.default_level);
    let (player, opponent) = match (build(&options.player_species), build(&options.opponent_species)) {
        (Ok(player), Ok(opponent)) => (player, opponent),
        (Err(e), _) | (_, Err(e)) => {
            println!("Error building combatants: {}", e);
            println!("Available species: {}", dex.species_names().join(", "));
            return;
        }
    };

    let mut rng = match options.seed {
        Some(seed) => TurnRng::from_seed(seed),
        None => TurnRng::new_random(),
    };
    let opponent_ai = ScoringAI::new();
    let mut state = BattleState::new(player, opponent);

    println!("{} vs {}!", state.player.name, state.opponent.name);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !state.is_game_over() {
        println!();
        println!("Turn {}", state.turn_number);
        print_status(&state);
        print!("> ");
        if io::stdout().flush().is_err() {
            return;
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                println!("Error reading input: {}", e);
                return;
            }
            None => return,
        };
        let choice = line.trim();
        if choice.is_empty() {
            continue;
        }
        if choice == "quit" {
            return;
        }
        if let Some(type_name) = choice.strip_prefix("type ") {
            print_matchup(&state, type_name);
            continue;
        }

        match execute_turn(&state, choice, &opponent_ai, &config, &mut rng) {
            Ok(result) => {
                print_turn(&result, options.json);
                if let Some(text) = &result.battle_result {
                    println!("{}", text);
                }
                state = result.state;
            }
            Err(e) => println!("{}", e),
        }
    }
}

//! Read-only species and move reference data.
//!
//! The engine only ever reads from a [`DataProvider`]. [`Dex`] is the in-memory
//! implementation, parsed from RON either from the copy embedded in the crate
//! or from a data directory on disk.

use crate::errors::{ConfigError, ConfigResult};
use schema::{priority, MoveCategory, MoveData, PokemonType, SpeciesData};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

const BUNDLED_MOVES: &str = include_str!("../data/moves.ron");
const BUNDLED_SPECIES: &str = include_str!("../data/species.ron");

pub const STRUGGLE: &str = "struggle";

static BUNDLED_DEX: LazyLock<ConfigResult<Dex>> = LazyLock::new(Dex::bundled);

/// Lookup service for reference data keyed by species or move name.
pub trait DataProvider {
    fn lookup_species(&self, name: &str) -> ConfigResult<&SpeciesData>;
    fn lookup_move(&self, name: &str) -> ConfigResult<&MoveData>;
}

#[derive(Debug, Clone, Default)]
pub struct Dex {
    moves: HashMap<String, MoveData>,
    species: HashMap<String, SpeciesData>,
}

/// The dex shipped with the crate, parsed once on first use.
pub fn bundled_dex() -> ConfigResult<&'static Dex> {
    BUNDLED_DEX.as_ref().map_err(Clone::clone)
}

/// Canonical key for a species or move name: lowercase, words joined by `-`.
/// `"Quick Attack"`, `"quick_attack"` and `"quick-attack"` are the same move.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Title-cased name for battle messages: `"quick-attack"` -> `"Quick Attack"`.
pub fn display_name(name: &str) -> String {
    normalize_name(name)
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a type name, ignoring case and surrounding whitespace.
pub fn parse_type(name: &str) -> ConfigResult<PokemonType> {
    let trimmed = name.trim();
    PokemonType::from_str(trimmed).map_err(|_| ConfigError::UnknownType(trimmed.to_string()))
}

/// The move used when every move slot is out of PP.
pub fn struggle() -> MoveData {
    MoveData {
        name: STRUGGLE.to_string(),
        move_type: PokemonType::Normal,
        category: MoveCategory::Physical,
        power: Some(50),
        accuracy: None,
        max_pp: 1,
        priority: priority::NORMAL,
        effects: Vec::new(),
        counter: None,
    }
}

impl Dex {
    /// Parses the reference data embedded in the crate.
    pub fn bundled() -> ConfigResult<Dex> {
        Self::from_ron_strs(BUNDLED_MOVES, BUNDLED_SPECIES)
    }

    pub fn load(data_path: &Path) -> ConfigResult<Dex> {
        let moves = read_file(&data_path.join("moves.ron"))?;
        let species = read_file(&data_path.join("species.ron"))?;
        Self::from_ron_strs(&moves, &species)
    }

    pub fn from_ron_strs(moves: &str, species: &str) -> ConfigResult<Dex> {
        let moves: Vec<MoveData> = parse_ron(moves, "moves.ron")?;
        let species: Vec<SpeciesData> = parse_ron(species, "species.ron")?;
        Self::from_parts(moves, species)
    }

    /// Builds a dex from already-parsed records, normalizing names and
    /// validating cross references.
    pub fn from_parts(moves: Vec<MoveData>, species: Vec<SpeciesData>) -> ConfigResult<Dex> {
        let mut dex = Dex::default();

        for mut move_data in moves {
            let key = normalize_name(&move_data.name);
            let clamped = priority::clamp(move_data.priority);
            if clamped != move_data.priority {
                log::warn!(
                    "move '{}' has priority {} outside {}..={}, clamping to {}",
                    key,
                    move_data.priority,
                    priority::MIN,
                    priority::MAX,
                    clamped
                );
                move_data.priority = clamped;
            }
            move_data.name = key.clone();
            if dex.moves.insert(key.clone(), move_data).is_some() {
                return Err(ConfigError::DuplicateEntry(key));
            }
        }

        for mut species_data in species {
            let key = normalize_name(&species_data.name);
            if species_data.types.is_empty() || species_data.types.len() > 2 {
                return Err(ConfigError::InvalidTypeCount(species_data.types.len()));
            }
            if species_data.moves.len() > 4 {
                return Err(ConfigError::Parse {
                    source_name: "species.ron".to_string(),
                    details: format!("{} lists more than four moves", key),
                });
            }
            species_data.moves = species_data
                .moves
                .iter()
                .map(|name| normalize_name(name))
                .collect();
            for move_name in &species_data.moves {
                if !dex.moves.contains_key(move_name) {
                    log::warn!("species '{}' references unknown move '{}'", key, move_name);
                    return Err(ConfigError::UnknownMove(move_name.clone()));
                }
            }
            species_data.name = key.clone();
            if dex.species.insert(key.clone(), species_data).is_some() {
                return Err(ConfigError::DuplicateEntry(key));
            }
        }

        log::debug!(
            "loaded dex with {} moves and {} species",
            dex.moves.len(),
            dex.species.len()
        );
        Ok(dex)
    }

    pub fn species_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.species.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl DataProvider for Dex {
    fn lookup_species(&self, name: &str) -> ConfigResult<&SpeciesData> {
        let key = normalize_name(name);
        self.species
            .get(&key)
            .ok_or(ConfigError::UnknownSpecies(key))
    }

    fn lookup_move(&self, name: &str) -> ConfigResult<&MoveData> {
        let key = normalize_name(name);
        self.moves.get(&key).ok_or(ConfigError::UnknownMove(key))
    }
}

fn read_file(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        details: e.to_string(),
    })
}

fn parse_ron<T: serde::de::DeserializeOwned>(content: &str, source_name: &str) -> ConfigResult<T> {
    ron::from_str(content).map_err(|e| ConfigError::Parse {
        source_name: source_name.to_string(),
        details: e.to_string(),
    })
}

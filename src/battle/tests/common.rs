use crate::battle::state::{BattleState, TurnRng};
use crate::dex::{bundled_dex, DataProvider};
use crate::errors::BattleResult;
use crate::pokemon::{Combatant, StatusCondition};
use schema::{MoveData, PokemonType, StatusType};

/// A builder for creating test combatants with common defaults.
///
/// # Example
/// ```ignore
/// let pikachu = TestCombatantBuilder::new("pikachu")
///     .with_moves(&["tackle"])
///     .with_status(StatusType::Paralysis)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    species: String,
    level: u8,
    moves: Option<Vec<String>>,
    status: Option<StatusCondition>,
    current_hp: Option<u16>,
    max_hp: Option<u16>,
    types: Option<Vec<PokemonType>>,
    attack: Option<u16>,
    defense: Option<u16>,
    sp_attack: Option<u16>,
    sp_defense: Option<u16>,
    speed: Option<u16>,
}

impl TestCombatantBuilder {
    /// Creates a new level 50 builder for a given species.
    pub fn new(species: &str) -> Self {
        Self {
            species: species.to_string(),
            level: 50,
            moves: None,
            status: None,
            current_hp: None,
            max_hp: None,
            types: None,
            attack: None,
            defense: None,
            sp_attack: None,
            sp_defense: None,
            speed: None,
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_moves(mut self, moves: &[&str]) -> Self {
        self.moves = Some(moves.iter().map(|m| m.to_string()).collect());
        self
    }

    /// Sleep gets three turns; use `with_status_condition` for anything else.
    pub fn with_status(mut self, status: StatusType) -> Self {
        self.status = Some(match status {
            StatusType::Sleep => StatusCondition::sleeping(3),
            other => StatusCondition::new(other),
        });
        self
    }

    pub fn with_status_condition(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn with_max_hp(mut self, max_hp: u16) -> Self {
        self.max_hp = Some(max_hp);
        self
    }

    pub fn with_types(mut self, types: Vec<PokemonType>) -> Self {
        self.types = Some(types);
        self
    }

    pub fn with_attack(mut self, attack: u16) -> Self {
        self.attack = Some(attack);
        self
    }

    pub fn with_defense(mut self, defense: u16) -> Self {
        self.defense = Some(defense);
        self
    }

    pub fn with_sp_attack(mut self, sp_attack: u16) -> Self {
        self.sp_attack = Some(sp_attack);
        self
    }

    pub fn with_sp_defense(mut self, sp_defense: u16) -> Self {
        self.sp_defense = Some(sp_defense);
        self
    }

    pub fn with_speed(mut self, speed: u16) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn build(self) -> Combatant {
        let dex = match bundled_dex() {
            Ok(dex) => dex,
            Err(err) => panic!("Failed to load bundled dex: {}", err),
        };
        let built = match &self.moves {
            Some(moves) => Combatant::with_moves(dex, &self.species, self.level, moves),
            None => Combatant::from_species(dex, &self.species, self.level),
        };
        let mut combatant = match built {
            Ok(combatant) => combatant,
            Err(err) => panic!("Failed to build test combatant {}: {}", self.species, err),
        };

        if let Some(max_hp) = self.max_hp {
            combatant.max_hp = max_hp;
        }
        combatant.current_hp = self.current_hp.unwrap_or(combatant.max_hp);
        if let Some(types) = self.types {
            combatant.types = types;
        }
        if let Some(attack) = self.attack {
            combatant.stats.attack = attack;
        }
        if let Some(defense) = self.defense {
            combatant.stats.defense = defense;
        }
        if let Some(sp_attack) = self.sp_attack {
            combatant.stats.sp_attack = sp_attack;
        }
        if let Some(sp_defense) = self.sp_defense {
            combatant.stats.sp_defense = sp_defense;
        }
        if let Some(speed) = self.speed {
            combatant.stats.speed = speed;
        }
        combatant.status = self.status;
        combatant
    }
}

/// Looks up a move from the bundled dex.
pub fn move_data(name: &str) -> MoveData {
    let dex = match bundled_dex() {
        Ok(dex) => dex,
        Err(err) => panic!("Failed to load bundled dex: {}", err),
    };
    match dex.lookup_move(name) {
        Ok(data) => data.clone(),
        Err(err) => panic!("Missing move {}: {}", name, err),
    }
}

/// Creates a 1v1 battle state for testing.
pub fn create_test_battle(player: Combatant, opponent: Combatant) -> BattleState {
    BattleState::new(player, opponent)
}

/// Creates a `TurnRng` instance with a long list of default values (50).
/// With 50 every percentage roll at or above 50 succeeds, crits never land
/// and variance sits at 92%.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}

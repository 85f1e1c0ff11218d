use crate::dex::{normalize_name, DataProvider};
use crate::errors::ConfigResult;
use schema::{BaseStats, MoveData, PokemonType, SpeciesData, StatusType};
use serde::{Deserialize, Serialize};

/// Battle stats after level scaling. HP lives on the combatant itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
}

/// An active major status. `duration` is `None` for conditions that last
/// until cured; `counter` is the toxic stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCondition {
    pub kind: StatusType,
    pub duration: Option<u8>,
    pub counter: u8,
}

impl StatusCondition {
    pub fn new(kind: StatusType) -> Self {
        Self {
            kind,
            duration: None,
            counter: 0,
        }
    }

    pub fn sleeping(turns: u8) -> Self {
        Self {
            kind: StatusType::Sleep,
            duration: Some(turns),
            counter: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub data: MoveData,
    pub pp: u8,
}

impl MoveInstance {
    /// Create a new move instance with max PP
    pub fn new(data: MoveData) -> Self {
        let pp = data.max_pp;
        MoveInstance { data, pp }
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn max_pp(&self) -> u8 {
        self.data.max_pp
    }

    /// Use the move (decrease PP)
    pub fn use_move(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }
}

/// One side's active creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub species: String,
    pub name: String,
    pub level: u8,
    pub types: Vec<PokemonType>,
    pub stats: Stats,
    pub current_hp: u16,
    pub max_hp: u16,
    pub moves: Vec<MoveInstance>,
    pub status: Option<StatusCondition>,
}

impl Combatant {
    /// Builds a combatant with the species' default moveset.
    pub fn from_species(
        provider: &dyn DataProvider,
        species_name: &str,
        level: u8,
    ) -> ConfigResult<Self> {
        let species = provider.lookup_species(species_name)?;
        let move_names = species.moves.clone();
        Self::with_moves(provider, species_name, level, &move_names)
    }

    /// Builds a combatant with an explicit moveset. Only the first four
    /// names are kept.
    pub fn with_moves<S: AsRef<str>>(
        provider: &dyn DataProvider,
        species_name: &str,
        level: u8,
        move_names: &[S],
    ) -> ConfigResult<Self> {
        let species = provider.lookup_species(species_name)?;
        let moves = move_names
            .iter()
            .take(4)
            .map(|name| provider.lookup_move(name.as_ref()).cloned().map(MoveInstance::new))
            .collect::<ConfigResult<Vec<_>>>()?;

        let (max_hp, stats) = Self::calculate_stats(&species.base_stats, level);
        Ok(Combatant {
            species: normalize_name(&species.name),
            name: display_species_name(species),
            level,
            types: species.types.clone(),
            stats,
            current_hp: max_hp,
            max_hp,
            moves,
            status: None,
        })
    }

    /// Level scaling without IVs, EVs or natures.
    pub fn calculate_stats(base_stats: &BaseStats, level: u8) -> (u16, Stats) {
        let level = level as u32;
        let scale = |base: u8| (2 * base as u32 * level) / 100;
        let other = |base: u8| (scale(base) + 5).min(u16::MAX as u32) as u16;

        let hp = (scale(base_stats.hp) + level + 10).min(u16::MAX as u32) as u16;
        let stats = Stats {
            attack: other(base_stats.attack),
            defense: other(base_stats.defense),
            sp_attack: other(base_stats.sp_attack),
            sp_defense: other(base_stats.sp_defense),
            speed: other(base_stats.speed),
        };
        (hp, stats)
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Reduces HP, clamping at 0. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }

    /// Restores HP up to the maximum. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let restored = amount.min(self.max_hp - self.current_hp.min(self.max_hp));
        self.current_hp += restored;
        restored
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }

    pub fn status_type(&self) -> Option<StatusType> {
        self.status.map(|s| s.kind)
    }

    /// Index of the slot holding `name`, matched after normalization.
    pub fn find_move(&self, name: &str) -> Option<usize> {
        let key = normalize_name(name);
        self.moves.iter().position(|m| m.name() == key)
    }

    pub fn has_usable_moves(&self) -> bool {
        self.moves.iter().any(|m| m.pp > 0)
    }

    pub fn usable_moves(&self) -> impl Iterator<Item = &MoveInstance> {
        self.moves.iter().filter(|m| m.pp > 0)
    }
}

fn display_species_name(species: &SpeciesData) -> String {
    crate::dex::display_name(&species.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::bundled_dex;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stat_scaling_at_level_50() {
        let base = BaseStats {
            hp: 35,
            attack: 55,
            defense: 40,
            sp_attack: 50,
            sp_defense: 50,
            speed: 90,
        };
        let (hp, stats) = Combatant::calculate_stats(&base, 50);
        assert_eq!(hp, 35 + 50 + 10);
        assert_eq!(stats.attack, 55 + 5);
        assert_eq!(stats.speed, 90 + 5);
    }

    #[test]
    fn test_from_species_uses_default_moveset() {
        let dex = bundled_dex().expect("bundled dex");
        let pikachu = Combatant::from_species(dex, "Pikachu", 50).expect("pikachu");
        assert_eq!(pikachu.name, "Pikachu");
        assert_eq!(pikachu.current_hp, pikachu.max_hp);
        assert!(!pikachu.moves.is_empty() && pikachu.moves.len() <= 4);
        assert!(pikachu.moves.iter().all(|m| m.pp == m.max_pp()));
    }

    #[test]
    fn test_with_moves_rejects_unknown_move() {
        let dex = bundled_dex().expect("bundled dex");
        let result = Combatant::with_moves(dex, "pikachu", 50, &["tackle", "splash"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_damage_and_heal_clamp() {
        let dex = bundled_dex().expect("bundled dex");
        let mut snorlax = Combatant::with_moves(dex, "snorlax", 50, &["tackle"]).expect("snorlax");
        let max_hp = snorlax.max_hp;

        assert_eq!(snorlax.take_damage(30), 30);
        assert_eq!(snorlax.heal(100), 30);
        assert_eq!(snorlax.current_hp, max_hp);

        assert_eq!(snorlax.take_damage(u16::MAX), max_hp);
        assert!(snorlax.is_fainted());
    }

    #[test]
    fn test_find_move_normalizes_names() {
        let dex = bundled_dex().expect("bundled dex");
        let combatant =
            Combatant::with_moves(dex, "absol", 50, &["Sucker Punch", "Quick Attack"]).expect("absol");
        assert_eq!(combatant.find_move("quick_attack"), Some(1));
        assert_eq!(combatant.find_move("tackle"), None);
    }

    #[test]
    fn test_move_instance_pp() {
        let dex = bundled_dex().expect("bundled dex");
        let mut instance = MoveInstance::new(dex.lookup_move("tackle").expect("tackle").clone());
        assert!(instance.use_move());
        assert_eq!(instance.pp, instance.max_pp() - 1);
        instance.pp = 0;
        assert!(!instance.use_move());
    }
}

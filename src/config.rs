//! Engine constants: every probability, multiplier and policy the turn
//! resolver consults. Defaults reproduce the classic battle rules.

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUNDLED_ENGINE_CONFIG: &str = include_str!("../data/engine.ron");

/// A probability expressed as `numerator / denominator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    pub numerator: u32,
    pub denominator: u32,
}

impl Ratio {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

/// How an exact priority and speed tie is broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    /// 50/50 draw from the turn RNG; the player moves first on success.
    Random,
    PlayerFirst,
    OpponentFirst,
}

/// When the chosen move's PP is deducted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PpPolicy {
    /// Deducted as soon as the turn starts, even if a status then prevents the move.
    SpendBeforeStatusCheck,
    /// Deducted only once the status gate lets the move through.
    SpendOnExecution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub default_level: u8,
    pub crit_chance: Ratio,
    pub crit_multiplier: f64,
    pub stab_multiplier: f64,
    pub variance_min_percent: u8,
    pub variance_max_percent: u8,
    pub paralysis_skip_percent: u8,
    pub paralysis_speed_divisor: u16,
    pub burn_attack_divisor: u16,
    pub freeze_thaw_percent: u8,
    pub sleep_turns_min: u8,
    pub sleep_turns_max: u8,
    pub burn_damage_divisor: u16,
    pub poison_damage_divisor: u16,
    pub toxic_damage_divisor: u16,
    /// Poison and toxic ticks leave the target at 1 HP when false.
    pub poison_can_faint: bool,
    pub tie_break: TieBreak,
    pub pp_policy: PpPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_level: 100,
            crit_chance: Ratio::new(1, 16),
            crit_multiplier: 2.0,
            stab_multiplier: 1.5,
            variance_min_percent: 85,
            variance_max_percent: 100,
            paralysis_skip_percent: 25,
            paralysis_speed_divisor: 2,
            burn_attack_divisor: 2,
            freeze_thaw_percent: 20,
            sleep_turns_min: 1,
            sleep_turns_max: 3,
            burn_damage_divisor: 16,
            poison_damage_divisor: 8,
            toxic_damage_divisor: 16,
            poison_can_faint: false,
            tie_break: TieBreak::Random,
            pp_policy: PpPolicy::SpendBeforeStatusCheck,
        }
    }
}

impl EngineConfig {
    /// The configuration shipped in `data/engine.ron`.
    pub fn bundled() -> ConfigResult<Self> {
        Self::from_ron_str(BUNDLED_ENGINE_CONFIG, "data/engine.ron")
    }

    pub fn from_ron_str(content: &str, source_name: &str) -> ConfigResult<Self> {
        let config: EngineConfig = ron::from_str(content).map_err(|e| ConfigError::Parse {
            source_name: source_name.to_string(),
            details: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
        Self::from_ron_str(&content, &path.display().to_string())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_level == 0 || self.default_level > 100 {
            return Err(invalid("default_level must be within 1..=100"));
        }
        if self.crit_chance.denominator == 0
            || self.crit_chance.numerator > self.crit_chance.denominator
        {
            return Err(invalid("crit_chance must be a ratio between 0 and 1"));
        }
        if self.crit_multiplier < 1.0 || self.stab_multiplier < 1.0 {
            return Err(invalid("multipliers must be at least 1.0"));
        }
        if self.variance_min_percent == 0
            || self.variance_min_percent > self.variance_max_percent
            || self.variance_max_percent > 100
        {
            return Err(invalid("variance bounds must satisfy 0 < min <= max <= 100"));
        }
        for (name, percent) in [
            ("paralysis_skip_percent", self.paralysis_skip_percent),
            ("freeze_thaw_percent", self.freeze_thaw_percent),
        ] {
            if percent > 100 {
                return Err(invalid(&format!("{} must be at most 100", name)));
            }
        }
        if self.sleep_turns_min == 0 || self.sleep_turns_min > self.sleep_turns_max {
            return Err(invalid("sleep turns must satisfy 0 < min <= max"));
        }
        for (name, divisor) in [
            ("paralysis_speed_divisor", self.paralysis_speed_divisor),
            ("burn_attack_divisor", self.burn_attack_divisor),
            ("burn_damage_divisor", self.burn_damage_divisor),
            ("poison_damage_divisor", self.poison_damage_divisor),
            ("toxic_damage_divisor", self.toxic_damage_divisor),
        ] {
            if divisor == 0 {
                return Err(invalid(&format!("{} must not be zero", name)));
            }
        }
        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    log::warn!("rejected engine configuration: {}", message);
    ConfigError::InvalidSetting(message.to_string())
}

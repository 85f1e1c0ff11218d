use serde::{Deserialize, Serialize};
use std::fmt;

/// The six major (non-volatile) status conditions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Copy)]
pub enum StatusType {
    Burn,
    Paralysis,
    Freeze,
    Sleep,
    Poison,
    Toxic,
}

impl StatusType {
    pub fn is_poison(self) -> bool {
        matches!(self, StatusType::Poison | StatusType::Toxic)
    }
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatusType::Burn => "burn",
            StatusType::Paralysis => "paralysis",
            StatusType::Freeze => "freeze",
            StatusType::Sleep => "sleep",
            StatusType::Poison => "poison",
            StatusType::Toxic => "toxic",
        };

        write!(f, "{}", display_name)
    }
}

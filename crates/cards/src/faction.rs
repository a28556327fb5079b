use crate::error::CardError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// One of the five card colors. The influence string of a card carries one
/// symbol per required influence, e.g. `{F}{F}{S}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Faction {
    Fire,
    Time,
    Justice,
    Primal,
    Shadow,
}

impl Faction {
    pub const ALL: [Faction; 5] = [
        Faction::Fire,
        Faction::Time,
        Faction::Justice,
        Faction::Primal,
        Faction::Shadow,
    ];

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Faction::Fire => "{F}",
            Faction::Time => "{T}",
            Faction::Justice => "{J}",
            Faction::Primal => "{P}",
            Faction::Shadow => "{S}",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Faction::Fire => "Fire",
            Faction::Time => "Time",
            Faction::Justice => "Justice",
            Faction::Primal => "Primal",
            Faction::Shadow => "Shadow",
        }
    }

    /// Typical play style, shown next to the faction in summaries.
    #[must_use]
    pub const fn style(self) -> &'static str {
        match self {
            Faction::Fire => "Aggro, burn, weapons",
            Faction::Time => "Ramp, big units, value",
            Faction::Justice => "Control, armor, order",
            Faction::Primal => "Spells, flying, card draw",
            Faction::Shadow => "Removal, void, sacrifice",
        }
    }

    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Faction::Fire => "#FF4444",
            Faction::Time => "#FFD700",
            Faction::Justice => "#4169E1",
            Faction::Primal => "#00CED1",
            Faction::Shadow => "#8B008B",
        }
    }

    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.symbol() == symbol)
    }

    /// Accepts a faction name (any case) or its influence symbol.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(raw) || f.symbol().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Faction {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CardError::UnknownFaction(s.to_string()))
    }
}

/// Distinct factions referenced by an influence string.
#[must_use]
pub fn factions_in(influence: &str) -> BTreeSet<Faction> {
    Faction::ALL
        .into_iter()
        .filter(|f| influence.contains(f.symbol()))
        .collect()
}

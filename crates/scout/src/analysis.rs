use eternal_cards::Faction;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Aggro,
    Control,
    #[default]
    Midrange,
    Combo,
}

impl Archetype {
    /// Detection order: the first archetype whose keywords match wins.
    pub const ALL: [Archetype; 4] = [
        Archetype::Aggro,
        Archetype::Control,
        Archetype::Midrange,
        Archetype::Combo,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Archetype::Aggro => "aggro",
            Archetype::Control => "control",
            Archetype::Midrange => "midrange",
            Archetype::Combo => "combo",
        }
    }

    #[must_use]
    pub const fn speed(self) -> Speed {
        match self {
            Archetype::Aggro => Speed::Fast,
            Archetype::Control => Speed::Slow,
            Archetype::Midrange | Archetype::Combo => Speed::Medium,
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Fast,
    #[default]
    Medium,
    Slow,
}

impl Speed {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Speed::Fast => "fast",
            Speed::Medium => "medium",
            Speed::Slow => "slow",
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the scout understood from a strategy description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyAnalysis {
    pub archetype: Archetype,
    pub speed: Speed,
    pub primary_faction: Option<Faction>,
    /// At most two, in detection order.
    pub secondary_factions: Vec<Faction>,
    /// Lowercase mechanic names, in the order they were found.
    pub key_mechanics: Vec<String>,
    /// Capitalized unit type, e.g. `Valkyrie`.
    pub tribal_focus: Option<String>,
    pub must_include_cards: Vec<String>,
    pub market_preference: bool,
    pub preferred_win_conditions: Vec<String>,
    pub confidence: f64,
    pub notes: String,
}

impl Default for StrategyAnalysis {
    fn default() -> Self {
        Self {
            archetype: Archetype::default(),
            speed: Speed::default(),
            primary_faction: None,
            secondary_factions: Vec::new(),
            key_mechanics: Vec::new(),
            tribal_focus: None,
            must_include_cards: Vec::new(),
            market_preference: true,
            preferred_win_conditions: Vec::new(),
            confidence: 0.8,
            notes: String::new(),
        }
    }
}

impl StrategyAnalysis {
    /// Primary faction followed by the secondaries.
    #[must_use]
    pub fn factions(&self) -> Vec<Faction> {
        self.primary_faction
            .iter()
            .chain(&self.secondary_factions)
            .copied()
            .collect()
    }

    /// Appends `mechanic` unless it is already listed.
    pub fn add_mechanic(&mut self, mechanic: impl Into<String>) {
        let mechanic = mechanic.into();
        if !self.key_mechanics.contains(&mechanic) {
            self.key_mechanics.push(mechanic);
        }
    }

    /// Appends a card name unless one equal ignoring case is listed.
    pub fn add_must_include(&mut self, name: impl Into<String>) {
        let name = name.into();
        let known = self
            .must_include_cards
            .iter()
            .any(|n| n.eq_ignore_ascii_case(&name));
        if !known {
            self.must_include_cards.push(name);
        }
    }

    /// True when `name` is a must-include card, ignoring case.
    #[must_use]
    pub fn is_must_include(&self, name: &str) -> bool {
        self.must_include_cards
            .iter()
            .any(|n| n.eq_ignore_ascii_case(name))
    }

    /// One-line description for reports, e.g. `aggro (fast) Fire/Shadow`.
    #[must_use]
    pub fn summary(&self) -> String {
        let factions: Vec<&str> = self.factions().into_iter().map(Faction::name).collect();
        let mut out = format!("{} ({})", self.archetype, self.speed);
        if !factions.is_empty() {
            out.push(' ');
            out.push_str(&factions.join("/"));
        }
        if let Some(tribe) = &self.tribal_focus {
            out.push_str(&format!(", {tribe} tribal"));
        }
        out
    }
}

use crate::faction::{factions_in, Faction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Phrases in card text that grant access to the market.
pub const MARKET_ACCESS_PATTERNS: [&str; 3] = ["your market", "from your market", "in your market"];

fn default_rarity() -> String {
    "Common".to_string()
}

/// A single card as normalized from the card sheet.
///
/// `card_type` and `rarity` stay as the sheet spells them; the typed views
/// ([`crate::CardType`], [`crate::Rarity`]) are only used for filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub influence: String,
    #[serde(rename = "type")]
    pub card_type: String,
    #[serde(default)]
    pub card_text: String,
    #[serde(default = "default_rarity")]
    pub rarity: String,
    #[serde(default)]
    pub deck_buildable: bool,
    #[serde(default)]
    pub set_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eternal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unit_types: Vec<String>,
}

impl Card {
    pub fn new(name: impl Into<String>, card_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cost: 0,
            influence: String::new(),
            card_type: card_type.into(),
            card_text: String::new(),
            rarity: default_rarity(),
            deck_buildable: true,
            set_number: String::new(),
            attack: None,
            health: None,
            eternal_id: None,
            image_url: None,
            unit_types: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: u32, influence: impl Into<String>) -> Self {
        self.cost = cost;
        self.influence = influence.into();
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.card_text = text.into();
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = rarity.into();
        self
    }

    #[must_use]
    pub fn with_stats(mut self, attack: u32, health: u32) -> Self {
        self.attack = Some(attack);
        self.health = Some(health);
        self
    }

    #[must_use]
    pub fn with_set(mut self, set_number: impl Into<String>) -> Self {
        self.set_number = set_number.into();
        self
    }

    #[must_use]
    pub fn with_unit_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unit_types = types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn is_power(&self) -> bool {
        self.card_type.eq_ignore_ascii_case("power")
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.card_type.eq_ignore_ascii_case("unit")
    }

    #[must_use]
    pub fn is_spell(&self) -> bool {
        self.card_type.eq_ignore_ascii_case("spell")
    }

    #[must_use]
    pub fn is_sigil(&self) -> bool {
        self.is_power() && self.name.to_lowercase().contains("sigil")
    }

    #[must_use]
    pub fn influence_count(&self) -> usize {
        self.influence.matches('{').count()
    }

    #[must_use]
    pub fn factions(&self) -> BTreeSet<Faction> {
        factions_in(&self.influence)
    }

    #[must_use]
    pub fn faction_count(&self) -> usize {
        self.factions().len()
    }

    #[must_use]
    pub fn can_access_market(&self) -> bool {
        let text = self.card_text.to_lowercase();
        MARKET_ACCESS_PATTERNS.iter().any(|p| text.contains(p))
    }

    /// `"3{F}{F}"`, or just the influence for zero-cost cards.
    #[must_use]
    pub fn format_cost(&self) -> String {
        if self.cost > 0 {
            format!("{}{}", self.cost, self.influence)
        } else {
            self.influence.clone()
        }
    }

    #[must_use]
    pub fn format_stats(&self) -> Option<String> {
        match (self.is_unit(), self.attack, self.health) {
            (true, Some(attack), Some(health)) => Some(format!("{attack}/{health}")),
            _ => None,
        }
    }

    #[must_use]
    pub fn format_for_deck(&self) -> String {
        let mut parts = vec![self.name.clone(), self.format_cost()];
        if let Some(stats) = self.format_stats() {
            parts.push(stats);
        }
        parts.push(self.rarity.clone());
        parts.join(" | ")
    }

    /// Type before any subtype suffix: `"Unit - Oni"` counts as `"Unit"`.
    #[must_use]
    pub fn base_type(&self) -> &str {
        self.card_type
            .split(|c: char| c == '-' || c == '(')
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.card_type)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_for_deck())
    }
}

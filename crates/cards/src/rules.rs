use crate::card::Card;
use crate::error::CardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Copies allowed for Sigils. The game sets no limit; selection tools cap it here.
pub const SIGIL_MAX_COPIES: u32 = 99;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketRules {
    pub size: usize,
    pub unique_only: bool,
    pub access_required: bool,
}

/// Deck construction rules of the constructed formats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckRules {
    pub min_cards: u32,
    pub max_cards: u32,
    pub recommended_cards: u32,
    pub max_copies: u32,
    pub min_power_ratio: f64,
    pub min_power_cards: u32,
    pub market: MarketRules,
}

impl DeckRules {
    pub const STANDARD: DeckRules = DeckRules {
        min_cards: 75,
        max_cards: 150,
        recommended_cards: 75,
        max_copies: 4,
        min_power_ratio: 1.0 / 3.0,
        min_power_cards: 25,
        market: MarketRules {
            size: 5,
            unique_only: true,
            access_required: true,
        },
    };

    /// Copy limit for one card: Sigils are exempt from `max_copies`.
    #[must_use]
    pub fn max_copies_for(&self, card: &Card) -> u32 {
        if card.is_sigil() {
            SIGIL_MAX_COPIES
        } else {
            self.max_copies
        }
    }

    /// Power cards a deck of `total` cards needs.
    #[must_use]
    pub fn required_power(&self, total: u32) -> u32 {
        let by_ratio = (f64::from(total) * self.min_power_ratio - 1e-9).ceil().max(0.0) as u32;
        if total >= self.min_cards {
            by_ratio.max(self.min_power_cards)
        } else {
            by_ratio
        }
    }
}

impl Default for DeckRules {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    Unit,
    Spell,
    Power,
    Weapon,
    Relic,
    Curse,
}

impl CardType {
    pub const ALL: [CardType; 6] = [
        CardType::Unit,
        CardType::Spell,
        CardType::Power,
        CardType::Weapon,
        CardType::Relic,
        CardType::Curse,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CardType::Unit => "Unit",
            CardType::Spell => "Spell",
            CardType::Power => "Power",
            CardType::Weapon => "Weapon",
            CardType::Relic => "Relic",
            CardType::Curse => "Curse",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card rarity, ordered from most to least common.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Legendary,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Legendary => "Legendary",
        }
    }

    /// Every rarity up to and including `self`.
    #[must_use]
    pub fn up_to(self) -> &'static [Rarity] {
        &Self::ALL[..=self as usize]
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CardError::UnknownRarity(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameFormat {
    /// Every legal card.
    #[default]
    Throne,
    /// Only cards from the most recent sets.
    Expedition,
}

impl GameFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GameFormat::Throne => "Throne",
            GameFormat::Expedition => "Expedition",
        }
    }
}

impl fmt::Display for GameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameFormat {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "throne" => Ok(GameFormat::Throne),
            "expedition" => Ok(GameFormat::Expedition),
            _ => Err(CardError::UnknownFormat(s.to_string())),
        }
    }
}

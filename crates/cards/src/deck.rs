use crate::card::Card;
use crate::error::{CardError, Result};
use crate::rules::{DeckRules, GameFormat};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A card together with how many copies the deck runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCard {
    pub card: Card,
    pub quantity: u32,
}

impl DeckCard {
    pub fn new(card: Card, quantity: u32) -> Result<Self> {
        let max = DeckRules::STANDARD.max_copies_for(&card);
        if quantity == 0 || quantity > max {
            return Err(CardError::InvalidQuantity {
                name: card.name,
                quantity,
                max,
            });
        }
        Ok(Self { card, quantity })
    }

    /// `"4 Torch"`
    #[must_use]
    pub fn format(&self) -> String {
        format!("{} {}", self.quantity, self.card.name)
    }

    /// `"4x Torch | 1{F} | Common"`
    #[must_use]
    pub fn format_detailed(&self) -> String {
        format!("{}x {}", self.quantity, self.card.format_for_deck())
    }
}

fn default_deck_name() -> String {
    "Unnamed Deck".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default = "default_deck_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub main_deck: Vec<DeckCard>,
    #[serde(default)]
    pub market: Option<Vec<Card>>,
    #[serde(default)]
    pub format: GameFormat,
    #[serde(default)]
    pub archetype: Option<String>,
}

impl Default for Deck {
    fn default() -> Self {
        Self {
            name: default_deck_name(),
            description: String::new(),
            main_deck: Vec::new(),
            market: None,
            format: GameFormat::default(),
            archetype: None,
        }
    }
}

impl Deck {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn count_where(&self, pred: impl Fn(&Card) -> bool) -> u32 {
        self.main_deck
            .iter()
            .filter(|dc| pred(&dc.card))
            .map(|dc| dc.quantity)
            .sum()
    }

    #[must_use]
    pub fn total_cards(&self) -> u32 {
        self.count_where(|_| true)
    }

    #[must_use]
    pub fn power_count(&self) -> u32 {
        self.count_where(Card::is_power)
    }

    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.count_where(Card::is_unit)
    }

    #[must_use]
    pub fn spell_count(&self) -> u32 {
        self.count_where(Card::is_spell)
    }

    /// Mean cost of non-power cards, weighted by quantity.
    #[must_use]
    pub fn average_cost(&self) -> f64 {
        let (cost, count) = self
            .main_deck
            .iter()
            .filter(|dc| !dc.card.is_power())
            .fold((0u64, 0u64), |(cost, count), dc| {
                (
                    cost + u64::from(dc.card.cost) * u64::from(dc.quantity),
                    count + u64::from(dc.quantity),
                )
            });
        if count == 0 {
            return 0.0;
        }
        round2(cost as f64 / count as f64)
    }

    #[must_use]
    pub fn power_ratio(&self) -> f64 {
        let total = self.total_cards();
        if total == 0 {
            return 0.0;
        }
        round2(f64::from(self.power_count()) / f64::from(total))
    }

    #[must_use]
    pub fn has_market_access(&self) -> bool {
        self.main_deck.iter().any(|dc| dc.card.can_access_market())
    }

    /// Non-power cost curve.
    #[must_use]
    pub fn curve(&self) -> BTreeMap<u32, u32> {
        let mut curve = BTreeMap::new();
        for dc in self.main_deck.iter().filter(|dc| !dc.card.is_power()) {
            *curve.entry(dc.card.cost).or_insert(0) += dc.quantity;
        }
        curve
    }

    /// Copies per faction. A dual-faction card counts toward both.
    #[must_use]
    pub fn factions(&self) -> BTreeMap<String, u32> {
        let mut out = BTreeMap::new();
        for dc in &self.main_deck {
            for faction in dc.card.factions() {
                *out.entry(faction.name().to_string()).or_insert(0) += dc.quantity;
            }
        }
        out
    }

    #[must_use]
    pub fn format_stats(&self) -> String {
        let mut line = format!(
            "Total: {} cards | Powers: {} ({}%) | Units: {} | Spells: {} | Avg Cost: {}",
            self.total_cards(),
            self.power_count(),
            (self.power_ratio() * 100.0).round() as u32,
            self.unit_count(),
            self.spell_count(),
            self.average_cost()
        );
        if let Some(market) = &self.market {
            line.push_str(&format!(" | Market: {} cards", market.len()));
        }
        line
    }

    pub fn validate(&self, rules: &DeckRules) -> DeckValidation {
        let mut report = DeckValidation::default();
        let total = self.total_cards();

        if total < rules.min_cards {
            report.errors.push(format!(
                "Deck has {total} cards; at least {} are required",
                rules.min_cards
            ));
        } else if total > rules.max_cards {
            report.errors.push(format!(
                "Deck has {total} cards; at most {} are allowed",
                rules.max_cards
            ));
        } else if total > rules.recommended_cards {
            report.warnings.push(format!(
                "Deck has {total} cards; {} is recommended for consistency",
                rules.recommended_cards
            ));
        }

        let powers = self.power_count();
        let required = rules.required_power(total);
        if total > 0 && powers < required {
            report.errors.push(format!(
                "Deck has {powers} power cards; at least {required} are required"
            ));
        }

        let mut copies: HashMap<&str, (u32, &Card)> = HashMap::new();
        for dc in &self.main_deck {
            let entry = copies.entry(dc.card.name.as_str()).or_insert((0, &dc.card));
            entry.0 += dc.quantity;
        }
        let mut over: Vec<_> = copies
            .into_iter()
            .filter(|(_, (count, card))| *count > rules.max_copies_for(card))
            .collect();
        over.sort_by(|a, b| a.0.cmp(b.0));
        for (name, (count, card)) in over {
            report.errors.push(format!(
                "{name}: {count} copies exceeds the limit of {}",
                rules.max_copies_for(card)
            ));
        }

        if let Some(market) = &self.market {
            if market.len() != rules.market.size {
                report.errors.push(format!(
                    "Market has {} cards; exactly {} are required",
                    market.len(),
                    rules.market.size
                ));
            }
            if rules.market.unique_only {
                let mut seen = HashSet::new();
                for card in market {
                    if !seen.insert(card.name.to_lowercase()) {
                        report
                            .errors
                            .push(format!("Market card {} appears more than once", card.name));
                    }
                }
            }
            if rules.market.access_required && !market.is_empty() && !self.has_market_access() {
                report
                    .warnings
                    .push("Deck has a market but no cards that can access it".to_string());
            }
        }

        report
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeckValidation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl DeckValidation {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sigil() -> Card {
        Card::new("Fire Sigil", "Power").with_cost(0, "{F}")
    }

    fn torch() -> Card {
        Card::new("Torch", "Spell").with_cost(1, "{F}")
    }

    fn ronin() -> Card {
        Card::new("Oni Ronin", "Unit").with_cost(1, "{F}").with_stats(1, 1)
    }

    fn champion() -> Card {
        Card::new("Rakano Champion", "Unit")
            .with_cost(3, "{F}{J}")
            .with_stats(3, 3)
    }

    fn filler(i: usize, cost: u32) -> DeckCard {
        DeckCard::new(
            Card::new(format!("Filler {i}"), "Unit").with_cost(cost, "{F}"),
            4,
        )
        .unwrap()
    }

    fn legal_deck() -> Deck {
        let mut deck = Deck::new("Burn");
        deck.main_deck.push(DeckCard::new(sigil(), 25).unwrap());
        for i in 0..12 {
            deck.main_deck.push(filler(i, 2));
        }
        deck.main_deck.push(DeckCard::new(torch(), 2).unwrap());
        deck
    }

    #[test]
    fn quantity_limits() {
        assert!(DeckCard::new(torch(), 4).is_ok());
        assert!(matches!(
            DeckCard::new(torch(), 5),
            Err(CardError::InvalidQuantity { max: 4, .. })
        ));
        assert!(DeckCard::new(torch(), 0).is_err());
        assert!(DeckCard::new(sigil(), 30).is_ok());
    }

    #[test]
    fn formats_entries() {
        let dc = DeckCard::new(torch(), 4).unwrap();
        assert_eq!(dc.format(), "4 Torch");
        assert_eq!(dc.format_detailed(), "4x Torch | 1{F} | Common");
    }

    #[test]
    fn computed_stats() {
        let mut deck = Deck::default();
        deck.main_deck.push(DeckCard::new(sigil(), 3).unwrap());
        deck.main_deck.push(DeckCard::new(ronin(), 4).unwrap());
        deck.main_deck.push(DeckCard::new(champion(), 2).unwrap());
        deck.main_deck.push(DeckCard::new(torch(), 1).unwrap());

        assert_eq!(deck.name, "Unnamed Deck");
        assert_eq!(deck.total_cards(), 10);
        assert_eq!(deck.power_count(), 3);
        assert_eq!(deck.unit_count(), 6);
        assert_eq!(deck.spell_count(), 1);
        // (4*1 + 2*3 + 1*1) / 7
        assert_eq!(deck.average_cost(), 1.57);
        assert_eq!(deck.power_ratio(), 0.3);
        assert_eq!(
            deck.curve().into_iter().collect::<Vec<_>>(),
            vec![(1, 5), (3, 2)]
        );
        assert_eq!(deck.factions().get("Justice"), Some(&2));
        assert_eq!(deck.factions().get("Fire"), Some(&10));
        assert_eq!(
            deck.format_stats(),
            "Total: 10 cards | Powers: 3 (30%) | Units: 6 | Spells: 1 | Avg Cost: 1.57"
        );
    }

    #[test]
    fn empty_deck_has_zero_stats() {
        let deck = Deck::default();
        assert_eq!(deck.average_cost(), 0.0);
        assert_eq!(deck.power_ratio(), 0.0);
        assert!(deck.curve().is_empty());
    }

    #[test]
    fn legal_deck_validates() {
        let deck = legal_deck();
        assert_eq!(deck.total_cards(), 75);
        let report = deck.validate(&DeckRules::STANDARD);
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn too_few_powers_is_an_error() {
        let mut deck = legal_deck();
        deck.main_deck[0].quantity = 20;
        deck.main_deck.push(DeckCard::new(ronin(), 4).unwrap());
        deck.main_deck.push(DeckCard::new(champion(), 1).unwrap());
        let report = deck.validate(&DeckRules::STANDARD);
        assert!(!report.is_valid());
        assert!(report.errors[0].contains("power cards"));
    }

    #[test]
    fn copy_limit_counts_repeated_entries() {
        let mut deck = legal_deck();
        deck.main_deck.push(DeckCard::new(torch(), 3).unwrap());
        let report = deck.validate(&DeckRules::STANDARD);
        assert!(report
            .errors
            .iter()
            .any(|e| e.starts_with("Torch: 5 copies")));
    }

    #[test]
    fn market_rules() {
        let mut deck = legal_deck();
        deck.market = Some(vec![torch(), torch(), ronin()]);
        let report = deck.validate(&DeckRules::STANDARD);
        assert!(report.errors.iter().any(|e| e.contains("exactly 5")));
        assert!(report.errors.iter().any(|e| e.contains("more than once")));
        assert!(report.warnings.iter().any(|w| w.contains("access")));
        assert!(deck.format_stats().ends_with(" | Market: 3 cards"));
    }
}

use crate::card::Card;
use crate::deck::{Deck, DeckCard};
use crate::rules::DeckRules;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Quantities the user picked from a card pool, keyed by card name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckSelection {
    quantities: BTreeMap<String, u32>,
}

fn index(pool: &[Card]) -> HashMap<&str, &Card> {
    pool.iter().map(|c| (c.name.as_str(), c)).collect()
}

impl DeckSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `quantity` copies of `card`, clamped to its copy limit.
    /// Zero removes the card. Returns the stored quantity.
    pub fn set_quantity(&mut self, card: &Card, quantity: u32) -> u32 {
        let stored = quantity.min(DeckRules::STANDARD.max_copies_for(card));
        if stored == 0 {
            self.quantities.remove(&card.name);
        } else {
            self.quantities.insert(card.name.clone(), stored);
        }
        stored
    }

    /// The "4x" shortcut.
    pub fn add_playset(&mut self, card: &Card) -> u32 {
        self.set_quantity(card, DeckRules::STANDARD.max_copies)
    }

    #[must_use]
    pub fn quantity(&self, name: &str) -> u32 {
        self.quantities.get(name).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.quantities.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.quantities.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn total_cards(&self) -> u32 {
        self.quantities.values().sum()
    }

    #[must_use]
    pub fn power_cards(&self, pool: &[Card]) -> u32 {
        let by_name = index(pool);
        self.quantities
            .iter()
            .filter(|(name, _)| by_name.get(name.as_str()).is_some_and(|c| c.is_power()))
            .map(|(_, qty)| *qty)
            .sum()
    }

    /// Deck-counter check: size within bounds and at least a third power.
    #[must_use]
    pub fn is_valid(&self, pool: &[Card], rules: &DeckRules) -> bool {
        let total = self.total_cards();
        let powers = self.power_cards(pool);
        (rules.min_cards..=rules.max_cards).contains(&total)
            && f64::from(powers) + 1e-9 >= f64::from(total) * rules.min_power_ratio
    }

    /// Builds a deck from the selection. Names missing from `pool` are skipped.
    pub fn to_deck(&self, pool: &[Card], name: &str) -> Deck {
        let by_name = index(pool);
        let mut deck = Deck::new(name);
        deck.main_deck = self
            .quantities
            .iter()
            .filter_map(|(card_name, qty)| {
                by_name.get(card_name.as_str()).map(|card| DeckCard {
                    card: (*card).clone(),
                    quantity: *qty,
                })
            })
            .collect();
        deck
    }

    /// Pool cards whose name or text contains `term`, optionally only selected ones.
    pub fn filter_pool<'a>(
        &self,
        pool: &'a [Card],
        term: &str,
        selected_only: bool,
    ) -> Vec<&'a Card> {
        let term = term.trim().to_lowercase();
        pool.iter()
            .filter(|card| {
                term.is_empty()
                    || card.name.to_lowercase().contains(&term)
                    || card.card_text.to_lowercase().contains(&term)
            })
            .filter(|card| !selected_only || self.quantity(&card.name) > 0)
            .collect()
    }
}

/// Composition of a card pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub by_type: BTreeMap<String, usize>,
    pub by_rarity: BTreeMap<String, usize>,
    pub cost_curve: BTreeMap<u32, usize>,
}

impl PoolStats {
    pub fn from_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Self {
        let mut stats = Self::default();
        for card in cards {
            *stats.by_type.entry(card.base_type().to_string()).or_insert(0) += 1;
            *stats.by_rarity.entry(card.rarity.clone()).or_insert(0) += 1;
            *stats.cost_curve.entry(card.cost).or_insert(0) += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn pool() -> Vec<Card> {
        vec![
            Card::new("Fire Sigil", "Power").with_cost(0, "{F}"),
            Card::new("Torch", "Spell")
                .with_cost(1, "{F}")
                .with_text("Deal 2 damage to a unit."),
            Card::new("Oni Ronin", "Unit - Oni")
                .with_cost(1, "{F}")
                .with_text("Charge")
                .with_rarity("Uncommon"),
        ]
    }

    #[test]
    fn quantities_clamp_and_remove() {
        let pool = pool();
        let mut sel = DeckSelection::new();
        assert_eq!(sel.set_quantity(&pool[1], 7), 4);
        assert_eq!(sel.set_quantity(&pool[0], 40), 40);
        assert_eq!(sel.set_quantity(&pool[0], 500), 99);
        assert_eq!(sel.total_cards(), 103);
        sel.set_quantity(&pool[1], 0);
        assert_eq!(sel.quantity("Torch"), 0);
        assert_eq!(sel.add_playset(&pool[2]), 4);
        sel.clear();
        assert!(sel.is_empty());
    }

    #[test]
    fn validity_needs_size_and_power() {
        let mut pool = pool();
        for i in 0..12 {
            pool.push(Card::new(format!("Unit {i}"), "Unit").with_cost(2, "{F}"));
        }
        let mut sel = DeckSelection::new();
        sel.set_quantity(&pool[0], 25);
        for card in &pool[3..] {
            sel.add_playset(card);
        }
        sel.set_quantity(&pool[1], 2);
        assert_eq!(sel.total_cards(), 75);
        assert_eq!(sel.power_cards(&pool), 25);
        assert!(sel.is_valid(&pool, &DeckRules::STANDARD));

        sel.set_quantity(&pool[0], 24);
        assert!(!sel.is_valid(&pool, &DeckRules::STANDARD));
    }

    #[test]
    fn builds_deck_from_selection() {
        let pool = pool();
        let mut sel = DeckSelection::new();
        sel.add_playset(&pool[1]);
        sel.set_quantity(&pool[0], 3);
        sel.quantities.insert("Ghost Card".into(), 2);
        let deck = sel.to_deck(&pool, "Test");
        assert_eq!(deck.name, "Test");
        assert_eq!(deck.total_cards(), 7);
        assert_eq!(deck.power_count(), 3);
    }

    #[test]
    fn filters_pool_by_term_and_selection() {
        let pool = pool();
        let mut sel = DeckSelection::new();
        sel.add_playset(&pool[2]);
        let names = |cards: Vec<&Card>| cards.iter().map(|c| c.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(sel.filter_pool(&pool, "DAMAGE", false)), vec!["Torch"]);
        assert_eq!(names(sel.filter_pool(&pool, "", true)), vec!["Oni Ronin"]);
        assert_eq!(sel.filter_pool(&pool, "", false).len(), 3);
    }

    #[test]
    fn pool_stats_use_base_type() {
        let stats = PoolStats::from_cards(&pool());
        assert_eq!(stats.by_type.get("Unit"), Some(&1));
        assert_eq!(stats.by_type.get("Power"), Some(&1));
        assert_eq!(stats.by_rarity.get("Common"), Some(&2));
        assert_eq!(stats.cost_curve.get(&1), Some(&2));
    }

    proptest! {
        #[test]
        fn stored_quantity_never_exceeds_limit(qty in 0u32..500, sigil in any::<bool>()) {
            let card = if sigil {
                Card::new("Shadow Sigil", "Power")
            } else {
                Card::new("Vara's Favor", "Spell")
            };
            let mut sel = DeckSelection::new();
            let stored = sel.set_quantity(&card, qty);
            prop_assert!(stored <= DeckRules::STANDARD.max_copies_for(&card));
            prop_assert_eq!(sel.quantity(&card.name), stored);
        }
    }
}

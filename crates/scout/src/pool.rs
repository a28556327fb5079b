use crate::analysis::{Archetype, StrategyAnalysis};
use eternal_cards::Card;
use serde::Serialize;
use std::collections::HashSet;

const BASE_RELEVANCE: f64 = 0.5;
const CORE_THRESHOLD: f64 = 0.8;
const SYNERGY_THRESHOLD: f64 = 0.5;
const CHEAP_AGGRO_COST: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolTier {
    MustInclude,
    Core,
    Synergy,
    Support,
}

/// Heuristic fit of a card for the strategy, in `[0.5, 1.0]`.
#[must_use]
pub fn relevance(card: &Card, analysis: &StrategyAnalysis) -> f64 {
    let text = card.card_text.to_lowercase();
    let mut score = BASE_RELEVANCE;

    score += 0.1
        * analysis
            .key_mechanics
            .iter()
            .filter(|m| text.contains(m.as_str()))
            .count() as f64;

    if let Some(tribe) = &analysis.tribal_focus {
        if card.unit_types.iter().any(|t| t.eq_ignore_ascii_case(tribe)) {
            score += 0.2;
        }
    }

    match analysis.archetype {
        Archetype::Aggro if card.cost <= CHEAP_AGGRO_COST => score += 0.1,
        Archetype::Control if text.contains("draw") => score += 0.1,
        _ => {}
    }

    score.min(1.0)
}

/// Where a card lands in the organized pool.
#[must_use]
pub fn tier(card: &Card, analysis: &StrategyAnalysis) -> PoolTier {
    if analysis.is_must_include(&card.name) {
        PoolTier::MustInclude
    } else if card.is_power() {
        PoolTier::Support
    } else {
        let score = relevance(card, analysis);
        if score >= CORE_THRESHOLD {
            PoolTier::Core
        } else if score >= SYNERGY_THRESHOLD {
            PoolTier::Synergy
        } else {
            PoolTier::Support
        }
    }
}

/// Orders a combined pool: must-include cards as found, then core, synergy
/// and support tiers each by cost. Duplicate names are dropped, as is any
/// card whose lowercased name is in `excluded`, must-include or not.
#[must_use]
pub fn organize_pool(
    cards: Vec<Card>,
    analysis: &StrategyAnalysis,
    excluded: &HashSet<String>,
) -> Vec<Card> {
    let mut must_include = Vec::new();
    let mut core = Vec::new();
    let mut synergy = Vec::new();
    let mut support = Vec::new();

    for card in cards {
        if excluded.contains(&card.name.to_lowercase()) {
            continue;
        }
        match tier(&card, analysis) {
            PoolTier::MustInclude => must_include.push(card),
            PoolTier::Core => core.push(card),
            PoolTier::Synergy => synergy.push(card),
            PoolTier::Support => support.push(card),
        }
    }
    for bucket in [&mut core, &mut synergy, &mut support] {
        bucket.sort_by_key(|c| c.cost);
    }

    let mut seen = HashSet::new();
    must_include
        .into_iter()
        .chain(core)
        .chain(synergy)
        .chain(support)
        .filter(|card| seen.insert(card.name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn aggro() -> StrategyAnalysis {
        StrategyAnalysis {
            archetype: Archetype::Aggro,
            key_mechanics: vec!["damage".into(), "charge".into()],
            tribal_focus: Some("Oni".into()),
            ..StrategyAnalysis::default()
        }
    }

    #[test]
    fn relevance_components() {
        let analysis = aggro();
        let plain = Card::new("Big Rock", "Unit").with_cost(6, "{T}");
        assert!((relevance(&plain, &analysis) - 0.5).abs() < 1e-9);

        let torch = Card::new("Torch", "Spell")
            .with_cost(1, "{F}")
            .with_text("Deal 2 damage to a unit.");
        assert!((relevance(&torch, &analysis) - 0.7).abs() < 1e-9);

        let ronin = Card::new("Oni Ronin", "Unit")
            .with_cost(1, "{F}")
            .with_text("Charge. Deals damage.")
            .with_unit_types(["Oni"]);
        assert!((relevance(&ronin, &analysis) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn control_rewards_draw() {
        let analysis = StrategyAnalysis {
            archetype: Archetype::Control,
            ..StrategyAnalysis::default()
        };
        let card = Card::new("Wisdom", "Spell").with_cost(7, "{P}").with_text("Draw two cards.");
        assert!((relevance(&card, &analysis) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn organize_buckets_and_sorts() {
        let analysis = StrategyAnalysis {
            must_include_cards: vec!["harsh rule".into()],
            ..aggro()
        };
        let pool = vec![
            Card::new("Fire Sigil", "Power"),
            Card::new("Big Rock", "Unit").with_cost(6, "{T}"),
            Card::new("Oni Ronin", "Unit")
                .with_cost(2, "{F}")
                .with_text("Charge")
                .with_unit_types(["Oni"]),
            Card::new("Torch", "Spell")
                .with_cost(1, "{F}")
                .with_text("Deal 2 damage to a unit."),
            Card::new("Harsh Rule", "Spell").with_cost(5, "{J}{J}{S}"),
            Card::new("Torch", "Spell").with_cost(1, "{F}"),
            Card::new("Brightmace Paladin", "Unit").with_cost(3, "{J}"),
        ];
        let organized = organize_pool(pool, &analysis, &HashSet::new());
        let names: Vec<&str> = organized.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Harsh Rule",
                "Oni Ronin",
                "Torch",
                "Brightmace Paladin",
                "Big Rock",
                "Fire Sigil",
            ]
        );
    }

    #[test]
    fn excluded_cards_leave_every_bucket() {
        let analysis = StrategyAnalysis {
            must_include_cards: vec!["Harsh Rule".into()],
            ..aggro()
        };
        let pool = vec![
            Card::new("Harsh Rule", "Spell").with_cost(5, "{J}{J}{S}"),
            Card::new("Torch", "Spell")
                .with_cost(1, "{F}")
                .with_text("Deal 2 damage to a unit."),
            Card::new("Fire Sigil", "Power"),
        ];
        let excluded: HashSet<String> = ["harsh rule", "fire sigil"]
            .into_iter()
            .map(String::from)
            .collect();
        let organized = organize_pool(pool, &analysis, &excluded);
        let names: Vec<&str> = organized.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Torch"]);
    }

    proptest! {
        #[test]
        fn relevance_stays_in_bounds(
            cost in 0u32..15,
            text in "[a-z ]{0,40}",
            mechanics in proptest::collection::vec("[a-z]{1,6}", 0..12),
            archetype in 0usize..4,
            tribal in any::<bool>(),
        ) {
            let analysis = StrategyAnalysis {
                archetype: Archetype::ALL[archetype],
                key_mechanics: mechanics,
                tribal_focus: tribal.then(|| "Oni".to_string()),
                ..StrategyAnalysis::default()
            };
            let card = Card::new("X", "Unit")
                .with_cost(cost, "")
                .with_text(text)
                .with_unit_types(["Oni"]);
            let score = relevance(&card, &analysis);
            prop_assert!((0.5..=1.0).contains(&score));
        }
    }
}

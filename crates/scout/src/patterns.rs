//! Keyword tables behind the first-pass strategy detection.
//!
//! Every table is ordered: archetypes and factions are tested top to bottom
//! and mechanics are reported in table order.

use crate::analysis::{Archetype, StrategyAnalysis};
use eternal_cards::Faction;

pub const ARCHETYPE_PATTERNS: &[(Archetype, &[&str])] = &[
    (
        Archetype::Aggro,
        &["aggro", "aggressive", "fast", "rush", "burn", "face", "beatdown", "tempo"],
    ),
    (
        Archetype::Control,
        &["control", "removal", "board wipe", "slow", "grind", "defensive", "reactive"],
    ),
    (
        Archetype::Midrange,
        &["midrange", "value", "balanced", "versatile", "flexible"],
    ),
    (
        Archetype::Combo,
        &["combo", "synergy", "otk", "engine", "infinite", "loop"],
    ),
];

pub const FACTION_PATTERNS: &[(Faction, &[&str])] = &[
    (
        Faction::Fire,
        &["fire", "burn", "torch", "flame", "oni", "grenadin", "gun"],
    ),
    (
        Faction::Time,
        &["time", "ramp", "dinosaur", "sentinel", "sandstorm", "amber"],
    ),
    (
        Faction::Justice,
        &["justice", "armor", "valkyrie", "enforcer", "law", "order"],
    ),
    (
        Faction::Primal,
        &["primal", "spell", "wisdom", "ice", "yeti", "unseen", "lightning"],
    ),
    (
        Faction::Shadow,
        &["shadow", "kill", "death", "void", "reanimator", "stonescar", "umbren"],
    ),
];

pub const MECHANIC_PATTERNS: &[(&str, &[&str])] = &[
    (
        "removal",
        &["removal", "kill", "destroy", "vanquish", "harsh rule", "board wipe"],
    ),
    (
        "card_draw",
        &["draw", "card advantage", "wisdom", "strategize", "selection"],
    ),
    ("ramp", &["ramp", "power", "accelerate", "seek power", "influence"]),
    ("burn", &["burn", "damage", "torch", "flame blast", "direct damage"]),
    ("flying", &["flying", "flyer", "aerial", "airborne", "wings"]),
    ("weapons", &["weapon", "relic weapon", "sword", "hammer", "gun"]),
    ("void", &["void", "graveyard", "recursion", "reanimator", "death"]),
    ("tribal", &["tribal", "synergy", "lord", "matters"]),
    ("sacrifice", &["sacrifice", "sac", "combust", "devour"]),
    ("lifegain", &["lifegain", "life", "heal", "lifesteal"]),
    ("market", &["market", "merchant", "smuggler", "etchings", "bargain"]),
];

pub const TRIBAL_KEYWORDS: &[&str] = &["valkyrie", "oni", "yeti", "grenadin", "sentinel", "dragon"];

const NO_MARKET_PHRASES: &[&str] = &["no market", "without market"];

fn mentions(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Keyword-only analysis of a strategy description. Matching is plain
/// substring search on the lowercased input.
#[must_use]
pub fn detect_patterns(input: &str) -> StrategyAnalysis {
    let text = input.to_lowercase();
    let mut analysis = StrategyAnalysis::default();

    if let Some((archetype, _)) = ARCHETYPE_PATTERNS
        .iter()
        .find(|(_, patterns)| mentions(&text, patterns))
    {
        analysis.archetype = *archetype;
    }

    let mut factions = FACTION_PATTERNS
        .iter()
        .filter(|(_, patterns)| mentions(&text, patterns))
        .map(|(faction, _)| *faction);
    analysis.primary_faction = factions.next();
    analysis.secondary_factions = factions.take(2).collect();

    for (mechanic, patterns) in MECHANIC_PATTERNS {
        if mentions(&text, patterns) {
            analysis.key_mechanics.push((*mechanic).to_string());
        }
    }

    for tribe in TRIBAL_KEYWORDS {
        if text.contains(tribe) {
            analysis.tribal_focus = Some(capitalize(tribe));
            analysis.add_mechanic("tribal");
        }
    }

    analysis.speed = analysis.archetype.speed();
    if mentions(&text, NO_MARKET_PHRASES) {
        analysis.market_preference = false;
    }
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Speed;
    use pretty_assertions::assert_eq;

    #[test]
    fn aggro_fire_burn() {
        let analysis = detect_patterns("Fast aggressive Fire burn deck");
        assert_eq!(analysis.archetype, Archetype::Aggro);
        assert_eq!(analysis.speed, Speed::Fast);
        assert_eq!(analysis.primary_faction, Some(Faction::Fire));
        assert!(analysis.secondary_factions.is_empty());
        assert_eq!(analysis.key_mechanics, vec!["burn"]);
        assert!(analysis.market_preference);
    }

    #[test]
    fn first_archetype_in_table_order_wins() {
        // "removal" is a control keyword, "burn" an aggro one.
        let analysis = detect_patterns("removal and burn");
        assert_eq!(analysis.archetype, Archetype::Aggro);
        assert_eq!(analysis.key_mechanics, vec!["removal", "burn"]);
    }

    #[test]
    fn factions_capped_at_two_secondaries() {
        let analysis = detect_patterns("fire time justice primal shadow");
        assert_eq!(analysis.primary_faction, Some(Faction::Fire));
        assert_eq!(
            analysis.secondary_factions,
            vec![Faction::Time, Faction::Justice]
        );
    }

    #[test]
    fn last_tribe_wins_and_tribal_added_once() {
        let analysis = detect_patterns("valkyrie and yeti friends");
        assert_eq!(analysis.tribal_focus.as_deref(), Some("Yeti"));
        assert_eq!(
            analysis
                .key_mechanics
                .iter()
                .filter(|m| *m == "tribal")
                .count(),
            1
        );
        assert_eq!(analysis.primary_faction, Some(Faction::Justice));
        assert_eq!(analysis.secondary_factions, vec![Faction::Primal]);
    }

    #[test]
    fn control_is_slow_and_market_opt_out() {
        let analysis = detect_patterns("Slow grindy control WITHOUT MARKET");
        assert_eq!(analysis.archetype, Archetype::Control);
        assert_eq!(analysis.speed, Speed::Slow);
        assert!(!analysis.market_preference);
        assert!(analysis.key_mechanics.contains(&"market".to_string()));
    }

    #[test]
    fn nothing_detected_keeps_defaults() {
        let analysis = detect_patterns("something cool");
        assert_eq!(analysis, StrategyAnalysis::default());
    }
}

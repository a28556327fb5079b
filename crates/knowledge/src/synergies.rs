use serde::Serialize;
use std::fmt;

/// A multi-skill interaction with an explanation of how it plays out.
#[derive(Debug, Clone, Serialize)]
pub struct Synergy {
    pub name: &'static str,
    pub skills: &'static [&'static str],
    pub strength: u8,
    pub mechanics: &'static str,
    pub requirements: &'static str,
    pub strategic_value: &'static str,
    pub limitations: &'static str,
}

pub const DETAILED_SYNERGIES: &[Synergy] = &[
    Synergy {
        name: "deadly_quickdraw_combo",
        skills: &["Deadly", "Quickdraw"],
        strength: 5,
        mechanics: "A unit with both skills kills any blocker without taking damage back",
        requirements: "Give both skills to the same unit through weapons, spells or abilities",
        strategic_value: "Perfect removal that survives combat",
        limitations: "Only works when blocked by a unit whose health is below the attacker's strength; Quickdraw and Deadly do not protect against Killer",
    },
    Synergy {
        name: "lifesteal_bolster_engine",
        skills: &["Lifesteal", "Bolster"],
        strength: 5,
        mechanics: "Every point of Lifesteal damage gains life, which triggers every Bolster unit",
        requirements: "Bolster units in play plus a consistent Lifesteal source",
        strategic_value: "Stats snowball while the life total climbs",
        limitations: "Vulnerable to mass removal or silence on the key pieces",
    },
    Synergy {
        name: "echo_destiny_value",
        skills: &["Echo", "Destiny"],
        strength: 4,
        mechanics: "Destiny plays the card for free when drawn and Echo adds a copy, so two free cards",
        requirements: "Ways to give Destiny to Echo cards or the other way around",
        strategic_value: "Burst of tempo and card advantage",
        limitations: "Destiny does not trigger on the Echo copy when it is added later",
    },
    Synergy {
        name: "warcry_weapon_scaling",
        skills: &["Warcry", "Weapon-matters"],
        strength: 4,
        mechanics: "Warcry buffs the next weapon or unit in the deck, so weapon strategies draw buffed weapons",
        requirements: "High weapon density plus Warcry units",
        strategic_value: "Weapons grow stronger over the game",
        limitations: "Needs the right density of both card kinds",
    },
    Synergy {
        name: "overwhelm_double_damage_burst",
        skills: &["Overwhelm", "Double Damage"],
        strength: 5,
        mechanics: "Double Damage doubles all damage and Overwhelm pushes the excess to the player",
        requirements: "A large unit with both skills, or ways to grant both",
        strategic_value: "Massive face damage even through small blockers",
        limitations: "Multiple blockers split the damage",
    },
    Synergy {
        name: "flying_aegis_finisher",
        skills: &["Flying", "Aegis"],
        strength: 4,
        mechanics: "Flying dodges most blockers and Aegis stops the first removal",
        requirements: "A unit worth protecting twice",
        strategic_value: "Resilient evasive threat",
        limitations: "Still dies to a second removal or to Killer",
    },
    Synergy {
        name: "charge_warcry_tempo",
        skills: &["Charge", "Warcry"],
        strength: 3,
        mechanics: "Charge attacks right away, triggering Warcry on the turn the unit is played",
        requirements: "Cheap units with both skills",
        strategic_value: "Immediate pressure plus setup for later draws",
        limitations: "Charge units tend to be small",
    },
    Synergy {
        name: "unblockable_infiltrate_guaranteed",
        skills: &["Unblockable", "Infiltrate"],
        strength: 3,
        mechanics: "Unblockable units cannot be blocked, so the Infiltrate trigger is guaranteed",
        requirements: "Units whose Infiltrate is strong enough to build around",
        strategic_value: "Guaranteed Infiltrate effects",
        limitations: "Board wipes still remove Unblockable units",
    },
    Synergy {
        name: "taunt_deadly_trap",
        skills: &["Taunt", "Deadly"],
        strength: 3,
        mechanics: "Taunt forces a block and Deadly kills whatever it damages",
        requirements: "Ways to give Taunt to Deadly units",
        strategic_value: "Forces bad trades on the opponent",
        limitations: "With several defenders the opponent chooses which unit blocks",
    },
    Synergy {
        name: "killer_deadly_trap",
        skills: &["Killer", "Deadly"],
        strength: 5,
        mechanics: "Killer picks which unit to attack and Deadly kills any unit it damages",
        requirements: "Ways to give Killer to Deadly units",
        strategic_value: "Forces bad trades on the opponent",
        limitations: "Ambush can dodge the attack but not the removal; weak to silence and transform",
    },
    Synergy {
        name: "entomb_sacrifice",
        skills: &["Entomb"],
        strength: 4,
        mechanics: "Entomb triggers when the card dies, so sacrificing Entomb units pays off",
        requirements: "Ways to sacrifice Entomb units",
        strategic_value: "Powerful effects at no extra cost",
        limitations: "Vulnerable to mass removal or silence on the key pieces",
    },
];

/// A recurring set of mechanics that together form a game plan.
#[derive(Debug, Clone, Serialize)]
pub struct MechanicalPackage {
    pub name: &'static str,
    pub core_mechanics: &'static [&'static str],
    pub support_mechanics: &'static [&'static str],
    pub description: &'static str,
    pub win_condition: &'static str,
    pub weaknesses: &'static [&'static str],
}

pub const MECHANICAL_PACKAGES: &[MechanicalPackage] = &[
    MechanicalPackage {
        name: "aggressive_burn",
        core_mechanics: &["direct damage spells", "charge units", "overwhelm"],
        support_mechanics: &["cost reduction", "spell damage amplification"],
        description: "Combines direct damage with pressure from fast units",
        win_condition: "Reduce the opponent's life to zero quickly",
        weaknesses: &["lifesteal", "armor gain", "defensive units"],
    },
    MechanicalPackage {
        name: "go_wide_tokens",
        core_mechanics: &["token generation", "unit buffs", "mass pump effects"],
        support_mechanics: &["sacrifice synergies", "death triggers"],
        description: "Creates many small units and turns them into threats",
        win_condition: "Overwhelm with a quantity of threats",
        weaknesses: &["board wipes", "harsh rule effects"],
    },
    MechanicalPackage {
        name: "weapons_matter",
        core_mechanics: &["weapon generation", "weapon buffs", "warcry"],
        support_mechanics: &["unit protection", "weapon recursion"],
        description: "Focuses on buffing and reusing weapons for value",
        win_condition: "Build massive weapons or generate incremental advantage",
        weaknesses: &["weapon removal", "unit removal"],
    },
    MechanicalPackage {
        name: "void_recursion",
        core_mechanics: &["self-mill", "void interaction", "reanimation"],
        support_mechanics: &["entomb effects", "death triggers", "sacrifice"],
        description: "Uses the void as a second hand, recycling resources",
        win_condition: "Resource advantage through recursion",
        weaknesses: &["void hate", "silence effects", "transform removal"],
    },
    MechanicalPackage {
        name: "spell_combo",
        core_mechanics: &["spell cost reduction", "spell copying", "card draw"],
        support_mechanics: &["spell damage", "fast spells"],
        description: "Chains multiple spells for an explosive effect",
        win_condition: "Spell combo for massive damage or advantage",
        weaknesses: &["negate effects", "face aegis", "aggressive pressure"],
    },
    MechanicalPackage {
        name: "ramp_fatties",
        core_mechanics: &["power acceleration", "cost reduction", "big units"],
        support_mechanics: &["card selection", "protection spells"],
        description: "Accelerates to play big threats before the opponent",
        win_condition: "Dominate with units the opponent can't handle",
        weaknesses: &["aggressive starts", "hard removal", "transform effects"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AntiSynergy {
    pub name: &'static str,
    pub mechanics: &'static [&'static str],
    pub conflict: &'static str,
    pub severity: Severity,
}

pub const ANTI_SYNERGIES: &[AntiSynergy] = &[
    AntiSynergy {
        name: "infiltrate_taunt",
        mechanics: &["Infiltrate", "Taunt"],
        conflict: "Taunt forces blocks, which keeps the Infiltrate unit from connecting",
        severity: Severity::High,
    },
    AntiSynergy {
        name: "warcry_spell_heavy",
        mechanics: &["Warcry", "Spell-based strategy"],
        conflict: "Warcry only buffs units and weapons, so it is wasted in decks with few of them",
        severity: Severity::High,
    },
    AntiSynergy {
        name: "reckless_control",
        mechanics: &["Reckless", "Control strategy"],
        conflict: "Reckless forces attacks, which does not fit a defensive control plan",
        severity: Severity::Medium,
    },
    AntiSynergy {
        name: "echo_market",
        mechanics: &["Echo", "Market cards"],
        conflict: "Market cards are unique single copies, so Echo adds nothing",
        severity: Severity::High,
    },
    AntiSynergy {
        name: "destiny_expensive",
        mechanics: &["Destiny", "High cost cards"],
        conflict: "Destiny plays cards for free, but expensive cards are weak early when Destiny fires",
        severity: Severity::Medium,
    },
    AntiSynergy {
        name: "aegis_sacrifice",
        mechanics: &["Aegis", "Self-sacrifice strategies"],
        conflict: "Aegis protects a unit you want to sacrifice",
        severity: Severity::Low,
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct TempoProfile {
    pub name: &'static str,
    pub description: &'static str,
    pub examples: &'static [&'static str],
    pub ideal_curve: &'static str,
    pub peak_turns: &'static str,
}

pub const TEMPO_CONSIDERATIONS: &[TempoProfile] = &[
    TempoProfile {
        name: "fast_synergies",
        description: "Synergies that work best in fast decks",
        examples: &[
            "Charge + Warcry: immediate value",
            "Burn + Overwhelm: fast pressure",
            "Echo + Cheap units: flood the board",
        ],
        ideal_curve: "Peak at 1-3 cost",
        peak_turns: "Turns 1-5",
    },
    TempoProfile {
        name: "slow_synergies",
        description: "Synergies that need setup or time",
        examples: &[
            "Bolster engines: need pieces in play",
            "Void recursion: need to fill the void first",
            "Weapon scaling: incremental value",
        ],
        ideal_curve: "Balanced, with late game",
        peak_turns: "Turns 5+",
    },
    TempoProfile {
        name: "flexible_synergies",
        description: "Work at any speed",
        examples: &[
            "Flying + Aegis: always good",
            "Deadly + Quickdraw: always efficient",
            "Lifesteal: useful early or late",
        ],
        ideal_curve: "Adaptable",
        peak_turns: "All game",
    },
];

/// Synergy and package names grouped by purpose. Some names refer to
/// synergies that only exist as skill pairs.
pub const SYNERGY_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "damage_amplification",
        &[
            "overwhelm_double_damage_burst",
            "berserk_lifesteal_sustain",
            "charge_warcry_tempo",
        ],
    ),
    (
        "defensive_synergies",
        &[
            "deadly_quickdraw_combo",
            "flying_aegis_finisher",
            "endurance_killer_control",
            "taunt_deadly_trap",
        ],
    ),
    (
        "value_generation",
        &[
            "echo_destiny_value",
            "warcry_weapon_scaling",
            "revenge_warcry_recursion",
            "lifesteal_bolster_engine",
        ],
    ),
    (
        "combo_enablers",
        &["stealth_infiltrate_guaranteed", "echo_destiny_value", "spell_combo"],
    ),
    (
        "resource_advantage",
        &["void_recursion", "echo_destiny_value", "revenge_warcry_recursion"],
    ),
    (
        "tempo_positive",
        &["charge_warcry_tempo", "echo_destiny_value", "aggressive_burn"],
    ),
];

/// Keyword to package, checked in order against the lowercased strategy.
const PACKAGE_KEYWORDS: &[(&str, &str)] = &[
    ("aggro", "aggressive_burn"),
    ("burn", "aggressive_burn"),
    ("tokens", "go_wide_tokens"),
    ("weapons", "weapons_matter"),
    ("void", "void_recursion"),
    ("graveyard", "void_recursion"),
    ("spell", "spell_combo"),
    ("combo", "spell_combo"),
    ("ramp", "ramp_fatties"),
    ("control", "ramp_fatties"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AntiSynergyConflict {
    pub conflict: &'static str,
    pub mechanics: Vec<String>,
    pub reason: &'static str,
    pub severity: Severity,
}

#[must_use]
pub fn synergy(name: &str) -> Option<&'static Synergy> {
    DETAILED_SYNERGIES.iter().find(|s| s.name == name)
}

#[must_use]
pub fn package(name: &str) -> Option<&'static MechanicalPackage> {
    MECHANICAL_PACKAGES.iter().find(|p| p.name == name)
}

/// Synergies involving any of `skills`.
#[must_use]
pub fn synergies_for_skills<S: AsRef<str>>(skills: &[S]) -> Vec<&'static Synergy> {
    DETAILED_SYNERGIES
        .iter()
        .filter(|syn| {
            skills
                .iter()
                .any(|skill| syn.skills.contains(&skill.as_ref()))
        })
        .collect()
}

/// Anti-synergies for which at least two of `mechanics` are present.
#[must_use]
pub fn check_anti_synergies<S: AsRef<str>>(mechanics: &[S]) -> Vec<AntiSynergyConflict> {
    ANTI_SYNERGIES
        .iter()
        .filter_map(|anti| {
            let matched: Vec<String> = mechanics
                .iter()
                .map(|m| m.as_ref())
                .filter(|m| anti.mechanics.contains(m))
                .map(str::to_string)
                .collect();
            (matched.len() >= 2).then_some(AntiSynergyConflict {
                conflict: anti.name,
                mechanics: matched,
                reason: anti.conflict,
                severity: anti.severity,
            })
        })
        .collect()
}

/// The mechanical package suggested by the first matching keyword.
#[must_use]
pub fn package_for_strategy(strategy: &str) -> Option<&'static MechanicalPackage> {
    let strategy = strategy.to_lowercase();
    PACKAGE_KEYWORDS
        .iter()
        .find(|(keyword, _)| strategy.contains(keyword))
        .and_then(|(_, name)| package(name))
}

/// Mean strength of the synergies whose skills are all present.
#[must_use]
pub fn evaluate_synergy_strength<S: AsRef<str>>(skills: &[S]) -> f64 {
    let (total, count) = DETAILED_SYNERGIES
        .iter()
        .filter(|syn| {
            syn.skills
                .iter()
                .all(|needed| skills.iter().any(|s| s.as_ref() == *needed))
        })
        .fold((0u32, 0u32), |(total, count), syn| {
            (total + u32::from(syn.strength), count + 1)
        });
    f64::from(total) / f64::from(count.max(1))
}

/// Skills and support mechanics that combine with `base`.
#[must_use]
pub fn compatible_mechanics(base: &str) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    let mut push = |m: &'static str| {
        if !out.contains(&m) {
            out.push(m);
        }
    };
    for syn in DETAILED_SYNERGIES.iter().filter(|s| s.skills.contains(&base)) {
        for skill in syn.skills.iter().copied().filter(|s| *s != base) {
            push(skill);
        }
    }
    for pkg in MECHANICAL_PACKAGES
        .iter()
        .filter(|p| p.core_mechanics.contains(&base))
    {
        for mechanic in pkg.support_mechanics {
            push(*mechanic);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn synergies_match_any_skill() {
        let names: Vec<_> = synergies_for_skills(&["Deadly"])
            .iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(
            names,
            vec!["deadly_quickdraw_combo", "taunt_deadly_trap", "killer_deadly_trap"]
        );
        assert!(synergies_for_skills::<&str>(&[]).is_empty());
    }

    #[test]
    fn anti_synergy_needs_two_matches() {
        assert!(check_anti_synergies(&["Echo"]).is_empty());
        let conflicts = check_anti_synergies(&["Echo", "Market cards", "Taunt"]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict, "echo_market");
        assert_eq!(conflicts[0].severity, Severity::High);
        assert_eq!(conflicts[0].mechanics, vec!["Echo", "Market cards"]);
    }

    #[test]
    fn package_keywords_checked_in_order() {
        assert_eq!(
            package_for_strategy("Aggro burn with weapons").map(|p| p.name),
            Some("aggressive_burn")
        );
        assert_eq!(
            package_for_strategy("graveyard value").map(|p| p.name),
            Some("void_recursion")
        );
        assert_eq!(
            package_for_strategy("Big CONTROL deck").map(|p| p.name),
            Some("ramp_fatties")
        );
        assert!(package_for_strategy("midrange").is_none());
    }

    #[test]
    fn strength_is_mean_of_complete_synergies() {
        assert_eq!(evaluate_synergy_strength(&["Deadly", "Quickdraw"]), 5.0);
        // deadly_quickdraw (5), taunt_deadly (3), killer_deadly (5)
        let mean = evaluate_synergy_strength(&["Deadly", "Quickdraw", "Taunt", "Killer"]);
        assert!((mean - 13.0 / 3.0).abs() < 1e-9);
        assert_eq!(evaluate_synergy_strength(&["Deadly"]), 0.0);
    }

    #[test]
    fn compatible_mechanics_are_unique() {
        assert_eq!(compatible_mechanics("Deadly"), vec!["Quickdraw", "Taunt", "Killer"]);
        assert_eq!(
            compatible_mechanics("cost reduction"),
            vec!["card selection", "protection spells"]
        );
        assert_eq!(
            compatible_mechanics("warcry"),
            vec!["unit protection", "weapon recursion"]
        );
    }
}

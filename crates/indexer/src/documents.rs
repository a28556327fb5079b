//! Embedding documents and metadata for cards and knowledge entries.

use eternal_cards::Card;
use eternal_knowledge::{
    all_skills, MechanicalPackage, Skill, SkillPair, Synergy, DETAILED_SYNERGIES,
    MECHANICAL_PACKAGES, SKILL_SYNERGIES,
};
use eternal_vector_store::Metadata;
use serde_json::Value;
use sha2::{Digest, Sha256};

const TRIGGER_WORDS: &[&str] = &["when", "whenever", "at the", "if", "after", "before"];

const EFFECT_WORDS: &[&str] = &[
    "draw", "deal", "gain", "create", "destroy", "kill", "return", "reduce", "increase", "give",
    "get", "play",
];

const IMPORTANT_TERMS: &[&str] = &[
    "market", "void", "spell", "unit", "weapon", "relic", "power", "influence", "exhaust", "ready",
    "attack", "block",
];

/// A document ready to be embedded and stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
}

fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn short_id(prefix: &str, key: &str) -> String {
    let hex = sha256_hex(key);
    format!("{prefix}_{}", &hex[..8])
}

/// Stable id for a card, derived from its name only.
#[must_use]
pub fn card_id(name: &str) -> String {
    sha256_hex(name)
}

fn words_in<'a>(text: &str, words: &[&'a str]) -> Vec<&'a str> {
    let lower = text.to_lowercase();
    words
        .iter()
        .copied()
        .filter(|word| lower.contains(word))
        .collect()
}

#[must_use]
pub fn extract_triggers(text: &str) -> Vec<&'static str> {
    words_in(text, TRIGGER_WORDS)
}

#[must_use]
pub fn extract_effects(text: &str) -> Vec<&'static str> {
    words_in(text, EFFECT_WORDS)
}

/// Skill names mentioned in `text`, then the generic game terms it uses.
#[must_use]
pub fn extract_keywords(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    let mut keywords: Vec<&'static str> = all_skills()
        .map(|skill| skill.name)
        .filter(|name| lower.contains(&name.to_lowercase()))
        .collect();
    keywords.extend(words_in(text, IMPORTANT_TERMS));
    keywords
}

fn metadata(entries: Vec<(&str, Value)>) -> Metadata {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

#[must_use]
pub fn card_document(card: &Card) -> Document {
    let influence = card.influence.replace('{', "").replace('}', " influence ");
    let stats = match (card.is_unit(), card.attack, card.health) {
        (true, Some(attack), Some(health)) => format!("{attack}/{health}"),
        _ => String::new(),
    };
    let text = format!(
        "{} {} {} cost {}\nCard Text: {}\nTriggers: {}\nEffects: {}\nKeywords: {}\nStats: {}\nRarity: {}",
        card.name,
        card.card_type,
        card.cost,
        influence,
        card.card_text,
        extract_triggers(&card.card_text).join(" "),
        extract_effects(&card.card_text).join(" "),
        extract_keywords(&card.card_text).join(" "),
        stats,
        card.rarity,
    );

    let stat = |value: Option<u32>| value.map_or(Value::from(-1), Value::from);
    Document {
        id: card_id(&card.name),
        text: text.trim().to_string(),
        metadata: metadata(vec![
            ("name", Value::from(card.name.as_str())),
            ("cost", Value::from(card.cost)),
            ("influence", Value::from(card.influence.as_str())),
            ("type", Value::from(card.card_type.as_str())),
            ("rarity", Value::from(card.rarity.as_str())),
            ("set_number", Value::from(card.set_number.as_str())),
            (
                "eternal_id",
                Value::from(card.eternal_id.as_deref().unwrap_or_default()),
            ),
            ("attack", stat(card.attack)),
            ("health", stat(card.health)),
            ("is_unit", Value::from(card.is_unit())),
            ("is_power", Value::from(card.is_power())),
            ("is_spell", Value::from(card.is_spell())),
            ("can_access_market", Value::from(card.can_access_market())),
        ]),
    }
}

#[must_use]
pub fn skill_document(skill: &Skill) -> Document {
    let text = format!(
        "{} Skill\nDescription: {}\nSynergies: {}\nCounters: {}\nArchetypes: {}\nStrategic Role: {}\n{}",
        skill.name,
        skill.description,
        skill.synergies.join(", "),
        skill.counters.join(", "),
        skill.archetypes.join(", "),
        skill.deck_role.join(", "),
        skill.embed_text,
    );
    Document {
        id: short_id("skill", skill.name),
        text: text.trim().to_string(),
        metadata: metadata(vec![
            ("type", Value::from("skill")),
            ("name", Value::from(skill.name)),
            ("power_level", Value::from(skill.power_level.value())),
            ("complexity", Value::from(skill.complexity.value())),
            ("archetypes", Value::from(skill.archetypes.join(","))),
        ]),
    }
}

#[must_use]
pub fn skill_pair_document(pair: &SkillPair) -> Document {
    let (first, second) = pair.skills;
    let text = format!(
        "{first} + {second} Skill Synergy\nSkills: {first}, {second}\nHow it works: {}\nStrength: {}/5\nExamples: {}",
        pair.description,
        pair.strength,
        pair.examples.join(", "),
    );
    Document {
        id: short_id("skillsyn", &format!("{first}_{second}")),
        text,
        metadata: metadata(vec![
            ("type", Value::from("skill_synergy")),
            ("name", Value::from(format!("{first}_{second}"))),
            ("strength", Value::from(pair.strength)),
            ("skills", Value::from(format!("{first},{second}"))),
        ]),
    }
}

#[must_use]
pub fn synergy_document(synergy: &Synergy) -> Document {
    let text = format!(
        "{} Synergy\nSkills: {}\nHow it works: {}\nRequirements: {}\nStrategic value: {}\nLimitations: {}\nStrength: {}/5",
        synergy.name,
        synergy.skills.join(", "),
        synergy.mechanics,
        synergy.requirements,
        synergy.strategic_value,
        synergy.limitations,
        synergy.strength,
    );
    Document {
        id: short_id("synergy", synergy.name),
        text,
        metadata: metadata(vec![
            ("type", Value::from("synergy")),
            ("name", Value::from(synergy.name)),
            ("strength", Value::from(synergy.strength)),
            ("skills", Value::from(synergy.skills.join(","))),
        ]),
    }
}

#[must_use]
pub fn package_document(package: &MechanicalPackage) -> Document {
    let text = format!(
        "{} Package\nCore mechanics: {}\nSupport mechanics: {}\nDescription: {}\nWin condition: {}\nWeaknesses: {}",
        package.name,
        package.core_mechanics.join(", "),
        package.support_mechanics.join(", "),
        package.description,
        package.win_condition,
        package.weaknesses.join(", "),
    );
    Document {
        id: short_id("package", package.name),
        text,
        metadata: metadata(vec![
            ("type", Value::from("package")),
            ("name", Value::from(package.name)),
            ("core_mechanics", Value::from(package.core_mechanics.join(","))),
        ]),
    }
}

/// Every knowledge-base entry: skills, skill pairs, detailed synergies, packages.
#[must_use]
pub fn mechanics_documents() -> Vec<Document> {
    all_skills()
        .map(skill_document)
        .chain(SKILL_SYNERGIES.iter().map(skill_pair_document))
        .chain(DETAILED_SYNERGIES.iter().map(synergy_document))
        .chain(MECHANICAL_PACKAGES.iter().map(package_document))
        .collect()
}

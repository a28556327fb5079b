//! # Eternal Knowledge
//!
//! Hand-authored reference data about game mechanics: every keyword skill,
//! known skill pairs, detailed synergies, mechanical packages and
//! anti-synergies. The tables are embedded into the mechanics collection
//! and consulted directly by the strategy scout.
//!
//! ```
//! use eternal_knowledge::{package_for_strategy, synergistic_skills};
//!
//! let best = synergistic_skills("Deadly");
//! assert_eq!(best[0].0, "Quickdraw");
//!
//! let package = package_for_strategy("fast aggro burn").unwrap();
//! assert_eq!(package.name, "aggressive_burn");
//! ```

mod skills;
mod synergies;

pub use skills::{
    all_skills, competitive_skills, skill, skill_counters, skills_by_archetype,
    skills_by_power_level, skills_for_role, skills_in_category, synergistic_skills, Complexity,
    PowerLevel, Skill, SkillKind, SkillPair, BATTLE_SKILLS, OTHER_SKILLS, SKILL_CATEGORIES,
    SKILL_SYNERGIES,
};
pub use synergies::{
    check_anti_synergies, compatible_mechanics, evaluate_synergy_strength, package,
    package_for_strategy, synergies_for_skills, synergy, AntiSynergy, AntiSynergyConflict,
    MechanicalPackage, Severity, Synergy, TempoProfile, ANTI_SYNERGIES, DETAILED_SYNERGIES,
    MECHANICAL_PACKAGES, SYNERGY_CATEGORIES, TEMPO_CONSIDERATIONS,
};

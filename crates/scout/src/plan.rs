use crate::analysis::{Archetype, StrategyAnalysis};
use eternal_cards::Faction;
use eternal_knowledge::{package_for_strategy, skills_by_archetype};
use eternal_search::SearchFilters;
use serde::Serialize;
use std::collections::HashSet;

const ARCHETYPE_SKILLS: usize = 5;
const MECHANIC_QUERIES: usize = 3;

/// One search pass and the reason it is run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub query: String,
    /// `original_input`, `archetype_faction`, `mechanic_<name>`, `tribal_focus`,
    /// `win_condition` or `<archetype>_core`.
    pub purpose: String,
}

impl SearchQuery {
    fn new(query: impl Into<String>, purpose: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            purpose: purpose.into(),
        }
    }
}

/// Adds archetype skills and the matching mechanical package to the
/// key mechanics.
pub fn enrich_with_knowledge(analysis: &mut StrategyAnalysis) {
    let archetype = analysis.archetype.as_str();
    for skill in skills_by_archetype(archetype)
        .into_iter()
        .take(ARCHETYPE_SKILLS)
    {
        analysis.add_mechanic(skill.to_lowercase());
    }
    if let Some(package) = package_for_strategy(archetype) {
        for mechanic in package.core_mechanics {
            analysis.add_mechanic(*mechanic);
        }
    }
}

fn core_query(archetype: Archetype) -> Option<&'static str> {
    match archetype {
        Archetype::Aggro => Some("charge haste aggressive one drop"),
        Archetype::Control => Some("board wipe removal draw"),
        Archetype::Combo => Some("combo piece engine"),
        Archetype::Midrange => None,
    }
}

/// Expands an analysis into search passes. Identical query strings are run
/// once, under the purpose of their first occurrence.
#[must_use]
pub fn search_queries(analysis: &StrategyAnalysis, input: &str) -> Vec<SearchQuery> {
    let mut queries = vec![SearchQuery::new(input, "original_input")];

    if let Some(primary) = analysis.primary_faction {
        let mut words = vec![analysis.archetype.as_str(), primary.name()];
        words.extend(analysis.secondary_factions.iter().map(|f| f.name()));
        queries.push(SearchQuery::new(words.join(" "), "archetype_faction"));
    }

    for mechanic in analysis.key_mechanics.iter().take(MECHANIC_QUERIES) {
        let query = match analysis.primary_faction {
            Some(primary) => format!("{mechanic} {}", primary.name()),
            None => mechanic.clone(),
        };
        queries.push(SearchQuery::new(query, format!("mechanic_{mechanic}")));
    }

    if let Some(tribe) = &analysis.tribal_focus {
        queries.push(SearchQuery::new(
            format!("{tribe} tribal synergy"),
            "tribal_focus",
        ));
    }

    for win_condition in &analysis.preferred_win_conditions {
        queries.push(SearchQuery::new(win_condition.as_str(), "win_condition"));
    }

    if let Some(core) = core_query(analysis.archetype) {
        queries.push(SearchQuery::new(
            core,
            format!("{}_core", analysis.archetype),
        ));
    }

    let mut seen = HashSet::new();
    queries.retain(|q| seen.insert(q.query.clone()));
    log::info!("Created {} unique queries", queries.len());
    queries
}

/// Filters for every pass: the caller's filters plus what the analysis
/// implies. `analysis` picks up the caller's must-include names and loses
/// any must-include the caller also excluded.
#[must_use]
pub fn base_filters(
    analysis: &mut StrategyAnalysis,
    additional: Option<&SearchFilters>,
) -> SearchFilters {
    let mut filters = additional.cloned().unwrap_or_default();

    if filters.allowed_factions.is_empty() && analysis.primary_faction.is_some() {
        filters.allowed_factions = analysis
            .factions()
            .into_iter()
            .map(|f| Faction::name(f).to_string())
            .collect();
    }
    if !analysis.market_preference {
        filters.include_market = false;
    }
    if let Some(tribe) = &analysis.tribal_focus {
        if filters.unit_types.is_empty() {
            filters.unit_types = vec![tribe.clone()];
        }
    }
    if filters.max_cost.is_none() {
        filters.max_cost = match analysis.archetype {
            Archetype::Aggro => Some(5),
            Archetype::Control => Some(12),
            Archetype::Midrange | Archetype::Combo => None,
        };
    }
    for name in &filters.must_include {
        analysis.add_must_include(name.as_str());
    }
    if !filters.must_exclude.is_empty() {
        let excluded = filters.excluded_names();
        analysis
            .must_include_cards
            .retain(|name| !excluded.contains(&name.to_lowercase()));
    }
    filters
}

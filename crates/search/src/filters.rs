use eternal_cards::{factions_in, Card, CardType, Faction, GameFormat, Rarity};
use eternal_vector_store::WhereFilter;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Deterministic constraints applied to every search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Faction names; empty means any faction.
    pub allowed_factions: Vec<String>,
    /// Only enforced together with `allowed_factions`. `Some(0)` means no limit.
    pub max_factions_per_card: Option<usize>,
    pub format: GameFormat,
    pub max_rarity: Option<Rarity>,
    /// Context for callers, never used to filter.
    pub archetype: Option<String>,
    pub min_cost: Option<u32>,
    pub max_cost: Option<u32>,
    pub card_types: Vec<String>,
    pub unit_types: Vec<String>,
    pub must_include: Vec<String>,
    pub must_exclude: Vec<String>,
    pub include_market: bool,
    pub market_access_only: bool,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            allowed_factions: Vec::new(),
            max_factions_per_card: None,
            format: GameFormat::Throne,
            max_rarity: None,
            archetype: None,
            min_cost: None,
            max_cost: None,
            card_types: Vec::new(),
            unit_types: Vec::new(),
            must_include: Vec::new(),
            must_exclude: Vec::new(),
            include_market: true,
            market_access_only: false,
        }
    }
}

fn canonical_type(raw: &str) -> String {
    CardType::parse(raw).map_or_else(|| raw.trim().to_string(), |t| t.as_str().to_string())
}

impl SearchFilters {
    /// Allowed factions that name a real faction; unknown names are ignored.
    #[must_use]
    pub fn allowed_faction_set(&self) -> BTreeSet<Faction> {
        self.allowed_factions
            .iter()
            .filter_map(|name| Faction::parse(name))
            .collect()
    }

    /// Must-exclude names, trimmed and lowercased.
    #[must_use]
    pub fn excluded_names(&self) -> HashSet<String> {
        self.must_exclude
            .iter()
            .map(|name| name.trim().to_lowercase())
            .collect()
    }

    /// Metadata clause pushed down to the vector store.
    #[must_use]
    pub fn where_clause(&self) -> Option<WhereFilter> {
        let mut clauses = Vec::new();
        if !self.card_types.is_empty() {
            clauses.push(WhereFilter::is_in(
                "type",
                self.card_types.iter().map(|t| canonical_type(t)),
            ));
        }
        if let Some(max) = self.max_rarity {
            clauses.push(WhereFilter::is_in(
                "rarity",
                max.up_to().iter().map(|r| r.as_str()),
            ));
        }
        if self.market_access_only {
            clauses.push(WhereFilter::eq("can_access_market", true));
        } else if !self.include_market {
            clauses.push(WhereFilter::eq("can_access_market", false));
        }
        WhereFilter::all(clauses)
    }

    /// Short labels for the filters that are active, for reports.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if !self.allowed_factions.is_empty() {
            parts.push(format!("factions: {}", self.allowed_factions.join(", ")));
        }
        if let Some(max) = self.max_factions_per_card.filter(|m| *m > 0) {
            parts.push(format!("max factions per card: {max}"));
        }
        if self.format != GameFormat::Throne {
            parts.push(format!("format: {}", self.format));
        }
        if let Some(rarity) = self.max_rarity {
            parts.push(format!("max rarity: {rarity}"));
        }
        match (self.min_cost, self.max_cost) {
            (Some(min), Some(max)) => parts.push(format!("cost: {min}-{max}")),
            (Some(min), None) => parts.push(format!("cost: {min}+")),
            (None, Some(max)) => parts.push(format!("cost: <= {max}")),
            (None, None) => {}
        }
        if !self.card_types.is_empty() {
            parts.push(format!("types: {}", self.card_types.join(", ")));
        }
        if !self.unit_types.is_empty() {
            parts.push(format!("unit types: {}", self.unit_types.join(", ")));
        }
        if self.market_access_only {
            parts.push("market access only".to_string());
        } else if !self.include_market {
            parts.push("no market access cards".to_string());
        }
        parts
    }
}

/// Runs the post-filter chain: cost, type, rarity, market, unit type,
/// factions, format. Input order is preserved.
#[must_use]
pub fn apply_post_filters(
    cards: Vec<Card>,
    filters: &SearchFilters,
    expedition_sets: &[String],
) -> Vec<Card> {
    let card_types: Vec<String> = filters
        .card_types
        .iter()
        .map(|t| canonical_type(t).to_lowercase())
        .collect();
    let unit_types: Vec<String> = filters
        .unit_types
        .iter()
        .map(|t| t.trim().to_lowercase())
        .collect();
    let allowed = filters.allowed_faction_set();
    let max_factions = filters.max_factions_per_card.filter(|m| *m > 0);
    let expedition_only =
        filters.format == GameFormat::Expedition && !expedition_sets.is_empty();

    cards
        .into_iter()
        .filter(|card| filters.min_cost.map_or(true, |min| card.cost >= min))
        .filter(|card| filters.max_cost.map_or(true, |max| card.cost <= max))
        .filter(|card| {
            card_types.is_empty() || card_types.contains(&card.card_type.to_lowercase())
        })
        .filter(|card| {
            filters.max_rarity.map_or(true, |max| {
                Rarity::parse(&card.rarity).is_some_and(|rarity| rarity <= max)
            })
        })
        .filter(|card| {
            if filters.market_access_only {
                card.can_access_market()
            } else {
                filters.include_market || !card.can_access_market()
            }
        })
        .filter(|card| {
            unit_types.is_empty()
                || card
                    .unit_types
                    .iter()
                    .any(|t| unit_types.contains(&t.to_lowercase()))
        })
        .filter(|card| {
            if filters.allowed_factions.is_empty() {
                return true;
            }
            let factions = factions_in(&card.influence);
            factions.is_subset(&allowed) && max_factions.map_or(true, |max| factions.len() <= max)
        })
        .filter(|card| !expedition_only || expedition_sets.contains(&card.set_number))
        .collect()
}

use crate::error::Result;
use crate::filters::{apply_post_filters, SearchFilters};
use crate::semantic::SemanticCardIndex;
use crate::suggest::suggest;
use eternal_cards::Card;
use eternal_sheets::SheetsClient;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

pub const DEFAULT_RESULTS: usize = 200;
const MAX_SEMANTIC_FETCH: usize = 1000;
const SUGGESTIONS_PER_NAME: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// No query: every card that passes the filters.
    Browse,
    /// Vector similarity.
    Semantic,
    /// Case-insensitive substring over name and text.
    Simple,
}

impl SearchMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SearchMode::Browse => "browse",
            SearchMode::Semantic => "semantic",
            SearchMode::Simple => "simple",
        }
    }
}

/// A must-include name the catalog does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedName {
    pub name: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub cards: Vec<Card>,
    /// Matches before truncation to `n_results`.
    pub total_found: usize,
    pub query: String,
    pub query_interpretation: String,
    pub mode: SearchMode,
    pub filters_applied: SearchFilters,
    /// Seconds.
    pub search_time: f64,
    pub used_vector_store: bool,
    pub unresolved: Vec<UnresolvedName>,
}

/// Hybrid card search: vector or substring lookup, then deterministic filters.
pub struct SearchEngine {
    cards: Arc<Vec<Card>>,
    by_name: HashMap<String, usize>,
    semantic: Option<Box<dyn SemanticCardIndex>>,
    expedition_sets: Vec<String>,
}

impl SearchEngine {
    pub fn new(cards: Arc<Vec<Card>>) -> Self {
        let by_name = cards
            .iter()
            .enumerate()
            .map(|(i, card)| (card.name.to_lowercase(), i))
            .collect();
        log::info!("Card cache loaded: {} cards", cards.len());
        Self {
            cards,
            by_name,
            semantic: None,
            expedition_sets: Vec::new(),
        }
    }

    pub async fn from_catalog(catalog: &SheetsClient) -> Result<Self> {
        Ok(Self::new(catalog.all_cards().await?))
    }

    #[must_use]
    pub fn with_semantic_index(mut self, index: impl SemanticCardIndex + 'static) -> Self {
        self.semantic = Some(Box::new(index));
        self
    }

    /// Set numbers legal in Expedition. Empty disables the format filter.
    #[must_use]
    pub fn with_expedition_sets(mut self, sets: Vec<String>) -> Self {
        self.expedition_sets = sets;
        self
    }

    #[must_use]
    pub fn has_semantic_index(&self) -> bool {
        self.semantic.is_some()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Case-insensitive exact name lookup.
    #[must_use]
    pub fn card_by_name(&self, name: &str) -> Option<&Card> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|i| &self.cards[*i])
    }

    /// Known cards among `names`, in the given order. Unknown names are skipped.
    #[must_use]
    pub fn cards_by_names<S: AsRef<str>>(&self, names: &[S]) -> Vec<&Card> {
        names
            .iter()
            .filter_map(|name| self.card_by_name(name.as_ref()))
            .collect()
    }

    /// Fuzzy suggestions from the catalog's card names.
    #[must_use]
    pub fn suggest_names(&self, name: &str, limit: usize) -> Vec<String> {
        suggest(name, self.cards.iter().map(|c| c.name.as_str()), limit)
    }

    pub async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
        n_results: usize,
    ) -> SearchResult {
        let started = Instant::now();
        let query = query.trim();

        let (mut results, mode) = if query.is_empty() && filters.must_include.is_empty() {
            (self.browse(filters), SearchMode::Browse)
        } else if !query.is_empty() && self.semantic.is_some() {
            match self.semantic_search(query, filters, n_results).await {
                Ok(cards) => (cards, SearchMode::Semantic),
                Err(err) => {
                    log::warn!("Semantic search failed, falling back to simple search: {err}");
                    (self.simple_search(query, filters), SearchMode::Simple)
                }
            }
        } else {
            (self.simple_search(query, filters), SearchMode::Simple)
        };

        let mut unresolved = Vec::new();
        if !filters.must_include.is_empty() {
            unresolved = self.ensure_must_include(&mut results, &filters.must_include);
        }
        if !filters.must_exclude.is_empty() {
            let excluded = filters.excluded_names();
            results.retain(|card| !excluded.contains(&card.name.to_lowercase()));
        }

        let total_found = results.len();
        results.truncate(n_results);
        let interpretation = match mode {
            SearchMode::Browse => "Browsing with filters".to_string(),
            SearchMode::Semantic => format!("Semantic search: '{query}'"),
            SearchMode::Simple => format!("Simple search: '{query}'"),
        };
        log::debug!("{interpretation}: {total_found} cards");

        SearchResult {
            cards: results,
            total_found,
            query: query.to_string(),
            query_interpretation: interpretation,
            mode,
            filters_applied: filters.clone(),
            search_time: started.elapsed().as_secs_f64(),
            used_vector_store: mode == SearchMode::Semantic,
            unresolved,
        }
    }

    fn browse(&self, filters: &SearchFilters) -> Vec<Card> {
        apply_post_filters(self.cards.to_vec(), filters, &self.expedition_sets)
    }

    fn simple_search(&self, query: &str, filters: &SearchFilters) -> Vec<Card> {
        let needle = query.to_lowercase();
        let matches = self
            .cards
            .iter()
            .filter(|card| {
                card.name.to_lowercase().contains(&needle)
                    || card.card_text.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        apply_post_filters(matches, filters, &self.expedition_sets)
    }

    async fn semantic_search(
        &self,
        query: &str,
        filters: &SearchFilters,
        n_results: usize,
    ) -> Result<Vec<Card>> {
        let Some(index) = &self.semantic else {
            return Ok(self.simple_search(query, filters));
        };
        let multiplier = if filters.allowed_factions.is_empty() { 2 } else { 3 };
        let fetch = n_results.saturating_mul(multiplier).min(MAX_SEMANTIC_FETCH);
        let where_clause = filters.where_clause();
        if let Some(clause) = &where_clause {
            log::debug!("Semantic where clause: {}", clause.to_chroma_json());
        }

        let names = index.query(query, fetch, where_clause.as_ref()).await?;
        let cards = names
            .iter()
            .filter_map(|name| self.card_by_name(name))
            .cloned()
            .collect();
        Ok(apply_post_filters(cards, filters, &self.expedition_sets))
    }

    /// Prepends missing must-include cards in the requested order and
    /// returns the names the catalog does not know.
    fn ensure_must_include(
        &self,
        results: &mut Vec<Card>,
        must_include: &[String],
    ) -> Vec<UnresolvedName> {
        let mut present: HashSet<String> =
            results.iter().map(|c| c.name.to_lowercase()).collect();
        let mut missing = Vec::new();
        let mut unresolved = Vec::new();
        for name in must_include {
            match self.card_by_name(name) {
                Some(card) => {
                    if present.insert(card.name.to_lowercase()) {
                        missing.push(card.clone());
                    }
                }
                None => {
                    log::warn!("Must-include card not found: {name}");
                    unresolved.push(UnresolvedName {
                        name: name.clone(),
                        suggestions: self.suggest_names(name, SUGGESTIONS_PER_NAME),
                    });
                }
            }
        }
        if !missing.is_empty() {
            missing.append(results);
            *results = missing;
        }
        unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use async_trait::async_trait;
    use eternal_vector_store::WhereFilter;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn pool() -> Vec<Card> {
        vec![
            Card::new("Torch", "Spell")
                .with_cost(1, "{F}")
                .with_text("Deal 2 damage to a unit."),
            Card::new("Permafrost", "Spell")
                .with_cost(2, "{J}")
                .with_text("Stun a unit."),
            Card::new("Harsh Rule", "Spell")
                .with_cost(5, "{J}{J}{S}")
                .with_rarity("Rare")
                .with_text("Deal 3 damage to each unit."),
            Card::new("Oni Ronin", "Unit")
                .with_cost(1, "{F}")
                .with_stats(2, 1)
                .with_text("Charge"),
            Card::new("Fire Sigil", "Power"),
        ]
    }

    fn engine() -> SearchEngine {
        SearchEngine::new(Arc::new(pool()))
    }

    fn names(result: &SearchResult) -> Vec<&str> {
        result.cards.iter().map(|c| c.name.as_str()).collect()
    }

    /// Returns a fixed name list and records the last request.
    struct FixedIndex {
        names: Vec<&'static str>,
        fail: bool,
        last: Mutex<Option<(usize, Option<WhereFilter>)>>,
    }

    impl FixedIndex {
        fn new(names: Vec<&'static str>) -> Self {
            Self {
                names,
                fail: false,
                last: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl SemanticCardIndex for Arc<FixedIndex> {
        async fn query(
            &self,
            _query: &str,
            n_results: usize,
            filter: Option<&WhereFilter>,
        ) -> Result<Vec<String>> {
            *self.last.lock().unwrap() = Some((n_results, filter.cloned()));
            if self.fail {
                return Err(SearchError::IndexUnavailable("offline".to_string()));
            }
            Ok(self.names.iter().map(|n| (*n).to_string()).collect())
        }
    }

    #[tokio::test]
    async fn browse_without_query() {
        let result = engine()
            .search("", &SearchFilters::default(), DEFAULT_RESULTS)
            .await;
        assert_eq!(result.mode, SearchMode::Browse);
        assert_eq!(result.query_interpretation, "Browsing with filters");
        assert_eq!(result.total_found, 5);
        assert!(!result.used_vector_store);
    }

    #[tokio::test]
    async fn simple_search_matches_name_or_text() {
        let result = engine()
            .search("DAMAGE", &SearchFilters::default(), 10)
            .await;
        assert_eq!(result.mode, SearchMode::Simple);
        assert_eq!(result.query_interpretation, "Simple search: 'DAMAGE'");
        assert_eq!(names(&result), vec!["Torch", "Harsh Rule"]);
    }

    #[tokio::test]
    async fn semantic_maps_names_and_filters() {
        let index = Arc::new(FixedIndex::new(vec!["harsh rule", "Unknown Card", "Torch"]));
        let engine = engine().with_semantic_index(Arc::clone(&index));
        let filters = SearchFilters {
            allowed_factions: vec!["Fire".into()],
            card_types: vec!["Spell".into()],
            ..SearchFilters::default()
        };
        let result = engine.search("removal", &filters, 500).await;
        assert_eq!(result.mode, SearchMode::Semantic);
        assert!(result.used_vector_store);
        assert_eq!(result.query_interpretation, "Semantic search: 'removal'");
        assert_eq!(names(&result), vec!["Torch"]);

        let (fetch, clause) = index.last.lock().unwrap().clone().unwrap();
        assert_eq!(fetch, 1000);
        assert_eq!(clause, Some(WhereFilter::is_in("type", ["Spell"])));

        engine.search("removal", &SearchFilters::default(), 10).await;
        assert_eq!(index.last.lock().unwrap().as_ref().unwrap().0, 20);
    }

    #[tokio::test]
    async fn semantic_failure_falls_back_to_simple() {
        let index = Arc::new(FixedIndex {
            fail: true,
            ..FixedIndex::new(Vec::new())
        });
        let engine = engine().with_semantic_index(index);
        let result = engine.search("stun", &SearchFilters::default(), 10).await;
        assert_eq!(result.mode, SearchMode::Simple);
        assert!(!result.used_vector_store);
        assert_eq!(names(&result), vec!["Permafrost"]);
    }

    #[tokio::test]
    async fn must_include_prepends_in_order_and_exclusion_wins() {
        let filters = SearchFilters {
            must_include: vec![
                "permafrost".into(),
                "Oni Ronin".into(),
                "Torch".into(),
                "Harsh Rule".into(),
                "Torhc Typo".into(),
            ],
            must_exclude: vec!["HARSH RULE".into()],
            ..SearchFilters::default()
        };
        let result = engine().search("torch", &filters, 10).await;
        assert_eq!(result.mode, SearchMode::Simple);
        assert_eq!(names(&result), vec!["Permafrost", "Oni Ronin", "Torch"]);
        assert_eq!(result.unresolved.len(), 1);
        assert_eq!(result.unresolved[0].name, "Torhc Typo");
    }

    #[tokio::test]
    async fn must_include_alone_is_not_browse() {
        let filters = SearchFilters {
            must_include: vec!["Torch".into()],
            max_cost: Some(0),
            ..SearchFilters::default()
        };
        let result = engine().search("", &filters, 10).await;
        assert_eq!(result.mode, SearchMode::Simple);
        assert_eq!(names(&result), vec!["Torch", "Fire Sigil"]);
    }

    #[tokio::test]
    async fn total_found_counts_before_truncation() {
        let result = engine().search("", &SearchFilters::default(), 2).await;
        assert_eq!(result.total_found, 5);
        assert_eq!(result.cards.len(), 2);
    }

    #[test]
    fn lookups_ignore_case() {
        let engine = engine();
        assert_eq!(engine.card_by_name(" torch ").unwrap().name, "Torch");
        let found = engine.cards_by_names(&["oni ronin", "nope", "FIRE SIGIL"]);
        let found: Vec<&str> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(found, vec!["Oni Ronin", "Fire Sigil"]);
        assert_eq!(
            engine.suggest_names("permfrost", 1),
            vec!["Permafrost".to_string()]
        );
    }
}

use crate::analysis::StrategyAnalysis;
use crate::error::{Result, ScoutError};
use crate::patterns::detect_patterns;
use crate::plan::{base_filters, enrich_with_knowledge, search_queries, SearchQuery};
use crate::pool::organize_pool;
use crate::refine::{PassThroughRefiner, StrategyRefiner};
use eternal_cards::Card;
use eternal_search::{SearchEngine, SearchFilters};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Results requested per pass; the pool is meant to be exhaustive.
pub const SCOUT_FETCH: usize = 1000;

/// Bounds on what a caller may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLimits {
    pub max_input_chars: usize,
    pub max_must_include: usize,
    pub max_must_exclude: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_input_chars: 500,
            max_must_include: 10,
            max_must_exclude: 20,
        }
    }
}

impl InputLimits {
    pub fn check(&self, input: &str, filters: Option<&SearchFilters>) -> Result<()> {
        if input.trim().is_empty() {
            return Err(ScoutError::EmptyInput);
        }
        let len = input.chars().count();
        if len > self.max_input_chars {
            return Err(ScoutError::InputTooLong {
                len,
                max: self.max_input_chars,
            });
        }
        if let Some(filters) = filters {
            if filters.must_include.len() > self.max_must_include {
                return Err(ScoutError::TooManyCards {
                    kind: "must-include",
                    count: filters.must_include.len(),
                    max: self.max_must_include,
                });
            }
            if filters.must_exclude.len() > self.max_must_exclude {
                return Err(ScoutError::TooManyCards {
                    kind: "must-exclude",
                    count: filters.must_exclude.len(),
                    max: self.max_must_exclude,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchMetadata {
    pub queries_executed: usize,
    pub queries: Vec<SearchQuery>,
    /// The caller's filters, before the analysis added its own.
    pub filters_applied: Option<SearchFilters>,
    pub user_input: String,
    pub unique_cards: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoutResult {
    pub strategy: StrategyAnalysis,
    pub card_pool: Vec<Card>,
    pub pool_size: usize,
    pub search_metadata: SearchMetadata,
    /// Seconds.
    pub execution_time: f64,
}

/// Turns a strategy description into an ordered card pool.
pub struct StrategyScout {
    engine: Arc<SearchEngine>,
    refiner: Box<dyn StrategyRefiner>,
    limits: InputLimits,
}

impl StrategyScout {
    pub fn new(engine: Arc<SearchEngine>) -> Self {
        Self {
            engine,
            refiner: Box::new(PassThroughRefiner),
            limits: InputLimits::default(),
        }
    }

    #[must_use]
    pub fn with_refiner(mut self, refiner: impl StrategyRefiner + 'static) -> Self {
        self.refiner = Box::new(refiner);
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: InputLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    /// Keyword detection followed by the refiner. A refiner failure is
    /// logged and the keyword analysis is used.
    pub async fn analyze(&self, input: &str) -> StrategyAnalysis {
        let initial = detect_patterns(input);
        match self.refiner.refine(input, initial.clone()).await {
            Ok(refined) => refined,
            Err(err) => {
                log::warn!("Strategy refinement failed: {err}. Using keyword analysis only");
                initial
            }
        }
    }

    pub async fn analyze_and_scout(
        &self,
        input: &str,
        filters: Option<SearchFilters>,
    ) -> Result<ScoutResult> {
        self.limits.check(input, filters.as_ref())?;
        let started = Instant::now();
        let preview: String = input.chars().take(100).collect();
        log::info!("Scouting strategy: '{preview}'");

        let mut strategy = self.analyze(input).await;
        enrich_with_knowledge(&mut strategy);
        let queries = search_queries(&strategy, input);
        let base = base_filters(&mut strategy, filters.as_ref());
        let excluded = base.excluded_names();
        let found = self.execute(&queries, &base, &strategy, &excluded).await;
        let card_pool = organize_pool(found, &strategy, &excluded);

        let execution_time = started.elapsed().as_secs_f64();
        log::info!(
            "Scouting complete: {} cards in {execution_time:.2}s",
            card_pool.len()
        );
        let unique_cards = card_pool
            .iter()
            .map(|c| c.name.as_str())
            .collect::<HashSet<_>>()
            .len();
        Ok(ScoutResult {
            pool_size: card_pool.len(),
            search_metadata: SearchMetadata {
                queries_executed: queries.len(),
                queries,
                filters_applied: filters,
                user_input: input.to_string(),
                unique_cards,
            },
            strategy,
            card_pool,
            execution_time,
        })
    }

    async fn execute(
        &self,
        queries: &[SearchQuery],
        filters: &SearchFilters,
        strategy: &StrategyAnalysis,
        excluded: &HashSet<String>,
    ) -> Vec<Card> {
        let mut seen = HashSet::new();
        let mut cards = Vec::new();
        for query in queries {
            log::debug!("Running query [{}]: {}", query.purpose, query.query);
            let result = self.engine.search(&query.query, filters, SCOUT_FETCH).await;
            let hits = result.cards.len();
            for card in result.cards {
                if seen.insert(card.name.clone()) {
                    cards.push(card);
                }
            }
            log::debug!("  {hits} cards, {} unique so far", cards.len());
        }

        for card in self.engine.cards_by_names(&strategy.must_include_cards) {
            if excluded.contains(&card.name.to_lowercase()) {
                log::debug!("Skipping excluded must-include card {}", card.name);
                continue;
            }
            if seen.insert(card.name.clone()) {
                cards.insert(0, card.clone());
            }
        }
        log::info!("Unique cards found: {}", cards.len());
        cards
    }
}

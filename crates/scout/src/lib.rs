//! # Eternal Scout
//!
//! Turns a free-text deck idea into an ordered pool of candidate cards.
//!
//! ## Pipeline
//!
//! ```text
//! "fast fire burn with oni"
//!        │
//!        ▼
//! detect_patterns ──► StrategyRefiner ──► enrich_with_knowledge
//!                                                │
//!        ┌───────────────────────────────────────┘
//!        ▼
//! search_queries ──► SearchEngine (one pass per query, base filters)
//!        │
//!        ▼
//! dedupe by name ──► organize_pool (must-include, core, synergy, support)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use eternal_scout::StrategyScout;
//! use eternal_search::SearchEngine;
//! use eternal_sheets::{JsonFileSource, SheetsClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let catalog = SheetsClient::new(JsonFileSource::new("cards.json"));
//!     let engine = SearchEngine::from_catalog(&catalog).await?;
//!     let scout = StrategyScout::new(Arc::new(engine));
//!
//!     let result = scout.analyze_and_scout("aggressive fire burn", None).await?;
//!     println!("{}: {} cards", result.strategy.summary(), result.pool_size);
//!     Ok(())
//! }
//! ```

mod analysis;
mod error;
mod patterns;
mod plan;
mod pool;
mod refine;
mod scout;

pub use analysis::{Archetype, Speed, StrategyAnalysis};
pub use error::{Result, ScoutError};
pub use patterns::{
    detect_patterns, ARCHETYPE_PATTERNS, FACTION_PATTERNS, MECHANIC_PATTERNS, TRIBAL_KEYWORDS,
};
pub use plan::{base_filters, enrich_with_knowledge, search_queries, SearchQuery};
pub use pool::{organize_pool, relevance, tier, PoolTier};
pub use refine::{CardMentionRefiner, PassThroughRefiner, StrategyRefiner};
pub use scout::{InputLimits, ScoutResult, SearchMetadata, StrategyScout, SCOUT_FETCH};

//! # Eternal Indexer
//!
//! Builds the knowledge base behind semantic card search.
//!
//! ## Pipeline
//!
//! ```text
//! Card catalog (sheet / JSON export)
//!     │
//!     ├──> Document builders
//!     │      └─> text + metadata per card, skill, synergy, package
//!     │
//!     ├──> EmbeddingModel (batched, retried)
//!     │
//!     └──> VectorDatabase
//!            ├─> eternal_cards
//!            ├─> eternal_mechanics
//!            └─> discovered_synergies
//! ```
//!
//! Progress is checkpointed after every card batch, so an interrupted run
//! resumes where it stopped. An existing database is backed up before a
//! rebuild.
//!
//! ## Example
//!
//! ```no_run
//! use eternal_indexer::{KnowledgeBaseSetup, SetupConfig};
//! use eternal_sheets::{JsonFileSource, SheetsClient};
//! use eternal_vector_store::EmbeddingModel;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let catalog = SheetsClient::new(JsonFileSource::new("cards.json"));
//!     let config = SetupConfig::new("data").with_test_mode(true);
//!     let mut setup = KnowledgeBaseSetup::new(config, EmbeddingModel::new()?).await?;
//!     let report = setup.setup_all_collections(&catalog).await?;
//!
//!     println!("Indexed {} cards, {} mechanics", report.cards, report.mechanics);
//!     Ok(())
//! }
//! ```

mod checkpoint;
mod documents;
mod error;
mod retry;
mod setup;

pub use checkpoint::{Checkpoint, CheckpointManager};
pub use documents::{
    card_document, card_id, extract_effects, extract_keywords, extract_triggers,
    mechanics_documents, package_document, skill_document, skill_pair_document,
    synergy_document, Document,
};
pub use error::{IndexerError, Result};
pub use retry::RetryPolicy;
pub use setup::{
    backup_database, reset_database, CollectionStats, KnowledgeBaseSetup, ProgressSink,
    SetupConfig, SetupReport, SilentProgress, TestCase, TestHit, DEFAULT_BATCH_SIZE,
    TEST_MODE_CARD_LIMIT, TEST_QUERIES,
};

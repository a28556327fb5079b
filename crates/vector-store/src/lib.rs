//! # Eternal Vector Store
//!
//! Embedding and similarity search for card and mechanics documents.
//!
//! ## Features
//!
//! - **Local embeddings** via FastEmbed (feature `fastembed`), or deterministic
//!   stub vectors for tests and offline runs
//! - **Named collections** of documents with JSON metadata
//! - **Metadata filters** in the style of Chroma's `where` clauses
//! - **Atomic persistence**, one JSON file per collection
//!
//! ## Architecture
//!
//! ```text
//! documents + metadata
//!     │
//!     ├──> EmbeddingModel (fast | stub)
//!     │      └─> Vec<f32> [384/768]
//!     │
//!     ├──> Collection
//!     │      ├─> VectorIndex (cosine)
//!     │      └─> WhereFilter
//!     │
//!     └──> VectorDatabase
//!            └─> data/vectordb/<collection>.json
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use eternal_vector_store::{EmbeddingModel, Metadata, Record, VectorDatabase, WhereFilter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let model = EmbeddingModel::new()?;
//!     let mut db = VectorDatabase::open("data/vectordb").await?;
//!     let cards = db.get_or_create_collection("eternal_cards", Metadata::new(), model.dimension());
//!
//!     let mut metadata = Metadata::new();
//!     metadata.insert("type".into(), "Spell".into());
//!     cards.add(vec![Record {
//!         id: "torch".into(),
//!         document: "Torch Spell 1 cost. Deal 2 damage to a unit.".into(),
//!         metadata,
//!         embedding: model.embed("Torch deal 2 damage").await?,
//!     }])?;
//!
//!     let query = model.embed("cheap removal").await?;
//!     let spells = WhereFilter::eq("type", "Spell");
//!     for hit in cards.query(&query, 5, Some(&spells))? {
//!         println!("{} ({:.3})", hit.id, hit.distance);
//!     }
//!     db.persist("eternal_cards").await?;
//!     Ok(())
//! }
//! ```

mod collection;
mod database;
mod embeddings;
mod error;
mod filter;
mod index;
pub mod paths;

pub use collection::{Collection, Metadata, QueryHit, Record, COLLECTION_SCHEMA_VERSION};
pub use database::VectorDatabase;
pub use embeddings::{
    available_models, current_embedding_mode_id, current_model_id, EmbeddingMode, EmbeddingModel,
    DEFAULT_MODEL_ID, EMBEDDING_MODEL_ENV, EMBEDDING_MODE_ENV,
};
pub use error::{Result, VectorStoreError};
pub use filter::WhereFilter;
pub use index::VectorIndex;

use crate::error::{Result, SearchError};
use async_trait::async_trait;
use eternal_vector_store::paths::{vectordb_dir, CARDS_COLLECTION};
use eternal_vector_store::{EmbeddingModel, VectorDatabase, WhereFilter};
use std::path::Path;

/// Vector lookup of card names by meaning.
#[async_trait]
pub trait SemanticCardIndex: Send + Sync {
    /// Names of the cards nearest to `query`, closest first.
    async fn query(
        &self,
        query: &str,
        n_results: usize,
        filter: Option<&WhereFilter>,
    ) -> Result<Vec<String>>;
}

/// [`SemanticCardIndex`] over the persisted `eternal_cards` collection.
pub struct VectorCardIndex {
    db: VectorDatabase,
    model: EmbeddingModel,
}

impl VectorCardIndex {
    /// Opens the card collection under `data_dir`. Fails when setup has not
    /// been run or was run with a model of another dimension.
    pub async fn open(data_dir: &Path, model: EmbeddingModel) -> Result<Self> {
        let root = vectordb_dir(data_dir);
        if !VectorDatabase::exists(&root) {
            return Err(SearchError::IndexUnavailable(format!(
                "no vector database at {}",
                root.display()
            )));
        }
        let db = VectorDatabase::open(&root).await?;
        let cards = db.get_collection(CARDS_COLLECTION)?;
        if cards.dimension() != model.dimension() {
            return Err(SearchError::IndexUnavailable(format!(
                "{CARDS_COLLECTION} holds {}-dim vectors but model {} produces {}",
                cards.dimension(),
                model.model_id(),
                model.dimension()
            )));
        }
        log::info!("Vector store connected: {} cards", cards.count());
        Ok(Self { db, model })
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.db
            .get_collection(CARDS_COLLECTION)
            .map_or(0, |c| c.count())
    }
}

#[async_trait]
impl SemanticCardIndex for VectorCardIndex {
    async fn query(
        &self,
        query: &str,
        n_results: usize,
        filter: Option<&WhereFilter>,
    ) -> Result<Vec<String>> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let embedding = self.model.embed(query).await?;
        let hits = self
            .db
            .get_collection(CARDS_COLLECTION)?
            .query(&embedding, n_results, filter)?;
        Ok(hits
            .iter()
            .filter_map(|hit| hit.metadata_str("name").map(str::to_string))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eternal_vector_store::{Metadata, Record};
    use serde_json::Value;
    use tempfile::TempDir;

    async fn seeded(dir: &Path, model: &EmbeddingModel, names: &[(&str, &str)]) {
        let mut db = VectorDatabase::open(vectordb_dir(dir)).await.unwrap();
        let cards =
            db.get_or_create_collection(CARDS_COLLECTION, Metadata::new(), model.dimension());
        let mut records = Vec::new();
        for (name, card_type) in names {
            let mut metadata = Metadata::new();
            metadata.insert("name".to_string(), Value::from(*name));
            metadata.insert("type".to_string(), Value::from(*card_type));
            records.push(Record {
                id: (*name).to_string(),
                document: format!("{name} {card_type}"),
                metadata,
                embedding: model.embed(&format!("{name} {card_type}")).await.unwrap(),
            });
        }
        cards.add(records).unwrap();
        db.persist_all().await.unwrap();
    }

    #[tokio::test]
    async fn queries_the_card_collection() {
        let tmp = TempDir::new().unwrap();
        let model = EmbeddingModel::stub(16);
        seeded(
            tmp.path(),
            &model,
            &[("Torch", "Spell"), ("Oni Ronin", "Unit"), ("Permafrost", "Spell")],
        )
        .await;

        let index = VectorCardIndex::open(tmp.path(), EmbeddingModel::stub(16))
            .await
            .unwrap();
        assert_eq!(index.card_count(), 3);

        let all = index.query("Torch Spell", 10, None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], "Torch");

        let units = WhereFilter::eq("type", "Unit");
        let hits = index.query("Torch Spell", 10, Some(&units)).await.unwrap();
        assert_eq!(hits, vec!["Oni Ronin".to_string()]);

        assert!(matches!(
            index.query("  ", 10, None).await,
            Err(SearchError::EmptyQuery)
        ));
    }

    #[tokio::test]
    async fn missing_or_mismatched_database_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            VectorCardIndex::open(tmp.path(), EmbeddingModel::stub(16)).await,
            Err(SearchError::IndexUnavailable(_))
        ));

        seeded(tmp.path(), &EmbeddingModel::stub(16), &[("Torch", "Spell")]).await;
        assert!(matches!(
            VectorCardIndex::open(tmp.path(), EmbeddingModel::stub(8)).await,
            Err(SearchError::IndexUnavailable(_))
        ));
    }
}

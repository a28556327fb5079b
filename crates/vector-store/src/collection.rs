use crate::error::{Result, VectorStoreError};
use crate::filter::WhereFilter;
use crate::index::VectorIndex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

pub const COLLECTION_SCHEMA_VERSION: u32 = 1;

/// Flat key/value metadata attached to collections and records.
pub type Metadata = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub document: String,
    pub metadata: Metadata,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryHit {
    pub id: String,
    pub document: String,
    pub metadata: Metadata,
    /// Cosine distance, `1 - similarity`. Smaller is closer.
    pub distance: f32,
}

impl QueryHit {
    #[must_use]
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedCollection {
    schema_version: u32,
    name: String,
    dimension: usize,
    metadata: Metadata,
    records: Vec<Record>,
}

/// A named set of embedded documents.
pub struct Collection {
    name: String,
    metadata: Metadata,
    records: Vec<Record>,
    positions: HashMap<String, usize>,
    index: VectorIndex,
}

impl Collection {
    pub fn new(name: impl Into<String>, metadata: Metadata, dimension: usize) -> Self {
        Self {
            name: name.into(),
            metadata,
            records: Vec::new(),
            positions: HashMap::new(),
            index: VectorIndex::new(dimension),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.index.dimension()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.positions.get(id).map(|pos| &self.records[*pos])
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Inserts records; an existing id is replaced in place.
    pub fn add(&mut self, records: Vec<Record>) -> Result<()> {
        for record in &records {
            if record.embedding.len() != self.dimension() {
                return Err(VectorStoreError::InvalidDimension {
                    expected: self.dimension(),
                    actual: record.embedding.len(),
                });
            }
        }
        for record in records {
            let slot = match self.positions.get(&record.id) {
                Some(pos) => *pos,
                None => {
                    self.positions.insert(record.id.clone(), self.records.len());
                    self.records.len()
                }
            };
            self.index.add(slot, &record.embedding)?;
            if slot == self.records.len() {
                self.records.push(record);
            } else {
                self.records[slot] = record;
            }
        }
        Ok(())
    }

    /// Nearest records to `embedding` that satisfy `filter`, closest first.
    pub fn query(
        &self,
        embedding: &[f32],
        n_results: usize,
        filter: Option<&WhereFilter>,
    ) -> Result<Vec<QueryHit>> {
        let hits = self.index.search_where(embedding, n_results, |slot| {
            filter.map_or(true, |f| f.matches(&self.records[slot].metadata))
        })?;
        Ok(hits
            .into_iter()
            .map(|(slot, similarity)| {
                let record = &self.records[slot];
                QueryHit {
                    id: record.id.clone(),
                    document: record.document.clone(),
                    metadata: record.metadata.clone(),
                    distance: 1.0 - similarity,
                }
            })
            .collect())
    }

    pub(crate) async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let persisted: PersistedCollection = serde_json::from_slice(&bytes)?;
        if persisted.schema_version != COLLECTION_SCHEMA_VERSION {
            return Err(VectorStoreError::IndexError(format!(
                "Unsupported collection schema_version {} in {} (expected {COLLECTION_SCHEMA_VERSION})",
                persisted.schema_version,
                path.display()
            )));
        }
        let mut collection = Self::new(persisted.name, persisted.metadata, persisted.dimension);
        collection.add(persisted.records)?;
        Ok(collection)
    }

    pub(crate) async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let persisted = PersistedCollection {
            schema_version: COLLECTION_SCHEMA_VERSION,
            name: self.name.clone(),
            dimension: self.dimension(),
            metadata: self.metadata.clone(),
            records: self.records.clone(),
        };
        let bytes = serde_json::to_vec(&persisted)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(id: &str, kind: &str, embedding: Vec<f32>) -> Record {
        let mut metadata = Metadata::new();
        metadata.insert("type".to_string(), json!(kind));
        metadata.insert("name".to_string(), json!(id.to_uppercase()));
        Record {
            id: id.to_string(),
            document: format!("{id} document"),
            metadata,
            embedding,
        }
    }

    #[test]
    fn add_replaces_existing_ids() {
        let mut collection = Collection::new("cards", Metadata::new(), 2);
        collection
            .add(vec![
                record("a", "Unit", vec![1.0, 0.0]),
                record("b", "Spell", vec![0.0, 1.0]),
            ])
            .unwrap();
        collection
            .add(vec![record("a", "Relic", vec![0.0, 1.0])])
            .unwrap();

        assert_eq!(collection.count(), 2);
        assert_eq!(collection.get("a").unwrap().metadata["type"], json!("Relic"));
        let hits = collection.query(&[1.0, 0.0], 1, None).unwrap();
        assert!(hits[0].distance > 0.5);
    }

    #[test]
    fn query_orders_by_distance_and_filters() {
        let mut collection = Collection::new("cards", Metadata::new(), 2);
        collection
            .add(vec![
                record("near", "Unit", vec![1.0, 0.0]),
                record("mid", "Spell", vec![0.7, 0.7]),
                record("far", "Unit", vec![0.0, 1.0]),
            ])
            .unwrap();

        let hits = collection.query(&[1.0, 0.0], 10, None).unwrap();
        let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(hits[0].distance.abs() < 1e-6);
        assert_eq!(hits[0].metadata_str("name"), Some("NEAR"));

        let units = WhereFilter::eq("type", "Unit");
        let hits = collection.query(&[1.0, 0.0], 10, Some(&units)).unwrap();
        let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far"]);
    }

    #[test]
    fn rejects_wrong_dimension() {
        let mut collection = Collection::new("cards", Metadata::new(), 3);
        assert!(collection
            .add(vec![record("a", "Unit", vec![1.0, 0.0])])
            .is_err());
        assert!(collection.is_empty());
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");
        let mut metadata = Metadata::new();
        metadata.insert("description".to_string(), json!("test"));
        let mut collection = Collection::new("cards", metadata, 2);
        collection
            .add(vec![record("a", "Unit", vec![1.0, 0.0])])
            .unwrap();
        collection.save(&path).await.unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = Collection::load(&path).await.unwrap();
        assert_eq!(loaded.name(), "cards");
        assert_eq!(loaded.count(), 1);
        assert_eq!(loaded.metadata()["description"], json!("test"));
    }
}

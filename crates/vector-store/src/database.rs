use crate::collection::{Collection, Metadata};
use crate::error::{Result, VectorStoreError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const COLLECTION_EXT: &str = "json";

/// A directory of persisted collections, one `<name>.json` file each.
pub struct VectorDatabase {
    root: PathBuf,
    collections: BTreeMap<String, Collection>,
}

impl VectorDatabase {
    /// Opens (creating if needed) the database at `root` and loads every collection.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;

        let mut collections = BTreeMap::new();
        let mut entries = tokio::fs::read_dir(&root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(COLLECTION_EXT) {
                continue;
            }
            let collection = Collection::load(&path).await?;
            log::debug!(
                "Loaded collection {} ({} records)",
                collection.name(),
                collection.count()
            );
            collections.insert(collection.name().to_string(), collection);
        }

        Ok(Self { root, collections })
    }

    /// True when `root` holds at least one collection file.
    pub fn exists(root: &Path) -> bool {
        std::fs::read_dir(root).is_ok_and(|entries| {
            entries.flatten().any(|entry| {
                entry.path().extension().and_then(|e| e.to_str()) == Some(COLLECTION_EXT)
            })
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{COLLECTION_EXT}"))
    }

    pub fn create_collection(
        &mut self,
        name: &str,
        metadata: Metadata,
        dimension: usize,
    ) -> Result<&mut Collection> {
        if self.collections.contains_key(name) {
            return Err(VectorStoreError::CollectionExists(name.to_string()));
        }
        Ok(self
            .collections
            .entry(name.to_string())
            .or_insert_with(|| Collection::new(name, metadata, dimension)))
    }

    pub fn get_collection(&self, name: &str) -> Result<&Collection> {
        self.collections
            .get(name)
            .ok_or_else(|| VectorStoreError::NotFound(format!("collection '{name}'")))
    }

    pub fn get_collection_mut(&mut self, name: &str) -> Result<&mut Collection> {
        self.collections
            .get_mut(name)
            .ok_or_else(|| VectorStoreError::NotFound(format!("collection '{name}'")))
    }

    pub fn get_or_create_collection(
        &mut self,
        name: &str,
        metadata: Metadata,
        dimension: usize,
    ) -> &mut Collection {
        self.collections
            .entry(name.to_string())
            .or_insert_with(|| Collection::new(name, metadata, dimension))
    }

    /// Drops the collection and its file.
    pub async fn delete_collection(&mut self, name: &str) -> Result<()> {
        if self.collections.remove(name).is_none() {
            return Err(VectorStoreError::NotFound(format!("collection '{name}'")));
        }
        let path = self.path_for(name);
        if tokio::fs::try_exists(&path).await? {
            tokio::fs::remove_file(&path).await?;
        }
        Ok(())
    }

    #[must_use]
    pub fn list_collections(&self) -> Vec<&str> {
        self.collections.keys().map(String::as_str).collect()
    }

    /// Writes one collection to disk atomically.
    pub async fn persist(&self, name: &str) -> Result<()> {
        let collection = self.get_collection(name)?;
        collection.save(&self.path_for(name)).await
    }

    pub async fn persist_all(&self) -> Result<()> {
        for name in self.collections.keys() {
            self.persist(name).await?;
        }
        Ok(())
    }
}

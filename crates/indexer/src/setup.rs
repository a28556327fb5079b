use crate::checkpoint::{Checkpoint, CheckpointManager};
use crate::documents::{card_document, mechanics_documents, Document};
use crate::error::{IndexerError, Result};
use crate::retry::RetryPolicy;
use eternal_sheets::SheetsClient;
use eternal_vector_store::paths::{
    backups_dir, checkpoint_path, vectordb_dir, CARDS_COLLECTION, DISCOVERIES_COLLECTION,
    MECHANICS_COLLECTION,
};
use eternal_vector_store::{EmbeddingModel, Metadata, Record, VectorDatabase, VectorStoreError};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use walkdir::WalkDir;

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const TEST_MODE_CARD_LIMIT: usize = 50;
const PREVIEW_CHARS: usize = 200;

/// Queries run by [`KnowledgeBaseSetup::run_test_suite`].
pub const TEST_QUERIES: &[(&str, &str)] = &[
    ("deadly quickdraw removal", CARDS_COLLECTION),
    ("flying charge aggro", CARDS_COLLECTION),
    ("market access merchant", CARDS_COLLECTION),
    ("void recursion shadow", CARDS_COLLECTION),
    ("how to counter flying", MECHANICS_COLLECTION),
    ("best aggressive synergies", MECHANICS_COLLECTION),
    ("combo enablers", MECHANICS_COLLECTION),
];

/// Receives setup progress; every method defaults to a no-op.
pub trait ProgressSink: Send + Sync {
    fn start(&self, _collection: &str, _total: usize) {}
    fn advance(&self, _collection: &str, _processed: usize) {}
    fn finish(&self, _collection: &str) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {}

#[derive(Debug, Clone)]
pub struct SetupConfig {
    pub data_dir: PathBuf,
    /// Index only the first [`TEST_MODE_CARD_LIMIT`] cards.
    pub test_mode: bool,
    pub batch_size: usize,
    pub retry: RetryPolicy,
}

impl SetupConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            test_mode: false,
            batch_size: DEFAULT_BATCH_SIZE,
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupReport {
    pub cards: usize,
    pub mechanics: usize,
    pub discoveries: usize,
    pub elapsed_seconds: f64,
    pub statistics: Vec<CollectionStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub name: String,
    /// `None` when the collection does not exist.
    pub count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestHit {
    pub name: String,
    pub distance: f32,
    pub kind: String,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCase {
    pub query: String,
    pub collection: String,
    pub hits: Vec<TestHit>,
    pub error: Option<String>,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

fn preview(document: &str) -> String {
    match document.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &document[..cut]),
        None => document.to_string(),
    }
}

fn description(text: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("description".to_string(), Value::from(text));
    metadata
}

fn copy_tree(src: &Path, dest: &Path) -> Result<usize> {
    let mut files = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| IndexerError::BackupError(e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| IndexerError::BackupError(e.to_string()))?;
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
            files += 1;
        }
    }
    Ok(files)
}

/// Copies the current database to `vectordb_backups/backup_<unix_ts>`.
pub async fn backup_database(data_dir: &Path) -> Result<PathBuf> {
    let src = vectordb_dir(data_dir);
    let dest = backups_dir(data_dir).join(format!("backup_{}", unix_now()));
    log::info!("Backing up {} to {}", src.display(), dest.display());
    let target = dest.clone();
    let files = tokio::task::spawn_blocking(move || copy_tree(&src, &target))
        .await
        .map_err(|e| IndexerError::BackupError(e.to_string()))??;
    log::debug!("Backup copied {files} files");
    Ok(dest)
}

/// Builds and maintains the three knowledge-base collections.
pub struct KnowledgeBaseSetup {
    config: SetupConfig,
    model: EmbeddingModel,
    db: VectorDatabase,
    checkpoint: CheckpointManager,
    progress: Box<dyn ProgressSink>,
    backup: Option<PathBuf>,
}

impl KnowledgeBaseSetup {
    /// Opens the database for rebuilding, backing up any existing one first.
    pub async fn new(config: SetupConfig, model: EmbeddingModel) -> Result<Self> {
        log::info!(
            "Starting knowledge base setup (test_mode={})",
            config.test_mode
        );
        let backup = if VectorDatabase::exists(&vectordb_dir(&config.data_dir)) {
            Some(backup_database(&config.data_dir).await?)
        } else {
            None
        };
        let mut setup = Self::open(config, model).await?;
        setup.backup = backup;
        Ok(setup)
    }

    /// Opens the database without taking a backup.
    pub async fn open(config: SetupConfig, model: EmbeddingModel) -> Result<Self> {
        let db = VectorDatabase::open(vectordb_dir(&config.data_dir)).await?;
        let checkpoint = CheckpointManager::new(checkpoint_path(&config.data_dir));
        log::info!(
            "Vector database at {} ({} dims, model {})",
            db.root().display(),
            model.dimension(),
            model.model_id()
        );
        Ok(Self {
            config,
            model,
            db,
            checkpoint,
            progress: Box::new(SilentProgress),
            backup: None,
        })
    }

    #[must_use]
    pub fn with_progress(mut self, progress: impl ProgressSink + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    #[must_use]
    pub fn backup_path(&self) -> Option<&Path> {
        self.backup.as_deref()
    }

    #[must_use]
    pub const fn database(&self) -> &VectorDatabase {
        &self.db
    }

    #[must_use]
    pub const fn checkpoint(&self) -> &CheckpointManager {
        &self.checkpoint
    }

    /// Builds cards, mechanics and discoveries in order, resuming from the
    /// checkpoint. The checkpoint is removed once every stage completes.
    pub async fn setup_all_collections(&mut self, catalog: &SheetsClient) -> Result<SetupReport> {
        let started = Instant::now();
        let checkpoint = self.checkpoint.load().await;
        if let Some(checkpoint) = &checkpoint {
            log::info!(
                "Checkpoint found: {}",
                checkpoint.status().unwrap_or("unknown")
            );
        }

        let counts = match self.run_stages(catalog, checkpoint.as_ref()).await {
            Ok(counts) => counts,
            Err(err) => {
                log::error!("Setup failed: {err}");
                log::info!("Run setup again to resume from the last checkpoint");
                return Err(err);
            }
        };
        self.checkpoint.clear().await?;

        let elapsed_seconds = started.elapsed().as_secs_f64();
        log::info!("Setup complete in {elapsed_seconds:.1}s");
        let statistics = self.statistics();
        for stats in &statistics {
            log::info!("  {}: {:?} items", stats.name, stats.count);
        }

        let (cards, mechanics, discoveries) = counts;
        Ok(SetupReport {
            cards,
            mechanics,
            discoveries,
            elapsed_seconds,
            statistics,
        })
    }

    async fn run_stages(
        &mut self,
        catalog: &SheetsClient,
        checkpoint: Option<&Checkpoint>,
    ) -> Result<(usize, usize, usize)> {
        let cards = self.setup_cards(catalog, checkpoint).await?;
        let mechanics = self.setup_mechanics(checkpoint).await?;
        let discoveries = self.setup_discoveries(checkpoint).await?;
        Ok((cards, mechanics, discoveries))
    }

    fn count(&self, name: &str) -> usize {
        self.db.get_collection(name).map_or(0, |c| c.count())
    }

    fn ensure_collection(&mut self, name: &str, metadata: Metadata) {
        if self.db.get_collection(name).is_ok() {
            log::info!("Collection '{name}' already exists");
        } else {
            log::info!("Created collection '{name}'");
        }
        self.db
            .get_or_create_collection(name, metadata, self.model.dimension());
    }

    async fn embed_documents(&self, documents: Vec<Document>) -> Result<Vec<Record>> {
        let embeddings = {
            let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
            let model = &self.model;
            self.config
                .retry
                .run("embedding batch", || {
                    let texts = texts.clone();
                    async move { Ok(model.embed_batch(texts).await?) }
                })
                .await?
        };
        Ok(documents
            .into_iter()
            .zip(embeddings)
            .map(|(doc, embedding)| Record {
                id: doc.id,
                document: doc.text,
                metadata: doc.metadata,
                embedding,
            })
            .collect())
    }

    async fn setup_cards(
        &mut self,
        catalog: &SheetsClient,
        checkpoint: Option<&Checkpoint>,
    ) -> Result<usize> {
        if checkpoint.is_some_and(|c| c.is_complete(CARDS_COLLECTION)) {
            log::info!("{CARDS_COLLECTION} already complete");
            return Ok(self.count(CARDS_COLLECTION));
        }
        log::info!("Setting up collection {CARDS_COLLECTION}");

        let all_cards = self
            .config
            .retry
            .run("loading cards", || async move { Ok(catalog.all_cards().await?) })
            .await?;
        let limit = if self.config.test_mode {
            log::info!("Test mode: indexing the first {TEST_MODE_CARD_LIMIT} cards");
            TEST_MODE_CARD_LIMIT.min(all_cards.len())
        } else {
            all_cards.len()
        };
        let cards = &all_cards[..limit];
        let total = cards.len();

        self.ensure_collection(CARDS_COLLECTION, description("All Eternal Card Game cards"));

        let start = checkpoint
            .map_or(0, |c| c.processed(CARDS_COLLECTION))
            .min(total);
        if start > 0 {
            log::info!("Resuming {CARDS_COLLECTION} at card {start}/{total}");
        }
        self.progress.start(CARDS_COLLECTION, total);
        self.progress.advance(CARDS_COLLECTION, start);

        let batch_size = self.config.batch_size.max(1);
        let mut processed = start;
        for batch in cards[start..].chunks(batch_size) {
            let records = self
                .embed_documents(batch.iter().map(card_document).collect())
                .await?;
            self.db.get_collection_mut(CARDS_COLLECTION)?.add(records)?;
            self.db.persist(CARDS_COLLECTION).await?;

            processed += batch.len();
            self.checkpoint
                .update(|c| {
                    c.set_status("processing_cards");
                    c.record_progress(CARDS_COLLECTION, processed, total);
                })
                .await?;
            self.progress.advance(CARDS_COLLECTION, processed);
        }

        self.checkpoint
            .update(|c| c.set_complete(CARDS_COLLECTION, true))
            .await?;
        self.progress.finish(CARDS_COLLECTION);
        log::info!("{total} cards indexed");
        Ok(total)
    }

    async fn setup_mechanics(&mut self, checkpoint: Option<&Checkpoint>) -> Result<usize> {
        if checkpoint.is_some_and(|c| c.is_complete(MECHANICS_COLLECTION)) {
            log::info!("{MECHANICS_COLLECTION} already complete");
            return Ok(self.count(MECHANICS_COLLECTION));
        }
        log::info!("Setting up collection {MECHANICS_COLLECTION}");
        self.ensure_collection(
            MECHANICS_COLLECTION,
            description("Eternal skills, synergies and packages"),
        );

        let documents = mechanics_documents();
        let total = documents.len();
        self.progress.start(MECHANICS_COLLECTION, total);
        let records = self.embed_documents(documents).await?;
        self.db
            .get_collection_mut(MECHANICS_COLLECTION)?
            .add(records)?;
        self.db.persist(MECHANICS_COLLECTION).await?;
        self.progress.advance(MECHANICS_COLLECTION, total);

        self.checkpoint
            .update(|c| c.set_complete(MECHANICS_COLLECTION, true))
            .await?;
        self.progress.finish(MECHANICS_COLLECTION);
        log::info!("{total} mechanics entries indexed");
        Ok(total)
    }

    async fn setup_discoveries(&mut self, checkpoint: Option<&Checkpoint>) -> Result<usize> {
        if checkpoint.is_some_and(|c| c.is_complete(DISCOVERIES_COLLECTION)) {
            log::info!("{DISCOVERIES_COLLECTION} already complete");
            return Ok(self.count(DISCOVERIES_COLLECTION));
        }
        let mut metadata = description("Synergies discovered during use");
        metadata.insert("created_at".to_string(), Value::from(unix_now()));
        self.ensure_collection(DISCOVERIES_COLLECTION, metadata);
        self.db.persist(DISCOVERIES_COLLECTION).await?;

        self.checkpoint
            .update(|c| c.set_complete(DISCOVERIES_COLLECTION, true))
            .await?;
        Ok(self.count(DISCOVERIES_COLLECTION))
    }

    /// Item counts of the three collections.
    #[must_use]
    pub fn statistics(&self) -> Vec<CollectionStats> {
        [CARDS_COLLECTION, MECHANICS_COLLECTION, DISCOVERIES_COLLECTION]
            .into_iter()
            .map(|name| CollectionStats {
                name: name.to_string(),
                count: self.db.get_collection(name).ok().map(|c| c.count()),
            })
            .collect()
    }

    pub async fn test_search(
        &self,
        collection: &str,
        query: &str,
        n_results: usize,
    ) -> Result<Vec<TestHit>> {
        let collection = self.db.get_collection(collection)?;
        let embedding = self.model.embed(query).await?;
        let hits = collection.query(&embedding, n_results, None)?;
        Ok(hits
            .iter()
            .map(|hit| TestHit {
                name: hit.metadata_str("name").unwrap_or("Unknown").to_string(),
                distance: hit.distance,
                kind: hit.metadata_str("type").unwrap_or("Unknown").to_string(),
                preview: preview(&hit.document),
            })
            .collect())
    }

    /// Runs [`TEST_QUERIES`] with three results each. Failures are recorded
    /// per query instead of aborting the suite.
    pub async fn run_test_suite(&self) -> Vec<TestCase> {
        let mut cases = Vec::with_capacity(TEST_QUERIES.len());
        for (query, collection) in TEST_QUERIES {
            let (hits, error) = match self.test_search(collection, query, 3).await {
                Ok(hits) => (hits, None),
                Err(err) => {
                    log::error!("Test search '{query}' in {collection} failed: {err}");
                    (Vec::new(), Some(err.to_string()))
                }
            };
            cases.push(TestCase {
                query: (*query).to_string(),
                collection: (*collection).to_string(),
                hits,
                error,
            });
        }
        cases
    }

    /// Drops only the mechanics collection and leaves a checkpoint so the
    /// next [`Self::setup_all_collections`] rebuilds just that stage.
    pub async fn prepare_mechanics_reprocess(&mut self) -> Result<()> {
        match self.db.delete_collection(MECHANICS_COLLECTION).await {
            Ok(()) => log::info!("Deleted collection {MECHANICS_COLLECTION}"),
            Err(VectorStoreError::NotFound(_)) => {
                log::info!("Collection {MECHANICS_COLLECTION} was not present");
            }
            Err(err) => return Err(err.into()),
        }
        let mut checkpoint = Checkpoint::new();
        checkpoint.set_complete(CARDS_COLLECTION, true);
        checkpoint.set_complete(MECHANICS_COLLECTION, false);
        checkpoint.set_complete(DISCOVERIES_COLLECTION, true);
        checkpoint.set_status("processing_mechanics");
        self.checkpoint.save(&checkpoint).await
    }
}

/// Removes the whole database, checkpoint included. Backups are kept.
pub async fn reset_database(data_dir: &Path) -> Result<()> {
    let db_dir = vectordb_dir(data_dir);
    log::info!("Removing knowledge base at {}", db_dir.display());
    match tokio::fs::remove_dir_all(&db_dir).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

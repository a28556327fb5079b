use crate::error::{Result, VectorStoreError};
use std::env;
use std::fmt::Display;
#[cfg(feature = "fastembed")]
use std::path::Path;
#[cfg(feature = "fastembed")]
use std::sync::{Arc, Mutex};
#[cfg(feature = "fastembed")]
use tokio::task::spawn_blocking;

pub const EMBEDDING_MODE_ENV: &str = "ETERNAL_EMBEDDING_MODE";
pub const EMBEDDING_MODEL_ENV: &str = "ETERNAL_EMBEDDING_MODEL";
pub const DEFAULT_MODEL_ID: &str = "all-minilm-l6-v2";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EmbeddingMode {
    Fast,
    Stub,
}

impl EmbeddingMode {
    const fn default_id() -> &'static str {
        if cfg!(feature = "fastembed") {
            "fast"
        } else {
            "stub"
        }
    }

    pub fn from_env() -> Result<Self> {
        let raw = env::var(EMBEDDING_MODE_ENV)
            .unwrap_or_else(|_| Self::default_id().to_string())
            .to_ascii_lowercase();
        Self::parse(raw.trim())
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "fast" => Ok(Self::Fast),
            "stub" => Ok(Self::Stub),
            other => Err(VectorStoreError::EmbeddingError(format!(
                "Unsupported {EMBEDDING_MODE_ENV} '{other}' (expected 'fast' or 'stub')"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Stub => "stub",
        }
    }
}

pub fn current_embedding_mode_id() -> Result<&'static str> {
    Ok(EmbeddingMode::from_env()?.as_str())
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ModelId(String);

impl Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug)]
struct ModelSpec {
    id: &'static str,
    dimension: usize,
}

const MODEL_SPECS: &[ModelSpec] = &[
    ModelSpec {
        id: "all-minilm-l6-v2",
        dimension: 384,
    },
    ModelSpec {
        id: "bge-small-en-v1.5",
        dimension: 384,
    },
    ModelSpec {
        id: "bge-base-en-v1.5",
        dimension: 768,
    },
];

impl ModelId {
    fn from_raw(model_name: &str) -> Self {
        Self(Self::normalize(model_name))
    }

    fn from_env() -> Self {
        env::var(EMBEDDING_MODEL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| Self(DEFAULT_MODEL_ID.to_string()), |v| Self::from_raw(&v))
    }

    fn normalize(raw: &str) -> String {
        let trimmed = raw.trim().to_ascii_lowercase();
        let short = trimmed
            .rsplit_once('/')
            .map_or(trimmed.as_str(), |(_, name)| name);
        match short {
            "minilm" | "all-minilm" | "all-minilm-l6" => DEFAULT_MODEL_ID.to_string(),
            "bge-small" => "bge-small-en-v1.5".to_string(),
            "bge-base" => "bge-base-en-v1.5".to_string(),
            other => other.to_string(),
        }
    }

    fn spec(&self) -> Result<ModelSpec> {
        MODEL_SPECS
            .iter()
            .find(|spec| spec.id == self.0)
            .copied()
            .ok_or_else(|| {
                let known: Vec<&str> = MODEL_SPECS.iter().map(|s| s.id).collect();
                VectorStoreError::EmbeddingError(format!(
                    "Unknown embedding model '{}' (expected one of: {})",
                    self.0,
                    known.join(", ")
                ))
            })
    }
}

/// Model ids accepted by `ETERNAL_EMBEDDING_MODEL`.
pub fn available_models() -> Vec<&'static str> {
    MODEL_SPECS.iter().map(|s| s.id).collect()
}

#[derive(Clone)]
struct StubBackend {
    dimension: usize,
}

impl StubBackend {
    const fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts
            .iter()
            .map(|text| stub_embed(text, self.dimension))
            .collect()
    }
}

#[cfg(feature = "fastembed")]
struct FastBackend {
    model: Mutex<fastembed::TextEmbedding>,
}

#[cfg(feature = "fastembed")]
impl FastBackend {
    fn new(spec: &ModelSpec, cache_dir: &Path) -> Result<Self> {
        use fastembed::{EmbeddingModel as FastModel, InitOptions, TextEmbedding};

        let model = match spec.id {
            "bge-small-en-v1.5" => FastModel::BGESmallENV15,
            "bge-base-en-v1.5" => FastModel::BGEBaseENV15,
            _ => FastModel::AllMiniLML6V2,
        };
        log::info!("Loading embedding model {} into {}", spec.id, cache_dir.display());
        let options = InitOptions::new(model)
            .with_cache_dir(cache_dir.to_path_buf())
            .with_show_download_progress(false);
        let model = TextEmbedding::try_new(options)
            .map_err(|e| VectorStoreError::EmbeddingError(format!("{e:#}")))?;
        Ok(Self {
            model: Mutex::new(model),
        })
    }

    fn embed_batch_blocking(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| VectorStoreError::EmbeddingError("Embedding model lock poisoned".into()))?;
        model
            .embed(texts.to_vec(), None)
            .map_err(|e| VectorStoreError::EmbeddingError(format!("{e:#}")))
    }
}

/// Turns text into fixed-size vectors.
///
/// `fast` runs a local sentence-embedding model (cargo feature `fastembed`);
/// `stub` derives deterministic unit vectors from a hash of the text, which
/// keeps tests and offline runs reproducible.
pub struct EmbeddingModel {
    backend: EmbeddingBackend,
    model_id: String,
    dimension: usize,
}

enum EmbeddingBackend {
    #[cfg(feature = "fastembed")]
    Fast(Arc<FastBackend>),
    Stub(StubBackend),
}

impl EmbeddingModel {
    pub fn new() -> Result<Self> {
        Self::from_env()
    }

    pub fn new_for_model(model_id: &str) -> Result<Self> {
        let mode = EmbeddingMode::from_env()?;
        Self::from_mode_and_id(mode, &ModelId::from_raw(model_id))
    }

    /// Deterministic hash embeddings, independent of the environment.
    #[must_use]
    pub fn stub(dimension: usize) -> Self {
        Self {
            backend: EmbeddingBackend::Stub(StubBackend::new(dimension)),
            model_id: "stub".to_string(),
            dimension,
        }
    }

    fn from_env() -> Result<Self> {
        let mode = EmbeddingMode::from_env()?;
        Self::from_mode_and_id(mode, &ModelId::from_env())
    }

    fn from_mode_and_id(mode: EmbeddingMode, id: &ModelId) -> Result<Self> {
        let spec = id.spec()?;
        match mode {
            EmbeddingMode::Stub => Ok(Self {
                backend: EmbeddingBackend::Stub(StubBackend::new(spec.dimension)),
                model_id: spec.id.to_string(),
                dimension: spec.dimension,
            }),
            #[cfg(feature = "fastembed")]
            EmbeddingMode::Fast => {
                let backend = FastBackend::new(&spec, &crate::paths::model_dir())?;
                Ok(Self {
                    backend: EmbeddingBackend::Fast(Arc::new(backend)),
                    model_id: spec.id.to_string(),
                    dimension: spec.dimension,
                })
            }
            #[cfg(not(feature = "fastembed"))]
            EmbeddingMode::Fast => Err(VectorStoreError::EmbeddingError(format!(
                "{EMBEDDING_MODE_ENV}=fast requires building with the 'fastembed' feature; use 'stub' instead"
            ))),
        }
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(vec![text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| VectorStoreError::EmbeddingError("Empty embedding result".to_string()))
    }

    pub async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let owned: Vec<String> = texts.into_iter().map(ToString::to_string).collect();
        match &self.backend {
            EmbeddingBackend::Stub(stub) => Ok(stub.embed_batch(&owned)),
            #[cfg(feature = "fastembed")]
            EmbeddingBackend::Fast(backend) => {
                let backend = backend.clone();
                spawn_blocking(move || backend.embed_batch_blocking(&owned))
                    .await
                    .map_err(|e| VectorStoreError::EmbeddingError(format!("Join error: {e}")))?
            }
        }
    }

    #[must_use]
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }
}

/// Returns the normalized embedding model id for the current process environment.
pub fn current_model_id() -> Result<String> {
    let id = ModelId::from_env();
    id.spec()?;
    Ok(id.to_string())
}

fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value /= norm;
    }
}

fn stub_embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut state =
        fnv1a_64(text.as_bytes()) ^ (dimension as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut vec = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        let bits = splitmix64(&mut state);
        let high = (bits >> 32) as u32;
        let mantissa = high >> 9;
        let unit = f32::from_bits(0x3f80_0000 | mantissa) - 1.0;
        vec.push(unit.mul_add(2.0, -1.0));
    }
    normalize(&mut vec);
    vec
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_ids_normalize() {
        assert_eq!(ModelId::from_raw("BGE-Small").0, "bge-small-en-v1.5");
        assert_eq!(
            ModelId::from_raw("sentence-transformers/all-MiniLM-L6-v2").0,
            "all-minilm-l6-v2"
        );
        assert_eq!(ModelId::from_raw("bge-base").spec().unwrap().dimension, 768);
        assert!(ModelId::from_raw("all-mpnet-base-v2").spec().is_err());
    }

    #[test]
    fn mode_parsing() {
        assert_eq!(EmbeddingMode::parse("stub").unwrap(), EmbeddingMode::Stub);
        assert_eq!(EmbeddingMode::parse("fast").unwrap(), EmbeddingMode::Fast);
        assert!(EmbeddingMode::parse("gpu").is_err());
    }

    #[tokio::test]
    async fn stub_embeddings_are_deterministic_unit_vectors() {
        let model = EmbeddingModel::stub(32);
        let a = model.embed("deadly quickdraw removal").await.unwrap();
        let b = model.embed("deadly quickdraw removal").await.unwrap();
        let c = model.embed("flying charge aggro").await.unwrap();

        assert_eq!(a.len(), 32);
        assert_eq!(a, b);
        assert_ne!(a, c);
        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_embed_batch() {
        let model = EmbeddingModel::stub(16);
        let texts = vec!["hello world", "foo bar", "test"];
        let embeddings = model.embed_batch(texts).await.unwrap();
        assert_eq!(embeddings.len(), 3);
        for emb in embeddings {
            assert_eq!(emb.len(), model.dimension());
        }
        assert!(model.embed_batch(Vec::new()).await.unwrap().is_empty());
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        let sim = EmbeddingModel::cosine_similarity(&a, &b);
        assert!((sim - 1.0).abs() < 1e-6);

        let c = vec![1.0, 0.0];
        let d = vec![0.0, 1.0];
        let sim2 = EmbeddingModel::cosine_similarity(&c, &d);
        assert!((sim2 - 0.0).abs() < 1e-6);

        assert_eq!(EmbeddingModel::cosine_similarity(&a, &c), 0.0);
        assert_eq!(EmbeddingModel::cosine_similarity(&[0.0, 0.0], &d), 0.0);
    }
}

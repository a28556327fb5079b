use crate::config::AppConfig;
use anyhow::{Context, Result};
use eternal_search::{SearchEngine, VectorCardIndex};
use eternal_sheets::{GoogleSheetsSource, JsonFileSource, SheetsClient};
use eternal_vector_store::EmbeddingModel;

/// Card catalog from the JSON export when configured, else the Sheets API.
pub fn card_client(config: &AppConfig) -> Result<SheetsClient> {
    if let Some(path) = &config.cards_file {
        log::debug!("Reading cards from {}", path.display());
        return Ok(SheetsClient::new(JsonFileSource::new(path)));
    }
    let api_key = config.sheets_api_key.clone().unwrap_or_default();
    let source = GoogleSheetsSource::new(&config.sheets_id, &config.sheets_range, api_key)
        .context("No card source configured (set ETERNAL_CARDS_FILE or GOOGLE_SHEETS_API_KEY)")?;
    Ok(SheetsClient::new(source))
}

pub fn embedding_model(config: &AppConfig) -> Result<EmbeddingModel> {
    config.export_embedding_env();
    EmbeddingModel::new().context("Failed to initialize the embedding model")
}

/// Search engine over the catalog, with vector search when the knowledge
/// base has been built. Without it the engine falls back to substring search.
pub async fn search_engine(config: &AppConfig, catalog: &SheetsClient) -> Result<SearchEngine> {
    let engine = SearchEngine::from_catalog(catalog)
        .await
        .context("Failed to load the card catalog")?
        .with_expedition_sets(config.expedition_sets.clone());

    let model = match embedding_model(config) {
        Ok(model) => model,
        Err(err) => {
            log::warn!("{err:#}; semantic search disabled");
            return Ok(engine);
        }
    };
    match VectorCardIndex::open(&config.data_dir, model).await {
        Ok(index) => Ok(engine.with_semantic_index(index)),
        Err(err) => {
            log::warn!("{err}; using simple search (run `eternal-scout setup` to enable semantic search)");
            Ok(engine)
        }
    }
}

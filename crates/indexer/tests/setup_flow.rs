use eternal_indexer::{KnowledgeBaseSetup, RetryPolicy, SetupConfig};
use eternal_sheets::{JsonFileSource, SheetsClient};
use eternal_vector_store::paths::{CARDS_COLLECTION, MECHANICS_COLLECTION};
use eternal_vector_store::{EmbeddingModel, WhereFilter};
use tempfile::TempDir;

const CARDS_JSON: &str = r#"[
  {"Name": "Torch", "Cost": "1", "Influence": "{F}", "Type": "Spell", "Rarity": "Common",
   "CardText": "Deal 2 damage to a unit.", "DeckBuildable": "TRUE", "SetNumber": "1"},
  {"Name": "Oni Ronin", "Cost": "1", "Influence": "{F}", "Type": "Unit", "Rarity": "Common",
   "CardText": "Charge. Oni Ronin can't block.", "Attack": "2", "Health": "1",
   "UnitType": "Oni", "DeckBuildable": "TRUE", "SetNumber": "1"},
  {"Name": "Fire Sigil", "Cost": "0", "Influence": "", "Type": "Power", "Rarity": "Common",
   "CardText": "", "DeckBuildable": "TRUE", "SetNumber": "1"},
  {"Name": "Smuggler's Stash", "Cost": "2", "Influence": "{P}", "Type": "Spell",
   "Rarity": "Uncommon", "CardText": "Draw a card from your market.", "DeckBuildable": "TRUE",
   "SetNumber": "3"}
]"#;

fn config(data_dir: &std::path::Path) -> SetupConfig {
    let mut config = SetupConfig::new(data_dir);
    config.batch_size = 2;
    config.retry = RetryPolicy::none();
    config
}

#[tokio::test]
async fn failed_run_resumes_after_the_source_is_fixed() {
    let temp = TempDir::new().expect("tempdir");
    let cards_path = temp.path().join("cards.json");
    let data_dir = temp.path().join("data");

    let mut setup = KnowledgeBaseSetup::new(config(&data_dir), EmbeddingModel::stub(16))
        .await
        .expect("setup");
    let missing = SheetsClient::new(JsonFileSource::new(&cards_path));
    assert!(setup.setup_all_collections(&missing).await.is_err());

    std::fs::write(&cards_path, CARDS_JSON).expect("write cards");
    let catalog = SheetsClient::new(JsonFileSource::new(&cards_path));
    let report = setup
        .setup_all_collections(&catalog)
        .await
        .expect("second run");
    assert_eq!(report.cards, 4);
    assert!(report.mechanics > 0);
}

#[tokio::test]
async fn persisted_collections_answer_filtered_queries() {
    let temp = TempDir::new().expect("tempdir");
    let cards_path = temp.path().join("cards.json");
    std::fs::write(&cards_path, CARDS_JSON).expect("write cards");
    let data_dir = temp.path().join("data");

    let catalog = SheetsClient::new(JsonFileSource::new(&cards_path));
    let mut setup = KnowledgeBaseSetup::new(config(&data_dir), EmbeddingModel::stub(16))
        .await
        .expect("setup");
    setup
        .setup_all_collections(&catalog)
        .await
        .expect("setup run");
    drop(setup);

    let reopened = KnowledgeBaseSetup::open(config(&data_dir), EmbeddingModel::stub(16))
        .await
        .expect("reopen");
    assert!(reopened.backup_path().is_none());
    let db = reopened.database();
    let cards = db.get_collection(CARDS_COLLECTION).expect("cards");
    assert_eq!(cards.count(), 4);

    let model = EmbeddingModel::stub(16);
    let query = model.embed("market access").await.expect("embed");
    let market = WhereFilter::eq("can_access_market", true);
    let hits = cards.query(&query, 10, Some(&market)).expect("query");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].metadata_str("name"), Some("Smuggler's Stash"));

    let skills = WhereFilter::eq("type", "skill");
    let mechanics = db.get_collection(MECHANICS_COLLECTION).expect("mechanics");
    let hits = mechanics.query(&query, 100, Some(&skills)).expect("query");
    assert!(hits.iter().all(|h| h.metadata_str("type") == Some("skill")));
    assert!(!hits.is_empty());
}

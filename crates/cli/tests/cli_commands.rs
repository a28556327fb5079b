use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CARDS_JSON: &str = r#"[
  {"Name": "Torch", "Cost": "1", "Influence": "{F}", "Type": "Spell", "Rarity": "Common",
   "CardText": "Deal 2 damage to a unit.", "DeckBuildable": "TRUE", "SetNumber": "1"},
  {"Name": "Oni Ronin", "Cost": "1", "Influence": "{F}", "Type": "Unit", "Rarity": "Common",
   "CardText": "Charge. Oni Ronin can't block.", "Attack": "2", "Health": "1",
   "UnitType": "Oni", "DeckBuildable": "TRUE", "SetNumber": "1"},
  {"Name": "Fire Sigil", "Cost": "0", "Influence": "", "Type": "Power", "Rarity": "Common",
   "CardText": "", "DeckBuildable": "TRUE", "SetNumber": "1"},
  {"Name": "Harsh Rule", "Cost": "5", "Influence": "{J}{J}{S}", "Type": "Spell",
   "Rarity": "Rare", "CardText": "Deal 5 damage to each unit.", "DeckBuildable": "TRUE",
   "SetNumber": "2"},
  {"Name": "Smuggler's Stash", "Cost": "2", "Influence": "{P}", "Type": "Spell",
   "Rarity": "Uncommon", "CardText": "Draw a card from your market.", "DeckBuildable": "TRUE",
   "SetNumber": "3"}
]"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("cards.json"), CARDS_JSON).expect("write cards");
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("eternal-scout").expect("binary");
        cmd.current_dir(self.dir.path())
            .env("ETERNAL_EMBEDDING_MODE", "stub")
            .env("ETERNAL_CARDS_FILE", self.path("cards.json"))
            .env("ETERNAL_DATA_DIR", self.path("data"))
            .env_remove("OPENAI_API_KEY")
            .env_remove("ETERNAL_EMBEDDING_MODEL");
        cmd
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self.cmd().args(args).output().expect("run");
        assert!(
            output.status.success(),
            "{args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        parse(&output.stdout)
    }
}

fn parse(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("stdout is JSON")
}

fn names(cards: &Value) -> Vec<&str> {
    cards
        .as_array()
        .expect("card array")
        .iter()
        .filter_map(|card| card["name"].as_str())
        .collect()
}

fn write_deck(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("deck.json");
    std::fs::write(&path, body).expect("write deck");
    path
}

#[test]
fn search_without_knowledge_base_uses_substring_match() {
    let fx = Fixture::new();
    let result = fx.json(&["search", "damage", "--json"]);
    assert_eq!(result["mode"], "simple");
    assert_eq!(result["used_vector_store"], false);
    assert_eq!(names(&result["cards"]), vec!["Torch", "Harsh Rule"]);
    assert_eq!(result["total_found"], 2);
}

#[test]
fn search_filters_and_unknown_includes() {
    let fx = Fixture::new();
    let result = fx.json(&[
        "search",
        "--type",
        "spell",
        "--max-rarity",
        "uncommon",
        "--include",
        "Trch",
        "--json",
    ]);
    assert_eq!(result["mode"], "simple");
    let unresolved = &result["unresolved"][0];
    assert_eq!(unresolved["name"], "Trch");
    assert_eq!(unresolved["suggestions"][0], "Torch");

    let browse = fx.json(&["search", "--type", "spell", "--no-market", "--json"]);
    assert_eq!(browse["mode"], "browse");
    assert_eq!(names(&browse["cards"]), vec!["Torch", "Harsh Rule"]);
}

#[test]
fn search_rejects_bad_flags() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["search", "torch", "--min-cost", "5", "--max-cost", "1"])
        .assert()
        .failure()
        .stderr(contains("--min-cost"));
}

#[test]
fn card_lookup_found_and_missing() {
    let fx = Fixture::new();
    let found = fx.json(&["card", "oni ronin", "--json"]);
    assert_eq!(found["found"], true);
    assert_eq!(found["card"]["name"], "Oni Ronin");
    assert_eq!(found["card"]["attack"], 2);

    let output = fx
        .cmd()
        .args(["card", "Trch", "--json"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    let missing = parse(&output.stdout);
    assert_eq!(missing["found"], false);
    assert_eq!(missing["suggestions"][0], "Torch");
}

#[test]
fn scout_builds_pool_with_must_include_first() {
    let fx = Fixture::new();
    let result = fx.json(&["scout", "fast fire deck", "--include", "Torch", "--json"]);
    assert_eq!(result["strategy"]["archetype"], "aggro");
    assert_eq!(result["strategy"]["primary_faction"], "Fire");
    assert_eq!(result["card_pool"][0]["name"], "Torch");
    assert!(result["search_metadata"]["queries_executed"].as_u64().unwrap_or(0) > 0);
    assert!(result["pool_stats"]["by_type"].is_object());
}

#[test]
fn scout_exclude_beats_mentions_and_includes() {
    let fx = Fixture::new();
    let result = fx.json(&[
        "scout",
        "control without harsh rule",
        "--include",
        "Torch",
        "--exclude",
        "Harsh Rule",
        "--exclude",
        "torch",
        "--json",
    ]);
    let pool = names(&result["card_pool"]);
    assert!(!pool.contains(&"Harsh Rule"), "{pool:?}");
    assert!(!pool.contains(&"Torch"), "{pool:?}");
    assert_eq!(result["pool_size"], pool.len());
    assert_eq!(result["search_metadata"]["unique_cards"], pool.len());

    fx.cmd()
        .args(["scout", "--help"])
        .assert()
        .success()
        .stdout(contains("exclusion always wins"));
}

#[test]
fn scout_rejects_empty_strategy() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["scout", "   ", "--json"])
        .assert()
        .failure()
        .stderr(contains("Scouting failed"));
}

#[test]
fn setup_then_stats_and_semantic_search() {
    let fx = Fixture::new();
    let report = fx.json(&["setup", "--test", "--json"]);
    assert_eq!(report["cards"], 5);
    assert!(report["mechanics"].as_u64().unwrap_or(0) > 0);
    assert!(report["tests"].as_array().is_some_and(|t| !t.is_empty()));

    let stats = fx.json(&["setup", "--stats", "--json"]);
    let cards = stats
        .as_array()
        .expect("stats array")
        .iter()
        .find(|s| s["name"] == "eternal_cards")
        .expect("cards collection");
    assert_eq!(cards["count"], 5);

    let hits = fx.json(&["setup", "--search", "burn", "-n", "2", "--json"]);
    assert_eq!(hits["collection"], "eternal_cards");
    assert_eq!(hits["hits"].as_array().map(Vec::len), Some(2));

    let search = fx.json(&["search", "cheap removal", "--json"]);
    assert_eq!(search["mode"], "semantic");
    assert_eq!(search["used_vector_store"], true);
}

#[test]
fn reset_needs_confirmation_in_json_mode() {
    let fx = Fixture::new();
    fx.json(&["setup", "--test", "--json"]);
    assert!(fx.path("data").join("vectordb").is_dir());

    fx.cmd()
        .args(["setup", "--reset", "--json"])
        .assert()
        .failure()
        .stderr(contains("--yes"));

    let done = fx.json(&["setup", "--reset", "--yes", "--json"]);
    assert_eq!(done["done"], true);
    assert!(!fx.path("data").join("vectordb").exists());
}

#[test]
fn deck_validation_reports_errors() {
    let fx = Fixture::new();
    let deck = write_deck(
        fx.dir.path(),
        r#"{"name": "Burn", "cards": {"Torch": 4, "Fire Sigil": 20, "Trch": 1}}"#,
    );
    let output = fx
        .cmd()
        .args(["deck", deck.to_str().expect("utf8 path"), "--json"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    let report = parse(&output.stdout);
    assert_eq!(report["valid"], false);
    assert_eq!(report["deck"]["name"], "Burn");
    assert_eq!(report["unknown_cards"][0]["name"], "Trch");
    assert!(report["validation"]["errors"]
        .as_array()
        .is_some_and(|errors| !errors.is_empty()));
    assert_eq!(report["curve"]["1"], 4);
    assert!(report["curve"].get("0").is_none());
}

#[test]
fn skill_lookup_and_listing() {
    let fx = Fixture::new();
    let charge = fx.json(&["skill", "charge", "--json"]);
    assert_eq!(charge["skill"]["name"], "Charge");
    assert!(charge["synergistic"]
        .as_array()
        .is_some_and(|s| s.iter().any(|entry| entry["skill"] == "Warcry")));

    let all = fx.json(&["skill", "--json"]);
    assert!(all.as_array().is_some_and(|skills| skills.len() > 10));

    fx.cmd()
        .args(["skill", "Chrage"])
        .assert()
        .failure()
        .stdout(contains("Unknown keyword"));
}

#[test]
fn status_reports_sources() {
    let fx = Fixture::new();
    let status = fx.json(&["status", "--json"]);
    assert_eq!(status["cards_file"], true);
    assert_eq!(status["knowledge_base"], false);
    assert_eq!(status["embedding_mode"], "stub");
    assert_eq!(status["openai"], false);
}

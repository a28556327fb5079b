use async_trait::async_trait;
use eternal_cards::Card;
use eternal_scout::{Archetype, StrategyScout};
use eternal_search::{SearchEngine, SearchFilters, SemanticCardIndex};
use eternal_sheets::SheetsClient;
use eternal_vector_store::WhereFilter;
use std::sync::Arc;

/// Answers every query with the whole catalog, in catalog order.
struct EveryCard(Vec<String>);

#[async_trait]
impl SemanticCardIndex for EveryCard {
    async fn query(
        &self,
        _query: &str,
        n_results: usize,
        _filter: Option<&WhereFilter>,
    ) -> eternal_search::Result<Vec<String>> {
        Ok(self.0.iter().take(n_results).cloned().collect())
    }
}

fn catalog() -> Vec<Card> {
    vec![
        Card::new("Grenadin Drone", "Unit")
            .with_cost(2, "{F}")
            .with_stats(2, 2)
            .with_text("Summon: Play a 1/1 Grenadin.")
            .with_unit_types(["Grenadin"]),
        Card::new("Torch", "Spell")
            .with_cost(1, "{F}")
            .with_text("Deal 2 damage to a unit."),
        Card::new("Oni Ronin", "Unit")
            .with_cost(1, "{F}")
            .with_stats(2, 1)
            .with_text("Charge")
            .with_unit_types(["Oni"]),
        Card::new("Rakano Outlaw", "Unit")
            .with_cost(2, "{F}{J}")
            .with_stats(2, 2)
            .with_text("Charge"),
        Card::new("Sandstorm Titan", "Unit")
            .with_cost(7, "{T}{T}{T}")
            .with_stats(7, 7),
        Card::new("Fire Sigil", "Power"),
        Card::new("Big Fire Dragon", "Unit")
            .with_cost(6, "{F}{F}")
            .with_stats(6, 6)
            .with_text("Flying")
            .with_unit_types(["Dragon"]),
    ]
}

#[tokio::test]
async fn aggro_oni_scout_over_a_semantic_index() {
    let cards = catalog();
    let names = cards.iter().map(|c| c.name.clone()).collect();
    let catalog = SheetsClient::with_cards(cards);
    let engine = SearchEngine::from_catalog(&catalog)
        .await
        .expect("engine")
        .with_semantic_index(EveryCard(names));
    let scout = StrategyScout::new(Arc::new(engine));

    let result = scout
        .analyze_and_scout("fast fire deck", None)
        .await
        .expect("scout");

    assert_eq!(result.strategy.archetype, Archetype::Aggro);
    let pool: Vec<&str> = result.card_pool.iter().map(|c| c.name.as_str()).collect();
    // Mono-Fire and cost <= 5 for aggro; the power goes last.
    assert_eq!(pool, vec!["Torch", "Oni Ronin", "Grenadin Drone", "Fire Sigil"]);
    assert_eq!(result.pool_size, 4);
    assert!(result.search_metadata.queries_executed >= 3);
}

#[tokio::test]
async fn caller_filters_override_the_analysis() {
    let cards = catalog();
    let names = cards.iter().map(|c| c.name.clone()).collect();
    let engine = SearchEngine::new(Arc::new(cards)).with_semantic_index(EveryCard(names));
    let scout = StrategyScout::new(Arc::new(engine));

    let filters = SearchFilters {
        allowed_factions: vec!["Fire".into(), "Justice".into()],
        max_cost: Some(2),
        must_exclude: vec!["Torch".into()],
        ..SearchFilters::default()
    };
    let result = scout
        .analyze_and_scout("aggro fire", Some(filters))
        .await
        .expect("scout");

    let pool: Vec<&str> = result.card_pool.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        pool,
        vec!["Oni Ronin", "Grenadin Drone", "Rakano Outlaw", "Fire Sigil"]
    );
}

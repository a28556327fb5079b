use crate::error::Result;
use crate::row::parse_card_rows;
use crate::source::CardSource;
use eternal_cards::{Card, Faction};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

/// Rough per-card footprint used for the cache size estimate.
const BYTES_PER_CARD: usize = 350;

/// Attribute search over the cached catalog. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct CardQuery {
    pub name: Option<String>,
    pub card_type: Option<String>,
    pub cost_max: Option<u32>,
    /// Faction names or raw influence symbols; a card matches if it carries any.
    pub factions: Vec<String>,
    pub rarity: Option<String>,
    pub text: Option<String>,
}

impl CardQuery {
    fn matches(&self, card: &Card, symbols: &[String]) -> bool {
        if let Some(name) = &self.name {
            if !card.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(card_type) = &self.card_type {
            if !card.card_type.eq_ignore_ascii_case(card_type) {
                return false;
            }
        }
        if let Some(max) = self.cost_max {
            if card.cost > max {
                return false;
            }
        }
        if !symbols.is_empty() && !symbols.iter().any(|s| card.influence.contains(s.as_str())) {
            return false;
        }
        if let Some(rarity) = &self.rarity {
            if !card.rarity.eq_ignore_ascii_case(rarity) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            if !card.card_text.to_lowercase().contains(&text.to_lowercase()) {
                return false;
            }
        }
        true
    }

    fn faction_symbols(&self) -> Vec<String> {
        self.factions
            .iter()
            .map(|f| {
                Faction::parse(f)
                    .map(|faction| faction.symbol().to_string())
                    .unwrap_or_else(|| f.clone())
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheInfo {
    pub loaded: bool,
    pub card_count: usize,
    /// Unix seconds of the last load.
    pub loaded_at: Option<u64>,
    pub load_seconds: Option<f64>,
    pub memory_kb: usize,
}

struct CardCache {
    cards: Arc<Vec<Card>>,
    loaded_at: SystemTime,
    load_time: Duration,
}

/// Lazily loaded, in-memory card catalog.
///
/// The first call that needs cards fetches every row from the source; later
/// calls read the cache until [`SheetsClient::reload`].
pub struct SheetsClient {
    source: Box<dyn CardSource>,
    cache: RwLock<Option<CardCache>>,
}

impl SheetsClient {
    pub fn new(source: impl CardSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: RwLock::new(None),
        }
    }

    /// A client whose catalog is already known.
    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            source: Box::new(StaticSource),
            cache: RwLock::new(Some(CardCache {
                cards: Arc::new(cards),
                loaded_at: SystemTime::now(),
                load_time: Duration::ZERO,
            })),
        }
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    async fn load(&self) -> Result<CardCache> {
        let started = Instant::now();
        log::info!("Loading cards from {}", self.source.describe());
        let rows = self.source.fetch_rows().await?;
        let cards = parse_card_rows(&rows);
        let load_time = started.elapsed();
        log::info!(
            "Loaded {} deck-buildable cards from {} rows in {:.2}s",
            cards.len(),
            rows.len(),
            load_time.as_secs_f64()
        );
        Ok(CardCache {
            cards: Arc::new(cards),
            loaded_at: SystemTime::now(),
            load_time,
        })
    }

    pub async fn all_cards(&self) -> Result<Arc<Vec<Card>>> {
        if let Some(cache) = self.cache.read().await.as_ref() {
            return Ok(Arc::clone(&cache.cards));
        }
        let mut guard = self.cache.write().await;
        if let Some(cache) = guard.as_ref() {
            return Ok(Arc::clone(&cache.cards));
        }
        let cache = self.load().await?;
        let cards = Arc::clone(&cache.cards);
        *guard = Some(cache);
        Ok(cards)
    }

    /// Drops the cache and fetches again.
    pub async fn reload(&self) -> Result<Arc<Vec<Card>>> {
        let mut guard = self.cache.write().await;
        let cache = self.load().await?;
        let cards = Arc::clone(&cache.cards);
        *guard = Some(cache);
        Ok(cards)
    }

    pub async fn search_cards(&self, query: &CardQuery) -> Result<Vec<Card>> {
        let cards = self.all_cards().await?;
        let symbols = query.faction_symbols();
        Ok(cards
            .iter()
            .filter(|card| query.matches(card, &symbols))
            .cloned()
            .collect())
    }

    pub async fn card_by_name(&self, name: &str) -> Result<Option<Card>> {
        let wanted = name.trim().to_lowercase();
        let cards = self.all_cards().await?;
        Ok(cards
            .iter()
            .find(|card| card.name.to_lowercase() == wanted)
            .cloned())
    }

    pub async fn market_access_cards(&self) -> Result<Vec<Card>> {
        let cards = self.all_cards().await?;
        Ok(cards
            .iter()
            .filter(|card| card.can_access_market())
            .cloned()
            .collect())
    }

    pub async fn cache_info(&self) -> CacheInfo {
        match self.cache.read().await.as_ref() {
            Some(cache) => CacheInfo {
                loaded: true,
                card_count: cache.cards.len(),
                loaded_at: cache
                    .loaded_at
                    .duration_since(UNIX_EPOCH)
                    .ok()
                    .map(|d| d.as_secs()),
                load_seconds: Some(cache.load_time.as_secs_f64()),
                memory_kb: cache.cards.len() * BYTES_PER_CARD / 1024,
            },
            None => CacheInfo {
                loaded: false,
                card_count: 0,
                loaded_at: None,
                load_seconds: None,
                memory_kb: 0,
            },
        }
    }
}

/// Source behind [`SheetsClient::with_cards`]; reloading yields no rows.
struct StaticSource;

#[async_trait::async_trait]
impl CardSource for StaticSource {
    fn describe(&self) -> String {
        "in-memory catalog".to_string()
    }

    async fn fetch_rows(&self) -> Result<Vec<crate::row::RawRow>> {
        Ok(Vec::new())
    }
}

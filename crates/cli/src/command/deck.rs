use super::CommandContext;
use crate::catalog;
use crate::render::HumanLayout;
use anyhow::{Context as _, Result};
use clap::Args;
use eternal_cards::{Card, Deck, DeckCard, DeckRules, DeckValidation, GameFormat};
use eternal_search::suggest;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct DeckArgs {
    /// Deck list as JSON: {"name": .., "cards": {"Torch": 4, ..}, "market": [..]}
    pub file: PathBuf,

    /// Output JSON format
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Deserialize)]
struct DeckFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    archetype: Option<String>,
    #[serde(default)]
    cards: BTreeMap<String, u32>,
    #[serde(default)]
    market: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct UnknownCard {
    name: String,
    suggestions: Vec<String>,
}

#[derive(Serialize)]
struct DeckReport {
    deck: Deck,
    stats: String,
    curve: BTreeMap<u32, u32>,
    factions: BTreeMap<String, u32>,
    validation: DeckValidation,
    valid: bool,
    unknown_cards: Vec<UnknownCard>,
}

fn resolve<'a>(
    name: &str,
    by_name: &HashMap<String, &'a Card>,
    all: &'a [Card],
    unknown: &mut Vec<UnknownCard>,
) -> Option<&'a Card> {
    let found = by_name.get(&name.trim().to_lowercase()).copied();
    if found.is_none() {
        unknown.push(UnknownCard {
            name: name.to_string(),
            suggestions: suggest(name, all.iter().map(|c| c.name.as_str()), 3),
        });
    }
    found
}

fn build_deck(file: DeckFile, cards: &[Card]) -> Result<(Deck, Vec<UnknownCard>)> {
    let by_name: HashMap<String, &Card> = cards
        .iter()
        .map(|card| (card.name.to_lowercase(), card))
        .collect();
    let mut unknown = Vec::new();

    let mut deck = Deck::new(file.name.unwrap_or_else(|| "Unnamed Deck".to_string()));
    deck.description = file.description;
    deck.archetype = file.archetype;
    if let Some(raw) = &file.format {
        deck.format = raw
            .parse::<GameFormat>()
            .with_context(|| format!("Invalid deck format '{raw}'"))?;
    }

    for (name, quantity) in &file.cards {
        if *quantity == 0 {
            continue;
        }
        if let Some(card) = resolve(name, &by_name, cards, &mut unknown) {
            // Built directly so copy limits surface as validation errors.
            deck.main_deck.push(DeckCard {
                card: card.clone(),
                quantity: *quantity,
            });
        }
    }
    if let Some(names) = &file.market {
        deck.market = Some(
            names
                .iter()
                .filter_map(|name| resolve(name, &by_name, cards, &mut unknown))
                .cloned()
                .collect(),
        );
    }
    Ok((deck, unknown))
}

pub async fn run(args: DeckArgs, ctx: &CommandContext) -> Result<()> {
    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let file: DeckFile = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid deck file {}", args.file.display()))?;

    let client = catalog::card_client(&ctx.config)?;
    let cards = client
        .all_cards()
        .await
        .context("Failed to load the card catalog")?;
    let (deck, unknown_cards) = build_deck(file, &cards)?;

    let validation = deck.validate(&DeckRules::STANDARD);
    let report = DeckReport {
        stats: deck.format_stats(),
        curve: deck.curve(),
        factions: deck.factions(),
        valid: validation.is_valid() && unknown_cards.is_empty(),
        validation,
        unknown_cards,
        deck,
    };

    if ctx.json {
        ctx.emit_json(&report)?;
    } else {
        crate::print_stdout(&render(&report))?;
    }
    if !report.valid {
        std::process::exit(1);
    }
    Ok(())
}

fn render(report: &DeckReport) -> String {
    let deck = &report.deck;
    let mut layout = HumanLayout::new();
    layout.title(&deck.name);
    layout.kv("Format", deck.format.to_string());
    layout.push_line(report.stats.clone());

    layout.section("Main deck");
    for dc in &deck.main_deck {
        layout.push_line(dc.format_detailed());
    }
    if let Some(market) = &deck.market {
        layout.section("Market");
        for card in market {
            layout.push_line(card.format_for_deck());
        }
    }

    layout.section("Curve");
    for (cost, count) in &report.curve {
        layout.kv(&cost.to_string(), format!("{} {count}", "#".repeat(*count as usize)));
    }
    if !report.factions.is_empty() {
        let factions: Vec<String> = report
            .factions
            .iter()
            .map(|(name, count)| format!("{name}: {count}"))
            .collect();
        layout.kv("Factions", factions.join(", "));
    }

    layout.section("Validation");
    for missing in &report.unknown_cards {
        if missing.suggestions.is_empty() {
            layout.warn(format!("Unknown card: {}", missing.name));
        } else {
            layout.warn(format!(
                "Unknown card: {} (did you mean {}?)",
                missing.name,
                missing.suggestions.join(", ")
            ));
        }
    }
    for error in &report.validation.errors {
        layout.bullet(format!("error: {error}"));
    }
    for warning in &report.validation.warnings {
        layout.bullet(format!("warning: {warning}"));
    }
    layout.push_line(if report.valid { "Deck is valid." } else { "Deck is not valid." });
    layout.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<Card> {
        vec![
            Card::new("Torch", "Spell").with_cost(1, "{F}"),
            Card::new("Fire Sigil", "Power").with_cost(0, ""),
        ]
    }

    #[test]
    fn names_resolve_case_insensitively() {
        let file: DeckFile = serde_json::from_str(
            r#"{"name": "Burn", "cards": {"torch": 4, "Fire Sigil": 20, "Trch": 1}}"#,
        )
        .unwrap();
        let (deck, unknown) = build_deck(file, &pool()).unwrap();
        assert_eq!(deck.name, "Burn");
        assert_eq!(deck.total_cards(), 24);
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].name, "Trch");
        assert_eq!(unknown[0].suggestions.first().map(String::as_str), Some("Torch"));
    }

    #[test]
    fn over_limit_copies_reach_validation() {
        let file: DeckFile =
            serde_json::from_str(r#"{"cards": {"Torch": 6}, "market": ["Torch"]}"#).unwrap();
        let (deck, unknown) = build_deck(file, &pool()).unwrap();
        assert!(unknown.is_empty());
        assert_eq!(deck.market.as_ref().map(Vec::len), Some(1));
        let validation = deck.validate(&DeckRules::STANDARD);
        assert!(validation
            .errors
            .iter()
            .any(|e| e.starts_with("Torch: 6 copies")));
    }
}

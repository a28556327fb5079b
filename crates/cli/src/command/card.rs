use super::CommandContext;
use crate::catalog;
use crate::render::{card_details, HumanLayout};
use anyhow::{Context as _, Result};
use clap::Args;
use eternal_cards::Card;
use eternal_search::suggest;
use serde::Serialize;

const SUGGESTIONS: usize = 5;

#[derive(Args, Debug)]
pub struct CardArgs {
    /// Exact card name (case-insensitive)
    pub name: String,

    /// Output JSON format
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct CardLookup {
    name: String,
    found: bool,
    card: Option<Card>,
    suggestions: Vec<String>,
}

pub async fn run(args: CardArgs, ctx: &CommandContext) -> Result<()> {
    let client = catalog::card_client(&ctx.config)?;
    let cards = client
        .all_cards()
        .await
        .context("Failed to load the card catalog")?;

    let card = cards
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(args.name.trim()))
        .cloned();
    let suggestions = if card.is_none() {
        suggest(&args.name, cards.iter().map(|c| c.name.as_str()), SUGGESTIONS)
    } else {
        Vec::new()
    };
    let lookup = CardLookup {
        name: args.name,
        found: card.is_some(),
        card,
        suggestions,
    };

    if ctx.json {
        ctx.emit_json(&lookup)?;
    } else {
        crate::print_stdout(&render(&lookup))?;
    }
    if !lookup.found {
        std::process::exit(1);
    }
    Ok(())
}

fn render(lookup: &CardLookup) -> String {
    let mut layout = HumanLayout::new();
    match &lookup.card {
        Some(card) => card_details(&mut layout, card),
        None => {
            layout.warn(format!("Card not found: {}", lookup.name));
            if !lookup.suggestions.is_empty() {
                layout.push_line("Did you mean:");
                for name in &lookup.suggestions {
                    layout.bullet(name);
                }
            }
        }
    }
    layout.build()
}

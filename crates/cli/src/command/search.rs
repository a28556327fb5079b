use super::{CommandContext, FilterArgs};
use crate::catalog;
use crate::render::{card_line, HumanLayout};
use anyhow::Result;
use clap::Args;
use eternal_search::{SearchResult, DEFAULT_RESULTS};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query; omit to browse with filters only
    pub query: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Maximum number of results
    #[arg(long, short = 'n', default_value_t = DEFAULT_RESULTS)]
    pub limit: usize,

    /// Output JSON format
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: SearchArgs, ctx: &CommandContext) -> Result<()> {
    let filters = args.filters.to_filters()?;
    let cards = catalog::card_client(&ctx.config)?;
    let engine = catalog::search_engine(&ctx.config, &cards).await?;

    let query = args.query.as_deref().unwrap_or_default();
    let result = engine.search(query, &filters, args.limit).await;

    if ctx.json {
        return ctx.emit_json(&result);
    }
    crate::print_stdout(&render(&result))
}

fn render(result: &SearchResult) -> String {
    let mut layout = HumanLayout::new();
    layout.title(&result.query_interpretation);
    layout.kv("Mode", result.mode.as_str());
    layout.kv(
        "Found",
        format!(
            "{} cards ({} shown) in {:.3}s",
            result.total_found,
            result.cards.len(),
            result.search_time
        ),
    );
    let filters = result.filters_applied.describe();
    if !filters.is_empty() {
        layout.kv("Filters", filters.join("; "));
    }
    for missing in &result.unresolved {
        if missing.suggestions.is_empty() {
            layout.warn(format!("Card not found: {}", missing.name));
        } else {
            layout.warn(format!(
                "Card not found: {} (did you mean {}?)",
                missing.name,
                missing.suggestions.join(", ")
            ));
        }
    }

    layout.section("Cards");
    for card in &result.cards {
        layout.push_line(card_line(card));
    }
    if result.cards.is_empty() {
        layout.push_line("No cards match.");
    }
    layout.build()
}

use super::{CommandContext, FilterArgs};
use crate::catalog;
use crate::render::{card_line, pool_stats, HumanLayout};
use anyhow::{Context as _, Result};
use clap::Args;
use eternal_cards::PoolStats;
use eternal_scout::{tier, CardMentionRefiner, PoolTier, ScoutResult, StrategyScout};
use serde::Serialize;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct ScoutArgs {
    /// Free-text strategy, e.g. "aggressive fire burn with oni"
    ///
    /// Catalog card names found in the text become must-include cards,
    /// negated or not: "no torch" still pulls Torch in. Pass
    /// `--exclude Torch` to keep it out; exclusion always wins.
    pub strategy: String,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Cards to print from the pool (0 prints all)
    #[arg(long, default_value_t = 60)]
    pub limit: usize,

    /// Output JSON format
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ScoutOutput<'a> {
    #[serde(flatten)]
    result: &'a ScoutResult,
    pool_stats: &'a PoolStats,
}

pub async fn run(args: ScoutArgs, ctx: &CommandContext) -> Result<()> {
    let filters = if args.filters.is_empty() {
        None
    } else {
        Some(args.filters.to_filters()?)
    };

    let cards = catalog::card_client(&ctx.config)?;
    let engine = catalog::search_engine(&ctx.config, &cards).await?;
    let refiner = CardMentionRefiner::new(engine.cards().iter().map(|c| c.name.as_str()))
        .context("Failed to index card names")?;
    let scout = StrategyScout::new(Arc::new(engine)).with_refiner(refiner);

    let mut result = scout
        .analyze_and_scout(&args.strategy, filters)
        .await
        .context("Scouting failed")?;
    let stats = PoolStats::from_cards(&result.card_pool);

    if ctx.json {
        if args.limit > 0 {
            result.card_pool.truncate(args.limit);
        }
        return ctx.emit_json(&ScoutOutput {
            result: &result,
            pool_stats: &stats,
        });
    }
    crate::print_stdout(&render(&result, &stats, args.limit))
}

fn tier_label(tier: PoolTier) -> &'static str {
    match tier {
        PoolTier::MustInclude => "must",
        PoolTier::Core => "core",
        PoolTier::Synergy => "synergy",
        PoolTier::Support => "support",
    }
}

fn render(result: &ScoutResult, stats: &PoolStats, limit: usize) -> String {
    let strategy = &result.strategy;
    let mut layout = HumanLayout::new();
    layout.title("Strategy");
    layout.kv("Summary", strategy.summary());
    if !strategy.key_mechanics.is_empty() {
        layout.kv("Mechanics", strategy.key_mechanics.join(", "));
    }
    if !strategy.must_include_cards.is_empty() {
        layout.kv("Must include", strategy.must_include_cards.join(", "));
    }
    if !strategy.market_preference {
        layout.kv("Market", "not used");
    }
    layout.kv(
        "Queries",
        format!(
            "{} in {:.2}s",
            result.search_metadata.queries_executed, result.execution_time
        ),
    );

    layout.section(&format!("Card pool ({} cards)", result.pool_size));
    let shown = if limit == 0 { result.card_pool.len() } else { limit };
    for card in result.card_pool.iter().take(shown) {
        layout.push_line(format!(
            "{:>8}  {}",
            tier_label(tier(card, strategy)),
            card_line(card)
        ));
    }
    if result.card_pool.len() > shown {
        layout.push_line(format!(
            "... {} more (use --limit 0 to show all)",
            result.card_pool.len() - shown
        ));
    }

    layout.section("Pool statistics");
    pool_stats(&mut layout, stats);
    layout.build()
}

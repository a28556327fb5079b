use super::CommandContext;
use crate::catalog;
use crate::render::HumanLayout;
use anyhow::{bail, Context as _, Result};
use clap::Args;
use dialoguer::Confirm;
use eternal_indexer::{
    reset_database, CollectionStats, KnowledgeBaseSetup, ProgressSink, SetupConfig, SetupReport,
    TestCase, TestHit,
};
use eternal_vector_store::paths::{vectordb_dir, CARDS_COLLECTION};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::sync::Mutex;

#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Index only a small slice of the catalog and run the test queries
    #[arg(long)]
    pub test: bool,

    /// Print collection counts and exit
    #[arg(long, conflicts_with_all = ["search", "reset", "reprocess_mechanics"])]
    pub stats: bool,

    /// Run one query against a collection and exit
    #[arg(long, value_name = "QUERY", conflicts_with_all = ["reset", "reprocess_mechanics"])]
    pub search: Option<String>,

    /// Collection for --search
    #[arg(long, default_value = CARDS_COLLECTION)]
    pub collection: String,

    /// Results for --search
    #[arg(short = 'n', long, default_value_t = 5)]
    pub results: usize,

    /// Delete the knowledge base and exit
    #[arg(long, conflicts_with = "reprocess_mechanics")]
    pub reset: bool,

    /// Drop the mechanics collection so the next setup rebuilds only it
    #[arg(long)]
    pub reprocess_mechanics: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Output JSON format
    #[arg(long)]
    pub json: bool,
}

/// Progress bars for a build, one per collection.
struct BarProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl BarProgress {
    fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        if let Ok(mut guard) = self.bar.lock() {
            f(&mut guard);
        }
    }
}

impl ProgressSink for BarProgress {
    fn start(&self, collection: &str, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message(collection.to_string());
        self.with_bar(|slot| {
            if let Some(old) = slot.replace(bar) {
                old.finish_and_clear();
            }
        });
    }

    fn advance(&self, _collection: &str, processed: usize) {
        self.with_bar(|slot| {
            if let Some(bar) = slot.as_ref() {
                bar.set_position(processed as u64);
            }
        });
    }

    fn finish(&self, collection: &str) {
        self.with_bar(|slot| {
            if let Some(bar) = slot.take() {
                bar.finish_with_message(format!("{collection} done"));
            }
        });
    }
}

#[derive(Serialize)]
struct BuildOutput {
    #[serde(flatten)]
    report: SetupReport,
    backup: Option<String>,
    tests: Vec<TestCase>,
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    collection: &'a str,
    query: &'a str,
    hits: Vec<TestHit>,
}

#[derive(Serialize)]
struct ActionOutput {
    action: &'static str,
    done: bool,
}

fn confirm(args: &SetupArgs, ctx: &CommandContext, prompt: &str) -> Result<bool> {
    if args.yes {
        return Ok(true);
    }
    if ctx.json {
        bail!("Pass --yes to confirm in JSON mode");
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

pub async fn run(args: SetupArgs, ctx: &CommandContext) -> Result<()> {
    let data_dir = ctx.config.data_dir.clone();
    let setup_config = SetupConfig::new(&data_dir).with_test_mode(args.test);

    if args.reset {
        let db_dir = vectordb_dir(&data_dir);
        let prompt = format!("Delete the knowledge base at {}?", db_dir.display());
        let done = confirm(&args, ctx, &prompt)?;
        if done {
            reset_database(&data_dir)
                .await
                .context("Failed to reset the knowledge base")?;
        }
        return emit_action(ctx, "reset", done);
    }

    let model = catalog::embedding_model(&ctx.config)?;

    if args.stats {
        let setup = KnowledgeBaseSetup::open(setup_config, model).await?;
        let stats = setup.statistics();
        if ctx.json {
            return ctx.emit_json(&stats);
        }
        let mut layout = HumanLayout::new();
        layout.title("Knowledge base");
        render_stats(&mut layout, &stats);
        return crate::print_stdout(&layout.build());
    }

    if let Some(query) = args.search.as_deref() {
        let setup = KnowledgeBaseSetup::open(setup_config, model).await?;
        let hits = setup
            .test_search(&args.collection, query, args.results)
            .await
            .with_context(|| format!("Search in {} failed", args.collection))?;
        let output = SearchOutput {
            collection: &args.collection,
            query,
            hits,
        };
        if ctx.json {
            return ctx.emit_json(&output);
        }
        let mut layout = HumanLayout::new();
        layout.title(&format!("'{}' in {}", output.query, output.collection));
        render_hits(&mut layout, &output.hits);
        return crate::print_stdout(&layout.build());
    }

    if args.reprocess_mechanics {
        let done = confirm(&args, ctx, "Delete the mechanics collection for reprocessing?")?;
        if done {
            let mut setup = KnowledgeBaseSetup::open(setup_config, model).await?;
            setup.prepare_mechanics_reprocess().await?;
            if !ctx.json {
                crate::print_stdout("Mechanics cleared. Run `eternal-scout setup` to rebuild them.")?;
                return Ok(());
            }
        }
        return emit_action(ctx, "reprocess_mechanics", done);
    }

    let cards = catalog::card_client(&ctx.config)?;
    let mut setup = KnowledgeBaseSetup::new(setup_config, model).await?;
    if !ctx.json {
        setup = setup.with_progress(BarProgress::new());
    }
    let backup = setup.backup_path().map(|p| p.display().to_string());
    let report = setup
        .setup_all_collections(&cards)
        .await
        .context("Knowledge base setup failed")?;
    let tests = if args.test {
        setup.run_test_suite().await
    } else {
        Vec::new()
    };

    let output = BuildOutput {
        report,
        backup,
        tests,
    };
    if ctx.json {
        return ctx.emit_json(&output);
    }
    crate::print_stdout(&render_build(&output))
}

fn emit_action(ctx: &CommandContext, action: &'static str, done: bool) -> Result<()> {
    if ctx.json {
        return ctx.emit_json(&ActionOutput { action, done });
    }
    crate::print_stdout(if done { "Done." } else { "Cancelled." })
}

fn render_stats(layout: &mut HumanLayout, stats: &[CollectionStats]) {
    for stat in stats {
        match stat.count {
            Some(count) => layout.kv(&stat.name, format!("{count} items")),
            None => layout.kv(&stat.name, "missing"),
        };
    }
}

fn render_hits(layout: &mut HumanLayout, hits: &[TestHit]) {
    if hits.is_empty() {
        layout.push_line("No results.");
    }
    for (i, hit) in hits.iter().enumerate() {
        layout.push_line(format!(
            "{}. {} ({}, distance {:.3})",
            i + 1,
            hit.name,
            hit.kind,
            hit.distance
        ));
        layout.push_line(format!("   {}", hit.preview));
    }
}

fn render_build(output: &BuildOutput) -> String {
    let report = &output.report;
    let mut layout = HumanLayout::new();
    layout.title("Knowledge base ready");
    layout.kv("Cards", report.cards.to_string());
    layout.kv("Mechanics", report.mechanics.to_string());
    layout.kv("Discoveries", report.discoveries.to_string());
    layout.kv("Elapsed", format!("{:.1}s", report.elapsed_seconds));
    if let Some(backup) = &output.backup {
        layout.kv("Backup", backup);
    }
    layout.section("Collections");
    render_stats(&mut layout, &report.statistics);

    for case in &output.tests {
        layout.section(&format!("'{}' in {}", case.query, case.collection));
        match &case.error {
            Some(err) => {
                layout.warn(err);
            }
            None => render_hits(&mut layout, &case.hits),
        }
    }
    layout.build()
}

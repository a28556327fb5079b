use super::CommandContext;
use crate::config::ConfigStatus;
use crate::render::HumanLayout;
use anyhow::Result;
use clap::Args;
use eternal_vector_store::paths::vectordb_dir;
use eternal_vector_store::{current_embedding_mode_id, current_model_id};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output JSON format
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusReport {
    config_file: Option<String>,
    card_source: String,
    data_dir: String,
    knowledge_base: bool,
    embedding_mode: String,
    embedding_model: String,
    expedition_sets: Vec<String>,
    #[serde(flatten)]
    checks: ConfigStatus,
}

pub async fn run(_args: StatusArgs, ctx: &CommandContext) -> Result<()> {
    let config = &ctx.config;
    let card_source = match &config.cards_file {
        Some(path) => format!("file {}", path.display()),
        None => format!("sheet {} ({})", config.sheets_id, config.sheets_range),
    };
    let embedding_mode = current_embedding_mode_id()
        .map_or_else(|err| format!("invalid ({err})"), str::to_string);
    let embedding_model =
        current_model_id().unwrap_or_else(|err| format!("invalid ({err})"));
    let report = StatusReport {
        config_file: config.loaded_from.as_ref().map(|p| p.display().to_string()),
        card_source,
        data_dir: config.data_dir.display().to_string(),
        knowledge_base: vectordb_dir(&config.data_dir).is_dir(),
        embedding_mode,
        embedding_model,
        expedition_sets: config.expedition_sets.clone(),
        checks: config.validate(),
    };

    if ctx.json {
        return ctx.emit_json(&report);
    }
    crate::print_stdout(&render(&report))
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn render(report: &StatusReport) -> String {
    let mut layout = HumanLayout::new();
    layout.title("Eternal scout status");
    layout.kv(
        "Config file",
        report.config_file.as_deref().unwrap_or("(defaults)"),
    );
    layout.kv("Card source", &report.card_source);
    layout.kv("Data dir", &report.data_dir);
    layout.kv(
        "Knowledge base",
        if report.knowledge_base {
            "built"
        } else {
            "missing (run `eternal-scout setup`)"
        },
    );
    layout.kv(
        "Embeddings",
        format!("{} ({})", report.embedding_model, report.embedding_mode),
    );
    if !report.expedition_sets.is_empty() {
        layout.kv("Expedition sets", report.expedition_sets.join(", "));
    }

    layout.section("Checks");
    let checks = &report.checks;
    layout.kv("OpenAI key", yes_no(checks.openai));
    layout.kv("Sheet id", yes_no(checks.sheets_id));
    layout.kv("Sheets API key", yes_no(checks.sheets_api_key));
    layout.kv("Credentials", yes_no(checks.sheets_creds));
    layout.kv("Cards file", yes_no(checks.cards_file));
    for warning in &checks.warnings {
        layout.warn(warning);
    }
    layout.build()
}

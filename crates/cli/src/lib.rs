use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use command::{
    card::CardArgs, deck::DeckArgs, scout::ScoutArgs, search::SearchArgs, setup::SetupArgs,
    skill::SkillArgs, status::StatusArgs, CommandContext,
};
use config::{AppConfig, ConfigOverrides};
use std::io;
use std::path::PathBuf;

mod catalog;
mod command;
mod config;
mod render;

pub(crate) fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "eternal-scout")]
#[command(about = "Card pool scouting and deck tools for Eternal", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Override embedding backend in this process
    #[arg(long, global = true, value_enum)]
    embed_mode: Option<EmbedMode>,

    /// Override embedding model id
    #[arg(long, global = true)]
    embed_model: Option<String>,

    /// Config file (default: ./eternal.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Card catalog as a JSON export instead of the Google sheet
    #[arg(long, global = true)]
    cards_file: Option<PathBuf>,

    /// Directory holding the vector database and backups
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn a strategy description into an organized card pool
    Scout(ScoutArgs),

    /// Search the card catalog
    Search(SearchArgs),

    /// Show one card
    Card(CardArgs),

    /// Build or inspect the knowledge base
    Setup(SetupArgs),

    /// Validate a deck list
    Deck(DeckArgs),

    /// Look up a keyword and its synergies
    Skill(SkillArgs),

    /// Show configuration and knowledge base status
    Status(StatusArgs),
}

#[derive(Copy, Clone, ValueEnum)]
enum EmbedMode {
    Fast,
    Stub,
}

impl EmbedMode {
    const fn as_str(self) -> &'static str {
        match self {
            EmbedMode::Fast => "fast",
            EmbedMode::Stub => "stub",
        }
    }
}

impl Commands {
    fn json(&self) -> bool {
        match self {
            Commands::Scout(args) => args.json,
            Commands::Search(args) => args.json,
            Commands::Card(args) => args.json,
            Commands::Setup(args) => args.json,
            Commands::Deck(args) => args.json,
            Commands::Skill(args) => args.json,
            Commands::Status(args) => args.json,
        }
    }
}

fn init_logging(quiet: bool, verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // The ONNX runtime logs every session it builds.
    if !verbose {
        builder.filter_module("ort", log::LevelFilter::Off);
        builder.filter_module("fastembed", log::LevelFilter::Off);
    }
    builder.target(env_logger::Target::Stderr).init();
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON parsing
    let json_output = cli.command.json();
    if json_output {
        cli.quiet = true;
    }
    init_logging(cli.quiet, cli.verbose);

    let overrides = ConfigOverrides {
        cards_file: cli.cards_file.clone(),
        data_dir: cli.data_dir.clone(),
        embedding_mode: cli.embed_mode.map(|m| m.as_str().to_string()),
        embedding_model: cli.embed_model.clone(),
    };
    let config = AppConfig::load(cli.config.as_deref(), &overrides)?;
    config.export_embedding_env();
    log::debug!(
        "Loaded config from {}",
        config
            .loaded_from
            .as_ref()
            .map_or_else(|| "defaults".to_string(), |p| p.display().to_string())
    );

    let ctx = CommandContext {
        config,
        json: json_output,
    };
    match cli.command {
        Commands::Scout(args) => command::scout::run(args, &ctx).await,
        Commands::Search(args) => command::search::run(args, &ctx).await,
        Commands::Card(args) => command::card::run(args, &ctx).await,
        Commands::Setup(args) => command::setup::run(args, &ctx).await,
        Commands::Deck(args) => command::deck::run(args, &ctx).await,
        Commands::Skill(args) => command::skill::run(args, &ctx).await,
        Commands::Status(args) => command::status::run(args, &ctx).await,
    }
}

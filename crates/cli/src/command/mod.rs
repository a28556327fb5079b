pub mod card;
pub mod deck;
pub mod scout;
pub mod search;
pub mod setup;
pub mod skill;
pub mod status;

use crate::config::AppConfig;
use anyhow::{bail, Context as _, Result};
use clap::Args;
use eternal_cards::{GameFormat, Rarity};
use eternal_search::SearchFilters;
use serde::Serialize;

/// Shared state handed to every command.
pub struct CommandContext {
    pub config: AppConfig,
    pub json: bool,
}

impl CommandContext {
    /// Pretty JSON on stdout.
    pub fn emit_json<T: Serialize>(&self, value: &T) -> Result<()> {
        crate::print_stdout(&serde_json::to_string_pretty(value)?)
    }
}

/// Search constraints shared by `scout` and `search`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Allowed faction, repeatable (e.g. --faction Fire --faction Shadow)
    #[arg(long = "faction", value_name = "FACTION")]
    pub factions: Vec<String>,

    /// Maximum factions per card; only applies with --faction, 0 means no limit
    #[arg(long)]
    pub max_factions: Option<usize>,

    /// Game format: throne or expedition
    #[arg(long)]
    pub format: Option<String>,

    /// Highest rarity to include: common, uncommon, rare, legendary
    #[arg(long)]
    pub max_rarity: Option<String>,

    #[arg(long)]
    pub min_cost: Option<u32>,

    #[arg(long)]
    pub max_cost: Option<u32>,

    /// Card type, repeatable (unit, spell, power, ...)
    #[arg(long = "type", value_name = "TYPE")]
    pub card_types: Vec<String>,

    /// Unit type, repeatable (e.g. Valkyrie)
    #[arg(long = "unit-type", value_name = "UNIT_TYPE")]
    pub unit_types: Vec<String>,

    /// Card that must be in the results, repeatable
    #[arg(long = "include", value_name = "CARD")]
    pub include: Vec<String>,

    /// Card that must not be in the results, repeatable
    #[arg(long = "exclude", value_name = "CARD")]
    pub exclude: Vec<String>,

    /// Drop cards that can access the market
    #[arg(long)]
    pub no_market: bool,

    /// Keep only cards that can access the market
    #[arg(long, conflicts_with = "no_market")]
    pub market_only: bool,
}

impl FilterArgs {
    pub fn to_filters(&self) -> Result<SearchFilters> {
        let format = match &self.format {
            Some(raw) => raw
                .parse::<GameFormat>()
                .with_context(|| format!("Invalid --format '{raw}'"))?,
            None => GameFormat::default(),
        };
        let max_rarity = match &self.max_rarity {
            Some(raw) => match Rarity::parse(raw) {
                Some(rarity) => Some(rarity),
                None => bail!("Invalid --max-rarity '{raw}'"),
            },
            None => None,
        };
        if let (Some(min), Some(max)) = (self.min_cost, self.max_cost) {
            if min > max {
                bail!("--min-cost {min} is greater than --max-cost {max}");
            }
        }
        Ok(SearchFilters {
            allowed_factions: self.factions.clone(),
            max_factions_per_card: self.max_factions,
            format,
            max_rarity,
            archetype: None,
            min_cost: self.min_cost,
            max_cost: self.max_cost,
            card_types: self.card_types.clone(),
            unit_types: self.unit_types.clone(),
            must_include: self.include.clone(),
            must_exclude: self.exclude.clone(),
            include_market: !self.no_market,
            market_access_only: self.market_only,
        })
    }

    /// True when no flag was given.
    pub fn is_empty(&self) -> bool {
        self.to_filters()
            .map_or(false, |filters| filters == SearchFilters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_become_filters() {
        let args = FilterArgs {
            factions: vec!["Fire".into()],
            format: Some("Expedition".into()),
            max_rarity: Some("rare".into()),
            no_market: true,
            include: vec!["Torch".into()],
            ..FilterArgs::default()
        };
        let filters = args.to_filters().unwrap();
        assert_eq!(filters.format, GameFormat::Expedition);
        assert_eq!(filters.max_rarity, Some(Rarity::Rare));
        assert!(!filters.include_market);
        assert_eq!(filters.must_include, vec!["Torch".to_string()]);
        assert!(!args.is_empty());
        assert!(FilterArgs::default().is_empty());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_format = FilterArgs {
            format: Some("draft".into()),
            ..FilterArgs::default()
        };
        assert!(bad_format.to_filters().is_err());

        let inverted = FilterArgs {
            min_cost: Some(5),
            max_cost: Some(2),
            ..FilterArgs::default()
        };
        assert!(inverted.to_filters().is_err());
    }
}

use console::style;
use eternal_cards::{Card, Faction, PoolStats};
use std::collections::BTreeMap;

/// Line-oriented builder for human output.
pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 16,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push(String::new());
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(String::new());
        self.lines.push(style(text).bold().to_string());
        self.lines.push("-".repeat(text.len().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: impl AsRef<str>) -> &mut Self {
        let key = format!("{key:width$}", width = self.key_width);
        self.lines
            .push(format!("{} {}", style(key).dim(), value.as_ref()));
        self
    }

    pub fn bullet(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.lines.push(format!("- {}", text.as_ref()));
        self
    }

    pub fn warn(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.lines
            .push(format!("{} {}", style("!").yellow().bold(), text.as_ref()));
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    pub fn build(&self) -> String {
        self.lines.join("\n")
    }
}

/// Influence string with each faction symbol in its faction color.
pub fn colored_influence(influence: &str) -> String {
    let mut out = influence.to_string();
    for faction in Faction::ALL {
        let painted = match faction {
            Faction::Fire => style(faction.symbol()).red(),
            Faction::Time => style(faction.symbol()).yellow(),
            Faction::Justice => style(faction.symbol()).green(),
            Faction::Primal => style(faction.symbol()).blue(),
            Faction::Shadow => style(faction.symbol()).magenta(),
        };
        out = out.replace(faction.symbol(), &painted.to_string());
    }
    out
}

/// `Torch  1{F}  Spell  Common`
pub fn card_line(card: &Card) -> String {
    let mut line = format!(
        "{}  {}{}  {}",
        style(&card.name).bold(),
        card.cost,
        colored_influence(&card.influence),
        card.card_type
    );
    if let (Some(attack), Some(health)) = (card.attack, card.health) {
        if card.is_unit() {
            line.push_str(&format!(" {attack}/{health}"));
        }
    }
    if !card.rarity.is_empty() {
        line.push_str(&format!("  {}", style(&card.rarity).dim()));
    }
    line
}

pub fn card_details(layout: &mut HumanLayout, card: &Card) {
    layout.title(&card.name);
    layout.kv("Cost", format!("{}{}", card.cost, colored_influence(&card.influence)));
    layout.kv("Type", &card.card_type);
    if !card.unit_types.is_empty() {
        layout.kv("Unit types", card.unit_types.join(", "));
    }
    if let (Some(attack), Some(health)) = (card.attack, card.health) {
        layout.kv("Stats", format!("{attack}/{health}"));
    }
    let factions: Vec<&str> = card.factions().into_iter().map(Faction::name).collect();
    if !factions.is_empty() {
        layout.kv("Factions", factions.join(", "));
    }
    layout.kv("Rarity", &card.rarity);
    layout.kv("Set", &card.set_number);
    if card.can_access_market() {
        layout.kv("Market", "can access the market");
    }
    if let Some(url) = &card.image_url {
        layout.kv("Image", url);
    }
    if !card.card_text.is_empty() {
        layout.push_line(String::new());
        layout.push_line(card.card_text.clone());
    }
}

fn counts_line<K: std::fmt::Display>(counts: &BTreeMap<K, usize>) -> String {
    counts
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn pool_stats(layout: &mut HumanLayout, stats: &PoolStats) {
    layout.kv("By type", counts_line(&stats.by_type));
    layout.kv("By rarity", counts_line(&stats.by_rarity));
    layout.kv("Cost curve", counts_line(&stats.cost_curve));
}

use super::CommandContext;
use crate::render::HumanLayout;
use anyhow::Result;
use clap::Args;
use eternal_knowledge::{all_skills, skill, skill_counters, synergistic_skills, Skill};
use eternal_search::suggest;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct SkillArgs {
    /// Keyword name, e.g. "Quickdraw"; omit to list every keyword
    pub name: Option<String>,

    /// Output JSON format
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct Synergy {
    skill: &'static str,
    strength: u8,
}

#[derive(Serialize)]
struct SkillReport {
    skill: &'static Skill,
    synergistic: Vec<Synergy>,
    counters: &'static [&'static str],
}

#[derive(Serialize)]
struct SkillMissing<'a> {
    name: &'a str,
    found: bool,
    suggestions: Vec<String>,
}

pub async fn run(args: SkillArgs, ctx: &CommandContext) -> Result<()> {
    let Some(name) = args.name.as_deref() else {
        return list(ctx);
    };

    let Some(found) = skill(name) else {
        let missing = SkillMissing {
            name,
            found: false,
            suggestions: suggest(name, all_skills().map(|s| s.name), 5),
        };
        if ctx.json {
            ctx.emit_json(&missing)?;
        } else {
            let mut layout = HumanLayout::new();
            layout.warn(format!("Unknown keyword: {name}"));
            for suggestion in &missing.suggestions {
                layout.bullet(suggestion);
            }
            crate::print_stdout(&layout.build())?;
        }
        std::process::exit(1);
    };

    let report = SkillReport {
        skill: found,
        synergistic: synergistic_skills(found.name)
            .into_iter()
            .map(|(skill, strength)| Synergy { skill, strength })
            .collect(),
        counters: skill_counters(found.name),
    };
    if ctx.json {
        return ctx.emit_json(&report);
    }
    crate::print_stdout(&render(&report))
}

fn list(ctx: &CommandContext) -> Result<()> {
    let mut skills: Vec<&Skill> = all_skills().collect();
    skills.sort_by_key(|s| s.name);
    if ctx.json {
        return ctx.emit_json(&skills);
    }
    let mut layout = HumanLayout::new();
    layout.title("Keywords");
    for s in skills {
        layout.kv(s.name, s.description);
    }
    crate::print_stdout(&layout.build())
}

fn render(report: &SkillReport) -> String {
    let s = report.skill;
    let mut layout = HumanLayout::new();
    layout.title(s.name);
    layout.push_line(s.description);
    layout.push_line(String::new());
    layout.kv("Kind", format!("{:?}", s.kind));
    layout.kv("Power level", format!("{}/5", s.power_level.value()));
    layout.kv("Complexity", format!("{}/3", s.complexity.value()));
    layout.kv("Combo potential", format!("{}/5", s.combo_potential));
    if !s.archetypes.is_empty() {
        layout.kv("Archetypes", s.archetypes.join(", "));
    }
    if !s.deck_role.is_empty() {
        layout.kv("Deck role", s.deck_role.join(", "));
    }
    if !s.rarity_trend.is_empty() {
        layout.kv("Rarity trend", s.rarity_trend);
    }

    if !report.synergistic.is_empty() {
        layout.section("Synergies");
        for synergy in &report.synergistic {
            layout.bullet(format!("{} ({}/5)", synergy.skill, synergy.strength));
        }
    }
    if !s.synergies.is_empty() {
        layout.section("Works with");
        for note in s.synergies {
            layout.bullet(note);
        }
    }
    if !report.counters.is_empty() {
        layout.section("Countered by");
        for counter in report.counters {
            layout.bullet(counter);
        }
    }
    layout.build()
}

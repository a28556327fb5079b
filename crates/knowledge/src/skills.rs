use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PowerLevel {
    Weak = 1,
    Moderate = 2,
    Good = 3,
    Strong = 4,
    VeryStrong = 5,
}

impl PowerLevel {
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Complexity {
    Simple = 1,
    Moderate = 2,
    Complex = 3,
}

impl Complexity {
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }
}

/// Battle skills appear on units in combat; the rest are card-level keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkillKind {
    Battle,
    Other,
}

/// A game keyword with the reference data used for embedding and advice.
#[derive(Debug, Clone, Serialize)]
pub struct Skill {
    pub name: &'static str,
    pub kind: SkillKind,
    pub description: &'static str,
    pub synergies: &'static [&'static str],
    pub counters: &'static [&'static str],
    pub archetypes: &'static [&'static str],
    /// Extra search terms appended to the skill's document.
    pub embed_text: &'static str,
    pub power_level: PowerLevel,
    pub complexity: Complexity,
    pub rarity_trend: &'static str,
    pub deck_role: &'static [&'static str],
    pub combo_potential: u8,
}

macro_rules! skill {
    (
        $name:literal, $kind:ident, $desc:literal,
        syn: [$($syn:literal),* $(,)?],
        counters: [$($ctr:literal),* $(,)?],
        arch: [$($arch:literal),* $(,)?],
        embed: $embed:literal,
        power: $power:ident, complexity: $cx:ident, rarity: $rarity:literal,
        role: [$($role:literal),* $(,)?],
        combo: $combo:literal $(,)?
    ) => {
        Skill {
            name: $name,
            kind: SkillKind::$kind,
            description: $desc,
            synergies: &[$($syn),*],
            counters: &[$($ctr),*],
            archetypes: &[$($arch),*],
            embed_text: $embed,
            power_level: PowerLevel::$power,
            complexity: Complexity::$cx,
            rarity_trend: $rarity,
            deck_role: &[$($role),*],
            combo_potential: $combo,
        }
    };
}

pub const BATTLE_SKILLS: &[Skill] = &[
    skill!("Aegis", Battle, "Protected from one enemy spell or effect (but not from battle damage)",
        syn: ["voltron strategies", "key units", "finishers", "relic weapons"],
        counters: ["killer", "transform effects", "silence", "relic removal"],
        arch: ["midrange", "control", "voltron"],
        embed: "Aegis protection shield spell immunity hexproof protective barrier defense against removal one-time protection",
        power: Strong, complexity: Simple, rarity: "uncommon_plus",
        role: ["protection", "finisher"], combo: 3),
    skill!("Berserk", Battle, "When this attacks, you may give it Reckless to attack a second time this turn. Can only be used once",
        syn: ["weapon buffs", "combat tricks", "overwhelm", "lifesteal", "pump spells"],
        counters: ["stun", "permafrost", "deadly blockers", "fast removal"],
        arch: ["aggro", "midrange", "weapons"],
        embed: "Berserk double attack twice aggressive combat multiple strikes reckless fury two attacks extra damage",
        power: Strong, complexity: Moderate, rarity: "uncommon_plus",
        role: ["damage", "pressure"], combo: 4),
    skill!("Charge", Battle, "Can attack the turn it is played",
        syn: ["aggro", "surprise attacks", "combat tricks", "weapons", "pump spells"],
        counters: ["ambush units", "fast removal", "permafrost"],
        arch: ["aggro", "burn", "tempo"],
        embed: "Charge immediate attack haste rush aggressive tempo surprise damage fast pressure no summoning sickness",
        power: Strong, complexity: Simple, rarity: "common",
        role: ["pressure", "finisher", "tempo"], combo: 3),
    skill!("Deadly", Battle, "Kills any unit it damages",
        syn: ["quickdraw", "small units", "ping damage", "killer", "taunt"],
        counters: ["aegis", "go-wide strategies", "flying", "overwhelm"],
        arch: ["control", "midrange", "removal"],
        embed: "Deadly deathtouch instant kill removal efficient trades destroy damage lethal poison assassin",
        power: Strong, complexity: Simple, rarity: "common",
        role: ["removal", "defense"], combo: 4),
    skill!("Decay", Battle, "Permanently reduces the strength and health of units and relic weapons it damages",
        syn: ["ping damage", "multi-hit", "relic weapons"],
        counters: ["deadly", "overwhelm", "go-wide"],
        arch: ["control", "grind"],
        embed: "Decay permanent reduction debuff weaken shrink stats lower attack health lasting effect",
        power: Moderate, complexity: Moderate, rarity: "rare_plus",
        role: ["control", "value"], combo: 2),
    skill!("Double Damage", Battle, "Deals double damage",
        syn: ["overwhelm", "pump spells", "berserk", "killer", "relic weapons"],
        counters: ["chump blockers", "deadly", "permafrost"],
        arch: ["aggro", "combo", "burn"],
        embed: "Double damage twice multiplier burst high damage amplify power overwhelming force",
        power: Strong, complexity: Simple, rarity: "rare_plus",
        role: ["finisher", "burst"], combo: 5),
    skill!("Endurance", Battle, "Readies at the end of your turn, can't be stunned, and can't be exhausted except to pay costs",
        syn: ["tap abilities", "multiple blocks", "killer"],
        counters: ["silence", "transform", "hard removal"],
        arch: ["control", "midrange"],
        embed: "Endurance ready untap vigilance stun immunity no exhaustion multiple uses defensive",
        power: Good, complexity: Simple, rarity: "uncommon_plus",
        role: ["defense", "utility"], combo: 3),
    skill!("Exalted", Battle, "When this unit dies, play a weapon with its stats and battle skills on one of your units",
        syn: ["sacrifice effects", "weapon synergies", "revenge"],
        counters: ["silence", "transform", "void hate"],
        arch: ["midrange", "weapons", "value"],
        embed: "Exalted death trigger weapon creation inheritance stats transfer battle skills lasting value",
        power: Good, complexity: Moderate, rarity: "rare_plus",
        role: ["value", "resilience"], combo: 3),
    skill!("Flying", Battle, "Can only be blocked by other units with flying",
        syn: ["weapons", "pump spells", "aegis", "combat tricks"],
        counters: ["reach units", "flying blockers", "sandstorm titan", "removal"],
        arch: ["aggro", "midrange", "control finishers"],
        embed: "Flying evasion aerial airborne unblockable bypass ground units wings flight soar",
        power: Strong, complexity: Simple, rarity: "common",
        role: ["evasion", "finisher"], combo: 3),
    skill!("Killer", Battle, "May be exhausted one time to attack any enemy unit",
        syn: ["deadly", "pump spells", "endurance", "summon effects"],
        counters: ["aegis", "ambush blockers", "fast removal"],
        arch: ["control", "removal", "midrange"],
        embed: "Killer targeted removal fight destroy unit direct attack assassinate execute",
        power: Strong, complexity: Moderate, rarity: "uncommon_plus",
        role: ["removal", "utility"], combo: 4),
    skill!("Lifesteal", Battle, "When this deals damage, you gain that much health",
        syn: ["bolster", "berserk", "double damage", "overwhelm", "pump spells"],
        counters: ["face aegis", "stun", "permafrost"],
        arch: ["midrange", "control", "lifegain"],
        embed: "Lifesteal healing drain life gain health vampire sustain recovery lifelink",
        power: Strong, complexity: Simple, rarity: "common",
        role: ["sustain", "stabilization"], combo: 5),
    skill!("Nomad", Battle, "This unit has Flying on your turn and +X/+X on the enemy turn",
        syn: ["combat tricks", "weapons", "pump spells"],
        counters: ["removal on your turn", "stun effects"],
        arch: ["tempo", "midrange"],
        embed: "Nomad flying shifting stats defensive offensive mode change adaptation versatile",
        power: Good, complexity: Moderate, rarity: "rare",
        role: ["versatile", "tempo"], combo: 2),
    skill!("Overwhelm", Battle, "When this hits an enemy unit, leftover damage is dealt to the enemy player or site",
        syn: ["pump spells", "double damage", "berserk", "killer"],
        counters: ["high health blockers", "deadly", "multiple blockers"],
        arch: ["aggro", "midrange", "finisher"],
        embed: "Overwhelm trample excess damage breakthrough pierce through blockers face damage",
        power: Strong, complexity: Simple, rarity: "uncommon_plus",
        role: ["pressure", "finisher"], combo: 4),
    skill!("Quickdraw", Battle, "When this kills a blocking unit, the blocker doesn't deal damage back",
        syn: ["deadly", "high attack", "pump spells", "weapons"],
        counters: ["overwhelm", "unblockable", "aegis"],
        arch: ["aggro", "midrange"],
        embed: "Quickdraw first strike fast damage priority speed quick reflexes",
        power: Good, complexity: Simple, rarity: "common",
        role: ["combat advantage"], combo: 5),
    skill!("Reckless", Battle, "This must attack",
        syn: ["high stats", "lifesteal", "overwhelm"],
        counters: ["deadly blockers", "combat tricks", "stun"],
        arch: ["aggro"],
        embed: "Reckless forced attack must attack aggressive downside berserker fury",
        power: Weak, complexity: Simple, rarity: "common",
        role: ["aggression"], combo: 2),
    skill!("Regen", Battle, "The first time a unit with Regen is dealt damage, prevent it",
        syn: ["revenge", "exalted", "weapons", "aegis"],
        counters: ["double damage", "overwhelm", "killer"],
        arch: ["midrange", "control"],
        embed: "Regen regeneration heal damage prevention shield protection resilience recovery",
        power: Good, complexity: Simple, rarity: "uncommon_plus",
        role: ["resilience"], combo: 3),
    skill!("Revenge", Battle, "The first time this is killed, give it Destiny and put it into the top ten cards of your deck",
        syn: ["warcry", "exalted", "sacrifice effects", "infiltrate"],
        counters: ["silence", "transform", "void hate"],
        arch: ["midrange", "value", "grind"],
        embed: "Revenge resurrect return destiny comeback value recursion second chance rebirth",
        power: Strong, complexity: Moderate, rarity: "rare",
        role: ["value", "recursion"], combo: 4),
    skill!("Taunt", Battle, "This unit must be blocked if possible",
        syn: ["deadly", "high health", "regen", "combat tricks"],
        counters: ["killer", "flying", "removal"],
        arch: ["control", "midrange"],
        embed: "Taunt forced block provoke challenge guardian defender protection",
        power: Good, complexity: Simple, rarity: "uncommon",
        role: ["protection", "control"], combo: 3),
    skill!("Unblockable", Battle, "Cannot be blocked",
        syn: ["weapons", "pump spells", "infiltrate", "combat tricks"],
        counters: ["face aegis", "armor", "lifesteal blockers"],
        arch: ["aggro", "combo"],
        embed: "Unblockable evasion unstoppable bypass guaranteed damage shadow sneak stealth",
        power: Strong, complexity: Simple, rarity: "rare",
        role: ["finisher", "inevitability"], combo: 3),
    skill!("Valor", Battle, "This unit gets +1/+1 this turn for each unit that blocks it",
        syn: ["overwhelm", "taunt", "multi-attack", "combat tricks"],
        counters: ["single blockers", "deadly", "removal"],
        arch: ["aggro", "combat"],
        embed: "Valor courage strength in numbers growing power multi-block punishment brave",
        power: Moderate, complexity: Moderate, rarity: "uncommon",
        role: ["combat trick"], combo: 2),
    skill!("Warcry", Battle, "When this attacks, the top unit or weapon of your deck gets +1/+1",
        syn: ["weapons", "echo units", "revenge", "charge units"],
        counters: ["face aegis on weapons", "control decks"],
        arch: ["aggro", "midrange", "weapons"],
        embed: "Warcry buff pump deck manipulation top card enhancement battle cry strengthen",
        power: Strong, complexity: Simple, rarity: "common",
        role: ["value", "aggression"], combo: 4),
];

pub const OTHER_SKILLS: &[Skill] = &[
    skill!("Ambush", Other, "Can be played to block an enemy attack or at the end of their turn",
        syn: ["instant speed tricks", "killer units", "summon effects", "combat tricks"],
        counters: ["torch after blocks", "sweepers", "harsh rule"],
        arch: ["tempo", "control", "tricks"],
        embed: "Ambush instant speed flash surprise blocker defensive trick end of turn unexpected",
        power: Strong, complexity: Moderate, rarity: "uncommon_plus",
        role: ["defense", "tempo"], combo: 4),
    skill!("Bond", Other, "When played, you may exhaust another unit of the same type to reduce this card's cost by the exhausted unit's power",
        syn: ["tribal decks", "go-wide strategies", "token generators"],
        counters: ["removal heavy", "board wipes"],
        arch: ["tribal", "aggro", "tempo"],
        embed: "Bond cost reduction tribal synergy exhaust creature type discount cheap",
        power: Good, complexity: Moderate, rarity: "common",
        role: ["cost reduction", "tempo"], combo: 3),
    skill!("Destiny", Other, "Automatically play when drawn, then draw another card",
        syn: ["echo", "revenge", "card draw", "warcry buffs"],
        counters: ["hand size limit", "counterspells"],
        arch: ["combo", "value", "tempo"],
        embed: "Destiny free play automatic draw card advantage tempo surprise value",
        power: VeryStrong, complexity: Simple, rarity: "rare_plus",
        role: ["tempo", "value"], combo: 5),
    skill!("Echo", Other, "Get an additional copy when drawn",
        syn: ["cost reduction", "warcry", "destiny", "card draw"],
        counters: ["hand size limit", "discard"],
        arch: ["value", "combo", "control"],
        embed: "Echo duplicate copy card advantage value two for one clone repeat",
        power: Strong, complexity: Simple, rarity: "uncommon_plus",
        role: ["value", "card advantage"], combo: 4),
    skill!("Imbue", Other, "When you play a unit with Imbue, you may stun one of your other units and keep it stunned. As long as it's stunned, this unit gets its stats",
        syn: ["summon effects", "infiltrate units", "sacrifice synergies"],
        counters: ["removal", "silence", "board wipes"],
        arch: ["combo", "midrange"],
        embed: "Imbue power steal stats transfer stun lock sacrifice enhance absorb",
        power: Moderate, complexity: Complex, rarity: "rare",
        role: ["power boost", "combo"], combo: 3),
    skill!("Inscribe", Other, "This card can be played as a depleted Sigil",
        syn: ["power consistency", "influence fixing", "late game value"],
        counters: ["aggro pressure", "face damage"],
        arch: ["control", "midrange", "3+ colors"],
        embed: "Inscribe flexibility power sigil modal choice consistency fixing",
        power: Strong, complexity: Moderate, rarity: "uncommon_plus",
        role: ["flexibility", "consistency"], combo: 2),
    skill!("Pledge", Other, "On your first turn, a card with Pledge can be played as a Sigil",
        syn: ["mulligan decisions", "power consistency", "aggro curves"],
        counters: ["late game irrelevance"],
        arch: ["aggro", "all decks"],
        embed: "Pledge first turn sigil power consistency early game flexibility",
        power: Good, complexity: Simple, rarity: "common",
        role: ["consistency"], combo: 1),
    skill!("Shift", Other, "Units with Shift may be played Shifted for their Shift cost. Shifted units can't attack, block, or be selected by any cards. Their passive abilities still function, and they can still be affected by global effects. Units remain Shifted for three turns, then emerge ready and gain Unblockable for the turn",
        syn: ["passive abilities", "global buffs", "setup strategies", "surprise attacks", "cost reduction", "protection timing", "combat tricks"],
        counters: ["harsh rule", "sack the city", "end of days", "setback", "passage of eons", "board stalls", "aggro pressure"],
        arch: ["control", "midrange", "tempo", "combo"],
        embed: "shift shifted emerge phase out untargetable hexproof protection three turns 3 turns alternate cost cheaper deploy early dodge removal setup attacker unblockable timing temporary immunity phasing vanish reappear",
        power: Strong, complexity: Complex, rarity: "rare_plus",
        role: ["protection", "tempo", "alternate cost", "setup"], combo: 4),
    skill!("Stealth", Other, "This unit is played hidden. It is revealed when it deals or takes damage, is affected by an enemy effect, or has anything played directly on it",
        syn: ["infiltrate", "weapons", "combat tricks", "surprise attacks"],
        counters: ["board wipes", "relic weapons"],
        arch: ["tempo", "aggro", "tricks"],
        embed: "Stealth hidden invisible concealed surprise infiltrate sneak undetected",
        power: Good, complexity: Moderate, rarity: "rare",
        role: ["surprise", "protection"], combo: 3),
    skill!("Swift", Other, "This spell doesn't give your opponent a chance to respond and can't be negated",
        syn: ["combo protection", "guaranteed effects", "burn"],
        counters: ["face aegis", "prevention effects"],
        arch: ["combo", "burn", "control"],
        embed: "Swift uncounterable guaranteed instant no response unstoppable certain",
        power: Strong, complexity: Simple, rarity: "rare_plus",
        role: ["reliability", "combo"], combo: 3),
    skill!("Unleash", Other, "When you play this card, create and draw a copy of it. Discard it at the end of the turn. The copy's cost can't be reduced",
        syn: ["spell damage", "combo pieces", "burst"],
        counters: ["hand size limit", "counterspells"],
        arch: ["combo", "burn"],
        embed: "Unleash copy temporary burst double cast amplify spell duplicate",
        power: Good, complexity: Moderate, rarity: "rare",
        role: ["burst", "combo"], combo: 4),
    skill!("Versatile", Other, "This can be played as either a relic weapon or unit weapon",
        syn: ["weapon matters", "empty board", "flexibility"],
        counters: ["weapon removal", "unit removal"],
        arch: ["weapons", "midrange"],
        embed: "Versatile flexible choice modal weapon relic unit adaptable option",
        power: Good, complexity: Moderate, rarity: "rare",
        role: ["flexibility"], combo: 2),
    skill!("Voidbound", Other, "This card can't leave the void",
        syn: ["void recursion", "entomb effects", "reanimator"],
        counters: ["silence in void", "void hate"],
        arch: ["reanimator", "void"],
        embed: "Voidbound stuck permanent void graveyard locked eternal rest",
        power: Weak, complexity: Simple, rarity: "rare",
        role: ["void strategy"], combo: 2),
    skill!("Warp", Other, "You can play this from the top of your deck",
        syn: ["scout", "deck manipulation", "card advantage"],
        counters: ["face aegis for spells", "counterspells"],
        arch: ["control", "value"],
        embed: "Warp top deck play library cast deck access immediate value",
        power: Strong, complexity: Moderate, rarity: "rare",
        role: ["value", "card advantage"], combo: 3),
];

/// Skills grouped by what they do for a deck.
pub const SKILL_CATEGORIES: &[(&str, &[&str])] = &[
    ("evasion", &["Flying", "Unblockable", "Stealth"]),
    ("protection", &["Aegis", "Regen", "Endurance", "Stealth"]),
    ("removal", &["Deadly", "Killer", "Decay"]),
    (
        "combat_advantage",
        &["Deadly", "Quickdraw", "Double Damage", "Berserk", "Overwhelm"],
    ),
    (
        "value_generation",
        &["Echo", "Destiny", "Revenge", "Warcry", "Exalted", "Warp"],
    ),
    ("tribal_synergy", &["Bond", "Imbue"]),
    ("resource_advantage", &["Lifesteal", "Inscribe", "Pledge"]),
    ("tempo", &["Charge", "Ambush", "Warp", "Destiny"]),
    (
        "aggro_tools",
        &["Charge", "Overwhelm", "Warcry", "Berserk", "Quickdraw"],
    ),
    (
        "control_tools",
        &["Deadly", "Killer", "Endurance", "Taunt", "Ambush"],
    ),
    (
        "finishers",
        &["Unblockable", "Flying", "Double Damage", "Overwhelm", "Aegis"],
    ),
    ("flexibility", &["Versatile", "Inscribe", "Pledge", "Nomad"]),
];

/// A known two-skill combination.
#[derive(Debug, Clone, Serialize)]
pub struct SkillPair {
    pub skills: (&'static str, &'static str),
    pub strength: u8,
    pub description: &'static str,
    pub examples: &'static [&'static str],
}

pub const SKILL_SYNERGIES: &[SkillPair] = &[
    SkillPair {
        skills: ("Deadly", "Quickdraw"),
        strength: 5,
        description: "Kills attackers before taking damage, perfect defense",
        examples: &["Scorpion Wasp", "Desert Marshal with weapons"],
    },
    SkillPair {
        skills: ("Lifesteal", "Berserk"),
        strength: 5,
        description: "Double the healing with two attacks",
        examples: &["Moldermuck", "Lifesteal weapon on Berserk unit"],
    },
    SkillPair {
        skills: ("Overwhelm", "Double Damage"),
        strength: 5,
        description: "Massive face damage potential through blockers",
        examples: &["Carnosaur", "Flameblast"],
    },
    SkillPair {
        skills: ("Warcry", "Revenge"),
        strength: 4,
        description: "Buffs the revenge copy when it returns",
        examples: &["Ripknife Assassin"],
    },
    SkillPair {
        skills: ("Echo", "Destiny"),
        strength: 4,
        description: "Two free units when drawn",
        examples: &["Twinning Ritual on Destiny units"],
    },
    SkillPair {
        skills: ("Flying", "Aegis"),
        strength: 4,
        description: "Evasive threat protected from removal",
        examples: &["Silverwing Familiar", "Hooru Fliers"],
    },
    SkillPair {
        skills: ("Killer", "Deadly"),
        strength: 4,
        description: "Instant removal for any unit",
        examples: &["Deathstrike", "Deadly unit with Xenan Initiation"],
    },
    SkillPair {
        skills: ("Taunt", "Deadly"),
        strength: 3,
        description: "Forces unfavorable blocks",
        examples: &["Deadly unit with Taunt relic"],
    },
    SkillPair {
        skills: ("Regen", "Revenge"),
        strength: 3,
        description: "Harder to kill the first time for revenge value",
        examples: &["Revenge units with combat tricks"],
    },
    SkillPair {
        skills: ("Charge", "Warcry"),
        strength: 3,
        description: "Immediate attack triggers warcry",
        examples: &["Oni Ronin", "Rakano aggro package"],
    },
    SkillPair {
        skills: ("Endurance", "Killer"),
        strength: 3,
        description: "Kill every turn without losing blocker",
        examples: &["Sandstorm Titan with Killer"],
    },
];

static SKILL_INDEX: Lazy<HashMap<String, &'static Skill>> = Lazy::new(|| {
    all_skills()
        .map(|skill| (skill.name.to_lowercase(), skill))
        .collect()
});

/// Battle skills followed by the other skills.
pub fn all_skills() -> impl Iterator<Item = &'static Skill> {
    BATTLE_SKILLS.iter().chain(OTHER_SKILLS.iter())
}

/// Case-insensitive lookup by skill name.
#[must_use]
pub fn skill(name: &str) -> Option<&'static Skill> {
    SKILL_INDEX.get(&name.trim().to_lowercase()).copied()
}

fn sorted_names(names: impl Iterator<Item = &'static str>) -> Vec<&'static str> {
    names.collect::<BTreeSet<_>>().into_iter().collect()
}

/// Skills that list `archetype` among their archetypes, sorted by name.
#[must_use]
pub fn skills_by_archetype(archetype: &str) -> Vec<&'static str> {
    let archetype = archetype.to_lowercase();
    sorted_names(
        all_skills()
            .filter(|s| s.archetypes.iter().any(|a| a.to_lowercase() == archetype))
            .map(|s| s.name),
    )
}

#[must_use]
pub fn skills_by_power_level(min: PowerLevel) -> Vec<&'static str> {
    sorted_names(all_skills().filter(|s| s.power_level >= min).map(|s| s.name))
}

/// Skills rated Strong or better.
#[must_use]
pub fn competitive_skills() -> Vec<&'static str> {
    skills_by_power_level(PowerLevel::Strong)
}

/// Skills that pair well with `name`, strongest first.
///
/// Explicit pairs keep their rated strength; skills merely mentioned in the
/// skill's synergy list count as 3. Each skill appears once with its best score.
#[must_use]
pub fn synergistic_skills(name: &str) -> Vec<(&'static str, u8)> {
    let mut found: Vec<(&'static str, u8)> = Vec::new();
    let mut record = |other: &'static str, strength: u8| {
        match found.iter_mut().find(|(n, _)| *n == other) {
            Some(entry) => entry.1 = entry.1.max(strength),
            None => found.push((other, strength)),
        }
    };

    for pair in SKILL_SYNERGIES {
        let (a, b) = pair.skills;
        if a == name {
            record(b, pair.strength);
        } else if b == name {
            record(a, pair.strength);
        }
    }

    if let Some(data) = skill(name) {
        for mention in data.synergies {
            let mention = mention.to_lowercase();
            for other in all_skills() {
                if mention.contains(&other.name.to_lowercase()) {
                    record(other.name, 3);
                }
            }
        }
    }

    found.sort_by(|a, b| b.1.cmp(&a.1));
    found
}

#[must_use]
pub fn skill_counters(name: &str) -> &'static [&'static str] {
    skill(name).map(|s| s.counters).unwrap_or_default()
}

/// Skills that fill `role` in a deck, sorted by name.
#[must_use]
pub fn skills_for_role(role: &str) -> Vec<&'static str> {
    let role = role.to_lowercase();
    sorted_names(
        all_skills()
            .filter(|s| s.deck_role.iter().any(|r| r.to_lowercase() == role))
            .map(|s| s.name),
    )
}

#[must_use]
pub fn skills_in_category(category: &str) -> &'static [&'static str] {
    SKILL_CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, skills)| *skills)
        .unwrap_or_default()
}

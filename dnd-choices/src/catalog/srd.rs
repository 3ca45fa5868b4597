//! Built-in reference dataset.

use super::*;
use crate::character::Ability::{self, *};
use crate::character::Size;

pub(super) fn build() -> Catalog {
    let mut catalog = Catalog::new();
    for language in languages() {
        catalog = catalog.with_language(language);
    }
    for skill in skills() {
        catalog = catalog.with_skill(skill);
    }
    for tool in tools() {
        catalog = catalog.with_tool(tool);
    }
    for item in items() {
        catalog = catalog.with_item(item);
    }
    for race in races() {
        catalog = catalog.with_race(race);
    }
    for background in backgrounds() {
        catalog = catalog.with_background(background);
    }
    for class in classes() {
        catalog = catalog.with_class(class);
    }
    for subclass in subclasses() {
        catalog = catalog.with_subclass(subclass);
    }
    for feat in feats() {
        catalog = catalog.with_feat(feat);
    }
    for spell in spells() {
        catalog = catalog.with_spell(spell);
    }
    for feature in optional_features() {
        catalog = catalog.with_optional_feature(feature);
    }
    catalog
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn feature(name: &str, level: u8, description: &str) -> ClassFeature {
    ClassFeature {
        name: name.to_string(),
        level,
        description: description.to_string(),
    }
}

fn skill_mod(id: &str, count: usize, options: &[&str]) -> Modifier {
    Modifier::new(id, ModifierChoice::Skill { count, options: strings(options) })
}

fn tool_mod(id: &str, count: usize, options: &[&str]) -> Modifier {
    Modifier::new(id, ModifierChoice::Tool { count, options: strings(options) })
}

fn language_mod(id: &str, count: usize) -> Modifier {
    Modifier::new(id, ModifierChoice::Language { count, options: Vec::new() })
}

fn ability_mod(id: &str, count: usize, bonus: i8, options: &[Ability]) -> Modifier {
    Modifier::new(
        id,
        ModifierChoice::AbilityScore {
            count,
            bonus,
            options: options.to_vec(),
            distinct: count > 1,
        },
    )
}

fn spell_mod(id: &str, count: usize, spell_list: &str, max_level: u8) -> Modifier {
    Modifier::new(
        id,
        ModifierChoice::Spell {
            count,
            spell_list: spell_list.to_string(),
            max_level,
        },
    )
}

fn feat_mod(id: &str, category: Option<FeatCategory>) -> Modifier {
    Modifier::new(id, ModifierChoice::Feat { category })
}

const STANDARD_ASI: &[u8] = &[4, 8, 12, 16, 19];

const FULL_CASTER: [u8; 20] = [1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 9, 9];
const HALF_CASTER: [u8; 20] = [0, 1, 1, 1, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 5, 5];
const PACT_CASTER: [u8; 20] = [1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5];

/// Expand `(from_level, value)` breakpoints into a 20-level table.
fn progression(steps: &[(u8, usize)]) -> Vec<usize> {
    (1..=20u8)
        .map(|level| {
            steps
                .iter()
                .filter(|(from, _)| *from <= level)
                .map(|(_, value)| *value)
                .last()
                .unwrap_or(0)
        })
        .collect()
}

fn counter(key: &str, name: &str, feature_type: OptionalFeatureType, steps: &[(u8, usize)]) -> FeatureCounter {
    FeatureCounter {
        key: key.to_string(),
        name: name.to_string(),
        feature_type,
        progression: steps
            .iter()
            .map(|&(level, value)| CounterStep { level, value })
            .collect(),
    }
}

fn bundle(slug: &str, label: &str, items: &[(&str, u32)]) -> EquipmentBundle {
    EquipmentBundle {
        slug: slug.to_string(),
        label: label.to_string(),
        items: items
            .iter()
            .map(|&(item_slug, quantity)| ItemGrant {
                item_slug: item_slug.to_string(),
                quantity,
            })
            .collect(),
    }
}

fn equipment(group: &str, label: &str, bundles: Vec<EquipmentBundle>) -> EquipmentChoice {
    EquipmentChoice {
        group: group.to_string(),
        label: label.to_string(),
        bundles,
    }
}

fn variant(group: &str, name: &str, level: u8, options: &[(&str, &str)]) -> VariantChoice {
    VariantChoice {
        group: group.to_string(),
        name: name.to_string(),
        level,
        options: options
            .iter()
            .map(|&(value, label)| VariantOption {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect(),
    }
}

// ============================================================================
// Lookup Lists
// ============================================================================

fn languages() -> Vec<Language> {
    let standard = [
        ("common", "Common"),
        ("dwarvish", "Dwarvish"),
        ("elvish", "Elvish"),
        ("giant", "Giant"),
        ("gnomish", "Gnomish"),
        ("goblin", "Goblin"),
        ("halfling", "Halfling"),
        ("orc", "Orc"),
    ];
    let exotic = [
        ("abyssal", "Abyssal"),
        ("celestial", "Celestial"),
        ("deep-speech", "Deep Speech"),
        ("draconic", "Draconic"),
        ("infernal", "Infernal"),
        ("primordial", "Primordial"),
        ("sylvan", "Sylvan"),
        ("undercommon", "Undercommon"),
    ];
    standard
        .iter()
        .map(|&(slug, name)| (slug, name, false))
        .chain(exotic.iter().map(|&(slug, name)| (slug, name, true)))
        .map(|(slug, name, exotic)| Language {
            slug: slug.to_string(),
            name: name.to_string(),
            exotic,
        })
        .collect()
}

pub(crate) const ALL_SKILLS: &[(&str, &str, Ability)] = &[
    ("acrobatics", "Acrobatics", Dexterity),
    ("animal-handling", "Animal Handling", Wisdom),
    ("arcana", "Arcana", Intelligence),
    ("athletics", "Athletics", Strength),
    ("deception", "Deception", Charisma),
    ("history", "History", Intelligence),
    ("insight", "Insight", Wisdom),
    ("intimidation", "Intimidation", Charisma),
    ("investigation", "Investigation", Intelligence),
    ("medicine", "Medicine", Wisdom),
    ("nature", "Nature", Intelligence),
    ("perception", "Perception", Wisdom),
    ("performance", "Performance", Charisma),
    ("persuasion", "Persuasion", Charisma),
    ("religion", "Religion", Intelligence),
    ("sleight-of-hand", "Sleight of Hand", Dexterity),
    ("stealth", "Stealth", Dexterity),
    ("survival", "Survival", Wisdom),
];

fn skills() -> Vec<SkillDef> {
    ALL_SKILLS
        .iter()
        .map(|&(slug, name, ability)| SkillDef {
            slug: slug.to_string(),
            name: name.to_string(),
            ability,
        })
        .collect()
}

const ARTISAN_TOOLS: &[&str] = &[
    "brewers-supplies",
    "calligraphers-supplies",
    "masons-tools",
    "smiths-tools",
    "tinkers-tools",
];
const GAMING_SETS: &[&str] = &["dice-set", "playing-card-set"];
const INSTRUMENTS: &[&str] = &["bagpipes", "drum", "flute", "lute", "lyre"];

fn tools() -> Vec<ToolDef> {
    [
        ("alchemists-supplies", "Alchemist's Supplies"),
        ("bagpipes", "Bagpipes"),
        ("brewers-supplies", "Brewer's Supplies"),
        ("calligraphers-supplies", "Calligrapher's Supplies"),
        ("dice-set", "Dice Set"),
        ("disguise-kit", "Disguise Kit"),
        ("drum", "Drum"),
        ("flute", "Flute"),
        ("herbalism-kit", "Herbalism Kit"),
        ("lute", "Lute"),
        ("lyre", "Lyre"),
        ("masons-tools", "Mason's Tools"),
        ("playing-card-set", "Playing Card Set"),
        ("smiths-tools", "Smith's Tools"),
        ("thieves-tools", "Thieves' Tools"),
        ("tinkers-tools", "Tinker's Tools"),
    ]
    .iter()
    .map(|&(slug, name)| ToolDef {
        slug: slug.to_string(),
        name: name.to_string(),
    })
    .collect()
}

fn items() -> Vec<Item> {
    [
        ("arrows", "Arrows"),
        ("chain-mail", "Chain Mail"),
        ("component-pouch", "Component Pouch"),
        ("crossbow-bolts", "Crossbow Bolts"),
        ("dagger", "Dagger"),
        ("dungeoneers-pack", "Dungeoneer's Pack"),
        ("explorers-pack", "Explorer's Pack"),
        ("greataxe", "Greataxe"),
        ("greatsword", "Greatsword"),
        ("handaxe", "Handaxe"),
        ("javelin", "Javelin"),
        ("leather-armor", "Leather Armor"),
        ("light-crossbow", "Light Crossbow"),
        ("longbow", "Longbow"),
        ("longsword", "Longsword"),
        ("quarterstaff", "Quarterstaff"),
        ("rapier", "Rapier"),
        ("scholars-pack", "Scholar's Pack"),
        ("shield", "Shield"),
        ("shortbow", "Shortbow"),
        ("shortsword", "Shortsword"),
        ("spellbook", "Spellbook"),
    ]
    .iter()
    .map(|&(slug, name)| Item {
        slug: slug.to_string(),
        name: name.to_string(),
    })
    .collect()
}

// ============================================================================
// Races
// ============================================================================

fn race(slug: &str, name: &str, parent: Option<&str>, speed: u32, sizes: &[Size]) -> Race {
    Race {
        slug: slug.to_string(),
        name: name.to_string(),
        parent: parent.map(str::to_string),
        speed,
        sizes: sizes.to_vec(),
        size_choice: false,
        ability_bonuses: Vec::new(),
        languages: Vec::new(),
        skills: Vec::new(),
        modifiers: Vec::new(),
    }
}

fn races() -> Vec<Race> {
    let human = Race {
        ability_bonuses: Ability::all().iter().map(|&a| FixedBonus::new(a, 1)).collect(),
        languages: strings(&["common"]),
        modifiers: vec![language_mod("human-extra-language", 1)],
        ..race("human", "Human", None, 30, &[Size::Medium])
    };

    let variant_human = Race {
        languages: strings(&["common"]),
        modifiers: vec![
            ability_mod("variant-human-abilities", 2, 1, &[]),
            skill_mod("variant-human-skill", 1, &[]),
            feat_mod("variant-human-feat", None),
            language_mod("variant-human-language", 1),
        ],
        ..race("variant-human", "Variant Human", None, 30, &[Size::Medium])
    };

    let elf = Race {
        ability_bonuses: vec![FixedBonus::new(Dexterity, 2)],
        languages: strings(&["common", "elvish"]),
        skills: strings(&["perception"]),
        ..race("elf", "Elf", None, 30, &[Size::Medium])
    };

    let high_elf = Race {
        ability_bonuses: vec![FixedBonus::new(Intelligence, 1)],
        modifiers: vec![
            language_mod("high-elf-language", 1),
            spell_mod("high-elf-cantrip", 1, "wizard", 0),
        ],
        ..race("high-elf", "High Elf", Some("elf"), 30, &[Size::Medium])
    };

    let half_elf = Race {
        ability_bonuses: vec![FixedBonus::new(Charisma, 2)],
        languages: strings(&["common", "elvish"]),
        modifiers: vec![
            ability_mod(
                "half-elf-abilities",
                2,
                1,
                &[Strength, Dexterity, Constitution, Intelligence, Wisdom],
            ),
            skill_mod("skill-versatility", 2, &[]),
            language_mod("half-elf-language", 1),
        ],
        ..race("half-elf", "Half-Elf", None, 30, &[Size::Medium])
    };

    let dwarf = Race {
        ability_bonuses: vec![FixedBonus::new(Constitution, 2)],
        languages: strings(&["common", "dwarvish"]),
        modifiers: vec![tool_mod(
            "dwarf-tool-proficiency",
            1,
            &["brewers-supplies", "masons-tools", "smiths-tools"],
        )],
        ..race("dwarf", "Dwarf", None, 25, &[Size::Medium])
    };

    let hill_dwarf = Race {
        ability_bonuses: vec![FixedBonus::new(Wisdom, 1)],
        ..race("hill-dwarf", "Hill Dwarf", Some("dwarf"), 25, &[Size::Medium])
    };

    let halfling = Race {
        ability_bonuses: vec![FixedBonus::new(Dexterity, 2)],
        languages: strings(&["common", "halfling"]),
        ..race("halfling", "Halfling", None, 25, &[Size::Small])
    };

    let lightfoot = Race {
        ability_bonuses: vec![FixedBonus::new(Charisma, 1)],
        ..race("lightfoot-halfling", "Lightfoot Halfling", Some("halfling"), 25, &[Size::Small])
    };

    let custom_lineage = Race {
        size_choice: true,
        languages: strings(&["common"]),
        modifiers: vec![
            ability_mod("custom-lineage-ability", 1, 2, &[]),
            feat_mod("custom-lineage-feat", None),
            skill_mod("custom-lineage-skill", 1, &[]),
            language_mod("custom-lineage-language", 1),
        ],
        ..race(
            "custom-lineage",
            "Custom Lineage",
            None,
            30,
            &[Size::Small, Size::Medium],
        )
    };

    vec![
        human,
        variant_human,
        elf,
        high_elf,
        half_elf,
        dwarf,
        hill_dwarf,
        halfling,
        lightfoot,
        custom_lineage,
    ]
}

// ============================================================================
// Backgrounds
// ============================================================================

fn background(slug: &str, name: &str, skills: &[&str]) -> Background {
    Background {
        slug: slug.to_string(),
        name: name.to_string(),
        skills: strings(skills),
        tools: Vec::new(),
        languages: Vec::new(),
        modifiers: Vec::new(),
    }
}

fn backgrounds() -> Vec<Background> {
    vec![
        Background {
            modifiers: vec![language_mod("acolyte-languages", 2)],
            ..background("acolyte", "Acolyte", &["insight", "religion"])
        },
        Background {
            tools: strings(&["thieves-tools"]),
            modifiers: vec![tool_mod("criminal-gaming-set", 1, GAMING_SETS)],
            ..background("criminal", "Criminal", &["deception", "stealth"])
        },
        Background {
            modifiers: vec![language_mod("sage-languages", 2)],
            ..background("sage", "Sage", &["arcana", "history"])
        },
        Background {
            modifiers: vec![tool_mod("soldier-gaming-set", 1, GAMING_SETS)],
            ..background("soldier", "Soldier", &["athletics", "intimidation"])
        },
        Background {
            modifiers: vec![
                tool_mod("guild-artisan-tools", 1, ARTISAN_TOOLS),
                language_mod("guild-artisan-language", 1),
            ],
            ..background("guild-artisan", "Guild Artisan", &["insight", "persuasion"])
        },
        Background {
            modifiers: vec![
                skill_mod("custom-background-skills", 2, &[]),
                language_mod("custom-background-language", 1),
                feat_mod("origin-feat", Some(FeatCategory::Origin)),
            ],
            ..background("custom-background", "Custom Background", &[])
        },
    ]
}

// ============================================================================
// Classes
// ============================================================================

fn class(
    slug: &str,
    name: &str,
    hit_die: DieType,
    saving_throws: [Ability; 2],
    skill_choice: SkillChoice,
    subclass_level: u8,
    subclass_title: &str,
) -> Class {
    Class {
        slug: slug.to_string(),
        name: name.to_string(),
        hit_die,
        saving_throws: saving_throws.to_vec(),
        skill_choice,
        tool_choice: None,
        subclass_level,
        subclass_title: subclass_title.to_string(),
        features: Vec::new(),
        spellcasting: None,
        asi_levels: STANDARD_ASI.to_vec(),
        expertise: Vec::new(),
        fighting_style_level: None,
        counters: Vec::new(),
        equipment_choices: Vec::new(),
    }
}

fn skill_choice(count: usize, multiclass_count: usize, options: &[&str]) -> SkillChoice {
    SkillChoice {
        count,
        multiclass_count,
        options: strings(options),
    }
}

fn all_skill_slugs() -> Vec<&'static str> {
    ALL_SKILLS.iter().map(|(slug, _, _)| *slug).collect()
}

fn classes() -> Vec<Class> {
    let barbarian = Class {
        features: vec![
            feature("Rage", 1, "Enter a rage as a bonus action for bonus damage and resistance to physical damage."),
            feature("Unarmored Defense", 1, "Without armor, AC equals 10 + DEX modifier + CON modifier."),
            feature("Reckless Attack", 2, "Attack with advantage at the cost of granting advantage against you."),
            feature("Danger Sense", 2, "Advantage on DEX saves against effects you can see."),
            feature("Extra Attack", 5, "Attack twice when you take the Attack action."),
            feature("Fast Movement", 5, "Speed increases by 10 feet while not wearing heavy armor."),
        ],
        equipment_choices: vec![
            equipment(
                "barbarian-primary-weapon",
                "A greataxe or a martial melee weapon",
                vec![
                    bundle("greataxe", "Greataxe", &[("greataxe", 1)]),
                    bundle("greatsword", "Greatsword", &[("greatsword", 1)]),
                ],
            ),
            equipment(
                "barbarian-secondary-weapon",
                "Two handaxes or four javelins",
                vec![
                    bundle("two-handaxes", "Two handaxes", &[("handaxe", 2)]),
                    bundle("four-javelins", "Four javelins", &[("javelin", 4)]),
                ],
            ),
        ],
        ..class(
            "barbarian",
            "Barbarian",
            DieType::D12,
            [Strength, Constitution],
            skill_choice(
                2,
                0,
                &["animal-handling", "athletics", "intimidation", "nature", "perception", "survival"],
            ),
            3,
            "Primal Path",
        )
    };

    let bard = Class {
        tool_choice: Some(ToolChoice {
            count: 3,
            options: strings(INSTRUMENTS),
        }),
        features: vec![
            feature("Bardic Inspiration", 1, "Grant an inspiration die as a bonus action."),
            feature("Spellcasting", 1, "Cast bard spells using Charisma."),
            feature("Jack of All Trades", 2, "Add half proficiency to unproficient ability checks."),
            feature("Song of Rest", 2, "Allies regain extra hit points during a short rest."),
            feature("Font of Inspiration", 5, "Bardic Inspiration recharges on a short rest."),
        ],
        spellcasting: Some(Spellcasting {
            ability: Charisma,
            cantrips_known: progression(&[(1, 2), (4, 3), (10, 4)]),
            spells_known: vec![4, 5, 6, 7, 8, 9, 10, 11, 12, 14, 15, 15, 16, 18, 19, 19, 20, 22, 22, 22],
            max_spell_level: FULL_CASTER.to_vec(),
        }),
        expertise: vec![
            ExpertiseGrant { level: 3, count: 2, skills_only: true },
            ExpertiseGrant { level: 10, count: 2, skills_only: true },
        ],
        ..class(
            "bard",
            "Bard",
            DieType::D8,
            [Dexterity, Charisma],
            skill_choice(3, 1, &all_skill_slugs()),
            3,
            "Bard College",
        )
    };

    let cleric = Class {
        features: vec![
            feature("Spellcasting", 1, "Cast cleric spells using Wisdom."),
            feature("Channel Divinity", 2, "Channel divine energy for a domain effect."),
            feature("Destroy Undead", 5, "Turn Undead destroys weak undead."),
        ],
        spellcasting: Some(Spellcasting {
            ability: Wisdom,
            cantrips_known: progression(&[(1, 3), (4, 4), (10, 5)]),
            spells_known: Vec::new(),
            max_spell_level: FULL_CASTER.to_vec(),
        }),
        ..class(
            "cleric",
            "Cleric",
            DieType::D8,
            [Wisdom, Charisma],
            skill_choice(2, 0, &["history", "insight", "medicine", "persuasion", "religion"]),
            1,
            "Divine Domain",
        )
    };

    let fighter = Class {
        features: vec![
            feature("Fighting Style", 1, "Adopt a particular style of fighting as your specialty."),
            feature("Second Wind", 1, "Regain 1d10 + fighter level hit points as a bonus action."),
            feature("Action Surge", 2, "Take one additional action on your turn."),
            feature("Extra Attack", 5, "Attack twice when you take the Attack action."),
            feature("Indomitable", 9, "Reroll a failed saving throw."),
        ],
        asi_levels: vec![4, 6, 8, 12, 14, 16, 19],
        fighting_style_level: Some(1),
        equipment_choices: vec![
            equipment(
                "fighter-armor",
                "Chain mail, or leather armor with a longbow and arrows",
                vec![
                    bundle("chain-mail", "Chain mail", &[("chain-mail", 1)]),
                    bundle(
                        "leather-longbow",
                        "Leather armor, longbow and 20 arrows",
                        &[("leather-armor", 1), ("longbow", 1), ("arrows", 20)],
                    ),
                ],
            ),
            equipment(
                "fighter-weapons",
                "A martial weapon and a shield, or two martial weapons",
                vec![
                    bundle("longsword-shield", "Longsword and shield", &[("longsword", 1), ("shield", 1)]),
                    bundle("two-martial", "Greatsword and longsword", &[("greatsword", 1), ("longsword", 1)]),
                ],
            ),
            equipment(
                "fighter-pack",
                "A dungeoneer's pack or an explorer's pack",
                vec![
                    bundle("dungeoneers-pack", "Dungeoneer's pack", &[("dungeoneers-pack", 1)]),
                    bundle("explorers-pack", "Explorer's pack", &[("explorers-pack", 1)]),
                ],
            ),
        ],
        ..class(
            "fighter",
            "Fighter",
            DieType::D10,
            [Strength, Constitution],
            skill_choice(
                2,
                0,
                &[
                    "acrobatics",
                    "animal-handling",
                    "athletics",
                    "history",
                    "insight",
                    "intimidation",
                    "perception",
                    "survival",
                ],
            ),
            3,
            "Martial Archetype",
        )
    };

    let rogue = Class {
        features: vec![
            feature("Expertise", 1, "Double proficiency bonus for two chosen proficiencies."),
            feature("Sneak Attack", 1, "Deal extra damage once per turn with finesse or ranged weapons."),
            feature("Thieves' Cant", 1, "A secret mix of dialect, jargon and code."),
            feature("Cunning Action", 2, "Dash, Disengage or Hide as a bonus action."),
            feature("Uncanny Dodge", 5, "Halve the damage of an attack you can see."),
        ],
        asi_levels: vec![4, 8, 10, 12, 16, 19],
        expertise: vec![
            ExpertiseGrant { level: 1, count: 2, skills_only: false },
            ExpertiseGrant { level: 6, count: 2, skills_only: false },
        ],
        equipment_choices: vec![equipment(
            "rogue-weapon",
            "A rapier or a shortsword",
            vec![
                bundle("rapier", "Rapier", &[("rapier", 1)]),
                bundle("shortsword", "Shortsword", &[("shortsword", 1)]),
            ],
        )],
        ..class(
            "rogue",
            "Rogue",
            DieType::D8,
            [Dexterity, Intelligence],
            skill_choice(
                4,
                1,
                &[
                    "acrobatics",
                    "athletics",
                    "deception",
                    "insight",
                    "intimidation",
                    "investigation",
                    "perception",
                    "performance",
                    "persuasion",
                    "sleight-of-hand",
                    "stealth",
                ],
            ),
            3,
            "Roguish Archetype",
        )
    };

    let warlock = Class {
        features: vec![
            feature("Pact Magic", 1, "Cast warlock spells using Charisma; slots recharge on a short rest."),
            feature("Eldritch Invocations", 2, "Learn fragments of forbidden knowledge."),
            feature("Pact Boon", 3, "Your patron bestows a pact boon."),
        ],
        spellcasting: Some(Spellcasting {
            ability: Charisma,
            cantrips_known: progression(&[(1, 2), (4, 3), (10, 4)]),
            spells_known: vec![2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 11, 11, 12, 12, 13, 13, 14, 14, 15, 15],
            max_spell_level: PACT_CASTER.to_vec(),
        }),
        counters: vec![counter(
            "eldritch_invocations",
            "Eldritch Invocations",
            OptionalFeatureType::EldritchInvocation,
            &[(2, 2), (5, 3), (7, 4), (9, 5), (12, 6), (15, 7), (18, 8)],
        )],
        ..class(
            "warlock",
            "Warlock",
            DieType::D8,
            [Wisdom, Charisma],
            skill_choice(
                2,
                0,
                &["arcana", "deception", "history", "intimidation", "investigation", "nature", "religion"],
            ),
            1,
            "Otherworldly Patron",
        )
    };

    let wizard = Class {
        features: vec![
            feature("Spellcasting", 1, "Cast wizard spells from your spellbook using Intelligence."),
            feature("Arcane Recovery", 1, "Recover spell slots during a short rest."),
        ],
        spellcasting: Some(Spellcasting {
            ability: Intelligence,
            cantrips_known: progression(&[(1, 3), (4, 4), (10, 5)]),
            spells_known: (1..=20usize).map(|level| 6 + 2 * (level - 1)).collect(),
            max_spell_level: FULL_CASTER.to_vec(),
        }),
        equipment_choices: vec![equipment(
            "wizard-weapon",
            "A quarterstaff or a dagger",
            vec![
                bundle("quarterstaff", "Quarterstaff", &[("quarterstaff", 1)]),
                bundle("dagger", "Dagger", &[("dagger", 1)]),
            ],
        )],
        ..class(
            "wizard",
            "Wizard",
            DieType::D6,
            [Intelligence, Wisdom],
            skill_choice(
                2,
                0,
                &["arcana", "history", "insight", "investigation", "medicine", "religion"],
            ),
            2,
            "Arcane Tradition",
        )
    };

    let sorcerer = Class {
        features: vec![
            feature("Spellcasting", 1, "Cast sorcerer spells using Charisma."),
            feature("Font of Magic", 2, "Tap into a wellspring of sorcery points."),
            feature("Metamagic", 3, "Twist your spells to suit your needs."),
        ],
        spellcasting: Some(Spellcasting {
            ability: Charisma,
            cantrips_known: progression(&[(1, 4), (4, 5), (10, 6)]),
            spells_known: vec![2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 12, 13, 13, 14, 14, 15, 15, 15, 15],
            max_spell_level: FULL_CASTER.to_vec(),
        }),
        counters: vec![counter(
            "metamagic",
            "Metamagic",
            OptionalFeatureType::Metamagic,
            &[(3, 2), (10, 3), (17, 4)],
        )],
        ..class(
            "sorcerer",
            "Sorcerer",
            DieType::D6,
            [Constitution, Charisma],
            skill_choice(
                2,
                0,
                &["arcana", "deception", "insight", "intimidation", "persuasion", "religion"],
            ),
            1,
            "Sorcerous Origin",
        )
    };

    let ranger = Class {
        features: vec![
            feature("Favored Enemy", 1, "Advantage on tracking and recalling lore about a chosen enemy type."),
            feature("Natural Explorer", 1, "Expertise in traversing a favored terrain."),
            feature("Fighting Style", 2, "Adopt a particular style of fighting as your specialty."),
            feature("Spellcasting", 2, "Cast ranger spells using Wisdom."),
            feature("Extra Attack", 5, "Attack twice when you take the Attack action."),
        ],
        spellcasting: Some(Spellcasting {
            ability: Wisdom,
            cantrips_known: Vec::new(),
            spells_known: vec![0, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11],
            max_spell_level: HALF_CASTER.to_vec(),
        }),
        fighting_style_level: Some(2),
        ..class(
            "ranger",
            "Ranger",
            DieType::D10,
            [Strength, Dexterity],
            skill_choice(
                3,
                1,
                &[
                    "animal-handling",
                    "athletics",
                    "insight",
                    "investigation",
                    "nature",
                    "perception",
                    "stealth",
                    "survival",
                ],
            ),
            3,
            "Ranger Archetype",
        )
    };

    let paladin = Class {
        features: vec![
            feature("Divine Sense", 1, "Detect celestials, fiends and undead nearby."),
            feature("Lay on Hands", 1, "Heal from a pool of hit points equal to 5 x paladin level."),
            feature("Fighting Style", 2, "Adopt a particular style of fighting as your specialty."),
            feature("Divine Smite", 2, "Expend a spell slot to deal extra radiant damage."),
            feature("Extra Attack", 5, "Attack twice when you take the Attack action."),
        ],
        fighting_style_level: Some(2),
        ..class(
            "paladin",
            "Paladin",
            DieType::D10,
            [Wisdom, Charisma],
            skill_choice(
                2,
                0,
                &["athletics", "insight", "intimidation", "medicine", "persuasion", "religion"],
            ),
            3,
            "Sacred Oath",
        )
    };

    vec![
        barbarian, bard, cleric, fighter, rogue, warlock, wizard, sorcerer, ranger, paladin,
    ]
}

// ============================================================================
// Subclasses
// ============================================================================

fn subclass(slug: &str, name: &str, class: &str, features: Vec<ClassFeature>) -> Subclass {
    Subclass {
        slug: slug.to_string(),
        name: name.to_string(),
        class: class.to_string(),
        features,
        variants: Vec::new(),
        modifiers: Vec::new(),
        counters: Vec::new(),
        fighting_style_level: None,
    }
}

const TOTEMS: &[(&str, &str)] = &[("bear", "Bear"), ("eagle", "Eagle"), ("wolf", "Wolf")];

fn subclasses() -> Vec<Subclass> {
    vec![
        Subclass {
            variants: vec![
                variant("totem_spirit", "Totem Spirit", 3, TOTEMS),
                variant("totem_aspect", "Aspect of the Beast", 6, TOTEMS),
            ],
            ..subclass(
                "totem-warrior",
                "Path of the Totem Warrior",
                "barbarian",
                vec![
                    feature("Spirit Seeker", 3, "Cast beast sense and speak with animals as rituals."),
                    feature("Totem Spirit", 3, "Choose a totem animal and gain its feature while raging."),
                    feature("Aspect of the Beast", 6, "Gain a magical benefit based on a totem animal."),
                ],
            )
        },
        subclass(
            "berserker",
            "Path of the Berserker",
            "barbarian",
            vec![
                feature("Frenzy", 3, "Make a melee attack as a bonus action while raging."),
                feature("Mindless Rage", 6, "Immune to charm and fright while raging."),
            ],
        ),
        Subclass {
            modifiers: vec![skill_mod("lore-bonus-proficiencies", 3, &[]).at_level(3)],
            ..subclass(
                "lore",
                "College of Lore",
                "bard",
                vec![
                    feature("Bonus Proficiencies", 3, "Gain proficiency with three skills of your choice."),
                    feature("Cutting Words", 3, "Use Bardic Inspiration to reduce an enemy's roll."),
                ],
            )
        },
        subclass(
            "valor",
            "College of Valor",
            "bard",
            vec![feature("Combat Inspiration", 3, "Inspiration dice add to damage or AC.")],
        ),
        Subclass {
            modifiers: vec![
                language_mod("knowledge-languages", 2).at_level(1),
                skill_mod(
                    "knowledge-skills",
                    2,
                    &["arcana", "history", "nature", "religion"],
                )
                .at_level(1),
            ],
            ..subclass(
                "knowledge",
                "Knowledge Domain",
                "cleric",
                vec![feature("Blessings of Knowledge", 1, "Learn two languages and two knowledge skills.")],
            )
        },
        subclass(
            "life",
            "Life Domain",
            "cleric",
            vec![
                feature("Disciple of Life", 1, "Healing spells restore additional hit points."),
                feature("Preserve Life", 2, "Channel Divinity to restore hit points."),
            ],
        ),
        Subclass {
            fighting_style_level: Some(10),
            ..subclass(
                "champion",
                "Champion",
                "fighter",
                vec![
                    feature("Improved Critical", 3, "Weapon attacks score a critical hit on 19 or 20."),
                    feature("Remarkable Athlete", 7, "Add half proficiency to STR, DEX and CON checks."),
                    feature("Additional Fighting Style", 10, "Choose a second Fighting Style."),
                ],
            )
        },
        Subclass {
            counters: vec![counter(
                "maneuvers",
                "Maneuvers",
                OptionalFeatureType::Maneuver,
                &[(3, 3), (7, 5), (10, 7), (15, 9)],
            )],
            ..subclass(
                "battle-master",
                "Battle Master",
                "fighter",
                vec![
                    feature("Combat Superiority", 3, "Learn maneuvers fueled by superiority dice."),
                    feature("Know Your Enemy", 7, "Learn how a creature compares to you."),
                ],
            )
        },
        subclass(
            "thief",
            "Thief",
            "rogue",
            vec![
                feature("Fast Hands", 3, "Use Cunning Action for Sleight of Hand or an object."),
                feature("Second-Story Work", 3, "Climb at full speed and jump farther."),
            ],
        ),
        Subclass {
            modifiers: vec![
                spell_mod("arcane-trickster-cantrips", 2, "wizard", 0).at_level(3),
                spell_mod("arcane-trickster-spells", 3, "wizard", 1).at_level(3),
            ],
            ..subclass(
                "arcane-trickster",
                "Arcane Trickster",
                "rogue",
                vec![
                    feature("Spellcasting", 3, "Cast a small set of wizard spells using Intelligence."),
                    feature("Mage Hand Legerdemain", 3, "Your mage hand is invisible and more dexterous."),
                ],
            )
        },
        subclass(
            "fiend",
            "The Fiend",
            "warlock",
            vec![feature("Dark One's Blessing", 1, "Gain temporary hit points when you reduce a hostile creature to 0 hit points.")],
        ),
        subclass(
            "archfey",
            "The Archfey",
            "warlock",
            vec![feature("Fey Presence", 1, "Charm or frighten creatures in a 10-foot cube.")],
        ),
        subclass(
            "evocation",
            "School of Evocation",
            "wizard",
            vec![
                feature("Evocation Savant", 2, "Copy evocation spells for half the time and gold."),
                feature("Sculpt Spells", 2, "Protect allies from your evocation spells."),
                feature("Potent Cantrip", 6, "Creatures that save against your cantrips take half damage."),
            ],
        ),
        subclass(
            "abjuration",
            "School of Abjuration",
            "wizard",
            vec![
                feature("Abjuration Savant", 2, "Copy abjuration spells for half the time and gold."),
                feature("Arcane Ward", 2, "Weave a protective ward when casting abjuration spells."),
            ],
        ),
        Subclass {
            variants: vec![variant(
                "dragon_ancestor",
                "Dragon Ancestor",
                1,
                &[
                    ("black", "Black (Acid)"),
                    ("blue", "Blue (Lightning)"),
                    ("brass", "Brass (Fire)"),
                    ("bronze", "Bronze (Lightning)"),
                    ("copper", "Copper (Acid)"),
                    ("gold", "Gold (Fire)"),
                    ("green", "Green (Poison)"),
                    ("red", "Red (Fire)"),
                    ("silver", "Silver (Cold)"),
                    ("white", "White (Cold)"),
                ],
            )],
            ..subclass(
                "draconic",
                "Draconic Bloodline",
                "sorcerer",
                vec![
                    feature("Dragon Ancestor", 1, "Choose a dragon type; speak Draconic."),
                    feature("Draconic Resilience", 1, "Hit point maximum increases by 1 per level; AC 13 + DEX unarmored."),
                    feature("Elemental Affinity", 6, "Add CHA modifier to damage of your ancestry's element."),
                ],
            )
        },
        subclass(
            "wild-magic",
            "Wild Magic",
            "sorcerer",
            vec![
                feature("Wild Magic Surge", 1, "Casting a spell may unleash wild magic."),
                feature("Tides of Chaos", 1, "Gain advantage on one roll."),
            ],
        ),
        Subclass {
            variants: vec![
                variant(
                    "hunters_prey",
                    "Hunter's Prey",
                    3,
                    &[
                        ("colossus-slayer", "Colossus Slayer"),
                        ("giant-killer", "Giant Killer"),
                        ("horde-breaker", "Horde Breaker"),
                    ],
                ),
                variant(
                    "defensive_tactics",
                    "Defensive Tactics",
                    7,
                    &[
                        ("escape-the-horde", "Escape the Horde"),
                        ("multiattack-defense", "Multiattack Defense"),
                        ("steel-will", "Steel Will"),
                    ],
                ),
            ],
            ..subclass(
                "hunter",
                "Hunter",
                "ranger",
                vec![
                    feature("Hunter's Prey", 3, "Choose a hunting technique."),
                    feature("Defensive Tactics", 7, "Choose a defensive technique."),
                ],
            )
        },
        subclass(
            "devotion",
            "Oath of Devotion",
            "paladin",
            vec![
                feature("Sacred Weapon", 3, "Channel Divinity to imbue a weapon with positive energy."),
                feature("Aura of Devotion", 7, "You and nearby allies can't be charmed."),
            ],
        ),
    ]
}

// ============================================================================
// Feats
// ============================================================================

fn feat(slug: &str, name: &str, category: FeatCategory, description: &str) -> Feat {
    Feat {
        slug: slug.to_string(),
        name: name.to_string(),
        category,
        description: description.to_string(),
        ability_bonuses: Vec::new(),
        modifiers: Vec::new(),
    }
}

fn feats() -> Vec<Feat> {
    use FeatCategory::{General, Origin};
    vec![
        feat("alert", "Alert", Origin, "+5 to initiative; you can't be surprised while conscious."),
        feat("lucky", "Lucky", Origin, "Three luck points per long rest to reroll d20s."),
        feat("tough", "Tough", Origin, "Hit point maximum increases by 2 per level."),
        Feat {
            modifiers: vec![skill_mod("skilled-proficiencies", 3, &[])],
            ..feat("skilled", "Skilled", Origin, "Gain proficiency in three skills.")
        },
        Feat {
            modifiers: vec![
                spell_mod("magic-initiate-cantrips", 2, "wizard", 0),
                spell_mod("magic-initiate-spell", 1, "wizard", 1),
            ],
            ..feat("magic-initiate", "Magic Initiate", Origin, "Learn two cantrips and a 1st-level spell.")
        },
        Feat {
            modifiers: vec![
                ability_mod("linguist-ability", 1, 1, &[Intelligence]),
                language_mod("linguist-languages", 3),
            ],
            ..feat("linguist", "Linguist", General, "Learn three languages and create ciphers.")
        },
        Feat {
            modifiers: vec![ability_mod("resilient-ability", 1, 1, &[])],
            ..feat("resilient", "Resilient", General, "Increase one ability score and gain proficiency in its saving throws.")
        },
        Feat {
            modifiers: vec![ability_mod("observant-ability", 1, 1, &[Intelligence, Wisdom])],
            ..feat("observant", "Observant", General, "+5 to passive Perception and Investigation; read lips.")
        },
        Feat {
            ability_bonuses: vec![FixedBonus::new(Charisma, 1)],
            ..feat("actor", "Actor", General, "Advantage on Deception and Performance when impersonating.")
        },
        feat("war-caster", "War Caster", General, "Advantage on concentration saves; cast spells as opportunity attacks."),
        feat("great-weapon-master", "Great Weapon Master", General, "Trade accuracy for damage with heavy weapons."),
        feat("sentinel", "Sentinel", General, "Opportunity attacks stop movement."),
    ]
}

// ============================================================================
// Spells
// ============================================================================

fn spell(slug: &str, name: &str, level: u8, school: &str, classes: &[&str]) -> Spell {
    Spell {
        slug: slug.to_string(),
        name: name.to_string(),
        level,
        school: school.to_string(),
        classes: strings(classes),
    }
}

fn spells() -> Vec<Spell> {
    const ARCANE: &[&str] = &["bard", "sorcerer", "warlock", "wizard"];
    vec![
        // Cantrips
        spell("chill-touch", "Chill Touch", 0, "necromancy", &["sorcerer", "warlock", "wizard"]),
        spell("eldritch-blast", "Eldritch Blast", 0, "evocation", &["warlock"]),
        spell("fire-bolt", "Fire Bolt", 0, "evocation", &["sorcerer", "wizard"]),
        spell("guidance", "Guidance", 0, "divination", &["cleric"]),
        spell("light", "Light", 0, "evocation", &["bard", "cleric", "sorcerer", "wizard"]),
        spell("mage-hand", "Mage Hand", 0, "conjuration", ARCANE),
        spell("message", "Message", 0, "transmutation", &["bard", "sorcerer", "wizard"]),
        spell("minor-illusion", "Minor Illusion", 0, "illusion", ARCANE),
        spell("poison-spray", "Poison Spray", 0, "conjuration", &["sorcerer", "warlock", "wizard"]),
        spell("prestidigitation", "Prestidigitation", 0, "transmutation", ARCANE),
        spell("ray-of-frost", "Ray of Frost", 0, "evocation", &["sorcerer", "wizard"]),
        spell("sacred-flame", "Sacred Flame", 0, "evocation", &["cleric"]),
        spell("shocking-grasp", "Shocking Grasp", 0, "evocation", &["sorcerer", "wizard"]),
        spell("spare-the-dying", "Spare the Dying", 0, "necromancy", &["cleric"]),
        spell("thaumaturgy", "Thaumaturgy", 0, "transmutation", &["cleric"]),
        spell("true-strike", "True Strike", 0, "divination", ARCANE),
        spell("vicious-mockery", "Vicious Mockery", 0, "enchantment", &["bard"]),
        // 1st level
        spell("armor-of-agathys", "Armor of Agathys", 1, "abjuration", &["warlock"]),
        spell("bless", "Bless", 1, "enchantment", &["cleric", "paladin"]),
        spell("burning-hands", "Burning Hands", 1, "evocation", &["sorcerer", "wizard"]),
        spell("charm-person", "Charm Person", 1, "enchantment", ARCANE),
        spell("cure-wounds", "Cure Wounds", 1, "evocation", &["bard", "cleric", "paladin", "ranger"]),
        spell("detect-magic", "Detect Magic", 1, "divination", &["bard", "cleric", "paladin", "ranger", "sorcerer", "wizard"]),
        spell("disguise-self", "Disguise Self", 1, "illusion", &["bard", "sorcerer", "wizard"]),
        spell("dissonant-whispers", "Dissonant Whispers", 1, "enchantment", &["bard"]),
        spell("feather-fall", "Feather Fall", 1, "transmutation", &["bard", "sorcerer", "wizard"]),
        spell("find-familiar", "Find Familiar", 1, "conjuration", &["wizard"]),
        spell("goodberry", "Goodberry", 1, "transmutation", &["ranger"]),
        spell("guiding-bolt", "Guiding Bolt", 1, "evocation", &["cleric"]),
        spell("healing-word", "Healing Word", 1, "evocation", &["bard", "cleric"]),
        spell("hellish-rebuke", "Hellish Rebuke", 1, "evocation", &["warlock"]),
        spell("hex", "Hex", 1, "enchantment", &["warlock"]),
        spell("hunters-mark", "Hunter's Mark", 1, "divination", &["ranger"]),
        spell("identify", "Identify", 1, "divination", &["bard", "wizard"]),
        spell("mage-armor", "Mage Armor", 1, "abjuration", &["sorcerer", "wizard"]),
        spell("magic-missile", "Magic Missile", 1, "evocation", &["sorcerer", "wizard"]),
        spell("shield", "Shield", 1, "abjuration", &["sorcerer", "wizard"]),
        spell("shield-of-faith", "Shield of Faith", 1, "abjuration", &["cleric", "paladin"]),
        spell("sleep", "Sleep", 1, "enchantment", &["bard", "sorcerer", "wizard"]),
        spell("thunderwave", "Thunderwave", 1, "evocation", &["bard", "sorcerer", "wizard"]),
        // 2nd level
        spell("hold-person", "Hold Person", 2, "enchantment", &["bard", "cleric", "sorcerer", "warlock", "wizard"]),
        spell("invisibility", "Invisibility", 2, "illusion", ARCANE),
        spell("misty-step", "Misty Step", 2, "conjuration", &["sorcerer", "warlock", "wizard"]),
        spell("pass-without-trace", "Pass without Trace", 2, "abjuration", &["ranger"]),
        spell("scorching-ray", "Scorching Ray", 2, "evocation", &["sorcerer", "wizard"]),
        spell("shatter", "Shatter", 2, "evocation", ARCANE),
        spell("spiritual-weapon", "Spiritual Weapon", 2, "evocation", &["cleric"]),
        spell("suggestion", "Suggestion", 2, "enchantment", ARCANE),
        // 3rd level
        spell("counterspell", "Counterspell", 3, "abjuration", &["sorcerer", "warlock", "wizard"]),
        spell("fireball", "Fireball", 3, "evocation", &["sorcerer", "wizard"]),
        spell("hypnotic-pattern", "Hypnotic Pattern", 3, "illusion", ARCANE),
        spell("lightning-bolt", "Lightning Bolt", 3, "evocation", &["sorcerer", "wizard"]),
        spell("revivify", "Revivify", 3, "necromancy", &["cleric", "paladin"]),
        spell("spirit-guardians", "Spirit Guardians", 3, "conjuration", &["cleric"]),
    ]
}

// ============================================================================
// Optional Features
// ============================================================================

fn optional(
    slug: &str,
    name: &str,
    feature_type: OptionalFeatureType,
    level_requirement: u8,
    classes: &[&str],
    description: &str,
) -> OptionalFeature {
    OptionalFeature {
        slug: slug.to_string(),
        name: name.to_string(),
        feature_type,
        level_requirement,
        classes: strings(classes),
        description: description.to_string(),
    }
}

fn optional_features() -> Vec<OptionalFeature> {
    use OptionalFeatureType::*;
    vec![
        // Fighting styles
        optional("archery", "Archery", FightingStyle, 0, &["fighter", "ranger"], "+2 to attack rolls with ranged weapons."),
        optional("defense", "Defense", FightingStyle, 0, &["fighter", "ranger", "paladin"], "+1 AC while wearing armor."),
        optional("dueling", "Dueling", FightingStyle, 0, &["fighter", "ranger", "paladin"], "+2 damage with a one-handed weapon and no other weapon."),
        optional("great-weapon-fighting", "Great Weapon Fighting", FightingStyle, 0, &["fighter", "paladin"], "Reroll 1s and 2s on two-handed weapon damage."),
        optional("protection", "Protection", FightingStyle, 0, &["fighter", "paladin"], "Impose disadvantage on an attack against an adjacent ally."),
        optional("two-weapon-fighting", "Two-Weapon Fighting", FightingStyle, 0, &["fighter", "ranger"], "Add ability modifier to off-hand damage."),
        // Eldritch invocations
        optional("agonizing-blast", "Agonizing Blast", EldritchInvocation, 0, &["warlock"], "Add CHA modifier to eldritch blast damage."),
        optional("armor-of-shadows", "Armor of Shadows", EldritchInvocation, 0, &["warlock"], "Cast mage armor on yourself at will."),
        optional("devils-sight", "Devil's Sight", EldritchInvocation, 0, &["warlock"], "See normally in magical darkness to 120 feet."),
        optional("mask-of-many-faces", "Mask of Many Faces", EldritchInvocation, 0, &["warlock"], "Cast disguise self at will."),
        optional("repelling-blast", "Repelling Blast", EldritchInvocation, 0, &["warlock"], "Eldritch blast pushes targets 10 feet."),
        optional("one-with-shadows", "One with Shadows", EldritchInvocation, 5, &["warlock"], "Become invisible in dim light or darkness."),
        optional("thirsting-blade", "Thirsting Blade", EldritchInvocation, 5, &["warlock"], "Attack twice with your pact weapon."),
        optional("lifedrinker", "Lifedrinker", EldritchInvocation, 12, &["warlock"], "Pact weapon deals extra necrotic damage."),
        // Maneuvers
        optional("commanders-strike", "Commander's Strike", Maneuver, 0, &["fighter"], "Direct an ally to strike."),
        optional("disarming-attack", "Disarming Attack", Maneuver, 0, &["fighter"], "Force a target to drop an item."),
        optional("distracting-strike", "Distracting Strike", Maneuver, 0, &["fighter"], "Give an ally advantage against the target."),
        optional("evasive-footwork", "Evasive Footwork", Maneuver, 0, &["fighter"], "Add a superiority die to AC while moving."),
        optional("feinting-attack", "Feinting Attack", Maneuver, 0, &["fighter"], "Gain advantage on your next attack."),
        optional("goading-attack", "Goading Attack", Maneuver, 0, &["fighter"], "Goad the target into attacking you."),
        optional("menacing-attack", "Menacing Attack", Maneuver, 0, &["fighter"], "Frighten the target."),
        optional("parry", "Parry", Maneuver, 0, &["fighter"], "Reduce melee damage taken."),
        optional("precision-attack", "Precision Attack", Maneuver, 0, &["fighter"], "Add a superiority die to an attack roll."),
        optional("riposte", "Riposte", Maneuver, 0, &["fighter"], "Counterattack when a creature misses you."),
        optional("trip-attack", "Trip Attack", Maneuver, 0, &["fighter"], "Knock the target prone."),
        // Metamagic
        optional("careful-spell", "Careful Spell", Metamagic, 0, &["sorcerer"], "Protect creatures from your spell's full force."),
        optional("distant-spell", "Distant Spell", Metamagic, 0, &["sorcerer"], "Double a spell's range."),
        optional("empowered-spell", "Empowered Spell", Metamagic, 0, &["sorcerer"], "Reroll damage dice."),
        optional("extended-spell", "Extended Spell", Metamagic, 0, &["sorcerer"], "Double a spell's duration."),
        optional("heightened-spell", "Heightened Spell", Metamagic, 0, &["sorcerer"], "Give one target disadvantage on its save."),
        optional("quickened-spell", "Quickened Spell", Metamagic, 0, &["sorcerer"], "Cast a spell as a bonus action."),
        optional("subtle-spell", "Subtle Spell", Metamagic, 0, &["sorcerer"], "Cast without verbal or somatic components."),
        optional("twinned-spell", "Twinned Spell", Metamagic, 0, &["sorcerer"], "Target a second creature with a single-target spell."),
    ]
}

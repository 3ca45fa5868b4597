//! Read-only rules reference data addressed by slug.
//!
//! The catalog holds races, backgrounds, classes, subclasses, feats, spells,
//! optional features and the small lookup lists (languages, skills, tools,
//! items) that choice options are drawn from. A built-in dataset is available
//! through [`Catalog::srd`]; custom catalogs are assembled with the `with_*`
//! builders or loaded from JSON.

mod srd;

use crate::character::{Ability, Size};
use crate::dice::DieType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate {kind} slug '{slug}'")]
    Duplicate { kind: &'static str, slug: String },

    #[error("{kind} '{slug}' references unknown {target} '{reference}'")]
    UnknownReference {
        kind: &'static str,
        slug: String,
        target: &'static str,
        reference: String,
    },
}

// ============================================================================
// Modifiers
// ============================================================================

/// A choice-bearing grant attached to a race, background, feat or subclass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    /// Stable identifier, used as the choice group.
    pub id: String,
    /// Class level at which a subclass modifier becomes available.
    #[serde(default)]
    pub level: u8,
    #[serde(flatten)]
    pub choice: ModifierChoice,
}

impl Modifier {
    pub fn new(id: impl Into<String>, choice: ModifierChoice) -> Self {
        Self {
            id: id.into(),
            level: 0,
            choice,
        }
    }

    pub fn at_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }
}

/// What a modifier lets the character choose. Empty option lists mean
/// "anything of that kind in the catalog".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModifierChoice {
    AbilityScore {
        count: usize,
        bonus: i8,
        #[serde(default)]
        options: Vec<Ability>,
        #[serde(default)]
        distinct: bool,
    },
    Skill {
        count: usize,
        #[serde(default)]
        options: Vec<String>,
    },
    Tool {
        count: usize,
        #[serde(default)]
        options: Vec<String>,
    },
    Language {
        count: usize,
        #[serde(default)]
        options: Vec<String>,
    },
    Feat {
        #[serde(default)]
        category: Option<FeatCategory>,
    },
    Spell {
        count: usize,
        spell_list: String,
        max_level: u8,
    },
}

/// A fixed ability bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedBonus {
    pub ability: Ability,
    pub bonus: i8,
}

impl FixedBonus {
    pub fn new(ability: Ability, bonus: i8) -> Self {
        Self { ability, bonus }
    }
}

// ============================================================================
// Races and Backgrounds
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Race {
    pub slug: String,
    pub name: String,
    /// Parent race for subraces.
    #[serde(default)]
    pub parent: Option<String>,
    pub speed: u32,
    pub sizes: Vec<Size>,
    /// The race lets the player pick among `sizes`.
    #[serde(default)]
    pub size_choice: bool,
    #[serde(default)]
    pub ability_bonuses: Vec<FixedBonus>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

// ============================================================================
// Feats, Spells, Optional Features
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatCategory {
    /// Available from backgrounds and lineage bonus feats.
    Origin,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feat {
    pub slug: String,
    pub name: String,
    pub category: FeatCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ability_bonuses: Vec<FixedBonus>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub slug: String,
    pub name: String,
    /// 0 for cantrips.
    pub level: u8,
    #[serde(default)]
    pub school: String,
    /// Class spell lists the spell appears on.
    pub classes: Vec<String>,
}

impl Spell {
    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }

    pub fn on_list(&self, spell_list: &str) -> bool {
        self.classes.iter().any(|c| c == spell_list)
    }
}

/// Families of optional class features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalFeatureType {
    FightingStyle,
    EldritchInvocation,
    Maneuver,
    Metamagic,
}

impl OptionalFeatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionalFeatureType::FightingStyle => "fighting_style",
            OptionalFeatureType::EldritchInvocation => "eldritch_invocation",
            OptionalFeatureType::Maneuver => "maneuver",
            OptionalFeatureType::Metamagic => "metamagic",
        }
    }
}

impl fmt::Display for OptionalFeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalFeature {
    pub slug: String,
    pub name: String,
    pub feature_type: OptionalFeatureType,
    /// Minimum class level; 0 when unrestricted.
    #[serde(default)]
    pub level_requirement: u8,
    /// Classes that may take the feature.
    pub classes: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl OptionalFeature {
    pub fn available_to(&self, class_slug: &str, class_level: u8) -> bool {
        self.level_requirement <= class_level && self.classes.iter().any(|c| c == class_slug)
    }
}

// ============================================================================
// Lookup Lists
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub exotic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDef {
    pub slug: String,
    pub name: String,
    pub ability: Ability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDef {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub slug: String,
    pub name: String,
}

// ============================================================================
// Classes and Subclasses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassFeature {
    pub name: String,
    pub level: u8,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillChoice {
    pub count: usize,
    /// Skills granted when the class is taken as a multiclass; 0 for none.
    #[serde(default)]
    pub multiclass_count: usize,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolChoice {
    pub count: usize,
    pub options: Vec<String>,
}

/// Per-level spellcasting tables, indexed by class level - 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spellcasting {
    pub ability: Ability,
    #[serde(default)]
    pub cantrips_known: Vec<usize>,
    /// Empty for prepared casters.
    #[serde(default)]
    pub spells_known: Vec<usize>,
    pub max_spell_level: Vec<u8>,
}

impl Spellcasting {
    fn at(table: &[usize], class_level: u8) -> usize {
        let index = (class_level as usize).saturating_sub(1);
        table.get(index).or(table.last()).copied().unwrap_or(0)
    }

    pub fn cantrips_at(&self, class_level: u8) -> usize {
        Self::at(&self.cantrips_known, class_level)
    }

    pub fn spells_known_at(&self, class_level: u8) -> usize {
        Self::at(&self.spells_known, class_level)
    }

    pub fn max_spell_level_at(&self, class_level: u8) -> u8 {
        let index = (class_level as usize).saturating_sub(1);
        self.max_spell_level
            .get(index)
            .or(self.max_spell_level.last())
            .copied()
            .unwrap_or(0)
    }

    /// First class level with at least one cantrip.
    pub fn first_cantrip_level(&self) -> Option<u8> {
        first_nonzero(&self.cantrips_known)
    }

    /// First class level with at least one known spell.
    pub fn first_spells_known_level(&self) -> Option<u8> {
        first_nonzero(&self.spells_known)
    }
}

fn first_nonzero(table: &[usize]) -> Option<u8> {
    table
        .iter()
        .position(|&n| n > 0)
        .map(|index| index as u8 + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertiseGrant {
    pub level: u8,
    pub count: usize,
    /// Only skills qualify, never tools.
    #[serde(default)]
    pub skills_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterStep {
    pub level: u8,
    pub value: usize,
}

/// A level progression of how many optional features of one family a class
/// or subclass knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCounter {
    pub key: String,
    pub name: String,
    pub feature_type: OptionalFeatureType,
    pub progression: Vec<CounterStep>,
}

impl FeatureCounter {
    pub fn value_at(&self, class_level: u8) -> usize {
        self.progression
            .iter()
            .filter(|step| step.level <= class_level)
            .max_by_key(|step| step.level)
            .map(|step| step.value)
            .unwrap_or(0)
    }

    pub fn first_level(&self) -> Option<u8> {
        self.progression
            .iter()
            .filter(|step| step.value > 0)
            .map(|step| step.level)
            .min()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGrant {
    pub item_slug: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentBundle {
    pub slug: String,
    pub label: String,
    pub items: Vec<ItemGrant>,
}

/// Mutually exclusive starting-equipment bundles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentChoice {
    pub group: String,
    pub label: String,
    pub bundles: Vec<EquipmentBundle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub slug: String,
    pub name: String,
    pub hit_die: DieType,
    pub saving_throws: Vec<Ability>,
    pub skill_choice: SkillChoice,
    #[serde(default)]
    pub tool_choice: Option<ToolChoice>,
    pub subclass_level: u8,
    pub subclass_title: String,
    #[serde(default)]
    pub features: Vec<ClassFeature>,
    #[serde(default)]
    pub spellcasting: Option<Spellcasting>,
    #[serde(default)]
    pub asi_levels: Vec<u8>,
    #[serde(default)]
    pub expertise: Vec<ExpertiseGrant>,
    #[serde(default)]
    pub fighting_style_level: Option<u8>,
    #[serde(default)]
    pub counters: Vec<FeatureCounter>,
    #[serde(default)]
    pub equipment_choices: Vec<EquipmentChoice>,
}

impl Class {
    pub fn features_at(&self, class_level: u8) -> impl Iterator<Item = &ClassFeature> {
        self.features.iter().filter(move |f| f.level == class_level)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    pub value: String,
    pub label: String,
}

/// A subclass-internal pick, such as a totem spirit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantChoice {
    pub group: String,
    pub name: String,
    pub level: u8,
    pub options: Vec<VariantOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subclass {
    pub slug: String,
    pub name: String,
    /// Owning class slug.
    pub class: String,
    #[serde(default)]
    pub features: Vec<ClassFeature>,
    #[serde(default)]
    pub variants: Vec<VariantChoice>,
    /// Choices granted by subclass features; `Modifier::level` gates them.
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub counters: Vec<FeatureCounter>,
    #[serde(default)]
    pub fighting_style_level: Option<u8>,
}

// ============================================================================
// Catalog
// ============================================================================

/// Serialized catalog form: flat lists of every entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    pub races: Vec<Race>,
    pub backgrounds: Vec<Background>,
    pub classes: Vec<Class>,
    pub subclasses: Vec<Subclass>,
    pub feats: Vec<Feat>,
    pub spells: Vec<Spell>,
    pub optional_features: Vec<OptionalFeature>,
    pub languages: Vec<Language>,
    pub skills: Vec<SkillDef>,
    pub tools: Vec<ToolDef>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    races: BTreeMap<String, Race>,
    backgrounds: BTreeMap<String, Background>,
    classes: BTreeMap<String, Class>,
    subclasses: BTreeMap<String, Subclass>,
    feats: BTreeMap<String, Feat>,
    spells: BTreeMap<String, Spell>,
    optional_features: BTreeMap<String, OptionalFeature>,
    languages: BTreeMap<String, Language>,
    skills: BTreeMap<String, SkillDef>,
    tools: BTreeMap<String, ToolDef>,
    items: BTreeMap<String, Item>,
}

static SRD: LazyLock<Arc<Catalog>> = LazyLock::new(|| Arc::new(srd::build()));

fn insert_unique<T>(
    map: &mut BTreeMap<String, T>,
    kind: &'static str,
    slug: String,
    value: T,
) -> Result<(), CatalogError> {
    if map.contains_key(&slug) {
        return Err(CatalogError::Duplicate { kind, slug });
    }
    map.insert(slug, value);
    Ok(())
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in reference dataset.
    pub fn srd() -> Arc<Catalog> {
        Arc::clone(&SRD)
    }

    /// Load and validate a catalog from its JSON form.
    pub fn from_json(json: &str) -> Result<Catalog, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Catalog::from_data(data)
    }

    pub fn from_data(data: CatalogData) -> Result<Catalog, CatalogError> {
        let mut catalog = Catalog::new();
        for race in data.races {
            insert_unique(&mut catalog.races, "race", race.slug.clone(), race)?;
        }
        for background in data.backgrounds {
            insert_unique(&mut catalog.backgrounds, "background", background.slug.clone(), background)?;
        }
        for class in data.classes {
            insert_unique(&mut catalog.classes, "class", class.slug.clone(), class)?;
        }
        for subclass in data.subclasses {
            insert_unique(&mut catalog.subclasses, "subclass", subclass.slug.clone(), subclass)?;
        }
        for feat in data.feats {
            insert_unique(&mut catalog.feats, "feat", feat.slug.clone(), feat)?;
        }
        for spell in data.spells {
            insert_unique(&mut catalog.spells, "spell", spell.slug.clone(), spell)?;
        }
        for feature in data.optional_features {
            insert_unique(&mut catalog.optional_features, "optional feature", feature.slug.clone(), feature)?;
        }
        for language in data.languages {
            insert_unique(&mut catalog.languages, "language", language.slug.clone(), language)?;
        }
        for skill in data.skills {
            insert_unique(&mut catalog.skills, "skill", skill.slug.clone(), skill)?;
        }
        for tool in data.tools {
            insert_unique(&mut catalog.tools, "tool", tool.slug.clone(), tool)?;
        }
        for item in data.items {
            insert_unique(&mut catalog.items, "item", item.slug.clone(), item)?;
        }
        catalog.validate()?;
        Ok(catalog)
    }

    /// Flatten back into the serialized form.
    pub fn to_data(&self) -> CatalogData {
        CatalogData {
            races: self.races.values().cloned().collect(),
            backgrounds: self.backgrounds.values().cloned().collect(),
            classes: self.classes.values().cloned().collect(),
            subclasses: self.subclasses.values().cloned().collect(),
            feats: self.feats.values().cloned().collect(),
            spells: self.spells.values().cloned().collect(),
            optional_features: self.optional_features.values().cloned().collect(),
            languages: self.languages.values().cloned().collect(),
            skills: self.skills.values().cloned().collect(),
            tools: self.tools.values().cloned().collect(),
            items: self.items.values().cloned().collect(),
        }
    }

    // ========================================================================
    // Builders
    // ========================================================================

    pub fn with_race(mut self, race: Race) -> Self {
        self.races.insert(race.slug.clone(), race);
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.backgrounds.insert(background.slug.clone(), background);
        self
    }

    pub fn with_class(mut self, class: Class) -> Self {
        self.classes.insert(class.slug.clone(), class);
        self
    }

    pub fn with_subclass(mut self, subclass: Subclass) -> Self {
        self.subclasses.insert(subclass.slug.clone(), subclass);
        self
    }

    pub fn with_feat(mut self, feat: Feat) -> Self {
        self.feats.insert(feat.slug.clone(), feat);
        self
    }

    pub fn with_spell(mut self, spell: Spell) -> Self {
        self.spells.insert(spell.slug.clone(), spell);
        self
    }

    pub fn with_optional_feature(mut self, feature: OptionalFeature) -> Self {
        self.optional_features.insert(feature.slug.clone(), feature);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.languages.insert(language.slug.clone(), language);
        self
    }

    pub fn with_skill(mut self, skill: SkillDef) -> Self {
        self.skills.insert(skill.slug.clone(), skill);
        self
    }

    pub fn with_tool(mut self, tool: ToolDef) -> Self {
        self.tools.insert(tool.slug.clone(), tool);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.insert(item.slug.clone(), item);
        self
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn race(&self, slug: &str) -> Option<&Race> {
        self.races.get(slug)
    }

    /// The race followed by its ancestors, nearest first.
    pub fn race_chain(&self, slug: &str) -> Vec<&Race> {
        let mut chain = Vec::new();
        let mut next = self.races.get(slug);
        while let Some(race) = next {
            if chain.iter().any(|r: &&Race| r.slug == race.slug) {
                break;
            }
            chain.push(race);
            next = race.parent.as_deref().and_then(|p| self.races.get(p));
        }
        chain
    }

    pub fn background(&self, slug: &str) -> Option<&Background> {
        self.backgrounds.get(slug)
    }

    pub fn class(&self, slug: &str) -> Option<&Class> {
        self.classes.get(slug)
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.values()
    }

    pub fn subclass(&self, slug: &str) -> Option<&Subclass> {
        self.subclasses.get(slug)
    }

    pub fn subclasses_of<'a>(&'a self, class_slug: &'a str) -> impl Iterator<Item = &'a Subclass> {
        self.subclasses.values().filter(move |s| s.class == class_slug)
    }

    pub fn feat(&self, slug: &str) -> Option<&Feat> {
        self.feats.get(slug)
    }

    pub fn feats(&self) -> impl Iterator<Item = &Feat> {
        self.feats.values()
    }

    pub fn spell(&self, slug: &str) -> Option<&Spell> {
        self.spells.get(slug)
    }

    /// Spells on a class list within a level range, ordered by level then name.
    pub fn spells_for(&self, spell_list: &str, min_level: u8, max_level: u8) -> Vec<&Spell> {
        let mut spells: Vec<&Spell> = self
            .spells
            .values()
            .filter(|s| s.on_list(spell_list) && s.level >= min_level && s.level <= max_level)
            .collect();
        spells.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)));
        spells
    }

    pub fn optional_feature(&self, slug: &str) -> Option<&OptionalFeature> {
        self.optional_features.get(slug)
    }

    pub fn optional_features_of(
        &self,
        feature_type: OptionalFeatureType,
    ) -> impl Iterator<Item = &OptionalFeature> {
        self.optional_features
            .values()
            .filter(move |f| f.feature_type == feature_type)
    }

    pub fn language(&self, slug: &str) -> Option<&Language> {
        self.languages.get(slug)
    }

    pub fn languages(&self) -> impl Iterator<Item = &Language> {
        self.languages.values()
    }

    pub fn skill(&self, slug: &str) -> Option<&SkillDef> {
        self.skills.get(slug)
    }

    pub fn skills(&self) -> impl Iterator<Item = &SkillDef> {
        self.skills.values()
    }

    pub fn tool(&self, slug: &str) -> Option<&ToolDef> {
        self.tools.get(slug)
    }

    pub fn tools(&self) -> impl Iterator<Item = &ToolDef> {
        self.tools.values()
    }

    pub fn item(&self, slug: &str) -> Option<&Item> {
        self.items.get(slug)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check that every cross-reference resolves.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let unknown = |kind, slug: &str, target, reference: &str| CatalogError::UnknownReference {
            kind,
            slug: slug.to_string(),
            target,
            reference: reference.to_string(),
        };

        for race in self.races.values() {
            if let Some(parent) = &race.parent {
                if !self.races.contains_key(parent) {
                    return Err(unknown("race", &race.slug, "race", parent));
                }
            }
            for language in &race.languages {
                if !self.languages.contains_key(language) {
                    return Err(unknown("race", &race.slug, "language", language));
                }
            }
            for skill in &race.skills {
                if !self.skills.contains_key(skill) {
                    return Err(unknown("race", &race.slug, "skill", skill));
                }
            }
            self.validate_modifiers("race", &race.slug, &race.modifiers)?;
        }

        for background in self.backgrounds.values() {
            for skill in &background.skills {
                if !self.skills.contains_key(skill) {
                    return Err(unknown("background", &background.slug, "skill", skill));
                }
            }
            for tool in &background.tools {
                if !self.tools.contains_key(tool) {
                    return Err(unknown("background", &background.slug, "tool", tool));
                }
            }
            for language in &background.languages {
                if !self.languages.contains_key(language) {
                    return Err(unknown("background", &background.slug, "language", language));
                }
            }
            self.validate_modifiers("background", &background.slug, &background.modifiers)?;
        }

        for feat in self.feats.values() {
            self.validate_modifiers("feat", &feat.slug, &feat.modifiers)?;
        }

        for class in self.classes.values() {
            for skill in &class.skill_choice.options {
                if !self.skills.contains_key(skill) {
                    return Err(unknown("class", &class.slug, "skill", skill));
                }
            }
            for choice in &class.equipment_choices {
                for bundle in &choice.bundles {
                    for grant in &bundle.items {
                        if !self.items.contains_key(&grant.item_slug) {
                            return Err(unknown("class", &class.slug, "item", &grant.item_slug));
                        }
                    }
                }
            }
        }

        for subclass in self.subclasses.values() {
            if !self.classes.contains_key(&subclass.class) {
                return Err(unknown("subclass", &subclass.slug, "class", &subclass.class));
            }
            self.validate_modifiers("subclass", &subclass.slug, &subclass.modifiers)?;
        }

        for spell in self.spells.values() {
            for class in &spell.classes {
                if !self.classes.contains_key(class) {
                    return Err(unknown("spell", &spell.slug, "class", class));
                }
            }
        }

        Ok(())
    }

    fn validate_modifiers(
        &self,
        kind: &'static str,
        slug: &str,
        modifiers: &[Modifier],
    ) -> Result<(), CatalogError> {
        for modifier in modifiers {
            let (target, missing) = match &modifier.choice {
                ModifierChoice::Skill { options, .. } => (
                    "skill",
                    options.iter().find(|o| !self.skills.contains_key(*o)),
                ),
                ModifierChoice::Tool { options, .. } => (
                    "tool",
                    options.iter().find(|o| !self.tools.contains_key(*o)),
                ),
                ModifierChoice::Language { options, .. } => (
                    "language",
                    options.iter().find(|o| !self.languages.contains_key(*o)),
                ),
                ModifierChoice::Spell { spell_list, .. } => (
                    "class",
                    Some(spell_list).filter(|list| !self.classes.contains_key(*list)),
                ),
                ModifierChoice::AbilityScore { .. } | ModifierChoice::Feat { .. } => continue,
            };
            if let Some(reference) = missing {
                return Err(CatalogError::UnknownReference {
                    kind,
                    slug: slug.to_string(),
                    target,
                    reference: reference.clone(),
                });
            }
        }
        Ok(())
    }
}

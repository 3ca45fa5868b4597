//! The character aggregate that choice handlers read and write.
//!
//! Every record a handler creates carries a [`Provenance`] so that undo can
//! find exactly the rows it owns without touching rows written by another
//! handler, another source, or another instance of the same choice type.

use crate::choice::{ChoiceId, ChoiceSource};
use crate::catalog::OptionalFeatureType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CharacterId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ============================================================================
// Ability Scores
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ability {
    #[serde(rename = "str", alias = "Strength")]
    Strength,
    #[serde(rename = "dex", alias = "Dexterity")]
    Dexterity,
    #[serde(rename = "con", alias = "Constitution")]
    Constitution,
    #[serde(rename = "int", alias = "Intelligence")]
    Intelligence,
    #[serde(rename = "wis", alias = "Wisdom")]
    Wisdom,
    #[serde(rename = "cha", alias = "Charisma")]
    Charisma,
}

impl Ability {
    /// Lowercase code used in choice options and payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Ability::Strength => "str",
            Ability::Dexterity => "dex",
            Ability::Constitution => "con",
            Ability::Intelligence => "int",
            Ability::Wisdom => "wis",
            Ability::Charisma => "cha",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }

    /// Parse a code (`"str"`) or full name (`"Strength"`), case-insensitively.
    pub fn from_code(code: &str) -> Option<Ability> {
        let code = code.trim().to_lowercase();
        Ability::all()
            .into_iter()
            .find(|a| a.code() == code || a.name().to_lowercase() == code)
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Base ability scores, before any bonuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn standard_array() -> Self {
        Self::new(15, 14, 13, 12, 10, 8)
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: u8) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

/// D&D 5e modifier for a score: 8-9 = -1, 10-11 = 0, 12-13 = +1.
pub fn ability_modifier(score: u8) -> i8 {
    (i16::from(score) - 10).div_euclid(2) as i8
}

// ============================================================================
// Size
// ============================================================================

/// Creature size categories a race may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Size {
    Tiny,
    Small,
    Medium,
    Large,
}

impl Size {
    pub fn slug(&self) -> &'static str {
        match self {
            Size::Tiny => "tiny",
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Size::Tiny => "Tiny",
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Size> {
        [Size::Tiny, Size::Small, Size::Medium, Size::Large]
            .into_iter()
            .find(|s| s.slug() == slug)
    }
}

// ============================================================================
// Provenance
// ============================================================================

/// Ownership tag carried by every record on the character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provenance {
    pub source: ChoiceSource,
    pub source_slug: String,
    /// Set when the record was written by a choice; `None` for fixed grants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_group: Option<String>,
}

impl Provenance {
    /// A grant that came with a race, background or class, not a choice.
    pub fn fixed(source: ChoiceSource, source_slug: impl Into<String>) -> Self {
        Self {
            source,
            source_slug: source_slug.into(),
            choice_group: None,
        }
    }

    pub fn for_choice(id: &ChoiceId) -> Self {
        Self {
            source: id.source,
            source_slug: id.source_slug.clone(),
            choice_group: Some(id.group.clone()),
        }
    }

    /// Written by exactly this choice instance.
    pub fn is_choice(&self, id: &ChoiceId) -> bool {
        self.source == id.source
            && self.source_slug == id.source_slug
            && self.choice_group.as_deref() == Some(id.group.as_str())
    }

    /// Written by anything belonging to this source.
    pub fn is_from(&self, source: ChoiceSource, source_slug: &str) -> bool {
        self.source == source && self.source_slug == source_slug
    }
}

// ============================================================================
// Records
// ============================================================================

/// Per-class membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPivot {
    pub class_slug: String,
    pub level: u8,
    pub is_primary: bool,
    #[serde(default)]
    pub subclass_slug: Option<String>,
    /// Subclass-internal variants keyed by choice group (e.g. `totem_spirit`).
    #[serde(default)]
    pub subclass_choices: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScoreBonus {
    pub ability: Ability,
    pub bonus: i8,
    #[serde(default)]
    pub modifier_id: Option<String>,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyKind {
    Skill,
    Tool,
    SavingThrow,
}

impl ProficiencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProficiencyKind::Skill => "skill",
            ProficiencyKind::Tool => "tool",
            ProficiencyKind::SavingThrow => "saving_throw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proficiency {
    pub kind: ProficiencyKind,
    /// Skill slug, tool slug or ability code.
    pub slug: String,
    /// Set when an expertise choice doubled this proficiency.
    #[serde(default)]
    pub expertise: Option<Provenance>,
    pub provenance: Provenance,
}

impl Proficiency {
    pub fn has_expertise(&self) -> bool {
        self.expertise.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownLanguage {
    pub language_slug: String,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownSpell {
    pub spell_slug: String,
    pub level_acquired: u8,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub item_slug: String,
    pub quantity: u32,
    /// Starting-equipment bundle this item came from.
    #[serde(default)]
    pub bundle: Option<String>,
    pub provenance: Provenance,
}

/// A chosen optional feature (fighting style, invocation, maneuver, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSelection {
    pub feature_slug: String,
    pub feature_type: OptionalFeatureType,
    pub level_acquired: u8,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterFeat {
    pub feat_slug: String,
    pub level_acquired: u8,
    pub provenance: Provenance,
}

/// A class or subclass feature the character has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedFeature {
    pub name: String,
    pub description: String,
    pub class_slug: String,
    /// Class or subclass the feature belongs to.
    pub origin_slug: String,
    pub level: u8,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPointMethod {
    /// Maximum hit die at first level.
    Maximum,
    Roll,
    Average,
}

impl HitPointMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HitPointMethod::Maximum => "maximum",
            HitPointMethod::Roll => "roll",
            HitPointMethod::Average => "average",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPointGain {
    pub class_slug: String,
    pub class_level: u8,
    pub method: HitPointMethod,
    pub amount: i32,
    pub provenance: Provenance,
}

// ============================================================================
// Character
// ============================================================================

/// Maximum total character level.
pub const MAX_LEVEL: u8 = 20;

/// The mutable root entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub race_slug: String,
    #[serde(default)]
    pub background_slug: Option<String>,
    pub base_scores: AbilityScores,
    #[serde(default)]
    pub size: Option<Size>,

    pub classes: Vec<ClassPivot>,

    #[serde(default)]
    pub ability_bonuses: Vec<AbilityScoreBonus>,
    #[serde(default)]
    pub proficiencies: Vec<Proficiency>,
    #[serde(default)]
    pub languages: Vec<KnownLanguage>,
    #[serde(default)]
    pub spells: Vec<KnownSpell>,
    #[serde(default)]
    pub equipment: Vec<EquipmentItem>,
    #[serde(default)]
    pub feature_selections: Vec<FeatureSelection>,
    #[serde(default)]
    pub feats: Vec<CharacterFeat>,
    #[serde(default)]
    pub features: Vec<GrantedFeature>,
    #[serde(default)]
    pub hit_point_gains: Vec<HitPointGain>,

    #[serde(default)]
    pub backstory: Option<String>,
}

impl Character {
    pub fn new(name: impl Into<String>, race_slug: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            race_slug: race_slug.into(),
            background_slug: None,
            base_scores: AbilityScores::default(),
            size: None,
            classes: Vec::new(),
            ability_bonuses: Vec::new(),
            proficiencies: Vec::new(),
            languages: Vec::new(),
            spells: Vec::new(),
            equipment: Vec::new(),
            feature_selections: Vec::new(),
            feats: Vec::new(),
            features: Vec::new(),
            hit_point_gains: Vec::new(),
            backstory: None,
        }
    }

    /// Total character level across all classes.
    pub fn level(&self) -> u8 {
        self.classes.iter().map(|c| c.level).sum()
    }

    pub fn primary_class(&self) -> Option<&ClassPivot> {
        self.classes.iter().find(|c| c.is_primary)
    }

    pub fn pivot(&self, class_slug: &str) -> Option<&ClassPivot> {
        self.classes.iter().find(|c| c.class_slug == class_slug)
    }

    pub fn pivot_mut(&mut self, class_slug: &str) -> Option<&mut ClassPivot> {
        self.classes.iter_mut().find(|c| c.class_slug == class_slug)
    }

    /// The pivot whose subclass is `subclass_slug`.
    pub fn pivot_with_subclass(&self, subclass_slug: &str) -> Option<&ClassPivot> {
        self.classes
            .iter()
            .find(|c| c.subclass_slug.as_deref() == Some(subclass_slug))
    }

    /// Base score plus every bonus, clamped to 1..=30.
    pub fn ability_score(&self, ability: Ability) -> u8 {
        let bonus: i32 = self
            .ability_bonuses
            .iter()
            .filter(|b| b.ability == ability)
            .map(|b| b.bonus as i32)
            .sum();
        (self.base_scores.get(ability) as i32 + bonus).clamp(1, 30) as u8
    }

    pub fn modifier(&self, ability: Ability) -> i8 {
        ability_modifier(self.ability_score(ability))
    }

    pub fn has_proficiency(&self, kind: ProficiencyKind, slug: &str) -> bool {
        self.proficiencies
            .iter()
            .any(|p| p.kind == kind && p.slug == slug)
    }

    pub fn knows_language(&self, slug: &str) -> bool {
        self.languages.iter().any(|l| l.language_slug == slug)
    }

    pub fn knows_spell(&self, slug: &str) -> bool {
        self.spells.iter().any(|s| s.spell_slug == slug)
    }

    pub fn has_feat(&self, slug: &str) -> bool {
        self.feats.iter().any(|f| f.feat_slug == slug)
    }

    pub fn has_feature_selection(&self, slug: &str) -> bool {
        self.feature_selections.iter().any(|f| f.feature_slug == slug)
    }

    /// Maximum hit points from recorded gains.
    pub fn max_hit_points(&self) -> i32 {
        self.hit_point_gains.iter().map(|g| g.amount).sum()
    }

    /// Remove every record matching `predicate` across all tagged collections.
    ///
    /// Expertise flags granted by a matching provenance are cleared as well.
    pub fn remove_records(&mut self, predicate: impl Fn(&Provenance) -> bool) {
        self.remove_matching(&predicate);
    }

    fn remove_matching(&mut self, predicate: &dyn Fn(&Provenance) -> bool) {
        self.ability_bonuses.retain(|r| !predicate(&r.provenance));
        self.proficiencies.retain(|r| !predicate(&r.provenance));
        for proficiency in &mut self.proficiencies {
            if proficiency.expertise.as_ref().is_some_and(|p| predicate(p)) {
                proficiency.expertise = None;
            }
        }
        self.languages.retain(|r| !predicate(&r.provenance));
        self.spells.retain(|r| !predicate(&r.provenance));
        self.equipment.retain(|r| !predicate(&r.provenance));
        self.feature_selections.retain(|r| !predicate(&r.provenance));
        self.features.retain(|r| !predicate(&r.provenance));
        self.hit_point_gains.retain(|r| !predicate(&r.provenance));

        // Feats go last: removing one cascades to whatever it granted.
        let removed: Vec<String> = self
            .feats
            .iter()
            .filter(|f| predicate(&f.provenance))
            .map(|f| f.feat_slug.clone())
            .collect();
        self.feats.retain(|r| !predicate(&r.provenance));
        for feat_slug in removed {
            self.remove_matching(&|p| p.is_from(ChoiceSource::Feat, &feat_slug));
        }
    }
}

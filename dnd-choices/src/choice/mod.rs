//! Pending choice value types.
//!
//! A [`PendingChoice`] describes one decision a character still has to make
//! (or has made, but which stays visible). Choices are never stored; they are
//! recomputed from the character and the catalog on every read.

pub mod id;

pub use id::{decode, encode, ChoiceId, DELIMITER};

use crate::catalog::OptionalFeatureType;
use crate::character::Ability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Choice Types and Sources
// ============================================================================

/// The closed set of choice kinds, one per handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceType {
    AbilityScore,
    Proficiency,
    Language,
    Equipment,
    Spell,
    Feat,
    AsiOrFeat,
    Subclass,
    SubclassVariant,
    Expertise,
    FightingStyle,
    HitPoints,
    OptionalFeature,
    Size,
}

impl ChoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChoiceType::AbilityScore => "ability_score",
            ChoiceType::Proficiency => "proficiency",
            ChoiceType::Language => "language",
            ChoiceType::Equipment => "equipment",
            ChoiceType::Spell => "spell",
            ChoiceType::Feat => "feat",
            ChoiceType::AsiOrFeat => "asi_or_feat",
            ChoiceType::Subclass => "subclass",
            ChoiceType::SubclassVariant => "subclass_variant",
            ChoiceType::Expertise => "expertise",
            ChoiceType::FightingStyle => "fighting_style",
            ChoiceType::HitPoints => "hit_points",
            ChoiceType::OptionalFeature => "optional_feature",
            ChoiceType::Size => "size",
        }
    }

    pub fn all() -> &'static [ChoiceType] {
        &[
            ChoiceType::AbilityScore,
            ChoiceType::Proficiency,
            ChoiceType::Language,
            ChoiceType::Equipment,
            ChoiceType::Spell,
            ChoiceType::Feat,
            ChoiceType::AsiOrFeat,
            ChoiceType::Subclass,
            ChoiceType::SubclassVariant,
            ChoiceType::Expertise,
            ChoiceType::FightingStyle,
            ChoiceType::HitPoints,
            ChoiceType::OptionalFeature,
            ChoiceType::Size,
        ]
    }
}

impl fmt::Display for ChoiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChoiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChoiceType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown choice type '{s}'"))
    }
}

/// Where a choice comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceSource {
    Race,
    Background,
    Class,
    Subclass,
    SubclassFeature,
    Feat,
    LevelUp,
}

impl ChoiceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChoiceSource::Race => "race",
            ChoiceSource::Background => "background",
            ChoiceSource::Class => "class",
            ChoiceSource::Subclass => "subclass",
            ChoiceSource::SubclassFeature => "subclass_feature",
            ChoiceSource::Feat => "feat",
            ChoiceSource::LevelUp => "level_up",
        }
    }

    pub fn all() -> &'static [ChoiceSource] {
        &[
            ChoiceSource::Race,
            ChoiceSource::Background,
            ChoiceSource::Class,
            ChoiceSource::Subclass,
            ChoiceSource::SubclassFeature,
            ChoiceSource::Feat,
            ChoiceSource::LevelUp,
        ]
    }
}

impl fmt::Display for ChoiceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChoiceSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChoiceSource::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown choice source '{s}'"))
    }
}

// ============================================================================
// Pending Choice
// ============================================================================

/// One selectable option of a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Identifier submitted back in a selection.
    pub value: String,
    /// Display name.
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Type-specific data needed to validate and apply a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_group: Option<String>,
    /// Bonus applied per selected ability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus: Option<i8>,
    /// Every selected value must differ.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub distinct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability_cap: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_slug: Option<String>,
    /// Class whose spell list the options are drawn from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spell_list: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_spell_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<OptionalFeatureType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_die: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub con_modifier: Option<i8>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skills_only: bool,
}

/// A decision surfaced to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingChoice {
    pub id: ChoiceId,
    #[serde(rename = "type")]
    pub choice_type: ChoiceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub source: ChoiceSource,
    pub source_name: String,
    pub level_granted: u8,
    pub required: bool,
    pub quantity: usize,
    pub remaining: usize,
    pub selected: Vec<String>,
    /// Inline options; `None` when they must be fetched from `options_endpoint`.
    pub options: Option<Vec<ChoiceOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_endpoint: Option<String>,
    pub metadata: ChoiceMetadata,
}

impl PendingChoice {
    /// Create an unresolved, required choice for the given identity.
    pub fn new(id: ChoiceId, source_name: impl Into<String>, quantity: usize) -> Self {
        Self {
            choice_type: id.choice_type,
            source: id.source,
            level_granted: id.level,
            id,
            subtype: None,
            source_name: source_name.into(),
            required: true,
            quantity,
            remaining: quantity,
            selected: Vec::new(),
            options: Some(Vec::new()),
            options_endpoint: None,
            metadata: ChoiceMetadata::default(),
        }
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Record the current selections; `remaining` never drops below zero.
    pub fn with_selected(mut self, selected: Vec<String>) -> Self {
        self.remaining = self.quantity.saturating_sub(selected.len());
        self.selected = selected;
        self
    }

    pub fn with_options(mut self, options: Vec<ChoiceOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Options are served elsewhere instead of inline.
    pub fn with_metadata(mut self, metadata: ChoiceMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    pub fn group(&self) -> &str {
        &self.id.group
    }

    pub fn source_slug(&self) -> &str {
        &self.id.source_slug
    }

    /// Whether `value` may be submitted: offered inline or already selected.
    pub fn offers(&self, value: &str) -> bool {
        self.selected.iter().any(|s| s == value)
            || self
                .options
                .as_ref()
                .is_some_and(|options| options.iter().any(|o| o.value == value))
    }
}

// ============================================================================
// Selection Payloads
// ============================================================================

/// A submitted answer to a pending choice.
///
/// Most choice types take a list of option values. `asi_or_feat` takes a
/// tagged object and `subclass` also accepts a bare subclass slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    AsiOrFeat(AsiOrFeatSelection),
    Subclass { subclass_slug: String },
    Options { selected: Vec<String> },
}

/// Payload for an ability score improvement slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AsiOrFeatSelection {
    Feat { feat_slug: String },
    Asi { increases: BTreeMap<Ability, u8> },
}

impl Selection {
    /// Build a list selection.
    pub fn options<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Options {
            selected: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn feat(feat_slug: impl Into<String>) -> Self {
        Selection::AsiOrFeat(AsiOrFeatSelection::Feat {
            feat_slug: feat_slug.into(),
        })
    }

    pub fn asi(increases: impl IntoIterator<Item = (Ability, u8)>) -> Self {
        Selection::AsiOrFeat(AsiOrFeatSelection::Asi {
            increases: increases.into_iter().collect(),
        })
    }

    pub fn subclass(subclass_slug: impl Into<String>) -> Self {
        Selection::Subclass {
            subclass_slug: subclass_slug.into(),
        }
    }

    /// The list form, if this is one.
    pub fn as_options(&self) -> Option<&[String]> {
        match self {
            Selection::Options { selected } => Some(selected),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_type_round_trips_through_str() {
        for choice_type in ChoiceType::all() {
            assert_eq!(choice_type.as_str().parse::<ChoiceType>(), Ok(*choice_type));
        }
        assert!("spellbook".parse::<ChoiceType>().is_err());
    }

    #[test]
    fn test_remaining_never_negative() {
        let id = ChoiceId::new(ChoiceType::Spell, ChoiceSource::Class, "wizard", 1, "cantrips");
        let choice = PendingChoice::new(id, "Wizard", 2).with_selected(vec![
            "light".to_string(),
            "mage-hand".to_string(),
            "fire-bolt".to_string(),
        ]);
        assert_eq!(choice.remaining, 0);
        assert!(choice.is_complete());
    }

    #[test]
    fn test_selection_parses_list_form() {
        let selection: Selection = serde_json::from_str(r#"{"selected": ["athletics"]}"#).unwrap();
        assert_eq!(selection.as_options(), Some(&["athletics".to_string()][..]));
    }

    #[test]
    fn test_selection_parses_asi_form() {
        let selection: Selection =
            serde_json::from_str(r#"{"type": "asi", "increases": {"str": 1, "con": 1}}"#).unwrap();
        assert_eq!(
            selection,
            Selection::asi([(Ability::Strength, 1), (Ability::Constitution, 1)])
        );
    }

    #[test]
    fn test_selection_parses_feat_and_subclass_forms() {
        let feat: Selection = serde_json::from_str(r#"{"type": "feat", "feat_slug": "alert"}"#).unwrap();
        assert_eq!(feat, Selection::feat("alert"));

        let subclass: Selection = serde_json::from_str(r#"{"subclass_slug": "champion"}"#).unwrap();
        assert_eq!(subclass, Selection::subclass("champion"));
    }

    #[test]
    fn test_pending_choice_serializes_type_and_string_id() {
        let id = ChoiceId::new(ChoiceType::Size, ChoiceSource::Race, "custom-lineage", 1, "size");
        let choice = PendingChoice::new(id, "Custom Lineage", 1);
        let json = serde_json::to_value(&choice).unwrap();
        assert_eq!(json["type"], "size");
        assert_eq!(json["id"], "size|race|custom-lineage|1|size");
        assert_eq!(json["remaining"], 1);
        assert!(json.get("options_endpoint").is_none());
    }

    #[test]
    fn test_fetched_options_serialize_as_null() {
        let id = ChoiceId::new(ChoiceType::Feat, ChoiceSource::Race, "variant-human", 1, "feat");
        let choice = PendingChoice {
            options: None,
            options_endpoint: Some("/catalog/feats".to_string()),
            ..PendingChoice::new(id, "Variant Human", 1).with_selected(vec!["alert".to_string()])
        };
        let json = serde_json::to_value(&choice).unwrap();
        assert!(json["options"].is_null());
        assert_eq!(json["options_endpoint"], "/catalog/feats");

        // Without inline options only the current pick is known to be valid.
        assert!(choice.offers("alert"));
        assert!(!choice.offers("sentinel"));
    }
}

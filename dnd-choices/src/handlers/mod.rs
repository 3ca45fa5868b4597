//! Choice handlers, one per [`ChoiceType`].
//!
//! Each handler discovers its choices from the character and the catalog,
//! validates and applies selections, and reverses them where the rules allow.
//! Handlers are stateless unit structs looked up through [`handler_for`].

pub mod ability_score;
pub mod asi_or_feat;
pub mod equipment;
pub mod expertise;
pub mod feat;
pub mod fighting_style;
pub mod hit_points;
pub mod language;
pub mod optional_feature;
pub mod proficiency;
pub mod size;
pub mod spell;
pub mod subclass;
pub mod subclass_variant;

use crate::catalog::{Catalog, Class, Modifier};
use crate::character::{Character, ClassPivot};
use crate::choice::{ChoiceId, ChoiceSource, ChoiceType, PendingChoice, Selection};
use crate::engine::EngineConfig;
use crate::error::{ChoiceError, Result};
use rand::RngCore;
use std::collections::HashSet;

/// Read-only rules state shared by every handler call.
#[derive(Clone, Copy)]
pub struct RulesContext<'a> {
    pub catalog: &'a Catalog,
    pub config: &'a EngineConfig,
}

impl<'a> RulesContext<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a EngineConfig) -> Self {
        Self { catalog, config }
    }
}

/// Rule logic for one choice type.
pub trait ChoiceHandler: Send + Sync {
    fn choice_type(&self) -> ChoiceType;

    /// Every instance of this type for the character, resolved or not.
    fn get_choices(&self, rules: &RulesContext<'_>, character: &Character) -> Vec<PendingChoice>;

    /// Validate `selection` against `choice` and write it, replacing any
    /// previous selection for the same instance.
    fn resolve(
        &self,
        rules: &RulesContext<'_>,
        rng: &mut dyn RngCore,
        character: &mut Character,
        choice: &PendingChoice,
        selection: &Selection,
    ) -> Result<()>;

    fn can_undo(&self, character: &Character, choice: &PendingChoice) -> bool;

    /// Remove the records this instance wrote.
    fn undo(
        &self,
        _rules: &RulesContext<'_>,
        character: &mut Character,
        choice: &PendingChoice,
    ) -> Result<()> {
        if !self.can_undo(character, choice) {
            return Err(ChoiceError::not_undoable(format!(
                "{} choices cannot be undone",
                self.choice_type()
            )));
        }
        character.remove_records(|p| p.is_choice(&choice.id));
        Ok(())
    }
}

/// The handler owning `choice_type`.
pub fn handler_for(choice_type: ChoiceType) -> &'static dyn ChoiceHandler {
    match choice_type {
        ChoiceType::AbilityScore => &ability_score::AbilityScoreHandler,
        ChoiceType::Proficiency => &proficiency::ProficiencyHandler,
        ChoiceType::Language => &language::LanguageHandler,
        ChoiceType::Equipment => &equipment::EquipmentHandler,
        ChoiceType::Spell => &spell::SpellHandler,
        ChoiceType::Feat => &feat::FeatHandler,
        ChoiceType::AsiOrFeat => &asi_or_feat::AsiOrFeatHandler,
        ChoiceType::Subclass => &subclass::SubclassHandler,
        ChoiceType::SubclassVariant => &subclass_variant::SubclassVariantHandler,
        ChoiceType::Expertise => &expertise::ExpertiseHandler,
        ChoiceType::FightingStyle => &fighting_style::FightingStyleHandler,
        ChoiceType::HitPoints => &hit_points::HitPointsHandler,
        ChoiceType::OptionalFeature => &optional_feature::OptionalFeatureHandler,
        ChoiceType::Size => &size::SizeHandler,
    }
}

/// All registered handlers in a stable order.
pub fn handlers() -> impl Iterator<Item = &'static dyn ChoiceHandler> {
    ChoiceType::all().iter().map(|t| handler_for(*t))
}

// ============================================================================
// Selection Validation
// ============================================================================

/// The list form of a selection, or an error naming what was expected.
pub(crate) fn list_selection<'s>(selection: &'s Selection, noun: &str) -> Result<&'s [String]> {
    selection
        .as_options()
        .ok_or_else(|| ChoiceError::invalid(format!("Expected a list of selected {noun}")))
}

/// Check a list selection: non-empty, exactly `choice.quantity` long,
/// optionally duplicate-free, and drawn from the offered options.
pub(crate) fn validate_list(
    choice: &PendingChoice,
    values: &[String],
    noun: &str,
    distinct: bool,
) -> Result<()> {
    if values.is_empty() {
        return Err(ChoiceError::invalid(format!("No {noun} selected")));
    }
    if values.len() > choice.quantity {
        return Err(ChoiceError::invalid(format!(
            "Cannot select {} {noun}; only {} allowed",
            values.len(),
            choice.quantity
        )));
    }
    if values.len() < choice.quantity {
        return Err(ChoiceError::invalid(format!(
            "Must select exactly {} {noun}; got {}",
            choice.quantity,
            values.len()
        )));
    }
    if distinct {
        let mut seen = HashSet::new();
        if let Some(dup) = values.iter().find(|v| !seen.insert(v.as_str())) {
            return Err(ChoiceError::invalid(format!("'{dup}' selected more than once")));
        }
    }
    if let Some(unknown) = values.iter().find(|v| !choice.offers(v)) {
        return Err(ChoiceError::invalid(format!(
            "'{unknown}' is not an option for this choice"
        )));
    }
    Ok(())
}

/// Check a selection that fills only the open slots of a partly resolved
/// choice: exactly `choice.remaining` new values, none already selected.
pub(crate) fn validate_remainder(choice: &PendingChoice, values: &[String], noun: &str) -> Result<()> {
    if values.is_empty() {
        return Err(ChoiceError::invalid(format!("No {noun} selected")));
    }
    if values.len() > choice.quantity {
        return Err(ChoiceError::invalid(format!(
            "Cannot select {} {noun}; only {} allowed",
            values.len(),
            choice.quantity
        )));
    }
    if values.len() != choice.remaining {
        return Err(ChoiceError::invalid(format!(
            "Must select exactly {} more {noun}, or all {} to replace them; got {}",
            choice.remaining,
            choice.quantity,
            values.len()
        )));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = values.iter().find(|v| !seen.insert(v.as_str())) {
        return Err(ChoiceError::invalid(format!("'{dup}' selected more than once")));
    }
    if let Some(known) = values.iter().find(|v| choice.selected.contains(v)) {
        return Err(ChoiceError::invalid(format!("'{known}' is already selected")));
    }
    if let Some(unknown) = values.iter().find(|v| !choice.offers(v)) {
        return Err(ChoiceError::invalid(format!(
            "'{unknown}' is not an option for this choice"
        )));
    }
    Ok(())
}

/// A single value from a one-pick choice.
pub(crate) fn single_value<'s>(
    choice: &PendingChoice,
    selection: &'s Selection,
    noun: &str,
) -> Result<&'s str> {
    let values = list_selection(selection, noun)?;
    validate_list(choice, values, noun, true)?;
    Ok(values[0].as_str())
}

// ============================================================================
// Granting Sources
// ============================================================================

/// One choice-bearing modifier together with the source that grants it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Grant<'a> {
    pub source: ChoiceSource,
    pub source_slug: &'a str,
    pub source_name: &'a str,
    pub level: u8,
    pub modifier: &'a Modifier,
}

impl Grant<'_> {
    pub fn id(&self, choice_type: ChoiceType) -> ChoiceId {
        ChoiceId::new(
            choice_type,
            self.source,
            self.source_slug,
            self.level,
            self.modifier.id.as_str(),
        )
    }
}

/// Every modifier the character currently has access to: the race chain,
/// the background, held feats and unlocked subclass features.
pub(crate) fn grants<'a>(catalog: &'a Catalog, character: &Character) -> Vec<Grant<'a>> {
    let mut grants = Vec::new();

    for race in catalog.race_chain(&character.race_slug) {
        grants.extend(race.modifiers.iter().map(move |modifier| Grant {
            source: ChoiceSource::Race,
            source_slug: &race.slug,
            source_name: &race.name,
            level: 1,
            modifier,
        }));
    }

    if let Some(background) = character
        .background_slug
        .as_deref()
        .and_then(|slug| catalog.background(slug))
    {
        grants.extend(background.modifiers.iter().map(move |modifier| Grant {
            source: ChoiceSource::Background,
            source_slug: &background.slug,
            source_name: &background.name,
            level: 1,
            modifier,
        }));
    }

    for held in &character.feats {
        if let Some(feat) = catalog.feat(&held.feat_slug) {
            grants.extend(feat.modifiers.iter().map(move |modifier| Grant {
                source: ChoiceSource::Feat,
                source_slug: &feat.slug,
                source_name: &feat.name,
                level: held.level_acquired,
                modifier,
            }));
        }
    }

    for pivot in &character.classes {
        let Some(subclass) = pivot
            .subclass_slug
            .as_deref()
            .and_then(|slug| catalog.subclass(slug))
        else {
            continue;
        };
        grants.extend(
            subclass
                .modifiers
                .iter()
                .filter(|m| m.level <= pivot.level)
                .map(move |modifier| Grant {
                    source: ChoiceSource::SubclassFeature,
                    source_slug: &subclass.slug,
                    source_name: &subclass.name,
                    level: modifier.level.max(1),
                    modifier,
                }),
        );
    }

    grants
}

/// Pivots paired with their catalog class, skipping unknown classes.
pub(crate) fn class_pivots<'a, 'c>(
    catalog: &'a Catalog,
    character: &'c Character,
) -> impl Iterator<Item = (&'c ClassPivot, &'a Class)> {
    character
        .classes
        .iter()
        .filter_map(move |pivot| catalog.class(&pivot.class_slug).map(|class| (pivot, class)))
}

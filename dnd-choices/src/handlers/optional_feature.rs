//! Counted optional features: eldritch invocations, maneuvers, metamagic.
//!
//! A class or subclass counter decides how many picks the pivot has at its
//! current class level; one instance per counter carries the whole set.

use super::{class_pivots, list_selection, validate_list, ChoiceHandler, RulesContext};
use crate::catalog::{Catalog, FeatureCounter, OptionalFeatureType};
use crate::character::{Character, ClassPivot, FeatureSelection, Provenance};
use crate::choice::{
    ChoiceId, ChoiceMetadata, ChoiceOption, ChoiceSource, ChoiceType, PendingChoice, Selection,
};
use crate::error::{ChoiceError, Result};
use rand::RngCore;
use std::collections::HashMap;
use tracing::debug;

pub struct OptionalFeatureHandler;

/// Features of `feature_type` that `class_slug` may take at `class_level`,
/// minus those the character already has from another choice.
pub(crate) fn feature_options(
    catalog: &Catalog,
    character: &Character,
    feature_type: OptionalFeatureType,
    class_slug: &str,
    class_level: u8,
) -> Vec<ChoiceOption> {
    catalog
        .optional_features_of(feature_type)
        .filter(|f| f.available_to(class_slug, class_level))
        .filter(|f| !character.has_feature_selection(&f.slug))
        .map(|f| ChoiceOption::new(&f.slug, &f.name).with_detail(&f.description))
        .collect()
}

pub(crate) fn selected_features(character: &Character, id: &ChoiceId) -> Vec<String> {
    character
        .feature_selections
        .iter()
        .filter(|f| f.provenance.is_choice(id))
        .map(|f| f.feature_slug.clone())
        .collect()
}

fn counter_choice(
    catalog: &Catalog,
    character: &Character,
    pivot: &ClassPivot,
    counter: &FeatureCounter,
    source: ChoiceSource,
    source_slug: &str,
    source_name: &str,
) -> Option<PendingChoice> {
    let quantity = counter.value_at(pivot.level);
    let first = counter.first_level()?;
    if quantity == 0 {
        return None;
    }
    let id = ChoiceId::new(ChoiceType::OptionalFeature, source, source_slug, first, &counter.key);
    let metadata = ChoiceMetadata {
        choice_group: Some(counter.key.clone()),
        class_slug: Some(pivot.class_slug.clone()),
        feature_type: Some(counter.feature_type),
        distinct: true,
        ..Default::default()
    };
    Some(
        PendingChoice::new(id.clone(), source_name, quantity)
            .with_subtype(counter.feature_type.as_str())
            .with_selected(selected_features(character, &id))
            .with_options(feature_options(
                catalog,
                character,
                counter.feature_type,
                &pivot.class_slug,
                pivot.level,
            ))
            .with_metadata(metadata),
    )
}

impl ChoiceHandler for OptionalFeatureHandler {
    fn choice_type(&self) -> ChoiceType {
        ChoiceType::OptionalFeature
    }

    fn get_choices(&self, rules: &RulesContext<'_>, character: &Character) -> Vec<PendingChoice> {
        let catalog = rules.catalog;
        let mut choices = Vec::new();

        for (pivot, class) in class_pivots(catalog, character) {
            choices.extend(class.counters.iter().filter_map(|counter| {
                counter_choice(
                    catalog,
                    character,
                    pivot,
                    counter,
                    ChoiceSource::Class,
                    &class.slug,
                    &class.name,
                )
            }));

            let Some(subclass) = pivot
                .subclass_slug
                .as_deref()
                .and_then(|slug| catalog.subclass(slug))
            else {
                continue;
            };
            choices.extend(subclass.counters.iter().filter_map(|counter| {
                counter_choice(
                    catalog,
                    character,
                    pivot,
                    counter,
                    ChoiceSource::Subclass,
                    &subclass.slug,
                    &subclass.name,
                )
            }));
        }

        choices
    }

    fn resolve(
        &self,
        _rules: &RulesContext<'_>,
        _rng: &mut dyn RngCore,
        character: &mut Character,
        choice: &PendingChoice,
        selection: &Selection,
    ) -> Result<()> {
        let feature_type = choice
            .metadata
            .feature_type
            .ok_or_else(|| ChoiceError::invalid("Choice does not name a feature type"))?;
        let noun = match feature_type {
            OptionalFeatureType::EldritchInvocation => "invocations",
            OptionalFeatureType::Maneuver => "maneuvers",
            OptionalFeatureType::Metamagic => "metamagic options",
            OptionalFeatureType::FightingStyle => "fighting styles",
        };
        let values = list_selection(selection, noun)?;
        validate_list(choice, values, noun, true)?;

        let learned: HashMap<String, u8> = character
            .feature_selections
            .iter()
            .filter(|f| f.provenance.is_choice(&choice.id))
            .map(|f| (f.feature_slug.clone(), f.level_acquired))
            .collect();
        let level = choice
            .metadata
            .class_slug
            .as_deref()
            .and_then(|slug| character.pivot(slug))
            .map_or(choice.level_granted, |p| p.level);

        character.remove_records(|p| p.is_choice(&choice.id));
        let provenance = Provenance::for_choice(&choice.id);
        character
            .feature_selections
            .extend(values.iter().map(|slug| FeatureSelection {
                feature_slug: slug.clone(),
                feature_type,
                level_acquired: learned.get(slug).copied().unwrap_or(level),
                provenance: provenance.clone(),
            }));
        debug!(choice = %choice.id, selected = ?values, "selected optional features");
        Ok(())
    }

    fn can_undo(&self, _character: &Character, _choice: &PendingChoice) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::character::{Character, ClassPivot};
    use crate::choice::Selection;
    use crate::error::ChoiceError;
    use crate::testing::TestHarness;

    const INVOCATIONS: &str = "optional_feature|class|warlock|2|eldritch_invocations";

    fn warlock(level: u8) -> Character {
        let mut character = Character::new("Morwen", "human");
        character.classes.push(ClassPivot {
            class_slug: "warlock".to_string(),
            level,
            is_primary: true,
            subclass_slug: None,
            subclass_choices: Default::default(),
        });
        character
    }

    #[test]
    fn test_counter_drives_quantity() {
        assert!(TestHarness::new(warlock(1)).try_choice(INVOCATIONS).is_none());
        assert_eq!(TestHarness::new(warlock(2)).choice(INVOCATIONS).quantity, 2);
        assert_eq!(TestHarness::new(warlock(5)).choice(INVOCATIONS).quantity, 3);
    }

    #[test]
    fn test_level_requirement_filters_options() {
        let choice = TestHarness::new(warlock(2)).choice(INVOCATIONS);
        assert!(choice.offers("agonizing-blast"));
        assert!(!choice.offers("thirsting-blade"));

        let choice = TestHarness::new(warlock(5)).choice(INVOCATIONS);
        assert!(choice.offers("thirsting-blade"));
        assert!(!choice.offers("lifedrinker"));
    }

    #[test]
    fn test_must_match_count() {
        let mut harness = TestHarness::new(warlock(2));
        let err = harness
            .resolve(INVOCATIONS, Selection::options(["agonizing-blast"]))
            .unwrap_err();
        assert_eq!(
            err,
            ChoiceError::SelectionInvalid("Must select exactly 2 invocations; got 1".to_string())
        );
    }

    #[test]
    fn test_selected_excluded_from_options_but_still_listed() {
        let mut harness = TestHarness::new(warlock(2));
        harness
            .resolve(INVOCATIONS, Selection::options(["agonizing-blast", "devils-sight"]))
            .unwrap();
        let choice = harness.choice(INVOCATIONS);
        assert_eq!(choice.remaining, 0);
        let option_values: Vec<&str> = choice
            .options
            .iter()
            .flatten()
            .map(|o| o.value.as_str())
            .collect();
        assert!(!option_values.contains(&"agonizing-blast"));
        assert!(choice.offers("agonizing-blast"));
    }

    #[test]
    fn test_subclass_counter() {
        let mut character = Character::new("Kell", "human");
        character.classes.push(ClassPivot {
            class_slug: "fighter".to_string(),
            level: 3,
            is_primary: true,
            subclass_slug: Some("battle-master".to_string()),
            subclass_choices: Default::default(),
        });
        let harness = TestHarness::new(character);
        let choice = harness.choice("optional_feature|subclass|battle-master|3|maneuvers");
        assert_eq!(choice.quantity, 3);
        assert!(choice.offers("riposte"));
    }

    #[test]
    fn test_undo_removes_selections() {
        let mut harness = TestHarness::new(warlock(2));
        harness
            .resolve(INVOCATIONS, Selection::options(["agonizing-blast", "devils-sight"]))
            .unwrap();
        harness.undo(INVOCATIONS).unwrap();
        assert!(harness.character.feature_selections.is_empty());
    }
}

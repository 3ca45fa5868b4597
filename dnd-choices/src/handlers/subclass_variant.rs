//! Variant picks inside a subclass (totem animal, dragon ancestry, hunter
//! techniques). Each variant group is stored in the pivot's
//! `subclass_choices` map, so groups never overwrite each other.

use super::{class_pivots, single_value, ChoiceHandler, RulesContext};
use crate::character::{Character, ClassPivot};
use crate::choice::{
    ChoiceId, ChoiceMetadata, ChoiceOption, ChoiceSource, ChoiceType, PendingChoice, Selection,
};
use crate::error::{ChoiceError, Result};
use rand::RngCore;
use tracing::debug;

pub struct SubclassVariantHandler;

fn pivot_for<'c>(character: &'c Character, choice: &PendingChoice) -> Result<&'c ClassPivot> {
    character
        .pivot_with_subclass(choice.source_slug())
        .ok_or_else(|| {
            ChoiceError::invalid(format!(
                "Character does not have the {} subclass",
                choice.source_name
            ))
        })
}

impl ChoiceHandler for SubclassVariantHandler {
    fn choice_type(&self) -> ChoiceType {
        ChoiceType::SubclassVariant
    }

    fn get_choices(&self, rules: &RulesContext<'_>, character: &Character) -> Vec<PendingChoice> {
        let catalog = rules.catalog;
        let mut choices = Vec::new();

        for (pivot, _) in class_pivots(catalog, character) {
            let Some(subclass) = pivot
                .subclass_slug
                .as_deref()
                .and_then(|slug| catalog.subclass(slug))
            else {
                continue;
            };
            for variant in subclass.variants.iter().filter(|v| v.level <= pivot.level) {
                let id = ChoiceId::new(
                    ChoiceType::SubclassVariant,
                    ChoiceSource::Subclass,
                    &subclass.slug,
                    variant.level,
                    &variant.group,
                );
                let options = variant
                    .options
                    .iter()
                    .map(|o| ChoiceOption::new(&o.value, &o.label))
                    .collect();
                let metadata = ChoiceMetadata {
                    choice_group: Some(variant.group.clone()),
                    class_slug: Some(pivot.class_slug.clone()),
                    ..Default::default()
                };
                choices.push(
                    PendingChoice::new(id, &subclass.name, 1)
                        .with_subtype(&variant.name)
                        .with_selected(
                            pivot
                                .subclass_choices
                                .get(&variant.group)
                                .cloned()
                                .into_iter()
                                .collect(),
                        )
                        .with_options(options)
                        .with_metadata(metadata),
                );
            }
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
        let value = single_value(choice, selection, "values")?;
        let class_slug = pivot_for(character, choice)?.class_slug.clone();
        if let Some(pivot) = character.pivot_mut(&class_slug) {
            pivot
                .subclass_choices
                .insert(choice.group().to_string(), value.to_string());
        }
        debug!(choice = %choice.id, value, "set subclass variant");
        Ok(())
    }

    // Measured against the owning class's level, as for the subclass itself.
    fn can_undo(&self, character: &Character, choice: &PendingChoice) -> bool {
        character
            .pivot_with_subclass(choice.source_slug())
            .is_some_and(|p| p.level == choice.level_granted)
    }

    fn undo(
        &self,
        _rules: &RulesContext<'_>,
        character: &mut Character,
        choice: &PendingChoice,
    ) -> Result<()> {
        if !self.can_undo(character, choice) {
            return Err(ChoiceError::not_undoable(format!(
                "{} can only be changed at class level {}",
                choice.subtype.as_deref().unwrap_or(choice.group()),
                choice.level_granted
            )));
        }
        let class_slug = pivot_for(character, choice)?.class_slug.clone();
        if let Some(pivot) = character.pivot_mut(&class_slug) {
            pivot.subclass_choices.remove(choice.group());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::character::{Character, ClassPivot};
    use crate::choice::Selection;
    use crate::error::ChoiceError;
    use crate::testing::TestHarness;

    const SPIRIT: &str = "subclass_variant|subclass|totem-warrior|3|totem_spirit";
    const ASPECT: &str = "subclass_variant|subclass|totem-warrior|6|totem_aspect";

    fn totem_barbarian(level: u8) -> Character {
        let mut character = Character::new("Ulfgar", "human");
        character.classes.push(ClassPivot {
            class_slug: "barbarian".to_string(),
            level,
            is_primary: true,
            subclass_slug: Some("totem-warrior".to_string()),
            subclass_choices: Default::default(),
        });
        character
    }

    #[test]
    fn test_variants_gated_by_level() {
        let harness = TestHarness::new(totem_barbarian(3));
        assert!(harness.try_choice(SPIRIT).is_some());
        assert!(harness.try_choice(ASPECT).is_none());
    }

    #[test]
    fn test_groups_merge() {
        let mut harness = TestHarness::new(totem_barbarian(6));
        harness.resolve(SPIRIT, Selection::options(["bear"])).unwrap();
        harness.resolve(ASPECT, Selection::options(["eagle"])).unwrap();

        let pivot = harness.character.pivot("barbarian").unwrap();
        assert_eq!(pivot.subclass_choices.get("totem_spirit").map(String::as_str), Some("bear"));
        assert_eq!(pivot.subclass_choices.get("totem_aspect").map(String::as_str), Some("eagle"));

        harness.resolve(SPIRIT, Selection::options(["wolf"])).unwrap();
        let pivot = harness.character.pivot("barbarian").unwrap();
        assert_eq!(pivot.subclass_choices.len(), 2);
        assert_eq!(pivot.subclass_choices.get("totem_aspect").map(String::as_str), Some("eagle"));
    }

    #[test]
    fn test_unknown_value_rejected() {
        let mut harness = TestHarness::new(totem_barbarian(3));
        let err = harness.resolve(SPIRIT, Selection::options(["owl"])).unwrap_err();
        assert!(matches!(err, ChoiceError::SelectionInvalid(_)));
    }

    #[test]
    fn test_undo_only_at_granting_level() {
        let mut harness = TestHarness::new(totem_barbarian(6));
        harness.resolve(SPIRIT, Selection::options(["bear"])).unwrap();
        harness.resolve(ASPECT, Selection::options(["eagle"])).unwrap();

        assert!(!harness.can_undo(SPIRIT));
        assert!(matches!(harness.undo(SPIRIT), Err(ChoiceError::NotUndoable(_))));

        assert!(harness.can_undo(ASPECT));
        harness.undo(ASPECT).unwrap();
        let pivot = harness.character.pivot("barbarian").unwrap();
        assert_eq!(pivot.subclass_choices.get("totem_spirit").map(String::as_str), Some("bear"));
        assert!(!pivot.subclass_choices.contains_key("totem_aspect"));
    }
}

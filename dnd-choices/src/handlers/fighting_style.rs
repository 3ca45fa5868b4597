//! Fighting styles granted by a class or a subclass (Champion's second
//! style). Each granting source is its own instance.

use super::optional_feature::{feature_options, selected_features};
use super::{class_pivots, single_value, ChoiceHandler, RulesContext};
use crate::catalog::OptionalFeatureType;
use crate::character::{Character, ClassPivot, FeatureSelection, Provenance};
use crate::choice::{
    ChoiceId, ChoiceMetadata, ChoiceSource, ChoiceType, PendingChoice, Selection,
};
use crate::error::Result;
use rand::RngCore;
use tracing::debug;

pub struct FightingStyleHandler;

const GROUP: &str = "fighting_style";

fn style_choice(
    rules: &RulesContext<'_>,
    character: &Character,
    pivot: &ClassPivot,
    id: ChoiceId,
    source_name: &str,
) -> PendingChoice {
    let metadata = ChoiceMetadata {
        choice_group: Some(GROUP.to_string()),
        class_slug: Some(pivot.class_slug.clone()),
        feature_type: Some(OptionalFeatureType::FightingStyle),
        ..Default::default()
    };
    let selected = selected_features(character, &id);
    PendingChoice::new(id, source_name, 1)
        .with_selected(selected)
        .with_options(feature_options(
            rules.catalog,
            character,
            OptionalFeatureType::FightingStyle,
            &pivot.class_slug,
            pivot.level,
        ))
        .with_metadata(metadata)
}

impl ChoiceHandler for FightingStyleHandler {
    fn choice_type(&self) -> ChoiceType {
        ChoiceType::FightingStyle
    }

    fn get_choices(&self, rules: &RulesContext<'_>, character: &Character) -> Vec<PendingChoice> {
        let catalog = rules.catalog;
        let mut choices = Vec::new();

        for (pivot, class) in class_pivots(catalog, character) {
            if let Some(level) = class.fighting_style_level.filter(|l| *l <= pivot.level) {
                let id = ChoiceId::new(ChoiceType::FightingStyle, ChoiceSource::Class, &class.slug, level, GROUP);
                choices.push(style_choice(rules, character, pivot, id, &class.name));
            }

            let subclass = pivot
                .subclass_slug
                .as_deref()
                .and_then(|slug| catalog.subclass(slug));
            if let Some(subclass) = subclass {
                if let Some(level) = subclass.fighting_style_level.filter(|l| *l <= pivot.level) {
                    let id = ChoiceId::new(
                        ChoiceType::FightingStyle,
                        ChoiceSource::Subclass,
                        &subclass.slug,
                        level,
                        GROUP,
                    );
                    choices.push(style_choice(rules, character, pivot, id, &subclass.name));
                }
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
        let style = single_value(choice, selection, "fighting styles")?;

        character.remove_records(|p| p.is_choice(&choice.id));
        character.feature_selections.push(FeatureSelection {
            feature_slug: style.to_string(),
            feature_type: OptionalFeatureType::FightingStyle,
            level_acquired: choice.level_granted,
            provenance: Provenance::for_choice(&choice.id),
        });
        debug!(choice = %choice.id, style, "adopted fighting style");
        Ok(())
    }

    fn can_undo(&self, _character: &Character, _choice: &PendingChoice) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::character::{Character, ClassPivot};
    use crate::choice::Selection;
    use crate::error::ChoiceError;
    use crate::testing::{sample_fighter, TestHarness};

    const FIGHTER: &str = "fighting_style|class|fighter|1|fighting_style";

    fn pivot(class_slug: &str, level: u8, primary: bool, subclass: Option<&str>) -> ClassPivot {
        ClassPivot {
            class_slug: class_slug.to_string(),
            level,
            is_primary: primary,
            subclass_slug: subclass.map(str::to_string),
            subclass_choices: Default::default(),
        }
    }

    #[test]
    fn test_fighter_style_at_first_level() {
        let harness = TestHarness::new(sample_fighter(1));
        let choice = harness.choice(FIGHTER);
        assert!(choice.offers("archery"));
        assert!(choice.offers("protection"));
    }

    #[test]
    fn test_each_class_evaluated_independently() {
        let mut character = Character::new("Aria", "human");
        character.classes.push(pivot("fighter", 1, true, None));
        character.classes.push(pivot("paladin", 2, false, None));
        let mut harness = TestHarness::new(character);

        harness.resolve(FIGHTER, Selection::options(["defense"])).unwrap();
        let paladin = harness.choice("fighting_style|class|paladin|2|fighting_style");
        assert!(!paladin.offers("defense"));
        assert!(paladin.offers("dueling"));
        assert!(!paladin.offers("archery"));
    }

    #[test]
    fn test_champion_second_style() {
        let mut character = Character::new("Aria", "human");
        character.classes.push(pivot("fighter", 10, true, Some("champion")));
        let harness = TestHarness::new(character);
        assert!(harness.try_choice(FIGHTER).is_some());
        assert!(harness
            .try_choice("fighting_style|subclass|champion|10|fighting_style")
            .is_some());
    }

    #[test]
    fn test_replace_allowed_undo_refused() {
        let mut harness = TestHarness::new(sample_fighter(1));
        harness.resolve(FIGHTER, Selection::options(["archery"])).unwrap();
        harness.resolve(FIGHTER, Selection::options(["dueling"])).unwrap();
        assert!(harness.character.has_feature_selection("dueling"));
        assert!(!harness.character.has_feature_selection("archery"));

        assert!(!harness.can_undo(FIGHTER));
        assert!(matches!(harness.undo(FIGHTER), Err(ChoiceError::NotUndoable(_))));
    }
}

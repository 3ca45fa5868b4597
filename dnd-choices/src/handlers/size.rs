//! Size for races that let the player pick between several sizes.

use super::{single_value, ChoiceHandler, RulesContext};
use crate::character::{Character, Size};
use crate::choice::{
    ChoiceId, ChoiceMetadata, ChoiceOption, ChoiceSource, ChoiceType, PendingChoice, Selection,
};
use crate::error::{ChoiceError, Result};
use rand::RngCore;
use tracing::debug;

pub struct SizeHandler;

const GROUP: &str = "size";

impl ChoiceHandler for SizeHandler {
    fn choice_type(&self) -> ChoiceType {
        ChoiceType::Size
    }

    fn get_choices(&self, rules: &RulesContext<'_>, character: &Character) -> Vec<PendingChoice> {
        rules
            .catalog
            .race_chain(&character.race_slug)
            .into_iter()
            .filter(|race| race.size_choice && race.sizes.len() > 1)
            .map(|race| {
                let id = ChoiceId::new(ChoiceType::Size, ChoiceSource::Race, &race.slug, 1, GROUP);
                let selected = character
                    .size
                    .filter(|size| race.sizes.contains(size))
                    .map(|size| vec![size.slug().to_string()])
                    .unwrap_or_default();
                let options = race
                    .sizes
                    .iter()
                    .map(|size| ChoiceOption::new(size.slug(), size.name()))
                    .collect();
                let metadata = ChoiceMetadata {
                    choice_group: Some(GROUP.to_string()),
                    ..Default::default()
                };
                PendingChoice::new(id, &race.name, 1)
                    .with_selected(selected)
                    .with_options(options)
                    .with_metadata(metadata)
            })
            .collect()
    }

    fn resolve(
        &self,
        _rules: &RulesContext<'_>,
        _rng: &mut dyn RngCore,
        character: &mut Character,
        choice: &PendingChoice,
        selection: &Selection,
    ) -> Result<()> {
        let slug = single_value(choice, selection, "sizes")?;
        let size = Size::from_slug(slug)
            .ok_or_else(|| ChoiceError::invalid(format!("Unknown size '{slug}'")))?;
        character.size = Some(size);
        debug!(choice = %choice.id, size = size.slug(), "set size");
        Ok(())
    }

    fn can_undo(&self, _character: &Character, _choice: &PendingChoice) -> bool {
        true
    }

    fn undo(
        &self,
        _rules: &RulesContext<'_>,
        character: &mut Character,
        _choice: &PendingChoice,
    ) -> Result<()> {
        character.size = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::character::{Character, Size};
    use crate::choice::Selection;
    use crate::error::ChoiceError;
    use crate::testing::{sample_fighter, TestHarness};

    const LINEAGE: &str = "size|race|custom-lineage|1|size";

    #[test]
    fn test_only_races_with_a_choice() {
        assert!(TestHarness::new(sample_fighter(1)).try_choice(LINEAGE).is_none());
        let harness = TestHarness::new(Character::new("Nix", "custom-lineage"));
        let choice = harness.choice(LINEAGE);
        assert!(choice.offers("small"));
        assert!(choice.offers("medium"));
        assert!(!choice.offers("large"));
    }

    #[test]
    fn test_resolve_and_undo() {
        let mut harness = TestHarness::new(Character::new("Nix", "custom-lineage"));
        harness.resolve(LINEAGE, Selection::options(["small"])).unwrap();
        assert_eq!(harness.character.size, Some(Size::Small));
        assert_eq!(harness.choice(LINEAGE).remaining, 0);

        harness.undo(LINEAGE).unwrap();
        assert_eq!(harness.character.size, None);
        assert_eq!(harness.choice(LINEAGE).remaining, 1);
    }

    #[test]
    fn test_size_outside_race_rejected() {
        let mut harness = TestHarness::new(Character::new("Nix", "custom-lineage"));
        let err = harness.resolve(LINEAGE, Selection::options(["large"])).unwrap_err();
        assert!(matches!(err, ChoiceError::SelectionInvalid(_)));
    }
}

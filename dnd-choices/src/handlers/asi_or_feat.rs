//! Ability Score Improvement slots: +2 spread over abilities, or a feat.

use super::ability_score::check_cap;
use super::feat::{feat_option, grant_feat};
use super::{class_pivots, ChoiceHandler, RulesContext};
use crate::character::{Ability, AbilityScoreBonus, Character, Provenance};
use crate::choice::{
    AsiOrFeatSelection, ChoiceId, ChoiceMetadata, ChoiceOption, ChoiceSource, ChoiceType,
    PendingChoice, Selection,
};
use crate::error::{ChoiceError, Result};
use rand::RngCore;
use std::collections::BTreeMap;
use tracing::debug;

pub struct AsiOrFeatHandler;

/// Option value standing for the ability score improvement itself.
pub const ASI: &str = "asi";

/// Total points an improvement spreads.
const ASI_POINTS: u8 = 2;

fn validate_increases(increases: &BTreeMap<Ability, u8>) -> Result<()> {
    if increases.is_empty() {
        return Err(ChoiceError::invalid("No ability increases given"));
    }
    if let Some((ability, value)) = increases.iter().find(|(_, v)| !(1..=2).contains(*v)) {
        return Err(ChoiceError::invalid(format!(
            "{} increase must be 1 or 2, got {value}",
            ability.name()
        )));
    }
    let total: u32 = increases.values().map(|v| *v as u32).sum();
    if total != ASI_POINTS as u32 {
        return Err(ChoiceError::invalid(format!(
            "Ability increases must total {ASI_POINTS}, got {total}"
        )));
    }
    Ok(())
}

impl ChoiceHandler for AsiOrFeatHandler {
    fn choice_type(&self) -> ChoiceType {
        ChoiceType::AsiOrFeat
    }

    fn get_choices(&self, rules: &RulesContext<'_>, character: &Character) -> Vec<PendingChoice> {
        let catalog = rules.catalog;
        let mut choices = Vec::new();

        for (pivot, class) in class_pivots(catalog, character) {
            for &level in class.asi_levels.iter().filter(|l| **l <= pivot.level) {
                let id = ChoiceId::new(
                    ChoiceType::AsiOrFeat,
                    ChoiceSource::LevelUp,
                    &class.slug,
                    level,
                    format!("asi_{level}"),
                );

                let feat = character
                    .feats
                    .iter()
                    .find(|f| f.provenance.is_choice(&id))
                    .map(|f| f.feat_slug.clone());
                let selected = match feat {
                    Some(slug) => vec![slug],
                    None if character
                        .ability_bonuses
                        .iter()
                        .any(|b| b.provenance.is_choice(&id)) =>
                    {
                        vec![ASI.to_string()]
                    }
                    None => Vec::new(),
                };

                let mut options = vec![ChoiceOption::new(ASI, "Ability Score Improvement")
                    .with_detail("+2 to one ability or +1 to two")];
                options.extend(
                    catalog
                        .feats()
                        .filter(|f| !character.has_feat(&f.slug))
                        .map(feat_option),
                );

                let metadata = ChoiceMetadata {
                    choice_group: Some(id.group.clone()),
                    class_slug: Some(class.slug.clone()),
                    ability_cap: Some(rules.config.ability_score_cap),
                    ..Default::default()
                };
                choices.push(
                    PendingChoice::new(id, &class.name, 1)
                        .with_selected(selected)
                        .with_options(options)
                        .with_metadata(metadata),
                );
            }
        }

        choices
    }

    fn resolve(
        &self,
        rules: &RulesContext<'_>,
        _rng: &mut dyn RngCore,
        character: &mut Character,
        choice: &PendingChoice,
        selection: &Selection,
    ) -> Result<()> {
        let Selection::AsiOrFeat(payload) = selection else {
            return Err(ChoiceError::invalid(
                "Expected {\"type\": \"asi\", \"increases\": {...}} or {\"type\": \"feat\", \"feat_slug\": ...}",
            ));
        };
        let cap = choice
            .metadata
            .ability_cap
            .unwrap_or(rules.config.ability_score_cap);

        match payload {
            AsiOrFeatSelection::Feat { feat_slug } => {
                if feat_slug == ASI || !choice.offers(feat_slug) {
                    return Err(ChoiceError::invalid(format!(
                        "'{feat_slug}' is not an option for this choice"
                    )));
                }
                character.remove_records(|p| p.is_choice(&choice.id));
                let level = character.level().max(1);
                grant_feat(rules.catalog, character, &choice.id, feat_slug, level, cap)?;
                debug!(choice = %choice.id, feat = %feat_slug, "took feat instead of ASI");
            }
            AsiOrFeatSelection::Asi { increases } => {
                validate_increases(increases)?;
                let deltas: BTreeMap<Ability, i32> = increases
                    .iter()
                    .map(|(ability, value)| (*ability, *value as i32))
                    .collect();
                // Cap the score left after the previous pick and anything it
                // granted are gone.
                character.remove_records(|p| p.is_choice(&choice.id));
                check_cap(character, &choice.id, &deltas, cap)?;

                let provenance = Provenance::for_choice(&choice.id);
                character
                    .ability_bonuses
                    .extend(increases.iter().map(|(ability, value)| AbilityScoreBonus {
                        ability: *ability,
                        bonus: *value as i8,
                        modifier_id: Some(choice.group().to_string()),
                        provenance: provenance.clone(),
                    }));
                debug!(choice = %choice.id, ?increases, "applied ability score improvement");
            }
        }
        Ok(())
    }

    fn can_undo(&self, _character: &Character, _choice: &PendingChoice) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::character::Ability;
    use crate::choice::Selection;
    use crate::error::ChoiceError;
    use crate::testing::{sample_fighter, TestHarness};

    const ASI_4: &str = "asi_or_feat|level_up|fighter|4|asi_4";

    #[test]
    fn test_fighter_gets_extra_asi_at_six() {
        let harness = TestHarness::new(sample_fighter(6));
        assert!(harness.try_choice(ASI_4).is_some());
        assert!(harness.try_choice("asi_or_feat|level_up|fighter|6|asi_6").is_some());
        assert!(harness.try_choice("asi_or_feat|level_up|fighter|8|asi_8").is_none());
    }

    #[test]
    fn test_asi_applies_increases() {
        let mut harness = TestHarness::new(sample_fighter(4));
        let before = harness.character.ability_score(Ability::Strength);
        harness
            .resolve(ASI_4, Selection::asi([(Ability::Strength, 2)]))
            .unwrap();
        assert_eq!(harness.character.ability_score(Ability::Strength), before + 2);
        assert_eq!(harness.choice(ASI_4).selected, vec!["asi".to_string()]);
    }

    #[test]
    fn test_asi_must_total_two() {
        let mut harness = TestHarness::new(sample_fighter(4));
        let err = harness
            .resolve(ASI_4, Selection::asi([(Ability::Strength, 1)]))
            .unwrap_err();
        assert!(matches!(err, ChoiceError::SelectionInvalid(_)));

        let err = harness
            .resolve(
                ASI_4,
                Selection::asi([(Ability::Strength, 1), (Ability::Dexterity, 1), (Ability::Wisdom, 1)]),
            )
            .unwrap_err();
        assert!(matches!(err, ChoiceError::SelectionInvalid(_)));
    }

    #[test]
    fn test_list_payload_rejected() {
        let mut harness = TestHarness::new(sample_fighter(4));
        assert!(harness.resolve(ASI_4, Selection::options(["asi"])).is_err());
    }

    #[test]
    fn test_feat_replaces_asi() {
        let mut harness = TestHarness::new(sample_fighter(4));
        let before = harness.character.ability_score(Ability::Strength);
        harness
            .resolve(ASI_4, Selection::asi([(Ability::Strength, 2)]))
            .unwrap();
        harness.resolve(ASI_4, Selection::feat("sentinel")).unwrap();

        assert_eq!(harness.character.ability_score(Ability::Strength), before);
        assert!(harness.character.has_feat("sentinel"));
        assert_eq!(harness.choice(ASI_4).selected, vec!["sentinel".to_string()]);
    }

    #[test]
    fn test_half_feat_swapped_for_asi_at_cap() {
        let mut character = sample_fighter(4);
        character.base_scores.charisma = 17;
        let mut harness = TestHarness::new(character);
        assert_eq!(harness.character.ability_score(Ability::Charisma), 18);

        harness.resolve(ASI_4, Selection::feat("actor")).unwrap();
        assert_eq!(harness.character.ability_score(Ability::Charisma), 19);

        harness
            .resolve(ASI_4, Selection::asi([(Ability::Charisma, 2)]))
            .unwrap();
        assert_eq!(harness.character.ability_score(Ability::Charisma), 20);
        assert!(!harness.character.has_feat("actor"));

        harness
            .resolve(ASI_4, Selection::asi([(Ability::Charisma, 1), (Ability::Strength, 1)]))
            .unwrap();
        assert_eq!(harness.character.ability_score(Ability::Charisma), 19);
    }

    #[test]
    fn test_asi_above_cap_rejected() {
        let mut character = sample_fighter(4);
        character.base_scores.charisma = 18;
        let mut harness = TestHarness::new(character);
        let before = harness.character.clone();
        let err = harness
            .resolve(ASI_4, Selection::asi([(Ability::Charisma, 2)]))
            .unwrap_err();
        assert!(err.to_string().contains("cap of 20"), "{err}");
        assert_eq!(harness.character, before);
    }

    #[test]
    fn test_never_undoable() {
        let mut harness = TestHarness::new(sample_fighter(4));
        harness.resolve(ASI_4, Selection::feat("alert")).unwrap();
        assert!(!harness.can_undo(ASI_4));
        assert!(matches!(harness.undo(ASI_4), Err(ChoiceError::NotUndoable(_))));
        assert!(harness.character.has_feat("alert"));
    }
}

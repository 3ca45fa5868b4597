//! Bonus feats granted by a race or background.

use super::ability_score::check_cap;
use super::{grants, single_value, ChoiceHandler, RulesContext};
use crate::catalog::{Catalog, Feat, ModifierChoice};
use crate::character::{Ability, AbilityScoreBonus, Character, CharacterFeat, Provenance};
use crate::choice::{ChoiceId, ChoiceMetadata, ChoiceOption, ChoiceSource, ChoiceType, PendingChoice, Selection};
use crate::error::{ChoiceError, Result};
use rand::RngCore;
use std::collections::BTreeMap;
use tracing::debug;

pub struct FeatHandler;

pub(crate) fn feat_option(feat: &Feat) -> ChoiceOption {
    let option = ChoiceOption::new(&feat.slug, &feat.name);
    if feat.description.is_empty() {
        option
    } else {
        option.with_detail(&feat.description)
    }
}

/// Give the character `feat_slug` along with its fixed ability bonuses.
///
/// Fixed bonuses are tagged with the feat itself so that removing the feat
/// removes them too.
pub(crate) fn grant_feat(
    catalog: &Catalog,
    character: &mut Character,
    id: &ChoiceId,
    feat_slug: &str,
    level: u8,
    ability_cap: u8,
) -> Result<()> {
    let feat = catalog
        .feat(feat_slug)
        .ok_or_else(|| ChoiceError::invalid(format!("Unknown feat '{feat_slug}'")))?;
    if character.has_feat(feat_slug) {
        return Err(ChoiceError::invalid(format!("{} is already known", feat.name)));
    }

    let increases: BTreeMap<Ability, i32> = feat
        .ability_bonuses
        .iter()
        .map(|b| (b.ability, b.bonus as i32))
        .collect();
    check_cap(character, id, &increases, ability_cap)?;

    character.feats.push(CharacterFeat {
        feat_slug: feat.slug.clone(),
        level_acquired: level,
        provenance: Provenance::for_choice(id),
    });
    let fixed = Provenance::fixed(ChoiceSource::Feat, &feat.slug);
    character
        .ability_bonuses
        .extend(feat.ability_bonuses.iter().map(|b| AbilityScoreBonus {
            ability: b.ability,
            bonus: b.bonus,
            modifier_id: None,
            provenance: fixed.clone(),
        }));
    Ok(())
}

impl ChoiceHandler for FeatHandler {
    fn choice_type(&self) -> ChoiceType {
        ChoiceType::Feat
    }

    fn get_choices(&self, rules: &RulesContext<'_>, character: &Character) -> Vec<PendingChoice> {
        let catalog = rules.catalog;
        grants(catalog, character)
            .into_iter()
            .filter(|grant| matches!(grant.source, ChoiceSource::Race | ChoiceSource::Background))
            .filter_map(|grant| {
                let ModifierChoice::Feat { category } = &grant.modifier.choice else {
                    return None;
                };
                let id = grant.id(ChoiceType::Feat);
                let selected = character
                    .feats
                    .iter()
                    .filter(|f| f.provenance.is_choice(&id))
                    .map(|f| f.feat_slug.clone())
                    .collect();
                let options = catalog
                    .feats()
                    .filter(|f| category.map_or(true, |c| f.category == c))
                    .filter(|f| !character.has_feat(&f.slug))
                    .map(feat_option)
                    .collect();
                let metadata = ChoiceMetadata {
                    choice_group: Some(grant.modifier.id.clone()),
                    ..Default::default()
                };
                Some(
                    PendingChoice::new(id, grant.source_name, 1)
                        .with_selected(selected)
                        .with_options(options)
                        .with_metadata(metadata),
                )
            })
            .collect()
    }

    fn resolve(
        &self,
        rules: &RulesContext<'_>,
        _rng: &mut dyn RngCore,
        character: &mut Character,
        choice: &PendingChoice,
        selection: &Selection,
    ) -> Result<()> {
        let feat_slug = single_value(choice, selection, "feats")?;

        // Replacing a feat also drops everything the old feat granted.
        character.remove_records(|p| p.is_choice(&choice.id));
        grant_feat(
            rules.catalog,
            character,
            &choice.id,
            feat_slug,
            choice.level_granted,
            rules.config.ability_score_cap,
        )?;
        debug!(choice = %choice.id, feat = feat_slug, "granted feat");
        Ok(())
    }

    fn can_undo(&self, _character: &Character, _choice: &PendingChoice) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::character::ProficiencyKind;
    use crate::choice::Selection;
    use crate::testing::{sample_variant_human_wizard, TestHarness};

    const BONUS_FEAT: &str = "feat|race|variant-human|1|variant-human-feat";

    #[test]
    fn test_completed_feat_choice_still_listed() {
        let mut harness = TestHarness::new(sample_variant_human_wizard());
        harness.resolve(BONUS_FEAT, Selection::options(["alert"])).unwrap();

        let choice = harness.choice(BONUS_FEAT);
        assert_eq!(choice.remaining, 0);
        assert_eq!(choice.selected, vec!["alert".to_string()]);
        assert!(harness.character.has_feat("alert"));
    }

    #[test]
    fn test_replacing_feat_cascades() {
        let mut harness = TestHarness::new(sample_variant_human_wizard());
        harness.resolve(BONUS_FEAT, Selection::options(["skilled"])).unwrap();
        harness
            .resolve(
                "proficiency|feat|skilled|1|skilled-proficiencies",
                Selection::options(["stealth", "medicine", "survival"]),
            )
            .unwrap();
        assert!(harness
            .character
            .has_proficiency(ProficiencyKind::Skill, "stealth"));

        harness.resolve(BONUS_FEAT, Selection::options(["lucky"])).unwrap();
        assert!(!harness.character.has_feat("skilled"));
        assert!(!harness
            .character
            .has_proficiency(ProficiencyKind::Skill, "stealth"));
        assert!(harness
            .try_choice("proficiency|feat|skilled|1|skilled-proficiencies")
            .is_none());
    }

    #[test]
    fn test_origin_category_filter() {
        let mut character = sample_variant_human_wizard();
        character.background_slug = Some("custom-background".to_string());
        let harness = TestHarness::new(character);
        let choice = harness.choice("feat|background|custom-background|1|origin-feat");
        assert!(choice.offers("alert"));
        assert!(!choice.offers("sentinel"));
    }

    #[test]
    fn test_undo_removes_feat() {
        let mut harness = TestHarness::new(sample_variant_human_wizard());
        harness.resolve(BONUS_FEAT, Selection::options(["tough"])).unwrap();
        harness.undo(BONUS_FEAT).unwrap();
        assert!(harness.character.feats.is_empty());
        assert_eq!(harness.choice(BONUS_FEAT).remaining, 1);
    }
}

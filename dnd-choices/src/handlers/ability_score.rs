//! Flexible ability score bonuses from races, backgrounds and feats.

use super::{grants, list_selection, validate_list, ChoiceHandler, RulesContext};
use crate::catalog::ModifierChoice;
use crate::character::{Ability, AbilityScoreBonus, Character, Provenance};
use crate::choice::{ChoiceId, ChoiceMetadata, ChoiceOption, ChoiceType, PendingChoice, Selection};
use crate::error::{ChoiceError, Result};
use rand::RngCore;
use std::collections::BTreeMap;
use tracing::debug;

pub struct AbilityScoreHandler;

/// Current score for `ability`, ignoring bonuses written by `id`.
pub(crate) fn score_excluding(character: &Character, ability: Ability, id: &ChoiceId) -> i32 {
    let own: i32 = character
        .ability_bonuses
        .iter()
        .filter(|b| b.ability == ability && b.provenance.is_choice(id))
        .map(|b| b.bonus as i32)
        .sum();
    character.ability_score(ability) as i32 - own
}

/// Check that applying `increases` on top of `character` stays within `cap`.
pub(crate) fn check_cap(
    character: &Character,
    id: &ChoiceId,
    increases: &BTreeMap<Ability, i32>,
    cap: u8,
) -> Result<()> {
    for (&ability, &increase) in increases {
        let score = score_excluding(character, ability, id) + increase;
        if score > cap as i32 {
            return Err(ChoiceError::invalid(format!(
                "{} would be {score}, above the ability score cap of {cap}",
                ability.name()
            )));
        }
    }
    Ok(())
}

pub(crate) fn parse_ability(value: &str) -> Result<Ability> {
    Ability::from_code(value)
        .ok_or_else(|| ChoiceError::invalid(format!("'{value}' is not an ability score")))
}

impl ChoiceHandler for AbilityScoreHandler {
    fn choice_type(&self) -> ChoiceType {
        ChoiceType::AbilityScore
    }

    fn get_choices(&self, rules: &RulesContext<'_>, character: &Character) -> Vec<PendingChoice> {
        grants(rules.catalog, character)
            .into_iter()
            .filter_map(|grant| {
                let ModifierChoice::AbilityScore {
                    count,
                    bonus,
                    options,
                    distinct,
                } = &grant.modifier.choice
                else {
                    return None;
                };
                let id = grant.id(ChoiceType::AbilityScore);
                let abilities = if options.is_empty() {
                    Ability::all().to_vec()
                } else {
                    options.clone()
                };
                let selected = character
                    .ability_bonuses
                    .iter()
                    .filter(|b| b.provenance.is_choice(&id))
                    .map(|b| b.ability.code().to_string())
                    .collect();
                let options = abilities
                    .iter()
                    .map(|a| ChoiceOption::new(a.code(), a.name()).with_detail(format!("{bonus:+}")))
                    .collect();
                let metadata = ChoiceMetadata {
                    modifier_id: Some(grant.modifier.id.clone()),
                    bonus: Some(*bonus),
                    distinct: *distinct,
                    ability_cap: Some(rules.config.ability_score_cap),
                    ..Default::default()
                };
                Some(
                    PendingChoice::new(id, grant.source_name, *count)
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
        let values = list_selection(selection, "ability scores")?;
        validate_list(choice, values, "ability scores", choice.metadata.distinct)?;

        let bonus = choice.metadata.bonus.unwrap_or(1);
        let cap = choice
            .metadata
            .ability_cap
            .unwrap_or(rules.config.ability_score_cap);
        let abilities = values
            .iter()
            .map(|v| parse_ability(v))
            .collect::<Result<Vec<_>>>()?;

        let mut increases: BTreeMap<Ability, i32> = BTreeMap::new();
        for ability in &abilities {
            *increases.entry(*ability).or_default() += bonus as i32;
        }
        check_cap(character, &choice.id, &increases, cap)?;

        character.remove_records(|p| p.is_choice(&choice.id));
        let provenance = Provenance::for_choice(&choice.id);
        character
            .ability_bonuses
            .extend(abilities.into_iter().map(|ability| AbilityScoreBonus {
                ability,
                bonus,
                modifier_id: choice.metadata.modifier_id.clone(),
                provenance: provenance.clone(),
            }));
        debug!(choice = %choice.id, ?increases, "applied ability score bonuses");
        Ok(())
    }

    fn can_undo(&self, _character: &Character, _choice: &PendingChoice) -> bool {
        true
    }
}

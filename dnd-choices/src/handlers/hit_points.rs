//! Hit point gains for every class level past the first character level.
//!
//! The first level of the primary class always takes the maximum and is
//! written by the character builder; every other class level asks whether to
//! roll the hit die or take the fixed average.

use super::{class_pivots, single_value, ChoiceHandler, RulesContext};
use crate::character::{Ability, Character, HitPointGain, HitPointMethod, Provenance};
use crate::choice::{
    ChoiceId, ChoiceMetadata, ChoiceOption, ChoiceSource, ChoiceType, PendingChoice, Selection,
};
use crate::dice::DieType;
use crate::error::{ChoiceError, Result};
use rand::RngCore;
use tracing::debug;

pub struct HitPointsHandler;

/// Gain for one level: the die result plus CON, never below 1.
pub fn hit_point_gain(base: u32, con_modifier: i8) -> i32 {
    (base as i32 + con_modifier as i32).max(1)
}

impl ChoiceHandler for HitPointsHandler {
    fn choice_type(&self) -> ChoiceType {
        ChoiceType::HitPoints
    }

    fn get_choices(&self, rules: &RulesContext<'_>, character: &Character) -> Vec<PendingChoice> {
        let con_modifier = character.modifier(Ability::Constitution);
        let mut choices = Vec::new();

        for (pivot, class) in class_pivots(rules.catalog, character) {
            let first = if pivot.is_primary { 2 } else { 1 };
            for level in first..=pivot.level {
                let id = ChoiceId::new(
                    ChoiceType::HitPoints,
                    ChoiceSource::LevelUp,
                    &class.slug,
                    level,
                    format!("hp_{level}"),
                );
                let selected = character
                    .hit_point_gains
                    .iter()
                    .filter(|g| g.provenance.is_choice(&id))
                    .map(|g| g.method.as_str().to_string())
                    .collect();
                let die = class.hit_die;
                let options = vec![
                    ChoiceOption::new(HitPointMethod::Roll.as_str(), format!("Roll {die}"))
                        .with_detail(format!("1-{} {:+} CON", die.sides(), con_modifier)),
                    ChoiceOption::new(HitPointMethod::Average.as_str(), "Take the average")
                        .with_detail(format!(
                            "{} {:+} CON",
                            die.average(),
                            con_modifier
                        )),
                ];
                let metadata = ChoiceMetadata {
                    choice_group: Some(id.group.clone()),
                    class_slug: Some(class.slug.clone()),
                    hit_die: Some(die.sides()),
                    con_modifier: Some(con_modifier),
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
        _rules: &RulesContext<'_>,
        rng: &mut dyn RngCore,
        character: &mut Character,
        choice: &PendingChoice,
        selection: &Selection,
    ) -> Result<()> {
        let method = match single_value(choice, selection, "hit point methods")? {
            "roll" => HitPointMethod::Roll,
            "average" => HitPointMethod::Average,
            other => {
                return Err(ChoiceError::invalid(format!(
                    "'{other}' is not a hit point method"
                )))
            }
        };
        let die = choice
            .metadata
            .hit_die
            .and_then(DieType::from_sides)
            .ok_or_else(|| ChoiceError::invalid("Choice does not name a hit die"))?;
        let con_modifier = character.modifier(Ability::Constitution);

        let base = match method {
            HitPointMethod::Roll => die.roll(rng),
            _ => die.average(),
        };
        let amount = hit_point_gain(base, con_modifier);

        character.remove_records(|p| p.is_choice(&choice.id));
        character.hit_point_gains.push(HitPointGain {
            class_slug: choice.source_slug().to_string(),
            class_level: choice.level_granted,
            method,
            amount,
            provenance: Provenance::for_choice(&choice.id),
        });
        debug!(choice = %choice.id, method = method.as_str(), base, amount, "gained hit points");
        Ok(())
    }

    fn can_undo(&self, _character: &Character, _choice: &PendingChoice) -> bool {
        false
    }
}

//! Cantrip and known-spell picks.
//!
//! Spellcasting classes get one cantrip instance and one known-spells
//! instance whose quantity follows the class level. Races, feats and subclass
//! features may grant extra picks restricted to one class list and a maximum
//! spell level.

use super::{
    class_pivots, grants, list_selection, validate_list, validate_remainder, ChoiceHandler,
    RulesContext,
};
use crate::catalog::{Catalog, ModifierChoice, Spell};
use crate::character::{Character, KnownSpell, Provenance};
use crate::choice::{
    ChoiceId, ChoiceMetadata, ChoiceOption, ChoiceSource, ChoiceType, PendingChoice, Selection,
};
use crate::error::{ChoiceError, Result};
use rand::RngCore;
use std::collections::HashMap;
use tracing::debug;

pub struct SpellHandler;

const CANTRIP: &str = "cantrip";
const SPELLS_KNOWN: &str = "spells_known";

fn option_for(spell: &Spell) -> ChoiceOption {
    let detail = if spell.is_cantrip() {
        format!("cantrip, {}", spell.school)
    } else {
        format!("level {}, {}", spell.level, spell.school)
    };
    ChoiceOption::new(&spell.slug, &spell.name).with_detail(detail)
}

struct SpellPick<'a> {
    id: ChoiceId,
    source_name: &'a str,
    quantity: usize,
    spell_list: &'a str,
    min_level: u8,
    max_level: u8,
}

impl SpellPick<'_> {
    fn into_choice(self, catalog: &Catalog, character: &Character) -> PendingChoice {
        let selected = character
            .spells
            .iter()
            .filter(|s| s.provenance.is_choice(&self.id))
            .map(|s| s.spell_slug.clone())
            .collect();
        let options = catalog
            .spells_for(self.spell_list, self.min_level, self.max_level)
            .into_iter()
            .filter(|spell| !character.knows_spell(&spell.slug))
            .map(option_for)
            .collect();
        let subtype = if self.max_level == 0 { CANTRIP } else { SPELLS_KNOWN };
        let metadata = ChoiceMetadata {
            choice_group: Some(self.id.group.clone()),
            class_slug: (self.id.source == ChoiceSource::Class).then(|| self.id.source_slug.clone()),
            spell_list: Some(self.spell_list.to_string()),
            max_spell_level: Some(self.max_level),
            distinct: true,
            ..Default::default()
        };
        PendingChoice::new(self.id, self.source_name, self.quantity)
            .with_subtype(subtype)
            .with_selected(selected)
            .with_options(options)
            .with_metadata(metadata)
    }
}

impl ChoiceHandler for SpellHandler {
    fn choice_type(&self) -> ChoiceType {
        ChoiceType::Spell
    }

    fn get_choices(&self, rules: &RulesContext<'_>, character: &Character) -> Vec<PendingChoice> {
        let catalog = rules.catalog;
        let mut picks = Vec::new();

        for (pivot, class) in class_pivots(catalog, character) {
            let Some(casting) = &class.spellcasting else {
                continue;
            };
            if let Some(first) = casting.first_cantrip_level().filter(|l| *l <= pivot.level) {
                picks.push(SpellPick {
                    id: ChoiceId::new(ChoiceType::Spell, ChoiceSource::Class, &class.slug, first, "cantrips"),
                    source_name: &class.name,
                    quantity: casting.cantrips_at(pivot.level),
                    spell_list: &class.slug,
                    min_level: 0,
                    max_level: 0,
                });
            }
            if let Some(first) = casting.first_spells_known_level().filter(|l| *l <= pivot.level) {
                picks.push(SpellPick {
                    id: ChoiceId::new(ChoiceType::Spell, ChoiceSource::Class, &class.slug, first, SPELLS_KNOWN),
                    source_name: &class.name,
                    quantity: casting.spells_known_at(pivot.level),
                    spell_list: &class.slug,
                    min_level: 1,
                    max_level: casting.max_spell_level_at(pivot.level).max(1),
                });
            }
        }

        for grant in grants(catalog, character) {
            let ModifierChoice::Spell {
                count,
                spell_list,
                max_level,
            } = &grant.modifier.choice
            else {
                continue;
            };
            picks.push(SpellPick {
                id: grant.id(ChoiceType::Spell),
                source_name: grant.source_name,
                quantity: *count,
                spell_list,
                min_level: if *max_level == 0 { 0 } else { 1 },
                max_level: *max_level,
            });
        }

        picks
            .into_iter()
            .map(|pick| pick.into_choice(catalog, character))
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
        let noun = if choice.subtype.as_deref() == Some(CANTRIP) {
            "cantrips"
        } else {
            "spells"
        };
        let values = list_selection(selection, noun)?;
        // A partly filled choice, typically after a level-up, takes just the
        // new picks; submitting the full quantity replaces the set instead.
        let top_up = choice.remaining > 0
            && choice.remaining < choice.quantity
            && values.len() != choice.quantity;
        if top_up {
            validate_remainder(choice, values, noun)?;
        } else {
            validate_list(choice, values, noun, true)?;
        }

        let max_level = choice.metadata.max_spell_level.unwrap_or(0);
        for slug in values {
            let spell = rules
                .catalog
                .spell(slug)
                .ok_or_else(|| ChoiceError::invalid(format!("Unknown spell '{slug}'")))?;
            if spell.level > max_level {
                return Err(ChoiceError::invalid(format!(
                    "{} is level {}; this choice allows up to level {max_level}",
                    spell.name, spell.level
                )));
            }
        }

        let level = character.level().max(1);
        let provenance = Provenance::for_choice(&choice.id);
        if top_up {
            character.spells.extend(values.iter().map(|slug| KnownSpell {
                spell_slug: slug.clone(),
                level_acquired: level,
                provenance: provenance.clone(),
            }));
            debug!(choice = %choice.id, added = ?values, "learned additional spells");
            return Ok(());
        }

        // Spells kept across a re-selection keep the level they were learned at.
        let learned: HashMap<String, u8> = character
            .spells
            .iter()
            .filter(|s| s.provenance.is_choice(&choice.id))
            .map(|s| (s.spell_slug.clone(), s.level_acquired))
            .collect();

        character.remove_records(|p| p.is_choice(&choice.id));
        character.spells.extend(values.iter().map(|slug| KnownSpell {
            spell_slug: slug.clone(),
            level_acquired: learned.get(slug).copied().unwrap_or(level),
            provenance: provenance.clone(),
        }));
        debug!(choice = %choice.id, selected = ?values, "learned spells");
        Ok(())
    }

    fn can_undo(&self, _character: &Character, _choice: &PendingChoice) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::choice::Selection;
    use crate::error::ChoiceError;
    use crate::testing::{sample_fighter, sample_variant_human_wizard, TestHarness};

    const CANTRIPS: &str = "spell|class|wizard|1|cantrips";
    const SPELLBOOK: &str = "spell|class|wizard|1|spells_known";

    #[test]
    fn test_wizard_gets_cantrips_and_spells() {
        let harness = TestHarness::new(sample_variant_human_wizard());
        let cantrips = harness.choice(CANTRIPS);
        assert_eq!(cantrips.quantity, 3);
        assert_eq!(cantrips.subtype.as_deref(), Some("cantrip"));
        assert!(cantrips.offers("fire-bolt"));
        assert!(!cantrips.offers("eldritch-blast"));

        let spells = harness.choice(SPELLBOOK);
        assert_eq!(spells.quantity, 6);
        assert!(spells.offers("magic-missile"));
        assert!(!spells.offers("misty-step"));
    }

    #[test]
    fn test_excess_cantrips_message() {
        let mut character = sample_variant_human_wizard();
        character.spells.clear();
        let mut harness = TestHarness::new(character);
        let err = harness
            .resolve(
                CANTRIPS,
                Selection::options(["fire-bolt", "light", "mage-hand", "ray-of-frost"]),
            )
            .unwrap_err();
        assert_eq!(
            err,
            ChoiceError::SelectionInvalid("Cannot select 4 cantrips; only 3 allowed".to_string())
        );
    }

    #[test]
    fn test_reselect_replaces_set() {
        let mut harness = TestHarness::new(sample_variant_human_wizard());
        harness
            .resolve(CANTRIPS, Selection::options(["fire-bolt", "light", "mage-hand"]))
            .unwrap();
        harness
            .resolve(CANTRIPS, Selection::options(["fire-bolt", "message", "ray-of-frost"]))
            .unwrap();
        let choice = harness.choice(CANTRIPS);
        assert_eq!(choice.selected.len(), 3);
        assert!(harness.character.knows_spell("message"));
        assert!(!harness.character.knows_spell("light"));
        assert_eq!(harness.character.spells.len(), 3);
    }

    #[test]
    fn test_feat_spell_filtered_by_list_and_level() {
        let mut harness = TestHarness::new(sample_variant_human_wizard());
        harness
            .resolve(
                "feat|race|variant-human|1|variant-human-feat",
                Selection::options(["magic-initiate"]),
            )
            .unwrap();
        let choice = harness.choice("spell|feat|magic-initiate|1|magic-initiate-spell");
        assert_eq!(choice.metadata.max_spell_level, Some(1));
        assert!(choice.offers("shield"));
        assert!(!choice.offers("fireball"));
        assert!(!choice.offers("cure-wounds"));
    }

    #[test]
    fn test_non_caster_has_no_spell_choices() {
        let harness = TestHarness::new(sample_fighter(1));
        assert!(harness
            .choices_of(crate::choice::ChoiceType::Spell)
            .is_empty());
    }

    #[test]
    fn test_quantity_grows_with_level() {
        let mut harness = TestHarness::new(sample_variant_human_wizard());
        harness
            .resolve(CANTRIPS, Selection::options(["fire-bolt", "light", "mage-hand"]))
            .unwrap();
        for _ in 0..3 {
            harness.level_up("wizard").unwrap();
        }
        let choice = harness.choice(CANTRIPS);
        assert_eq!(choice.quantity, 4);
        assert_eq!(choice.remaining, 1);
    }

    #[test]
    fn test_new_slot_filled_without_replacing() {
        let mut harness = TestHarness::new(sample_variant_human_wizard());
        harness
            .resolve(CANTRIPS, Selection::options(["fire-bolt", "light", "mage-hand"]))
            .unwrap();
        for _ in 0..3 {
            harness.level_up("wizard").unwrap();
        }

        harness
            .resolve(CANTRIPS, Selection::options(["ray-of-frost"]))
            .unwrap();

        let choice = harness.choice(CANTRIPS);
        assert_eq!(choice.remaining, 0);
        assert_eq!(choice.selected.len(), 4);
        let learned_at: Vec<(String, u8)> = harness
            .character
            .spells
            .iter()
            .map(|s| (s.spell_slug.clone(), s.level_acquired))
            .collect();
        assert!(learned_at.contains(&("fire-bolt".to_string(), 1)));
        assert!(learned_at.contains(&("ray-of-frost".to_string(), 4)));
    }

    #[test]
    fn test_partial_choice_rejects_wrong_count() {
        let mut harness = TestHarness::new(sample_variant_human_wizard());
        harness
            .resolve(CANTRIPS, Selection::options(["fire-bolt", "light", "mage-hand"]))
            .unwrap();
        for _ in 0..3 {
            harness.level_up("wizard").unwrap();
        }

        let err = harness
            .resolve(CANTRIPS, Selection::options(["ray-of-frost", "message"]))
            .unwrap_err();
        assert!(matches!(err, ChoiceError::SelectionInvalid(_)));
        assert!(harness
            .resolve(CANTRIPS, Selection::options(["light"]))
            .is_err());

        // The full quantity still replaces the whole set.
        harness
            .resolve(
                CANTRIPS,
                Selection::options(["fire-bolt", "message", "ray-of-frost", "shocking-grasp"]),
            )
            .unwrap();
        assert!(!harness.character.knows_spell("light"));
        assert_eq!(harness.choice(CANTRIPS).remaining, 0);
    }
}

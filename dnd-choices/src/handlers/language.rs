//! Extra language picks.

use super::{grants, list_selection, validate_list, ChoiceHandler, RulesContext};
use crate::catalog::ModifierChoice;
use crate::character::{Character, KnownLanguage, Provenance};
use crate::choice::{ChoiceMetadata, ChoiceOption, ChoiceType, PendingChoice, Selection};
use crate::error::Result;
use rand::RngCore;
use tracing::debug;

pub struct LanguageHandler;

impl ChoiceHandler for LanguageHandler {
    fn choice_type(&self) -> ChoiceType {
        ChoiceType::Language
    }

    fn get_choices(&self, rules: &RulesContext<'_>, character: &Character) -> Vec<PendingChoice> {
        let catalog = rules.catalog;
        grants(catalog, character)
            .into_iter()
            .filter_map(|grant| {
                let ModifierChoice::Language { count, options } = &grant.modifier.choice else {
                    return None;
                };
                let id = grant.id(ChoiceType::Language);
                let selected = character
                    .languages
                    .iter()
                    .filter(|l| l.provenance.is_choice(&id))
                    .map(|l| l.language_slug.clone())
                    .collect();
                let candidates: Vec<&str> = if options.is_empty() {
                    catalog.languages().map(|l| l.slug.as_str()).collect()
                } else {
                    options.iter().map(String::as_str).collect()
                };
                let options = candidates
                    .into_iter()
                    .filter(|slug| !character.knows_language(slug))
                    .map(|slug| {
                        let language = catalog.language(slug);
                        let name = language.map(|l| l.name.as_str()).unwrap_or(slug);
                        let option = ChoiceOption::new(slug, name);
                        match language {
                            Some(l) if l.exotic => option.with_detail("exotic"),
                            _ => option,
                        }
                    })
                    .collect();
                let metadata = ChoiceMetadata {
                    choice_group: Some(grant.modifier.id.clone()),
                    distinct: true,
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
        _rules: &RulesContext<'_>,
        _rng: &mut dyn RngCore,
        character: &mut Character,
        choice: &PendingChoice,
        selection: &Selection,
    ) -> Result<()> {
        let values = list_selection(selection, "languages")?;
        validate_list(choice, values, "languages", true)?;

        character.remove_records(|p| p.is_choice(&choice.id));
        let provenance = Provenance::for_choice(&choice.id);
        character
            .languages
            .extend(values.iter().map(|slug| KnownLanguage {
                language_slug: slug.clone(),
                provenance: provenance.clone(),
            }));
        debug!(choice = %choice.id, selected = ?values, "learned languages");
        Ok(())
    }

    fn can_undo(&self, _character: &Character, _choice: &PendingChoice) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::choice::{ChoiceSource, Selection};
    use crate::testing::{sample_fighter, sample_variant_human_wizard, TestHarness};

    #[test]
    fn test_known_languages_not_offered() {
        let harness = TestHarness::new(sample_fighter(1));
        let choice = harness.choice("language|race|human|1|human-extra-language");
        assert!(!choice.offers("common"));
        assert!(choice.offers("dwarvish"));
        assert_eq!(choice.quantity, 1);
    }

    #[test]
    fn test_feat_languages_grouped_under_feat_source() {
        let mut harness = TestHarness::new(sample_variant_human_wizard());
        harness
            .resolve(
                "feat|race|variant-human|1|variant-human-feat",
                Selection::options(["linguist"]),
            )
            .unwrap();

        let choice = harness.choice("language|feat|linguist|1|linguist-languages");
        assert_eq!(choice.source, ChoiceSource::Feat);
        assert_eq!(choice.quantity, 3);

        harness
            .resolve(
                "language|feat|linguist|1|linguist-languages",
                Selection::options(["draconic", "giant", "sylvan"]),
            )
            .unwrap();
        assert!(harness.character.knows_language("sylvan"));
    }

    #[test]
    fn test_resolve_replaces_and_undo_clears() {
        let mut harness = TestHarness::new(sample_fighter(1));
        let id = "language|race|human|1|human-extra-language";
        harness.resolve(id, Selection::options(["orc"])).unwrap();
        harness.resolve(id, Selection::options(["elvish"])).unwrap();
        assert!(!harness.character.knows_language("orc"));
        assert!(harness.character.knows_language("elvish"));

        harness.undo(id).unwrap();
        assert!(!harness.character.knows_language("elvish"));
        assert!(harness.character.knows_language("common"));
    }

    #[test]
    fn test_unknown_language_rejected() {
        let mut harness = TestHarness::new(sample_fighter(1));
        let id = "language|race|human|1|human-extra-language";
        assert!(harness.resolve(id, Selection::options(["klingon"])).is_err());
    }
}

//! Skill and tool proficiency picks.
//!
//! Class skill lists, class tool lists, and any skill or tool modifier on a
//! race, background, feat or subclass feature are independent instances.

use super::{class_pivots, grants, list_selection, validate_list, ChoiceHandler, RulesContext};
use crate::catalog::{Catalog, ModifierChoice};
use crate::character::{Character, Proficiency, ProficiencyKind, Provenance};
use crate::choice::{
    ChoiceId, ChoiceMetadata, ChoiceOption, ChoiceSource, ChoiceType, PendingChoice, Selection,
};
use crate::error::{ChoiceError, Result};
use rand::RngCore;
use std::collections::HashMap;
use tracing::debug;

pub struct ProficiencyHandler;

fn label(catalog: &Catalog, kind: ProficiencyKind, slug: &str) -> String {
    let name = match kind {
        ProficiencyKind::Skill => catalog.skill(slug).map(|s| s.name.as_str()),
        ProficiencyKind::Tool => catalog.tool(slug).map(|t| t.name.as_str()),
        ProficiencyKind::SavingThrow => None,
    };
    name.unwrap_or(slug).to_string()
}

fn kind_of(choice: &PendingChoice) -> Result<ProficiencyKind> {
    match choice.subtype.as_deref() {
        Some("skill") => Ok(ProficiencyKind::Skill),
        Some("tool") => Ok(ProficiencyKind::Tool),
        other => Err(ChoiceError::invalid(format!(
            "Unknown proficiency subtype {other:?}"
        ))),
    }
}

fn build_choice(
    catalog: &Catalog,
    character: &Character,
    id: ChoiceId,
    source_name: &str,
    kind: ProficiencyKind,
    quantity: usize,
    candidates: Vec<String>,
) -> PendingChoice {
    let selected = character
        .proficiencies
        .iter()
        .filter(|p| p.kind == kind && p.provenance.is_choice(&id))
        .map(|p| p.slug.clone())
        .collect();
    let options = candidates
        .into_iter()
        .filter(|slug| !character.has_proficiency(kind, slug))
        .map(|slug| {
            let name = label(catalog, kind, &slug);
            ChoiceOption::new(slug, name)
        })
        .collect();
    let metadata = ChoiceMetadata {
        choice_group: Some(id.group.clone()),
        class_slug: (id.source == ChoiceSource::Class).then(|| id.source_slug.clone()),
        distinct: true,
        ..Default::default()
    };
    PendingChoice::new(id, source_name, quantity)
        .with_subtype(kind.as_str())
        .with_selected(selected)
        .with_options(options)
        .with_metadata(metadata)
}

impl ChoiceHandler for ProficiencyHandler {
    fn choice_type(&self) -> ChoiceType {
        ChoiceType::Proficiency
    }

    fn get_choices(&self, rules: &RulesContext<'_>, character: &Character) -> Vec<PendingChoice> {
        let catalog = rules.catalog;
        let mut choices = Vec::new();

        for (pivot, class) in class_pivots(catalog, character) {
            let count = if pivot.is_primary {
                class.skill_choice.count
            } else {
                class.skill_choice.multiclass_count
            };
            if count > 0 {
                let id = ChoiceId::new(ChoiceType::Proficiency, ChoiceSource::Class, &class.slug, 1, "skills");
                choices.push(build_choice(
                    catalog,
                    character,
                    id,
                    &class.name,
                    ProficiencyKind::Skill,
                    count,
                    class.skill_choice.options.clone(),
                ));
            }
            if let Some(tools) = class.tool_choice.as_ref().filter(|_| pivot.is_primary) {
                let id = ChoiceId::new(ChoiceType::Proficiency, ChoiceSource::Class, &class.slug, 1, "tools");
                choices.push(build_choice(
                    catalog,
                    character,
                    id,
                    &class.name,
                    ProficiencyKind::Tool,
                    tools.count,
                    tools.options.clone(),
                ));
            }
        }

        for grant in grants(catalog, character) {
            let (kind, count, options) = match &grant.modifier.choice {
                ModifierChoice::Skill { count, options } => {
                    let options = if options.is_empty() {
                        catalog.skills().map(|s| s.slug.clone()).collect()
                    } else {
                        options.clone()
                    };
                    (ProficiencyKind::Skill, *count, options)
                }
                ModifierChoice::Tool { count, options } => {
                    let options = if options.is_empty() {
                        catalog.tools().map(|t| t.slug.clone()).collect()
                    } else {
                        options.clone()
                    };
                    (ProficiencyKind::Tool, *count, options)
                }
                _ => continue,
            };
            choices.push(build_choice(
                catalog,
                character,
                grant.id(ChoiceType::Proficiency),
                grant.source_name,
                kind,
                count,
                options,
            ));
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
        let kind = kind_of(choice)?;
        let noun = match kind {
            ProficiencyKind::Tool => "tools",
            _ => "skills",
        };
        let values = list_selection(selection, noun)?;
        validate_list(choice, values, noun, true)?;

        // Expertise survives when the same proficiency is picked again.
        let expertise: HashMap<String, Option<Provenance>> = character
            .proficiencies
            .iter()
            .filter(|p| p.provenance.is_choice(&choice.id))
            .map(|p| (p.slug.clone(), p.expertise.clone()))
            .collect();

        character.remove_records(|p| p.is_choice(&choice.id));
        let provenance = Provenance::for_choice(&choice.id);
        for slug in values {
            character.proficiencies.push(Proficiency {
                kind,
                slug: slug.clone(),
                expertise: expertise.get(slug).cloned().flatten(),
                provenance: provenance.clone(),
            });
        }
        debug!(choice = %choice.id, selected = ?values, "applied proficiencies");
        Ok(())
    }

    fn can_undo(&self, _character: &Character, _choice: &PendingChoice) -> bool {
        true
    }
}

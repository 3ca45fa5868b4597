//! Expertise: doubling the proficiency bonus on proficiencies already held.

use super::{class_pivots, list_selection, validate_list, ChoiceHandler, RulesContext};
use crate::catalog::Catalog;
use crate::character::{Character, ProficiencyKind, Provenance};
use crate::choice::{
    ChoiceId, ChoiceMetadata, ChoiceOption, ChoiceSource, ChoiceType, PendingChoice, Selection,
};
use crate::error::Result;
use rand::RngCore;
use tracing::debug;

pub struct ExpertiseHandler;

fn eligible(kind: ProficiencyKind, skills_only: bool) -> bool {
    match kind {
        ProficiencyKind::Skill => true,
        ProficiencyKind::Tool => !skills_only,
        ProficiencyKind::SavingThrow => false,
    }
}

fn option_for(catalog: &Catalog, kind: ProficiencyKind, slug: &str) -> ChoiceOption {
    let name = match kind {
        ProficiencyKind::Skill => catalog.skill(slug).map(|s| s.name.as_str()),
        ProficiencyKind::Tool => catalog.tool(slug).map(|t| t.name.as_str()),
        ProficiencyKind::SavingThrow => None,
    };
    ChoiceOption::new(slug, name.unwrap_or(slug)).with_detail(kind.as_str())
}

impl ChoiceHandler for ExpertiseHandler {
    fn choice_type(&self) -> ChoiceType {
        ChoiceType::Expertise
    }

    fn get_choices(&self, rules: &RulesContext<'_>, character: &Character) -> Vec<PendingChoice> {
        let catalog = rules.catalog;
        let mut choices = Vec::new();

        for (pivot, class) in class_pivots(catalog, character) {
            for grant in class.expertise.iter().filter(|g| g.level <= pivot.level) {
                let id = ChoiceId::new(
                    ChoiceType::Expertise,
                    ChoiceSource::Class,
                    &class.slug,
                    grant.level,
                    format!("expertise_{}", grant.level),
                );
                let selected = character
                    .proficiencies
                    .iter()
                    .filter(|p| p.expertise.as_ref().is_some_and(|e| e.is_choice(&id)))
                    .map(|p| p.slug.clone())
                    .collect();
                let options = character
                    .proficiencies
                    .iter()
                    .filter(|p| eligible(p.kind, grant.skills_only) && p.expertise.is_none())
                    .map(|p| option_for(catalog, p.kind, &p.slug))
                    .collect();
                let metadata = ChoiceMetadata {
                    choice_group: Some(id.group.clone()),
                    class_slug: Some(class.slug.clone()),
                    distinct: true,
                    skills_only: grant.skills_only,
                    ..Default::default()
                };
                choices.push(
                    PendingChoice::new(id, &class.name, grant.count)
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
        _rng: &mut dyn RngCore,
        character: &mut Character,
        choice: &PendingChoice,
        selection: &Selection,
    ) -> Result<()> {
        let values = list_selection(selection, "proficiencies")?;
        validate_list(choice, values, "proficiencies", true)?;

        let provenance = Provenance::for_choice(&choice.id);
        let skills_only = choice.metadata.skills_only;
        for proficiency in &mut character.proficiencies {
            if proficiency
                .expertise
                .as_ref()
                .is_some_and(|e| e.is_choice(&choice.id))
            {
                proficiency.expertise = None;
            }
        }
        for slug in values {
            if let Some(proficiency) = character.proficiencies.iter_mut().find(|p| {
                &p.slug == slug && eligible(p.kind, skills_only) && p.expertise.is_none()
            }) {
                proficiency.expertise = Some(provenance.clone());
            }
        }
        debug!(choice = %choice.id, selected = ?values, "granted expertise");
        Ok(())
    }

    fn can_undo(&self, _character: &Character, _choice: &PendingChoice) -> bool {
        true
    }
}

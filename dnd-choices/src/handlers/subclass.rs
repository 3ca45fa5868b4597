//! Subclass selection for each class pivot.
//!
//! Resolving assigns the subclass features up to the pivot's current class
//! level. Undo is only possible while the pivot is still at the level where
//! the subclass was chosen, and only touches that pivot's records.

use super::{class_pivots, ChoiceHandler, RulesContext};
use crate::catalog::Catalog;
use crate::character::{Character, GrantedFeature, Provenance};
use crate::choice::{
    ChoiceId, ChoiceMetadata, ChoiceOption, ChoiceSource, ChoiceType, PendingChoice, Selection,
};
use crate::error::{ChoiceError, Result};
use rand::RngCore;
use tracing::debug;

pub struct SubclassHandler;

/// Group used by every subclass choice.
pub const SUBCLASS_GROUP: &str = "subclass";

fn subclass_slug<'s>(selection: &'s Selection) -> Result<&'s str> {
    match selection {
        Selection::Subclass { subclass_slug } => Ok(subclass_slug),
        Selection::Options { selected } if selected.len() == 1 => Ok(&selected[0]),
        Selection::Options { selected } if selected.is_empty() => {
            Err(ChoiceError::invalid("No subclass selected"))
        }
        Selection::Options { selected } => Err(ChoiceError::invalid(format!(
            "Cannot select {} subclasses; only 1 allowed",
            selected.len()
        ))),
        Selection::AsiOrFeat(_) => Err(ChoiceError::invalid("Expected {\"subclass_slug\": ...}")),
    }
}

/// Drop everything a subclass wrote on the character: the features granted
/// by the choice, later subclass features, and picks sourced from it.
fn strip_subclass(character: &mut Character, id: &ChoiceId, subclass_slug: &str) {
    character.remove_records(|p| {
        p.is_choice(id)
            || p.is_from(ChoiceSource::Subclass, subclass_slug)
            || p.is_from(ChoiceSource::SubclassFeature, subclass_slug)
    });
}

/// Features of `subclass_slug` up to `class_level`, tagged with `provenance`.
pub(crate) fn subclass_features(
    catalog: &Catalog,
    subclass_slug: &str,
    min_level: u8,
    class_level: u8,
    provenance: &Provenance,
) -> Vec<GrantedFeature> {
    let Some(subclass) = catalog.subclass(subclass_slug) else {
        return Vec::new();
    };
    subclass
        .features
        .iter()
        .filter(|f| f.level >= min_level && f.level <= class_level)
        .map(|f| GrantedFeature {
            name: f.name.clone(),
            description: f.description.clone(),
            class_slug: subclass.class.clone(),
            origin_slug: subclass.slug.clone(),
            level: f.level,
            provenance: provenance.clone(),
        })
        .collect()
}

impl ChoiceHandler for SubclassHandler {
    fn choice_type(&self) -> ChoiceType {
        ChoiceType::Subclass
    }

    fn get_choices(&self, rules: &RulesContext<'_>, character: &Character) -> Vec<PendingChoice> {
        let catalog = rules.catalog;
        class_pivots(catalog, character)
            .filter(|(pivot, class)| pivot.level >= class.subclass_level)
            .map(|(pivot, class)| {
                let id = ChoiceId::new(
                    ChoiceType::Subclass,
                    ChoiceSource::Class,
                    &class.slug,
                    class.subclass_level,
                    SUBCLASS_GROUP,
                );
                let options = catalog
                    .subclasses_of(&class.slug)
                    .map(|s| ChoiceOption::new(&s.slug, &s.name))
                    .collect();
                let metadata = ChoiceMetadata {
                    choice_group: Some(SUBCLASS_GROUP.to_string()),
                    class_slug: Some(class.slug.clone()),
                    ..Default::default()
                };
                PendingChoice::new(id, &class.name, 1)
                    .with_subtype(&class.subclass_title)
                    .with_selected(pivot.subclass_slug.iter().cloned().collect())
                    .with_options(options)
                    .with_metadata(metadata)
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
        let slug = subclass_slug(selection)?;
        if !choice.offers(slug) {
            return Err(ChoiceError::invalid(format!(
                "'{slug}' is not a subclass of {}",
                choice.source_name
            )));
        }
        let class_slug = choice.source_slug().to_string();
        let (previous, class_level) = character
            .pivot(&class_slug)
            .map(|p| (p.subclass_slug.clone(), p.level))
            .ok_or_else(|| ChoiceError::invalid(format!("Character has no {class_slug} levels")))?;

        if let Some(previous) = previous.as_deref() {
            strip_subclass(character, &choice.id, previous);
        }

        let provenance = Provenance::for_choice(&choice.id);
        let features = subclass_features(rules.catalog, slug, 0, class_level, &provenance);
        if let Some(pivot) = character.pivot_mut(&class_slug) {
            pivot.subclass_slug = Some(slug.to_string());
            pivot.subclass_choices.clear();
        }
        character.features.extend(features);
        debug!(choice = %choice.id, subclass = slug, "assigned subclass");
        Ok(())
    }

    // The window follows the owning class's level, not the character level,
    // so a level in another class leaves this subclass open to undo.
    fn can_undo(&self, character: &Character, choice: &PendingChoice) -> bool {
        character
            .pivot(choice.source_slug())
            .is_some_and(|p| p.level == choice.level_granted)
    }

    fn undo(
        &self,
        _rules: &RulesContext<'_>,
        character: &mut Character,
        choice: &PendingChoice,
    ) -> Result<()> {
        if !self.can_undo(character, choice) {
            return Err(ChoiceError::not_undoable(format!(
                "{} subclass can only be changed at class level {}",
                choice.source_name, choice.level_granted
            )));
        }
        let Some(previous) = character
            .pivot(choice.source_slug())
            .and_then(|p| p.subclass_slug.clone())
        else {
            return Ok(());
        };
        strip_subclass(character, &choice.id, &previous);
        if let Some(pivot) = character.pivot_mut(choice.source_slug()) {
            pivot.subclass_slug = None;
            pivot.subclass_choices.clear();
        }
        debug!(choice = %choice.id, subclass = %previous, "removed subclass");
        Ok(())
    }
}

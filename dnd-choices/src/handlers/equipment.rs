//! Starting equipment bundles for the primary class.

use super::{single_value, ChoiceHandler, RulesContext};
use crate::character::{Character, EquipmentItem, Provenance};
use crate::choice::{ChoiceId, ChoiceMetadata, ChoiceOption, ChoiceSource, ChoiceType, PendingChoice, Selection};
use crate::error::{ChoiceError, Result};
use rand::RngCore;
use tracing::debug;

pub struct EquipmentHandler;

impl ChoiceHandler for EquipmentHandler {
    fn choice_type(&self) -> ChoiceType {
        ChoiceType::Equipment
    }

    fn get_choices(&self, rules: &RulesContext<'_>, character: &Character) -> Vec<PendingChoice> {
        let catalog = rules.catalog;
        let Some(class) = character
            .primary_class()
            .and_then(|pivot| catalog.class(&pivot.class_slug))
        else {
            return Vec::new();
        };

        class
            .equipment_choices
            .iter()
            .map(|group| {
                let id = ChoiceId::new(ChoiceType::Equipment, ChoiceSource::Class, &class.slug, 1, &group.group);
                let mut selected: Vec<String> = Vec::new();
                for item in character.equipment.iter().filter(|e| e.provenance.is_choice(&id)) {
                    if let Some(bundle) = &item.bundle {
                        if !selected.contains(bundle) {
                            selected.push(bundle.clone());
                        }
                    }
                }
                let options = group
                    .bundles
                    .iter()
                    .map(|bundle| {
                        let contents: Vec<String> = bundle
                            .items
                            .iter()
                            .map(|grant| {
                                let name = catalog
                                    .item(&grant.item_slug)
                                    .map(|i| i.name.as_str())
                                    .unwrap_or(&grant.item_slug);
                                format!("{} x{}", name, grant.quantity)
                            })
                            .collect();
                        ChoiceOption::new(&bundle.slug, &bundle.label).with_detail(contents.join(", "))
                    })
                    .collect();
                let metadata = ChoiceMetadata {
                    choice_group: Some(group.group.clone()),
                    class_slug: Some(class.slug.clone()),
                    ..Default::default()
                };
                PendingChoice::new(id, &class.name, 1)
                    .with_subtype(&group.label)
                    .with_selected(selected)
                    .with_options(options)
                    .with_metadata(metadata)
                    .required(rules.config.equipment_required)
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
        let bundle_slug = single_value(choice, selection, "equipment bundles")?;
        let bundle = rules
            .catalog
            .class(choice.source_slug())
            .and_then(|class| {
                class
                    .equipment_choices
                    .iter()
                    .find(|g| g.group == choice.group())
            })
            .and_then(|group| group.bundles.iter().find(|b| b.slug == bundle_slug))
            .ok_or_else(|| ChoiceError::invalid(format!("Unknown equipment bundle '{bundle_slug}'")))?;

        // Items from the previously chosen bundle go before the new ones land.
        character.remove_records(|p| p.is_choice(&choice.id));
        let provenance = Provenance::for_choice(&choice.id);
        character
            .equipment
            .extend(bundle.items.iter().map(|grant| EquipmentItem {
                item_slug: grant.item_slug.clone(),
                quantity: grant.quantity,
                bundle: Some(bundle.slug.clone()),
                provenance: provenance.clone(),
            }));
        debug!(choice = %choice.id, bundle = %bundle.slug, "equipped bundle");
        Ok(())
    }

    fn can_undo(&self, character: &Character, _choice: &PendingChoice) -> bool {
        character.primary_class().is_some_and(|pivot| pivot.level == 1)
    }
}

//! Choice aggregation and dispatch.
//!
//! The engine collects every handler's choices for a character, and routes
//! resolve and undo calls to the handler named by the choice id. Each call
//! runs against a working copy of the character that replaces the original
//! only when the handler succeeds, so a rejected selection changes nothing.

use crate::catalog::Catalog;
use crate::character::Character;
use crate::choice::{ChoiceId, ChoiceType, PendingChoice, Selection};
use crate::error::{ChoiceError, Result};
use crate::handlers::{handler_for, handlers, RulesContext};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default upper bound for ability scores raised by choices.
pub const DEFAULT_ABILITY_SCORE_CAP: u8 = 20;

/// Configuration for a [`ChoiceEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Scores may not be raised above this by a choice.
    pub ability_score_cap: u8,

    /// Seed for hit point rolls; entropy when `None`.
    pub rng_seed: Option<u64>,

    /// Whether starting equipment blocks completion.
    pub equipment_required: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ability_score_cap: DEFAULT_ABILITY_SCORE_CAP,
            rng_seed: None,
            equipment_required: false,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ability score cap.
    pub fn with_ability_score_cap(mut self, cap: u8) -> Self {
        self.ability_score_cap = cap;
        self
    }

    /// Make hit point rolls reproducible.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Require starting equipment to be picked before the character is complete.
    pub fn with_equipment_required(mut self, required: bool) -> Self {
        self.equipment_required = required;
        self
    }
}

/// Counts over a character's choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSummary {
    pub total: usize,
    /// Picks still open, summed over every choice.
    pub remaining: usize,
    /// Open choices that block completion.
    pub required_remaining: usize,
    /// Open choices per type, counted once each however many picks they lack.
    pub by_type: BTreeMap<ChoiceType, usize>,
    pub complete: bool,
}

impl ChoiceSummary {
    pub fn from_choices(choices: &[PendingChoice]) -> Self {
        let mut summary = ChoiceSummary {
            total: choices.len(),
            ..Default::default()
        };
        for choice in choices.iter().filter(|c| !c.is_complete()) {
            summary.remaining += choice.remaining;
            if choice.required {
                summary.required_remaining += 1;
            }
            *summary.by_type.entry(choice.choice_type).or_insert(0) += 1;
        }
        summary.complete = summary.required_remaining == 0;
        summary
    }
}

/// Every choice for a character along with its summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingChoices {
    pub choices: Vec<PendingChoice>,
    pub summary: ChoiceSummary,
}

impl PendingChoices {
    /// Choices that still need picks.
    pub fn open(&self) -> impl Iterator<Item = &PendingChoice> {
        self.choices.iter().filter(|c| !c.is_complete())
    }
}

/// Routes choice operations to the handlers.
pub struct ChoiceEngine {
    catalog: Arc<Catalog>,
    config: EngineConfig,
    rng: StdRng,
}

impl ChoiceEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_config(catalog, EngineConfig::default())
    }

    pub fn with_config(catalog: Arc<Catalog>, config: EngineConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            catalog,
            config,
            rng,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn rules(&self) -> RulesContext<'_> {
        RulesContext::new(&self.catalog, &self.config)
    }

    /// Every choice of every type, resolved or not.
    pub fn collect_all(&self, character: &Character) -> PendingChoices {
        let rules = self.rules();
        let choices: Vec<PendingChoice> = handlers()
            .flat_map(|handler| handler.get_choices(&rules, character))
            .collect();
        let summary = ChoiceSummary::from_choices(&choices);
        debug!(
            character = %character.id,
            total = summary.total,
            remaining = summary.remaining,
            "collected choices"
        );
        PendingChoices { choices, summary }
    }

    /// Choices of a single type.
    pub fn choices_of(&self, choice_type: ChoiceType, character: &Character) -> Vec<PendingChoice> {
        handler_for(choice_type).get_choices(&self.rules(), character)
    }

    /// The current, authoritative choice for `choice_id`.
    pub fn find_choice(&self, character: &Character, choice_id: &str) -> Result<PendingChoice> {
        let id = ChoiceId::decode(choice_id)?;
        self.choices_of(id.choice_type, character)
            .into_iter()
            .find(|choice| choice.id == id)
            .ok_or_else(|| ChoiceError::ChoiceNotFound(choice_id.to_string()))
    }

    /// Validate and apply `selection`, replacing any earlier selection.
    pub fn resolve(
        &mut self,
        character: &mut Character,
        choice_id: &str,
        selection: &Selection,
    ) -> Result<()> {
        let choice = self.find_choice(character, choice_id)?;
        let handler = handler_for(choice.choice_type);

        let mut working = character.clone();
        let rules = RulesContext::new(&self.catalog, &self.config);
        match handler.resolve(&rules, &mut self.rng, &mut working, &choice, selection) {
            Ok(()) => {
                *character = working;
                info!(character = %character.id, choice = choice_id, "resolved choice");
                Ok(())
            }
            Err(err) => {
                warn!(character = %character.id, choice = choice_id, error = %err, "rejected selection");
                Err(err)
            }
        }
    }

    pub fn can_undo(&self, character: &Character, choice_id: &str) -> Result<bool> {
        let choice = self.find_choice(character, choice_id)?;
        Ok(handler_for(choice.choice_type).can_undo(character, &choice))
    }

    /// Remove what the choice wrote, where the rules still allow it.
    pub fn undo(&self, character: &mut Character, choice_id: &str) -> Result<()> {
        let choice = self.find_choice(character, choice_id)?;
        let handler = handler_for(choice.choice_type);
        if !handler.can_undo(character, &choice) {
            warn!(character = %character.id, choice = choice_id, "undo refused");
            return Err(ChoiceError::not_undoable(format!(
                "{} choice '{}' cannot be undone now",
                choice.choice_type, choice_id
            )));
        }

        let mut working = character.clone();
        handler.undo(&self.rules(), &mut working, &choice)?;
        *character = working;
        info!(character = %character.id, choice = choice_id, "undid choice");
        Ok(())
    }
}

//! Testing utilities for the choice engine.
//!
//! This module provides tools for unit and integration testing:
//! - Sample characters built through the real character builder
//! - `TestHarness` pairing a character with a seeded engine

use crate::catalog::Catalog;
use crate::character::{Ability, Character};
use crate::character_builder::{add_class, level_up, BuilderError, CharacterBuilder};
use crate::choice::{ChoiceType, PendingChoice, Selection};
use crate::engine::{ChoiceEngine, EngineConfig};
use crate::error::Result;

/// Seed used by every harness so hit point rolls repeat.
pub const TEST_SEED: u64 = 42;

/// A character with a seeded engine over the SRD catalog.
pub struct TestHarness {
    pub engine: ChoiceEngine,
    pub character: Character,
}

impl TestHarness {
    pub fn new(character: Character) -> Self {
        Self::with_config(character, EngineConfig::new().with_rng_seed(TEST_SEED))
    }

    pub fn with_config(character: Character, config: EngineConfig) -> Self {
        Self {
            engine: ChoiceEngine::with_config(Catalog::srd(), config),
            character,
        }
    }

    /// The choice with this id; panics when the character has none.
    pub fn choice(&self, id: &str) -> PendingChoice {
        match self.try_choice(id) {
            Some(choice) => choice,
            None => panic!("no choice '{id}' for {}", self.character.name),
        }
    }

    pub fn try_choice(&self, id: &str) -> Option<PendingChoice> {
        self.engine.find_choice(&self.character, id).ok()
    }

    pub fn choices_of(&self, choice_type: ChoiceType) -> Vec<PendingChoice> {
        self.engine.choices_of(choice_type, &self.character)
    }

    pub fn resolve(&mut self, id: &str, selection: Selection) -> Result<()> {
        self.engine.resolve(&mut self.character, id, &selection)
    }

    pub fn undo(&mut self, id: &str) -> Result<()> {
        self.engine.undo(&mut self.character, id)
    }

    /// False when the choice is missing or refuses undo.
    pub fn can_undo(&self, id: &str) -> bool {
        self.engine.can_undo(&self.character, id).unwrap_or(false)
    }

    pub fn level_up(&mut self, class_slug: &str) -> std::result::Result<u8, BuilderError> {
        level_up(self.engine.catalog(), &mut self.character, class_slug)
    }
}

fn build(builder: CharacterBuilder) -> Character {
    match builder.build(&Catalog::srd()) {
        Ok(character) => character,
        Err(err) => panic!("sample character failed to build: {err}"),
    }
}

fn advance(mut character: Character, class_slug: &str, level: u8) -> Character {
    let catalog = Catalog::srd();
    while character.pivot(class_slug).map_or(0, |p| p.level) < level {
        if let Err(err) = level_up(&catalog, &mut character, class_slug) {
            panic!("sample character failed to level: {err}");
        }
    }
    character
}

/// Human soldier fighter at the given level.
pub fn sample_fighter(level: u8) -> Character {
    let character = build(
        CharacterBuilder::new()
            .name("Roland")
            .race("human")
            .class("fighter")
            .background("soldier")
            .standard_array([
                (15, Ability::Strength),
                (14, Ability::Constitution),
                (13, Ability::Dexterity),
                (12, Ability::Wisdom),
                (10, Ability::Intelligence),
                (8, Ability::Charisma),
            ]),
    );
    advance(character, "fighter", level)
}

/// First-level half-elf sage bard.
pub fn sample_half_elf_bard() -> Character {
    build(
        CharacterBuilder::new()
            .name("Lyra")
            .race("half-elf")
            .class("bard")
            .background("sage")
            .standard_array([
                (15, Ability::Charisma),
                (14, Ability::Dexterity),
                (13, Ability::Constitution),
                (12, Ability::Wisdom),
                (10, Ability::Intelligence),
                (8, Ability::Strength),
            ]),
    )
}

/// First-level hill dwarf acolyte cleric.
pub fn sample_hill_dwarf_cleric() -> Character {
    build(
        CharacterBuilder::new()
            .name("Brena")
            .race("hill-dwarf")
            .class("cleric")
            .background("acolyte")
            .standard_array([
                (15, Ability::Wisdom),
                (14, Ability::Constitution),
                (13, Ability::Strength),
                (12, Ability::Charisma),
                (10, Ability::Dexterity),
                (8, Ability::Intelligence),
            ]),
    )
}

/// First-level variant human sage wizard.
pub fn sample_variant_human_wizard() -> Character {
    build(
        CharacterBuilder::new()
            .name("Ilsa")
            .race("variant-human")
            .class("wizard")
            .background("sage")
            .standard_array([
                (15, Ability::Intelligence),
                (14, Ability::Constitution),
                (13, Ability::Dexterity),
                (12, Ability::Wisdom),
                (10, Ability::Charisma),
                (8, Ability::Strength),
            ]),
    )
}

/// Lightfoot halfling criminal rogue at the given level.
pub fn sample_rogue(level: u8) -> Character {
    let character = build(
        CharacterBuilder::new()
            .name("Pip")
            .race("lightfoot-halfling")
            .class("rogue")
            .background("criminal")
            .standard_array([
                (15, Ability::Dexterity),
                (14, Ability::Constitution),
                (13, Ability::Charisma),
                (12, Ability::Wisdom),
                (10, Ability::Intelligence),
                (8, Ability::Strength),
            ]),
    );
    advance(character, "rogue", level)
}

/// Cleric 1 / sorcerer 1, both at their subclass level.
pub fn sample_multiclass_caster() -> Character {
    let mut character = sample_hill_dwarf_cleric();
    if let Err(err) = add_class(&Catalog::srd(), &mut character, "sorcerer") {
        panic!("sample character failed to multiclass: {err}");
    }
    character
}

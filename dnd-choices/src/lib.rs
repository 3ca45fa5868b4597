//! D&D 5e pending choice resolution for character creation and level-up.
//!
//! This crate provides:
//! - A reference data catalog with a built-in SRD dataset
//! - The character aggregate with provenance-tagged grants
//! - One handler per choice type, dispatched by `ChoiceEngine`
//! - A roster-backed `ChoiceService` and JSON persistence
//!
//! # Quick Start
//!
//! ```no_run
//! use dnd_choices::{Ability, Catalog, CharacterBuilder, ChoiceEngine, Selection};
//!
//! let catalog = Catalog::srd();
//! let mut character = CharacterBuilder::new()
//!     .name("Roland")
//!     .race("human")
//!     .class("fighter")
//!     .background("soldier")
//!     .standard_array([
//!         (15, Ability::Strength),
//!         (14, Ability::Constitution),
//!         (13, Ability::Dexterity),
//!         (12, Ability::Wisdom),
//!         (10, Ability::Intelligence),
//!         (8, Ability::Charisma),
//!     ])
//!     .build(&catalog)?;
//!
//! let mut engine = ChoiceEngine::new(catalog);
//! for choice in engine.collect_all(&character).open() {
//!     println!("{} ({} left)", choice.id, choice.remaining);
//! }
//!
//! engine.resolve(
//!     &mut character,
//!     "proficiency|class|fighter|1|skills",
//!     &Selection::options(["perception", "survival"]),
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod character;
pub mod character_builder;
pub mod choice;
pub mod dice;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod persist;
pub mod service;
pub mod testing;

// Primary public API
pub use catalog::{Catalog, CatalogError};
pub use character::{Ability, AbilityScores, Character, CharacterId, Provenance};
pub use character_builder::{AbilityMethod, BuilderError, CharacterBuilder};
pub use choice::{
    AsiOrFeatSelection, ChoiceId, ChoiceSource, ChoiceType, PendingChoice, Selection,
};
pub use engine::{ChoiceEngine, ChoiceSummary, EngineConfig, PendingChoices};
pub use error::ChoiceError;
pub use persist::{CharacterMetadata, PersistError, SaveListing, SavedCharacter};
pub use service::{CharacterRoster, ChoiceService, ServiceError};

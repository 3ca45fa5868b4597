//! Character-level entry points over a roster of loaded characters.

use crate::character::{Character, CharacterId};
use crate::choice::Selection;
use crate::engine::{ChoiceEngine, PendingChoices};
use crate::error::{ChoiceError, Result};
use crate::persist::{PersistError, SavedCharacter};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors from service operations that touch the filesystem.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Choice(#[from] ChoiceError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Characters currently loaded, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct CharacterRoster {
    characters: HashMap<CharacterId, Character>,
}

impl CharacterRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a character. Returns its id.
    pub fn insert(&mut self, character: Character) -> CharacterId {
        let id = character.id;
        self.characters.insert(id, character);
        id
    }

    pub fn get(&self, id: &CharacterId) -> Result<&Character> {
        self.characters
            .get(id)
            .ok_or_else(|| ChoiceError::CharacterNotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &CharacterId) -> Result<&mut Character> {
        self.characters
            .get_mut(id)
            .ok_or_else(|| ChoiceError::CharacterNotFound(id.to_string()))
    }

    pub fn remove(&mut self, id: &CharacterId) -> Option<Character> {
        self.characters.remove(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &CharacterId> {
        self.characters.keys()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

/// Pending choice operations addressed by character id.
///
/// Each call works on the roster's copy of the character. Two callers that
/// edit the same character in turn see each other's writes; there is no
/// locking beyond `&mut self`.
pub struct ChoiceService {
    engine: ChoiceEngine,
    roster: CharacterRoster,
}

impl ChoiceService {
    pub fn new(engine: ChoiceEngine) -> Self {
        Self {
            engine,
            roster: CharacterRoster::new(),
        }
    }

    pub fn engine(&self) -> &ChoiceEngine {
        &self.engine
    }

    pub fn roster(&self) -> &CharacterRoster {
        &self.roster
    }

    pub fn insert(&mut self, character: Character) -> CharacterId {
        self.roster.insert(character)
    }

    pub fn character(&self, character_id: &CharacterId) -> Result<&Character> {
        self.roster.get(character_id)
    }

    /// Every choice for the character, with its summary.
    pub fn get_pending_choices(&self, character_id: &CharacterId) -> Result<PendingChoices> {
        let character = self.roster.get(character_id)?;
        Ok(self.engine.collect_all(character))
    }

    pub fn resolve_choice(
        &mut self,
        character_id: &CharacterId,
        choice_id: &str,
        selection: &Selection,
    ) -> Result<()> {
        let character = self.roster.get_mut(character_id)?;
        self.engine.resolve(character, choice_id, selection)
    }

    pub fn undo_choice(&mut self, character_id: &CharacterId, choice_id: &str) -> Result<()> {
        let character = self.roster.get_mut(character_id)?;
        self.engine.undo(character, choice_id)
    }

    /// Write the character to `path`.
    pub async fn save_character(
        &self,
        character_id: &CharacterId,
        path: impl AsRef<Path>,
    ) -> Result<(), ServiceError> {
        let character = self.roster.get(character_id)?;
        SavedCharacter::new(character.clone()).save_json(&path).await?;
        info!(character = %character_id, path = %path.as_ref().display(), "saved character");
        Ok(())
    }

    /// Load a character into the roster. Returns its id.
    pub async fn load_character(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<CharacterId, ServiceError> {
        let saved = SavedCharacter::load_json(&path).await?;
        let id = self.roster.insert(saved.character);
        info!(character = %id, path = %path.as_ref().display(), "loaded character");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::choice::ChoiceType;
    use crate::engine::EngineConfig;
    use crate::testing::sample_fighter;
    use tempfile::TempDir;

    fn new_service() -> ChoiceService {
        ChoiceService::new(ChoiceEngine::with_config(
            Catalog::srd(),
            EngineConfig::new().with_rng_seed(5),
        ))
    }

    #[test]
    fn test_unknown_character() {
        let mut service = new_service();
        let missing = CharacterId::new();

        assert!(matches!(
            service.get_pending_choices(&missing),
            Err(ChoiceError::CharacterNotFound(_))
        ));
        assert!(matches!(
            service.undo_choice(&missing, "size|race|human|1|size"),
            Err(ChoiceError::CharacterNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_through_service() {
        let mut service = new_service();
        let id = service.insert(sample_fighter(1));
        let skills = "proficiency|class|fighter|1|skills";

        let before = service.get_pending_choices(&id).unwrap();
        service
            .resolve_choice(&id, skills, &Selection::options(["perception", "survival"]))
            .unwrap();
        let after = service.get_pending_choices(&id).unwrap();

        assert_eq!(after.summary.total, before.summary.total);
        assert_eq!(after.summary.remaining, before.summary.remaining - 2);
        let open = |p: &PendingChoices| {
            p.summary.by_type.get(&ChoiceType::Proficiency).copied().unwrap_or(0)
        };
        assert_eq!(open(&after), open(&before) - 1);

        service.undo_choice(&id, skills).unwrap();
        let undone = service.get_pending_choices(&id).unwrap();
        assert_eq!(undone.summary, before.summary);
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("roland.json");

        let mut service = new_service();
        let id = service.insert(sample_fighter(2));
        service
            .resolve_choice(
                &id,
                "hit_points|level_up|fighter|2|hp_2",
                &Selection::options(["average"]),
            )
            .unwrap();
        service.save_character(&id, &path).await.unwrap();

        let mut fresh = new_service();
        let loaded = fresh.load_character(&path).await.unwrap();
        assert_eq!(loaded, id);
        assert_eq!(fresh.character(&id).unwrap(), service.character(&id).unwrap());

        let missing = fresh
            .save_character(&CharacterId::new(), temp_dir.path().join("x.json"))
            .await
            .unwrap_err();
        assert!(matches!(
            missing,
            ServiceError::Choice(ChoiceError::CharacterNotFound(_))
        ));
    }
}

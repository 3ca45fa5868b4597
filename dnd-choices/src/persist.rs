//! Character save files.
//!
//! A save is a versioned JSON envelope around the character plus a small
//! metadata block, so a directory of saves can be listed without parsing
//! every character. Pending choices are never written; they are derived
//! again from the character on load.

use crate::character::{Character, CharacterId};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Version written into every save; older or newer saves are refused.
pub const SAVE_FORMAT_VERSION: u32 = 1;

fn check_version(found: u32) -> Result<(), PersistError> {
    if found == SAVE_FORMAT_VERSION {
        Ok(())
    } else {
        Err(PersistError::VersionMismatch {
            expected: SAVE_FORMAT_VERSION,
            found,
        })
    }
}

/// Summary of a character, stored beside it in the save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterMetadata {
    pub id: CharacterId,
    pub name: String,

    /// Race or subrace slug.
    pub race: String,

    /// Classes with their levels, such as "cleric 1 / sorcerer 1".
    pub classes: String,

    /// Total character level.
    pub level: u8,

    pub has_backstory: bool,
}

impl CharacterMetadata {
    pub fn of(character: &Character) -> Self {
        let classes = character
            .classes
            .iter()
            .map(|c| format!("{} {}", c.class_slug, c.level))
            .collect::<Vec<_>>()
            .join(" / ");
        Self {
            id: character.id,
            name: character.name.clone(),
            race: character.race_slug.clone(),
            classes,
            level: character.level(),
            has_backstory: character.backstory.is_some(),
        }
    }
}

/// A character as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCharacter {
    pub version: u32,

    /// Seconds since the epoch.
    pub saved_at: String,

    pub metadata: CharacterMetadata,
    pub character: Character,
}

/// The leading fields of a save, read without the character itself.
#[derive(Deserialize)]
struct SaveHeader {
    version: u32,
    metadata: CharacterMetadata,
}

impl SavedCharacter {
    pub fn new(character: Character) -> Self {
        Self {
            version: SAVE_FORMAT_VERSION,
            saved_at: timestamp_now(),
            metadata: CharacterMetadata::of(&character),
            character,
        }
    }

    /// Write the save, creating missing parent directories.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?).await?;
        Ok(())
    }

    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let saved: Self = serde_json::from_str(&fs::read_to_string(path).await?)?;
        check_version(saved.version)?;
        Ok(saved)
    }

    /// Read only the metadata block of a save.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<CharacterMetadata, PersistError> {
        let header: SaveHeader = serde_json::from_str(&fs::read_to_string(path).await?)?;
        check_version(header.version)?;
        Ok(header.metadata)
    }
}

/// One readable save found in a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveListing {
    pub path: PathBuf,
    pub metadata: CharacterMetadata,
}

/// Saves in `dir`, sorted by character name. A missing directory has none;
/// files that are not current saves are skipped.
pub async fn list_character_saves(dir: impl AsRef<Path>) -> Result<Vec<SaveListing>, PersistError> {
    let mut entries = match fs::read_dir(dir.as_ref()).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut saves = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.extension().is_some_and(|e| e == "json") {
            continue;
        }
        if let Ok(metadata) = SavedCharacter::peek_metadata(&path).await {
            saves.push(SaveListing { path, metadata });
        }
    }

    saves.sort_by(|a, b| a.metadata.name.cmp(&b.metadata.name));
    Ok(saves)
}

/// `<dir>/<name>.json` with the name lowercased and reduced to `a-z0-9-`.
pub fn character_save_path(dir: impl AsRef<Path>, name: &str) -> PathBuf {
    let mut stem = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
        } else if !stem.is_empty() && !stem.ends_with('-') {
            stem.push('-');
        }
    }
    let stem = stem.trim_end_matches('-');
    let stem = if stem.is_empty() { "character" } else { stem };
    dir.as_ref().join(format!("{stem}.json"))
}

fn timestamp_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::Selection;
    use crate::testing::{sample_fighter, sample_multiclass_caster, TestHarness};
    use tempfile::TempDir;

    #[test]
    fn test_metadata_lists_every_class() {
        let mut character = sample_multiclass_caster();
        character.backstory = Some("Raised in a mountain temple.".to_string());

        let metadata = CharacterMetadata::of(&character);
        assert_eq!(metadata.race, "hill-dwarf");
        assert_eq!(metadata.classes, "cleric 1 / sorcerer 1");
        assert_eq!(metadata.level, 2);
        assert!(metadata.has_backstory);
        assert_eq!(SavedCharacter::new(character).metadata, metadata);
    }

    #[test]
    fn test_save_path_slug() {
        let path = character_save_path("saves", "Bob's  Character!@#");
        assert_eq!(path, Path::new("saves").join("bob-s-character.json"));
        assert_eq!(
            character_save_path("saves", "!!!"),
            Path::new("saves").join("character.json")
        );
    }

    #[tokio::test]
    async fn test_save_and_load_keeps_resolutions() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let save_path = temp_dir.path().join("nested").join("roland.json");

        let mut harness = TestHarness::new(sample_fighter(1));
        harness
            .resolve(
                "proficiency|class|fighter|1|skills",
                Selection::options(["perception", "survival"]),
            )
            .unwrap();

        SavedCharacter::new(harness.character.clone())
            .save_json(&save_path)
            .await
            .expect("Save should create the directory");
        let loaded = SavedCharacter::load_json(&save_path)
            .await
            .expect("Load should succeed");

        assert_eq!(loaded.character, harness.character);
        let reloaded = TestHarness::new(loaded.character);
        assert_eq!(reloaded.choice("proficiency|class|fighter|1|skills").remaining, 0);
    }

    #[tokio::test]
    async fn test_version_mismatch_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let save_path = temp_dir.path().join("old.json");

        let mut saved = SavedCharacter::new(sample_fighter(1));
        saved.version = 0;
        saved.save_json(&save_path).await.unwrap();

        for err in [
            SavedCharacter::load_json(&save_path).await.unwrap_err(),
            SavedCharacter::peek_metadata(&save_path).await.unwrap_err(),
        ] {
            assert!(matches!(
                err,
                PersistError::VersionMismatch { expected: 1, found: 0 }
            ));
        }
    }

    #[tokio::test]
    async fn test_list_skips_foreign_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path().join("characters");
        assert!(list_character_saves(&dir).await.unwrap().is_empty());

        for name in ["Charlie", "Alpha", "Beta"] {
            let mut character = sample_fighter(1);
            character.name = name.to_string();
            SavedCharacter::new(character)
                .save_json(character_save_path(&dir, name))
                .await
                .unwrap();
        }
        fs::write(dir.join("notes.json"), "{\"not\": \"a save\"}").await.unwrap();
        fs::write(dir.join("readme.txt"), "hello").await.unwrap();

        let saves = list_character_saves(&dir).await.unwrap();
        let names: Vec<_> = saves.iter().map(|s| s.metadata.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Charlie"]);
        assert_eq!(saves[0].path, dir.join("alpha.json"));
    }
}

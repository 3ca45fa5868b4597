//! Character creation and level-up driven through `ChoiceService`, ending
//! with a save and reload.

use dnd_choices::character_builder::level_up;
use dnd_choices::testing::{sample_fighter, sample_half_elf_bard};
use dnd_choices::{
    Catalog, CharacterId, ChoiceEngine, ChoiceService, ChoiceType, EngineConfig, PendingChoice,
    Selection,
};
use tempfile::TempDir;

fn new_service() -> ChoiceService {
    ChoiceService::new(ChoiceEngine::with_config(
        Catalog::srd(),
        EngineConfig::new().with_rng_seed(17),
    ))
}

/// The first `quantity` offered values.
fn first_options(choice: &PendingChoice) -> Selection {
    let options = choice.options.clone().unwrap_or_default();
    Selection::options(options.into_iter().take(choice.quantity).map(|o| o.value))
}

/// Resolve open required choices until the character is complete.
fn complete(service: &mut ChoiceService, id: &CharacterId) -> Vec<String> {
    let mut resolved = Vec::new();
    for _ in 0..50 {
        let pending = service.get_pending_choices(id).unwrap();
        let Some(choice) = pending.open().find(|c| c.required).cloned() else {
            return resolved;
        };
        let selection = match choice.choice_type {
            ChoiceType::HitPoints => Selection::options(["average"]),
            ChoiceType::AsiOrFeat => Selection::feat("alert"),
            _ => first_options(&choice),
        };
        let choice_id = choice.id.encode();
        service
            .resolve_choice(id, &choice_id, &selection)
            .unwrap_or_else(|e| panic!("{choice_id}: {e}"));
        resolved.push(choice_id);
    }
    panic!("character never completed; resolved {resolved:?}");
}

#[test]
fn test_bard_creation_completes() {
    let mut service = new_service();
    let id = service.insert(sample_half_elf_bard());
    assert!(!service.get_pending_choices(&id).unwrap().summary.complete);

    let resolved = complete(&mut service, &id);

    for expected in [
        "ability_score|race|half-elf|1|half-elf-abilities",
        "proficiency|class|bard|1|skills",
        "spell|class|bard|1|cantrips",
    ] {
        assert!(resolved.iter().any(|r| r == expected), "{expected} not resolved");
    }
    let summary = service.get_pending_choices(&id).unwrap().summary;
    assert!(summary.complete);
    assert_eq!(summary.required_remaining, 0);

    // Two cantrips and four first-level spells.
    let character = service.character(&id).unwrap();
    assert_eq!(character.spells.len(), 6);
}

#[test]
fn test_level_up_opens_new_choices() {
    let mut service = new_service();
    let id = service.insert(sample_fighter(3));
    complete(&mut service, &id);

    let mut character = service.character(&id).unwrap().clone();
    level_up(service.engine().catalog(), &mut character, "fighter").unwrap();
    service.insert(character);

    let pending = service.get_pending_choices(&id).unwrap();
    let open: Vec<String> = pending.open().map(|c| c.id.encode()).collect();
    assert!(open.contains(&"hit_points|level_up|fighter|4|hp_4".to_string()));
    assert!(open.contains(&"asi_or_feat|level_up|fighter|4|asi_4".to_string()));

    complete(&mut service, &id);
    let character = service.character(&id).unwrap();
    assert!(character.has_feat("alert"));
}

#[tokio::test]
async fn test_completed_character_survives_reload() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("lyra.json");

    let mut service = new_service();
    let id = service.insert(sample_half_elf_bard());
    complete(&mut service, &id);
    service.save_character(&id, &path).await.unwrap();

    let mut reloaded = new_service();
    let loaded = reloaded.load_character(&path).await.unwrap();
    assert_eq!(loaded, id);
    assert_eq!(
        reloaded.get_pending_choices(&id).unwrap(),
        service.get_pending_choices(&id).unwrap()
    );
}

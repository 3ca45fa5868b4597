//! End-to-end properties of choice resolution over the SRD catalog.
//!
//! These tests drive everything through `ChoiceEngine`, the same way the
//! service and the CLI do.

use dnd_choices::catalog::Catalog;
use dnd_choices::character::{Ability, AbilityScores, Character, ClassPivot, ProficiencyKind};
use dnd_choices::testing::{
    sample_fighter, sample_half_elf_bard, sample_multiclass_caster, sample_variant_human_wizard,
    TestHarness,
};
use dnd_choices::{
    ChoiceEngine, ChoiceError, ChoiceId, ChoiceSource, ChoiceType, EngineConfig, Selection,
};
use std::sync::Arc;

// =============================================================================
// IDENTITY
// =============================================================================

#[test]
fn test_identity_roundtrip_with_empty_group() {
    let id = ChoiceId::new(ChoiceType::Language, ChoiceSource::Race, "human", 1, "");
    let encoded = id.encode();
    assert_eq!(encoded, "language|race|human|1|");
    assert_eq!(ChoiceId::decode(&encoded), Ok(id));
}

#[test]
fn test_malformed_identities_rejected() {
    for bad in ["", "a|b|c", "feat|race|human|1|group|extra"] {
        assert!(
            matches!(ChoiceId::decode(bad), Err(ChoiceError::MalformedIdentity { .. })),
            "{bad:?} should be malformed"
        );
    }
}

// =============================================================================
// REPLACEMENT AND VISIBILITY
// =============================================================================

#[test]
fn test_second_resolve_replaces_first() {
    let id = "proficiency|class|fighter|1|skills";
    let mut harness = TestHarness::new(sample_fighter(1));

    harness
        .resolve(id, Selection::options(["perception", "survival"]))
        .unwrap();
    harness
        .resolve(id, Selection::options(["history", "insight"]))
        .unwrap();

    let parsed = ChoiceId::decode(id).unwrap();
    let written: Vec<&str> = harness
        .character
        .proficiencies
        .iter()
        .filter(|p| p.provenance.is_choice(&parsed))
        .map(|p| p.slug.as_str())
        .collect();
    assert_eq!(written, vec!["history", "insight"]);
    assert!(!harness
        .character
        .has_proficiency(ProficiencyKind::Skill, "perception"));
}

#[test]
fn test_completed_choices_remain_visible() {
    let id = "proficiency|class|fighter|1|skills";
    let mut harness = TestHarness::new(sample_fighter(1));
    let before = harness.engine.collect_all(&harness.character);

    harness
        .resolve(id, Selection::options(["perception", "survival"]))
        .unwrap();
    let after = harness.engine.collect_all(&harness.character);

    assert_eq!(after.choices.len(), before.choices.len());
    let choice = after
        .choices
        .iter()
        .find(|c| c.id.encode() == id)
        .expect("resolved choice still listed");
    assert_eq!(choice.remaining, 0);
    assert_eq!(choice.selected.len(), 2);
    assert!(after.open().all(|c| c.id.encode() != id));
}

#[test]
fn test_quantity_enforced_with_count() {
    let mut harness = TestHarness::new(sample_half_elf_bard());
    let id = "spell|class|bard|1|cantrips";
    assert_eq!(harness.choice(id).quantity, 2);

    let err = harness
        .resolve(
            id,
            Selection::options(["light", "message", "vicious-mockery", "mage-hand"]),
        )
        .unwrap_err();
    match err {
        ChoiceError::SelectionInvalid(message) => assert!(message.contains('4'), "{message}"),
        other => panic!("expected SelectionInvalid, got {other:?}"),
    }
    assert!(harness.character.spells.is_empty());
}

#[test]
fn test_summary_remaining_counts_picks() {
    let mut harness = TestHarness::new(sample_half_elf_bard());
    let check = |harness: &TestHarness| {
        let pending = harness.engine.collect_all(&harness.character);
        let picks: usize = pending.choices.iter().map(|c| c.remaining).sum();
        assert_eq!(pending.summary.remaining, picks);
        pending.summary.remaining
    };

    let before = check(&harness);
    harness
        .resolve(
            "spell|class|bard|1|cantrips",
            Selection::options(["light", "vicious-mockery"]),
        )
        .unwrap();
    assert_eq!(check(&harness), before - 2);
}

// =============================================================================
// SPELL SLOTS
// =============================================================================

#[test]
fn test_new_cantrip_slot_filled_after_level_up() {
    let cantrips = "spell|class|wizard|1|cantrips";
    let mut harness = TestHarness::new(sample_variant_human_wizard());
    harness
        .resolve(cantrips, Selection::options(["fire-bolt", "light", "mage-hand"]))
        .unwrap();
    for _ in 0..3 {
        harness.level_up("wizard").unwrap();
    }
    assert_eq!(harness.choice(cantrips).remaining, 1);

    harness
        .resolve(cantrips, Selection::options(["ray-of-frost"]))
        .unwrap();

    let choice = harness.choice(cantrips);
    assert_eq!(choice.remaining, 0);
    for slug in ["fire-bolt", "light", "mage-hand", "ray-of-frost"] {
        assert!(harness.character.knows_spell(slug), "{slug} missing");
    }
    let pending = harness.engine.collect_all(&harness.character);
    assert!(pending.open().all(|c| c.id.encode() != cantrips));
}

// =============================================================================
// ABILITY CAP
// =============================================================================

#[test]
fn test_replacing_half_feat_with_asi_at_cap() {
    let asi = "asi_or_feat|level_up|fighter|4|asi_4";
    let mut character = sample_fighter(4);
    character.base_scores.charisma = 17;
    let mut harness = TestHarness::new(character);

    harness.resolve(asi, Selection::feat("actor")).unwrap();
    assert_eq!(harness.character.ability_score(Ability::Charisma), 19);

    harness
        .resolve(asi, Selection::asi([(Ability::Charisma, 2)]))
        .unwrap();
    assert_eq!(harness.character.ability_score(Ability::Charisma), 20);

    // And back again: the +2 no longer counts against the feat's +1.
    harness.resolve(asi, Selection::feat("actor")).unwrap();
    assert_eq!(harness.character.ability_score(Ability::Charisma), 19);
    assert!(harness.character.has_feat("actor"));
}

// =============================================================================
// SOURCES
// =============================================================================

#[test]
fn test_subrace_and_parent_choices_are_independent() {
    let catalog = Catalog::from_json(
        r#"{
            "races": [
                {
                    "slug": "sea-folk", "name": "Sea Folk", "speed": 30, "sizes": ["medium"],
                    "modifiers": [
                        { "id": "sea-folk-ability", "kind": "ability_score", "count": 1, "bonus": 1 }
                    ]
                },
                {
                    "slug": "reef-folk", "name": "Reef Folk", "parent": "sea-folk",
                    "speed": 30, "sizes": ["medium"],
                    "modifiers": [
                        { "id": "reef-folk-ability", "kind": "ability_score", "count": 1, "bonus": 2 }
                    ]
                }
            ]
        }"#,
    )
    .expect("catalog should load");
    let mut engine = ChoiceEngine::new(Arc::new(catalog));
    let mut character = Character::new("Maren", "reef-folk");

    let choices = engine.choices_of(ChoiceType::AbilityScore, &character);
    let ids: Vec<String> = choices.iter().map(|c| c.id.encode()).collect();
    assert_eq!(
        ids,
        vec![
            "ability_score|race|reef-folk|1|reef-folk-ability",
            "ability_score|race|sea-folk|1|sea-folk-ability",
        ]
    );

    engine
        .resolve(
            &mut character,
            "ability_score|race|sea-folk|1|sea-folk-ability",
            &Selection::options(["wis"]),
        )
        .unwrap();
    engine
        .resolve(
            &mut character,
            "ability_score|race|reef-folk|1|reef-folk-ability",
            &Selection::options(["con"]),
        )
        .unwrap();

    assert_eq!(character.ability_bonuses.len(), 2);
    assert!(engine
        .collect_all(&character)
        .choices
        .iter()
        .all(|c| c.is_complete()));

    engine
        .undo(&mut character, "ability_score|race|reef-folk|1|reef-folk-ability")
        .unwrap();

    let bonuses: Vec<(Ability, i8)> = character
        .ability_bonuses
        .iter()
        .map(|b| (b.ability, b.bonus))
        .collect();
    assert_eq!(bonuses, vec![(Ability::Wisdom, 1)]);
    let remaining: Vec<(String, usize)> = engine
        .choices_of(ChoiceType::AbilityScore, &character)
        .iter()
        .map(|c| (c.id.encode(), c.remaining))
        .collect();
    assert_eq!(
        remaining,
        vec![
            ("ability_score|race|reef-folk|1|reef-folk-ability".to_string(), 1),
            ("ability_score|race|sea-folk|1|sea-folk-ability".to_string(), 0),
        ]
    );
}

#[test]
fn test_undo_subclass_in_one_class_keeps_the_other() {
    let mut harness = TestHarness::new(sample_multiclass_caster());
    let cleric = "subclass|class|cleric|1|subclass";
    let sorcerer = "subclass|class|sorcerer|1|subclass";

    harness.resolve(cleric, Selection::subclass("life")).unwrap();
    harness.resolve(sorcerer, Selection::subclass("draconic")).unwrap();
    let draconic_features: Vec<String> = harness
        .character
        .features
        .iter()
        .filter(|f| f.origin_slug == "draconic")
        .map(|f| f.name.clone())
        .collect();
    assert!(!draconic_features.is_empty());

    harness.undo(cleric).unwrap();

    let character = &harness.character;
    assert_eq!(character.pivot("cleric").unwrap().subclass_slug, None);
    assert!(character.features.iter().all(|f| f.origin_slug != "life"));
    let remaining: Vec<String> = character
        .features
        .iter()
        .filter(|f| f.origin_slug == "draconic")
        .map(|f| f.name.clone())
        .collect();
    assert_eq!(remaining, draconic_features);
}

// =============================================================================
// HIT POINTS
// =============================================================================

#[test]
fn test_hit_point_floor_for_roll_and_average() {
    let mut character = Character::new("Frail", "human");
    character.base_scores = AbilityScores::new(10, 10, 3, 10, 10, 10);
    character.classes.push(ClassPivot {
        class_slug: "sorcerer".to_string(),
        level: 3,
        is_primary: true,
        subclass_slug: None,
        subclass_choices: Default::default(),
    });
    let mut harness = TestHarness::new(character);

    harness
        .resolve("hit_points|level_up|sorcerer|2|hp_2", Selection::options(["roll"]))
        .unwrap();
    harness
        .resolve("hit_points|level_up|sorcerer|3|hp_3", Selection::options(["average"]))
        .unwrap();

    let amounts: Vec<i32> = harness
        .character
        .hit_point_gains
        .iter()
        .map(|g| g.amount)
        .collect();
    assert_eq!(amounts.len(), 2);
    assert!(amounts.iter().all(|a| *a >= 1));
    assert_eq!(amounts[1], 1);
}

#[test]
fn test_seeded_rolls_repeat() {
    let roll = |seed: u64| {
        let mut harness = TestHarness::with_config(
            sample_fighter(4),
            EngineConfig::new().with_rng_seed(seed),
        );
        for level in 2..=4 {
            harness
                .resolve(
                    &format!("hit_points|level_up|fighter|{level}|hp_{level}"),
                    Selection::options(["roll"]),
                )
                .unwrap();
        }
        harness.character.max_hit_points()
    };
    assert_eq!(roll(9), roll(9));
}

// =============================================================================
// SUBCLASS VARIANTS
// =============================================================================

#[test]
fn test_variant_groups_merge() {
    let mut character = Character::new("Ulfgar", "human");
    character.classes.push(ClassPivot {
        class_slug: "barbarian".to_string(),
        level: 6,
        is_primary: true,
        subclass_slug: Some("totem-warrior".to_string()),
        subclass_choices: Default::default(),
    });
    let mut harness = TestHarness::new(character);

    harness
        .resolve(
            "subclass_variant|subclass|totem-warrior|3|totem_spirit",
            Selection::options(["bear"]),
        )
        .unwrap();
    harness
        .resolve(
            "subclass_variant|subclass|totem-warrior|6|totem_aspect",
            Selection::options(["eagle"]),
        )
        .unwrap();

    let choices = &harness.character.pivot("barbarian").unwrap().subclass_choices;
    assert_eq!(choices.get("totem_spirit").map(String::as_str), Some("bear"));
    assert_eq!(choices.get("totem_aspect").map(String::as_str), Some("eagle"));
}

// =============================================================================
// UNDO WINDOWS
// =============================================================================

#[test]
fn test_undo_closes_after_levelling() {
    let armor = "equipment|class|fighter|1|fighter-armor";
    let mut harness = TestHarness::new(sample_fighter(1));
    let option = harness.choice(armor).options.unwrap()[0].value.clone();
    harness.resolve(armor, Selection::options([option])).unwrap();
    assert!(harness.can_undo(armor));

    harness.level_up("fighter").unwrap();
    assert!(!harness.can_undo(armor));
    assert!(matches!(harness.undo(armor), Err(ChoiceError::NotUndoable(_))));
}

#[test]
fn test_rejected_selection_changes_nothing() {
    let mut harness = TestHarness::new(sample_fighter(1));
    let before = harness.character.clone();

    let err = harness
        .resolve(
            "proficiency|class|fighter|1|skills",
            Selection::options(["athletics", "arcana"]),
        )
        .unwrap_err();
    assert!(matches!(err, ChoiceError::SelectionInvalid(_)));
    assert_eq!(harness.character, before);
}

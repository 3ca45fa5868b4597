//! Character builder for new characters and level advancement.
//!
//! The builder writes the grants that involve no decision: race and subrace
//! ability bonuses, fixed languages and skills, background proficiencies,
//! class saving throws, first-level hit points and class features. Every
//! decision is left for the choice handlers.

use crate::catalog::{Catalog, Class};
use crate::character::{
    Ability, AbilityScoreBonus, AbilityScores, Character, ClassPivot, GrantedFeature,
    HitPointGain, HitPointMethod, KnownLanguage, Proficiency, ProficiencyKind, Provenance,
    MAX_LEVEL,
};
use crate::choice::ChoiceSource;
use crate::handlers::subclass::subclass_features;
use thiserror::Error;
use tracing::debug;

/// How the builder's ability scores were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbilityMethod {
    /// 15, 14, 13, 12, 10, 8 assigned to the six abilities
    #[default]
    StandardArray,
    /// 27 points spent on scores between 8 and 15
    PointBuy,
}

/// Standard array values.
pub const STANDARD_ARRAY: [u8; 6] = [15, 14, 13, 12, 10, 8];

/// Point buy costs for each score value.
pub fn point_buy_cost(score: u8) -> Option<u8> {
    match score {
        8 => Some(0),
        9 => Some(1),
        10 => Some(2),
        11 => Some(3),
        12 => Some(4),
        13 => Some(5),
        14 => Some(7),
        15 => Some(9),
        _ => None,
    }
}

/// Total points available for point buy.
pub const POINT_BUY_TOTAL: u8 = 27;

/// Error from character building and advancement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("Character name is required")]
    MissingName,

    #[error("Race selection is required")]
    MissingRace,

    #[error("Class selection is required")]
    MissingClass,

    #[error("Background selection is required")]
    MissingBackground,

    #[error("Ability scores are required")]
    MissingAbilityScores,

    #[error("Unknown race '{0}'")]
    UnknownRace(String),

    #[error("Unknown background '{0}'")]
    UnknownBackground(String),

    #[error("Unknown class '{0}'")]
    UnknownClass(String),

    #[error("Standard array must use 15, 14, 13, 12, 10 and 8 exactly once")]
    InvalidStandardArray,

    #[error("Invalid point buy: {0}")]
    InvalidPointBuy(String),

    #[error("Character already has levels in {0}")]
    AlreadyHasClass(String),

    #[error("Character has no levels in {0}")]
    NotInClass(String),

    #[error("Character is already at the maximum level")]
    MaxLevel,
}

/// Builder for creating characters against a catalog.
#[derive(Debug, Clone, Default)]
pub struct CharacterBuilder {
    name: Option<String>,
    race: Option<String>,
    class: Option<String>,
    background: Option<String>,
    ability_scores: Option<AbilityScores>,
    ability_method: AbilityMethod,
    /// Optional character backstory
    backstory: Option<String>,
}

impl CharacterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Race or subrace slug.
    pub fn race(mut self, race: impl Into<String>) -> Self {
        self.race = Some(race.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    /// Assign the standard array: each pair is (value, ability).
    pub fn standard_array(mut self, assignment: [(u8, Ability); 6]) -> Self {
        let mut scores = AbilityScores::default();
        for (value, ability) in assignment {
            scores.set(ability, value);
        }
        self.ability_scores = Some(scores);
        self.ability_method = AbilityMethod::StandardArray;
        self
    }

    pub fn point_buy(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self.ability_method = AbilityMethod::PointBuy;
        self
    }

    pub fn backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = Some(backstory.into());
        self
    }

    /// Build a first-level character.
    pub fn build(self, catalog: &Catalog) -> Result<Character, BuilderError> {
        let name = self.name.ok_or(BuilderError::MissingName)?;
        let race_slug = self.race.ok_or(BuilderError::MissingRace)?;
        let class_slug = self.class.ok_or(BuilderError::MissingClass)?;
        let background_slug = self.background.ok_or(BuilderError::MissingBackground)?;
        let scores = self
            .ability_scores
            .ok_or(BuilderError::MissingAbilityScores)?;

        match self.ability_method {
            AbilityMethod::StandardArray => validate_standard_array(&scores)?,
            AbilityMethod::PointBuy => validate_point_buy(&scores)?,
        }

        let chain = catalog.race_chain(&race_slug);
        if chain.is_empty() {
            return Err(BuilderError::UnknownRace(race_slug));
        }
        let background = catalog
            .background(&background_slug)
            .ok_or_else(|| BuilderError::UnknownBackground(background_slug.clone()))?;
        let class = catalog
            .class(&class_slug)
            .ok_or_else(|| BuilderError::UnknownClass(class_slug.clone()))?;

        let mut character = Character::new(name, &race_slug);
        character.base_scores = scores;
        character.background_slug = Some(background.slug.clone());
        character.backstory = self.backstory;

        // Nearest race that lists sizes decides; a size choice leaves it open.
        if let Some(race) = chain.iter().find(|r| !r.sizes.is_empty()) {
            if !race.size_choice && race.sizes.len() == 1 {
                character.size = race.sizes.first().copied();
            }
        }

        for race in &chain {
            let provenance = Provenance::fixed(ChoiceSource::Race, &race.slug);
            character
                .ability_bonuses
                .extend(race.ability_bonuses.iter().map(|b| AbilityScoreBonus {
                    ability: b.ability,
                    bonus: b.bonus,
                    modifier_id: None,
                    provenance: provenance.clone(),
                }));
            for language in &race.languages {
                add_language(&mut character, language, &provenance);
            }
            for skill in &race.skills {
                add_proficiency(&mut character, ProficiencyKind::Skill, skill, &provenance);
            }
        }

        let provenance = Provenance::fixed(ChoiceSource::Background, &background.slug);
        for skill in &background.skills {
            add_proficiency(&mut character, ProficiencyKind::Skill, skill, &provenance);
        }
        for tool in &background.tools {
            add_proficiency(&mut character, ProficiencyKind::Tool, tool, &provenance);
        }
        for language in &background.languages {
            add_language(&mut character, language, &provenance);
        }

        join_class(&mut character, class);
        debug!(character = %character.id, race = %race_slug, class = %class.slug, "built character");
        Ok(character)
    }
}

fn add_language(character: &mut Character, slug: &str, provenance: &Provenance) {
    if !character.knows_language(slug) {
        character.languages.push(KnownLanguage {
            language_slug: slug.to_string(),
            provenance: provenance.clone(),
        });
    }
}

fn add_proficiency(
    character: &mut Character,
    kind: ProficiencyKind,
    slug: &str,
    provenance: &Provenance,
) {
    if !character.has_proficiency(kind, slug) {
        character.proficiencies.push(Proficiency {
            kind,
            slug: slug.to_string(),
            expertise: None,
            provenance: provenance.clone(),
        });
    }
}

fn class_features(class: &Class, level: u8) -> Vec<GrantedFeature> {
    let provenance = Provenance::fixed(ChoiceSource::Class, &class.slug);
    class
        .features
        .iter()
        .filter(|f| f.level == level)
        .map(|f| GrantedFeature {
            name: f.name.clone(),
            description: f.description.clone(),
            class_slug: class.slug.clone(),
            origin_slug: class.slug.clone(),
            level,
            provenance: provenance.clone(),
        })
        .collect()
}

/// First level in a class. The first class a character takes also grants
/// its saving throws and maximum hit points.
fn join_class(character: &mut Character, class: &Class) {
    let primary = character.classes.is_empty();
    character.classes.push(ClassPivot {
        class_slug: class.slug.clone(),
        level: 1,
        is_primary: primary,
        subclass_slug: None,
        subclass_choices: Default::default(),
    });

    let provenance = Provenance::fixed(ChoiceSource::Class, &class.slug);
    if primary {
        for ability in &class.saving_throws {
            add_proficiency(character, ProficiencyKind::SavingThrow, ability.code(), &provenance);
        }
        let con = character.modifier(Ability::Constitution) as i32;
        character.hit_point_gains.push(HitPointGain {
            class_slug: class.slug.clone(),
            class_level: 1,
            method: HitPointMethod::Maximum,
            amount: (class.hit_die.sides() as i32 + con).max(1),
            provenance,
        });
    }
    character.features.extend(class_features(class, 1));
}

/// Take a first level in another class.
pub fn add_class(
    catalog: &Catalog,
    character: &mut Character,
    class_slug: &str,
) -> Result<(), BuilderError> {
    if character.level() >= MAX_LEVEL {
        return Err(BuilderError::MaxLevel);
    }
    if character.pivot(class_slug).is_some() {
        return Err(BuilderError::AlreadyHasClass(class_slug.to_string()));
    }
    let class = catalog
        .class(class_slug)
        .ok_or_else(|| BuilderError::UnknownClass(class_slug.to_string()))?;
    join_class(character, class);
    debug!(character = %character.id, class = class_slug, "added class");
    Ok(())
}

/// Advance one level in `class_slug`, granting the features of the new class
/// level. Returns the new class level.
pub fn level_up(
    catalog: &Catalog,
    character: &mut Character,
    class_slug: &str,
) -> Result<u8, BuilderError> {
    if character.level() >= MAX_LEVEL {
        return Err(BuilderError::MaxLevel);
    }
    let class = catalog
        .class(class_slug)
        .ok_or_else(|| BuilderError::UnknownClass(class_slug.to_string()))?;
    let pivot = character
        .pivot_mut(class_slug)
        .ok_or_else(|| BuilderError::NotInClass(class_slug.to_string()))?;
    pivot.level += 1;
    let level = pivot.level;
    let subclass = pivot.subclass_slug.clone();

    character.features.extend(class_features(class, level));
    if let Some(subclass) = subclass {
        let provenance = Provenance::fixed(ChoiceSource::Subclass, &subclass);
        character
            .features
            .extend(subclass_features(catalog, &subclass, level, level, &provenance));
    }
    debug!(character = %character.id, class = class_slug, level, "levelled up");
    Ok(level)
}

fn validate_standard_array(scores: &AbilityScores) -> Result<(), BuilderError> {
    let mut values: Vec<u8> = Ability::all().iter().map(|a| scores.get(*a)).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));
    if values != STANDARD_ARRAY {
        return Err(BuilderError::InvalidStandardArray);
    }
    Ok(())
}

/// Validate point buy scores.
pub fn validate_point_buy(scores: &AbilityScores) -> Result<(), BuilderError> {
    let mut total_cost = 0u8;

    for ability in Ability::all() {
        let score = scores.get(ability);
        let cost = point_buy_cost(score).ok_or_else(|| {
            BuilderError::InvalidPointBuy(format!(
                "{} score {} is out of range (8-15)",
                ability.abbreviation(),
                score
            ))
        })?;
        total_cost += cost;
    }

    if total_cost > POINT_BUY_TOTAL {
        return Err(BuilderError::InvalidPointBuy(format!(
            "Total point cost {total_cost} exceeds maximum {POINT_BUY_TOTAL}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Size;

    const FIGHTER_ARRAY: [(u8, Ability); 6] = [
        (15, Ability::Strength),
        (14, Ability::Constitution),
        (13, Ability::Dexterity),
        (12, Ability::Wisdom),
        (10, Ability::Intelligence),
        (8, Ability::Charisma),
    ];

    fn dwarf_fighter() -> Character {
        CharacterBuilder::new()
            .name("Thorin")
            .race("hill-dwarf")
            .class("fighter")
            .background("soldier")
            .standard_array(FIGHTER_ARRAY)
            .build(&Catalog::srd())
            .expect("Should build successfully")
    }

    #[test]
    fn test_build_fighter() {
        let character = dwarf_fighter();

        assert_eq!(character.name, "Thorin");
        assert_eq!(character.level(), 1);
        // CON 14 + 2 (dwarf); WIS 12 + 1 (hill dwarf)
        assert_eq!(character.ability_score(Ability::Constitution), 16);
        assert_eq!(character.ability_score(Ability::Wisdom), 13);
        // HP = 10 (fighter) + 3 (CON mod)
        assert_eq!(character.max_hit_points(), 13);
        assert_eq!(character.size, Some(Size::Medium));
        assert!(character.knows_language("dwarvish"));
        assert!(character.has_proficiency(ProficiencyKind::Skill, "athletics"));
        assert!(character.has_proficiency(ProficiencyKind::SavingThrow, "str"));
        assert!(character.features.iter().any(|f| f.name == "Second Wind"));
    }

    #[test]
    fn test_size_choice_left_open() {
        let character = CharacterBuilder::new()
            .name("Nix")
            .race("custom-lineage")
            .class("rogue")
            .background("criminal")
            .standard_array(FIGHTER_ARRAY)
            .build(&Catalog::srd())
            .unwrap();
        assert_eq!(character.size, None);
    }

    #[test]
    fn test_missing_and_unknown() {
        let result = CharacterBuilder::new()
            .race("human")
            .class("fighter")
            .background("soldier")
            .standard_array(FIGHTER_ARRAY)
            .build(&Catalog::srd());
        assert_eq!(result, Err(BuilderError::MissingName));

        let result = CharacterBuilder::new()
            .name("Test")
            .race("centaur")
            .class("fighter")
            .background("soldier")
            .standard_array(FIGHTER_ARRAY)
            .build(&Catalog::srd());
        assert_eq!(result, Err(BuilderError::UnknownRace("centaur".to_string())));
    }

    #[test]
    fn test_standard_array_must_be_exact() {
        let result = CharacterBuilder::new()
            .name("Test")
            .race("human")
            .class("fighter")
            .background("soldier")
            .standard_array([
                (15, Ability::Strength),
                (15, Ability::Constitution),
                (13, Ability::Dexterity),
                (12, Ability::Wisdom),
                (10, Ability::Intelligence),
                (8, Ability::Charisma),
            ])
            .build(&Catalog::srd());
        assert_eq!(result, Err(BuilderError::InvalidStandardArray));
    }

    #[test]
    fn test_point_buy_validation() {
        assert!(validate_point_buy(&AbilityScores::new(15, 14, 13, 12, 10, 8)).is_ok());
        assert!(validate_point_buy(&AbilityScores::new(15, 15, 15, 15, 8, 8)).is_err());
        assert!(validate_point_buy(&AbilityScores::new(16, 14, 13, 12, 10, 8)).is_err());
    }

    #[test]
    fn test_build_with_point_buy() {
        let builder = CharacterBuilder::new()
            .name("Thorin")
            .race("hill-dwarf")
            .class("fighter")
            .background("soldier");

        let character = builder
            .clone()
            .point_buy(AbilityScores::new(15, 13, 15, 8, 10, 8))
            .build(&Catalog::srd())
            .unwrap();
        assert_eq!(character.base_scores.constitution, 15);

        let result = builder
            .point_buy(AbilityScores::new(15, 15, 15, 15, 8, 8))
            .build(&Catalog::srd());
        assert!(matches!(result, Err(BuilderError::InvalidPointBuy(_))));
    }

    #[test]
    fn test_level_up_grants_features() {
        let catalog = Catalog::srd();
        let mut character = dwarf_fighter();
        assert_eq!(level_up(&catalog, &mut character, "fighter"), Ok(2));
        assert!(character.features.iter().any(|f| f.name == "Action Surge"));
        assert_eq!(
            level_up(&catalog, &mut character, "wizard"),
            Err(BuilderError::NotInClass("wizard".to_string()))
        );
    }

    #[test]
    fn test_level_up_grants_subclass_features() {
        let catalog = Catalog::srd();
        let mut character = dwarf_fighter();
        for _ in 0..6 {
            level_up(&catalog, &mut character, "fighter").unwrap();
        }
        if let Some(pivot) = character.pivot_mut("fighter") {
            pivot.subclass_slug = Some("champion".to_string());
        }
        level_up(&catalog, &mut character, "fighter").unwrap();
        assert!(!character.features.iter().any(|f| f.name == "Remarkable Athlete"));

        let mut character = dwarf_fighter();
        for _ in 0..5 {
            level_up(&catalog, &mut character, "fighter").unwrap();
        }
        if let Some(pivot) = character.pivot_mut("fighter") {
            pivot.subclass_slug = Some("champion".to_string());
        }
        level_up(&catalog, &mut character, "fighter").unwrap();
        let feature = character
            .features
            .iter()
            .find(|f| f.name == "Remarkable Athlete")
            .unwrap();
        assert_eq!(feature.provenance, Provenance::fixed(ChoiceSource::Subclass, "champion"));
    }

    #[test]
    fn test_add_class_is_not_primary() {
        let catalog = Catalog::srd();
        let mut character = dwarf_fighter();
        add_class(&catalog, &mut character, "wizard").unwrap();
        let wizard = character.pivot("wizard").unwrap();
        assert!(!wizard.is_primary);
        assert_eq!(character.level(), 2);
        // Multiclassing grants neither saving throws nor first-level maximum HP.
        assert!(!character.has_proficiency(ProficiencyKind::SavingThrow, "int"));
        assert_eq!(character.hit_point_gains.len(), 1);
        assert_eq!(
            add_class(&catalog, &mut character, "wizard"),
            Err(BuilderError::AlreadyHasClass("wizard".to_string()))
        );
    }
}

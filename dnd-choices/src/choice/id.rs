//! Deterministic choice identity.
//!
//! A choice id is the five fields `type|source|source_slug|level|group`
//! joined by [`DELIMITER`]. Clients use it to reference a choice without any
//! lookup table; the engine decodes it to find the owning handler.

use super::{ChoiceSource, ChoiceType};
use crate::error::{ChoiceError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Field separator. Slugs and enum tags never contain it, so no escaping.
pub const DELIMITER: char = '|';

/// Decoded choice identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ChoiceId {
    pub choice_type: ChoiceType,
    pub source: ChoiceSource,
    pub source_slug: String,
    pub level: u8,
    /// Distinguishes simultaneous instances of the same type, source and level.
    pub group: String,
}

impl ChoiceId {
    pub fn new(
        choice_type: ChoiceType,
        source: ChoiceSource,
        source_slug: impl Into<String>,
        level: u8,
        group: impl Into<String>,
    ) -> Self {
        Self {
            choice_type,
            source,
            source_slug: source_slug.into(),
            level,
            group: group.into(),
        }
    }

    pub fn encode(&self) -> String {
        encode(
            self.choice_type,
            self.source,
            &self.source_slug,
            self.level,
            &self.group,
        )
    }

    pub fn decode(id: &str) -> Result<Self> {
        decode(id)
    }
}

/// Join the identity fields.
pub fn encode(
    choice_type: ChoiceType,
    source: ChoiceSource,
    source_slug: &str,
    level: u8,
    group: &str,
) -> String {
    format!("{choice_type}{DELIMITER}{source}{DELIMITER}{source_slug}{DELIMITER}{level}{DELIMITER}{group}")
}

/// Split an id back into its fields.
pub fn decode(id: &str) -> Result<ChoiceId> {
    let parts: Vec<&str> = id.split(DELIMITER).collect();
    if parts.len() != 5 {
        return Err(ChoiceError::malformed(
            id,
            format!("expected 5 segments, found {}", parts.len()),
        ));
    }

    let choice_type = parts[0]
        .parse::<ChoiceType>()
        .map_err(|reason| ChoiceError::malformed(id, reason))?;
    let source = parts[1]
        .parse::<ChoiceSource>()
        .map_err(|reason| ChoiceError::malformed(id, reason))?;
    let level = parts[3]
        .parse::<u8>()
        .map_err(|_| ChoiceError::malformed(id, format!("level '{}' is not a number", parts[3])))?;

    Ok(ChoiceId {
        choice_type,
        source,
        source_slug: parts[2].to_string(),
        level,
        group: parts[4].to_string(),
    })
}

impl fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl FromStr for ChoiceId {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self> {
        decode(s)
    }
}

impl From<ChoiceId> for String {
    fn from(id: ChoiceId) -> Self {
        id.encode()
    }
}

impl TryFrom<String> for ChoiceId {
    type Error = ChoiceError;

    fn try_from(value: String) -> Result<Self> {
        decode(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_joins_fields() {
        let id = encode(ChoiceType::Expertise, ChoiceSource::Class, "rogue", 6, "expertise_6");
        assert_eq!(id, "expertise|class|rogue|6|expertise_6");
    }

    #[test]
    fn test_round_trip() {
        let cases = [
            ChoiceId::new(ChoiceType::AbilityScore, ChoiceSource::Race, "half-elf", 1, "half-elf-flexible"),
            ChoiceId::new(ChoiceType::HitPoints, ChoiceSource::LevelUp, "fighter", 20, "hp_20"),
            ChoiceId::new(ChoiceType::Size, ChoiceSource::Race, "custom-lineage", 0, ""),
        ];
        for original in cases {
            assert_eq!(decode(&original.encode()).unwrap(), original);
        }
    }

    #[test]
    fn test_empty_group_survives() {
        let decoded = decode("feat|background|custom-background|1|").unwrap();
        assert_eq!(decoded.group, "");
        assert_eq!(decoded.encode(), "feat|background|custom-background|1|");
    }

    #[test]
    fn test_wrong_segment_counts_rejected() {
        for bad in ["", "a|b|c", "spell|class|wizard|1|cantrips|extra"] {
            assert!(
                matches!(decode(bad), Err(ChoiceError::MalformedIdentity { .. })),
                "{bad:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_bad_fields_rejected() {
        assert!(matches!(
            decode("spell|class|wizard|first|cantrips"),
            Err(ChoiceError::MalformedIdentity { .. })
        ));
        assert!(matches!(
            decode("spellbook|class|wizard|1|cantrips"),
            Err(ChoiceError::MalformedIdentity { .. })
        ));
        assert!(matches!(
            decode("spell|guild|wizard|1|cantrips"),
            Err(ChoiceError::MalformedIdentity { .. })
        ));
    }

    #[test]
    fn test_serde_uses_string_form() {
        let id = ChoiceId::new(ChoiceType::Language, ChoiceSource::Feat, "linguist", 4, "linguist-languages");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"language|feat|linguist|4|linguist-languages\"");
        let back: ChoiceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

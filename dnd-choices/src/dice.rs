//! Hit dice.
//!
//! Only the die sizes classes use for hit points are modelled here.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("Invalid hit die: {0}")]
    InvalidDie(String),
}

/// Die types a class can use as its hit die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DieType {
    D6,
    D8,
    D10,
    D12,
}

impl DieType {
    pub fn sides(&self) -> u32 {
        match self {
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
        }
    }

    pub fn from_sides(sides: u32) -> Option<DieType> {
        match sides {
            6 => Some(DieType::D6),
            8 => Some(DieType::D8),
            10 => Some(DieType::D10),
            12 => Some(DieType::D12),
            _ => None,
        }
    }

    /// Fixed per-level gain used instead of rolling: half the die plus one.
    pub fn average(&self) -> u32 {
        self.sides() / 2 + 1
    }

    /// Roll once, 1..=sides.
    pub fn roll(&self, rng: &mut dyn RngCore) -> u32 {
        rng.gen_range(1..=self.sides())
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

impl FromStr for DieType {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches(['d', 'D']);
        digits
            .parse::<u32>()
            .ok()
            .and_then(DieType::from_sides)
            .ok_or_else(|| DiceError::InvalidDie(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_average() {
        assert_eq!(DieType::D6.average(), 4);
        assert_eq!(DieType::D8.average(), 5);
        assert_eq!(DieType::D10.average(), 6);
        assert_eq!(DieType::D12.average(), 7);
    }

    #[test]
    fn test_roll_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let value = DieType::D10.roll(&mut rng);
            assert!((1..=10).contains(&value));
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("d12".parse::<DieType>(), Ok(DieType::D12));
        assert_eq!("8".parse::<DieType>(), Ok(DieType::D8));
        assert!("d20".parse::<DieType>().is_err());
        assert_eq!(serde_json::to_string(&DieType::D10).unwrap(), "\"d10\"");
    }
}

//! Catalog of named rule tables.
//!
//! Tables are stored in the standard 32-digit hex notation and decoded at
//! compile time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::rule::{RULE_HEX_LEN, RULE_SIZE, Rule, hex_digit};

/// Decode a hex rule literal. Invalid literals fail compilation.
const fn decode_table(hex: &[u8; RULE_HEX_LEN]) -> [u8; RULE_SIZE] {
    let mut table = [0u8; RULE_SIZE];
    let mut i = 0;
    while i < RULE_SIZE {
        let nibble = match hex_digit(hex[i / 4]) {
            Some(n) => n,
            None => panic!("invalid hex digit in rule literal"),
        };
        table[i] = (nibble >> (3 - (i % 4))) & 1;
        i += 1;
    }
    table
}

const MAJORITY: Rule = Rule::from_table(decode_table(b"000f0fff000f0fff000f0fff000f0fff"));
const BLOCK_EXPANDING: Rule =
    Rule::from_table(decode_table(b"0fffffff0fffffff0fffffff0fffffff"));
// Das, Mitchell & Crutchfield (1994), phi_par.
const PARTICLE_BASED: Rule =
    Rule::from_table(decode_table(b"0504058705000f77037755837bffb77f"));
// Gacs, Kurdyumov & Levin (1978).
const GKL: Rule = Rule::from_table(decode_table(b"005f005f005f005f005fff5f005fff5f"));

/// Predefined rules a caller may run instead of a random one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RulePreset {
    /// Each cell adopts the majority of left, center and right.
    Majority,
    /// Blocks of 1s grow outwards.
    BlockExpanding,
    /// GA-discovered rule that communicates through particles.
    ParticleBased,
    /// Gacs-Kurdyumov-Levin rule.
    Gkl,
}

impl RulePreset {
    pub const ALL: [RulePreset; 4] = [
        RulePreset::Majority,
        RulePreset::BlockExpanding,
        RulePreset::ParticleBased,
        RulePreset::Gkl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RulePreset::Majority => "majority",
            RulePreset::BlockExpanding => "block-expanding",
            RulePreset::ParticleBased => "particle-based",
            RulePreset::Gkl => "gkl",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RulePreset::Majority => {
                "Each cell adopts the state most common among left, center and right"
            }
            RulePreset::BlockExpanding => "Continuous blocks of 1s grow outwards",
            RulePreset::ParticleBased => {
                "Rule discovered by a genetic algorithm that uses particles to communicate"
            }
            RulePreset::Gkl => "Hand-constructed rule known for robust density classification",
        }
    }

    /// The rule table for this preset.
    pub fn rule(self) -> Rule {
        match self {
            RulePreset::Majority => MAJORITY,
            RulePreset::BlockExpanding => BLOCK_EXPANDING,
            RulePreset::ParticleBased => PARTICLE_BASED,
            RulePreset::Gkl => GKL,
        }
    }
}

impl fmt::Display for RulePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RulePreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "majority" => Ok(RulePreset::Majority),
            "block-expanding" | "expand" => Ok(RulePreset::BlockExpanding),
            "particle-based" | "particle" => Ok(RulePreset::ParticleBased),
            "gkl" => Ok(RulePreset::Gkl),
            other => Err(UnknownPreset(other.to_string())),
        }
    }
}

/// Returned when a preset name is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown rule preset: {0}")]
pub struct UnknownPreset(pub String);

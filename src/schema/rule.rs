//! Rule tables for radius-3 binary cellular automata.
//!
//! A rule maps every 7-cell neighborhood (3 left, center, 3 right) to a
//! successor bit. The neighborhood is read as a 7-bit key with the
//! leftmost cell as the most significant bit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::random::RandomSource;

/// Cells on each side of the center cell.
pub const NEIGHBORHOOD_RADIUS: usize = 3;

/// Cells in one neighborhood.
pub const NEIGHBORHOOD_WIDTH: usize = 2 * NEIGHBORHOOD_RADIUS + 1;

/// Entries in a rule table (one per neighborhood key).
pub const RULE_SIZE: usize = 1 << NEIGHBORHOOD_WIDTH;

/// Hex digits in the compact rule notation.
pub const RULE_HEX_LEN: usize = RULE_SIZE / 4;

/// Lookup table from neighborhood key to successor bit.
///
/// Always exactly [`RULE_SIZE`] entries, each 0 or 1.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    table: [u8; RULE_SIZE],
}

impl Rule {
    /// Wrap a table that is already known to be binary.
    pub(crate) const fn from_table(table: [u8; RULE_SIZE]) -> Self {
        Self { table }
    }

    /// Build a rule from a slice of bits.
    pub fn from_bits(bits: &[u8]) -> Result<Self, RuleError> {
        if bits.len() != RULE_SIZE {
            return Err(RuleError::WrongLength {
                expected: RULE_SIZE,
                found: bits.len(),
            });
        }
        let mut table = [0u8; RULE_SIZE];
        for (i, (&bit, slot)) in bits.iter().zip(table.iter_mut()).enumerate() {
            if bit > 1 {
                return Err(RuleError::InvalidBit {
                    index: i,
                    value: bit,
                });
            }
            *slot = bit;
        }
        Ok(Self { table })
    }

    /// Parse the 32-digit hex notation. Key 0 is the most significant bit
    /// of the first digit.
    pub fn from_hex(hex: &str) -> Result<Self, RuleError> {
        let digits = hex.trim().as_bytes();
        if digits.len() != RULE_HEX_LEN {
            return Err(RuleError::InvalidHex(format!(
                "expected {} hex digits, found {}",
                RULE_HEX_LEN,
                digits.len()
            )));
        }
        let mut table = [0u8; RULE_SIZE];
        for (d, &c) in digits.iter().enumerate() {
            let nibble = hex_digit(c).ok_or_else(|| {
                RuleError::InvalidHex(format!("invalid digit {:?} at {}", c as char, d))
            })?;
            for b in 0..4 {
                table[d * 4 + b] = (nibble >> (3 - b)) & 1;
            }
        }
        Ok(Self { table })
    }

    /// Rule that maps every neighborhood to 0.
    pub const fn zeros() -> Self {
        Self {
            table: [0; RULE_SIZE],
        }
    }

    /// Rule that maps every neighborhood to 1.
    pub const fn ones() -> Self {
        Self {
            table: [1; RULE_SIZE],
        }
    }

    /// Draw a random rule: each entry is an independent fair coin.
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let mut table = [0u8; RULE_SIZE];
        for slot in &mut table {
            *slot = if rng.next_unit() < 0.5 { 0 } else { 1 };
        }
        Self { table }
    }

    /// Successor bit for a neighborhood key.
    #[inline]
    pub fn get(&self, key: usize) -> u8 {
        self.table[key]
    }

    #[inline]
    pub fn bits(&self) -> &[u8; RULE_SIZE] {
        &self.table
    }

    #[inline]
    pub(crate) fn bits_mut(&mut self) -> &mut [u8; RULE_SIZE] {
        &mut self.table
    }

    /// Compact hex notation (lowercase).
    pub fn to_hex(&self) -> String {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";
        self.table
            .chunks_exact(4)
            .map(|chunk| {
                let nibble = chunk.iter().fold(0usize, |acc, &b| (acc << 1) | b as usize);
                DIGITS[nibble] as char
            })
            .collect()
    }

    /// Langton's lambda: fraction of neighborhoods mapped to 1.
    pub fn lambda(&self) -> f64 {
        self.table.iter().map(|&b| b as usize).sum::<usize>() as f64 / RULE_SIZE as f64
    }

    /// Number of entries where the two rules differ.
    pub fn hamming_distance(&self, other: &Rule) -> usize {
        self.table
            .iter()
            .zip(other.table.iter())
            .filter(|(a, b)| a != b)
            .count()
    }
}

/// Value of a lowercase or uppercase hex digit.
pub(crate) const fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule({})", self.to_hex())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Rule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// Rule construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("Rule must have {expected} entries, found {found}")]
    WrongLength { expected: usize, found: usize },
    #[error("Rule entry {index} is {value}, expected 0 or 1")]
    InvalidBit { index: usize, value: u8 },
    #[error("Invalid rule hex: {0}")]
    InvalidHex(String),
}

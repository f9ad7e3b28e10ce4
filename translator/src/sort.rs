use core::fmt;

use derive_more as dm;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sort {
    Bool,
    BitVec(u32),
}

impl Sort {
    pub fn width(self) -> Option<u32> {
        match self {
            Self::Bool => None,
            Self::BitVec(width) => Some(width),
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("Bool"),
            Self::BitVec(width) => write!(f, "(_ BitVec {width})"),
        }
    }
}

/// An unsigned integer of arbitrary size, kept as its decimal digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, dm::Display, Serialize, Deserialize)]
#[display("{_0}")]
#[serde(try_from = "String", into = "String")]
pub struct Numeral(String);

impl Numeral {
    /// Accepts decimal digits only. Leading zeros are dropped.
    pub fn parse(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let trimmed = digits.trim_start_matches('0');
        Some(Self(if trimmed.is_empty() { "0" } else { trimmed }.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_u128(&self) -> Option<u128> {
        self.0.parse().ok()
    }

    /// Whether the value is representable as an unsigned bit vector of `width` bits.
    pub fn fits_in(&self, width: u32) -> bool {
        match self.to_u128() {
            Some(value) => width >= u128::BITS || value >> width == 0,
            None => self.bit_len() <= width as u64,
        }
    }

    /// Number of significant bits, computed by repeated halving of the digits.
    fn bit_len(&self) -> u64 {
        let mut digits = self.0.bytes().map(|b| b - b'0').collect::<Vec<_>>();
        let mut bits = 0;
        while digits.iter().any(|d| *d != 0) {
            let mut carry = 0;
            for digit in digits.iter_mut() {
                let current = carry * 10 + *digit;
                *digit = current / 2;
                carry = current % 2;
            }
            bits += 1;
        }
        bits
    }
}

impl From<u64> for Numeral {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<u128> for Numeral {
    fn from(value: u128) -> Self {
        Self(value.to_string())
    }
}

impl TryFrom<String> for Numeral {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("`{value}` is not a decimal numeral"))
    }
}

impl From<Numeral> for String {
    fn from(value: Numeral) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_leading_zeros() {
        assert_eq!(Numeral::parse("0007").unwrap().as_str(), "7");
        assert_eq!(Numeral::parse("000").unwrap().as_str(), "0");
        assert!(Numeral::parse("").is_none());
        assert!(Numeral::parse("-1").is_none());
        assert!(Numeral::parse("0x10").is_none());
    }

    #[test]
    fn fits_in_width() {
        assert!(Numeral::from(255u64).fits_in(8));
        assert!(!Numeral::from(256u64).fits_in(8));
        assert!(Numeral::from(0u64).fits_in(1));
        assert!(Numeral::from(u128::MAX).fits_in(128));
        assert!(!Numeral::from(u128::MAX).fits_in(127));
        // 2^128
        let wide = Numeral::parse("340282366920938463463374607431768211456").unwrap();
        assert!(!wide.fits_in(128));
        assert!(wide.fits_in(129));
    }

    #[test]
    fn sort_renders_as_smtlib() {
        assert_eq!(Sort::Bool.to_string(), "Bool");
        assert_eq!(Sort::BitVec(32).to_string(), "(_ BitVec 32)");
        assert_eq!(Sort::BitVec(8).width(), Some(8));
    }
}

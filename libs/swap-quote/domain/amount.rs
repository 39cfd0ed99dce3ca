//! Token amounts as typed into the form and as sent over the wire
//!
//! The form holds human decimal strings ("1.5"), the price API speaks in the
//! token's smallest unit ("1500000000000000000"). Conversion between the two
//! is exact: no floating point is involved anywhere.

use ethers::types::U256;
use ethers::utils::{format_units, parse_units};
use thiserror::Error;

/// Maximum number of characters accepted in an amount field
pub const MAX_INPUT_LEN: usize = 79;

/// Largest supported decimals value (10^77 still fits in a U256)
pub const MAX_DECIMALS: u32 = 77;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Invalid amount input: {0:?}")]
    InvalidInput(String),

    #[error("Amount {0:?} is not a number")]
    NotNumeric(String),

    #[error("Amount {amount} has more than {decimals} fractional digits")]
    TooManyDecimals { amount: String, decimals: u32 },

    #[error("Amount {0} does not fit in 256 bits")]
    Overflow(String),

    #[error("Invalid base unit amount: {0:?}")]
    InvalidBaseUnits(String),

    #[error("Unsupported decimals: {0}")]
    UnsupportedDecimals(u32),
}

pub type Result<T> = std::result::Result<T, AmountError>;

/// Check a candidate field value against `^[0-9]*[.,]?[0-9]*$` and the length limit
///
/// Empty input is valid: the minimum length only applies once the field is non-empty.
pub fn is_valid_amount_input(input: &str) -> bool {
    if input.chars().count() > MAX_INPUT_LEN {
        return false;
    }

    let mut separators = 0;
    for c in input.chars() {
        match c {
            '0'..='9' => {}
            '.' | ',' => {
                separators += 1;
                if separators > 1 {
                    return false;
                }
            }
            _ => return false,
        }
    }

    true
}

/// Text of a single amount input
///
/// Edits go through [`AmountField::try_set`]; an invalid edit is dropped and
/// the previous value stays in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountField {
    value: String,
}

impl AmountField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the value if the candidate is valid. Returns whether it was applied.
    pub fn try_set(&mut self, candidate: &str) -> bool {
        if !is_valid_amount_input(candidate) {
            return false;
        }
        self.value.clear();
        self.value.push_str(candidate);
        true
    }

    /// Append a typed character
    pub fn push_char(&mut self, c: char) -> bool {
        let mut candidate = self.value.clone();
        candidate.push(c);
        self.try_set(&candidate)
    }

    /// Delete the last character. Always valid since prefixes of valid input are valid.
    pub fn pop_char(&mut self) -> bool {
        self.value.pop().is_some()
    }
}

/// A parsed, normalised non-negative decimal amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    integer: String,
    fraction: String,
}

impl Amount {
    /// Parse a field value
    ///
    /// The field accepts `,` while typing, but only `.` makes a number: an
    /// amount containing `,` is [`AmountError::NotNumeric`]. Empty input and a
    /// lone `.` both parse to zero.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if !is_valid_amount_input(trimmed) {
            return Err(AmountError::InvalidInput(input.to_string()));
        }
        if trimmed.contains(',') {
            return Err(AmountError::NotNumeric(input.to_string()));
        }

        let (integer, fraction) = match trimmed.find('.') {
            Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
            None => (trimmed, ""),
        };

        let integer = integer.trim_start_matches('0');
        let fraction = fraction.trim_end_matches('0');

        Ok(Self {
            integer: integer.to_string(),
            fraction: fraction.to_string(),
        })
    }

    pub fn is_zero(&self) -> bool {
        self.integer.is_empty() && self.fraction.is_empty()
    }

    /// Strictly greater than zero
    pub fn is_positive(&self) -> bool {
        !self.is_zero()
    }

    /// Scale to the token's smallest unit
    pub fn to_base_units(&self, decimals: u32) -> Result<U256> {
        if decimals > MAX_DECIMALS {
            return Err(AmountError::UnsupportedDecimals(decimals));
        }
        if self.fraction.len() > decimals as usize {
            return Err(AmountError::TooManyDecimals {
                amount: self.to_string(),
                decimals,
            });
        }
        if !self.fits_in_u256(decimals) {
            return Err(AmountError::Overflow(self.to_string()));
        }

        parse_units(self.to_string(), decimals)
            .map(U256::from)
            .map_err(|_| AmountError::Overflow(self.to_string()))
    }

    /// Whether the scaled amount fits in 256 bits. `parse_units` does not check this itself.
    fn fits_in_u256(&self, decimals: u32) -> bool {
        let scale = U256::exp10(decimals as usize);
        let integer = match self.integer.as_str() {
            "" => Ok(U256::zero()),
            digits => U256::from_dec_str(digits),
        };
        let fraction = match self.fraction.as_str() {
            "" => Ok(U256::zero()),
            digits => U256::from_dec_str(digits),
        };

        match (integer, fraction) {
            (Ok(integer), Ok(fraction)) => {
                let fraction = fraction * U256::exp10(decimals as usize - self.fraction.len());
                integer
                    .checked_mul(scale)
                    .and_then(|scaled| scaled.checked_add(fraction))
                    .is_some()
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let integer = if self.integer.is_empty() { "0" } else { &self.integer };
        if self.fraction.is_empty() {
            write!(f, "{}", integer)
        } else {
            write!(f, "{}.{}", integer, self.fraction)
        }
    }
}

/// Render a smallest-unit integer string as a human decimal string
///
/// Trailing fractional zeros are dropped, so whole amounts carry no separator.
pub fn format_base_units(raw: &str, decimals: u32) -> Result<String> {
    if decimals > MAX_DECIMALS {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }

    let raw_trimmed = raw.trim();
    if raw_trimmed.is_empty() {
        return Err(AmountError::InvalidBaseUnits(raw.to_string()));
    }

    let value = U256::from_dec_str(raw_trimmed)
        .map_err(|_| AmountError::InvalidBaseUnits(raw.to_string()))?;
    let formatted = format_units(value, decimals)
        .map_err(|_| AmountError::InvalidBaseUnits(raw.to_string()))?;

    Ok(trim_fraction(&formatted).to_string())
}

fn trim_fraction(formatted: &str) -> &str {
    if !formatted.contains('.') {
        return formatted;
    }
    formatted.trim_end_matches('0').trim_end_matches('.')
}

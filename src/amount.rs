//! Native-unit amounts
//!
//! Prices arrive as raw integers of the smallest native unit (18 decimals).
//! Notifications show them in whole native units with 6 fractional digits.

use alloy_primitives::U256;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Decimals of the native unit.
pub const NATIVE_DECIMALS: usize = 18;

/// Fractional digits shown in notifications.
pub const DISPLAY_DECIMALS: usize = 6;

/// 10^18
const ONE_NATIVE: u64 = 1_000_000_000_000_000_000;
/// 10^(18 - 6), the part dropped when rendering.
const DROPPED: u64 = 1_000_000_000_000;
/// 10^6
const DISPLAY_UNIT: u64 = 1_000_000;

/// An amount of the native unit, stored as the raw smallest-unit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct NativeAmount(U256);

impl NativeAmount {
    pub const ZERO: Self = Self(U256::ZERO);

    pub fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> U256 {
        self.0
    }
}

impl From<U256> for NativeAmount {
    fn from(raw: U256) -> Self {
        Self(raw)
    }
}

/// Renders `raw / 10^18` with 6 fractional digits.
///
/// The dropped digits round half-to-even.
impl fmt::Display for NativeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dropped = U256::from(DROPPED);
        let half = dropped / U256::from(2u64);

        let mut scaled = self.0 / dropped;
        let rest = self.0 % dropped;
        let odd = scaled % U256::from(2u64) != U256::ZERO;
        if rest > half || (rest == half && odd) {
            scaled += U256::from(1u64);
        }

        let unit = U256::from(DISPLAY_UNIT);
        let whole = scaled / unit;
        let frac = (scaled % unit).as_limbs()[0];
        write!(f, "{}.{:0width$}", whole, frac, width = DISPLAY_DECIMALS)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("empty amount")]
    Empty,

    #[error("invalid digit in amount: {0}")]
    InvalidDigit(String),

    #[error("more than 18 fractional digits")]
    TooPrecise,

    #[error("amount exceeds 256 bits")]
    Overflow,
}

/// Parses a decimal native-unit amount such as `"1.500000"`.
impl FromStr for NativeAmount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(ParseAmountError::Empty);
        }
        if frac.len() > NATIVE_DECIMALS {
            return Err(ParseAmountError::TooPrecise);
        }

        let whole = parse_digits(whole)?;
        let padded = format!("{:0<width$}", frac, width = NATIVE_DECIMALS);
        let frac = parse_digits(&padded)?;

        whole
            .checked_mul(U256::from(ONE_NATIVE))
            .and_then(|w| w.checked_add(frac))
            .map(Self)
            .ok_or(ParseAmountError::Overflow)
    }
}

fn parse_digits(digits: &str) -> Result<U256, ParseAmountError> {
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseAmountError::InvalidDigit(digits.to_string()));
    }
    U256::from_str_radix(digits, 10).map_err(|_| ParseAmountError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(raw: u128) -> NativeAmount {
        NativeAmount::from_raw(U256::from(raw))
    }

    #[test]
    fn test_display_whole_and_fractional() {
        assert_eq!(amount(2_000_000_000_000_000_000).to_string(), "2.000000");
        assert_eq!(amount(1_500_000_000_000_000_000).to_string(), "1.500000");
        assert_eq!(amount(123_456_789_000_000_000_000).to_string(), "123.456789");
        assert_eq!(NativeAmount::ZERO.to_string(), "0.000000");
    }

    #[test]
    fn test_display_rounds_half_to_even() {
        // 0.0000005 -> 0.000000 (0 is even)
        assert_eq!(amount(500_000_000_000).to_string(), "0.000000");
        // 0.0000015 -> 0.000002
        assert_eq!(amount(1_500_000_000_000).to_string(), "0.000002");
        // just above half rounds up
        assert_eq!(amount(500_000_000_001).to_string(), "0.000001");
        // dust below half is dropped
        assert_eq!(amount(1).to_string(), "0.000000");
        // carry into the whole part
        assert_eq!(amount(999_999_999_999_999_999).to_string(), "1.000000");
    }

    #[test]
    fn test_display_reparses_stably() {
        let shown = amount(1_500_000_000_000_000_000).to_string();
        let parsed: NativeAmount = shown.parse().unwrap();
        assert_eq!(parsed.raw(), U256::from(1_500_000_000_000_000_000u128));
        assert_eq!(parsed.to_string(), shown);
    }

    #[test]
    fn test_parse() {
        assert_eq!("2".parse::<NativeAmount>().unwrap(), amount(2_000_000_000_000_000_000));
        assert_eq!(".5".parse::<NativeAmount>().unwrap(), amount(500_000_000_000_000_000));
        assert_eq!(
            "0.000000000000000001".parse::<NativeAmount>().unwrap(),
            amount(1)
        );
        assert_eq!("".parse::<NativeAmount>(), Err(ParseAmountError::Empty));
        assert_eq!(
            "0.0000000000000000001".parse::<NativeAmount>(),
            Err(ParseAmountError::TooPrecise)
        );
        assert!(matches!(
            "1.2x".parse::<NativeAmount>(),
            Err(ParseAmountError::InvalidDigit(_))
        ));
    }
}

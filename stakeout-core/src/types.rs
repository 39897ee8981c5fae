use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

const MICRO_PER_UNIT: u64 = 1_000_000;
const DECIMALS: usize = 6;

/// Token amount counted in micro-units (6 decimal places).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_micro(micro: u64) -> Self {
        Self(micro)
    }

    pub const fn to_micro(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Multiply by a basis-point factor (10_000 = 1x), rounding down.
    pub fn scale_bps(self, bps: u32) -> Amount {
        let scaled = (self.0 as u128 * bps as u128) / 10_000;
        Amount(scaled.min(u64::MAX as u128) as u64)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / MICRO_PER_UNIT;
        let frac = self.0 % MICRO_PER_UNIT;
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:0width$}", frac, width = DECIMALS);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAmountError(String);

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid amount '{}'", self.0)
    }
}

impl std::error::Error for ParseAmountError {}

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Parses a decimal string such as `"0.1"` or `"12"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseAmountError(s.to_string());
        let trimmed = s.trim();
        let (whole, frac) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(err());
        }
        if frac.len() > DECIMALS {
            return Err(err());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(err());
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| err())?
        };
        let frac_micro: u64 = if frac.is_empty() {
            0
        } else {
            format!("{:0<width$}", frac, width = DECIMALS)
                .parse()
                .map_err(|_| err())?
        };

        whole
            .checked_mul(MICRO_PER_UNIT)
            .and_then(|w| w.checked_add(frac_micro))
            .map(Amount)
            .ok_or_else(err)
    }
}

/// Transaction id reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(pub String);

impl TxId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TxId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_amounts() {
        assert_eq!("0.1".parse::<Amount>().unwrap(), Amount::from_micro(100_000));
        assert_eq!("12".parse::<Amount>().unwrap(), Amount::from_micro(12_000_000));
        assert_eq!(".5".parse::<Amount>().unwrap(), Amount::from_micro(500_000));
        assert_eq!(
            "1.000001".parse::<Amount>().unwrap(),
            Amount::from_micro(1_000_001)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Amount>().is_err());
        assert!("-1".parse::<Amount>().is_err());
        assert!("1.0000001".parse::<Amount>().is_err());
        assert!("abc".parse::<Amount>().is_err());
        assert!(".".parse::<Amount>().is_err());
    }

    #[test]
    fn test_display_trims_trailing_zeros() {
        assert_eq!(Amount::from_micro(180_000).to_string(), "0.18");
        assert_eq!(Amount::from_micro(2_000_000).to_string(), "2");
        assert_eq!(Amount::ZERO.to_string(), "0");
    }

    #[test]
    fn test_payout_scaling() {
        let bet: Amount = "0.1".parse().unwrap();
        assert_eq!(bet.scale_bps(18_000), "0.18".parse().unwrap());

        let odd = Amount::from_micro(3);
        assert_eq!(odd.scale_bps(18_000), Amount::from_micro(5));
    }
}

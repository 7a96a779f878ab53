use crate::error::{SnapshotError, SnapshotResult};
use num_bigint::BigUint;
use std::str::FromStr;

/// Renders a raw amount with `decimals` fractional digits.
/// Trailing fractional zeros are dropped, whole numbers have no decimal point.
pub fn to_display(raw: &BigUint, decimals: u32) -> String {
    let digits = raw.to_string();
    if decimals == 0 {
        return digits;
    }
    let decimals = decimals as usize;
    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    }
}

/// Inverse of [`to_display`].
pub fn to_raw(display: &str, decimals: u32) -> SnapshotResult<BigUint> {
    DisplayAmount::from_str(display)?.to_raw(decimals)
}

/// A syntactically valid decimal amount, not yet scaled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayAmount {
    integer: String,
    fraction: String,
}

impl DisplayAmount {
    pub fn to_raw(&self, decimals: u32) -> SnapshotResult<BigUint> {
        if self.fraction.len() > decimals as usize {
            return Err(SnapshotError::PrecisionOverflow {
                amount: self.to_string(),
                decimals,
            });
        }
        let digits = format!(
            "{}{:0<width$}",
            self.integer,
            self.fraction,
            width = decimals as usize
        );
        BigUint::from_str(&digits).map_err(|_| SnapshotError::InvalidAmount(self.to_string()))
    }
}

impl FromStr for DisplayAmount {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let is_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        let (integer, fraction) = match s.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (s, ""),
        };
        if !is_digits(integer) || (s.contains('.') && !is_digits(fraction)) {
            return Err(SnapshotError::InvalidAmount(s.to_string()));
        }
        Ok(Self {
            integer: integer.to_string(),
            fraction: fraction.to_string(),
        })
    }
}

impl std::fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.fraction.is_empty() {
            write!(f, "{}", self.integer)
        } else {
            write!(f, "{}.{}", self.integer, self.fraction)
        }
    }
}

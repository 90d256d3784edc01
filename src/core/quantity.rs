//! Exact decimal quantities and the cluster quantity-string grammar.
//!
//! Quantities are written the way the cluster API writes them: a decimal
//! number (plain or scientific) optionally followed by a suffix.
//!
//! | suffix | multiplier |
//! |--------|------------|
//! | `n` `u` `m` | 10⁻⁹, 10⁻⁶, 10⁻³ |
//! | `k`/`K` `M` `G` `T` `P` `E` | 10³ … 10¹⁸ |
//! | `Ki` `Mi` `Gi` `Ti` `Pi` `Ei` | 2¹⁰ … 2⁶⁰ |
//!
//! ```
//! use gang_scheduler_core::core::Quantity;
//!
//! let q: Quantity = "10Mi".parse().unwrap();
//! assert_eq!(q, Quantity::from(10_485_760_i64));
//! assert_eq!("100m".parse::<Quantity>().unwrap().to_string(), "0.1");
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Rem, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::ResourceError;

/// An exact decimal amount of some resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(Decimal);

impl Quantity {
    /// The zero quantity.
    pub const ZERO: Self = Self(Decimal::ZERO);
    /// The unit quantity.
    pub const ONE: Self = Self(Decimal::ONE);

    /// Wrap a decimal value.
    #[must_use]
    pub const fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    /// The underlying decimal value.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Parse a quantity string such as `"100m"`, `"1Gi"`, `"2"` or `"1e3"`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidQuantity`] for malformed numbers,
    /// unsupported suffixes or values too large to represent.
    pub fn parse(input: &str) -> Result<Self, ResourceError> {
        let text = input.trim();
        let (number, multiplier) = split_suffix(text)?;
        let value = parse_number(number).ok_or_else(|| invalid(input))?;
        value
            .checked_mul(multiplier)
            .map(Self)
            .ok_or_else(|| invalid(input))
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// True when the value is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// True when the value is strictly less than zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Drop the fractional part, rounding toward zero.
    #[must_use]
    pub fn trunc(self) -> Self {
        Self(self.0.trunc())
    }

    /// Integer value, truncated toward zero, if it fits in an `i64`.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.trunc().to_i64()
    }

    /// Checked addition.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Checked subtraction.
    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Checked multiplication.
    #[must_use]
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        self.0.checked_mul(rhs.0).map(Self)
    }

    /// Checked division; `None` on a zero divisor or overflow.
    #[must_use]
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        self.0.checked_div(rhs.0).map(Self)
    }

    /// Checked remainder; `None` on a zero divisor.
    #[must_use]
    pub fn checked_rem(self, rhs: Self) -> Option<Self> {
        self.0.checked_rem(rhs.0).map(Self)
    }

    /// Integer power by repeated squaring; `None` on overflow.
    #[must_use]
    pub fn checked_pow(self, exp: u32) -> Option<Self> {
        let mut base = self.0;
        let mut exp = exp;
        let mut acc = Decimal::ONE;
        while exp > 0 {
            if exp & 1 == 1 {
                acc = acc.checked_mul(base)?;
            }
            exp >>= 1;
            if exp > 0 {
                base = base.checked_mul(base)?;
            }
        }
        Some(Self(acc))
    }

    /// Integer power.
    ///
    /// # Panics
    ///
    /// Panics when the result overflows, like the integer `pow` methods.
    #[must_use]
    pub fn pow(self, exp: u32) -> Self {
        match self.checked_pow(exp) {
            Some(value) => value,
            None => panic!("quantity overflow: {self} ** {exp}"),
        }
    }

    /// Quotient truncated toward zero together with the remainder, which
    /// carries the sign of the dividend.
    ///
    /// `None` when `rhs` is zero.
    #[must_use]
    pub fn divmod(self, rhs: Self) -> Option<(Self, Self)> {
        let rem = self.0.checked_rem(rhs.0)?;
        let quot = (self.0 - rem).checked_div(rhs.0)?;
        Some((Self(quot.normalize()), Self(rem)))
    }

    /// Render with exactly `scale` fractional digits.
    #[must_use]
    pub fn format_scaled(&self, scale: u32) -> String {
        let mut value = self.0.round_dp(scale);
        value.rescale(scale);
        value.to_string()
    }
}

fn invalid(input: &str) -> ResourceError {
    ResourceError::InvalidQuantity(input.to_string())
}

fn split_suffix(text: &str) -> Result<(&str, Decimal), ResourceError> {
    if text.is_empty() {
        return Err(invalid(text));
    }

    if let Some(stripped) = text.strip_suffix('i') {
        let exp = match stripped.chars().next_back() {
            Some('K') => 1,
            Some('M') => 2,
            Some('G') => 3,
            Some('T') => 4,
            Some('P') => 5,
            Some('E') => 6,
            _ => return Err(invalid(text)),
        };
        let number = &stripped[..stripped.len() - 1];
        return Ok((number, Decimal::from(1_i64 << (10 * exp))));
    }

    let multiplier = match text.chars().next_back() {
        Some('n') => Decimal::new(1, 9),
        Some('u') => Decimal::new(1, 6),
        Some('m') => Decimal::new(1, 3),
        Some('k' | 'K') => Decimal::from(1_000_i64),
        Some('M') => Decimal::from(1_000_000_i64),
        Some('G') => Decimal::from(1_000_000_000_i64),
        Some('T') => Decimal::from(1_000_000_000_000_i64),
        Some('P') => Decimal::from(1_000_000_000_000_000_i64),
        Some('E') => Decimal::from(1_000_000_000_000_000_000_i64),
        _ => return Ok((text, Decimal::ONE)),
    };
    Ok((&text[..text.len() - 1], multiplier))
}

fn parse_number(number: &str) -> Option<Decimal> {
    let number = number.strip_prefix('+').unwrap_or(number);
    if number.is_empty() || number.chars().any(char::is_whitespace) {
        return None;
    }
    if number.contains(['e', 'E']) {
        Decimal::from_scientific(number).ok()
    } else {
        Decimal::from_str(number).ok()
    }
}

impl FromStr for Quantity {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.normalize(), f)
    }
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<i32> for Quantity {
    fn from(value: i32) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self(Decimal::from(value))
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Mul for Quantity {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Mul<i64> for Quantity {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl MulAssign<i64> for Quantity {
    fn mul_assign(&mut self, rhs: i64) {
        self.0 *= Decimal::from(rhs);
    }
}

impl Div for Quantity {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self(self.0 / rhs.0)
    }
}

impl Rem for Quantity {
    type Output = Self;

    fn rem(self, rhs: Self) -> Self {
        Self(self.0 % rhs.0)
    }
}

impl Neg for Quantity {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Text(String),
    Int(i64),
    Float(f64),
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawQuantity::deserialize(deserializer)? {
            RawQuantity::Text(text) => Self::parse(&text).map_err(serde::de::Error::custom),
            RawQuantity::Int(value) => Ok(Self::from(value)),
            RawQuantity::Float(value) => Decimal::try_from(value)
                .map(Self)
                .map_err(serde::de::Error::custom),
        }
    }
}

// kiosk-core/src/money.rs

//! Integer-cent money type.
//!
//! Prices and totals are carried as whole cents everywhere inside the crate so
//! that cart arithmetic is exact. On the wire they travel as JSON numbers in
//! dollars (`9.5`), converted by rounding to the nearest cent.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// An amount of money in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cents(pub i64);

impl Cents {
  pub const ZERO: Cents = Cents(0);

  /// Converts a dollar amount, rounding to the nearest cent.
  ///
  /// Returns `None` for NaN, infinities and values outside the `i64` cent range.
  pub fn from_dollars(dollars: f64) -> Option<Self> {
    if !dollars.is_finite() {
      return None;
    }
    let cents = (dollars * 100.0).round();
    if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
      return None;
    }
    Some(Cents(cents as i64))
  }

  pub fn as_dollars(self) -> f64 {
    self.0 as f64 / 100.0
  }

  pub fn is_positive(self) -> bool {
    self.0 > 0
  }

  pub fn checked_add(self, other: Cents) -> Option<Cents> {
    self.0.checked_add(other.0).map(Cents)
  }

  /// Unit price times a quantity.
  pub fn checked_mul(self, quantity: i64) -> Option<Cents> {
    self.0.checked_mul(quantity).map(Cents)
  }

  /// Absolute distance between two amounts, saturating at `i64::MAX`.
  pub fn distance(self, other: Cents) -> Cents {
    Cents(self.0.abs_diff(other.0).min(i64::MAX as u64) as i64)
  }
}

impl Add for Cents {
  type Output = Cents;
  fn add(self, rhs: Cents) -> Cents {
    Cents(self.0 + rhs.0)
  }
}

impl AddAssign for Cents {
  fn add_assign(&mut self, rhs: Cents) {
    self.0 += rhs.0;
  }
}

impl Sub for Cents {
  type Output = Cents;
  fn sub(self, rhs: Cents) -> Cents {
    Cents(self.0 - rhs.0)
  }
}

impl SubAssign for Cents {
  fn sub_assign(&mut self, rhs: Cents) {
    self.0 -= rhs.0;
  }
}

impl Sum for Cents {
  fn sum<I: Iterator<Item = Cents>>(iter: I) -> Cents {
    iter.fold(Cents::ZERO, Add::add)
  }
}

impl fmt::Display for Cents {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sign = if self.0 < 0 { "-" } else { "" };
    let abs = self.0.unsigned_abs();
    write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
  }
}

impl Serialize for Cents {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(self.as_dollars())
  }
}

impl<'de> Deserialize<'de> for Cents {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let dollars = f64::deserialize(deserializer)?;
    Cents::from_dollars(dollars).ok_or_else(|| de::Error::custom("amount is not a representable dollar value"))
  }
}

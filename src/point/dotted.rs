//! The dotted "point" duration notation: `minutes[.hours[.days[.months[.years]]]]`,
//! read right-to-left, with fixed multipliers `[1, 60, 1440, 43200, 518400]`.

use std::fmt;
use std::str::FromStr;

use super::POINT_MULTIPLIERS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointError {
  Malformed(String),
  Overflow(String),
}

impl fmt::Display for PointError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PointError::Malformed(s) => write!(f, "`{}` is not a valid point", s),
      PointError::Overflow(s) => write!(f, "point `{}` overflows i64", s),
    }
  }
}

impl std::error::Error for PointError {}

/// Parses a dotted point literal into a signed minute count.
///
/// Accepts an optional leading `-`, then up to five dot-separated all-digit
/// fields read right-to-left as minutes, hours, days, months, years.
pub fn point_to_minutes(s: &str) -> Result<i64, PointError> {
  let bad = || PointError::Malformed(s.to_string());

  let (negative, body) = match s.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, s),
  };

  if body.is_empty() {
    return Err(bad());
  }

  let fields: Vec<&str> = body.split('.').collect();
  if fields.is_empty() || fields.len() > POINT_MULTIPLIERS.len() {
    return Err(bad());
  }

  let mut total: i64 = 0;
  for (i, field) in fields.iter().rev().enumerate() {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
      return Err(bad());
    }
    let val: i64 = field.parse().map_err(|_| bad())?;
    let term = val
      .checked_mul(POINT_MULTIPLIERS[i])
      .ok_or_else(|| PointError::Overflow(s.to_string()))?;
    total = total
      .checked_add(term)
      .ok_or_else(|| PointError::Overflow(s.to_string()))?;
  }

  if negative {
    total = total.checked_neg().ok_or_else(|| PointError::Overflow(s.to_string()))?;
  }

  Ok(total)
}

/// Canonical inverse of [`point_to_minutes`]. Splits `|n|` greedily into
/// years/months/days/hours/minutes, then renders the shortest dot-joined
/// suffix that still encodes the value unambiguously: the minimum rendered
/// width is three fields (days.hours.minutes), widened on the left only as
/// far as the highest nonzero month/year field.
pub fn minutes_to_point(n: i64) -> String {
  let negative = n < 0;
  let mut rem = n.unsigned_abs();

  // [years, months, days, hours, minutes]
  let mults: [u64; 5] = [518_400, 43_200, 1_440, 60, 1];
  let mut parts = [0u64; 5];
  for (part, mult) in parts.iter_mut().zip(mults.iter()) {
    *part = rem / mult;
    rem %= mult;
  }

  let mut start = 2; // days.hours.minutes is the minimum rendered width
  if parts[1] != 0 {
    start = 1;
  }
  if parts[0] != 0 {
    start = 0;
  }

  let body = parts[start..]
    .iter()
    .map(|v| v.to_string())
    .collect::<Vec<_>>()
    .join(".");

  if negative {
    format!("-{}", body)
  } else {
    body
  }
}

/// A signed minute-valued duration, in the dotted point notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Point(pub i64);

impl Point {
  pub fn minutes(&self) -> i64 {
    self.0
  }
}

impl FromStr for Point {
  type Err = PointError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(Point(point_to_minutes(s)?))
  }
}

impl fmt::Display for Point {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", minutes_to_point(self.0))
  }
}

impl std::ops::Add for Point {
  type Output = Point;
  fn add(self, rhs: Self) -> Self::Output {
    Point(self.0 + rhs.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_examples() {
    assert_eq!(point_to_minutes("0.1.30").unwrap(), 90);
    assert_eq!(point_to_minutes("-1.30").unwrap(), -90);
    assert_eq!(point_to_minutes("30.0.0").unwrap(), 43_200);
    assert_eq!(point_to_minutes("30").unwrap(), 30);
    assert_eq!(point_to_minutes("1.0").unwrap(), 60);
  }

  #[test]
  fn formats_canonical_inverse() {
    assert_eq!(minutes_to_point(90), "0.1.30");
  }

  #[test]
  fn rejects_malformed() {
    assert!(point_to_minutes("").is_err());
    assert!(point_to_minutes("-").is_err());
    assert!(point_to_minutes("1..2").is_err());
    assert!(point_to_minutes("1.2a").is_err());
    assert!(point_to_minutes("1.2.3.4.5.6").is_err());
  }

  #[test]
  fn roundtrips_over_range() {
    for n in [
      0_i64, 1, -1, 30, 90, -90, 43_200, 518_400, 1_000_000_000, -1_000_000_000,
      123_456_789, -987_654_321,
    ] {
      let text = minutes_to_point(n);
      assert_eq!(point_to_minutes(&text).unwrap(), n, "roundtrip failed for {n}");
    }
  }

  #[test]
  fn point_add() {
    assert_eq!(Point(30) + Point(15), Point(45));
  }
}

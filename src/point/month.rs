//! Month arithmetic: day counts per month, respecting leap years.

use std::fmt;

use super::year::CeYear;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Month {
  Jan, Feb, Mar, Apr, May, Jun, Jul, Aug, Sep, Oct, Nov, Dec,
}

impl Month {
  /// Constructs a month from its 1-indexed calendar number (`1` = January).
  pub fn from_number(n: u32) -> Option<Self> {
    use Month::*;
    Some(match n {
      1 => Jan, 2 => Feb, 3 => Mar, 4 => Apr, 5 => May, 6 => Jun,
      7 => Jul, 8 => Aug, 9 => Sep, 10 => Oct, 11 => Nov, 12 => Dec,
      _ => return None,
    })
  }

  /// 1-indexed calendar number for this month.
  pub fn number(&self) -> u32 {
    use Month::*;
    match self {
      Jan => 1, Feb => 2, Mar => 3, Apr => 4, May => 5, Jun => 6,
      Jul => 7, Aug => 8, Sep => 9, Oct => 10, Nov => 11, Dec => 12,
    }
  }

  pub fn next(&self) -> Option<Self> {
    Month::from_number(self.number() + 1)
  }

  /// Number of days in this month, accounting for leap years in February.
  pub fn num_days(&self, y: &CeYear) -> u32 {
    use Month::*;
    match self {
      Feb => match y.length() {
        super::year::YearLength::Leap => 29,
        super::year::YearLength::Common => 28,
      },
      Apr | Jun | Sep | Nov => 30,
      _ => 31,
    }
  }

  /// Number of minutes spanned by this month in year `y`.
  pub fn num_min(&self, y: &CeYear) -> u32 {
    self.num_days(y) * super::MIN_IN_DAY
  }
}

impl fmt::Display for Month {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:02}", self.number())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn day_counts() {
    let leap = CeYear::new(2024).unwrap();
    let common = CeYear::new(2025).unwrap();
    assert_eq!(Month::Feb.num_days(&leap), 29);
    assert_eq!(Month::Feb.num_days(&common), 28);
    assert_eq!(Month::Apr.num_days(&common), 30);
    assert_eq!(Month::Jan.num_days(&common), 31);
    assert_eq!(Month::Dec.num_days(&common), 31);
  }

  #[test]
  fn roundtrip_number() {
    for n in 1..=12 {
      assert_eq!(Month::from_number(n).unwrap().number(), n);
    }
    assert!(Month::from_number(0).is_none());
    assert!(Month::from_number(13).is_none());
  }

  #[test]
  fn next_wraps_to_none_after_december() {
    assert!(Month::Dec.next().is_none());
    assert_eq!(Month::Jan.next(), Some(Month::Feb));
  }
}

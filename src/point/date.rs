//! Calendar dates and the signed minute-since-epoch instant used for
//! simulation arithmetic.

use std::fmt;

use super::month::Month;
use super::year::CeYear;
use super::{MIN_IN_DAY, MIN_IN_HR, UNIX_EPOCH_YR};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
  Malformed(String),
  InvalidYear(u16),
  InvalidMonth(u32),
  InvalidDay { year: u16, month: u32, day: u32 },
  InvalidHour(u32),
  InvalidMinute(u32),
  InvalidSecond(u32),
  OutOfRange,
}

impl fmt::Display for DateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DateError::Malformed(s) => write!(f, "`{}` is not a valid date/time literal", s),
      DateError::InvalidYear(y) => write!(f, "year {} is out of range", y),
      DateError::InvalidMonth(m) => write!(f, "month {} is out of range 1..=12", m),
      DateError::InvalidDay { year, month, day } => {
        write!(f, "day {} is out of range for {:04}-{:02}", day, year, month)
      }
      DateError::InvalidHour(h) => write!(f, "hour {} is out of range 0..=23", h),
      DateError::InvalidMinute(m) => write!(f, "minute {} is out of range 0..=59", m),
      DateError::InvalidSecond(s) => write!(f, "second {} is out of range 0..=59", s),
      DateError::OutOfRange => write!(f, "instant falls outside the supported calendar range"),
    }
  }
}

impl std::error::Error for DateError {}

/// A calendar date and time of day, as parsed from the lexer's `date` and
/// `time` lexemes. Carries `sec` even though [`MinInstant`] arithmetic is
/// minute-granular, so a literal round-trips through the unparser exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
  pub yr: CeYear,
  pub mon: Month,
  pub day: u32,
  pub hr: u32,
  pub min: u32,
  pub sec: u32,
}

impl Date {
  pub fn new(yr: CeYear, mon: Month, day: u32, hr: u32, min: u32, sec: u32) -> Result<Self, DateError> {
    if day == 0 || day > mon.num_days(&yr) {
      return Err(DateError::InvalidDay { year: yr.raw(), month: mon.number(), day });
    }
    if hr > 23 {
      return Err(DateError::InvalidHour(hr));
    }
    if min > 59 {
      return Err(DateError::InvalidMinute(min));
    }
    if sec > 59 {
      return Err(DateError::InvalidSecond(sec));
    }
    Ok(Date { yr, mon, day, hr, min, sec })
  }

  /// Parses a `date` lexeme (`YYYY-MM-DD`) and a `time` lexeme (`HH:MM[:SS]`)
  /// into a validated `Date`.
  pub fn parse(date_lexeme: &str, time_lexeme: &str) -> Result<Self, DateError> {
    let (y, m, d) = parse_date_fields(date_lexeme)?;
    let (hr, min, sec) = parse_time_fields(time_lexeme)?;
    let yr = CeYear::new(y).map_err(|_| DateError::InvalidYear(y))?;
    let mon = Month::from_number(m).ok_or(DateError::InvalidMonth(m))?;
    Date::new(yr, mon, d, hr, min, sec)
  }

  pub fn to_min_instant(&self) -> MinInstant {
    let mut total: i64 = 0;
    let target = self.yr.raw();

    if target >= UNIX_EPOCH_YR {
      let mut y = UNIX_EPOCH_YR;
      while y < target {
        total += CeYear::new(y).expect("y within 1..=9999").num_min() as i64;
        y += 1;
      }
    } else {
      let mut y = target;
      while y < UNIX_EPOCH_YR {
        total -= CeYear::new(y).expect("y within 1..=9999").num_min() as i64;
        y += 1;
      }
    }

    let mut m = Month::Jan;
    while m != self.mon {
      total += m.num_min(&self.yr) as i64;
      m = m.next().expect("m reached before Dec");
    }

    total += (self.day as i64 - 1) * MIN_IN_DAY as i64;
    total += self.hr as i64 * MIN_IN_HR as i64;
    total += self.min as i64;

    MinInstant(total)
  }

  pub fn from_min_instant(mi: MinInstant) -> Result<Date, DateError> {
    let mut remaining = mi.0;
    let mut y = UNIX_EPOCH_YR;

    if remaining >= 0 {
      loop {
        let year = CeYear::new(y).map_err(|_| DateError::OutOfRange)?;
        let span = year.num_min() as i64;
        if remaining < span {
          break;
        }
        remaining -= span;
        y = y.checked_add(1).ok_or(DateError::OutOfRange)?;
      }
    } else {
      loop {
        y = y.checked_sub(1).ok_or(DateError::OutOfRange)?;
        let year = CeYear::new(y).map_err(|_| DateError::OutOfRange)?;
        let span = year.num_min() as i64;
        remaining += span;
        if remaining >= 0 {
          break;
        }
      }
    }

    let yr = CeYear::new(y).map_err(|_| DateError::OutOfRange)?;
    let mut mon = Month::Jan;
    loop {
      let span = mon.num_min(&yr) as i64;
      if remaining < span {
        break;
      }
      remaining -= span;
      mon = mon.next().ok_or(DateError::OutOfRange)?;
    }

    let day = remaining / MIN_IN_DAY as i64 + 1;
    remaining %= MIN_IN_DAY as i64;
    let hr = remaining / MIN_IN_HR as i64;
    remaining %= MIN_IN_HR as i64;
    let min = remaining;

    Date::new(yr, mon, day as u32, hr as u32, min as u32, 0)
  }
}

impl fmt::Display for Date {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}-{}-{:02}T{:02}:{:02}",
      self.yr, self.mon, self.day, self.hr, self.min
    )
  }
}

/// A signed count of minutes since `1970-01-01T00:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MinInstant(pub i64);

impl MinInstant {
  pub fn raw(&self) -> i64 {
    self.0
  }

  pub fn add_minutes(&self, m: i64) -> MinInstant {
    MinInstant(self.0 + m)
  }
}

impl std::ops::Add<i64> for MinInstant {
  type Output = MinInstant;
  fn add(self, rhs: i64) -> Self::Output {
    self.add_minutes(rhs)
  }
}

impl fmt::Display for MinInstant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match Date::from_min_instant(*self) {
      Ok(d) => write!(f, "{}", d),
      Err(_) => write!(f, "<out-of-range:{}>", self.0),
    }
  }
}

fn parse_date_fields(s: &str) -> Result<(u16, u32, u32), DateError> {
  let bad = || DateError::Malformed(s.to_string());
  let parts: Vec<&str> = s.split('-').collect();
  if parts.len() != 3 {
    return Err(bad());
  }
  let [y, m, d] = [parts[0], parts[1], parts[2]];
  if y.len() != 4 || m.len() != 2 || d.len() != 2 {
    return Err(bad());
  }
  if !y.bytes().all(|b| b.is_ascii_digit())
    || !m.bytes().all(|b| b.is_ascii_digit())
    || !d.bytes().all(|b| b.is_ascii_digit())
  {
    return Err(bad());
  }
  let year: u16 = y.parse().map_err(|_| bad())?;
  let month: u32 = m.parse().map_err(|_| bad())?;
  let day: u32 = d.parse().map_err(|_| bad())?;
  Ok((year, month, day))
}

fn parse_time_fields(s: &str) -> Result<(u32, u32, u32), DateError> {
  let bad = || DateError::Malformed(s.to_string());
  let parts: Vec<&str> = s.split(':').collect();
  if parts.len() != 2 && parts.len() != 3 {
    return Err(bad());
  }
  for p in &parts {
    if p.len() != 2 || !p.bytes().all(|b| b.is_ascii_digit()) {
      return Err(bad());
    }
  }
  let hr: u32 = parts[0].parse().map_err(|_| bad())?;
  let min: u32 = parts[1].parse().map_err(|_| bad())?;
  let sec: u32 = if parts.len() == 3 {
    parts[2].parse().map_err(|_| bad())?
  } else {
    0
  };
  Ok((hr, min, sec))
}

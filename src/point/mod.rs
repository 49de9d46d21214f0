//! Point arithmetic (C1): the dotted duration notation, and the calendar
//! instant plumbing used to turn a law's `start_date`/`start_time` plus a
//! string of `Point` durations into concrete, displayable timestamps.

pub mod date;
pub mod dotted;
pub mod month;
pub mod year;

pub use date::{Date, DateError, MinInstant};
pub use dotted::{minutes_to_point, point_to_minutes, PointError};
pub use month::Month;
pub use year::{CeYear, YearError, YearLength};

pub const MIN_IN_HR: u32 = 60;
pub const MIN_IN_DAY: u32 = 24 * MIN_IN_HR;
pub const UNIX_EPOCH_YR: u16 = 1970;

/// Fixed multipliers for the five point fields, read right-to-left:
/// minutes, hours, days (24h), months (30d), years (360d).
pub const POINT_MULTIPLIERS: [i64; 5] = [1, 60, 1_440, 43_200, 518_400];

//! Wall-clock time of day
//!
//! The visualizer sends its local time as `dTYYYYMMDDHHMMSS`; the firmware
//! then keeps it running from its own tick source.

use crate::codec;
use crate::ErrorCode;

/// Number of digits in a wire time stamp
pub const TIMESTAMP_LEN: usize = 14;

/// Earliest accepted year
pub const MIN_YEAR: u16 = 2000;

/// Latest accepted year
pub const MAX_YEAR: u16 = 3000;

/// Gregorian leap year rule
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Calendar date and time with one-second resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self {
            year: MIN_YEAR,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

/// Decode one decimal field and check it against an inclusive range
fn field(digits: &[u8], min: u32, max: u32) -> Result<u32, ErrorCode> {
    let value = codec::decode_dec(digits)?;
    if value < min || value > max {
        return Err(ErrorCode::Value);
    }
    Ok(value)
}

impl TimeOfDay {
    /// Create a validated time of day
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, ErrorCode> {
        let valid = (MIN_YEAR..=MAX_YEAR).contains(&year)
            && (1..=12).contains(&month)
            && day >= 1
            && day <= days_in_month(year, month)
            && hour < 24
            && minute < 60
            && second < 60;
        if !valid {
            return Err(ErrorCode::Value);
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Parse a `YYYYMMDDHHMMSS` time stamp
    ///
    /// Fields are checked in order; the first failing field decides the
    /// error (`Decode` for a non-digit, `Value` for an out-of-range field).
    pub fn parse(digits: &[u8]) -> Result<Self, ErrorCode> {
        if digits.len() != TIMESTAMP_LEN {
            return Err(ErrorCode::Length);
        }

        let year = field(&digits[0..4], MIN_YEAR as u32, MAX_YEAR as u32)? as u16;
        let month = field(&digits[4..6], 1, 12)? as u8;
        let day = field(&digits[6..8], 1, days_in_month(year, month) as u32)? as u8;
        let hour = field(&digits[8..10], 0, 23)? as u8;
        let minute = field(&digits[10..12], 0, 59)? as u8;
        let second = field(&digits[12..14], 0, 59)? as u8;

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Encode as a `YYYYMMDDHHMMSS` time stamp
    pub fn encode(&self) -> [u8; TIMESTAMP_LEN] {
        let mut out = [b'0'; TIMESTAMP_LEN];
        put_dec(&mut out[0..4], self.year as u32);
        put_dec(&mut out[4..6], self.month as u32);
        put_dec(&mut out[6..8], self.day as u32);
        put_dec(&mut out[8..10], self.hour as u32);
        put_dec(&mut out[10..12], self.minute as u32);
        put_dec(&mut out[12..14], self.second as u32);
        out
    }

    /// Advance by one second, cascading into minutes, hours, days, months
    /// and years
    pub fn advance_one_second(&mut self) {
        self.second += 1;
        if self.second < 60 {
            return;
        }
        self.second = 0;

        self.minute += 1;
        if self.minute < 60 {
            return;
        }
        self.minute = 0;

        self.hour += 1;
        if self.hour < 24 {
            return;
        }
        self.hour = 0;

        self.day += 1;
        if self.day <= days_in_month(self.year, self.month) {
            return;
        }
        self.day = 1;

        self.month += 1;
        if self.month <= 12 {
            return;
        }
        self.month = 1;
        self.year = self.year.saturating_add(1);
    }

    /// Hours, minutes and seconds
    pub fn hms(&self) -> (u8, u8, u8) {
        (self.hour, self.minute, self.second)
    }
}

fn put_dec(out: &mut [u8], mut value: u32) {
    for digit in out.iter_mut().rev() {
        *digit = b'0' + (value % 10) as u8;
        value /= 10;
    }
}

//! Parsing of `YYYY-MM` month tokens and their date intervals.
//!
//! Every month-filtered query uses the same canonical half-open interval
//! `[first of month 00:00, first of next month 00:00)` in UTC.

use time::{Date, Month, PrimitiveDateTime, Time};

use crate::Error;

/// A calendar month selected for filtering sale transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleMonth {
    /// The calendar year, e.g. 2022.
    pub year: i32,
    /// The month within the year.
    pub month: Month,
}

/// The half-open UTC interval covered by a [SaleMonth].
///
/// A timestamp is inside the interval when `start <= timestamp < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthInterval {
    /// Midnight on the first day of the month.
    pub start: PrimitiveDateTime,
    /// Midnight on the first day of the following month (exclusive).
    pub end: PrimitiveDateTime,
}

impl SaleMonth {
    /// Parse a `YYYY-MM` month token.
    ///
    /// The token must be four digits, a hyphen, and two digits, and the month
    /// number must be between 01 and 12.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonthFormat] for any other input.
    pub fn parse(token: &str) -> Result<Self, Error> {
        let bytes = token.as_bytes();
        let matches_format = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);

        if !matches_format {
            return Err(Error::InvalidMonthFormat(token.to_owned()));
        }

        // The unwraps cannot fail: both slices are all ASCII digits.
        let year: i32 = token[..4].parse().unwrap();
        let month_number: u8 = token[5..].parse().unwrap();

        Self::from_parts(year, month_number).map_err(|_| Error::InvalidMonthFormat(token.to_owned()))
    }

    /// Create a [SaleMonth] from a year and a month number (1-12).
    ///
    /// # Errors
    /// Returns [Error::InvalidMonthFormat] if the month number is out of
    /// range, or if the year is so far out that the month's date interval
    /// cannot be represented (e.g. December 9999, whose interval ends in
    /// year 10000).
    pub fn from_parts(year: i32, month_number: u8) -> Result<Self, Error> {
        let invalid = || Error::InvalidMonthFormat(format!("{year:04}-{month_number:02}"));

        let month = Month::try_from(month_number).map_err(|_| invalid())?;
        let sale_month = Self { year, month };

        // Both interval bounds must be representable dates, including the
        // rollover into January of the following year.
        let (start, end) = sale_month.interval_bounds();
        if start.is_err() || end.is_err() {
            return Err(invalid());
        }

        Ok(sale_month)
    }

    /// The half-open date interval covered by this month.
    pub fn interval(&self) -> MonthInterval {
        let (start, end) = self.interval_bounds();
        // Construction via parse or from_parts checked both bounds.
        let start_date = start.unwrap();
        let end_date = end.unwrap();

        MonthInterval {
            start: PrimitiveDateTime::new(start_date, Time::MIDNIGHT),
            end: PrimitiveDateTime::new(end_date, Time::MIDNIGHT),
        }
    }

    /// The first days of this month and of the following month.
    fn interval_bounds(
        &self,
    ) -> (
        Result<Date, time::error::ComponentRange>,
        Result<Date, time::error::ComponentRange>,
    ) {
        let (next_year, next_month) = match self.month {
            Month::December => (self.year.saturating_add(1), Month::January),
            month => (self.year, month.next()),
        };

        (
            Date::from_calendar_date(self.year, self.month, 1),
            Date::from_calendar_date(next_year, next_month, 1),
        )
    }

    /// The English name of the month, e.g. "March".
    pub fn month_name(&self) -> &'static str {
        match self.month {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

use crate::events::YMD_FMT;
use std::fmt;
use std::iter::successors;
use time::{error::ComponentRange, Date, Month};

pub(crate) const DAYS_IN_WEEK: u8 = 7;

/// A calendar month, represented by its first day
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
// Invariant: The inner date is always the first of its month
pub(crate) struct YearMonth(Date);

impl YearMonth {
    pub(crate) fn new(year: i32, month: Month) -> Result<YearMonth, ComponentRange> {
        Date::from_calendar_date(year, month, 1).map(YearMonth)
    }

    /// Returns the month containing `date`
    pub(crate) fn of(date: Date) -> YearMonth {
        YearMonth(
            Date::from_calendar_date(date.year(), date.month(), 1)
                .expect("the first of a valid date's month should be valid"),
        )
    }

    /// Parse a `YYYY-MM` string
    pub(crate) fn parse(s: &str) -> Result<YearMonth, time::error::Parse> {
        Date::parse(&format!("{s}-01"), &YMD_FMT).map(YearMonth)
    }

    pub(crate) fn year(self) -> i32 {
        self.0.year()
    }

    pub(crate) fn month(self) -> Month {
        self.0.month()
    }

    pub(crate) fn first_day(self) -> Date {
        self.0
    }

    pub(crate) fn last_day(self) -> Date {
        self.days().last().unwrap_or(self.0)
    }

    pub(crate) fn days(self) -> impl Iterator<Item = Date> {
        let month = self.month();
        successors(Some(self.0), |d| d.next_day()).take_while(move |d| d.month() == month)
    }

    pub(crate) fn days_in_month(self) -> u8 {
        self.last_day().day()
    }

    /// Number of weekdays in the first week before the 1st, with weeks
    /// starting on Monday
    pub(crate) fn leading_blanks(self) -> u8 {
        self.0.weekday().number_days_from_monday()
    }

    /// Returns `None` at the end of time
    pub(crate) fn next(self) -> Option<YearMonth> {
        self.last_day().next_day().map(YearMonth)
    }

    pub(crate) fn contains(self, date: Date) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month(), self.year())
    }
}

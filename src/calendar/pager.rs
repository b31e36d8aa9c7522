use super::util::YearMonth;
use std::iter::successors;
use thiserror::Error;
use time::{Date, Month};

/// The closed span of months the calendar can ever show
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct VisibleRange {
    first: YearMonth,
    last: YearMonth,
}

impl VisibleRange {
    pub(crate) fn new(first: YearMonth, last: YearMonth) -> Result<VisibleRange, EmptyRangeError> {
        if first <= last {
            Ok(VisibleRange { first, last })
        } else {
            Err(EmptyRangeError { first, last })
        }
    }

    pub(crate) fn first(&self) -> YearMonth {
        self.first
    }

    pub(crate) fn last(&self) -> YearMonth {
        self.last
    }

    pub(crate) fn months(&self) -> Vec<YearMonth> {
        let last = self.last;
        successors(Some(self.first), |ym| ym.next())
            .take_while(|&ym| ym <= last)
            .collect()
    }
}

impl Default for VisibleRange {
    /// March 2025 through April 2026
    fn default() -> VisibleRange {
        VisibleRange {
            first: YearMonth::new(2025, Month::March).expect("March 2025 should be a valid month"),
            last: YearMonth::new(2026, Month::April).expect("April 2026 should be a valid month"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("visible range is empty: {first} is after {last}")]
pub(crate) struct EmptyRangeError {
    first: YearMonth,
    last: YearMonth,
}

/// How many months are shown at once.  This is decided once at startup and
/// is deliberately not changed when the terminal is resized afterwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum WindowSize {
    Single,
    Double,
}

impl WindowSize {
    pub(crate) fn months(self) -> usize {
        match self {
            WindowSize::Single => 1,
            WindowSize::Double => 2,
        }
    }

    pub(crate) fn for_narrow(narrow: bool) -> WindowSize {
        if narrow {
            WindowSize::Single
        } else {
            WindowSize::Double
        }
    }
}

/// A window of one or two consecutive months sliding over a
/// [`VisibleRange`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthPager {
    months: Vec<YearMonth>,
    window: WindowSize,
    // Invariant: start <= max_start()
    start: usize,
    home: usize,
}

impl MonthPager {
    /// Create a pager whose window contains `today`'s month, or the nearest
    /// end of the range if `today` is outside it
    pub(crate) fn new(range: VisibleRange, window: WindowSize, today: Date) -> MonthPager {
        let months = range.months();
        let max_start = months.len().saturating_sub(window.months());
        let start = match months.iter().position(|ym| ym.contains(today)) {
            Some(i) => i.min(max_start),
            None if today < range.first().first_day() => 0,
            None => max_start,
        };
        tracing::debug!(
            months = months.len(),
            window = window.months(),
            start,
            "Initialized month pager"
        );
        MonthPager {
            months,
            window,
            start,
            home: start,
        }
    }

    pub(crate) fn start(&self) -> usize {
        self.start
    }

    pub(crate) fn total_months(&self) -> usize {
        self.months.len()
    }

    pub(crate) fn max_start(&self) -> usize {
        self.total_months().saturating_sub(self.window.months())
    }

    pub(crate) fn has_prev(&self) -> bool {
        self.start > 0
    }

    pub(crate) fn has_next(&self) -> bool {
        self.start < self.max_start()
    }

    pub(crate) fn next(&mut self) -> Result<(), OutOfRangeError> {
        if self.has_next() {
            self.start += 1;
            tracing::debug!(start = self.start, "Paged forwards");
            Ok(())
        } else {
            Err(OutOfRangeError)
        }
    }

    pub(crate) fn prev(&mut self) -> Result<(), OutOfRangeError> {
        if self.has_prev() {
            self.start -= 1;
            tracing::debug!(start = self.start, "Paged backwards");
            Ok(())
        } else {
            Err(OutOfRangeError)
        }
    }

    /// Return to the page chosen at construction
    pub(crate) fn reset(&mut self) {
        self.start = self.home;
    }

    pub(crate) fn current_window(&self) -> &[YearMonth] {
        let end = (self.start + self.window.months()).min(self.months.len());
        self.months.get(self.start..end).unwrap_or_default()
    }

    pub(crate) fn range_label(&self) -> String {
        match (self.window, self.current_window()) {
            (_, []) => String::new(),
            (WindowSize::Single, [first, ..]) | (_, [first]) => first.to_string(),
            (WindowSize::Double, [first, .., last]) => format!("{first} – {last}"),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("no more months in the visible range")]
pub(crate) struct OutOfRangeError;

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn ym(year: i32, month: Month) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn window(pager: &MonthPager) -> Vec<YearMonth> {
        pager.current_window().to_vec()
    }

    #[test]
    fn test_default_range() {
        let months = VisibleRange::default().months();
        assert_eq!(months.len(), 14);
        assert_eq!(months.first(), Some(&ym(2025, Month::March)));
        assert_eq!(months.last(), Some(&ym(2026, Month::April)));
    }

    #[test]
    fn test_empty_range() {
        assert!(VisibleRange::new(ym(2026, Month::April), ym(2025, Month::March)).is_err());
        let one = VisibleRange::new(ym(2025, Month::May), ym(2025, Month::May)).unwrap();
        assert_eq!(one.months(), [ym(2025, Month::May)]);
    }

    #[test]
    fn test_walkthrough() {
        let mut pager = MonthPager::new(
            VisibleRange::default(),
            WindowSize::Double,
            date!(2025 - 12 - 16),
        );
        assert_eq!(
            window(&pager),
            [ym(2025, Month::December), ym(2026, Month::January)]
        );
        assert_eq!(pager.range_label(), "December 2025 – January 2026");
        assert_eq!(pager.next(), Ok(()));
        assert_eq!(
            window(&pager),
            [ym(2026, Month::January), ym(2026, Month::February)]
        );
        while pager.next().is_ok() {}
        assert_eq!(pager.start(), 12);
        assert_eq!(pager.max_start(), 12);
        assert_eq!(
            window(&pager),
            [ym(2026, Month::March), ym(2026, Month::April)]
        );
        assert!(!pager.has_next());
        assert!(pager.has_prev());
        assert_eq!(pager.next(), Err(OutOfRangeError));
        assert_eq!(pager.start(), 12);
        pager.reset();
        assert_eq!(pager.start(), 9);
    }

    #[test]
    fn test_prev_at_start() {
        let mut pager = MonthPager::new(
            VisibleRange::default(),
            WindowSize::Single,
            date!(2025 - 03 - 01),
        );
        assert_eq!(pager.start(), 0);
        assert!(!pager.has_prev());
        assert_eq!(pager.prev(), Err(OutOfRangeError));
        assert_eq!(pager.start(), 0);
        assert_eq!(pager.range_label(), "March 2025");
    }

    #[test]
    fn test_today_before_range() {
        let pager = MonthPager::new(
            VisibleRange::default(),
            WindowSize::Double,
            date!(2024 - 12 - 31),
        );
        assert_eq!(pager.start(), 0);
    }

    #[test]
    fn test_today_after_range() {
        for (size, max_start) in [(WindowSize::Single, 13), (WindowSize::Double, 12)] {
            let pager = MonthPager::new(VisibleRange::default(), size, date!(2026 - 10 - 16));
            assert_eq!(pager.start(), max_start);
            assert_eq!(pager.max_start(), max_start);
        }
    }

    #[test]
    fn test_today_in_last_month_is_clamped() {
        let pager = MonthPager::new(
            VisibleRange::default(),
            WindowSize::Double,
            date!(2026 - 04 - 05),
        );
        assert_eq!(pager.start(), 12);
        assert_eq!(
            window(&pager),
            [ym(2026, Month::March), ym(2026, Month::April)]
        );
        let pager = MonthPager::new(
            VisibleRange::default(),
            WindowSize::Single,
            date!(2026 - 04 - 05),
        );
        assert_eq!(pager.start(), 13);
        assert_eq!(window(&pager), [ym(2026, Month::April)]);
    }

    #[test]
    fn test_single_month_range_double_window() {
        let range = VisibleRange::new(ym(2025, Month::May), ym(2025, Month::May)).unwrap();
        let mut pager = MonthPager::new(range, WindowSize::Double, date!(2025 - 05 - 10));
        assert_eq!(pager.max_start(), 0);
        assert_eq!(window(&pager), [ym(2025, Month::May)]);
        assert_eq!(pager.range_label(), "May 2025");
        assert!(pager.next().is_err());
        assert!(pager.prev().is_err());
    }

    #[test]
    fn test_window_never_leaves_range() {
        for size in [WindowSize::Single, WindowSize::Double] {
            let mut pager = MonthPager::new(VisibleRange::default(), size, date!(2025 - 08 - 01));
            for step in 0..40 {
                let _ = if step % 3 == 0 {
                    pager.prev()
                } else {
                    pager.next()
                };
                assert!(pager.start() <= pager.max_start());
                assert!(pager.start() + size.months() <= pager.total_months());
                assert_eq!(pager.current_window().len(), size.months());
            }
        }
    }
}

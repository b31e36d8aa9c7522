use super::util::{YearMonth, DAYS_IN_WEEK};
use crate::events::{Category, Event, EventSource};
use time::Date;

/// Most category badges shown under a single day
pub(crate) const MAX_BADGES: usize = 4;

pub(crate) static WEEKDAY_LABELS: [&str; DAYS_IN_WEEK as usize] =
    ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayCell<'a> {
    pub(crate) date: Date,
    pub(crate) events: &'a [Event],
    pub(crate) badges: Vec<Category>,
}

impl<'a> DayCell<'a> {
    pub(crate) fn new<S: EventSource>(date: Date, source: &'a S) -> DayCell<'a> {
        let events = source.events_on(date);
        DayCell {
            date,
            events,
            badges: badges(events),
        }
    }
}

impl DayCell<'_> {
    pub(crate) fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

/// The distinct categories of `events` in order of first appearance, capped
/// at [`MAX_BADGES`]
pub(crate) fn badges(events: &[Event]) -> Vec<Category> {
    let mut cats = Vec::with_capacity(MAX_BADGES);
    for ev in events {
        if cats.len() == MAX_BADGES {
            break;
        }
        if !cats.contains(&ev.category) {
            cats.push(ev.category);
        }
    }
    cats
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum GridCell<'a> {
    Blank,
    Day(DayCell<'a>),
}

impl<'a> GridCell<'a> {
    pub(crate) fn as_day(&self) -> Option<&DayCell<'a>> {
        match self {
            GridCell::Blank => None,
            GridCell::Day(cell) => Some(cell),
        }
    }
}

/// The cells of one month laid out in Monday-first weeks.  Blank cells pad
/// the first week up to the 1st; the last week is not padded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid<'a> {
    month: YearMonth,
    cells: Vec<GridCell<'a>>,
}

impl<'a> MonthGrid<'a> {
    pub(crate) fn build<S: EventSource>(month: YearMonth, source: &'a S) -> MonthGrid<'a> {
        let blanks = usize::from(month.leading_blanks());
        let mut cells = Vec::with_capacity(blanks + usize::from(month.days_in_month()));
        cells.resize(blanks, GridCell::Blank);
        cells.extend(month.days().map(|d| GridCell::Day(DayCell::new(d, source))));
        MonthGrid { month, cells }
    }

    pub(crate) fn days(&self) -> impl Iterator<Item = &DayCell<'a>> {
        self.cells.iter().filter_map(GridCell::as_day)
    }
}

impl MonthGrid<'_> {
    pub(crate) fn title(&self) -> String {
        self.month.to_string()
    }
}

#[cfg(test)]
impl<'a> MonthGrid<'a> {
    fn cells(&self) -> &[GridCell<'a>] {
        &self.cells
    }

    fn leading_blanks(&self) -> usize {
        self.cells
            .iter()
            .take_while(|c| matches!(c, GridCell::Blank))
            .count()
    }

    /// Number of (possibly partial) weeks the month spans
    fn weeks(&self) -> usize {
        self.cells.len().div_ceil(usize::from(DAYS_IN_WEEK))
    }
}

/// Zero-based `(week, weekday)` position of `date` within its month's grid
pub(crate) fn grid_position(date: Date) -> (u16, u16) {
    let i = u16::from(YearMonth::of(date).leading_blanks()) + u16::from(date.day()) - 1;
    let width = u16::from(DAYS_IN_WEEK);
    (i / width, i % width)
}

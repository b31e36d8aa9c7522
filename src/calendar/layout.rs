use super::month::grid_position;
use super::util::YearMonth;
use crate::events::Category;
use ratatui::layout::{Position, Rect};
use time::Date;

/// Number of columns per day of week
pub(crate) const DAY_WIDTH: u16 = 5;

/// Width of a single day cell: two digits of day number plus brackets, or up
/// to four badges
pub(crate) const CELL_WIDTH: u16 = 4;

/// Number of lines per week: the day numbers and the badges beneath them
pub(crate) const WEEK_LINES: u16 = 2;

const MAX_WEEKS: u16 = 6;

/// Month title plus weekday header
pub(crate) const MONTH_HEADER_LINES: u16 = 2;

pub(crate) const MONTH_WIDTH: u16 = DAY_WIDTH * 6 + CELL_WIDTH;

pub(crate) const MONTH_HEIGHT: u16 = MONTH_HEADER_LINES + MAX_WEEKS * WEEK_LINES;

/// Columns between side-by-side months
pub(crate) const MONTH_GAP: u16 = 4;

/// Columns between legend entries
const LEGEND_GAP: u16 = 2;

/// Controls row, blank line, months, blank line, and a legend that fits on
/// one row
pub(crate) const TOTAL_HEIGHT: u16 = 1 + 1 + MONTH_HEIGHT + 1 + 1;

pub(crate) static PREV_LABEL: &str = "‹ Prev";
pub(crate) static NEXT_LABEL: &str = "Next ›";

/// Width needed to show `months` months side by side
pub(crate) fn width_for(months: u16) -> u16 {
    months * MONTH_WIDTH + months.saturating_sub(1) * MONTH_GAP
}

/// Where everything in the calendar goes for a given drawing area and number
/// of visible months.  This is recomputed from the last drawn area whenever
/// it's needed, so it always matches the current page.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarLayout {
    pub(crate) controls: Rect,
    pub(crate) prev: Rect,
    pub(crate) next: Rect,
    pub(crate) label: Rect,
    pub(crate) months: Vec<(YearMonth, Rect)>,
    /// All rows the legend occupies
    pub(crate) legend: Rect,
    /// Where each legend entry (swatch, space, label) starts
    pub(crate) legend_entries: Vec<(Category, Position)>,
}

impl CalendarLayout {
    /// Returns `None` if `area` cannot hold even a single month, in which case
    /// nothing is drawn
    pub(crate) fn new(area: Rect, months: &[YearMonth]) -> Option<CalendarLayout> {
        let qty = u16::try_from(months.len()).ok().filter(|&q| q > 0)?;
        if area.height < TOTAL_HEIGHT || area.width < MONTH_WIDTH {
            return None;
        }
        // If two months don't fit, show as many as will.
        let qty = qty.min((area.width + MONTH_GAP) / (MONTH_WIDTH + MONTH_GAP));
        let width = width_for(qty);
        let flow = flow_legend(width);
        let legend_rows = flow.last().map_or(1, |&(_, _, row)| row + 1);
        let height = TOTAL_HEIGHT - 1 + legend_rows;
        if area.height < height {
            return None;
        }
        let left = area.x + (area.width - width) / 2;
        let top = area.y + (area.height - height) / 2;
        let controls = Rect::new(left, top, width, 1);
        let prev_width = label_width(PREV_LABEL);
        let next_width = label_width(NEXT_LABEL);
        let prev = Rect::new(left, top, prev_width, 1);
        let next = Rect::new(left + width - next_width, top, next_width, 1);
        let label = Rect::new(
            left + prev_width,
            top,
            width.saturating_sub(prev_width + next_width),
            1,
        );
        let month_top = top + 2;
        let months = std::iter::zip(0u16.., months)
            .take(usize::from(qty))
            .map(|(i, &ym)| {
                let x = left + i * (MONTH_WIDTH + MONTH_GAP);
                (ym, Rect::new(x, month_top, MONTH_WIDTH, MONTH_HEIGHT))
            })
            .collect();
        let legend_top = month_top + MONTH_HEIGHT + 1;
        let legend = Rect::new(left, legend_top, width, legend_rows);
        let legend_entries = flow
            .into_iter()
            .map(|(cat, x, row)| (cat, Position::new(left + x, legend_top + row)))
            .collect();
        Some(CalendarLayout {
            controls,
            prev,
            next,
            label,
            months,
            legend,
            legend_entries,
        })
    }

    /// The area occupied by the cell for `date`, if its month is shown
    pub(crate) fn cell_rect(&self, date: Date) -> Option<Rect> {
        let &(_, area) = self.months.iter().find(|(ym, _)| ym.contains(date))?;
        let (week, wd) = grid_position(date);
        Some(Rect::new(
            area.x + wd * DAY_WIDTH,
            area.y + MONTH_HEADER_LINES + week * WEEK_LINES,
            CELL_WIDTH,
            WEEK_LINES,
        ))
    }

    pub(crate) fn hit_test(&self, pos: Position) -> Hit {
        if self.prev.contains(pos) {
            return Hit::Prev;
        }
        if self.next.contains(pos) {
            return Hit::Next;
        }
        if self.controls.contains(pos) {
            return Hit::Controls;
        }
        if self.legend.contains(pos) {
            return Hit::Legend;
        }
        for &(ym, area) in &self.months {
            if area.contains(pos) {
                let hit = ym
                    .days()
                    .find(|&d| self.cell_rect(d).is_some_and(|r| r.contains(pos)));
                return match hit {
                    Some(date) => Hit::Day(date),
                    None => Hit::Month,
                };
            }
        }
        Hit::Outside
    }
}

/// What lies under a point on the screen
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Hit {
    Day(Date),
    /// Inside a month but not on a day cell
    Month,
    Prev,
    Next,
    /// Inside the controls row but not on a button
    Controls,
    Legend,
    Outside,
}

/// Width of a legend entry: the swatch, a space, and the label
fn legend_entry_width(category: Category) -> u16 {
    2 + label_width(category.label())
}

/// Place the legend entries left to right, starting a new row whenever the
/// next entry would go past `width`.  Returns each entry's column offset and
/// row.
fn flow_legend(width: u16) -> Vec<(Category, u16, u16)> {
    let mut entries = Vec::with_capacity(Category::ALL.len());
    let mut x = 0;
    let mut row = 0;
    for cat in Category::ALL {
        let w = legend_entry_width(cat);
        if x > 0 && x + w > width {
            x = 0;
            row += 1;
        }
        entries.push((cat, x, row));
        x += w + LEGEND_GAP;
    }
    entries
}

fn label_width(s: &str) -> u16 {
    u16::try_from(s.chars().count()).unwrap_or(u16::MAX)
}

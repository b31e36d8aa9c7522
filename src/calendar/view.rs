use super::layout::{CalendarLayout, Hit};
use super::month::DayCell;
use super::pager::{MonthPager, OutOfRangeError};
use crate::events::EventSource;
use ratatui::layout::{Position, Rect};
use time::{Date, Duration};

/// Everything the calendar widget needs between frames: the pager, the event
/// source, the keyboard focus, and the area last drawn into (so that mouse
/// positions can be mapped back onto days)
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarView<S> {
    pub(super) today: Date,
    pager: MonthPager,
    source: S,
    focus: Option<Date>,
    area: Option<Rect>,
}

impl<S: EventSource> CalendarView<S> {
    pub(crate) fn new(today: Date, pager: MonthPager, source: S) -> Self {
        CalendarView {
            today,
            pager,
            source,
            focus: None,
            area: None,
        }
    }

    pub(crate) fn pager(&self) -> &MonthPager {
        &self.pager
    }

    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    pub(crate) fn focus(&self) -> Option<Date> {
        self.focus
    }

    pub(super) fn set_area(&mut self, area: Rect) {
        self.area = Some(area);
    }

    pub(crate) fn layout(&self) -> Option<CalendarLayout> {
        CalendarLayout::new(self.area?, self.pager.current_window())
    }

    pub(crate) fn cell(&self, date: Date) -> DayCell<'_> {
        DayCell::new(date, &self.source)
    }

    pub(crate) fn is_visible(&self, date: Date) -> bool {
        self.pager
            .current_window()
            .iter()
            .any(|ym| ym.contains(date))
    }

    pub(crate) fn hit_test(&self, pos: Position) -> Hit {
        self.layout().map_or(Hit::Outside, |l| l.hit_test(pos))
    }

    pub(crate) fn cell_rect(&self, date: Date) -> Option<Rect> {
        self.layout()?.cell_rect(date)
    }

    pub(crate) fn next_page(&mut self) -> Result<(), OutOfRangeError> {
        self.pager.next()?;
        self.refocus();
        Ok(())
    }

    pub(crate) fn prev_page(&mut self) -> Result<(), OutOfRangeError> {
        self.pager.prev()?;
        self.refocus();
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.pager.reset();
        self.refocus();
    }

    /// Move the keyboard focus by `days` days, staying within the visible
    /// months.  If nothing is focused yet, today (or, if today isn't visible,
    /// the first visible day) receives the focus instead.  Returns `false` if
    /// the focus could not move.
    pub(crate) fn move_focus(&mut self, days: i64) -> bool {
        let Some(current) = self.focus else {
            self.focus = self.default_focus();
            return self.focus.is_some();
        };
        match current.checked_add(Duration::days(days)) {
            Some(d) if self.is_visible(d) => {
                self.focus = Some(d);
                true
            }
            _ => false,
        }
    }

    /// After paging, a focused day moves to the first day of the new window
    fn refocus(&mut self) {
        if self.focus.is_some() {
            self.focus = self.first_visible_day();
        }
    }

    fn default_focus(&self) -> Option<Date> {
        if self.is_visible(self.today) {
            Some(self.today)
        } else {
            self.first_visible_day()
        }
    }

    fn first_visible_day(&self) -> Option<Date> {
        self.pager.current_window().first().map(|ym| ym.first_day())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{VisibleRange, WindowSize};
    use crate::events::EventIndex;
    use time::macros::date;

    fn view(today: Date, size: WindowSize) -> CalendarView<EventIndex> {
        let pager = MonthPager::new(VisibleRange::default(), size, today);
        CalendarView::new(today, pager, EventIndex::builtin())
    }

    #[test]
    fn test_first_focus_is_today() {
        let mut v = view(date!(2025 - 04 - 14), WindowSize::Double);
        assert_eq!(v.focus(), None);
        assert!(v.move_focus(1));
        assert_eq!(v.focus(), Some(date!(2025 - 04 - 14)));
        assert!(v.move_focus(7));
        assert_eq!(v.focus(), Some(date!(2025 - 04 - 21)));
    }

    #[test]
    fn test_first_focus_today_not_visible() {
        let mut v = view(date!(2026 - 10 - 16), WindowSize::Double);
        assert!(v.move_focus(-1));
        assert_eq!(v.focus(), Some(date!(2026 - 03 - 01)));
    }

    #[test]
    fn test_focus_stays_in_window() {
        let mut v = view(date!(2025 - 04 - 14), WindowSize::Single);
        assert!(v.move_focus(0));
        assert!(!v.move_focus(-14));
        assert_eq!(v.focus(), Some(date!(2025 - 04 - 14)));
        assert!(v.move_focus(16));
        assert_eq!(v.focus(), Some(date!(2025 - 04 - 30)));
        assert!(!v.move_focus(1));
    }

    #[test]
    fn test_paging_moves_focus() {
        let mut v = view(date!(2025 - 04 - 14), WindowSize::Double);
        assert_eq!(v.next_page(), Ok(()));
        assert_eq!(v.focus(), None);
        assert!(v.move_focus(1));
        assert_eq!(v.focus(), Some(date!(2025 - 05 - 01)));
        assert_eq!(v.prev_page(), Ok(()));
        assert_eq!(v.focus(), Some(date!(2025 - 04 - 01)));
        v.reset();
        assert_eq!(v.pager().start(), 1);
    }

    #[test]
    fn test_no_area_no_hits() {
        let v = view(date!(2025 - 04 - 14), WindowSize::Double);
        assert_eq!(v.hit_test(Position::new(10, 8)), Hit::Outside);
        assert_eq!(v.cell_rect(date!(2025 - 04 - 14)), None);
    }

    #[test]
    fn test_hit_follows_page() {
        let mut v = view(date!(2025 - 04 - 14), WindowSize::Double);
        v.set_area(Rect::new(0, 0, 80, 24));
        assert_eq!(
            v.hit_test(Position::new(10, 8)),
            Hit::Day(date!(2025 - 04 - 01))
        );
        assert_eq!(v.next_page(), Ok(()));
        // 2025-05-01 is a Thursday, so the second column of the first week
        // is blank in May.
        assert_eq!(v.hit_test(Position::new(10, 8)), Hit::Month);
        assert_eq!(
            v.cell_rect(date!(2025 - 05 - 01)),
            Some(Rect::new(19, 7, 4, 2))
        );
    }
}

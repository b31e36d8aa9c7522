use super::layout::{CalendarLayout, DAY_WIDTH, MONTH_WIDTH, NEXT_LABEL, PREV_LABEL};
use super::month::{MonthGrid, WEEKDAY_LABELS};
use super::view::CalendarView;
use crate::events::{Category, EventSource};
use crate::theme::{
    category_style, BASE_STYLE, CONTROL_STYLE, DISABLED_CONTROL_STYLE, FOCUS_MODIFIER,
    HAS_EVENTS_STYLE, MONTH_TITLE_STYLE, RANGE_LABEL_STYLE, WEEKDAY_STYLE,
};
use ratatui::{prelude::*, widgets::*};
use std::marker::PhantomData;

static BADGE: &str = "●";
static SWATCH: &str = "■";

/// Draws the controls row, the visible months, and the legend.  Days are
/// drawn as
///
/// ```text
///  14     <- day number, or "[14]" for today
/// ●●      <- one badge per event category on that day
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Calendar<S> {
    _data: PhantomData<S>,
}

impl<S> Calendar<S> {
    pub(crate) fn new() -> Calendar<S> {
        Calendar { _data: PhantomData }
    }
}

impl<S: EventSource> StatefulWidget for Calendar<S> {
    type State = CalendarView<S>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.set_area(area);
        let Some(layout) = state.layout() else {
            return;
        };
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_controls(&layout, state);
        for &(ym, month_area) in &layout.months {
            let grid = MonthGrid::build(ym, state.source());
            canvas.draw_month_header(month_area, &grid.title());
            for cell in grid.days() {
                let Some(rect) = layout.cell_rect(cell.date) else {
                    continue;
                };
                let mut style = if cell.has_events() {
                    HAS_EVENTS_STYLE
                } else {
                    BASE_STYLE
                };
                if state.focus() == Some(cell.date) {
                    style = style.add_modifier(FOCUS_MODIFIER);
                }
                let s = if cell.date == state.today {
                    format!("[{:2}]", cell.date.day())
                } else {
                    format!(" {:2} ", cell.date.day())
                };
                canvas.mvprint(rect.y, rect.x, s, style);
                for (x, &cat) in std::iter::zip(rect.x.., &cell.badges) {
                    canvas.mvprint(rect.y + 1, x, BADGE, BASE_STYLE.patch(category_style(cat)));
                }
            }
        }
        let mut legend = BufferCanvas::new(layout.legend.intersection(area), buf);
        legend.draw_legend(&layout.legend_entries);
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }
}

impl BufferCanvas<'_> {
    fn draw_controls<S: EventSource>(&mut self, layout: &CalendarLayout, view: &CalendarView<S>) {
        let pager = view.pager();
        self.mvprint(
            layout.prev.y,
            layout.prev.x,
            PREV_LABEL,
            if pager.has_prev() {
                CONTROL_STYLE
            } else {
                DISABLED_CONTROL_STYLE
            },
        );
        self.mvprint(
            layout.next.y,
            layout.next.x,
            NEXT_LABEL,
            if pager.has_next() {
                CONTROL_STYLE
            } else {
                DISABLED_CONTROL_STYLE
            },
        );
        let label = pager.range_label();
        let x = layout.label.x + layout.label.width.saturating_sub(text_width(&label)) / 2;
        self.mvprint(layout.label.y, x, label, RANGE_LABEL_STYLE);
    }

    fn draw_month_header(&mut self, month_area: Rect, title: &str) {
        let x = month_area.x + MONTH_WIDTH.saturating_sub(text_width(title)) / 2;
        self.mvprint(month_area.y, x, title, MONTH_TITLE_STYLE);
        for (x, wd) in std::iter::zip((month_area.x..).step_by(DAY_WIDTH.into()), WEEKDAY_LABELS) {
            self.mvprint(month_area.y + 1, x, wd, WEEKDAY_STYLE);
        }
    }

    fn draw_legend(&mut self, entries: &[(Category, Position)]) {
        for &(cat, pos) in entries {
            self.mvprint(pos.y, pos.x, SWATCH, BASE_STYLE.patch(category_style(cat)));
            self.mvprint(pos.y, pos.x + 2, cat.label(), BASE_STYLE);
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        if self.area.contains(Position::new(x, y)) {
            let text = Text::styled(s.as_ref(), style);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x,
                    y,
                    width: (self.area.right() - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }
}

fn text_width(s: &str) -> u16 {
    u16::try_from(Line::raw(s).width()).unwrap_or(u16::MAX)
}

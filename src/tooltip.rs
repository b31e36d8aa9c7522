use crate::calendar::DayCell;
use crate::events::Category;
use crate::theme::{category_style, TOOLTIP_STYLE, TOOLTIP_TITLE_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Position, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};
use time::Date;

/// Distance between the anchor point and the nearest edge of the tooltip
const PAD: u16 = 1;

/// Closest the tooltip may come to the edges of the screen
const EDGE_MARGIN: u16 = 1;

static SWATCH: &str = "■ ";

/// The single floating panel describing the events on one day.  At most one
/// day's events are shown at a time; showing another day replaces the
/// content.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Tooltip {
    shown: Option<Shown>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Shown {
    date: Date,
    heading: String,
    items: Vec<(Category, String)>,
    anchor: Position,
}

impl Tooltip {
    pub(crate) fn new() -> Tooltip {
        Tooltip::default()
    }

    pub(crate) fn is_shown(&self) -> bool {
        self.shown.is_some()
    }

    /// The date whose events are currently shown
    pub(crate) fn shown_for(&self) -> Option<Date> {
        self.shown.as_ref().map(|s| s.date)
    }

    /// Show the events of `cell` next to `anchor`.  Cells without events are
    /// ignored.
    pub(crate) fn show(&mut self, cell: &DayCell<'_>, anchor: Position) {
        if !cell.has_events() {
            return;
        }
        let date = cell.date;
        self.shown = Some(Shown {
            date,
            heading: format!(" {} {} {} ", date.day(), date.month(), date.year()),
            items: cell
                .events
                .iter()
                .map(|ev| (ev.category, ev.title.clone()))
                .collect(),
            anchor,
        });
    }

    pub(crate) fn hide(&mut self) {
        self.shown = None;
    }

    /// A click on `cell` closes the tooltip if it is open for that same cell
    /// and otherwise (re)opens it there
    pub(crate) fn click(&mut self, cell: &DayCell<'_>, anchor: Position) {
        if self.shown_for() == Some(cell.date) {
            self.hide();
        } else {
            self.show(cell, anchor);
        }
    }

    /// Where the tooltip would be drawn within `viewport`, if shown
    pub(crate) fn area(&self, viewport: Rect) -> Option<Rect> {
        let shown = self.shown.as_ref()?;
        let text = shown.text();
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .max(label_width(&shown.heading))
            .saturating_add(2);
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        Some(place(shown.anchor, width, height, viewport))
    }
}

impl Shown {
    fn text(&self) -> Text<'_> {
        self.items
            .iter()
            .map(|(cat, title)| {
                Line::from_iter([
                    Span::styled(SWATCH, category_style(*cat)),
                    Span::styled(format!("{}: ", cat.label()), TOOLTIP_TITLE_STYLE),
                    Span::raw(title.as_str()),
                ])
            })
            .collect()
    }
}

impl Widget for &Tooltip {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(shown) = self.shown.as_ref() else {
            return;
        };
        let Some(tip_area) = self.area(area) else {
            return;
        };
        let tip_area = tip_area.intersection(area);
        Clear.render(tip_area, buf);
        Paragraph::new(shown.text())
            .block(
                Block::bordered()
                    .title(Line::styled(shown.heading.as_str(), TOOLTIP_TITLE_STYLE))
                    .title_alignment(Alignment::Left),
            )
            .style(TOOLTIP_STYLE)
            .render(tip_area, buf);
    }
}

/// Position a `width`×`height` box below and to the right of `anchor`,
/// flipping it to the other side of the anchor on an axis where it would
/// overflow `viewport`, and keeping it at least [`EDGE_MARGIN`] from the top
/// and left edges
pub(crate) fn place(anchor: Position, width: u16, height: u16, viewport: Rect) -> Rect {
    let x = flip(anchor.x, width, viewport.x, viewport.right());
    let y = flip(anchor.y, height, viewport.y, viewport.bottom());
    let width = width.min(viewport.right().saturating_sub(x));
    let height = height.min(viewport.bottom().saturating_sub(y));
    Rect::new(x, y, width, height)
}

fn flip(anchor: u16, size: u16, low: u16, high: u16) -> u16 {
    let mut pos = anchor.saturating_add(PAD);
    if pos.saturating_add(size) > high.saturating_sub(EDGE_MARGIN) {
        pos = anchor.saturating_sub(size).saturating_sub(PAD);
    }
    pos.max(low.saturating_add(EDGE_MARGIN))
}

fn label_width(s: &str) -> u16 {
    u16::try_from(Line::raw(s).width()).unwrap_or(u16::MAX)
}

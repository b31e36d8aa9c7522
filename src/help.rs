use crate::theme::TOOLTIP_TITLE_STYLE;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Padding, Paragraph, Widget},
};

/// Key bindings and what they do, in the order shown
static KEYS: &[(&str, &str)] = &[
    ("h, LEFT", "Focus the previous day"),
    ("l, RIGHT", "Focus the next day"),
    ("k, UP", "Focus the same day last week"),
    ("j, DOWN", "Focus the same day next week"),
    ("ENTER, SPACE", "Show/hide the focused day's events"),
    ("p, PAGE UP", "Previous page"),
    ("n, PAGE DOWN", "Next page"),
    ("0, HOME", "Back to the first page shown"),
    ("ESC", "Hide event details"),
    ("?", "Show this help"),
    ("q", "Quit"),
];

static FOOTER: &[&str] = &[
    "",
    "Point at or click a marked day to see its events.",
    "Press the Any Key to dismiss.",
];

const KEY_COLUMN: usize = 16;

/// Overlay listing the key bindings, centred over the calendar
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Help {
    fn text(self) -> Text<'static> {
        let keys = KEYS.iter().map(|&(keys, action)| {
            Line::from_iter([
                Span::styled(format!("{keys:KEY_COLUMN$}"), TOOLTIP_TITLE_STYLE),
                Span::raw(action),
            ])
        });
        keys.chain(FOOTER.iter().map(|&s| Line::raw(s))).collect()
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.text();
        // Border plus one column of padding on each side
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .saturating_add(4);
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let help_area = centered(area, width, height);
        Clear.render(help_area, buf);
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Keys ")
                    .title_alignment(Alignment::Center)
                    .padding(Padding::horizontal(1)),
            )
            .style(self.0)
            .render(help_area, buf);
    }
}

/// A `width`×`height` rectangle in the middle of `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

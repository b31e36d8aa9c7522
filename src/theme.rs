use crate::events::Category;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const MONTH_TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const HAS_EVENTS_STYLE: Style = BASE_STYLE
    .add_modifier(Modifier::BOLD)
    .add_modifier(Modifier::UNDERLINED);

pub(crate) const FOCUS_MODIFIER: Modifier = Modifier::REVERSED;

pub(crate) const RANGE_LABEL_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const CONTROL_STYLE: Style = BASE_STYLE.fg(Color::LightCyan);

pub(crate) const DISABLED_CONTROL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const TOOLTIP_STYLE: Style = Style::new().fg(Color::White).bg(Color::DarkGray);

pub(crate) const TOOLTIP_TITLE_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);

pub(crate) const fn category_style(category: Category) -> Style {
    let color = match category {
        Category::Term => Color::LightCyan,
        Category::Holiday => Color::LightRed,
        Category::Event | Category::Info => Color::LightGreen,
        Category::ParentMeeting => Color::LightMagenta,
        Category::Exam => Color::Yellow,
    };
    Style::new().fg(color)
}

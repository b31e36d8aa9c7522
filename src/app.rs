use crate::calendar::{Calendar, CalendarView, Hit};
use crate::events::EventSource;
use crate::help::Help;
use crate::theme::BASE_STYLE;
use crate::tooltip::Tooltip;
use crossterm::event::{
    read, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Position, Rect},
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::Date;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<S> {
    view: CalendarView<S>,
    tooltip: Tooltip,
    /// The day with events currently under the mouse pointer
    hovered: Option<Date>,
    state: AppState,
}

impl<S: EventSource> App<S> {
    pub(crate) fn new(view: CalendarView<S>) -> App<S> {
        App {
            view,
            tooltip: Tooltip::new(),
            hovered: None,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if !self.handle_event(read()?) {
            self.beep()?;
        }
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key or clicked a
    // disabled control
    fn handle_event(&mut self, event: TermEvent) -> bool {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        match event {
            TermEvent::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                    self.state = AppState::Quitting;
                    true
                } else {
                    normal_modifiers.contains(modifiers) && self.handle_key(code)
                }
            }
            TermEvent::Mouse(mouse) => self.handle_mouse(mouse),
            TermEvent::FocusLost => {
                self.tooltip.hide();
                true
            }
            // Redraw on resize, and we might as well redraw on other stuff
            // too
            _ => true,
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        if key == KeyCode::Esc {
            self.tooltip.hide();
        }
        match self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_focus(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_focus(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_focus(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_focus(7),
                KeyCode::Enter | KeyCode::Char(' ') => self.click_focused(),
                KeyCode::Char('n') | KeyCode::PageDown => self.next_page(),
                KeyCode::Char('p') | KeyCode::PageUp => self.prev_page(),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.reset();
                    true
                }
                KeyCode::Esc => true,
                KeyCode::Char('q') => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if self.state != AppState::Calendar {
            return true;
        }
        let pos = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => {
                self.pointer_moved(pos);
                true
            }
            MouseEventKind::Down(MouseButton::Left) => self.pointer_clicked(pos),
            _ => true,
        }
    }

    fn pointer_moved(&mut self, pos: Position) {
        let over = match self.view.hit_test(pos) {
            Hit::Day(date) if self.view.cell(date).has_events() => Some(date),
            _ => None,
        };
        if self.hovered.is_some() && self.hovered != over {
            self.tooltip.hide();
        }
        if let Some(date) = over {
            self.tooltip.show(&self.view.cell(date), pos);
        }
        self.hovered = over;
    }

    fn pointer_clicked(&mut self, pos: Position) -> bool {
        match self.view.hit_test(pos) {
            Hit::Day(date) => {
                let cell = self.view.cell(date);
                if cell.has_events() {
                    self.tooltip.click(&cell, pos);
                }
                true
            }
            Hit::Prev => self.prev_page(),
            Hit::Next => self.next_page(),
            Hit::Month | Hit::Controls | Hit::Legend => true,
            Hit::Outside => {
                self.tooltip.hide();
                true
            }
        }
    }

    fn move_focus(&mut self, days: i64) -> bool {
        let before = self.view.focus();
        if !self.view.move_focus(days) {
            return false;
        }
        if before.is_some() {
            self.tooltip.hide();
        }
        self.show_focused();
        true
    }

    /// Show the tooltip at the centre of the focused cell, if it has events
    fn show_focused(&mut self) {
        if let Some(date) = self.view.focus() {
            let cell = self.view.cell(date);
            if let Some(rect) = self.view.cell_rect(date) {
                self.tooltip.show(&cell, center(rect));
            }
        }
    }

    fn click_focused(&mut self) -> bool {
        let Some(date) = self.view.focus() else {
            return false;
        };
        let cell = self.view.cell(date);
        match self.view.cell_rect(date) {
            Some(rect) if cell.has_events() => {
                self.tooltip.click(&cell, center(rect));
                true
            }
            _ => false,
        }
    }

    fn next_page(&mut self) -> bool {
        let r = self.view.next_page().is_ok();
        if r {
            self.page_changed();
        }
        r
    }

    fn prev_page(&mut self) -> bool {
        let r = self.view.prev_page().is_ok();
        if r {
            self.page_changed();
        }
        r
    }

    fn reset(&mut self) {
        self.view.reset();
        self.page_changed();
    }

    // The day the tooltip describes may no longer be on screen, while the
    // focus has moved to the first day of the new window
    fn page_changed(&mut self) {
        self.tooltip.hide();
        self.hovered = None;
        self.show_focused();
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl<S: EventSource> Widget for &mut App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let cal = Calendar::<S>::new();
        cal.render(area, buf, &mut self.view);
        self.tooltip.render(area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Quitting,
}

fn center(rect: Rect) -> Position {
    Position::new(rect.x + rect.width / 2, rect.y + rect.height / 2)
}

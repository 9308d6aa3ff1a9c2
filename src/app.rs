//! Top-level application model.
//!
//! Owns the countdown engine and the quote popup, routes messages between
//! them, applies the click debounce rule, and composes the final view:
//! countdown centered in the viewport, quit hint on the bottom row, popup
//! overlaid at its computed placement when visible.

use crate::config::Settings;
use crate::countdown;
use crate::popup;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, MouseMsg, Msg, WindowSizeMsg};
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use once_cell::sync::OnceCell;
use unicode_width::UnicodeWidthStr;

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Hands the resolved settings to the framework's argument-less
/// [`Model::init`](BubbleTeaModel::init). Call once, before the program
/// starts; later calls are ignored.
pub fn set_settings(settings: Settings) {
    let _ = SETTINGS.set(settings);
}

const HINT: &str = "click anywhere for a boost • q quits";

/// The coordinator model: one instance owns all application state.
#[derive(Debug)]
pub struct App {
    countdown: countdown::Model,
    popup: popup::Model,
    viewport: (u16, u16),
    hint: Style,
}

impl App {
    /// Builds the coordinator from resolved settings: components are
    /// constructed (the engine evaluates immediately) and the recurring
    /// tick is armed.
    pub fn with_settings(settings: Settings) -> (Self, Option<Cmd>) {
        let countdown = countdown::Model::new(settings.target);
        let popup = popup::Model::new(settings.quotes);
        let cmd = countdown.init();
        let app = Self {
            countdown,
            popup,
            viewport: (80, 24),
            hint: Style::new().foreground(Color::from("241")),
        };
        (app, cmd)
    }

    /// Read access to the countdown engine.
    pub fn countdown(&self) -> &countdown::Model {
        &self.countdown
    }

    /// Read access to the popup controller.
    pub fn popup(&self) -> &popup::Model {
        &self.popup
    }

    /// Handles a left click at (`x`, `y`).
    ///
    /// While a quote is on screen the trigger is suppressed entirely, so
    /// clicking the popup or rapid re-clicks cannot restart the cycle; a
    /// fresh click once hidden shows the next quote anchored at the click.
    pub fn click(&mut self, x: u16, y: u16) -> Option<Cmd> {
        if self.popup.is_visible() {
            return None;
        }
        self.popup.show(Some((x, y)))
    }
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        let settings = SETTINGS.get().cloned().unwrap_or_default();
        Self::with_settings(settings)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.viewport = (size.width as u16, size.height as u16);
            // Fall through so the popup records the new viewport too.
        }

        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            match key.key {
                KeyCode::Char('q') | KeyCode::Esc => return Some(bubbletea_rs::quit()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Some(bubbletea_rs::quit())
                }
                _ => {}
            }
        }

        if let Some(mouse) = msg.downcast_ref::<MouseMsg>() {
            if matches!(mouse.button, MouseEventKind::Down(MouseButton::Left)) {
                return self.click(mouse.x as u16, mouse.y as u16);
            }
            return None;
        }

        if let Some(cmd) = self.countdown.update(&msg) {
            return Some(cmd);
        }
        self.popup.update(&msg)
    }

    fn view(&self) -> String {
        let columns = (self.viewport.0 as usize).max(20);
        let rows = (self.viewport.1 as usize).max(5);
        let mut lines = vec![String::new(); rows];

        let block = self.countdown.view();
        let block_lines: Vec<&str> = block.lines().collect();
        let top = rows.saturating_sub(block_lines.len() + 1) / 2;
        for (i, line) in block_lines.iter().enumerate() {
            if let Some(row) = lines.get_mut(top + i) {
                *row = center_line(line, columns);
            }
        }

        if UnicodeWidthStr::width(HINT) <= columns {
            if let Some(last) = lines.last_mut() {
                *last = center_line(&self.hint.render(HINT), columns);
            }
        }

        if let (Some(popup_view), Some(placement)) = (self.popup.view(), self.popup.placement()) {
            overlay(
                &mut lines,
                &popup_view,
                placement.x as usize,
                placement.y as usize,
            );
        }

        lines.join("\n")
    }
}

/// Centers a (possibly styled) line within `columns` by left padding.
fn center_line(line: &str, columns: usize) -> String {
    let width = lipgloss::width_visible(line);
    let pad = columns.saturating_sub(width) / 2;
    format!("{}{}", " ".repeat(pad), line)
}

/// Splices a rendered block over the base rows at (`x`, `y`). Overlaid rows
/// are replaced whole, which keeps the splice ANSI-safe.
fn overlay(lines: &mut [String], block: &str, x: usize, y: usize) {
    for (i, block_line) in block.lines().enumerate() {
        if let Some(row) = lines.get_mut(y + i) {
            let mut replaced = " ".repeat(x);
            replaced.push_str(block_line);
            *row = replaced;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn settings(quotes: &[&str]) -> Settings {
        Settings {
            target: datetime!(2125-01-01 00:00:00 UTC),
            quotes: quotes.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn construction_arms_the_tick() {
        let (app, cmd) = App::with_settings(settings(&["hi"]));
        assert!(cmd.is_some());
        assert!(!app.countdown().finished());
    }

    #[test]
    fn construction_with_past_target_does_not_arm() {
        let past = Settings {
            target: datetime!(2020-01-01 00:00:00 UTC),
            quotes: Vec::new(),
        };
        let (app, cmd) = App::with_settings(past);
        assert!(cmd.is_none());
        assert!(app.countdown().finished());
    }

    #[test]
    fn click_shows_then_debounces() {
        let (mut app, _) = App::with_settings(settings(&["onward"]));

        assert!(app.click(10, 10).is_some());
        assert!(app.popup().is_visible());
        let shown = app.popup().message().map(str::to_owned);

        // Second click while visible is suppressed: no new hide timer, the
        // message stays as it is.
        assert!(app.click(40, 12).is_none());
        assert_eq!(app.popup().message().map(str::to_owned), shown);
    }

    #[test]
    fn click_with_empty_quotes_stays_hidden() {
        let (mut app, _) = App::with_settings(settings(&[]));
        assert!(app.click(10, 10).is_none());
        assert!(!app.popup().is_visible());
    }

    #[test]
    fn view_shows_countdown_and_popup() {
        let (mut app, _) = App::with_settings(settings(&["onward"]));

        let view = app.view();
        assert!(view.contains(':'));

        app.click(30, 10);
        let view = app.view();
        assert!(view.contains("onward"));
    }

    #[test]
    fn view_fits_the_viewport_row_count() {
        let (app, _) = App::with_settings(settings(&["x"]));
        assert_eq!(app.view().lines().count(), 24);
    }
}

//! Quote popup controller component.
//!
//! Owns the quote set and the transient popup: picks a message uniformly at
//! random, anchors it near the triggering click (clamped inside the
//! viewport), and hides it again after a fixed delay. At most one message is
//! visible at a time; a new `show` replaces the current message and resets
//! the hide timer.
//!
//! Cancellation of a pending hide reuses the generation-token scheme the
//! tick `tag` uses elsewhere: every `show` bumps the token, and a scheduled
//! [`HideMsg`] only takes effect if its token still matches.

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg, WindowSizeMsg};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// How long a quote stays on screen.
pub const SHOW_DURATION: Duration = Duration::from_millis(3000);

/// Minimum gap kept between the popup and every viewport edge, in cells.
pub const MARGIN: u16 = 2;

/// Upper bound on the popup footprint width, in cells. The effective width
/// is the smaller of this and 80% of the viewport width.
pub const MAX_WIDTH: u16 = 40;

/// Estimated popup footprint height, in rows.
pub const HEIGHT: u16 = 5;

const DEFAULT_VIEWPORT: (u16, u16) = (80, 24);

/// One-shot message that returns the popup to its hidden state.
///
/// Scheduled by `show`; carries the instance id and the generation token
/// current at scheduling time. A token that no longer matches means a newer
/// `show` superseded this hide, and the message is ignored.
#[derive(Debug, Clone)]
pub struct HideMsg {
    id: i64,
    token: u64,
}

/// Where the popup sits on screen, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Leftmost column of the popup box.
    pub x: u16,
    /// Topmost row of the popup box.
    pub y: u16,
    /// Footprint width.
    pub width: u16,
    /// Footprint height.
    pub height: u16,
}

impl Placement {
    /// Whether the cell at (`x`, `y`) falls inside this footprint.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone)]
struct Visible {
    message: String,
    placement: Placement,
}

/// Quote popup model.
#[derive(Debug, Clone)]
pub struct Model {
    quotes: Vec<String>,
    viewport: (u16, u16),
    visible: Option<Visible>,
    token: u64,
    duration: Duration,
    id: i64,
    /// Style of the popup box.
    pub style: Style,
}

/// Clamps one axis of the footprint position: center it on `center`, then
/// keep it at least `margin` away from both edges. When the footprint does
/// not fit, the near edge wins.
fn clamp_axis(center: i32, extent: i32, bound: i32, margin: i32) -> i32 {
    let pos = center - extent / 2;
    pos.min(bound - extent - margin).max(margin)
}

impl Model {
    /// Creates a popup controller over `quotes`.
    ///
    /// Quotes are stored verbatim; an empty set makes [`show`](Self::show)
    /// a permanent no-op.
    pub fn new(quotes: Vec<String>) -> Self {
        Self {
            quotes,
            viewport: DEFAULT_VIEWPORT,
            visible: None,
            token: 0,
            duration: SHOW_DURATION,
            id: next_id(),
            style: Style::new()
                .border_style(lipgloss::rounded_border())
                .border_top(true)
                .border_bottom(true)
                .border_left(true)
                .border_right(true)
                .border_foreground(Color::from("212"))
                .foreground(Color::from("219"))
                .padding(1, 2, 1, 2),
        }
    }

    /// Returns the unique identifier of this popup instance.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The quote set this controller selects from.
    pub fn quotes(&self) -> &[String] {
        &self.quotes
    }

    /// Whether a quote is currently on screen.
    pub fn is_visible(&self) -> bool {
        self.visible.is_some()
    }

    /// The message currently on screen, if any.
    pub fn message(&self) -> Option<&str> {
        self.visible.as_ref().map(|v| v.message.as_str())
    }

    /// The current placement, if a quote is on screen.
    pub fn placement(&self) -> Option<Placement> {
        self.visible.as_ref().map(|v| v.placement)
    }

    /// Whether (`x`, `y`) falls inside the visible popup's footprint.
    /// Always `false` while hidden.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.placement().is_some_and(|p| p.contains(x, y))
    }

    /// Records the viewport dimensions used for placement.
    pub fn set_viewport(&mut self, columns: u16, rows: u16) {
        self.viewport = (columns, rows);
    }

    /// Shows a random quote, anchored near `origin` when given, centered
    /// otherwise.
    ///
    /// Returns the one-shot hide command, or `None` when the quote set is
    /// empty (the popup stays hidden). Calling this while a quote is
    /// already visible replaces the message and resets the hide timer; the
    /// superseded hide is invalidated by the token bump.
    pub fn show(&mut self, origin: Option<(u16, u16)>) -> Option<Cmd> {
        self.show_with_rng(origin, &mut rand::thread_rng())
    }

    /// [`show`](Self::show) with an explicit random source.
    pub fn show_with_rng<R: Rng + ?Sized>(
        &mut self,
        origin: Option<(u16, u16)>,
        rng: &mut R,
    ) -> Option<Cmd> {
        let message = self.quotes.choose(rng)?.clone();
        self.token = self.token.wrapping_add(1);
        let placement = self.place(origin);
        self.visible = Some(Visible { message, placement });
        Some(self.hide_cmd())
    }

    /// Computes the on-screen placement of the popup footprint.
    pub(crate) fn place(&self, origin: Option<(u16, u16)>) -> Placement {
        let (columns, rows) = self.viewport;
        let width = MAX_WIDTH.min(columns * 4 / 5).max(1);
        let height = HEIGHT;

        match origin {
            Some((ox, oy)) => Placement {
                x: clamp_axis(ox as i32, width as i32, columns as i32, MARGIN as i32) as u16,
                y: clamp_axis(oy as i32, height as i32, rows as i32, MARGIN as i32) as u16,
                width,
                height,
            },
            None => Placement {
                x: columns.saturating_sub(width) / 2,
                y: rows.saturating_sub(height) / 2,
                width,
                height,
            },
        }
    }

    /// Processes hide and window-size messages addressed to this instance.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.viewport = (size.width as u16, size.height as u16);
            return None;
        }
        if let Some(hide) = msg.downcast_ref::<HideMsg>() {
            if hide.id == self.id && hide.token == self.token {
                self.visible = None;
            }
            return None;
        }
        None
    }

    /// Renders the visible popup box, or `None` while hidden.
    pub fn view(&self) -> Option<String> {
        let visible = self.visible.as_ref()?;
        // Border adds one column per side on top of the styled width.
        let inner = visible.placement.width.saturating_sub(2).max(1);
        Some(
            self.style
                .clone()
                .width(inner as i32)
                .render(&visible.message),
        )
    }

    fn hide_cmd(&self) -> Cmd {
        let id = self.id;
        let token = self.token;
        bubbletea_tick(self.duration, move |_| {
            Box::new(HideMsg { id, token }) as Msg
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quotes(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn hide_msg(id: i64, token: u64) -> Msg {
        Box::new(HideMsg { id, token }) as Msg
    }

    #[test]
    fn empty_set_makes_show_a_no_op() {
        let mut popup = Model::new(Vec::new());
        assert!(popup.show(Some((10, 10))).is_none());
        assert!(!popup.is_visible());
    }

    #[test]
    fn single_quote_is_always_selected() {
        let mut popup = Model::new(quotes(&["Almost there!"]));
        for _ in 0..10 {
            assert!(popup.show(None).is_some());
            assert_eq!(popup.message(), Some("Almost there!"));
        }
    }

    #[test]
    fn hide_with_current_token_hides() {
        let mut popup = Model::new(quotes(&["one"]));
        popup.show(Some((10, 10)));
        assert!(popup.is_visible());

        popup.update(&hide_msg(popup.id(), popup.token));
        assert!(!popup.is_visible());
    }

    #[test]
    fn stale_hide_is_ignored_after_reshow() {
        let mut popup = Model::new(quotes(&["one", "two"]));
        popup.show(Some((10, 10)));
        let stale_token = popup.token;

        // A second show supersedes the pending hide.
        popup.show(Some((12, 12)));
        popup.update(&hide_msg(popup.id(), stale_token));
        assert!(popup.is_visible());

        // The replacement hide still works.
        popup.update(&hide_msg(popup.id(), popup.token));
        assert!(!popup.is_visible());
    }

    #[test]
    fn foreign_hide_is_ignored() {
        let mut popup = Model::new(quotes(&["one"]));
        popup.show(None);
        popup.update(&hide_msg(popup.id() + 999, popup.token));
        assert!(popup.is_visible());
    }

    #[test]
    fn reshow_replaces_message_and_resets_timer() {
        let mut popup = Model::new(quotes(&["only"]));
        popup.show(Some((5, 5)));
        let first_token = popup.token;

        let cmd = popup.show(Some((30, 10)));
        assert!(cmd.is_some());
        assert!(popup.is_visible());
        assert_ne!(popup.token, first_token);
    }

    #[test]
    fn centered_without_origin() {
        let mut popup = Model::new(quotes(&["x"]));
        popup.set_viewport(80, 24);

        let placement = popup.place(None);
        assert_eq!(placement.width, 40);
        assert_eq!(placement.x, 20);
        assert_eq!(placement.y, (24 - HEIGHT) / 2);
    }

    #[test]
    fn footprint_tracks_narrow_viewports() {
        let mut popup = Model::new(quotes(&["x"]));
        popup.set_viewport(30, 24);
        assert_eq!(popup.place(None).width, 24); // 80% of 30
    }

    #[test]
    fn origin_is_centered_then_clamped() {
        let mut popup = Model::new(quotes(&["x"]));
        popup.set_viewport(80, 24);

        // Comfortably inside: centered on the origin.
        let p = popup.place(Some((40, 12)));
        assert_eq!(p.x, 40 - p.width / 2);
        assert_eq!(p.y, 12 - HEIGHT / 2);

        // Near the left/top edges: pinned at the margin.
        let p = popup.place(Some((0, 0)));
        assert_eq!(p.x, MARGIN);
        assert_eq!(p.y, MARGIN);

        // Near the right/bottom edges: clamped against the far margin.
        let p = popup.place(Some((79, 23)));
        assert_eq!(p.x, 80 - p.width - MARGIN);
        assert_eq!(p.y, 24 - HEIGHT - MARGIN);
    }

    #[test]
    fn oversized_footprint_pins_to_near_margin() {
        let mut popup = Model::new(quotes(&["x"]));
        popup.set_viewport(10, 4);

        let p = popup.place(Some((5, 2)));
        assert_eq!(p.x, MARGIN);
        assert_eq!(p.y, MARGIN);
    }

    #[test]
    fn contains_is_false_while_hidden() {
        let popup = Model::new(quotes(&["x"]));
        assert!(!popup.contains(10, 10));
    }

    #[test]
    fn contains_tracks_the_visible_footprint() {
        let mut popup = Model::new(quotes(&["x"]));
        popup.set_viewport(80, 24);
        popup.show(Some((40, 12)));

        let p = popup.placement().unwrap();
        assert!(popup.contains(p.x, p.y));
        assert!(popup.contains(p.x + p.width - 1, p.y + p.height - 1));
        assert!(!popup.contains(p.x + p.width, p.y));
    }

    #[test]
    fn view_is_none_while_hidden() {
        let popup = Model::new(quotes(&["x"]));
        assert!(popup.view().is_none());
    }

    #[test]
    fn quotes_are_stored_verbatim() {
        let popup = Model::new(quotes(&["a", "b", "c"]));
        assert_eq!(popup.quotes(), &["a", "b", "c"]);
    }
}

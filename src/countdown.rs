//! Countdown engine component.
//!
//! Owns the target instant and the recurring one-second tick, computes the
//! remaining duration, formats it for display, and performs the one-way
//! transition into the finished state once the target instant has passed.
//!
//! # Basic Usage
//!
//! ```rust
//! use quotedown::countdown::Model;
//! use time::macros::datetime;
//!
//! let countdown = Model::new(datetime!(2030-01-01 00:00:00 UTC));
//! assert!(!countdown.finished());
//! ```
//!
//! # bubbletea-rs Integration
//!
//! The component follows the usual shape: `init()` arms the recurring tick,
//! `update()` consumes [`TickMsg`] and returns the next tick command (or
//! nothing, once finished), and `view()` renders the current readout.
//!
//! ```rust,ignore
//! fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!     if let Some(cmd) = self.countdown.update(&msg) {
//!         return Some(cmd);
//!     }
//!     None
//! }
//! ```

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use lipgloss_extras::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use time::OffsetDateTime;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generates unique identifiers for countdown instances so that tick
/// messages from one instance are never consumed by another.
fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Remaining time below this threshold puts the display into its urgent
/// visual state.
pub const URGENT_THRESHOLD_MS: i64 = 60 * MS_PER_SECOND;

const LABEL_DAYS: &str = "Days : Hours : Minutes : Seconds";
const LABEL_HOURS: &str = "Hours : Minutes : Seconds";
const LABEL_MINUTES: &str = "Minutes : Seconds";
const LABEL_FINISHED: &str = "Time's Up!";
const FINISHED_TEXT: &str = "00:00";

/// Source of the current instant. Injected so the engine can be evaluated
/// against synthetic clocks in tests.
pub type Clock = fn() -> OffsetDateTime;

/// Message sent on every engine tick to trigger a re-evaluation.
///
/// Generated by the engine's own tick command once per second. Messages
/// whose `id` does not match the receiving instance are ignored.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// The unique identifier of the engine that scheduled this tick.
    pub id: i64,
}

/// Lifecycle state of the countdown.
///
/// `Running` holds a non-negative remaining duration; `Finished` is entered
/// exactly once, when the remaining duration first goes negative, and is
/// never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Counting down; the target instant is still ahead.
    Running,
    /// The target instant has passed. Terminal.
    Finished,
}

/// A formatted countdown readout: the clock text and its unit label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readout {
    /// Zero-padded clock text, e.g. `01:00:00:00` or `59:30`.
    pub text: String,
    /// Unit label matching the width of `text`.
    pub label: &'static str,
}

/// Visual styles for the countdown display.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Clock text while more than a minute remains.
    pub display: Style,
    /// Clock text while under a minute remains.
    pub urgent: Style,
    /// Clock text once the countdown has finished.
    pub finished: Style,
    /// The unit label under the clock text.
    pub label: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            display: Style::new().bold(true).foreground(Color::from("231")),
            urgent: Style::new().bold(true).foreground(Color::from("196")),
            finished: Style::new().bold(true).foreground(Color::from("42")),
            label: Style::new().foreground(Color::from("245")),
        }
    }
}

/// Countdown engine model.
///
/// The engine performs its first evaluation immediately at construction, so
/// the initial view already shows the correct remaining time; `init()` then
/// arms the recurring one-second tick. Each tick re-evaluates against the
/// clock and re-arms itself. Once the remaining duration goes negative the
/// engine transitions to [`Phase::Finished`], stops re-arming the tick, and
/// ignores any tick still in flight.
#[derive(Debug, Clone)]
pub struct Model {
    target: OffsetDateTime,
    clock: Clock,
    interval: Duration,
    id: i64,
    phase: Phase,
    remaining_ms: i64,
    /// Visual styles, replaceable for theming.
    pub styles: Styles,
}

/// Decomposes a non-negative remaining duration into a zero-padded clock
/// readout, adapting the display width to the magnitude.
///
/// Decomposition uses floor division on millisecond boundaries: 1000 ms/s,
/// 60 s/min, 60 min/h, 24 h/day. Fields are always padded to two digits.
///
/// ```rust
/// use quotedown::countdown::format_remaining;
///
/// assert_eq!(format_remaining(86_400_000).text, "01:00:00:00");
/// assert_eq!(format_remaining(3_599_000).text, "59:59");
/// ```
pub fn format_remaining(remaining_ms: i64) -> Readout {
    let ms = remaining_ms.max(0);
    let days = ms / MS_PER_DAY;
    let hours = (ms % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;

    if days > 0 {
        Readout {
            text: format!("{:02}:{:02}:{:02}:{:02}", days, hours, minutes, seconds),
            label: LABEL_DAYS,
        }
    } else if hours > 0 {
        Readout {
            text: format!("{:02}:{:02}:{:02}", hours, minutes, seconds),
            label: LABEL_HOURS,
        }
    } else {
        Readout {
            text: format!("{:02}:{:02}", minutes, seconds),
            label: LABEL_MINUTES,
        }
    }
}

impl Model {
    /// Creates an engine counting down to `target` against the system clock.
    pub fn new(target: OffsetDateTime) -> Self {
        Self::with_clock(target, OffsetDateTime::now_utc)
    }

    /// Creates an engine with an explicit clock.
    ///
    /// The first evaluation happens here; a target already in the past
    /// yields an engine that starts out [`Phase::Finished`] and whose
    /// `init()` never arms the tick.
    pub fn with_clock(target: OffsetDateTime, clock: Clock) -> Self {
        let mut model = Self {
            target,
            clock,
            interval: Duration::from_secs(1),
            id: next_id(),
            phase: Phase::Running,
            remaining_ms: 0,
            styles: Styles::default(),
        };
        model.evaluate_at(clock());
        model
    }

    /// Returns the unique identifier of this engine instance.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The instant this engine counts down to.
    pub fn target(&self) -> OffsetDateTime {
        self.target
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the countdown has reached its terminal state.
    pub fn finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Last-computed remaining time in milliseconds (zero once finished).
    pub fn remaining_ms(&self) -> i64 {
        self.remaining_ms
    }

    /// Whether the display is in its urgent state: under a minute remains
    /// and the countdown has not finished. Finished clears urgent.
    pub fn urgent(&self) -> bool {
        self.phase == Phase::Running && self.remaining_ms < URGENT_THRESHOLD_MS
    }

    /// Arms the recurring tick, or returns `None` for an engine that was
    /// already finished at construction.
    pub fn init(&self) -> Option<Cmd> {
        match self.phase {
            Phase::Running => Some(self.tick_cmd()),
            Phase::Finished => None,
        }
    }

    /// Re-evaluates the remaining time at `now`.
    ///
    /// Returns `true` while still running. The first evaluation with a
    /// negative remaining duration performs the finished transition; the
    /// transition is one-way, and later calls are no-ops.
    pub fn evaluate_at(&mut self, now: OffsetDateTime) -> bool {
        if self.phase == Phase::Finished {
            return false;
        }
        let remaining = (self.target - now).whole_milliseconds() as i64;
        if remaining < 0 {
            self.phase = Phase::Finished;
            self.remaining_ms = 0;
            return false;
        }
        self.remaining_ms = remaining;
        true
    }

    /// Processes a [`TickMsg`] addressed to this instance.
    ///
    /// Returns the next tick command while running. Once the evaluation
    /// crosses the finished transition no command is returned, which is
    /// what cancels the recurring schedule; any stray tick arriving after
    /// that is ignored.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(tick) = msg.downcast_ref::<TickMsg>() {
            if tick.id != self.id {
                return None;
            }
            if self.phase == Phase::Finished {
                return None;
            }
            if !self.evaluate_at((self.clock)()) {
                return None;
            }
            return Some(self.tick_cmd());
        }
        None
    }

    /// The current readout: clock text plus unit label, including the fixed
    /// finished readout once the target has passed.
    pub fn readout(&self) -> Readout {
        match self.phase {
            Phase::Finished => Readout {
                text: FINISHED_TEXT.to_string(),
                label: LABEL_FINISHED,
            },
            Phase::Running => format_remaining(self.remaining_ms),
        }
    }

    /// Renders the two-line countdown block: styled clock text over the
    /// unit label.
    pub fn view(&self) -> String {
        let readout = self.readout();
        let style = match self.phase {
            Phase::Finished => &self.styles.finished,
            Phase::Running if self.urgent() => &self.styles.urgent,
            Phase::Running => &self.styles.display,
        };
        format!(
            "{}\n{}",
            style.render(&readout.text),
            self.styles.label.render(readout.label)
        )
    }

    fn tick_cmd(&self) -> Cmd {
        let id = self.id;
        bubbletea_tick(self.interval, move |_| Box::new(TickMsg { id }) as Msg)
    }
}

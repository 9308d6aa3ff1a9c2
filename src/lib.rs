#![warn(missing_docs)]

//! # quotedown
//!
//! A terminal countdown to a configurable target instant that answers mouse
//! clicks with a transient motivational quote popup, built on
//! [bubbletea-rs](https://github.com/whit3rabbit/bubbletea-rs).
//!
//! ## Overview
//!
//! Two components cooperate under a single coordinator model, each
//! following the Elm Architecture pattern with `init()`, `update()`, and
//! `view()` methods:
//!
//! - [`countdown`]: the ticking engine — remaining-time decomposition,
//!   width-adaptive formatting, the urgency flag, and the one-way finished
//!   transition.
//! - [`popup`]: the quote popup — uniform random selection,
//!   viewport-clamped placement near the click, and a 3-second auto-hide
//!   that each new show supersedes.
//!
//! [`config`] resolves the startup inputs (an RFC3339 end date and a
//! base64 quote payload) with silent fallback to defaults, and [`app`]
//! owns both components and the composed view.
//!
//! ## Quick Start
//!
//! ```rust
//! use quotedown::config::Settings;
//! use quotedown::app::App;
//!
//! let settings = Settings::resolve(Some("2031-01-01T00:00:00Z"), None);
//! let (app, _cmd) = App::with_settings(settings);
//! assert!(!app.countdown().finished());
//! ```
//!
//! Running the full program (alternate screen, mouse capture) is the
//! binary's job; see `src/main.rs`.

pub mod app;
pub mod config;
pub mod countdown;
pub mod popup;

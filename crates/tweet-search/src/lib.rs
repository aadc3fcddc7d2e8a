//! Interactive search front end.
//!
//! [`controller::Controller`] owns the displayed results and runs each search on
//! its own thread; [`tui`] is the terminal shell that drives it.

pub mod controller;
pub mod tui;

pub use controller::{Completion, Controller};

//! Terminal front end: a results list, a status line and a search input.

pub mod app;
pub mod input;
mod ui;

pub use app::{run, App};
pub use input::TextInput;

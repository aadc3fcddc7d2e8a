//! Test helpers shared by the tweet-search crates.

pub mod server;

pub use server::{MockServer, Reply};

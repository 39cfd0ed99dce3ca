//! Terminal UI for the quote form

pub mod app;
pub mod ui;

pub use app::{FormApp, Focus};

//! Application Layer
//!
//! The debounce/fetch pipeline and the form built on top of it.

pub mod debounce;
pub mod fetcher;
pub mod form;
pub mod tui;

pub use debounce::Debouncer;
pub use fetcher::{spawn_quote_pipeline, QuoteFetcher};
pub use form::QuoteForm;
pub use tui::{FormApp, Focus};

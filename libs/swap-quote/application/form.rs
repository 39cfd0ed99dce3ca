//! Two-field quote form state
//!
//! Raw field edits apply immediately; the sell amount reaches the fetcher
//! only through the debouncer. Quotes published by the fetcher are copied
//! into the buy field by [`QuoteForm::sync`], so every field mutation happens
//! on the caller's loop.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::debounce::Debouncer;
use super::fetcher::{spawn_quote_pipeline, QuoteFetcher};
use crate::domain::{AmountField, Quote, QuoteStatus};
use crate::infrastructure::client::zerox::PriceSource;
use crate::infrastructure::config::PairConfig;

pub struct QuoteForm<S> {
    sell: AmountField,
    buy: AmountField,
    debouncer: Debouncer<String>,
    fetcher: QuoteFetcher<S>,
    quotes: watch::Receiver<Option<Quote>>,
    last_quote: Option<Quote>,
    pipeline: JoinHandle<()>,
}

impl<S: PriceSource> QuoteForm<S> {
    /// Build the form and start its quote pipeline. Must be called from within a tokio runtime.
    pub fn new(source: Arc<S>, pair: PairConfig, debounce: Duration) -> Self {
        let fetcher = QuoteFetcher::new(source, pair);
        let debouncer = Debouncer::new(String::new(), debounce);
        let pipeline = spawn_quote_pipeline(debouncer.subscribe(), fetcher.clone());
        let quotes = fetcher.subscribe_quotes();

        Self {
            sell: AmountField::new(),
            buy: AmountField::new(),
            debouncer,
            fetcher,
            quotes,
            last_quote: None,
            pipeline,
        }
    }

    /// Apply an edit to the sell field. Invalid edits are dropped.
    pub fn set_sell_amount(&mut self, candidate: &str) -> bool {
        if !self.sell.try_set(candidate) {
            return false;
        }
        self.debouncer.set(self.sell.value().to_string());
        true
    }

    pub fn push_sell_char(&mut self, c: char) -> bool {
        let mut candidate = self.sell.value().to_string();
        candidate.push(c);
        self.set_sell_amount(&candidate)
    }

    pub fn pop_sell_char(&mut self) -> bool {
        let mut candidate = self.sell.value().to_string();
        if candidate.pop().is_none() {
            return false;
        }
        self.set_sell_amount(&candidate)
    }

    /// Apply an edit to the buy field. Buy edits never trigger a quote.
    pub fn set_buy_amount(&mut self, candidate: &str) -> bool {
        self.buy.try_set(candidate)
    }

    pub fn push_buy_char(&mut self, c: char) -> bool {
        self.buy.push_char(c)
    }

    pub fn pop_buy_char(&mut self) -> bool {
        self.buy.pop_char()
    }

    /// Copy a newly resolved quote into the buy field. Returns whether it changed.
    pub fn sync(&mut self) -> bool {
        if !self.quotes.has_changed().unwrap_or(false) {
            return false;
        }

        let quote = self.quotes.borrow_and_update().clone();
        let Some(quote) = quote else {
            return false;
        };

        self.buy.try_set(&quote.buy_amount);
        self.last_quote = Some(quote);
        true
    }

    /// Re-quote the current debounced amount
    pub fn revalidate(&self) -> Option<u64> {
        self.fetcher.revalidate()
    }

    pub fn sell_amount(&self) -> &str {
        self.sell.value()
    }

    pub fn buy_amount(&self) -> &str {
        self.buy.value()
    }

    pub fn status(&self) -> QuoteStatus {
        self.fetcher.status()
    }

    pub fn indicator(&self) -> &'static str {
        self.status().indicator()
    }

    pub fn last_quote(&self) -> Option<&Quote> {
        self.last_quote.as_ref()
    }

    pub fn pair(&self) -> &PairConfig {
        self.fetcher.pair()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<QuoteStatus> {
        self.fetcher.subscribe_status()
    }

    pub fn subscribe_quotes(&self) -> watch::Receiver<Option<Quote>> {
        self.fetcher.subscribe_quotes()
    }
}

impl<S> Drop for QuoteForm<S> {
    fn drop(&mut self) {
        self.pipeline.abort();
    }
}

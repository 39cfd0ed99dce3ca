//! Quote fetching driven by the debounced sell amount
//!
//! Every issued request carries a sequence number. A response is only applied
//! while its sequence number is still the latest one, so a slow response for
//! a superseded amount can never overwrite a fresher quote.

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::domain::{format_base_units, Amount, PriceRequest, PriceResponse, Quote, QuoteStatus};
use crate::infrastructure::client::zerox::{PriceSource, QuoteError};
use crate::infrastructure::config::PairConfig;

/// The amount currently being quoted
#[derive(Debug, Clone)]
struct CurrentKey {
    /// Normalised amount, "1" and "1.0" share a key
    key: String,
    amount: Amount,
    input: String,
}

#[derive(Debug, Default)]
struct FetchState {
    sequence: u64,
    current: Option<CurrentKey>,
}

pub struct QuoteFetcher<S> {
    source: Arc<S>,
    pair: Arc<PairConfig>,
    state: Arc<Mutex<FetchState>>,
    status: Arc<watch::Sender<QuoteStatus>>,
    quotes: Arc<watch::Sender<Option<Quote>>>,
}

impl<S> Clone for QuoteFetcher<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            pair: Arc::clone(&self.pair),
            state: Arc::clone(&self.state),
            status: Arc::clone(&self.status),
            quotes: Arc::clone(&self.quotes),
        }
    }
}

impl<S: PriceSource> QuoteFetcher<S> {
    pub fn new(source: Arc<S>, pair: PairConfig) -> Self {
        let (status, _) = watch::channel(QuoteStatus::Idle);
        let (quotes, _) = watch::channel(None);
        Self {
            source,
            pair: Arc::new(pair),
            state: Arc::new(Mutex::new(FetchState::default())),
            status: Arc::new(status),
            quotes: Arc::new(quotes),
        }
    }

    pub fn status(&self) -> QuoteStatus {
        *self.status.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<QuoteStatus> {
        self.status.subscribe()
    }

    /// Receiver of the most recently resolved quote
    pub fn subscribe_quotes(&self) -> watch::Receiver<Option<Quote>> {
        self.quotes.subscribe()
    }

    pub fn pair(&self) -> &PairConfig {
        &self.pair
    }

    /// Quote `amount` unless it is already the amount being quoted
    ///
    /// Non-positive or unparseable amounts put the fetcher back to idle and
    /// invalidate any request still in flight. Returns the sequence number of
    /// the issued request, if one was issued. Must be called from within a
    /// tokio runtime.
    pub fn request(&self, amount: &str) -> Option<u64> {
        let parsed = match Amount::parse(amount) {
            Ok(parsed) if parsed.is_positive() => parsed,
            _ => {
                self.go_idle();
                return None;
            }
        };

        let key = parsed.to_string();
        let mut state = self.state.lock();

        if state.current.as_ref().is_some_and(|current| current.key == key) {
            debug!("Coalesced quote request for {}", key);
            return None;
        }

        state.sequence += 1;
        let current = CurrentKey {
            key,
            amount: parsed,
            input: amount.to_string(),
        };
        state.current = Some(current.clone());
        let sequence = state.sequence;

        self.issue(current, sequence);
        Some(sequence)
    }

    /// Re-issue the request for the current amount
    pub fn revalidate(&self) -> Option<u64> {
        let mut state = self.state.lock();
        let current = state.current.clone()?;
        debug!("Revalidating quote for {}", current.key);

        state.sequence += 1;
        let sequence = state.sequence;

        self.issue(current, sequence);
        Some(sequence)
    }

    fn go_idle(&self) {
        let mut state = self.state.lock();
        if let Some(previous) = state.current.take() {
            debug!("Amount not positive, dropping request for {}", previous.key);
            state.sequence += 1;
        }
        self.status.send_if_modified(|status| {
            let changed = *status != QuoteStatus::Idle;
            *status = QuoteStatus::Idle;
            changed
        });
    }

    /// Spawn the request. Callers hold the state lock so status updates stay ordered.
    fn issue(&self, current: CurrentKey, sequence: u64) {
        let sell_amount = match current.amount.to_base_units(self.pair.decimals) {
            Ok(units) => units.to_string(),
            Err(e) => {
                error!("Quote request #{} for {} rejected: {}", sequence, current.input, e);
                self.status.send_replace(QuoteStatus::Failed);
                return;
            }
        };

        let request = PriceRequest {
            taker_address: self.pair.taker_address.clone(),
            sell_token: self.pair.sell_token.clone(),
            buy_token: self.pair.buy_token.clone(),
            sell_amount,
        };

        debug!(
            sequence = sequence,
            sell_amount = %request.sell_amount,
            "Issuing quote request"
        );
        self.status.send_replace(QuoteStatus::Validating);

        let fetcher = self.clone();
        tokio::spawn(async move {
            let result = fetcher.source.get_price(&request).await;
            fetcher.complete(sequence, current.input, result);
        });
    }

    fn complete(
        &self,
        sequence: u64,
        input: String,
        result: Result<PriceResponse, QuoteError>,
    ) {
        let state = self.state.lock();

        if state.sequence != sequence {
            debug!(
                "Discarding stale quote #{} (latest is #{})",
                sequence, state.sequence
            );
            return;
        }

        let decimals = self.pair.decimals;
        let quote = result.and_then(|response| {
            let buy_amount = format_base_units(&response.buy_amount, decimals)?;
            Ok(Quote {
                sell_amount: input.clone(),
                buy_amount,
                price: response.price,
                sequence,
                fetched_at: Utc::now(),
            })
        });

        match quote {
            Ok(quote) => {
                info!(
                    "Quote #{}: {} {} -> {} {}",
                    sequence,
                    quote.sell_amount,
                    self.pair.sell_symbol,
                    quote.buy_amount,
                    self.pair.buy_symbol
                );
                self.quotes.send_replace(Some(quote));
                self.status.send_replace(QuoteStatus::Resolved);
            }
            Err(e) => {
                error!("Quote request #{} for {} failed: {}", sequence, input, e);
                self.status.send_replace(QuoteStatus::Failed);
            }
        }
    }
}

/// Feed every debounced amount into the fetcher until the debouncer goes away
pub fn spawn_quote_pipeline<S: PriceSource>(
    mut debounced: watch::Receiver<String>,
    fetcher: QuoteFetcher<S>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let initial = debounced.borrow_and_update().clone();
        fetcher.request(&initial);

        while debounced.changed().await.is_ok() {
            let amount = debounced.borrow_and_update().clone();
            fetcher.request(&amount);
        }

        debug!("Quote pipeline stopped");
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::debounce::Debouncer;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::time::sleep;

    pub const ONE_ETH: &str = "1000000000000000000";
    pub const DAI_2500: &str = "2500000000000000000000";

    /// Price source answering from a script keyed by sell amount
    #[derive(Default)]
    pub struct ScriptedSource {
        script: Mutex<HashMap<String, (Duration, std::result::Result<String, String>)>>,
        calls: Mutex<Vec<PriceRequest>>,
    }

    impl ScriptedSource {
        pub fn respond(&self, sell_amount: &str, delay: Duration, buy_amount: &str) {
            self.script.lock().insert(
                sell_amount.to_string(),
                (delay, Ok(buy_amount.to_string())),
            );
        }

        pub fn fail(&self, sell_amount: &str, delay: Duration) {
            self.script.lock().insert(
                sell_amount.to_string(),
                (delay, Err("connection refused".to_string())),
            );
        }

        pub fn calls(&self) -> Vec<PriceRequest> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl PriceSource for ScriptedSource {
        async fn get_price(
            &self,
            request: &PriceRequest,
        ) -> std::result::Result<PriceResponse, QuoteError> {
            self.calls.lock().push(request.clone());
            let entry = self.script.lock().get(&request.sell_amount).cloned();

            let Some((delay, outcome)) = entry else {
                return Err(QuoteError::ApiError("no script entry".to_string()));
            };

            sleep(delay).await;
            outcome
                .map(|buy_amount| PriceResponse {
                    buy_amount,
                    price: None,
                    sell_amount: Some(request.sell_amount.clone()),
                    estimated_gas: None,
                    gas_price: None,
                    buy_token_address: None,
                    sell_token_address: None,
                })
                .map_err(QuoteError::ApiError)
        }
    }

    fn fetcher() -> (Arc<ScriptedSource>, QuoteFetcher<ScriptedSource>) {
        let source = Arc::new(ScriptedSource::default());
        let fetcher = QuoteFetcher::new(Arc::clone(&source), PairConfig::default());
        (source, fetcher)
    }

    async fn settle(fetcher: &QuoteFetcher<ScriptedSource>) -> QuoteStatus {
        let mut rx = fetcher.subscribe_status();
        let status = *rx.wait_for(|status| status.is_terminal()).await.unwrap();
        status
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_positive_amounts_stay_idle() {
        let (source, fetcher) = fetcher();

        for amount in ["", "0", "0.000", ".", "abc"] {
            assert_eq!(fetcher.request(amount), None);
            assert_eq!(fetcher.status(), QuoteStatus::Idle);
        }

        sleep(Duration::from_secs(1)).await;
        assert!(source.calls().is_empty());
        assert!(fetcher.subscribe_quotes().borrow().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_parameters() {
        let (source, fetcher) = fetcher();
        source.respond(ONE_ETH, Duration::from_millis(20), DAI_2500);

        assert_eq!(fetcher.request("1"), Some(1));
        assert_eq!(fetcher.status(), QuoteStatus::Validating);
        settle(&fetcher).await;

        let calls = source.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].sell_amount, "1000000000000000000");
        assert_eq!(calls[0].taker_address, PairConfig::default().taker_address);
        assert_eq!(calls[0].sell_token, PairConfig::default().sell_token);
        assert_eq!(calls[0].buy_token, PairConfig::default().buy_token);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolved_quote_is_scaled() {
        let (source, fetcher) = fetcher();
        source.respond(ONE_ETH, Duration::from_millis(20), DAI_2500);

        fetcher.request("1");
        assert_eq!(settle(&fetcher).await, QuoteStatus::Resolved);

        let quote = fetcher.subscribe_quotes().borrow().clone().unwrap();
        assert_eq!(quote.buy_amount, "2500");
        assert_eq!(quote.sell_amount, "1");
        assert_eq!(quote.sequence, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_quote() {
        let (source, fetcher) = fetcher();
        source.respond(ONE_ETH, Duration::from_millis(20), DAI_2500);
        source.fail("2000000000000000000", Duration::from_millis(20));

        fetcher.request("1");
        assert_eq!(settle(&fetcher).await, QuoteStatus::Resolved);

        fetcher.request("2");
        assert_eq!(fetcher.status(), QuoteStatus::Validating);
        assert_eq!(settle(&fetcher).await, QuoteStatus::Failed);
        assert_eq!(fetcher.status().indicator(), "Sad…");

        let quote = fetcher.subscribe_quotes().borrow().clone().unwrap();
        assert_eq!(quote.buy_amount, "2500");
        assert_eq!(quote.sell_amount, "1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let (source, fetcher) = fetcher();
        source.respond(ONE_ETH, Duration::from_millis(500), DAI_2500);
        source.respond(
            "2000000000000000000",
            Duration::from_millis(10),
            "5000000000000000000000",
        );

        fetcher.request("1");
        fetcher.request("2");
        assert_eq!(settle(&fetcher).await, QuoteStatus::Resolved);

        // Let the slow first response land
        sleep(Duration::from_secs(1)).await;

        assert_eq!(source.calls().len(), 2);
        assert_eq!(fetcher.status(), QuoteStatus::Resolved);
        let quote = fetcher.subscribe_quotes().borrow().clone().unwrap();
        assert_eq!(quote.buy_amount, "5000");
        assert_eq!(quote.sequence, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_comma_amount_stays_idle() {
        let (source, fetcher) = fetcher();
        source.respond("500000000000000000", Duration::from_millis(100), DAI_2500);

        assert_eq!(fetcher.request("0,5"), None);
        assert_eq!(fetcher.status(), QuoteStatus::Idle);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(fetcher.status(), QuoteStatus::Idle);
        assert!(source.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_comma_amount_drops_in_flight_request() {
        let (source, fetcher) = fetcher();
        source.respond(ONE_ETH, Duration::from_millis(500), DAI_2500);

        assert_eq!(fetcher.request("1"), Some(1));
        assert_eq!(fetcher.request("1,5"), None);
        assert_eq!(fetcher.status(), QuoteStatus::Idle);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(fetcher.status(), QuoteStatus::Idle);
        assert!(fetcher.subscribe_quotes().borrow().is_none());
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_key_is_coalesced() {
        let (source, fetcher) = fetcher();
        source.respond(ONE_ETH, Duration::from_millis(100), DAI_2500);

        assert_eq!(fetcher.request("1"), Some(1));
        assert_eq!(fetcher.request("1"), None);
        assert_eq!(fetcher.request("1.0"), None);
        assert_eq!(fetcher.request("01."), None);

        settle(&fetcher).await;
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_going_idle_drops_in_flight_request() {
        let (source, fetcher) = fetcher();
        source.respond(ONE_ETH, Duration::from_millis(500), DAI_2500);

        fetcher.request("1");
        fetcher.request("0");
        assert_eq!(fetcher.status(), QuoteStatus::Idle);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(fetcher.status(), QuoteStatus::Idle);
        assert!(fetcher.subscribe_quotes().borrow().is_none());

        // Coming back to the same amount issues a fresh request
        assert_eq!(fetcher.request("1"), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_revalidate_reissues_current_amount() {
        let (source, fetcher) = fetcher();
        assert_eq!(fetcher.revalidate(), None);

        source.respond(ONE_ETH, Duration::from_millis(20), DAI_2500);
        fetcher.request("1");
        settle(&fetcher).await;

        assert_eq!(fetcher.revalidate(), Some(2));
        assert_eq!(fetcher.status(), QuoteStatus::Validating);
        assert_eq!(settle(&fetcher).await, QuoteStatus::Resolved);
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unscalable_amount_fails_without_request() {
        let (source, fetcher) = fetcher();

        fetcher.request("0.0000000000000000001");
        assert_eq!(fetcher.status(), QuoteStatus::Failed);

        sleep(Duration::from_secs(1)).await;
        assert!(source.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_buy_amount_fails() {
        let (source, fetcher) = fetcher();
        source.respond(ONE_ETH, Duration::from_millis(20), "2500.5");

        fetcher.request("1");
        assert_eq!(settle(&fetcher).await, QuoteStatus::Failed);
        assert!(fetcher.subscribe_quotes().borrow().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pipeline_quotes_settled_amount_once() {
        let (source, fetcher) = fetcher();
        source.respond("1500000000000000000", Duration::from_millis(20), "3750000000000000000000");

        let mut debouncer = Debouncer::new(String::new(), Duration::from_millis(250));
        let pipeline = spawn_quote_pipeline(debouncer.subscribe(), fetcher.clone());

        for value in ["1", "1.", "1.5"] {
            debouncer.set(value.to_string());
            sleep(Duration::from_millis(50)).await;
        }
        assert!(source.calls().is_empty());

        assert_eq!(settle(&fetcher).await, QuoteStatus::Resolved);
        assert_eq!(source.calls().len(), 1);
        let quote = fetcher.subscribe_quotes().borrow().clone().unwrap();
        assert_eq!(quote.buy_amount, "3750");

        drop(debouncer);
        pipeline.await.unwrap();
    }
}

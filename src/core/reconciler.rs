//! Owns the in-memory rate snapshot and decides when it needs refreshing.
//!
//! Every [`RateReconciler::refresh`] takes a request id when it is issued.
//! A completed fetch is applied only while its id is still the latest one
//! issued, so a slow response can never overwrite the result of a call that
//! was issued after it. Dropping a refresh future cancels its HTTP request;
//! [`RateReconciler::cancel_pending`] additionally retires every id issued so
//! far so that anything still in flight is thrown away on arrival.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::error::RatesError;
use super::favorites::FavoriteCurrencySet;
use super::rates::{RateSnapshot, RatesClient, Trend};

#[derive(Default)]
struct State {
    snapshot: Option<RateSnapshot>,
    fetched_at: Option<Instant>,
    latest_issued: u64,
}

pub struct RateReconciler {
    client: Arc<dyn RatesClient>,
    max_age: Option<Duration>,
    state: RwLock<State>,
}

impl RateReconciler {
    pub fn new(client: Arc<dyn RatesClient>) -> Self {
        Self {
            client,
            max_age: None,
            state: RwLock::new(State::default()),
        }
    }

    /// Also treat a snapshot older than `max_age` as stale.
    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    #[instrument(name = "RatesRefresh", skip(self, favorites), fields(base = %base))]
    pub async fn refresh(
        &self,
        base: &str,
        favorites: &FavoriteCurrencySet,
    ) -> Result<(), RatesError> {
        let request_id = {
            let mut state = self.state.write().await;
            state.latest_issued += 1;
            state.latest_issued
        };
        let symbols = favorites.joined();
        debug!(request_id, symbols = %symbols, "Requesting fluctuation rates");

        let snapshot = self.client.fetch_fluctuation(base, &symbols).await?;

        let mut state = self.state.write().await;
        if state.latest_issued != request_id {
            warn!(
                request_id,
                latest = state.latest_issued,
                "Discarding rates from a superseded request"
            );
            return Err(RatesError::Superseded);
        }
        debug!(request_id, count = snapshot.rates.len(), "Rate snapshot replaced");
        state.snapshot = Some(snapshot);
        state.fetched_at = Some(Instant::now());
        Ok(())
    }

    /// Results of refreshes issued before this call will not be applied.
    pub async fn cancel_pending(&self) {
        let mut state = self.state.write().await;
        state.latest_issued += 1;
        debug!(latest = state.latest_issued, "Pending rate requests retired");
    }

    /// Compares key membership only; same codes with outdated values are
    /// caught by the optional max age, nothing else.
    pub async fn is_stale(&self, favorites: &FavoriteCurrencySet) -> bool {
        let state = self.state.read().await;
        let Some(snapshot) = &state.snapshot else {
            return true;
        };

        if snapshot.rates.len() != favorites.len() {
            return true;
        }
        if favorites.iter().any(|code| !snapshot.rates.contains_key(code)) {
            return true;
        }

        match (self.max_age, state.fetched_at) {
            (Some(max_age), Some(fetched_at)) => fetched_at.elapsed() > max_age,
            _ => false,
        }
    }

    /// Holding converted into `code`; 0.0 when there is no rate for it.
    pub async fn value_of(&self, code: &str, holding_amount: f64) -> f64 {
        self.state
            .read()
            .await
            .snapshot
            .as_ref()
            .map_or(0.0, |s| s.value_of(code, holding_amount))
    }

    /// A missing rate reads as no change, so it shows as [`Trend::Flat`].
    pub async fn trend_of(&self, code: &str) -> Trend {
        self.state
            .read()
            .await
            .snapshot
            .as_ref()
            .map_or(Trend::Flat, |s| s.trend_of(code))
    }

    pub async fn snapshot(&self) -> Option<RateSnapshot> {
        self.state.read().await.snapshot.clone()
    }
}

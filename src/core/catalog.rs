//! Selectable currency codes, base asset excluded.

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, instrument};

use super::error::RatesError;
use super::rates::{RatesClient, SymbolCatalogEntry};

pub struct SymbolsCatalog {
    client: Arc<dyn RatesClient>,
    base: String,
    entries: RwLock<Vec<SymbolCatalogEntry>>,
    refreshing: Mutex<()>,
}

impl SymbolsCatalog {
    pub fn new(client: Arc<dyn RatesClient>, base: &str) -> Self {
        Self {
            client,
            base: base.to_string(),
            entries: RwLock::new(Vec::new()),
            refreshing: Mutex::new(()),
        }
    }

    /// Replaces the held list with a fresh one. On failure the held list is
    /// kept and the error is returned as is.
    #[instrument(name = "SymbolsRefresh", skip(self), fields(base = %self.base))]
    pub async fn refresh(&self) -> Result<(), RatesError> {
        // Overlapping refreshes queue up behind the one in flight.
        let _guard = self.refreshing.lock().await;

        let mut fetched: Vec<SymbolCatalogEntry> = self
            .client
            .fetch_symbols()
            .await?
            .into_iter()
            .filter(|entry| entry.code != self.base)
            .collect();
        fetched.sort_by(|a, b| a.code.cmp(&b.code));
        debug!(count = fetched.len(), "Symbol catalog refreshed");

        *self.entries.write().await = fetched;
        Ok(())
    }

    /// Sorted codes; empty before the first successful refresh.
    pub async fn codes(&self) -> Vec<String> {
        self.entries
            .read()
            .await
            .iter()
            .map(|entry| entry.code.clone())
            .collect()
    }

    pub async fn entries(&self) -> Vec<SymbolCatalogEntry> {
        self.entries.read().await.clone()
    }

    pub async fn contains(&self, code: &str) -> bool {
        self.entries.read().await.iter().any(|entry| entry.code == code)
    }

    pub async fn name_of(&self, code: &str) -> Option<String> {
        self.entries
            .read()
            .await
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.name.clone())
    }
}

pub mod disk;
pub mod memory;

use crate::core::favorites::FavoriteCurrencySet;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use disk::DiskCollection;
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const API_KEY: &str = "api_key";
const FAVORITE_CURRENCIES: &str = "favorite_currencies";
const HOLDING_AMOUNT: &str = "holding_amount";
const INITIAL_LOAD_DONE: &str = "initial_load_done";

/// Raw byte storage the [`SecretStore`] is layered on.
#[async_trait]
pub trait KeyValueCollection: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
}

/// Durable home of the API key, the favorite currencies and the holding.
/// Values are stored JSON encoded.
#[derive(Clone)]
pub struct SecretStore {
    collection: Arc<dyn KeyValueCollection>,
}

impl SecretStore {
    pub fn new(collection: Arc<dyn KeyValueCollection>) -> Self {
        Self { collection }
    }

    /// Opens the on-disk store under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let collection = DiskCollection::open(&data_dir.join("store"), "secrets")?;
        Ok(Self::new(Arc::new(collection)))
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.collection.get(key).await? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .with_context(|| format!("Corrupt value stored under '{key}'"))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.collection
            .put(key, bytes)
            .await
            .with_context(|| format!("Failed to store '{key}'"))
    }

    /// Seeds the default favorites the first time the store is used. Later
    /// calls leave whatever the user has chosen alone, even an empty set.
    pub async fn ensure_defaults(&self) -> Result<()> {
        if self.load::<bool>(INITIAL_LOAD_DONE).await?.unwrap_or(false) {
            debug!("Initial load already done");
            return Ok(());
        }
        self.set_favorites(&FavoriteCurrencySet::defaults()).await?;
        self.save(INITIAL_LOAD_DONE, &true).await?;
        info!("Seeded default favorite currencies");
        Ok(())
    }

    pub async fn api_key(&self) -> Result<Option<String>> {
        self.load(API_KEY).await
    }

    pub async fn set_api_key(&self, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            bail!("API key must not be empty");
        }
        self.save(API_KEY, api_key).await
    }

    /// Empty when nothing has been stored yet.
    pub async fn favorites(&self) -> Result<FavoriteCurrencySet> {
        Ok(self.load(FAVORITE_CURRENCIES).await?.unwrap_or_default())
    }

    pub async fn set_favorites(&self, favorites: &FavoriteCurrencySet) -> Result<()> {
        self.save(FAVORITE_CURRENCIES, favorites).await
    }

    /// Returns false, without writing, if the code is already a favorite.
    pub async fn add_favorite(&self, code: &str) -> Result<bool> {
        let mut favorites = self.favorites().await?;
        if !favorites.insert(code) {
            return Ok(false);
        }
        self.set_favorites(&favorites).await?;
        Ok(true)
    }

    /// Returns false, without writing, if the code was not a favorite.
    pub async fn remove_favorite(&self, code: &str) -> Result<bool> {
        let mut favorites = self.favorites().await?;
        if !favorites.remove(code) {
            return Ok(false);
        }
        self.set_favorites(&favorites).await?;
        Ok(true)
    }

    pub async fn holding(&self) -> Result<Option<f64>> {
        self.load(HOLDING_AMOUNT).await
    }

    pub async fn set_holding(&self, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount < 0.0 {
            bail!("Holding must be a valid, non-negative decimal amount, got {amount}");
        }
        self.save(HOLDING_AMOUNT, &amount).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memory::MemoryCollection;
    use tempfile::tempdir;

    fn memory_store() -> SecretStore {
        SecretStore::new(Arc::new(MemoryCollection::new()))
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = memory_store();
        assert!(store.api_key().await.unwrap().is_none());
        assert!(store.favorites().await.unwrap().is_empty());
        assert!(store.holding().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ensure_defaults_seeds_once() {
        let store = memory_store();

        store.ensure_defaults().await.unwrap();
        assert_eq!(store.favorites().await.unwrap().joined(), "ZAR,USD,AUD");

        store.remove_favorite("ZAR").await.unwrap();
        store.remove_favorite("USD").await.unwrap();
        store.remove_favorite("AUD").await.unwrap();
        store.ensure_defaults().await.unwrap();

        assert!(store.favorites().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_and_remove_favorites() {
        let store = memory_store();

        assert!(store.add_favorite("EUR").await.unwrap());
        assert!(store.add_favorite("GBP").await.unwrap());
        assert!(!store.add_favorite("EUR").await.unwrap());
        assert_eq!(store.favorites().await.unwrap().joined(), "EUR,GBP");

        assert!(store.remove_favorite("EUR").await.unwrap());
        assert!(!store.remove_favorite("JPY").await.unwrap());
        assert_eq!(store.favorites().await.unwrap().joined(), "GBP");
    }

    #[tokio::test]
    async fn test_holding_validation() {
        let store = memory_store();

        store.set_holding(0.5).await.unwrap();
        assert_eq!(store.holding().await.unwrap(), Some(0.5));

        let err = store.set_holding(-1.0).await.unwrap_err();
        assert!(err.to_string().contains("non-negative"));
        assert!(store.set_holding(f64::NAN).await.is_err());
        assert!(store.set_holding(f64::INFINITY).await.is_err());
        assert_eq!(store.holding().await.unwrap(), Some(0.5));

        store.set_holding(0.0).await.unwrap();
        assert_eq!(store.holding().await.unwrap(), Some(0.0));
    }

    #[tokio::test]
    async fn test_api_key() {
        let store = memory_store();

        assert!(store.set_api_key("   ").await.is_err());
        store.set_api_key(" abc123 ").await.unwrap();
        assert_eq!(store.api_key().await.unwrap().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_corrupt_value_is_reported() {
        let collection = Arc::new(MemoryCollection::new());
        collection
            .put(HOLDING_AMOUNT, b"not a number".to_vec())
            .await
            .unwrap();
        let store = SecretStore::new(collection);

        let err = store.holding().await.unwrap_err();
        assert!(err.to_string().contains("holding_amount"));
    }

    #[tokio::test]
    async fn test_disk_store_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = SecretStore::open(dir.path()).unwrap();
            store.ensure_defaults().await.unwrap();
            store.add_favorite("EUR").await.unwrap();
            store.set_holding(1.25).await.unwrap();
            store.set_api_key("secret").await.unwrap();
        }

        let store = SecretStore::open(dir.path()).unwrap();
        store.ensure_defaults().await.unwrap();
        assert_eq!(store.favorites().await.unwrap().joined(), "ZAR,USD,AUD,EUR");
        assert_eq!(store.holding().await.unwrap(), Some(1.25));
        assert_eq!(store.api_key().await.unwrap().as_deref(), Some("secret"));
    }
}

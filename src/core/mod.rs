//! Rates, favorites and the components that keep them in sync

pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod log;
pub mod rates;
pub mod reconciler;

// Re-export main types for cleaner imports
pub use catalog::SymbolsCatalog;
pub use error::RatesError;
pub use favorites::FavoriteCurrencySet;
pub use rates::{CurrencyRate, RateSnapshot, RatesClient, SymbolCatalogEntry, Trend};
pub use reconciler::RateReconciler;

pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{RateReconciler, RatesClient, SymbolsCatalog};
use crate::providers::fixer::FixerClient;
use crate::store::SecretStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum FavoritesAction {
    List,
    Add(String),
    Remove(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Key(String),
    Holding(f64),
    Favorites(FavoritesAction),
    Symbols,
    Rates,
}

/// Everything a command needs, wired from one config.
pub struct App {
    pub config: AppConfig,
    pub store: SecretStore,
}

impl App {
    pub async fn open(config: AppConfig) -> Result<Self> {
        let data_path = config.data_path()?;
        debug!("Using data path {}", data_path.display());
        let store = SecretStore::open(&data_path)?;
        store.ensure_defaults().await?;
        Ok(Self { config, store })
    }

    /// Client for the rates API, authenticated with the stored key.
    pub async fn rates_client(&self) -> Result<Arc<dyn RatesClient>> {
        let api_key = self.store.api_key().await?.context(
            "No API key stored. Run `btcwatch key <API_KEY>` to add one",
        )?;
        let fixer = &self.config.providers.fixer;
        let client = FixerClient::new(&fixer.base_url, &api_key, fixer.timeout())?;
        Ok(Arc::new(client))
    }

    pub fn catalog(&self, client: Arc<dyn RatesClient>) -> SymbolsCatalog {
        SymbolsCatalog::new(client, &self.config.base_currency)
    }

    pub fn reconciler(&self, client: Arc<dyn RatesClient>) -> RateReconciler {
        RateReconciler::new(client).with_max_age(self.config.rates.max_age())
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("btcwatch starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let app = App::open(config).await?;

    match command {
        AppCommand::Key(api_key) => cli::settings::set_api_key(&app.store, &api_key).await,
        AppCommand::Holding(amount) => {
            cli::settings::set_holding(&app.store, amount, &app.config.base_currency).await
        }
        AppCommand::Favorites(action) => cli::favorites::run(&app, action).await,
        AppCommand::Symbols => {
            let catalog = app.catalog(app.rates_client().await?);
            cli::symbols::run(&catalog).await
        }
        AppCommand::Rates => {
            let reconciler = app.reconciler(app.rates_client().await?);
            cli::rates::run(&reconciler, &app.store, &app.config.base_currency).await
        }
    }
}

use crate::core::{FavoriteCurrencySet, SymbolsCatalog};
use crate::store::SecretStore;
use crate::{App, FavoritesAction};
use anyhow::{Context, Result, bail};

pub async fn run(app: &App, action: FavoritesAction) -> Result<()> {
    match action {
        FavoritesAction::List => {
            println!("{}", display_favorites(&app.store.favorites().await?));
            Ok(())
        }
        FavoritesAction::Add(code) => {
            let catalog = app.catalog(app.rates_client().await?);
            let message = add(&app.store, &catalog, &code).await?;
            println!("{message}");
            Ok(())
        }
        FavoritesAction::Remove(code) => {
            let message = remove(&app.store, &code).await?;
            println!("{message}");
            Ok(())
        }
    }
}

pub fn display_favorites(favorites: &FavoriteCurrencySet) -> String {
    if favorites.is_empty() {
        return "No favorite currencies".to_string();
    }
    favorites.iter().collect::<Vec<_>>().join("\n")
}

/// Adds `code` if the catalog knows it. The base asset is never in the
/// catalog, so it can never become a favorite.
pub async fn add(store: &SecretStore, catalog: &SymbolsCatalog, code: &str) -> Result<String> {
    catalog
        .refresh()
        .await
        .context("Failed to get currency symbols. Please try again later")?;
    if !catalog.contains(code).await {
        bail!("Unknown currency code: {code}");
    }

    if store.add_favorite(code).await? {
        match catalog.name_of(code).await {
            Some(name) => Ok(format!("Added {code} ({name}) to favorites")),
            None => Ok(format!("Added {code} to favorites")),
        }
    } else {
        Ok(format!("{code} is already a favorite"))
    }
}

pub async fn remove(store: &SecretStore, code: &str) -> Result<String> {
    if store.remove_favorite(code).await? {
        Ok(format!("Removed {code} from favorites"))
    } else {
        Ok(format!("{code} is not a favorite"))
    }
}

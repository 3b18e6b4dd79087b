use super::ui;
use crate::store::SecretStore;
use anyhow::Result;

pub async fn set_api_key(store: &SecretStore, api_key: &str) -> Result<()> {
    store.set_api_key(api_key).await?;
    println!("API key stored");
    Ok(())
}

pub async fn set_holding(store: &SecretStore, amount: f64, base: &str) -> Result<()> {
    if let Err(e) = store.set_holding(amount).await {
        eprintln!("{}", ui::style_text("Invalid input", ui::StyleType::Error));
        return Err(e);
    }
    println!("Holding set to {amount} {base}");
    Ok(())
}

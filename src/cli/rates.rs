use super::ui;
use crate::core::{FavoriteCurrencySet, RateReconciler, RateSnapshot, Trend};
use crate::store::SecretStore;
use anyhow::{Result, anyhow};
use comfy_table::Cell;
use tracing::error;

#[derive(Debug, Clone, PartialEq)]
pub struct HoldingRow {
    pub code: String,
    pub value: f64,
    pub change_pct: Option<f64>,
    /// Hidden when there is nothing to show a trend for.
    pub trend: Option<Trend>,
}

/// The holding converted into each favorite, in favorites order.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingView {
    pub base: String,
    pub holding: f64,
    pub rows: Vec<HoldingRow>,
    pub window: Option<(String, String)>,
}

impl HoldingView {
    pub async fn build(
        reconciler: &RateReconciler,
        base: &str,
        holding: f64,
        favorites: &FavoriteCurrencySet,
    ) -> Self {
        let snapshot = reconciler.snapshot().await;
        Self::from_snapshot(base, holding, favorites, snapshot.as_ref())
    }

    /// Every row is read from the same snapshot.
    pub fn from_snapshot(
        base: &str,
        holding: f64,
        favorites: &FavoriteCurrencySet,
        snapshot: Option<&RateSnapshot>,
    ) -> Self {
        let rows = favorites
            .iter()
            .map(|code| {
                let value = snapshot.map_or(0.0, |s| s.value_of(code, holding));
                let change_pct = snapshot
                    .and_then(|s| s.rate(code))
                    .map(|rate| rate.change_pct);
                let trend = if value == 0.0 {
                    None
                } else {
                    snapshot.map(|s| s.trend_of(code))
                };
                HoldingRow {
                    code: code.to_string(),
                    value,
                    change_pct,
                    trend,
                }
            })
            .collect();

        HoldingView {
            base: base.to_string(),
            holding,
            rows,
            window: snapshot.map(|s| (s.start_date.to_string(), s.end_date.to_string())),
        }
    }

    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell("Value"),
            ui::header_cell("1D Change"),
            ui::header_cell("Trend"),
        ]);

        table.add_row(vec![
            Cell::new(&self.base),
            ui::amount_cell(self.holding),
            Cell::new(""),
            Cell::new(""),
        ]);
        for row in &self.rows {
            table.add_row(vec![
                Cell::new(&row.code),
                ui::amount_cell(row.value),
                ui::change_cell(row.change_pct),
                ui::trend_cell(row.trend),
            ]);
        }

        let mut output = format!(
            "{} {}\n\n",
            ui::style_text("Holding:", ui::StyleType::TotalLabel),
            ui::style_text(
                &format!("{} {}", self.holding, self.base),
                ui::StyleType::TotalValue
            )
        );
        output.push_str(&table.to_string());
        if let Some((start, end)) = &self.window {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(&format!("Rates from {start} to {end}"), ui::StyleType::Subtle)
            ));
        }
        output
    }
}

pub async fn run(reconciler: &RateReconciler, store: &SecretStore, base: &str) -> Result<()> {
    let favorites = store.favorites().await?;
    let holding = store.holding().await?.unwrap_or(0.0);

    if reconciler.is_stale(&favorites).await {
        let pb = ui::new_spinner("Fetching rates...");
        let result = reconciler.refresh(base, &favorites).await;
        pb.finish_and_clear();
        if let Err(e) = result {
            error!(error = %e, "Failed to get rates");
            return Err(anyhow!(e).context("Failed to get rates. Please try again later"));
        }
    }

    let view = HoldingView::build(reconciler, base, holding, &favorites).await;
    println!("{}", view.display_as_table());
    Ok(())
}

//! Rate abstractions and core types

use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

use super::error::RatesError;

/// Movement of one currency against the base over a [`FluctuationWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub change: f64,
    pub change_pct: f64,
    pub end_rate: f64,
    pub start_rate: f64,
}

/// One complete fluctuation answer. Replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub base: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fluctuation: bool,
    pub success: bool,
    pub rates: BTreeMap<String, CurrencyRate>,
}

impl RateSnapshot {
    pub fn rate(&self, code: &str) -> Option<&CurrencyRate> {
        self.rates.get(code)
    }

    /// Holding converted into `code`; 0.0 when there is no rate for it.
    pub fn value_of(&self, code: &str, holding_amount: f64) -> f64 {
        holding_amount * self.rate(code).map_or(0.0, |rate| rate.end_rate)
    }

    /// A missing rate reads as no change, so it shows as [`Trend::Flat`].
    pub fn trend_of(&self, code: &str) -> Trend {
        Trend::from_change(self.rate(code).map_or(0.0, |rate| rate.change))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SymbolCatalogEntry {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    /// Sign of `change` decides the trend. Zero and NaN are flat.
    pub fn from_change(change: f64) -> Self {
        if change < 0.0 {
            Trend::Down
        } else if change > 0.0 {
            Trend::Up
        } else {
            Trend::Flat
        }
    }
}

impl Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Trend::Up => "▲",
                Trend::Down => "▼",
                Trend::Flat => "▬",
            }
        )
    }
}

/// The one-day window a fluctuation request covers: yesterday to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FluctuationWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FluctuationWindow {
    pub const DATE_FORMAT: &'static str = "%Y-%m-%d";

    /// Window ending on the current local calendar day.
    pub fn today() -> Self {
        Self::ending_on(Local::now().date_naive())
    }

    pub fn ending_on(end: NaiveDate) -> Self {
        // NaiveDate::MIN has no predecessor; clamp rather than panic.
        let start = end.checked_sub_days(Days::new(1)).unwrap_or(end);
        Self { start, end }
    }

    pub fn start_param(&self) -> String {
        self.start.format(Self::DATE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(Self::DATE_FORMAT).to_string()
    }
}

#[async_trait]
pub trait RatesClient: Send + Sync {
    /// Every currency the remote side can quote, base included.
    async fn fetch_symbols(&self) -> Result<Vec<SymbolCatalogEntry>, RatesError>;

    /// Fluctuation of each code in `symbols` (comma separated) against `base`
    /// over [`FluctuationWindow::today`].
    async fn fetch_fluctuation(
        &self,
        base: &str,
        symbols: &str,
    ) -> Result<RateSnapshot, RatesError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_from_change() {
        assert_eq!(Trend::from_change(-1.0), Trend::Down);
        assert_eq!(Trend::from_change(1.0), Trend::Up);
        assert_eq!(Trend::from_change(0.0), Trend::Flat);
        assert_eq!(Trend::from_change(-0.0), Trend::Flat);
        assert_eq!(Trend::from_change(f64::NAN), Trend::Flat);
    }

    #[test]
    fn test_window_is_one_calendar_day() {
        let dates = [
            NaiveDate::from_ymd_opt(2024, 9, 22).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        ];
        for end in dates {
            let window = FluctuationWindow::ending_on(end);
            assert_eq!(window.end, end);
            assert_eq!(window.end.signed_duration_since(window.start).num_days(), 1);
        }

        let leap = FluctuationWindow::ending_on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(leap.start_param(), "2024-02-29");
        assert_eq!(leap.end_param(), "2024-03-01");

        let new_year = FluctuationWindow::ending_on(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(new_year.start_param(), "2024-12-31");
    }

    #[test]
    fn test_window_today_ends_on_local_date() {
        let before = Local::now().date_naive();
        let window = FluctuationWindow::today();
        let after = Local::now().date_naive();
        assert!(window.end == before || window.end == after);
        assert_eq!(window.end.signed_duration_since(window.start).num_days(), 1);
    }

    #[test]
    fn test_snapshot_decodes_snake_case_wire_names() {
        let json = r#"{
            "base": "BTC",
            "end_date": "2024-09-22",
            "fluctuation": true,
            "rates": {
                "USD": {"change": -1.0, "change_pct": -0.1, "end_rate": 5.0, "start_rate": 5.1}
            },
            "start_date": "2024-09-21",
            "success": true
        }"#;
        let snapshot: RateSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.base, "BTC");
        assert_eq!(snapshot.start_date, NaiveDate::from_ymd_opt(2024, 9, 21).unwrap());
        let usd = snapshot.rate("USD").unwrap();
        assert_eq!(usd.change_pct, -0.1);
        assert_eq!(usd.end_rate, 5.0);
        assert_eq!(usd.start_rate, 5.1);
        assert!(snapshot.rate("EUR").is_none());
        assert_eq!(snapshot.value_of("USD", 2.0), 10.0);
        assert_eq!(snapshot.value_of("EUR", 2.0), 0.0);
        assert_eq!(snapshot.trend_of("USD"), Trend::Down);
        assert_eq!(snapshot.trend_of("EUR"), Trend::Flat);
    }
}

use btcwatch::core::config::AppConfig;
use btcwatch::store::SecretStore;
use btcwatch::{AppCommand, FavoritesAction};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tracing::info;

// Mock rates API shared by the tests below
mod test_utils {
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const API_KEY: &str = "integration-key";

    pub async fn create_mock_server() -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/symbols"))
            .and(header("apikey", API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{
                    "success": true,
                    "symbols": {
                        "AUD": "Australian Dollar",
                        "BTC": "Bitcoin",
                        "EUR": "Euro",
                        "USD": "United States Dollar",
                        "ZAR": "South African Rand"
                    }
                }"#,
            ))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/fluctuation"))
            .and(header("apikey", API_KEY))
            .and(query_param("base", "BTC"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{
                    "base": "BTC",
                    "end_date": "2024-09-22",
                    "fluctuation": true,
                    "rates": {
                        "AUD": {"change": 0.0, "change_pct": 0.0, "end_rate": 90000.0, "start_rate": 90000.0},
                        "USD": {"change": -120.0, "change_pct": -0.2, "end_rate": 60000.0, "start_rate": 60120.0},
                        "ZAR": {"change": 5000.0, "change_pct": 0.5, "end_rate": 1050000.0, "start_rate": 1045000.0}
                    },
                    "start_date": "2024-09-21",
                    "success": true
                }"#,
            ))
            .mount(&mock_server)
            .await;

        mock_server
    }
}

fn write_config(dir: &Path, base_url: &str) -> String {
    let config_path = dir.join("config.yaml");
    let config_content = format!(
        r#"
        base_currency: "BTC"
        providers:
          fixer:
            base_url: {}
            timeout_secs: 5
        data_path: {}
    "#,
        base_url,
        dir.join("data").display()
    );
    fs::write(&config_path, config_content).expect("Failed to write config file");
    config_path.to_str().unwrap().to_string()
}

fn open_store(config_path: &str) -> SecretStore {
    let config = AppConfig::load_from_path(config_path).unwrap();
    SecretStore::open(&config.data_path().unwrap()).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_mock_server().await;
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), &mock_server.uri());

    let steps = [
        AppCommand::Key(test_utils::API_KEY.to_string()),
        AppCommand::Holding(0.5),
        AppCommand::Favorites(FavoritesAction::Add("EUR".to_string())),
        AppCommand::Favorites(FavoritesAction::Remove("AUD".to_string())),
        AppCommand::Favorites(FavoritesAction::List),
        AppCommand::Symbols,
        AppCommand::Rates,
    ];
    for step in steps {
        info!(?step, "Running command");
        let result = btcwatch::run_command(step.clone(), Some(config_path.as_str())).await;
        assert!(result.is_ok(), "{step:?} failed with: {:?}", result.err());
    }

    let store = open_store(&config_path);
    assert_eq!(store.favorites().await.unwrap().joined(), "ZAR,USD,EUR");
    assert_eq!(store.holding().await.unwrap(), Some(0.5));
}

#[test_log::test(tokio::test)]
async fn test_rates_without_api_key_fails() {
    let mock_server = test_utils::create_mock_server().await;
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), &mock_server.uri());

    let result = btcwatch::run_command(AppCommand::Rates, Some(config_path.as_str())).await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("No API key stored"));
}

#[test_log::test(tokio::test)]
async fn test_wrong_api_key_reports_rates_failure() {
    let mock_server = test_utils::create_mock_server().await;
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), &mock_server.uri());

    btcwatch::run_command(AppCommand::Key("wrong".to_string()), Some(config_path.as_str()))
        .await
        .unwrap();
    let result = btcwatch::run_command(AppCommand::Rates, Some(config_path.as_str())).await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("Please try again later"));
}

#[test_log::test(tokio::test)]
async fn test_cannot_favorite_base_or_unknown_code() {
    let mock_server = test_utils::create_mock_server().await;
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), &mock_server.uri());

    btcwatch::run_command(
        AppCommand::Key(test_utils::API_KEY.to_string()),
        Some(config_path.as_str()),
    )
    .await
    .unwrap();

    for code in ["BTC", "XYZ"] {
        let result = btcwatch::run_command(
            AppCommand::Favorites(FavoritesAction::Add(code.to_string())),
            Some(config_path.as_str()),
        )
        .await;
        assert!(result.is_err(), "{code} should have been rejected");
    }

    let store = open_store(&config_path);
    assert_eq!(store.favorites().await.unwrap().joined(), "ZAR,USD,AUD");
}

#[test_log::test(tokio::test)]
async fn test_negative_holding_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), "http://127.0.0.1:9");

    let result = btcwatch::run_command(AppCommand::Holding(-1.0), Some(config_path.as_str())).await;
    assert!(result.is_err());

    let store = open_store(&config_path);
    assert!(store.holding().await.unwrap().is_none());
}

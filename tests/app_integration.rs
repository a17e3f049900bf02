use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use pullarim::core::config::{AppConfig, NameLanguage};
use pullarim::core::preferences::{
    FROM_CURRENCY_KEY, LAST_AMOUNT_KEY, PreferenceStore, TO_CURRENCY_KEY,
};
use pullarim::core::rate_store::{RateStore, RefreshOutcome};
use pullarim::core::session::Session;
use pullarim::providers::CbuProvider;
use pullarim::store::KeyValueStore;

const RATES_PATH: &str = "/uz/arkhiv-kursov-valyut/json/";

const CBU_RESPONSE: &str = r#"[
    {"id":69,"Code":"840","Ccy":"USD","CcyNm_RU":"Доллар США","CcyNm_UZ":"AQSH dollari","CcyNm_UZC":"АҚШ доллари","CcyNm_EN":"US Dollar","Nominal":"1","Rate":"12850.00","Diff":"-12.5","Date":"19.10.2026"},
    {"id":21,"Code":"978","Ccy":"EUR","CcyNm_RU":"Евро","CcyNm_UZ":"EVRO","CcyNm_UZC":"ЕВРО","CcyNm_EN":"Euro","Nominal":"1","Rate":"13900.00","Diff":"3.02","Date":"19.10.2026"}
]"#;

// Adds automatic logging to test
mod test_utils {
    use super::RATES_PATH;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(RATES_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    /// Serves rates slowly and expects exactly one request.
    pub async fn create_slow_mock_server(body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(RATES_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        mock_server
    }
}

fn write_config(dir: &Path, base_url: &str) -> String {
    let config_path = dir.join("config.yaml");
    let config_content = format!(
        r#"
        provider:
          base_url: {}
        currencies: ["UZS", "USD", "EUR", "GBP"]
        data_path: {}
    "#,
        base_url,
        dir.join("data").display()
    );
    fs::write(&config_path, config_content).expect("Failed to write config file");
    config_path.to_str().unwrap().to_string()
}

fn stored(data_path: &Path, key: &str) -> Option<String> {
    let store = KeyValueStore::open(data_path);
    let collection = store.collection("preferences").unwrap();
    collection.get(key).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_convert_with_mock() {
    let mock_server = test_utils::create_mock_server(200, CBU_RESPONSE).await;
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(dir.path(), &mock_server.uri());

    let result = pullarim::run_command(
        pullarim::AppCommand::Convert {
            amount: Some("1,000".to_string()),
            from: Some("usd".to_string()),
            to: Some("EUR".to_string()),
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());

    let data_path = dir.path().join("data");
    assert_eq!(stored(&data_path, FROM_CURRENCY_KEY), Some("USD".to_string()));
    assert_eq!(stored(&data_path, TO_CURRENCY_KEY), Some("EUR".to_string()));
    assert_eq!(stored(&data_path, LAST_AMOUNT_KEY), Some("1000".to_string()));
}

#[test_log::test(tokio::test)]
async fn test_convert_currency_missing_from_rates() {
    let mock_server = test_utils::create_mock_server(200, CBU_RESPONSE).await;
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(dir.path(), &mock_server.uri());

    let result = pullarim::run_command(
        pullarim::AppCommand::Convert {
            amount: Some("5".to_string()),
            from: Some("GBP".to_string()),
            to: None,
        },
        Some(&config_path),
    )
    .await;

    let err = result.unwrap_err();
    info!(%err, "Convert failed as expected");
    assert!(
        err.to_string()
            .contains("No exchange rate available for currency: GBP")
    );
}

#[test_log::test(tokio::test)]
async fn test_convert_fails_when_rates_unavailable() {
    let mock_server = test_utils::create_mock_server(500, "").await;
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(dir.path(), &mock_server.uri());

    let result = pullarim::run_command(
        pullarim::AppCommand::Convert {
            amount: None,
            from: None,
            to: None,
        },
        Some(&config_path),
    )
    .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("Could not load exchange rates"));
    assert!(format!("{err:#}").contains("500 Internal Server Error"));
}

#[test_log::test(tokio::test)]
async fn test_rates_with_mock() {
    let mock_server = test_utils::create_mock_server(200, CBU_RESPONSE).await;
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(dir.path(), &mock_server.uri());

    let result = pullarim::run_command(pullarim::AppCommand::Rates, Some(&config_path)).await;
    assert!(result.is_ok(), "Rates failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_overlapping_refreshes_make_one_request() {
    let mock_server = test_utils::create_slow_mock_server(CBU_RESPONSE).await;
    let url = format!("{}{}", mock_server.uri(), RATES_PATH);
    let store = RateStore::new(Arc::new(CbuProvider::new(&url, NameLanguage::Uz)), "UZS");

    let (first, second) = tokio::join!(store.refresh(), store.refresh());

    assert_eq!(first, RefreshOutcome::Updated { currencies: 3 });
    assert_eq!(second, RefreshOutcome::Skipped);
    assert_eq!(store.table().get("EUR").unwrap().rate, 13900.0);
    // The mock verifies on drop that exactly one request was received
}

#[test_log::test(tokio::test)]
async fn test_watch_session_persists_selection() {
    let mock_server = test_utils::create_mock_server(200, CBU_RESPONSE).await;
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        data_path: Some(dir.path().display().to_string()),
        ..AppConfig::default()
    };
    let url = format!("{}{}", mock_server.uri(), RATES_PATH);
    let rate_store = Arc::new(RateStore::new(
        Arc::new(CbuProvider::new(&url, NameLanguage::Uz)),
        &config.base_currency,
    ));
    rate_store.refresh().await;

    {
        let kv = KeyValueStore::open(dir.path());
        let preferences = PreferenceStore::new(kv.collection("preferences").unwrap());
        let session = Session::new(rate_store, preferences, &config);

        let input: &[u8] = b"250\nto EUR\nswap\nbogus\nquit\n";
        pullarim::cli::watch::run(&config, session, input)
            .await
            .expect("Watch session failed");
    }

    assert_eq!(stored(dir.path(), FROM_CURRENCY_KEY), Some("EUR".to_string()));
    assert_eq!(stored(dir.path(), TO_CURRENCY_KEY), Some("USD".to_string()));
    // 250 USD shown as 231.1151 EUR becomes the amount after the swap
    assert_eq!(
        stored(dir.path(), LAST_AMOUNT_KEY),
        Some("231.1151".to_string())
    );
}

//! Central Bank of Uzbekistan daily rates.
//!
//! The endpoint returns a JSON array with one record per currency, quoted
//! in UZS per `Nominal` units. Numeric fields arrive as strings.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::core::config::{AppConfig, NameLanguage};
use crate::core::{FetchError, RateEntry, RateProvider, RateRecord};

pub struct CbuProvider {
    url: String,
    name_language: NameLanguage,
}

impl CbuProvider {
    pub fn new(url: &str, name_language: NameLanguage) -> Self {
        CbuProvider {
            url: url.to_string(),
            name_language,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.rates_url(), config.provider.name_language)
    }
}

#[derive(Debug, Deserialize)]
struct CbuRecord {
    #[serde(rename = "Ccy")]
    code: String,
    #[serde(rename = "Rate")]
    rate: Value,
    #[serde(rename = "Nominal")]
    nominal: Value,
    #[serde(rename = "CcyNm_UZ", default)]
    name_uz: Option<String>,
    #[serde(rename = "CcyNm_UZC", default)]
    name_uzc: Option<String>,
    #[serde(rename = "CcyNm_RU", default)]
    name_ru: Option<String>,
    #[serde(rename = "CcyNm_EN", default)]
    name_en: Option<String>,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Diff", default)]
    diff: Option<Value>,
}

fn number_field(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

impl CbuRecord {
    fn name(&self, language: NameLanguage) -> String {
        let preferred = match language {
            NameLanguage::Uz => &self.name_uz,
            NameLanguage::Uzc => &self.name_uzc,
            NameLanguage::Ru => &self.name_ru,
            NameLanguage::En => &self.name_en,
        };
        preferred
            .as_ref()
            .or(self.name_uz.as_ref())
            .cloned()
            .unwrap_or_else(|| self.code.clone())
    }

    fn into_rate_record(self, language: NameLanguage) -> Result<RateRecord, FetchError> {
        let code = self.code.trim().to_uppercase();
        if code.is_empty() {
            return Err(FetchError::Malformed("record without currency code".into()));
        }

        let rate = number_field(&self.rate)
            .filter(|r| *r > 0.0)
            .ok_or_else(|| FetchError::Malformed(format!("invalid rate for {code}: {}", self.rate)))?;

        let nominal = number_field(&self.nominal)
            .filter(|n| n.fract() == 0.0 && *n >= 1.0 && *n <= f64::from(u32::MAX))
            .map(|n| n as u32)
            .ok_or_else(|| {
                FetchError::Malformed(format!("invalid nominal for {code}: {}", self.nominal))
            })?;

        let name = self.name(language);
        let diff = self.diff.as_ref().and_then(number_field);

        Ok(RateRecord {
            code,
            entry: RateEntry {
                rate,
                nominal,
                name,
                date: self.date,
                diff,
            },
        })
    }
}

#[async_trait]
impl RateProvider for CbuProvider {
    #[instrument(name = "CbuRatesFetch", skip(self), fields(url = %self.url))]
    async fn fetch_rates(&self) -> Result<Vec<RateRecord>, FetchError> {
        debug!("Requesting rates from {}", self.url);

        let client = reqwest::Client::builder()
            .user_agent("pullarim/0.1")
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        let response = client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Request(format!("{} for URL: {}", e, self.url)))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().to_string()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;
        let records: Vec<CbuRecord> = serde_json::from_str(&text)
            .map_err(|e| FetchError::Malformed(format!("Failed to parse JSON response: {e}")))?;

        if records.is_empty() {
            return Err(FetchError::Malformed("no rate records".into()));
        }
        debug!("Received {} rate records", records.len());

        records
            .into_iter()
            .map(|r| r.into_rate_record(self.name_language))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RATES_PATH: &str = "/uz/arkhiv-kursov-valyut/json/";

    const SAMPLE: &str = r#"[
        {"id":69,"Code":"840","Ccy":"USD","CcyNm_RU":"Доллар США","CcyNm_UZ":"AQSH dollari","CcyNm_UZC":"АҚШ доллари","CcyNm_EN":"US Dollar","Nominal":"1","Rate":"12850.00","Diff":"-12.5","Date":"19.10.2026"},
        {"id":21,"Code":"978","Ccy":"EUR","CcyNm_RU":"Евро","CcyNm_UZ":"EVRO","CcyNm_UZC":"ЕВРО","CcyNm_EN":"Euro","Nominal":"1","Rate":"13900.10","Diff":"3.02","Date":"19.10.2026"},
        {"id":57,"Code":"392","Ccy":"JPY","CcyNm_RU":"Иена","CcyNm_UZ":"Yaponiya iyenasi","CcyNm_UZC":"Япония иенаси","CcyNm_EN":"Japanese Yen","Nominal":10,"Rate":"850.35","Diff":"0","Date":"19.10.2026"}
    ]"#;

    async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(RATES_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn provider(server: &MockServer, language: NameLanguage) -> CbuProvider {
        CbuProvider::new(&format!("{}{}", server.uri(), RATES_PATH), language)
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let server = create_mock_server(200, SAMPLE).await;
        let records = provider(&server, NameLanguage::Uz)
            .fetch_rates()
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
        let usd = &records[0];
        assert_eq!(usd.code, "USD");
        assert_eq!(usd.entry.rate, 12850.0);
        assert_eq!(usd.entry.nominal, 1);
        assert_eq!(usd.entry.name, "AQSH dollari");
        assert_eq!(usd.entry.date, "19.10.2026");
        assert_eq!(usd.entry.diff, Some(-12.5));

        let jpy = &records[2];
        assert_eq!(jpy.entry.nominal, 10);
        assert_eq!(jpy.entry.rate, 850.35);
    }

    #[tokio::test]
    async fn test_name_language_selection() {
        let server = create_mock_server(200, SAMPLE).await;
        let records = provider(&server, NameLanguage::En)
            .fetch_rates()
            .await
            .unwrap();
        assert_eq!(records[1].entry.name, "Euro");
    }

    #[tokio::test]
    async fn test_server_error_response() {
        let server = create_mock_server(500, "").await;
        let result = provider(&server, NameLanguage::Uz).fetch_rates().await;
        assert_eq!(
            result.unwrap_err(),
            FetchError::Status("500 Internal Server Error".to_string())
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let server = create_mock_server(200, r#"{"rates": []}"#).await;
        let result = provider(&server, NameLanguage::Uz).fetch_rates().await;
        assert!(matches!(result, Err(FetchError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_invalid_rate_is_malformed() {
        let body = r#"[{"Ccy":"USD","CcyNm_UZ":"AQSH dollari","Nominal":"1","Rate":"n/a","Date":"19.10.2026"}]"#;
        let server = create_mock_server(200, body).await;
        let err = provider(&server, NameLanguage::Uz)
            .fetch_rates()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid rate for USD"));
    }

    #[tokio::test]
    async fn test_zero_nominal_is_malformed() {
        let body = r#"[{"Ccy":"USD","CcyNm_UZ":"AQSH dollari","Nominal":"0","Rate":"12850","Date":"19.10.2026"}]"#;
        let server = create_mock_server(200, body).await;
        let err = provider(&server, NameLanguage::Uz)
            .fetch_rates()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid nominal for USD"));
    }

    #[tokio::test]
    async fn test_empty_list_is_malformed() {
        let server = create_mock_server(200, "[]").await;
        let result = provider(&server, NameLanguage::Uz).fetch_rates().await;
        assert!(matches!(result, Err(FetchError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let result = CbuProvider::new("http://127.0.0.1:1/rates", NameLanguage::Uz)
            .fetch_rates()
            .await;
        assert!(matches!(result, Err(FetchError::Request(_))));
    }
}

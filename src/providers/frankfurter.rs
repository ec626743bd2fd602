use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::core::currency::{Conversion, ConversionProvider, Currency};
use crate::core::error::ConversionError;
use crate::core::state::ConversionParams;

// FrankfurterProvider implementation for ConversionProvider
pub struct FrankfurterProvider {
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Self {
        FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    date: Option<NaiveDate>,
    rates: HashMap<String, f64>,
}

impl LatestResponse {
    fn rate_for(&self, currency: Currency) -> Result<f64, ConversionError> {
        self.rates
            .get(currency.code())
            .copied()
            .ok_or(ConversionError::NotFound(currency))
    }
}

#[async_trait]
impl ConversionProvider for FrankfurterProvider {
    #[instrument(
        name = "FrankfurterConvert",
        skip(self),
        fields(pair = %params.pair())
    )]
    async fn convert(&self, params: &ConversionParams) -> Result<Conversion, ConversionError> {
        let pair = params.pair();
        // Canonical decimals carry only digits, '.' and '-', so they are safe in a query string.
        let amount = Decimal::from_str(params.amount.trim()).map_err(|e| {
            ConversionError::request_failed(
                &pair,
                format!("Invalid amount {:?}: {e}", params.amount),
            )
        })?;
        let url = format!(
            "{}/latest?amount={}&from={}&to={}",
            self.base_url, amount, params.from, params.to
        );
        debug!("Requesting conversion from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fxconv/1.0")
            .build()
            .map_err(|e| ConversionError::request_failed(&pair, e))?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| ConversionError::request_failed(&pair, format!("Request error: {e}")))?;

        debug!(response = ?response, "Received Frankfurter response");

        if !response.status().is_success() {
            return Err(ConversionError::request_failed(
                &pair,
                format!("HTTP error: {}", response.status()),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ConversionError::request_failed(&pair, e))?;

        let data: LatestResponse = serde_json::from_str(&text).map_err(|e| {
            ConversionError::request_failed(&pair, format!("Failed to parse JSON response: {e}"))
        })?;

        let value = data.rate_for(params.to)?;
        Ok(Conversion {
            params: params.clone(),
            value,
            date: data.date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(template: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("amount", "100"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "EUR"))
            .respond_with(template)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn params() -> ConversionParams {
        ConversionParams::new("100", Currency::Usd, Currency::Eur)
    }

    #[tokio::test]
    async fn test_successful_conversion() {
        let mock_response = r#"{
            "amount": 100.0,
            "base": "USD",
            "date": "2024-01-02",
            "rates": { "EUR": 95 }
        }"#;
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string(mock_response)).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let conversion = provider.convert(&params()).await.unwrap();

        assert_eq!(conversion.value, 95.0);
        assert_eq!(conversion.params, params());
        assert_eq!(conversion.date, NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_response = r#"{"rates": {"EUR": 91.5}}"#;
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string(mock_response)).await;

        let provider = FrankfurterProvider::new(&format!("{}/", mock_server.uri()));
        let conversion = provider.convert(&params()).await.unwrap();
        assert_eq!(conversion.value, 91.5);
        assert!(conversion.date.is_none());
    }

    #[tokio::test]
    async fn test_signed_amount_is_sent_as_plain_decimal() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("amount", "5"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "EUR"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"rates":{"EUR":4.75}}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let params = ConversionParams::new("+5", Currency::Usd, Currency::Eur);
        let conversion = provider.convert(&params).await.unwrap();
        assert_eq!(conversion.value, 4.75);
        assert_eq!(conversion.params.amount, "+5");
    }

    #[tokio::test]
    async fn test_non_numeric_amount_never_reaches_the_service() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let params = ConversionParams::new("5&to=INR", Currency::Usd, Currency::Eur);
        let err = provider.convert(&params).await.unwrap_err();
        assert!(matches!(err, ConversionError::RequestFailed { .. }));
        assert!(err.to_string().contains("Invalid amount"));
    }

    #[tokio::test]
    async fn test_missing_target_rate() {
        let mock_response = r#"{"amount": 100.0, "base": "USD", "rates": {"CAD": 136.2}}"#;
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string(mock_response)).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let err = provider.convert(&params()).await.unwrap_err();
        assert!(matches!(err, ConversionError::NotFound(Currency::Eur)));
        assert_eq!(err.to_string(), "No rate returned for currency: EUR");
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = create_mock_server(ResponseTemplate::new(500)).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let err = provider.convert(&params()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Request failed for USDEUR: HTTP error: 500 Internal Server Error"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_response = r#"{"rate": {"EUR": 95}}"#; // "rate" instead of "rates"
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string(mock_response)).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let err = provider.convert(&params()).await.unwrap_err();
        assert!(matches!(err, ConversionError::RequestFailed { .. }));
        assert!(err.to_string().contains("Failed to parse JSON response"));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Nothing listens on the discard port.
        let provider = FrankfurterProvider::new("http://127.0.0.1:9");
        let err = provider.convert(&params()).await.unwrap_err();
        assert!(matches!(err, ConversionError::RequestFailed { .. }));
        assert!(err.to_string().contains("Request error"));
    }
}

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::core::rate::{RateError, RateProvider, RateQuery, RateResult};

pub const DEFAULT_ENDPOINT: &str = "https://rates.staging.api.paytron.com/rate/public";

// RetailRateProvider implementation for RateProvider
pub struct RetailRateProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl RetailRateProvider {
    pub fn new(endpoint: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fxrate/1.0")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(RetailRateProvider {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    async fn request_rate(&self, query: &RateQuery) -> anyhow::Result<Option<f64>> {
        let url = reqwest::Url::parse_with_params(
            &self.endpoint,
            &[
                ("sellCurrency", query.sell_currency),
                ("buyCurrency", query.buy_currency),
            ],
        )
        .with_context(|| format!("Invalid rate endpoint: {}", self.endpoint))?;
        debug!("Requesting retail rate from {}", url);

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for pair: {:?}", e, query))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for pair: {}/{}",
                response.status(),
                query.sell_currency,
                query.buy_currency
            ));
        }

        let text = response.text().await?;
        let data: RetailRateResponse = serde_json::from_str(&text).map_err(|e| {
            anyhow!(
                "Failed to parse JSON response for {}/{}: {}",
                query.sell_currency,
                query.buy_currency,
                e
            )
        })?;

        Ok(data.retail_rate)
    }
}

#[derive(Debug, Deserialize)]
struct RetailRateResponse {
    #[serde(rename = "retailRate", default)]
    retail_rate: Option<f64>,
}

#[async_trait]
impl RateProvider for RetailRateProvider {
    #[instrument(
        name = "RetailRateFetch",
        skip(self),
        fields(from = %from_country, to = %to_country)
    )]
    async fn fetch_rate(
        &self,
        from_country: &str,
        to_country: &str,
        fallback_rate: f64,
    ) -> RateResult {
        let query = RateQuery::resolve(from_country, to_country)?;

        match self.request_rate(&query).await {
            // A zero rate is as good as no rate
            Ok(Some(rate)) if rate != 0.0 => Ok(rate),
            Ok(_) => {
                debug!(fallback_rate, "No retail rate in response, using fallback");
                Ok(fallback_rate)
            }
            Err(e) => {
                error!(error = %e, "Could not fetch exchange rate");
                Err(RateError::fetch_failure(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RATE_PATH: &str = "/rate/public";

    fn endpoint(mock_server: &MockServer) -> String {
        format!("{}{}", mock_server.uri(), RATE_PATH)
    }

    async fn create_mock_server(response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(RATE_PATH))
            .respond_with(response)
            .expect(1)
            .mount(&mock_server)
            .await;
        mock_server
    }

    async fn fetch_with_body(body: &str, fallback_rate: f64) -> RateResult {
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string(body)).await;
        let provider = RetailRateProvider::new(&endpoint(&mock_server)).unwrap();
        provider.fetch_rate("US", "GB", fallback_rate).await
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(RATE_PATH))
            .and(query_param("sellCurrency", "USD"))
            .and(query_param("buyCurrency", "GBP"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"retailRate": 1.25}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = RetailRateProvider::new(&endpoint(&mock_server)).unwrap();
        let rate = provider
            .fetch_rate("US", "GB", 1.0)
            .await
            .expect("Failed to get rate");
        assert_eq!(rate, 1.25);
    }

    #[tokio::test]
    async fn test_resolves_currency_codes_in_query() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(RATE_PATH))
            .and(query_param("sellCurrency", "AUD"))
            .and(query_param("buyCurrency", "CAD"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"retailRate": 1.5}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = RetailRateProvider::new(&endpoint(&mock_server)).unwrap();
        assert_eq!(provider.fetch_rate("AU", "CA", 1.0).await.unwrap(), 1.5);
    }

    #[tokio::test]
    async fn test_same_currency_pair() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("sellCurrency", "USD"))
            .and(query_param("buyCurrency", "USD"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"retailRate": 1.0}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = RetailRateProvider::new(&endpoint(&mock_server)).unwrap();
        assert_eq!(provider.fetch_rate("US", "US", 2.0).await.unwrap(), 1.0);
    }

    #[tokio::test]
    async fn test_invalid_currency_makes_no_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"retailRate": 1.0}"#))
            .expect(0)
            .mount(&mock_server)
            .await;

        let provider = RetailRateProvider::new(&endpoint(&mock_server)).unwrap();
        for (from, to) in [("", "GB"), ("US", ""), ("INVALID", "GB"), ("US", "INVALID")] {
            let result = provider.fetch_rate(from, to, 1.0).await;
            assert!(
                matches!(result, Err(RateError::InvalidCurrency)),
                "Expected invalid currency for {from:?} -> {to:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_missing_rate_uses_fallback() {
        let result = fetch_with_body(r#"{"someOtherField": "value"}"#, 1.5).await;
        assert_eq!(result.unwrap(), 1.5);
    }

    #[tokio::test]
    async fn test_empty_body_object_uses_fallback() {
        let result = fetch_with_body("{}", 2.5).await;
        assert_eq!(result.unwrap(), 2.5);
    }

    #[tokio::test]
    async fn test_null_rate_uses_fallback() {
        let result = fetch_with_body(r#"{"retailRate": null}"#, 2.0).await;
        assert_eq!(result.unwrap(), 2.0);
    }

    #[tokio::test]
    async fn test_zero_rate_uses_fallback() {
        let result = fetch_with_body(r#"{"retailRate": 0}"#, 1.5).await;
        assert_eq!(result.unwrap(), 1.5);
    }

    #[tokio::test]
    async fn test_negative_rate_is_kept() {
        let result = fetch_with_body(r#"{"retailRate": -1.5}"#, 1.0).await;
        assert_eq!(result.unwrap(), -1.5);
    }

    #[tokio::test]
    async fn test_additional_fields_are_ignored() {
        let body = r#"{
            "retailRate": 1.35,
            "wholesaleRate": 1.30,
            "timestamp": "2024-01-01T00:00:00Z",
            "currency": "GBP"
        }"#;
        let result = fetch_with_body(body, 1.0).await;
        assert_eq!(result.unwrap(), 1.35);
    }

    #[tokio::test]
    async fn test_preserves_decimal_precision() {
        let result = fetch_with_body(r#"{"retailRate": 1.234567}"#, 1.0).await;
        assert_eq!(result.unwrap(), 1.234567);
    }

    #[tokio::test]
    async fn test_malformed_json_is_fetch_failure() {
        let result = fetch_with_body("not json", 1.0).await;
        let err = result.unwrap_err();
        assert!(matches!(err, RateError::FetchFailure(_)));
        assert_eq!(err.to_string(), "Could not fetch exchange rate");
    }

    #[tokio::test]
    async fn test_http_errors_are_fetch_failures() {
        for status in [401, 404, 500] {
            let mock_server = create_mock_server(ResponseTemplate::new(status)).await;
            let provider = RetailRateProvider::new(&endpoint(&mock_server)).unwrap();

            let result = provider.fetch_rate("US", "GB", 1.0).await;
            match result {
                Err(RateError::FetchFailure(cause)) => {
                    assert!(
                        cause.to_string().starts_with(&format!("HTTP error: {status}")),
                        "Unexpected cause: {cause}"
                    );
                }
                other => panic!("Expected fetch failure for {status}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_network_error_is_fetch_failure() {
        // Nothing listens on port 1
        let provider = RetailRateProvider::new("http://127.0.0.1:1/rate/public").unwrap();
        let result = provider.fetch_rate("US", "GB", 1.0).await;
        assert!(matches!(result, Err(RateError::FetchFailure(_))));
    }
}

//! Exchange rate client.
//!
//! Fetches live rates from an external provider and converts submitted
//! expense amounts into the company's base currency. Conversion failures
//! abort expense submission; no expense is stored with a guessed amount.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use spendra_core::currency::convert_amount;
use spendra_shared::config::ExchangeConfig;

/// Errors that can occur when fetching exchange rates.
#[derive(Debug, Error)]
pub enum RateError {
    /// The provider request failed or returned a bad payload.
    #[error("Exchange rate request failed: {0}")]
    Request(String),

    /// The provider does not publish a rate for this currency pair.
    #[error("No exchange rate from {from} to {to}")]
    MissingRate {
        /// Source currency code.
        from: String,
        /// Target currency code.
        to: String,
    },
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, Decimal>,
}

/// HTTP client for the exchange rate provider.
#[derive(Debug, Clone)]
pub struct RateClient {
    http: reqwest::Client,
    base_url: String,
}

impl RateClient {
    /// Creates a rate client from exchange configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ExchangeConfig) -> Result<Self, RateError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RateError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the conversion rate from one currency to another.
    ///
    /// Identical currency codes short-circuit to a rate of 1 without a
    /// network call.
    ///
    /// # Errors
    ///
    /// Returns `RateError::MissingRate` if the provider does not publish
    /// the pair, or `RateError::Request` on transport failures.
    pub async fn rate(&self, from: &str, to: &str) -> Result<Decimal, RateError> {
        if from.eq_ignore_ascii_case(to) {
            return Ok(Decimal::ONE);
        }

        let url = format!("{}/{}", self.base_url, from.to_uppercase());
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RateError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| RateError::Request(e.to_string()))?;

        let body: RatesResponse = response
            .json()
            .await
            .map_err(|e| RateError::Request(e.to_string()))?;

        body.rates
            .get(&to.to_uppercase())
            .copied()
            .ok_or_else(|| RateError::MissingRate {
                from: from.to_uppercase(),
                to: to.to_uppercase(),
            })
    }

    /// Converts an amount between currencies, rounded to company precision.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate lookup fails.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
    ) -> Result<Decimal, RateError> {
        let rate = self.rate(from, to).await?;
        Ok(convert_amount(amount, rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn client() -> RateClient {
        RateClient::new(&ExchangeConfig {
            base_url: "https://api.exchangerate-api.com/v4/latest".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_same_currency_is_identity() {
        let c = client();
        assert_eq!(c.rate("USD", "USD").await.unwrap(), Decimal::ONE);
        assert_eq!(c.rate("eur", "EUR").await.unwrap(), Decimal::ONE);
        assert_eq!(
            c.convert(dec!(42.42), "USD", "usd").await.unwrap(),
            dec!(42.42)
        );
    }

    #[test]
    fn test_rates_payload_parses() {
        let body: RatesResponse =
            serde_json::from_str(r#"{"base":"USD","rates":{"EUR":0.92,"IDR":15234.5}}"#).unwrap();
        assert_eq!(body.rates.get("EUR").copied(), Some(dec!(0.92)));
        assert_eq!(body.rates.get("IDR").copied(), Some(dec!(15234.5)));
    }
}

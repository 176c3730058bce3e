use std::time::Duration;

use anyhow::{Context, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    description: &'a str,
    amount: f64,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for an HTTP prediction service.
///
/// Sends `{"description", "amount"}` and expects `{"category"}` back.
pub(crate) struct RemoteSuggester {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl RemoteSuggester {
    pub(crate) fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(crate) fn predict(&self, description: &str, amount: Decimal) -> Result<String> {
        let body = PredictRequest {
            description,
            amount: amount.to_f64().unwrap_or(0.0),
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .with_context(|| format!("Prediction request to {} failed", self.endpoint))?;

        let status = response.status();
        let text = response
            .text()
            .context("Failed to read prediction response")?;
        if !status.is_success() {
            let detail = parse_prediction(&text)
                .err()
                .map(|e| e.to_string())
                .unwrap_or_default();
            anyhow::bail!("Prediction service returned {status}: {detail}");
        }
        parse_prediction(&text)
    }
}

/// Pull the category out of a prediction response body.
pub(crate) fn parse_prediction(body: &str) -> Result<String> {
    let parsed: PredictResponse =
        serde_json::from_str(body).context("Prediction response is not valid JSON")?;
    if let Some(err) = parsed.error {
        anyhow::bail!("{err}");
    }
    match parsed.category.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => Ok(c.to_string()),
        _ => anyhow::bail!("Prediction response has no category"),
    }
}

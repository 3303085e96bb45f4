//! Fun fact provider module
//!
//! The provider is a capability trait so the handler can run against the
//! real numbers trivia service or an in-process fake. Any failure is turned
//! into a fixed fallback sentence by [`fun_fact_or_fallback`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::FactsConfig;
use crate::error::FactError;
use crate::logger;

/// Source of human-readable trivia about a number
#[async_trait]
pub trait FactProvider: Send + Sync {
    async fn fetch(&self, number: i64) -> Result<String, FactError>;
}

/// Client for the numbersapi.com style `/{n}/math` endpoint
pub struct NumbersApi {
    client: Client,
    base_url: String,
}

impl NumbersApi {
    pub fn new(config: &FactsConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn fact_url(&self, number: i64) -> String {
        format!("{}/{number}/math", self.base_url)
    }
}

#[async_trait]
impl FactProvider for NumbersApi {
    async fn fetch(&self, number: i64) -> Result<String, FactError> {
        let response = self.client.get(self.fact_url(number)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FactError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Text used whenever no fact could be fetched
pub fn fallback_fact(number: i64) -> String {
    format!("Sorry, No fun fact available for {number}")
}

/// Fetch a fact, substituting the fallback on any error
pub async fn fun_fact_or_fallback(provider: &dyn FactProvider, number: i64) -> String {
    match provider.fetch(number).await {
        Ok(fact) => fact,
        Err(e) => {
            logger::log_warning(&format!("No fun fact for {number}: {e}"));
            fallback_fact(number)
        }
    }
}

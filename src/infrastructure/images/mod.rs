//! Image search
//!
//! Queries an AJAX-style image search endpoint and returns the URL of the
//! first result.

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use crate::application::errors::BotError;

pub const MISSING_QUERY: &str = "You don't really want me searching for random images, do you?";

/// Top-level search response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "responseData")]
    pub response_data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseData {
    #[serde(default)]
    pub results: Vec<ImageResult>,
}

#[derive(Debug, Deserialize)]
pub struct ImageResult {
    pub url: String,
}

/// Image provider backing the `image` command
pub struct ImageSearch {
    base_url: String,
    timeout: Duration,
}

impl ImageSearch {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Command entry point: always yields a user-facing string
    pub fn reply(&self, args: &[String]) -> String {
        if args.is_empty() {
            return MISSING_QUERY.to_string();
        }
        let query = args.join(" ");

        match self.first_image(&query) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(query = %query, "Image search failed: {}", e);
                format!("Google doesn't like you. {}", e)
            }
        }
    }

    /// Search and return the first result's URL
    pub fn first_image(&self, query: &str) -> Result<String, BotError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| BotError::Network(e.to_string()))?;

        let response = client
            .get(&self.base_url)
            .query(&[("v", "1.0"), ("q", query)])
            .send()
            .map_err(|e| BotError::Network(e.to_string()))?;

        let body = response
            .text()
            .map_err(|e| BotError::Network(e.to_string()))?;

        first_result_url(&body)
    }
}

/// Decode a search response body and pick the first result
pub fn first_result_url(body: &str) -> Result<String, BotError> {
    let data: SearchResponse = serde_json::from_str(body)
        .map_err(|e| BotError::Parse(e.to_string()))?;

    data.response_data
        .ok_or_else(|| BotError::Parse("response has no data".to_string()))?
        .results
        .into_iter()
        .next()
        .map(|r| r.url)
        .ok_or_else(|| BotError::Parse("no results".to_string()))
}

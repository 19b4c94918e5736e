//! Stock quote lookup
//!
//! Fetches a one-line CSV quote (`name,symbol,last,open,previous close`)
//! from a Yahoo-style download endpoint.

use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use regex_lite::Regex;
use std::time::Duration;
use crate::application::errors::BotError;

pub const MISSING_SYMBOL: &str = "Please tell me which stock to quote next time!";

/// Number of fields requested with `f=nsl1op`
const QUOTE_FIELDS: usize = 5;

static CSV_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|,)(?:"([^"]*)"|([^,"]*))"#).expect("valid CSV field pattern")
});

/// A single quote row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub name: String,
    pub symbol: String,
    pub price: String,
}

/// Quote provider backing the `stock` command
pub struct QuoteService {
    base_url: String,
    timeout: Duration,
}

impl QuoteService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Command entry point: always yields a user-facing string
    pub fn reply(&self, args: &[String]) -> String {
        let Some(symbol) = args.first() else {
            return MISSING_SYMBOL.to_string();
        };
        let symbol = symbol.to_uppercase();

        match self.fetch(&symbol) {
            Ok(Some(quote)) => format!("{} ({}) is trading at ${}", quote.name, quote.symbol, quote.price),
            Ok(None) => format!("unknown response format (symbol was \"{}\")", symbol),
            Err(e) => {
                tracing::warn!(symbol = %symbol, "Quote lookup failed: {}", e);
                format!("error: {}", e)
            }
        }
    }

    /// Fetch and decode a quote. `Ok(None)` means the body had an unexpected shape.
    pub fn fetch(&self, symbol: &str) -> Result<Option<Quote>, BotError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| BotError::Network(e.to_string()))?;

        let response = client
            .get(&self.base_url)
            .query(&[("s", symbol), ("f", "nsl1op"), ("e", ".csv")])
            .send()
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Quote API error: {}", response.status())));
        }

        let body = response
            .text()
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(parse_quote(&body))
    }
}

/// Decode the first CSV row of a quote response
pub fn parse_quote(body: &str) -> Option<Quote> {
    let line = body.lines().map(str::trim).find(|l| !l.is_empty())?;
    let fields = split_csv_line(line);

    if fields.len() != QUOTE_FIELDS {
        return None;
    }

    let mut fields = fields.into_iter();
    Some(Quote {
        name: fields.next()?,
        symbol: fields.next()?,
        price: fields.next()?,
    })
}

/// Split one CSV line, honouring double-quoted fields
fn split_csv_line(line: &str) -> Vec<String> {
    CSV_FIELD
        .captures_iter(line)
        .map(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        })
        .collect()
}

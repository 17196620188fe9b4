//! Error taxonomy for weather and exchange-rate queries.
//!
//! Every failure a query can run into ends up as a [`QueryError`] whose
//! `Display` output is the short message shown to the user in place of results.

use reqwest::StatusCode;
use thiserror::Error;

/// A required user input that was left blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    City,
    Currencies,
    ApiKeys,
}

impl std::fmt::Display for MissingInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            MissingInput::City => "Please enter a city name.",
            MissingInput::Currencies => "Please enter both currencies.",
            MissingInput::ApiKeys => "Please enter both API keys to proceed.",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    /// A required field was blank; no request was made.
    #[error("{0}")]
    InputMissing(MissingInput),

    /// The provider answered with a non-success status.
    #[error("Unable to fetch {what}: {message}")]
    Remote {
        what: &'static str,
        status: StatusCode,
        message: String,
    },

    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("Unable to fetch {what}: {source}")]
    Transport {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Success status, but the body did not carry the expected fields.
    #[error("Unable to fetch {what}: malformed response ({detail})")]
    Decode { what: &'static str, detail: String },

    #[error("Invalid provider URL '{url}': {detail}")]
    InvalidBaseUrl { url: String, detail: String },

    #[error("Failed to initialise HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl QueryError {
    pub fn is_input_missing(&self) -> bool {
        matches!(self, QueryError::InputMissing(_))
    }
}

impl From<MissingInput> for QueryError {
    fn from(value: MissingInput) -> Self {
        QueryError::InputMissing(value)
    }
}

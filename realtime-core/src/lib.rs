//! Core library for the `realtime` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Clients for the weather and exchange-rate providers
//! - The query session that gates inputs before any request is made
//! - Shared domain models and text reports
//!
//! It is used by `realtime-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod report;
pub mod session;

pub use config::{Config, ProviderConfig};
pub use error::{MissingInput, QueryError};
pub use model::{ExchangeRateResult, WeatherResult};
pub use provider::{ProviderId, RateSource, WeatherSource};
pub use report::{RateReport, WeatherReport};
pub use session::Dashboard;

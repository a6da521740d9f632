use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{AirQualityReading, ForecastSeries, SeriesError};

pub mod waqi;

/// Any way a single city lookup can fail. Every variant is recoverable via
/// the fallback substitution in [`crate::resolver::Resolver`].
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request to the air-quality service failed")]
    Transport(#[from] reqwest::Error),

    /// The service answered but refused the query, e.g. "Unknown station".
    #[error("air-quality service rejected the query: {0}")]
    Rejected(String),

    #[error("could not decode the air-quality response")]
    Decode(#[source] serde_json::Error),

    /// The station exists but reports no numeric AQI (WAQI serves "-" for
    /// stale stations).
    #[error("no usable AQI value for '{0}'")]
    MissingAqi(String),

    #[error("malformed forecast: {0}")]
    MalformedForecast(#[from] SeriesError),
}

/// Read-only client for a third-party air-quality service, keyed by city name.
#[async_trait]
pub trait AirQualityProvider: Send + Sync + Debug {
    /// Latest observation for `city`.
    async fn get_current(&self, city: &str) -> Result<AirQualityReading, LookupError>;

    /// Seven-day AQI outlook for `city`.
    async fn get_forecast(&self, city: &str) -> Result<ForecastSeries, LookupError>;
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of days every forecast series must cover.
pub const FORECAST_DAYS: usize = 7;

/// Severity class of a wildfire event. Ordered: `Low < Moderate < High < Extreme`,
/// so `>=` filters work directly on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Intensity {
    Low,
    Moderate,
    High,
    Extreme,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "Low",
            Intensity::Moderate => "Moderate",
            Intensity::High => "High",
            Intensity::Extreme => "Extreme",
        }
    }

    pub const fn all() -> &'static [Intensity] {
        &[Intensity::Low, Intensity::Moderate, Intensity::High, Intensity::Extreme]
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intensity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Intensity::Low),
            "moderate" => Ok(Intensity::Moderate),
            "high" => Ok(Intensity::High),
            "extreme" => Ok(Intensity::Extreme),
            _ => Err(anyhow::anyhow!(
                "Unknown intensity '{s}'. Supported: low, moderate, high, extreme."
            )),
        }
    }
}

/// One row of the static wildfire dataset. Loaded once at startup and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WildfireEvent {
    pub name: String,
    pub country: String,
    pub date: NaiveDate,
    pub intensity: Intensity,
    pub latitude: f64,
    pub longitude: f64,
}

/// Outcome of resolving a user-supplied city name.
///
/// `resolved_city` is always non-empty: either the trimmed user input, or the
/// fallback city when the primary lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    pub raw_input: String,
    pub resolved_city: String,
    pub used_fallback: bool,
}

/// Latest observation for a city, as reported by the air-quality service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQualityReading {
    pub city: String,
    pub aqi: u16,
    pub measured_at: DateTime<Utc>,
    /// Pollutant code (e.g. "pm25", "no2") to reported value.
    pub pollutants: BTreeMap<String, f64>,
}

/// Predicted AQI for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_aqi: u16,
}

/// A week-long AQI outlook: exactly [`FORECAST_DAYS`] points in strictly
/// ascending date order. The constructor is the only way to build one, so the
/// shape holds everywhere downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSeries(Vec<ForecastPoint>);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("expected {FORECAST_DAYS} daily entries, got {0}")]
    WrongLength(usize),
    #[error("forecast dates are not in ascending order")]
    OutOfOrder,
}

impl ForecastSeries {
    pub fn new(points: Vec<ForecastPoint>) -> Result<Self, SeriesError> {
        if points.len() != FORECAST_DAYS {
            return Err(SeriesError::WrongLength(points.len()));
        }
        if points.windows(2).any(|w| w[0].date >= w[1].date) {
            return Err(SeriesError::OutOfOrder);
        }
        Ok(Self(points))
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.0
    }

    pub fn max_predicted_aqi(&self) -> u16 {
        self.0.iter().map(|p| p.predicted_aqi).max().unwrap_or(0)
    }
}

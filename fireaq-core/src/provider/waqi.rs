//! Client for the World Air Quality Index (WAQI) feed API.
//!
//! A single `GET https://api.waqi.info/feed/{city}/?token=...` carries both
//! the latest observation and the daily PM2.5 outlook, so both trait methods
//! share one fetch path.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::aqi::pm25_to_aqi;
use crate::model::{AirQualityReading, ForecastPoint, ForecastSeries, FORECAST_DAYS};

use super::{AirQualityProvider, LookupError};

const WAQI_BASE: &str = "https://api.waqi.info/feed";

#[derive(Debug, Clone)]
pub struct WaqiProvider {
    token: String,
    http: Client,
}

impl WaqiProvider {
    pub fn new(token: String) -> Self {
        Self { token, http: Client::new() }
    }

    async fn fetch_feed(&self, city: &str) -> Result<FeedData, LookupError> {
        let url = format!("{WAQI_BASE}/{city}/");

        let res = self
            .http
            .get(&url)
            .query(&[("token", self.token.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(LookupError::Rejected(format!(
                "HTTP {status}: {}",
                truncate_body(&body)
            )));
        }

        let envelope: FeedEnvelope =
            serde_json::from_str(&body).map_err(LookupError::Decode)?;

        if envelope.status != "ok" {
            // On error the `data` field is a bare message string.
            let reason = envelope
                .data
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| truncate_body(&body));
            return Err(LookupError::Rejected(reason));
        }

        serde_json::from_value(envelope.data).map_err(LookupError::Decode)
    }
}

#[async_trait]
impl AirQualityProvider for WaqiProvider {
    async fn get_current(&self, city: &str) -> Result<AirQualityReading, LookupError> {
        let feed = self.fetch_feed(city).await?;
        reading_from_feed(city, feed)
    }

    async fn get_forecast(&self, city: &str) -> Result<ForecastSeries, LookupError> {
        let feed = self.fetch_feed(city).await?;
        forecast_from_feed(Utc::now().date_naive(), feed)
    }
}

#[derive(Debug, Deserialize)]
struct FeedEnvelope {
    status: String,
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct FeedData {
    /// Numeric AQI, or the string "-" when the station has gone stale.
    aqi: serde_json::Value,
    city: FeedCity,
    time: Option<FeedTime>,
    #[serde(default)]
    iaqi: HashMap<String, IaqiValue>,
    forecast: Option<FeedForecast>,
}

#[derive(Debug, Deserialize)]
struct FeedCity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct FeedTime {
    iso: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IaqiValue {
    v: f64,
}

#[derive(Debug, Deserialize)]
struct FeedForecast {
    daily: FeedDaily,
}

#[derive(Debug, Deserialize, Default)]
struct FeedDaily {
    #[serde(default)]
    pm25: Vec<DailyEntry>,
}

#[derive(Debug, Deserialize)]
struct DailyEntry {
    avg: f64,
    day: NaiveDate,
}

fn reading_from_feed(city: &str, feed: FeedData) -> Result<AirQualityReading, LookupError> {
    let aqi = feed
        .aqi
        .as_f64()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u16)
        .ok_or_else(|| LookupError::MissingAqi(city.to_owned()))?;

    let measured_at = feed
        .time
        .as_ref()
        .and_then(|t| t.iso.as_deref())
        .and_then(|iso| DateTime::parse_from_rfc3339(iso).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let pollutants = feed.iaqi.into_iter().map(|(code, v)| (code, v.v)).collect();

    Ok(AirQualityReading {
        city: feed.city.name,
        aqi,
        measured_at,
        pollutants,
    })
}

fn forecast_from_feed(today: NaiveDate, feed: FeedData) -> Result<ForecastSeries, LookupError> {
    // The daily outlook usually starts a day or two in the past; keep today
    // onward and require a full week from there.
    let points: Vec<ForecastPoint> = feed
        .forecast
        .map(|f| f.daily.pm25)
        .unwrap_or_default()
        .into_iter()
        .filter(|entry| entry.day >= today)
        .take(FORECAST_DAYS)
        .map(|entry| ForecastPoint {
            date: entry.day,
            predicted_aqi: pm25_to_aqi(entry.avg),
        })
        .collect();

    Ok(ForecastSeries::new(points)?)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX { format!("{}...", &body[..MAX]) } else { body.to_string() }
}

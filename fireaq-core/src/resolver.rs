//! City lookup with a one-shot fallback.
//!
//! The dashboard must always have data to render, so a failed lookup is never
//! surfaced: the resolver substitutes a fixed city known to the service and
//! tries exactly once more. Only a failure of that second attempt escapes.

use thiserror::Error;

use crate::model::{AirQualityReading, CityQuery, ForecastSeries};
use crate::provider::{AirQualityProvider, LookupError};

/// City guaranteed to have valid data when the user's request cannot be
/// resolved.
pub const FALLBACK_CITY: &str = "Delhi";

/// Everything one render cycle needs: how the city was resolved, plus the
/// data fetched for it.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub query: CityQuery,
    pub current: AirQualityReading,
    pub forecast: ForecastSeries,
}

/// The fallback city itself could not be resolved. This violates the
/// "always populated" guarantee and is fatal to the render cycle.
#[derive(Debug, Error)]
#[error("fallback city '{fallback}' could not be resolved")]
pub struct FallbackError {
    pub fallback: String,
    #[source]
    pub source: LookupError,
}

#[derive(Debug)]
pub struct Resolver<'a> {
    provider: &'a dyn AirQualityProvider,
    fallback_city: String,
}

impl<'a> Resolver<'a> {
    pub fn new(provider: &'a dyn AirQualityProvider) -> Self {
        Self::with_fallback(provider, FALLBACK_CITY)
    }

    pub fn with_fallback(provider: &'a dyn AirQualityProvider, fallback_city: &str) -> Self {
        Self { provider, fallback_city: fallback_city.to_owned() }
    }

    /// Resolve `raw_input` to a populated dashboard state.
    ///
    /// `used_fallback` is true on the returned query if and only if the first
    /// attempt failed (which includes empty or whitespace-only input).
    pub async fn resolve(&self, raw_input: &str) -> Result<Resolution, FallbackError> {
        let trimmed = raw_input.trim();

        if !trimmed.is_empty() {
            match self.fetch(trimmed).await {
                Ok((current, forecast)) => {
                    return Ok(Resolution {
                        query: CityQuery {
                            raw_input: raw_input.to_owned(),
                            resolved_city: trimmed.to_owned(),
                            used_fallback: false,
                        },
                        current,
                        forecast,
                    });
                }
                Err(err) => {
                    log::debug!("lookup for '{trimmed}' failed, trying fallback: {err}");
                }
            }
        }

        let (current, forecast) =
            self.fetch(&self.fallback_city).await.map_err(|source| FallbackError {
                fallback: self.fallback_city.clone(),
                source,
            })?;

        Ok(Resolution {
            query: CityQuery {
                raw_input: raw_input.to_owned(),
                resolved_city: self.fallback_city.clone(),
                used_fallback: true,
            },
            current,
            forecast,
        })
    }

    async fn fetch(
        &self,
        city: &str,
    ) -> Result<(AirQualityReading, ForecastSeries), LookupError> {
        let current = self.provider.get_current(city).await?;
        let forecast = self.provider.get_forecast(city).await?;
        Ok((current, forecast))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ForecastPoint, ForecastSeries, FORECAST_DAYS};
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use std::collections::{BTreeMap, HashSet};

    /// Provider stub that only knows a fixed set of cities.
    #[derive(Debug, Default)]
    struct ScriptedProvider {
        known: HashSet<String>,
        broken_forecasts: HashSet<String>,
    }

    impl ScriptedProvider {
        fn knowing(cities: &[&str]) -> Self {
            Self {
                known: cities.iter().map(|c| (*c).to_owned()).collect(),
                broken_forecasts: HashSet::new(),
            }
        }

        fn with_broken_forecast(mut self, city: &str) -> Self {
            self.broken_forecasts.insert(city.to_owned());
            self
        }

        fn reading(city: &str) -> AirQualityReading {
            AirQualityReading {
                city: city.to_owned(),
                aqi: 72,
                measured_at: Utc::now(),
                pollutants: BTreeMap::from([("pm25".to_owned(), 22.0)]),
            }
        }

        fn series() -> ForecastSeries {
            let start = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
            let points = (0..FORECAST_DAYS as i64)
                .map(|i| ForecastPoint {
                    date: start + chrono::Duration::days(i),
                    predicted_aqi: 60,
                })
                .collect();
            ForecastSeries::new(points).unwrap()
        }
    }

    #[async_trait]
    impl AirQualityProvider for ScriptedProvider {
        async fn get_current(&self, city: &str) -> Result<AirQualityReading, LookupError> {
            if self.known.contains(city) {
                Ok(Self::reading(city))
            } else {
                Err(LookupError::Rejected("Unknown station".to_owned()))
            }
        }

        async fn get_forecast(&self, city: &str) -> Result<ForecastSeries, LookupError> {
            if self.broken_forecasts.contains(city) {
                return Err(LookupError::MalformedForecast(
                    crate::model::SeriesError::WrongLength(2),
                ));
            }
            if self.known.contains(city) {
                Ok(Self::series())
            } else {
                Err(LookupError::Rejected("Unknown station".to_owned()))
            }
        }
    }

    #[tokio::test]
    async fn known_city_resolves_without_fallback() {
        let provider = ScriptedProvider::knowing(&["Paris", FALLBACK_CITY]);
        let resolver = Resolver::new(&provider);

        let res = resolver.resolve("Paris").await.unwrap();
        assert!(!res.query.used_fallback);
        assert_eq!(res.query.resolved_city, "Paris");
        assert_eq!(res.current.city, "Paris");
    }

    #[tokio::test]
    async fn input_is_trimmed_before_lookup() {
        let provider = ScriptedProvider::knowing(&["Paris", FALLBACK_CITY]);
        let resolver = Resolver::new(&provider);

        let res = resolver.resolve("  Paris  ").await.unwrap();
        assert!(!res.query.used_fallback);
        assert_eq!(res.query.resolved_city, "Paris");
        assert_eq!(res.query.raw_input, "  Paris  ");
    }

    #[tokio::test]
    async fn unknown_city_falls_back() {
        let provider = ScriptedProvider::knowing(&[FALLBACK_CITY]);
        let resolver = Resolver::new(&provider);

        let res = resolver.resolve("Atlantis").await.unwrap();
        assert!(res.query.used_fallback);
        assert_eq!(res.query.resolved_city, FALLBACK_CITY);
        assert_eq!(res.query.raw_input, "Atlantis");
    }

    #[tokio::test]
    async fn empty_input_behaves_like_unknown_city() {
        let provider = ScriptedProvider::knowing(&[FALLBACK_CITY]);
        let resolver = Resolver::new(&provider);

        for input in ["", "   "] {
            let res = resolver.resolve(input).await.unwrap();
            assert!(res.query.used_fallback, "input {input:?}");
            assert_eq!(res.query.resolved_city, FALLBACK_CITY);
        }
    }

    #[tokio::test]
    async fn malformed_forecast_triggers_fallback() {
        let provider = ScriptedProvider::knowing(&["Paris", FALLBACK_CITY])
            .with_broken_forecast("Paris");
        let resolver = Resolver::new(&provider);

        let res = resolver.resolve("Paris").await.unwrap();
        assert!(res.query.used_fallback);
        assert_eq!(res.query.resolved_city, FALLBACK_CITY);
    }

    #[tokio::test]
    async fn fallback_failure_is_fatal() {
        let provider = ScriptedProvider::knowing(&[]);
        let resolver = Resolver::new(&provider);

        let err = resolver.resolve("Atlantis").await.unwrap_err();
        assert_eq!(err.fallback, FALLBACK_CITY);
        assert!(matches!(err.source, LookupError::Rejected(_)));
    }

    #[tokio::test]
    async fn custom_fallback_city_is_honored() {
        let provider = ScriptedProvider::knowing(&["Beijing"]);
        let resolver = Resolver::with_fallback(&provider, "Beijing");

        let res = resolver.resolve("Atlantis").await.unwrap();
        assert!(res.query.used_fallback);
        assert_eq!(res.query.resolved_city, "Beijing");
    }
}

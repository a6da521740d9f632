//! Core library for the `fireaq` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The air-quality provider abstraction and its WAQI client
//! - City lookup with the one-shot fallback guarantee
//! - EPA AQI breakpoint math
//! - The static wildfire dataset loader and filters
//!
//! It is used by `fireaq-cli`, but can also be reused by other binaries or services.

pub mod aqi;
pub mod config;
pub mod dataset;
pub mod model;
pub mod provider;
pub mod resolver;

pub use aqi::Category;
pub use config::Config;
pub use dataset::WildfireCatalog;
pub use model::{AirQualityReading, CityQuery, ForecastSeries, Intensity, WildfireEvent};
pub use provider::{AirQualityProvider, LookupError};
pub use resolver::{FALLBACK_CITY, FallbackError, Resolution, Resolver};

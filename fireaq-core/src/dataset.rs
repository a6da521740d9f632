//! Static wildfire dataset: loaded once at startup, read-only afterwards.

use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{Intensity, WildfireEvent};

/// The loaded event collection. Constructing one is the only mutation that
/// ever happens; every accessor borrows.
#[derive(Debug, Clone, Default)]
pub struct WildfireCatalog {
    events: Vec<WildfireEvent>,
}

impl WildfireCatalog {
    /// Load the catalog from a CSV file with columns
    /// `name,country,date,intensity,latitude,longitude`.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open wildfire dataset: {}", path.display()))?;

        Self::from_reader(&mut reader)
            .with_context(|| format!("Failed to parse wildfire dataset: {}", path.display()))
    }

    fn from_reader<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Self> {
        let mut events = Vec::new();
        for record in reader.deserialize() {
            let event: WildfireEvent = record.context("Malformed dataset row")?;
            events.push(event);
        }
        log::debug!("loaded {} wildfire events", events.len());
        Ok(Self { events })
    }

    pub fn events(&self) -> &[WildfireEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events matching both predicates, in original dataset order.
    ///
    /// `country` compares case-insensitively; `min_intensity` keeps events at
    /// or above the given class. `None` means "no filter".
    pub fn filter(
        &self,
        country: Option<&str>,
        min_intensity: Option<Intensity>,
    ) -> Vec<&WildfireEvent> {
        self.events
            .iter()
            .filter(|e| match country {
                Some(c) => e.country.eq_ignore_ascii_case(c),
                None => true,
            })
            .filter(|e| match min_intensity {
                Some(min) => e.intensity >= min,
                None => true,
            })
            .collect()
    }

    /// Distinct countries in first-appearance order, for filter prompts.
    pub fn countries(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for event in &self.events {
            if !seen.iter().any(|c: &&str| c.eq_ignore_ascii_case(&event.country)) {
                seen.push(event.country.as_str());
            }
        }
        seen
    }
}

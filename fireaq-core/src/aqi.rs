//! US EPA AQI math: PM2.5 concentration to index value, and index value to
//! the six standard categories. Breakpoints follow the 2024 EPA update.

use std::fmt;

/// Upper bound of the AQI scale; concentrations above the last breakpoint cap here.
pub const AQI_MAX: u16 = 500;

// (c_low, c_high, i_low, i_high) per the EPA PM2.5 NowCast/24h table.
const PM25_BREAKPOINTS: &[(f64, f64, u16, u16)] = &[
    (0.0, 9.0, 0, 50),
    (9.1, 35.4, 51, 100),
    (35.5, 55.4, 101, 150),
    (55.5, 125.4, 151, 200),
    (125.5, 225.4, 201, 300),
    (225.5, 325.4, 301, 500),
];

/// Convert a PM2.5 concentration in µg/m³ to an AQI value.
///
/// Linear interpolation within the matching breakpoint band; values above
/// 325.4 µg/m³ cap at [`AQI_MAX`]. Negative inputs clamp to 0.
pub fn pm25_to_aqi(concentration: f64) -> u16 {
    let c = concentration.max(0.0);
    for &(c_low, c_high, i_low, i_high) in PM25_BREAKPOINTS {
        if c >= c_low && c <= c_high {
            let span = f64::from(i_high - i_low);
            let frac = (c - c_low) / (c_high - c_low);
            return i_low + (frac * span).round() as u16;
        }
    }
    AQI_MAX
}

/// EPA AQI category bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl Category {
    pub fn from_aqi(aqi: u16) -> Self {
        match aqi {
            0..=50 => Category::Good,
            51..=100 => Category::Moderate,
            101..=150 => Category::UnhealthySensitive,
            151..=200 => Category::Unhealthy,
            201..=300 => Category::VeryUnhealthy,
            _ => Category::Hazardous,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Moderate => "Moderate",
            Category::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            Category::Unhealthy => "Unhealthy",
            Category::VeryUnhealthy => "Very Unhealthy",
            Category::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

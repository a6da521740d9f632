//! Terminal rendering of the three dashboard panels: event map, AQI gauge,
//! forecast chart. Each panel is a pure transform of already-resolved data;
//! nothing here talks to the network.

use chrono::NaiveDate;
use fireaq_core::model::ForecastSeries;
use fireaq_core::{Category, Intensity, Resolution, WildfireEvent};

const RESET: &str = "\x1b[0m";

const GAUGE_WIDTH: usize = 50;
const GAUGE_SCALE: u16 = 500;

const MAP_WIDTH: usize = 60;
const MAP_HEIGHT: usize = 16;

const CHART_HEIGHT: usize = 8;
const CHART_COL_WIDTH: usize = 6;

pub fn dashboard(resolution: &Resolution, events: &[&WildfireEvent]) {
    let current = &resolution.current;
    let query = &resolution.query;

    println!();
    if query.used_fallback {
        let asked = query.raw_input.trim();
        if asked.is_empty() {
            println!("No city given; showing {}.", query.resolved_city);
        } else {
            println!("'{asked}' was not found; showing {} instead.", query.resolved_city);
        }
        println!();
    }

    println!("Air quality — {}", current.city);
    println!("{}", gauge_line(current.aqi));
    if !current.pollutants.is_empty() {
        let breakdown: Vec<String> =
            current.pollutants.iter().map(|(code, v)| format!("{code}={v}")).collect();
        println!("  {}", breakdown.join("  "));
    }
    println!("  measured at {}", current.measured_at.format("%Y-%m-%d %H:%M UTC"));

    println!();
    println!("Wildfire events ({} shown)", events.len());
    for line in map_grid(events, MAP_WIDTH, MAP_HEIGHT) {
        println!("{line}");
    }

    println!();
    println!("7-day AQI forecast");
    for line in chart_rows(&resolution.forecast) {
        println!("{line}");
    }
    println!();
}

fn category_color(category: Category) -> &'static str {
    match category {
        Category::Good => "\x1b[32m",
        Category::Moderate => "\x1b[33m",
        Category::UnhealthySensitive => "\x1b[38;5;208m",
        Category::Unhealthy => "\x1b[31m",
        Category::VeryUnhealthy => "\x1b[35m",
        Category::Hazardous => "\x1b[38;5;88m",
    }
}

/// Horizontal AQI gauge, filled to `aqi` on a 0..=500 scale and colored by
/// EPA category.
fn gauge_line(aqi: u16) -> String {
    let category = Category::from_aqi(aqi);
    let filled = gauge_fill(aqi, GAUGE_WIDTH);
    format!(
        "  [{}{}{}{}] {} {}",
        category_color(category),
        "#".repeat(filled),
        RESET,
        ".".repeat(GAUGE_WIDTH - filled),
        aqi,
        category,
    )
}

fn gauge_fill(aqi: u16, width: usize) -> usize {
    let frac = f64::from(aqi.min(GAUGE_SCALE)) / f64::from(GAUGE_SCALE);
    let filled = (frac * width as f64).round() as usize;
    if aqi > 0 { filled.max(1).min(width) } else { 0 }
}

fn intensity_glyph(intensity: Intensity) -> char {
    match intensity {
        Intensity::Low => '.',
        Intensity::Moderate => '+',
        Intensity::High => '*',
        Intensity::Extreme => '#',
    }
}

/// Plot events on an auto-fitted lat/lon character grid. When two events land
/// on the same cell the higher intensity wins.
fn map_grid(events: &[&WildfireEvent], width: usize, height: usize) -> Vec<String> {
    if events.is_empty() {
        return vec!["  (no wildfire events match the current filters)".to_owned()];
    }

    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    for e in events {
        min_lat = min_lat.min(e.latitude);
        max_lat = max_lat.max(e.latitude);
        min_lon = min_lon.min(e.longitude);
        max_lon = max_lon.max(e.longitude);
    }

    // Pad the bounds so edge markers don't sit on the border, and keep a
    // minimum span so a single event still projects.
    let lat_pad = ((max_lat - min_lat) * 0.05).max(0.5);
    let lon_pad = ((max_lon - min_lon) * 0.05).max(0.5);
    min_lat -= lat_pad;
    max_lat += lat_pad;
    min_lon -= lon_pad;
    max_lon += lon_pad;

    let lat_span = max_lat - min_lat;
    let lon_span = max_lon - min_lon;

    let mut cells: Vec<Option<Intensity>> = vec![None; width * height];
    for e in events {
        let col = ((e.longitude - min_lon) / lon_span * (width - 1) as f64).round() as usize;
        let row = ((max_lat - e.latitude) / lat_span * (height - 1) as f64).round() as usize;
        let cell = &mut cells[row.min(height - 1) * width + col.min(width - 1)];
        *cell = Some(match *cell {
            Some(existing) => existing.max(e.intensity),
            None => e.intensity,
        });
    }

    let mut lines = Vec::with_capacity(height + 3);
    lines.push(format!("  +{}+", "-".repeat(width)));
    for row in 0..height {
        let body: String = (0..width)
            .map(|col| cells[row * width + col].map_or(' ', intensity_glyph))
            .collect();
        lines.push(format!("  |{body}|"));
    }
    lines.push(format!("  +{}+", "-".repeat(width)));
    lines.push(format!(
        "  lat {:.1}..{:.1}  lon {:.1}..{:.1}   . Low  + Moderate  * High  # Extreme",
        min_lat, max_lat, min_lon, max_lon
    ));
    lines
}

/// Vertical bar chart of the 7-day outlook, one column per day.
fn chart_rows(series: &ForecastSeries) -> Vec<String> {
    let points = series.points();
    let max = series.max_predicted_aqi().max(1);

    let mut lines = Vec::with_capacity(CHART_HEIGHT + 2);
    for row in 0..CHART_HEIGHT {
        let level = f64::from(max) * (CHART_HEIGHT - row) as f64 / CHART_HEIGHT as f64;
        let bars: String = points
            .iter()
            .map(|p| {
                if f64::from(p.predicted_aqi) >= level {
                    center("##", CHART_COL_WIDTH)
                } else {
                    " ".repeat(CHART_COL_WIDTH)
                }
            })
            .collect();
        lines.push(format!("  {:>4} |{bars}", level.round() as u16));
    }

    let dates: String = points.iter().map(|p| center(&short_date(p.date), CHART_COL_WIDTH)).collect();
    let values: String =
        points.iter().map(|p| center(&p.predicted_aqi.to_string(), CHART_COL_WIDTH)).collect();
    lines.push(format!("       +{}", "-".repeat(CHART_COL_WIDTH * points.len())));
    lines.push(format!("        {dates}"));
    lines.push(format!("        {values}"));
    lines
}

fn short_date(date: NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_owned();
    }
    let left = (width - len) / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(width - len - left))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fireaq_core::model::{ForecastPoint, FORECAST_DAYS};

    fn event(name: &str, intensity: Intensity, lat: f64, lon: f64) -> WildfireEvent {
        WildfireEvent {
            name: name.to_owned(),
            country: "Testland".to_owned(),
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            intensity,
            latitude: lat,
            longitude: lon,
        }
    }

    fn series() -> ForecastSeries {
        let start = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let points = (0..FORECAST_DAYS as i64)
            .map(|i| ForecastPoint {
                date: start + chrono::Duration::days(i),
                predicted_aqi: 40 + 10 * i as u16,
            })
            .collect();
        ForecastSeries::new(points).unwrap()
    }

    #[test]
    fn gauge_fill_tracks_the_scale() {
        assert_eq!(gauge_fill(0, 50), 0);
        assert_eq!(gauge_fill(250, 50), 25);
        assert_eq!(gauge_fill(500, 50), 50);
        // Above-scale values clamp instead of overflowing the bar.
        assert_eq!(gauge_fill(999, 50), 50);
        // A tiny nonzero AQI still shows at least one mark.
        assert_eq!(gauge_fill(1, 50), 1);
    }

    #[test]
    fn empty_map_renders_a_placeholder() {
        let lines = map_grid(&[], 20, 5);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("no wildfire events"));
    }

    #[test]
    fn map_places_each_intensity_glyph() {
        let a = event("a", Intensity::Low, -30.0, 140.0);
        let b = event("b", Intensity::Extreme, -35.0, 150.0);
        let lines = map_grid(&[&a, &b], 30, 10);

        let body = lines.join("\n");
        assert!(body.contains('.'), "low glyph missing:\n{body}");
        assert!(body.contains('#'), "extreme glyph missing:\n{body}");
    }

    #[test]
    fn colliding_events_keep_the_higher_intensity() {
        let a = event("a", Intensity::Low, -30.0, 140.0);
        let b = event("b", Intensity::High, -30.0, 140.0);
        let lines = map_grid(&[&a, &b], 20, 6);

        // Interior rows only; the legend line legitimately carries a '.'.
        let interior = lines[1..=6].join("\n");
        assert!(interior.contains('*'));
        assert!(!interior.contains('.'), "low glyph should be shadowed:\n{interior}");
    }

    #[test]
    fn chart_has_axis_rows_and_date_footer() {
        let lines = chart_rows(&series());
        assert_eq!(lines.len(), CHART_HEIGHT + 3);
        // Top row reaches the series maximum; footer carries the dates.
        assert!(lines[0].trim_start().starts_with("100"));
        assert!(lines[lines.len() - 2].contains("08-29"));
        assert!(lines[lines.len() - 2].contains("09-04"));
        assert!(lines[lines.len() - 1].contains("100"));
    }

    #[test]
    fn chart_tallest_bar_touches_the_top_row() {
        let lines = chart_rows(&series());
        assert!(lines[0].contains("##"));
    }
}

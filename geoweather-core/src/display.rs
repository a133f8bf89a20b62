//! Formatting a [`WeatherReport`] into the fields shown to the user.
//!
//! Every optional part of the report gates exactly one element of the view;
//! nothing here touches the network or the terminal.

use std::fmt;

use chrono::{Local, TimeZone};

use crate::{WeatherReport, provider::openweather::icon_url};

/// One labelled line in the details panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub label: &'static str,
    pub value: String,
}

/// A fully formatted report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherView {
    pub location: String,
    pub country: Option<String>,
    /// `("Lat: 35.0000°", "Lon: 139.0000°")`
    pub coordinates: Option<(String, String)>,
    pub temperature: String,
    pub icon_url: Option<String>,
    /// `"<main> - <description>"` of the first condition.
    pub condition: Option<String>,
    pub details: Vec<Detail>,
}

impl WeatherView {
    pub fn detail(&self, label: &str) -> Option<&str> {
        self.details.iter().find(|d| d.label == label).map(|d| d.value.as_str())
    }
}

/// Render with sunrise/sunset in the host's local time zone.
pub fn render(report: Option<&WeatherReport>) -> Option<WeatherView> {
    render_in(report, &Local)
}

/// Render with sunrise/sunset shown in `tz`.
pub fn render_in<Tz>(report: Option<&WeatherReport>, tz: &Tz) -> Option<WeatherView>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let report = report?;
    let main = &report.main;
    let sys = report.sys.as_ref();
    let first = report.weather.first();

    let mut details = Vec::new();
    let mut push = |label: &'static str, value: String| details.push(Detail { label, value });

    push("Feels like", celsius(main.feels_like));
    if let (Some(min), Some(max)) = (main.temp_min, main.temp_max) {
        push("Temp Range", format!("{} - {}", celsius(min), celsius(max)));
    }
    push("Humidity", format!("{}%", main.humidity));
    push("Pressure", hpa(main.pressure));
    if let Some(sea_level) = main.sea_level {
        push("Sea Level", hpa(sea_level));
    }
    if let Some(grnd_level) = main.grnd_level {
        push("Ground Level", hpa(grnd_level));
    }
    push("Wind Speed", format!("{} m/s", report.wind.speed));
    if let Some(deg) = report.wind.deg {
        push("Wind Direction", format!("{deg}° ({})", compass_point(deg)));
    }
    if let Some(visibility) = report.visibility {
        push("Visibility", format!("{:.1} km", visibility as f64 / 1000.0));
    }
    if let Some(all) = report.clouds.as_ref().and_then(|c| c.all) {
        push("Clouds", format!("{all}%"));
    }
    if let Some(sunrise) = sys.and_then(|s| s.sunrise).and_then(|ts| local_time(ts, tz)) {
        push("Sunrise", sunrise);
    }
    if let Some(sunset) = sys.and_then(|s| s.sunset).and_then(|ts| local_time(ts, tz)) {
        push("Sunset", sunset);
    }
    if let Some(offset) = report.timezone {
        push("Timezone", format_timezone(offset));
    }

    Some(WeatherView {
        location: report.name.clone(),
        country: sys.and_then(|s| s.country.clone()),
        coordinates: report
            .coord
            .map(|c| (format!("Lat: {:.4}°", c.lat), format!("Lon: {:.4}°", c.lon))),
        temperature: celsius(main.temp),
        icon_url: first.map(|w| icon_url(&w.icon)),
        condition: first.map(|w| format!("{} - {}", w.main, w.description)),
        details,
    })
}

/// Nearest whole degree, ties away from zero.
fn celsius(value: f64) -> String {
    // `as i64` also turns -0.0 into 0.
    format!("{}°C", value.round() as i64)
}

fn hpa(value: i64) -> String {
    format!("{value} hPa")
}

fn local_time<Tz>(timestamp: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    tz.timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.format("%H:%M").to_string())
}

/// `UTC+9`, `UTC-3.5`, `UTC+0`.
pub fn format_timezone(offset_seconds: i64) -> String {
    let sign = if offset_seconds >= 0 { '+' } else { '-' };
    let hours = (offset_seconds as f64 / 3600.0).abs();
    format!("UTC{sign}{hours}")
}

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

fn compass_point(deg: f64) -> &'static str {
    let idx = (deg.rem_euclid(360.0) / 22.5).round() as usize % COMPASS.len();
    COMPASS[idx]
}

impl fmt::Display for WeatherView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => writeln!(f, "{}, {}", self.location, country)?,
            None => writeln!(f, "{}", self.location)?,
        }
        if let Some((lat, lon)) = &self.coordinates {
            writeln!(f, "{lat}  {lon}")?;
        }
        writeln!(f)?;

        match &self.condition {
            Some(condition) => writeln!(f, "{}  {}", self.temperature, condition)?,
            None => writeln!(f, "{}", self.temperature)?,
        }
        if let Some(url) = &self.icon_url {
            writeln!(f, "Icon: {url}")?;
        }
        writeln!(f)?;

        for detail in &self.details {
            writeln!(f, "  {:<15}{}", detail.label, detail.value)?;
        }
        Ok(())
    }
}

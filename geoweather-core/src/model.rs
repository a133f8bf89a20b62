use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Current conditions as returned by OpenWeather `/data/2.5/weather`.
///
/// The typed fields are a read-only view for display. The body as received is
/// kept alongside and is what gets serialized, so numbers keep their original
/// form (`187` stays `187`) and unmodelled fields survive.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub name: String,
    pub weather: Vec<Condition>,
    pub main: MainReadings,
    pub wind: Wind,
    pub coord: Option<Coordinate>,
    pub sys: Option<Sys>,
    /// Metres.
    pub visibility: Option<i64>,
    pub clouds: Option<Clouds>,
    /// Offset from UTC in seconds.
    pub timezone: Option<i64>,
    raw: Value,
}

/// Typed fields of a report body; everything else stays in the raw value.
#[derive(Debug, Deserialize)]
struct ReportFields {
    name: String,
    weather: Vec<Condition>,
    main: MainReadings,
    wind: Wind,
    #[serde(default)]
    coord: Option<Coordinate>,
    #[serde(default)]
    sys: Option<Sys>,
    #[serde(default)]
    visibility: Option<i64>,
    #[serde(default)]
    clouds: Option<Clouds>,
    #[serde(default)]
    timezone: Option<i64>,
}

impl WeatherReport {
    /// Parse a body, keeping it verbatim.
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let fields = ReportFields::deserialize(&raw)?;

        Ok(Self {
            name: fields.name,
            weather: fields.weather,
            main: fields.main,
            wind: fields.wind,
            coord: fields.coord,
            sys: fields.sys,
            visibility: fields.visibility,
            clouds: fields.clouds,
            timezone: fields.timezone,
            raw,
        })
    }

    /// The body exactly as the provider sent it.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl<'de> Deserialize<'de> for WeatherReport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        WeatherReport::from_value(raw).map_err(serde::de::Error::custom)
    }
}

impl Serialize for WeatherReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MainReadings {
    /// Celsius.
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: i64,
    /// hPa.
    pub pressure: i64,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
    #[serde(default)]
    pub sea_level: Option<i64>,
    #[serde(default)]
    pub grnd_level: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wind {
    /// m/s.
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub country: Option<String>,
    /// Unix seconds.
    #[serde(default)]
    pub sunrise: Option<i64>,
    #[serde(default)]
    pub sunset: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Clouds {
    /// Percent.
    #[serde(default)]
    pub all: Option<i64>,
}

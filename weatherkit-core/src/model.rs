//! Typed shapes of WeatherKit responses.
//!
//! Every attribute is optional: the provider omits whatever it does not have,
//! and absence must never fail decoding. Responses are read in the provider's
//! camelCase and written back out in snake_case so the same types can be
//! embedded in rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A point on the globe, sent to the provider as fixed-point decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude_segment(&self) -> String {
        format!("{:.6}", self.latitude)
    }

    pub fn longitude_segment(&self) -> String {
        format!("{:.6}", self.longitude)
    }
}

/// Treat an explicit `null` array the same as a missing one.
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct WeatherMetadata {
    #[serde(rename(deserialize = "attributionURL"), alias = "attributionUrl")]
    pub attribution_url: Option<String>,
    pub expire_time: Option<DateTime<Utc>>,
    pub language: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub provider_name: Option<String>,
    pub read_time: Option<DateTime<Utc>>,
    pub reported_time: Option<DateTime<Utc>>,
    pub units: Option<String>,
    pub version: Option<i64>,
}

/// Envelope for `/weather`; only the requested data sets are populated.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Weather {
    pub current_weather: Option<CurrentWeather>,
    pub forecast_daily: Option<DailyForecast>,
    pub forecast_hourly: Option<HourlyForecast>,
    pub forecast_next_hour: Option<NextHourForecast>,
    pub weather_alerts: Option<WeatherAlertCollection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct CurrentWeather {
    pub as_of: Option<DateTime<Utc>>,
    pub cloud_cover: Option<f64>,
    pub condition_code: Option<String>,
    pub daylight: Option<bool>,
    pub humidity: Option<f64>,
    pub precipitation_intensity: Option<f64>,
    pub pressure: Option<f64>,
    pub pressure_trend: Option<String>,
    pub temperature: Option<f64>,
    pub temperature_apparent: Option<f64>,
    pub temperature_dew_point: Option<f64>,
    pub uv_index: Option<i64>,
    pub visibility: Option<f64>,
    pub wind_direction: Option<i64>,
    pub wind_gust: Option<f64>,
    pub wind_speed: Option<f64>,
    #[serde(skip_serializing)]
    pub metadata: Option<WeatherMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DailyForecast {
    #[serde(deserialize_with = "nullable_vec")]
    pub days: Vec<DayWeatherConditions>,
    pub metadata: Option<WeatherMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct DayWeatherConditions {
    pub condition_code: Option<String>,
    pub daytime_forecast: Option<DayPartForecast>,
    pub forecast_end: Option<DateTime<Utc>>,
    pub forecast_start: Option<DateTime<Utc>>,
    pub max_uv_index: Option<i64>,
    pub moon_phase: Option<String>,
    pub moonrise: Option<DateTime<Utc>>,
    pub moonset: Option<DateTime<Utc>>,
    pub overnight_forecast: Option<DayPartForecast>,
    pub precipitation_amount: Option<f64>,
    pub precipitation_chance: Option<f64>,
    pub precipitation_type: Option<String>,
    pub snowfall_amount: Option<f64>,
    pub solar_midnight: Option<DateTime<Utc>>,
    pub solar_noon: Option<DateTime<Utc>>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunrise_astronomical: Option<DateTime<Utc>>,
    pub sunrise_civil: Option<DateTime<Utc>>,
    pub sunrise_nautical: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub sunset_astronomical: Option<DateTime<Utc>>,
    pub sunset_civil: Option<DateTime<Utc>>,
    pub sunset_nautical: Option<DateTime<Utc>>,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
}

/// Daytime (7 AM to 7 PM) or overnight (7 PM to 7 AM) part of a day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct DayPartForecast {
    pub cloud_cover: Option<f64>,
    pub condition_code: Option<String>,
    pub forecast_end: Option<DateTime<Utc>>,
    pub forecast_start: Option<DateTime<Utc>>,
    pub humidity: Option<f64>,
    pub precipitation_amount: Option<f64>,
    pub precipitation_chance: Option<f64>,
    pub precipitation_type: Option<String>,
    pub snowfall_amount: Option<f64>,
    pub wind_direction: Option<i64>,
    pub wind_speed: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HourlyForecast {
    #[serde(deserialize_with = "nullable_vec")]
    pub hours: Vec<HourWeatherConditions>,
    pub metadata: Option<WeatherMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct HourWeatherConditions {
    pub cloud_cover: Option<f64>,
    pub condition_code: Option<String>,
    pub daylight: Option<bool>,
    pub forecast_start: Option<DateTime<Utc>>,
    pub humidity: Option<f64>,
    pub precipitation_amount: Option<f64>,
    pub precipitation_chance: Option<f64>,
    pub precipitation_type: Option<String>,
    pub pressure: Option<f64>,
    pub pressure_trend: Option<String>,
    pub snowfall_intensity: Option<f64>,
    pub temperature: Option<f64>,
    pub temperature_apparent: Option<f64>,
    pub temperature_dew_point: Option<f64>,
    pub uv_index: Option<i64>,
    pub visibility: Option<f64>,
    pub wind_direction: Option<i64>,
    pub wind_gust: Option<f64>,
    pub wind_speed: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NextHourForecast {
    pub forecast_end: Option<DateTime<Utc>>,
    pub forecast_start: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "nullable_vec")]
    pub minutes: Vec<ForecastMinute>,
    #[serde(deserialize_with = "nullable_vec")]
    pub summary: Vec<ForecastPeriodSummary>,
    pub metadata: Option<WeatherMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct ForecastMinute {
    pub precipitation_chance: Option<f64>,
    pub precipitation_intensity: Option<f64>,
    pub start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct ForecastPeriodSummary {
    pub condition: Option<String>,
    pub end_time: Option<DateTime<Utc>>,
    pub precipitation_chance: Option<f64>,
    pub precipitation_intensity: Option<f64>,
    pub start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeatherAlertCollection {
    #[serde(deserialize_with = "nullable_vec")]
    pub alerts: Vec<WeatherAlertSummary>,
    #[serde(rename = "detailsUrl", alias = "detailsURL")]
    pub details_url: Option<String>,
    pub metadata: Option<WeatherMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct WeatherAlertSummary {
    pub area_id: Option<String>,
    pub area_name: Option<String>,
    pub certainty: Option<String>,
    pub country_code: Option<String>,
    pub description: Option<String>,
    #[serde(rename(deserialize = "detailsUrl"), alias = "detailsURL")]
    pub details_url: Option<String>,
    pub effective_time: Option<DateTime<Utc>>,
    pub event_end_time: Option<DateTime<Utc>>,
    pub event_onset_time: Option<DateTime<Utc>>,
    pub expire_time: Option<DateTime<Utc>>,
    pub id: Option<String>,
    pub issued_time: Option<DateTime<Utc>>,
    pub precedence: Option<i64>,
    pub responses: Option<Vec<String>>,
    pub severity: Option<String>,
    pub source: Option<String>,
    pub urgency: Option<String>,
}

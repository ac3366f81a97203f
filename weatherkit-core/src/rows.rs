//! Flattening of decoded responses into independent rows.
//!
//! Sequence categories yield one row per element in provider order. The
//! response-level metadata block is copied into every row, and so is the
//! queried coordinate.

use chrono::{DateTime, Utc};
use log::trace;
use serde::Serialize;

use crate::model::{
    Coordinate, CurrentWeather, DailyForecast, DayWeatherConditions, ForecastMinute,
    HourWeatherConditions, HourlyForecast, NextHourForecast, Weather, WeatherAlertCollection,
    WeatherAlertSummary, WeatherMetadata,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityRow {
    pub latitude: f64,
    pub longitude: f64,
    pub data_set: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWeatherRow {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub conditions: CurrentWeather,
    pub metadata: Option<WeatherMetadata>,
}

/// One day; the daytime and overnight parts stay nested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecastRow {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub day: DayWeatherConditions,
    pub metadata: Option<WeatherMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyForecastRow {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub hour: HourWeatherConditions,
    pub metadata: Option<WeatherMetadata>,
}

/// One minute of the next-hour forecast, tagged with the forecast window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextHourForecastRow {
    pub latitude: f64,
    pub longitude: f64,
    pub forecast_start: Option<DateTime<Utc>>,
    pub forecast_end: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub minute: ForecastMinute,
    pub metadata: Option<WeatherMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherAlertRow {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub alert: WeatherAlertSummary,
    pub metadata: Option<WeatherMetadata>,
}

/// Any row a table can produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Row {
    Availability(AvailabilityRow),
    CurrentWeather(CurrentWeatherRow),
    DailyForecast(DailyForecastRow),
    HourlyForecast(HourlyForecastRow),
    NextHourForecast(NextHourForecastRow),
    WeatherAlert(WeatherAlertRow),
}

macro_rules! impl_into_row {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Row {
                fn from(row: $ty) -> Self {
                    Row::$variant(row)
                }
            }
        )*
    };
}

impl_into_row! {
    AvailabilityRow => Availability,
    CurrentWeatherRow => CurrentWeather,
    DailyForecastRow => DailyForecast,
    HourlyForecastRow => HourlyForecast,
    NextHourForecastRow => NextHourForecast,
    WeatherAlertRow => WeatherAlert,
}

/// Where rows go, supplied by the host.
pub trait RowSink: Send {
    fn emit(&mut self, row: Row);

    /// Polled before every row; once true, streaming stops quietly.
    fn is_cancelled(&self) -> bool;
}

impl RowSink for Vec<Row> {
    fn emit(&mut self, row: Row) {
        self.push(row);
    }

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Push rows into `sink` until exhausted or cancelled; returns how many were emitted.
pub fn stream_rows<R, I>(rows: I, sink: &mut dyn RowSink) -> usize
where
    R: Into<Row>,
    I: IntoIterator<Item = R>,
{
    let mut rows = rows.into_iter();
    let mut emitted = 0;

    loop {
        if sink.is_cancelled() {
            trace!("row streaming cancelled after {emitted} rows");
            break;
        }
        let Some(row) = rows.next() else {
            break;
        };
        sink.emit(row.into());
        emitted += 1;
    }

    emitted
}

pub fn availability_rows(
    coord: Coordinate,
    data_sets: Vec<String>,
) -> impl Iterator<Item = AvailabilityRow> {
    data_sets.into_iter().map(move |data_set| AvailabilityRow {
        latitude: coord.latitude,
        longitude: coord.longitude,
        data_set,
    })
}

/// Always exactly one row, even when the provider omitted the block.
pub fn current_weather_rows(
    coord: Coordinate,
    weather: Weather,
) -> impl Iterator<Item = CurrentWeatherRow> {
    let mut conditions = weather.current_weather.unwrap_or_default();
    let metadata = conditions.metadata.take();

    std::iter::once(CurrentWeatherRow {
        latitude: coord.latitude,
        longitude: coord.longitude,
        conditions,
        metadata,
    })
}

pub fn daily_forecast_rows(
    coord: Coordinate,
    weather: Weather,
) -> impl Iterator<Item = DailyForecastRow> {
    let DailyForecast { days, metadata } = weather.forecast_daily.unwrap_or_default();

    days.into_iter().map(move |day| DailyForecastRow {
        latitude: coord.latitude,
        longitude: coord.longitude,
        day,
        metadata: metadata.clone(),
    })
}

pub fn hourly_forecast_rows(
    coord: Coordinate,
    weather: Weather,
) -> impl Iterator<Item = HourlyForecastRow> {
    let HourlyForecast { hours, metadata } = weather.forecast_hourly.unwrap_or_default();

    hours.into_iter().map(move |hour| HourlyForecastRow {
        latitude: coord.latitude,
        longitude: coord.longitude,
        hour,
        metadata: metadata.clone(),
    })
}

/// One row per minute; the period summaries are not rows.
pub fn next_hour_forecast_rows(
    coord: Coordinate,
    weather: Weather,
) -> impl Iterator<Item = NextHourForecastRow> {
    let NextHourForecast {
        forecast_start,
        forecast_end,
        minutes,
        metadata,
        ..
    } = weather.forecast_next_hour.unwrap_or_default();

    minutes.into_iter().map(move |minute| NextHourForecastRow {
        latitude: coord.latitude,
        longitude: coord.longitude,
        forecast_start,
        forecast_end,
        minute,
        metadata: metadata.clone(),
    })
}

pub fn weather_alert_rows(
    coord: Coordinate,
    weather: Weather,
) -> impl Iterator<Item = WeatherAlertRow> {
    let WeatherAlertCollection {
        alerts, metadata, ..
    } = weather.weather_alerts.unwrap_or_default();

    alerts.into_iter().map(move |alert| WeatherAlertRow {
        latitude: coord.latitude,
        longitude: coord.longitude,
        alert,
        metadata: metadata.clone(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Collects rows and reports cancellation once `limit` rows have arrived.
    pub(crate) struct CancelAfter {
        pub(crate) rows: Vec<Row>,
        pub(crate) limit: usize,
    }

    impl RowSink for CancelAfter {
        fn emit(&mut self, row: Row) {
            self.rows.push(row);
        }

        fn is_cancelled(&self) -> bool {
            self.rows.len() >= self.limit
        }
    }

    fn coord() -> Coordinate {
        Coordinate::new(37.0, -122.0)
    }

    fn weather(value: serde_json::Value) -> Weather {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn daily_rows_carry_metadata_into_every_day() {
        let weather = weather(json!({
            "forecastDaily": {
                "metadata": {"latitude": 37.0, "longitude": -122.0, "units": "m"},
                "days": [
                    {"conditionCode": "Clear", "daytimeForecast": {"humidity": 0.4}},
                    {"conditionCode": "Rain"},
                    {}
                ]
            }
        }));

        let rows: Vec<_> = daily_forecast_rows(coord(), weather).collect();

        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.metadata.as_ref().and_then(|m| m.latitude), Some(37.0));
        }
        assert_eq!(rows[0].day.condition_code.as_deref(), Some("Clear"));
        assert_eq!(rows[1].day.condition_code.as_deref(), Some("Rain"));
        assert_eq!(
            rows[0].day.daytime_forecast.as_ref().and_then(|p| p.humidity),
            Some(0.4)
        );
    }

    #[test]
    fn daily_row_serializes_day_parts_as_one_structured_column() {
        let weather = weather(json!({
            "forecastDaily": {"days": [{"daytimeForecast": {"cloudCover": 0.2}}]}
        }));
        let row = daily_forecast_rows(coord(), weather).next().unwrap();

        let value = serde_json::to_value(Row::from(row)).unwrap();

        assert_eq!(value["daytime_forecast"]["cloud_cover"], 0.2);
        assert!(value["overnight_forecast"].is_null());
        assert_eq!(value["latitude"], 37.0);
        assert!(value.get("daytimeForecast").is_none());
    }

    #[test]
    fn current_weather_is_one_row_with_coordinates_and_metadata() {
        let weather = weather(json!({
            "currentWeather": {
                "temperature": 21.5,
                "metadata": {"units": "m", "version": 1}
            }
        }));

        let rows: Vec<_> = current_weather_rows(coord(), weather).collect();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].latitude, 37.0);
        assert_eq!(rows[0].longitude, -122.0);
        assert_eq!(rows[0].conditions.temperature, Some(21.5));
        assert_eq!(
            rows[0].metadata.as_ref().and_then(|m| m.units.as_deref()),
            Some("m")
        );
        assert!(rows[0].conditions.metadata.is_none());
    }

    #[test]
    fn missing_blocks_yield_no_rows_except_for_current_weather() {
        assert_eq!(daily_forecast_rows(coord(), Weather::default()).count(), 0);
        assert_eq!(hourly_forecast_rows(coord(), Weather::default()).count(), 0);
        assert_eq!(next_hour_forecast_rows(coord(), Weather::default()).count(), 0);
        assert_eq!(weather_alert_rows(coord(), Weather::default()).count(), 0);

        let current: Vec<_> = current_weather_rows(coord(), Weather::default()).collect();
        assert_eq!(current.len(), 1);
        assert!(current[0].conditions.temperature.is_none());
    }

    #[test]
    fn next_hour_rows_are_per_minute_with_window() {
        let weather = weather(json!({
            "forecastNextHour": {
                "forecastStart": "2024-06-01T12:00:00Z",
                "forecastEnd": "2024-06-01T13:00:00Z",
                "minutes": [
                    {"startTime": "2024-06-01T12:00:00Z", "precipitationChance": 0.1},
                    {"startTime": "2024-06-01T12:01:00Z", "precipitationChance": 0.2}
                ],
                "summary": [{"condition": "clear"}]
            }
        }));

        let rows: Vec<_> = next_hour_forecast_rows(coord(), weather).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].minute.precipitation_chance, Some(0.2));
        assert_eq!(
            rows[0].forecast_end.map(|t| t.to_rfc3339()),
            Some("2024-06-01T13:00:00+00:00".to_string())
        );
    }

    #[test]
    fn alert_rows_keep_provider_order_and_responses() {
        let weather = weather(json!({
            "weatherAlerts": {
                "alerts": [
                    {"id": "b", "severity": "severe", "responses": ["shelter", "monitor"]},
                    {"id": "a", "severity": "minor"}
                ],
                "metadata": {"latitude": 37.0}
            }
        }));

        let rows: Vec<_> = weather_alert_rows(coord(), weather).collect();

        let ids: Vec<_> = rows.iter().map(|r| r.alert.id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(
            rows[0].alert.responses.as_deref(),
            Some(&["shelter".to_string(), "monitor".to_string()][..])
        );
        assert!(rows[1].alert.responses.is_none());
    }

    #[test]
    fn availability_rows_follow_response_order() {
        let rows: Vec<_> = availability_rows(
            coord(),
            vec!["currentWeather".into(), "forecastDaily".into()],
        )
        .collect();

        let names: Vec<_> = rows.iter().map(|r| r.data_set.as_str()).collect();
        assert_eq!(names, vec!["currentWeather", "forecastDaily"]);
    }

    #[test]
    fn streaming_stops_when_the_sink_cancels() {
        let hours: Vec<_> = (0..1000).map(|_| json!({"temperature": 10.0})).collect();
        let weather = weather(json!({"forecastHourly": {"hours": hours}}));
        let mut sink = CancelAfter {
            rows: Vec::new(),
            limit: 500,
        };

        let emitted = stream_rows(hourly_forecast_rows(coord(), weather), &mut sink);

        assert_eq!(emitted, 500);
        assert_eq!(sink.rows.len(), 500);
    }

    #[test]
    fn streaming_into_a_vec_emits_everything() {
        let mut rows: Vec<Row> = Vec::new();
        let emitted = stream_rows(
            availability_rows(coord(), vec!["weatherAlerts".into()]),
            &mut rows,
        );

        assert_eq!(emitted, 1);
        assert!(matches!(&rows[0], Row::Availability(r) if r.data_set == "weatherAlerts"));
    }
}

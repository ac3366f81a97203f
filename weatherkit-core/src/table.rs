//! Tables exposed to the query host: names, column declarations, and the
//! scan that connects, fetches, projects and streams rows.

use std::fmt;

use crate::connection::ConnectionCache;
use crate::error::{Result, WeatherKitError};
use crate::quals::{FORECAST_START, LATITUDE, LONGITUDE, Operator, Qualifiers};
use crate::rows::{
    RowSink, availability_rows, current_weather_rows, daily_forecast_rows, hourly_forecast_rows,
    next_hour_forecast_rows, stream_rows, weather_alert_rows,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    String,
    Double,
    Int,
    Bool,
    Timestamp,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub description: &'static str,
}

const fn col(name: &'static str, column_type: ColumnType, description: &'static str) -> Column {
    Column {
        name,
        column_type,
        description,
    }
}

/// A qualifier column the host may push down to a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyColumn {
    pub name: &'static str,
    pub operators: &'static [Operator],
    pub required: bool,
}

const COORDINATE_KEYS: &[KeyColumn] = &[
    KeyColumn {
        name: LATITUDE,
        operators: &[Operator::Eq],
        required: true,
    },
    KeyColumn {
        name: LONGITUDE,
        operators: &[Operator::Eq],
        required: true,
    },
];

const HOURLY_KEYS: &[KeyColumn] = &[
    COORDINATE_KEYS[0],
    COORDINATE_KEYS[1],
    KeyColumn {
        name: FORECAST_START,
        operators: &[
            Operator::Eq,
            Operator::Lt,
            Operator::LtEq,
            Operator::Gt,
            Operator::GtEq,
        ],
        required: false,
    },
];

use ColumnType::{Bool, Double, Int, Json, String as Text, Timestamp};

const LATITUDE_COL: Column = col(
    LATITUDE,
    Double,
    "A numeric value indicating the latitude of the coordinate between -90 and 90.",
);
const LONGITUDE_COL: Column = col(
    LONGITUDE,
    Double,
    "A numeric value indicating the longitude of the coordinate between -180 and 180.",
);
const METADATA_COL: Column = col(
    "metadata",
    Json,
    "Descriptive information about the weather data.",
);

const AVAILABILITY_COLUMNS: &[Column] = &[
    LATITUDE_COL,
    LONGITUDE_COL,
    col(
        "data_set",
        Text,
        "The collection of weather information for a location.",
    ),
];

const CURRENT_WEATHER_COLUMNS: &[Column] = &[
    LATITUDE_COL,
    LONGITUDE_COL,
    col("as_of", Timestamp, "The date and time."),
    col(
        "cloud_cover",
        Double,
        "The percentage of the sky covered with clouds during the period, from 0 to 1.",
    ),
    col(
        "condition_code",
        Text,
        "An enumeration value indicating the condition at the time.",
    ),
    col("daylight", Bool, "A Boolean value indicating whether there is daylight."),
    col("humidity", Double, "The relative humidity, from 0 to 1."),
    col(
        "precipitation_intensity",
        Double,
        "The precipitation intensity, in millimeters per hour.",
    ),
    col("pressure", Double, "The sea level air pressure, in millibars."),
    col(
        "pressure_trend",
        Text,
        "The direction of change of the sea-level air pressure.",
    ),
    col("temperature", Double, "The current temperature, in degrees Celsius."),
    col(
        "temperature_apparent",
        Double,
        "The feels-like temperature when factoring wind and humidity, in degrees Celsius.",
    ),
    col(
        "temperature_dew_point",
        Double,
        "The temperature at which relative humidity is 100%, in Celsius.",
    ),
    col("uv_index", Int, "The level of ultraviolet radiation."),
    col("visibility", Double, "The distance at which terrain is visible, in meters."),
    col("wind_direction", Int, "The direction of the wind, in degrees."),
    col(
        "wind_gust",
        Double,
        "The maximum wind gust speed, in kilometers per hour.",
    ),
    col("wind_speed", Double, "The wind speed, in kilometers per hour."),
    METADATA_COL,
];

const DAILY_FORECAST_COLUMNS: &[Column] = &[
    LATITUDE_COL,
    LONGITUDE_COL,
    col(
        "condition_code",
        Text,
        "An enumeration value indicating the condition at the time.",
    ),
    col(
        "daytime_forecast",
        Json,
        "The forecast between 7 AM and 7 PM for the day.",
    ),
    col("forecast_end", Timestamp, "The ending date and time of the day."),
    col("forecast_start", Timestamp, "The starting date and time of the day."),
    col(
        "max_uv_index",
        Int,
        "The maximum ultraviolet index value during the day.",
    ),
    col("moon_phase", Text, "The phase of the moon on the specified day."),
    col("moonrise", Timestamp, "The time of moonrise on the specified day."),
    col("moonset", Timestamp, "The time of moonset on the specified day."),
    col(
        "overnight_forecast",
        Json,
        "The day part forecast between 7 PM and 7 AM for the overnight.",
    ),
    col(
        "precipitation_amount",
        Double,
        "The amount of precipitation forecasted to occur during the day, in millimeters.",
    ),
    col(
        "precipitation_chance",
        Double,
        "The chance of precipitation forecasted to occur during the day.",
    ),
    col(
        "precipitation_type",
        Text,
        "The type of precipitation forecasted to occur during the day.",
    ),
    col(
        "snowfall_amount",
        Double,
        "The depth of snow as ice crystals forecasted to occur during the day, in millimeters.",
    ),
    col("solar_midnight", Timestamp, "The time when the sun is lowest in the sky."),
    col("solar_noon", Timestamp, "The time when the sun is highest in the sky."),
    col(
        "sunrise",
        Timestamp,
        "The time when the top edge of the sun reaches the horizon in the morning.",
    ),
    col(
        "sunrise_astronomical",
        Timestamp,
        "The time when the sun is 18 degrees below the horizon in the morning.",
    ),
    col(
        "sunrise_civil",
        Timestamp,
        "The time when the sun is 6 degrees below the horizon in the morning.",
    ),
    col(
        "sunrise_nautical",
        Timestamp,
        "The time when the sun is 12 degrees below the horizon in the morning.",
    ),
    col(
        "sunset",
        Timestamp,
        "The time when the top edge of the sun reaches the horizon in the evening.",
    ),
    col(
        "sunset_astronomical",
        Timestamp,
        "The time when the sun is 18 degrees below the horizon in the evening.",
    ),
    col(
        "sunset_civil",
        Timestamp,
        "The time when the sun is 6 degrees below the horizon in the evening.",
    ),
    col(
        "sunset_nautical",
        Timestamp,
        "The time when the sun is 12 degrees below the horizon in the evening.",
    ),
    col(
        "temperature_max",
        Double,
        "The maximum temperature forecasted to occur during the day, in degrees Celsius.",
    ),
    col(
        "temperature_min",
        Double,
        "The minimum temperature forecasted to occur during the day, in degrees Celsius.",
    ),
    METADATA_COL,
];

const HOURLY_FORECAST_COLUMNS: &[Column] = &[
    LATITUDE_COL,
    LONGITUDE_COL,
    col(
        "cloud_cover",
        Double,
        "The percentage of the sky covered with clouds during the period, from 0 to 1.",
    ),
    col(
        "condition_code",
        Text,
        "An enumeration value indicating the condition at the time.",
    ),
    col(
        "daylight",
        Bool,
        "Indicates whether the hour starts during the day or night.",
    ),
    col(
        "forecast_start",
        Timestamp,
        "The starting date and time of the forecast.",
    ),
    col(
        "humidity",
        Double,
        "The relative humidity at the start of the hour, from 0 to 1.",
    ),
    col(
        "precipitation_amount",
        Double,
        "The amount of precipitation forecasted to occur during period, in millimeters.",
    ),
    col(
        "precipitation_chance",
        Double,
        "The chance of precipitation forecasted to occur during the hour, from 0 to 1.",
    ),
    col(
        "precipitation_type",
        Text,
        "The type of precipitation forecasted to occur during the period.",
    ),
    col("pressure", Double, "The sea-level air pressure, in millibars."),
    col(
        "pressure_trend",
        Text,
        "The direction of change of the sea-level air pressure.",
    ),
    col(
        "snowfall_intensity",
        Double,
        "The rate at which snow crystals are falling, in millimeters per hour.",
    ),
    col(
        "temperature",
        Double,
        "The temperature at the start of the hour, in degrees Celsius.",
    ),
    col(
        "temperature_apparent",
        Double,
        "The feels-like temperature when considering wind and humidity, at the start of the hour, in degrees Celsius.",
    ),
    col(
        "temperature_dew_point",
        Double,
        "The temperature at which relative humidity is 100% at the top of the hour, in degrees Celsius.",
    ),
    col(
        "uv_index",
        Int,
        "The level of ultraviolet radiation at the start of the hour.",
    ),
    col(
        "visibility",
        Double,
        "The distance at which terrain is visible at the start of the hour, in meters.",
    ),
    col(
        "wind_direction",
        Int,
        "The direction of the wind at the start of the hour, in degrees.",
    ),
    col(
        "wind_gust",
        Double,
        "The maximum wind gust speed during the hour, in kilometers per hour.",
    ),
    col(
        "wind_speed",
        Double,
        "The wind speed at the start of the hour, in kilometers per hour.",
    ),
    METADATA_COL,
];

const NEXT_HOUR_FORECAST_COLUMNS: &[Column] = &[
    LATITUDE_COL,
    LONGITUDE_COL,
    col("forecast_start", Timestamp, "The time the forecast starts."),
    col("forecast_end", Timestamp, "The time the forecast ends."),
    col(
        "precipitation_chance",
        Double,
        "The probability of precipitation during this minute.",
    ),
    col(
        "precipitation_intensity",
        Double,
        "The precipitation intensity in millimeters per hour.",
    ),
    col("start_time", Timestamp, "The start time of the minute."),
    METADATA_COL,
];

const WEATHER_ALERT_COLUMNS: &[Column] = &[
    LATITUDE_COL,
    LONGITUDE_COL,
    col("area_id", Text, "An official designation of the affected area."),
    col("area_name", Text, "A human-readable name of the affected area."),
    col("certainty", Text, "How likely the event is to occur."),
    col("country_code", Text, "The ISO code of the reporting country."),
    col("description", Text, "A human-readable description of the event."),
    col(
        "details_url",
        Text,
        "The URL to a page containing detailed information about the event.",
    ),
    col("effective_time", Timestamp, "The time the event went into effect."),
    col(
        "event_end_time",
        Timestamp,
        "The time when the underlying weather event is projected to end.",
    ),
    col(
        "event_onset_time",
        Timestamp,
        "The time when the underlying weather event is projected to start.",
    ),
    col("expire_time", Timestamp, "The time when the event expires."),
    col("id", Text, "A unique identifier of the event."),
    col(
        "issued_time",
        Timestamp,
        "The time that event was issued by the reporting agency.",
    ),
    col(
        "precedence",
        Int,
        "The precedence of the alert relative to others in the same area.",
    ),
    col(
        "responses",
        Json,
        "An array of recommended actions from the reporting agency.",
    ),
    col("severity", Text, "The level of danger to life and property."),
    col("source", Text, "The name of the reporting agency."),
    col(
        "urgency",
        Text,
        "An indication of urgency of action from the reporting agency.",
    ),
    METADATA_COL,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Availability,
    CurrentWeather,
    DailyForecast,
    HourlyForecast,
    NextHourForecast,
    WeatherAlert,
}

impl Table {
    pub const fn all() -> &'static [Table] {
        &[
            Table::Availability,
            Table::CurrentWeather,
            Table::DailyForecast,
            Table::HourlyForecast,
            Table::NextHourForecast,
            Table::WeatherAlert,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Table::Availability => "weatherkit_availability",
            Table::CurrentWeather => "weatherkit_current_weather",
            Table::DailyForecast => "weatherkit_daily_forecast",
            Table::HourlyForecast => "weatherkit_hourly_forecast",
            Table::NextHourForecast => "weatherkit_next_hour_forecast",
            Table::WeatherAlert => "weatherkit_weather_alert",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Table::Availability => "WeatherKit Availability.",
            Table::CurrentWeather => "WeatherKit Current Weather.",
            Table::DailyForecast => "WeatherKit Daily Forecast.",
            Table::HourlyForecast => "WeatherKit Hourly Forecast.",
            Table::NextHourForecast => "WeatherKit Next Hour Forecast.",
            Table::WeatherAlert => "WeatherKit Weather Alert.",
        }
    }

    pub fn columns(&self) -> &'static [Column] {
        match self {
            Table::Availability => AVAILABILITY_COLUMNS,
            Table::CurrentWeather => CURRENT_WEATHER_COLUMNS,
            Table::DailyForecast => DAILY_FORECAST_COLUMNS,
            Table::HourlyForecast => HOURLY_FORECAST_COLUMNS,
            Table::NextHourForecast => NEXT_HOUR_FORECAST_COLUMNS,
            Table::WeatherAlert => WEATHER_ALERT_COLUMNS,
        }
    }

    pub fn key_columns(&self) -> &'static [KeyColumn] {
        match self {
            Table::HourlyForecast => HOURLY_KEYS,
            _ => COORDINATE_KEYS,
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Table::all()
            .iter()
            .copied()
            .find(|t| t.name() == name)
            .ok_or_else(|| WeatherKitError::UnknownTable(name.to_string()))
    }

    /// Scan the table for the given qualifiers, streaming rows into `sink`.
    ///
    /// Returns the number of rows emitted. A sink that is already cancelled
    /// gets nothing and no request is sent.
    pub async fn list(
        &self,
        connection: &ConnectionCache,
        quals: &Qualifiers,
        sink: &mut dyn RowSink,
    ) -> Result<usize> {
        if sink.is_cancelled() {
            return Ok(0);
        }

        let client = connection.client().await?;
        let coord = quals.coordinate()?;

        let emitted = match self {
            Table::Availability => {
                stream_rows(availability_rows(coord, client.availability(coord).await?), sink)
            }
            Table::CurrentWeather => stream_rows(
                current_weather_rows(coord, client.current_weather(coord).await?),
                sink,
            ),
            Table::DailyForecast => stream_rows(
                daily_forecast_rows(coord, client.daily_forecast(coord).await?),
                sink,
            ),
            Table::HourlyForecast => {
                let weather = client.hourly_forecast(coord, quals.hourly_range()).await?;
                stream_rows(hourly_forecast_rows(coord, weather), sink)
            }
            Table::NextHourForecast => stream_rows(
                next_hour_forecast_rows(coord, client.next_hour_forecast(coord).await?),
                sink,
            ),
            Table::WeatherAlert => stream_rows(
                weather_alert_rows(coord, client.weather_alerts(coord).await?),
                sink,
            ),
        };

        Ok(emitted)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

use std::{convert::TryFrom, fmt};

/// Weather categories the provider can populate in a single response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSet {
    CurrentWeather,
    ForecastDaily,
    ForecastHourly,
    ForecastNextHour,
    WeatherAlerts,
}

impl DataSet {
    /// Name used by the provider in `dataSets=` and in availability responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSet::CurrentWeather => "currentWeather",
            DataSet::ForecastDaily => "forecastDaily",
            DataSet::ForecastHourly => "forecastHourly",
            DataSet::ForecastNextHour => "forecastNextHour",
            DataSet::WeatherAlerts => "weatherAlerts",
        }
    }

    pub const fn all() -> &'static [DataSet] {
        &[
            DataSet::CurrentWeather,
            DataSet::ForecastDaily,
            DataSet::ForecastHourly,
            DataSet::ForecastNextHour,
            DataSet::WeatherAlerts,
        ]
    }

    /// Comma-joined selector for the `dataSets` query parameter.
    pub fn selector(data_sets: &[DataSet]) -> String {
        data_sets
            .iter()
            .map(DataSet::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDataSet(pub String);

impl fmt::Display for UnknownDataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown data set '{}'. Supported data sets: {}.",
            self.0,
            DataSet::selector(DataSet::all()).replace(',', ", ")
        )
    }
}

impl std::error::Error for UnknownDataSet {}

impl TryFrom<&str> for DataSet {
    type Error = UnknownDataSet;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        DataSet::all()
            .iter()
            .copied()
            .find(|ds| ds.as_str() == value)
            .ok_or_else(|| UnknownDataSet(value.to_string()))
    }
}

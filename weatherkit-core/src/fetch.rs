//! One fetcher per resource category. Each builds the request URL and the
//! `dataSets` selector, then hands off to [`Client::get`] unchanged.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Url;

use crate::client::Client;
use crate::dataset::DataSet;
use crate::error::Result;
use crate::model::{Coordinate, Weather};

/// Optional bounds on the start time of hourly forecast entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HourlyRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl HourlyRange {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl Client {
    pub fn availability_url(&self, coord: Coordinate) -> Result<Url> {
        let (lat, lng) = (coord.latitude_segment(), coord.longitude_segment());
        let mut url =
            self.endpoint(&["api", "v1", "availability", lat.as_str(), lng.as_str()])?;
        url.query_pairs_mut().append_pair("country", self.country());
        Ok(url)
    }

    pub fn weather_url(
        &self,
        coord: Coordinate,
        data_sets: &[DataSet],
        hourly: HourlyRange,
    ) -> Result<Url> {
        let (lat, lng) = (coord.latitude_segment(), coord.longitude_segment());
        let mut url = self.endpoint(&[
            "api",
            "v1",
            "weather",
            self.language(),
            lat.as_str(),
            lng.as_str(),
        ])?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("country", self.country())
                .append_pair("dataSets", &DataSet::selector(data_sets));
            if let Some(start) = hourly.start {
                query.append_pair("hourlyStart", &rfc3339(start));
            }
            if let Some(end) = hourly.end {
                query.append_pair("hourlyEnd", &rfc3339(end));
            }
        }

        Ok(url)
    }

    /// Names of the data sets the provider can serve for `coord`.
    pub async fn availability(&self, coord: Coordinate) -> Result<Vec<String>> {
        let url = self.availability_url(coord)?;
        self.get(&url).await
    }

    /// Fetch any combination of data sets in one request.
    pub async fn weather(
        &self,
        coord: Coordinate,
        data_sets: &[DataSet],
        hourly: HourlyRange,
    ) -> Result<Weather> {
        let url = self.weather_url(coord, data_sets, hourly)?;
        self.get(&url).await
    }

    pub async fn current_weather(&self, coord: Coordinate) -> Result<Weather> {
        self.weather(coord, &[DataSet::CurrentWeather], HourlyRange::default())
            .await
    }

    pub async fn daily_forecast(&self, coord: Coordinate) -> Result<Weather> {
        self.weather(coord, &[DataSet::ForecastDaily], HourlyRange::default())
            .await
    }

    pub async fn hourly_forecast(&self, coord: Coordinate, range: HourlyRange) -> Result<Weather> {
        self.weather(coord, &[DataSet::ForecastHourly], range).await
    }

    pub async fn next_hour_forecast(&self, coord: Coordinate) -> Result<Weather> {
        self.weather(coord, &[DataSet::ForecastNextHour], HourlyRange::default())
            .await
    }

    pub async fn weather_alerts(&self, coord: Coordinate) -> Result<Weather> {
        self.weather(coord, &[DataSet::WeatherAlerts], HourlyRange::default())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::{StubTransport, static_config};
    use chrono::TimeZone;
    use std::sync::Arc;

    async fn client(stub: &Arc<StubTransport>) -> Client {
        Client::with_transport(&static_config(), stub.clone())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn availability_url_shape() {
        let stub = StubTransport::replying(200, "[]");
        let url = client(&stub).await
            .availability_url(Coordinate::new(37.323, -122.032))
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://weatherkit.apple.com/api/v1/availability/37.323000/-122.032000?country=US"
        );
    }

    #[tokio::test]
    async fn weather_url_carries_language_selector_and_bounds() {
        let stub = StubTransport::replying(200, "{}");
        let range = HourlyRange {
            start: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
            end: Some(Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap()),
        };
        let url = client(&stub).await
            .weather_url(
                Coordinate::new(37.0, -122.0),
                &[DataSet::CurrentWeather, DataSet::ForecastHourly],
                range,
            )
            .unwrap();

        assert_eq!(url.path(), "/api/v1/weather/en/37.000000/-122.000000");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("country".into(), "US".into()),
                ("dataSets".into(), "currentWeather,forecastHourly".into()),
                ("hourlyStart".into(), "2024-06-01T00:00:00Z".into()),
                ("hourlyEnd".into(), "2024-06-02T00:00:00Z".into()),
            ]
        );
    }

    #[tokio::test]
    async fn language_and_country_come_from_config() {
        let stub = StubTransport::replying(200, "{}");
        let config = crate::config::ConnectionConfig {
            language: Some("fr".into()),
            country: Some("FR".into()),
            ..static_config()
        };
        let client = Client::with_transport(&config, stub).await.unwrap();

        let url = client
            .weather_url(
                Coordinate::new(48.85, 2.35),
                &[DataSet::WeatherAlerts],
                HourlyRange::default(),
            )
            .unwrap();

        assert!(url.path().starts_with("/api/v1/weather/fr/"));
        assert_eq!(url.query_pairs().next().unwrap().1, "FR");
    }

    #[tokio::test]
    async fn availability_decodes_names_in_order() {
        let stub = StubTransport::replying(200, r#"["currentWeather","forecastDaily"]"#);

        let names = client(&stub).await
            .availability(Coordinate::new(37.0, -122.0))
            .await
            .unwrap();

        assert_eq!(names, vec!["currentWeather", "forecastDaily"]);
    }

    #[tokio::test]
    async fn each_fetcher_selects_its_data_set() {
        let stub = StubTransport::replying(200, "{}");
        let client = client(&stub).await;
        let coord = Coordinate::new(1.0, 2.0);

        client.current_weather(coord).await.unwrap();
        client.daily_forecast(coord).await.unwrap();
        client
            .hourly_forecast(coord, HourlyRange::default())
            .await
            .unwrap();
        client.next_hour_forecast(coord).await.unwrap();
        client.weather_alerts(coord).await.unwrap();

        let selectors: Vec<String> = stub
            .calls()
            .iter()
            .map(|(url, _)| {
                Url::parse(url)
                    .unwrap()
                    .query_pairs()
                    .find(|(k, _)| k == "dataSets")
                    .unwrap()
                    .1
                    .into_owned()
            })
            .collect();
        assert_eq!(
            selectors,
            vec![
                "currentWeather",
                "forecastDaily",
                "forecastHourly",
                "forecastNextHour",
                "weatherAlerts"
            ]
        );
    }

    #[tokio::test]
    async fn every_fetcher_surfaces_unauthorized_as_credential_error() {
        let stub = StubTransport::replying(401, "");
        let client = client(&stub).await;
        let coord = Coordinate::new(1.0, 2.0);

        let errors = vec![
            client.availability(coord).await.unwrap_err(),
            client.current_weather(coord).await.unwrap_err(),
            client.daily_forecast(coord).await.unwrap_err(),
            client
                .hourly_forecast(coord, HourlyRange::default())
                .await
                .unwrap_err(),
            client.next_hour_forecast(coord).await.unwrap_err(),
            client.weather_alerts(coord).await.unwrap_err(),
        ];

        for err in errors {
            assert_eq!(err.kind(), ErrorKind::Credential);
        }
    }

    #[tokio::test]
    async fn malformed_body_error_names_the_url() {
        let stub = StubTransport::replying(200, "<html>oops</html>");
        let client = client(&stub).await;

        let err = client
            .daily_forecast(Coordinate::new(37.0, -122.0))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().contains(
            "https://weatherkit.apple.com/api/v1/weather/en/37.000000/-122.000000?country=US&dataSets=forecastDaily"
        ));
        assert!(err.to_string().contains("<html>oops</html>"));
    }
}

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;

use crate::error::{Result, WeatherKitError};
use crate::fetch::HourlyRange;
use crate::model::Coordinate;

pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const FORECAST_START: &str = "forecast_start";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QualValue {
    Double(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Qual {
    pub operator: Operator,
    pub value: QualValue,
}

/// Predicates the host pushes down for a single table scan, keyed by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Qualifiers {
    by_column: HashMap<String, Vec<Qual>>,
}

impl Qualifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, operator: Operator, value: QualValue) {
        self.by_column
            .entry(column.into())
            .or_default()
            .push(Qual { operator, value });
    }

    pub fn with(mut self, column: impl Into<String>, operator: Operator, value: QualValue) -> Self {
        self.push(column, operator, value);
        self
    }

    /// Convenience for the common `latitude = .. AND longitude = ..` pair.
    pub fn at(coord: Coordinate) -> Self {
        Self::new()
            .with(LATITUDE, Operator::Eq, QualValue::Double(coord.latitude))
            .with(LONGITUDE, Operator::Eq, QualValue::Double(coord.longitude))
    }

    pub fn get(&self, column: &str) -> &[Qual] {
        self.by_column.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn coordinate(&self) -> Result<Coordinate> {
        Ok(Coordinate::new(
            self.required_number(LATITUDE)?,
            self.required_number(LONGITUDE)?,
        ))
    }

    fn required_number(&self, name: &'static str) -> Result<f64> {
        let qual = self
            .get(name)
            .iter()
            .find(|q| q.operator == Operator::Eq)
            .ok_or(WeatherKitError::MissingQualifier(name))?;

        match &qual.value {
            QualValue::Double(v) => Ok(*v),
            QualValue::Text(s) => s.trim().parse().map_err(|_| WeatherKitError::InvalidQualifier {
                name,
                value: s.clone(),
            }),
            QualValue::Timestamp(ts) => Err(WeatherKitError::InvalidQualifier {
                name,
                value: ts.to_rfc3339(),
            }),
        }
    }

    /// Bounds on `forecast_start`: the tightest lower and upper bound win.
    ///
    /// The upper bound is exclusive, so `<=` and `=` ask for one more hour
    /// and the host refilters the boundary.
    pub fn hourly_range(&self) -> HourlyRange {
        let mut range = HourlyRange::default();

        for qual in self.get(FORECAST_START) {
            let QualValue::Timestamp(ts) = qual.value else {
                continue;
            };
            let hour = TimeDelta::hours(1);
            let (lower, upper) = match qual.operator {
                Operator::Gt | Operator::GtEq => (Some(ts), None),
                Operator::Lt => (None, Some(ts)),
                Operator::LtEq => (None, Some(ts + hour)),
                Operator::Eq => (Some(ts), Some(ts + hour)),
            };
            if let Some(ts) = lower {
                range.start = Some(range.start.map_or(ts, |cur| cur.max(ts)));
            }
            if let Some(ts) = upper {
                range.end = Some(range.end.map_or(ts, |cur| cur.min(ts)));
            }
        }

        range
    }
}

//! Read-only WeatherKit connector.
//!
//! This crate defines:
//! - Connection configuration & credential signing (ES256 JWT or static token)
//! - A single cached, authenticated HTTP client per connection
//! - Typed response models and one fetcher per weather category
//! - Row projection and the table catalogue consumed by a query host
//!
//! It is used by `weatherkit-cli`, but can be embedded in any host that can
//! supply qualifiers and a [`RowSink`].

pub mod auth;
pub mod client;
pub mod config;
pub mod connection;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod model;
pub mod quals;
pub mod rows;
pub mod table;
pub mod transport;

#[cfg(test)]
mod testing;

pub use auth::{TokenSigner, TokenSource};
pub use client::Client;
pub use config::{ConnectionConfig, Credentials};
pub use connection::ConnectionCache;
pub use dataset::DataSet;
pub use error::{ErrorKind, WeatherKitError};
pub use fetch::HourlyRange;
pub use model::{Coordinate, Weather};
pub use quals::{Operator, QualValue, Qualifiers};
pub use rows::{Row, RowSink};
pub use table::Table;

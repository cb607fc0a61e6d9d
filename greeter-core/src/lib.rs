//! Core library for the weather greeting service.
//!
//! This crate defines:
//! - Configuration read from the environment at startup
//! - Abstractions over the geolocation and weather upstreams
//! - Shared domain models and the upstream error taxonomy
//!
//! It is used by `greeter-server`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;

pub use client::{GeoProvider, WeatherProvider};
pub use config::{Config, ResponseFormat};
pub use error::UpstreamError;
pub use model::{Location, Weather};

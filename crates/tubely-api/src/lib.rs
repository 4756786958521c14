//! Tubely API Library
//!
//! HTTP surface of the media ingestion service: routes, the owner check and the upload
//! pipeline that ties staging, probing, remuxing and placement together.

mod handlers;
mod services;
mod telemetry;

pub mod auth;
pub mod error;
pub mod middleware;
pub mod setup;
pub mod state;

pub use error::{ErrorDetails, ErrorResponse, HttpAppError};
pub use telemetry::init_telemetry;

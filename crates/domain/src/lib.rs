//! Domain layer for the GeoTrack backend.
//!
//! This crate contains:
//! - Domain models (Device, LocationSample)
//! - Request/response payloads for the HTTP surface

pub mod models;

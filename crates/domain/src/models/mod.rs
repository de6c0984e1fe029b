//! Domain models for GeoTrack.

pub mod device;
pub mod location;

pub use device::Device;
pub use location::LocationSample;

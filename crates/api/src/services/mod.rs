//! Core services: ingestion and real-time fan-out.

pub mod broadcast;
pub mod ingestion;

pub use broadcast::UpdateBroadcaster;
pub use ingestion::{IngestError, IngestionService};

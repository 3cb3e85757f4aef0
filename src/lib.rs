//! aerodata - FAA airport, frequency and obstacle datasets as flat JSON
//!
//! Downloads the 28-day NASR subscription and the Digital Obstacle File,
//! parses their fixed-width records and writes facility, obstacle and run
//! metadata files for downstream consumers.

pub mod archive;
pub mod config;
pub mod coordinates;
pub mod cycle;
pub mod dataset;
pub mod faa;
pub mod fixed_width;
pub mod lookup;
pub mod pull;
pub mod store;

pub use config::Config;
pub use dataset::{Dataset, Parsers, RunMetadata};
pub use store::{DatasetStore, JsonFileStore};

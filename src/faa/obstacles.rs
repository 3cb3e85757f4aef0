use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::schema::ObstacleSchema;
use crate::coordinates::parse_spaced_dms;

/// Obstacles shorter than this above ground are dropped.
pub const DEFAULT_MIN_AGL_FT: u32 = 200;

/// A single Digital Obstacle File entry tall enough to keep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Obstacle Assigned Study number, e.g. `37-001234`
    pub id: String,
    pub state: String,
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    /// Height above ground level, feet
    pub agl: u32,
    /// Height above mean sea level, feet
    pub msl: u32,
}

/// Turns obstacle data rows into [`Obstacle`]s.
///
/// Heights and identity come from fixed columns; coordinates are located by
/// pattern anywhere on the line since their columns are not reliable.
#[derive(Debug, Clone)]
pub struct ObstacleDecoder {
    schema: ObstacleSchema,
    lat_pattern: Regex,
    lon_pattern: Regex,
    min_agl_ft: u32,
}

fn parse_height(text: &str) -> Option<u32> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl ObstacleDecoder {
    pub fn new(schema: &ObstacleSchema, min_agl_ft: u32) -> Result<Self> {
        let lat_pattern = Regex::new(&schema.lat_pattern)
            .with_context(|| format!("Invalid latitude pattern '{}'", schema.lat_pattern))?;
        let lon_pattern = Regex::new(&schema.lon_pattern)
            .with_context(|| format!("Invalid longitude pattern '{}'", schema.lon_pattern))?;

        Ok(ObstacleDecoder {
            schema: schema.clone(),
            lat_pattern,
            lon_pattern,
            min_agl_ft,
        })
    }

    pub fn schema(&self) -> &ObstacleSchema {
        &self.schema
    }

    /// Decode an obstacle row, or `None` if it should be skipped: non-numeric
    /// heights, below the AGL threshold, or no readable coordinates.
    pub fn decode(&self, line: &str) -> Option<Obstacle> {
        let agl = parse_height(self.schema.agl.extract(line))?;
        let msl = parse_height(self.schema.msl.extract(line))?;
        if agl < self.min_agl_ft {
            return None;
        }

        let lat = parse_spaced_dms(self.lat_pattern.find(line)?.as_str());
        let lon = parse_spaced_dms(self.lon_pattern.find(line)?.as_str());
        if lat == 0.0 || lon == 0.0 {
            return None;
        }

        Some(Obstacle {
            id: self.schema.id.extract(line).to_string(),
            state: self.schema.state.extract(line).to_ascii_uppercase(),
            city: self.schema.city.extract(line).to_string(),
            lat,
            lon,
            agl,
            msl,
        })
    }
}

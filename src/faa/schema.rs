//! Offset tables for the FAA fixed-width sources.
//!
//! The FAA shifts columns between releases. Each table carries a `version`
//! label and every offset the parsers use; a new release means a new table
//! (or a `[schema.*]` override in the config file), never a parser change.

use serde::{Deserialize, Serialize};

use crate::fixed_width::FieldRange;

/// NASR `APT.txt` base record layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirportSchema {
    pub version: String,
    /// Archive member holding these records
    pub member_suffix: String,
    /// Literal prefix of an airport base record
    pub record_tag: String,
    /// Shorter lines cannot hold an identifier and are never extracted
    pub min_line_len: usize,
    pub id: FieldRange,
    pub name: FieldRange,
    /// Formatted latitude, e.g. `35-14-30.0000N`
    pub lat: FieldRange,
    /// Formatted longitude, e.g. `077-54-30.0000W`
    pub lon: FieldRange,
    /// Boundary ARTCC identifier
    pub center_id: FieldRange,
}

impl Default for AirportSchema {
    fn default() -> Self {
        AirportSchema {
            version: "nasr-apt-legacy".to_string(),
            member_suffix: "APT.txt".to_string(),
            record_tag: "APT".to_string(),
            min_line_len: 31,
            id: FieldRange::new(27, 31),
            name: FieldRange::new(133, 183),
            lat: FieldRange::new(523, 538),
            lon: FieldRange::new(550, 565),
            center_id: FieldRange::new(637, 640),
        }
    }
}

/// NASR `TWR.txt` layout. Only the record tags and the facility identifier
/// are positional; frequencies are found by pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerSchema {
    pub version: String,
    pub member_suffix: String,
    /// Approach/departure frequency record
    pub primary_tag: String,
    /// Free-text remarks record
    pub remarks_tag: String,
    pub min_line_len: usize,
    pub id: FieldRange,
}

impl Default for TowerSchema {
    fn default() -> Self {
        TowerSchema {
            version: "nasr-twr-legacy".to_string(),
            member_suffix: "TWR.txt".to_string(),
            primary_tag: "TWR7".to_string(),
            remarks_tag: "TWR6".to_string(),
            min_line_len: 8,
            id: FieldRange::new(4, 8),
        }
    }
}

/// Digital Obstacle File (`DOF.DAT`) layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleSchema {
    pub version: String,
    pub member_suffix: String,
    pub min_line_len: usize,
    /// Header line carrying the publication date after `=`
    pub currency_prefix: String,
    /// Banners, column headings and separators
    pub skip_prefixes: Vec<String>,
    /// Obstacle Assigned Study number
    pub id: FieldRange,
    pub state: FieldRange,
    pub city: FieldRange,
    pub agl: FieldRange,
    pub msl: FieldRange,
    /// Coordinates drift between releases, so they are located by pattern
    pub lat_pattern: String,
    pub lon_pattern: String,
}

impl Default for ObstacleSchema {
    fn default() -> Self {
        ObstacleSchema {
            version: "dof-legacy".to_string(),
            member_suffix: "DOF.DAT".to_string(),
            min_line_len: 100,
            currency_prefix: "  CURRENCY DATE =".to_string(),
            skip_prefixes: vec![
                "CUR".to_string(),
                "-".to_string(),
                "OAS".to_string(),
                " ".to_string(),
            ],
            id: FieldRange::new(0, 9),
            state: FieldRange::new(15, 17),
            city: FieldRange::new(18, 34),
            agl: FieldRange::new(83, 88),
            msl: FieldRange::new(89, 94),
            lat_pattern: r"\d{2}\s+\d{2}\s+[\d.]+[NS]".to_string(),
            lon_pattern: r"\d{2,3}\s+\d{2}\s+[\d.]+[EW]".to_string(),
        }
    }
}

/// The full set of offset tables used by one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schemas {
    pub airport: AirportSchema,
    pub tower: TowerSchema,
    pub obstacle: ObstacleSchema,
}

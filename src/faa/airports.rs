use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::schema::AirportSchema;
use crate::coordinates::parse_compact_dms;

/// Placeholder written for a frequency that was never found.
pub const NO_FREQUENCY: &str = "none";

/// Facilities keyed by FAA location identifier.
pub type FacilityMap = BTreeMap<String, Facility>;

/// An airport or heliport from the NASR airport base records, plus the
/// frequencies patched in from the tower records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Overlying ARTCC, empty when the record leaves it blank
    pub center_id: String,
    /// Approach/departure frequency in MHz
    #[serde(with = "frequency_sentinel")]
    pub primary_freq: Option<String>,
    /// Backup frequency via the overlying center, in MHz
    #[serde(with = "frequency_sentinel")]
    pub center_freq: Option<String>,
}

impl Facility {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64, center_id: impl Into<String>) -> Self {
        Facility {
            name: name.into(),
            lat,
            lon,
            center_id: center_id.into(),
            primary_freq: None,
            center_freq: None,
        }
    }

    /// Record the primary frequency unless one is already set.
    /// Returns whether the value was taken.
    pub fn offer_primary_freq(&mut self, freq: &str) -> bool {
        offer(&mut self.primary_freq, freq)
    }

    /// Record the backup center frequency unless one is already set.
    /// Returns whether the value was taken.
    pub fn offer_center_freq(&mut self, freq: &str) -> bool {
        offer(&mut self.center_freq, freq)
    }
}

fn offer(slot: &mut Option<String>, freq: &str) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(freq.to_string());
    true
}

/// Decode an airport base record into `(identifier, facility)`.
///
/// Returns `None` for records without an identifier, without coordinate
/// text, or whose coordinates fail to convert.
pub fn decode_airport_line(line: &str, schema: &AirportSchema) -> Option<(String, Facility)> {
    let id = schema.id.extract(line);
    let lat_text = schema.lat.extract(line);
    let lon_text = schema.lon.extract(line);
    if id.is_empty() || lat_text.is_empty() || lon_text.is_empty() {
        return None;
    }

    let lat = parse_compact_dms(lat_text);
    let lon = parse_compact_dms(lon_text);
    if lat == 0.0 || lon == 0.0 {
        return None;
    }

    let facility = Facility::new(
        schema.name.extract(line),
        lat,
        lon,
        schema.center_id.extract(line),
    );
    Some((id.to_string(), facility))
}

/// Serializes `None` as the `"none"` placeholder so the field is never absent.
mod frequency_sentinel {
    use super::NO_FREQUENCY;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(NO_FREQUENCY))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case(NO_FREQUENCY) {
            Ok(None)
        } else {
            Ok(Some(raw))
        }
    }
}

//! Frequencies for a single facility, read straight from the NASR archive
//! without building the full facility set.

use anyhow::{Context, Result};
use std::fmt;
use std::ops::ControlFlow;

use crate::archive::{SourceArchive, TextEncoding};
use crate::dataset::{Parsers, ingest_tower_line};
use crate::faa::{Facility, FacilityMap, NO_FREQUENCY, RecordKind, classify_nasr_line};

/// Reported when the airport record is absent or leaves the center blank.
pub const UNKNOWN_CENTER: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityFrequencies {
    pub airport_id: String,
    pub center_id: String,
    pub primary_freq: String,
    pub center_freq: String,
}

impl fmt::Display for FacilityFrequencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: center {}, approach/departure {}, center backup {}",
            self.airport_id, self.center_id, self.primary_freq, self.center_freq
        )
    }
}

/// Find the overlying center, primary and backup frequencies for one airport.
///
/// The airport member is read only up to the first record for `airport_id`.
/// Tower records are matched with the same first-match-wins rules as the full
/// build, and the scan stops as soon as both frequencies are known.
pub fn lookup_frequencies(
    archive: &mut SourceArchive<'_>,
    airport_id: &str,
    parsers: &Parsers,
) -> Result<FacilityFrequencies> {
    let airport_id = airport_id.trim().to_ascii_uppercase();
    let schemas = &parsers.schemas;
    let mut center_id: Option<String> = None;

    archive
        .for_each_line(&schemas.airport.member_suffix, TextEncoding::Latin1, |line| {
            if classify_nasr_line(line, schemas) != RecordKind::Airport
                || schemas.airport.id.extract(line) != airport_id
            {
                return ControlFlow::Continue(());
            }
            let center = schemas.airport.center_id.extract(line);
            if !center.is_empty() {
                center_id = Some(center.to_string());
            }
            ControlFlow::Break(())
        })
        .context("Reading airport records")?;

    // Tower records patch only known facilities, so seed the one we want.
    let mut facilities = FacilityMap::new();
    facilities.insert(
        airport_id.clone(),
        Facility::new("", 0.0, 0.0, center_id.clone().unwrap_or_default()),
    );

    archive
        .for_each_line(&schemas.tower.member_suffix, TextEncoding::Latin1, |line| {
            ingest_tower_line(&mut facilities, line, parsers);
            match facilities.get(&airport_id) {
                Some(f) if f.primary_freq.is_some() && f.center_freq.is_some() => {
                    ControlFlow::Break(())
                }
                _ => ControlFlow::Continue(()),
            }
        })
        .context("Reading tower records")?;

    let facility = facilities.remove(&airport_id);
    let freq = |value: Option<String>| value.unwrap_or_else(|| NO_FREQUENCY.to_string());

    Ok(FacilityFrequencies {
        center_id: center_id.unwrap_or_else(|| UNKNOWN_CENTER.to_string()),
        primary_freq: freq(facility.as_ref().and_then(|f| f.primary_freq.clone())),
        center_freq: freq(facility.and_then(|f| f.center_freq)),
        airport_id,
    })
}

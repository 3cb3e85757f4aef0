//! Two-pass NASR parse, obstacle scan, and assembly into the run's outputs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use tracing::{debug, error, info};

use crate::archive::{SourceArchive, TextEncoding};
use crate::faa::{
    FacilityMap, FrequencyMatcher, FrequencyRules, Obstacle, ObstacleDecoder, RecordKind, Schemas,
    apply_tower_line, classify_nasr_line, classify_obstacle_line, currency_date,
    decode_airport_line,
};

/// Placeholder for an obstacle currency date that was never seen.
pub const UNKNOWN_DATE: &str = "unknown";

/// Compiled offset tables, frequency rules and obstacle filter for one run.
#[derive(Debug, Clone)]
pub struct Parsers {
    pub schemas: Schemas,
    pub frequencies: FrequencyMatcher,
    pub obstacles: ObstacleDecoder,
}

impl Parsers {
    pub fn new(schemas: Schemas, rules: &FrequencyRules, min_agl_ft: u32) -> Result<Self> {
        let frequencies = FrequencyMatcher::new(rules).context("Compiling frequency rules")?;
        let obstacles =
            ObstacleDecoder::new(&schemas.obstacle, min_agl_ft).context("Compiling obstacle patterns")?;
        Ok(Parsers {
            schemas,
            frequencies,
            obstacles,
        })
    }
}

/// Summary written next to the two collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Obstacle file currency date as printed in its header
    pub dof_date: String,
    pub apt_count: usize,
    pub obs_count: usize,
    /// Effective date of the NASR cycle, `MM/DD/YY`
    pub apt_date: String,
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub facilities: FacilityMap,
    pub obstacles: Vec<Obstacle>,
    pub metadata: RunMetadata,
}

/// Result of scanning the obstacle file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleScan {
    pub obstacles: Vec<Obstacle>,
    pub currency_date: Option<String>,
    pub skipped: usize,
}

impl ObstacleScan {
    pub fn ingest(&mut self, line: &str, decoder: &ObstacleDecoder) {
        match classify_obstacle_line(line, decoder.schema()) {
            RecordKind::CurrencyDate => {
                if let Some(date) = currency_date(line) {
                    self.currency_date = Some(date.to_string());
                }
            }
            RecordKind::Obstacle => match decoder.decode(line) {
                Some(obstacle) => self.obstacles.push(obstacle),
                None => self.skipped += 1,
            },
            _ => {}
        }
    }
}

/// First pass: build the facility set from airport base records.
/// Returns whether the line produced a facility.
pub fn ingest_airport_line(facilities: &mut FacilityMap, line: &str, parsers: &Parsers) -> bool {
    if classify_nasr_line(line, &parsers.schemas) != RecordKind::Airport {
        return false;
    }
    match decode_airport_line(line, &parsers.schemas.airport) {
        Some((id, facility)) => {
            facilities.insert(id, facility);
            true
        }
        None => false,
    }
}

/// Second pass: patch frequencies from tower records into existing facilities.
/// Returns whether a frequency was written.
pub fn ingest_tower_line(facilities: &mut FacilityMap, line: &str, parsers: &Parsers) -> bool {
    match classify_nasr_line(line, &parsers.schemas) {
        kind @ (RecordKind::TowerPrimary | RecordKind::TowerRemarks) => apply_tower_line(
            facilities,
            kind,
            line,
            &parsers.schemas.tower,
            &parsers.frequencies,
        ),
        _ => false,
    }
}

/// Build facilities from in-memory airport and tower lines.
pub fn build_facilities<'a, A, T>(airport_lines: A, tower_lines: T, parsers: &Parsers) -> FacilityMap
where
    A: IntoIterator<Item = &'a str>,
    T: IntoIterator<Item = &'a str>,
{
    let mut facilities = FacilityMap::new();
    for line in airport_lines {
        ingest_airport_line(&mut facilities, line, parsers);
    }
    for line in tower_lines {
        ingest_tower_line(&mut facilities, line, parsers);
    }
    facilities
}

/// Scan in-memory obstacle file lines.
pub fn scan_obstacles<'a, I>(lines: I, parsers: &Parsers) -> ObstacleScan
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scan = ObstacleScan::default();
    for line in lines {
        scan.ingest(line, &parsers.obstacles);
    }
    scan
}

/// Parse the NASR subscription archive into facilities with frequencies.
pub fn parse_nasr_archive(bytes: &[u8], parsers: &Parsers) -> Result<FacilityMap> {
    let mut archive = SourceArchive::new(bytes).context("Opening NASR archive")?;
    let mut facilities = FacilityMap::new();
    let mut airport_lines = 0usize;
    let mut patched = 0usize;

    archive
        .for_each_line(
            &parsers.schemas.airport.member_suffix,
            TextEncoding::Latin1,
            |line| {
                airport_lines += 1;
                ingest_airport_line(&mut facilities, line, parsers);
                ControlFlow::Continue(())
            },
        )
        .context("Reading airport records")?;

    archive
        .for_each_line(
            &parsers.schemas.tower.member_suffix,
            TextEncoding::Latin1,
            |line| {
                if ingest_tower_line(&mut facilities, line, parsers) {
                    patched += 1;
                }
                ControlFlow::Continue(())
            },
        )
        .context("Reading tower records")?;

    debug!(
        "Scanned {} airport lines, patched {} frequencies",
        airport_lines, patched
    );
    info!("Parsed {} airports/heliports with frequencies", facilities.len());
    Ok(facilities)
}

/// Parse the Digital Obstacle File archive.
pub fn parse_dof_archive(bytes: &[u8], parsers: &Parsers) -> Result<ObstacleScan> {
    let mut archive = SourceArchive::new(bytes).context("Opening obstacle archive")?;
    let mut scan = ObstacleScan::default();

    archive
        .for_each_line(
            &parsers.schemas.obstacle.member_suffix,
            TextEncoding::Utf8Lossy,
            |line| {
                scan.ingest(line, &parsers.obstacles);
                ControlFlow::Continue(())
            },
        )
        .context("Reading obstacle records")?;

    debug!("Skipped {} obstacle rows", scan.skipped);
    info!("Parsed {} obstacles", scan.obstacles.len());
    Ok(scan)
}

/// Unwrap a per-source result, logging the failure and falling back to an
/// empty collection so the other source still gets processed.
pub fn recover_source<T: Default>(source: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        error!("{} processing failed: {:#}", source, e);
        T::default()
    })
}

/// Combine both sources into the run's dataset.
pub fn assemble(facilities: FacilityMap, scan: ObstacleScan, apt_date: impl Into<String>) -> Dataset {
    let metadata = RunMetadata {
        dof_date: scan
            .currency_date
            .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        apt_count: facilities.len(),
        obs_count: scan.obstacles.len(),
        apt_date: apt_date.into(),
    };

    Dataset {
        facilities,
        obstacles: scan.obstacles,
        metadata,
    }
}

//! Record-type detection from the leading tag of each source line.

use super::schema::{ObstacleSchema, Schemas};
use crate::fixed_width::char_len;

/// What a single source line holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// NASR airport base record
    Airport,
    /// NASR tower record listing approach/departure frequencies
    TowerPrimary,
    /// NASR tower free-text remarks record
    TowerRemarks,
    /// DOF obstacle data row
    Obstacle,
    /// DOF header line carrying the currency date
    CurrencyDate,
    /// Blank, comment, banner, unknown tag or too short to extract from
    Skip,
}

/// Classify a line from the NASR `APT.txt` / `TWR.txt` members.
pub fn classify_nasr_line(line: &str, schemas: &Schemas) -> RecordKind {
    let airport = &schemas.airport;
    let tower = &schemas.tower;

    let (kind, min_len) = if line.starts_with(airport.record_tag.as_str()) {
        (RecordKind::Airport, airport.min_line_len)
    } else if line.starts_with(tower.primary_tag.as_str()) {
        (RecordKind::TowerPrimary, tower.min_line_len)
    } else if line.starts_with(tower.remarks_tag.as_str()) {
        (RecordKind::TowerRemarks, tower.min_line_len)
    } else {
        return RecordKind::Skip;
    };

    if char_len(line) < min_len {
        RecordKind::Skip
    } else {
        kind
    }
}

/// Classify a line from the Digital Obstacle File.
///
/// The currency header is recognised before any length or prefix filtering
/// since it starts with the same blank padding as other banner lines.
pub fn classify_obstacle_line(line: &str, schema: &ObstacleSchema) -> RecordKind {
    if line.starts_with(schema.currency_prefix.as_str()) {
        return RecordKind::CurrencyDate;
    }

    if char_len(line) < schema.min_line_len {
        return RecordKind::Skip;
    }

    if schema
        .skip_prefixes
        .iter()
        .any(|prefix| line.starts_with(prefix.as_str()))
    {
        return RecordKind::Skip;
    }

    RecordKind::Obstacle
}

/// Date text following `=` on a currency header line.
pub fn currency_date(line: &str) -> Option<&str> {
    line.split('=')
        .nth(1)
        .map(str::trim)
        .filter(|date| !date.is_empty())
}

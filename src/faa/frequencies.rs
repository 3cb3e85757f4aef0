//! Primary and backup frequency selection from NASR tower records.
//!
//! Primary approach/departure frequencies sit in a structured slot, so the
//! first frequency-shaped token on a marked line is taken. Backup center
//! frequencies are buried in prose remarks and are only accepted when a cue
//! word (`ON`, `FREQS`) immediately precedes them.

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::airports::FacilityMap;
use super::classify::RecordKind;
use super::schema::TowerSchema;

/// Marker and pattern configuration for frequency selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyRules {
    /// A primary record must mention one of these
    pub primary_markers: Vec<String>,
    pub primary_pattern: String,
    /// A remarks record must mention one of these
    pub backup_markers: Vec<String>,
    /// Words that must directly precede a backup frequency
    pub backup_cue_words: Vec<String>,
    pub backup_frequency_pattern: String,
}

impl Default for FrequencyRules {
    fn default() -> Self {
        FrequencyRules {
            primary_markers: vec!["APCH".to_string(), "DEP".to_string()],
            primary_pattern: r"\d{3}\.\d{1,3}".to_string(),
            backup_markers: vec!["ARTCC".to_string(), "Z".to_string()],
            backup_cue_words: vec!["ON".to_string(), "FREQS".to_string()],
            backup_frequency_pattern: r"\d{3}\.\d{1,3}".to_string(),
        }
    }
}

/// Compiled form of [`FrequencyRules`].
#[derive(Debug, Clone)]
pub struct FrequencyMatcher {
    primary_markers: Vec<String>,
    primary: Regex,
    backup_markers: Vec<String>,
    backup: Regex,
}

fn mentions_any(line: &str, markers: &[String]) -> bool {
    markers.iter().any(|marker| line.contains(marker.as_str()))
}

impl FrequencyMatcher {
    pub fn new(rules: &FrequencyRules) -> Result<Self> {
        if rules.backup_cue_words.is_empty() {
            bail!("At least one backup cue word is required");
        }

        let primary = Regex::new(&rules.primary_pattern)
            .with_context(|| format!("Invalid primary pattern '{}'", rules.primary_pattern))?;

        let cues = rules
            .backup_cue_words
            .iter()
            .map(|word| regex::escape(word))
            .collect::<Vec<_>>()
            .join("|");
        let backup_pattern = format!(
            r"\b(?:{})\s+({})",
            cues, rules.backup_frequency_pattern
        );
        let backup = Regex::new(&backup_pattern)
            .with_context(|| format!("Invalid backup pattern '{}'", backup_pattern))?;

        Ok(FrequencyMatcher {
            primary_markers: rules.primary_markers.clone(),
            primary,
            backup_markers: rules.backup_markers.clone(),
            backup,
        })
    }

    /// First frequency on a primary record that mentions approach or departure.
    pub fn primary_frequency<'a>(&self, line: &'a str) -> Option<&'a str> {
        if !mentions_any(line, &self.primary_markers) {
            return None;
        }
        self.primary.find(line).map(|m| m.as_str())
    }

    /// Cue-word anchored frequency on a remarks record that mentions the center.
    pub fn backup_frequency<'a>(&self, line: &'a str) -> Option<&'a str> {
        if !mentions_any(line, &self.backup_markers) {
            return None;
        }
        self.backup
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Patch a tower record's frequency into the facility it names.
///
/// Only facilities already built from airport records are touched, and a
/// field that already holds a frequency is left alone. Returns whether a
/// field was written.
pub fn apply_tower_line(
    facilities: &mut FacilityMap,
    kind: RecordKind,
    line: &str,
    schema: &TowerSchema,
    matcher: &FrequencyMatcher,
) -> bool {
    let id = schema.id.extract(line);
    let Some(facility) = facilities.get_mut(id) else {
        return false;
    };

    match kind {
        RecordKind::TowerPrimary => matcher
            .primary_frequency(line)
            .is_some_and(|freq| facility.offer_primary_freq(freq)),
        RecordKind::TowerRemarks => matcher
            .backup_frequency(line)
            .is_some_and(|freq| facility.offer_center_freq(freq)),
        _ => false,
    }
}

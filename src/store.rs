//! Persistence of the run outputs with zero-result protection.
//!
//! A source that produces nothing (upstream outage, changed file layout)
//! must never wipe out the previously published collection. In that case the
//! old file is left in place and its record count is carried into the new
//! metadata.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::dataset::{Dataset, RunMetadata};
use crate::faa::{FacilityMap, Obstacle};

pub const AIRPORTS_FILE: &str = "airports.json";
pub const OBSTACLES_FILE: &str = "obstacles.json";
pub const METADATA_FILE: &str = "metadata.json";

/// Durable home for the three run outputs.
pub trait DatasetStore {
    fn write_facilities(&self, facilities: &FacilityMap) -> Result<()>;
    fn write_obstacles(&self, obstacles: &[Obstacle]) -> Result<()>;
    fn write_metadata(&self, metadata: &RunMetadata) -> Result<()>;
    /// Number of facilities currently persisted, if readable.
    fn persisted_facility_count(&self) -> Option<usize>;
    /// Number of obstacles currently persisted, if readable.
    fn persisted_obstacle_count(&self) -> Option<usize>;
}

/// JSON files in a single directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).with_context(|| format!("Creating output directory {:?}", dir))?;
        Ok(JsonFileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write through a temp file and rename into place, so a failed write
    /// leaves the previous file untouched.
    fn write_atomically<F>(&self, file_name: &str, write: F) -> Result<()>
    where
        F: FnOnce(&mut BufWriter<File>) -> Result<()>,
    {
        let final_path = self.dir.join(file_name);
        let temp_path = self.dir.join(format!("{}.tmp", file_name));

        let result = (|| {
            let file = File::create(&temp_path)
                .with_context(|| format!("Creating {:?}", temp_path))?;
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;
            writer
                .flush()
                .with_context(|| format!("Flushing {:?}", temp_path))?;
            fs::rename(&temp_path, &final_path)
                .with_context(|| format!("Moving {:?} into place", final_path))
        })();

        if result.is_err() && temp_path.exists() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }

    fn entry_count(&self, file_name: &str) -> Option<usize> {
        let file = File::open(self.dir.join(file_name)).ok()?;
        match serde_json::from_reader(BufReader::new(file)).ok()? {
            serde_json::Value::Array(items) => Some(items.len()),
            serde_json::Value::Object(entries) => Some(entries.len()),
            _ => None,
        }
    }
}

impl DatasetStore for JsonFileStore {
    fn write_facilities(&self, facilities: &FacilityMap) -> Result<()> {
        self.write_atomically(AIRPORTS_FILE, |w| {
            serde_json::to_writer(w, facilities).context("Serializing airports")
        })
    }

    fn write_obstacles(&self, obstacles: &[Obstacle]) -> Result<()> {
        self.write_atomically(OBSTACLES_FILE, |w| {
            serde_json::to_writer(w, obstacles).context("Serializing obstacles")
        })
    }

    fn write_metadata(&self, metadata: &RunMetadata) -> Result<()> {
        self.write_atomically(METADATA_FILE, |w| {
            serde_json::to_writer_pretty(w, metadata).context("Serializing metadata")
        })
    }

    fn persisted_facility_count(&self) -> Option<usize> {
        self.entry_count(AIRPORTS_FILE)
    }

    fn persisted_obstacle_count(&self) -> Option<usize> {
        self.entry_count(OBSTACLES_FILE)
    }
}

/// Write one collection unless it is empty. Returns the count that the
/// metadata should report for it.
fn write_or_keep<F, C>(label: &str, produced: usize, write: F, persisted: C) -> usize
where
    F: FnOnce() -> Result<()>,
    C: FnOnce() -> Option<usize>,
{
    if produced == 0 {
        warn!("No {} parsed. Skipping overwrite to protect existing data.", label);
        return persisted().unwrap_or(0);
    }

    match write() {
        Ok(()) => {
            info!("Saved {} {}", produced, label);
            produced
        }
        Err(e) => {
            error!("Failed to save {}: {:#}", label, e);
            persisted().unwrap_or(0)
        }
    }
}

/// Persist a dataset, protecting previously stored collections from empty
/// results, and always write the metadata. Returns the metadata written.
pub fn persist<S: DatasetStore + ?Sized>(dataset: &Dataset, store: &S) -> Result<RunMetadata> {
    let mut metadata = dataset.metadata.clone();

    metadata.obs_count = write_or_keep(
        "obstacles",
        dataset.obstacles.len(),
        || store.write_obstacles(&dataset.obstacles),
        || store.persisted_obstacle_count(),
    );

    metadata.apt_count = write_or_keep(
        "airports",
        dataset.facilities.len(),
        || store.write_facilities(&dataset.facilities),
        || store.persisted_facility_count(),
    );

    store
        .write_metadata(&metadata)
        .context("Writing run metadata")?;
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faa::Facility;
    use std::cell::RefCell;

    /// Records writes instead of touching the filesystem.
    #[derive(Default)]
    struct RecordingStore {
        previous_facilities: Option<usize>,
        previous_obstacles: Option<usize>,
        fail_obstacles: bool,
        writes: RefCell<Vec<&'static str>>,
    }

    impl DatasetStore for RecordingStore {
        fn write_facilities(&self, _: &FacilityMap) -> Result<()> {
            self.writes.borrow_mut().push("facilities");
            Ok(())
        }

        fn write_obstacles(&self, _: &[Obstacle]) -> Result<()> {
            if self.fail_obstacles {
                anyhow::bail!("disk full");
            }
            self.writes.borrow_mut().push("obstacles");
            Ok(())
        }

        fn write_metadata(&self, _: &RunMetadata) -> Result<()> {
            self.writes.borrow_mut().push("metadata");
            Ok(())
        }

        fn persisted_facility_count(&self) -> Option<usize> {
            self.previous_facilities
        }

        fn persisted_obstacle_count(&self) -> Option<usize> {
            self.previous_obstacles
        }
    }

    fn obstacle() -> Obstacle {
        Obstacle {
            id: "37-001234".to_string(),
            state: "NC".to_string(),
            city: "ROCKY MOUNT".to_string(),
            lat: 35.95,
            lon: -77.8,
            agl: 450,
            msl: 580,
        }
    }

    fn dataset(facilities: usize, obstacles: usize) -> Dataset {
        let mut map = FacilityMap::new();
        for i in 0..facilities {
            map.insert(format!("A{}", i), Facility::new("TEST", 35.0, -77.0, "ZDC"));
        }
        Dataset {
            metadata: RunMetadata {
                dof_date: "02/22/26".to_string(),
                apt_count: facilities,
                obs_count: obstacles,
                apt_date: "01/22/26".to_string(),
            },
            facilities: map,
            obstacles: vec![obstacle(); obstacles],
        }
    }

    #[test]
    fn test_full_run_writes_everything() {
        let store = RecordingStore::default();
        let metadata = persist(&dataset(2, 3), &store).unwrap();
        assert_eq!(metadata.apt_count, 2);
        assert_eq!(metadata.obs_count, 3);
        assert_eq!(*store.writes.borrow(), vec!["obstacles", "facilities", "metadata"]);
    }

    #[test]
    fn test_empty_obstacles_keep_previous_count() {
        let store = RecordingStore {
            previous_obstacles: Some(41),
            ..Default::default()
        };
        let metadata = persist(&dataset(2, 0), &store).unwrap();
        assert_eq!(metadata.obs_count, 41);
        assert_eq!(metadata.apt_count, 2);
        assert_eq!(*store.writes.borrow(), vec!["facilities", "metadata"]);
    }

    #[test]
    fn test_empty_facilities_keep_previous_count() {
        let store = RecordingStore {
            previous_facilities: Some(7),
            ..Default::default()
        };
        let metadata = persist(&dataset(0, 1), &store).unwrap();
        assert_eq!(metadata.apt_count, 7);
        assert_eq!(*store.writes.borrow(), vec!["obstacles", "metadata"]);
    }

    #[test]
    fn test_nothing_stored_before_reports_zero() {
        let store = RecordingStore::default();
        let metadata = persist(&dataset(0, 0), &store).unwrap();
        assert_eq!(metadata.apt_count, 0);
        assert_eq!(metadata.obs_count, 0);
        assert_eq!(*store.writes.borrow(), vec!["metadata"]);
    }

    #[test]
    fn test_failed_write_still_emits_metadata() {
        let store = RecordingStore {
            previous_obstacles: Some(9),
            fail_obstacles: true,
            ..Default::default()
        };
        let metadata = persist(&dataset(1, 4), &store).unwrap();
        assert_eq!(metadata.obs_count, 9);
        assert_eq!(*store.writes.borrow(), vec!["facilities", "metadata"]);
    }
}

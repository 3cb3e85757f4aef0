use std::fs;

use aerodata::dataset::{ObstacleScan, assemble};
use aerodata::faa::{Facility, FacilityMap, Obstacle};
use aerodata::store::{DatasetStore, JsonFileStore, persist};

fn facilities() -> FacilityMap {
    let mut map = FacilityMap::new();
    map.insert("RWI".to_string(), Facility::new("ROCKY MOUNT-WILSON RGNL", 35.856, -77.892, "ZDC"));
    map.insert("AVL".to_string(), Facility::new("ASHEVILLE RGNL", 35.436, -82.542, "ZTL"));
    map
}

fn obstacles() -> ObstacleScan {
    ObstacleScan {
        obstacles: vec![Obstacle {
            id: "37-000002".to_string(),
            state: "NC".to_string(),
            city: "ROCKY MOUNT".to_string(),
            lat: 35.955278,
            lon: -77.800556,
            agl: 200,
            msl: 330,
        }],
        currency_date: Some("02/22/26".to_string()),
        skipped: 0,
    }
}

#[test]
fn test_empty_run_preserves_previous_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path()).unwrap();

    persist(&assemble(facilities(), obstacles(), "01/22/26"), &store).unwrap();
    let airports_before = fs::read_to_string(dir.path().join("airports.json")).unwrap();
    let obstacles_before = fs::read_to_string(dir.path().join("obstacles.json")).unwrap();

    // next cycle: both sources failed upstream
    let metadata = persist(
        &assemble(FacilityMap::new(), ObstacleScan::default(), "02/19/26"),
        &store,
    )
    .unwrap();

    assert_eq!(metadata.apt_count, 2);
    assert_eq!(metadata.obs_count, 1);
    assert_eq!(metadata.apt_date, "02/19/26");
    assert_eq!(metadata.dof_date, "unknown");
    assert_eq!(fs::read_to_string(dir.path().join("airports.json")).unwrap(), airports_before);
    assert_eq!(fs::read_to_string(dir.path().join("obstacles.json")).unwrap(), obstacles_before);

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("metadata.json")).unwrap())
            .unwrap();
    assert_eq!(written["apt_count"], 2);
    assert_eq!(written["obs_count"], 1);
}

#[test]
fn test_one_empty_source_only_protects_that_collection() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path()).unwrap();
    persist(&assemble(facilities(), obstacles(), "01/22/26"), &store).unwrap();

    let mut fewer = FacilityMap::new();
    fewer.insert("RWI".to_string(), Facility::new("ROCKY MOUNT-WILSON RGNL", 35.856, -77.892, "ZDC"));
    let metadata = persist(&assemble(fewer, ObstacleScan::default(), "02/19/26"), &store).unwrap();

    assert_eq!(metadata.apt_count, 1);
    assert_eq!(metadata.obs_count, 1);
    assert_eq!(store.persisted_facility_count(), Some(1));
    assert_eq!(store.persisted_obstacle_count(), Some(1));
}

#[test]
fn test_counts_tolerate_missing_or_corrupt_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path()).unwrap();
    assert_eq!(store.persisted_facility_count(), None);

    fs::write(dir.path().join("obstacles.json"), "[{\"id\": ").unwrap();
    assert_eq!(store.persisted_obstacle_count(), None);

    let metadata = persist(
        &assemble(FacilityMap::new(), ObstacleScan::default(), "02/19/26"),
        &store,
    )
    .unwrap();
    assert_eq!(metadata.apt_count, 0);
    assert_eq!(metadata.obs_count, 0);
    assert!(dir.path().join("metadata.json").exists());
}

#[test]
fn test_writes_leave_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("nested/output")).unwrap();
    persist(&assemble(facilities(), obstacles(), "01/22/26"), &store).unwrap();

    let mut names: Vec<String> = fs::read_dir(store.dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["airports.json", "metadata.json", "obstacles.json"]);

    let metadata = fs::read_to_string(store.dir().join("metadata.json")).unwrap();
    assert!(metadata.contains('\n'), "metadata is pretty-printed");
    let airports = fs::read_to_string(store.dir().join("airports.json")).unwrap();
    assert!(!airports.contains('\n'), "collections are compact");
}

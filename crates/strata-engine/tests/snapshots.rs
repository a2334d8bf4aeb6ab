//! Snapshot artifacts written to disk by a group run.

use std::fs;
use std::path::PathBuf;

use strata_core::{InitialPattern, SimulationConfig, WorkerId};
use strata_engine::{run_group, snapshot_file_name, GroupOptions};

/// A fresh scratch directory under the system temp dir.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("strata-{name}-{}", std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn one_file_per_worker_per_sampled_generation() {
    let dir = scratch("per-worker");
    let config = SimulationConfig {
        grid_size: 5,
        generations: 5,
        data_every: 2,
        pattern: InitialPattern::Glider,
        ..SimulationConfig::default()
    };
    run_group(config, GroupOptions::new(2).with_snapshot_dir(&dir)).unwrap();

    let mut names: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    let mut expected: Vec<String> = [0, 2, 4]
        .into_iter()
        .flat_map(|step| (0..2).map(move |w| snapshot_file_name(step, WorkerId(w))))
        .collect();
    expected.sort();
    assert_eq!(names, expected);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn initial_snapshot_uses_global_rows() {
    let dir = scratch("contents");
    let config = SimulationConfig {
        grid_size: 4,
        generations: 1,
        pattern: InitialPattern::Glider,
        ..SimulationConfig::default()
    };
    run_group(config, GroupOptions::new(2).with_snapshot_dir(&dir)).unwrap();

    let top = fs::read_to_string(dir.join(snapshot_file_name(0, WorkerId(0)))).unwrap();
    let bottom = fs::read_to_string(dir.join(snapshot_file_name(0, WorkerId(1)))).unwrap();

    let top: Vec<&str> = top.lines().collect();
    assert_eq!(top[0], "#1:row    2:col    3:state");
    assert_eq!(top.len(), 1 + 2 * 4);
    assert_eq!(top[1], "0    0    0");
    assert_eq!(top[2], "0    1    1");
    assert_eq!(top[7], "1    2    1");

    let bottom: Vec<&str> = bottom.lines().collect();
    assert_eq!(bottom.len(), 1 + 2 * 4);
    // Worker 1 owns global rows 2 and 3. Worker 0 owns only two rows, so
    // the glider's third row was clipped and nothing is alive down here.
    assert_eq!(bottom[1], "2    0    0");
    assert!(bottom[1..].iter().all(|l| l.ends_with("    0")));
    assert_eq!(bottom[8], "3    3    0");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn degenerate_workers_write_nothing() {
    let dir = scratch("degenerate");
    let config = SimulationConfig {
        grid_size: 2,
        generations: 2,
        ..SimulationConfig::default()
    };
    run_group(config, GroupOptions::new(3).with_snapshot_dir(&dir)).unwrap();
    assert!(!dir.join(snapshot_file_name(0, WorkerId(2))).exists());
    assert!(dir.join(snapshot_file_name(1, WorkerId(1))).exists());
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 4);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_directory_fails_the_run() {
    let dir = std::env::temp_dir()
        .join(format!("strata-absent-{}", std::process::id()))
        .join("deeper");
    let config = SimulationConfig {
        grid_size: 4,
        generations: 2,
        ..SimulationConfig::default()
    };
    let err = run_group(config, GroupOptions::new(2).with_snapshot_dir(&dir)).unwrap_err();
    assert!(!err.is_secondary());
    assert!(err.to_string().contains("cannot write snapshot"), "{err}");
}

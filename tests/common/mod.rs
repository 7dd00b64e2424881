#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Schema for a GPS track: a timestamp plus coordinates bound to spreadsheet
/// style column names.
pub const GPS_SCHEMA: &str = r#"fields:
  - name: timestamp
    kind: { type: date_time, format: "%Y-%m-%d %H:%M:%S" }
  - name: lat
    column: Latitude
    kind: { type: float }
  - name: lon
    column: Longitude
    kind: { type: float }
"#;

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory that removes its files on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file contents");
        path
    }

    pub fn gps_schema(&self) -> PathBuf {
        self.write("gps.yml", GPS_SCHEMA)
    }
}

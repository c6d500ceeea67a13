//! Dataset artifact persistence
//!
//! The dataset is written atomically: the full document goes to a temporary
//! file in the target directory first, then renames over the destination.
//! A crash mid-write can never corrupt a previous good artifact.

use crate::model::{Dataset, DATASET_SCHEMA_VERSION};
use crate::output::{OutputError, OutputResult};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes a dataset artifact atomically
///
/// # Arguments
///
/// * `dataset` - The dataset to persist
/// * `path` - Destination path; the temporary file lives alongside it so
///   the final rename stays on one filesystem
pub fn write_dataset(dataset: &Dataset, path: &Path) -> OutputResult<()> {
    let json = serde_json::to_string_pretty(dataset)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;

    Ok(())
}

/// Reads a dataset artifact back, checking its schema version
pub fn read_dataset(path: &Path) -> OutputResult<Dataset> {
    let content = fs::read_to_string(path)?;
    let dataset: Dataset = serde_json::from_str(&content)?;

    if dataset.meta.schema_version != DATASET_SCHEMA_VERSION {
        return Err(OutputError::SchemaMismatch {
            found: dataset.meta.schema_version,
            expected: DATASET_SCHEMA_VERSION,
        });
    }

    Ok(dataset)
}

/// Suggests a timestamped artifact name for a capture time
///
/// `2024-06-01T12:30:00Z` becomes `dataset-20240601-123000.json`.
pub fn timestamped_name(captured_at: &str) -> String {
    let compact: String = captured_at
        .chars()
        .take(19) // strip the offset
        .filter(|c| c.is_ascii_digit())
        .collect();
    if compact.len() == 14 {
        format!("dataset-{}-{}.json", &compact[..8], &compact[8..])
    } else {
        "dataset.json".to_string()
    }
}

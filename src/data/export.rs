use std::fs::{self, File};
use std::path::Path;

use csv::Writer;
use serde::Serialize;
use tracing::info;

use super::DataResult;

/// Write serializable rows to a CSV file with a header line, creating parent directories
pub fn write_csv<T: Serialize, P: AsRef<Path>>(rows: &[T], path: P) -> DataResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = Writer::from_writer(File::create(path)?);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

use crate::error::RunError;
use crate::models::report::Report;
use log::info;
use std::fs;
use std::path::Path;

/// Serialize the report and write it to `path`. A missing parent directory
/// is created; any I/O failure is a fatal write error.
pub fn write_report(report: &Report, path: &Path) -> Result<(), RunError> {
    let to_write_err = |source: std::io::Error| RunError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(to_write_err)?;
        }
    }

    let json = report.to_json_pretty().map_err(|e| RunError::Write {
        path: path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;

    fs::write(path, json + "\n").map_err(to_write_err)?;
    info!("report written to {}", path.display());
    Ok(())
}

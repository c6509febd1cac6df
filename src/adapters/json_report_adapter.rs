//! JSON report adapter: serializes the full session result.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::GameError;
use crate::domain::session::SessionResult;
use crate::ports::report_port::ReportPort;

pub struct JsonReportAdapter;

impl ReportPort for JsonReportAdapter {
    fn write(&self, result: &SessionResult, output_dir: &Path) -> Result<PathBuf, GameError> {
        fs::create_dir_all(output_dir)?;
        let filename = format!(
            "session_{}.json",
            result.start_time.format("%Y%m%d_%H%M%S")
        );
        let path = output_dir.join(filename);

        let json = serde_json::to_string_pretty(result).map_err(|e| GameError::Report {
            reason: format!("serialization failed: {}", e),
        })?;
        fs::write(&path, json)?;
        Ok(path)
    }
}

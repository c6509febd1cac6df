//! Report output port trait.

use std::path::{Path, PathBuf};

use crate::domain::error::GameError;
use crate::domain::session::SessionResult;

/// Port for handing a finished session to a report writer. Returns the
/// path of the artifact written.
pub trait ReportPort {
    fn write(&self, result: &SessionResult, output_dir: &Path) -> Result<PathBuf, GameError>;
}

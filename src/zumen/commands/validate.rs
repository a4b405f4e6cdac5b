//! Load an authored source record file and run the schema validator.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ZumenError};
use crate::schema::{self, SourceRecord};
use std::fs;
use std::path::Path;

pub fn run(record_path: &Path) -> Result<CmdResult> {
    let content = fs::read_to_string(record_path).map_err(ZumenError::Io)?;
    let record: SourceRecord =
        serde_json::from_str(&content).map_err(ZumenError::Serialization)?;

    let report = schema::validate(&record);

    let mut result = CmdResult::default();
    if report.is_valid {
        result.totals.processed = 1;
        result.add_message(CmdMessage::success(format!(
            "{}: record is valid ({} warning(s))",
            record_path.display(),
            report.warnings.len()
        )));
    } else {
        result.totals.failed = 1;
        result.add_message(CmdMessage::error(format!(
            "{}: record is invalid ({} error(s), {} warning(s))",
            record_path.display(),
            report.errors.len(),
            report.warnings.len()
        )));
    }

    Ok(result.with_report(report))
}

use crate::schema::ValidationReport;

pub mod audit;
pub mod export;
pub mod list;
pub mod migrate;
pub mod normalize;
pub mod validate;

use audit::DrawingAudit;
use list::DrawingSummary;
use migrate::DrawingMigration;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// End-of-run totals. Every batch command reports these; silent partial
/// failure is disallowed.
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchTotals {
    /// Items handled without error.
    pub processed: usize,
    /// Items skipped before any work (missing drawing, no metadata).
    pub skipped: usize,
    /// Items that errored or finished with unresolved files.
    pub failed: usize,
}

impl BatchTotals {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub messages: Vec<CmdMessage>,
    pub totals: BatchTotals,
    pub migrations: Vec<DrawingMigration>,
    pub audits: Vec<DrawingAudit>,
    pub listed_drawings: Vec<DrawingSummary>,
    pub report: Option<ValidationReport>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_report(mut self, report: ValidationReport) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_listed_drawings(mut self, drawings: Vec<DrawingSummary>) -> Self {
        self.listed_drawings = drawings;
        self
    }
}

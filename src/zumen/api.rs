//! # API Facade
//!
//! Thin facade over the command layer; the single entry point for every
//! operation regardless of the UI driving it. The facade dispatches,
//! normalizes inputs (raw id strings become [`DrawingId`]s, `--all`
//! resolves to the store's id list), and returns structured results. No
//! business logic, no I/O formatting, no stdout.
//!
//! `ZumenApi<S: DrawingStore>` is generic over the storage backend:
//! `FileStore` in production, `InMemoryStore` in tests.

use crate::commands;
use crate::error::Result;
use crate::model::{DrawingId, MachineType};
use crate::store::DrawingStore;
use std::path::Path;

pub struct ZumenApi<S: DrawingStore> {
    store: S,
}

impl<S: DrawingStore> ZumenApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list_drawings(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.store)
    }

    pub fn audit<I: AsRef<str>>(&self, ids: &[I]) -> Result<commands::CmdResult> {
        let ids = resolve_ids(ids);
        commands::audit::run(&self.store, &ids)
    }

    pub fn audit_all(&self) -> Result<commands::CmdResult> {
        let ids = self.store.list_drawings()?;
        commands::audit::run(&self.store, &ids)
    }

    pub fn migrate<I: AsRef<str>>(
        &mut self,
        ids: &[I],
        target: MachineType,
    ) -> Result<commands::CmdResult> {
        let ids = resolve_ids(ids);
        commands::migrate::run(&mut self.store, &ids, target)
    }

    pub fn validate_record(&self, record_path: &Path) -> Result<commands::CmdResult> {
        commands::validate::run(record_path)
    }

    pub fn normalize<I: AsRef<str>>(
        &mut self,
        ids: &[I],
        dry_run: bool,
        backup: bool,
    ) -> Result<commands::CmdResult> {
        let ids = resolve_ids(ids);
        commands::normalize::run(&mut self.store, &ids, dry_run, backup)
    }

    pub fn normalize_all(&mut self, dry_run: bool, backup: bool) -> Result<commands::CmdResult> {
        let ids = self.store.list_drawings()?;
        commands::normalize::run(&mut self.store, &ids, dry_run, backup)
    }

    pub fn export<I: AsRef<str>>(&self, ids: &[I]) -> Result<commands::CmdResult> {
        let ids = resolve_ids(ids);
        commands::export::run(&self.store, &ids)
    }
}

fn resolve_ids<I: AsRef<str>>(inputs: &[I]) -> Vec<DrawingId> {
    inputs.iter().map(|raw| DrawingId::new(raw.as_ref())).collect()
}

pub use commands::audit::DrawingAudit;
pub use commands::list::DrawingSummary;
pub use commands::migrate::{DrawingMigration, MigrationOutcome, UnresolvedFile};
pub use commands::{BatchTotals, CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MediaCategory;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn accepts_bare_and_prefixed_ids() {
        let fixture = StoreFixture::new().with_files(
            "D1",
            MediaCategory::Images,
            "step_1",
            &["a.jpg"],
        );
        let api = ZumenApi::new(fixture.store);

        let result = api.audit(&["drawing-D1"]).unwrap();
        assert_eq!(result.totals.processed, 1);
        assert_eq!(result.audits[0].id, DrawingId::new("D1"));
    }

    #[test]
    fn audit_all_covers_every_drawing() {
        let fixture = StoreFixture::new()
            .with_drawing("A1")
            .with_drawing("B2");
        let api = ZumenApi::new(fixture.store);

        let result = api.audit_all().unwrap();
        assert_eq!(result.totals.processed, 2);
    }

    #[test]
    fn migrate_dispatches_to_engine() {
        let fixture = StoreFixture::new().with_files(
            "D1",
            MediaCategory::Images,
            "step_1",
            &["a.jpg"],
        );
        let mut api = ZumenApi::new(fixture.store);

        let result = api.migrate(&["D1"], MachineType::Turning).unwrap();
        assert_eq!(result.totals.processed, 1);
        assert_eq!(result.migrations[0].outcome.moved_files, 1);
    }
}

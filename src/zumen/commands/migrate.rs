//! Reclassification of legacy step folders into machine-qualified ones.
//!
//! Per drawing and category: the legacy subset is processed in ascending
//! step order; files merge into the canonical qualified folder (created on
//! demand, never for an empty source); name collisions are recorded and
//! the file is left in place; emptied legacy folders are removed; a final
//! sweep removes any legacy-pattern folder left empty by earlier partial
//! runs. Running twice with the same target performs zero moves.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ZumenError};
use crate::media::MediaTree;
use crate::model::{DrawingId, MachineType, MediaCategory, StepFolderKind};
use crate::naming;
use crate::store::DrawingStore;

/// A file that could not be moved; it is still in its legacy folder.
#[derive(Debug, Clone)]
pub struct UnresolvedFile {
    /// `category/folder/file` relative to the drawing.
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Default, Clone)]
pub struct MigrationOutcome {
    pub moved_files: usize,
    pub created_folders: Vec<String>,
    pub removed_folders: Vec<String>,
    pub unresolved: Vec<UnresolvedFile>,
}

#[derive(Debug)]
pub struct DrawingMigration {
    pub id: DrawingId,
    pub outcome: MigrationOutcome,
}

/// Migrate a batch of drawings to `target`. Missing drawings are skipped;
/// per-file failures are collected and never abort sibling files or
/// sibling drawings.
pub fn run<S: DrawingStore>(
    store: &mut S,
    ids: &[DrawingId],
    target: MachineType,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    for id in ids {
        if !store.drawing_exists(id) {
            result.totals.skipped += 1;
            result.add_message(CmdMessage::warning(format!(
                "{} (skipped)",
                ZumenError::DrawingNotFound(id.to_string())
            )));
            continue;
        }

        match migrate_drawing(store, id, target) {
            Ok(outcome) => {
                if outcome.unresolved.is_empty() {
                    result.totals.processed += 1;
                    result.add_message(CmdMessage::success(format!(
                        "{}: moved {} file(s), {} folder(s) created, {} removed",
                        id,
                        outcome.moved_files,
                        outcome.created_folders.len(),
                        outcome.removed_folders.len()
                    )));
                } else {
                    result.totals.failed += 1;
                    result.add_message(CmdMessage::warning(format!(
                        "{}: moved {} file(s), {} unresolved",
                        id,
                        outcome.moved_files,
                        outcome.unresolved.len()
                    )));
                    for file in &outcome.unresolved {
                        result.add_message(CmdMessage::error(format!(
                            "{}: {} ({})",
                            id, file.path, file.reason
                        )));
                    }
                }
                result.migrations.push(DrawingMigration {
                    id: id.clone(),
                    outcome,
                });
            }
            Err(err) => {
                result.totals.failed += 1;
                result.add_message(CmdMessage::error(format!("{}: {}", id, err)));
            }
        }
    }

    Ok(result)
}

/// Migrate one drawing. The caller has already checked existence.
pub fn migrate_drawing<S: DrawingStore>(
    store: &mut S,
    id: &DrawingId,
    target: MachineType,
) -> Result<MigrationOutcome> {
    let tree = MediaTree::scan(store, id)?;
    let mut outcome = MigrationOutcome::default();

    for category in MediaCategory::ALL {
        let mut existing: Vec<String> = tree
            .step_folders(category)
            .iter()
            .map(|folder| folder.name.clone())
            .collect();

        for folder in tree.legacy_folders(category) {
            let step = match folder.kind.step() {
                Some(step) => step,
                None => continue,
            };
            let files = store.list_files(id, category, &folder.name)?;
            if files.is_empty() {
                // left for the sweep; no qualified shell is created
                continue;
            }

            let dest = naming::format(step, target);
            if !existing.iter().any(|name| name == &dest) {
                store.create_dir(id, category, &dest)?;
                existing.push(dest.clone());
                outcome.created_folders.push(format!("{}/{}", category, dest));
            }

            for file in files {
                match store.move_file(id, category, &folder.name, &dest, &file) {
                    Ok(()) => outcome.moved_files += 1,
                    Err(err) => outcome.unresolved.push(UnresolvedFile {
                        path: format!("{}/{}/{}", category, folder.name, file),
                        reason: err.to_string(),
                    }),
                }
            }

            if store.list_files(id, category, &folder.name)?.is_empty() {
                store.remove_empty_dir(id, category, &folder.name)?;
                outcome
                    .removed_folders
                    .push(format!("{}/{}", category, folder.name));
            }
        }

        // idempotent sweep: empty legacy-pattern folders from prior
        // partial runs go too, whether or not this run touched them
        for name in store.list_dirs(id, category)? {
            let is_legacy = matches!(naming::parse(&name), Ok(StepFolderKind::Legacy { .. }));
            if is_legacy && store.list_files(id, category, &name)?.is_empty() {
                store.remove_empty_dir(id, category, &name)?;
                outcome.removed_folders.push(format!("{}/{}", category, name));
            }
        }
    }

    Ok(outcome)
}

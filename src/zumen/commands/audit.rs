//! Read-only audit of a drawing's instruction content.
//!
//! `has_steps` comes strictly from the metadata document; residual step
//! folders are reported regardless, so a caller can spot "metadata says
//! empty but media folders still exist" before licensing a deletion.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ZumenError};
use crate::media::MediaTree;
use crate::model::DrawingId;
use crate::store::DrawingStore;

#[derive(Debug, Clone)]
pub struct DrawingAudit {
    pub id: DrawingId,
    pub has_steps: bool,
    /// Whether a metadata document was present at all.
    pub has_metadata: bool,
    /// Legacy and Qualified folders still on disk, `category/name` form.
    /// Overview folders are never listed here.
    pub residual_step_folders: Vec<String>,
}

impl DrawingAudit {
    /// A drawing may be deleted only when it has no recorded steps.
    /// Residual folders must be removed first by the caller; `overview`
    /// folders are not part of that cleanup.
    pub fn safe_to_delete(&self) -> bool {
        !self.has_steps
    }
}

pub fn run<S: DrawingStore>(store: &S, ids: &[DrawingId]) -> Result<CmdResult> {
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

        match audit_drawing(store, id) {
            Ok(audit) => {
                result.totals.processed += 1;
                if !audit.has_metadata {
                    result.add_message(CmdMessage::warning(format!(
                        "{}: no metadata document",
                        id
                    )));
                }
                let message = if audit.has_steps {
                    CmdMessage::info(format!("{}: has recorded steps, not deletable", id))
                } else if audit.residual_step_folders.is_empty() {
                    CmdMessage::success(format!("{}: empty, safe to delete", id))
                } else {
                    CmdMessage::warning(format!(
                        "{}: empty, but {} residual step folder(s) must be removed first",
                        id,
                        audit.residual_step_folders.len()
                    ))
                };
                result.add_message(message);
                result.audits.push(audit);
            }
            Err(err) => {
                result.totals.failed += 1;
                result.add_message(CmdMessage::error(format!("{}: {}", id, err)));
            }
        }
    }

    Ok(result)
}

/// Audit one drawing. The caller has already checked existence.
pub fn audit_drawing<S: DrawingStore>(store: &S, id: &DrawingId) -> Result<DrawingAudit> {
    let metadata = store.read_metadata(id)?;
    let has_metadata = metadata.is_some();
    let has_steps = metadata.map(|doc| doc.has_steps()).unwrap_or(false);

    let tree = MediaTree::scan(store, id)?;

    Ok(DrawingAudit {
        id: id.clone(),
        has_steps,
        has_metadata,
        residual_step_folders: tree.residual_step_folders(),
    })
}

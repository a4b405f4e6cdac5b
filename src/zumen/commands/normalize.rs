//! Normalization of historical `metadata.machineType` values.
//!
//! Free-form spellings (Japanese names, vendor shorthand, comma-joined
//! strings) are rewritten to the canonical key list. Unresolvable values
//! coerce to `other` — unlike folder migration, which rejects an unknown
//! target, this pass is cleaning up data nobody will re-enter. Documents
//! already canonical are left untouched.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ZumenError};
use crate::model::{DrawingId, MachineTypeField, MetadataDocument};
use crate::store::DrawingStore;

pub fn run<S: DrawingStore>(
    store: &mut S,
    ids: &[DrawingId],
    dry_run: bool,
    backup: bool,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut updated = 0usize;

    for id in ids {
        if !store.drawing_exists(id) {
            result.totals.skipped += 1;
            result.add_message(CmdMessage::warning(format!(
                "{} (skipped)",
                ZumenError::DrawingNotFound(id.to_string())
            )));
            continue;
        }
        let Some(mut doc) = store.read_metadata(id)? else {
            result.totals.skipped += 1;
            result.add_message(CmdMessage::warning(format!(
                "{}: no metadata document, skipped",
                id
            )));
            continue;
        };

        let normalized: Vec<String> = doc
            .metadata
            .machine_type
            .normalized()
            .iter()
            .map(|machine| machine.key().to_string())
            .collect();

        if normalized == doc.metadata.machine_type.raw_list() {
            result.totals.processed += 1;
            continue;
        }

        if dry_run {
            result.totals.processed += 1;
            result.add_message(CmdMessage::info(format!(
                "{}: (dry-run) machineType -> [{}]",
                id,
                normalized.join(", ")
            )));
            updated += 1;
            continue;
        }

        match write_normalized(store, id, &mut doc, normalized.clone(), backup) {
            Ok(()) => {
                result.totals.processed += 1;
                result.add_message(CmdMessage::success(format!(
                    "{}: machineType -> [{}]",
                    id,
                    normalized.join(", ")
                )));
                updated += 1;
            }
            Err(err) => {
                result.totals.failed += 1;
                result.add_message(CmdMessage::error(format!("{}: {}", id, err)));
            }
        }
    }

    if updated == 0 {
        result.add_message(CmdMessage::info("No documents needed normalization."));
    }

    Ok(result)
}

fn write_normalized<S: DrawingStore>(
    store: &mut S,
    id: &DrawingId,
    doc: &mut MetadataDocument,
    normalized: Vec<String>,
    backup: bool,
) -> Result<()> {
    if backup {
        store.backup_metadata(id)?;
    }
    doc.metadata.machine_type = MachineTypeField::List(normalized);
    store.write_metadata(id, doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetadataDocument;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn doc_with_machine_type(id: &str, field: MachineTypeField) -> MetadataDocument {
        let mut doc = MetadataDocument::default();
        doc.metadata.drawing_number = id.into();
        doc.metadata.machine_type = field;
        doc
    }

    fn machine_type_of(store: &InMemoryStore, id: &str) -> Vec<String> {
        store
            .read_metadata(&DrawingId::new(id))
            .unwrap()
            .unwrap()
            .metadata
            .machine_type
            .raw_list()
            .to_vec()
    }

    #[test]
    fn rewrites_aliases_to_canonical_keys() {
        let mut fixture = StoreFixture::new().with_metadata(
            "D1",
            doc_with_machine_type(
                "D1",
                MachineTypeField::List(vec!["マシニング".into(), "lathe".into()]),
            ),
        );

        let result = run(&mut fixture.store, &[DrawingId::new("D1")], false, true).unwrap();
        assert_eq!(result.totals.processed, 1);
        assert_eq!(machine_type_of(&fixture.store, "D1"), vec!["machining", "turning"]);
        // backup captured the pre-normalization document
        let backup = fixture.store.metadata_backup(&DrawingId::new("D1")).unwrap();
        assert_eq!(
            backup.metadata.machine_type.raw_list().to_vec(),
            vec!["マシニング", "lathe"]
        );
    }

    #[test]
    fn comma_joined_single_string_becomes_list() {
        let mut fixture = StoreFixture::new().with_metadata(
            "D1",
            doc_with_machine_type("D1", MachineTypeField::Single("旋盤, ラジアル".into())),
        );

        run(&mut fixture.store, &[DrawingId::new("D1")], false, false).unwrap();
        assert_eq!(machine_type_of(&fixture.store, "D1"), vec!["turning", "radial"]);
    }

    #[test]
    fn canonical_documents_are_not_rewritten() {
        let mut fixture = StoreFixture::new().with_metadata(
            "D1",
            doc_with_machine_type("D1", MachineTypeField::List(vec!["turning".into()])),
        );

        let result = run(&mut fixture.store, &[DrawingId::new("D1")], false, true).unwrap();
        assert_eq!(result.totals.processed, 1);
        // untouched means no backup was taken either
        assert!(fixture.store.metadata_backup(&DrawingId::new("D1")).is_none());
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("No documents needed normalization")));
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let mut fixture = StoreFixture::new().with_metadata(
            "D1",
            doc_with_machine_type("D1", MachineTypeField::List(vec!["マシニング".into()])),
        );

        let result = run(&mut fixture.store, &[DrawingId::new("D1")], true, true).unwrap();
        assert!(result.messages.iter().any(|m| m.content.contains("dry-run")));
        assert_eq!(machine_type_of(&fixture.store, "D1"), vec!["マシニング"]);
        assert!(fixture.store.metadata_backup(&DrawingId::new("D1")).is_none());
    }

    #[test]
    fn normalization_is_idempotent() {
        let mut fixture = StoreFixture::new().with_metadata(
            "D1",
            doc_with_machine_type("D1", MachineTypeField::List(vec!["フライス盤".into()])),
        );
        let ids = [DrawingId::new("D1")];

        run(&mut fixture.store, &ids, false, false).unwrap();
        let after_first = machine_type_of(&fixture.store, "D1");
        let second = run(&mut fixture.store, &ids, false, false).unwrap();
        assert_eq!(machine_type_of(&fixture.store, "D1"), after_first);
        assert!(second
            .messages
            .iter()
            .any(|m| m.content.contains("No documents needed normalization")));
    }

    #[test]
    fn missing_drawing_and_missing_document_are_skipped() {
        let mut fixture = StoreFixture::new().with_drawing("EMPTY");
        let result = run(
            &mut fixture.store,
            &[DrawingId::new("EMPTY"), DrawingId::new("GONE")],
            false,
            true,
        )
        .unwrap();

        assert_eq!(result.totals.skipped, 2);
        assert_eq!(result.totals.processed, 0);
    }
}

//! Archive drawings into a timestamped tar.gz before destructive batch
//! work. The archive holds each drawing's metadata document plus every
//! file of every recognized folder (overview included) in every category.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ZumenError};
use crate::media::MediaTree;
use crate::model::{DrawingId, MediaCategory};
use crate::store::fs::METADATA_FILENAME;
use crate::store::DrawingStore;
use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;

pub fn run<S: DrawingStore>(store: &S, ids: &[DrawingId]) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let mut present = Vec::new();
    for id in ids {
        if store.drawing_exists(id) {
            present.push(id.clone());
        } else {
            result.totals.skipped += 1;
            result.add_message(CmdMessage::warning(format!(
                "{} (skipped)",
                ZumenError::DrawingNotFound(id.to_string())
            )));
        }
    }

    if present.is_empty() {
        result.add_message(CmdMessage::info("No drawings to export."));
        return Ok(result);
    }

    let filename = format!("zumen-{}.tar.gz", Utc::now().format("%Y-%m-%d_%H%M%S"));
    let file = File::create(&filename).map_err(ZumenError::Io)?;
    let entries = write_archive(file, store, &present)?;

    result.totals.processed = present.len();
    result.add_message(CmdMessage::success(format!(
        "Exported {} drawing(s) ({} entries) to {}",
        present.len(),
        entries,
        filename
    )));
    Ok(result)
}

fn write_archive<W: Write, S: DrawingStore>(
    writer: W,
    store: &S,
    ids: &[DrawingId],
) -> Result<usize> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);
    let mut entries = 0usize;

    for id in ids {
        if let Some(doc) = store.read_metadata(id)? {
            let content = serde_json::to_vec_pretty(&doc).map_err(ZumenError::Serialization)?;
            append_entry(
                &mut tar,
                &format!("zumen/{}/{}", id.dir_name(), METADATA_FILENAME),
                &content,
            )?;
            entries += 1;
        }

        let tree = MediaTree::scan(store, id)?;
        for category in MediaCategory::ALL {
            for folder in tree.step_folders(category) {
                for name in store.list_files(id, category, &folder.name)? {
                    let bytes = store.read_file(id, category, &folder.name, &name)?;
                    append_entry(
                        &mut tar,
                        &format!(
                            "zumen/{}/{}/{}/{}",
                            id.dir_name(),
                            category,
                            folder.name,
                            name
                        ),
                        &bytes,
                    )?;
                    entries += 1;
                }
            }
        }
    }

    tar.finish().map_err(ZumenError::Io)?;
    Ok(entries)
}

fn append_entry<W: Write>(
    tar: &mut tar::Builder<W>,
    path: &str,
    content: &[u8],
) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    tar.append_data(&mut header, path, content)
        .map_err(ZumenError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MachineType;
    use crate::store::memory::fixtures::StoreFixture;
    use flate2::read::GzDecoder;

    fn archive_paths(bytes: &[u8]) -> Vec<String> {
        let mut archive = tar::Archive::new(GzDecoder::new(bytes));
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                entry
                    .unwrap()
                    .path()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn archive_holds_metadata_and_every_media_file() {
        let fixture = StoreFixture::new()
            .with_bucket_steps("D1", MachineType::Turning, 2)
            .with_files("D1", MediaCategory::Images, "step_1_turning", &["a.jpg"])
            .with_files("D1", MediaCategory::Images, "overview", &["o.jpg"])
            .with_files("D1", MediaCategory::Pdfs, "step_1", &["p.pdf"]);

        let mut buffer = Vec::new();
        let entries =
            write_archive(&mut buffer, &fixture.store, &[DrawingId::new("D1")]).unwrap();
        assert_eq!(entries, 4);

        let paths = archive_paths(&buffer);
        assert!(paths.contains(&"zumen/drawing-D1/instruction.json".to_string()));
        assert!(paths.contains(&"zumen/drawing-D1/images/step_1_turning/a.jpg".to_string()));
        assert!(paths.contains(&"zumen/drawing-D1/images/overview/o.jpg".to_string()));
        assert!(paths.contains(&"zumen/drawing-D1/pdfs/step_1/p.pdf".to_string()));
    }

    #[test]
    fn missing_drawings_are_skipped_with_message() {
        let fixture = StoreFixture::new();
        let result = run(&fixture.store, &[DrawingId::new("GONE")]).unwrap();
        assert_eq!(result.totals.skipped, 1);
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("No drawings to export")));
    }
}

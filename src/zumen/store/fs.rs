use super::DrawingStore;
use crate::error::{Result, ZumenError};
use crate::model::{DrawingId, MediaCategory, MetadataDocument};
use std::fs;
use std::path::{Path, PathBuf};

pub const METADATA_FILENAME: &str = "instruction.json";

/// Production store over the on-disk record layout.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn drawing_path(&self, id: &DrawingId) -> PathBuf {
        self.root.join(id.dir_name())
    }

    fn category_path(&self, id: &DrawingId, category: MediaCategory) -> PathBuf {
        self.drawing_path(id).join(category.dir_name())
    }

    fn metadata_path(&self, id: &DrawingId) -> PathBuf {
        self.drawing_path(id).join(METADATA_FILENAME)
    }

    fn list_entries(&self, path: &Path, dirs: bool) -> Result<Vec<String>> {
        if !path.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(path).map_err(ZumenError::Io)? {
            let entry = entry.map_err(ZumenError::Io)?;
            let file_type = entry.file_type().map_err(ZumenError::Io)?;
            if file_type.is_dir() == dirs {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl DrawingStore for FileStore {
    fn list_drawings(&self) -> Result<Vec<DrawingId>> {
        let mut ids: Vec<DrawingId> = self
            .list_entries(&self.root, true)?
            .iter()
            .filter_map(|name| DrawingId::from_dir_name(name))
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn drawing_exists(&self, id: &DrawingId) -> bool {
        self.drawing_path(id).is_dir()
    }

    fn read_metadata(&self, id: &DrawingId) -> Result<Option<MetadataDocument>> {
        let path = self.metadata_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(ZumenError::Io)?;
        let doc = serde_json::from_str(&content).map_err(ZumenError::Serialization)?;
        Ok(Some(doc))
    }

    fn write_metadata(&mut self, id: &DrawingId, doc: &MetadataDocument) -> Result<()> {
        let dir = self.drawing_path(id);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(ZumenError::Io)?;
        }
        let content = serde_json::to_string_pretty(doc).map_err(ZumenError::Serialization)?;
        fs::write(self.metadata_path(id), content + "\n").map_err(ZumenError::Io)?;
        Ok(())
    }

    fn backup_metadata(&mut self, id: &DrawingId) -> Result<()> {
        let path = self.metadata_path(id);
        if !path.exists() {
            return Ok(());
        }
        let backup = path.with_extension("json.bak");
        if backup.exists() {
            return Ok(());
        }
        fs::copy(&path, &backup).map_err(ZumenError::Io)?;
        Ok(())
    }

    fn list_dirs(&self, id: &DrawingId, category: MediaCategory) -> Result<Vec<String>> {
        self.list_entries(&self.category_path(id, category), true)
    }

    fn list_files(
        &self,
        id: &DrawingId,
        category: MediaCategory,
        folder: &str,
    ) -> Result<Vec<String>> {
        self.list_entries(&self.category_path(id, category).join(folder), false)
    }

    fn read_file(
        &self,
        id: &DrawingId,
        category: MediaCategory,
        folder: &str,
        name: &str,
    ) -> Result<Vec<u8>> {
        let path = self.category_path(id, category).join(folder).join(name);
        fs::read(path).map_err(ZumenError::Io)
    }

    fn create_dir(
        &mut self,
        id: &DrawingId,
        category: MediaCategory,
        folder: &str,
    ) -> Result<()> {
        let path = self.category_path(id, category).join(folder);
        fs::create_dir_all(path).map_err(ZumenError::Io)
    }

    fn move_file(
        &mut self,
        id: &DrawingId,
        category: MediaCategory,
        from: &str,
        to: &str,
        name: &str,
    ) -> Result<()> {
        let category_path = self.category_path(id, category);
        let source = category_path.join(from).join(name);
        let dest = category_path.join(to).join(name);
        if dest.exists() {
            return Err(ZumenError::FileCollision(dest));
        }
        fs::rename(source, dest).map_err(ZumenError::Io)
    }

    fn remove_empty_dir(
        &mut self,
        id: &DrawingId,
        category: MediaCategory,
        folder: &str,
    ) -> Result<()> {
        let path = self.category_path(id, category).join(folder);
        fs::remove_dir(path).map_err(ZumenError::Io)
    }

    fn folder_path(&self, id: &DrawingId, category: MediaCategory, folder: &str) -> PathBuf {
        self.category_path(id, category).join(folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MachineType;

    fn seed(root: &Path, id: &str, category: &str, folder: &str, files: &[&str]) {
        let dir = root
            .join(format!("drawing-{}", id))
            .join(category)
            .join(folder);
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), b"x").unwrap();
        }
    }

    #[test]
    fn lists_drawings_and_skips_foreign_directories() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path(), "B2", "images", "step_1", &[]);
        seed(tmp.path(), "A1", "images", "step_1", &[]);
        fs::create_dir_all(tmp.path().join("lost+found")).unwrap();

        let store = FileStore::new(tmp.path());
        let ids = store.list_drawings().unwrap();
        assert_eq!(ids, vec![DrawingId::new("A1"), DrawingId::new("B2")]);
    }

    #[test]
    fn absent_category_lists_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path(), "D1", "images", "step_1", &["a.jpg"]);

        let store = FileStore::new(tmp.path());
        let id = DrawingId::new("D1");
        assert!(store.list_dirs(&id, MediaCategory::Videos).unwrap().is_empty());
        assert_eq!(
            store.list_dirs(&id, MediaCategory::Images).unwrap(),
            vec!["step_1"]
        );
    }

    #[test]
    fn list_files_is_flat_and_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path(), "D1", "pdfs", "step_2", &["b.pdf", "a.pdf"]);
        fs::create_dir_all(
            tmp.path()
                .join("drawing-D1")
                .join("pdfs")
                .join("step_2")
                .join("nested"),
        )
        .unwrap();

        let store = FileStore::new(tmp.path());
        let files = store
            .list_files(&DrawingId::new("D1"), MediaCategory::Pdfs, "step_2")
            .unwrap();
        assert_eq!(files, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn move_file_refuses_collision_and_leaves_source() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path(), "D1", "images", "step_1", &["a.jpg"]);
        seed(tmp.path(), "D1", "images", "step_1_turning", &["a.jpg"]);

        let mut store = FileStore::new(tmp.path());
        let id = DrawingId::new("D1");
        let err = store
            .move_file(&id, MediaCategory::Images, "step_1", "step_1_turning", "a.jpg")
            .unwrap_err();
        assert!(matches!(err, ZumenError::FileCollision(_)));
        assert_eq!(
            store.list_files(&id, MediaCategory::Images, "step_1").unwrap(),
            vec!["a.jpg"]
        );
    }

    #[test]
    fn metadata_round_trip_and_backup() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path());
        let id = DrawingId::new("D1");

        assert!(store.read_metadata(&id).unwrap().is_none());

        let mut doc = MetadataDocument::default();
        doc.metadata.drawing_number = "D1".into();
        doc.work_steps_by_machine
            .insert(MachineType::Turning, vec![Default::default()]);
        store.write_metadata(&id, &doc).unwrap();

        let loaded = store.read_metadata(&id).unwrap().unwrap();
        assert!(loaded.has_steps());

        store.backup_metadata(&id).unwrap();
        assert!(tmp
            .path()
            .join("drawing-D1")
            .join("instruction.json.bak")
            .exists());
    }
}

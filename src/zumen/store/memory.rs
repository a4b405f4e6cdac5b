use super::DrawingStore;
use crate::error::{Result, ZumenError};
use crate::model::{DrawingId, MediaCategory, MetadataDocument};
use std::collections::BTreeMap;
use std::path::PathBuf;

type FolderMap = BTreeMap<String, BTreeMap<String, Vec<u8>>>;

#[derive(Debug, Default, Clone)]
struct MemDrawing {
    metadata: Option<MetadataDocument>,
    metadata_backup: Option<MetadataDocument>,
    media: BTreeMap<MediaCategory, FolderMap>,
}

/// In-memory store for tests. Mirrors the listing semantics of
/// [`FileStore`](super::fs::FileStore): absent drawings, categories, and
/// folders list as empty.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    drawings: BTreeMap<DrawingId, MemDrawing>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a drawing directory without metadata or media.
    pub fn add_drawing(&mut self, id: &DrawingId) {
        self.drawings.entry(id.clone()).or_default();
    }

    pub fn metadata_backup(&self, id: &DrawingId) -> Option<&MetadataDocument> {
        self.drawings
            .get(id)
            .and_then(|d| d.metadata_backup.as_ref())
    }

    fn folders(&self, id: &DrawingId, category: MediaCategory) -> Option<&FolderMap> {
        self.drawings.get(id).and_then(|d| d.media.get(&category))
    }
}

impl DrawingStore for InMemoryStore {
    fn list_drawings(&self) -> Result<Vec<DrawingId>> {
        Ok(self.drawings.keys().cloned().collect())
    }

    fn drawing_exists(&self, id: &DrawingId) -> bool {
        self.drawings.contains_key(id)
    }

    fn read_metadata(&self, id: &DrawingId) -> Result<Option<MetadataDocument>> {
        Ok(self.drawings.get(id).and_then(|d| d.metadata.clone()))
    }

    fn write_metadata(&mut self, id: &DrawingId, doc: &MetadataDocument) -> Result<()> {
        self.drawings.entry(id.clone()).or_default().metadata = Some(doc.clone());
        Ok(())
    }

    fn backup_metadata(&mut self, id: &DrawingId) -> Result<()> {
        if let Some(drawing) = self.drawings.get_mut(id) {
            if drawing.metadata_backup.is_none() {
                drawing.metadata_backup = drawing.metadata.clone();
            }
        }
        Ok(())
    }

    fn list_dirs(&self, id: &DrawingId, category: MediaCategory) -> Result<Vec<String>> {
        Ok(self
            .folders(id, category)
            .map(|folders| folders.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn list_files(
        &self,
        id: &DrawingId,
        category: MediaCategory,
        folder: &str,
    ) -> Result<Vec<String>> {
        Ok(self
            .folders(id, category)
            .and_then(|folders| folders.get(folder))
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn read_file(
        &self,
        id: &DrawingId,
        category: MediaCategory,
        folder: &str,
        name: &str,
    ) -> Result<Vec<u8>> {
        self.folders(id, category)
            .and_then(|folders| folders.get(folder))
            .and_then(|files| files.get(name))
            .cloned()
            .ok_or_else(|| ZumenError::Store(format!("no such file: {}/{}/{}", category, folder, name)))
    }

    fn create_dir(
        &mut self,
        id: &DrawingId,
        category: MediaCategory,
        folder: &str,
    ) -> Result<()> {
        self.drawings
            .entry(id.clone())
            .or_default()
            .media
            .entry(category)
            .or_default()
            .entry(folder.to_string())
            .or_default();
        Ok(())
    }

    fn move_file(
        &mut self,
        id: &DrawingId,
        category: MediaCategory,
        from: &str,
        to: &str,
        name: &str,
    ) -> Result<()> {
        let collides = self
            .folders(id, category)
            .and_then(|folders| folders.get(to))
            .map(|files| files.contains_key(name))
            .unwrap_or(false);
        if collides {
            return Err(ZumenError::FileCollision(
                self.folder_path(id, category, to).join(name),
            ));
        }

        let folders = self
            .drawings
            .get_mut(id)
            .and_then(|d| d.media.get_mut(&category))
            .ok_or_else(|| ZumenError::Store(format!("no such category: {}", category)))?;

        let bytes = folders
            .get_mut(from)
            .and_then(|files| files.remove(name))
            .ok_or_else(|| ZumenError::Store(format!("no such file: {}/{}/{}", category, from, name)))?;
        folders
            .get_mut(to)
            .ok_or_else(|| ZumenError::Store(format!("no such folder: {}/{}", category, to)))?
            .insert(name.to_string(), bytes);
        Ok(())
    }

    fn remove_empty_dir(
        &mut self,
        id: &DrawingId,
        category: MediaCategory,
        folder: &str,
    ) -> Result<()> {
        let folders = self
            .drawings
            .get_mut(id)
            .and_then(|d| d.media.get_mut(&category))
            .ok_or_else(|| ZumenError::Store(format!("no such category: {}", category)))?;
        match folders.get(folder) {
            Some(files) if files.is_empty() => {
                folders.remove(folder);
                Ok(())
            }
            Some(_) => Err(ZumenError::Store(format!(
                "folder not empty: {}/{}",
                category, folder
            ))),
            None => Err(ZumenError::Store(format!(
                "no such folder: {}/{}",
                category, folder
            ))),
        }
    }

    fn folder_path(&self, id: &DrawingId, category: MediaCategory, folder: &str) -> PathBuf {
        PathBuf::from(id.dir_name())
            .join(category.dir_name())
            .join(folder)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{MachineType, WorkStep};

    /// Builder for seeded in-memory stores used across command tests.
    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_drawing(mut self, id: &str) -> Self {
            self.store.add_drawing(&DrawingId::new(id));
            self
        }

        /// Seed a folder with the named files (one byte of content each).
        pub fn with_files(
            mut self,
            id: &str,
            category: MediaCategory,
            folder: &str,
            files: &[&str],
        ) -> Self {
            let drawing_id = DrawingId::new(id);
            self.store.create_dir(&drawing_id, category, folder).unwrap();
            let folders = self
                .store
                .drawings
                .get_mut(&drawing_id)
                .unwrap()
                .media
                .get_mut(&category)
                .unwrap();
            let entry = folders.get_mut(folder).unwrap();
            for file in files {
                entry.insert(file.to_string(), b"x".to_vec());
            }
            self
        }

        /// Seed an empty folder.
        pub fn with_empty_folder(self, id: &str, category: MediaCategory, folder: &str) -> Self {
            self.with_files(id, category, folder, &[])
        }

        pub fn with_metadata(mut self, id: &str, doc: MetadataDocument) -> Self {
            self.store
                .write_metadata(&DrawingId::new(id), &doc)
                .unwrap();
            self
        }

        /// Seed a metadata document with `count` steps in one bucket.
        pub fn with_bucket_steps(self, id: &str, machine: MachineType, count: usize) -> Self {
            let mut doc = MetadataDocument::default();
            doc.metadata.drawing_number = DrawingId::new(id).as_str().to_string();
            doc.work_steps_by_machine.insert(
                machine,
                (1..=count as u32)
                    .map(|n| WorkStep {
                        step_number: Some(n),
                        ..Default::default()
                    })
                    .collect(),
            );
            self.with_metadata(id, doc)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;

    #[test]
    fn absent_drawing_lists_as_empty() {
        let store = InMemoryStore::new();
        let id = DrawingId::new("D1");
        assert!(!store.drawing_exists(&id));
        assert!(store.list_dirs(&id, MediaCategory::Images).unwrap().is_empty());
        assert!(store
            .list_files(&id, MediaCategory::Images, "step_1")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn move_file_merges_and_detects_collision() {
        let mut fixture = StoreFixture::new()
            .with_files("D1", MediaCategory::Images, "step_1", &["a.jpg", "b.jpg"])
            .with_files("D1", MediaCategory::Images, "step_1_turning", &["b.jpg"]);
        let id = DrawingId::new("D1");
        let store = &mut fixture.store;

        store
            .move_file(&id, MediaCategory::Images, "step_1", "step_1_turning", "a.jpg")
            .unwrap();
        let err = store
            .move_file(&id, MediaCategory::Images, "step_1", "step_1_turning", "b.jpg")
            .unwrap_err();
        assert!(matches!(err, ZumenError::FileCollision(_)));

        assert_eq!(
            store.list_files(&id, MediaCategory::Images, "step_1").unwrap(),
            vec!["b.jpg"]
        );
        assert_eq!(
            store
                .list_files(&id, MediaCategory::Images, "step_1_turning")
                .unwrap(),
            vec!["a.jpg", "b.jpg"]
        );
    }

    #[test]
    fn remove_empty_dir_refuses_non_empty() {
        let mut fixture = StoreFixture::new()
            .with_files("D1", MediaCategory::Videos, "step_1", &["v.mp4"])
            .with_empty_folder("D1", MediaCategory::Videos, "step_2");
        let id = DrawingId::new("D1");
        let store = &mut fixture.store;

        assert!(store.remove_empty_dir(&id, MediaCategory::Videos, "step_1").is_err());
        store
            .remove_empty_dir(&id, MediaCategory::Videos, "step_2")
            .unwrap();
        assert_eq!(
            store.list_dirs(&id, MediaCategory::Videos).unwrap(),
            vec!["step_1"]
        );
    }

    #[test]
    fn backup_keeps_first_snapshot_only() {
        let mut store = InMemoryStore::new();
        let id = DrawingId::new("D1");
        let mut doc = MetadataDocument::default();
        doc.metadata.drawing_number = "D1".into();
        store.write_metadata(&id, &doc).unwrap();

        store.backup_metadata(&id).unwrap();
        doc.metadata.title = "changed".into();
        store.write_metadata(&id, &doc).unwrap();
        store.backup_metadata(&id).unwrap();

        let backup = store.metadata_backup(&id).unwrap();
        assert!(backup.metadata.title.is_empty());
    }
}

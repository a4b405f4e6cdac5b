//! Read-only classified view over one drawing's media directories.
//!
//! Directory names outside the recognized scheme are tolerated and
//! skipped; the record store has historically carried stray directories
//! and a scan must not trip over them.

use crate::error::Result;
use crate::model::{DrawingId, MediaCategory, StepFolder, StepFolderKind};
use crate::naming;
use crate::store::DrawingStore;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MediaTree {
    categories: BTreeMap<MediaCategory, Vec<StepFolder>>,
}

impl MediaTree {
    /// Scan all four category directories of a drawing. An absent category
    /// yields an empty sequence for that category.
    pub fn scan<S: DrawingStore>(store: &S, id: &DrawingId) -> Result<MediaTree> {
        let mut categories = BTreeMap::new();
        for category in MediaCategory::ALL {
            let mut folders = Vec::new();
            for name in store.list_dirs(id, category)? {
                if let Ok(kind) = naming::parse(&name) {
                    folders.push(StepFolder { name, kind });
                }
            }
            categories.insert(category, folders);
        }
        Ok(MediaTree { categories })
    }

    /// All recognized folders of one category, in name order.
    pub fn step_folders(&self, category: MediaCategory) -> &[StepFolder] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The legacy subset of one category, ascending by step number.
    pub fn legacy_folders(&self, category: MediaCategory) -> Vec<&StepFolder> {
        let mut legacy: Vec<&StepFolder> = self
            .step_folders(category)
            .iter()
            .filter(|folder| folder.kind.is_legacy())
            .collect();
        legacy.sort_by_key(|folder| folder.kind.step());
        legacy
    }

    /// Every Legacy or Qualified folder across all categories as
    /// `category/name` relative paths. Overview folders are excluded.
    pub fn residual_step_folders(&self) -> Vec<String> {
        let mut residual = Vec::new();
        for category in MediaCategory::ALL {
            for folder in self.step_folders(category) {
                if !folder.kind.is_overview() {
                    residual.push(format!("{}/{}", category, folder.name));
                }
            }
        }
        residual
    }

    pub fn contains(&self, category: MediaCategory, name: &str) -> bool {
        self.step_folders(category)
            .iter()
            .any(|folder| folder.name == name)
    }
}

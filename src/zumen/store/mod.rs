//! # Storage Layer
//!
//! The record store is a directory per drawing; this module hides that
//! behind the [`DrawingStore`] trait so the rest of the crate never touches
//! the filesystem directly.
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** with `InMemoryStore` (no filesystem needed)
//! - Allow **future backends** (a database-backed record store) without
//!   changing the migration/audit logic
//! - Keep the classification and validation logic **decoupled** from
//!   persistence details
//!
//! The trait is deliberately narrow: read/enumerate/move/remove plus
//! metadata document access. Nothing above this layer composes paths.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production store over the on-disk layout
//!   `<root>/drawing-<id>/{images,videos,pdfs,programs}/<folder>/<file>`
//!   with `instruction.json` at the drawing root
//! - [`memory::InMemoryStore`]: in-memory store for tests
//!
//! ## Listing semantics
//!
//! `list_dirs`/`list_files` return sorted names. An absent drawing,
//! category directory, or folder yields an empty listing, never an error —
//! the store has historically tolerated sparse layouts. `list_files`
//! is flat: directories nested inside a step folder are not listed.

use crate::error::Result;
use crate::model::{DrawingId, MediaCategory, MetadataDocument};
use std::path::PathBuf;

pub mod fs;
pub mod memory;

/// Abstract interface for drawing record storage.
pub trait DrawingStore {
    /// All drawing ids present in the store, sorted.
    fn list_drawings(&self) -> Result<Vec<DrawingId>>;

    /// Whether the drawing's record directory exists.
    fn drawing_exists(&self, id: &DrawingId) -> bool;

    /// Read the metadata document; `None` when the drawing has none.
    fn read_metadata(&self, id: &DrawingId) -> Result<Option<MetadataDocument>>;

    /// Rewrite the metadata document.
    fn write_metadata(&mut self, id: &DrawingId, doc: &MetadataDocument) -> Result<()>;

    /// Keep a `.bak` copy of the current metadata document. No-op when the
    /// drawing has no document or a backup already exists.
    fn backup_metadata(&mut self, id: &DrawingId) -> Result<()>;

    /// Immediate child directory names of one category directory.
    fn list_dirs(&self, id: &DrawingId, category: MediaCategory) -> Result<Vec<String>>;

    /// File names directly inside one folder of one category.
    fn list_files(
        &self,
        id: &DrawingId,
        category: MediaCategory,
        folder: &str,
    ) -> Result<Vec<String>>;

    /// Contents of one file (used by export).
    fn read_file(
        &self,
        id: &DrawingId,
        category: MediaCategory,
        folder: &str,
        name: &str,
    ) -> Result<Vec<u8>>;

    /// Create a folder inside a category directory (parents included).
    fn create_dir(&mut self, id: &DrawingId, category: MediaCategory, folder: &str)
        -> Result<()>;

    /// Move one file between folders of the same category, preserving its
    /// name. Fails with `FileCollision` when the destination already has a
    /// file of that name; the source is left untouched.
    fn move_file(
        &mut self,
        id: &DrawingId,
        category: MediaCategory,
        from: &str,
        to: &str,
        name: &str,
    ) -> Result<()>;

    /// Remove an empty folder. Fails when the folder still has entries.
    fn remove_empty_dir(
        &mut self,
        id: &DrawingId,
        category: MediaCategory,
        folder: &str,
    ) -> Result<()>;

    /// Path of a folder for reporting. Purely informational for
    /// non-filesystem backends.
    fn folder_path(&self, id: &DrawingId, category: MediaCategory, folder: &str) -> PathBuf;
}

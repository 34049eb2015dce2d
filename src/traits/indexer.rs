//! Metadata index operations.

use std::path::{Path, PathBuf};

use crate::doc::{DirDoc, FileDoc, Node};
use crate::iter::{DirIter, IteratorOptions};
use crate::VfsError;

/// Metadata indexing layer of a VFS.
///
/// An indexer stores and indexes directory and file documents, typically in a
/// document database, and may cache them. It owns identifier and revision
/// assignment: `create_*` and `update_*` take the new document as `&mut` so
/// the backend can fill in `doc_id`/`doc_rev` after persisting.
///
/// # Error convention
///
/// Every lookup that finds no node **must** fail with
/// [`VfsError::NotFound`] — callers rely on
/// [`is_not_found`](VfsError::is_not_found) to build existence probes and
/// create-vs-update branches. All other failures propagate verbatim.
///
/// # Consistency
///
/// Updating a directory document whose name or parent changed moves the whole
/// subtree: the backend is responsible for keeping descendant materialized
/// paths consistent with the new location (files carry no path, so only
/// directory rows are affected).
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
pub trait Indexer: Send + Sync {
    /// Prepare the index for first use (create design documents, seed the
    /// root directory).
    fn init_index(&self) -> Result<(), VfsError>;

    /// Total size in bytes of the files indexed in this VFS.
    fn disk_usage(&self) -> Result<u64, VfsError>;

    /// Persist a new file document, assigning its identifier and revision.
    fn create_file_doc(&self, doc: &mut FileDoc) -> Result<(), VfsError>;

    /// Replace a file document. `olddoc` is the current revision, `newdoc`
    /// the replacement; the backend assigns `newdoc`'s revision.
    fn update_file_doc(&self, olddoc: &FileDoc, newdoc: &mut FileDoc) -> Result<(), VfsError>;

    /// Remove a file document from the index.
    fn delete_file_doc(&self, doc: &FileDoc) -> Result<(), VfsError>;

    /// Persist a new directory document, assigning its identifier and
    /// revision.
    fn create_dir_doc(&self, doc: &mut DirDoc) -> Result<(), VfsError>;

    /// Replace a directory document. `olddoc` is the current revision,
    /// `newdoc` the replacement; the backend assigns `newdoc`'s revision and
    /// keeps descendant paths consistent.
    fn update_dir_doc(&self, olddoc: &DirDoc, newdoc: &mut DirDoc) -> Result<(), VfsError>;

    /// Remove a directory document from the index.
    fn delete_dir_doc(&self, doc: &DirDoc) -> Result<(), VfsError>;

    /// Directory document by identifier.
    ///
    /// # Errors
    ///
    /// - [`VfsError::NotFound`] if no directory has this identifier
    fn dir_by_id(&self, doc_id: &str) -> Result<DirDoc, VfsError>;

    /// Directory document by absolute path.
    ///
    /// # Errors
    ///
    /// - [`VfsError::NotFound`] if no directory lives at this path
    fn dir_by_path(&self, path: &Path) -> Result<DirDoc, VfsError>;

    /// File document by identifier.
    ///
    /// # Errors
    ///
    /// - [`VfsError::NotFound`] if no file has this identifier
    fn file_by_id(&self, doc_id: &str) -> Result<FileDoc, VfsError>;

    /// File document by absolute path.
    ///
    /// # Errors
    ///
    /// - [`VfsError::NotFound`] if no file lives at this path
    fn file_by_path(&self, path: &Path) -> Result<FileDoc, VfsError>;

    /// Full path of a file, derived from its parent directory's materialized
    /// path joined with the file's name.
    fn file_path(&self, doc: &FileDoc) -> Result<PathBuf, VfsError>;

    /// Node by identifier, kind unknown ahead of lookup.
    ///
    /// # Errors
    ///
    /// - [`VfsError::NotFound`] if no node has this identifier
    fn dir_or_file_by_id(&self, doc_id: &str) -> Result<Node, VfsError>;

    /// Node by absolute path, kind unknown ahead of lookup.
    ///
    /// # Errors
    ///
    /// - [`VfsError::NotFound`] if no node lives at this path
    fn dir_or_file_by_path(&self, path: &Path) -> Result<Node, VfsError>;

    /// Iterator over the children of a directory.
    ///
    /// Order is implementation-defined but stable. Pagination hints in
    /// `opts` are honored by the backend, invisibly to callers.
    fn dir_iterator(&self, doc: &DirDoc, opts: &IteratorOptions) -> Result<DirIter, VfsError>;
}

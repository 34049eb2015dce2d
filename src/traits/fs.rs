//! Binary storage operations.

use std::io::{Read, Seek, Write};

use crate::doc::{DirDoc, FileDoc};
use crate::VfsError;

/// Binary content layer of a VFS.
///
/// An `Fs` holds the actual bytes of files, on local disk, object storage or
/// anything else addressable by document. Destroy operations remove content
/// *and* the corresponding index entries — index and storage mutations are
/// applied as a unit from the caller's point of view, inside the caller's
/// lock scope.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
pub trait Fs: Send + Sync {
    /// Prepare the storage area for first use.
    fn init_fs(&self) -> Result<(), VfsError>;

    /// Tear down the whole storage area of this instance.
    fn delete(&self) -> Result<(), VfsError>;

    /// Create a directory from its document, persisting the document in the
    /// index. The backend assigns `doc`'s identifier and revision.
    fn create_dir(&self, doc: &mut DirDoc) -> Result<(), VfsError>;

    /// Open a stream that creates a new file or replaces the content of an
    /// existing one.
    ///
    /// `newdoc` is the document of the new version; `olddoc` is the current
    /// version when updating (`None` when creating). The backend applies the
    /// metadata change and the content swap as a unit, finalizing size and
    /// checksum when the stream is closed.
    ///
    /// Warning: you **must** call [`FileHandle::close`] and check its error —
    /// nothing written is durable or validated until close succeeds.
    fn create_file(
        &self,
        newdoc: FileDoc,
        olddoc: Option<FileDoc>,
    ) -> Result<Box<dyn FileHandle>, VfsError>;

    /// Destroy every directory and file contained in a directory, leaving the
    /// directory itself in place.
    fn destroy_dir_content(&self, doc: &DirDoc) -> Result<(), VfsError>;

    /// Destroy a directory and everything it contains.
    fn destroy_dir_and_content(&self, doc: &DirDoc) -> Result<(), VfsError>;

    /// Destroy a single file: content and index entry.
    fn destroy_file(&self, doc: &FileDoc) -> Result<(), VfsError>;

    /// Open a file's content for reading.
    fn open_file(&self, doc: &FileDoc) -> Result<Box<dyn FileHandle>, VfsError>;
}

/// An opened file content stream.
///
/// Handles opened for writing buffer or stage content; backends may defer
/// validation (checksum and size finalization, quota re-check) to close time,
/// so a write is not durable until [`close`](Self::close) returns `Ok`.
/// Dropping a handle without closing it discards staged writes.
pub trait FileHandle: Read + Write + Seek + Send {
    /// Finalize the stream.
    ///
    /// For write streams this persists the staged content, fills in the
    /// document's size and checksum, and commits the index mutation.
    ///
    /// # Errors
    ///
    /// Any deferred validation or storage failure surfaces here.
    fn close(self: Box<Self>) -> Result<(), VfsError>;
}

impl std::fmt::Debug for dyn FileHandle + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FileHandle")
    }
}

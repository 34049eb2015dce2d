//! Path-level tree operations.
//!
//! Every operation takes a [`Vfs`] capability and POSIX-style absolute paths,
//! resolves paths to documents through the indexer, and issues mutations
//! through the indexer and binary store. Paths are lexically cleaned
//! (`.`/`..` resolved, slashes collapsed) before any lookup.
//!
//! The engine performs no retries and no local recovery: backend errors
//! surface unchanged, except [`VfsError::NotFound`] where it is the
//! documented branch condition (existence probes, [`mkdir_all`]'s
//! segment-collection loop, [`open_file`]'s create-vs-update split).
//!
//! Locking is the composition's concern, not this module's — see
//! [`Locker`](crate::Locker).

use std::path::{Path, PathBuf};

use chrono::Utc;
use path_clean::PathClean;
use tracing::debug;

use crate::doc::{DirDoc, FileDoc, Node};
use crate::iter::IteratorOptions;
use crate::naming::extract_mime_and_class_from_filename;
use crate::patch::DocPatch;
use crate::traits::{FileHandle, Vfs};
use crate::VfsError;

/// Flags for [`open_file`].
///
/// The open-mode model is deliberately restricted: combined read/write and
/// append modes are invalid, and create requires exclusive-create — there is
/// no silent overwrite through this entry point. Overwriting goes through an
/// explicit update carrying the old document (see
/// [`Fs::create_file`](crate::Fs::create_file)).
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenFlags {
    /// Open for reading.
    pub read: bool,
    /// Open for writing.
    pub write: bool,
    /// Create the file if it does not exist.
    pub create: bool,
    /// Fail if the file already exists (required with `create`).
    pub create_new: bool,
    /// Append to the end of the file (always rejected).
    pub append: bool,
}

impl OpenFlags {
    /// Read-only access.
    pub const READ: Self = Self {
        read: true,
        write: false,
        create: false,
        create_new: false,
        append: false,
    };

    /// Write access with exclusive create.
    pub const CREATE: Self = Self {
        read: false,
        write: true,
        create: true,
        create_new: true,
        append: false,
    };
}

/// Unix-style permission bits for newly created files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions(u32);

impl Permissions {
    /// Create permissions from a Unix mode (e.g. `0o755`).
    pub const fn from_mode(mode: u32) -> Self {
        Self(mode & 0o7777)
    }

    /// Raw mode value.
    pub const fn mode(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the owner-execute bit is set; this is the only bit
    /// the document model keeps (the [`FileDoc::executable`] flag).
    pub const fn executable(&self) -> bool {
        (self.0 & 0o100) != 0
    }

    /// Default permissions for a new file (`0o644`).
    pub const fn default_file() -> Self {
        Self(0o644)
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::default_file()
    }
}

/// Verdict returned by a [`walk`] visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkDecision {
    /// Keep walking.
    Continue,
    /// Do not descend into this directory. Returned for a file node, this is
    /// a no-op.
    SkipDir,
}

fn clean(path: &Path) -> PathBuf {
    path.clean()
}

fn parent_path(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("/"))
}

fn base_name(path: &Path) -> Result<&str, VfsError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| VfsError::IllegalFilename {
            name: path.display().to_string(),
        })
}

fn check_open_flags(flags: OpenFlags) -> Result<(), VfsError> {
    if flags.read && flags.write {
        return Err(VfsError::InvalidOperation {
            reason: "combined read/write open mode is not supported",
        });
    }
    if flags.append {
        return Err(VfsError::InvalidOperation {
            reason: "append open mode is not supported",
        });
    }
    if flags.create && !flags.create_new {
        return Err(VfsError::InvalidOperation {
            reason: "create requires exclusive-create",
        });
    }
    if !flags.read && !flags.write {
        return Err(VfsError::InvalidOperation {
            reason: "open mode must be read or write",
        });
    }
    Ok(())
}

/// Resolve a path to its node, directory or file.
///
/// # Errors
///
/// - [`VfsError::NotFound`] if no node lives at the path
pub fn stat(vfs: &dyn Vfs, name: &Path) -> Result<Node, VfsError> {
    vfs.dir_or_file_by_path(&clean(name))
}

/// Open a file with the given flags and permission bits.
///
/// Read-only opens resolve an existing file and open its content stream.
/// Write opens resolve the existing document (update semantics, the old
/// document rides along for revision continuity) or, with create mode, the
/// parent directory (creation semantics), then build a new file document with
/// MIME and class inferred from the name and zero declared length, and
/// delegate to the backend's create-file operation.
///
/// # Errors
///
/// - [`VfsError::InvalidOperation`] for a disallowed flag combination
/// - [`VfsError::NotFound`] if the file (or, when creating, the parent
///   directory) does not exist
pub fn open_file(
    vfs: &dyn Vfs,
    name: &Path,
    flags: OpenFlags,
    perm: Permissions,
) -> Result<Box<dyn FileHandle>, VfsError> {
    check_open_flags(flags)?;
    let name = clean(name);

    if flags.read {
        let doc = vfs.file_by_path(&name)?;
        return vfs.open_file(&doc);
    }

    let olddoc = match vfs.file_by_path(&name) {
        Ok(doc) => Some(doc),
        Err(err) if err.is_not_found() && flags.create => None,
        Err(err) => return Err(err),
    };

    let dir_id = match &olddoc {
        Some(doc) => doc.dir_id.clone(),
        None => vfs.dir_by_path(parent_path(&name))?.doc_id,
    };

    let filename = base_name(&name)?;
    let (mime, class) = extract_mime_and_class_from_filename(filename);
    let newdoc = FileDoc::new(
        filename,
        &dir_id,
        0,
        Vec::new(),
        &mime,
        &class,
        Utc::now(),
        perm.executable(),
        &[],
    )?;
    vfs.create_file(newdoc, olddoc)
}

/// Create a new file for writing, with default permission bits.
///
/// Sugar for an exclusive-create write-only [`open_file`].
pub fn create(vfs: &dyn Vfs, name: &Path) -> Result<Box<dyn FileHandle>, VfsError> {
    open_file(vfs, name, OpenFlags::CREATE, Permissions::default_file())
}

/// Create a directory.
///
/// # Errors
///
/// - [`VfsError::ParentDoesNotExist`] if the path is the root
/// - [`VfsError::NotFound`] if the parent directory does not exist
pub fn mkdir(vfs: &dyn Vfs, name: &Path, tags: &[String]) -> Result<DirDoc, VfsError> {
    let name = clean(name);
    if name == Path::new("/") {
        return Err(VfsError::ParentDoesNotExist { path: name });
    }

    let dirname = base_name(&name)?;
    let parent = vfs.dir_by_path(parent_path(&name))?;

    let mut dir = DirDoc::new(dirname, &parent, tags)?;
    vfs.create_dir(&mut dir)?;
    Ok(dir)
}

/// Create a directory along with any missing parents, returning the deepest
/// one.
///
/// Walks upward from the target collecting missing segments until an existing
/// ancestor is found, then creates each missing segment top-down, parenting
/// each new directory under the previous one. `tags` apply to the deepest
/// directory only. Idempotent: an existing target is returned as-is.
///
/// # Errors
///
/// Any non-not-found probe error aborts immediately; a missing root
/// propagates the probe's [`VfsError::NotFound`].
pub fn mkdir_all(vfs: &dyn Vfs, name: &Path, tags: &[String]) -> Result<DirDoc, VfsError> {
    let name = clean(name);
    let mut base = name.clone();
    let mut missing: Vec<String> = Vec::new();

    let mut parent = loop {
        match vfs.dir_by_path(&base) {
            Ok(doc) => break doc,
            Err(err) if err.is_not_found() => {
                // ran out of ancestors: even the root is missing
                let Some(segment) = base.file_name().and_then(|s| s.to_str()) else {
                    return Err(err);
                };
                missing.push(segment.to_owned());
                base = parent_path(&base).to_path_buf();
            }
            Err(err) => return Err(err),
        }
    };

    while let Some(segment) = missing.pop() {
        let segment_tags = if missing.is_empty() { tags } else { &[] };
        let mut dir = DirDoc::new(&segment, &parent, segment_tags)?;
        vfs.create_dir(&mut dir)?;
        parent = dir;
    }

    Ok(parent)
}

/// Rename or move a file or directory.
///
/// The patch always carries the new base name, even when unchanged; the
/// parent field is set only when the containing directory actually differs,
/// in which case it carries the new parent directory's identifier.
///
/// # Errors
///
/// - [`VfsError::NotFound`] if the old path, or the new path's containing
///   directory, does not exist
pub fn rename(vfs: &dyn Vfs, oldpath: &Path, newpath: &Path) -> Result<(), VfsError> {
    let oldpath = clean(oldpath);
    let newpath = clean(newpath);

    let node = vfs.dir_or_file_by_path(&oldpath)?;
    let newname = base_name(&newpath)?.to_owned();

    let new_dir_id = if parent_path(&oldpath) != parent_path(&newpath) {
        Some(vfs.dir_by_path(parent_path(&newpath))?.doc_id)
    } else {
        None
    };

    let patch = DocPatch {
        name: Some(newname),
        dir_id: new_dir_id,
        ..Default::default()
    };

    match node {
        Node::Dir(dir) => modify_dir_metadata(vfs, &dir, patch).map(|_| ()),
        Node::File(file) => modify_file_metadata(vfs, &file, patch).map(|_| ()),
    }
}

/// Apply a metadata patch to a directory, producing and persisting the new
/// document.
///
/// The patch is normalized against the current document, applied into a new
/// value, and handed to the indexer as an old/new pair. A parent change
/// recomputes the materialized path under the new parent; the indexer keeps
/// descendant paths consistent.
///
/// # Errors
///
/// - [`VfsError::InvalidOperation`] when targeting the root directory
/// - [`VfsError::IllegalFilename`] / [`VfsError::IllegalTime`] from patch
///   validation
pub fn modify_dir_metadata(
    vfs: &dyn Vfs,
    olddoc: &DirDoc,
    patch: DocPatch,
) -> Result<DirDoc, VfsError> {
    if olddoc.is_root() {
        return Err(VfsError::InvalidOperation {
            reason: "the root directory cannot be modified",
        });
    }

    let patch = patch.normalize(&DocPatch::from_dir(olddoc), olddoc.created_at)?;
    let mut newdoc = olddoc.apply_patch(&patch)?;
    if newdoc.dir_id != olddoc.dir_id {
        let parent = vfs.dir_by_id(&newdoc.dir_id)?;
        newdoc.fullpath = parent.fullpath.join(&newdoc.doc_name);
    }
    vfs.update_dir_doc(olddoc, &mut newdoc)?;
    Ok(newdoc)
}

/// Apply a metadata patch to a file, producing and persisting the new
/// document.
///
/// # Errors
///
/// - [`VfsError::IllegalFilename`] / [`VfsError::IllegalTime`] from patch
///   validation
pub fn modify_file_metadata(
    vfs: &dyn Vfs,
    olddoc: &FileDoc,
    patch: DocPatch,
) -> Result<FileDoc, VfsError> {
    let patch = patch.normalize(&DocPatch::from_file(olddoc), olddoc.created_at)?;
    let mut newdoc = olddoc.apply_patch(&patch)?;
    vfs.update_file_doc(olddoc, &mut newdoc)?;
    Ok(newdoc)
}

/// Returns `true` if the directory has no children.
pub fn dir_is_empty(vfs: &dyn Vfs, doc: &DirDoc) -> Result<bool, VfsError> {
    let mut iter = vfs.dir_iterator(doc, &IteratorOptions::default())?;
    match iter.next() {
        None => Ok(true),
        Some(Ok(_)) => Ok(false),
        Some(Err(err)) => Err(err),
    }
}

/// Remove a file, or an **empty** directory.
///
/// The emptiness check is the safety rule keeping accidental recursive loss
/// out of the simple removal entry point; use [`remove_all`] for recursion.
///
/// # Errors
///
/// - [`VfsError::NotFound`] if no node lives at the path
/// - [`VfsError::DirNotEmpty`] for a populated directory
pub fn remove(vfs: &dyn Vfs, name: &Path) -> Result<(), VfsError> {
    let name = clean(name);
    match vfs.dir_or_file_by_path(&name)? {
        Node::File(file) => {
            debug!(path = %name.display(), "destroying file");
            vfs.destroy_file(&file)
        }
        Node::Dir(dir) => {
            if !dir_is_empty(vfs, &dir)? {
                return Err(VfsError::DirNotEmpty { path: name });
            }
            debug!(path = %name.display(), "destroying empty directory");
            vfs.destroy_dir_and_content(&dir)
        }
    }
}

/// Remove a file, or a directory and its entire content recursively.
///
/// # Errors
///
/// - [`VfsError::NotFound`] if no node lives at the path
pub fn remove_all(vfs: &dyn Vfs, name: &Path) -> Result<(), VfsError> {
    let name = clean(name);
    match vfs.dir_or_file_by_path(&name)? {
        Node::Dir(dir) => {
            debug!(path = %name.display(), "destroying directory recursively");
            vfs.destroy_dir_and_content(&dir)
        }
        Node::File(file) => {
            debug!(path = %name.display(), "destroying file");
            vfs.destroy_file(&file)
        }
    }
}

/// Returns `true` if a node (of either kind) lives at the path.
///
/// Only the not-found condition is translated; any other error propagates.
pub fn exists(vfs: &dyn Vfs, name: &Path) -> Result<bool, VfsError> {
    match vfs.dir_or_file_by_path(&clean(name)) {
        Ok(_) => Ok(true),
        Err(err) if err.is_not_found() => Ok(false),
        Err(err) => Err(err),
    }
}

/// Returns `true` if a directory lives at the path.
///
/// Only the not-found condition is translated; any other error propagates.
pub fn dir_exists(vfs: &dyn Vfs, name: &Path) -> Result<bool, VfsError> {
    match vfs.dir_by_path(&clean(name)) {
        Ok(_) => Ok(true),
        Err(err) if err.is_not_found() => Ok(false),
        Err(err) => Err(err),
    }
}

/// Walk the tree rooted at `root` in pre-order, depth-first.
///
/// The visitor receives each node's full path and either the resolved node or
/// the resolution error (errors are reported, never swallowed — the visitor
/// decides whether to continue). Returning
/// [`WalkDecision::SkipDir`] for a directory suppresses its whole subtree but
/// not its siblings; returning an error aborts the walk and propagates.
///
/// Child paths are the parent path joined with the child's name; children
/// come from the indexer's iterator with default options.
pub fn walk<F>(vfs: &dyn Vfs, root: &Path, visit: &mut F) -> Result<(), VfsError>
where
    F: FnMut(&Path, Result<&Node, &VfsError>) -> Result<WalkDecision, VfsError>,
{
    let root = clean(root);
    match vfs.dir_or_file_by_path(&root) {
        Ok(node) => walk_node(vfs, &root, &node, visit),
        Err(err) => {
            visit(&root, Err(&err))?;
            Ok(())
        }
    }
}

fn walk_node<F>(vfs: &dyn Vfs, path: &Path, node: &Node, visit: &mut F) -> Result<(), VfsError>
where
    F: FnMut(&Path, Result<&Node, &VfsError>) -> Result<WalkDecision, VfsError>,
{
    if visit(path, Ok(node))? == WalkDecision::SkipDir {
        return Ok(());
    }

    let dir = match node {
        Node::Dir(dir) => dir,
        Node::File(_) => return Ok(()),
    };

    let mut iter = match vfs.dir_iterator(dir, &IteratorOptions::default()) {
        Ok(iter) => iter,
        Err(err) => {
            visit(path, Err(&err))?;
            return Ok(());
        }
    };

    while let Some(child) = iter.next() {
        match child {
            Ok(child_node) => {
                let child_path = path.join(child_node.doc_name());
                walk_node(vfs, &child_path, &child_node, visit)?;
            }
            Err(err) => {
                // the listing broke; report it and move on to siblings
                visit(path, Err(&err))?;
                return Ok(());
            }
        }
    }
    Ok(())
}

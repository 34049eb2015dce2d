//! # pathvfs
//!
//! Path-resolution and tree-mutation engine for **index-backed virtual
//! filesystems**.
//!
//! This crate is the core of a multi-tenant personal-storage service: a
//! hierarchical tree of directories and files where binary content lives in
//! one backend (local disk, object storage) and metadata in another (a
//! document database index). It turns POSIX-style path operations — create,
//! rename, move, remove, walk, restore-from-trash — into consistent sequences
//! of index and storage mutations, while staying independent of both concrete
//! backends.
//!
//! It contains the tree algorithms, the document model and the capability
//! contracts — no concrete index or storage implementation.
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Indexer`] | Metadata CRUD/lookup capability, one impl per index backend |
//! | [`Fs`] | Binary content capability, one impl per storage backend |
//! | [`Vfs`] | The composition `Indexer + Fs` the tree engine operates on |
//! | [`Locker`] | Per-instance read/write mutual exclusion |
//! | [`DirDoc`] / [`FileDoc`] | Directory and file documents |
//! | [`Node`] | Tagged sum of the two, for kind-agnostic lookups |
//! | [`DocPatch`] | Sparse mutation request, applied into a *new* document |
//! | [`VfsError`] | Error taxonomy, with `NotFound` as the branchable condition |
//!
//! ## Tree Engine
//!
//! Free functions over `&dyn Vfs`: [`stat`], [`open_file`], [`create`],
//! [`mkdir`], [`mkdir_all`], [`rename`], [`remove`], [`remove_all`],
//! [`exists`], [`dir_exists`], [`walk`], [`modify_dir_metadata`],
//! [`modify_file_metadata`], plus trash handling in [`get_restore_dir`].
//!
//! ```rust
//! use pathvfs::{mkdir_all, walk, Vfs, VfsError, WalkDecision};
//! use std::path::Path;
//!
//! // Works against any backend composition implementing Indexer + Fs.
//! fn set_up_albums(vfs: &dyn Vfs) -> Result<(), VfsError> {
//!     mkdir_all(vfs, Path::new("/photos/2026/summer"), &[])?;
//!     walk(vfs, Path::new("/photos"), &mut |path, node| {
//!         let node = node.map_err(|_| VfsError::Backend("lookup failed".into()))?;
//!         println!("{} {}", if node.is_dir() { "d" } else { "f" }, path.display());
//!         Ok(WalkDecision::Continue)
//!     })
//! }
//! ```
//!
//! ## Invariants
//!
//! The engine maintains, and backends must preserve:
//!
//! - **acyclic parentage** — every node's ancestry chain, followed via parent
//!   identifiers, terminates at the root;
//! - **sibling name uniqueness** — no two children of one directory share a
//!   name, which is what makes path→ID resolution a total function;
//! - **path/ID cross-consistency** — a directory's materialized path is
//!   derived, and must always resolve back to the same identifier.
//!
//! ## Concurrency
//!
//! Operations are synchronous, blocking, and safe to invoke from many workers
//! against one per-tenant [`Vfs`] instance — *provided* the composition wraps
//! them in [`Locker`] scopes: a read guard around multi-step resolutions, a
//! write guard around shape mutations. The engine never locks internally, so
//! its algorithms read as single-threaded code. See [`Locker`].
//!
//! ## Error Handling
//!
//! All operations return `Result<T, VfsError>`. Backend errors propagate
//! verbatim; [`VfsError::NotFound`] is the one condition interpreted locally
//! (existence probes, create-vs-update branching, missing-segment
//! collection). Iterator exhaustion and walk skip-directory are not errors at
//! all — they are `None` and [`WalkDecision::SkipDir`].

// Private modules
mod doc;
mod error;
mod iter;
mod naming;
mod patch;
mod traits;
mod trash;
mod tree;

// Public re-exports - error type
pub use error::VfsError;

// Public re-exports - document model
pub use doc::{DirDoc, DirOrFileDoc, FileDoc, Metadata, Node, DIR_TYPE, FILE_TYPE, ROOT_DIR_ID};
pub use patch::DocPatch;

// Public re-exports - naming utilities
pub use naming::{
    check_file_name, extract_mime_and_class, extract_mime_and_class_from_filename, unique_tags,
    DEFAULT_CONTENT_TYPE, FORBIDDEN_FILENAME_CHARS,
};

// Public re-exports - capability contracts
pub use iter::{DirIter, IteratorOptions};
pub use traits::{FileHandle, Fs, Indexer, LockGuard, Locker, RwLocker, Vfs};

// Public re-exports - tree engine
pub use tree::{
    create, dir_exists, dir_is_empty, exists, mkdir, mkdir_all, modify_dir_metadata,
    modify_file_metadata, open_file, remove, remove_all, rename, stat, walk, OpenFlags,
    Permissions, WalkDecision,
};

// Public re-exports - trash & reserved names
pub use trash::{
    conflict_name, get_restore_dir, is_conflict_name, APPS_DIR_NAME, CONFLICT_SUFFIX,
    KONNECTORS_DIR_NAME, TRASH_DIR_NAME,
};

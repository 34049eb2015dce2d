//! Error types for the pathvfs tree engine.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Error type for every index, storage and tree-engine operation.
///
/// Variants carry the path or name that caused the problem where applicable.
/// Uses `#[non_exhaustive]` for forward compatibility.
///
/// Two conditions that look like errors in other systems are deliberately
/// *not* variants here:
///
/// - iterator exhaustion — [`DirIter`](crate::DirIter) yields `None`;
/// - skip-directory during a walk — [`WalkDecision::SkipDir`](crate::WalkDecision).
///
/// # Examples
///
/// ```rust
/// use pathvfs::VfsError;
/// use std::path::PathBuf;
///
/// let err = VfsError::NotFound { path: PathBuf::from("/missing.txt") };
/// assert!(err.is_not_found());
/// assert_eq!(err.to_string(), "not found: /missing.txt");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum VfsError {
    /// No directory or file document matches the path or identifier.
    ///
    /// This is the one condition the tree engine interprets locally: existence
    /// probes, `mkdir_all`'s missing-segment collection, restore-directory
    /// recreation and `open_file`'s create-vs-update branch all key off it.
    #[error("not found: {path}")]
    NotFound {
        /// The path (or a path-shaped rendering of the identifier) that was
        /// not found.
        path: PathBuf,
    },

    /// The root directory has no parent; `mkdir("/")` is meaningless.
    #[error("parent directory does not exist: {path}")]
    ParentDoesNotExist {
        /// The path whose parent could not exist.
        path: PathBuf,
    },

    /// Non-recursive removal was requested on a populated directory.
    #[error("directory not empty: {path}")]
    DirNotEmpty {
        /// The path to the non-empty directory.
        path: PathBuf,
    },

    /// The file or directory name is empty or contains a forbidden character
    /// (path separator, NUL, CR, LF).
    #[error("illegal filename: {name:?}")]
    IllegalFilename {
        /// The rejected name.
        name: String,
    },

    /// A patch declared an update time strictly before the document's
    /// creation time.
    #[error("illegal time: updated_at {updated_at} precedes created_at {created_at}")]
    IllegalTime {
        /// The update time the patch declared.
        updated_at: DateTime<Utc>,
        /// The document's creation time.
        created_at: DateTime<Utc>,
    },

    /// Restore was requested for a path that does not live under the trash
    /// root.
    #[error("file is not in the trash: {path}")]
    FileNotInTrash {
        /// The path outside the trash.
        path: PathBuf,
    },

    /// A disallowed open-flag combination or an otherwise invalid request.
    #[error("invalid operation: {reason}")]
    InvalidOperation {
        /// What made the request invalid.
        reason: &'static str,
    },

    /// A raw index row carried a type discriminator that is neither a
    /// directory nor a file.
    #[error("unrecognized document type: {kind:?}")]
    UnrecognizedDocType {
        /// The discriminator value found in the row.
        kind: String,
    },

    /// Generic backend (index or storage) error, propagated verbatim.
    #[error("backend error: {0}")]
    Backend(String),

    /// I/O error with context, raised by file content streams.
    #[error("{operation} failed for {path}: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl VfsError {
    /// Returns `true` for the "no node at this path/ID" condition.
    ///
    /// Backends must raise lookup misses as [`VfsError::NotFound`] so that
    /// callers can build existence probes and create-vs-update branches on
    /// top of this classifier.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VfsError::NotFound { .. })
    }
}

impl From<std::io::Error> for VfsError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => VfsError::NotFound {
                path: PathBuf::new(),
            },
            _ => VfsError::Io {
                operation: "io",
                path: PathBuf::new(),
                source: error,
            },
        }
    }
}

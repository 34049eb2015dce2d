//! Document model: the in-memory representation of tree nodes.
//!
//! A node is either a [`DirDoc`] or a [`FileDoc`]; [`Node`] is the tagged sum
//! used whenever the kind is only known after a lookup. [`DirOrFileDoc`] is
//! the flat superset shape document-database backends deserialize raw index
//! rows into, refined into exactly one of the two kinds with
//! [`DirOrFileDoc::refine`].
//!
//! Directory documents carry a materialized `fullpath`; it is derived and not
//! authoritative — the index must always resolve it back to the same
//! identifier. File documents carry no path at all: their location is the
//! parent directory's path joined with their name (see
//! [`Indexer::file_path`](crate::Indexer::file_path)).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::naming::{check_file_name, unique_tags};
use crate::VfsError;

/// Type discriminator value for directory rows.
pub const DIR_TYPE: &str = "directory";

/// Type discriminator value for file rows.
pub const FILE_TYPE: &str = "file";

/// Well-known identifier of the root directory document.
///
/// The root is seeded by the indexer's `init_index`, never created through
/// the tree engine; it is the only directory with an empty parent ID.
pub const ROOT_DIR_ID: &str = "root-dir";

/// Arbitrary extracted metadata attached to a file (EXIF, ID3, ...).
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A directory node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirDoc {
    /// Unique identifier, assigned by the indexer on creation.
    #[serde(rename = "_id", default)]
    pub doc_id: String,
    /// Revision token for optimistic concurrency, assigned by the indexer.
    #[serde(rename = "_rev", default, skip_serializing_if = "String::is_empty")]
    pub doc_rev: String,
    /// Directory name (validated, no separators).
    #[serde(rename = "name")]
    pub doc_name: String,
    /// Identifier of the parent directory; empty only for the root.
    pub dir_id: String,
    /// Restore target, set only while the node lives under the trash root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_path: Option<PathBuf>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Unique, insertion-ordered tag set.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Materialized full path. Derived, not authoritative.
    #[serde(rename = "path")]
    pub fullpath: PathBuf,
}

impl DirDoc {
    /// Build a new directory document parented under `parent`.
    ///
    /// The name is validated, tags are de-duplicated, and the materialized
    /// path is the parent's path joined with the name. The identifier and
    /// revision stay empty until the indexer persists the document.
    ///
    /// # Errors
    ///
    /// - [`VfsError::IllegalFilename`] if the name is empty or contains a
    ///   forbidden character
    pub fn new(name: &str, parent: &DirDoc, tags: &[String]) -> Result<DirDoc, VfsError> {
        check_file_name(name)?;
        let now = Utc::now();
        Ok(DirDoc {
            doc_id: String::new(),
            doc_rev: String::new(),
            doc_name: name.to_owned(),
            dir_id: parent.doc_id.clone(),
            restore_path: None,
            created_at: now,
            updated_at: now,
            tags: unique_tags(tags),
            fullpath: parent.fullpath.join(name),
        })
    }

    /// The root directory document, as seeded by `init_index`.
    pub fn root() -> DirDoc {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        DirDoc {
            doc_id: ROOT_DIR_ID.to_owned(),
            doc_rev: String::new(),
            doc_name: String::new(),
            dir_id: String::new(),
            restore_path: None,
            created_at: epoch,
            updated_at: epoch,
            tags: Vec::new(),
            fullpath: PathBuf::from("/"),
        }
    }

    /// Returns `true` if this is the root directory.
    pub fn is_root(&self) -> bool {
        self.fullpath == Path::new("/")
    }
}

/// A file node.
///
/// The byte size and checksum describe the content currently held by the
/// binary store for this document; backends update them atomically with
/// content writes (at stream close).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDoc {
    /// Unique identifier, assigned by the indexer on creation.
    #[serde(rename = "_id", default)]
    pub doc_id: String,
    /// Revision token for optimistic concurrency, assigned by the indexer.
    #[serde(rename = "_rev", default, skip_serializing_if = "String::is_empty")]
    pub doc_rev: String,
    /// File name (validated, no separators).
    #[serde(rename = "name")]
    pub doc_name: String,
    /// Identifier of the parent directory.
    pub dir_id: String,
    /// Restore target, set only while the node lives under the trash root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_path: Option<PathBuf>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Content length in bytes.
    #[serde(rename = "size", with = "size_as_string")]
    pub byte_size: u64,
    /// Content checksum, finalized by the binary store at stream close.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checksum: Vec<u8>,
    /// MIME type (parameters stripped).
    pub mime: String,
    /// Coarse MIME category (top-level media type).
    pub class: String,
    /// Executable flag.
    #[serde(default)]
    pub executable: bool,
    /// Unique, insertion-ordered tag set.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Arbitrary extracted metadata.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl FileDoc {
    /// Build a new file document parented under the directory with `dir_id`.
    ///
    /// # Errors
    ///
    /// - [`VfsError::IllegalFilename`] if the name is empty or contains a
    ///   forbidden character
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        dir_id: &str,
        byte_size: u64,
        checksum: Vec<u8>,
        mime: &str,
        class: &str,
        cdate: DateTime<Utc>,
        executable: bool,
        tags: &[String],
    ) -> Result<FileDoc, VfsError> {
        check_file_name(name)?;
        Ok(FileDoc {
            doc_id: String::new(),
            doc_rev: String::new(),
            doc_name: name.to_owned(),
            dir_id: dir_id.to_owned(),
            restore_path: None,
            created_at: cdate,
            updated_at: cdate,
            byte_size,
            checksum,
            mime: mime.to_owned(),
            class: class.to_owned(),
            executable,
            tags: unique_tags(tags),
            metadata: Metadata::new(),
        })
    }
}

/// A tree node whose kind was not known ahead of lookup.
///
/// Exactly one payload, discriminated by the variant — no string tags, no
/// half-filled superset struct.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A directory node.
    Dir(DirDoc),
    /// A file node.
    File(FileDoc),
}

impl Node {
    /// The node's identifier.
    pub fn doc_id(&self) -> &str {
        match self {
            Node::Dir(d) => &d.doc_id,
            Node::File(f) => &f.doc_id,
        }
    }

    /// The node's name.
    pub fn doc_name(&self) -> &str {
        match self {
            Node::Dir(d) => &d.doc_name,
            Node::File(f) => &f.doc_name,
        }
    }

    /// Identifier of the node's parent directory.
    pub fn dir_id(&self) -> &str {
        match self {
            Node::Dir(d) => &d.dir_id,
            Node::File(f) => &f.dir_id,
        }
    }

    /// Returns `true` for directory nodes.
    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Dir(_))
    }

    /// Borrow the directory document, if this is a directory.
    pub fn as_dir(&self) -> Option<&DirDoc> {
        match self {
            Node::Dir(d) => Some(d),
            Node::File(_) => None,
        }
    }

    /// Borrow the file document, if this is a file.
    pub fn as_file(&self) -> Option<&FileDoc> {
        match self {
            Node::Dir(_) => None,
            Node::File(f) => Some(f),
        }
    }

    /// Consume into the directory document, if this is a directory.
    pub fn into_dir(self) -> Option<DirDoc> {
        match self {
            Node::Dir(d) => Some(d),
            Node::File(_) => None,
        }
    }

    /// Consume into the file document, if this is a file.
    pub fn into_file(self) -> Option<FileDoc> {
        match self {
            Node::Dir(_) => None,
            Node::File(f) => Some(f),
        }
    }
}

/// Flat superset of [`DirDoc`] and [`FileDoc`] with a string discriminator.
///
/// Document-database backends deserialize raw index rows into this shape when
/// the kind is not known ahead of the query, then call [`refine`](Self::refine)
/// to obtain a [`Node`]. File-only fields are defaulted on directory rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirOrFileDoc {
    /// Kind discriminator: [`DIR_TYPE`] or [`FILE_TYPE`].
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Unique identifier.
    #[serde(rename = "_id", default)]
    pub doc_id: String,
    /// Revision token.
    #[serde(rename = "_rev", default, skip_serializing_if = "String::is_empty")]
    pub doc_rev: String,
    /// Node name.
    #[serde(rename = "name")]
    pub doc_name: String,
    /// Parent directory identifier.
    pub dir_id: String,
    /// Restore target while trashed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_path: Option<PathBuf>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Tag set.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Materialized path; present only on directory rows.
    #[serde(rename = "path", default, skip_serializing_if = "Option::is_none")]
    pub fullpath: Option<PathBuf>,
    /// Content length; meaningful only on file rows.
    #[serde(
        rename = "size",
        default,
        with = "opt_size_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub byte_size: Option<u64>,
    /// Content checksum; meaningful only on file rows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checksum: Vec<u8>,
    /// MIME type; meaningful only on file rows.
    #[serde(default)]
    pub mime: String,
    /// Coarse MIME category; meaningful only on file rows.
    #[serde(default)]
    pub class: String,
    /// Executable flag; meaningful only on file rows.
    #[serde(default)]
    pub executable: bool,
    /// Arbitrary extracted metadata; meaningful only on file rows.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl DirOrFileDoc {
    /// Refine the flat shape into exactly one node kind.
    ///
    /// # Errors
    ///
    /// - [`VfsError::UnrecognizedDocType`] if the discriminator is neither
    ///   [`DIR_TYPE`] nor [`FILE_TYPE`]
    pub fn refine(self) -> Result<Node, VfsError> {
        match self.doc_type.as_str() {
            DIR_TYPE => Ok(Node::Dir(DirDoc {
                doc_id: self.doc_id,
                doc_rev: self.doc_rev,
                doc_name: self.doc_name,
                dir_id: self.dir_id,
                restore_path: self.restore_path,
                created_at: self.created_at,
                updated_at: self.updated_at,
                tags: self.tags,
                fullpath: self.fullpath.unwrap_or_default(),
            })),
            FILE_TYPE => Ok(Node::File(FileDoc {
                doc_id: self.doc_id,
                doc_rev: self.doc_rev,
                doc_name: self.doc_name,
                dir_id: self.dir_id,
                restore_path: self.restore_path,
                created_at: self.created_at,
                updated_at: self.updated_at,
                byte_size: self.byte_size.unwrap_or(0),
                checksum: self.checksum,
                mime: self.mime,
                class: self.class,
                executable: self.executable,
                tags: self.tags,
                metadata: self.metadata,
            })),
            _ => Err(VfsError::UnrecognizedDocType {
                kind: self.doc_type,
            }),
        }
    }
}

/// Document databases store 64-bit sizes as strings to survive JSON number
/// precision limits.
mod size_as_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(size: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&size.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

mod opt_size_as_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(size: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        match size {
            Some(size) => serializer.serialize_str(&size.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?;
        match s {
            Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

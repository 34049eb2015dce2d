//! Sparse document patches.
//!
//! A [`DocPatch`] is a set of optional overrides describing a requested
//! mutation; unset fields mean "leave unchanged". Patches are normalized
//! against the current document (every unset field filled in) and then
//! applied, producing a **new** document value. The current document is never
//! mutated in place — the old/new pairing is what lets index backends
//! implement copy-on-write or revisioned storage.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::doc::{DirDoc, FileDoc};
use crate::naming::{check_file_name, unique_tags};
use crate::VfsError;

/// Modifiable fields of file and directory documents.
///
/// `restore_path` is doubly optional: `None` leaves it unchanged,
/// `Some(None)` clears it, `Some(Some(path))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocPatch {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New parent directory identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir_id: Option<String>,
    /// New restore path (outer `Some` to touch it, inner `None` to clear).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_path: Option<Option<PathBuf>>,
    /// New tag set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// New update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// New executable flag (files only; ignored for directories).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<bool>,
}

impl DocPatch {
    /// Patch view of a directory document: every field present.
    pub fn from_dir(doc: &DirDoc) -> DocPatch {
        DocPatch {
            name: Some(doc.doc_name.clone()),
            dir_id: Some(doc.dir_id.clone()),
            restore_path: Some(doc.restore_path.clone()),
            tags: Some(doc.tags.clone()),
            updated_at: Some(doc.updated_at),
            executable: Some(false),
        }
    }

    /// Patch view of a file document: every field present.
    pub fn from_file(doc: &FileDoc) -> DocPatch {
        DocPatch {
            name: Some(doc.doc_name.clone()),
            dir_id: Some(doc.dir_id.clone()),
            restore_path: Some(doc.restore_path.clone()),
            tags: Some(doc.tags.clone()),
            updated_at: Some(doc.updated_at),
            executable: Some(doc.executable),
        }
    }

    /// Fill every unset field from `current` and validate the update time.
    ///
    /// `current` is the patch view of the document being mutated (see
    /// [`from_dir`](Self::from_dir) / [`from_file`](Self::from_file));
    /// `created_at` is that document's creation time. The returned patch has
    /// every field set.
    ///
    /// # Errors
    ///
    /// - [`VfsError::IllegalTime`] if the resulting update time is strictly
    ///   before `created_at`
    pub fn normalize(
        mut self,
        current: &DocPatch,
        created_at: DateTime<Utc>,
    ) -> Result<DocPatch, VfsError> {
        if self.dir_id.is_none() {
            self.dir_id = current.dir_id.clone();
        }
        if self.restore_path.is_none() {
            self.restore_path = current.restore_path.clone();
        }
        if self.name.is_none() {
            self.name = current.name.clone();
        }
        if self.tags.is_none() {
            self.tags = current.tags.clone();
        }
        if self.updated_at.is_none() {
            self.updated_at = current.updated_at;
        }
        if let Some(updated_at) = self.updated_at {
            if updated_at < created_at {
                return Err(VfsError::IllegalTime {
                    updated_at,
                    created_at,
                });
            }
        }
        if self.executable.is_none() {
            self.executable = current.executable;
        }
        Ok(self)
    }
}

impl DirDoc {
    /// Apply a normalized patch, producing a new directory document.
    ///
    /// Fields the patch leaves unset fall back to the current values. A name
    /// change also renames the final segment of the materialized path; a
    /// parent change leaves the path to be recomputed by the caller, which is
    /// the only place the new parent's path is known.
    ///
    /// # Errors
    ///
    /// - [`VfsError::IllegalFilename`] if the patched name is invalid
    pub fn apply_patch(&self, patch: &DocPatch) -> Result<DirDoc, VfsError> {
        let name = patch.name.clone().unwrap_or_else(|| self.doc_name.clone());
        check_file_name(&name)?;
        let mut fullpath = self.fullpath.clone();
        fullpath.set_file_name(&name);
        Ok(DirDoc {
            doc_id: self.doc_id.clone(),
            doc_rev: self.doc_rev.clone(),
            doc_name: name,
            dir_id: patch.dir_id.clone().unwrap_or_else(|| self.dir_id.clone()),
            restore_path: patch
                .restore_path
                .clone()
                .unwrap_or_else(|| self.restore_path.clone()),
            created_at: self.created_at,
            updated_at: patch.updated_at.unwrap_or(self.updated_at),
            tags: patch
                .tags
                .as_deref()
                .map(unique_tags)
                .unwrap_or_else(|| self.tags.clone()),
            fullpath,
        })
    }
}

impl FileDoc {
    /// Apply a normalized patch, producing a new file document.
    ///
    /// Content-describing fields (size, checksum, MIME, class, metadata) are
    /// carried over unchanged; patches only touch naming, parentage, tags,
    /// times and the executable flag.
    ///
    /// # Errors
    ///
    /// - [`VfsError::IllegalFilename`] if the patched name is invalid
    pub fn apply_patch(&self, patch: &DocPatch) -> Result<FileDoc, VfsError> {
        let name = patch.name.clone().unwrap_or_else(|| self.doc_name.clone());
        check_file_name(&name)?;
        Ok(FileDoc {
            doc_id: self.doc_id.clone(),
            doc_rev: self.doc_rev.clone(),
            doc_name: name,
            dir_id: patch.dir_id.clone().unwrap_or_else(|| self.dir_id.clone()),
            restore_path: patch
                .restore_path
                .clone()
                .unwrap_or_else(|| self.restore_path.clone()),
            created_at: self.created_at,
            updated_at: patch.updated_at.unwrap_or(self.updated_at),
            byte_size: self.byte_size,
            checksum: self.checksum.clone(),
            mime: self.mime.clone(),
            class: self.class.clone(),
            executable: patch.executable.unwrap_or(self.executable),
            tags: patch
                .tags
                .as_deref()
                .map(unique_tags)
                .unwrap_or_else(|| self.tags.clone()),
            metadata: self.metadata.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn dir_under_root(name: &str) -> DirDoc {
        let mut dir = DirDoc::new(name, &DirDoc::root(), &[]).unwrap();
        dir.doc_id = format!("dir-{name}");
        dir
    }

    #[test]
    fn normalize_fills_unset_fields() {
        let dir = dir_under_root("docs");
        let current = DocPatch::from_dir(&dir);
        let patch = DocPatch {
            name: Some("archive".into()),
            ..Default::default()
        };
        let normalized = patch.normalize(&current, dir.created_at).unwrap();
        assert_eq!(normalized.name.as_deref(), Some("archive"));
        assert_eq!(normalized.dir_id.as_deref(), Some(dir.dir_id.as_str()));
        assert_eq!(normalized.updated_at, Some(dir.updated_at));
        assert_eq!(normalized.tags, Some(dir.tags.clone()));
        assert_eq!(normalized.restore_path, Some(None));
    }

    #[test]
    fn normalize_rejects_update_before_creation() {
        let dir = dir_under_root("docs");
        let current = DocPatch::from_dir(&dir);
        let patch = DocPatch {
            updated_at: Some(dir.created_at - TimeDelta::seconds(1)),
            ..Default::default()
        };
        let err = patch.normalize(&current, dir.created_at).unwrap_err();
        assert!(matches!(err, VfsError::IllegalTime { .. }));
    }

    #[test]
    fn normalize_accepts_update_equal_to_creation() {
        let dir = dir_under_root("docs");
        let current = DocPatch::from_dir(&dir);
        let patch = DocPatch {
            updated_at: Some(dir.created_at),
            ..Default::default()
        };
        assert!(patch.normalize(&current, dir.created_at).is_ok());
    }

    #[test]
    fn apply_patch_produces_new_dir_doc() {
        let dir = dir_under_root("docs");
        let patch = DocPatch {
            name: Some("archive".into()),
            ..Default::default()
        };
        let renamed = dir.apply_patch(&patch).unwrap();
        assert_eq!(renamed.doc_name, "archive");
        assert_eq!(renamed.fullpath, PathBuf::from("/archive"));
        assert_eq!(renamed.doc_id, dir.doc_id);
        // the original is untouched
        assert_eq!(dir.doc_name, "docs");
    }

    #[test]
    fn apply_patch_rejects_illegal_name() {
        let dir = dir_under_root("docs");
        let patch = DocPatch {
            name: Some("a/b".into()),
            ..Default::default()
        };
        assert!(dir.apply_patch(&patch).is_err());
    }

    #[test]
    fn apply_patch_clears_restore_path() {
        let mut file = FileDoc::new(
            "f.txt",
            "dir-1",
            0,
            vec![],
            "text/plain",
            "text",
            Utc::now(),
            false,
            &[],
        )
        .unwrap();
        file.restore_path = Some(PathBuf::from("/Documents"));
        let patch = DocPatch {
            restore_path: Some(None),
            ..Default::default()
        };
        let restored = file.apply_patch(&patch).unwrap();
        assert_eq!(restored.restore_path, None);
    }

    #[test]
    fn apply_patch_dedups_tags() {
        let dir = dir_under_root("docs");
        let patch = DocPatch {
            tags: Some(vec![" a".into(), "a".into(), "".into(), "b ".into()]),
            ..Default::default()
        };
        let patched = dir.apply_patch(&patch).unwrap();
        assert_eq!(patched.tags, vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn apply_patch_keeps_file_content_fields() {
        let file = FileDoc::new(
            "f.bin",
            "dir-1",
            512,
            vec![9, 9],
            "application/octet-stream",
            "application",
            Utc::now(),
            false,
            &[],
        )
        .unwrap();
        let patch = DocPatch {
            name: Some("g.bin".into()),
            executable: Some(true),
            ..Default::default()
        };
        let patched = file.apply_patch(&patch).unwrap();
        assert_eq!(patched.byte_size, 512);
        assert_eq!(patched.checksum, vec![9, 9]);
        assert!(patched.executable);
    }
}

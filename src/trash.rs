//! Trash-restore resolution, reserved paths and the conflict-name marker.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use tracing::warn;

use crate::doc::DirDoc;
use crate::traits::Vfs;
use crate::tree::mkdir_all;
use crate::VfsError;

/// Path of the trash directory.
///
/// The trash is not a separate structure: it is the subtree rooted here, with
/// engine-recognized restore semantics.
pub const TRASH_DIR_NAME: &str = "/.cozy_trash";

/// Path of the directory in which applications are stored.
pub const APPS_DIR_NAME: &str = "/.cozy_apps";

/// Path of the directory in which konnector sources are stored.
pub const KONNECTORS_DIR_NAME: &str = "/.cozy_konnectors";

/// In-name marker denoting a machine-generated disambiguated name.
///
/// The engine defines the format; what triggers conflict generation is a
/// backend/caller concern.
pub const CONFLICT_SUFFIX: &str = " (__cozy__: ";

/// Format a disambiguated name for `name`, tagged with `token` (typically a
/// revision or timestamp).
pub fn conflict_name(name: &str, token: &str) -> String {
    format!("{name}{CONFLICT_SUFFIX}{token})")
}

/// Returns `true` if `name` carries the conflict marker.
pub fn is_conflict_name(name: &str) -> bool {
    name.contains(CONFLICT_SUFFIX)
}

/// Resolve the directory a trashed node should be restored into.
///
/// `name` must live under the trash root. When no explicit `restore_path` is
/// supplied, it is derived from the trashed subtree's root: nodes trashed
/// together carry a stored restore path only on the subtree root, so for
/// `/.cozy_trash/foo/bar/baz` the target is the root's stored restore path
/// joined with `foo` and the directory part of the remainder (`bar`). A
/// missing target hierarchy is recreated in full before restoration
/// proceeds.
///
/// # Errors
///
/// - [`VfsError::FileNotInTrash`] if `name` is outside the trash root
/// - any index error from resolution or recreation, verbatim
pub fn get_restore_dir(
    vfs: &dyn Vfs,
    name: &Path,
    restore_path: Option<&Path>,
) -> Result<DirDoc, VfsError> {
    let Ok(in_trash) = name.strip_prefix(TRASH_DIR_NAME) else {
        return Err(VfsError::FileNotInTrash {
            path: name.to_path_buf(),
        });
    };

    // A node more than one level below the trash root belongs to a hierarchy
    // that was trashed as a whole; the subtree root at the top of the trash
    // carries the stored restore path for all of it.
    let mut restore_path = restore_path.map(Path::to_path_buf);
    if restore_path.is_none() {
        let mut components = in_trash.components();
        if let Some(root) = components.next() {
            let rest = components.as_path();
            if !rest.as_os_str().is_empty() {
                let root_doc = vfs.dir_by_path(&Path::new(TRASH_DIR_NAME).join(root))?;
                if let Some(stored) = &root_doc.restore_path {
                    let rest_dir = rest.parent().unwrap_or_else(|| Path::new(""));
                    restore_path = Some(stored.join(&root_doc.doc_name).join(rest_dir));
                }
            }
        }
    }

    // Nothing to derive from: restore at the filesystem root. Not expected in
    // practice, so make it visible.
    let restore_path = restore_path
        .map(|path| path.clean())
        .unwrap_or_else(|| {
            warn!(
                trashed = %name.display(),
                "no restore path could be derived, falling back to /"
            );
            PathBuf::from("/")
        });

    match vfs.dir_by_path(&restore_path) {
        Ok(dir) => Ok(dir),
        Err(err) if err.is_not_found() => mkdir_all(vfs, &restore_path, &[]),
        Err(err) => Err(err),
    }
}

//! Filename validation, MIME/class extraction and tag de-duplication.
//!
//! Pure, deterministic helpers with no state. Every create/rename path in the
//! tree engine funnels names through [`check_file_name`] before anything is
//! persisted.

use std::path::Path;

use crate::VfsError;

/// Content type substituted for files uploaded without one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Characters that may not appear in a file or directory name.
pub const FORBIDDEN_FILENAME_CHARS: [char; 4] = ['/', '\0', '\n', '\r'];

/// Validate a file or directory name.
///
/// # Errors
///
/// - [`VfsError::IllegalFilename`] if the name is empty or contains a path
///   separator, NUL, CR or LF.
pub fn check_file_name(name: &str) -> Result<(), VfsError> {
    if name.is_empty() || name.contains(FORBIDDEN_FILENAME_CHARS) {
        return Err(VfsError::IllegalFilename {
            name: name.to_owned(),
        });
    }
    Ok(())
}

/// Split a content type into a MIME value and a coarse class.
///
/// The MIME is the content type with its parameters stripped (everything
/// before the first `;`); the class is the top-level media type (everything
/// before the first `/`). An empty content type falls back to
/// [`DEFAULT_CONTENT_TYPE`]. No charset parsing happens beyond this split.
///
/// ```rust
/// use pathvfs::extract_mime_and_class;
///
/// let (mime, class) = extract_mime_and_class("text/plain; charset=utf-8");
/// assert_eq!(mime, "text/plain");
/// assert_eq!(class, "text");
/// ```
pub fn extract_mime_and_class(content_type: &str) -> (String, String) {
    let content_type = if content_type.is_empty() {
        DEFAULT_CONTENT_TYPE
    } else {
        content_type
    };

    let mime = match content_type.find(';') {
        Some(idx) => &content_type[..idx],
        None => content_type,
    };

    let class = match content_type.find('/') {
        Some(idx) => &content_type[..idx],
        None => content_type,
    };

    (mime.to_owned(), class.to_owned())
}

/// Derive MIME and class from a filename's extension.
///
/// Looks the extension up in the `mime_guess` table, then delegates to
/// [`extract_mime_and_class`]. Unknown extensions yield the octet-stream
/// default.
pub fn extract_mime_and_class_from_filename(name: &str) -> (String, String) {
    let guess = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| mime_guess::from_ext(ext).first());
    match guess {
        Some(mime) => extract_mime_and_class(mime.essence_str()),
        None => extract_mime_and_class(""),
    }
}

/// Normalize a tag list: trim whitespace, drop empties, remove duplicates,
/// preserve first-seen order.
pub fn unique_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() {
            continue;
        }
        if seen.insert(tag.to_owned()) {
            out.push(tag.to_owned());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_file_name_rejects_forbidden() {
        assert!(check_file_name("").is_err());
        assert!(check_file_name("a/b").is_err());
        assert!(check_file_name("a\x00b").is_err());
        assert!(check_file_name("a\nb").is_err());
        assert!(check_file_name("a\rb").is_err());
    }

    #[test]
    fn check_file_name_accepts_normal_names() {
        assert!(check_file_name("normal-name.txt").is_ok());
        assert!(check_file_name("with spaces and émojis 🎉").is_ok());
        assert!(check_file_name(".hidden").is_ok());
    }

    #[test]
    fn extract_mime_strips_parameters() {
        let (mime, class) = extract_mime_and_class("text/plain; charset=utf-8");
        assert_eq!(mime, "text/plain");
        assert_eq!(class, "text");
    }

    #[test]
    fn extract_mime_empty_defaults_to_octet_stream() {
        let (mime, class) = extract_mime_and_class("");
        assert_eq!(mime, DEFAULT_CONTENT_TYPE);
        assert_eq!(class, "application");
    }

    #[test]
    fn extract_mime_without_slash_uses_whole_value() {
        let (mime, class) = extract_mime_and_class("weird");
        assert_eq!(mime, "weird");
        assert_eq!(class, "weird");
    }

    #[test]
    fn extract_from_filename_known_extension() {
        let (mime, class) = extract_mime_and_class_from_filename("report.txt");
        assert_eq!(mime, "text/plain");
        assert_eq!(class, "text");

        let (mime, class) = extract_mime_and_class_from_filename("photo.png");
        assert_eq!(mime, "image/png");
        assert_eq!(class, "image");
    }

    #[test]
    fn extract_from_filename_unknown_extension() {
        let (mime, class) = extract_mime_and_class_from_filename("blob.zzzz");
        assert_eq!(mime, DEFAULT_CONTENT_TYPE);
        assert_eq!(class, "application");
    }

    #[test]
    fn unique_tags_trims_dedups_and_keeps_order() {
        let tags = [" a", "a", "", "b "];
        assert_eq!(unique_tags(&tags), vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn unique_tags_empty_input() {
        let tags: [&str; 0] = [];
        assert!(unique_tags(&tags).is_empty());
    }
}

//! Directory-children iteration.

use crate::doc::Node;
use crate::VfsError;

/// Options for a directory iterator.
///
/// Backends use these to implement cursor-based pagination transparently to
/// the walker: resume after a given child identifier, fetch in batches of a
/// given size.
#[derive(Debug, Clone, Default)]
pub struct IteratorOptions {
    /// Resume iteration after the child with this identifier.
    pub after_id: Option<String>,
    /// Fetch children from the index in batches of this size.
    pub by_fetch: Option<usize>,
}

/// Iterator over the children of a directory.
///
/// Yields one [`Node`] per child in an implementation-defined but stable
/// order. Exhaustion is `None` — normal loop termination, never a failure;
/// a `Some(Err(_))` item is a real index error.
///
/// Wraps a boxed iterator so backends can stream lazily (batched index
/// queries) or serve a pre-collected listing.
///
/// # Example
///
/// ```rust,ignore
/// let mut iter = vfs.dir_iterator(&dir, &IteratorOptions::default())?;
/// while let Some(child) = iter.next() {
///     let child = child?;
///     println!("{}", child.doc_name());
/// }
/// ```
pub struct DirIter(Box<dyn Iterator<Item = Result<Node, VfsError>> + Send + 'static>);

impl DirIter {
    /// Create from any compatible iterator.
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Result<Node, VfsError>> + Send + 'static,
    {
        Self(Box::new(iter))
    }

    /// Create from a pre-collected child listing.
    pub fn from_vec(children: Vec<Result<Node, VfsError>>) -> Self {
        Self(Box::new(children.into_iter()))
    }

    /// Collect all children, short-circuiting on the first error.
    pub fn collect_all(self) -> Result<Vec<Node>, VfsError> {
        self.collect()
    }
}

impl Iterator for DirIter {
    type Item = Result<Node, VfsError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

//! # Capability traits
//!
//! The contracts backends implement to plug into the tree engine.
//!
//! | Trait | Responsibility |
//! |-------|----------------|
//! | [`Indexer`] | CRUD and lookup of directory/file metadata, children iteration |
//! | [`Fs`] | Binary content: create/open streams, destroy content |
//! | [`FileHandle`] | An opened content stream (read, write, seek, explicit close) |
//! | [`Locker`] | Per-instance read/write mutual exclusion |
//! | [`Vfs`] | The composition `Indexer + Fs` the tree engine operates on |
//!
//! One [`Vfs`] instance serves one tenant; instances are fully isolated.
//! Concrete backends (document-database indexer, local-disk or object-storage
//! binary store) each provide one implementation, selected at instance
//! construction time.
//!
//! ## Blanket implementation
//!
//! [`Vfs`] has a blanket implementation: implement [`Indexer`] and [`Fs`] and
//! the composite comes for free.
//!
//! ```rust,ignore
//! fn serve(vfs: &dyn Vfs) -> Result<(), VfsError> {
//!     let dir = pathvfs::mkdir(vfs, Path::new("/photos"), &[])?;
//!     // ...
//! }
//! ```
//!
//! ## Thread safety
//!
//! All traits require `Send + Sync` and take `&self`; backends use interior
//! mutability. The tree engine itself never acquires locks — compositions
//! wrap Indexer/Fs calls in [`Locker`] scopes so the path-level algorithms
//! can be written as if single-threaded (see the crate docs).

mod fs;
mod indexer;
mod locker;

pub use fs::{FileHandle, Fs};
pub use indexer::Indexer;
pub use locker::{Locker, LockGuard, RwLocker};

/// The composed capability surface the tree engine operates on.
///
/// One instance per tenant. Backends never implement this directly — the
/// blanket implementation covers any `Indexer + Fs`.
pub trait Vfs: Indexer + Fs {}

impl<T: Indexer + Fs + ?Sized> Vfs for T {}

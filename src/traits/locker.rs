//! Read/write mutual exclusion, scoped to one VFS instance.

use parking_lot::RwLock;

/// Read/write mutual exclusion for one VFS instance.
///
/// Path resolution is multi-step (parent lookup, then child lookup, then
/// possibly further ancestor walks), so an unguarded concurrent rename could
/// leave a resolution observing a stale or dangling parent. The contract:
///
/// - acquire [`read`](Self::read) around any sequence of lookups that must
///   observe a consistent snapshot of the tree (e.g. a whole walk);
/// - acquire [`write`](Self::write) around any mutation that changes tree
///   shape or reassigns a parent.
///
/// Guards release on drop, on every exit path including error returns. The
/// tree engine itself never locks — backend compositions wrap calls, which is
/// what lets the path-level algorithms read as single-threaded code.
///
/// Lockers are per-instance, never process-global: tenants are isolated.
pub trait Locker: Send + Sync {
    /// Acquire a shared (reader) guard, blocking while a writer is active.
    fn read(&self) -> LockGuard<'_>;

    /// Acquire an exclusive (writer) guard, blocking until all readers and
    /// writers have released.
    fn write(&self) -> LockGuard<'_>;
}

/// RAII guard returned by [`Locker`]; the lock is held until drop.
///
/// Type-erased so that `Locker` stays object-safe regardless of the guard
/// type the backing lock produces.
pub struct LockGuard<'a> {
    _token: Box<dyn GuardToken + 'a>,
}

impl<'a> LockGuard<'a> {
    /// Wrap any guard value; it is dropped (releasing the lock) when this
    /// guard is dropped.
    pub fn new<G: 'a>(guard: G) -> Self {
        Self {
            _token: Box::new(guard),
        }
    }
}

trait GuardToken {}
impl<G> GuardToken for G {}

/// In-process [`Locker`] backed by a `parking_lot` read/write lock.
///
/// The default choice when index and storage live in the same process; a
/// distributed deployment would substitute a lease-based implementation.
#[derive(Default)]
pub struct RwLocker {
    inner: RwLock<()>,
}

impl RwLocker {
    /// Create an unlocked locker.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Locker for RwLocker {
    fn read(&self) -> LockGuard<'_> {
        LockGuard::new(self.inner.read())
    }

    fn write(&self) -> LockGuard<'_> {
        LockGuard::new(self.inner.write())
    }
}

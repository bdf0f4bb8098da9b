//! `SnapshotHandle<T>`: a shared reference to an immutable value that can be
//! replaced wholesale at runtime.
//!
//! Readers call [`SnapshotHandle::current`] and keep the returned `Arc<T>` for
//! as long as they need a consistent view; a later swap never affects them.
//! Writers go through [`SnapshotHandle::install_with`], which is serialised
//! by a dedicated mutex so that validation and swap happen as one step.
//!
//! | Operation | Locking |
//! |-----------|---------|
//! | `current` | brief read lock, clones the `Arc` |
//! | `install_with` | install mutex for the whole call, write lock only for the swap |

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::errors::Result;

/// What happened during an [`SnapshotHandle::install_with`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swap {
    /// The snapshot was replaced.
    Replaced,
    /// The closure decided the current snapshot is already up to date.
    Kept,
}

/// A shared, replaceable reference to an immutable snapshot of type `T`.
///
/// Cloning the handle is cheap; all clones observe the same snapshot.
pub struct SnapshotHandle<T> {
    current: Arc<RwLock<Arc<T>>>,
    install_lock: Arc<Mutex<()>>,
}

impl<T> Clone for SnapshotHandle<T> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
            install_lock: Arc::clone(&self.install_lock),
        }
    }
}

impl<T> SnapshotHandle<T> {
    /// Create a handle whose first snapshot is `value`.
    pub fn new(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Create a handle from an existing `Arc`.
    pub fn from_arc(arc: Arc<T>) -> Self {
        Self {
            current: Arc::new(RwLock::new(arc)),
            install_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Return the snapshot that is current right now.
    pub fn current(&self) -> Arc<T> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Run `decide` against the current snapshot and install whatever it
    /// returns.
    ///
    /// `decide` returns `Ok(Some(new))` to swap, `Ok(None)` to keep the
    /// current snapshot, or an error to reject the install.  At most one
    /// `install_with` runs at a time; readers are never blocked by `decide`.
    pub fn install_with<F>(&self, decide: F) -> Result<Swap>
    where
        F: FnOnce(&T) -> Result<Option<Arc<T>>>,
    {
        let _serial = self
            .install_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let current = self.current();
        match decide(&current)? {
            Some(next) => {
                let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
                *guard = next;
                Ok(Swap::Replaced)
            }
            None => Ok(Swap::Kept),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SnapshotHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SnapshotHandle({:?})", self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn readers_keep_their_snapshot() {
        let handle = SnapshotHandle::new(1);
        let before = handle.current();
        let swap = handle
            .install_with(|_| Ok(Some(Arc::new(2))))
            .unwrap();
        assert_eq!(swap, Swap::Replaced);
        assert_eq!(*before, 1);
        assert_eq!(*handle.current(), 2);
    }

    #[test]
    fn clones_share_the_slot() {
        let a = SnapshotHandle::new("old");
        let b = a.clone();
        a.install_with(|_| Ok(Some(Arc::new("new")))).unwrap();
        assert_eq!(*b.current(), "new");
    }

    #[test]
    fn rejected_install_leaves_snapshot() {
        let handle = SnapshotHandle::new(10);
        let err = handle
            .install_with(|cur| Err(Error::Precondition(format!("keep {cur}"))))
            .unwrap_err();
        assert_eq!(err, Error::Precondition("keep 10".into()));
        assert_eq!(*handle.current(), 10);
    }

    #[test]
    fn keep_is_reported() {
        let handle = SnapshotHandle::new(5);
        assert_eq!(handle.install_with(|_| Ok(None)).unwrap(), Swap::Kept);
        assert_eq!(*handle.current(), 5);
    }

    #[test]
    fn concurrent_installs_are_serialised() {
        let handle = SnapshotHandle::new(0u32);
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let h = handle.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        h.install_with(|cur| Ok(Some(Arc::new(cur + 1)))).unwrap();
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(*handle.current(), 800);
    }
}

//! Single-writer checks.
//!
//! A list source is updated from the thread that drives the UI loop.
//! [`ThreadAffinity`] remembers that thread when the source is created and
//! lets `set_data`-style entry points verify it.
//!
//! ```
//! use listbind_core::ThreadAffinity;
//!
//! let owner = ThreadAffinity::current();
//! assert!(owner.is_owner());
//!
//! let elsewhere = std::thread::spawn(move || owner.is_owner()).join().unwrap();
//! assert!(!elsewhere);
//! ```

use std::fmt;
use std::thread::{self, ThreadId};

/// The thread allowed to mutate a component.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    owner: ThreadId,
}

impl ThreadAffinity {
    /// Binds to the calling thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            owner: thread::current().id(),
        }
    }

    /// The owner thread.
    #[inline]
    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    /// Returns `true` when called from the owner thread.
    #[inline]
    pub fn is_owner(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Panics with `what` unless called from the owner thread.
    pub fn assert_owner(&self, what: &str) {
        if !self.is_owner() {
            self.violation(what);
        }
    }

    /// [`assert_owner`](Self::assert_owner) in debug builds, nothing in
    /// release builds.
    #[inline]
    pub fn debug_assert_owner(&self, what: &str) {
        #[cfg(debug_assertions)]
        self.assert_owner(what);
        #[cfg(not(debug_assertions))]
        let _ = what;
    }

    #[cold]
    #[inline(never)]
    fn violation(&self, what: &str) -> ! {
        let current = thread::current();
        panic!(
            "{what}: owner thread is {:?}, called from {:?} ({:?}); \
             hand the new data to the owner thread (for example with a \
             scheduled task) before updating",
            self.owner,
            current.name().unwrap_or("<unnamed>"),
            current.id(),
        )
    }
}

impl fmt::Debug for ThreadAffinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ThreadAffinity").field(&self.owner).finish()
    }
}

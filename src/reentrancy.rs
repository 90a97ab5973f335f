//! Debug-only reentrancy check.
//!
//! The table calls into user code while routing keys (`KeyHasher`,
//! `AsRef<str>`, `Eq`). A nested call back into the same table from there
//! would observe a half-finished operation, so in debug builds every
//! key-routing or mutating entry point records its name and a nested entry
//! panics naming both operations. Release builds compile the tracker away.
//!
//! The tracker is `Send` but not `Sync`, matching the table: it may move to
//! another thread, and shared use goes through an external `Mutex`.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug, Default)]
pub(crate) struct ReentrancyCheck {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
}

impl ReentrancyCheck {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
        }
    }

    /// Mark `op` as running until the returned guard drops.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> OperationGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("reentrant call to `{op}` while `{outer}` is in progress");
            }
            self.active.set(Some(op));
            return OperationGuard {
                owner: self,
                _lt: PhantomData,
            };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return OperationGuard { _lt: PhantomData };
        }
    }

    #[cfg(test)]
    pub(crate) fn active(&self) -> Option<&'static str> {
        #[cfg(debug_assertions)]
        {
            return self.active.get();
        }
        #[cfg(not(debug_assertions))]
        {
            return None;
        }
    }
}

pub(crate) struct OperationGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ReentrancyCheck,
    _lt: PhantomData<&'a ()>,
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.active.set(None);
    }
}

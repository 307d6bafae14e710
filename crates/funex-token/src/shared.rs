//! Thread-safe ledger handle.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::access::AccessControl;
use crate::error::Result;
use crate::event::LedgerEvent;
use crate::ledger::Ledger;

/// Cloneable handle to a ledger shared between threads.
///
/// Every call takes the single whole-ledger lock for its full duration, so
/// operations touching two accounts are serialized without lock ordering.
#[derive(Debug)]
pub struct SharedLedger<A> {
    inner: Arc<Mutex<Ledger<A>>>,
}

impl<A> Clone for SharedLedger<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: AccessControl> SharedLedger<A> {
    /// Wrap a ledger.
    #[must_use]
    pub fn new(ledger: Ledger<A>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Run one ledger call and take its events, both under a single lock
    /// acquisition.
    ///
    /// No other call can interleave, so the returned events are this call's
    /// (preceded by anything an earlier [`SharedLedger::execute`] left
    /// undrained). The event buffer is empty when the lock is released.
    ///
    /// ```
    /// # use funex_token::{AccountId, Amount, Ledger, MinterRole, SharedLedger, TokenMetadata};
    /// let minter = AccountId::new([1; 20]);
    /// let access = MinterRole::new(minter).unwrap();
    /// let shared = SharedLedger::new(Ledger::new(TokenMetadata::new("Funex", "FNX", 6), access));
    /// let events = shared.apply(|l| l.mint(minter, Amount::new(10))).unwrap();
    /// assert_eq!(events.len(), 1);
    /// assert_eq!(shared.read(|l| l.balance_of(minter)), Amount::new(10));
    /// assert!(shared.read(|l| l.events().is_empty()));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the call's error. A rejected call emits nothing.
    pub fn apply(
        &self,
        call: impl FnOnce(&mut Ledger<A>) -> Result<()>,
    ) -> Result<Vec<LedgerEvent>> {
        let mut guard = self.inner.lock();
        call(&mut guard)?;
        Ok(guard.drain_events())
    }

    /// Run arbitrary work under the lock.
    ///
    /// Events emitted here stay buffered until drained, so hosts applying
    /// ledger calls should prefer [`SharedLedger::apply`].
    pub fn execute<T>(&self, op: impl FnOnce(&mut Ledger<A>) -> T) -> T {
        let mut guard = self.inner.lock();
        op(&mut guard)
    }

    /// Run a read-only query under the lock.
    pub fn read<T>(&self, query: impl FnOnce(&Ledger<A>) -> T) -> T {
        let guard = self.inner.lock();
        query(&guard)
    }

    /// Number of live handles.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Recover the ledger if this is the last handle.
    ///
    /// # Errors
    ///
    /// Returns the handle back if other clones are still alive.
    pub fn try_into_inner(self) -> std::result::Result<Ledger<A>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

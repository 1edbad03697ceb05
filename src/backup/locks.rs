//! Per-profile mutual exclusion
//!
//! Engine operations on one profile's backup directory are serialized so the
//! collision check and the filesystem change that follows it cannot
//! interleave with another operation on the same directory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::models::ProfileId;

/// Lazily created lock per profile
#[derive(Debug, Default)]
pub struct ProfileLocks {
    locks: Mutex<HashMap<ProfileId, Arc<Mutex<()>>>>,
}

impl ProfileLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handle for `id`; hold its guard for the whole operation
    pub fn handle(&self, id: ProfileId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(id).or_default())
    }

    /// Drop the lock of a deleted profile
    pub fn forget(&self, id: ProfileId) {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_profile_shares_lock() {
        let locks = ProfileLocks::new();
        let id = ProfileId::new();

        let a = locks.handle(id);
        let b = locks.handle(id);
        assert!(Arc::ptr_eq(&a, &b));

        let _held = a.lock().unwrap();
        assert!(b.try_lock().is_err());
    }

    #[test]
    fn test_profiles_do_not_block_each_other() {
        let locks = ProfileLocks::new();
        let a = locks.handle(ProfileId::new());
        let b = locks.handle(ProfileId::new());

        let _held = a.lock().unwrap();
        assert!(b.try_lock().is_ok());
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::OnceCell;

use crate::resolve::Instance;
use crate::{Key, WiringError};

/// Singleton instances, one initialization slot per key
///
/// The map lock is only held to fetch a slot; construction runs under the slot itself,
/// so concurrent first accesses to one key build a single instance while other keys proceed.
#[derive(Default)]
pub(crate) struct InstanceCache {
    slots: Mutex<HashMap<Key, Arc<OnceCell<Instance>>>>,
}

impl InstanceCache {
    // Slots hold no invariant a panicking factory could break
    fn slots(&self) -> MutexGuard<'_, HashMap<Key, Arc<OnceCell<Instance>>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Retrieve a constructed instance if it exists
    pub fn get(&self, key: &Key) -> Option<Instance> {
        self.slots().get(key).and_then(|slot| slot.get().cloned())
    }

    /// Retrieve the instance, constructing it if needed.
    ///
    /// A failed construction leaves the slot empty for the next attempt.
    pub fn get_or_try_init(
        &self,
        key: &Key,
        init: impl FnOnce() -> Result<Instance, WiringError>,
    ) -> Result<Instance, WiringError> {
        let slot = self.slots().entry(key.clone()).or_default().clone();
        slot.get_or_try_init(init).cloned()
    }

    pub fn remove(&self, key: &Key) -> bool {
        self.slots().remove(key).is_some()
    }

    /// Drop all slots, returning how many held an instance
    pub fn clear(&self) -> usize {
        let mut slots = self.slots();
        let filled = slots.values().filter(|slot| slot.get().is_some()).count();
        slots.clear();
        filled
    }

    pub fn len(&self) -> usize {
        self.slots()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }
}

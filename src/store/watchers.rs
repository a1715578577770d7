//! Scoped observer registrations.

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::fmt;
use std::sync::{Arc, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T: ?Sized> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

/// A list of callbacks notified with `&T`.
///
/// Notification runs on the caller's thread against a snapshot of the
/// registrations, with no lock held while callbacks execute. A callback may
/// therefore register or unregister watchers, or call back into the store
/// that owns this list.
pub struct Watchers<T: ?Sized> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T: ?Sized + 'static> Watchers<T> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a callback. It stays registered until the returned
    /// [`WatcherRegistration`] is dropped or unregistered.
    pub fn add<F>(&self, callback: F) -> WatcherRegistration
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Callback<T> = Arc::new(callback);
        let id = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, callback));
            id
        };

        let weak: Weak<Mutex<Registry<T>>> = Arc::downgrade(&self.registry);
        WatcherRegistration {
            remove: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.lock().entries.retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    /// Call every registered callback, in registration order.
    pub fn accept(&self, value: &T) {
        let snapshot: SmallVec<[Callback<T>; 4]> = self
            .registry
            .lock()
            .entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.registry.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ?Sized + 'static> Default for Watchers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Watchers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watchers")
            .field("count", &self.registry.lock().entries.len())
            .finish()
    }
}

/// Handle returned when registering a watcher. Dropping it unregisters the
/// watcher.
#[must_use = "dropping the registration unregisters the watcher immediately"]
pub struct WatcherRegistration {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl WatcherRegistration {
    /// Unregister now. Equivalent to dropping the handle.
    pub fn unregister(mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for WatcherRegistration {
    fn drop(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl fmt::Debug for WatcherRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatcherRegistration")
            .field("active", &self.remove.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_registration_is_scoped() {
        let watchers = Watchers::<u32>::new();
        let total = Arc::new(AtomicUsize::new(0));

        let registration = {
            let total = Arc::clone(&total);
            watchers.add(move |v| {
                total.fetch_add(*v as usize, Ordering::SeqCst);
            })
        };
        watchers.accept(&2);
        assert_eq!(total.load(Ordering::SeqCst), 2);
        assert_eq!(watchers.len(), 1);

        drop(registration);
        watchers.accept(&5);
        assert_eq!(total.load(Ordering::SeqCst), 2);
        assert!(watchers.is_empty());
    }

    #[test]
    fn test_explicit_unregister_keeps_others() {
        let watchers = Watchers::<str>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = {
            let seen = Arc::clone(&seen);
            watchers.add(move |s: &str| seen.lock().push(format!("first {}", s)))
        };
        let _second = {
            let seen = Arc::clone(&seen);
            watchers.add(move |s: &str| seen.lock().push(format!("second {}", s)))
        };

        watchers.accept("a");
        first.unregister();
        watchers.accept("b");

        assert_eq!(*seen.lock(), vec!["first a", "second a", "second b"]);
    }

    #[test]
    fn test_registration_outlives_list() {
        let watchers = Watchers::<u8>::new();
        let registration = watchers.add(|_| {});
        drop(watchers);
        // Must not panic.
        drop(registration);
    }
}

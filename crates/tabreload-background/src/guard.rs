//! Per-window reentrancy guard

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tabreload_core::types::WindowId;
use tracing::trace;

/// Set of windows with a reload loop in flight.
///
/// The lock is only held for the insert or remove itself, never across an
/// await point.
#[derive(Debug, Clone, Default)]
pub struct WindowGuard {
    reloading: Arc<Mutex<HashSet<WindowId>>>,
}

impl WindowGuard {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self) -> MutexGuard<'_, HashSet<WindowId>> {
        self.reloading.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Mark `window_id` busy. Returns `None` if a loop already holds it.
    pub fn try_acquire(&self, window_id: WindowId) -> Option<WindowLease> {
        if !self.set().insert(window_id) {
            trace!(%window_id, "window already reloading");
            return None;
        }
        Some(WindowLease {
            reloading: Arc::clone(&self.reloading),
            window_id,
        })
    }

    pub fn is_reloading(&self, window_id: WindowId) -> bool {
        self.set().contains(&window_id)
    }

    pub fn active_count(&self) -> usize {
        self.set().len()
    }
}

/// Exclusive hold on one window; released on drop.
#[derive(Debug)]
pub struct WindowLease {
    reloading: Arc<Mutex<HashSet<WindowId>>>,
    window_id: WindowId,
}

impl WindowLease {
    pub fn window_id(&self) -> WindowId {
        self.window_id
    }
}

impl Drop for WindowLease {
    fn drop(&mut self) {
        self.reloading
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.window_id);
        trace!(window_id = %self.window_id, "window released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_refused() {
        let guard = WindowGuard::new();
        let lease = guard.try_acquire(WindowId(1));
        assert!(lease.is_some());
        assert!(guard.try_acquire(WindowId(1)).is_none());
        assert!(guard.is_reloading(WindowId(1)));
    }

    #[test]
    fn test_windows_are_independent() {
        let guard = WindowGuard::new();
        let _a = guard.try_acquire(WindowId(1)).unwrap();
        let _b = guard.try_acquire(WindowId(2)).unwrap();
        assert_eq!(guard.active_count(), 2);
    }

    #[test]
    fn test_drop_releases() {
        let guard = WindowGuard::new();
        let lease = guard.try_acquire(WindowId(7)).unwrap();
        assert_eq!(lease.window_id(), WindowId(7));
        drop(lease);
        assert!(!guard.is_reloading(WindowId(7)));
        assert!(guard.try_acquire(WindowId(7)).is_some());
    }

    #[test]
    fn test_release_on_panic() {
        let guard = WindowGuard::new();
        let cloned = guard.clone();
        let result = std::panic::catch_unwind(move || {
            let _lease = cloned.try_acquire(WindowId(3)).unwrap();
            panic!("loop blew up");
        });
        assert!(result.is_err());
        assert!(!guard.is_reloading(WindowId(3)));
    }
}

//! Asset Handle System
//!
//! Reference-counted asset handles so GPU resources are not released while
//! still referenced by an in-flight frame packet.
//!
//! # Design
//! - Strong handles (`StrongHandle`) keep an asset alive.
//! - Weak handles (`WeakHandle`) don't prevent release; suitable for caches.
//! - An asset becomes releasable only once strong count hits zero *and* it
//!   has been marked for deletion (the deferred-destruction pool from §9
//!   additionally requires the owning frame's submission fence to signal
//!   before the underlying GPU allocation is actually freed — see
//!   [`crate::manager::RenderManager::keep_alive_while_in_use`]).

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Asset state tracker: reference counts and deletion state.
#[derive(Debug)]
pub struct AssetTracker {
    strong_count: AtomicU32,
    weak_count: AtomicU32,
    marked_for_deletion: AtomicU32,
}

impl AssetTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            strong_count: AtomicU32::new(1),
            weak_count: AtomicU32::new(0),
            marked_for_deletion: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn add_strong(&self) -> u32 {
        self.strong_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[inline]
    pub fn release_strong(&self) -> u32 {
        let prev = self.strong_count.fetch_sub(1, Ordering::Release);
        if prev == 1 {
            std::sync::atomic::fence(Ordering::Acquire);
        }
        prev - 1
    }

    #[inline]
    #[must_use]
    pub fn strong_count(&self) -> u32 {
        self.strong_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn add_weak(&self) -> u32 {
        self.weak_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[inline]
    pub fn release_weak(&self) -> u32 {
        self.weak_count.fetch_sub(1, Ordering::Release).saturating_sub(1)
    }

    #[inline]
    #[must_use]
    pub fn weak_count(&self) -> u32 {
        self.weak_count.load(Ordering::Relaxed)
    }

    pub fn mark_for_deletion(&self) {
        self.marked_for_deletion.store(1, Ordering::Release);
    }

    #[inline]
    #[must_use]
    pub fn is_marked_for_deletion(&self) -> bool {
        self.marked_for_deletion.load(Ordering::Acquire) != 0
    }

    #[inline]
    #[must_use]
    pub fn can_be_released(&self) -> bool {
        self.strong_count() == 0 && self.is_marked_for_deletion()
    }
}

impl Default for AssetTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Strong asset handle. Holding this prevents the asset from being released.
pub struct StrongHandle<K: Copy> {
    key: K,
    tracker: Arc<AssetTracker>,
}

impl<K: Copy> StrongHandle<K> {
    pub fn new(key: K, tracker: Arc<AssetTracker>) -> Self {
        tracker.add_strong();
        Self { key, tracker }
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> K {
        self.key
    }

    #[inline]
    #[must_use]
    pub fn ref_count(&self) -> u32 {
        self.tracker.strong_count()
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakHandle<K> {
        self.tracker.add_weak();
        WeakHandle {
            key: self.key,
            tracker: Arc::clone(&self.tracker),
        }
    }
}

impl<K: Copy> Clone for StrongHandle<K> {
    fn clone(&self) -> Self {
        self.tracker.add_strong();
        Self {
            key: self.key,
            tracker: Arc::clone(&self.tracker),
        }
    }
}

impl<K: Copy> Drop for StrongHandle<K> {
    fn drop(&mut self) {
        self.tracker.release_strong();
    }
}

/// Weak asset handle. Must be upgraded before use.
pub struct WeakHandle<K: Copy> {
    key: K,
    tracker: Arc<AssetTracker>,
}

impl<K: Copy> WeakHandle<K> {
    #[inline]
    #[must_use]
    pub fn key(&self) -> K {
        self.key
    }

    /// Attempts to upgrade to a strong handle. Fails once marked for
    /// deletion or once strong count has reached zero.
    pub fn upgrade(&self) -> Option<StrongHandle<K>> {
        if self.tracker.is_marked_for_deletion() {
            return None;
        }

        let mut current = self.tracker.strong_count.load(Ordering::Relaxed);
        loop {
            if current == 0 {
                return None;
            }
            match self.tracker.strong_count.compare_exchange_weak(
                current,
                current + 1,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    return Some(StrongHandle {
                        key: self.key,
                        tracker: Arc::clone(&self.tracker),
                    });
                }
                Err(new) => current = new,
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.tracker.is_marked_for_deletion() && self.tracker.strong_count() > 0
    }
}

impl<K: Copy> Clone for WeakHandle<K> {
    fn clone(&self) -> Self {
        self.tracker.add_weak();
        Self {
            key: self.key,
            tracker: Arc::clone(&self.tracker),
        }
    }
}

impl<K: Copy> Drop for WeakHandle<K> {
    fn drop(&mut self) {
        self.tracker.release_weak();
    }
}

/// An asset paired with its tracker.
pub struct TrackedAsset<T> {
    pub asset: T,
    pub tracker: Arc<AssetTracker>,
}

impl<T> TrackedAsset<T> {
    pub fn new(asset: T) -> Self {
        Self {
            asset,
            tracker: Arc::new(AssetTracker::new()),
        }
    }

    pub fn create_handle<K: Copy>(&self, key: K) -> StrongHandle<K> {
        StrongHandle::new(key, Arc::clone(&self.tracker))
    }

    #[inline]
    #[must_use]
    pub fn ref_count(&self) -> u32 {
        self.tracker.strong_count()
    }

    pub fn mark_for_deletion(&self) {
        self.tracker.mark_for_deletion();
    }

    #[inline]
    #[must_use]
    pub fn can_be_released(&self) -> bool {
        self.tracker.can_be_released()
    }
}

impl<T> std::ops::Deref for TrackedAsset<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.asset
    }
}

impl<T> std::ops::DerefMut for TrackedAsset<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.asset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_handle_ref_count() {
        let tracker = Arc::new(AssetTracker::new());
        assert_eq!(tracker.strong_count(), 1);

        let handle1: StrongHandle<u32> = StrongHandle::new(42, Arc::clone(&tracker));
        assert_eq!(tracker.strong_count(), 2);

        let handle2 = handle1.clone();
        assert_eq!(tracker.strong_count(), 3);

        drop(handle1);
        assert_eq!(tracker.strong_count(), 2);

        drop(handle2);
        assert_eq!(tracker.strong_count(), 1);
    }

    #[test]
    fn weak_handle_upgrade() {
        let tracker = Arc::new(AssetTracker::new());
        let strong: StrongHandle<u32> = StrongHandle::new(42, Arc::clone(&tracker));

        let weak = strong.downgrade();
        assert!(weak.is_valid());

        let upgraded = weak.upgrade();
        assert!(upgraded.is_some());

        drop(strong);
        drop(upgraded.unwrap());

        tracker.mark_for_deletion();
        assert!(!weak.is_valid());
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn tracked_asset_ref_count() {
        let tracked = TrackedAsset::new("hello".to_string());
        assert_eq!(tracked.ref_count(), 1);
        assert_eq!(*tracked, "hello");

        let handle = tracked.create_handle(0u32);
        assert_eq!(tracked.ref_count(), 2);

        drop(handle);
        assert_eq!(tracked.ref_count(), 1);
    }

    #[test]
    fn can_be_released_requires_both_conditions() {
        let tracked = TrackedAsset::new(1u32);
        let handle = tracked.create_handle(0u32);
        tracked.mark_for_deletion();
        assert!(!tracked.can_be_released());
        drop(handle);
        assert!(tracked.can_be_released());
    }
}

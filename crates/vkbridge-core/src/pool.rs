// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A bounded, thread-safe free list for expensive-to-create objects.
//!
//! The device keeps one [`RecyclablePool`] per recyclable object kind (staging
//! buffers, command lists, descriptor pools). A pool never inspects what it
//! stores: whoever returns an object must make sure no in-flight GPU work still
//! references it and that its internal state has been reset.

use parking_lot::Mutex;
use std::fmt;

/// A free list of reusable instances of `T`.
///
/// Both [`retrieve`](Self::retrieve) and [`give_back`](Self::give_back) are O(1)
/// and may be called concurrently from any thread. The most recently returned
/// instance is handed out first, but callers must not rely on any ordering.
pub struct RecyclablePool<T> {
    objects: Mutex<Vec<T>>,
    capacity: usize,
}

impl<T> RecyclablePool<T> {
    /// Creates an empty pool that retains at most `capacity` instances.
    pub fn new(capacity: usize) -> Self {
        Self {
            objects: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Takes one instance out of the pool, or `None` if the pool is empty.
    pub fn retrieve(&self) -> Option<T> {
        self.objects.lock().pop()
    }

    /// Returns an instance for later reuse.
    ///
    /// If the pool is already full the instance is handed back to the caller
    /// as `Err`, so it can be dropped outside of the pool's lock.
    pub fn give_back(&self, object: T) -> Result<(), T> {
        let mut objects = self.objects.lock();
        if objects.len() >= self.capacity {
            return Err(object);
        }
        objects.push(object);
        Ok(())
    }

    /// Number of instances currently waiting for reuse.
    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    /// Returns `true` if no instance is waiting for reuse.
    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }

    /// The maximum number of instances this pool retains.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes every pooled instance and returns them.
    pub fn drain(&self) -> Vec<T> {
        std::mem::take(&mut *self.objects.lock())
    }
}

impl<T> fmt::Debug for RecyclablePool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecyclablePool")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn retrieve_from_empty_pool_misses() {
        let pool = RecyclablePool::<u32>::new(4);
        assert!(pool.retrieve().is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn returned_object_is_retrieved_again() {
        let pool = RecyclablePool::new(4);
        pool.give_back(1u32).unwrap();
        pool.give_back(7u32).unwrap();

        assert_eq!(pool.retrieve(), Some(7));
        assert_eq!(pool.retrieve(), Some(1));
        assert_eq!(pool.retrieve(), None);
    }

    #[test]
    fn full_pool_hands_object_back() {
        let pool = RecyclablePool::new(2);
        pool.give_back("a").unwrap();
        pool.give_back("b").unwrap();

        assert_eq!(pool.give_back("c"), Err("c"));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn zero_capacity_pool_never_retains() {
        let pool = RecyclablePool::new(0);
        assert!(pool.give_back(5u8).is_err());
        assert!(pool.retrieve().is_none());
    }

    #[test]
    fn drain_empties_the_pool() {
        let pool = RecyclablePool::new(3);
        pool.give_back(1).unwrap();
        pool.give_back(2).unwrap();

        let mut drained = pool.drain();
        drained.sort();
        assert_eq!(drained, vec![1, 2]);
        assert!(pool.is_empty());
    }

    #[test]
    fn concurrent_retrieve_and_return_loses_nothing() {
        let pool = Arc::new(RecyclablePool::new(64));
        for i in 0..8 {
            pool.give_back(i).unwrap();
        }

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let pool = Arc::clone(&pool);
                scope.spawn(move || {
                    for _ in 0..1000 {
                        if let Some(object) = pool.retrieve() {
                            pool.give_back(object).unwrap();
                        }
                    }
                });
            }
        });

        let mut remaining = pool.drain();
        remaining.sort();
        assert_eq!(remaining, (0..8).collect::<Vec<_>>());
    }
}

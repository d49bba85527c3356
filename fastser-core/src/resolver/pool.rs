// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use parking_lot::Mutex;
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of segments in the pool.
const NUM_SEGMENTS: usize = 16;

static THREAD_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

thread_local! {
    /// Segment assigned to the current thread, round-robin over thread start order.
    static SEGMENT_INDEX: Cell<usize> = Cell::new(
        (THREAD_ID_COUNTER.fetch_add(1, Ordering::Relaxed) as usize) % NUM_SEGMENTS
    );
}

struct Segment<T> {
    items: Mutex<Vec<T>>,
}

impl<T> Segment<T> {
    fn new() -> Self {
        Segment {
            items: Mutex::new(Vec::new()),
        }
    }

    #[inline(always)]
    fn get(&self, factory: &dyn Fn() -> T) -> T {
        // the lock guard is dropped before the factory runs
        let pooled = self.items.lock().pop();
        pooled.unwrap_or_else(factory)
    }

    #[inline(always)]
    fn put(&self, item: T) {
        self.items.lock().push(item);
    }
}

/// Segmented pool of reusable encoder sessions.
///
/// Threads are spread over the segments so concurrent borrowers usually take
/// different locks. An item is handed to the `recycle` hook before it goes
/// back into its segment.
pub struct Pool<T> {
    segments: [Segment<T>; NUM_SEGMENTS],
    factory: Box<dyn Fn() -> T + Send + Sync>,
    recycle: Box<dyn Fn(&mut T) + Send + Sync>,
}

impl<T> Pool<T> {
    pub fn new<F, R>(factory: F, recycle: R) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        R: Fn(&mut T) + Send + Sync + 'static,
    {
        Pool {
            segments: std::array::from_fn(|_| Segment::new()),
            factory: Box::new(factory),
            recycle: Box::new(recycle),
        }
    }

    /// Borrows an item, runs `handler` on it and returns it to the pool.
    #[inline(always)]
    pub fn borrow_mut<Result>(&self, handler: impl FnOnce(&mut T) -> Result) -> Result {
        let segment_idx = SEGMENT_INDEX.with(|idx| idx.get());
        let segment = &self.segments[segment_idx];

        let mut obj = segment.get(&*self.factory);
        let result = handler(&mut obj);
        (self.recycle)(&mut obj);
        segment.put(obj);
        result
    }

    /// Items currently parked in the pool.
    pub fn idle_count(&self) -> usize {
        self.segments.iter().map(|s| s.items.lock().len()).sum()
    }
}

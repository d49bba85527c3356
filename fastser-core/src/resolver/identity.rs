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

use crate::serializer::FastObject;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    /// Shared pointers whose targets were registered by a write still running
    /// on this thread.
    static PINNED: RefCell<Vec<Box<dyn Any>>> = const { RefCell::new(Vec::new()) };
}

/// Keeps `keep_alive` until the innermost open [`PinScope`] ends.
pub(crate) fn pin(keep_alive: Box<dyn Any>) {
    PINNED.with(|pinned| pinned.borrow_mut().push(keep_alive));
}

/// Releases the pins taken while it was alive, on error and on unwinding
/// alike. Scopes nest: sessions used from inside a custom serializer release
/// only their own pins.
pub(crate) struct PinScope {
    mark: usize,
}

impl PinScope {
    pub(crate) fn enter() -> PinScope {
        PinScope {
            mark: PINNED.with(|pinned| pinned.borrow().len()),
        }
    }
}

impl Drop for PinScope {
    fn drop(&mut self) {
        let released = PINNED.with(|pinned| {
            let mut pinned = pinned.borrow_mut();
            let mark = self.mark.min(pinned.len());
            pinned.split_off(mark)
        });
        // pointee destructors run after the borrow ends
        drop(released);
    }
}

/// Identity of one value: its address paired with its concrete type.
///
/// The type is part of the key because a struct and its first field can live
/// at the same address. A handle is only meaningful while the value stays
/// where it is; the encoder takes handles of values behind `Rc` or `Arc` and
/// pins those for the rest of the root write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    addr: usize,
    type_id: TypeId,
}

impl ObjectHandle {
    pub fn of(value: &dyn FastObject) -> ObjectHandle {
        ObjectHandle {
            addr: value as *const dyn FastObject as *const () as usize,
            type_id: value.as_any().type_id(),
        }
    }
}

/// Byte range a value occupies in the output. `end` is unset while the
/// value is still being written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: Option<usize>,
}

/// Records which values have been written and where.
///
/// The encoder brackets every value it writes:
/// [`object_will_be_written`](Self::object_will_be_written) before the value
/// and [`object_has_been_written`](Self::object_has_been_written) after it,
/// on success and on error alike.
///
/// # Examples
///
/// ```rust
/// use fastser_core::resolver::identity::{IdentityTable, IdentityTracker, ObjectHandle};
///
/// let mut table = IdentityTable::new();
/// let value = String::from("shared");
/// let handle = ObjectHandle::of(&value);
///
/// // First encounter: registered, nothing to refer back to
/// assert_eq!(table.object_will_be_written(Some(handle), 4), None);
/// table.object_has_been_written(Some(handle), 4, 12);
///
/// // Second encounter: the first write's offset comes back
/// assert_eq!(table.object_will_be_written(Some(handle), 20), Some(4));
/// ```
pub trait IdentityTracker: Send {
    /// Whether this tracker records anything at all.
    fn is_enabled(&self) -> bool;

    /// Called before `handle` is written at `start`. Returns the start offset
    /// of an earlier write of the same value; otherwise registers `handle`
    /// at `start` and returns `None`.
    fn object_will_be_written(&mut self, handle: Option<ObjectHandle>, start: usize)
        -> Option<usize>;

    /// Called after the write that began at `start` finished at `end`.
    fn object_has_been_written(&mut self, handle: Option<ObjectHandle>, start: usize, end: usize);

    fn lookup(&self, handle: &ObjectHandle) -> Option<Span>;

    /// Number of tracked identities.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn reset(&mut self);
}

/// Identity table for shared mode.
#[derive(Default)]
pub struct IdentityTable {
    spans: HashMap<ObjectHandle, Span>,
}

impl IdentityTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityTracker for IdentityTable {
    fn is_enabled(&self) -> bool {
        true
    }

    fn object_will_be_written(
        &mut self,
        handle: Option<ObjectHandle>,
        start: usize,
    ) -> Option<usize> {
        let handle = handle?;
        if let Some(span) = self.spans.get(&handle) {
            return Some(span.start);
        }
        self.spans.insert(handle, Span { start, end: None });
        None
    }

    fn object_has_been_written(&mut self, handle: Option<ObjectHandle>, start: usize, end: usize) {
        let Some(handle) = handle else {
            return;
        };
        if let Some(span) = self.spans.get_mut(&handle) {
            // back-references to this value must not extend its span
            if span.start == start && span.end.is_none() {
                span.end = Some(end);
            }
        }
    }

    fn lookup(&self, handle: &ObjectHandle) -> Option<Span> {
        self.spans.get(handle).copied()
    }

    fn len(&self) -> usize {
        self.spans.len()
    }

    fn reset(&mut self) {
        self.spans.clear();
    }
}

/// Tracker for unshared mode: remembers nothing, so every value is written
/// in full each time it is reached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIdentity;

impl IdentityTracker for NoIdentity {
    fn is_enabled(&self) -> bool {
        false
    }

    #[inline(always)]
    fn object_will_be_written(&mut self, _handle: Option<ObjectHandle>, _start: usize) -> Option<usize> {
        None
    }

    #[inline(always)]
    fn object_has_been_written(&mut self, _handle: Option<ObjectHandle>, _start: usize, _end: usize) {}

    fn lookup(&self, _handle: &ObjectHandle) -> Option<Span> {
        None
    }

    fn len(&self) -> usize {
        0
    }

    fn reset(&mut self) {}
}

pub fn tracker_for(share_references: bool) -> Box<dyn IdentityTracker> {
    if share_references {
        Box::new(IdentityTable::new())
    } else {
        Box::new(NoIdentity)
    }
}

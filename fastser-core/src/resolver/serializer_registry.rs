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

use crate::meta::Class;
use crate::serializer::ObjectSerializer;
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Override hook consulted before the registered entries.
///
/// Called while a schema is being computed, with the schema registry locked:
/// implementations must not call back into [`ClassInfoRegistry`].
///
/// [`ClassInfoRegistry`]: crate::resolver::class_registry::ClassInfoRegistry
pub trait SerializerRegistryDelegate: Send + Sync {
    fn get_serializer(&self, class: &Class) -> Option<Arc<dyn ObjectSerializer>>;
}

struct SerializerEntry {
    serializer: Arc<dyn ObjectSerializer>,
    for_subclasses: bool,
}

/// Maps classes to custom serializers.
#[derive(Default)]
pub struct SerializerRegistry {
    entries: RwLock<HashMap<TypeId, SerializerEntry>>,
    delegate: RwLock<Option<Arc<dyn SerializerRegistryDelegate>>>,
}

impl SerializerRegistry {
    pub fn new() -> SerializerRegistry {
        SerializerRegistry::default()
    }

    /// Binds `serializer` to `class`. With `also_for_subclasses` it is also
    /// found for classes that declare `class` somewhere up their
    /// `super_class` chain, unless they have an entry of their own.
    pub fn put_serializer(
        &self,
        class: Class,
        serializer: Arc<dyn ObjectSerializer>,
        also_for_subclasses: bool,
    ) {
        self.entries.write().insert(
            class.type_id(),
            SerializerEntry {
                serializer,
                for_subclasses: also_for_subclasses,
            },
        );
    }

    pub fn get_serializer(&self, class: &Class) -> Option<Arc<dyn ObjectSerializer>> {
        if let Some(delegate) = self.delegate.read().as_ref() {
            if let Some(serializer) = delegate.get_serializer(class) {
                return Some(serializer);
            }
        }
        let entries = self.entries.read();
        if entries.is_empty() {
            return None;
        }
        if let Some(entry) = entries.get(&class.type_id()) {
            return Some(entry.serializer.clone());
        }
        let mut visited = HashSet::new();
        visited.insert(class.type_id());
        let mut current = class.describe().super_class;
        while let Some(super_class) = current {
            if !visited.insert(super_class.type_id()) {
                break;
            }
            if let Some(entry) = entries.get(&super_class.type_id()) {
                if entry.for_subclasses {
                    return Some(entry.serializer.clone());
                }
            }
            current = super_class.describe().super_class;
        }
        None
    }

    pub fn set_delegate(&self, delegate: Option<Arc<dyn SerializerRegistryDelegate>>) {
        *self.delegate.write() = delegate;
    }

    pub fn get_delegate(&self) -> Option<Arc<dyn SerializerRegistryDelegate>> {
        self.delegate.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

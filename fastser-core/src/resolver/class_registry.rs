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

use crate::error::Error;
use crate::meta::{Class, Reflect};
use crate::resolver::class_info::{ClassInfo, SchemaPolicy};
use crate::resolver::serializer_registry::{SerializerRegistry, SerializerRegistryDelegate};
use log::{debug, warn};
use parking_lot::Mutex;
use std::any::TypeId;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Thread-safe cache of class schemas. Each class gets exactly one
/// [`ClassInfo`] per registry, computed on first request and kept for the
/// registry's lifetime.
pub struct ClassInfoRegistry {
    infos: Mutex<HashMap<TypeId, Arc<ClassInfo>>>,
    serializer_registry: SerializerRegistry,
    ignore_annotations: AtomicBool,
    struct_mode: AtomicBool,
}

impl Default for ClassInfoRegistry {
    fn default() -> Self {
        ClassInfoRegistry {
            infos: Mutex::new(HashMap::new()),
            serializer_registry: SerializerRegistry::new(),
            ignore_annotations: AtomicBool::new(false),
            struct_mode: AtomicBool::new(false),
        }
    }
}

impl ClassInfoRegistry {
    pub fn new() -> ClassInfoRegistry {
        ClassInfoRegistry::default()
    }

    /// Returns the schema of `class`, computing it on first use.
    ///
    /// The lock is held from lookup to insertion, so concurrent first
    /// requests for one class all receive the same `Arc`.
    pub fn get_class_info(&self, class: Option<Class>) -> Result<Arc<ClassInfo>, Error> {
        let mut infos = self.infos.lock();
        let Some(class) = class else {
            return Err(Error::invalid_argument("class must not be null"));
        };
        if let Some(info) = infos.get(&class.type_id()) {
            return Ok(info.clone());
        }
        let info = Arc::new(ClassInfo::new(
            class,
            self.policy(),
            &self.serializer_registry,
        ));
        debug!(
            "computed class info for {}: {} fields, serializer: {}",
            class,
            info.fields().len(),
            info.get_serializer().is_some()
        );
        infos.insert(class.type_id(), info.clone());
        Ok(info)
    }

    pub fn class_info<T: Reflect>(&self) -> Result<Arc<ClassInfo>, Error> {
        self.get_class_info(Some(T::class()))
    }

    /// Number of cached schemas.
    pub fn class_count(&self) -> usize {
        self.infos.lock().len()
    }

    pub fn is_cached(&self, class: &Class) -> bool {
        self.infos.lock().contains_key(&class.type_id())
    }

    fn policy(&self) -> SchemaPolicy {
        SchemaPolicy {
            ignore_annotations: self.is_ignore_annotations(),
            struct_mode: self.is_struct_mode(),
        }
    }

    pub fn is_ignore_annotations(&self) -> bool {
        self.ignore_annotations.load(Ordering::Acquire)
    }

    /// Applies to schemas computed from now on.
    pub fn set_ignore_annotations(&self, ignore_annotations: bool) {
        let previous = self
            .ignore_annotations
            .swap(ignore_annotations, Ordering::AcqRel);
        self.warn_if_cached("ignore_annotations", previous, ignore_annotations);
    }

    pub fn is_struct_mode(&self) -> bool {
        self.struct_mode.load(Ordering::Acquire)
    }

    /// Applies to schemas computed from now on.
    pub fn set_struct_mode(&self, struct_mode: bool) {
        let previous = self.struct_mode.swap(struct_mode, Ordering::AcqRel);
        self.warn_if_cached("struct_mode", previous, struct_mode);
    }

    fn warn_if_cached(&self, toggle: &str, previous: bool, current: bool) {
        if previous == current {
            return;
        }
        let cached = self.class_count();
        if cached > 0 {
            warn!(
                "{} changed to {} with {} class infos already cached; they keep the old setting",
                toggle, current, cached
            );
        }
    }

    pub fn serializer_registry(&self) -> &SerializerRegistry {
        &self.serializer_registry
    }

    pub fn set_serializer_registry_delegate(
        &self,
        delegate: Option<Arc<dyn SerializerRegistryDelegate>>,
    ) {
        self.serializer_registry.set_delegate(delegate);
    }

    pub fn get_serializer_registry_delegate(&self) -> Option<Arc<dyn SerializerRegistryDelegate>> {
        self.serializer_registry.get_delegate()
    }

    /// Appends to `names` the name of every class reachable from `root`
    /// whose name starts with `filter`, plus the out-of-filter classes those
    /// reference directly. Only in-filter classes are expanded.
    pub fn add_all_referenced_classes(root: Option<Class>, names: &mut Vec<String>, filter: &str) {
        names.extend(Self::referenced_classes(root, filter));
    }

    /// Set form of [`add_all_referenced_classes`](Self::add_all_referenced_classes).
    pub fn referenced_classes(root: Option<Class>, filter: &str) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        let mut done = HashSet::new();
        collect_referenced(root, &mut names, &mut done, filter);
        names
    }
}

fn is_reference_class(class: &Class) -> bool {
    let kind = class.describe().kind;
    !kind.is_primitive() && !kind.is_array()
}

fn record_and_expand(
    class: Class,
    names: &mut BTreeSet<String>,
    done: &mut HashSet<&'static str>,
    filter: &str,
) {
    names.insert(class.name().to_string());
    collect_referenced(Some(class), names, done, filter);
}

fn collect_referenced(
    class: Option<Class>,
    names: &mut BTreeSet<String>,
    done: &mut HashSet<&'static str>,
    filter: &str,
) {
    let Some(class) = class else {
        return;
    };
    if done.contains(class.name()) || !class.name().starts_with(filter) {
        return;
    }
    done.insert(class.name());
    let desc = class.describe();

    for field in &desc.fields {
        if is_reference_class(&field.class) {
            record_and_expand(field.class, names, done, filter);
        }
    }
    for nested in &desc.nested {
        if is_reference_class(nested) {
            record_and_expand(*nested, names, done, filter);
        }
    }
    for method in &desc.methods {
        if let Some(returns) = method.returns {
            if is_reference_class(&returns) {
                record_and_expand(returns, names, done, filter);
            }
        }
        for param in &method.params {
            if is_reference_class(param) {
                record_and_expand(*param, names, done, filter);
            }
        }
    }
    if let Some(enclosing) = desc.enclosing {
        record_and_expand(enclosing, names, done, filter);
    }
    names.insert(class.name().to_string());
    // the super class is expanded but only recorded when it expands itself
    collect_referenced(desc.super_class, names, done, filter);
    for interface in &desc.interfaces {
        record_and_expand(*interface, names, done, filter);
    }
}

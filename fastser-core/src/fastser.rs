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

use crate::codec::BinaryCodec;
use crate::config::Config;
use crate::error::Error;
use crate::meta::Reflect;
use crate::output::ObjectOutput;
use crate::resolver::class_info::ClassInfo;
use crate::resolver::class_registry::ClassInfoRegistry;
use crate::resolver::identity::tracker_for;
use crate::resolver::pool::Pool;
use crate::resolver::serializer_registry::SerializerRegistryDelegate;
use crate::serializer::datetime::register_default_serializers;
use crate::serializer::{FastObject, ObjectSerializer};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// Shared configuration owning one class registry.
///
/// `Fastser` is `Send + Sync`; share it behind an `Arc` and create one
/// [`ObjectOutput`] per thread, or call [`serialize`](Fastser::serialize),
/// which borrows a pooled session.
///
/// # Examples
///
/// ```rust
/// use fastser_core::Fastser;
///
/// let fastser = Fastser::default()
///     .share_references(false)
///     .struct_mode(true)
///     .max_depth(64);
/// let bytes = fastser.serialize(&String::from("hello")).unwrap();
/// assert_eq!(bytes[0] as i8, fastser_core::types::STRING);
/// ```
pub struct Fastser {
    share_references: AtomicBool,
    max_depth: AtomicU32,
    registry: Arc<ClassInfoRegistry>,
    output_pool: Pool<ObjectOutput>,
}

impl Default for Fastser {
    fn default() -> Self {
        Fastser::new(Config::default())
    }
}

impl Fastser {
    pub fn new(config: Config) -> Fastser {
        let registry = Arc::new(ClassInfoRegistry::new());
        registry.set_ignore_annotations(config.is_ignore_annotations());
        registry.set_struct_mode(config.is_struct_mode());
        register_default_serializers(registry.serializer_registry());

        let pool_registry = registry.clone();
        let max_depth = config.max_depth();
        let output_pool = Pool::new(
            move || {
                ObjectOutput::with_parts(
                    pool_registry.clone(),
                    Box::new(BinaryCodec::new()),
                    tracker_for(true),
                    max_depth,
                )
            },
            ObjectOutput::recycle,
        );
        Fastser {
            share_references: AtomicBool::new(config.is_share_references()),
            max_depth: AtomicU32::new(max_depth),
            registry,
            output_pool,
        }
    }

    /// Whether sessions created from now on track identities.
    pub fn share_references(self, share_references: bool) -> Self {
        self.set_share_references(share_references);
        self
    }

    /// See [`ClassInfoRegistry::set_ignore_annotations`].
    pub fn ignore_annotations(self, ignore_annotations: bool) -> Self {
        self.registry.set_ignore_annotations(ignore_annotations);
        self
    }

    /// See [`ClassInfoRegistry::set_struct_mode`].
    pub fn struct_mode(self, struct_mode: bool) -> Self {
        self.registry.set_struct_mode(struct_mode);
        self
    }

    pub fn max_depth(self, max_depth: u32) -> Self {
        self.max_depth.store(max_depth, Ordering::Release);
        self
    }

    pub fn set_share_references(&self, share_references: bool) {
        self.share_references
            .store(share_references, Ordering::Release);
    }

    pub fn is_share_references(&self) -> bool {
        self.share_references.load(Ordering::Acquire)
    }

    pub fn get_max_depth(&self) -> u32 {
        self.max_depth.load(Ordering::Acquire)
    }

    pub fn get_class_registry(&self) -> &Arc<ClassInfoRegistry> {
        &self.registry
    }

    pub fn get_class_info<T: Reflect>(&self) -> Result<Arc<ClassInfo>, Error> {
        self.registry.class_info::<T>()
    }

    /// Binds `serializer` to `T`. Only schemas computed afterwards pick it up.
    pub fn register_serializer<T: Reflect>(
        &self,
        serializer: impl ObjectSerializer + 'static,
        also_for_subclasses: bool,
    ) {
        self.registry.serializer_registry().put_serializer(
            T::class(),
            Arc::new(serializer),
            also_for_subclasses,
        );
    }

    pub fn set_serializer_registry_delegate(
        &self,
        delegate: Option<Arc<dyn SerializerRegistryDelegate>>,
    ) {
        self.registry.set_serializer_registry_delegate(delegate);
    }

    pub fn get_object_output(&self) -> ObjectOutput {
        ObjectOutput::new(self)
    }

    pub fn get_object_output_no_shared(&self) -> ObjectOutput {
        ObjectOutput::no_shared(self)
    }

    /// Encodes `value` as one root write into a fresh byte vector.
    pub fn serialize(&self, value: &dyn FastObject) -> Result<Vec<u8>, Error> {
        self.output_pool.borrow_mut(|out| {
            out.set_share_references(self.is_share_references());
            out.set_max_depth(self.get_max_depth());
            out.write_object(value)?;
            Ok(out.take_buffer())
        })
    }
}

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

//! The encoding engine.
//!
//! [`ObjectOutput`] walks an object graph and, for every value, picks one of
//! the encoding paths in priority order:
//!
//! 1. nothing to write: `NULL`
//! 2. strings: `ONE_OF` + candidate index, or `STRING` + UTF-8
//! 3. boxed `i32` / `i64` / `bool`: `BIG_INT` / `BIG_LONG` / `BIG_BOOLEAN_*`
//! 4. enums: `ENUM`, enum class, ordinal
//! 5. everything else through the class schema: `HANDLE` for an `Rc`/`Arc`
//!    target already written in shared mode, `ARRAY` for arrays, otherwise an
//!    object header followed by either the bound custom serializer or the
//!    default field writer.

use crate::codec::{BinaryCodec, Codec};
use crate::ensure;
use crate::error::Error;
use crate::fastser::Fastser;
use crate::meta::Class;
use crate::resolver::class_info::{ClassInfo, FieldInfo, UNTYPED_FIELD};
use crate::resolver::class_registry::ClassInfoRegistry;
use crate::resolver::identity::{
    self, tracker_for, IdentityTracker, NoIdentity, ObjectHandle, PinScope,
};
use crate::serializer::{ArrayView, FastObject, ObjectView};
use crate::types::Tag;
use log::trace;
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;

/// An encoder session.
///
/// A session writes any number of root values into its codec. Identities are
/// tracked per root value in shared mode; [`reset_for_reuse`] starts a new
/// stream at offset 0.
///
/// [`reset_for_reuse`]: ObjectOutput::reset_for_reuse
pub struct ObjectOutput {
    codec: Box<dyn Codec>,
    registry: Arc<ClassInfoRegistry>,
    tracker: Box<dyn IdentityTracker>,
    closed: bool,
    depth: u32,
    max_depth: u32,
}

impl ObjectOutput {
    /// Session following the configuration's share flag, writing into memory.
    pub fn new(fastser: &Fastser) -> ObjectOutput {
        Self::with_codec(fastser, Box::new(BinaryCodec::new()))
    }

    pub fn with_codec(fastser: &Fastser, codec: Box<dyn Codec>) -> ObjectOutput {
        ObjectOutput::with_parts(
            fastser.get_class_registry().clone(),
            codec,
            tracker_for(fastser.is_share_references()),
            fastser.get_max_depth(),
        )
    }

    /// Unshared session. Switches the configuration's share flag off, so
    /// sessions created from it afterwards are unshared too.
    pub fn no_shared(fastser: &Fastser) -> ObjectOutput {
        Self::no_shared_with_codec(fastser, Box::new(BinaryCodec::new()))
    }

    pub fn no_shared_with_codec(fastser: &Fastser, codec: Box<dyn Codec>) -> ObjectOutput {
        fastser.set_share_references(false);
        ObjectOutput::with_parts(
            fastser.get_class_registry().clone(),
            codec,
            Box::new(NoIdentity),
            fastser.get_max_depth(),
        )
    }

    pub fn with_parts(
        registry: Arc<ClassInfoRegistry>,
        codec: Box<dyn Codec>,
        tracker: Box<dyn IdentityTracker>,
        max_depth: u32,
    ) -> ObjectOutput {
        ObjectOutput {
            codec,
            registry,
            tracker,
            closed: false,
            depth: 0,
            max_depth,
        }
    }

    pub fn is_shared(&self) -> bool {
        self.tracker.is_enabled()
    }

    pub(crate) fn set_share_references(&mut self, share_references: bool) {
        if share_references != self.is_shared() {
            self.tracker = tracker_for(share_references);
        }
    }

    pub fn set_max_depth(&mut self, max_depth: u32) {
        self.max_depth = max_depth;
    }

    pub fn get_class_registry(&self) -> &Arc<ClassInfoRegistry> {
        &self.registry
    }

    pub fn codec(&mut self) -> &mut dyn Codec {
        self.codec.as_mut()
    }

    pub fn identities(&self) -> &dyn IdentityTracker {
        self.tracker.as_ref()
    }

    pub fn get_written(&self) -> usize {
        self.codec.get_written()
    }

    /// Bytes written and not yet flushed to a sink.
    pub fn buffer(&self) -> &[u8] {
        self.codec.buffer()
    }

    pub fn take_buffer(&mut self) -> Vec<u8> {
        self.codec.take_buffer()
    }

    pub fn set_outstream(&mut self, sink: Option<Box<dyn Write + Send>>) {
        self.codec.set_outstream(sink);
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.codec.flush()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Flushes and detaches the sink. A closed session can't be reused.
    pub fn close(&mut self) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        trace!("closing object output after {} bytes", self.get_written());
        self.codec.close()
    }

    /// Prepares the session for a new stream written to `sink`. With `None`
    /// the current sink, or memory if there is none, stays the target.
    pub fn reset_for_reuse(&mut self, sink: Option<Box<dyn Write + Send>>) -> Result<(), Error> {
        self.ensure_open()?;
        self.recycle();
        if let Some(sink) = sink {
            self.codec.set_outstream(Some(sink));
        }
        Ok(())
    }

    /// Prepares the session for a new stream written into `buffer`.
    pub fn reset_for_reuse_with_buffer(&mut self, buffer: Vec<u8>) -> Result<(), Error> {
        self.ensure_open()?;
        self.recycle();
        self.codec.reset_to_buffer(buffer);
        Ok(())
    }

    pub(crate) fn recycle(&mut self) {
        trace!("resetting object output for reuse");
        self.codec.reset();
        self.tracker.reset();
        self.depth = 0;
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.closed {
            return Err(Error::stream_closed("can't reuse closed stream"));
        }
        Ok(())
    }

    /// Writes one root value. In shared mode back-references reach only
    /// values written within this call.
    pub fn write_object(&mut self, value: &dyn FastObject) -> Result<(), Error> {
        self.write_object_opt(Some(value))
    }

    pub fn write_object_opt(&mut self, value: Option<&dyn FastObject>) -> Result<(), Error> {
        self.ensure_open()?;
        let outermost = self.depth == 0;
        self.write_object_with_context(&UNTYPED_FIELD, value)?;
        if outermost {
            return self.codec.flush();
        }
        Ok(())
    }

    /// Writes `value` as the content of `field`.
    ///
    /// Every call is bracketed by the identity tracker, also when the write
    /// fails. A call made outside any other write is a root write: the
    /// identities it registers are dropped when it returns.
    pub fn write_object_with_context(
        &mut self,
        field: &FieldInfo,
        value: Option<&dyn FastObject>,
    ) -> Result<(), Error> {
        if self.depth > 0 {
            return self.write_tracked(field, value);
        }
        let _pins = PinScope::enter();
        let result = self.write_tracked(field, value);
        self.tracker.reset();
        result
    }

    fn write_tracked(
        &mut self,
        field: &FieldInfo,
        value: Option<&dyn FastObject>,
    ) -> Result<(), Error> {
        let pinned = if self.tracker.is_enabled() {
            value.and_then(|v| v.fast_pin())
        } else {
            None
        };
        let value = value.and_then(|v| v.fast_target());
        let view = value.map(|v| v.fast_view());
        let start = self.codec.get_written();
        let handle = match (value, &view, &pinned) {
            (Some(v), Some(view), Some(_)) if view.is_shareable() => Some(ObjectHandle::of(v)),
            _ => None,
        };
        let seen = self.tracker.object_will_be_written(handle, start);
        if let (None, Some(_), Some(keep_alive)) = (seen, handle, pinned) {
            identity::pin(keep_alive);
        }

        self.depth += 1;
        let result = if self.depth > self.max_depth {
            Err(Error::depth_exceed(format!(
                "object graph nested deeper than {} at {}",
                self.max_depth,
                value.map(|v| v.fast_class().name()).unwrap_or("null")
            )))
        } else {
            match (value, view) {
                (Some(value), Some(view)) => self.dispatch(field, value, view, seen),
                _ => self.write_null(),
            }
        };
        self.depth -= 1;

        self.tracker
            .object_has_been_written(handle, start, self.codec.get_written());
        result
    }

    fn write_null(&mut self) -> Result<(), Error> {
        self.codec.write_tag(Tag::NULL, None, 0, None)?;
        Ok(())
    }

    fn dispatch(
        &mut self,
        field: &FieldInfo,
        value: &dyn FastObject,
        view: ObjectView<'_>,
        seen: Option<usize>,
    ) -> Result<(), Error> {
        match view {
            ObjectView::Null => return self.write_null(),
            ObjectView::Str(s) => return self.write_string(field, value, s, seen),
            ObjectView::Int(v) => {
                self.codec.write_tag(Tag::BIG_INT, None, 0, Some(value))?;
                return self.codec.write_fint(v);
            }
            ObjectView::Long(v) => {
                self.codec.write_tag(Tag::BIG_LONG, None, 0, Some(value))?;
                return self.codec.write_flong(v);
            }
            ObjectView::Bool(v) => {
                let tag = if v {
                    Tag::BIG_BOOLEAN_TRUE
                } else {
                    Tag::BIG_BOOLEAN_FALSE
                };
                self.codec.write_tag(tag, None, 0, Some(value))?;
                return Ok(());
            }
            ObjectView::Enum { ordinal } => return self.write_enum(field, value, ordinal),
            ObjectView::Array(_) | ObjectView::Object => {}
        }
        if field.is_declared_enum() {
            return Err(Error::unsupported_type(format!(
                "{} in enum field {} has no ordinal",
                value.fast_class(),
                field.name()
            )));
        }

        let info = self.get_class_info(field, value.fast_class())?;
        if let Some(offset) = seen {
            if !self
                .codec
                .write_tag(Tag::HANDLE, Some(&*info), offset, Some(value))?
            {
                self.codec.write_cint(offset as u32)?;
            }
            return Ok(());
        }

        if let ObjectView::Array(array) = view {
            if self.codec.write_tag(Tag::ARRAY, Some(&*info), 0, Some(value))? {
                return Ok(());
            }
            return self.write_array(&info, &array);
        }

        match info.get_serializer().cloned() {
            None => {
                if !self.write_object_header(&info, field, value)? {
                    self.default_write_object(value, &info)?;
                    if info.is_externalizable() {
                        self.codec.external_end(&info)?;
                    }
                }
            }
            Some(serializer) => {
                let position = self.codec.get_written();
                if !self.write_object_header(&info, field, value)? {
                    serializer.write_object(self, value, &info, field, position)?;
                    self.codec.external_end(&info)?;
                }
            }
        }
        Ok(())
    }

    fn write_string(
        &mut self,
        field: &FieldInfo,
        value: &dyn FastObject,
        s: &str,
        seen: Option<usize>,
    ) -> Result<(), Error> {
        if let Some(candidates) = field.get_one_of() {
            if let Some(index) = candidates.iter().position(|c| *c == s) {
                ensure!(
                    index <= u8::MAX as usize,
                    Error::encode_error(format!(
                        "one_of index {} of field {} does not fit in a byte",
                        index,
                        field.name()
                    ))
                );
                self.codec.write_tag(Tag::ONE_OF, None, index, Some(value))?;
                return self.codec.write_fbyte(index as u8);
            }
        }
        if let Some(offset) = seen {
            if !self.codec.write_tag(Tag::HANDLE, None, offset, Some(value))? {
                self.codec.write_cint(offset as u32)?;
            }
            return Ok(());
        }
        self.codec.write_tag(Tag::STRING, None, 0, Some(value))?;
        self.codec.write_string_utf(s)
    }

    fn write_enum(
        &mut self,
        field: &FieldInfo,
        value: &dyn FastObject,
        ordinal: i32,
    ) -> Result<(), Error> {
        if self.codec.write_tag(Tag::ENUM, None, 0, Some(value))? {
            return Ok(());
        }
        let info = self.get_class_info(field, value.fast_class())?;
        if info.is_enum() {
            self.codec.write_class(info.class())?;
        } else {
            let enum_class = enclosing_enum(info.class())?;
            self.codec.write_class(&enum_class)?;
        }
        self.codec.write_fint(ordinal)
    }

    /// Writes the object header for `value`. Returns `true` when the codec
    /// consumed the value and no body must follow.
    pub fn write_object_header(
        &mut self,
        info: &ClassInfo,
        field: &FieldInfo,
        value: &dyn FastObject,
    ) -> Result<bool, Error> {
        if field.declared_class() == Some(info.class()) {
            return self.codec.write_tag(Tag::TYPED, Some(info), 0, Some(value));
        }
        if self.codec.write_tag(Tag::OBJECT, Some(info), 0, Some(value))? {
            return Ok(true);
        }
        self.codec.write_class(info.class())?;
        Ok(false)
    }

    /// The default field writer: each field of `info` in schema order.
    pub fn default_write_object(
        &mut self,
        value: &dyn FastObject,
        info: &ClassInfo,
    ) -> Result<(), Error> {
        value.fast_write_fields(self, info)
    }

    /// Writes the array class, the length and the elements.
    pub fn write_array(&mut self, info: &ClassInfo, array: &ArrayView<'_>) -> Result<(), Error> {
        self.codec.write_class(info.class())?;
        self.codec.write_fint(array.len() as i32)?;
        match array {
            ArrayView::Objects(items) => {
                let component = info.component().unwrap_or(&UNTYPED_FIELD);
                for item in items {
                    self.write_object_with_context(component, *item)?;
                }
                Ok(())
            }
            _ => self.codec.write_primitive_array(array),
        }
    }

    /// Schema of `class`, cached on `field` when `class` is its declared class.
    pub fn get_class_info(&self, field: &FieldInfo, class: Class) -> Result<Arc<ClassInfo>, Error> {
        if field.declared_class() != Some(&class) {
            return self.registry.get_class_info(Some(class));
        }
        if let Some(info) = field.cached_info() {
            return Ok(info.clone());
        }
        let info = self.registry.get_class_info(Some(class))?;
        field.cache_info(&info);
        Ok(info)
    }
}

/// Finds the enum a non-enum value with an ordinal belongs to by walking its
/// enclosing classes.
fn enclosing_enum(class: &Class) -> Result<Class, Error> {
    let mut visited = HashSet::new();
    let mut current = class.describe().enclosing;
    while let Some(candidate) = current {
        if !visited.insert(candidate.type_id()) {
            break;
        }
        let desc = candidate.describe();
        if desc.kind.is_enum() {
            return Ok(candidate);
        }
        current = desc.enclosing;
    }
    Err(Error::unsupported_type(format!(
        "can't handle this enum: {}",
        class
    )))
}

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

//! The run-time object model the encoder works against.
//!
//! Every value that can reach [`ObjectOutput`] implements [`FastObject`]. The
//! trait is object safe; the encoder only ever holds `&dyn FastObject` and asks
//! it three questions: which [`Class`] it is, which fast path it qualifies for
//! ([`ObjectView`]), and how to write its declared fields.

use crate::error::Error;
use crate::meta::Class;
use crate::output::ObjectOutput;
use crate::resolver::class_info::{ClassInfo, FieldInfo};
use crate::types::PrimitiveType;
use std::any::Any;

pub mod datetime;
mod list;
mod pointer;
mod primitive;
mod string;
pub mod struct_;

/// A value the encoder can write.
///
/// Implemented for the primitives, `String`, `Vec<T>`, fixed-size arrays,
/// `Option<T>`, `Box<T>`, `Rc<T>`, `Arc<T>`, the chrono date types, and
/// anything using `#[derive(FastObject)]`.
pub trait FastObject: Any {
    /// The concrete class of this value.
    fn fast_class(&self) -> Class;

    /// Which encoding path this value takes.
    fn fast_view(&self) -> ObjectView<'_>;

    /// The value to encode after peeling off `Option` and pointer wrappers.
    /// `None` encodes as `NULL`.
    fn fast_target(&self) -> Option<&dyn FastObject>;

    fn as_any(&self) -> &dyn Any;

    /// A clone of the `Rc` or `Arc` this value is reached through.
    ///
    /// Only such values take part in identity tracking. The encoder holds the
    /// clone until the root write returns, so no other value can take over
    /// the address a handle names.
    fn fast_pin(&self) -> Option<Box<dyn Any>> {
        None
    }

    /// Writes the fields listed in `info`, in the order `info` lists them.
    fn fast_write_fields(&self, _out: &mut ObjectOutput, _info: &ClassInfo) -> Result<(), Error> {
        Ok(())
    }

    /// Writes this value as the content of `field` of an enclosing object.
    ///
    /// Reference values go through the full dispatch. Primitive types
    /// override this with a raw fixed-width write.
    fn fast_write_field(&self, out: &mut ObjectOutput, field: &FieldInfo) -> Result<(), Error>
    where
        Self: Sized,
    {
        out.write_object_with_context(field, Some(self))
    }

    /// Views a slice of this type as array elements.
    fn fast_slice_view(items: &[Self]) -> ArrayView<'_>
    where
        Self: Sized,
    {
        ArrayView::Objects(
            items
                .iter()
                .map(|item| Some(item as &dyn FastObject))
                .collect(),
        )
    }
}

/// How the encoder sees one value.
#[derive(Debug)]
pub enum ObjectView<'a> {
    Null,
    Str(&'a str),
    Int(i32),
    Long(i64),
    Bool(bool),
    Enum { ordinal: i32 },
    Array(ArrayView<'a>),
    Object,
}

impl ObjectView<'_> {
    /// Whether values with this view carry an identity worth tracking.
    pub fn is_shareable(&self) -> bool {
        matches!(
            self,
            ObjectView::Str(_) | ObjectView::Array(_) | ObjectView::Object
        )
    }
}

/// The elements of an array value.
pub enum ArrayView<'a> {
    Bool(&'a [bool]),
    I8(&'a [i8]),
    U8(&'a [u8]),
    I16(&'a [i16]),
    U16(&'a [u16]),
    Char(&'a [char]),
    I32(&'a [i32]),
    U32(&'a [u32]),
    I64(&'a [i64]),
    U64(&'a [u64]),
    F32(&'a [f32]),
    F64(&'a [f64]),
    Objects(Vec<Option<&'a dyn FastObject>>),
}

impl ArrayView<'_> {
    pub fn len(&self) -> usize {
        match self {
            ArrayView::Bool(v) => v.len(),
            ArrayView::I8(v) => v.len(),
            ArrayView::U8(v) => v.len(),
            ArrayView::I16(v) => v.len(),
            ArrayView::U16(v) => v.len(),
            ArrayView::Char(v) => v.len(),
            ArrayView::I32(v) => v.len(),
            ArrayView::U32(v) => v.len(),
            ArrayView::I64(v) => v.len(),
            ArrayView::U64(v) => v.len(),
            ArrayView::F32(v) => v.len(),
            ArrayView::F64(v) => v.len(),
            ArrayView::Objects(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element type of a primitive array, `None` for object arrays.
    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        Some(match self {
            ArrayView::Bool(_) => PrimitiveType::Bool,
            ArrayView::I8(_) => PrimitiveType::I8,
            ArrayView::U8(_) => PrimitiveType::U8,
            ArrayView::I16(_) => PrimitiveType::I16,
            ArrayView::U16(_) => PrimitiveType::U16,
            ArrayView::Char(_) => PrimitiveType::Char,
            ArrayView::I32(_) => PrimitiveType::I32,
            ArrayView::U32(_) => PrimitiveType::U32,
            ArrayView::I64(_) => PrimitiveType::I64,
            ArrayView::U64(_) => PrimitiveType::U64,
            ArrayView::F32(_) => PrimitiveType::F32,
            ArrayView::F64(_) => PrimitiveType::F64,
            ArrayView::Objects(_) => return None,
        })
    }
}

impl std::fmt::Debug for ArrayView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.primitive_type() {
            Some(ty) => write!(f, "ArrayView<{:?}>[{}]", ty, self.len()),
            None => write!(f, "ArrayView<Object>[{}]", self.len()),
        }
    }
}

/// A user-supplied encoder for one class, bound to its [`ClassInfo`] when the
/// schema is computed.
///
/// The encoder writes the object header before calling `write_object` and the
/// codec's externalizable end marker after it. `stream_position` is the
/// offset at which the header started.
pub trait ObjectSerializer: Send + Sync {
    fn write_object(
        &self,
        out: &mut ObjectOutput,
        value: &dyn FastObject,
        info: &ClassInfo,
        field: &FieldInfo,
        stream_position: usize,
    ) -> Result<(), Error>;
}

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

use crate::codec::Codec;
use crate::error::Error;
use crate::meta::{Class, ClassDesc, Reflect};
use crate::output::ObjectOutput;
use crate::resolver::class_info::{ClassInfo, FieldInfo};
use crate::serializer::{ArrayView, FastObject, ObjectView};
use crate::types::PrimitiveType;
use std::any::Any;

// Primitive fields are written raw. A primitive reaching the encoder as a
// top-level value or through `Option` takes the boxed path instead: `i32`,
// `i64` and `bool` have dedicated tags, everything else is an object whose
// body is the raw value.
macro_rules! impl_primitive {
    ($ty:ty, $prim:ident, $view:expr, $write:expr) => {
        impl Reflect for $ty {
            const PRIMITIVE: bool = true;

            fn describe() -> ClassDesc {
                ClassDesc::primitive(PrimitiveType::$prim)
            }
        }

        impl FastObject for $ty {
            fn fast_class(&self) -> Class {
                <$ty as Reflect>::class()
            }

            fn fast_view(&self) -> ObjectView<'_> {
                $view(*self)
            }

            fn fast_target(&self) -> Option<&dyn FastObject> {
                Some(self)
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn fast_write_fields(
                &self,
                out: &mut ObjectOutput,
                _info: &ClassInfo,
            ) -> Result<(), Error> {
                $write(out.codec(), *self)
            }

            #[inline(always)]
            fn fast_write_field(
                &self,
                out: &mut ObjectOutput,
                _field: &FieldInfo,
            ) -> Result<(), Error> {
                $write(out.codec(), *self)
            }

            fn fast_slice_view(items: &[Self]) -> ArrayView<'_> {
                ArrayView::$prim(items)
            }
        }
    };
}

impl_primitive!(
    bool,
    Bool,
    ObjectView::Bool,
    |codec: &mut dyn Codec, v: bool| codec.write_fbyte(v as u8)
);
impl_primitive!(
    i8,
    I8,
    |_| ObjectView::Object,
    |codec: &mut dyn Codec, v: i8| codec.write_fbyte(v as u8)
);
impl_primitive!(
    u8,
    U8,
    |_| ObjectView::Object,
    |codec: &mut dyn Codec, v: u8| codec.write_fbyte(v)
);
impl_primitive!(
    i16,
    I16,
    |_| ObjectView::Object,
    |codec: &mut dyn Codec, v: i16| codec.write_fshort(v)
);
impl_primitive!(
    u16,
    U16,
    |_| ObjectView::Object,
    |codec: &mut dyn Codec, v: u16| codec.write_fshort(v as i16)
);
impl_primitive!(
    char,
    Char,
    |_| ObjectView::Object,
    |codec: &mut dyn Codec, v: char| codec.write_fchar(v)
);
impl_primitive!(
    i32,
    I32,
    ObjectView::Int,
    |codec: &mut dyn Codec, v: i32| codec.write_fint(v)
);
impl_primitive!(
    u32,
    U32,
    |_| ObjectView::Object,
    |codec: &mut dyn Codec, v: u32| codec.write_fint(v as i32)
);
impl_primitive!(
    i64,
    I64,
    ObjectView::Long,
    |codec: &mut dyn Codec, v: i64| codec.write_flong(v)
);
impl_primitive!(
    u64,
    U64,
    |_| ObjectView::Object,
    |codec: &mut dyn Codec, v: u64| codec.write_flong(v as i64)
);
impl_primitive!(
    f32,
    F32,
    |_| ObjectView::Object,
    |codec: &mut dyn Codec, v: f32| codec.write_ffloat(v)
);
impl_primitive!(
    f64,
    F64,
    |_| ObjectView::Object,
    |codec: &mut dyn Codec, v: f64| codec.write_fdouble(v)
);

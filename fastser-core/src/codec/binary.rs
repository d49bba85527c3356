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

use crate::buffer::Writer;
use crate::codec::Codec;
use crate::error::Error;
use crate::meta::Class;
use crate::resolver::class_info::ClassInfo;
use crate::serializer::{ArrayView, FastObject};
use crate::types::Tag;
use std::any::TypeId;
use std::collections::HashMap;
use std::io::Write;

/// Default codec: one byte per tag, little-endian fixed-width values,
/// varuint32 compact ints.
///
/// A class is written as `cint(0)` followed by its name the first time it
/// appears after a reset and as `cint(n)` afterwards, `n` being its 1-based
/// position in the order of first appearance.
#[derive(Default)]
pub struct BinaryCodec {
    writer: Writer,
    sink: Option<Box<dyn Write + Send>>,
    flushed: usize,
    class_ids: HashMap<TypeId, u32>,
}

impl BinaryCodec {
    pub fn new() -> BinaryCodec {
        BinaryCodec::default()
    }

    pub fn with_outstream(sink: Box<dyn Write + Send>) -> BinaryCodec {
        BinaryCodec {
            sink: Some(sink),
            ..BinaryCodec::default()
        }
    }

    fn clear_stream_state(&mut self) {
        self.flushed = 0;
        self.class_ids.clear();
    }
}

impl Codec for BinaryCodec {
    #[inline(always)]
    fn write_tag(
        &mut self,
        tag: Tag,
        _info: Option<&ClassInfo>,
        _index: usize,
        _value: Option<&dyn FastObject>,
    ) -> Result<bool, Error> {
        self.writer.write_i8(tag.as_i8());
        Ok(false)
    }

    #[inline(always)]
    fn write_fbyte(&mut self, v: u8) -> Result<(), Error> {
        self.writer.write_u8(v);
        Ok(())
    }

    #[inline(always)]
    fn write_fshort(&mut self, v: i16) -> Result<(), Error> {
        self.writer.write_i16(v);
        Ok(())
    }

    #[inline(always)]
    fn write_fchar(&mut self, v: char) -> Result<(), Error> {
        self.writer.write_u32(v as u32);
        Ok(())
    }

    #[inline(always)]
    fn write_fint(&mut self, v: i32) -> Result<(), Error> {
        self.writer.write_i32(v);
        Ok(())
    }

    #[inline(always)]
    fn write_flong(&mut self, v: i64) -> Result<(), Error> {
        self.writer.write_i64(v);
        Ok(())
    }

    #[inline(always)]
    fn write_ffloat(&mut self, v: f32) -> Result<(), Error> {
        self.writer.write_f32(v);
        Ok(())
    }

    #[inline(always)]
    fn write_fdouble(&mut self, v: f64) -> Result<(), Error> {
        self.writer.write_f64(v);
        Ok(())
    }

    #[inline(always)]
    fn write_cint(&mut self, v: u32) -> Result<(), Error> {
        self.writer.write_varuint32(v);
        Ok(())
    }

    fn write_string_utf(&mut self, v: &str) -> Result<(), Error> {
        self.writer.write_utf8_string(v);
        Ok(())
    }

    fn write_class(&mut self, class: &Class) -> Result<(), Error> {
        match self.class_ids.get(&class.type_id()) {
            Some(&id) => self.writer.write_varuint32(id),
            None => {
                let id = self.class_ids.len() as u32 + 1;
                self.class_ids.insert(class.type_id(), id);
                self.writer.write_varuint32(0);
                self.writer.write_utf8_string(class.name());
            }
        }
        Ok(())
    }

    fn write_primitive_array(&mut self, array: &ArrayView<'_>) -> Result<(), Error> {
        let writer = &mut self.writer;
        if let Some(ty) = array.primitive_type() {
            writer.reserve(array.len() * ty.size());
        }
        match array {
            ArrayView::Bool(v) => v.iter().for_each(|x| writer.write_u8(*x as u8)),
            ArrayView::I8(v) => v.iter().for_each(|x| writer.write_i8(*x)),
            ArrayView::U8(v) => {
                writer.write_bytes(v);
            }
            ArrayView::I16(v) => v.iter().for_each(|x| writer.write_i16(*x)),
            ArrayView::U16(v) => v.iter().for_each(|x| writer.write_u16(*x)),
            ArrayView::Char(v) => v.iter().for_each(|x| writer.write_u32(*x as u32)),
            ArrayView::I32(v) => v.iter().for_each(|x| writer.write_i32(*x)),
            ArrayView::U32(v) => v.iter().for_each(|x| writer.write_u32(*x)),
            ArrayView::I64(v) => v.iter().for_each(|x| writer.write_i64(*x)),
            ArrayView::U64(v) => v.iter().for_each(|x| writer.write_u64(*x)),
            ArrayView::F32(v) => v.iter().for_each(|x| writer.write_f32(*x)),
            ArrayView::F64(v) => v.iter().for_each(|x| writer.write_f64(*x)),
            ArrayView::Objects(_) => {
                return Err(Error::type_error(
                    "object array passed to write_primitive_array",
                ))
            }
        }
        Ok(())
    }

    #[inline(always)]
    fn get_written(&self) -> usize {
        self.flushed + self.writer.len()
    }

    fn set_outstream(&mut self, sink: Option<Box<dyn Write + Send>>) {
        self.sink = sink;
    }

    fn reset(&mut self) {
        self.writer.reset();
        self.clear_stream_state();
    }

    fn reset_to_buffer(&mut self, buffer: Vec<u8>) {
        self.writer = Writer::from_vec(buffer);
        self.sink = None;
        self.clear_stream_state();
    }

    fn external_end(&mut self, _info: &ClassInfo) -> Result<(), Error> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        if let Some(sink) = self.sink.as_mut() {
            sink.write_all(self.writer.as_slice())?;
            sink.flush()?;
            self.flushed += self.writer.len();
            self.writer.reset();
        }
        Ok(())
    }

    fn buffer(&self) -> &[u8] {
        self.writer.as_slice()
    }

    fn take_buffer(&mut self) -> Vec<u8> {
        self.writer.take()
    }

    fn close(&mut self) -> Result<(), Error> {
        self.flush()?;
        self.sink = None;
        Ok(())
    }
}

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

//! The low-level codec contract and its default binary implementation.
//!
//! The encoder decides what to write; a [`Codec`] decides how the bytes look.
//! Every `write_tag` call may be consumed by the codec: returning `true`
//! tells the encoder the value is fully handled and nothing else is written
//! for it.

use crate::error::Error;
use crate::meta::Class;
use crate::resolver::class_info::ClassInfo;
use crate::serializer::{ArrayView, FastObject};
use crate::types::Tag;
use std::io::Write;

mod binary;

pub use binary::BinaryCodec;

pub trait Codec: Send {
    /// Writes a type tag. `index` carries the `ONE_OF` candidate index or the
    /// `HANDLE` target offset. Returns `true` when the codec has written the
    /// whole value itself. The encoder honours that for `HANDLE`, `ENUM`,
    /// `ARRAY` and object headers; the payloads of `STRING`, `ONE_OF`,
    /// `BIG_INT` and `BIG_LONG` are always written.
    fn write_tag(
        &mut self,
        tag: Tag,
        info: Option<&ClassInfo>,
        index: usize,
        value: Option<&dyn FastObject>,
    ) -> Result<bool, Error>;

    fn write_fbyte(&mut self, v: u8) -> Result<(), Error>;

    fn write_fshort(&mut self, v: i16) -> Result<(), Error>;

    fn write_fchar(&mut self, v: char) -> Result<(), Error>;

    fn write_fint(&mut self, v: i32) -> Result<(), Error>;

    fn write_flong(&mut self, v: i64) -> Result<(), Error>;

    fn write_ffloat(&mut self, v: f32) -> Result<(), Error>;

    fn write_fdouble(&mut self, v: f64) -> Result<(), Error>;

    /// Compact unsigned int.
    fn write_cint(&mut self, v: u32) -> Result<(), Error>;

    fn write_string_utf(&mut self, v: &str) -> Result<(), Error>;

    fn write_class(&mut self, class: &Class) -> Result<(), Error>;

    /// Writes the elements of a primitive array. Object arrays are rejected.
    fn write_primitive_array(&mut self, array: &ArrayView<'_>) -> Result<(), Error>;

    /// Bytes written since the last reset, including bytes already flushed.
    fn get_written(&self) -> usize;

    fn set_outstream(&mut self, sink: Option<Box<dyn Write + Send>>);

    /// Drops buffered bytes and per-stream state; the next byte written is
    /// at offset 0.
    fn reset(&mut self);

    /// Like [`reset`](Self::reset), writing into `buffer` from now on and
    /// detaching any sink.
    fn reset_to_buffer(&mut self, buffer: Vec<u8>);

    /// Hook invoked after an externalizable or custom-serialized body.
    fn external_end(&mut self, info: &ClassInfo) -> Result<(), Error>;

    /// Pushes buffered bytes to the sink, if one is attached.
    fn flush(&mut self) -> Result<(), Error>;

    /// Bytes buffered and not yet flushed.
    fn buffer(&self) -> &[u8];

    fn take_buffer(&mut self) -> Vec<u8>;

    fn close(&mut self) -> Result<(), Error>;
}

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

//! Test helpers shared by the integration tests.

use fastser_core::codec::{BinaryCodec, Codec};
use fastser_core::error::Error;
use fastser_core::fastser::Fastser;
use fastser_core::meta::Class;
use fastser_core::output::ObjectOutput;
use fastser_core::resolver::class_info::ClassInfo;
use fastser_core::serializer::{ArrayView, FastObject};
use fastser_core::types::Tag;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;

/// In-memory sink whose contents stay readable after it is handed to a session.
#[derive(Clone, Default)]
pub struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    pub fn bytes(&self) -> Vec<u8> {
        self.0.lock().clone()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Events recorded by a [`RecordingCodec`], readable after the codec moved
/// into a session.
pub type EventLog = Arc<Mutex<Vec<Event>>>;

/// One codec call, as seen by [`RecordingCodec`].
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Tag { tag: Tag, index: usize },
    Class(&'static str),
    Byte(u8),
    Int(i32),
    Long(i64),
    Cint(u32),
    Utf(String),
    PrimitiveArray(usize),
    ExternalEnd(&'static str),
}

/// Codec recording every call before delegating to [`BinaryCodec`].
///
/// Tags listed in `consumed` are reported as handled by the codec.
pub struct RecordingCodec {
    inner: BinaryCodec,
    events: EventLog,
    consumed: HashSet<Tag>,
}

impl RecordingCodec {
    pub fn new() -> (RecordingCodec, EventLog) {
        Self::consuming(&[])
    }

    pub fn consuming(tags: &[Tag]) -> (RecordingCodec, EventLog) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let codec = RecordingCodec {
            inner: BinaryCodec::new(),
            events: events.clone(),
            consumed: tags.iter().copied().collect(),
        };
        (codec, events)
    }

    fn record(&self, event: Event) {
        self.events.lock().push(event);
    }
}

impl Codec for RecordingCodec {
    fn write_tag(
        &mut self,
        tag: Tag,
        info: Option<&ClassInfo>,
        index: usize,
        value: Option<&dyn FastObject>,
    ) -> Result<bool, Error> {
        self.record(Event::Tag { tag, index });
        if self.consumed.contains(&tag) {
            return Ok(true);
        }
        self.inner.write_tag(tag, info, index, value)
    }

    fn write_fbyte(&mut self, v: u8) -> Result<(), Error> {
        self.record(Event::Byte(v));
        self.inner.write_fbyte(v)
    }

    fn write_fshort(&mut self, v: i16) -> Result<(), Error> {
        self.inner.write_fshort(v)
    }

    fn write_fchar(&mut self, v: char) -> Result<(), Error> {
        self.inner.write_fchar(v)
    }

    fn write_fint(&mut self, v: i32) -> Result<(), Error> {
        self.record(Event::Int(v));
        self.inner.write_fint(v)
    }

    fn write_flong(&mut self, v: i64) -> Result<(), Error> {
        self.record(Event::Long(v));
        self.inner.write_flong(v)
    }

    fn write_ffloat(&mut self, v: f32) -> Result<(), Error> {
        self.inner.write_ffloat(v)
    }

    fn write_fdouble(&mut self, v: f64) -> Result<(), Error> {
        self.inner.write_fdouble(v)
    }

    fn write_cint(&mut self, v: u32) -> Result<(), Error> {
        self.record(Event::Cint(v));
        self.inner.write_cint(v)
    }

    fn write_string_utf(&mut self, v: &str) -> Result<(), Error> {
        self.record(Event::Utf(v.to_string()));
        self.inner.write_string_utf(v)
    }

    fn write_class(&mut self, class: &Class) -> Result<(), Error> {
        self.record(Event::Class(class.name()));
        self.inner.write_class(class)
    }

    fn write_primitive_array(&mut self, array: &ArrayView<'_>) -> Result<(), Error> {
        self.record(Event::PrimitiveArray(array.len()));
        self.inner.write_primitive_array(array)
    }

    fn get_written(&self) -> usize {
        self.inner.get_written()
    }

    fn set_outstream(&mut self, sink: Option<Box<dyn Write + Send>>) {
        self.inner.set_outstream(sink)
    }

    fn reset(&mut self) {
        self.events.lock().clear();
        self.inner.reset()
    }

    fn reset_to_buffer(&mut self, buffer: Vec<u8>) {
        self.events.lock().clear();
        self.inner.reset_to_buffer(buffer)
    }

    fn external_end(&mut self, info: &ClassInfo) -> Result<(), Error> {
        self.record(Event::ExternalEnd(info.class().name()));
        self.inner.external_end(info)
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.inner.flush()
    }

    fn buffer(&self) -> &[u8] {
        self.inner.buffer()
    }

    fn take_buffer(&mut self) -> Vec<u8> {
        self.inner.take_buffer()
    }

    fn close(&mut self) -> Result<(), Error> {
        self.inner.close()
    }
}

/// Routes encoder logs to the test output. Filter with `RUST_LOG`.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}

/// Shorthand for a tag event without index.
pub fn tag(tag: Tag) -> Event {
    Event::Tag { tag, index: 0 }
}

/// Unshared session recording its codec calls.
pub fn recording_session(fastser: &Fastser, consumed: &[Tag]) -> (ObjectOutput, EventLog) {
    let (codec, events) = RecordingCodec::consuming(consumed);
    (
        ObjectOutput::no_shared_with_codec(fastser, Box::new(codec)),
        events,
    )
}

/// Session following the share flag of `fastser`, recording its codec calls.
pub fn recording_shared_session(fastser: &Fastser) -> (ObjectOutput, EventLog) {
    let (codec, events) = RecordingCodec::new();
    (ObjectOutput::with_codec(fastser, Box::new(codec)), events)
}

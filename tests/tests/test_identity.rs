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

use chrono::NaiveDate;
use fastser_core::codec::BinaryCodec;
use fastser_core::error::Error;
use fastser_core::meta::{Class, ClassDesc, FieldDesc, Reflect};
use fastser_core::output::ObjectOutput;
use fastser_core::resolver::class_info::{ClassInfo, FieldInfo};
use fastser_core::resolver::class_registry::ClassInfoRegistry;
use fastser_core::resolver::identity::{IdentityTracker, ObjectHandle, Span};
use fastser_core::serializer::{FastObject, ObjectSerializer, ObjectView};
use fastser_core::types::{self, Tag};
use fastser_core::Fastser;
use fastser_derive::FastObject;
use parking_lot::Mutex;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use tests::{recording_session, recording_shared_session, tag, Event};

#[derive(FastObject)]
struct Label {
    id: i32,
}

#[derive(FastObject)]
struct Pair {
    left: Rc<Label>,
    right: Rc<Label>,
}

#[derive(FastObject)]
struct Dated {
    date: NaiveDate,
}

/// Singly linked node that can point back at itself.
struct Node {
    next: RefCell<Option<Rc<Node>>>,
}

impl Reflect for Node {
    fn describe() -> ClassDesc {
        ClassDesc::structure().field(FieldDesc::of::<Option<Rc<Node>>>("next", 0))
    }
}

impl FastObject for Node {
    fn fast_class(&self) -> Class {
        Node::class()
    }

    fn fast_view(&self) -> ObjectView<'_> {
        ObjectView::Object
    }

    fn fast_target(&self) -> Option<&dyn FastObject> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn fast_write_fields(&self, out: &mut ObjectOutput, info: &ClassInfo) -> Result<(), Error> {
        for field in info.fields() {
            let next = self.next.borrow();
            out.write_object_with_context(field, next.as_ref().map(|n| n as &dyn FastObject))?;
        }
        Ok(())
    }
}

fn self_loop() -> Rc<Node> {
    let node = Rc::new(Node {
        next: RefCell::new(None),
    });
    *node.next.borrow_mut() = Some(node.clone());
    node
}

fn shared_pair() -> Pair {
    let label = Rc::new(Label { id: 7 });
    Pair {
        left: label.clone(),
        right: label,
    }
}

#[test]
fn test_second_reference_is_handle() {
    let fastser = Fastser::default();
    let (mut out, events) = recording_shared_session(&fastser);
    out.write_object(&shared_pair()).unwrap();

    // OBJECT tag, new-class marker, name length, name
    let left_at = 3 + Pair::class_name().len();
    assert_eq!(out.buffer()[left_at] as i8, types::TYPED);
    assert_eq!(
        *events.lock(),
        vec![
            tag(Tag::OBJECT),
            Event::Class(Pair::class_name()),
            tag(Tag::TYPED),
            Event::Int(7),
            Event::Tag {
                tag: Tag::HANDLE,
                index: left_at
            },
            Event::Cint(left_at as u32),
        ]
    );
}

#[test]
fn test_equal_values_are_not_shared() {
    let fastser = Fastser::default();
    let (mut out, events) = recording_shared_session(&fastser);
    out.write_object(&Pair {
        left: Rc::new(Label { id: 7 }),
        right: Rc::new(Label { id: 7 }),
    })
    .unwrap();

    let typed = events
        .lock()
        .iter()
        .filter(|e| **e == tag(Tag::TYPED))
        .count();
    assert_eq!(typed, 2);
}

#[test]
fn test_shared_strings() {
    let fastser = Fastser::default();
    let mut out = fastser.get_object_output();
    let text = Rc::new(String::from("abc"));
    out.write_object(&vec![text.clone(), text]).unwrap();

    let bytes = out.buffer();
    let name_len = <Vec<Rc<String>>>::class_name().len();
    // ARRAY tag, class, length
    let first = 1 + 2 + name_len + 4;
    assert_eq!(bytes[first] as i8, types::STRING);
    assert_eq!(&bytes[first + 1..first + 5], &[3, b'a', b'b', b'c']);
    assert_eq!(bytes[first + 5] as i8, types::HANDLE);
    assert_eq!(bytes[first + 6] as usize, first);
}

#[test]
fn test_identities_scoped_to_root_write() {
    let fastser = Fastser::default();
    let (mut out, events) = recording_shared_session(&fastser);
    let label = Rc::new(Label { id: 1 });
    out.write_object(&label).unwrap();
    assert!(out.identities().is_empty());
    out.write_object(&label).unwrap();

    let events = events.lock();
    assert_eq!(events.len(), 6);
    assert_eq!(events[..3], events[3..]);
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::Tag { tag: Tag::HANDLE, .. })));
}

#[test]
fn test_self_cycle_terminates_when_shared() {
    let fastser = Fastser::default();
    let (mut out, events) = recording_shared_session(&fastser);
    let node = self_loop();
    out.write_object(&node).unwrap();
    *node.next.borrow_mut() = None;

    assert_eq!(
        *events.lock(),
        vec![
            tag(Tag::OBJECT),
            Event::Class(Node::class_name()),
            Event::Tag {
                tag: Tag::HANDLE,
                index: 0
            },
            Event::Cint(0),
        ]
    );
}

#[test]
fn test_self_cycle_exceeds_depth_when_unshared() {
    let fastser = Fastser::default().max_depth(64);
    let (mut out, _events) = recording_session(&fastser, &[]);
    let node = self_loop();
    let result = out.write_object(&node);
    *node.next.borrow_mut() = None;

    assert!(matches!(result, Err(Error::DepthExceed(_))));
    // the session stays usable
    out.reset_for_reuse(None).unwrap();
    out.write_object(&Label { id: 3 }).unwrap();
}

#[test]
fn test_unshared_writes_every_reference() {
    let fastser = Fastser::default();
    let (mut out, events) = recording_session(&fastser, &[]);
    out.write_object(&shared_pair()).unwrap();

    assert!(!out.is_shared());
    assert!(out.identities().is_empty());
    let events = events.lock();
    assert_eq!(events[2..4], [tag(Tag::TYPED), Event::Int(7)]);
    assert_eq!(events[4..], [tag(Tag::TYPED), Event::Int(7)]);
}

fn is_handle(event: &Event) -> bool {
    matches!(event, Event::Tag { tag: Tag::HANDLE, .. })
}

#[test]
fn test_unshared_strings_are_written_in_full() {
    let fastser = Fastser::default();
    let (mut out, events) = recording_session(&fastser, &[]);
    let same = Rc::new(String::from("hello"));
    let encoding = [types::STRING as u8, 5, b'h', b'e', b'l', b'l', b'o'];

    out.write_object(&vec![
        Rc::new(String::from("hello")),
        Rc::new(String::from("hello")),
        same.clone(),
        same,
    ])
    .unwrap();
    assert!(out.take_buffer().ends_with(&encoding.repeat(4)));

    out.write_object(&vec![String::from("hello"), String::from("hello")])
        .unwrap();
    assert!(out.take_buffer().ends_with(&encoding.repeat(2)));

    let events = events.lock();
    assert_eq!(events.iter().filter(|e| **e == tag(Tag::STRING)).count(), 6);
    assert_eq!(
        events
            .iter()
            .filter(|e| **e == Event::Utf("hello".to_string()))
            .count(),
        6
    );
    assert!(!events.iter().any(is_handle));
}

#[test]
fn test_shared_equal_strings_are_not_deduplicated() {
    let fastser = Fastser::default();
    let (mut out, events) = recording_shared_session(&fastser);
    assert!(out.is_shared());
    out.write_object(&vec![
        Rc::new(String::from("hello")),
        Rc::new(String::from("hello")),
    ])
    .unwrap();
    out.write_object(&vec![String::from("hello"), String::from("hello")])
        .unwrap();

    let events = events.lock();
    assert_eq!(events.iter().filter(|e| **e == tag(Tag::STRING)).count(), 4);
    assert!(!events.iter().any(is_handle));
}

#[derive(FastObject)]
struct Ids {
    ids: Vec<i32>,
}

/// Writes every id as a string built while writing, optionally behind an `Rc`.
struct IdsAsText {
    boxed: bool,
}

impl ObjectSerializer for IdsAsText {
    fn write_object(
        &self,
        out: &mut ObjectOutput,
        value: &dyn FastObject,
        _info: &ClassInfo,
        _field: &FieldInfo,
        _stream_position: usize,
    ) -> Result<(), Error> {
        let ids = value
            .as_any()
            .downcast_ref::<Ids>()
            .ok_or_else(|| Error::type_error("expected Ids"))?;
        let field = FieldInfo::typed(String::class());
        for id in &ids.ids {
            if self.boxed {
                let text = Rc::new(id.to_string());
                out.write_object_with_context(&field, Some(&text))?;
            } else {
                let text = id.to_string();
                out.write_object_with_context(&field, Some(&text))?;
            }
        }
        Ok(())
    }
}

fn written_strings(boxed: bool) -> Vec<Event> {
    let fastser = Fastser::default();
    fastser.register_serializer::<Ids>(IdsAsText { boxed }, false);
    let (mut out, events) = recording_shared_session(&fastser);
    out.write_object(&Ids { ids: vec![1, 2, 3] }).unwrap();
    let written = events
        .lock()
        .iter()
        .filter(|e| is_handle(e) || **e == tag(Tag::STRING) || matches!(e, Event::Utf(_)))
        .cloned()
        .collect();
    written
}

#[test]
fn test_values_built_while_writing_are_not_handles() {
    let expected: Vec<Event> = (1..=3)
        .flat_map(|id| [tag(Tag::STRING), Event::Utf(id.to_string())])
        .collect();
    assert_eq!(written_strings(false), expected);
    assert_eq!(written_strings(true), expected);
}

#[test]
fn test_pins_released_after_root_write() {
    let fastser = Fastser::default();
    let (mut out, _events) = recording_shared_session(&fastser);
    let label = Rc::new(Label { id: 5 });
    let pair = Pair {
        left: label.clone(),
        right: label.clone(),
    };
    out.write_object(&pair).unwrap();
    assert!(out.identities().is_empty());
    drop(pair);
    assert_eq!(Rc::strong_count(&label), 1);
}

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Will(usize),
    Has(usize, usize),
}

/// Tracker recording the bracket calls it receives.
#[derive(Clone, Default)]
struct SpyTracker(Arc<Mutex<Vec<Call>>>);

impl IdentityTracker for SpyTracker {
    fn is_enabled(&self) -> bool {
        true
    }

    fn object_will_be_written(
        &mut self,
        _handle: Option<ObjectHandle>,
        start: usize,
    ) -> Option<usize> {
        self.0.lock().push(Call::Will(start));
        None
    }

    fn object_has_been_written(&mut self, _handle: Option<ObjectHandle>, start: usize, end: usize) {
        self.0.lock().push(Call::Has(start, end));
    }

    fn lookup(&self, _handle: &ObjectHandle) -> Option<Span> {
        None
    }

    fn len(&self) -> usize {
        0
    }

    fn reset(&mut self) {}
}

fn spy_session(registry: Arc<ClassInfoRegistry>) -> (ObjectOutput, SpyTracker) {
    let spy = SpyTracker::default();
    let out = ObjectOutput::with_parts(
        registry,
        Box::new(BinaryCodec::new()),
        Box::new(spy.clone()),
        64,
    );
    (out, spy)
}

#[test]
fn test_every_value_is_bracketed() {
    let (mut out, spy) = spy_session(Arc::new(ClassInfoRegistry::new()));
    out.write_object(&Label { id: 1 }).unwrap();
    let end = out.get_written();

    assert_eq!(*spy.0.lock(), vec![Call::Will(0), Call::Has(0, end)]);
}

#[test]
fn test_bracket_closes_on_error() {
    // no serializer for NaiveDate in a bare registry
    let (mut out, spy) = spy_session(Arc::new(ClassInfoRegistry::new()));
    let result = out.write_object(&Dated {
        date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
    });
    assert!(matches!(result, Err(Error::TypeError(_))));

    let calls = spy.0.lock();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], Call::Will(0));
    assert!(matches!(calls[1], Call::Will(_)));
    assert!(matches!(calls[2], Call::Has(_, _)));
    assert!(matches!(calls[3], Call::Has(0, _)));
}

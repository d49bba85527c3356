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

use fastser_core::meta::Reflect;
use fastser_core::output::ObjectOutput;
use fastser_core::types::{self, Tag};
use fastser_core::Fastser;
use fastser_derive::FastObject;
use tests::{recording_session, tag, Event};

#[derive(FastObject)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(FastObject)]
struct Polyline {
    points: Vec<Point>,
    weights: [f32; 2],
}

#[test]
fn test_primitive_array() {
    let fastser = Fastser::default();
    let (mut out, events) = recording_session(&fastser, &[]);
    out.write_object(&vec![1i32, 2, 3]).unwrap();

    assert_eq!(
        *events.lock(),
        vec![
            tag(Tag::ARRAY),
            Event::Class(<Vec<i32>>::class_name()),
            Event::Int(3),
            Event::PrimitiveArray(3),
        ]
    );
    let bytes = out.buffer();
    assert_eq!(
        &bytes[bytes.len() - 12..],
        &[1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0]
    );
}

#[test]
fn test_byte_array_layout() {
    let fastser = Fastser::default();
    let mut out = ObjectOutput::no_shared(&fastser);
    out.write_object(&vec![9u8, 8]).unwrap();

    let name = <Vec<u8>>::class_name();
    let mut expected = vec![types::ARRAY as u8, 0, name.len() as u8];
    expected.extend_from_slice(name.as_bytes());
    expected.extend_from_slice(&[2, 0, 0, 0, 9, 8]);
    assert_eq!(out.buffer(), expected.as_slice());
}

#[test]
fn test_object_array_elements_go_through_engine() {
    let fastser = Fastser::default();
    let (mut out, events) = recording_session(&fastser, &[]);
    let values = vec![Some("x".to_string()), None, Some("y".to_string())];
    out.write_object(&values).unwrap();

    assert_eq!(
        events.lock()[2..],
        [
            Event::Int(3),
            tag(Tag::STRING),
            Event::Utf("x".to_string()),
            tag(Tag::NULL),
            tag(Tag::STRING),
            Event::Utf("y".to_string()),
        ]
    );
}

#[test]
fn test_array_elements_use_component_class() {
    let fastser = Fastser::default();
    let (mut out, events) = recording_session(&fastser, &[]);
    out.write_object(&Polyline {
        points: vec![Point { x: 1, y: 2 }],
        weights: [0.5, 2.0],
    })
    .unwrap();

    assert_eq!(
        *events.lock(),
        vec![
            tag(Tag::OBJECT),
            Event::Class(Polyline::class_name()),
            tag(Tag::ARRAY),
            Event::Class(<Vec<Point>>::class_name()),
            Event::Int(1),
            tag(Tag::TYPED),
            Event::Int(1),
            Event::Int(2),
            tag(Tag::ARRAY),
            Event::Class(<[f32; 2]>::class_name()),
            Event::Int(2),
            Event::PrimitiveArray(2),
        ]
    );
}

#[test]
fn test_consumed_array_tag_suppresses_body() {
    let fastser = Fastser::default();
    let (mut out, events) = recording_session(&fastser, &[Tag::ARRAY]);
    out.write_object(&vec![1i64, 2]).unwrap();

    assert_eq!(*events.lock(), vec![tag(Tag::ARRAY)]);
    assert!(out.buffer().is_empty());
}

#[test]
fn test_empty_array() {
    let fastser = Fastser::default();
    let (mut out, events) = recording_session(&fastser, &[]);
    out.write_object(&Vec::<String>::new()).unwrap();

    assert_eq!(events.lock()[2..], [Event::Int(0)]);
}

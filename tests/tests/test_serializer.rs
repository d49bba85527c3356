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

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use fastser_core::error::Error;
use fastser_core::meta::{Class, Reflect};
use fastser_core::output::ObjectOutput;
use fastser_core::resolver::class_info::{ClassInfo, FieldInfo};
use fastser_core::resolver::serializer_registry::SerializerRegistryDelegate;
use fastser_core::serializer::{FastObject, ObjectSerializer};
use fastser_core::types::Tag;
use fastser_core::Fastser;
use fastser_derive::FastObject;
use parking_lot::Mutex;
use std::sync::Arc;
use tests::{recording_session, tag, Event};

#[derive(FastObject)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(FastObject)]
struct Shape;

#[derive(FastObject)]
#[fastser(extends(Shape))]
struct Circle {
    radius: i32,
}

#[derive(FastObject)]
#[fastser(extends(Circle))]
struct Ring {
    radius: i32,
    inner: i32,
}

/// Writes the sum of the coordinates and remembers where each header began.
#[derive(Default)]
struct SumSerializer {
    positions: Arc<Mutex<Vec<usize>>>,
}

impl ObjectSerializer for SumSerializer {
    fn write_object(
        &self,
        out: &mut ObjectOutput,
        value: &dyn FastObject,
        _info: &ClassInfo,
        _field: &FieldInfo,
        stream_position: usize,
    ) -> Result<(), Error> {
        self.positions.lock().push(stream_position);
        let point = value
            .as_any()
            .downcast_ref::<Point>()
            .ok_or_else(|| Error::type_error("expected a Point"))?;
        out.codec().write_fint(point.x + point.y)
    }
}

/// Writes a marker byte for any shape.
struct MarkerSerializer(u8);

impl ObjectSerializer for MarkerSerializer {
    fn write_object(
        &self,
        out: &mut ObjectOutput,
        _value: &dyn FastObject,
        _info: &ClassInfo,
        _field: &FieldInfo,
        _stream_position: usize,
    ) -> Result<(), Error> {
        out.codec().write_fbyte(self.0)
    }
}

struct RingDelegate;

impl SerializerRegistryDelegate for RingDelegate {
    fn get_serializer(&self, class: &Class) -> Option<Arc<dyn ObjectSerializer>> {
        if *class == Ring::class() {
            Some(Arc::new(MarkerSerializer(0xEE)))
        } else {
            None
        }
    }
}

#[test]
fn test_custom_serializer_receives_header_position() {
    let fastser = Fastser::default();
    let serializer = SumSerializer::default();
    let positions = serializer.positions.clone();
    fastser.register_serializer::<Point>(serializer, false);

    let (mut out, events) = recording_session(&fastser, &[]);
    out.write_object(&"prefix".to_string()).unwrap();
    let header_at = out.get_written();
    out.write_object(&Point { x: 2, y: 5 }).unwrap();

    assert_eq!(*positions.lock(), vec![header_at]);
    assert_eq!(
        events.lock()[2..],
        [
            tag(Tag::OBJECT),
            Event::Class(Point::class_name()),
            Event::Int(7),
            Event::ExternalEnd(Point::class_name()),
        ]
    );
}

#[test]
fn test_serializer_for_subclasses() {
    let fastser = Fastser::default();
    fastser.register_serializer::<Shape>(MarkerSerializer(1), true);

    let (mut out, events) = recording_session(&fastser, &[]);
    out.write_object(&Ring {
        radius: 3,
        inner: 1,
    })
    .unwrap();

    assert_eq!(events.lock()[2], Event::Byte(1));
}

#[test]
fn test_exact_only_serializer_skips_subclasses() {
    let fastser = Fastser::default();
    fastser.register_serializer::<Shape>(MarkerSerializer(1), false);

    let info = fastser.get_class_info::<Circle>().unwrap();
    assert!(info.get_serializer().is_none());
    let info = fastser.get_class_info::<Shape>().unwrap();
    assert!(info.get_serializer().is_some());
}

#[test]
fn test_delegate_is_consulted_first() {
    let fastser = Fastser::default();
    fastser.register_serializer::<Shape>(MarkerSerializer(1), true);
    fastser.set_serializer_registry_delegate(Some(Arc::new(RingDelegate)));

    let (mut out, events) = recording_session(&fastser, &[]);
    out.write_object(&Ring {
        radius: 3,
        inner: 1,
    })
    .unwrap();
    out.write_object(&Circle { radius: 2 }).unwrap();

    let events = events.lock();
    assert_eq!(events[2], Event::Byte(0xEE));
    assert_eq!(events[6], Event::Byte(1));
}

#[test]
fn test_registration_after_schema_is_not_retroactive() {
    let fastser = Fastser::default();
    let before = fastser.get_class_info::<Point>().unwrap();
    fastser.register_serializer::<Point>(SumSerializer::default(), false);

    let after = fastser.get_class_info::<Point>().unwrap();
    assert!(Arc::ptr_eq(&before, &after));
    assert!(after.get_serializer().is_none());
}

#[test]
fn test_chrono_values() {
    let fastser = Fastser::default();
    let (mut out, events) = recording_session(&fastser, &[]);
    let date = NaiveDate::from_ymd_opt(1970, 1, 11).unwrap();
    let date_time: NaiveDateTime = date.and_hms_opt(0, 0, 1).unwrap();
    let utc: DateTime<Utc> = date_time.and_utc();
    out.write_object(&date).unwrap();
    out.write_object(&date_time).unwrap();
    out.write_object(&utc).unwrap();

    let micros = (10 * 86_400 + 1) * 1_000_000i64;
    let events = events.lock();
    assert_eq!(events[2], Event::Long(10));
    assert_eq!(events[3], Event::ExternalEnd(NaiveDate::class_name()));
    assert_eq!(events[6], Event::Long(micros));
    assert_eq!(events[10], Event::Long(micros));
}

#[test]
fn test_chrono_without_serializer_is_type_error() {
    let registry = Arc::new(fastser_core::ClassInfoRegistry::new());
    let mut out = ObjectOutput::with_parts(
        registry,
        Box::new(fastser_core::BinaryCodec::new()),
        Box::new(fastser_core::resolver::identity::NoIdentity),
        64,
    );
    let date = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
    assert!(matches!(
        out.write_object(&date),
        Err(Error::TypeError(_))
    ));
}

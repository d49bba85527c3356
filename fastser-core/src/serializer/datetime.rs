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

//! chrono date types. They carry no declared fields; their encoding lives in
//! the serializers that [`register_default_serializers`] binds, which
//! `Fastser` installs on construction.

use crate::error::Error;
use crate::meta::{Class, ClassDesc, Reflect};
use crate::output::ObjectOutput;
use crate::resolver::class_info::{ClassInfo, FieldInfo};
use crate::resolver::serializer_registry::SerializerRegistry;
use crate::serializer::{FastObject, ObjectSerializer, ObjectView};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::any::Any;
use std::sync::Arc;

pub const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    None => panic!("Unreachable code"),
    Some(epoch) => epoch,
};

macro_rules! impl_date_object {
    ($ty:ty) => {
        impl Reflect for $ty {
            fn describe() -> ClassDesc {
                ClassDesc::structure()
            }
        }

        impl FastObject for $ty {
            fn fast_class(&self) -> Class {
                <$ty as Reflect>::class()
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

            fn fast_write_fields(
                &self,
                _out: &mut ObjectOutput,
                info: &ClassInfo,
            ) -> Result<(), Error> {
                Err(Error::type_error(format!(
                    "no serializer registered for {}",
                    info.class()
                )))
            }
        }
    };
}

impl_date_object!(NaiveDate);
impl_date_object!(NaiveDateTime);
impl_date_object!(DateTime<Utc>);

fn downcast<'a, T: 'static>(value: &'a dyn FastObject, info: &ClassInfo) -> Result<&'a T, Error> {
    value.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::type_error(format!(
            "serializer for {} received {}",
            info.class(),
            value.fast_class()
        ))
    })
}

/// Days since 1970-01-01 as an 8-byte int.
pub struct NaiveDateSerializer;

impl ObjectSerializer for NaiveDateSerializer {
    fn write_object(
        &self,
        out: &mut ObjectOutput,
        value: &dyn FastObject,
        info: &ClassInfo,
        _field: &FieldInfo,
        _stream_position: usize,
    ) -> Result<(), Error> {
        let date = downcast::<NaiveDate>(value, info)?;
        let days = date.signed_duration_since(EPOCH).num_days();
        out.codec().write_flong(days)
    }
}

/// Microseconds since the epoch as an 8-byte int.
pub struct NaiveDateTimeSerializer;

impl ObjectSerializer for NaiveDateTimeSerializer {
    fn write_object(
        &self,
        out: &mut ObjectOutput,
        value: &dyn FastObject,
        info: &ClassInfo,
        _field: &FieldInfo,
        _stream_position: usize,
    ) -> Result<(), Error> {
        let dt = downcast::<NaiveDateTime>(value, info)?.and_utc();
        out.codec().write_flong(timestamp_micros(&dt))
    }
}

/// Same layout as [`NaiveDateTimeSerializer`].
pub struct UtcDateTimeSerializer;

impl ObjectSerializer for UtcDateTimeSerializer {
    fn write_object(
        &self,
        out: &mut ObjectOutput,
        value: &dyn FastObject,
        info: &ClassInfo,
        _field: &FieldInfo,
        _stream_position: usize,
    ) -> Result<(), Error> {
        let dt = downcast::<DateTime<Utc>>(value, info)?;
        out.codec().write_flong(timestamp_micros(dt))
    }
}

fn timestamp_micros(dt: &DateTime<Utc>) -> i64 {
    dt.timestamp() * 1_000_000 + dt.timestamp_subsec_micros() as i64
}

pub fn register_default_serializers(registry: &SerializerRegistry) {
    registry.put_serializer(
        NaiveDate::class(),
        Arc::new(NaiveDateSerializer),
        false,
    );
    registry.put_serializer(
        NaiveDateTime::class(),
        Arc::new(NaiveDateTimeSerializer),
        false,
    );
    registry.put_serializer(
        <DateTime<Utc>>::class(),
        Arc::new(UtcDateTimeSerializer),
        false,
    );
}

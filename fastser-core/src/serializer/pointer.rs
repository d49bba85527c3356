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

//! `Option` and the pointer types are transparent: they report the class of
//! the wrapped type and hand the wrapped value to the encoder. For `Rc` and
//! `Arc` that value lives at the shared allocation, so every clone of one
//! pointer resolves to the same identity. They are also the only wrappers
//! that pin their target, which makes it eligible for back-references.

use crate::error::Error;
use crate::meta::{Class, ClassDesc, Reflect};
use crate::output::ObjectOutput;
use crate::resolver::class_info::ClassInfo;
use crate::serializer::{ArrayView, FastObject, ObjectView};
use std::any::Any;
use std::rc::Rc;
use std::sync::Arc;

impl<T: FastObject + Reflect> Reflect for Option<T> {
    fn class() -> Class {
        T::class()
    }

    fn class_name() -> &'static str {
        T::class_name()
    }

    fn describe() -> ClassDesc {
        T::describe()
    }
}

impl<T: FastObject + Reflect> FastObject for Option<T> {
    fn fast_class(&self) -> Class {
        T::class()
    }

    fn fast_view(&self) -> ObjectView<'_> {
        match self {
            Some(value) => value.fast_view(),
            None => ObjectView::Null,
        }
    }

    fn fast_target(&self) -> Option<&dyn FastObject> {
        self.as_ref().and_then(|value| value.fast_target())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn fast_pin(&self) -> Option<Box<dyn Any>> {
        self.as_ref().and_then(|value| value.fast_pin())
    }

    fn fast_write_fields(&self, out: &mut ObjectOutput, info: &ClassInfo) -> Result<(), Error> {
        match self {
            Some(value) => value.fast_write_fields(out, info),
            None => Ok(()),
        }
    }

    fn fast_slice_view(items: &[Self]) -> ArrayView<'_> {
        ArrayView::Objects(
            items
                .iter()
                .map(|item| item.as_ref().map(|value| value as &dyn FastObject))
                .collect(),
        )
    }
}

#[allow(clippy::borrowed_box)]
fn pin_boxed<T: FastObject>(boxed: &Box<T>) -> Option<Box<dyn Any>> {
    (**boxed).fast_pin()
}

fn pin_rc<T: FastObject>(rc: &Rc<T>) -> Option<Box<dyn Any>> {
    let pinned: Box<dyn Any> = Box::new(rc.clone());
    Some(pinned)
}

fn pin_arc<T: FastObject>(arc: &Arc<T>) -> Option<Box<dyn Any>> {
    let pinned: Box<dyn Any> = Box::new(arc.clone());
    Some(pinned)
}

macro_rules! impl_pointer {
    ($ptr:ident, $pin:ident) => {
        impl<T: FastObject + Reflect> Reflect for $ptr<T> {
            fn class() -> Class {
                T::class()
            }

            fn class_name() -> &'static str {
                T::class_name()
            }

            fn describe() -> ClassDesc {
                T::describe()
            }
        }

        impl<T: FastObject + Reflect> FastObject for $ptr<T> {
            fn fast_class(&self) -> Class {
                T::class()
            }

            fn fast_view(&self) -> ObjectView<'_> {
                (**self).fast_view()
            }

            fn fast_target(&self) -> Option<&dyn FastObject> {
                (**self).fast_target()
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn fast_pin(&self) -> Option<Box<dyn Any>> {
                $pin(self)
            }

            fn fast_write_fields(
                &self,
                out: &mut ObjectOutput,
                info: &ClassInfo,
            ) -> Result<(), Error> {
                (**self).fast_write_fields(out, info)
            }
        }
    };
}

impl_pointer!(Box, pin_boxed);
impl_pointer!(Rc, pin_rc);
impl_pointer!(Arc, pin_arc);

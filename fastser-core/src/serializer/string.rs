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

use crate::meta::{Class, ClassDesc, Reflect};
use crate::serializer::{FastObject, ObjectView};
use std::any::Any;

impl Reflect for String {
    fn describe() -> ClassDesc {
        ClassDesc::string()
    }
}

impl FastObject for String {
    fn fast_class(&self) -> Class {
        <String as Reflect>::class()
    }

    fn fast_view(&self) -> ObjectView<'_> {
        ObjectView::Str(self.as_str())
    }

    fn fast_target(&self) -> Option<&dyn FastObject> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Reflect for &'static str {
    fn class_name() -> &'static str {
        "str"
    }

    fn describe() -> ClassDesc {
        ClassDesc::string()
    }
}

impl FastObject for &'static str {
    fn fast_class(&self) -> Class {
        <&'static str as Reflect>::class()
    }

    fn fast_view(&self) -> ObjectView<'_> {
        ObjectView::Str(*self)
    }

    fn fast_target(&self) -> Option<&dyn FastObject> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

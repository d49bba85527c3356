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

//! # Fastser
//!
//! Fast binary serialization of object graphs. Each type's schema is
//! described once, at compile time, by `#[derive(FastObject)]` and cached per
//! [`Fastser`] instance the first time the type is written.
//!
//! ## Key Features
//!
//! - **Compact tags**: strings, boxed integers, booleans and enums get
//!   dedicated one-byte tags
//! - **`one_of` strings**: a field's well-known values are written as a
//!   one-byte index
//! - **Shared references**: in shared mode a value behind an `Rc` or `Arc`
//!   is written once per root write and later occurrences become
//!   back-references, so `Rc` cycles work
//! - **Custom serializers**: bind an [`ObjectSerializer`] to a type, or to a
//!   type and everything extending it
//!
//! ## Example
//!
//! ```rust
//! use fastser::{Fastser, FastObject, ObjectOutput};
//! use std::rc::Rc;
//!
//! #[derive(FastObject)]
//! struct Account {
//!     id: i64,
//!     #[fastser(one_of("EUR", "USD"))]
//!     currency: String,
//!     owner: Rc<Person>,
//!     co_owner: Option<Rc<Person>>,
//! }
//!
//! #[derive(FastObject)]
//! struct Person {
//!     name: String,
//! }
//!
//! let owner = Rc::new(Person { name: "Ada".to_string() });
//! let account = Account {
//!     id: 7,
//!     currency: "EUR".to_string(),
//!     owner: owner.clone(),
//!     co_owner: Some(owner),
//! };
//!
//! let fastser = Fastser::default();
//! let mut out = ObjectOutput::new(&fastser);
//! out.write_object(&account).unwrap();
//! let bytes = out.take_buffer();
//! assert!(!bytes.is_empty());
//! ```

pub use fastser_core::{
    error::Error, meta::Class, meta::ClassDesc, meta::FieldDesc, meta::Reflect,
    output::ObjectOutput, resolver::class_info::ClassInfo, resolver::class_info::FieldInfo,
    resolver::class_registry::ClassInfoRegistry, serializer::FastObject,
    serializer::ObjectSerializer, types::Tag, Config, Fastser,
};
pub use fastser_derive::FastObject;

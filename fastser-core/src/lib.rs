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

//! # Fastser Core
//!
//! The write side of a binary object-graph serializer: a thread-safe cache of
//! per-class schemas and the tag-dispatch encoder that walks object graphs
//! with them.
//!
//! ## Architecture
//!
//! - **`fastser`**: the shared configuration object and its pooled `serialize`
//! - **`output`**: the encoder session, [`ObjectOutput`]
//! - **`resolver`**: schema registry, serializer registry, identity tracking
//! - **`meta`**: class descriptors standing in for runtime reflection
//! - **`serializer`**: how the encoder sees values at run time
//! - **`codec`**: the low-level byte codec contract and its binary default
//! - **`buffer`**: little-endian byte writer
//! - **`types`**: tags and primitive kinds
//! - **`error`**: error type and helper macros
//!
//! ## Shared and unshared sessions
//!
//! A shared session remembers every string, array and object it reached
//! through an `Rc` or `Arc` during one root write, and writes a
//! back-reference when it meets the same allocation again. This also makes
//! `Rc` cycles encodable. An unshared session skips
//! that bookkeeping; cyclic graphs then fail with
//! [`Error::DepthExceed`](error::Error::DepthExceed).
//!
//! ## Usage
//!
//! This crate is typically used through the `fastser` crate, which adds
//! `#[derive(FastObject)]`. The core types work on their own as well:
//!
//! ```rust
//! use fastser_core::{Fastser, ObjectOutput};
//!
//! let fastser = Fastser::default();
//! let mut out = ObjectOutput::no_shared(&fastser);
//! out.write_object(&vec![1i32, 2, 3]).unwrap();
//! out.write_object(&Some(7i64)).unwrap();
//! assert!(!out.buffer().is_empty());
//! assert!(!fastser.is_share_references());
//! ```

pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod fastser;
pub mod meta;
pub mod output;
pub mod resolver;
pub mod serializer;
pub mod types;

pub use codec::{BinaryCodec, Codec};
pub use config::Config;
pub use error::Error;
pub use fastser::Fastser;
pub use meta::{Class, ClassDesc, ClassKind, FieldDesc, MethodDesc, Reflect};
pub use output::ObjectOutput;
pub use resolver::class_info::{ClassInfo, FieldInfo};
pub use resolver::class_registry::ClassInfoRegistry;
pub use resolver::serializer_registry::{SerializerRegistry, SerializerRegistryDelegate};
pub use serializer::{ArrayView, FastObject, ObjectSerializer, ObjectView};
pub use types::Tag;

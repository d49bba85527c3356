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

//! # Fastser Derive Macros
//!
//! `#[derive(FastObject)]` implements `Reflect` (the class descriptor) and
//! `FastObject` (run-time view and field writer) for a type.
//!
//! **Supported types:**
//! - Structs with named fields, tuple structs, unit structs
//! - Enums whose variants carry no data
//!
//! **Example:**
//! ```rust,ignore
//! use fastser_derive::FastObject;
//!
//! #[derive(FastObject)]
//! struct Order {
//!     id: i64,
//!     #[fastser(one_of("NEW", "PAID", "SHIPPED"))]
//!     state: String,
//!     lines: Vec<Line>,
//!     #[fastser(skip)]
//!     cached_total: std::cell::Cell<u64>,
//! }
//!
//! #[derive(FastObject)]
//! #[fastser(externalizable)]
//! struct Line {
//!     sku: String,
//!     quantity: u32,
//! }
//!
//! #[derive(FastObject)]
//! enum Currency {
//!     Eur,
//!     Usd,
//! }
//! ```
//!
//! Attribute reference: see the `#[fastser(...)]` list in the `attrs`
//! module. Field types must themselves implement `FastObject`; skipped
//! fields may have any type.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod object;
mod util;

/// Derives `Reflect` and `FastObject`.
#[proc_macro_derive(FastObject, attributes(fastser))]
pub fn proc_macro_derive_fast_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    object::derive_fast_object(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

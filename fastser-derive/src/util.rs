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

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Field, Fields, Index};

/// A struct field with its declaration position.
///
/// `field_name` is the identifier without any `r#` prefix, or the position
/// as a string for tuple structs.
#[derive(Clone)]
pub struct SourceField<'a> {
    pub original_index: usize,
    pub field: &'a Field,
    pub field_name: String,
}

impl SourceField<'_> {
    /// `self.name` or `self.0`, depending on the struct shape.
    pub fn access(&self) -> TokenStream {
        match &self.field.ident {
            Some(ident) => quote! { self.#ident },
            None => {
                let index = Index::from(self.original_index);
                quote! { self.#index }
            }
        }
    }
}

/// Fields in declaration order.
pub fn source_fields(fields: &Fields) -> Vec<SourceField<'_>> {
    fields
        .iter()
        .enumerate()
        .map(|(idx, field)| match &field.ident {
            Some(ident) => SourceField {
                original_index: idx,
                field,
                field_name: ident.unraw().to_string(),
            },
            None => SourceField {
                original_index: idx,
                field,
                field_name: idx.to_string(),
            },
        })
        .collect()
}

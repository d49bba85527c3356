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

use crate::object::attrs::{parse_field_attrs, TypeAttrs};
use crate::util::SourceField;
use proc_macro2::TokenStream;
use quote::quote;

/// A field that takes part in serialization.
pub struct DescribedField<'a> {
    pub source: SourceField<'a>,
    pub one_of: Vec<syn::LitStr>,
    pub version: Option<u8>,
}

pub fn described_fields<'a>(fields: Vec<SourceField<'a>>) -> syn::Result<Vec<DescribedField<'a>>> {
    let mut described = Vec::with_capacity(fields.len());
    for source in fields {
        let attrs = parse_field_attrs(&source.field.attrs)?;
        if attrs.skip {
            continue;
        }
        described.push(DescribedField {
            source,
            one_of: attrs.one_of,
            version: attrs.version,
        });
    }
    Ok(described)
}

pub fn gen_describe(fields: &[DescribedField], attrs: &TypeAttrs) -> TokenStream {
    let field_descs = fields.iter().map(|f| {
        let ty = &f.source.field.ty;
        let name = &f.source.field_name;
        let index = f.source.original_index;
        let one_of = if f.one_of.is_empty() {
            quote! {}
        } else {
            let candidates = &f.one_of;
            quote! { .one_of(&[#(#candidates),*]) }
        };
        let version = f.version.map(|v| quote! { .version(#v) });
        quote! {
            .field(fastser_core::meta::FieldDesc::of::<#ty>(#name, #index) #one_of #version)
        }
    });
    let related = super::gen_related(attrs);
    quote! {
        fastser_core::meta::ClassDesc::structure()
            #(#field_descs)*
            #related
    }
}

pub fn gen_view(attrs: &TypeAttrs) -> TokenStream {
    match attrs.enum_constant {
        Some(ordinal) => quote! {
            fastser_core::serializer::ObjectView::Enum { ordinal: #ordinal }
        },
        None => quote! { fastser_core::serializer::ObjectView::Object },
    }
}

pub fn gen_write_fields(fields: &[DescribedField]) -> TokenStream {
    if fields.is_empty() {
        return quote! {};
    }
    let arms = fields.iter().map(|f| {
        let index = f.source.original_index;
        let access = f.source.access();
        quote! {
            #index => fastser_core::serializer::FastObject::fast_write_field(&#access, out, field)?,
        }
    });
    quote! {
        fn fast_write_fields(
            &self,
            out: &mut fastser_core::output::ObjectOutput,
            info: &fastser_core::resolver::class_info::ClassInfo,
        ) -> Result<(), fastser_core::error::Error> {
            for field in info.fields() {
                match field.index() {
                    #(#arms)*
                    _ => return Err(fastser_core::serializer::struct_::unknown_field(info, field)),
                }
            }
            Ok(())
        }
    }
}

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

use crate::object::attrs::TypeAttrs;
use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{DataEnum, Fields};

pub fn check_unit_variants(data_enum: &DataEnum) -> syn::Result<()> {
    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new(
                variant.span(),
                "`FastObject` can only be derived for enums whose variants carry no data",
            ));
        }
    }
    Ok(())
}

pub fn gen_describe(data_enum: &DataEnum, attrs: &TypeAttrs) -> TokenStream {
    let names = data_enum.variants.iter().map(|v| v.ident.to_string());
    let related = super::gen_related(attrs);
    quote! {
        fastser_core::meta::ClassDesc::enumeration(&[#(#names),*])
            #related
    }
}

pub fn gen_view(data_enum: &DataEnum) -> TokenStream {
    if data_enum.variants.is_empty() {
        return quote! { match *self {} };
    }
    let idents = data_enum.variants.iter().map(|v| &v.ident);
    let ordinals = (0..data_enum.variants.len()).map(|i| i as i32);
    quote! {
        match self {
            #(
                Self::#idents => fastser_core::serializer::ObjectView::Enum { ordinal: #ordinals },
            )*
        }
    }
}

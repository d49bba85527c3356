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

use crate::util::source_fields;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, Data, DeriveInput, GenericParam, Generics};

mod attrs;
mod derive_enum;
mod derive_struct;

use attrs::{parse_type_attrs, TypeAttrs};

/// `.nested(..)`, `.extends(..)` and the other related-type calls of a
/// descriptor.
fn gen_related(attrs: &TypeAttrs) -> TokenStream {
    let class_of = |ty: &syn::Type| quote! { <#ty as fastser_core::meta::Reflect>::class() };
    let nested = attrs.nested.iter().map(class_of);
    let implements = attrs.implements.iter().map(class_of);
    let extends = attrs.extends.as_ref().map(|ty| {
        let class = class_of(ty);
        quote! { .extends(#class) }
    });
    let enclosing = attrs.enclosing.as_ref().map(|ty| {
        let class = class_of(ty);
        quote! { .enclosed_by(#class) }
    });
    let externalizable = attrs.externalizable;
    quote! {
        #( .nested(#nested) )*
        #( .implements(#implements) )*
        #extends
        #enclosing
        .externalizable(#externalizable)
    }
}

fn add_trait_bounds(mut generics: Generics) -> Generics {
    for param in &mut generics.params {
        if let GenericParam::Type(type_param) = param {
            type_param
                .bounds
                .push(parse_quote!(fastser_core::serializer::FastObject));
            type_param
                .bounds
                .push(parse_quote!(fastser_core::meta::Reflect));
        }
    }
    generics
}

pub fn derive_fast_object(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    let attrs = parse_type_attrs(&ast.attrs)?;
    let generics = add_trait_bounds(ast.generics.clone());
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let (describe, view, write_fields) = match &ast.data {
        Data::Struct(s) => {
            let fields = derive_struct::described_fields(source_fields(&s.fields))?;
            (
                derive_struct::gen_describe(&fields, &attrs),
                derive_struct::gen_view(&attrs),
                derive_struct::gen_write_fields(&fields),
            )
        }
        Data::Enum(e) => {
            derive_enum::check_unit_variants(e)?;
            if attrs.enum_constant.is_some() {
                return Err(syn::Error::new(
                    name.span(),
                    "`enum_constant` applies to structs only",
                ));
            }
            (
                derive_enum::gen_describe(e, &attrs),
                derive_enum::gen_view(e),
                quote! {},
            )
        }
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span,
                "`FastObject` cannot be derived for unions",
            ))
        }
    };

    let class_name = attrs.name.as_ref().map(|n| {
        quote! {
            fn class_name() -> &'static str {
                #n
            }
        }
    });

    Ok(quote! {
        impl #impl_generics fastser_core::meta::Reflect for #name #ty_generics #where_clause {
            #class_name

            fn describe() -> fastser_core::meta::ClassDesc {
                #describe
            }
        }

        impl #impl_generics fastser_core::serializer::FastObject for #name #ty_generics #where_clause {
            fn fast_class(&self) -> fastser_core::meta::Class {
                <Self as fastser_core::meta::Reflect>::class()
            }

            fn fast_view(&self) -> fastser_core::serializer::ObjectView<'_> {
                #view
            }

            fn fast_target(&self) -> Option<&dyn fastser_core::serializer::FastObject> {
                Some(self)
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            #write_fields
        }
    })
}

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

//! Parsing of `#[fastser(...)]` attributes.
//!
//! Type level:
//! - `externalizable`: the codec's end-marker hook runs after the body
//! - `nested(A, B)`, `implements(I)`: related types, for class discovery
//! - `extends(S)`: super class, for discovery and subclass serializers
//! - `enclosing(E)`: enclosing type
//! - `enum_constant = N`: a struct standing for constant `N` of its
//!   enclosing enum
//! - `name = "..."`: class name override
//!
//! Field level:
//! - `one_of("a", "b")`: candidate strings written as a one-byte index
//! - `version = N`
//! - `skip` / `transient`: the field is not part of the class

use syn::parse::Parse;
use syn::punctuated::Punctuated;
use syn::{Attribute, LitInt, LitStr, Token, Type};

#[derive(Default)]
pub struct TypeAttrs {
    pub externalizable: bool,
    pub nested: Vec<Type>,
    pub extends: Option<Type>,
    pub implements: Vec<Type>,
    pub enclosing: Option<Type>,
    pub enum_constant: Option<i32>,
    pub name: Option<LitStr>,
}

#[derive(Default)]
pub struct FieldAttrs {
    pub one_of: Vec<LitStr>,
    pub version: Option<u8>,
    pub skip: bool,
}

fn parenthesized_list<T: Parse>(meta: &syn::meta::ParseNestedMeta) -> syn::Result<Vec<T>> {
    let content;
    syn::parenthesized!(content in meta.input);
    let items = Punctuated::<T, Token![,]>::parse_terminated(&content)?;
    Ok(items.into_iter().collect())
}

fn single_type(meta: &syn::meta::ParseNestedMeta) -> syn::Result<Type> {
    let mut types = parenthesized_list::<Type>(meta)?;
    if types.len() != 1 {
        return Err(meta.error("expected exactly one type"));
    }
    Ok(types.remove(0))
}

pub fn parse_type_attrs(attrs: &[Attribute]) -> syn::Result<TypeAttrs> {
    let mut parsed = TypeAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("fastser") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("externalizable") {
                parsed.externalizable = true;
            } else if meta.path.is_ident("nested") {
                parsed.nested.extend(parenthesized_list::<Type>(&meta)?);
            } else if meta.path.is_ident("extends") {
                parsed.extends = Some(single_type(&meta)?);
            } else if meta.path.is_ident("implements") {
                parsed.implements.extend(parenthesized_list::<Type>(&meta)?);
            } else if meta.path.is_ident("enclosing") {
                parsed.enclosing = Some(single_type(&meta)?);
            } else if meta.path.is_ident("enum_constant") {
                let lit: LitInt = meta.value()?.parse()?;
                let ordinal: i32 = lit.base10_parse()?;
                if ordinal < 0 {
                    return Err(syn::Error::new(lit.span(), "enum_constant must be >= 0"));
                }
                parsed.enum_constant = Some(ordinal);
            } else if meta.path.is_ident("name") {
                parsed.name = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error("unknown fastser type attribute"));
            }
            Ok(())
        })?;
    }
    Ok(parsed)
}

pub fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("fastser") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("one_of") {
                parsed.one_of.extend(parenthesized_list::<LitStr>(&meta)?);
            } else if meta.path.is_ident("version") {
                let lit: LitInt = meta.value()?.parse()?;
                parsed.version = Some(lit.base10_parse()?);
            } else if meta.path.is_ident("skip") || meta.path.is_ident("transient") {
                parsed.skip = true;
            } else {
                return Err(meta.error("unknown fastser field attribute"));
            }
            Ok(())
        })?;
    }
    Ok(parsed)
}

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

//! Explicit class descriptors.
//!
//! Rust has no runtime reflection, so every serializable type describes its
//! own structure through [`Reflect::describe`]. `#[derive(FastObject)]`
//! generates the descriptor; hand-written descriptors use the builder methods
//! on [`ClassDesc`] and [`FieldDesc`].
//!
//! ```rust
//! use fastser_core::meta::{ClassDesc, FieldDesc, Reflect};
//!
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Reflect for Point {
//!     fn describe() -> ClassDesc {
//!         ClassDesc::structure()
//!             .field(FieldDesc::of::<i32>("x", 0))
//!             .field(FieldDesc::of::<i32>("y", 1))
//!     }
//! }
//!
//! let desc = Point::describe();
//! assert_eq!(desc.fields.len(), 2);
//! assert!(desc.fields[0].primitive);
//! ```

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::types::PrimitiveType;

/// Static structure of a Rust type, as far as the encoder is concerned.
pub trait Reflect: Sized + 'static {
    /// Whether fields of this type are written raw, without a tag.
    const PRIMITIVE: bool = false;

    /// Class handle of this type. Transparent wrappers return the class of
    /// the wrapped type.
    fn class() -> Class {
        Class::new::<Self>()
    }

    /// Fully-qualified name, used by reachable-class discovery and by the
    /// codec when it writes a class.
    fn class_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    fn describe() -> ClassDesc;
}

/// Lightweight handle to one concrete type.
///
/// Equality and hashing use the `TypeId` only. The descriptor is produced
/// lazily so that mutually recursive types can reference each other.
#[derive(Clone, Copy)]
pub struct Class {
    type_id: TypeId,
    name: &'static str,
    describe: fn() -> ClassDesc,
}

impl Class {
    pub fn new<T: Reflect>() -> Class {
        Class {
            type_id: TypeId::of::<T>(),
            name: T::class_name(),
            describe: T::describe,
        }
    }

    /// Shorthand for `T::class()`, which unwraps transparent wrappers.
    pub fn of<T: Reflect>() -> Class {
        T::class()
    }

    #[inline(always)]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn describe(&self) -> ClassDesc {
        (self.describe)()
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Class").field(&self.name).finish()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassKind {
    Primitive(PrimitiveType),
    String,
    Array { component: Class },
    Enum,
    Struct,
    /// A type that only appears as a declared type (trait objects and the like).
    Interface,
}

impl ClassKind {
    pub fn is_primitive(&self) -> bool {
        matches!(self, ClassKind::Primitive(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, ClassKind::Array { .. })
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, ClassKind::Enum)
    }
}

#[derive(Clone, Debug)]
pub struct FieldDesc {
    pub name: &'static str,
    /// Position in the declaring type; the derived field writer matches on it.
    pub index: usize,
    pub class: Class,
    pub primitive: bool,
    /// Closed set of string values this field commonly holds.
    pub one_of: Option<&'static [&'static str]>,
    /// Transient fields are never written.
    pub transient: bool,
    pub version: u8,
}

impl FieldDesc {
    pub fn of<T: Reflect>(name: &'static str, index: usize) -> FieldDesc {
        FieldDesc {
            name,
            index,
            class: T::class(),
            primitive: T::PRIMITIVE,
            one_of: None,
            transient: false,
            version: 0,
        }
    }

    pub fn one_of(mut self, candidates: &'static [&'static str]) -> Self {
        self.one_of = Some(candidates);
        self
    }

    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }
}

/// A method signature; only consulted by reachable-class discovery.
#[derive(Clone, Debug)]
pub struct MethodDesc {
    pub name: &'static str,
    pub returns: Option<Class>,
    pub params: Vec<Class>,
}

impl MethodDesc {
    pub fn new(name: &'static str) -> MethodDesc {
        MethodDesc {
            name,
            returns: None,
            params: Vec::new(),
        }
    }

    pub fn returns(mut self, class: Class) -> Self {
        self.returns = Some(class);
        self
    }

    pub fn param(mut self, class: Class) -> Self {
        self.params.push(class);
        self
    }
}

#[derive(Clone, Debug)]
pub struct ClassDesc {
    pub kind: ClassKind,
    pub fields: Vec<FieldDesc>,
    pub nested: Vec<Class>,
    pub methods: Vec<MethodDesc>,
    pub super_class: Option<Class>,
    pub interfaces: Vec<Class>,
    pub enclosing: Option<Class>,
    pub externalizable: bool,
    pub enum_constants: Vec<&'static str>,
}

impl ClassDesc {
    pub fn new(kind: ClassKind) -> ClassDesc {
        ClassDesc {
            kind,
            fields: Vec::new(),
            nested: Vec::new(),
            methods: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            enclosing: None,
            externalizable: false,
            enum_constants: Vec::new(),
        }
    }

    pub fn primitive(primitive: PrimitiveType) -> ClassDesc {
        ClassDesc::new(ClassKind::Primitive(primitive))
    }

    pub fn string() -> ClassDesc {
        ClassDesc::new(ClassKind::String)
    }

    pub fn array(component: Class) -> ClassDesc {
        ClassDesc::new(ClassKind::Array { component })
    }

    pub fn structure() -> ClassDesc {
        ClassDesc::new(ClassKind::Struct)
    }

    pub fn interface() -> ClassDesc {
        ClassDesc::new(ClassKind::Interface)
    }

    pub fn enumeration(constants: &[&'static str]) -> ClassDesc {
        let mut desc = ClassDesc::new(ClassKind::Enum);
        desc.enum_constants = constants.to_vec();
        desc
    }

    pub fn field(mut self, field: FieldDesc) -> Self {
        self.fields.push(field);
        self
    }

    pub fn nested(mut self, class: Class) -> Self {
        self.nested.push(class);
        self
    }

    pub fn method(mut self, method: MethodDesc) -> Self {
        self.methods.push(method);
        self
    }

    pub fn extends(mut self, class: Class) -> Self {
        self.super_class = Some(class);
        self
    }

    pub fn implements(mut self, class: Class) -> Self {
        self.interfaces.push(class);
        self
    }

    pub fn enclosed_by(mut self, class: Class) -> Self {
        self.enclosing = Some(class);
        self
    }

    pub fn externalizable(mut self, externalizable: bool) -> Self {
        self.externalizable = externalizable;
        self
    }
}

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

use crate::meta::{Class, ClassKind, FieldDesc};
use crate::resolver::serializer_registry::SerializerRegistry;
use crate::serializer::ObjectSerializer;
use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Field context for values written without an enclosing field.
pub static UNTYPED_FIELD: FieldInfo = FieldInfo::untyped();

/// Schema toggles captured when a [`ClassInfo`] is computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchemaPolicy {
    pub ignore_annotations: bool,
    pub struct_mode: bool,
}

/// The context a value is written in: the field holding it.
///
/// The first time a value whose class equals the declared class goes through
/// a `FieldInfo`, the declared class's schema is cached on it. The cache is
/// tied to the registry that filled it.
pub struct FieldInfo {
    name: &'static str,
    index: usize,
    declared: Option<Class>,
    declared_enum: bool,
    primitive: bool,
    one_of: Option<&'static [&'static str]>,
    version: u8,
    declared_info: OnceLock<Arc<ClassInfo>>,
}

impl FieldInfo {
    pub const fn untyped() -> FieldInfo {
        FieldInfo {
            name: "",
            index: 0,
            declared: None,
            declared_enum: false,
            primitive: false,
            one_of: None,
            version: 0,
            declared_info: OnceLock::new(),
        }
    }

    /// Context for a value declared as `class`, e.g. array elements or values
    /// a custom serializer writes on its own.
    pub fn typed(class: Class) -> FieldInfo {
        let kind = class.describe().kind;
        FieldInfo {
            declared: Some(class),
            declared_enum: kind.is_enum(),
            primitive: kind.is_primitive(),
            ..FieldInfo::untyped()
        }
    }

    pub(crate) fn from_desc(desc: &FieldDesc, policy: SchemaPolicy) -> FieldInfo {
        let (one_of, version) = if policy.ignore_annotations {
            (None, 0)
        } else {
            (desc.one_of, desc.version)
        };
        FieldInfo {
            name: desc.name,
            index: desc.index,
            declared: Some(desc.class),
            declared_enum: desc.class.describe().kind.is_enum(),
            primitive: desc.primitive,
            one_of,
            version,
            declared_info: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declaration index in the owning type.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn declared_class(&self) -> Option<&Class> {
        self.declared.as_ref()
    }

    pub fn is_declared_enum(&self) -> bool {
        self.declared_enum
    }

    pub fn is_primitive(&self) -> bool {
        self.primitive
    }

    pub fn get_one_of(&self) -> Option<&'static [&'static str]> {
        self.one_of
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn cached_info(&self) -> Option<&Arc<ClassInfo>> {
        self.declared_info.get()
    }

    pub(crate) fn cache_info(&self, info: &Arc<ClassInfo>) {
        // a concurrent writer may have won; its value is the same schema
        let _ = self.declared_info.set(info.clone());
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("declared", &self.declared)
            .field("one_of", &self.one_of)
            .field("version", &self.version)
            .finish()
    }
}

/// Cached schema of one concrete class. Immutable once published.
pub struct ClassInfo {
    class: Class,
    kind: ClassKind,
    fields: Vec<FieldInfo>,
    component: Option<FieldInfo>,
    serializer: Option<Arc<dyn ObjectSerializer>>,
    externalizable: bool,
    struct_mode: bool,
    enum_constants: Vec<&'static str>,
}

impl ClassInfo {
    /// Computes the schema of `class`. Consults the serializer registry but
    /// never the schema registry.
    pub fn new(class: Class, policy: SchemaPolicy, serializers: &SerializerRegistry) -> ClassInfo {
        let desc = class.describe();
        let mut fields: Vec<FieldInfo> = desc
            .fields
            .iter()
            .filter(|field| !field.transient)
            .map(|field| FieldInfo::from_desc(field, policy))
            .collect();
        if !policy.struct_mode {
            fields.sort_by(compare_fields);
        }
        let component = match desc.kind {
            ClassKind::Array { component } => Some(FieldInfo::typed(component)),
            _ => None,
        };
        ClassInfo {
            class,
            kind: desc.kind,
            fields,
            component,
            serializer: serializers.get_serializer(&class),
            externalizable: desc.externalizable,
            struct_mode: policy.struct_mode,
            enum_constants: desc.enum_constants,
        }
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    pub fn kind(&self) -> &ClassKind {
        &self.kind
    }

    /// Serialized fields in write order.
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Element context, for array classes.
    pub fn component(&self) -> Option<&FieldInfo> {
        self.component.as_ref()
    }

    pub fn get_serializer(&self) -> Option<&Arc<dyn ObjectSerializer>> {
        self.serializer.as_ref()
    }

    pub fn is_externalizable(&self) -> bool {
        self.externalizable
    }

    pub fn is_struct_mode(&self) -> bool {
        self.struct_mode
    }

    pub fn is_array(&self) -> bool {
        self.kind.is_array()
    }

    pub fn is_enum(&self) -> bool {
        self.kind.is_enum()
    }

    pub fn enum_constants(&self) -> &[&'static str] {
        &self.enum_constants
    }
}

impl fmt::Debug for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field("class", &self.class)
            .field("kind", &self.kind)
            .field("fields", &self.fields)
            .field("serializer", &self.serializer.is_some())
            .field("externalizable", &self.externalizable)
            .field("struct_mode", &self.struct_mode)
            .finish()
    }
}

/// Default field order: version, then primitives before references, then name.
fn compare_fields(a: &FieldInfo, b: &FieldInfo) -> Ordering {
    a.version
        .cmp(&b.version)
        .then_with(|| b.primitive.cmp(&a.primitive))
        .then_with(|| a.name.cmp(b.name))
}

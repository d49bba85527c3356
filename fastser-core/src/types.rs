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

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Discriminators written before each value.
///
/// The numeric values are fixed by the wire format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[allow(non_camel_case_types)]
#[repr(i8)]
pub enum Tag {
    /// Generic object header followed by the object's class.
    OBJECT = 0,
    NULL = -1,
    /// Object header for a value whose class equals the field's declared class.
    TYPED = -3,
    STRING = -4,
    ARRAY = -5,
    ENUM = -6,
    /// Back-reference to an earlier stream offset.
    HANDLE = -7,
    BIG_INT = -9,
    BIG_LONG = -10,
    BIG_BOOLEAN_TRUE = -16,
    BIG_BOOLEAN_FALSE = -17,
    ONE_OF = -18,
}

impl Tag {
    #[inline(always)]
    pub fn as_i8(self) -> i8 {
        self.into()
    }
}

pub const NULL: i8 = Tag::NULL as i8;
pub const STRING: i8 = Tag::STRING as i8;
pub const ONE_OF: i8 = Tag::ONE_OF as i8;
pub const BIG_INT: i8 = Tag::BIG_INT as i8;
pub const BIG_LONG: i8 = Tag::BIG_LONG as i8;
pub const BIG_BOOLEAN_TRUE: i8 = Tag::BIG_BOOLEAN_TRUE as i8;
pub const BIG_BOOLEAN_FALSE: i8 = Tag::BIG_BOOLEAN_FALSE as i8;
pub const ENUM: i8 = Tag::ENUM as i8;
pub const ARRAY: i8 = Tag::ARRAY as i8;
pub const OBJECT: i8 = Tag::OBJECT as i8;
pub const TYPED: i8 = Tag::TYPED as i8;
pub const HANDLE: i8 = Tag::HANDLE as i8;

/// Primitive element types known to the codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Bool,
    I8,
    U8,
    I16,
    U16,
    Char,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl PrimitiveType {
    /// Width of one element in the fixed-size encoding.
    pub fn size(self) -> usize {
        match self {
            PrimitiveType::Bool | PrimitiveType::I8 | PrimitiveType::U8 => 1,
            PrimitiveType::I16 | PrimitiveType::U16 => 2,
            PrimitiveType::Char | PrimitiveType::I32 | PrimitiveType::U32 | PrimitiveType::F32 => 4,
            PrimitiveType::I64 | PrimitiveType::U64 | PrimitiveType::F64 => 8,
        }
    }
}

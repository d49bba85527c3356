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

/// Configuration for a [`Fastser`](crate::fastser::Fastser) instance.
///
/// The schema toggles are copied into the instance's class registry on
/// construction; `share_references` is the default for sessions created
/// afterwards.
#[derive(Clone, Debug)]
pub struct Config {
    /// Whether sessions track identities and write back-references for values
    /// reached more than once.
    pub share_references: bool,
    /// Whether schemas ignore `one_of` candidates and field versions.
    pub ignore_annotations: bool,
    /// Whether schemas keep fields in declaration order.
    pub struct_mode: bool,
    /// Maximum nesting depth of one write.
    pub max_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            share_references: true,
            ignore_annotations: false,
            struct_mode: false,
            max_depth: 512,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn is_share_references(&self) -> bool {
        self.share_references
    }

    #[inline(always)]
    pub fn is_ignore_annotations(&self) -> bool {
        self.ignore_annotations
    }

    #[inline(always)]
    pub fn is_struct_mode(&self) -> bool {
        self.struct_mode
    }

    #[inline(always)]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

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

//! Sample object graphs for the encoder benchmarks.

use chrono::NaiveDate;
use fastser_derive::FastObject;
use std::rc::Rc;

pub trait TestDataGenerator {
    fn generate_small() -> Self;
    fn generate_medium() -> Self;
    fn generate_large() -> Self;
}

fn text(prefix: &str, len: usize) -> String {
    let mut s = String::with_capacity(len);
    s.push_str(prefix);
    while s.len() < len {
        s.push((b'a' + (s.len() % 26) as u8) as char);
    }
    s
}

#[derive(FastObject)]
pub enum Status {
    Active,
    Suspended,
    Closed,
}

#[derive(FastObject)]
pub struct SimpleStruct {
    pub id: i32,
    pub name: String,
    pub active: bool,
    pub score: f64,
}

impl TestDataGenerator for SimpleStruct {
    fn generate_small() -> Self {
        SimpleStruct {
            id: 1,
            name: "test".to_string(),
            active: true,
            score: 95.5,
        }
    }

    fn generate_medium() -> Self {
        SimpleStruct {
            id: 12345,
            name: text("medium-", 50),
            active: false,
            score: 12.25,
        }
    }

    fn generate_large() -> Self {
        SimpleStruct {
            id: i32::MAX,
            name: text("large-", 1000),
            active: true,
            score: f64::MAX,
        }
    }
}

#[derive(FastObject)]
pub struct Address {
    pub street: String,
    #[fastser(one_of("Berlin", "Lisbon", "Oslo"))]
    pub city: String,
    pub zip: i32,
}

#[derive(FastObject)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub status: Status,
    pub since: NaiveDate,
    pub address: Rc<Address>,
    pub billing: Rc<Address>,
    pub scores: Vec<i32>,
    pub tags: Vec<String>,
}

impl Customer {
    fn sample(id: i64, tags: usize, scores: usize) -> Customer {
        let home = Rc::new(Address {
            street: text("street-", 24),
            city: "Lisbon".to_string(),
            zip: 1100,
        });
        Customer {
            id,
            name: text("customer-", 32),
            status: Status::Active,
            since: NaiveDate::from_ymd_opt(2019, 6, 1).unwrap_or_default(),
            address: home.clone(),
            billing: home,
            scores: (0..scores as i32).collect(),
            tags: (0..tags).map(|i| format!("tag-{i}")).collect(),
        }
    }
}

#[derive(FastObject)]
pub struct CustomerBook {
    pub owner: String,
    pub customers: Vec<Customer>,
}

impl TestDataGenerator for CustomerBook {
    fn generate_small() -> Self {
        CustomerBook {
            owner: "small".to_string(),
            customers: vec![Customer::sample(1, 2, 4)],
        }
    }

    fn generate_medium() -> Self {
        CustomerBook {
            owner: "medium".to_string(),
            customers: (0..20).map(|i| Customer::sample(i, 8, 32)).collect(),
        }
    }

    fn generate_large() -> Self {
        CustomerBook {
            owner: "large".to_string(),
            customers: (0..200).map(|i| Customer::sample(i, 16, 256)).collect(),
        }
    }
}

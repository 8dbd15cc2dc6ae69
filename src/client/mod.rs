// Copyright (c) 2025 ADBC Drivers Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Remote query client interface.
//!
//! The driver does not speak the Salesforce REST protocol itself. Network
//! transport, session establishment and SOQL execution belong to a
//! [`QueryClient`] implementation handed to the driver by its
//! [`Authenticator`](crate::auth::Authenticator).

#[cfg(test)]
pub(crate) mod mock;

use crate::error::Result;
use serde_json::Value;
use std::fmt::Debug;

/// Fields the remote client attaches to every record that are not columns.
pub const METADATA_FIELDS: [&str; 2] = ["__client__", "attributes"];

/// One result record, keyed by field name.
///
/// Fields keep the order in which the remote service sent them, but no two
/// records are guaranteed to share that order or even the same fields.
pub type Record = serde_json::Map<String, Value>;

/// Returns true if `name` is one of the [`METADATA_FIELDS`], ignoring case.
pub fn is_metadata_field(name: &str) -> bool {
    METADATA_FIELDS
        .iter()
        .any(|field| field.eq_ignore_ascii_case(name))
}

/// Trait for remote query clients.
///
/// The remote API overloads a single entry point: it is called with SOQL
/// text for the first page of a query and with the previous page's
/// continuation token for every page after that.
pub trait QueryClient: Send + Sync + Debug {
    /// Executes a query, or fetches the page a continuation token points to.
    fn execute_query(&self, query: &str) -> Result<Batch>;
}

/// One page of query results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    records: Vec<Record>,
    total_size: usize,
    next_records_url: Option<String>,
}

impl Batch {
    /// Creates the last page of a result set of `total_size` records.
    pub fn new(records: Vec<Record>, total_size: usize) -> Self {
        Self {
            records,
            total_size,
            next_records_url: None,
        }
    }

    /// Sets the continuation token for the next page.
    ///
    /// An empty token means there is no next page.
    pub fn with_next_records_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.next_records_url = if url.is_empty() { None } else { Some(url) };
        self
    }

    /// Returns the records on this page.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the record at `index` on this page.
    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Returns the number of records on this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if this page holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the size of the whole result set, across all pages.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Returns the continuation token for the next page, if any.
    pub fn next_records_url(&self) -> Option<&str> {
        self.next_records_url.as_deref()
    }
}

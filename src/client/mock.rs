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

//! In-memory [`QueryClient`] and [`Authenticator`] for unit tests.

use super::{Batch, QueryClient, Record};
use crate::auth::{Authenticator, PasswordCredentials};
use crate::error::{Result, SalesforceErrorHelper};
use driverbase::error::ErrorHelper;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub(crate) struct MockClient {
    pages: HashMap<String, Batch>,
    failures: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Serves `total` account records in pages of `page_size`. The first page
    /// answers `query`, page `n` answers `/next/n`.
    pub(crate) fn paged(query: &str, total: usize, page_size: usize) -> Self {
        let mut client = Self::new();
        let mut key = query.to_string();
        let mut start = 0;
        let mut page = 1;
        loop {
            let end = (start + page_size).min(total);
            let records = (start..end).map(account).collect();
            let mut batch = Batch::new(records, total);
            let next = format!("/next/{page}");
            if end < total {
                batch = batch.with_next_records_url(next.clone());
            }
            client = client.with_page(&key, batch);
            if end >= total {
                break;
            }
            key = next;
            start = end;
            page += 1;
        }
        client
    }

    pub(crate) fn with_page(mut self, key: &str, batch: Batch) -> Self {
        self.pages.insert(key.to_string(), batch);
        self
    }

    pub(crate) fn with_failure(mut self, key: &str) -> Self {
        self.failures.insert(key.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl QueryClient for MockClient {
    fn execute_query(&self, query: &str) -> Result<Batch> {
        self.calls.lock().unwrap().push(query.to_string());
        if self.failures.contains(query) {
            return Err(SalesforceErrorHelper::io().message("INVALID_QUERY_LOCATOR"));
        }
        self.pages
            .get(query)
            .cloned()
            .ok_or_else(|| SalesforceErrorHelper::invalid_argument().message("MALFORMED_QUERY"))
    }
}

pub(crate) fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("not a record: {other}"),
    }
}

pub(crate) fn account(index: usize) -> Record {
    record(json!({
        "attributes": {"type": "Account", "url": format!("/sobjects/Account/{index:03}")},
        "Id": format!("{index:03}"),
        "Name": format!("Account {index}"),
    }))
}

/// Hands out `client` on login, or rejects every login when there is none.
#[derive(Debug)]
pub(crate) struct MockAuthenticator {
    client: Option<Arc<MockClient>>,
    logins: Mutex<Vec<PasswordCredentials>>,
}

impl MockAuthenticator {
    pub(crate) fn new(client: Arc<MockClient>) -> Self {
        Self {
            client: Some(client),
            logins: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn rejecting() -> Self {
        Self {
            client: None,
            logins: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn logins(&self) -> Vec<PasswordCredentials> {
        self.logins.lock().unwrap().clone()
    }
}

impl Authenticator for MockAuthenticator {
    fn login(&self, credentials: &PasswordCredentials) -> Result<Arc<dyn QueryClient>> {
        self.logins.lock().unwrap().push(credentials.clone());
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => Err(SalesforceErrorHelper::io().message("INVALID_LOGIN")),
        }
    }
}

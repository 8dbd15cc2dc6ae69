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

//! Result cursor over a paginated query result.
//!
//! Salesforce returns query results a page at a time, as unordered JSON
//! records plus a continuation token. [`Rows`] turns that into a row cursor
//! with a fixed column order, fetching further pages from the connection's
//! client as the held page runs out.

use crate::client::{is_metadata_field, Batch, QueryClient};
use crate::error::{
    connection_closed, cursor_closed, page_fetch_failed, Result, FETCH_NEXT_PAGE_CONTEXT,
};
use serde_json::Value;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// One materialized row, with values in [`Rows::columns`] order.
///
/// Fields missing from the underlying record read as [`Value::Null`].
pub type Row = Vec<Value>;

/// Column names of a cursor, sampled once from the first record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum ColumnOrder {
    #[default]
    Undiscovered,
    Discovered(Vec<String>),
}

impl ColumnOrder {
    /// Returns the column names, sampling them from `batch` on first use.
    ///
    /// An empty batch has nothing to sample: the result is empty and
    /// discovery is retried against the next batch held.
    fn discover(&mut self, batch: &Batch) -> &[String] {
        if *self == ColumnOrder::Undiscovered {
            let Some(record) = batch.record(0) else {
                return &[];
            };
            let names = record
                .keys()
                .filter(|name| !is_metadata_field(name))
                .cloned()
                .collect();
            *self = ColumnOrder::Discovered(names);
        }
        match self {
            ColumnOrder::Discovered(names) => names.as_slice(),
            ColumnOrder::Undiscovered => &[],
        }
    }
}

#[derive(Debug)]
enum CursorState {
    Open(OpenRows),
    Closed,
}

/// How far an open cursor has paged through its result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paging {
    Active,
    // The remote service stopped making progress; no further fetches.
    Ended,
    // A page fetch failed; the cursor never calls the client again.
    Failed,
}

#[derive(Debug)]
struct OpenRows {
    // Non-owning: closing the connection releases the client even while
    // cursors are still open.
    client: Weak<dyn QueryClient>,
    batch: Batch,
    columns: ColumnOrder,
    // Index into `batch`.
    position: usize,
    // Rows returned across all batches.
    rows_read: usize,
    paging: Paging,
}

impl OpenRows {
    fn next_row(&mut self) -> Result<Option<Row>> {
        match self.paging {
            Paging::Failed => return Err(page_fetch_failed()),
            Paging::Ended => return Ok(None),
            Paging::Active => {}
        }
        if self.rows_read >= self.batch.total_size() {
            return Ok(None);
        }

        while self.position >= self.batch.len() {
            let Some(next_records_url) = self.batch.next_records_url() else {
                warn!(
                    rows_read = self.rows_read,
                    total_size = self.batch.total_size(),
                    "no next page before the declared total size was reached"
                );
                return Ok(None);
            };
            let next_records_url = next_records_url.to_string();
            if let Err(e) = self.fetch_next(&next_records_url) {
                self.paging = Paging::Failed;
                return Err(e);
            }
            if self.batch.is_empty()
                && self.batch.next_records_url() == Some(next_records_url.as_str())
            {
                warn!(
                    next_records_url = next_records_url.as_str(),
                    rows_read = self.rows_read,
                    "empty page points back to itself, ending rows"
                );
                self.paging = Paging::Ended;
                return Ok(None);
            }
        }

        let columns = self.columns.discover(&self.batch);
        let record = &self.batch.records()[self.position];
        let row = columns
            .iter()
            .map(|name| record.get(name).cloned().unwrap_or(Value::Null))
            .collect();

        self.position += 1;
        self.rows_read += 1;
        Ok(Some(row))
    }

    fn fetch_next(&mut self, next_records_url: &str) -> Result<()> {
        let client = self
            .client
            .upgrade()
            .ok_or_else(|| connection_closed().context(FETCH_NEXT_PAGE_CONTEXT))?;

        debug!(next_records_url, rows_read = self.rows_read, "fetching next page");
        let batch = client
            .execute_query(next_records_url)
            .map_err(|e| e.context(FETCH_NEXT_PAGE_CONTEXT))?;
        debug!(
            records = batch.len(),
            total_size = batch.total_size(),
            "fetched page"
        );

        self.batch = batch;
        self.position = 0;
        Ok(())
    }
}

/// A cursor over the rows of one query.
///
/// Rows come back in the order the remote service returned them, page after
/// page. Column order is taken from the first record and never changes for
/// the life of the cursor.
///
/// A cursor does not keep its connection alive. If the connection is closed
/// first, the cursor can still drain the page it holds but fails as soon as
/// it needs another one.
#[derive(Debug)]
pub struct Rows {
    state: CursorState,
}

impl Rows {
    /// Creates a cursor positioned before the first record of `batch`.
    pub(crate) fn new(client: Weak<dyn QueryClient>, batch: Batch) -> Self {
        Self {
            state: CursorState::Open(OpenRows {
                client,
                batch,
                columns: ColumnOrder::Undiscovered,
                position: 0,
                rows_read: 0,
                paging: Paging::Active,
            }),
        }
    }

    /// Executes `query` on `client` and returns a cursor over its first page.
    ///
    /// Errors from the client are returned unchanged.
    pub(crate) fn open(client: &Arc<dyn QueryClient>, query: &str) -> Result<Self> {
        debug!(query, "executing query");
        let batch = client.execute_query(query)?;
        debug!(
            records = batch.len(),
            total_size = batch.total_size(),
            has_next_page = batch.next_records_url().is_some(),
            "query executed"
        );
        Ok(Self::new(Arc::downgrade(client), batch))
    }

    /// Returns the column names in row order.
    ///
    /// Empty when the cursor is closed, or when no record has been seen yet
    /// because the query matched nothing. Callers must check for emptiness.
    pub fn columns(&mut self) -> &[String] {
        match &mut self.state {
            CursorState::Open(rows) => rows.columns.discover(&rows.batch),
            CursorState::Closed => &[],
        }
    }

    /// Advances to the next row.
    ///
    /// Returns `Ok(None)` once every row has been read. Fetching a further
    /// page can fail; that error carries the context
    /// "fetch next page of results" and leaves the cursor failed: every
    /// later call errors without contacting the remote service, see
    /// [`is_failed`](Self::is_failed). Failed fetches are never retried.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        match &mut self.state {
            CursorState::Open(rows) => rows.next_row(),
            CursorState::Closed => Err(cursor_closed()),
        }
    }

    /// Closes the cursor and releases the page it holds.
    ///
    /// Closing an already closed cursor is an error.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, CursorState::Closed) {
            CursorState::Open(rows) => {
                debug!(rows_read = rows.rows_read, "closing rows");
                Ok(())
            }
            CursorState::Closed => Err(cursor_closed()),
        }
    }

    /// Returns true once [`close`](Self::close) has succeeded.
    pub fn is_closed(&self) -> bool {
        matches!(self.state, CursorState::Closed)
    }

    /// Returns true if a page fetch failed, ending iteration with an error.
    ///
    /// Callers can use this to tell a mid-pagination failure, which needs the
    /// query restarted from scratch, from an error on the initial query.
    pub fn is_failed(&self) -> bool {
        matches!(
            &self.state,
            CursorState::Open(OpenRows {
                paging: Paging::Failed,
                ..
            })
        )
    }

    /// Returns the size of the whole result set, if the cursor is open.
    pub fn total_size(&self) -> Option<usize> {
        match &self.state {
            CursorState::Open(rows) => Some(rows.batch.total_size()),
            CursorState::Closed => None,
        }
    }

    /// Returns the number of rows returned so far, if the cursor is open.
    pub fn rows_read(&self) -> Option<usize> {
        match &self.state {
            CursorState::Open(rows) => Some(rows.rows_read),
            CursorState::Closed => None,
        }
    }
}

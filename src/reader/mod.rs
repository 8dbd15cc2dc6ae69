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

//! Arrow reader over a result cursor.
//!
//! Records carry no schema beyond their field names, so every column is
//! exposed as nullable `Utf8`: strings as-is, JSON null (or a missing field)
//! as null, and every other value as its JSON text.

use crate::error::Result as DriverResult;
use crate::result::{Row, Rows};
use arrow_array::builder::StringBuilder;
use arrow_array::{ArrayRef, RecordBatch, RecordBatchOptions, RecordBatchReader};
use arrow_schema::{ArrowError, DataType, Field, Schema, SchemaRef};
use serde_json::Value;
use std::sync::Arc;

/// Configuration for [`RowsReader`].
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Maximum number of rows per emitted record batch.
    pub max_rows_per_batch: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            // Salesforce query page size.
            max_rows_per_batch: 2000,
        }
    }
}

/// Streams the rows of a [`Rows`] cursor as Arrow record batches.
///
/// The schema is fixed when the reader is created. The reader closes the
/// cursor once it is exhausted or fails.
#[derive(Debug)]
pub struct RowsReader {
    rows: Rows,
    schema: SchemaRef,
    config: ReaderConfig,
    // Row read ahead to discover columns behind an empty first page.
    pending: Option<Row>,
    done: bool,
}

impl RowsReader {
    /// Creates a reader that takes ownership of `rows`.
    ///
    /// If the page the cursor holds has no records, the first row is read
    /// ahead so the schema reflects the columns of later pages. Errors from
    /// that read are returned here.
    pub fn new(mut rows: Rows, config: ReaderConfig) -> DriverResult<Self> {
        let pending = if rows.columns().is_empty() {
            rows.next_row()?
        } else {
            None
        };
        let fields: Vec<Field> = rows
            .columns()
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, true))
            .collect();
        Ok(Self {
            rows,
            schema: Arc::new(Schema::new(fields)),
            config,
            pending,
            done: false,
        })
    }

    /// Returns the reader configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    fn read_batch(&mut self) -> Result<Option<RecordBatch>, ArrowError> {
        if self.done {
            return Ok(None);
        }

        let mut builders: Vec<StringBuilder> = self
            .schema
            .fields()
            .iter()
            .map(|_| StringBuilder::new())
            .collect();
        let mut num_rows = 0;
        if let Some(row) = self.pending.take() {
            for (builder, value) in builders.iter_mut().zip(row.iter()) {
                append_value(builder, value);
            }
            num_rows += 1;
        }
        while num_rows < self.config.max_rows_per_batch {
            match self.rows.next_row() {
                Ok(Some(row)) => {
                    for (builder, value) in builders.iter_mut().zip(row.iter()) {
                        append_value(builder, value);
                    }
                    num_rows += 1;
                }
                Ok(None) => {
                    self.finish();
                    break;
                }
                Err(e) => {
                    self.finish();
                    return Err(ArrowError::ExternalError(e.to_string().into()));
                }
            }
        }

        if num_rows == 0 {
            return Ok(None);
        }

        let columns: Vec<ArrayRef> = builders
            .iter_mut()
            .map(|builder| Arc::new(builder.finish()) as ArrayRef)
            .collect();
        let options = RecordBatchOptions::new().with_row_count(Some(num_rows));
        RecordBatch::try_new_with_options(self.schema.clone(), columns, &options).map(Some)
    }

    fn finish(&mut self) {
        self.done = true;
        if !self.rows.is_closed() {
            // Only fails for a cursor that is already closed.
            let _ = self.rows.close();
        }
    }
}

fn append_value(builder: &mut StringBuilder, value: &Value) {
    match value {
        Value::Null => builder.append_null(),
        Value::String(s) => builder.append_value(s),
        other => builder.append_value(other.to_string()),
    }
}

impl Iterator for RowsReader {
    type Item = Result<RecordBatch, ArrowError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_batch().transpose()
    }
}

impl RecordBatchReader for RowsReader {
    fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }
}

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

//! Statement implementation for the Salesforce ADBC driver.

use crate::client::QueryClient;
use crate::error::{
    connection_closed, parameters_unsupported, prepared_statements_unsupported,
    SalesforceErrorHelper,
};
use crate::reader::{ReaderConfig, RowsReader};
use crate::result::Rows;
use adbc_core::error::Result;
use adbc_core::options::{OptionStatement, OptionValue};
use adbc_core::Optionable;
use arrow_array::RecordBatchReader;
use arrow_schema::Schema;
use driverbase::error::ErrorHelper;
use std::sync::Weak;

/// Statement option: maximum rows per Arrow record batch.
pub const OPTION_MAX_ROWS_PER_BATCH: &str = "salesforce.reader.max_rows_per_batch";

/// Represents a SOQL statement that can be executed against Salesforce.
///
/// A Statement is created from a Connection and is used to execute SOQL
/// queries and stream their results as Arrow record batches.
#[derive(Debug)]
pub struct Statement {
    client: Weak<dyn QueryClient>,
    query: Option<String>,
    reader_config: ReaderConfig,
}

impl Statement {
    /// Creates a new Statement issuing queries through `client`.
    pub(crate) fn new(client: Weak<dyn QueryClient>) -> Self {
        Self {
            client,
            query: None,
            reader_config: ReaderConfig::default(),
        }
    }

    /// Returns the current SOQL query.
    pub fn sql_query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    fn open_rows(&self) -> Result<Rows> {
        let query = self.query.as_deref().ok_or_else(|| {
            SalesforceErrorHelper::invalid_state()
                .message("no query set")
                .to_adbc()
        })?;
        let client = self
            .client
            .upgrade()
            .ok_or_else(|| connection_closed().to_adbc())?;
        Rows::open(&client, query).map_err(|e| e.to_adbc())
    }
}

impl Optionable for Statement {
    type Option = OptionStatement;

    fn set_option(&mut self, key: Self::Option, value: OptionValue) -> Result<()> {
        match key {
            OptionStatement::Other(ref s) if s == OPTION_MAX_ROWS_PER_BATCH => {
                let max_rows = match value {
                    OptionValue::Int(v) => usize::try_from(v).ok(),
                    OptionValue::String(ref v) => v.parse::<usize>().ok(),
                    _ => None,
                };
                match max_rows {
                    Some(max_rows) if max_rows > 0 => {
                        self.reader_config.max_rows_per_batch = max_rows;
                        Ok(())
                    }
                    _ => Err(SalesforceErrorHelper::set_invalid_option(&key, &value).to_adbc()),
                }
            }
            _ => Err(SalesforceErrorHelper::set_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_string(&self, key: Self::Option) -> Result<String> {
        match key {
            OptionStatement::Other(ref s) if s == OPTION_MAX_ROWS_PER_BATCH => {
                Ok(self.reader_config.max_rows_per_batch.to_string())
            }
            _ => Err(SalesforceErrorHelper::get_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_bytes(&self, key: Self::Option) -> Result<Vec<u8>> {
        Err(SalesforceErrorHelper::get_unknown_option(&key).to_adbc())
    }

    fn get_option_int(&self, key: Self::Option) -> Result<i64> {
        match key {
            OptionStatement::Other(ref s) if s == OPTION_MAX_ROWS_PER_BATCH => {
                i64::try_from(self.reader_config.max_rows_per_batch)
                    .map_err(|_| SalesforceErrorHelper::get_unknown_option(&key).to_adbc())
            }
            _ => Err(SalesforceErrorHelper::get_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_double(&self, key: Self::Option) -> Result<f64> {
        Err(SalesforceErrorHelper::get_unknown_option(&key).to_adbc())
    }
}

impl adbc_core::Statement for Statement {
    fn set_sql_query(&mut self, query: impl AsRef<str>) -> Result<()> {
        self.query = Some(query.as_ref().to_string());
        Ok(())
    }

    fn set_substrait_plan(&mut self, _plan: impl AsRef<[u8]>) -> Result<()> {
        Err(SalesforceErrorHelper::not_implemented()
            .message("Substrait plans")
            .to_adbc())
    }

    fn prepare(&mut self) -> Result<()> {
        Err(prepared_statements_unsupported().to_adbc())
    }

    fn get_parameter_schema(&self) -> Result<Schema> {
        Err(parameters_unsupported().to_adbc())
    }

    fn bind(&mut self, _batch: arrow_array::RecordBatch) -> Result<()> {
        Err(parameters_unsupported().to_adbc())
    }

    fn bind_stream(&mut self, _stream: Box<dyn RecordBatchReader + Send>) -> Result<()> {
        Err(parameters_unsupported().to_adbc())
    }

    fn execute(&mut self) -> Result<impl RecordBatchReader + Send> {
        let rows = self.open_rows()?;
        RowsReader::new(rows, self.reader_config.clone()).map_err(|e| e.to_adbc())
    }

    fn execute_update(&mut self) -> Result<Option<i64>> {
        Err(SalesforceErrorHelper::not_implemented()
            .message("execute_update - SOQL is read-only")
            .to_adbc())
    }

    fn execute_schema(&mut self) -> Result<Schema> {
        Err(SalesforceErrorHelper::not_implemented()
            .message("execute_schema")
            .to_adbc())
    }

    fn execute_partitions(&mut self) -> Result<adbc_core::PartitionedResult> {
        Err(SalesforceErrorHelper::not_implemented()
            .message("execute_partitions")
            .to_adbc())
    }

    fn cancel(&mut self) -> Result<()> {
        Err(SalesforceErrorHelper::not_implemented()
            .message("cancel")
            .to_adbc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{record, MockClient};
    use crate::client::Batch;
    use adbc_core::error::Status;
    use adbc_core::Statement as _;
    use arrow_array::RecordBatch;
    use serde_json::json;
    use std::sync::Arc;

    fn statement(client: &Arc<dyn QueryClient>) -> Statement {
        Statement::new(Arc::downgrade(client))
    }

    #[test]
    fn test_statement_set_query() {
        let client: Arc<dyn QueryClient> = Arc::new(MockClient::new());
        let mut stmt = statement(&client);
        stmt.set_sql_query("SELECT Id FROM Account").unwrap();
        assert_eq!(stmt.sql_query(), Some("SELECT Id FROM Account"));
    }

    #[test]
    fn test_statement_execute() {
        let client: Arc<dyn QueryClient> = Arc::new(MockClient::paged("q", 2100, 2000));
        let mut stmt = statement(&client);
        stmt.set_sql_query("q").unwrap();
        stmt.set_option(
            OptionStatement::Other(OPTION_MAX_ROWS_PER_BATCH.into()),
            OptionValue::Int(1000),
        )
        .unwrap();

        let reader = stmt.execute().unwrap();
        assert_eq!(reader.schema().fields().len(), 2);
        let batches: Vec<RecordBatch> = reader.collect::<std::result::Result<_, _>>().unwrap();
        let sizes: Vec<usize> = batches.iter().map(|b| b.num_rows()).collect();
        assert_eq!(sizes, vec![1000, 1000, 100]);
    }

    #[test]
    fn test_statement_execute_empty_first_page() {
        let client: Arc<dyn QueryClient> = Arc::new(
            MockClient::new()
                .with_page("q", Batch::new(vec![], 1).with_next_records_url("/next/1"))
                .with_page("/next/1", Batch::new(vec![record(json!({"Id": "001"}))], 1)),
        );
        let mut stmt = statement(&client);
        stmt.set_sql_query("q").unwrap();

        let reader = stmt.execute().unwrap();
        assert_eq!(reader.schema().fields().len(), 1);
        let batches: Vec<RecordBatch> = reader.collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].num_columns(), 1);
        assert_eq!(batches[0].num_rows(), 1);
    }

    #[test]
    fn test_statement_execute_without_query() {
        let client: Arc<dyn QueryClient> = Arc::new(MockClient::new());
        let mut stmt = statement(&client);
        assert!(stmt.execute().is_err());
    }

    #[test]
    fn test_statement_execute_after_connection_closed() {
        let client: Arc<dyn QueryClient> = Arc::new(MockClient::paged("q", 1, 1));
        let mut stmt = statement(&client);
        stmt.set_sql_query("q").unwrap();
        drop(client);
        let err = stmt.execute().err().unwrap();
        assert!(err.message.contains("connection closed"));
    }

    #[test]
    fn test_statement_parameters_unsupported() {
        let client: Arc<dyn QueryClient> = Arc::new(MockClient::new());
        let mut stmt = statement(&client);
        assert_eq!(stmt.prepare().unwrap_err().status, Status::NotImplemented);
        let batch = RecordBatch::new_empty(Arc::new(Schema::empty()));
        assert_eq!(stmt.bind(batch).unwrap_err().status, Status::NotImplemented);
    }

    #[test]
    fn test_statement_max_rows_option() {
        let client: Arc<dyn QueryClient> = Arc::new(MockClient::new());
        let mut stmt = statement(&client);
        let key = || OptionStatement::Other(OPTION_MAX_ROWS_PER_BATCH.into());
        stmt.set_option(key(), OptionValue::String("500".into()))
            .unwrap();
        assert_eq!(stmt.get_option_int(key()).unwrap(), 500);
        assert_eq!(stmt.get_option_string(key()).unwrap(), "500");
        assert!(stmt.set_option(key(), OptionValue::Int(0)).is_err());
        assert!(stmt.set_option(key(), OptionValue::Int(-5)).is_err());
    }
}

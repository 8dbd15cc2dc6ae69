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

//! Connection implementation for the Salesforce ADBC driver.

use crate::client::QueryClient;
use crate::error::{
    connection_closed, parameters_unsupported, prepared_statements_unsupported,
    transactions_unsupported, Result, SalesforceErrorHelper,
};
use crate::result::Rows;
use crate::statement::Statement;
use adbc_core::options::{InfoCode, ObjectDepth, OptionConnection, OptionValue};
use adbc_core::Optionable;
use arrow_array::{RecordBatch, RecordBatchIterator, RecordBatchReader};
use arrow_schema::{ArrowError, Schema};
use driverbase::error::ErrorHelper;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Represents an authenticated session with a Salesforce org.
///
/// A Connection owns the remote client handle. Cursors and statements
/// created from it only hold weak references to that handle, so closing the
/// connection releases the session even while they are still around; they
/// fail on their next remote call.
///
/// Connections are meant for sequential use. Open one per concurrent query.
#[derive(Debug)]
pub struct Connection {
    client: Option<Arc<dyn QueryClient>>,
}

/// Type alias for our empty reader used in unsupported operations.
type EmptyReader =
    RecordBatchIterator<std::vec::IntoIter<std::result::Result<RecordBatch, ArrowError>>>;

impl Connection {
    /// Creates a Connection around an authenticated client.
    pub fn new(client: Arc<dyn QueryClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Executes a SOQL query and returns a cursor over its rows.
    ///
    /// Queries are sent as literal text; any `params` fail with a
    /// not-implemented error before the remote service is contacted.
    pub fn query(&self, query: &str, params: &[Value]) -> Result<Rows> {
        if !params.is_empty() {
            return Err(parameters_unsupported());
        }
        let client = self.client.as_ref().ok_or_else(connection_closed)?;
        Rows::open(client, query)
    }

    /// Transactions are not supported.
    pub fn begin(&mut self) -> Result<()> {
        Err(transactions_unsupported())
    }

    /// Prepared statements are not supported.
    pub fn prepare(&self, _query: &str) -> Result<Statement> {
        Err(prepared_statements_unsupported())
    }

    /// Always succeeds without contacting the remote service.
    ///
    /// This does not verify that the session is still valid.
    pub fn ping(&self) -> Result<()> {
        Ok(())
    }

    /// Releases the client handle. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.client.take().is_some() {
            debug!("connection closed");
        }
        Ok(())
    }

    /// Returns true once the connection has been closed.
    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }
}

impl Optionable for Connection {
    type Option = OptionConnection;

    fn set_option(
        &mut self,
        key: Self::Option,
        value: OptionValue,
    ) -> adbc_core::error::Result<()> {
        match key {
            OptionConnection::AutoCommit => match value {
                // Salesforce is auto-commit only
                OptionValue::String(ref s) if s == "true" => Ok(()),
                OptionValue::String(ref s) if s == "false" => {
                    Err(transactions_unsupported().to_adbc())
                }
                _ => Err(SalesforceErrorHelper::set_invalid_option(&key, &value).to_adbc()),
            },
            _ => Err(SalesforceErrorHelper::set_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_string(&self, key: Self::Option) -> adbc_core::error::Result<String> {
        match key {
            OptionConnection::AutoCommit => Ok("true".to_string()),
            _ => Err(SalesforceErrorHelper::get_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_bytes(&self, key: Self::Option) -> adbc_core::error::Result<Vec<u8>> {
        Err(SalesforceErrorHelper::get_unknown_option(&key).to_adbc())
    }

    fn get_option_int(&self, key: Self::Option) -> adbc_core::error::Result<i64> {
        Err(SalesforceErrorHelper::get_unknown_option(&key).to_adbc())
    }

    fn get_option_double(&self, key: Self::Option) -> adbc_core::error::Result<f64> {
        Err(SalesforceErrorHelper::get_unknown_option(&key).to_adbc())
    }
}

impl adbc_core::Connection for Connection {
    type StatementType = Statement;

    fn new_statement(&mut self) -> adbc_core::error::Result<Self::StatementType> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| connection_closed().to_adbc())?;
        Ok(Statement::new(Arc::downgrade(client)))
    }

    fn cancel(&mut self) -> adbc_core::error::Result<()> {
        // Page fetches block until the remote client returns
        Err(SalesforceErrorHelper::not_implemented()
            .message("cancel")
            .to_adbc())
    }

    fn get_info(
        &self,
        codes: Option<HashSet<InfoCode>>,
    ) -> adbc_core::error::Result<impl RecordBatchReader + Send> {
        use driverbase::InfoBuilder;

        let mut builder = InfoBuilder::new();

        // Filter by requested codes or return all if none specified
        let return_all = codes.is_none();
        let codes = codes.unwrap_or_default();

        if return_all || codes.contains(&InfoCode::DriverName) {
            builder.add_string(InfoCode::DriverName as u32, "Salesforce ADBC Driver");
        }
        if return_all || codes.contains(&InfoCode::DriverVersion) {
            builder.add_string(InfoCode::DriverVersion as u32, env!("CARGO_PKG_VERSION"));
        }
        if return_all || codes.contains(&InfoCode::VendorName) {
            builder.add_string(InfoCode::VendorName as u32, "Salesforce");
        }

        Ok(builder.build())
    }

    fn get_objects(
        &self,
        _depth: ObjectDepth,
        _catalog: Option<&str>,
        _db_schema: Option<&str>,
        _table_name: Option<&str>,
        _table_type: Option<Vec<&str>>,
        _column_name: Option<&str>,
    ) -> adbc_core::error::Result<impl RecordBatchReader + Send> {
        Err::<EmptyReader, _>(
            SalesforceErrorHelper::not_implemented()
                .message("get_objects")
                .to_adbc(),
        )
    }

    fn get_table_schema(
        &self,
        _catalog: Option<&str>,
        _db_schema: Option<&str>,
        _table_name: &str,
    ) -> adbc_core::error::Result<Schema> {
        Err(SalesforceErrorHelper::not_implemented()
            .message("get_table_schema")
            .to_adbc())
    }

    fn get_table_types(&self) -> adbc_core::error::Result<impl RecordBatchReader + Send> {
        Err::<EmptyReader, _>(
            SalesforceErrorHelper::not_implemented()
                .message("get_table_types")
                .to_adbc(),
        )
    }

    fn read_partition(
        &self,
        _partition: impl AsRef<[u8]>,
    ) -> adbc_core::error::Result<impl RecordBatchReader + Send> {
        Err::<EmptyReader, _>(
            SalesforceErrorHelper::not_implemented()
                .message("read_partition")
                .to_adbc(),
        )
    }

    fn commit(&mut self) -> adbc_core::error::Result<()> {
        Err(transactions_unsupported().to_adbc())
    }

    fn rollback(&mut self) -> adbc_core::error::Result<()> {
        Err(transactions_unsupported().to_adbc())
    }

    fn get_statistic_names(&self) -> adbc_core::error::Result<impl RecordBatchReader + Send> {
        Err::<EmptyReader, _>(
            SalesforceErrorHelper::not_implemented()
                .message("get_statistic_names")
                .to_adbc(),
        )
    }

    fn get_statistics(
        &self,
        _catalog: Option<&str>,
        _db_schema: Option<&str>,
        _table_name: Option<&str>,
        _approximate: bool,
    ) -> adbc_core::error::Result<impl RecordBatchReader + Send> {
        Err::<EmptyReader, _>(
            SalesforceErrorHelper::not_implemented()
                .message("get_statistics")
                .to_adbc(),
        )
    }
}

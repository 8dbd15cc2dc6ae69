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

//! Error types for the Salesforce ADBC driver.
//!
//! This module uses the driverbase error framework to provide consistent,
//! informative error messages that integrate with the ADBC error model.
//!
//! End of data is not an error: cursors report it as `Ok(None)`.

use driverbase::error::ErrorHelper;

/// Error helper for Salesforce driver errors.
///
/// This type implements the driverbase `ErrorHelper` trait to provide
/// consistent error formatting with the driver name prefix.
#[derive(Clone)]
pub struct SalesforceErrorHelper;

impl ErrorHelper for SalesforceErrorHelper {
    const NAME: &'static str = "Salesforce";
}

/// The error type for Salesforce ADBC driver operations.
pub type Error = driverbase::error::Error<SalesforceErrorHelper>;

/// A convenient alias for Results with Salesforce errors.
pub type Result<T> = std::result::Result<T, Error>;

/// The connection descriptor does not match `username/password/token@endpoint`.
pub fn malformed_connection_string() -> Error {
    SalesforceErrorHelper::invalid_argument()
        .message("malformed connection string, expected username/password/token@endpoint")
}

pub fn transactions_unsupported() -> Error {
    SalesforceErrorHelper::not_implemented().message("no support for transactions")
}

pub fn prepared_statements_unsupported() -> Error {
    SalesforceErrorHelper::not_implemented().message("no support for prepared statements")
}

pub fn parameters_unsupported() -> Error {
    SalesforceErrorHelper::not_implemented().message("no support for parameterized queries")
}

/// Any use of a result cursor after it was closed, including a second close.
pub fn cursor_closed() -> Error {
    SalesforceErrorHelper::invalid_state().message("rows closed")
}

/// Context added to errors raised while fetching a continuation page.
pub const FETCH_NEXT_PAGE_CONTEXT: &str = "fetch next page of results";

/// Any use of a cursor after one of its page fetches failed.
pub fn page_fetch_failed() -> Error {
    SalesforceErrorHelper::invalid_state()
        .message("rows failed: a previous page fetch failed, restart the query")
        .context(FETCH_NEXT_PAGE_CONTEXT)
}

/// The connection released its client handle.
pub fn connection_closed() -> Error {
    SalesforceErrorHelper::invalid_state().message("connection closed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = malformed_connection_string();
        let display = format!("{error}");
        assert!(display.contains("Salesforce"));
        assert!(display.contains("malformed connection string"));
    }

    #[test]
    fn test_error_with_context() {
        let error = SalesforceErrorHelper::io()
            .message("connection reset")
            .context("fetch next page of results");
        let display = format!("{error}");
        assert!(display.contains("could not fetch next page of results"));
        assert!(display.contains("connection reset"));
    }

    #[test]
    fn test_unsupported_features_to_adbc() {
        for error in [
            transactions_unsupported(),
            prepared_statements_unsupported(),
            parameters_unsupported(),
        ] {
            let adbc_error = error.to_adbc();
            assert_eq!(adbc_error.status, adbc_core::error::Status::NotImplemented);
            assert!(adbc_error.message.contains("Salesforce"));
        }
    }

    #[test]
    fn test_closed_errors_are_distinct() {
        assert!(cursor_closed().to_string().contains("rows closed"));
        assert!(connection_closed().to_string().contains("connection closed"));
        let failed = page_fetch_failed().to_string();
        assert!(failed.contains("previous page fetch failed"));
        assert!(failed.contains("could not fetch next page of results"));
    }
}

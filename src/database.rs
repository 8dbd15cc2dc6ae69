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

//! Database implementation for the Salesforce ADBC driver.

use crate::auth::{Authenticator, PasswordCredentials};
use crate::connection::Connection;
use crate::error::SalesforceErrorHelper;
use adbc_core::error::Result;
use adbc_core::options::{OptionConnection, OptionDatabase, OptionValue};
use adbc_core::Optionable;
use driverbase::error::ErrorHelper;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Represents a database instance that holds connection configuration.
///
/// A Database is created from a Driver and is used to establish Connections.
/// The connection descriptor (`username/password/token@endpoint`) is set as
/// the `uri` option before creating connections.
pub struct Database {
    uri: Option<String>,
    authenticator: Arc<dyn Authenticator>,
}

impl Database {
    /// Creates a new Database that logs in through `authenticator`.
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            uri: None,
            authenticator,
        }
    }

    /// Returns true if a connection descriptor has been set.
    pub fn has_uri(&self) -> bool {
        self.uri.is_some()
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("uri", &self.uri.as_ref().map(|_| "<redacted>"))
            .field("authenticator", &self.authenticator)
            .finish()
    }
}

/// Parses `descriptor` and logs in.
///
/// A malformed descriptor fails before the authenticator is called.
pub(crate) fn open_connection(
    authenticator: &dyn Authenticator,
    descriptor: &str,
) -> crate::error::Result<Connection> {
    let credentials = PasswordCredentials::parse(descriptor)?;
    debug!(
        username = credentials.username(),
        endpoint = credentials.endpoint(),
        "logging in"
    );
    let client = authenticator.login(&credentials)?;
    Ok(Connection::new(client))
}

impl Optionable for Database {
    type Option = OptionDatabase;

    fn set_option(&mut self, key: Self::Option, value: OptionValue) -> Result<()> {
        match key {
            OptionDatabase::Uri => {
                if let OptionValue::String(s) = value {
                    self.uri = Some(s);
                    Ok(())
                } else {
                    Err(SalesforceErrorHelper::set_invalid_option(&key, &value).to_adbc())
                }
            }
            _ => Err(SalesforceErrorHelper::set_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_string(&self, key: Self::Option) -> Result<String> {
        match key {
            OptionDatabase::Uri => self.uri.clone().ok_or_else(|| {
                SalesforceErrorHelper::invalid_state()
                    .message("option 'uri' is not set")
                    .to_adbc()
            }),
            _ => Err(SalesforceErrorHelper::get_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_bytes(&self, key: Self::Option) -> Result<Vec<u8>> {
        Err(SalesforceErrorHelper::get_unknown_option(&key).to_adbc())
    }

    fn get_option_int(&self, key: Self::Option) -> Result<i64> {
        Err(SalesforceErrorHelper::get_unknown_option(&key).to_adbc())
    }

    fn get_option_double(&self, key: Self::Option) -> Result<f64> {
        Err(SalesforceErrorHelper::get_unknown_option(&key).to_adbc())
    }
}

impl adbc_core::Database for Database {
    type ConnectionType = Connection;

    fn new_connection(&self) -> Result<Self::ConnectionType> {
        let descriptor = self.uri.as_deref().ok_or_else(|| {
            SalesforceErrorHelper::invalid_state()
                .message("option 'uri' is not set")
                .to_adbc()
        })?;
        open_connection(self.authenticator.as_ref(), descriptor).map_err(|e| e.to_adbc())
    }

    fn new_connection_with_opts(
        &self,
        opts: impl IntoIterator<Item = (OptionConnection, OptionValue)>,
    ) -> Result<Self::ConnectionType> {
        let mut connection = self.new_connection()?;
        for (key, value) in opts {
            connection.set_option(key, value)?;
        }
        Ok(connection)
    }
}

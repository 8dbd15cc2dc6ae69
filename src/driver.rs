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

//! ADBC Driver implementation for Salesforce.

use crate::auth::Authenticator;
use crate::connection::Connection;
use crate::database::{open_connection, Database};
use adbc_core::error::Result;
use adbc_core::options::{OptionDatabase, OptionValue};
use adbc_core::Optionable;
use std::sync::Arc;

/// The main entry point for the Salesforce ADBC driver.
///
/// The Driver is responsible for creating Database instances, which in turn
/// create Connections. Applications construct it with the
/// [`Authenticator`] that establishes sessions with Salesforce; there is no
/// global driver registry.
#[derive(Debug, Clone)]
pub struct Driver {
    authenticator: Arc<dyn Authenticator>,
}

impl Driver {
    /// Creates a new Driver instance.
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self { authenticator }
    }

    /// Opens a connection from a `username/password/token@endpoint`
    /// descriptor.
    ///
    /// The token segment may be empty. A malformed descriptor fails before
    /// any login is attempted.
    pub fn open(&self, descriptor: &str) -> crate::error::Result<Connection> {
        open_connection(self.authenticator.as_ref(), descriptor)
    }
}

impl adbc_core::Driver for Driver {
    type DatabaseType = Database;

    fn new_database(&mut self) -> Result<Self::DatabaseType> {
        Ok(Database::new(self.authenticator.clone()))
    }

    fn new_database_with_opts(
        &mut self,
        opts: impl IntoIterator<Item = (OptionDatabase, OptionValue)>,
    ) -> Result<Self::DatabaseType> {
        let mut database = self.new_database()?;
        for (key, value) in opts {
            database.set_option(key, value)?;
        }
        Ok(database)
    }
}

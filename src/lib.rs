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

//! Salesforce ADBC Driver for Rust
//!
//! This crate provides an ADBC (Arrow Database Connectivity) driver for
//! running SOQL queries against a Salesforce org.
//!
//! ## Overview
//!
//! The driver implements the standard ADBC traits from `adbc_core`:
//! - [`Driver`] - Entry point for creating database connections
//! - [`Database`] - Holds the connection descriptor
//! - [`Connection`] - Authenticated session with Salesforce
//! - [`Statement`] - SOQL statement execution as Arrow record batches
//!
//! Salesforce returns query results a page at a time as schema-less JSON
//! records. [`Rows`] is the row cursor underneath both APIs: it fixes the
//! column order from the first record and follows continuation tokens until
//! the result set is exhausted.
//!
//! Network transport and login are not part of this crate. They are supplied
//! by an [`auth::Authenticator`] returning a [`client::QueryClient`].
//!
//! ## Example
//!
//! ```ignore
//! use salesforce_adbc::Driver;
//!
//! let driver = Driver::new(authenticator);
//! let connection = driver.open("user@example.com/password/token@login.salesforce.com")?;
//!
//! let mut rows = connection.query("SELECT Id, Name FROM Account", &[])?;
//! let columns = rows.columns().to_vec();
//! while let Some(row) = rows.next_row()? {
//!     println!("{columns:?} {row:?}");
//! }
//! rows.close()?;
//! ```
//!
//! ## Configuration Options
//!
//! | Option | Description |
//! |--------|-------------|
//! | `uri` | Connection descriptor `username/password/token@endpoint` |
//! | `salesforce.reader.max_rows_per_batch` | Rows per Arrow batch (statement, default 2000) |

pub mod auth;
pub mod client;
pub mod connection;
pub mod database;
pub mod driver;
pub mod error;
pub mod reader;
pub mod result;
pub mod statement;

pub use connection::Connection;
pub use database::Database;
pub use driver::Driver;
pub use error::{Error, Result, SalesforceErrorHelper};
pub use result::{Row, Rows};
pub use statement::Statement;

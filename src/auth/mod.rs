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

//! Authentication mechanisms for the Salesforce ADBC driver.

pub mod password;

pub use password::PasswordCredentials;

use crate::client::QueryClient;
use crate::error::Result;
use std::fmt::Debug;
use std::sync::Arc;

/// Trait for session establishment against a Salesforce endpoint.
///
/// A successful login yields the client handle a [`Connection`](crate::Connection)
/// owns for its lifetime. The handle carries all network and session state.
pub trait Authenticator: Send + Sync + Debug {
    /// Logs in with the given credentials and returns an authenticated client.
    fn login(&self, credentials: &PasswordCredentials) -> Result<Arc<dyn QueryClient>>;
}

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

//! Username/password authentication.
//!
//! Credentials come from a connection descriptor of the form
//! `username/password/token@endpoint`. The security token may be empty when
//! the caller's IP is trusted by the org, in which case both
//! `username/password/@endpoint` and `username/password@endpoint` are
//! accepted.

use crate::error::{malformed_connection_string, Result};
use std::fmt;

/// Username/password login credentials for one Salesforce endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordCredentials {
    username: String,
    password: String,
    security_token: String,
    endpoint: String,
}

impl PasswordCredentials {
    /// Creates credentials from their parts.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        security_token: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            security_token: security_token.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Parses a `username/password/token@endpoint` connection descriptor.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let (username, rest) = descriptor
            .split_once('/')
            .ok_or_else(malformed_connection_string)?;
        let password_end = rest
            .find(|c| c == '/' || c == '@')
            .ok_or_else(malformed_connection_string)?;
        let (password, rest) = rest.split_at(password_end);
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        let (security_token, endpoint) = rest
            .split_once('@')
            .ok_or_else(malformed_connection_string)?;

        if username.is_empty() || password.is_empty() || endpoint.is_empty() {
            return Err(malformed_connection_string());
        }

        Ok(Self::new(username, password, security_token, endpoint))
    }

    /// Returns the login username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the login password.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the security token, empty when not required.
    pub fn security_token(&self) -> &str {
        &self.security_token
    }

    /// Returns the login endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("security_token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_descriptor() {
        let creds = PasswordCredentials::parse("me@example.com/s3cret/tok3n@login.salesforce.com")
            .unwrap();
        assert_eq!(creds.username(), "me@example.com");
        assert_eq!(creds.password(), "s3cret");
        assert_eq!(creds.security_token(), "tok3n");
        assert_eq!(creds.endpoint(), "login.salesforce.com");
    }

    #[test]
    fn test_parse_empty_token() {
        let with_slash = PasswordCredentials::parse("user/pass/@https://test.salesforce.com").unwrap();
        assert_eq!(with_slash.security_token(), "");
        assert_eq!(with_slash.endpoint(), "https://test.salesforce.com");

        let without_slash = PasswordCredentials::parse("user/pass@host").unwrap();
        assert_eq!(without_slash.password(), "pass");
        assert_eq!(without_slash.security_token(), "");
        assert_eq!(without_slash.endpoint(), "host");
    }

    #[test]
    fn test_parse_endpoint_keeps_remaining_text() {
        let creds = PasswordCredentials::parse("user/pass/tok@host@other/path").unwrap();
        assert_eq!(creds.security_token(), "tok");
        assert_eq!(creds.endpoint(), "host@other/path");
    }

    #[test]
    fn test_parse_malformed() {
        for descriptor in [
            "",
            "user",
            "user@host",
            "user/pass",
            "user/pass/token",
            "/pass/token@host",
            "user//token@host",
            "user/@host",
            "user/pass/token@",
        ] {
            let err = PasswordCredentials::parse(descriptor).unwrap_err();
            assert!(
                err.to_string().contains("malformed connection string"),
                "{descriptor:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = PasswordCredentials::new("user", "hunter2", "tok3n", "host");
        let debug = format!("{creds:?}");
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("tok3n"));
    }
}

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
//
// SPDX-License-Identifier: Apache-2.0
//! # Keystone transport
//!
//! Outbound Keystone v3 requests used by the connector. Responses are decoded
//! into the [types] right away, the rest of the crate never sees the raw
//! Keystone shapes.
use async_trait::async_trait;
use secrecy::SecretString;

pub mod client;
#[cfg(test)]
pub mod mock;
pub mod types;

pub use client::KeystoneClient;
#[cfg(test)]
pub use mock::MockKeystoneApi;
pub use types::*;

use crate::error::ConnectorError;

/// Keystone API as used by the connector.
#[async_trait]
pub trait KeystoneApi: Send + Sync {
    /// Request a new token (`POST /v3/auth/tokens`).
    ///
    /// Only the unexpected statuses are errors, the rejections are part of the
    /// [`AuthResponse`].
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse, ConnectorError>;

    /// Validate the token authenticating with the token itself
    /// (`GET /v3/auth/tokens`).
    async fn validate_token(&self, subject_token: &SecretString)
    -> Result<TokenUser, ConnectorError>;

    /// Get the user (`GET /v3/users/{user_id}`).
    async fn fetch_user<'a>(
        &self,
        user_id: &'a str,
        auth_token: &'a SecretString,
    ) -> Result<KeystoneUser, ConnectorError>;

    /// List groups the user is member of (`GET /v3/users/{user_id}/groups`).
    async fn fetch_groups<'a>(
        &self,
        user_id: &'a str,
        auth_token: &'a SecretString,
    ) -> Result<Vec<KeystoneGroup>, ConnectorError>;

    /// List role assignments of the user with the names of roles and targets
    /// (`GET /v3/role_assignments?user.id={user_id}&include_names=1`).
    async fn fetch_role_assignments<'a>(
        &self,
        user_id: &'a str,
        auth_token: &'a SecretString,
    ) -> Result<Vec<RoleAssignment>, ConnectorError>;
}

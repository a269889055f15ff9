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

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::ConnectorError;
use crate::types::identity::{Identity, Scopes};
use crate::types::login::{LoginOutcome, LoginRequest};

/// Connector authenticating users with the user name and password.
#[async_trait]
pub trait PasswordConnector: Send + Sync {
    /// Label of the user name field on the login form.
    fn prompt(&self) -> &'static str;

    /// Authenticate the user.
    ///
    /// Rejected credentials are reported as [`LoginOutcome::Invalid`], the
    /// required second factor as [`ConnectorError::TotpRequired`].
    async fn login(
        &self,
        scopes: &Scopes,
        request: &LoginRequest,
    ) -> Result<LoginOutcome, ConnectorError>;
}

/// Connector able to verify the previously authenticated user still exists.
#[async_trait]
pub trait RefreshConnector: Send + Sync {
    /// Refresh the identity. The passed identity is left untouched on error.
    async fn refresh(
        &self,
        scopes: &Scopes,
        identity: &Identity,
    ) -> Result<Identity, ConnectorError>;
}

/// Connector resolving the identity from a bearer token (token exchange).
#[async_trait]
pub trait TokenIdentityConnector: Send + Sync {
    async fn token_identity(
        &self,
        subject_token_type: &str,
        subject_token: &SecretString,
    ) -> Result<Identity, ConnectorError>;
}

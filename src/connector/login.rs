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
//! # Password login.
use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::connector::KeystoneConnector;
use crate::error::ConnectorError;
use crate::transport::{AuthResponse, Credentials};
use crate::types::{DomainRef, Identity, LoginOutcome, LoginRequest, PasswordConnector, Scopes};

#[async_trait]
impl PasswordConnector for KeystoneConnector {
    fn prompt(&self) -> &'static str {
        "username"
    }

    /// Authenticate the user with Keystone.
    ///
    /// The user is looked up with the issued token, so no admin access is
    /// necessary.
    #[tracing::instrument(
        skip(self, request),
        fields(connector = %self.id, username = %request.username)
    )]
    async fn login(
        &self,
        scopes: &Scopes,
        request: &LoginRequest,
    ) -> Result<LoginOutcome, ConnectorError> {
        let domain = request
            .domain_override()
            .map(DomainRef::parse)
            .unwrap_or_else(|| self.domain.clone());
        let credentials = Credentials::from_login(request, domain);

        let issued = match self.transport.authenticate(&credentials).await {
            Ok(AuthResponse::Created(issued)) => issued,
            Ok(AuthResponse::ReceiptRequired(receipt)) => {
                debug!("second factor required");
                return Err(ConnectorError::TotpRequired { receipt });
            }
            Ok(AuthResponse::Unauthorized) => {
                debug!("keystone rejected the credentials");
                return Ok(LoginOutcome::Invalid);
            }
            Ok(AuthResponse::Accepted { status, .. }) => {
                warn!("keystone login returned {status} instead of 201");
                return Ok(LoginOutcome::Invalid);
            }
            Err(err) => {
                error!("keystone login failed: {err}");
                return Err(err);
            }
        };
        if issued.user.id.is_empty() {
            return Err(ConnectorError::MissingUserId);
        }

        let mut identity = Identity {
            user_id: issued.user.id.clone(),
            username: request.username.clone(),
            ..Default::default()
        };
        if scopes.groups {
            identity.groups = self
                .resolver
                .resolve(&issued.user.id, &issued.token)
                .await?;
        }
        let user = self
            .transport
            .fetch_user(&issued.user.id, &issued.token)
            .await?;
        if !user.email.is_empty() {
            identity.email = user.email;
            identity.email_verified = true;
        }
        identity.derive_user_id(self.user_id_key);

        Ok(LoginOutcome::Valid(identity))
    }
}

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
//! # Token exchange.
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, warn};

use crate::connector::KeystoneConnector;
use crate::error::ConnectorError;
use crate::types::{Identity, TokenIdentityConnector};

#[async_trait]
impl TokenIdentityConnector for KeystoneConnector {
    /// Identity of the Keystone token owner.
    ///
    /// The token authenticates all the requests itself. Failing to read the
    /// user or the groups with it is not fatal, the identity is returned
    /// without the email or the groups then.
    #[tracing::instrument(
        skip(self, subject_token),
        fields(connector = %self.id)
    )]
    async fn token_identity(
        &self,
        subject_token_type: &str,
        subject_token: &SecretString,
    ) -> Result<Identity, ConnectorError> {
        if let Some(cache) = &self.cache
            && let Some(identity) = cache.get(subject_token.expose_secret()).await
        {
            debug!("token identity served from cache");
            return Ok(identity);
        }

        let user = match self.transport.validate_token(subject_token).await {
            Ok(user) => user,
            Err(err) => {
                error!("keystone token validation failed: {err}");
                return Err(err);
            }
        };
        if user.id.is_empty() {
            return Err(ConnectorError::MissingUserId);
        }

        let mut identity = Identity {
            user_id: user.id.clone(),
            username: user.name,
            ..Default::default()
        };
        match self.transport.fetch_user(&user.id, subject_token).await {
            Ok(details) if !details.email.is_empty() => {
                identity.email = details.email;
                identity.email_verified = true;
            }
            Ok(_) => {}
            Err(err) => warn!("failed to get user {}: {err}", user.id),
        }
        match self.resolver.resolve(&user.id, subject_token).await {
            Ok(groups) => identity.groups = groups,
            Err(err) => warn!("failed to get groups of user {}: {err}", user.id),
        }
        identity.derive_user_id(self.user_id_key);

        if let Some(cache) = &self.cache {
            cache
                .set(subject_token.expose_secret().to_string(), identity.clone())
                .await;
        }
        Ok(identity)
    }
}

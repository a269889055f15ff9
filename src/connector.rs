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
//! # Keystone connector
//!
//! Authenticates users and validates tokens against Keystone on behalf of the
//! identity provider:
//!
//! - [`login`](crate::types::PasswordConnector::login) with the user name and
//!   password, an application credential (`appcred:<id>` user name) or the
//!   password and a TOTP passcode,
//! - [`token_identity`](crate::types::TokenIdentityConnector::token_identity)
//!   exchanging a Keystone token for the identity,
//! - [`refresh`](crate::types::RefreshConnector::refresh) checking the user
//!   still exists using the admin account.
//!
//! All operations are plain futures: dropping one (i.e. on a
//! `tokio::time::timeout`) aborts the request in flight and skips the rest.
use std::sync::Arc;

use secrecy::SecretString;
use tracing::debug;

use crate::cache::ExpiringCache;
use crate::config::{Config, UserIdKey};
use crate::error::ConnectorError;
use crate::resolver::GroupResolver;
use crate::transport::{AuthResponse, Credentials, KeystoneApi, KeystoneClient};
use crate::types::{DomainRef, Identity};

mod login;
mod refresh;
mod token_identity;

/// Connector talking to a single Keystone.
pub struct KeystoneConnector {
    /// Connector id in the identity provider.
    id: String,
    domain: DomainRef,
    admin_username: String,
    admin_password: SecretString,
    user_id_key: UserIdKey,
    /// Identities of the validated tokens keyed by the token.
    cache: Option<ExpiringCache<String, Identity>>,
    resolver: GroupResolver,
    transport: Arc<dyn KeystoneApi>,
}

impl KeystoneConnector {
    /// Open the connector.
    pub fn new<S: Into<String>>(id: S, config: &Config) -> Result<Self, ConnectorError> {
        let transport = Arc::new(KeystoneClient::from_config(config)?);
        Ok(Self::with_transport(id, config, transport))
    }

    /// Open the connector on top of the given Keystone API.
    pub fn with_transport<S: Into<String>>(
        id: S,
        config: &Config,
        transport: Arc<dyn KeystoneApi>,
    ) -> Self {
        let cache = config.cache_ttl().map(ExpiringCache::new);
        Self {
            id: id.into(),
            domain: config.domain.clone(),
            admin_username: config.admin_username.clone(),
            admin_password: config.admin_password.clone(),
            user_id_key: config.user_id_key,
            cache,
            resolver: GroupResolver::new(
                transport.clone(),
                config.group_mapping.clone(),
                config.fetch_roles,
            ),
            transport,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the validated tokens are cached.
    pub fn caches_tokens(&self) -> bool {
        self.cache.is_some()
    }

    /// Close the connector. There is nothing to release, the method exists
    /// for the symmetry with [`new`](Self::new).
    pub fn close(&self) -> Result<(), ConnectorError> {
        debug!(connector = %self.id, "closing the keystone connector");
        Ok(())
    }

    /// Issue a token for the admin account.
    async fn admin_token(&self) -> Result<SecretString, ConnectorError> {
        let credentials = Credentials::password(
            self.admin_username.clone(),
            self.admin_password.clone(),
            self.domain.clone(),
        );
        let source = match self.transport.authenticate(&credentials).await {
            Ok(AuthResponse::Created(issued)) => return Ok(issued.token),
            Ok(AuthResponse::ReceiptRequired(receipt)) => ConnectorError::TotpRequired { receipt },
            Ok(AuthResponse::Unauthorized) => ConnectorError::UnexpectedStatus {
                status: reqwest::StatusCode::UNAUTHORIZED,
                body: String::new(),
            },
            Ok(AuthResponse::Accepted {
                token: Some(token), ..
            }) => return Ok(token),
            Ok(AuthResponse::Accepted { token: None, .. }) => ConnectorError::MissingSubjectToken,
            Err(err) => err,
        };
        Err(ConnectorError::AdminToken {
            source: Box::new(source),
        })
    }
}

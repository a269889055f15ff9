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
//! # Identity refresh.
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::connector::KeystoneConnector;
use crate::error::ConnectorError;
use crate::types::{Identity, RefreshConnector, Scopes};

#[async_trait]
impl RefreshConnector for KeystoneConnector {
    /// Check the user still exists using the admin account and update the
    /// groups when requested.
    #[tracing::instrument(
        skip(self, identity),
        fields(connector = %self.id, user_id = %identity.user_id)
    )]
    async fn refresh(
        &self,
        scopes: &Scopes,
        identity: &Identity,
    ) -> Result<Identity, ConnectorError> {
        let admin_token = self.admin_token().await?;

        let user = self
            .transport
            .fetch_user(&identity.user_id, &admin_token)
            .await
            .map_err(|source| match source {
                ConnectorError::UnexpectedStatus { .. } => {
                    warn!("user {} can not be refreshed: {source}", identity.user_id);
                    ConnectorError::UserNotFound {
                        user_id: identity.user_id.clone(),
                        source: Box::new(source),
                    }
                }
                other => other,
            })?;
        debug!("user {} still exists", user.name);

        let mut refreshed = identity.clone();
        if scopes.groups {
            refreshed.groups = self
                .resolver
                .resolve(&identity.user_id, &admin_token)
                .await?;
        }
        Ok(refreshed)
    }
}

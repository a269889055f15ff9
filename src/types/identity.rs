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

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::UserIdKey;
use crate::error::BuilderError;

/// Identity of the authenticated user handed over to the authentication
/// provider.
#[derive(Builder, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into))]
pub struct Identity {
    /// Stable user identifier: the Keystone user id or an id derived from
    /// the email or the user name.
    pub user_id: String,

    /// User name.
    pub username: String,

    /// User email.
    #[builder(default)]
    pub email: String,

    /// Whether the email can be trusted.
    #[builder(default)]
    pub email_verified: bool,

    /// Group and role labels.
    #[builder(default)]
    pub groups: Vec<String>,
}

impl Identity {
    pub fn builder() -> IdentityBuilder {
        IdentityBuilder::default()
    }

    /// Replace the native user id with the one derived from the configured
    /// attribute. Nothing changes when the attribute is empty.
    pub(crate) fn derive_user_id(&mut self, key: UserIdKey) {
        let source = match key {
            UserIdKey::Native => return,
            UserIdKey::Email => &self.email,
            UserIdKey::Username => &self.username,
        };
        if !source.is_empty() {
            self.user_id = Uuid::new_v5(&Uuid::NAMESPACE_URL, source.as_bytes()).to_string();
        }
    }
}

/// Additional information requested by the client together with the identity.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Scopes {
    /// The client requested a refresh token.
    #[serde(default)]
    pub offline_access: bool,

    /// The client requested the group memberships.
    #[serde(default)]
    pub groups: bool,
}

impl Scopes {
    pub fn with_groups() -> Self {
        Self {
            groups: true,
            ..Default::default()
        }
    }
}

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
//! # Connector configuration
//!
//! The keys follow the JSON configuration of the connector in the identity
//! provider (`keystoneHost`, `userIDKey`, ...). Environment variables prefixed
//! with `KEYSTONE_CONNECTOR_` override the file values, i.e.
//! `KEYSTONE_CONNECTOR_KEYSTONEHOST=http://keystone:5000`.
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use config::{Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::error::ConnectorError;
use crate::types::DomainRef;

/// Prefix of the environment variables overriding the file configuration.
const ENV_PREFIX: &str = "KEYSTONE_CONNECTOR";

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Keystone base url (`http://keystone:5000` or
    /// `https://cloud.example.com/identity`).
    #[serde(rename = "keystoneHost", alias = "keystonehost")]
    pub keystone_host: Url,

    /// Domain (id or name) of the users and of the admin account.
    #[serde(default)]
    pub domain: DomainRef,

    /// Admin account used to look up users on refresh.
    #[serde(rename = "keystoneUsername", alias = "keystoneusername")]
    pub admin_username: String,

    /// Password of the admin account.
    #[serde(rename = "keystonePassword", alias = "keystonepassword")]
    pub admin_password: SecretString,

    /// Attribute the user id is derived from.
    #[serde(rename = "userIDKey", alias = "useridkey", default)]
    pub user_id_key: UserIdKey,

    /// Time to live of the validated tokens (`10m`, `1h 30m`). Caching is
    /// disabled when not set.
    #[serde(rename = "cacheTTL", alias = "cachettl", default)]
    pub cache_ttl: Option<String>,

    /// Include the role assignments into the groups.
    #[serde(rename = "fetchRoles", alias = "fetchroles", default)]
    pub fetch_roles: bool,

    /// Rename groups and role labels.
    #[serde(rename = "groupMapping", alias = "groupmapping", default)]
    pub group_mapping: HashMap<String, String>,

    /// Timeout of a single request to Keystone.
    #[serde(default)]
    pub timeout: Option<String>,
}

/// Source of the user id of the identity.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum UserIdKey {
    /// UUIDv5 of the user email.
    Email,
    /// UUIDv5 of the user name.
    Username,
    /// Keystone user id.
    #[default]
    #[serde(other)]
    Native,
}

impl Config {
    pub fn new(path: PathBuf) -> Result<Self, ConnectorError> {
        let builder = config::Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Time to live of the token cache.
    ///
    /// `None` (no caching) is returned when the value is not set, is not a
    /// valid duration or is zero.
    pub fn cache_ttl(&self) -> Option<Duration> {
        let raw = self.cache_ttl.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        match humantime::parse_duration(raw) {
            Ok(ttl) if !ttl.is_zero() => Some(ttl),
            Ok(_) => None,
            Err(err) => {
                warn!("ignoring invalid cacheTTL {raw:?}: {err}");
                None
            }
        }
    }

    /// Timeout of every outbound request.
    pub fn request_timeout(&self) -> Result<Option<Duration>, ConnectorError> {
        match self.timeout.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => humantime::parse_duration(raw)
                .map(Some)
                .map_err(|source| ConnectorError::InvalidDuration {
                    key: "timeout",
                    source,
                }),
        }
    }
}

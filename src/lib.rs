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
//! # OpenStack Keystone identity connector
//!
//! Connector letting an identity provider (an OpenID Connect server, a login
//! portal, ...) authenticate users against OpenStack Keystone and turn
//! Keystone tokens into user identities.
//!
//! The connector supports:
//!
//! - password login, with the optional TOTP second factor. When Keystone
//!   requires the second factor the login fails with
//!   [`ConnectorError::TotpRequired`] carrying the auth receipt, and the login
//!   is repeated with the passcode and the receipt.
//!
//! - application credential login (`appcred:<id>` as the user name and the
//!   secret as the password),
//!
//! - exchange of a Keystone token for the identity of its owner, optionally
//!   cached for the configured time,
//!
//! - refresh of the identity with the admin account.
//!
//! Groups of the user (and, on request, the role assignments rendered as
//! `role@project`) are returned as the identity groups, renamed through the
//! configured mapping.
//!
//! ```no_run
//! # use std::path::PathBuf;
//! # use secrecy::SecretString;
//! use openstack_keystone_connector::{
//!     Config, KeystoneConnector, LoginRequest, PasswordConnector, Scopes,
//! };
//!
//! # async fn example() -> Result<(), openstack_keystone_connector::ConnectorError> {
//! let config = Config::new(PathBuf::from("/etc/keystone-connector.json"))?;
//! let connector = KeystoneConnector::new("keystone", &config)?;
//! let _outcome = connector
//!     .login(
//!         &Scopes::with_groups(),
//!         &LoginRequest::new("jdoe", SecretString::from("pass".to_string())),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod connector;
pub mod error;
pub mod resolver;
pub mod transport;
pub mod types;


pub use config::Config;
pub use connector::KeystoneConnector;
pub use error::ConnectorError;
pub use types::{
    DomainRef, Identity, LoginOutcome, LoginRequest, PasswordConnector, RefreshConnector, Scopes,
    TokenIdentityConnector,
};

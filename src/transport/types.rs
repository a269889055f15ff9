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
//! Keystone responses as seen by the connector.
use reqwest::StatusCode;
use secrecy::SecretString;

use openstack_keystone_api_types::v3::auth::token;
use openstack_keystone_api_types::v3::group::Group;
use openstack_keystone_api_types::v3::role_assignment::Assignment;
use openstack_keystone_api_types::v3::user::User;

use crate::types::{DomainRef, LoginRequest};

/// Username prefix selecting the application credential authentication.
pub const APPLICATION_CREDENTIAL_PREFIX: &str = "appcred:";

/// Credentials for `POST /v3/auth/tokens`.
#[derive(Clone, Debug)]
pub struct Credentials {
    /// User name or `appcred:<application credential id>`.
    pub username: String,
    /// Password or application credential secret.
    pub secret: SecretString,
    pub domain: DomainRef,
    pub totp_passcode: Option<SecretString>,
    pub receipt: Option<String>,
}

impl Credentials {
    /// Password credentials without the second factor.
    pub fn password<U: Into<String>>(username: U, secret: SecretString, domain: DomainRef) -> Self {
        Self {
            username: username.into(),
            secret,
            domain,
            totp_passcode: None,
            receipt: None,
        }
    }

    /// Credentials of the login request in the domain.
    pub fn from_login(request: &LoginRequest, domain: DomainRef) -> Self {
        Self {
            username: request.username.clone(),
            secret: request.password.clone(),
            domain,
            totp_passcode: request.totp_passcode.clone(),
            receipt: request.receipt.clone(),
        }
    }

    /// Application credential id when the username selects the application
    /// credential authentication.
    pub fn application_credential_id(&self) -> Option<&str> {
        self.username.strip_prefix(APPLICATION_CREDENTIAL_PREFIX)
    }
}

/// Outcome of `POST /v3/auth/tokens`.
#[derive(Debug)]
pub enum AuthResponse {
    /// 201: the token was issued.
    Created(IssuedToken),
    /// Any other 2xx. Keystone never answers like this on success.
    Accepted {
        status: StatusCode,
        /// `X-Subject-Token` header, when present.
        token: Option<SecretString>,
    },
    /// 401 with the auth receipt: the second factor is missing.
    ReceiptRequired(String),
    /// 401 without the receipt.
    Unauthorized,
}

/// Freshly issued token.
#[derive(Clone, Debug)]
pub struct IssuedToken {
    /// Token from the `X-Subject-Token` header.
    pub token: SecretString,
    pub user: TokenUser,
}

/// Owner of a token.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TokenUser {
    pub id: String,
    pub name: String,
}

impl From<token::TokenUser> for TokenUser {
    fn from(value: token::TokenUser) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KeystoneUser {
    pub id: String,
    pub name: String,
    /// Empty when the user has no email.
    pub email: String,
}

impl From<User> for KeystoneUser {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email.unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KeystoneGroup {
    pub id: String,
    pub name: String,
}

impl From<Group> for KeystoneGroup {
    fn from(value: Group) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

/// Role assignment with the names resolved.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RoleAssignment {
    pub role_name: String,
    pub project_name: Option<String>,
    pub domain_name: Option<String>,
}

impl From<Assignment> for RoleAssignment {
    fn from(value: Assignment) -> Self {
        Self {
            role_name: value.role.name.unwrap_or_default(),
            project_name: value
                .scope
                .project
                .and_then(|project| project.name)
                .filter(|name| !name.is_empty()),
            domain_name: value
                .scope
                .domain
                .and_then(|domain| domain.name)
                .filter(|name| !name.is_empty()),
        }
    }
}

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
use secrecy::SecretString;

use crate::error::BuilderError;
use crate::types::identity::Identity;

/// Username/password login attempt.
///
/// The second factor is passed in the same request: after the first attempt
/// fails with [`ConnectorError::TotpRequired`](crate::error::ConnectorError),
/// repeat the login with the `totp_passcode` and the received `receipt`.
#[derive(Builder, Clone, Debug)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct LoginRequest {
    /// User name, or `appcred:<id>` to log in with an application credential.
    pub username: String,

    /// User password or application credential secret.
    pub password: SecretString,

    /// Domain (id or name) overriding the configured one.
    #[builder(default)]
    pub domain: Option<String>,

    /// TOTP passcode.
    #[builder(default)]
    pub totp_passcode: Option<SecretString>,

    /// Auth receipt returned by Keystone on the first attempt.
    #[builder(default)]
    pub receipt: Option<String>,
}

impl LoginRequest {
    pub fn builder() -> LoginRequestBuilder {
        LoginRequestBuilder::default()
    }

    /// Plain login with the configured domain.
    pub fn new<U: Into<String>>(username: U, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
            domain: None,
            totp_passcode: None,
            receipt: None,
        }
    }

    /// Domain override, ignoring an empty one.
    pub(crate) fn domain_override(&self) -> Option<&str> {
        self.domain.as_deref().filter(|val| !val.is_empty())
    }
}

/// Result of a login that Keystone answered.
#[derive(Clone, Debug, PartialEq)]
pub enum LoginOutcome {
    /// Credentials were accepted.
    Valid(Identity),
    /// Credentials (or the passcode) were rejected.
    Invalid,
}

impl LoginOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Valid(identity) => Some(identity),
            Self::Invalid => None,
        }
    }

    pub fn into_identity(self) -> Option<Identity> {
        match self {
            Self::Valid(identity) => Some(identity),
            Self::Invalid => None,
        }
    }
}

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
//! # Token (`/v3/auth/tokens`) API types.

use derive_builder::Builder;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::BuilderError;
use crate::scope::Domain;
use crate::serialize_secret;

/// Authentication request.
#[derive(Clone, Debug, Serialize)]
pub struct AuthRequest {
    /// Authentication request.
    pub auth: AuthRequestInner,
}

/// Authentication request.
#[derive(Clone, Debug, Serialize)]
pub struct AuthRequestInner {
    /// Identity.
    pub identity: Identity,
}

impl From<Identity> for AuthRequest {
    fn from(identity: Identity) -> Self {
        Self {
            auth: AuthRequestInner { identity },
        }
    }
}

/// An identity object.
#[derive(Builder, Clone, Debug, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct Identity {
    /// The authentication method. For password authentication, specify
    /// `password`, for the second factor add `totp`.
    pub methods: Vec<String>,

    /// The password object, contains the authentication information.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<PasswordAuth>,

    /// The application credential object.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_credential: Option<ApplicationCredentialAuth>,

    /// The TOTP object carrying the one-time passcode.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totp: Option<TotpAuth>,
}

/// The password object, contains the authentication information.
#[derive(Clone, Debug, Serialize)]
pub struct PasswordAuth {
    /// A user object.
    pub user: UserPassword,
}

/// User password information.
#[derive(Builder, Clone, Debug, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into))]
pub struct UserPassword {
    /// User name.
    pub name: String,
    /// User domain.
    pub domain: Domain,
    /// User password.
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

/// Application credential authentication.
#[derive(Builder, Clone, Debug, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into))]
pub struct ApplicationCredentialAuth {
    /// Application credential ID.
    pub id: String,
    /// Application credential secret.
    #[serde(serialize_with = "serialize_secret")]
    pub secret: SecretString,
}

/// The TOTP object.
#[derive(Clone, Debug, Serialize)]
pub struct TotpAuth {
    /// A user object.
    pub user: UserTotp,
}

/// User TOTP information.
#[derive(Builder, Clone, Debug, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into))]
pub struct UserTotp {
    /// User name.
    pub name: String,
    /// User domain.
    pub domain: Domain,
    /// The one-time passcode.
    #[serde(serialize_with = "serialize_secret")]
    pub passcode: SecretString,
}

/// Token response.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TokenResponse {
    /// Token.
    pub token: Token,
}

/// Token.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Token {
    /// Authentication methods used to obtain the token.
    #[serde(default)]
    pub methods: Vec<String>,

    /// The date and time when the token expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,

    /// A user object.
    #[serde(default)]
    pub user: TokenUser,
}

/// Token user.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TokenUser {
    /// User ID.
    #[serde(default)]
    pub id: String,

    /// User name.
    #[serde(default)]
    pub name: String,

    /// User domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

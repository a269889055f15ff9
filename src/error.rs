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
//! # Error
//!
//! Errors that can occur while talking to Keystone on behalf of the
//! connector. Rejected credentials are not errors: they are reported as
//! [`LoginOutcome::Invalid`](crate::types::LoginOutcome::Invalid).
use reqwest::StatusCode;
use thiserror::Error;

pub use openstack_keystone_api_types::error::BuilderError;

/// Keystone connector error.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The password was accepted, but Keystone requires a second factor. The
    /// receipt must be passed back unchanged together with the passcode.
    #[error("keystone: totp required")]
    TotpRequired {
        /// Opaque auth receipt issued by Keystone.
        receipt: String,
    },

    /// Keystone answered with a status the caller cannot interpret.
    #[error("keystone: unexpected status {status}, body: {body}")]
    UnexpectedStatus {
        /// Response status.
        status: StatusCode,
        /// Response body.
        body: String,
    },

    /// HTTP client error.
    #[error("keystone: {source}")]
    Http {
        /// The source of the error.
        #[from]
        source: reqwest::Error,
    },

    /// The response body does not match the expected shape.
    #[error("keystone: invalid {context} response: {source}")]
    InvalidResponse {
        /// The request the response belongs to.
        context: &'static str,
        /// The source of the error.
        source: serde_json::Error,
    },

    /// Token validation returned a token without the user id.
    #[error("keystone: token did not contain user id")]
    MissingUserId,

    /// Keystone issued the token without the `X-Subject-Token` header.
    #[error("keystone: no token returned in X-Subject-Token header")]
    MissingSubjectToken,

    /// Service account login failed.
    #[error("keystone: failed to obtain admin token: {source}")]
    AdminToken {
        /// The source of the error.
        source: Box<ConnectorError>,
    },

    /// User can not be found (anymore).
    #[error("keystone: user {user_id:?} does not exist")]
    UserNotFound {
        /// User ID.
        user_id: String,
        /// The source of the error.
        source: Box<ConnectorError>,
    },

    /// Request builder error.
    #[error(transparent)]
    Builder {
        /// The source of the error.
        #[from]
        source: BuilderError,
    },

    /// Configuration error.
    #[error("configuration error: {source}")]
    Config {
        /// The source of the error.
        #[from]
        source: config::ConfigError,
    },

    /// Header value can not be used.
    #[error("invalid header value: {source}")]
    InvalidHeader {
        /// The source of the error.
        #[from]
        source: reqwest::header::InvalidHeaderValue,
    },

    /// Url parsing error.
    #[error(transparent)]
    UrlParse {
        /// The source of the error.
        #[from]
        source: url::ParseError,
    },

    /// Duration in the configuration can not be parsed.
    #[error("invalid duration in {key}: {source}")]
    InvalidDuration {
        /// Configuration key.
        key: &'static str,
        /// The source of the error.
        source: humantime::DurationError,
    },

    /// The base url can not be extended with the endpoint path.
    #[error("keystone url {0} can not be a base")]
    InvalidBaseUrl(String),
}

impl ConnectorError {
    /// Return the Keystone auth receipt when the error is the TOTP step-up
    /// signal.
    pub fn totp_receipt(&self) -> Option<&str> {
        match self {
            Self::TotpRequired { receipt } => Some(receipt.as_str()),
            _ => None,
        }
    }

    /// Response status of the failed Keystone request, if there was a
    /// response at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Http { source } => source.status(),
            Self::AdminToken { source } | Self::UserNotFound { source, .. } => source.status(),
            _ => None,
        }
    }
}

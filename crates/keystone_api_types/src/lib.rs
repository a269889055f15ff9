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

//! # OpenStack Keystone API types
//!
//! This crate defines the subset of the Keystone v3 REST API types that the
//! identity connector sends and receives: the authentication request with the
//! `password`, `application_credential` and `totp` methods, the token
//! response, and the user, group and role assignment listings.

use secrecy::{ExposeSecret, SecretString};
use serde::Serializer;

pub mod error;
pub mod scope;
pub mod v3;

/// Serialize a [`SecretString`] as a plain string.
///
/// Request bodies must carry the secret in clear, while the in-memory
/// representation keeps it redacted in `Debug` output.
pub fn serialize_secret<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(secret.expose_secret())
}

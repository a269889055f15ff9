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
//! # Role assignment API types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::BuilderError;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Assignment {
    /// Group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Actor>,

    /// Role.
    #[serde(default)]
    pub role: Role,

    /// Target scope.
    #[serde(default)]
    pub scope: Scope,

    /// User.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Actor>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Role {
    /// The role ID.
    #[serde(default)]
    pub id: String,

    /// The role name. Only returned when names are requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// User or group the role is assigned to.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Actor {
    #[serde(default)]
    pub id: String,
}

/// Assignment target.
///
/// Keystone returns exactly one of the targets, possibly next to the
/// inheritance marker, so the targets are modelled as optional members rather
/// than as an enum.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Scope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ScopeTarget>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<ScopeTarget>,

    #[serde(
        default,
        rename = "OS-INHERIT:inherited_to",
        skip_serializing_if = "Option::is_none"
    )]
    pub inherited_to: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ScopeTarget {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AssignmentList {
    /// Collection of role assignment objects.
    pub role_assignments: Vec<Assignment>,
}

#[derive(Builder, Clone, Debug, Default, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct RoleAssignmentListParameters {
    /// Filters the response by a user ID.
    #[builder(default)]
    #[serde(rename = "user.id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// If set, the names of any entities returned will be included as well as
    /// their IDs.
    #[builder(default)]
    #[serde(serialize_with = "serialize_flag")]
    pub include_names: bool,
}

/// Keystone interprets any value other than `0` as true, the numeric form is
/// what the reference clients send.
fn serialize_flag<S>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*flag))
}

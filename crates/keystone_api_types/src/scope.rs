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

use crate::error::BuilderError;

/// Domain reference as used in the authentication request.
///
/// Keystone expects exactly one of `id` or `name`.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError", validate = "Self::validate"))]
#[builder(setter(into, strip_option))]
pub struct Domain {
    /// Domain ID.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Domain Name.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DomainBuilder {
    fn validate(&self) -> Result<(), String> {
        match (&self.id, &self.name) {
            (Some(Some(_)), Some(Some(_))) => {
                Err("domain id and name are mutually exclusive".into())
            }
            (Some(Some(_)), _) | (_, Some(Some(_))) => Ok(()),
            _ => Err("either domain id or name must be set".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_domain_serialize_id() {
        let domain = DomainBuilder::default().id("default").build().unwrap();
        assert_eq!(json!({"id": "default"}), serde_json::to_value(domain).unwrap());
    }

    #[test]
    fn test_domain_serialize_name() {
        let domain = DomainBuilder::default().name("Users").build().unwrap();
        assert_eq!(json!({"name": "Users"}), serde_json::to_value(domain).unwrap());
    }

    #[test]
    fn test_domain_builder_requires_one() {
        assert!(DomainBuilder::default().build().is_err());
        assert!(
            DomainBuilder::default()
                .id("did")
                .name("dname")
                .build()
                .is_err()
        );
    }
}

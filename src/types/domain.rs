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

use std::fmt;

use serde::Deserialize;
use uuid::Uuid;

use openstack_keystone_api_types::scope::Domain;

/// Id of the domain Keystone creates on bootstrap. It is not a UUID but must
/// still be sent as an id.
const DEFAULT_DOMAIN_ID: &str = "default";

/// Reference to the Keystone domain of a user.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(from = "String")]
pub enum DomainRef {
    /// Domain ID.
    Id(String),
    /// Domain name.
    Name(String),
}

impl DomainRef {
    /// Classify the value: a well-formed UUID (in any of its textual forms)
    /// or `default` is an id, everything else a name.
    pub fn parse<S: AsRef<str>>(value: S) -> Self {
        let value = value.as_ref();
        if value == DEFAULT_DOMAIN_ID || Uuid::parse_str(value).is_ok() {
            Self::Id(value.to_string())
        } else {
            Self::Name(value.to_string())
        }
    }
}

impl Default for DomainRef {
    fn default() -> Self {
        Self::Id(DEFAULT_DOMAIN_ID.to_string())
    }
}

impl From<String> for DomainRef {
    fn from(value: String) -> Self {
        Self::parse(value)
    }
}

impl From<&str> for DomainRef {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<&DomainRef> for Domain {
    fn from(value: &DomainRef) -> Self {
        match value {
            DomainRef::Id(id) => Domain {
                id: Some(id.clone()),
                name: None,
            },
            DomainRef::Name(name) => Domain {
                id: None,
                name: Some(name.clone()),
            },
        }
    }
}

impl fmt::Display for DomainRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id={id}"),
            Self::Name(name) => write!(f, "name={name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default() {
        assert_eq!(DomainRef::Id("default".into()), DomainRef::parse("default"));
    }

    #[test]
    fn test_parse_uuid_forms() {
        for val in [
            "8e4c2f8c-6a4a-4b2e-9d8a-6a7c1f2b3d4e",
            "8e4c2f8c6a4a4b2e9d8a6a7c1f2b3d4e",
            "urn:uuid:8e4c2f8c-6a4a-4b2e-9d8a-6a7c1f2b3d4e",
            "{8e4c2f8c-6a4a-4b2e-9d8a-6a7c1f2b3d4e}",
        ] {
            assert_eq!(DomainRef::Id(val.into()), DomainRef::parse(val));
        }
    }

    #[test]
    fn test_parse_names() {
        for val in ["Default", "users", "8e4c2f8c-nope", "", "DEFAULT"] {
            assert_eq!(DomainRef::Name(val.into()), DomainRef::parse(val));
        }
    }

    #[test]
    fn test_into_wire_domain() {
        let domain = Domain::from(&DomainRef::parse("users"));
        assert_eq!(Some("users".to_string()), domain.name);
        assert!(domain.id.is_none());

        let domain = Domain::from(&DomainRef::parse("default"));
        assert_eq!(Some("default".to_string()), domain.id);
        assert!(domain.name.is_none());
    }

    #[test]
    fn test_deserialize() {
        let domain: DomainRef = serde_json::from_str("\"users\"").unwrap();
        assert_eq!(DomainRef::Name("users".into()), domain);
    }
}

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
//! # User API types.

use serde::{Deserialize, Serialize};

/// User response object.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct User {
    /// User domain ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    /// User email. Keystone keeps it among the extra user properties, so it
    /// is only present when it was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// If the user is enabled, this value is true. If the user is disabled,
    /// this value is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// User ID.
    pub id: String,
    /// User name.
    pub name: String,
}

/// Complete response with the user data.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct UserResponse {
    /// User object.
    pub user: User,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_user_with_extra_properties() {
        let rsp: UserResponse = serde_json::from_value(json!({"user": {
            "id": "uid",
            "name": "jdoe",
            "email": "jdoe@example.com",
            "domain_id": "default",
            "enabled": true,
            "password_expires_at": null,
            "links": {"self": "http://localhost/v3/users/uid"}
        }}))
        .unwrap();
        assert_eq!(Some("jdoe@example.com".to_string()), rsp.user.email);
        assert_eq!("uid", rsp.user.id);
    }

    #[test]
    fn test_user_null_email() {
        let rsp: UserResponse =
            serde_json::from_value(json!({"user": {"id": "uid", "name": "n", "email": null}}))
                .unwrap();
        assert!(rsp.user.email.is_none());
    }
}

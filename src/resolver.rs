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
//! # Group and role resolution
//!
//! Group names and role assignments of the user are turned into the labels
//! of the identity. Role assignments become `role@project`, `role@domain` or
//! just `role` depending on the assignment target. The operator may rename
//! any label through the group mapping.
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, warn};

use crate::error::ConnectorError;
use crate::transport::{KeystoneApi, RoleAssignment};

/// Resolves group and role labels of users.
#[derive(Clone)]
pub struct GroupResolver {
    transport: Arc<dyn KeystoneApi>,
    mapping: HashMap<String, String>,
    fetch_roles: bool,
}

impl GroupResolver {
    pub fn new(
        transport: Arc<dyn KeystoneApi>,
        mapping: HashMap<String, String>,
        fetch_roles: bool,
    ) -> Self {
        Self {
            transport,
            mapping,
            fetch_roles,
        }
    }

    /// Apply the rename mapping. Mapping to the empty string keeps the label.
    fn rename(&self, label: String) -> String {
        match self.mapping.get(&label) {
            Some(renamed) if !renamed.is_empty() => renamed.clone(),
            _ => label,
        }
    }

    /// Resolve the labels of the user using the configured role inclusion.
    pub async fn resolve(
        &self,
        user_id: &str,
        auth_token: &SecretString,
    ) -> Result<Vec<String>, ConnectorError> {
        self.resolve_with(user_id, auth_token, self.fetch_roles)
            .await
    }

    /// Resolve the labels of the user.
    ///
    /// Group labels come first in the Keystone order, followed by the role
    /// labels in the order of the assignments. Roles are de-duplicated among
    /// themselves only. A failure to list the role assignments is logged and
    /// only the groups are returned.
    #[tracing::instrument(skip(self, auth_token))]
    pub async fn resolve_with(
        &self,
        user_id: &str,
        auth_token: &SecretString,
        include_roles: bool,
    ) -> Result<Vec<String>, ConnectorError> {
        let mut labels: Vec<String> = self
            .transport
            .fetch_groups(user_id, auth_token)
            .await?
            .into_iter()
            .map(|group| self.rename(group.name))
            .collect();

        if !include_roles {
            return Ok(labels);
        }

        match self
            .transport
            .fetch_role_assignments(user_id, auth_token)
            .await
        {
            Ok(assignments) => {
                let mut seen = HashSet::new();
                for label in assignments.iter().filter_map(role_label) {
                    let label = self.rename(label);
                    if seen.insert(label.clone()) {
                        labels.push(label);
                    }
                }
            }
            Err(err) => {
                warn!("failed to list role assignments of user {user_id}: {err}");
            }
        }
        debug!("resolved {} labels", labels.len());
        Ok(labels)
    }
}

/// Label of the role assignment. Assignments without the role name are
/// skipped.
fn role_label(assignment: &RoleAssignment) -> Option<String> {
    if assignment.role_name.is_empty() {
        return None;
    }
    Some(
        match (&assignment.project_name, &assignment.domain_name) {
            (Some(project), _) => format!("{}@{}", assignment.role_name, project),
            (None, Some(domain)) => format!("{}@{}", assignment.role_name, domain),
            (None, None) => assignment.role_name.clone(),
        },
    )
}

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

use async_trait::async_trait;
use mockall::mock;
use secrecy::SecretString;

use crate::error::ConnectorError;
use crate::transport::KeystoneApi;
use crate::transport::types::*;

mock! {
    pub KeystoneApi {}

    #[async_trait]
    impl KeystoneApi for KeystoneApi {
        async fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse, ConnectorError>;

        async fn validate_token(&self, subject_token: &SecretString) -> Result<TokenUser, ConnectorError>;

        async fn fetch_user<'a>(
            &self,
            user_id: &'a str,
            auth_token: &'a SecretString,
        ) -> Result<KeystoneUser, ConnectorError>;

        async fn fetch_groups<'a>(
            &self,
            user_id: &'a str,
            auth_token: &'a SecretString,
        ) -> Result<Vec<KeystoneGroup>, ConnectorError>;

        async fn fetch_role_assignments<'a>(
            &self,
            user_id: &'a str,
            auth_token: &'a SecretString,
        ) -> Result<Vec<RoleAssignment>, ConnectorError>;
    }
}

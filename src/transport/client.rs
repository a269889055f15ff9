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
//! # HTTP client of the Keystone v3 API.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use openstack_keystone_api_types::scope::Domain;
use openstack_keystone_api_types::v3::auth::token::{
    self as wire, ApplicationCredentialAuthBuilder, AuthRequest, IdentityBuilder, PasswordAuth,
    TokenResponse, TotpAuth, UserPasswordBuilder, UserTotpBuilder,
};
use openstack_keystone_api_types::v3::group::GroupList;
use openstack_keystone_api_types::v3::role_assignment::{
    AssignmentList, RoleAssignmentListParametersBuilder,
};
use openstack_keystone_api_types::v3::user::UserResponse;

use crate::config::Config;
use crate::error::ConnectorError;
use crate::transport::KeystoneApi;
use crate::transport::types::*;

/// Header carrying the token that authenticates the request.
const AUTH_TOKEN_HEADER: &str = "x-auth-token";
/// Header carrying the issued or validated token.
const SUBJECT_TOKEN_HEADER: &str = "x-subject-token";
/// Header carrying the receipt of the partially completed MFA login.
const AUTH_RECEIPT_HEADER: &str = "openstack-auth-receipt";

/// Keystone client.
///
/// Cloning is cheap, the connection pool is shared between the clones.
#[derive(Clone, Debug)]
pub struct KeystoneClient {
    http: Client,
    base_url: Url,
    timeout: Option<Duration>,
}

impl KeystoneClient {
    /// Create the client for the Keystone at `base_url`. The url may carry
    /// a path prefix (`https://cloud.example.com/identity`).
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, ConnectorError> {
        if base_url.cannot_be_a_base() {
            return Err(ConnectorError::InvalidBaseUrl(base_url.to_string()));
        }
        let http = Client::builder()
            .tcp_keepalive(Duration::from_secs(60))
            .gzip(true)
            .build()?;
        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ConnectorError> {
        Self::new(config.keystone_host.clone(), config.request_timeout()?)
    }

    /// Url of the endpoint below the base url. Every segment is escaped on
    /// its own.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ConnectorError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConnectorError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    /// Send the request authenticated with the token and decode the response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        auth_token: &SecretString,
        context: &'static str,
    ) -> Result<T, ConnectorError> {
        let response = request
            .header(AUTH_TOKEN_HEADER, sensitive(auth_token.expose_secret())?)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }
        decode(response, context).await
    }
}

/// Header value hidden from the `Debug` output.
fn sensitive(value: &str) -> Result<HeaderValue, ConnectorError> {
    let mut header = HeaderValue::from_str(value)?;
    header.set_sensitive(true);
    Ok(header)
}

/// Non empty header value.
fn header_value(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|val| val.to_str().ok())
        .filter(|val| !val.is_empty())
        .map(String::from)
}

async fn decode<T: DeserializeOwned>(
    response: Response,
    context: &'static str,
) -> Result<T, ConnectorError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|source| ConnectorError::InvalidResponse { context, source })
}

async fn unexpected_status(response: Response) -> ConnectorError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    debug!("keystone returned {status}: {body}");
    ConnectorError::UnexpectedStatus { status, body }
}

/// Build the `identity` of the auth request.
fn auth_identity(credentials: &Credentials) -> Result<wire::Identity, ConnectorError> {
    let mut identity = IdentityBuilder::default();
    if let Some(id) = credentials.application_credential_id() {
        identity
            .methods(vec!["application_credential".to_string()])
            .application_credential(
                ApplicationCredentialAuthBuilder::default()
                    .id(id)
                    .secret(credentials.secret.clone())
                    .build()?,
            );
        return Ok(identity.build()?);
    }

    let domain = Domain::from(&credentials.domain);
    let mut methods = vec!["password".to_string()];
    identity.password(PasswordAuth {
        user: UserPasswordBuilder::default()
            .name(credentials.username.clone())
            .domain(domain.clone())
            .password(credentials.secret.clone())
            .build()?,
    });
    if let Some(passcode) = credentials
        .totp_passcode
        .as_ref()
        .filter(|val| !val.expose_secret().is_empty())
    {
        methods.push("totp".to_string());
        identity.totp(TotpAuth {
            user: UserTotpBuilder::default()
                .name(credentials.username.clone())
                .domain(domain)
                .passcode(passcode.clone())
                .build()?,
        });
    }
    identity.methods(methods);
    Ok(identity.build()?)
}

#[async_trait]
impl KeystoneApi for KeystoneClient {
    #[tracing::instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse, ConnectorError> {
        let mut request = self
            .request(Method::POST, self.endpoint(&["v3", "auth", "tokens"])?)
            .json(&AuthRequest::from(auth_identity(credentials)?));
        if let Some(receipt) = credentials.receipt.as_deref().filter(|val| !val.is_empty()) {
            request = request.header(AUTH_RECEIPT_HEADER, sensitive(receipt)?);
        }
        let response = request.send().await?;

        match response.status() {
            StatusCode::CREATED => {
                let token = header_value(&response, SUBJECT_TOKEN_HEADER)
                    .map(SecretString::from)
                    .ok_or(ConnectorError::MissingSubjectToken)?;
                let body: TokenResponse = decode(response, "token").await?;
                Ok(AuthResponse::Created(IssuedToken {
                    token,
                    user: body.token.user.into(),
                }))
            }
            StatusCode::UNAUTHORIZED => match header_value(&response, AUTH_RECEIPT_HEADER) {
                Some(receipt) => {
                    trace!("keystone requested the second factor");
                    Ok(AuthResponse::ReceiptRequired(receipt))
                }
                None => Ok(AuthResponse::Unauthorized),
            },
            status if status.is_success() => Ok(AuthResponse::Accepted {
                status,
                token: header_value(&response, SUBJECT_TOKEN_HEADER).map(SecretString::from),
            }),
            _ => Err(unexpected_status(response).await),
        }
    }

    #[tracing::instrument(skip_all)]
    async fn validate_token(
        &self,
        subject_token: &SecretString,
    ) -> Result<TokenUser, ConnectorError> {
        let token = sensitive(subject_token.expose_secret())?;
        let response = self
            .request(Method::GET, self.endpoint(&["v3", "auth", "tokens"])?)
            .header(AUTH_TOKEN_HEADER, token.clone())
            .header(SUBJECT_TOKEN_HEADER, token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }
        let body: TokenResponse = decode(response, "token").await?;
        Ok(body.token.user.into())
    }

    #[tracing::instrument(skip(self, auth_token))]
    async fn fetch_user<'a>(
        &self,
        user_id: &'a str,
        auth_token: &'a SecretString,
    ) -> Result<KeystoneUser, ConnectorError> {
        let request = self.request(Method::GET, self.endpoint(&["v3", "users", user_id])?);
        let body: UserResponse = self.get_json(request, auth_token, "user").await?;
        Ok(body.user.into())
    }

    #[tracing::instrument(skip(self, auth_token))]
    async fn fetch_groups<'a>(
        &self,
        user_id: &'a str,
        auth_token: &'a SecretString,
    ) -> Result<Vec<KeystoneGroup>, ConnectorError> {
        let request = self.request(
            Method::GET,
            self.endpoint(&["v3", "users", user_id, "groups"])?,
        );
        let body: GroupList = self.get_json(request, auth_token, "group list").await?;
        Ok(body.groups.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self, auth_token))]
    async fn fetch_role_assignments<'a>(
        &self,
        user_id: &'a str,
        auth_token: &'a SecretString,
    ) -> Result<Vec<RoleAssignment>, ConnectorError> {
        let params = RoleAssignmentListParametersBuilder::default()
            .user_id(user_id)
            .include_names(true)
            .build()?;
        let request = self
            .request(Method::GET, self.endpoint(&["v3", "role_assignments"])?)
            .query(&params);
        let body: AssignmentList = self
            .get_json(request, auth_token, "role assignment list")
            .await?;
        Ok(body.role_assignments.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use eyre::Result;
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;
    use crate::tests::keystone::token_body;
    use crate::types::DomainRef;

    fn client(server: &MockServer) -> Result<KeystoneClient> {
        Ok(KeystoneClient::new(Url::parse(&server.base_url())?, None)?)
    }

    fn secret(val: &str) -> SecretString {
        SecretString::from(val.to_string())
    }

    #[tokio::test]
    async fn test_authenticate_password() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/v3/auth/tokens")
                    .header_missing("openstack-auth-receipt")
                    .json_body(json!({"auth": {"identity": {
                        "methods": ["password"],
                        "password": {"user": {
                            "name": "jdoe",
                            "domain": {"id": "default"},
                            "password": "pass"
                        }}
                    }}}));
                then.status(201)
                    .header("content-type", "application/json")
                    .header("X-Subject-Token", "tok-1")
                    .json_body(token_body("u-1", "jdoe"));
            })
            .await;

        let creds = Credentials::password("jdoe", secret("pass"), DomainRef::default());
        if let AuthResponse::Created(issued) = client(&server)?.authenticate(&creds).await? {
            assert_eq!("tok-1", issued.token.expose_secret());
            assert_eq!(
                TokenUser {
                    id: "u-1".into(),
                    name: "jdoe".into()
                },
                issued.user
            );
        } else {
            panic!("201 must issue the token");
        }
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate_totp_with_receipt() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/v3/auth/tokens")
                    .header("openstack-auth-receipt", "receipt-xyz")
                    .json_body(json!({"auth": {"identity": {
                        "methods": ["password", "totp"],
                        "password": {"user": {
                            "name": "jdoe",
                            "domain": {"name": "users"},
                            "password": "pass"
                        }},
                        "totp": {"user": {
                            "name": "jdoe",
                            "domain": {"name": "users"},
                            "passcode": "123456"
                        }}
                    }}}));
                then.status(201)
                    .header("X-Subject-Token", "tok-2")
                    .json_body(token_body("u-1", "jdoe"));
            })
            .await;

        let mut creds = Credentials::password("jdoe", secret("pass"), DomainRef::parse("users"));
        creds.totp_passcode = Some(secret("123456"));
        creds.receipt = Some("receipt-xyz".into());
        assert!(matches!(
            client(&server)?.authenticate(&creds).await?,
            AuthResponse::Created(_)
        ));
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate_empty_totp_ignored() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/v3/auth/tokens")
                    .header_missing("openstack-auth-receipt")
                    .json_body(json!({"auth": {"identity": {
                        "methods": ["password"],
                        "password": {"user": {
                            "name": "jdoe",
                            "domain": {"id": "default"},
                            "password": "pass"
                        }}
                    }}}));
                then.status(401);
            })
            .await;

        let mut creds = Credentials::password("jdoe", secret("pass"), DomainRef::default());
        creds.totp_passcode = Some(secret(""));
        creds.receipt = Some(String::new());
        assert!(matches!(
            client(&server)?.authenticate(&creds).await?,
            AuthResponse::Unauthorized
        ));
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate_application_credential() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/v3/auth/tokens")
                    .json_body(json!({"auth": {"identity": {
                        "methods": ["application_credential"],
                        "application_credential": {"id": "abc123", "secret": "s3cr3t"}
                    }}}));
                then.status(201)
                    .header("X-Subject-Token", "tok-ac")
                    .json_body(token_body("u-ac", "svc"));
            })
            .await;

        let creds = Credentials::password("appcred:abc123", secret("s3cr3t"), DomainRef::default());
        assert!(matches!(
            client(&server)?.authenticate(&creds).await?,
            AuthResponse::Created(_)
        ));
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate_receipt_required() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("POST").path("/v3/auth/tokens");
                then.status(401)
                    .header("Openstack-Auth-Receipt", "receipt-xyz")
                    .json_body(json!({"receipt": {"methods": ["password"]}}));
            })
            .await;

        let creds = Credentials::password("jdoe", secret("pass"), DomainRef::default());
        if let AuthResponse::ReceiptRequired(receipt) =
            client(&server)?.authenticate(&creds).await?
        {
            assert_eq!("receipt-xyz", receipt);
        } else {
            panic!("401 with the receipt must require the second factor");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate_other_success_status() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("POST").path("/v3/auth/tokens");
                then.status(200)
                    .header("X-Subject-Token", "tok-200")
                    .json_body(token_body("u-1", "jdoe"));
            })
            .await;

        let creds = Credentials::password("jdoe", secret("pass"), DomainRef::default());
        if let AuthResponse::Accepted { status, token } =
            client(&server)?.authenticate(&creds).await?
        {
            assert_eq!(StatusCode::OK, status);
            assert_eq!(Some("tok-200"), token.as_ref().map(|x| x.expose_secret()));
        } else {
            panic!("200 is neither an issued token nor a rejection");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate_server_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("POST").path("/v3/auth/tokens");
                then.status(500).body("internal failure");
            })
            .await;

        let creds = Credentials::password("jdoe", secret("pass"), DomainRef::default());
        if let Err(ConnectorError::UnexpectedStatus { status, body }) =
            client(&server)?.authenticate(&creds).await
        {
            assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
            assert_eq!("internal failure", body);
        } else {
            panic!("500 must be an error");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate_missing_subject_token() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("POST").path("/v3/auth/tokens");
                then.status(201).json_body(token_body("u-1", "jdoe"));
            })
            .await;

        let creds = Credentials::password("jdoe", secret("pass"), DomainRef::default());
        if let Err(ConnectorError::MissingSubjectToken) =
            client(&server)?.authenticate(&creds).await
        {
        } else {
            panic!("token without X-Subject-Token must be rejected");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_validate_token() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/v3/auth/tokens")
                    .header("x-auth-token", "user-tok")
                    .header("x-subject-token", "user-tok");
                then.status(200)
                    .header("X-Subject-Token", "user-tok")
                    .json_body(token_body("u-1", "jdoe"));
            })
            .await;

        let user = client(&server)?.validate_token(&secret("user-tok")).await?;
        assert_eq!("u-1", user.id);
        assert_eq!("jdoe", user.name);
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_validate_token_rejected() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/v3/auth/tokens");
                then.status(404)
                    .json_body(json!({"error": {"code": 404, "message": "Could not find token"}}));
            })
            .await;

        let err = client(&server)?
            .validate_token(&secret("expired"))
            .await
            .unwrap_err();
        assert_eq!(Some(StatusCode::NOT_FOUND), err.status());
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_user_below_path_prefix() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/identity/v3/users/u-1")
                    .header("x-auth-token", "tok");
                then.status(200).json_body(json!({"user": {
                    "id": "u-1",
                    "name": "jdoe",
                    "email": "jdoe@example.com",
                    "domain_id": "default",
                    "enabled": true
                }}));
            })
            .await;

        let client = KeystoneClient::new(Url::parse(&server.url("/identity"))?, None)?;
        assert_eq!(
            KeystoneUser {
                id: "u-1".into(),
                name: "jdoe".into(),
                email: "jdoe@example.com".into()
            },
            client.fetch_user("u-1", &secret("tok")).await?
        );
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_user_invalid_body() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/v3/users/u-1");
                then.status(200).body("<html>proxy error</html>");
            })
            .await;

        if let Err(ConnectorError::InvalidResponse { context, .. }) =
            client(&server)?.fetch_user("u-1", &secret("tok")).await
        {
            assert_eq!("user", context);
        } else {
            panic!("non json body must be rejected");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_groups() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/v3/users/u-1/groups")
                    .header("x-auth-token", "tok");
                then.status(200).json_body(json!({"groups": [
                    {"id": "g-1", "name": "admins", "domain_id": "default", "description": ""},
                    {"id": "g-2", "name": "developers", "domain_id": "default"}
                ]}));
            })
            .await;

        let groups = client(&server)?.fetch_groups("u-1", &secret("tok")).await?;
        assert_eq!(
            vec!["admins", "developers"],
            groups.iter().map(|x| x.name.as_str()).collect::<Vec<_>>()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_groups_forbidden() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/v3/users/u-1/groups");
                then.status(403).body("forbidden");
            })
            .await;

        let err = client(&server)?
            .fetch_groups("u-1", &secret("tok"))
            .await
            .unwrap_err();
        assert_eq!(Some(StatusCode::FORBIDDEN), err.status());
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_role_assignments() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/v3/role_assignments")
                    .query_param("user.id", "u-1")
                    .query_param("include_names", "1")
                    .header("x-auth-token", "tok");
                then.status(200).json_body(json!({"role_assignments": [
                    {
                        "role": {"id": "r-1", "name": "admin"},
                        "scope": {"project": {"id": "p-1", "name": "demo", "domain": {"id": "default", "name": "Default"}}},
                        "user": {"id": "u-1", "name": "jdoe", "domain": {"id": "default", "name": "Default"}}
                    },
                    {
                        "role": {"id": "r-2", "name": "reader"},
                        "scope": {"domain": {"id": "default", "name": "Default"}},
                        "user": {"id": "u-1", "name": "jdoe", "domain": {"id": "default", "name": "Default"}}
                    }
                ]}));
            })
            .await;

        let assignments = client(&server)?
            .fetch_role_assignments("u-1", &secret("tok"))
            .await?;
        assert_eq!(
            vec![
                RoleAssignment {
                    role_name: "admin".into(),
                    project_name: Some("demo".into()),
                    domain_name: None,
                },
                RoleAssignment {
                    role_name: "reader".into(),
                    project_name: None,
                    domain_name: Some("Default".into()),
                },
            ],
            assignments
        );
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_request_timeout() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/v3/users/u-1");
                then.status(200)
                    .delay(Duration::from_secs(2))
                    .json_body(json!({"user": {"id": "u-1", "name": "jdoe"}}));
            })
            .await;

        let client = KeystoneClient::new(
            Url::parse(&server.base_url())?,
            Some(Duration::from_millis(100)),
        )?;
        if let Err(ConnectorError::Http { source }) =
            client.fetch_user("u-1", &secret("tok")).await
        {
            assert!(source.is_timeout());
        } else {
            panic!("slow response must time out");
        }
        Ok(())
    }

    #[test]
    fn test_endpoint_escapes_segments() -> Result<()> {
        let client = KeystoneClient::new(Url::parse("http://keystone:5000/identity/")?, None)?;
        assert_eq!(
            "http://keystone:5000/identity/v3/users/a%2Fb/groups",
            client.endpoint(&["v3", "users", "a/b", "groups"])?.as_str()
        );
        Ok(())
    }

    #[test]
    fn test_invalid_base_url() -> Result<()> {
        if let Err(ConnectorError::InvalidBaseUrl(_)) =
            KeystoneClient::new(Url::parse("mailto:admin@example.com")?, None)
        {
        } else {
            panic!("url without the path can not be the base");
        }
        Ok(())
    }
}

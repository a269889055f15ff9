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
//! # Connector types

pub mod connector_api;
pub mod domain;
pub mod identity;
pub mod login;

pub use connector_api::{PasswordConnector, RefreshConnector, TokenIdentityConnector};
pub use domain::DomainRef;
pub use identity::{Identity, IdentityBuilder, Scopes};
pub use login::{LoginOutcome, LoginRequest, LoginRequestBuilder};

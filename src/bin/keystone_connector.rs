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
//! Keystone connector executable.
//!
//! Runs the connector operations against the configured Keystone and prints
//! the resulting identity as JSON. Handy to verify the connector
//! configuration before handing it over to the identity provider.

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Report, Result};
use eyre::{WrapErr, eyre};
use secrecy::SecretString;
use tracing::{debug, info};
use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    prelude::*,
};

use openstack_keystone_connector::{
    Config, ConnectorError, Identity, KeystoneConnector, LoginOutcome, LoginRequest,
    PasswordConnector, RefreshConnector, Scopes, TokenIdentityConnector,
};

/// OpenStack Keystone identity connector.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the connector config file.
    #[arg(short, long, default_value = "/etc/keystone-connector/config.json")]
    config: PathBuf,

    /// Connector id.
    #[arg(long, default_value = "keystone")]
    id: String,

    /// Include the groups into the identity.
    #[arg(long, global = true)]
    groups: bool,

    /// Verbosity level. Repeat to increase level.
    #[arg(short, long, global=true, action = clap::ArgAction::Count, display_order = 920)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in with the user name and password.
    ///
    /// When Keystone requires the second factor, repeat the login with the
    /// passcode and the printed receipt.
    Login {
        /// User name (`appcred:<id>` for the application credential).
        #[arg(short, long)]
        username: String,

        /// Password (application credential secret).
        #[arg(long, env = "OS_PASSWORD", hide_env_values = true)]
        password: String,

        /// User domain (id or name) overriding the configured one.
        #[arg(long)]
        domain: Option<String>,

        /// TOTP passcode.
        #[arg(long, env = "OS_PASSCODE", hide_env_values = true)]
        passcode: Option<String>,

        /// Auth receipt of the first login attempt.
        #[arg(long)]
        receipt: Option<String>,
    },

    /// Resolve the identity of the Keystone token owner.
    ValidateToken {
        /// Keystone token.
        #[arg(long, env = "OS_TOKEN", hide_env_values = true)]
        token: String,

        /// Type of the subject token.
        #[arg(long, default_value = "urn:ietf:params:oauth:token-type:access_token")]
        token_type: String,
    },

    /// Check the user still exists using the admin account.
    Refresh {
        /// Keystone user id.
        #[arg(long)]
        user_id: String,

        /// User name to carry over into the identity.
        #[arg(long)]
        username: Option<String>,
    },
}

async fn run(connector: &KeystoneConnector, scopes: &Scopes, command: Command) -> Result<Identity> {
    match command {
        Command::Login {
            username,
            password,
            domain,
            passcode,
            receipt,
        } => {
            let request = LoginRequest {
                username,
                password: SecretString::from(password),
                domain,
                totp_passcode: passcode.map(SecretString::from),
                receipt,
            };
            match connector.login(scopes, &request).await {
                Ok(LoginOutcome::Valid(identity)) => Ok(identity),
                Ok(LoginOutcome::Invalid) => Err(eyre!("keystone rejected the credentials")),
                Err(ConnectorError::TotpRequired { receipt }) => Err(eyre!(
                    "second factor required, repeat the login with --passcode and --receipt {receipt}"
                )),
                Err(err) => Err(err.into()),
            }
        }
        Command::ValidateToken { token, token_type } => Ok(connector
            .token_identity(&token_type, &SecretString::from(token))
            .await?),
        Command::Refresh { user_id, username } => {
            let identity = Identity {
                user_id,
                username: username.unwrap_or_default(),
                ..Default::default()
            };
            Ok(connector.refresh(scopes, &identity).await?)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Report> {
    color_eyre::install()?;
    let args = Args::parse();

    let filter = Targets::new().with_default(match args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    });

    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(filter);

    // build the tracing registry
    tracing_subscriber::registry().with(log_layer).init();

    debug!("Loading the configuration from {:?}", args.config);
    let cfg = Config::new(args.config.clone()).wrap_err("Loading the configuration failed")?;
    let connector = KeystoneConnector::new(args.id.clone(), &cfg)?;
    info!("Using Keystone at {}", cfg.keystone_host);

    let scopes = Scopes {
        groups: args.groups,
        ..Default::default()
    };
    let identity = run(&connector, &scopes, args.command).await?;
    println!("{}", serde_json::to_string_pretty(&identity)?);

    connector.close()?;
    Ok(())
}

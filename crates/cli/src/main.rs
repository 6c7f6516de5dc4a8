//! `atelier-admin` -- store administration client.
//!
//! Talks to the store's REST backend on behalf of an administrator:
//! sign in, manage categories and products, edit site settings. The
//! session token is kept in a file between runs.
//!
//! # Environment variables
//!
//! | Variable                         | Required | Default                            |
//! |----------------------------------|----------|------------------------------------|
//! | `ATELIER_API_URL`                | no       | `http://127.0.0.1:8000/api`        |
//! | `ATELIER_TOKEN_PATH`             | no       | `<config dir>/atelier-admin/token` |
//! | `ATELIER_REQUEST_TIMEOUT_SECS`   | no       | `30`                               |
//! | `ATELIER_EDIT_REQUIRES_CATEGORY` | no       | `false`                            |
//! | `ATELIER_IMAGE_ORDER`            | no       | `completion`                       |
//! | `RUST_LOG`                       | no       | `atelier_admin=info,atelier_client=info` |

mod cli;
mod commands;

use std::process::ExitCode;
use std::sync::Arc;

use atelier_client::store::FileTokenStore;
use atelier_client::{AdminApi, ClientConfig, ClientError, ErrorKind, Session};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

/// Exit status when the stored session is missing or was rejected.
const EXIT_SESSION_EXPIRED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atelier_admin=info,atelier_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = url.trim().trim_end_matches('/').to_string();
    }

    tracing::debug!(api_url = %config.api_url, token_path = %config.token_path.display(), "Loaded configuration");

    let session = Session::new(Arc::new(FileTokenStore::new(config.token_path.clone())));
    let api = AdminApi::new(config, session)?;

    commands::run(api, cli.cmd).await
}

fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<ClientError>() {
        Some(e) if e.kind() == ErrorKind::SessionExpiry => {
            eprintln!("{}", e.user_message(""));
            eprintln!("Run `atelier-admin login --email <EMAIL>` to sign in.");
            ExitCode::from(EXIT_SESSION_EXPIRED)
        }
        Some(e) => {
            eprintln!("error: {}", e.user_message(&e.to_string()));
            ExitCode::FAILURE
        }
        None => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

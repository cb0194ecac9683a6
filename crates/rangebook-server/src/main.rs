//! Rangebook server binary.
//!
//! Loads [`ServerConfig`], opens the SQLite store it points at and serves
//! the JSON API under `/api`.
//!
//! # Edit secret
//!
//! Writes are gated by a shared secret stored as an argon2 PHC string. To
//! generate the value for `edit_password_hash`:
//!
//! ```
//! cargo run -p rangebook-server -- --hash-password
//! ```

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use rand_core::OsRng;
use rangebook_api::{ApiState, AuthConfig};
use rangebook_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Rangebook shooting log server")]
struct Cli {
  /// Settings file; missing is fine, defaults and RANGEBOOK_* apply.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Hash the edit secret read from stdin, print it, and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  let server_cfg = ServerConfig::load(&cli.config)?;
  let store_cfg = server_cfg.store();

  let store = SqliteStore::open(store_cfg.clone())
    .await
    .with_context(|| format!("failed to open store at {:?}", store_cfg.path()))?;
  tracing::info!(path = ?store_cfg.path(), "store ready");

  let state = ApiState {
    store: Arc::new(store),
    auth:  Arc::new(AuthConfig {
      password_hash: server_cfg.edit_password_hash.clone(),
    }),
  };

  let app = axum::Router::new()
    .nest("/api", rangebook_api::api_router(state))
    .layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// The first line of stdin. The prompt goes to stderr so stdout carries
/// only the hash.
fn read_password() -> anyhow::Result<String> {
  eprint!("Edit secret: ");
  let secret = std::io::stdin()
    .lines()
    .next()
    .transpose()?
    .unwrap_or_default();
  anyhow::ensure!(!secret.is_empty(), "edit secret must not be empty");
  Ok(secret)
}

//! Runtime configuration: an optional TOML file overlaid by `RANGEBOOK_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rangebook_store_sqlite::StoreConfig;
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  /// SQLite database file; a leading `~/` is expanded.
  pub store_path:         PathBuf,
  /// argon2 PHC string for the edit secret; see `--hash-password`.
  pub edit_password_hash: String,
}

impl ServerConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store_path", "~/.local/share/rangebook/rangebook.db")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("RANGEBOOK"))
      .build()
      .with_context(|| format!("cannot read settings from {path:?}"))?;

    settings
      .try_deserialize()
      .context("settings are incomplete or malformed")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn store(&self) -> StoreConfig { StoreConfig::new(expand_tilde(&self.store_path)) }
}

/// `~` as the first component means `$HOME`; `~user` is left as is.
fn expand_tilde(path: &Path) -> PathBuf {
  match (path.strip_prefix("~"), std::env::var_os("HOME")) {
    (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
    _ => path.to_path_buf(),
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn file_values_override_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
      file,
      "port = 9000\nstore_path = \"/var/lib/rangebook/range.db\"\nedit_password_hash = \"$argon2id$x\""
    )
    .unwrap();

    let cfg = ServerConfig::load(file.path()).unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:9000");
    assert_eq!(cfg.store().path(), Path::new("/var/lib/rangebook/range.db"));
    assert_eq!(cfg.edit_password_hash, "$argon2id$x");
  }

  #[test]
  fn home_prefix_is_expanded() {
    let Some(home) = std::env::var_os("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/.local/share/rangebook/rangebook.db")),
      PathBuf::from(home).join(".local/share/rangebook/rangebook.db"),
    );
    assert_eq!(expand_tilde(Path::new("~range/db")), PathBuf::from("~range/db"));
  }

  #[test]
  fn absolute_paths_are_left_alone() {
    assert_eq!(expand_tilde(Path::new("/tmp/range.db")), PathBuf::from("/tmp/range.db"));
  }
}

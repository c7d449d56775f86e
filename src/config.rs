//! Server configuration loaded from a YAML file.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, bail};
use serde::Deserialize;

fn default_read_timeout_secs() -> u64 {
    5
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the listener binds, e.g. "0.0.0.0:8080"
    pub listen_addr: String,
    /// Seconds a client gets to deliver a complete request head
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

/// Top-level configuration.
///
/// ```yaml
/// server:
///   listen_addr: "0.0.0.0:8080"
///   read_timeout_secs: 5
/// virtual_hosts:
///   "example.com": /var/www/example
///   "blog.example.com": /var/www/blog
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    /// Host header value to document root
    pub virtual_hosts: HashMap<String, PathBuf>,
}

impl Config {
    /// Loads and parses configuration from a YAML file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {path}"))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing config file {path}"))?;
        Ok(config)
    }

    /// Checks every configured document root before the server starts
    /// serving out of it. Docroots must be absolute paths naming existing
    /// directories.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (host, docroot) in &self.virtual_hosts {
            if !docroot.is_absolute() {
                bail!(
                    "docroot for host {host:?} must be an absolute path, got {}",
                    docroot.display()
                );
            }

            let meta = std::fs::metadata(docroot)
                .with_context(|| format!("docroot {} for host {host:?}", docroot.display()))?;

            if !meta.is_dir() {
                bail!(
                    "docroot {} for host {host:?} is not a directory",
                    docroot.display()
                );
            }
        }

        Ok(())
    }
}

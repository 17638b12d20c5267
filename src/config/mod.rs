mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    expand_roots(&mut config);

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./airjuke.toml",
        "./config.toml",
        "~/.config/airjuke/config.toml",
        "/etc/airjuke/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

fn expand_roots(config: &mut Config) {
    config.library.roots = config
        .library
        .roots
        .iter()
        .map(|root| {
            let owned = root.to_string_lossy().into_owned();
            let expanded = shellexpand::tilde(&owned);
            PathBuf::from(expanded.as_ref())
        })
        .collect();
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.library.extensions.is_empty() {
        anyhow::bail!("Library extension list cannot be empty");
    }

    for root in &config.library.roots {
        let owned = root.to_string_lossy().into_owned();
        let expanded = shellexpand::tilde(&owned);
        if !Path::new(expanded.as_ref()).exists() {
            tracing::warn!("Library root does not exist: {:?}", root);
        }
    }

    Ok(())
}

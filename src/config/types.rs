use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub library: LibraryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds `stop()` waits for in-flight streams before force-closing.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Directories to index. `~` is expanded.
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    /// Audio file extensions to pick up, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub follow_links: bool,

    /// Walk depth cap; `None` walks the whole tree.
    #[serde(default)]
    pub max_depth: Option<usize>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_grace() -> u64 {
    5
}

fn default_extensions() -> Vec<String> {
    ["mp3", "flac", "m4a", "ogg", "opus", "wav", "aac"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_grace_secs: default_shutdown_grace(),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            extensions: default_extensions(),
            follow_links: false,
            max_depth: None,
        }
    }
}

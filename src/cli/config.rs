use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::hiding::observer::{COALESCE_WINDOW_MS, FRAME_CHUNK};
use crate::page::agent::PageSettings;
use crate::selector::generator::MAX_SELECTOR_DEPTH;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "snaphide",
    version,
    about = "Inspect and manage per-site hidden-element records"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the store file (overrides config)
    #[arg(long, global = true)]
    pub storage: Option<String>,

    /// Path to config file (default: snaphide.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every website with hidden elements
    Websites,

    /// List the hidden-element records for one website
    List {
        /// Hostname partition to list
        #[arg(long)]
        hostname: String,
    },

    /// Restore (delete the record of) one hidden element
    Restore {
        /// Hostname partition holding the record
        #[arg(long)]
        hostname: String,

        /// Record id (element_<timestamp>_<suffix>)
        #[arg(long)]
        id: String,
    },

    /// Restore every hidden element for one website
    RestoreAll {
        /// Hostname partition to clear
        #[arg(long)]
        hostname: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `snaphide.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub hiding: HidingConfig,
    #[serde(default)]
    pub selector: SelectorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HidingConfig {
    #[serde(default = "default_coalesce_window_ms")]
    pub coalesce_window_ms: u64,

    #[serde(default = "default_frame_chunk")]
    pub frame_chunk: usize,
}

impl Default for HidingConfig {
    fn default() -> Self {
        Self {
            coalesce_window_ms: COALESCE_WINDOW_MS,
            frame_chunk: FRAME_CHUNK,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_SELECTOR_DEPTH,
        }
    }
}

// Serde default helpers
fn default_store_path() -> String {
    "snaphide-store.json".to_string()
}
fn default_coalesce_window_ms() -> u64 {
    COALESCE_WINDOW_MS
}
fn default_frame_chunk() -> usize {
    FRAME_CHUNK
}
fn default_max_depth() -> usize {
    MAX_SELECTOR_DEPTH
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("snaphide.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

/// Page-agent settings resolved from a loaded config.
pub fn build_page_settings(config: &AppConfig) -> PageSettings {
    PageSettings {
        coalesce_window_ms: config.hiding.coalesce_window_ms,
        frame_chunk: config.hiding.frame_chunk,
    }
}

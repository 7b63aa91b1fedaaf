//! Engine configuration.
//!
//! Loaded once at startup from TOML. Every section falls back to its
//! defaults, so an empty file is a valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MenuError, Result};

// =============================================================================
// ROOT CONFIG
// =============================================================================

/// Engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Optional host features, resolved once at startup.
    pub capabilities: Capabilities,

    /// Dynamic element caching.
    pub dynamic: DynamicSettings,

    /// Storage proxy transfer handling.
    pub transfers: TransferSettings,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// [`MenuError::ConfigIo`] if the file cannot be read and
    /// [`MenuError::ConfigParse`] if it is not valid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| MenuError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|message| MenuError::ConfigParse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.message().to_string())
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> std::result::Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {}", e))
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Host features that are only present on some host versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// The host reports off-hand swaps; swaps are cancelled while a menu is open.
    pub item_swap_event: bool,

    /// The host runs per-region schedulers; viewer work is queued on the
    /// viewer's own region instead of the global one.
    pub multi_region: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            item_swap_event: true,
            multi_region: false,
        }
    }
}

/// Dynamic element cache settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicSettings {
    /// Cache lifetime for dynamic elements without their own, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_ttl_ms: Option<u64>,
}

impl DynamicSettings {
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl_ms.map(Duration::from_millis)
    }
}

/// Storage proxy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferSettings {
    /// Refuse transfers involving items with their own nested inventory.
    pub reject_container_items: bool,

    /// Message sent for transfer kinds that are not simulated.
    /// `{action}` is replaced with the host's name for the transfer.
    pub unsupported_message: String,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            reject_container_items: true,
            unsupported_message: "The action {action} is not supported! Sorry about that :("
                .to_string(),
        }
    }
}

impl TransferSettings {
    pub fn unsupported_text(&self, action: &str) -> String {
        self.unsupported_message.replace("{action}", action)
    }
}

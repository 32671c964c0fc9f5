//! Renderer configuration from richdoc.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default file name looked up by the CLI
pub const CONFIG_FILE_NAME: &str = "richdoc.toml";

/// Main renderer configuration
///
/// Every field has a default, so an empty file (or no file at all) is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Heading output options
    pub headings: HeadingOptions,

    /// Markdown fallback compiler options
    pub markdown: MarkdownOptions,

    /// Syntax highlighting options for the post-render enhancer
    pub highlight: HighlightOptions,

    /// Standalone page export options
    pub page: PageOptions,
}

/// Heading output options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingOptions {
    /// Emit a `#` self-link inside every heading
    pub anchor_links: bool,
}

/// Markdown fallback compiler options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Enable pipe tables
    pub tables: bool,

    /// Enable `~~strikethrough~~`
    pub strikethrough: bool,

    /// Enable `- [ ]` task list items
    pub tasklists: bool,

    /// Pass raw HTML through instead of escaping it as text
    pub allow_raw_html: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            tasklists: true,
            allow_raw_html: false,
        }
    }
}

/// Syntax highlighting options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightOptions {
    /// Run the highlighter over code blocks
    pub enabled: bool,

    /// Name of the bundled syntect theme used for page CSS
    pub theme: String,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

/// Standalone page export options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    /// Page title used when the caller supplies none
    pub title: String,

    /// Render the table of contents above the document body
    pub include_toc: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: "Document".to_string(),
            include_toc: true,
        }
    }
}

impl RendererConfig {
    /// Load configuration from a TOML file
    ///
    /// # Parameters
    /// * `path` - Path to the richdoc.toml configuration file
    ///
    /// # Returns
    /// * `Ok(RendererConfig)` - Successfully loaded configuration
    /// * `Err(ConfigError)` - Error reading or parsing the configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path)?;
        let config: RendererConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from `path` if it exists, otherwise use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            log::debug!(
                "No configuration at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    ///
    /// # Parameters
    /// * `path` - Path where the configuration file will be written
    ///
    /// # Returns
    /// * `Ok(())` - Successfully saved configuration
    /// * `Err(ConfigError)` - Error serializing or writing the configuration file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }
}

/// Errors that can occur when loading or saving renderer configuration
#[derive(Debug, Error)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
    /// IO error when reading or writing file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing TOML
    #[error("TOML parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Error serializing to TOML
    #[error("TOML serialize error: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

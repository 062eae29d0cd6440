//! Herd Config - `.herd.toml` loading and merging.
//!
//! Configuration layers, lowest precedence first: built-in defaults,
//! the project's `.herd.toml`, then explicit command-line overrides.
//! Every section and field is optional in the file; absent values fall
//! back to the defaults baked into [`CollectionConfig`].

use herd_core::{CollectionConfig, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = ".herd.toml";

/// Root of the `.herd.toml` schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Collection settings.
    #[serde(default)]
    pub collect: CollectSection,

    /// Per-source enablement.
    #[serde(default)]
    pub sources: SourcesSection,

    /// Output settings.
    #[serde(default)]
    pub output: OutputSection,
}

/// `[collect]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectSection {
    /// Glob patterns handed through to the tools.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    /// Glob patterns excluded from analysis.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Per-source timeout in milliseconds; `0` disables the timeout.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Concurrency for enrichment file reads.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for CollectSection {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            ignore: Vec::new(),
            timeout_ms: default_timeout_ms(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_patterns() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_concurrency() -> usize {
    4
}

/// `[sources]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesSection {
    /// Whether the ESLint integration is active.
    #[serde(default = "default_true")]
    pub eslint: bool,

    /// Whether the TypeScript integration is active.
    #[serde(default = "default_true")]
    pub typescript: bool,
}

impl Default for SourcesSection {
    fn default() -> Self {
        Self {
            eslint: true,
            typescript: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Report output directory, relative to the project root.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".herd")
}

/// Explicit command-line values layered on top of the file config.
///
/// `None` means the flag was not given and the file value stands.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub patterns: Option<Vec<String>>,
    pub ignore: Option<Vec<String>>,
    pub timeout_ms: Option<u64>,
    pub eslint: Option<bool>,
    pub typescript: Option<bool>,
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from an explicit file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| Error::FileSystem {
            path: path.to_path_buf(),
            source: err,
        })?;

        let config: Config = toml::from_str(&content).map_err(|err| Error::Toml {
            path: path.to_path_buf(),
            source: err,
        })?;

        debug!(file = %path.display(), "loaded project configuration");
        Ok(config)
    }

    /// Loads `.herd.toml` from the project root, falling back to
    /// defaults when the file does not exist.
    ///
    /// A file that exists but does not parse is an error; silently
    /// ignoring a broken config would mask the user's intent.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load(&path)
        } else {
            debug!(root = %root.display(), "no project configuration, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides. Explicit flags win over the file.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(ref patterns) = overrides.patterns {
            self.collect.patterns = patterns.clone();
        }
        if let Some(ref ignore) = overrides.ignore {
            self.collect.ignore = ignore.clone();
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.collect.timeout_ms = timeout_ms;
        }
        if let Some(eslint) = overrides.eslint {
            self.sources.eslint = eslint;
        }
        if let Some(typescript) = overrides.typescript {
            self.sources.typescript = typescript;
        }
        if let Some(ref dir) = overrides.output_dir {
            self.output.dir = dir.clone();
        }
    }

    /// Builds the validated runtime collection config for a project root.
    pub fn collection_config(
        &self,
        root: &Path,
        config_path: Option<PathBuf>,
    ) -> Result<CollectionConfig> {
        let config = CollectionConfig {
            patterns: self.collect.patterns.clone(),
            root_path: root.to_path_buf(),
            concurrency: self.collect.concurrency,
            timeout_ms: self.collect.timeout_ms,
            ignore_patterns: self.collect.ignore.clone(),
            eslint: self.sources.eslint,
            typescript: self.sources.typescript,
            config_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Absolute output directory for a project root.
    pub fn output_root(&self, root: &Path) -> PathBuf {
        if self.output.dir.is_absolute() {
            self.output.dir.clone()
        } else {
            root.join(&self.output.dir)
        }
    }
}

//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use carmarket_filters::FilterConfig;

use crate::output::Output;

/// Config file names looked up from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["carmarket.toml", ".carmarket.toml", "carmarket.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Filter configuration.
    pub config: FilterConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = PathBuf::from(path);
            let config = FilterConfig::load(&path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            (config, Some(path))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (FilterConfig::default(), None),
            }
        };

        if let Some(path) = &config_path {
            output.debug(&format!("Using config {}", path.display()));
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(FilterConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = FilterConfig::load(&config_path) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

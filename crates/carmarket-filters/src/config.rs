//! Filter configuration.

use std::path::Path;

use carmarket_search::{UrlCodec, SEARCH_PATH};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::locale::{Labels, Locale};

/// Configuration for a [`SearchFilters`](crate::SearchFilters) instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Display language.
    #[serde(default)]
    pub locale: Locale,

    /// Path of the search page (default: /search).
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Pin the current year used for year validation. Defaults to today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_year: Option<i32>,

    /// Label overrides applied on top of the locale's defaults.
    #[serde(default)]
    pub labels: LabelOverrides,
}

fn default_search_path() -> String {
    SEARCH_PATH.to_string()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            search_path: default_search_path(),
            current_year: None,
            labels: LabelOverrides::default(),
        }
    }
}

impl FilterConfig {
    /// Load config from a file. `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Labels for the configured locale, with overrides applied.
    pub fn labels(&self) -> Labels {
        let mut labels = Labels::for_locale(self.locale);
        self.labels.apply(&mut labels);
        labels
    }

    /// URL codec for the configured path and year.
    pub fn codec(&self) -> UrlCodec {
        let codec = match self.current_year {
            Some(year) => UrlCodec::with_current_year(year),
            None => UrlCodec::new(),
        };
        codec.with_search_path(self.search_path.clone())
    }
}

/// Optional replacements for locale label defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage_unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thousands_separator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_separator: Option<String>,
}

impl LabelOverrides {
    fn apply(&self, labels: &mut Labels) {
        let overrides = [
            (&self.currency_symbol, &mut labels.currency_symbol),
            (&self.mileage_unit, &mut labels.mileage_unit),
            (&self.thousands_separator, &mut labels.thousands_separator),
            (&self.list_separator, &mut labels.list_separator),
        ];
        for (value, slot) in overrides {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        }
    }
}

/// Generate a commented default config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Search filter configuration

locale = "en"
search_path = "{path}"
# current_year = 2025

[labels]
# currency_symbol = "SYP "
# mileage_unit = "km"
# thousands_separator = ","
"#,
        path = SEARCH_PATH
    )
}

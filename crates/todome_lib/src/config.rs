//! Configuration for finding and reading todos.
use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::path::Path;

use crate::{
    parser::{date::DateFormat, langs},
    EmptyMentionSymbolSnafu, ParseConfigSnafu, ReadConfigSnafu, Result,
};

/// The name of the config file looked for at the root of a scan.
pub const CONFIG_FILE_NAME: &str = "todome.json";

/// How to read assignees and due dates out of a todo comment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Phrases that introduce a due date, tried in order.
    pub due_date_prefixes: Vec<String>,
    /// A Java-style date pattern, eg. `dd.MM.yyyy`.
    pub date_format: String,
    /// The marker in front of an assignee's name.
    pub mention_symbol: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            due_date_prefixes: vec!["due to".into()],
            date_format: "dd.MM.yyyy".into(),
            mention_symbol: "@".into(),
        }
    }
}

impl ExtractionConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.mention_symbol.is_empty(), EmptyMentionSymbolSnafu);
        DateFormat::new(&self.date_format)?;
        Ok(())
    }
}

/// Everything a scan needs: which files to read and how to read their todos.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanConfig {
    pub extraction: ExtractionConfig,
    /// File name suffixes to scan, eg. `.java`. Matching is case-sensitive.
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            extraction: ExtractionConfig::default(),
            extensions: langs::default_extensions(),
        }
    }
}

/// The on-disk shape of a [`ScanConfig`]: one flat JSON object.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ConfigFile {
    due_date_prefixes: Option<Vec<String>>,
    date_format: Option<String>,
    mention_symbol: Option<String>,
    extensions: Option<Vec<String>>,
}

impl From<ConfigFile> for ScanConfig {
    fn from(file: ConfigFile) -> Self {
        let ScanConfig {
            extraction: defaults,
            extensions,
        } = ScanConfig::default();
        ScanConfig {
            extraction: ExtractionConfig {
                due_date_prefixes: file.due_date_prefixes.unwrap_or(defaults.due_date_prefixes),
                date_format: file.date_format.unwrap_or(defaults.date_format),
                mention_symbol: file.mention_symbol.unwrap_or(defaults.mention_symbol),
            },
            extensions: file.extensions.unwrap_or(extensions),
        }
    }
}

impl ScanConfig {
    /// Parse a config from JSON. Missing keys keep their defaults.
    ///
    /// ```rust
    /// use todome_lib::config::ScanConfig;
    ///
    /// let config = ScanConfig::from_json_str(
    ///     r#"{ "dueDatePrefixes": ["by date of"], "dateFormat": "d MMM yyyy" }"#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.extraction.due_date_prefixes, vec!["by date of"]);
    /// assert_eq!(config.extraction.mention_symbol, "@");
    /// assert_eq!(config.extensions, vec![".java", ".kt", ".kts", ".groovy"]);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<ConfigFile>(json).map(ScanConfig::from)
    }

    /// Read a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        log::debug!("Reading config {path:?}");
        let json = std::fs::read_to_string(path).context(ReadConfigSnafu { path })?;
        Self::from_json_str(&json).context(ParseConfigSnafu { path })
    }

    /// Read `todome.json` from `root` if there is one, otherwise use the
    /// defaults.
    pub fn from_root(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.extraction.validate()
    }
}

use crate::error::{Error, Result};
use crate::gallery::SortKey;
use crate::links::{parse_base_url, DEFAULT_BASE_URL};
use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Contents of the optional JSON config file. Anything left out falls back to
/// the built-in defaults.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    base_url: Option<String>,
    sort: Option<String>,
}

/// Settings resolved from flags, environment and the config file.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub sort: SortKey,
}

/// Values given on the command line (or via the environment).
#[derive(Debug, Default)]
pub struct Overrides<'a> {
    pub base_url: Option<&'a str>,
    pub sort: Option<&'a str>,
}

impl Config {
    pub fn load(path: Option<&Path>, overrides: Overrides<'_>) -> Result<Config> {
        let file = match path {
            Some(path) => read_file_config(path)?,
            None => FileConfig::default(),
        };

        let base_url = overrides
            .base_url
            .or(file.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL);
        let sort = match overrides.sort.or(file.sort.as_deref()) {
            Some(raw) => raw.parse()?,
            None => SortKey::default(),
        };

        Ok(Config {
            base_url: parse_base_url(base_url)?,
            sort,
        })
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let file = fs::File::open(path).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_reader(file).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        reason: format!("does not contain valid json: {}", e),
    })
}

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::Result;

/// Runtime settings: defaults, then `cab.toml`, then `CAB__*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Catalog site root, no trailing slash.
    pub base_url: String,
    /// srcdb to search; `999999` means any term.
    pub term: String,
    pub data_dir: PathBuf,
    pub include_independent_study: bool,
    pub include_cancelled: bool,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub cache_details: bool,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("base_url", "https://cab.brown.edu")?
            .set_default("term", "999999")?
            .set_default("data_dir", "data")?
            .set_default("include_independent_study", false)?
            .set_default("include_cancelled", false)?
            .set_default("timeout_secs", 30)?
            .set_default("max_retries", 3)?
            .set_default("cache_details", true)?
            .add_source(File::with_name("cab").required(false))
            .add_source(Environment::with_prefix("CAB").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join("courses_complete.json")
    }

    pub fn failures_path(&self) -> PathBuf {
        self.data_dir.join("enrichment_failures.json")
    }

    pub fn formatted_path(&self) -> PathBuf {
        self.data_dir.join("courses_complete_formatted.json")
    }

    pub fn report_path(&self) -> PathBuf {
        self.data_dir.join("courses_complete_txt.txt")
    }

    pub fn departments_path(&self) -> PathBuf {
        self.data_dir.join("dept_codes.txt")
    }

    pub fn details_cache_dir(&self) -> PathBuf {
        self.data_dir.join("details")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: "https://cab.brown.edu".to_string(),
            term: "999999".to_string(),
            data_dir: PathBuf::from("data"),
            include_independent_study: false,
            include_cancelled: false,
            timeout_secs: 30,
            max_retries: 3,
            cache_details: true,
        }
    }
}

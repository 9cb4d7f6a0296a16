use crate::Result;
use crate::collector::RepoPath;
use crate::schema::ConfigNode;
use camino::Utf8Path;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

/// The default configuration YAML content, embedded from `default_template.yml`
pub const DEFAULT_TEMPLATE_YAML: &str = include_str!("../../default_template.yml");

const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Repository to collect from, `OWNER/NAME` or a URL ending in `/OWNER/NAME`
    pub addr: String,

    /// GitHub access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Endpoint schemas, one root per entry
    pub counters: serde_yaml::Value,

    /// Poll interval per root, keyed by the root's display name
    #[serde(default)]
    pub intervals: BTreeMap<String, humantime_serde::Serde<Duration>>,

    /// Poll interval for roots without an entry in `intervals`
    #[serde(default = "default_interval", with = "humantime_serde")]
    pub default_interval: Duration,

    /// Whether to scan repository files
    #[serde(default)]
    pub files: bool,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_interval() -> Duration {
    Duration::from_mins(15)
}

impl Config {
    /// Load and validate configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or fails validation
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
        let config: Self = serde_yaml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{path}'"))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML for this configuration or fails validation
    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text).into_app_err("parsing configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Save the default configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_TEMPLATE_YAML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// The repository named by `addr`
    ///
    /// # Errors
    ///
    /// Returns an error if `addr` has fewer than two path segments
    pub fn repo_path(&self) -> Result<RepoPath> {
        RepoPath::parse(&self.addr)
    }

    /// The configuration trees of all counters roots, in declaration order
    #[must_use]
    pub fn roots(&self) -> Vec<ConfigNode> {
        ConfigNode::from_yaml(Some("counters".to_string()), &self.counters).children
    }

    /// Poll interval for the root exported as `display_name`
    #[must_use]
    pub fn interval(&self, display_name: &str) -> Duration {
        self.intervals.get(display_name).map_or(self.default_interval, |d| **d)
    }

    fn validate(&self) -> Result<()> {
        let _ = self.repo_path()?;

        if self.api_url.trim().is_empty() {
            return Err(app_err!("api_url must not be empty"));
        }

        if !matches!(self.counters, serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_)) {
            return Err(app_err!("counters must be a list of endpoint schemas"));
        }

        let roots = self.roots();
        if roots.is_empty() {
            return Err(app_err!("counters must declare at least one endpoint"));
        }

        for root in &roots {
            if root.children.is_empty() {
                return Err(app_err!("counters entry '{}' declares no fields", root.spec()));
            }
        }

        if let Some((name, _)) = self.intervals.iter().find(|(_, d)| d.is_zero()) {
            return Err(app_err!("interval for '{name}' must be greater than zero"));
        }

        if self.default_interval.is_zero() {
            return Err(app_err!("default_interval must be greater than zero"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        serde_yaml::from_str(DEFAULT_TEMPLATE_YAML).expect("default_template.yml should be valid YAML that deserializes to Config")
    }
}

use crate::domain::page::Viewport;
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

const CONFIG_FILE: &str = "config/dashboard";
const ENV_PREFIX: &str = "DASHBOARD";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub source: SourceSettings,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default = "default_panels")]
    pub panels: Vec<PanelConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    pub name: String,
    pub index: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no panels configured")]
    NoPanels,
    #[error("panel at index {0} has an empty name")]
    EmptyName(usize),
    #[error("panel index {0} is configured more than once")]
    DuplicateIndex(usize),
    #[error("panel indices must run from 0 to {max}, index {missing} is missing")]
    MissingIndex { missing: usize, max: usize },
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_panels() -> Vec<PanelConfig> {
    vec![PanelConfig {
        name: "beta".to_string(),
        index: 0,
    }]
}

impl DashboardConfig {
    /// Defaults for everything but the results host
    pub fn for_source(base_url: &str) -> Self {
        Self {
            server: ServerSettings::default(),
            source: SourceSettings {
                base_url: base_url.to_string(),
                timeout_secs: None,
            },
            viewport: Viewport::default(),
            panels: default_panels(),
        }
    }

    /// Every panel needs a name, and indices must cover `0..panels.len()`
    /// exactly once so each panel owns one slot of each page region.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.panels.is_empty() {
            return Err(ConfigError::NoPanels);
        }

        let mut seen = HashSet::new();
        for panel in &self.panels {
            if panel.name.trim().is_empty() {
                return Err(ConfigError::EmptyName(panel.index));
            }
            if !seen.insert(panel.index) {
                return Err(ConfigError::DuplicateIndex(panel.index));
            }
        }

        let max = self.panels.len() - 1;
        if let Some(missing) = (0..=max).find(|index| !seen.contains(index)) {
            return Err(ConfigError::MissingIndex { missing, max });
        }

        Ok(())
    }
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(environment())
        .build()?;

    parse_dashboard_config(settings)
}

/// `DASHBOARD__SOURCE__BASE_URL` overrides `source.base_url`
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

pub fn parse_dashboard_config(settings: config::Config) -> anyhow::Result<DashboardConfig> {
    let config: DashboardConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

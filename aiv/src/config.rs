use std::fs::read_to_string;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use aiv_core::models::LayoutArea;
use aiv_layout::LayoutConfig;

/// Placeholder replaced by the query gene in exchange-feed URLs.
pub const GENE_PLACEHOLDER: &str = "{gene}";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Endpoint `{0}` must contain the {{gene}} placeholder")]
    MissingGenePlaceholder(String),
    #[error("Layout `{name}` must be a finite number above zero, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("Layout `{name}` must be a finite number not below zero, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
#[serde(default)]
pub struct EndpointConfig {
    pub primary: String,
    pub exchange_a: String,
    pub exchange_b: String,
    pub localization: String,
    /// Query the two exchange feeds next to the primary API.
    pub exchange_feeds: bool,
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        EndpointConfig {
            primary: "https://bar.utoronto.ca/interactions2/cgi-bin/get_interactions_dapseq.php"
                .to_string(),
            exchange_a:
                "https://tyersrest.tyerslab.com:8805/psicquic/webservices/current/search/query/{gene}?format=tab25"
                    .to_string(),
            exchange_b:
                "https://www.ebi.ac.uk/Tools/webservices/psicquic/intact/webservices/current/search/query/{gene}?format=tab25"
                    .to_string(),
            localization: "https://bar.utoronto.ca/~vlau/suba4.php".to_string(),
            exchange_feeds: true,
            timeout_secs: 30,
        }
    }
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
#[serde(default)]
pub struct LayoutSection {
    pub width: f64,
    pub height: f64,
    pub chromosome_row: f64,
    pub separation: f64,
    pub margin: f64,
    pub seed: Option<u64>,
}

impl Default for LayoutSection {
    fn default() -> Self {
        let area = LayoutArea::default();
        let layout = LayoutConfig::default();
        LayoutSection {
            width: area.width,
            height: area.height,
            chromosome_row: area.chromosome_row,
            separation: layout.separation,
            margin: layout.margin,
            seed: layout.seed,
        }
    }
}

impl LayoutSection {
    pub fn area(&self) -> LayoutArea {
        LayoutArea {
            width: self.width,
            height: self.height,
            chromosome_row: self.chromosome_row,
        }
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            separation: self.separation,
            margin: self.margin,
            seed: self.seed,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
#[serde(default)]
pub struct CacheConfig {
    pub reference_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            reference_capacity: aiv_graph::references::DEFAULT_CACHE_CAPACITY,
        }
    }
}

///
/// Everything a query session can be tuned with. Every key is optional; an
/// empty file gives the defaults.
///
/// ```toml
/// [endpoints]
/// exchange_feeds = false
///
/// [layout]
/// height = 1200.0
/// seed = 42
/// ```
///
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
#[serde(default)]
pub struct AivConfig {
    pub endpoints: EndpointConfig,
    pub layout: LayoutSection,
    pub cache: CacheConfig,
}

impl AivConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        for url in [&self.endpoints.exchange_a, &self.endpoints.exchange_b] {
            if !url.contains(GENE_PLACEHOLDER) {
                return Err(ConfigError::MissingGenePlaceholder(url.clone()));
            }
        }
        let layout = &self.layout;
        for (name, value) in [("width", layout.width), ("height", layout.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        for (name, value) in [
            ("chromosome_row", layout.chromosome_row),
            ("separation", layout.separation),
            ("margin", layout.margin),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        Ok(())
    }
}

impl TryFrom<&Path> for AivConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: AivConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use std::path::PathBuf;

    #[rstest]
    fn test_try_from_toml() {
        let path = PathBuf::from("../tests/data/aiv/aiv.toml");
        let config = AivConfig::try_from(path.as_path()).unwrap();
        assert!(!config.endpoints.exchange_feeds);
        assert_eq!(config.layout.seed, Some(7));
        assert_eq!(config.layout.height, 1000.0);
        // untouched keys keep their defaults
        assert_eq!(config.layout.width, LayoutArea::default().width);
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[rstest]
    fn test_empty_config_is_default() {
        let config: AivConfig = toml::from_str("").unwrap();
        assert_eq!(config, AivConfig::default());
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn test_missing_placeholder() {
        let config: AivConfig =
            toml::from_str("[endpoints]\nexchange_a = \"https://example.org/query\"").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingGenePlaceholder(_))
        ));
    }

    #[rstest]
    #[case("height = nan", "height")]
    #[case("width = 0.0", "width")]
    #[case("height = inf", "height")]
    fn test_area_must_be_positive(#[case] layout: &str, #[case] field: &str) {
        let config: AivConfig = toml::from_str(&format!("[layout]\n{}", layout)).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { name, .. }) if name == field
        ));
    }

    #[rstest]
    #[case("chromosome_row = -1.0", "chromosome_row")]
    #[case("separation = nan", "separation")]
    #[case("margin = -inf", "margin")]
    fn test_spacing_must_not_be_negative(#[case] layout: &str, #[case] field: &str) {
        let config: AivConfig = toml::from_str(&format!("[layout]\n{}", layout)).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative { name, .. }) if name == field
        ));
    }

    #[rstest]
    fn test_zero_spacing_is_allowed() {
        let config: AivConfig =
            toml::from_str("[layout]\nchromosome_row = 0.0\nmargin = 0.0").unwrap();
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn test_missing_file() {
        let path = PathBuf::from("../tests/data/aiv/nope.toml");
        assert!(matches!(
            AivConfig::try_from(path.as_path()),
            Err(ConfigError::Io(_))
        ));
    }
}

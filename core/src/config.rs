use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::normalize::StrictKey;

/// Engine configuration for the address parser.
///
/// The lexicon tables are configured separately (see `LexiconTables`); this
/// struct only carries knobs that change how an address string is handled.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Drop city/country segments ("TP.HCM", "Việt Nam") before resolving.
    pub drop_locality_segments: bool,

    /// Spellings of the city/country segments to drop. Compared by strict key.
    pub locality_markers: Vec<String>,

    /// Inputs longer than this many characters are truncated.
    /// Default: 512
    pub max_input_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            drop_locality_segments: true,
            locality_markers: vec![
                "tp hcm".to_string(),
                "hcm".to_string(),
                "tp.hcm".to_string(),
                "ho chi minh".to_string(),
                "tp ho chi minh".to_string(),
                "thanh pho ho chi minh".to_string(),
                "viet nam".to_string(),
                "vn".to_string(),
            ],
            max_input_chars: 512,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("write config {}", path.display()))?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// True if `segment` is one of the configured city/country markers.
    pub fn is_locality_marker(&self, segment: &str) -> bool {
        let key = StrictKey::new(segment);
        !key.is_empty()
            && self
                .locality_markers
                .iter()
                .any(|m| StrictKey::new(m) == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml_str("max_input_chars = 64").unwrap();
        assert_eq!(cfg.max_input_chars, 64);
        assert!(cfg.drop_locality_segments);
        assert!(!cfg.locality_markers.is_empty());
    }

    #[test]
    fn toml_string_roundtrip() {
        let mut cfg = Config::default();
        cfg.drop_locality_segments = false;
        let s = cfg.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&s).unwrap(), cfg);
    }

    #[test]
    fn locality_markers_match_by_strict_key() {
        let cfg = Config::default();
        assert!(cfg.is_locality_marker("TP.HCM"));
        assert!(cfg.is_locality_marker("Thành phố Hồ Chí Minh"));
        assert!(cfg.is_locality_marker("Việt Nam"));
        assert!(!cfg.is_locality_marker("Sài Gòn"));
        assert!(!cfg.is_locality_marker(" , "));
    }

    #[test]
    fn save_and_load_file() {
        let tmp = std::env::temp_dir().join(format!("vnaddr_config_{}.toml", std::process::id()));
        let cfg = Config::default();
        cfg.save_toml(&tmp).unwrap();
        assert_eq!(Config::load_toml(&tmp).unwrap(), cfg);
        let _ = std::fs::remove_file(tmp);
    }

    #[test]
    fn load_errors_name_the_file() {
        let missing = std::env::temp_dir().join("vnaddr_config_missing.toml");
        let err = Config::load_toml(&missing).unwrap_err();
        assert!(format!("{:#}", err).contains("vnaddr_config_missing.toml"));

        let bad = std::env::temp_dir().join(format!("vnaddr_config_bad_{}.toml", std::process::id()));
        std::fs::write(&bad, "max_input_chars = \"many\"").unwrap();
        let err = Config::load_toml(&bad).unwrap_err();
        assert!(err.to_string().starts_with("parse config"));
        let _ = std::fs::remove_file(bad);
    }
}

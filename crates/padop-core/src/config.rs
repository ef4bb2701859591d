use crate::error::{PadopError, Result};
use crate::paths;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// CharmConfig
// ---------------------------------------------------------------------------

/// Operator-facing knobs for the unit. `port` feeds the website relation
/// and the port-change diff on config-changed; `tls_port` is opened when
/// the web server is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharmConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_tls_port")]
    pub tls_port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(default = "default_app_path")]
    pub app_path: PathBuf,
}

fn default_version() -> u32 {
    1
}

fn default_port() -> u16 {
    9001
}

fn default_tls_port() -> u16 {
    443
}

fn default_app_path() -> PathBuf {
    PathBuf::from("/opt/etherpad-lite")
}

impl Default for CharmConfig {
    fn default() -> Self {
        Self {
            version: 1,
            port: default_port(),
            tls_port: default_tls_port(),
            fqdn: None,
            app_path: default_app_path(),
        }
    }
}

impl CharmConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(PadopError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: CharmConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.port == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "port must be non-zero".to_string(),
            });
        }
        if self.tls_port == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "tls_port must be non-zero".to_string(),
            });
        }
        if self.port == self.tls_port {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "port and tls_port are both {}; the website relation and the \
                     TLS listener will collide",
                    self.port
                ),
            });
        }
        if !self.app_path.is_absolute() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "app_path '{}' must be absolute",
                    self.app_path.display()
                ),
            });
        }
        if let Some(fqdn) = &self.fqdn {
            if !fqdn_re().is_match(fqdn) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("fqdn '{fqdn}' does not look like a hostname"),
                });
            }
        }

        warnings
    }
}

static FQDN_RE: OnceLock<Regex> = OnceLock::new();

fn fqdn_re() -> &'static Regex {
    FQDN_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([a-z0-9\-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9\-]*[a-z0-9])?)*$").unwrap()
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = CharmConfig::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: CharmConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.port, 9001);
        assert_eq!(parsed.tls_port, 443);
        assert_eq!(parsed.app_path, PathBuf::from("/opt/etherpad-lite"));
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = CharmConfig::default();
        cfg.fqdn = Some("pad.example.com".to_string());
        cfg.save(dir.path()).unwrap();

        let loaded = CharmConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.fqdn.as_deref(), Some("pad.example.com"));
    }

    #[test]
    fn load_uninitialized_fails() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            CharmConfig::load(dir.path()),
            Err(PadopError::NotInitialized)
        ));
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let cfg: CharmConfig = serde_yaml::from_str("port: 8080\n").unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.tls_port, 443);
        assert!(cfg.fqdn.is_none());
    }

    #[test]
    fn validate_default_no_warnings() {
        assert!(CharmConfig::default().validate().is_empty());
    }

    #[test]
    fn validate_zero_port() {
        let cfg = CharmConfig {
            port: 0,
            ..CharmConfig::default()
        };
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("port must be non-zero")));
    }

    #[test]
    fn validate_colliding_ports() {
        let cfg = CharmConfig {
            port: 443,
            ..CharmConfig::default()
        };
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.message.contains("collide")));
    }

    #[test]
    fn validate_relative_app_path() {
        let cfg = CharmConfig {
            app_path: PathBuf::from("etherpad"),
            ..CharmConfig::default()
        };
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.message.contains("absolute")));
    }

    #[test]
    fn validate_bad_fqdn() {
        let cfg = CharmConfig {
            fqdn: Some("not a hostname!".to_string()),
            ..CharmConfig::default()
        };
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("does not look like a hostname")));
    }

    #[test]
    fn validate_good_fqdn() {
        let cfg = CharmConfig {
            fqdn: Some("pad.example.com".to_string()),
            ..CharmConfig::default()
        };
        assert!(cfg.validate().is_empty());
    }
}

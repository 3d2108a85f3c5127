use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::lens::ip::client::{DEFAULT_TIMEOUT_SECS, IPINFO_API_BASE};

#[derive(Debug, Clone, Serialize)]
pub struct IpscopeConfig {
    /// Base URL of the ipinfo.io-compatible lookup service
    pub api_base: String,

    /// Optional ipinfo.io API token, sent as the `token` query parameter
    #[serde(skip_serializing)]
    pub api_token: Option<String>,

    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,

    /// Directory exported JSON files are written to
    pub export_dir: String,
}

const EMPTY_CONFIG: &str = r#"### ipscope configuration file

### lookup service endpoint and optional API token
# api_base = "https://ipinfo.io"
# api_token = ""

### request timeout (in seconds)
# timeout_secs = 10

### directory for exported lookup results
# export_dir = "."
"#;

impl Default for IpscopeConfig {
    fn default() -> Self {
        Self {
            api_base: IPINFO_API_BASE.to_string(),
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            export_dir: ".".to_string(),
        }
    }
}

impl IpscopeConfig {
    /// Load configuration from `path` (or `$HOME/.ipscope/ipscope.toml`),
    /// layered under `IPSCOPE_*` environment variables.
    ///
    /// A missing file is created with commented defaults.
    pub fn new(path: &Option<String>) -> Result<IpscopeConfig> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                let home_dir =
                    dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
                let ipscope_dir = home_dir.join(".ipscope");
                std::fs::create_dir_all(&ipscope_dir)
                    .map_err(|e| anyhow!("Unable to create ipscope directory: {}", e))?;
                let p = ipscope_dir.join("ipscope.toml");
                if p.exists() {
                    builder = builder.add_source(config::File::from(p.as_path()));
                } else {
                    std::fs::write(&p, EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.display(), e)
                    })?;
                }
            }
        }

        // E.g., `IPSCOPE_API_TOKEN=abc123 ipscope lookup 8.8.8.8`
        builder = builder.add_source(config::Environment::with_prefix("IPSCOPE"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config)
    }

    /// Build a configuration from flat key/value settings, applying defaults
    pub fn from_map(config: &HashMap<String, String>) -> Result<IpscopeConfig> {
        let defaults = IpscopeConfig::default();

        let api_base = config
            .get("api_base")
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.api_base);
        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            return Err(anyhow!("api_base must be an http(s) URL, got '{}'", api_base));
        }

        let api_token = config
            .get("api_token")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let timeout_secs = match config.get("timeout_secs") {
            Some(s) => s
                .parse::<u64>()
                .map_err(|e| anyhow!("Invalid timeout_secs '{}': {}", s, e))?,
            None => defaults.timeout_secs,
        };
        if timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }

        let export_dir = config
            .get("export_dir")
            .filter(|s| !s.is_empty())
            .cloned()
            .unwrap_or(defaults.export_dir);

        Ok(IpscopeConfig {
            api_base,
            api_token,
            timeout_secs,
            export_dir,
        })
    }

    /// Get the request timeout as Duration
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        [
            format!("API Base:           {}", self.api_base),
            format!(
                "API Token:          {}",
                if self.api_token.is_some() { "set" } else { "not set" }
            ),
            format!("Timeout:            {} seconds", self.timeout_secs),
            format!("Export Directory:   {}", self.export_dir),
        ]
        .join("\n")
    }

    /// Get the default config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.ipscope/ipscope.toml", home_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = IpscopeConfig::from_map(&HashMap::new()).unwrap();
        assert_eq!(config.api_base, "https://ipinfo.io");
        assert!(config.api_token.is_none());
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.export_dir, ".");
    }

    #[test]
    fn test_overrides() {
        let config = IpscopeConfig::from_map(&map(&[
            ("api_base", "http://localhost:8080/"),
            ("api_token", " abc123 "),
            ("timeout_secs", "3"),
            ("export_dir", "/tmp/exports"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "http://localhost:8080");
        assert_eq!(config.api_token.as_deref(), Some("abc123"));
        assert_eq!(config.timeout(), std::time::Duration::from_secs(3));
        assert_eq!(config.export_dir, "/tmp/exports");
        assert!(config.summary().contains("API Token:          set"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(IpscopeConfig::from_map(&map(&[("timeout_secs", "soon")])).is_err());
        assert!(IpscopeConfig::from_map(&map(&[("timeout_secs", "0")])).is_err());
        assert!(IpscopeConfig::from_map(&map(&[("api_base", "ipinfo.io")])).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ipscope.toml");
        std::fs::write(&path, "timeout_secs = 4\nexport_dir = \"out\"\n").unwrap();

        let config = IpscopeConfig::new(&Some(path.to_string_lossy().to_string())).unwrap();
        assert_eq!(config.timeout_secs, 4);
        assert_eq!(config.export_dir, "out");
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.toml");
        let config = IpscopeConfig::new(&Some(path.to_string_lossy().to_string())).unwrap();
        assert!(path.exists());
        assert_eq!(config.api_base, IPINFO_API_BASE);
    }
}

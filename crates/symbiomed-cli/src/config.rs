use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use symbiomed_client::DEFAULT_BASE_URL;

use crate::cli::OutputFormat;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    pub server: Option<String>,
    pub format: Option<String>,
    pub timeout_secs: Option<u64>,
}

pub type ConfigFile = HashMap<String, ProfileConfig>;

fn config_dir() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".symbiomed");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn load_all_from(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let cfg: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(cfg)
}

pub fn load_profile_from(path: &Path, profile: &str) -> Result<ProfileConfig> {
    let mut all = load_all_from(path)?;
    Ok(all.remove(profile).unwrap_or_default())
}

pub fn save_profile_to(path: &Path, profile: &str, config: &ProfileConfig) -> Result<()> {
    let mut all = load_all_from(path)?;
    all.insert(profile.to_string(), config.clone());
    let content = toml::to_string_pretty(&all)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(())
}

pub fn load_profile(profile: &str) -> Result<ProfileConfig> {
    load_profile_from(&config_path()?, profile)
}

pub fn save_profile(profile: &str, config: &ProfileConfig) -> Result<()> {
    save_profile_to(&config_path()?, profile, config)
}

impl ProfileConfig {
    /// Apply `config set <key> <value>`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server" => {
                validate_server(value)?;
                self.server = Some(value.to_string());
            }
            "format" => {
                if OutputFormat::parse_name(value).is_none() {
                    anyhow::bail!("Unknown format: {value}. Valid formats: text, table, json");
                }
                self.format = Some(value.to_string());
            }
            "timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid timeout: {value}"))?;
                self.timeout_secs = Some(secs);
            }
            other => {
                anyhow::bail!("Unknown config key: {other}. Valid keys: server, format, timeout_secs")
            }
        }
        Ok(())
    }
}

/// Settings after flags, env and the profile have been combined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub server: String,
    pub format: OutputFormat,
    pub timeout: Option<Duration>,
}

pub fn resolve(
    cli_server: Option<&str>,
    cli_format: Option<OutputFormat>,
    cli_timeout: Option<u64>,
    profile: &ProfileConfig,
) -> Result<Resolved> {
    // 1. --server flag / SYMBIOMED_URL env, 2. profile, 3. built-in default
    let server = cli_server
        .map(str::to_string)
        .or_else(|| profile.server.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    validate_server(&server)?;

    let format = match cli_format {
        Some(f) => f,
        None => match profile.format.as_deref() {
            Some(name) => OutputFormat::parse_name(name)
                .with_context(|| format!("Unknown format in config: {name}"))?,
            None => OutputFormat::default(),
        },
    };

    let timeout = cli_timeout
        .or(profile.timeout_secs)
        .map(Duration::from_secs);

    Ok(Resolved {
        server,
        format,
        timeout,
    })
}

fn validate_server(server: &str) -> Result<()> {
    let url = url::Url::parse(server).with_context(|| format!("Invalid server URL: {server}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("Server URL must use http or https: {server}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_precedence() {
        let profile = ProfileConfig {
            server: Some("http://profile.example".into()),
            format: Some("json".into()),
            timeout_secs: Some(30),
        };

        let resolved = resolve(Some("http://flag.example"), None, None, &profile).unwrap();
        assert_eq!(resolved.server, "http://flag.example");
        assert_eq!(resolved.format, OutputFormat::Json);
        assert_eq!(resolved.timeout, Some(Duration::from_secs(30)));

        let resolved = resolve(None, Some(OutputFormat::Table), Some(5), &profile).unwrap();
        assert_eq!(resolved.server, "http://profile.example");
        assert_eq!(resolved.format, OutputFormat::Table);
        assert_eq!(resolved.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_resolve_defaults() {
        let resolved = resolve(None, None, None, &ProfileConfig::default()).unwrap();
        assert_eq!(resolved.server, DEFAULT_BASE_URL);
        assert_eq!(resolved.format, OutputFormat::Text);
        assert_eq!(resolved.timeout, None);
    }

    #[test]
    fn test_resolve_rejects_bad_server() {
        assert!(resolve(Some("ftp://example.org"), None, None, &ProfileConfig::default()).is_err());
        assert!(resolve(Some("nope"), None, None, &ProfileConfig::default()).is_err());
    }

    #[test]
    fn test_set_keys() {
        let mut cfg = ProfileConfig::default();
        cfg.set("server", "https://tx.example.org").unwrap();
        cfg.set("format", "table").unwrap();
        cfg.set("timeout_secs", "12").unwrap();
        assert_eq!(cfg.server.as_deref(), Some("https://tx.example.org"));
        assert_eq!(cfg.format.as_deref(), Some("table"));
        assert_eq!(cfg.timeout_secs, Some(12));

        assert!(cfg.set("format", "yaml").is_err());
        assert!(cfg.set("timeout_secs", "soon").is_err());
        assert!(cfg.set("color", "always").is_err());
    }

    #[test]
    fn test_profiles_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert_eq!(load_profile_from(&path, "default").unwrap(), ProfileConfig::default());

        let staging = ProfileConfig {
            server: Some("http://staging.example".into()),
            ..Default::default()
        };
        save_profile_to(&path, "staging", &staging).unwrap();
        save_profile_to(
            &path,
            "default",
            &ProfileConfig {
                timeout_secs: Some(10),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(load_profile_from(&path, "staging").unwrap(), staging);
        assert_eq!(load_profile_from(&path, "default").unwrap().timeout_secs, Some(10));
        assert_eq!(load_all_from(&path).unwrap().len(), 2);
    }
}

//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use harvest_core::LedgerMatch;
use harvest_core::config::MAX_TIMEOUT_SECS;

/// TOML-style file configuration for harvest defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// File scanned for links.
    pub input_file: Option<PathBuf>,
    /// Seen-URL ledger.
    pub ledger_file: Option<PathBuf>,
    /// Download destination.
    pub output_dir: Option<PathBuf>,
    /// Prefix for relative links.
    pub base_domain: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Ledger membership semantics.
    pub ledger_match: Option<LedgerMatch>,
    /// Collect root-relative links too.
    pub include_relative: Option<bool>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.timeout_secs
            && !(1..=MAX_TIMEOUT_SECS).contains(&timeout)
        {
            bail!(
                "Invalid config value for `timeout_secs`: {timeout}. Expected range: 1..={MAX_TIMEOUT_SECS}"
            );
        }
        if let Some(base_domain) = &self.base_domain
            && base_domain.trim().is_empty()
        {
            bail!("Invalid config value for `base_domain`: must not be empty");
        }
        Ok(())
    }
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Log filter directive this setting stands for.
    #[must_use]
    pub fn log_level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/pdf-harvest/config.toml`
/// 2. `$HOME/.config/pdf-harvest/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("pdf-harvest")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("pdf-harvest")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from `explicit` (which must exist) or from the default path
/// if present.
pub fn load_file_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = read_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config: Some(config),
        });
    }

    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(read_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!(
                "Invalid config syntax on line {}: expected key = value",
                line_index + 1
            );
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let line_no = line_index + 1;

        match key {
            "input_file" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `input_file` value on line {line_no}"))?;
                cfg.input_file = Some(PathBuf::from(parsed));
            }
            "ledger_file" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `ledger_file` value on line {line_no}"))?;
                cfg.ledger_file = Some(PathBuf::from(parsed));
            }
            "output_dir" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `output_dir` value on line {line_no}"))?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "base_domain" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `base_domain` value on line {line_no}"))?;
                cfg.base_domain = Some(parsed);
            }
            "timeout_secs" => {
                let parsed = parse_integer_u64(value)
                    .with_context(|| format!("Invalid `timeout_secs` value on line {line_no}"))?;
                cfg.timeout_secs = Some(parsed);
            }
            "ledger_match" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `ledger_match` value on line {line_no}"))?;
                cfg.ledger_match = Some(
                    parsed
                        .parse::<LedgerMatch>()
                        .with_context(|| format!("Invalid `ledger_match` value on line {line_no}"))?,
                );
            }
            "include_relative" => {
                let parsed = parse_boolean(value).with_context(|| {
                    format!("Invalid `include_relative` value on line {line_no}")
                })?;
                cfg.include_relative = Some(parsed);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `verbosity` value on line {line_no}"))?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

fn parse_boolean(raw_value: &str) -> Result<bool> {
    match raw_value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Expected 'true' or 'false'"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config_all_fields() {
        let cfg = parse_config_str(
            r#"
input_file = "snapshot.html"
ledger_file = "seen.txt"
output_dir = "/srv/pdfs"
base_domain = "https://example.com"
timeout_secs = 60
ledger_match = "substring"
include_relative = false
verbosity = "verbose"
"#,
        )
        .expect("full config should parse");
        assert_eq!(cfg.input_file, Some(PathBuf::from("snapshot.html")));
        assert_eq!(cfg.ledger_file, Some(PathBuf::from("seen.txt")));
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/srv/pdfs")));
        assert_eq!(cfg.base_domain.as_deref(), Some("https://example.com"));
        assert_eq!(cfg.timeout_secs, Some(60));
        assert_eq!(cfg.ledger_match, Some(LedgerMatch::Substring));
        assert_eq!(cfg.include_relative, Some(false));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
    }

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str("timeout_secs = 30\n").expect("partial config should parse");
        assert_eq!(cfg.timeout_secs, Some(30));
        assert!(cfg.output_dir.is_none());
    }

    #[test]
    fn test_parse_config_rejects_zero_timeout() {
        let err = parse_config_str("timeout_secs = 0").expect_err("invalid timeout expected");
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_numeric_values_with_trailing_tokens() {
        let err =
            parse_config_str("timeout_secs = 4 trailing").expect_err("expected trailing token error");
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_key() {
        let err = parse_config_str("concurrency = 4").expect_err("unknown key expected");
        assert!(err.to_string().contains("concurrency"));
    }

    #[test]
    fn test_parse_config_rejects_bad_ledger_match() {
        let err = parse_config_str(r#"ledger_match = "prefix""#).expect_err("bad mode expected");
        assert!(err.to_string().contains("ledger_match"));
    }

    #[test]
    fn test_parse_config_rejects_unquoted_path() {
        let err = parse_config_str("output_dir = PDFs").expect_err("unquoted string expected");
        assert!(err.to_string().contains("output_dir"));
    }

    #[test]
    fn test_parse_config_supports_comments() {
        let cfg = parse_config_str(
            r#"
# harvest settings
base_domain = "https://example.com/#frag" # hash inside quotes is kept
"#,
        )
        .expect("config with comments should parse");
        assert_eq!(cfg.base_domain.as_deref(), Some("https://example.com/#frag"));
    }

    #[test]
    fn test_verbosity_log_levels() {
        assert_eq!(VerbositySetting::Default.log_level(), "info");
        assert_eq!(VerbositySetting::Verbose.log_level(), "debug");
        assert_eq!(VerbositySetting::Quiet.log_level(), "error");
        assert_eq!(VerbositySetting::Debug.log_level(), "trace");
    }

    #[test]
    fn test_load_file_config_explicit_missing_path_errors() {
        let temp = TempDir::new().unwrap();
        let result = load_file_config(Some(&temp.path().join("absent.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_file_config_explicit_path_parses() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("harvest.toml");
        fs::write(&path, "include_relative = true\n").unwrap();

        let loaded = load_file_config(Some(&path)).unwrap();

        assert_eq!(loaded.path.as_deref(), Some(path.as_path()));
        assert_eq!(loaded.config.unwrap().include_relative, Some(true));
    }
}

//! Configuration handling for astobf
//!
//! Options come from three layers, later layers winning: built-in defaults,
//! an `astobf.toml` file (`[obfuscate]` table), and command-line flags.
//!
//! ```toml
//! [obfuscate]
//! rename_members = false
//! rename_definitions = true
//! pin_shared_names = true
//! seed = 42
//! preserve = ["main", "app"]
//!
//! [obfuscate.style]
//! leading = "oOlI"
//! body = "o0Ol1I"
//! min_tail = 9
//! max_tail = 29
//! max_attempts = 10000
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::names::{NameError, NameStyle};
use crate::reserved::{validate_python_identifier, ValidationError};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "astobf.toml";

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has the wrong shape.
    #[error("failed to parse config {origin}: {source}")]
    Parse {
        origin: String,
        source: toml::de::Error,
    },

    /// A name listed in `preserve` is not a Python identifier.
    #[error("invalid preserved name: {0}")]
    InvalidPreserve(#[from] ValidationError),

    /// The name style cannot produce valid identifiers.
    #[error("invalid [obfuscate.style]: {0}")]
    InvalidStyle(#[source] NameError),
}

/// astobf configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Obfuscation settings
    #[serde(default)]
    pub obfuscate: ObfuscateOptions,
}

/// Settings for one obfuscation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObfuscateOptions {
    /// Rename the `attr` of member accesses (`obj.attr`). Off by default:
    /// member names usually belong to objects defined outside the module.
    #[serde(default)]
    pub rename_members: bool,

    /// Rename definition sites: function and class names, parameters,
    /// `except ... as` targets, `global`/`nonlocal` names, match captures and
    /// type parameters.
    #[serde(default = "default_rename_definitions")]
    pub rename_definitions: bool,

    /// Keep names that also act as members or keyword-argument names:
    /// class-body bindings (while `rename_members` is off) and the `arg` of
    /// call-site keywords (while `rename_definitions` is on). With this off
    /// every identifier is renamed, even where that breaks `obj.attr` or
    /// `f(x=...)` lookups.
    #[serde(default = "default_pin_shared_names")]
    pub pin_shared_names: bool,

    /// Seed for the name generator. Unseeded runs draw from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Extra identifiers that must keep their names.
    #[serde(default)]
    pub preserve: Vec<String>,

    /// Shape of generated names
    #[serde(default)]
    pub style: NameStyle,
}

fn default_rename_definitions() -> bool {
    true
}

fn default_pin_shared_names() -> bool {
    true
}

impl Default for ObfuscateOptions {
    fn default() -> Self {
        Self {
            rename_members: false,
            rename_definitions: default_rename_definitions(),
            pin_shared_names: default_pin_shared_names(),
            seed: None,
            preserve: Vec::new(),
            style: NameStyle::default(),
        }
    }
}

impl ObfuscateOptions {
    /// Check preserved names and the name style.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in &self.preserve {
            validate_python_identifier(name)?;
        }
        self.style.validate().map_err(ConfigError::InvalidStyle)
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Load `astobf.toml` from `dir`, or defaults if there is none
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Parse configuration text; `origin` names it in error messages
    pub fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        config.obfuscate.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_rename_definitions_but_not_members() {
        let options = ObfuscateOptions::default();
        assert!(!options.rename_members);
        assert!(options.rename_definitions);
        assert!(options.pin_shared_names);
        assert_eq!(options.seed, None);
        assert_eq!(options.style, NameStyle::default());
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse("", "inline").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = Config::parse(
            r#"
            [obfuscate]
            seed = 42
            preserve = ["main"]

            [obfuscate.style]
            max_tail = 12
            "#,
            "inline",
        )
        .unwrap();
        assert_eq!(config.obfuscate.seed, Some(42));
        assert_eq!(config.obfuscate.preserve, vec!["main".to_string()]);
        assert!(config.obfuscate.rename_definitions);
        assert_eq!(config.obfuscate.style.max_tail, 12);
        assert_eq!(config.obfuscate.style.min_tail, 9);
    }

    #[test]
    fn shared_name_pinning_can_be_turned_off() {
        let config = Config::parse("[obfuscate]\npin_shared_names = false\n", "inline").unwrap();
        assert!(!config.obfuscate.pin_shared_names);
        assert!(config.obfuscate.rename_definitions);
    }

    #[test]
    fn oversized_tail_rejected() {
        let err = Config::parse(
            "[obfuscate.style]\nmin_tail = 1\nmax_tail = 1000000\n",
            "inline",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStyle(_)));
    }

    #[test]
    fn invalid_preserved_name_rejected() {
        let err = Config::parse("[obfuscate]\npreserve = [\"not-a-name\"]\n", "inline")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPreserve(_)));
    }

    #[test]
    fn invalid_style_rejected() {
        let err = Config::parse("[obfuscate.style]\nleading = \"0\"\n", "inline").unwrap_err();
        assert!(err.to_string().starts_with("invalid [obfuscate.style]"));
    }

    #[test]
    fn malformed_toml_names_origin() {
        let err = Config::parse("[obfuscate\n", "astobf.toml").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse config astobf.toml"));
    }

    #[test]
    fn load_from_dir_without_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Config::load_from_dir(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn load_from_dir_reads_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[obfuscate]\nrename_members = true\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap();
        assert!(config.obfuscate.rename_members);
    }

    #[test]
    fn missing_explicit_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

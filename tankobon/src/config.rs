use std::fs;

use anyhow::{anyhow, bail, Context, Result};
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tankobon_core::{
    BracketType, ChapterNumbering, FilenamePlatform, FormatOptions, FractionSeparator,
    PublicationType,
};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub bracket_type: BracketType,
    pub ripper_credit: String,
    /// Written as the archive comment and in the image metadata
    pub ripper_email: String,
    pub publication_type: PublicationType,
    pub chapter_separator: FractionSeparator,
    pub chapter_numbering: ChapterNumbering,
    pub chapter_c_prefix: bool,
    pub filename_platform: FilenamePlatform,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            bracket_type: BracketType::Round,
            ripper_credit: "nao".to_string(),
            ripper_email: String::new(),
            publication_type: PublicationType::Digital,
            chapter_separator: FractionSeparator::X,
            chapter_numbering: ChapterNumbering::Literal,
            chapter_c_prefix: false,
            filename_platform: FilenamePlatform::Windows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Executables {
    pub pingo_path: String,
    pub exiftool_path: String,
}

impl Default for Executables {
    fn default() -> Self {
        Self {
            pingo_path: "pingo".to_string(),
            exiftool_path: "exiftool".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub defaults: Defaults,
    pub executables: Executables,
}

impl Config {
    /// `~/.config/tankobon/config.json`
    pub fn path() -> Result<Utf8PathBuf> {
        let Some(home) = home::home_dir() else {
            bail!("home directory couldn't be found");
        };
        let home = Utf8PathBuf::from_path_buf(home)
            .map_err(|path| anyhow!("{path:?} is not a valid utf-8 path"))?;

        Ok(home.join(".config").join("tankobon").join("config.json"))
    }

    /// Reads the config file, it's created with the default values on first run
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            let config = Self::default();
            config.save()?;
            warn!("created a default config at {path}, review it with `tankobon config show`");
            return Ok(config);
        }

        let content = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
        debug!("loaded config from {path}");

        serde_json::from_str(&content).with_context(|| format!("{path} is not a valid config file"))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {parent}"))?;
        }

        fs::write(&path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("writing {path}"))
    }

    /// Every value as a `section.key` and its json representation
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        let Value::Object(sections) = serde_json::to_value(self)? else {
            bail!("config isn't serialized as an object");
        };

        let mut entries = Vec::new();
        for (section, values) in sections {
            let Value::Object(values) = values else {
                continue;
            };
            for (key, value) in values {
                let value = match value {
                    Value::String(value) => value,
                    value => value.to_string(),
                };
                entries.push((format!("{section}.{key}"), value));
            }
        }

        Ok(entries)
    }

    /// Updates `section.key`, the value is validated like the config file is
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        let Some(slot) = key
            .split_once('.')
            .and_then(|(section, field)| json.get_mut(section)?.get_mut(field))
        else {
            bail!("unknown config key {key:?}");
        };

        *slot = match slot {
            Value::Bool(_) => Value::Bool(
                value
                    .parse()
                    .with_context(|| format!("{key} expects `true` or `false`"))?,
            ),
            _ => Value::String(value.to_string()),
        };

        *self = serde_json::from_value(json)
            .with_context(|| format!("{value:?} is not a valid value for {key}"))?;

        Ok(())
    }

    /// Naming options, `numbering` overrides the configured one
    pub fn format_options(&self, numbering: Option<ChapterNumbering>) -> FormatOptions {
        FormatOptions {
            separator: self.defaults.chapter_separator,
            numbering: numbering.unwrap_or(self.defaults.chapter_numbering),
            platform: self.defaults.filename_platform,
            chapter_c_prefix: self.defaults.chapter_c_prefix,
            ..FormatOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_use_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"defaults": {"ripper_credit": "someone"}}"#).unwrap();
        assert_eq!(config.defaults.ripper_credit, "someone");
        assert_eq!(config.defaults.bracket_type, BracketType::Round);
        assert_eq!(config.executables, Executables::default());
    }

    #[test]
    fn sets_values() {
        let mut config = Config::default();
        config.set("defaults.bracket_type", "curly").unwrap();
        config.set("defaults.chapter_separator", "#").unwrap();
        config.set("defaults.chapter_c_prefix", "true").unwrap();
        config.set("executables.pingo_path", "/opt/pingo").unwrap();

        assert_eq!(config.defaults.bracket_type, BracketType::Curly);
        assert_eq!(config.defaults.chapter_separator, FractionSeparator::Hash);
        assert!(config.defaults.chapter_c_prefix);
        assert_eq!(config.executables.pingo_path, "/opt/pingo");
    }

    #[test]
    fn rejects_unknown_keys_and_values() {
        let mut config = Config::default();
        assert!(config.set("defaults.nothing", "x").is_err());
        assert!(config.set("ripper_credit", "x").is_err());
        assert!(config.set("defaults.bracket_type", "angle").is_err());
        assert!(config.set("defaults.chapter_c_prefix", "yes").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn lists_entries() {
        let entries = Config::default().entries().unwrap();
        assert!(entries.contains(&("defaults.bracket_type".to_string(), "round".to_string())));
        assert!(entries.contains(&("defaults.chapter_c_prefix".to_string(), "false".to_string())));
        assert!(entries.contains(&(
            "executables.exiftool_path".to_string(),
            "exiftool".to_string()
        )));
    }
}

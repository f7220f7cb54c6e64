// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use mealpref_app::{Profile, parse_birthday};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "mealpref";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_PROFILE_NAME: &str = "Michael Mohr";
const DEFAULT_BIRTHDAY: &str = "16.12.1970";
const DEFAULT_EMOJI: &str = "🚀";
const DEFAULT_LAST_ONLINE: &str = "vor 2 Monate";
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub profile: ProfileSection,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            profile: ProfileSection::default(),
            output: Output::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSection {
    pub name: Option<String>,
    pub birthday: Option<String>,
    pub emoji: Option<String>,
    pub last_online: Option<String>,
}

impl Default for ProfileSection {
    fn default() -> Self {
        Self {
            name: Some(DEFAULT_PROFILE_NAME.to_owned()),
            birthday: Some(DEFAULT_BIRTHDAY.to_owned()),
            emoji: Some(DEFAULT_EMOJI.to_owned()),
            last_online: Some(DEFAULT_LAST_ONLINE.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Output {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub file: Option<String>,
    pub level: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            file: None,
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("MEALPREF_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set MEALPREF_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [profile], [output], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(name) = &self.profile.name
            && name.trim().is_empty()
        {
            bail!(
                "profile.name in {} is blank -- set a display name or remove the key",
                path.display()
            );
        }

        if let Some(birthday) = &self.profile.birthday {
            parse_birthday(birthday)
                .with_context(|| format!("profile.birthday in {}", path.display()))?;
        }

        if let Some(output) = &self.output.path {
            if output.trim().is_empty() {
                bail!(
                    "output.path in {} is blank -- set a file path or remove the key to print on exit",
                    path.display()
                );
            }
            if Path::new(output).is_dir() {
                bail!(
                    "output.path {output:?} in {} is a directory; point it at a file such as preferences.json",
                    path.display()
                );
            }
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
        {
            bail!(
                "log.level {level:?} in {} is not one of: {}",
                path.display(),
                LOG_LEVELS.join(", ")
            );
        }

        Ok(())
    }

    pub fn profile(&self) -> Result<Profile> {
        let section = &self.profile;
        Profile::new(
            section.name.as_deref().unwrap_or(DEFAULT_PROFILE_NAME),
            section.birthday.as_deref().unwrap_or(DEFAULT_BIRTHDAY),
            section.emoji.as_deref().unwrap_or(DEFAULT_EMOJI),
            section.last_online.as_deref().unwrap_or(DEFAULT_LAST_ONLINE),
        )
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        self.output.path.as_ref().map(PathBuf::from)
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log.file.as_ref().map(PathBuf::from)
    }

    pub fn log_level(&self) -> String {
        self.log
            .level
            .as_deref()
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_ascii_lowercase()
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# mealpref config\n# Place this file at: {}\n\nversion = 1\n\n[profile]\nname = \"{}\"\n# DD.MM.YYYY\nbirthday = \"{}\"\nemoji = \"{}\"\nlast_online = \"{}\"\n\n[output]\n# Optional. Without a path the saved preferences are printed on exit.\n# path = \"/absolute/path/to/preferences.json\"\n\n[log]\n# Optional. Logging is off unless a file is set (RUST_LOG overrides level).\n# file = \"/absolute/path/to/mealpref.log\"\nlevel = \"{}\"\n",
            path.display(),
            DEFAULT_PROFILE_NAME,
            DEFAULT_BIRTHDAY,
            DEFAULT_EMOJI,
            DEFAULT_LAST_ONLINE,
            DEFAULT_LOG_LEVEL,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use anyhow::Result;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use time::{Date, Month};

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.output_path(), None);
        assert_eq!(config.log_file(), None);
        assert_eq!(config.log_level(), "info");

        let profile = config.profile()?;
        assert_eq!(profile.name, "Michael Mohr");
        assert_eq!(
            profile.birthday,
            Date::from_calendar_date(1970, Month::December, 16)?
        );
        assert_eq!(profile.last_online_label, "vor 2 Monate");
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[profile]\nname = \"Ada\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[profile], [output], and [log]"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[profile]\nname = \"Ada Lovelace\"\nbirthday = \"10.12.1815\"\nemoji = \"🍵\"\nlast_online = \"today\"\n[output]\npath = \"/tmp/prefs.json\"\n[log]\nfile = \"/tmp/mealpref.log\"\nlevel = \"DEBUG\"\n",
        )?;

        let config = Config::load(&path)?;
        let profile = config.profile()?;
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.birthday_label(), "10.12.1815");
        assert_eq!(profile.emoji, "🍵");
        assert_eq!(config.output_path(), Some(PathBuf::from("/tmp/prefs.json")));
        assert_eq!(config.log_file(), Some(PathBuf::from("/tmp/mealpref.log")));
        assert_eq!(config.log_level(), "debug");
        Ok(())
    }

    #[test]
    fn partial_profile_falls_back_per_field() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[profile]\nname = \"Grace\"\n")?;
        let profile = Config::load(&path)?.profile()?;
        assert_eq!(profile.name, "Grace");
        assert_eq!(profile.birthday_label(), "16.12.1970");
        assert_eq!(profile.emoji, "🚀");
        Ok(())
    }

    #[test]
    fn bad_birthday_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[profile]\nbirthday = \"1970-12-16\"\n")?;
        let error = Config::load(&path).expect_err("ISO birthday should fail");
        let message = format!("{error:#}");
        assert!(message.contains("profile.birthday"));
        assert!(message.contains("DD.MM.YYYY"));
        Ok(())
    }

    #[test]
    fn blank_profile_name_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[profile]\nname = \"  \"\n")?;
        let error = Config::load(&path).expect_err("blank name should fail");
        assert!(error.to_string().contains("profile.name"));
        Ok(())
    }

    #[test]
    fn log_level_is_validated() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"loud\"\n")?;
        let error = Config::load(&path).expect_err("unknown level should fail");
        let message = error.to_string();
        assert!(message.contains("log.level"));
        assert!(message.contains("trace, debug, info, warn, error"));
        Ok(())
    }

    #[test]
    fn output_path_must_be_a_file() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let dir = temp.path().display().to_string();
        let (_config_dir, path) = write_config(&format!(
            "version = 1\n[output]\npath = {dir:?}\n"
        ))?;
        let error = Config::load(&path).expect_err("directory output should fail");
        assert!(error.to_string().contains("is a directory"));

        let (_blank_dir, blank) = write_config("version = 1\n[output]\npath = \"\"\n")?;
        let error = Config::load(&blank).expect_err("blank output should fail");
        assert!(error.to_string().contains("output.path"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("MEALPREF_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("MEALPREF_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("MEALPREF_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("mealpref/config.toml"));
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[profile]"));
        assert!(example.contains("[output]"));
        assert!(example.contains("[log]"));

        std::fs::write(&path, &example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.profile()?.name, "Michael Mohr");
        assert_eq!(config.output_path(), None);
        Ok(())
    }
}

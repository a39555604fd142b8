use crate::render::{TimestampFormat, parse_locale};
use crate::store::{FileStore, slot_path};
use anyhow::{Context, Result};
use directories::BaseDirs;
use log::warn;
use serde::Deserialize;
use std::{fs, path::PathBuf};

const DEFAULT_STORE_KEY: &str = "blogs";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the store slots.
    pub data_dir: PathBuf,
    /// Name of the slot the posts are saved in.
    pub store_key: String,
    /// Preferred editor name/binary (e.g. hx for Helix). Optional; the CLI will fall back to $VISUAL/$EDITOR.
    pub editor: Option<String>,
    /// How "last updated" stamps are shown. Locale defaults to `th_TH`.
    pub timestamp_format: TimestampFormat,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    store_key: Option<String>,
    editor: Option<String>,
    /// POSIX locale name, e.g. `th_TH` or `en_GB`.
    locale: Option<String>,
    timestamp_format: Option<String>,
}

impl Config {
    /// Load config from disk (first XDG path, then native) and apply defaults.
    /// A broken config file is reported and ignored.
    pub fn load() -> Result<Self> {
        let file_config = Self::read_file_config().unwrap_or_else(|e| {
            warn!("ignoring config file: {e:#}");
            FileConfig::default()
        });
        Ok(Self::from_file_config(file_config))
    }

    fn from_file_config(file_config: FileConfig) -> Self {
        let locale = match file_config.locale.as_deref() {
            Some(name) => parse_locale(name).unwrap_or_else(|| {
                warn!("unknown locale `{name}`, using the default");
                TimestampFormat::default().locale
            }),
            None => TimestampFormat::default().locale,
        };
        let mut timestamp_format = TimestampFormat::for_locale(locale);
        if let Some(pattern) = file_config.timestamp_format {
            timestamp_format.pattern = pattern;
        }

        Self {
            data_dir: file_config.data_dir.unwrap_or_else(Self::default_data_dir),
            store_key: file_config
                .store_key
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STORE_KEY.to_string()),
            editor: file_config.editor,
            timestamp_format,
        }
    }

    pub fn store(&self) -> FileStore {
        FileStore::new(&self.data_dir)
    }

    /// File the posts are saved to.
    pub fn store_path(&self) -> PathBuf {
        slot_path(&self.data_dir, &self.store_key)
    }

    /// Default data root: `{data_dir}/blg`
    /// - macOS:   `~/Library/Application Support/blg`
    /// - Linux:   `$XDG_DATA_HOME/blg` or `~/.local/share/blg`
    /// - Windows: `%APPDATA%\blg`
    fn default_data_dir() -> PathBuf {
        if let Some(base) = BaseDirs::new() {
            base.data_dir().join("blg")
        } else {
            PathBuf::from("./blg")
        }
    }

    fn config_file_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Some(b) = BaseDirs::new() {
            v.push(b.home_dir().join(".config").join("blg").join("config.toml"));
            v.push(b.config_dir().join("blg").join("config.toml"));
        }
        v
    }

    /// Read the first existing config file and parse it.
    fn read_file_config() -> Result<FileConfig> {
        for path in Self::config_file_paths() {
            if !path.exists() {
                continue;
            }
            let s =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            return Self::parse_file(&s).with_context(|| format!("parsing {}", path.display()));
        }
        Ok(FileConfig::default())
    }

    fn parse_file(s: &str) -> Result<FileConfig> {
        Ok(toml::from_str::<FileConfig>(s)?)
    }
}

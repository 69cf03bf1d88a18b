use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KeyBinding {
    Key(char),
    Disabled,
}

impl KeyBinding {
    pub fn matches(&self, c: char) -> bool {
        matches!(self, KeyBinding::Key(k) if *k == c)
    }
}

impl TryFrom<String> for KeyBinding {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("off") {
            return Ok(KeyBinding::Disabled);
        }
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(KeyBinding::Key(c)),
            _ => Err(format!("key binding must be a single character or \"off\", got {value:?}")),
        }
    }
}

impl From<KeyBinding> for String {
    fn from(binding: KeyBinding) -> Self {
        match binding {
            KeyBinding::Key(c) => c.to_string(),
            KeyBinding::Disabled => "off".to_string(),
        }
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from(*self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub clone: KeyBinding,
    pub browse: KeyBinding,
    pub fork: KeyBinding,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            clone: KeyBinding::Key('c'),
            browse: KeyBinding::Key('b'),
            fork: KeyBinding::Key('f'),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub repos_dir: PathBuf,
    pub forked_dir: PathBuf,
    pub clone_depth: u32,
    pub git: String,
    pub gh: String,
    pub npm: String,
    #[serde(default)]
    pub keys: KeyBindings,
}

impl Default for Config {
    fn default() -> Self {
        let home = home_dir();
        Self {
            repos_dir: home.join("git"),
            forked_dir: home.join("forked"),
            clone_depth: 1,
            git: "git".to_string(),
            gh: "gh".to_string(),
            npm: "npm".to_string(),
            keys: KeyBindings::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub repos_dir: Option<PathBuf>,
    pub forked_dir: Option<PathBuf>,
}

impl Config {
    pub fn load(overrides: Overrides) -> Self {
        Self::load_from(&config_dir().join("ghclone").join("config.toml"), overrides)
    }

    pub fn load_from(config_file: &Path, overrides: Overrides) -> Self {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if config_file.exists() {
            figment = figment.merge(Toml::file(config_file));
        }

        figment = figment.merge(Env::prefixed("GHCLONE_").ignore(&["log"]).split("__"));

        let mut config = match figment.extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("config parse error, using defaults: {e}");
                Config::default()
            }
        };
        // command-line flags survive a broken file or environment
        if let Some(path) = overrides.repos_dir {
            config.repos_dir = path;
        }
        if let Some(path) = overrides.forked_dir {
            config.forked_dir = path;
        }
        config.repos_dir = resolve_dir(&config.repos_dir);
        config.forked_dir = resolve_dir(&config.forked_dir);
        config
    }

    pub fn to_toml(&self) -> crate::error::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::error::GhcloneError::Config(e.to_string()))
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home_dir().join(rest),
        Err(_) => path.to_path_buf(),
    }
}

// Relative to the invoking directory; subprocesses run elsewhere.
fn resolve_dir(path: &Path) -> PathBuf {
    let expanded = expand_home(path);
    std::path::absolute(&expanded).unwrap_or(expanded)
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".config"))
}

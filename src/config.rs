use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PromptConfig {
    #[serde(default = "default_prompt")]
    pub text: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            text: default_prompt(),
        }
    }
}

fn default_prompt() -> String {
    "$ ".into()
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct CompletionConfig {
    /// Offer PATH executables in addition to builtins.
    #[serde(default)]
    pub executables: bool,
    /// Directories searched after PATH, for completion and lookup.
    #[serde(default)]
    pub extra_dirs: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct LoggingConfig {
    /// `off`, `error`, `warn`, `info`, `debug`, or `trace`.
    #[serde(default)]
    pub level: String,
    /// Log file path; `~` is expanded.
    #[serde(default)]
    pub file: String,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    prompt: PromptOverlay,
    #[serde(default)]
    completion: CompletionOverlay,
    #[serde(default)]
    logging: LoggingOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct PromptOverlay {
    text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct CompletionOverlay {
    #[serde(default)]
    replace: bool,
    executables: Option<bool>,
    #[serde(default)]
    extra_dirs: Vec<String>,
    #[serde(default)]
    remove_extra_dirs: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct LoggingOverlay {
    level: Option<String>,
    file: Option<String>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Embedded defaults, merged with ~/.config/keysh/config.toml if present.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/keysh/config.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("keysh: config parse error: {e}");
                None
            }
        }
    }

    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        if let Some(v) = overlay.prompt.text {
            self.prompt.text = v;
        }

        let c = overlay.completion;
        if let Some(v) = c.executables {
            self.completion.executables = v;
        }
        merge_list(
            &mut self.completion.extra_dirs,
            c.extra_dirs,
            &c.remove_extra_dirs,
            c.replace,
        );

        let l = overlay.logging;
        if let Some(v) = l.level {
            self.logging.level = v;
        }
        if let Some(v) = l.file {
            self.logging.file = v;
        }
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}

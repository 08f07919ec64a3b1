//! Dial configuration
//!
//! The config file only names an action per dial:
//!
//! ```toml
//! left_dial = "volume"
//! right_dial = "brightness"
//! ```
//!
//! Names are resolved once at startup into [`DialBindings`]. Missing or
//! unknown names fall back to the per-dial default.

use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::action::{self, ActionSpec, Dial, KeyCode};
use crate::sink::Capabilities;

/// Dial action names as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DialConfig {
    #[serde(default = "default_left", deserialize_with = "deserialize_name")]
    pub left_dial: String,
    #[serde(default = "default_right", deserialize_with = "deserialize_name")]
    pub right_dial: String,
}

/// Accept any TOML value so one bad slot cannot reject the whole file.
/// Non-strings keep their TOML text and fail the action lookup later.
fn deserialize_name<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match toml::Value::deserialize(d)? {
        toml::Value::String(name) => Ok(name),
        other => Ok(other.to_string()),
    }
}

fn default_left() -> String {
    Dial::Left.default_action().to_string()
}
fn default_right() -> String {
    Dial::Right.default_action().to_string()
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            left_dial: default_left(),
            right_dial: default_right(),
        }
    }
}

impl DialConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zone-dials")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: DialConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Configured action name for a dial
    pub fn action_name(&self, dial: Dial) -> &str {
        match dial {
            Dial::Left => &self.left_dial,
            Dial::Right => &self.right_dial,
        }
    }
}

/// Resolved action for each dial, fixed for the process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialBindings {
    pub left: ActionSpec,
    pub right: ActionSpec,
}

impl DialBindings {
    /// Resolve configured names through the action table
    pub fn resolve(config: &DialConfig) -> Self {
        Self {
            left: resolve_slot(config, Dial::Left),
            right: resolve_slot(config, Dial::Right),
        }
    }

    pub fn get(&self, dial: Dial) -> &ActionSpec {
        match dial {
            Dial::Left => &self.left,
            Dial::Right => &self.right,
        }
    }

    /// Keys and relative axes the virtual device has to declare
    pub fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::default();
        for spec in [&self.left, &self.right] {
            match *spec {
                ActionSpec::Key { up, down } => {
                    caps.keys.insert(up);
                    caps.keys.insert(down);
                }
                ActionSpec::Rel { axis, .. } => {
                    caps.rel_axes.insert(axis);
                }
                ActionSpec::Backlight { .. } => {}
            }
        }
        caps
    }
}

impl Default for DialBindings {
    fn default() -> Self {
        Self::resolve(&DialConfig::default())
    }
}

fn resolve_slot(config: &DialConfig, dial: Dial) -> ActionSpec {
    let name = config.action_name(dial);
    action::lookup(name).unwrap_or_else(|| {
        let fallback = dial.default_action();
        warn!(
            "Unknown action \"{}\" for {}, using \"{}\"",
            name,
            dial.config_key(),
            fallback
        );
        fallback_spec(dial)
    })
}

fn fallback_spec(dial: Dial) -> ActionSpec {
    match dial {
        Dial::Left => ActionSpec::Key {
            up: KeyCode::VolumeUp,
            down: KeyCode::VolumeDown,
        },
        Dial::Right => ActionSpec::Backlight {
            step_percent: action::BRIGHTNESS_STEP_PERCENT,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{lookup, RelAxis};

    fn config(left: &str, right: &str) -> DialConfig {
        DialConfig {
            left_dial: left.to_string(),
            right_dial: right.to_string(),
        }
    }

    #[test]
    fn test_default_bindings() {
        let bindings = DialBindings::default();
        assert_eq!(bindings.left, lookup("volume").unwrap());
        assert_eq!(bindings.right, lookup("brightness").unwrap());
    }

    #[test]
    fn test_fallback_matches_table() {
        assert_eq!(Some(fallback_spec(Dial::Left)), lookup("volume"));
        assert_eq!(Some(fallback_spec(Dial::Right)), lookup("brightness"));
    }

    #[test]
    fn test_unknown_names_fall_back_per_slot() {
        let bindings = DialBindings::resolve(&config("nonsense", "also_nonsense"));
        assert_eq!(bindings.left, lookup("volume").unwrap());
        assert_eq!(bindings.right, lookup("brightness").unwrap());
    }

    #[test]
    fn test_known_names_resolve() {
        let bindings = DialBindings::resolve(&config("scroll", "media"));
        assert_eq!(bindings.left, lookup("scroll").unwrap());
        assert_eq!(bindings.right, lookup("media").unwrap());
        assert_eq!(bindings.get(Dial::Right), &lookup("media").unwrap());
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let parsed: DialConfig = toml::from_str("left_dial = \"zoom\"\n").unwrap();
        assert_eq!(parsed.left_dial, "zoom");
        assert_eq!(parsed.right_dial, "brightness");

        let empty: DialConfig = toml::from_str("").unwrap();
        assert_eq!(empty, DialConfig::default());
    }

    #[test]
    fn test_unrelated_keys_ignored() {
        let parsed: DialConfig =
            toml::from_str("right_dial = \"scroll\"\ntheme = \"dark\"\n").unwrap();
        assert_eq!(parsed.left_dial, "volume");
        assert_eq!(parsed.right_dial, "scroll");
    }

    #[test]
    fn test_capabilities_default() {
        let caps = DialBindings::default().capabilities();
        assert_eq!(
            caps.keys.iter().copied().collect::<Vec<_>>(),
            vec![KeyCode::VolumeUp, KeyCode::VolumeDown]
        );
        assert!(caps.rel_axes.is_empty());
    }

    #[test]
    fn test_capabilities_shared_axis() {
        let caps = DialBindings::resolve(&config("scroll", "scroll_inverted")).capabilities();
        assert!(caps.keys.is_empty());
        assert_eq!(caps.rel_axes.len(), 1);
        assert!(caps.rel_axes.contains(&RelAxis::Wheel));
    }

    #[test]
    fn test_capabilities_backlight_only() {
        let caps = DialBindings::resolve(&config("brightness", "brightness")).capabilities();
        assert!(caps.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let config = DialConfig::load(Path::new("/nonexistent/zone-dials.toml")).unwrap();
        assert_eq!(config, DialConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "left_dial = \"media\"\nright_dial = \"zoom\"\n").unwrap();

        let config = DialConfig::load(&path).unwrap();
        assert_eq!(config.action_name(Dial::Left), "media");
        assert_eq!(config.action_name(Dial::Right), "zoom");
    }

    #[test]
    fn test_wrong_type_only_resets_its_slot() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "left_dial = 5\nright_dial = \"scroll\"\n").unwrap();

        let config = DialConfig::load(&path).unwrap();
        let bindings = DialBindings::resolve(&config);
        assert_eq!(bindings.left, lookup("volume").unwrap());
        assert_eq!(bindings.right, lookup("scroll").unwrap());
    }

    #[test]
    fn test_non_string_values_parse() {
        let parsed: DialConfig =
            toml::from_str("left_dial = [\"zoom\"]\nright_dial = { name = \"media\" }\n")
                .unwrap();
        let bindings = DialBindings::resolve(&parsed);
        assert_eq!(bindings.left, lookup("volume").unwrap());
        assert_eq!(bindings.right, lookup("brightness").unwrap());
    }

    #[test]
    fn test_load_malformed_file_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "left_dial = [").unwrap();
        assert!(DialConfig::load(&path).is_err());
    }
}

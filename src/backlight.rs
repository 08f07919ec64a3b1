//! Direct display backlight control via sysfs
//!
//! Writes `/sys/class/backlight/<dev>/brightness` directly so brightness
//! changes work even where the compositor filters brightness keys.
//! Current and max values are re-read on every adjustment since other
//! tools may change the level in between.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::action::Direction;

/// Sysfs class directory holding backlight controllers
pub const SYSFS_BACKLIGHT: &str = "/sys/class/backlight";

const BRIGHTNESS_FILE: &str = "brightness";
const MAX_BRIGHTNESS_FILE: &str = "max_brightness";

/// Errors from backlight file access
#[derive(Debug, Error)]
pub enum BacklightError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid value in {path}: {content:?}")]
    Parse { path: PathBuf, content: String },
}

/// A backlight controller directory
#[derive(Debug, Clone)]
pub struct Backlight {
    dir: PathBuf,
}

impl Backlight {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Find the system backlight controller
    pub fn discover() -> Option<Self> {
        Self::discover_in(Path::new(SYSFS_BACKLIGHT))
    }

    /// Find a backlight controller under `root`
    ///
    /// Prefers an `amdgpu` controller, otherwise the first one found.
    pub fn discover_in(root: &Path) -> Option<Self> {
        let mut dirs: Vec<PathBuf> = fs::read_dir(root)
            .ok()?
            .flatten()
            .map(|entry| entry.path())
            .collect();
        dirs.sort();

        let preferred = dirs.iter().position(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().contains("amdgpu"))
                .unwrap_or(false)
        });

        match preferred {
            Some(idx) => Some(Self::new(dirs.swap_remove(idx))),
            None => dirs.into_iter().next().map(Self::new),
        }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Current raw brightness level
    pub fn brightness(&self) -> Result<u64, BacklightError> {
        read_level(&self.dir.join(BRIGHTNESS_FILE))
    }

    /// Maximum raw brightness level
    pub fn max_brightness(&self) -> Result<u64, BacklightError> {
        read_level(&self.dir.join(MAX_BRIGHTNESS_FILE))
    }

    /// Step brightness by `step_percent` of max in `direction`
    ///
    /// Returns the level written.
    pub fn adjust(&self, direction: Direction, step_percent: u32) -> Result<u64, BacklightError> {
        let max = self.max_brightness()?;
        let current = self.brightness()?;

        let step = step_size(max, step_percent);
        let new = next_level(current, max, step, direction);

        let path = self.dir.join(BRIGHTNESS_FILE);
        fs::write(&path, new.to_string()).map_err(|source| BacklightError::Io { path, source })?;

        debug!("Backlight {} -> {} (max {}, step {})", current, new, max, step);
        Ok(new)
    }
}

/// Raw step for a percentage of max, never less than 1
pub fn step_size(max: u64, step_percent: u32) -> u64 {
    (max.saturating_mul(step_percent as u64) / 100).max(1)
}

/// Apply one step and clamp to `[0, max]`
pub fn next_level(current: u64, max: u64, step: u64, direction: Direction) -> u64 {
    let moved = match direction {
        Direction::Up => current.saturating_add(step),
        Direction::Down => current.saturating_sub(step),
    };
    moved.min(max)
}

fn read_level(path: &Path) -> Result<u64, BacklightError> {
    let content = fs::read_to_string(path).map_err(|source| BacklightError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    content
        .trim()
        .parse()
        .map_err(|_| BacklightError::Parse {
            path: path.to_path_buf(),
            content,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_size() {
        assert_eq!(step_size(100, 5), 5);
        assert_eq!(step_size(255, 5), 12);
        assert_eq!(step_size(96000, 5), 4800);
    }

    #[test]
    fn test_step_size_minimum() {
        assert_eq!(step_size(10, 5), 1);
        assert_eq!(step_size(1, 5), 1);
        assert_eq!(step_size(100, 0), 1);
        assert_eq!(step_size(0, 5), 1);
    }

    #[test]
    fn test_next_level_clamps() {
        assert_eq!(next_level(50, 100, 5, Direction::Up), 55);
        assert_eq!(next_level(50, 100, 5, Direction::Down), 45);
        assert_eq!(next_level(98, 100, 5, Direction::Up), 100);
        assert_eq!(next_level(2, 100, 5, Direction::Down), 0);
    }

    #[test]
    fn test_next_level_at_bounds() {
        assert_eq!(next_level(100, 100, 5, Direction::Up), 100);
        assert_eq!(next_level(0, 100, 5, Direction::Down), 0);
    }

    #[test]
    fn test_next_level_stays_in_range() {
        for max in [1u64, 7, 100, 255, 1023] {
            for current in 0..=max {
                for pct in [0u32, 1, 5, 50, 100, 150] {
                    let step = step_size(max, pct);
                    assert!(step >= 1);
                    for dir in [Direction::Up, Direction::Down] {
                        let v = next_level(current, max, step, dir);
                        assert!(v <= max, "max={max} cur={current} pct={pct}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_current_above_max_is_clamped() {
        assert_eq!(next_level(150, 100, 5, Direction::Down), 100);
    }
}

//! Dial action definitions
//!
//! Static registry mapping a configured action name to what a dial tick does:
//! a key click, a relative-axis step, or a direct backlight adjustment.

use std::fmt;

/// Physical dial on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dial {
    Left,
    Right,
}

impl Dial {
    /// Config key name for this dial slot
    pub fn config_key(&self) -> &'static str {
        match self {
            Dial::Left => "left_dial",
            Dial::Right => "right_dial",
        }
    }

    /// Action name used when the configured one is missing or unknown
    pub fn default_action(&self) -> &'static str {
        match self {
            Dial::Left => "volume",
            Dial::Right => "brightness",
        }
    }
}

/// Rotation direction of a single dial tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Key identifiers emitted by the dial actions
///
/// Converted to evdev codes by the output sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyCode {
    VolumeUp,
    VolumeDown,
    Up,
    Down,
    Left,
    Right,
    NextSong,
    PreviousSong,
    PageUp,
    PageDown,
    ZoomIn,
    ZoomOut,
}

/// Relative axes emitted by the dial actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelAxis {
    Wheel,
}

/// What a dial does when it ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSpec {
    /// One press+release per tick
    Key { up: KeyCode, down: KeyCode },
    /// One relative motion event per tick
    Rel {
        axis: RelAxis,
        up_delta: i32,
        down_delta: i32,
    },
    /// Direct write to the backlight control files
    Backlight { step_percent: u32 },
}

/// Concrete output for one tick, after the direction is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Key(KeyCode),
    Rel { axis: RelAxis, delta: i32 },
    Backlight { direction: Direction, step_percent: u32 },
}

impl ActionSpec {
    /// Pick the key/delta for a direction
    pub fn resolve(&self, direction: Direction) -> Effect {
        match (*self, direction) {
            (ActionSpec::Key { up, .. }, Direction::Up) => Effect::Key(up),
            (ActionSpec::Key { down, .. }, Direction::Down) => Effect::Key(down),
            (ActionSpec::Rel { axis, up_delta, .. }, Direction::Up) => Effect::Rel {
                axis,
                delta: up_delta,
            },
            (
                ActionSpec::Rel {
                    axis, down_delta, ..
                },
                Direction::Down,
            ) => Effect::Rel {
                axis,
                delta: down_delta,
            },
            (ActionSpec::Backlight { step_percent }, direction) => Effect::Backlight {
                direction,
                step_percent,
            },
        }
    }
}

/// Every action name the registry knows, in display order
pub const ACTION_NAMES: &[&str] = &[
    "volume",
    "brightness",
    "scroll",
    "scroll_inverted",
    "arrows_vertical",
    "arrows_horizontal",
    "media",
    "page_scroll",
    "zoom",
];

/// Backlight step used by the `brightness` action (percent of max per tick)
pub const BRIGHTNESS_STEP_PERCENT: u32 = 5;

/// Look up an action by its configured name
pub fn lookup(name: &str) -> Option<ActionSpec> {
    let spec = match name {
        "volume" => ActionSpec::Key {
            up: KeyCode::VolumeUp,
            down: KeyCode::VolumeDown,
        },
        "brightness" => ActionSpec::Backlight {
            step_percent: BRIGHTNESS_STEP_PERCENT,
        },
        "scroll" => ActionSpec::Rel {
            axis: RelAxis::Wheel,
            up_delta: 1,
            down_delta: -1,
        },
        "scroll_inverted" => ActionSpec::Rel {
            axis: RelAxis::Wheel,
            up_delta: -1,
            down_delta: 1,
        },
        "arrows_vertical" => ActionSpec::Key {
            up: KeyCode::Up,
            down: KeyCode::Down,
        },
        "arrows_horizontal" => ActionSpec::Key {
            up: KeyCode::Right,
            down: KeyCode::Left,
        },
        "media" => ActionSpec::Key {
            up: KeyCode::NextSong,
            down: KeyCode::PreviousSong,
        },
        "page_scroll" => ActionSpec::Key {
            up: KeyCode::PageUp,
            down: KeyCode::PageDown,
        },
        "zoom" => ActionSpec::Key {
            up: KeyCode::ZoomIn,
            down: KeyCode::ZoomOut,
        },
        _ => return None,
    };
    Some(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_name_resolves() {
        for name in ACTION_NAMES {
            assert!(lookup(name).is_some(), "missing action {name}");
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(lookup("warp_drive"), None);
        assert_eq!(lookup(""), None);
        // Names are case sensitive
        assert_eq!(lookup("Volume"), None);
    }

    #[test]
    fn test_dial_defaults_exist() {
        assert!(lookup(Dial::Left.default_action()).is_some());
        assert!(lookup(Dial::Right.default_action()).is_some());
    }

    #[test]
    fn test_key_resolve() {
        let spec = lookup("volume").unwrap();
        assert_eq!(spec.resolve(Direction::Up), Effect::Key(KeyCode::VolumeUp));
        assert_eq!(
            spec.resolve(Direction::Down),
            Effect::Key(KeyCode::VolumeDown)
        );
    }

    #[test]
    fn test_scroll_inverted_flips_deltas() {
        let normal = lookup("scroll").unwrap();
        let inverted = lookup("scroll_inverted").unwrap();
        assert_eq!(
            normal.resolve(Direction::Up),
            Effect::Rel {
                axis: RelAxis::Wheel,
                delta: 1
            }
        );
        assert_eq!(
            inverted.resolve(Direction::Up),
            Effect::Rel {
                axis: RelAxis::Wheel,
                delta: -1
            }
        );
    }

    #[test]
    fn test_backlight_keeps_direction() {
        let spec = lookup("brightness").unwrap();
        assert_eq!(
            spec.resolve(Direction::Down),
            Effect::Backlight {
                direction: Direction::Down,
                step_percent: 5
            }
        );
    }
}

//! Virtual output device using evdev/uinput
//!
//! Dial ticks that map to keys or scroll are re-emitted through a virtual
//! input device, which downstream applications see as a normal keyboard/mouse.

use std::collections::BTreeSet;

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, Key, RelativeAxisType,
};
use thiserror::Error;

use crate::action::{KeyCode, RelAxis};

/// Name of the virtual device (shown in `evtest`, `libinput list-devices`)
pub const DEVICE_NAME: &str = "Zotac-Zone-Dials";

/// Errors from virtual device operations
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create virtual device: {0}")]
    CreateDevice(#[source] std::io::Error),
    #[error("Failed to emit event: {0}")]
    EmitEvent(#[source] std::io::Error),
}

/// Event codes the virtual device must be created with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub keys: BTreeSet<KeyCode>,
    pub rel_axes: BTreeSet<RelAxis>,
}

impl Capabilities {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.rel_axes.is_empty()
    }
}

/// Destination for key and relative events
///
/// Events are batched until [`InputSink::sync`] flushes them to consumers.
pub trait InputSink {
    fn key(&mut self, key: KeyCode, pressed: bool) -> Result<(), SinkError>;
    fn relative(&mut self, axis: RelAxis, delta: i32) -> Result<(), SinkError>;
    fn sync(&mut self) -> Result<(), SinkError>;
}

/// uinput-backed dial output device
///
/// The uinput device is destroyed when this is dropped.
pub struct VirtualDials {
    device: VirtualDevice,
    pending: Vec<InputEvent>,
}

impl VirtualDials {
    /// Create and register the virtual device
    ///
    /// # Arguments
    /// * `name` - Device name
    /// * `caps` - Every key and axis that will ever be emitted
    pub fn new(name: &str, caps: &Capabilities) -> Result<Self, SinkError> {
        let mut builder = VirtualDeviceBuilder::new()
            .map_err(SinkError::CreateDevice)?
            .name(name);

        if !caps.keys.is_empty() {
            let mut keys = AttributeSet::<Key>::new();
            for &key in &caps.keys {
                keys.insert(key_to_code(key));
            }
            builder = builder.with_keys(&keys).map_err(SinkError::CreateDevice)?;
        }

        if !caps.rel_axes.is_empty() {
            let mut axes = AttributeSet::<RelativeAxisType>::new();
            for &axis in &caps.rel_axes {
                axes.insert(axis_to_code(axis));
            }
            builder = builder
                .with_relative_axes(&axes)
                .map_err(SinkError::CreateDevice)?;
        }

        let device = builder.build().map_err(SinkError::CreateDevice)?;

        Ok(Self {
            device,
            pending: Vec::new(),
        })
    }

    /// Get the device path (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<std::path::PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }
}

impl InputSink for VirtualDials {
    fn key(&mut self, key: KeyCode, pressed: bool) -> Result<(), SinkError> {
        let code = key_to_code(key);
        self.pending
            .push(InputEvent::new(EventType::KEY, code.code(), pressed as i32));
        Ok(())
    }

    fn relative(&mut self, axis: RelAxis, delta: i32) -> Result<(), SinkError> {
        let code = axis_to_code(axis);
        self.pending
            .push(InputEvent::new(EventType::RELATIVE, code.0, delta));
        Ok(())
    }

    fn sync(&mut self) -> Result<(), SinkError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        // emit() terminates the batch with SYN_REPORT
        let events = std::mem::take(&mut self.pending);
        self.device.emit(&events).map_err(SinkError::EmitEvent)
    }
}

/// Convert our KeyCode to evdev Key
fn key_to_code(key: KeyCode) -> Key {
    match key {
        KeyCode::VolumeUp => Key::KEY_VOLUMEUP,
        KeyCode::VolumeDown => Key::KEY_VOLUMEDOWN,
        KeyCode::Up => Key::KEY_UP,
        KeyCode::Down => Key::KEY_DOWN,
        KeyCode::Left => Key::KEY_LEFT,
        KeyCode::Right => Key::KEY_RIGHT,
        KeyCode::NextSong => Key::KEY_NEXTSONG,
        KeyCode::PreviousSong => Key::KEY_PREVIOUSSONG,
        KeyCode::PageUp => Key::KEY_PAGEUP,
        KeyCode::PageDown => Key::KEY_PAGEDOWN,
        KeyCode::ZoomIn => Key::KEY_ZOOMIN,
        KeyCode::ZoomOut => Key::KEY_ZOOMOUT,
    }
}

/// Convert our RelAxis to evdev RelativeAxisType
fn axis_to_code(axis: RelAxis) -> RelativeAxisType {
    match axis {
        RelAxis::Wheel => RelativeAxisType::REL_WHEEL,
    }
}

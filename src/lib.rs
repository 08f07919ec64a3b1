//! Zotac Zone Dial Driver
//!
//! Translates raw HID reports from the Zone's two rotary dials into virtual
//! input events (keys, scroll) or direct display backlight changes.

pub mod action;
pub mod backlight;
pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod report;
pub mod sink;

pub use action::{ActionSpec, Dial, Direction, Effect, KeyCode, RelAxis};
pub use backlight::{Backlight, BacklightError};
pub use config::{DialBindings, DialConfig};
pub use dispatch::{DispatchError, Dispatcher};
pub use report::{decode, DialEvent};
pub use sink::{Capabilities, InputSink, SinkError, VirtualDials};

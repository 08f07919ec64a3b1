//! Dial report decoding
//!
//! The dials share a hidraw node with other HID reports. Only report ID 0x03
//! carries dial motion; byte 3 encodes which dial turned and which way.
//!
//! Report format: [03, xx, xx, trigger, ...]

use crate::action::{Dial, Direction};

/// Report ID of the dial report
pub const DIAL_REPORT_ID: u8 = 0x03;

/// Offset of the trigger byte
pub const TRIGGER_OFFSET: usize = 3;

/// Largest report read from the device in one go
pub const MAX_REPORT_LEN: usize = 64;

/// Trigger byte values
pub mod trigger {
    pub const LEFT_DOWN: u8 = 0x10;
    pub const LEFT_UP: u8 = 0x08;
    pub const RIGHT_DOWN: u8 = 0x02;
    pub const RIGHT_UP: u8 = 0x01;
}

/// A single dial tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialEvent {
    pub dial: Dial,
    pub direction: Direction,
}

/// Decode one raw report into a dial tick
///
/// Short reads, foreign report IDs and idle/unknown trigger values all yield
/// `None`; none of them are errors.
pub fn decode(data: &[u8]) -> Option<DialEvent> {
    if data.len() <= TRIGGER_OFFSET || data[0] != DIAL_REPORT_ID {
        return None;
    }

    let (dial, direction) = match data[TRIGGER_OFFSET] {
        trigger::LEFT_DOWN => (Dial::Left, Direction::Down),
        trigger::LEFT_UP => (Dial::Left, Direction::Up),
        trigger::RIGHT_DOWN => (Dial::Right, Direction::Down),
        trigger::RIGHT_UP => (Dial::Right, Direction::Up),
        _ => return None,
    };

    Some(DialEvent { dial, direction })
}

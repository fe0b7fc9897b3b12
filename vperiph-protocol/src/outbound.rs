//! Outbound message encoding
//!
//! Everything the firmware sends is a single line built from a prefix, a
//! fixed-width payload and a `\n`. Encoding streams bytes into a sink so the
//! caller can feed them straight into the transmit queue.

use heapless::Vec;

use crate::codec;
use crate::message::{
    adc_item, ITEM_BUTTONS, ITEM_DEBUG, ITEM_LEDS, ITEM_LOG, ITEM_SCREEN, ITEM_SWITCHES,
    ITEM_TIME, TAG_ERROR, TAG_REQUEST, TAG_SET,
};
use crate::ErrorCode;

/// Item id of the alarm clock screen
pub const SCREEN_ALARM_CLOCK: u8 = b'1';

/// Item id of the seesaw screen
pub const SCREEN_SEESAW: u8 = b'2';

/// Scale applied to seesaw reference and position before encoding
pub const SEESAW_POSITION_SCALE: f32 = 50_000.0;

/// Scale applied to the seesaw angle before encoding
pub const SEESAW_ANGLE_SCALE: f32 = 2_000.0;

/// Errors from encoding into a bounded buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Buffer too small for the encoded line
    BufferTooSmall,
}

/// Seesaw display values in wire units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SeesawFrame {
    pub reference: i16,
    pub position: i16,
    pub angle: i16,
    pub boing: bool,
}

impl SeesawFrame {
    /// Convert physical values to wire units
    ///
    /// Values outside the 16-bit range saturate.
    pub fn from_physical(reference: f32, position: f32, angle: f32, boing: bool) -> Self {
        Self {
            reference: (reference * SEESAW_POSITION_SCALE) as i16,
            position: (position * SEESAW_POSITION_SCALE) as i16,
            angle: (angle * SEESAW_ANGLE_SCALE) as i16,
            boing,
        }
    }
}

/// State queried from the visualizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Query {
    /// `?T`
    Time,
    /// `?01`
    Switches,
    /// `?02`
    Buttons,
    /// `?0a`, `?0b`, ...
    Adc(u8),
}

/// Messages from the firmware to the visualizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outbound<'a> {
    /// Screen announcement or reply to `?S`: `dS<digit>`
    Screen(u8),
    /// Log line shown by the visualizer: `dL<text>`
    Log(&'a str),
    /// Debug log line: `dD<text>`
    Debug(&'a str),
    /// LED state on screen 0: `d00<hex2>`
    Leds(u8),
    /// Reply to `?0`: `d0<hex2>`
    LedsReply(u8),
    /// Alarm clock display value: `d1<hex8>`
    AlarmClock(u32),
    /// Seesaw display: `d2<hex4><hex4><hex4><t|f>`
    Seesaw(SeesawFrame),
    /// Request for visualizer state
    Query(Query),
    /// Rejected line: `e<hex2><line>`
    ErrorEcho { code: ErrorCode, line: &'a [u8] },
}

/// Replace bytes that would end the line early
fn sanitize(byte: u8) -> u8 {
    if byte == b'\n' || byte == b'\r' {
        b' '
    } else {
        byte
    }
}

impl<'a> Outbound<'a> {
    /// Stream the encoded line, terminator included, into `sink`
    pub fn write_to<F: FnMut(u8)>(&self, mut sink: F) {
        let mut put = |bytes: &[u8]| bytes.iter().for_each(|&b| sink(b));

        match *self {
            Outbound::Screen(screen) => put(&[TAG_SET, ITEM_SCREEN, b'0'.wrapping_add(screen)]),
            Outbound::Log(text) => {
                put(&[TAG_SET, ITEM_LOG]);
                text.bytes().for_each(|b| put(&[sanitize(b)]));
            }
            Outbound::Debug(text) => {
                put(&[TAG_SET, ITEM_DEBUG]);
                text.bytes().for_each(|b| put(&[sanitize(b)]));
            }
            Outbound::Leds(leds) => {
                put(&[TAG_SET, b'0', ITEM_LEDS]);
                put(&codec::encode_u8(leds));
            }
            Outbound::LedsReply(leds) => {
                put(&[TAG_SET, ITEM_LEDS]);
                put(&codec::encode_u8(leds));
            }
            Outbound::AlarmClock(value) => {
                put(&[TAG_SET, SCREEN_ALARM_CLOCK]);
                put(&codec::encode_u32(value));
            }
            Outbound::Seesaw(frame) => {
                put(&[TAG_SET, SCREEN_SEESAW]);
                put(&codec::encode_u16(frame.reference as u16));
                put(&codec::encode_u16(frame.position as u16));
                put(&codec::encode_u16(frame.angle as u16));
                put(&[if frame.boing { b't' } else { b'f' }]);
            }
            Outbound::Query(query) => match query {
                Query::Time => put(&[TAG_REQUEST, ITEM_TIME]),
                Query::Switches => put(&[TAG_REQUEST, b'0', ITEM_SWITCHES]),
                Query::Buttons => put(&[TAG_REQUEST, b'0', ITEM_BUTTONS]),
                Query::Adc(channel) => put(&[TAG_REQUEST, b'0', adc_item(channel)]),
            },
            Outbound::ErrorEcho { code, line } => {
                put(&[TAG_ERROR]);
                put(&codec::encode_u8(code.code()));
                put(line);
            }
        }

        put(b"\n");
    }

    /// Encode into a heapless Vec
    pub fn to_vec<const N: usize>(&self) -> Result<Vec<u8, N>, EncodeError> {
        let mut vec = Vec::new();
        let mut overflow = false;
        self.write_to(|b| {
            if vec.push(b).is_err() {
                overflow = true;
            }
        });
        if overflow {
            return Err(EncodeError::BufferTooSmall);
        }
        Ok(vec)
    }
}

//! Inbound message types
//!
//! A line from the visualizer starts with a kind tag:
//! - `d` set: an item id followed by its payload
//! - `?` request: an item id, answered with a `d` line
//! - `e` error report: a two-hex-digit code and the line that failed
//!
//! [`Message::parse`] splits the line; [`SetCommand`] and [`Request`] then
//! decode the item and payload into typed values.

use crate::codec;
use crate::time::TimeOfDay;
use crate::ErrorCode;

// Kind tags
pub const TAG_SET: u8 = b'd';
pub const TAG_REQUEST: u8 = b'?';
pub const TAG_ERROR: u8 = b'e';

// Item ids: screen-independent
pub const ITEM_SCREEN: u8 = b'S';
pub const ITEM_TIME: u8 = b'T';
pub const ITEM_VERSION: u8 = b'V';
pub const ITEM_LOG: u8 = b'L';
pub const ITEM_DEBUG: u8 = b'D';

// Item ids: screen 0
pub const ITEM_LEDS: u8 = b'0';
pub const ITEM_SWITCHES: u8 = b'1';
pub const ITEM_BUTTONS: u8 = b'2';
pub const ITEM_ADC_BASE: u8 = b'a';

/// Screen ids the protocol can address
pub const MAX_SCREEN: u8 = 9;

/// Highest number of ADC channels addressable as `a`..`z`
pub const MAX_ADC_CHANNELS: usize = 26;

/// A line from the visualizer, split by kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message<'a> {
    /// `d<item><payload>`
    Set { item: u8, payload: &'a [u8] },
    /// `?<item><payload>`
    Request { item: u8, payload: &'a [u8] },
    /// `e<code><line>`; `code` is `None` when missing or not a known code
    PeerError {
        code: Option<ErrorCode>,
        echoed: &'a [u8],
    },
    /// Any other leading character
    Unknown { tag: u8 },
}

impl<'a> Message<'a> {
    /// Split a line into kind, item id and payload
    ///
    /// Returns `None` for an empty line and for a bare `d` / `?` tag with
    /// no item id; both are treated as line noise.
    pub fn parse(line: &'a [u8]) -> Option<Self> {
        let (&tag, rest) = line.split_first()?;
        match tag {
            TAG_SET => {
                let (&item, payload) = rest.split_first()?;
                Some(Message::Set { item, payload })
            }
            TAG_REQUEST => {
                let (&item, payload) = rest.split_first()?;
                Some(Message::Request { item, payload })
            }
            TAG_ERROR => {
                let (code, echoed) = if rest.len() >= 2 {
                    let code = codec::decode_u8(&rest[..2])
                        .ok()
                        .and_then(ErrorCode::from_code);
                    (code, &rest[2..])
                } else {
                    (None, rest)
                };
                Some(Message::PeerError { code, echoed })
            }
            tag => Some(Message::Unknown { tag }),
        }
    }
}

/// Decoded `d` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetCommand<'a> {
    /// Screen 0 switch bitmask (`d01<hex2>`)
    Switches(u8),
    /// Screen 0 button bitmask (`d02<hex2>`)
    Buttons(u8),
    /// Screen 0 ADC register (`d0<a..><hex4>`)
    Adc { channel: u8, value: u16 },
    /// Wall-clock time (`dT<YYYYMMDDHHMMSS>`)
    Time(TimeOfDay),
    /// Visualizer version info (`dV...`); accepted and ignored
    Version(&'a [u8]),
}

impl<'a> SetCommand<'a> {
    /// Decode the item and payload of a `d` line
    ///
    /// A digit item addresses a numbered screen; only screen `0` accepts
    /// setters. Any other item belongs to the screen-independent set.
    pub fn parse(item: u8, payload: &'a [u8], adc_channels: usize) -> Result<Self, ErrorCode> {
        if item.is_ascii_digit() {
            let (&sub_item, value) = payload.split_first().ok_or(ErrorCode::Length)?;
            if item != b'0' {
                return Err(ErrorCode::UnknownScreen);
            }
            Self::parse_screen0(sub_item, value, adc_channels)
        } else {
            Self::parse_unnamed(item, payload)
        }
    }

    fn parse_screen0(item: u8, value: &'a [u8], adc_channels: usize) -> Result<Self, ErrorCode> {
        match item {
            ITEM_SWITCHES => Ok(SetCommand::Switches(codec::decode_u8(value)?)),
            ITEM_BUTTONS => Ok(SetCommand::Buttons(codec::decode_u8(value)?)),
            _ => {
                let channel = adc_channel(item, adc_channels).ok_or(ErrorCode::UnknownItem)?;
                Ok(SetCommand::Adc {
                    channel,
                    value: codec::decode_u16(value)?,
                })
            }
        }
    }

    fn parse_unnamed(item: u8, payload: &'a [u8]) -> Result<Self, ErrorCode> {
        match item {
            ITEM_TIME => Ok(SetCommand::Time(TimeOfDay::parse(payload)?)),
            ITEM_VERSION => Ok(SetCommand::Version(payload)),
            _ => Err(ErrorCode::UnknownItem),
        }
    }
}

/// Map an ADC item id (`a`, `b`, ...) to its channel index
pub fn adc_channel(item: u8, adc_channels: usize) -> Option<u8> {
    let channels = adc_channels.min(MAX_ADC_CHANNELS);
    let channel = item.checked_sub(ITEM_ADC_BASE)?;
    if (channel as usize) < channels {
        Some(channel)
    } else {
        None
    }
}

/// Item id of an ADC channel
pub fn adc_item(channel: u8) -> u8 {
    ITEM_ADC_BASE + channel
}

/// Decoded `?` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    /// `?S`: current screen id
    Screen,
    /// `?0`: current LED bitmask
    Leds,
}

impl Request {
    /// Decode the item and payload of a `?` line
    pub fn parse(item: u8, payload: &[u8]) -> Result<Self, ErrorCode> {
        match item {
            ITEM_SCREEN => {
                if !payload.is_empty() {
                    return Err(ErrorCode::Length);
                }
                Ok(Request::Screen)
            }
            // trailing bytes are tolerated here
            ITEM_LEDS => Ok(Request::Leds),
            _ => Err(ErrorCode::UnknownItem),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds() {
        assert_eq!(
            Message::parse(b"d01ff"),
            Some(Message::Set {
                item: b'0',
                payload: b"1ff"
            })
        );
        assert_eq!(
            Message::parse(b"?S"),
            Some(Message::Request {
                item: b'S',
                payload: b""
            })
        );
        assert_eq!(Message::parse(b"x12"), Some(Message::Unknown { tag: b'x' }));
    }

    #[test]
    fn test_parse_noise() {
        assert_eq!(Message::parse(b""), None);
        assert_eq!(Message::parse(b"d"), None);
        assert_eq!(Message::parse(b"?"), None);
    }

    #[test]
    fn test_parse_peer_error() {
        assert_eq!(
            Message::parse(b"e03?X"),
            Some(Message::PeerError {
                code: Some(ErrorCode::UnknownItem),
                echoed: b"?X"
            })
        );
        assert_eq!(
            Message::parse(b"e"),
            Some(Message::PeerError {
                code: None,
                echoed: b""
            })
        );
    }

    #[test]
    fn test_set_switches_and_buttons() {
        assert_eq!(SetCommand::parse(b'0', b"1ff", 2), Ok(SetCommand::Switches(0xff)));
        assert_eq!(SetCommand::parse(b'0', b"20a", 2), Ok(SetCommand::Buttons(0x0a)));
    }

    #[test]
    fn test_set_adc() {
        assert_eq!(
            SetCommand::parse(b'0', b"b03ff", 2),
            Ok(SetCommand::Adc {
                channel: 1,
                value: 0x03ff
            })
        );
        assert_eq!(SetCommand::parse(b'0', b"c03ff", 2), Err(ErrorCode::UnknownItem));
    }

    #[test]
    fn test_set_screen_errors() {
        assert_eq!(SetCommand::parse(b'1', b"", 2), Err(ErrorCode::Length));
        assert_eq!(SetCommand::parse(b'0', b"", 2), Err(ErrorCode::Length));
        assert_eq!(SetCommand::parse(b'3', b"1ff", 2), Err(ErrorCode::UnknownScreen));
        assert_eq!(SetCommand::parse(b'0', b"1", 2), Err(ErrorCode::Length));
        assert_eq!(SetCommand::parse(b'0', b"1fff", 2), Err(ErrorCode::Length));
        assert_eq!(SetCommand::parse(b'0', b"1zz", 2), Err(ErrorCode::Decode));
        assert_eq!(SetCommand::parse(b'0', b"a12", 2), Err(ErrorCode::Length));
        assert_eq!(SetCommand::parse(b'0', b"x00", 2), Err(ErrorCode::UnknownItem));
    }

    #[test]
    fn test_set_unnamed() {
        assert_eq!(
            SetCommand::parse(b'T', b"20240101120000", 2),
            Ok(SetCommand::Time(TimeOfDay::new(2024, 1, 1, 12, 0, 0).unwrap()))
        );
        assert_eq!(SetCommand::parse(b'V', b"03d012", 2), Ok(SetCommand::Version(b"03d012")));
        assert_eq!(SetCommand::parse(b'Q', b"", 2), Err(ErrorCode::UnknownItem));
        assert_eq!(SetCommand::parse(b'T', b"2024", 2), Err(ErrorCode::Length));
    }

    #[test]
    fn test_request_parse() {
        assert_eq!(Request::parse(b'S', b""), Ok(Request::Screen));
        assert_eq!(Request::parse(b'S', b"1"), Err(ErrorCode::Length));
        assert_eq!(Request::parse(b'0', b""), Ok(Request::Leds));
        assert_eq!(Request::parse(b'Z', b""), Err(ErrorCode::UnknownItem));
    }

    #[test]
    fn test_adc_item_mapping() {
        assert_eq!(adc_channel(b'a', 2), Some(0));
        assert_eq!(adc_channel(b'b', 2), Some(1));
        assert_eq!(adc_channel(b'c', 2), None);
        assert_eq!(adc_channel(b'0', 2), None);
        assert_eq!(adc_item(1), b'b');
    }
}

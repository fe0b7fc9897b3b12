//! Wire error codes
//!
//! A handler that rejects a line answers with `e<code><line>`, where `<code>`
//! is one of these values as two hex digits.

/// Errors reported to the peer when a `d` or `?` line cannot be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// Generic failure
    Unspecified,
    /// Screen id is a digit but no such screen accepts setters
    UnknownScreen,
    /// Item id not known for the addressed screen
    UnknownItem,
    /// Payload has the wrong size for the item
    Length,
    /// Non-hex / non-decimal character in a numeric field
    Decode,
    /// Decoded value outside the field's range
    Value,
}

/// Code value meaning "no error"; never sent on the wire
pub const CODE_NONE: u8 = 0x00;

// Wire format values
const CODE_UNSPECIFIED: u8 = 0x01;
const CODE_UNKNOWN_SCREEN: u8 = 0x02;
const CODE_UNKNOWN_ITEM: u8 = 0x03;
const CODE_LENGTH: u8 = 0x04;
const CODE_DECODE: u8 = 0x05;
const CODE_VALUE: u8 = 0x06;

impl ErrorCode {
    /// Parse an error code from its wire value
    ///
    /// Returns `None` for [`CODE_NONE`] and unknown values.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            CODE_UNSPECIFIED => Some(ErrorCode::Unspecified),
            CODE_UNKNOWN_SCREEN => Some(ErrorCode::UnknownScreen),
            CODE_UNKNOWN_ITEM => Some(ErrorCode::UnknownItem),
            CODE_LENGTH => Some(ErrorCode::Length),
            CODE_DECODE => Some(ErrorCode::Decode),
            CODE_VALUE => Some(ErrorCode::Value),
            _ => None,
        }
    }

    /// Convert to wire value
    pub fn code(self) -> u8 {
        match self {
            ErrorCode::Unspecified => CODE_UNSPECIFIED,
            ErrorCode::UnknownScreen => CODE_UNKNOWN_SCREEN,
            ErrorCode::UnknownItem => CODE_UNKNOWN_ITEM,
            ErrorCode::Length => CODE_LENGTH,
            ErrorCode::Decode => CODE_DECODE,
            ErrorCode::Value => CODE_VALUE,
        }
    }
}

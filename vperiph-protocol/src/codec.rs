//! Fixed-width ASCII number encoding
//!
//! Hex fields are lowercase, most significant nibble first. Decoders take
//! the exact run of digits that makes up the field.

/// Errors from decoding a numeric field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Character outside the digit alphabet
    InvalidDigit,
    /// Digit run has the wrong width for the target type
    Width,
}

impl From<CodecError> for crate::ErrorCode {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::InvalidDigit => crate::ErrorCode::Decode,
            CodecError::Width => crate::ErrorCode::Length,
        }
    }
}

/// Most hex digits that fit a `u32`
const MAX_HEX_DIGITS: usize = 8;

/// Most decimal digits that always fit a `u32`
const MAX_DEC_DIGITS: usize = 9;

/// ASCII character for the low nibble of `nibble`
pub fn hex_digit(nibble: u8) -> u8 {
    let nibble = nibble & 0x0f;
    if nibble <= 9 {
        b'0' + nibble
    } else {
        b'a' + nibble - 10
    }
}

fn encode_into(value: u32, out: &mut [u8]) {
    let width = out.len();
    for (i, digit) in out.iter_mut().enumerate() {
        let shift = (width - 1 - i) * 4;
        *digit = hex_digit((value >> shift) as u8);
    }
}

/// Encode a byte as two hex characters
pub fn encode_u8(value: u8) -> [u8; 2] {
    let mut out = [0u8; 2];
    encode_into(value as u32, &mut out);
    out
}

/// Encode a 16-bit value as four hex characters
pub fn encode_u16(value: u16) -> [u8; 4] {
    let mut out = [0u8; 4];
    encode_into(value as u32, &mut out);
    out
}

/// Encode a 32-bit value as eight hex characters
pub fn encode_u32(value: u32) -> [u8; 8] {
    let mut out = [0u8; 8];
    encode_into(value, &mut out);
    out
}

fn hex_value(c: u8) -> Option<u32> {
    match c {
        b'0'..=b'9' => Some((c - b'0') as u32),
        b'a'..=b'f' => Some((c - b'a' + 10) as u32),
        _ => None,
    }
}

/// Decode a run of lowercase hex digits
///
/// An empty run decodes to zero.
pub fn decode_hex(digits: &[u8]) -> Result<u32, CodecError> {
    if digits.len() > MAX_HEX_DIGITS {
        return Err(CodecError::Width);
    }
    digits.iter().try_fold(0u32, |acc, &c| {
        hex_value(c)
            .map(|v| (acc << 4) | v)
            .ok_or(CodecError::InvalidDigit)
    })
}

/// Decode a run of decimal digits
pub fn decode_dec(digits: &[u8]) -> Result<u32, CodecError> {
    if digits.len() > MAX_DEC_DIGITS {
        return Err(CodecError::Width);
    }
    digits.iter().try_fold(0u32, |acc, &c| {
        if c.is_ascii_digit() {
            Ok(acc * 10 + (c - b'0') as u32)
        } else {
            Err(CodecError::InvalidDigit)
        }
    })
}

/// Decode exactly two hex digits
pub fn decode_u8(digits: &[u8]) -> Result<u8, CodecError> {
    if digits.len() != 2 {
        return Err(CodecError::Width);
    }
    decode_hex(digits).map(|v| v as u8)
}

/// Decode exactly four hex digits
pub fn decode_u16(digits: &[u8]) -> Result<u16, CodecError> {
    if digits.len() != 4 {
        return Err(CodecError::Width);
    }
    decode_hex(digits).map(|v| v as u16)
}

/// Decode exactly eight hex digits
pub fn decode_u32(digits: &[u8]) -> Result<u32, CodecError> {
    if digits.len() != 8 {
        return Err(CodecError::Width);
    }
    decode_hex(digits)
}

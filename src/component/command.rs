//! Decoding of incoming command payloads.

use heapless::Vec;

use crate::component::OnOff;
use crate::error::{DecodeError, Error};

/// Most fields any command payload carries (RGBW).
pub(crate) const MAX_FIELDS: usize = 4;

pub(crate) fn payload_str(payload: &[u8]) -> Result<&str, DecodeError> {
    core::str::from_utf8(payload).map_err(|_| DecodeError::InvalidUtf8)
}

pub(crate) fn on_off(payload: &[u8]) -> Result<OnOff, Error> {
    Ok(OnOff::parse(payload_str(payload)?)?)
}

/// A single decimal integer, surrounding whitespace ignored.
pub(crate) fn integer(payload: &[u8]) -> Result<i32, DecodeError> {
    parse_int(payload_str(payload)?)
}

/// Comma-separated decimal integers, e.g. `255, 128,0`.
pub(crate) fn integers(payload: &[u8]) -> Result<Vec<i32, MAX_FIELDS>, DecodeError> {
    let mut fields = Vec::new();
    for field in payload_str(payload)?.split(',') {
        fields
            .push(parse_int(field)?)
            .map_err(|_| DecodeError::TooManyFields)?;
    }
    Ok(fields)
}

fn parse_int(field: &str) -> Result<i32, DecodeError> {
    field.trim().parse().map_err(|_| DecodeError::InvalidInteger)
}

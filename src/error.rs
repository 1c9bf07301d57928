//! # Error Types
//!
//! Errors produced while validating, rendering or decoding component state.
//! Transport failures are not represented here: components report them
//! through the log and a `false` return, never as an `Err`.

use core::fmt;

/// The primary error enum of the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A candidate state violated the component's domain rule.
    /// The component state is left untouched.
    InvalidState(InvalidState),
    /// The state was read before it was ever set.
    StateNotSet,
    /// An incoming command payload could not be decoded.
    Decode(DecodeError),
    /// A topic, payload or registry did not fit into its fixed-size buffer.
    Capacity,
    /// The discovery payload could not be serialized.
    Serialize,
}

/// Reasons a candidate state can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidState {
    /// The value is not one of the two literals `ON` / `OFF`.
    NotOnOff,
    /// The brightness is outside `[min, max]`.
    BrightnessOutOfRange { value: i32, min: u8, max: u8 },
    /// The colour has the wrong number of channels.
    ColorChannelCount { expected: usize, actual: usize },
    /// A colour channel is outside `[0, 255]`.
    ColorChannelOutOfRange { index: usize, value: i32 },
    /// Text is shorter than the configured minimum (in characters).
    TextTooShort { len: usize, min: usize },
    /// Text is longer than the configured maximum (in characters).
    TextTooLong { len: usize, max: usize },
    /// A numeric sensor value is NaN or infinite.
    NotFinite,
}

/// Reasons an incoming command payload can fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// The payload is not valid UTF-8.
    InvalidUtf8,
    /// A numeric field is not a decimal integer.
    InvalidInteger,
    /// The payload has more fields than any supported colour model.
    TooManyFields,
}

impl From<InvalidState> for Error {
    fn from(err: InvalidState) -> Self {
        Error::InvalidState(err)
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::Decode(err)
    }
}

impl From<serde_json_core::ser::Error> for Error {
    fn from(err: serde_json_core::ser::Error) -> Self {
        match err {
            serde_json_core::ser::Error::BufferFull => Error::Capacity,
            _ => Error::Serialize,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidState(err) => write!(f, "invalid state: {err}"),
            Error::StateNotSet => f.write_str("state must be set before it is read"),
            Error::Decode(err) => write!(f, "invalid command payload: {err}"),
            Error::Capacity => f.write_str("buffer capacity exceeded"),
            Error::Serialize => f.write_str("discovery payload serialization failed"),
        }
    }
}

impl fmt::Display for InvalidState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidState::NotOnOff => f.write_str("expected ON or OFF"),
            InvalidState::BrightnessOutOfRange { value, min, max } => {
                write!(f, "brightness {value} not in [{min}, {max}]")
            }
            InvalidState::ColorChannelCount { expected, actual } => {
                write!(f, "expected {expected} colour channels, got {actual}")
            }
            InvalidState::ColorChannelOutOfRange { index, value } => {
                write!(f, "colour channel {index} = {value} not in [0, 255]")
            }
            InvalidState::TextTooShort { len, min } => {
                write!(f, "text length {len} is less than minimum {min}")
            }
            InvalidState::TextTooLong { len, max } => {
                write!(f, "text length {len} exceeds maximum {max}")
            }
            InvalidState::NotFinite => f.write_str("value is not a finite number"),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidUtf8 => f.write_str("payload is not valid UTF-8"),
            DecodeError::InvalidInteger => f.write_str("invalid integer literal"),
            DecodeError::TooManyFields => f.write_str("too many comma-separated fields"),
        }
    }
}

impl core::error::Error for Error {}
impl core::error::Error for InvalidState {}
impl core::error::Error for DecodeError {}

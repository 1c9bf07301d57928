//! Logging shims.
//!
//! The crate logs through whichever backend is enabled by features:
//! `log`, `defmt` or `esp32-log` (raw `esp-println`). Without any of them
//! the macros compile to nothing but still borrow their arguments so that
//! call sites do not produce unused-variable warnings.
//!
//! Only positional `{}` placeholders are used so that the same format
//! string is valid for both `log` and `defmt`.

#![allow(unused_macros)]

macro_rules! log_event {
    ($level:ident, $tag:literal, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "log")]
            ::log::$level!($s $(, $x)*);
            #[cfg(feature = "defmt")]
            ::defmt::$level!($s $(, $x)*);
            #[cfg(feature = "esp32-log")]
            ::esp_println::println!(concat!($tag, " - ", $s) $(, $x)*);
            #[cfg(not(any(feature = "log", feature = "defmt", feature = "esp32-log")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        log_event!(trace, "TRACE", $s $(, $x)*)
    };
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        log_event!(debug, "DEBUG", $s $(, $x)*)
    };
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        log_event!(info, "INFO", $s $(, $x)*)
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        log_event!(warn, "WARN", $s $(, $x)*)
    };
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {
        log_event!(error, "ERROR", $s $(, $x)*)
    };
}

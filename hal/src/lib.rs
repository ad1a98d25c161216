//! Hardware Abstraction Layer (HAL) for embedded systems
//!
//! This crate provides vendor-agnostic traits for the peripherals a board
//! support package touches when it wires SPI devices: GPIO pins and banks,
//! and SPI masters and devices.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod error;
pub mod gpio;
pub mod spi;

// Re-export commonly used types
pub use error::{HalError, HalResult};
pub use gpio::{GpioBank, Level, PinMode};

#[cfg(feature = "embedded-hal")]
pub mod eh;

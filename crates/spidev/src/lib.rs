//! # spidev
//!
//! Logical-device to chip-select dispatch for SPI buses on embedded boards.
//!
//! A generic SPI driver knows devices only by an opaque [`DeviceId`]. The
//! board knows which pin selects each device, which way round that pin is,
//! and whether the device has a command/data line or status inputs. This
//! crate joins the two.
//!
//! ## Module Overview
//! - [`id`]       – Logical device identifiers.
//! - [`status`]   – Bit-encoded device status.
//! - [`registry`] – Immutable id to wiring map, one per bus.
//! - [`dispatch`] – The [`ChipSelect`] capability and the registry-driven
//!   [`Dispatcher`].
//! - [`board`]    – Board configuration and pin bring-up.
//! - [`bus`]      – Binding an SPI master to a chip select.
//! - [`shared`]   – GPIO bank shared by several dispatchers.
//! - [`sim`]      – Simulated GPIO bank for host tests.
//!
//! ## Example
//! ```
//! use hal::gpio::Level;
//! use spidev::{BusOptions, ChipSelect, DeviceEntry, DeviceId, DeviceRegistry, Dispatcher};
//! use spidev::sim::SimBank;
//!
//! let registry = DeviceRegistry::builder()
//!     .device(DeviceId::flash(0), DeviceEntry::active_low(13))
//!     .unwrap()
//!     .build();
//! let mut cs = Dispatcher::new(&registry, BusOptions::default(), SimBank::<32>::new());
//!
//! cs.select(DeviceId::flash(0), true);
//! assert_eq!(cs.bank().level(13), Level::Low);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod board;
pub mod bus;
pub mod dispatch;
pub mod error;
pub mod id;
pub mod registry;
pub mod shared;
pub mod sim;
pub mod status;

pub use board::{BoardConfig, BoardConfigBuilder, BoardSetup, BusConfig, BusId, MAX_BUSES};
pub use bus::{BusDevice, SpiBus};
pub use dispatch::{BusOptions, ChipSelect, Dispatcher, NullChipSelect};
pub use error::{ConfigError, Error, Result};
pub use id::{DeviceId, DeviceType};
pub use registry::{
    CmdDataLine, DeviceEntry, DeviceRegistry, Polarity, RegistryBuilder, SelectLine, SenseLine,
    StatusSource, MAX_DEVICES,
};
pub use status::StatusFlags;

//! Error types for chip-select dispatch and board configuration.

use hal::HalError;
use thiserror::Error;

use crate::board::BusId;
use crate::id::DeviceId;

/// Mistakes caught while a board builds its configuration.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Same identifier registered twice on one bus
    #[error("device {0} registered twice")]
    DuplicateDevice(DeviceId),
    /// More devices than a registry holds
    #[error("registry full ({0} devices)")]
    RegistryFull(usize),
    /// Same bus enabled twice
    #[error("bus {0} configured twice")]
    DuplicateBus(BusId),
    /// More buses than a board holds
    #[error("too many buses ({0})")]
    TooManyBuses(usize),
}

/// Errors raised by this crate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No registry entry for the identifier. Returned by
    /// [`DeviceRegistry::get`](crate::registry::DeviceRegistry::get);
    /// `select` and `status` treat a miss as a no-op instead.
    #[error("device {0} not found")]
    NotFound(DeviceId),
    /// The device has no command/data line, or the bus does not multiplex
    /// command/data at all.
    #[error("device {0} has no cmd/data line")]
    Unsupported(DeviceId),
    /// Board configuration rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// GPIO bank failure
    #[error("hal error: {0}")]
    Hal(#[from] HalError),
}

/// Result type for dispatch and configuration
pub type Result<T> = core::result::Result<T, Error>;

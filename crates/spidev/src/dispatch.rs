//! Chip-select dispatcher.
//!
//! The generic bus driver calls into a [`ChipSelect`] at transaction
//! boundaries. [`Dispatcher`] is the registry-driven implementation: it
//! resolves the logical id and drives the wired pin, holding no state of
//! its own beyond the bank it writes to.

use hal::gpio::GpioBank;

use crate::error::{Error, Result};
use crate::id::DeviceId;
use crate::registry::DeviceRegistry;
use crate::status::StatusFlags;

/// Board half of an SPI bus: select, status, and cmd/data.
///
/// Every method has a default, so a bus whose board wires nothing can use
/// [`NullChipSelect`] and a board only overrides what it has.
///
/// Implementations must not block. They may run in interrupt context.
pub trait ChipSelect {
    /// Assert (`active == true`) or release the device's chip select.
    fn select(&mut self, id: DeviceId, active: bool) {
        let _ = (id, active);
    }

    /// Status bits for the device. Zero for anything without a source.
    fn status(&self, id: DeviceId) -> StatusFlags {
        let _ = id;
        StatusFlags::EMPTY
    }

    /// Mark the next bytes as command (`true`) or data (`false`).
    fn cmddata(&mut self, id: DeviceId, is_command: bool) -> Result<()> {
        let _ = is_command;
        Err(Error::Unsupported(id))
    }
}

impl<C: ChipSelect + ?Sized> ChipSelect for &mut C {
    fn select(&mut self, id: DeviceId, active: bool) {
        (**self).select(id, active)
    }

    fn status(&self, id: DeviceId) -> StatusFlags {
        (**self).status(id)
    }

    fn cmddata(&mut self, id: DeviceId, is_command: bool) -> Result<()> {
        (**self).cmddata(id, is_command)
    }
}

/// Chip select for a bus with no board wiring.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChipSelect;

impl ChipSelect for NullChipSelect {}

/// Per-bus switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusOptions {
    /// Sample status sense lines. When off, `status` is always zero.
    pub status_enabled: bool,
    /// Allow command/data multiplexing. When off, `cmddata` is always
    /// `Unsupported`.
    pub cmddata_enabled: bool,
}

impl Default for BusOptions {
    fn default() -> Self {
        Self {
            status_enabled: true,
            cmddata_enabled: false,
        }
    }
}

/// Registry-driven chip select for one bus.
pub struct Dispatcher<'r, B> {
    registry: &'r DeviceRegistry,
    options: BusOptions,
    bank: B,
}

impl<'r, B: GpioBank> Dispatcher<'r, B> {
    /// Bind `registry` and `options` to `bank`
    pub fn new(registry: &'r DeviceRegistry, options: BusOptions, bank: B) -> Self {
        Self {
            registry,
            options,
            bank,
        }
    }

    /// Registry this dispatcher resolves against
    pub fn registry(&self) -> &'r DeviceRegistry {
        self.registry
    }

    /// Switches of the bus
    pub fn options(&self) -> BusOptions {
        self.options
    }

    /// Bank carrying the lines
    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// Mutable access to the bank
    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    /// Unbind and return the bank
    pub fn into_bank(self) -> B {
        self.bank
    }
}

impl<B: GpioBank> ChipSelect for Dispatcher<'_, B> {
    fn select(&mut self, id: DeviceId, active: bool) {
        let Some(entry) = self.registry.resolve(id) else {
            log::debug!("select {}: not wired", id);
            return;
        };
        let line = entry.select;
        let level = line.polarity.level(active);
        log::trace!("select {} {} -> pin {} {:?}", id, active, line.pin, level);
        if let Err(err) = self.bank.write(line.pin, level) {
            log::warn!("select {}: pin {} write failed: {}", id, line.pin, err);
        }
    }

    fn status(&self, id: DeviceId) -> StatusFlags {
        if !self.options.status_enabled {
            return StatusFlags::EMPTY;
        }
        match self.registry.resolve(id) {
            Some(entry) => entry.status.sample(&self.bank),
            None => {
                log::debug!("status {}: not wired", id);
                StatusFlags::EMPTY
            }
        }
    }

    fn cmddata(&mut self, id: DeviceId, is_command: bool) -> Result<()> {
        if !self.options.cmddata_enabled {
            return Err(Error::Unsupported(id));
        }
        let Some(entry) = self.registry.resolve(id) else {
            log::debug!("cmddata {}: not wired", id);
            return Err(Error::Unsupported(id));
        };
        let line = entry.cmddata.ok_or(Error::Unsupported(id))?;
        let level = line.level(is_command);
        log::trace!("cmddata {} {} -> pin {} {:?}", id, is_command, line.pin, level);
        self.bank.write(line.pin, level)?;
        Ok(())
    }
}

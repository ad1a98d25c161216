//! Binding of an SPI master to the board's chip select.
//!
//! [`SpiBus`] is the generic half of a bus: it owns the master and calls
//! the board's [`ChipSelect`] at transaction boundaries. [`BusDevice`]
//! names one logical device on it and implements [`hal::spi::SpiDevice`].

use hal::spi::{SpiConfig, SpiDevice, SpiMaster};
use hal::HalResult;

use crate::dispatch::ChipSelect;
use crate::error::{Error, Result};
use crate::id::DeviceId;
use crate::status::StatusFlags;

/// SPI master plus the chip select of the board it sits on.
pub struct SpiBus<M, C> {
    master: M,
    chip_select: C,
}

impl<M: SpiMaster, C: ChipSelect> SpiBus<M, C> {
    /// Bind `master` to the board's chip select
    pub fn new(master: M, chip_select: C) -> Self {
        Self {
            master,
            chip_select,
        }
    }

    /// Handle for transactions with `id`.
    pub fn device(&mut self, id: DeviceId) -> BusDevice<'_, M, C> {
        BusDevice { bus: self, id }
    }

    /// Reconfigure the master
    pub fn configure(&mut self, config: &SpiConfig) -> HalResult<()> {
        self.master.configure(config)
    }

    /// Status bits of `id`
    pub fn status(&self, id: DeviceId) -> StatusFlags {
        self.chip_select.status(id)
    }

    /// Switch cmd/data framing. `Unsupported` means the device cannot
    /// frame commands; the caller decides whether that ends the transfer.
    pub fn cmddata(&mut self, id: DeviceId, is_command: bool) -> Result<()> {
        self.chip_select.cmddata(id, is_command)
    }

    /// Like [`SpiBus::cmddata`], for callers that treat framing as a hint.
    /// Returns whether the line was driven. Other errors still propagate.
    pub fn cmddata_optional(&mut self, id: DeviceId, is_command: bool) -> Result<bool> {
        match self.chip_select.cmddata(id, is_command) {
            Ok(()) => Ok(true),
            Err(Error::Unsupported(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// The board half
    pub fn chip_select(&self) -> &C {
        &self.chip_select
    }

    /// The SPI master
    pub fn master(&self) -> &M {
        &self.master
    }

    /// Unbind master and chip select
    pub fn release(self) -> (M, C) {
        (self.master, self.chip_select)
    }
}

/// One logical device on an [`SpiBus`].
pub struct BusDevice<'a, M, C> {
    bus: &'a mut SpiBus<M, C>,
    id: DeviceId,
}

impl<M: SpiMaster, C: ChipSelect> BusDevice<'_, M, C> {
    /// Logical device this handle addresses
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Status bits of this device
    pub fn status(&self) -> StatusFlags {
        self.bus.status(self.id)
    }

    /// Selected write of `data`.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.transaction(|master| master.write(data))?;
        Ok(())
    }

    /// Selected full-duplex transfer.
    pub fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        self.transaction(|master| master.transfer(tx, rx))?;
        Ok(())
    }

    /// Send `command` with cmd/data in command mode, then `data` in data
    /// mode, all under one chip-select assertion.
    pub fn write_command(&mut self, command: &[u8], data: &[u8]) -> Result<()> {
        let id = self.id;
        let bus = &mut *self.bus;
        bus.chip_select.select(id, true);
        let result = Self::framed(bus, id, command, data);
        bus.chip_select.select(id, false);
        result
    }

    fn framed(bus: &mut SpiBus<M, C>, id: DeviceId, command: &[u8], data: &[u8]) -> Result<()> {
        bus.chip_select.cmddata(id, true)?;
        bus.master.write(command)?;
        if !data.is_empty() {
            bus.chip_select.cmddata(id, false)?;
            bus.master.write(data)?;
        }
        Ok(())
    }
}

impl<M: SpiMaster, C: ChipSelect> SpiDevice for BusDevice<'_, M, C> {
    fn transaction<F, R>(&mut self, f: F) -> HalResult<R>
    where
        F: FnOnce(&mut dyn SpiMaster) -> HalResult<R>,
    {
        self.bus.chip_select.select(self.id, true);
        let result = f(&mut self.bus.master);
        self.bus.chip_select.select(self.id, false);
        result
    }
}

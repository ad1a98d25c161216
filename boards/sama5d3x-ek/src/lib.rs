//! SAMA5D3x-EK SPI chip-select wiring.
//!
//! SPI0 carries the on-board AT25 serial flash, selected by NPCS0 (PD13)
//! driven as a plain PIO output. SPI1 is brought out to the expansion
//! header with nothing wired, so its selects are no-ops.

#![no_std]

use hal::gpio::{pio_pin, GpioBank};
use spidev::{
    BoardConfig, BoardSetup, BusConfig, BusId, BusOptions, ChipSelect, DeviceEntry, DeviceId,
    DeviceRegistry, Dispatcher, NullChipSelect, Result,
};

pub const PIO_PORT_D: u32 = 3;

/// AT25 serial flash chip select (NPCS0 on PD13), active low.
pub const PIO_AT25_NPCS0: u32 = pio_pin(PIO_PORT_D, 13);

pub const SPI0: BusId = BusId(0);
pub const SPI1: BusId = BusId(1);

/// Which parts of the board's SPI wiring are in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardOptions {
    pub spi0: bool,
    pub spi1: bool,
    /// AT25 MTD driver present.
    pub at25: bool,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            spi0: true,
            spi1: true,
            at25: true,
        }
    }
}

/// The board, with its SPI configuration built from [`BoardOptions`].
#[derive(Debug, Clone)]
pub struct Sama5d3xEk {
    config: BoardConfig,
}

impl Sama5d3xEk {
    pub fn new(options: BoardOptions) -> Result<Self> {
        let mut board = BoardConfig::builder("sama5d3x-ek");

        if options.spi0 {
            let mut devices = DeviceRegistry::builder();
            if options.at25 {
                devices =
                    devices.device(DeviceId::flash(0), DeviceEntry::active_low(PIO_AT25_NPCS0))?;
            }
            board = board.bus(BusConfig::new(SPI0, BusOptions::default(), devices.build()))?;
        }
        if options.spi1 {
            let registry = DeviceRegistry::empty();
            board = board.bus(BusConfig::new(SPI1, BusOptions::default(), registry))?;
        }

        let config = board.build();
        log::debug!("{}: {} spi buses", config.name(), config.buses().count());
        Ok(Self { config })
    }

    /// Chip select for an enabled bus, bound to `bank`.
    pub fn chip_select<B: GpioBank>(&self, bus: BusId, bank: B) -> Option<Dispatcher<'_, B>> {
        self.config.bus(bus).map(|bus| bus.dispatcher(bank))
    }

    /// Chip select for SPI1, or the no-op default when SPI1 is disabled.
    pub fn spi1_chip_select<B: GpioBank>(&self, bank: B) -> BoardChipSelect<'_, B> {
        match self.chip_select(SPI1, bank) {
            Some(dispatcher) => BoardChipSelect::Wired(dispatcher),
            None => BoardChipSelect::Unwired(NullChipSelect),
        }
    }
}

impl BoardSetup for Sama5d3xEk {
    fn config(&self) -> &BoardConfig {
        &self.config
    }
}

/// Either a wired dispatcher or the generic no-op.
pub enum BoardChipSelect<'a, B> {
    Wired(Dispatcher<'a, B>),
    Unwired(NullChipSelect),
}

impl<B: GpioBank> ChipSelect for BoardChipSelect<'_, B> {
    fn select(&mut self, id: DeviceId, active: bool) {
        match self {
            Self::Wired(cs) => cs.select(id, active),
            Self::Unwired(cs) => cs.select(id, active),
        }
    }

    fn status(&self, id: DeviceId) -> spidev::StatusFlags {
        match self {
            Self::Wired(cs) => cs.status(id),
            Self::Unwired(cs) => cs.status(id),
        }
    }

    fn cmddata(&mut self, id: DeviceId, is_command: bool) -> Result<()> {
        match self {
            Self::Wired(cs) => cs.cmddata(id, is_command),
            Self::Unwired(cs) => cs.cmddata(id, is_command),
        }
    }
}

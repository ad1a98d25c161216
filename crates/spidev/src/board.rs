//! Board configuration and bring-up.
//!
//! A board describes each SPI bus it enables: the bus options and the
//! registry of devices wired on it. [`BoardConfig::initialize`] puts every
//! wired line into a safe state before any bus driver runs.

use core::fmt;

use hal::gpio::{GpioBank, PinMode};
use heapless::Vec;

use crate::dispatch::{BusOptions, Dispatcher};
use crate::error::{ConfigError, Result};
use crate::registry::DeviceRegistry;

/// Maximum number of SPI buses a board can enable.
pub const MAX_BUSES: usize = 4;

/// SPI controller instance number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusId(pub u8);

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spi{}", self.0)
    }
}

/// One enabled bus.
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Controller instance
    pub id: BusId,
    /// Status and cmd/data switches
    pub options: BusOptions,
    /// Devices wired on this bus
    pub registry: DeviceRegistry,
}

impl BusConfig {
    /// Describe an enabled bus
    pub fn new(id: BusId, options: BusOptions, registry: DeviceRegistry) -> Self {
        Self {
            id,
            options,
            registry,
        }
    }

    /// Bind this bus to the bank that carries its lines.
    pub fn dispatcher<B: GpioBank>(&self, bank: B) -> Dispatcher<'_, B> {
        Dispatcher::new(&self.registry, self.options, bank)
    }

    /// Configure this bus's lines. Returns the number of pins touched.
    pub fn initialize<B: GpioBank + ?Sized>(&self, bank: &mut B) -> Result<usize> {
        let mut pins = 0;
        for (id, entry) in self.registry.iter() {
            log::debug!("{}: {} on pin {}", self.id, id, entry.select.pin);
            bank.configure_output(entry.select.pin, entry.select.polarity.deasserted())?;
            pins += 1;

            if let Some(line) = entry.cmddata {
                bank.configure_output(line.pin, line.level(false))?;
                pins += 1;
            }
            for sense in [entry.status.present, entry.status.write_protect]
                .into_iter()
                .flatten()
            {
                bank.set_mode(sense.pin, PinMode::Input)?;
                pins += 1;
            }
        }
        Ok(pins)
    }
}

/// Everything a board enables, built once at startup.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    name: &'static str,
    buses: Vec<BusConfig, MAX_BUSES>,
}

impl BoardConfig {
    /// Start a board configuration
    pub fn builder(name: &'static str) -> BoardConfigBuilder {
        BoardConfigBuilder {
            name,
            buses: Vec::new(),
        }
    }

    /// Board name, used in log output
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Configuration of an enabled bus.
    pub fn bus(&self, id: BusId) -> Option<&BusConfig> {
        self.buses.iter().find(|bus| bus.id == id)
    }

    /// Enabled buses in configuration order
    pub fn buses(&self) -> impl Iterator<Item = &BusConfig> + '_ {
        self.buses.iter()
    }

    /// Put every select line in its deasserted state, every cmd/data line
    /// in data mode, and every status line in input mode.
    ///
    /// Touches nothing when no bus has wired devices.
    pub fn initialize<B: GpioBank + ?Sized>(&self, bank: &mut B) -> Result<()> {
        let mut pins = 0;
        for bus in &self.buses {
            pins += bus.initialize(bank)?;
        }
        log::debug!("{}: configured {} spi pins", self.name, pins);
        Ok(())
    }
}

/// Builder for [`BoardConfig`].
#[derive(Debug, Clone)]
pub struct BoardConfigBuilder {
    name: &'static str,
    buses: Vec<BusConfig, MAX_BUSES>,
}

impl BoardConfigBuilder {
    /// Enable a bus.
    pub fn bus(mut self, bus: BusConfig) -> core::result::Result<Self, ConfigError> {
        if self.buses.iter().any(|existing| existing.id == bus.id) {
            log::warn!("{}: bus {} configured twice", self.name, bus.id);
            return Err(ConfigError::DuplicateBus(bus.id));
        }
        self.buses
            .push(bus)
            .map_err(|_| ConfigError::TooManyBuses(MAX_BUSES))?;
        Ok(self)
    }

    /// Freeze the configuration
    pub fn build(self) -> BoardConfig {
        BoardConfig {
            name: self.name,
            buses: self.buses,
        }
    }
}

/// Board bring-up hook for the SPI chip selects.
///
/// The default configures the lines described by [`BoardSetup::config`].
/// Boards with extra needs, such as routing a select through a pin mux,
/// override `initialize`.
pub trait BoardSetup {
    fn config(&self) -> &BoardConfig;

    fn initialize<B: GpioBank + ?Sized>(&self, bank: &mut B) -> Result<()> {
        self.config().initialize(bank)
    }
}

impl BoardSetup for BoardConfig {
    fn config(&self) -> &BoardConfig {
        self
    }
}

//! Device registry: logical device id to physical lines.
//!
//! A board builds one registry per bus while it is being configured. Once
//! built, a registry only answers lookups.

use hal::gpio::{GpioBank, Level};
use heapless::Vec;

use crate::error::{ConfigError, Error};
use crate::id::DeviceId;
use crate::status::StatusFlags;

/// Maximum number of devices wired on one bus.
pub const MAX_DEVICES: usize = 16;

/// Which level means "selected" on a chip-select line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Selected when driven low
    ActiveLow,
    /// Selected when driven high
    ActiveHigh,
}

impl Polarity {
    /// Level that corresponds to the requested select state.
    pub const fn level(self, active: bool) -> Level {
        match (self, active) {
            (Self::ActiveLow, true) | (Self::ActiveHigh, false) => Level::Low,
            (Self::ActiveLow, false) | (Self::ActiveHigh, true) => Level::High,
        }
    }

    /// Level of a selected line
    pub const fn asserted(self) -> Level {
        self.level(true)
    }

    /// Level of an idle line
    pub const fn deasserted(self) -> Level {
        self.level(false)
    }
}

/// Chip-select output of one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SelectLine {
    /// Pin number in the board's GPIO bank
    pub pin: u32,
    /// Level convention for "selected"
    pub polarity: Polarity,
}

/// Command/data output of a multiplexed device (typically a display).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CmdDataLine {
    /// Pin number in the board's GPIO bank
    pub pin: u32,
    /// Level that marks the next bytes as a command.
    pub command_level: Level,
}

impl CmdDataLine {
    /// Level for command (`true`) or data (`false`) bytes
    pub const fn level(&self, is_command: bool) -> Level {
        match (self.command_level, is_command) {
            (Level::Low, true) | (Level::High, false) => Level::Low,
            (Level::Low, false) | (Level::High, true) => Level::High,
        }
    }
}

/// Input that reports one status condition, such as a card-detect switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SenseLine {
    /// Pin number in the board's GPIO bank
    pub pin: u32,
    /// Level at which the condition holds
    pub active: Level,
}

impl SenseLine {
    fn is_active<B: GpioBank>(&self, bank: &B) -> bool {
        match bank.read(self.pin) {
            Ok(level) => level == self.active,
            Err(err) => {
                log::warn!("status pin {} unreadable: {}", self.pin, err);
                false
            }
        }
    }
}

/// Where a device's status bits come from. The default reports nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSource {
    /// Card-detect style presence input
    pub present: Option<SenseLine>,
    /// Write-protect switch input
    pub write_protect: Option<SenseLine>,
}

impl StatusSource {
    pub const NONE: Self = Self {
        present: None,
        write_protect: None,
    };

    /// True when the device reports no status
    pub const fn is_none(&self) -> bool {
        self.present.is_none() && self.write_protect.is_none()
    }

    /// Sample the sense lines. Pure read.
    pub fn sample<B: GpioBank>(&self, bank: &B) -> StatusFlags {
        let mut flags = StatusFlags::EMPTY;
        if matches!(self.present, Some(line) if line.is_active(bank)) {
            flags |= StatusFlags::PRESENT;
        }
        if matches!(self.write_protect, Some(line) if line.is_active(bank)) {
            flags |= StatusFlags::WRITE_PROTECTED;
        }
        flags
    }
}

/// Physical wiring of one logical device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceEntry {
    /// Chip-select output
    pub select: SelectLine,
    /// Command/data output, if multiplexed
    pub cmddata: Option<CmdDataLine>,
    /// Status inputs
    pub status: StatusSource,
}

impl DeviceEntry {
    /// Chip select on `pin` with the given polarity
    pub const fn new(pin: u32, polarity: Polarity) -> Self {
        Self {
            select: SelectLine { pin, polarity },
            cmddata: None,
            status: StatusSource::NONE,
        }
    }

    /// Active-low chip select, the common wiring.
    pub const fn active_low(pin: u32) -> Self {
        Self::new(pin, Polarity::ActiveLow)
    }

    /// Active-high chip select
    pub const fn active_high(pin: u32) -> Self {
        Self::new(pin, Polarity::ActiveHigh)
    }

    /// Add a command/data line; low selects command mode.
    pub const fn with_cmddata(mut self, pin: u32) -> Self {
        self.cmddata = Some(CmdDataLine {
            pin,
            command_level: Level::Low,
        });
        self
    }

    /// Add a command/data line with explicit command level
    pub const fn with_cmddata_line(mut self, line: CmdDataLine) -> Self {
        self.cmddata = Some(line);
        self
    }

    /// Add a presence input, active at `active`
    pub const fn with_presence(mut self, pin: u32, active: Level) -> Self {
        self.status.present = Some(SenseLine { pin, active });
        self
    }

    /// Add a write-protect input, active at `active`
    pub const fn with_write_protect(mut self, pin: u32, active: Level) -> Self {
        self.status.write_protect = Some(SenseLine { pin, active });
        self
    }
}

/// Immutable id to wiring map for one bus.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    entries: Vec<(DeviceId, DeviceEntry), MAX_DEVICES>,
}

impl DeviceRegistry {
    /// A registry with no devices. Every lookup misses.
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Start a registry for one bus
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Look up the wiring for `id`. A miss is not an error; boards wire
    /// only the devices they carry.
    pub fn resolve(&self, id: DeviceId) -> Option<&DeviceEntry> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, entry)| entry)
    }

    /// Like [`DeviceRegistry::resolve`], for callers that require the
    /// device to be wired.
    pub fn get(&self, id: DeviceId) -> Result<&DeviceEntry, Error> {
        self.resolve(id).ok_or(Error::NotFound(id))
    }

    /// True when `id` is wired
    pub fn contains(&self, id: DeviceId) -> bool {
        self.resolve(id).is_some()
    }

    /// Wired devices in registration order
    pub fn iter(&self) -> impl Iterator<Item = (DeviceId, &DeviceEntry)> + '_ {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Number of wired devices
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is wired
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder used while the board is being configured.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    entries: Vec<(DeviceId, DeviceEntry), MAX_DEVICES>,
}

impl RegistryBuilder {
    /// Wire `id` to `entry`.
    pub fn device(mut self, id: DeviceId, entry: DeviceEntry) -> Result<Self, ConfigError> {
        if self.entries.iter().any(|(existing, _)| *existing == id) {
            log::warn!("device {} registered twice", id);
            return Err(ConfigError::DuplicateDevice(id));
        }
        self.entries
            .push((id, entry))
            .map_err(|_| ConfigError::RegistryFull(MAX_DEVICES))?;
        Ok(self)
    }

    /// Freeze the registry
    pub fn build(self) -> DeviceRegistry {
        DeviceRegistry {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBank;

    #[test]
    fn polarity_levels() {
        assert_eq!(Polarity::ActiveLow.asserted(), Level::Low);
        assert_eq!(Polarity::ActiveLow.deasserted(), Level::High);
        assert_eq!(Polarity::ActiveHigh.asserted(), Level::High);
        assert_eq!(Polarity::ActiveHigh.deasserted(), Level::Low);
    }

    #[test]
    fn cmddata_levels() {
        let low_cmd = CmdDataLine {
            pin: 0,
            command_level: Level::Low,
        };
        assert_eq!(low_cmd.level(true), Level::Low);
        assert_eq!(low_cmd.level(false), Level::High);

        let high_cmd = CmdDataLine {
            pin: 0,
            command_level: Level::High,
        };
        assert_eq!(high_cmd.level(true), Level::High);
        assert_eq!(high_cmd.level(false), Level::Low);
    }

    #[test]
    fn resolve_hits_and_misses() {
        let registry = DeviceRegistry::builder()
            .device(DeviceId::flash(0), DeviceEntry::active_low(10))
            .unwrap()
            .device(DeviceId::display(0), DeviceEntry::active_high(11).with_cmddata(12))
            .unwrap()
            .build();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve(DeviceId::flash(0)).unwrap().select.pin, 10);
        assert_eq!(
            registry.resolve(DeviceId::display(0)).unwrap().cmddata.unwrap().pin,
            12
        );
        assert!(registry.resolve(DeviceId::flash(1)).is_none());
        assert!(registry.resolve(DeviceId::from_raw(99)).is_none());
    }

    #[test]
    fn get_reports_unwired_devices() {
        let registry = DeviceRegistry::builder()
            .device(DeviceId::flash(0), DeviceEntry::active_low(10))
            .unwrap()
            .build();

        assert_eq!(registry.get(DeviceId::flash(0)).map(|e| e.select.pin), Ok(10));
        assert_eq!(
            registry.get(DeviceId::eeprom(0)).err(),
            Some(Error::NotFound(DeviceId::eeprom(0)))
        );
        assert!(DeviceRegistry::empty().get(DeviceId::flash(0)).is_err());
    }

    #[test]
    fn duplicate_id_rejected() {
        let result = DeviceRegistry::builder()
            .device(DeviceId::flash(0), DeviceEntry::active_low(10))
            .unwrap()
            .device(DeviceId::flash(0), DeviceEntry::active_low(11));
        assert_eq!(result.err(), Some(ConfigError::DuplicateDevice(DeviceId::flash(0))));
    }

    #[test]
    fn capacity_enforced() {
        let mut builder = DeviceRegistry::builder();
        for i in 0..MAX_DEVICES as u16 {
            builder = builder
                .device(DeviceId::user(i), DeviceEntry::active_low(i as u32))
                .unwrap();
        }
        let result = builder.device(DeviceId::user(100), DeviceEntry::active_low(100));
        assert_eq!(result.err(), Some(ConfigError::RegistryFull(MAX_DEVICES)));
    }

    #[test]
    fn status_source_samples_sense_lines() {
        let mut bank = SimBank::<8>::new();
        let source = DeviceEntry::active_low(0)
            .with_presence(1, Level::Low)
            .with_write_protect(2, Level::High)
            .status;

        bank.drive_input(1, Level::High);
        bank.drive_input(2, Level::Low);
        assert_eq!(source.sample(&bank), StatusFlags::EMPTY);

        bank.drive_input(1, Level::Low);
        assert_eq!(source.sample(&bank), StatusFlags::PRESENT);

        bank.drive_input(2, Level::High);
        assert_eq!(
            source.sample(&bank),
            StatusFlags::PRESENT | StatusFlags::WRITE_PROTECTED
        );
    }

    #[test]
    fn no_status_source_reads_nothing() {
        let bank = SimBank::<4>::new();
        assert!(StatusSource::NONE.is_none());
        assert_eq!(StatusSource::NONE.sample(&bank), StatusFlags::EMPTY);
        assert_eq!(bank.reads(), 0);
    }
}

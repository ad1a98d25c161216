//! Simulated GPIO bank for host-side testing.

use core::cell::Cell;

use hal::gpio::{GpioBank, Level, PinMode};
use hal::{HalError, HalResult};

/// Number of lines on a five-port PIO controller.
pub const PIO_LINES: usize = 160;

#[derive(Debug, Clone, Copy)]
struct SimPin {
    level: Level,
    mode: Option<PinMode>,
    writes: u32,
}

impl SimPin {
    const RESET: Self = Self {
        level: Level::Low,
        mode: None,
        writes: 0,
    };
}

/// `N` pins held in memory. Pins start unconfigured and low.
///
/// Writes are recorded per pin so tests can tell "left alone" apart from
/// "rewritten with the same level".
#[derive(Debug)]
pub struct SimBank<const N: usize> {
    pins: [SimPin; N],
    reads: Cell<u32>,
}

impl<const N: usize> SimBank<N> {
    pub const fn new() -> Self {
        Self {
            pins: [SimPin::RESET; N],
            reads: Cell::new(0),
        }
    }

    /// Current level of a pin. Panics on an out-of-range pin.
    pub fn level(&self, pin: u32) -> Level {
        self.pins[pin as usize].level
    }

    pub fn mode(&self, pin: u32) -> Option<PinMode> {
        self.pins[pin as usize].mode
    }

    /// Number of writes made to `pin`.
    pub fn writes(&self, pin: u32) -> u32 {
        self.pins[pin as usize].writes
    }

    pub fn total_writes(&self) -> u32 {
        self.pins.iter().map(|p| p.writes).sum()
    }

    pub fn reads(&self) -> u32 {
        self.reads.get()
    }

    /// Set the level seen on an input, as external hardware would.
    /// Not counted as a write.
    pub fn drive_input(&mut self, pin: u32, level: Level) {
        self.pins[pin as usize].level = level;
    }

    fn pin_mut(&mut self, pin: u32) -> HalResult<&mut SimPin> {
        self.pins
            .get_mut(pin as usize)
            .ok_or(HalError::InvalidPin(pin))
    }
}

impl<const N: usize> Default for SimBank<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> GpioBank for SimBank<N> {
    fn set_mode(&mut self, pin: u32, mode: PinMode) -> HalResult<()> {
        self.pin_mut(pin)?.mode = Some(mode);
        Ok(())
    }

    fn write(&mut self, pin: u32, level: Level) -> HalResult<()> {
        let pin = self.pin_mut(pin)?;
        pin.level = level;
        pin.writes += 1;
        Ok(())
    }

    fn read(&self, pin: u32) -> HalResult<Level> {
        self.reads.set(self.reads.get() + 1);
        self.pins
            .get(pin as usize)
            .map(|p| p.level)
            .ok_or(HalError::InvalidPin(pin))
    }
}

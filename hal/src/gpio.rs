//! GPIO (General Purpose Input/Output) abstraction

use core::ops::Not;

use crate::error::HalResult;

/// GPIO pin modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Input (floating)
    Input,
    /// Input with pull-up resistor
    InputPullUp,
    /// Input with pull-down resistor
    InputPullDown,
    /// Output (push-pull)
    Output,
    /// Output (open-drain)
    OutputOpenDrain,
    /// Alternate function (vendor-specific)
    Alternate(u8),
}

impl PinMode {
    /// Returns true for the modes that drive the pin.
    pub fn is_output(self) -> bool {
        matches!(self, Self::Output | Self::OutputOpenDrain)
    }
}

/// GPIO pin levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Low level (0V)
    Low,
    /// High level (VCC)
    High,
}

impl Level {
    pub fn is_high(self) -> bool {
        self == Self::High
    }

    pub fn is_low(self) -> bool {
        self == Self::Low
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

/// GPIO bank: a set of pins addressed by number, as a PIO controller or a
/// GPIO port register block exposes them.
///
/// `write` must take effect before it returns. On memory-mapped controllers
/// that is a single set/clear register store.
pub trait GpioBank {
    /// Configure the mode of one pin
    fn set_mode(&mut self, pin: u32, mode: PinMode) -> HalResult<()>;

    /// Drive an output pin
    fn write(&mut self, pin: u32, level: Level) -> HalResult<()>;

    /// Sample a pin
    fn read(&self, pin: u32) -> HalResult<Level>;

    /// Configure an output and drive its initial level
    fn configure_output(&mut self, pin: u32, initial: Level) -> HalResult<()> {
        self.write(pin, initial)?;
        self.set_mode(pin, PinMode::Output)
    }
}

impl<B: GpioBank + ?Sized> GpioBank for &mut B {
    fn set_mode(&mut self, pin: u32, mode: PinMode) -> HalResult<()> {
        (**self).set_mode(pin, mode)
    }

    fn write(&mut self, pin: u32, level: Level) -> HalResult<()> {
        (**self).write(pin, level)
    }

    fn read(&self, pin: u32) -> HalResult<Level> {
        (**self).read(pin)
    }
}

/// Address a pin of a PIO-style controller with 32 lines per port.
///
/// `pio_pin(3, 13)` is PD13.
pub const fn pio_pin(port: u32, bit: u32) -> u32 {
    port * 32 + (bit & 31)
}

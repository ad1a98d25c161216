//! Adapter from `embedded-hal` 1.0 digital pins to [`GpioBank`].
//!
//! Vendor HALs hand out type-erased output pins; a board groups its chip
//! select and cmd/data pins into one bank and keys them by the same pin
//! numbers its configuration uses.

use core::cell::RefCell;

use embedded_hal::digital::{OutputPin, StatefulOutputPin};

use crate::error::{HalError, HalResult};
use crate::gpio::{GpioBank, Level, PinMode};

/// Fixed set of output pins keyed by pin number.
pub struct EhOutputBank<P, const N: usize> {
    pins: [(u32, RefCell<P>); N],
}

impl<P, const N: usize> EhOutputBank<P, N>
where
    P: OutputPin + StatefulOutputPin,
{
    pub fn new(pins: [(u32, P); N]) -> Self {
        Self {
            pins: pins.map(|(number, pin)| (number, RefCell::new(pin))),
        }
    }

    /// Give the pins back.
    pub fn release(self) -> [(u32, P); N] {
        self.pins.map(|(number, pin)| (number, pin.into_inner()))
    }

    fn pin(&self, number: u32) -> HalResult<&RefCell<P>> {
        self.pins
            .iter()
            .find(|(n, _)| *n == number)
            .map(|(_, pin)| pin)
            .ok_or(HalError::InvalidPin(number))
    }
}

impl<P, const N: usize> GpioBank for EhOutputBank<P, N>
where
    P: OutputPin + StatefulOutputPin,
{
    fn set_mode(&mut self, pin: u32, mode: PinMode) -> HalResult<()> {
        self.pin(pin)?;
        // Pins arrive already configured as push-pull outputs.
        match mode {
            PinMode::Output => Ok(()),
            _ => Err(HalError::NotSupported),
        }
    }

    fn write(&mut self, pin: u32, level: Level) -> HalResult<()> {
        let mut pin = self.pin(pin)?.borrow_mut();
        let result = match level {
            Level::High => pin.set_high(),
            Level::Low => pin.set_low(),
        };
        result.map_err(|_| HalError::HardwareError)
    }

    fn read(&self, pin: u32) -> HalResult<Level> {
        let mut pin = self.pin(pin)?.borrow_mut();
        pin.is_set_high()
            .map(Level::from)
            .map_err(|_| HalError::HardwareError)
    }
}

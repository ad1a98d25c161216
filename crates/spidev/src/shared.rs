//! GPIO bank shared between buses.
//!
//! On many parts the chip selects of both SPI controllers live on the same
//! PIO controller. Each dispatcher gets a [`SharedBank`] handle; every
//! access is one short critical section around a single register
//! operation.

use core::cell::RefCell;

use critical_section::Mutex;
use hal::gpio::{GpioBank, Level, PinMode};
use hal::HalResult;

/// Handle to a bank behind a critical-section mutex.
pub struct SharedBank<'a, B> {
    inner: &'a Mutex<RefCell<B>>,
}

impl<'a, B> SharedBank<'a, B> {
    pub fn new(inner: &'a Mutex<RefCell<B>>) -> Self {
        Self { inner }
    }
}

impl<B> Clone for SharedBank<'_, B> {
    fn clone(&self) -> Self {
        Self { inner: self.inner }
    }
}

impl<B: GpioBank> GpioBank for SharedBank<'_, B> {
    fn set_mode(&mut self, pin: u32, mode: PinMode) -> HalResult<()> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).set_mode(pin, mode))
    }

    fn write(&mut self, pin: u32, level: Level) -> HalResult<()> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).write(pin, level))
    }

    fn read(&self, pin: u32) -> HalResult<Level> {
        critical_section::with(|cs| self.inner.borrow_ref(cs).read(pin))
    }
}

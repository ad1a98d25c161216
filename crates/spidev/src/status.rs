//! Bit-encoded device status.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign};

/// Instantaneous condition of a device, as reported by its board wiring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusFlags(u8);

impl StatusFlags {
    /// No detectable status. Most devices always report this.
    pub const EMPTY: Self = Self(0);
    /// Card or device presence detected.
    pub const PRESENT: Self = Self(0x01);
    /// Media is write protected.
    pub const WRITE_PROTECTED: Self = Self(0x02);

    /// Wrap raw status bits, e.g. from a device's own status register.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw status bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True when no condition is reported.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for StatusFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for StatusFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for StatusFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for StatusFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

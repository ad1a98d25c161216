//! Logical SPI device identifiers.
//!
//! An identifier packs a device class in the upper 16 bits and an instance
//! index in the lower 16 bits. Identifiers are assigned when the board is
//! configured and never change afterwards.

use core::fmt;

/// Class of device sitting behind a chip select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum DeviceType {
    User = 0,
    MmcSd,
    Flash,
    Ethernet,
    Display,
    Camera,
    Wireless,
    Touchscreen,
    Expander,
    Mux,
    AudioData,
    AudioCtrl,
    Eeprom,
    Accelerometer,
    Barometer,
    Temperature,
    Ieee802154,
    Contactless,
    CanBus,
    UsbHost,
    Lpwan,
    Adc,
    Motor,
    Imu,
    Mag,
    Light,
    Gnss,
}

impl DeviceType {
    const ALL: [DeviceType; 27] = [
        Self::User,
        Self::MmcSd,
        Self::Flash,
        Self::Ethernet,
        Self::Display,
        Self::Camera,
        Self::Wireless,
        Self::Touchscreen,
        Self::Expander,
        Self::Mux,
        Self::AudioData,
        Self::AudioCtrl,
        Self::Eeprom,
        Self::Accelerometer,
        Self::Barometer,
        Self::Temperature,
        Self::Ieee802154,
        Self::Contactless,
        Self::CanBus,
        Self::UsbHost,
        Self::Lpwan,
        Self::Adc,
        Self::Motor,
        Self::Imu,
        Self::Mag,
        Self::Light,
        Self::Gnss,
    ];

    /// Decode the class half of a raw identifier.
    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    fn name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::MmcSd => "mmcsd",
            Self::Flash => "flash",
            Self::Ethernet => "ethernet",
            Self::Display => "display",
            Self::Camera => "camera",
            Self::Wireless => "wireless",
            Self::Touchscreen => "touchscreen",
            Self::Expander => "expander",
            Self::Mux => "mux",
            Self::AudioData => "audio-data",
            Self::AudioCtrl => "audio-ctrl",
            Self::Eeprom => "eeprom",
            Self::Accelerometer => "accelerometer",
            Self::Barometer => "barometer",
            Self::Temperature => "temperature",
            Self::Ieee802154 => "ieee802154",
            Self::Contactless => "contactless",
            Self::CanBus => "canbus",
            Self::UsbHost => "usbhost",
            Self::Lpwan => "lpwan",
            Self::Adc => "adc",
            Self::Motor => "motor",
            Self::Imu => "imu",
            Self::Mag => "mag",
            Self::Light => "light",
            Self::Gnss => "gnss",
        }
    }
}

/// Opaque logical device identifier, unique per bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId(u32);

impl DeviceId {
    /// Build an identifier from a class and an instance index.
    pub const fn new(device_type: DeviceType, index: u16) -> Self {
        Self(((device_type as u32) << 16) | index as u32)
    }

    /// Wrap an arbitrary value. Values that decode to no known class are
    /// valid identifiers; they simply never match a registry entry unless a
    /// board registers them.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw 32-bit value
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Device class, if the upper half names a known one
    pub fn device_type(self) -> Option<DeviceType> {
        DeviceType::from_raw((self.0 >> 16) as u16)
    }

    /// Instance index within the class
    pub const fn index(self) -> u16 {
        (self.0 & 0xffff) as u16
    }

    /// `SPIDEV_USER(n)`
    pub const fn user(index: u16) -> Self {
        Self::new(DeviceType::User, index)
    }

    /// MMC/SD card slot
    pub const fn mmcsd(index: u16) -> Self {
        Self::new(DeviceType::MmcSd, index)
    }

    /// Serial flash, `SPIDEV_FLASH(n)`
    pub const fn flash(index: u16) -> Self {
        Self::new(DeviceType::Flash, index)
    }

    /// Ethernet controller
    pub const fn ethernet(index: u16) -> Self {
        Self::new(DeviceType::Ethernet, index)
    }

    /// Display controller
    pub const fn display(index: u16) -> Self {
        Self::new(DeviceType::Display, index)
    }

    /// Touchscreen controller
    pub const fn touchscreen(index: u16) -> Self {
        Self::new(DeviceType::Touchscreen, index)
    }

    /// Serial EEPROM
    pub const fn eeprom(index: u16) -> Self {
        Self::new(DeviceType::Eeprom, index)
    }

    /// Wireless transceiver
    pub const fn wireless(index: u16) -> Self {
        Self::new(DeviceType::Wireless, index)
    }
}

impl From<u32> for DeviceId {
    fn from(raw: u32) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.device_type() {
            Some(ty) => write!(f, "{}({})", ty.name(), self.index()),
            None => write!(f, "{:#010x}", self.0),
        }
    }
}

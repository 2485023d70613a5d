#![allow(missing_docs)]
use bilge::prelude::*;

/// Register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Temperature result register address.
    Temperature,

    /// Configuration register address.
    Configuration,

    /// Temperature high limit register address.
    HighLimit,

    /// Temperature low limit register address.
    LowLimit,

    /// EEPROM unlock register address.
    EepromUnlock,

    /// EEPROM scratch register 1 address.
    Eeprom1,

    /// EEPROM scratch register 2 address.
    Eeprom2,

    /// Temperature offset register address.
    TemperatureOffset,

    /// EEPROM scratch register 3 address.
    Eeprom3,

    /// Device ID register address.
    DeviceId,
}

impl Register {
    /// Whether this is one of the three general purpose EEPROM scratch
    /// registers.
    #[must_use]
    pub const fn is_eeprom_scratch(self) -> bool {
        matches!(self, Self::Eeprom1 | Self::Eeprom2 | Self::Eeprom3)
    }
}

impl From<Register> for u8 {
    fn from(reg: Register) -> Self {
        match reg {
            Register::Temperature => 0x00,
            Register::Configuration => 0x01,
            Register::HighLimit => 0x02,
            Register::LowLimit => 0x03,
            Register::EepromUnlock => 0x04,
            Register::Eeprom1 => 0x05,
            Register::Eeprom2 => 0x06,
            Register::TemperatureOffset => 0x07,
            Register::Eeprom3 => 0x08,
            Register::DeviceId => 0x0f,
        }
    }
}

/// A bit field of the configuration register which the driver exposes for
/// read-modify-write access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// MOD[1:0], bits 11:10.
    Mode,

    /// CONV[2:0], bits 9:7.
    ConversionCycle,

    /// AVG[1:0], bits 6:5.
    Averaging,

    /// T/nA, bit 4.
    ThermAlert,

    /// POL, bit 3.
    Polarity,
}

impl Field {
    /// Position of the field's least significant bit.
    #[must_use]
    pub const fn shift(self) -> u32 {
        match self {
            Self::Mode => 10,
            Self::ConversionCycle => 7,
            Self::Averaging => 5,
            Self::ThermAlert => 4,
            Self::Polarity => 3,
        }
    }

    /// Unshifted mask covering the field's width.
    #[must_use]
    pub const fn mask(self) -> u16 {
        match self {
            Self::Mode | Self::Averaging => 0b11,
            Self::ConversionCycle => 0b111,
            Self::ThermAlert | Self::Polarity => 0b1,
        }
    }

    /// Replace this field in `current` with `value`, leaving every other bit
    /// untouched.
    ///
    /// Bits of `value` beyond the field's width are dropped, the same way the
    /// device truncates them.
    #[must_use]
    pub const fn pack(self, current: u16, value: u16) -> u16 {
        let span = self.mask() << self.shift();
        (current & !span) | ((value & self.mask()) << self.shift())
    }

    /// Extract this field's raw value from `current`.
    #[must_use]
    pub const fn unpack(self, current: u16) -> u16 {
        (current >> self.shift()) & self.mask()
    }
}

/// Configuration register.
#[bitsize(16)]
#[derive(Clone, Copy, DebugBits, FromBits, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    reserved0: bool,

    /// Soft reset. Always reads back 0.
    pub soft_reset: bool,

    /// Data ready or alert pin select.
    pub dr_alert: AlertPinSelect,

    /// Alert pin polarity.
    pub polarity: Polarity,

    /// Therm or alert mode select.
    pub therm_alert: ThermAlert,

    /// Conversion averaging.
    pub averaging: Averaging,

    /// Conversion cycle.
    pub conversion: ConversionCycle,

    /// Conversion mode.
    pub mode: Mode,

    /// EEPROM busy flag. Set while the EEPROM is programming or loading
    /// after power-up.
    pub eeprom_busy: bool,

    /// Data ready flag. Cleared on every read of the temperature or
    /// configuration register.
    pub data_ready: bool,

    /// Low alert flag.
    pub low_alert: bool,

    /// High alert flag.
    pub high_alert: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::from(0x0220)
    }
}

impl Configuration {
    /// Configure conversion mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.set_mode(mode);
        self
    }

    /// Configure conversion cycle.
    #[must_use]
    pub fn with_conversion(mut self, conversion: ConversionCycle) -> Self {
        self.set_conversion(conversion);
        self
    }

    /// Configure averaging.
    #[must_use]
    pub fn with_averaging(mut self, averaging: Averaging) -> Self {
        self.set_averaging(averaging);
        self
    }

    /// Configure therm/alert mode.
    #[must_use]
    pub fn with_therm_alert(mut self, mode: ThermAlert) -> Self {
        self.set_therm_alert(mode);
        self
    }

    /// Configure alert polarity.
    #[must_use]
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.set_polarity(polarity);
        self
    }

    /// Configure what the ALERT pin reflects.
    #[must_use]
    pub fn with_dr_alert(mut self, select: AlertPinSelect) -> Self {
        self.set_dr_alert(select);
        self
    }
}

/// Conversion mode.
#[bitsize(2)]
#[derive(Debug, Clone, Copy, FromBits, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Continuous conversion at the rate selected by the CONV and AVG bits.
    Continuous,

    /// Shutdown. Only the serial interface stays powered.
    Shutdown,

    /// Continuous conversion, alternate encoding. The device reads it back
    /// as [`Mode::Continuous`].
    ContinuousAlt,

    /// One-shot conversion. The device performs a single conversion and
    /// returns to shutdown.
    OneShot,
}

/// Conversion cycle. Names give the cycle time with no averaging; see
/// [`ConversionCycle::period_us`] for the effect of [`Averaging`].
#[bitsize(3)]
#[derive(Debug, Clone, Copy, FromBits, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionCycle {
    /// 15.5 ms conversion cycle.
    Ms15_5,

    /// 125 ms conversion cycle.
    Ms125,

    /// 250 ms conversion cycle.
    Ms250,

    /// 500 ms conversion cycle.
    Ms500,

    /// 1 s conversion cycle.
    Ms1000,

    /// 4 s conversion cycle.
    Ms4000,

    /// 8 s conversion cycle.
    Ms8000,

    /// 16 s conversion cycle.
    Ms16000,
}

impl ConversionCycle {
    /// Conversion cycle time in microseconds for the given averaging.
    ///
    /// | CONV | AVG=00  | AVG=01 | AVG=10 | AVG=11 |
    /// |------|---------|--------|--------|--------|
    /// | 000  | 15.5 ms | 125 ms | 500 ms | 1 s    |
    /// | 001  | 125 ms  | 125 ms | 500 ms | 1 s    |
    /// | 010  | 250 ms  | 250 ms | 500 ms | 1 s    |
    /// | 011  | 500 ms  | 500 ms | 500 ms | 1 s    |
    /// | 100  | 1 s     | 1 s    | 1 s    | 1 s    |
    /// | 101  | 4 s     | 4 s    | 4 s    | 4 s    |
    /// | 110  | 8 s     | 8 s    | 8 s    | 8 s    |
    /// | 111  | 16 s    | 16 s   | 16 s   | 16 s   |
    #[must_use]
    pub fn period_us(self, averaging: Averaging) -> u32 {
        let standby = match self {
            Self::Ms15_5 => 15_500,
            Self::Ms125 => 125_000,
            Self::Ms250 => 250_000,
            Self::Ms500 => 500_000,
            Self::Ms1000 => 1_000_000,
            Self::Ms4000 => 4_000_000,
            Self::Ms8000 => 8_000_000,
            Self::Ms16000 => 16_000_000,
        };

        let active = match averaging {
            Averaging::NoAverage => 15_500,
            Averaging::Avg8 => 125_000,
            Averaging::Avg32 => 500_000,
            Averaging::Avg64 => 1_000_000,
        };

        standby.max(active)
    }
}

/// Conversion averaging.
#[bitsize(2)]
#[derive(Debug, Clone, Copy, FromBits, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Averaging {
    /// No averaging.
    NoAverage,

    /// 8 averaged conversions.
    Avg8,

    /// 32 averaged conversions.
    Avg32,

    /// 64 averaged conversions.
    Avg64,
}

/// Therm/alert mode select.
#[bitsize(1)]
#[derive(Debug, Clone, Copy, FromBits, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThermAlert {
    /// Alert mode. Flags latch when a limit is crossed and clear on read.
    Alert,

    /// Therm mode. High flag follows the high limit with the low limit as
    /// hysteresis.
    Therm,
}

/// Polarity
#[bitsize(1)]
#[derive(Debug, Clone, Copy, FromBits, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Active low (default).
    ActiveLow,

    /// Active high.
    ActiveHigh,
}

/// ALERT pin source.
#[bitsize(1)]
#[derive(Debug, Clone, Copy, FromBits, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertPinSelect {
    /// ALERT pin reflects the alert flags.
    Alert,

    /// ALERT pin reflects the data ready flag.
    DataReady,
}

impl From<Mode> for u16 {
    fn from(mode: Mode) -> Self {
        u2::from(mode).value().into()
    }
}

impl From<ConversionCycle> for u16 {
    fn from(conversion: ConversionCycle) -> Self {
        u3::from(conversion).value().into()
    }
}

impl From<Averaging> for u16 {
    fn from(averaging: Averaging) -> Self {
        u2::from(averaging).value().into()
    }
}

impl From<ThermAlert> for u16 {
    fn from(mode: ThermAlert) -> Self {
        u1::from(mode).value().into()
    }
}

impl From<Polarity> for u16 {
    fn from(polarity: Polarity) -> Self {
        u1::from(polarity).value().into()
    }
}

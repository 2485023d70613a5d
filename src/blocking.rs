//! TMP11x Blocking API

#[cfg(feature = "embedded-sensors-hal")]
use embedded_sensors_hal::sensor;
#[cfg(feature = "embedded-sensors-hal")]
use embedded_sensors_hal::temperature::{DegreesCelsius, TemperatureSensor};

use super::conversion::{celsius_to_fahrenheit, celsius_to_raw, raw_to_celsius};
use super::fmt::{debug, trace, warn};
use super::{Add0, Averaging, Configuration, ConversionCycle, Field, Mode, Polarity, Register, ThermAlert, Variant};

/// Driver lifecycle as seen by [`Tmp11x::begin`].
///
/// The ID probe runs to completion inside `begin`, so there is no
/// observable probing state: the driver goes straight from
/// [`State::Uninitialized`] to [`State::Ready`] or [`State::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No probe has been attempted yet.
    Uninitialized,

    /// The device answered with a supported ID.
    Ready(Variant),

    /// The last probe failed. Register accessors should not be used.
    Failed,
}

/// TMP116/TMP117 blocking device driver
pub struct Tmp11x<I2C: embedded_hal::i2c::I2c, DELAY: embedded_hal::delay::DelayNs> {
    /// The concrete I2C bus implementation
    i2c: I2C,

    /// The concrete [`embedded_hal::delay::DelayNs`] implementation
    delay: DELAY,

    /// The I2C address.
    pub(crate) addr: u8,

    state: State,
}

impl<I2C: embedded_hal::i2c::I2c, DELAY: embedded_hal::delay::DelayNs> Tmp11x<I2C, DELAY> {
    const RESET: u16 = 0x8000;
    const EEPROM_UNLOCK: u16 = 0x8000;
    const EEPROM_LOCK: u16 = 0x0000;
    const EEPROM_SETTLE_MS: u32 = 2;
    const EEPROM_PROGRAM_MS: u32 = 10;

    /// Create a new TMP11x instance. No bus traffic happens until
    /// [`Tmp11x::begin`] is called.
    ///
    /// The bus clock and pin assignment are properties of `i2c` and must be
    /// configured before it is handed over.
    pub fn new_blocking(i2c: I2C, delay: DELAY, add0: Add0) -> Self {
        Self {
            i2c,
            delay,
            addr: add0.into(),
            state: State::Uninitialized,
        }
    }

    /// Create a new TMP11x instance with ADD0 tied to GND, resulting in an
    /// instance responding to address `0x48`.
    pub fn new_blocking_with_add0_gnd(i2c: I2C, delay: DELAY) -> Self {
        Self::new_blocking(i2c, delay, Add0::Gnd)
    }

    /// Create a new TMP11x instance with ADD0 tied to V+, resulting in an
    /// instance responding to address `0x49`.
    pub fn new_blocking_with_add0_vplus(i2c: I2C, delay: DELAY) -> Self {
        Self::new_blocking(i2c, delay, Add0::Vplus)
    }

    /// Create a new TMP11x instance with ADD0 tied to SDA, resulting in an
    /// instance responding to address `0x4a`.
    pub fn new_blocking_with_add0_sda(i2c: I2C, delay: DELAY) -> Self {
        Self::new_blocking(i2c, delay, Add0::Sda)
    }

    /// Create a new TMP11x instance with ADD0 tied to SCL, resulting in an
    /// instance responding to address `0x4b`.
    pub fn new_blocking_with_add0_scl(i2c: I2C, delay: DELAY) -> Self {
        Self::new_blocking(i2c, delay, Add0::Scl)
    }

    /// Destroy the driver instance, return the I2C bus instance.
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Outcome of the most recent [`Tmp11x::begin`].
    pub fn state(&self) -> State {
        self.state
    }

    /// Probe the device ID and check it against the supported variants.
    ///
    /// A single read is issued, never retried. On failure the driver is left
    /// in [`State::Failed`].
    ///
    /// # Errors
    ///
    /// [`Error::Bus`] when the I2C transaction fails, [`Error::IdentityMismatch`]
    /// when the device reports an unsupported ID.
    pub fn begin(&mut self) -> Result<Variant, Error<I2C::Error>> {
        let id = match self.device_id() {
            Ok(id) => id,
            Err(e) => {
                self.state = State::Failed;
                debug!("tmp11x@{:#x}: probe failed on bus", self.addr);
                return Err(Error::Bus(e));
            }
        };

        match Variant::try_from(id) {
            Ok(variant) => {
                debug!("tmp11x@{:#x}: found {:?}", self.addr, variant);
                self.state = State::Ready(variant);
                Ok(variant)
            }
            Err(id) => {
                debug!("tmp11x@{:#x}: unsupported device id {:#x}", self.addr, id);
                self.state = State::Failed;
                Err(Error::IdentityMismatch(id))
            }
        }
    }

    /// Read device ID register. Always hits the bus.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn device_id(&mut self) -> Result<u16, I2C::Error> {
        let data = self.read(Register::DeviceId)?;
        Ok(u16::from_be_bytes(data))
    }

    /// Read configuration register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn configuration(&mut self) -> Result<Configuration, I2C::Error> {
        Ok(Configuration::from(self.raw_configuration()?))
    }

    /// Set configuration register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_configuration(&mut self, config: Configuration) -> Result<(), I2C::Error> {
        self.set_raw_configuration(config.into())
    }

    /// Read configuration register as a raw word
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn raw_configuration(&mut self) -> Result<u16, I2C::Error> {
        let data = self.read(Register::Configuration)?;
        Ok(u16::from_be_bytes(data))
    }

    /// Write configuration register as a raw word
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_raw_configuration(&mut self, value: u16) -> Result<(), I2C::Error> {
        trace!("tmp11x@{:#x}: config <- {:#x}", self.addr, value);
        self.write(Register::Configuration, value.to_be_bytes())
    }

    /// Soft reset. Writes the reset word without reading the register first.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn reset(&mut self) -> Result<(), I2C::Error> {
        self.set_raw_configuration(Self::RESET)
    }

    /// Read one configuration field as its raw code.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn field(&mut self, field: Field) -> Result<u16, I2C::Error> {
        Ok(field.unpack(self.raw_configuration()?))
    }

    /// Read-modify-write one configuration field. Bits of `value` wider than
    /// the field are dropped.
    ///
    /// The read and the write are separate bus transactions; a write from
    /// another bus master in between is overwritten.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_field(&mut self, field: Field, value: u16) -> Result<(), I2C::Error> {
        let current = self.raw_configuration()?;
        self.set_raw_configuration(field.pack(current, value))
    }

    /// Read conversion mode
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn mode(&mut self) -> Result<Mode, I2C::Error> {
        Ok(self.configuration()?.mode())
    }

    /// Set conversion mode
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), I2C::Error> {
        self.set_field(Field::Mode, mode.into())
    }

    /// Place device in Shutdown mode
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn shutdown(&mut self) -> Result<(), I2C::Error> {
        self.set_mode(Mode::Shutdown)
    }

    /// Trigger a single conversion
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn one_shot(&mut self) -> Result<(), I2C::Error> {
        self.set_mode(Mode::OneShot)
    }

    /// Start continuous conversions
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn continuous(&mut self) -> Result<(), I2C::Error> {
        self.set_mode(Mode::Continuous)
    }

    /// Read conversion cycle
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn conversion(&mut self) -> Result<ConversionCycle, I2C::Error> {
        Ok(self.configuration()?.conversion())
    }

    /// Set conversion cycle
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_conversion(&mut self, conversion: ConversionCycle) -> Result<(), I2C::Error> {
        self.set_field(Field::ConversionCycle, conversion.into())
    }

    /// Read averaging
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn averaging(&mut self) -> Result<Averaging, I2C::Error> {
        Ok(self.configuration()?.averaging())
    }

    /// Set averaging
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_averaging(&mut self, averaging: Averaging) -> Result<(), I2C::Error> {
        self.set_field(Field::Averaging, averaging.into())
    }

    /// Read therm/alert mode
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn therm_alert(&mut self) -> Result<ThermAlert, I2C::Error> {
        Ok(self.configuration()?.therm_alert())
    }

    /// Set therm/alert mode
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_therm_alert(&mut self, mode: ThermAlert) -> Result<(), I2C::Error> {
        self.set_field(Field::ThermAlert, mode.into())
    }

    /// Read alert polarity
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn polarity(&mut self) -> Result<Polarity, I2C::Error> {
        Ok(self.configuration()?.polarity())
    }

    /// Set alert polarity
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_polarity(&mut self, polarity: Polarity) -> Result<(), I2C::Error> {
        self.set_field(Field::Polarity, polarity.into())
    }

    /// Read temperature register as a raw two's complement code
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn raw_temperature(&mut self) -> Result<i16, I2C::Error> {
        let raw = self.read(Register::Temperature)?;
        Ok(i16::from_be_bytes(raw))
    }

    /// Read temperature register in degrees Celsius
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn temperature(&mut self) -> Result<f32, I2C::Error> {
        self.read_celsius(Register::Temperature)
    }

    /// Read temperature register in degrees Fahrenheit
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn temperature_fahrenheit(&mut self) -> Result<f32, I2C::Error> {
        Ok(celsius_to_fahrenheit(self.temperature()?))
    }

    /// Wait for one conversion cycle to complete, then read the temperature.
    /// This method will block for the amount of time dictated by the CONV and
    /// AVG bits in the [`Configuration`] register.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn wait_for_temperature(&mut self) -> Result<f32, I2C::Error> {
        let config = self.configuration()?;
        let period = config.conversion().period_us(config.averaging());

        self.delay.delay_us(period);
        self.temperature()
    }

    /// Read temperature low limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn low_limit(&mut self) -> Result<f32, I2C::Error> {
        self.read_celsius(Register::LowLimit)
    }

    /// Set temperature low limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_low_limit(&mut self, limit: f32) -> Result<(), I2C::Error> {
        self.write_celsius(Register::LowLimit, limit)
    }

    /// Read temperature high limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn high_limit(&mut self) -> Result<f32, I2C::Error> {
        self.read_celsius(Register::HighLimit)
    }

    /// Set temperature high limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_high_limit(&mut self, limit: f32) -> Result<(), I2C::Error> {
        self.write_celsius(Register::HighLimit, limit)
    }

    /// Read temperature offset register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn offset(&mut self) -> Result<f32, I2C::Error> {
        self.read_celsius(Register::TemperatureOffset)
    }

    /// Set temperature offset register. The offset is added to every
    /// conversion result, so a sensor reading 0.3℃ high wants `-0.3`.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_offset(&mut self, offset: f32) -> Result<(), I2C::Error> {
        self.write_celsius(Register::TemperatureOffset, offset)
    }

    /// Read an EEPROM scratch register. No unlock is needed for reads.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegister`] if `reg` is not one of
    /// [`Register::Eeprom1`], [`Register::Eeprom2`] or [`Register::Eeprom3`];
    /// [`Error::Bus`] when the I2C transaction fails.
    pub fn read_eeprom(&mut self, reg: Register) -> Result<u16, Error<I2C::Error>> {
        if !reg.is_eeprom_scratch() {
            return Err(Error::InvalidRegister(reg));
        }

        let data = self.read(reg).map_err(Error::Bus)?;
        Ok(u16::from_be_bytes(data))
    }

    /// Program an EEPROM scratch register.
    ///
    /// Unlocks the EEPROM, writes `value`, waits out the programming time and
    /// locks the EEPROM again. Blocks for at least 14ms.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegister`] if `reg` is not a scratch register, with no
    /// bus traffic. [`Error::Bus`] if unlocking or writing fails; nothing after
    /// the failing step is attempted. [`Error::Relock`] if the value was
    /// written but the EEPROM could not be locked again.
    pub fn write_eeprom(&mut self, reg: Register, value: u16) -> Result<(), Error<I2C::Error>> {
        if !reg.is_eeprom_scratch() {
            return Err(Error::InvalidRegister(reg));
        }

        self.unlock_eeprom().map_err(Error::Bus)?;

        trace!("tmp11x@{:#x}: eeprom {:#x} <- {:#x}", self.addr, u8::from(reg), value);
        self.write(reg, value.to_be_bytes()).map_err(Error::Bus)?;
        self.delay.delay_ms(Self::EEPROM_PROGRAM_MS);

        self.lock_eeprom().map_err(|e| {
            warn!("tmp11x@{:#x}: eeprom written but left unlocked", self.addr);
            Error::Relock(e)
        })
    }

    fn unlock_eeprom(&mut self) -> Result<(), I2C::Error> {
        self.write(Register::EepromUnlock, Self::EEPROM_UNLOCK.to_be_bytes())?;
        self.delay.delay_ms(Self::EEPROM_SETTLE_MS);
        Ok(())
    }

    fn lock_eeprom(&mut self) -> Result<(), I2C::Error> {
        self.write(Register::EepromUnlock, Self::EEPROM_LOCK.to_be_bytes())?;
        self.delay.delay_ms(Self::EEPROM_SETTLE_MS);
        Ok(())
    }

    fn read_celsius(&mut self, reg: Register) -> Result<f32, I2C::Error> {
        let raw = self.read(reg)?;
        Ok(raw_to_celsius(i16::from_be_bytes(raw)))
    }

    fn write_celsius(&mut self, reg: Register, celsius: f32) -> Result<(), I2C::Error> {
        let raw = celsius_to_raw(celsius);
        self.write(reg, raw.to_be_bytes())
    }

    fn read(&mut self, reg: Register) -> Result<[u8; 2], I2C::Error> {
        let mut bytes = [0; 2];
        self.i2c.write_read(self.addr, &[reg.into()], &mut bytes)?;
        Ok(bytes)
    }

    fn write(&mut self, reg: Register, value: [u8; 2]) -> Result<(), I2C::Error> {
        let mut data = [0; 3];

        data[0] = reg.into();
        data[1..].copy_from_slice(&value);

        self.i2c.write(self.addr, &data)
    }
}

/// TMP11x Errors
#[derive(Debug)]
pub enum Error<E: embedded_hal::i2c::Error> {
    /// I2C Bus Error
    Bus(E),
    /// The device ID matched neither TMP116 nor TMP117.
    IdentityMismatch(u16),
    /// The register is not an EEPROM scratch register.
    InvalidRegister(Register),
    /// The EEPROM write completed but locking it again failed.
    Relock(E),
}

#[cfg(feature = "embedded-sensors-hal")]
impl<E: embedded_hal::i2c::Error> sensor::Error for Error<E> {
    fn kind(&self) -> sensor::ErrorKind {
        match *self {
            Self::Bus(_) | Self::Relock(_) => sensor::ErrorKind::Peripheral,
            Self::InvalidRegister(_) => sensor::ErrorKind::InvalidInput,
            Self::IdentityMismatch(_) => sensor::ErrorKind::Other,
        }
    }
}

#[cfg(feature = "embedded-sensors-hal")]
impl<I2C: embedded_hal::i2c::I2c, DELAY: embedded_hal::delay::DelayNs> sensor::ErrorType for Tmp11x<I2C, DELAY> {
    type Error = Error<I2C::Error>;
}

#[cfg(feature = "embedded-sensors-hal")]
impl<I2C: embedded_hal::i2c::I2c, DELAY: embedded_hal::delay::DelayNs> TemperatureSensor for Tmp11x<I2C, DELAY> {
    fn temperature(&mut self) -> Result<DegreesCelsius, Self::Error> {
        self.temperature().map_err(Error::Bus)
    }
}

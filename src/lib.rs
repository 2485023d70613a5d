//! This is a platform-agnostic Rust driver for the TMP116 and TMP117
//! temperature sensors based on the [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//!
//! For further details of the device architecture and operation, please refer
//! to the official datasheets: [`TMP117`] and [`TMP116`].
//!
//! [`TMP117`]: https://www.ti.com/lit/gpn/tmp117
//! [`TMP116`]: https://www.ti.com/lit/gpn/tmp116

#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

mod fmt;

mod registers;
pub use registers::*;

pub mod blocking;
pub mod conversion;

/// ADD0 pin logic level representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Add0 {
    /// ADD0 tied to GND (default).
    Gnd,
    /// ADD0 tied to V+.
    Vplus,
    /// ADD0 tied to SDA.
    Sda,
    /// ADD0 tied to SCL.
    Scl,
}

impl Default for Add0 {
    fn default() -> Self {
        Self::Gnd
    }
}

impl From<Add0> for u8 {
    fn from(connection: Add0) -> Self {
        match connection {
            Add0::Gnd => 0b100_1000,
            Add0::Vplus => 0b100_1001,
            Add0::Sda => 0b100_1010,
            Add0::Scl => 0b100_1011,
        }
    }
}

impl TryFrom<u8> for Add0 {
    type Error = u8;

    /// Map a 7-bit bus address back to its ADD0 strapping. Only
    /// `0x48..=0x4b` are reachable; anything else is returned as the error.
    fn try_from(addr: u8) -> Result<Self, Self::Error> {
        match addr {
            0x48 => Ok(Self::Gnd),
            0x49 => Ok(Self::Vplus),
            0x4a => Ok(Self::Sda),
            0x4b => Ok(Self::Scl),
            other => Err(other),
        }
    }
}

/// Supported device variants, identified by the device ID register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// TMP116, device ID `0x1116`.
    Tmp116,
    /// TMP117, device ID `0x0117`.
    Tmp117,
}

impl Variant {
    /// Device ID register contents reported by this variant.
    #[must_use]
    pub const fn device_id(self) -> u16 {
        match self {
            Self::Tmp116 => 0x1116,
            Self::Tmp117 => 0x0117,
        }
    }
}

impl TryFrom<u16> for Variant {
    type Error = u16;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        match id {
            0x1116 => Ok(Self::Tmp116),
            0x0117 => Ok(Self::Tmp117),
            other => Err(other),
        }
    }
}

//! Temperature codec shared by the result, limit and offset registers.

/// Degrees Celsius represented by one LSB of a temperature register.
pub const CELSIUS_PER_BIT: f32 = 0.0078125;

/// Convert a raw two's complement register code to degrees Celsius.
#[must_use]
pub fn raw_to_celsius(raw: i16) -> f32 {
    f32::from(raw) * CELSIUS_PER_BIT
}

/// Convert degrees Celsius to a raw register code.
///
/// The quotient is truncated toward zero, not rounded. Values outside the
/// register range saturate at `i16::MIN`/`i16::MAX`, and NaN maps to 0.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn celsius_to_raw(celsius: f32) -> i16 {
    (celsius / CELSIUS_PER_BIT) as i16
}

/// Convert degrees Celsius to degrees Fahrenheit.
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 1.8 + 32.0
}

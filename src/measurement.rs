//! Strongly typed measurement results.
//!
//! Each reading holds the fixed-point integer the compensation engine produced;
//! the floating-point accessors are a presentation detail dividing by 100 and
//! never go back to the bus.

/// Temperature in hundredths of a degree Celsius (2508 = 25.08 degC).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Temperature(pub i32);

impl Temperature {
    /// Raw fixed-point value in 0.01 degC.
    pub fn centi_celsius(self) -> i32 {
        self.0
    }

    /// Degrees Celsius.
    pub fn celsius(self) -> f32 {
        self.0 as f32 / 100.0
    }

    /// Split into whole degrees and hundredths for display without float support.
    ///
    /// # Example
    /// ```rust
    /// use forced_bmx280::Temperature;
    /// let temp = Temperature(2350);
    /// assert_eq!(temp.split(), (23, 50)); // 23.50 degC
    /// ```
    pub fn split(self) -> (i32, i32) {
        (self.0 / 100, self.0 % 100)
    }
}

/// Pressure in Pascal (100656 = 1006.56 hPa).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Pressure(pub u32);

impl Pressure {
    /// Raw value in Pascal.
    pub fn pascals(self) -> u32 {
        self.0
    }

    /// Hectopascal.
    pub fn hectopascals(self) -> f32 {
        self.0 as f32 / 100.0
    }

    /// Split into whole and fractional hectopascal for display without float support.
    pub fn split(self) -> (u32, u32) {
        (self.0 / 100, self.0 % 100)
    }
}

/// Relative humidity in hundredths of a percent (3600 = 36.00 %).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Humidity(pub u32);

impl Humidity {
    /// Raw fixed-point value in 0.01 %RH.
    pub fn centi_percent(self) -> u32 {
        self.0
    }

    /// Percent relative humidity.
    pub fn percent(self) -> f32 {
        self.0 as f32 / 100.0
    }

    /// Split into whole and fractional percent for display without float support.
    ///
    /// # Example
    /// ```rust
    /// use forced_bmx280::Humidity;
    /// let hum = Humidity(4512);
    /// assert_eq!(hum.split(), (45, 12)); // 45.12 %
    /// ```
    pub fn split(self) -> (u32, u32) {
        (self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_forms_divide_by_hundred() {
        assert_eq!(Temperature(2508).celsius(), 25.08);
        assert_eq!(Pressure(100656).hectopascals(), 1006.56);
        assert_eq!(Humidity(3600).percent(), 36.0);
    }

    #[test]
    fn split_separates_whole_and_fraction() {
        assert_eq!(Temperature(2508).split(), (25, 8));
        assert_eq!(Temperature(-2508).split(), (-25, -8));
        assert_eq!(Pressure(100656).split(), (1006, 56));
        assert_eq!(Humidity(3600).split(), (36, 0));
    }
}

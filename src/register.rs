/// BMP280 chip id, see datasheet section 4.3.1
pub(crate) const CHIP_ID_BMP280: u8 = 0x58;
/// BME280 chip id, see BME280 datasheet section 5.4.1
pub(crate) const CHIP_ID_BME280: u8 = 0x60;

/// Writing this key to `Register::RESET` triggers a power-on-reset sequence.
pub(crate) const RESET_KEY: u8 = 0xB6;

/// ctrl_meas value for a forced one-shot conversion, see datasheet section 5.4.5:
/// temperature oversampling x1 (bits 7..5), pressure oversampling x1 (bits 4..2),
/// forced mode (bits 1..0).
pub(crate) const CTRL_MEAS_FORCED: u8 = 0b0010_0101;
/// ctrl_meas value for sleep mode. Also unlocks write access to config registers.
pub(crate) const CTRL_MEAS_SLEEP: u8 = 0x00;
/// ctrl_hum value for humidity oversampling x1, see BME280 datasheet section 5.4.3.
pub(crate) const CTRL_HUM_OVERSAMPLING_X1: u8 = 0x01;

/// STATUS bit 0: NVM calibration image copy in progress.
pub(crate) const STATUS_IM_UPDATE: u8 = 1 << 0;
/// STATUS bit 3: conversion in progress.
pub(crate) const STATUS_MEASURING: u8 = 1 << 3;

/// Register map of the BMP280/BME280.
///
/// Addresses from the Bosch BMP280 datasheet (BST-BMP280-DS001, section 4.2) and
/// BME280 datasheet (BST-BME280-DS002, section 5.3). The humidity registers only
/// exist on the BME280.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[allow(non_camel_case_types)]
#[repr(u8)]
pub enum Register {
    /// Chip identification byte.
    CHIP_ID = 0xD0,
    /// Soft-reset register, write `0xB6` to reset.
    RESET = 0xE0,
    /// Status bits: measuring (bit 3), im_update (bit 0).
    STATUS = 0xF3,
    /// Humidity oversampling control (BME280 only).
    CTRL_HUM = 0xF2,
    /// Mode + temperature/pressure oversampling control.
    CTRL_MEAS = 0xF4,
    /// Start of the temperature + pressure calibration block (24 bytes).
    FIRST_CALIB = 0x88,
    /// First humidity calibration byte (BME280 only).
    FIRST_HUM_CALIB = 0xA1,
    /// Start of the second humidity calibration block (7 bytes, BME280 only).
    SCND_HUM_CALIB = 0xE1,
    /// Pressure ADC output, 3-byte burst.
    PRESS_MSB = 0xF7,
    /// Temperature ADC output, 3-byte burst.
    TEMP_MSB = 0xFA,
    /// Humidity ADC output, 2-byte burst (BME280 only).
    HUM_MSB = 0xFD,
}

impl Register {
    pub fn addr(self) -> u8 {
        self as u8
    }
}

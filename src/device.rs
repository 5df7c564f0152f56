use crate::bus::{Bus, I2cBus};
use crate::calibration::{
    parse_temp_press, CalibrationData, HumidityCalib, TemperatureCalib, SCND_HUM_CALIB_LEN,
    TEMP_CALIB_LEN, TEMP_PRESS_CALIB_LEN,
};
use crate::codec::{adc_16bit, adc_20bit};
use crate::compensate::{
    compensate_humidity, compensate_pressure, compensate_temperature, TFine,
};
use crate::measurement::{Humidity, Pressure, Temperature};
use crate::register::{
    Register, CHIP_ID_BME280, CHIP_ID_BMP280, CTRL_HUM_OVERSAMPLING_X1, CTRL_MEAS_FORCED,
    CTRL_MEAS_SLEEP, RESET_KEY, STATUS_IM_UPDATE, STATUS_MEASURING,
};
use core::marker::PhantomData;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// I2C address with the SDO pin pulled low.
pub const ADDRESS_PRIMARY: u8 = 0x76;
/// I2C address with the SDO pin pulled high.
pub const ADDRESS_SECONDARY: u8 = 0x77;

/// Inter-poll delay while waiting for the NVM calibration copy after reset.
const STATUS_POLL_DELAY_MS: u32 = 10;
/// Poll ceiling for the NVM copy wait. The copy takes single-digit milliseconds
/// on a healthy part; a device still busy after this many polls is stuck.
const STATUS_POLL_LIMIT: u32 = 50;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Uninitialized;
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ready;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug)]
pub enum Error<I2CError> {
    /// I2C Interface Error
    I2CError(I2CError),
    /// The identity register matched neither the BMP280 nor the BME280 signature.
    UnrecognizedChipId,
    /// The calibration-image copy bit never cleared after soft reset.
    ResetTimeout,
}

impl<I2CError> From<I2CError> for Error<I2CError> {
    fn from(err: I2CError) -> Self {
        Error::I2CError(err)
    }
}

/// Chip identity resolved from the CHIP_ID register during [`ForcedBmx280::init`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChipId {
    /// Temperature + pressure part (identity byte 0x58).
    Bmp280,
    /// Temperature + pressure + humidity part (identity byte 0x60).
    Bme280,
    /// No recognized part. Never observed on an initialized driver;
    /// [`ForcedBmx280::init`] fails instead.
    Unknown,
}

impl ChipId {
    fn from_byte(byte: u8) -> Self {
        match byte {
            CHIP_ID_BMP280 => ChipId::Bmp280,
            CHIP_ID_BME280 => ChipId::Bme280,
            _ => ChipId::Unknown,
        }
    }

    /// True for the part with a humidity sensing element.
    pub fn supports_humidity(self) -> bool {
        self == ChipId::Bme280
    }
}

/// Which measurements the driver reads calibration for and serves.
///
/// Chosen at construction; replaces a per-variant driver type. Requesting less
/// than the chip can do is fine and keeps the calibration reads smaller.
/// Requesting humidity from a BMP280 degrades to the pressure profile.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Capability {
    TemperatureOnly,
    WithPressure,
    WithPressureAndHumidity,
}

/// Decoded STATUS register bits.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Status {
    /// A conversion is running.
    pub measuring: bool,
    /// The NVM calibration image is being copied to the register shadow.
    pub im_update: bool,
}

impl Status {
    fn from_bits(status: u8) -> Self {
        Self {
            measuring: (status & STATUS_MEASURING) != 0,
            im_update: (status & STATUS_IM_UPDATE) != 0,
        }
    }
}

/// BMP280/BME280 driver operating the sensor exclusively in forced mode.
///
/// Every measurement is a one-shot conversion after which the chip drops back
/// into its sub-microamp sleep state on its own, so the sensor only draws
/// conversion current while a reading is in flight.
///
/// The getters accept a `perform_measurement` flag. When set, the forced-mode
/// control write is folded into the same bus transaction that selects the data
/// register, and the conversion is *not* awaited before reading. At x1
/// oversampling the conversion typically completes under the bus turnaround,
/// but a fast bus can return the previous conversion's code. Callers that need
/// a guaranteed-fresh reading should call
/// [`take_forced_measurement`](ForcedBmx280::take_forced_measurement), wait for
/// [`status`](ForcedBmx280::status) to clear `measuring` (or use the `try_*`
/// getters), then read without the flag.
pub struct ForcedBmx280<I2C, S> {
    bus: I2cBus<I2C>,
    capability: Capability,
    chip_id: ChipId,
    calib: CalibrationData,
    t_fine: TFine,
    _state: PhantomData<S>,
}

impl<I2C, I2CError> ForcedBmx280<I2C, Uninitialized>
where
    I2C: I2c<Error = I2CError>,
{
    /// Create a driver for the sensor at `address`. Does not touch the bus.
    pub fn new(i2c: I2C, address: u8, capability: Capability) -> Self {
        Self {
            bus: I2cBus::new(i2c, address),
            capability,
            chip_id: ChipId::Unknown,
            calib: CalibrationData::default(),
            t_fine: TFine(0),
            _state: PhantomData,
        }
    }

    /// Probe the bus, identify the chip, soft-reset it, load the factory
    /// calibration and seed the fine-temperature state with one measurement.
    ///
    /// All-or-nothing: any bus failure aborts the whole sequence. After
    /// success, pressure or humidity can be read before the first temperature
    /// request and still be compensated against a current measurement.
    pub fn init<D: DelayNs>(
        mut self,
        delay: &mut D,
    ) -> Result<ForcedBmx280<I2C, Ready>, Error<I2CError>> {
        self.bus.probe()?;

        let chip_id = ChipId::from_byte(self.bus.read_reg(Register::CHIP_ID)?);
        if chip_id == ChipId::Unknown {
            return Err(Error::UnrecognizedChipId);
        }
        self.chip_id = chip_id;

        self.bus.write_reg(Register::RESET, RESET_KEY)?;
        self.wait_for_calibration_copy(delay)?;

        self.apply_oversampling_controls()?;
        self.read_calibration_data()?;

        let mut ready: ForcedBmx280<I2C, Ready> = self.into_state();
        ready.take_forced_measurement()?;
        ready.temperature(false)?;
        Ok(ready)
    }

    /// Wait for the STATUS im_update bit to clear after reset.
    ///
    /// The reference code loops without bound here; a poll ceiling turns a
    /// stuck device into [`Error::ResetTimeout`] instead of a hang.
    fn wait_for_calibration_copy<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), Error<I2CError>> {
        delay.delay_ms(STATUS_POLL_DELAY_MS);
        for _ in 0..STATUS_POLL_LIMIT {
            if self.bus.read_reg(Register::STATUS)? & STATUS_IM_UPDATE == 0 {
                return Ok(());
            }
            delay.delay_ms(STATUS_POLL_DELAY_MS);
        }
        Err(Error::ResetTimeout)
    }

    fn apply_oversampling_controls(&mut self) -> Result<(), Error<I2CError>> {
        // Sleep mode first; config registers only accept writes outside a conversion.
        self.bus.write_reg(Register::CTRL_MEAS, CTRL_MEAS_SLEEP)?;
        if self.humidity_selected() {
            self.bus
                .write_reg(Register::CTRL_HUM, CTRL_HUM_OVERSAMPLING_X1)?;
        }
        self.bus.write_reg(Register::CTRL_MEAS, CTRL_MEAS_FORCED)?;
        Ok(())
    }

    fn read_calibration_data(&mut self) -> Result<(), Error<I2CError>> {
        match self.capability {
            Capability::TemperatureOnly => {
                let mut bytes = [0u8; TEMP_CALIB_LEN];
                self.bus.read_many(Register::FIRST_CALIB, &mut bytes)?;
                self.calib.temperature = TemperatureCalib::from_bytes(&bytes);
            }
            Capability::WithPressure | Capability::WithPressureAndHumidity => {
                let mut bytes = [0u8; TEMP_PRESS_CALIB_LEN];
                self.bus.read_many(Register::FIRST_CALIB, &mut bytes)?;
                let (temperature, pressure) = parse_temp_press(&bytes);
                self.calib.temperature = temperature;
                self.calib.pressure = Some(pressure);
            }
        }

        if self.humidity_selected() {
            let dig_h1 = self.bus.read_reg(Register::FIRST_HUM_CALIB)?;
            let mut block = [0u8; SCND_HUM_CALIB_LEN];
            self.bus.read_many(Register::SCND_HUM_CALIB, &mut block)?;
            self.calib.humidity = Some(HumidityCalib::from_bytes(dig_h1, &block));
        }
        Ok(())
    }

    /// Humidity is read only when both the caller asked for it and the part has
    /// the sensing element.
    fn humidity_selected(&self) -> bool {
        self.capability == Capability::WithPressureAndHumidity && self.chip_id.supports_humidity()
    }
}

impl<I2C, I2CError> ForcedBmx280<I2C, Ready>
where
    I2C: I2c<Error = I2CError>,
{
    /// The identity resolved during [`init`](ForcedBmx280::init).
    pub fn chip_id(&self) -> ChipId {
        self.chip_id
    }

    /// Start a one-shot conversion. The chip returns to sleep on completion.
    ///
    /// Fire-and-forget: the caller must not read the measurement registers
    /// until the conversion is done (see [`status`](ForcedBmx280::status)).
    pub fn take_forced_measurement(&mut self) -> Result<(), Error<I2CError>> {
        self.bus.write_reg(Register::CTRL_MEAS, CTRL_MEAS_FORCED)?;
        Ok(())
    }

    /// Read the STATUS register.
    pub fn status(&mut self) -> Result<Status, Error<I2CError>> {
        Ok(Status::from_bits(self.bus.read_reg(Register::STATUS)?))
    }

    /// Read and compensate the temperature.
    ///
    /// Also refreshes the fine-temperature state that pressure and humidity
    /// compensation of the same measurement depend on.
    pub fn temperature(
        &mut self,
        perform_measurement: bool,
    ) -> Result<Temperature, Error<I2CError>> {
        let mut bytes = [0u8; 3];
        self.read_measurement(Register::TEMP_MSB, perform_measurement, &mut bytes)?;
        let (centi_celsius, t_fine) =
            compensate_temperature(adc_20bit(&bytes), &self.calib.temperature);
        self.t_fine = t_fine;
        Ok(Temperature(centi_celsius))
    }

    /// Read and compensate the pressure, using the fine temperature from the
    /// most recent temperature read.
    ///
    /// Returns `Pressure(0)` without touching the bus when the driver was
    /// constructed with [`Capability::TemperatureOnly`].
    pub fn pressure(&mut self, perform_measurement: bool) -> Result<Pressure, Error<I2CError>> {
        let calib = match self.calib.pressure {
            Some(calib) => calib,
            None => return Ok(Pressure(0)),
        };
        let mut bytes = [0u8; 3];
        self.read_measurement(Register::PRESS_MSB, perform_measurement, &mut bytes)?;
        Ok(Pressure(compensate_pressure(
            adc_20bit(&bytes),
            &calib,
            self.t_fine,
        )))
    }

    /// Read and compensate the relative humidity, using the fine temperature
    /// from the most recent temperature read.
    ///
    /// Returns `Humidity(0)` without touching the bus on a BMP280 or when the
    /// driver was constructed without the humidity capability.
    pub fn humidity(&mut self, perform_measurement: bool) -> Result<Humidity, Error<I2CError>> {
        let calib = match self.calib.humidity {
            Some(calib) => calib,
            None => return Ok(Humidity(0)),
        };
        let mut bytes = [0u8; 2];
        self.read_measurement(Register::HUM_MSB, perform_measurement, &mut bytes)?;
        Ok(Humidity(compensate_humidity(
            adc_16bit(&bytes),
            &calib,
            self.t_fine,
        )))
    }

    /// Non-blocking temperature read: `WouldBlock` while a conversion is running.
    pub fn try_temperature(&mut self) -> nb::Result<Temperature, Error<I2CError>> {
        if self.status()?.measuring {
            return Err(nb::Error::WouldBlock);
        }
        self.temperature(false).map_err(nb::Error::Other)
    }

    /// Non-blocking pressure read: `WouldBlock` while a conversion is running.
    pub fn try_pressure(&mut self) -> nb::Result<Pressure, Error<I2CError>> {
        if self.status()?.measuring {
            return Err(nb::Error::WouldBlock);
        }
        self.pressure(false).map_err(nb::Error::Other)
    }

    /// Non-blocking humidity read: `WouldBlock` while a conversion is running.
    pub fn try_humidity(&mut self) -> nb::Result<Humidity, Error<I2CError>> {
        if self.status()?.measuring {
            return Err(nb::Error::WouldBlock);
        }
        self.humidity(false).map_err(nb::Error::Other)
    }

    fn read_measurement(
        &mut self,
        start: Register,
        trigger: bool,
        buf: &mut [u8],
    ) -> Result<(), Error<I2CError>> {
        if trigger {
            // Control write and data-register select in one transaction; the
            // conversion is not awaited (see the type-level docs).
            self.bus.write_then_read(
                &[Register::CTRL_MEAS.addr(), CTRL_MEAS_FORCED, start.addr()],
                buf,
            )?;
        } else {
            self.bus.read_many(start, buf)?;
        }
        Ok(())
    }
}

impl<I2C, S, I2CError> ForcedBmx280<I2C, S>
where
    I2C: I2c<Error = I2CError>,
{
    /// Soft-reset the chip and drop back to the uninitialized state.
    pub fn reset(mut self) -> Result<ForcedBmx280<I2C, Uninitialized>, Error<I2CError>> {
        self.bus.write_reg(Register::RESET, RESET_KEY)?;
        self.chip_id = ChipId::Unknown;
        self.calib = CalibrationData::default();
        self.t_fine = TFine(0);
        Ok(self.into_state())
    }

    /// Give the I2C bus back.
    pub fn release(self) -> I2C {
        self.bus.release()
    }

    fn into_state<T>(self) -> ForcedBmx280<I2C, T> {
        ForcedBmx280 {
            bus: self.bus,
            capability: self.capability,
            chip_id: self.chip_id,
            calib: self.calib,
            t_fine: self.t_fine,
            _state: PhantomData,
        }
    }
}

//! Fixed-point compensation of raw ADC codes into physical units.
//!
//! The formulas reproduce the vendor reference code bit for bit (BMP280
//! datasheet section 3.11.3, BME280 datasheet section 4.2.3). Intermediates are
//! signed 32-bit; the spots where the reference relies on modular unsigned
//! arithmetic use explicit wrapping operations.

use crate::calibration::{HumidityCalib, PressureCalib, TemperatureCalib};

/// Fine-resolution temperature intermediate.
///
/// Produced by [`compensate_temperature`] and consumed by the pressure and
/// humidity conversions of the same measurement. Threading it explicitly keeps
/// the ordering dependency visible at the call sites.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct TFine(pub(crate) i32);

/// Convert a raw 20-bit temperature code into hundredths of a degree Celsius.
///
/// Also yields the fine temperature required by the other two conversions.
pub(crate) fn compensate_temperature(adc: u32, calib: &TemperatureCalib) -> (i32, TFine) {
    let adc = adc as i32;
    let dig_t1 = calib.dig_t1 as i32;

    let var1 = (((adc >> 3) - (dig_t1 << 1)) * (calib.dig_t2 as i32)) >> 11;
    let mut var2 = (((adc >> 4) - dig_t1) * ((adc >> 4) - dig_t1)) >> 12;
    var2 = (var2 * (calib.dig_t3 as i32)) >> 14;

    let t_fine = var1 + var2;
    let temperature = (t_fine * 5 + 128) >> 8;
    (temperature, TFine(t_fine))
}

/// Convert a raw 20-bit pressure code into Pascal.
///
/// Returns 0 when the intermediate divisor is zero; the vendor defines this
/// sentinel instead of an error.
pub(crate) fn compensate_pressure(adc: u32, calib: &PressureCalib, t_fine: TFine) -> u32 {
    let adc = adc as i32;

    let mut var1 = (t_fine.0 >> 1) - 64000;
    let mut var2 = (((var1 >> 2) * (var1 >> 2)) >> 11) * (calib.dig_p6 as i32);
    var2 += (var1 * (calib.dig_p5 as i32)) << 1;
    var2 = (var2 >> 2) + ((calib.dig_p4 as i32) << 16);
    var1 = ((((calib.dig_p3 as i32) * (((var1 >> 2) * (var1 >> 2)) >> 13)) >> 3)
        + (((calib.dig_p2 as i32) * var1) >> 1))
        >> 18;
    var1 = ((32768 + var1) * (calib.dig_p1 as i32)) >> 15;

    if var1 == 0 {
        return 0;
    }

    let mut p = ((1048576 - adc) as u32)
        .wrapping_sub((var2 >> 12) as u32)
        .wrapping_mul(3125);
    if p < 0x8000_0000 {
        p = (p << 1) / (var1 as u32);
    } else {
        p = (p / (var1 as u32)) * 2;
    }

    let var1 = ((calib.dig_p9 as i32) * ((((p >> 3).wrapping_mul(p >> 3)) >> 13) as i32)) >> 12;
    let var2 = (((p >> 2) as i32) * (calib.dig_p8 as i32)) >> 13;
    ((p as i32).wrapping_add((var1 + var2 + (calib.dig_p7 as i32)) >> 4)) as u32
}

/// Convert a raw 16-bit humidity code into hundredths of a percent relative
/// humidity.
///
/// The intermediate is clamped to `[0, 419430400]` before final scaling, so the
/// result stays within `0..=10000`.
pub(crate) fn compensate_humidity(adc: u16, calib: &HumidityCalib, t_fine: TFine) -> u32 {
    let adc = adc as i32;
    let dig_h1 = calib.dig_h1 as i32;
    let dig_h2 = calib.dig_h2 as i32;
    let dig_h3 = calib.dig_h3 as i32;
    let dig_h4 = calib.dig_h4 as i32;
    let dig_h5 = calib.dig_h5 as i32;
    let dig_h6 = calib.dig_h6 as i32;

    let var1 = t_fine.0 - 76800;
    let var2 = ((adc << 14) - (dig_h4 << 20) - dig_h5 * var1 + 16384) >> 15;
    let var3 = (((((var1 * dig_h6) >> 10) * (((var1 * dig_h3) >> 11) + 32768)) >> 10) + 2097152)
        * dig_h2
        + 8192;
    let mut var4 = var2.wrapping_mul(var3 >> 14);
    var4 -= ((((var4 >> 15) * (var4 >> 15)) >> 7) * dig_h1) >> 4;
    let var4 = var4.clamp(0, 419_430_400);

    (((var4 >> 12) as u32) * 25) >> 8
}

#[cfg(test)]
mod tests {
    use super::*;

    // Coefficient set and raw codes from the BMP280 datasheet calculation
    // example (section 3.12).
    const TEMP_CALIB: TemperatureCalib = TemperatureCalib {
        dig_t1: 27504,
        dig_t2: 26435,
        dig_t3: -1000,
    };
    const PRESS_CALIB: PressureCalib = PressureCalib {
        dig_p1: 36477,
        dig_p2: -10685,
        dig_p3: 3024,
        dig_p4: 2855,
        dig_p5: 140,
        dig_p6: -7,
        dig_p7: 15500,
        dig_p8: -14600,
        dig_p9: 6000,
    };
    const HUM_CALIB: HumidityCalib = HumidityCalib {
        dig_h1: 75,
        dig_h2: 355,
        dig_h3: 0,
        dig_h4: 333,
        dig_h5: 50,
        dig_h6: 30,
    };

    #[test]
    fn temperature_matches_datasheet_example() {
        let (temperature, t_fine) = compensate_temperature(519888, &TEMP_CALIB);
        assert_eq!(temperature, 2508); // 25.08 degC
        assert_eq!(t_fine.0, 128422);
    }

    #[test]
    fn pressure_matches_datasheet_example() {
        let pressure = compensate_pressure(415148, &PRESS_CALIB, TFine(128422));
        assert_eq!(pressure, 100656); // Pa
    }

    #[test]
    fn pressure_zero_divisor_returns_zero() {
        // dig_p1 = 0 forces the var1 divisor to zero regardless of the raw code.
        let calib = PressureCalib::default();
        assert_eq!(compensate_pressure(415148, &calib, TFine(128422)), 0);
        assert_eq!(compensate_pressure(0, &calib, TFine(0)), 0);
    }

    #[test]
    fn humidity_nominal() {
        let humidity = compensate_humidity(28000, &HUM_CALIB, TFine(128422));
        assert_eq!(humidity, 3600); // 36.00 %
    }

    #[test]
    fn humidity_clamps_low_to_zero() {
        let humidity = compensate_humidity(0, &HUM_CALIB, TFine(128422));
        assert_eq!(humidity, 0);
    }

    #[test]
    fn humidity_clamps_high_to_full_scale() {
        let humidity = compensate_humidity(65535, &HUM_CALIB, TFine(128422));
        assert_eq!(humidity, 10000); // 100.00 %
    }
}

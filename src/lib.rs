//!
//! Forced-mode BMP280/BME280 embedded-hal I2C driver crate
//!
//! A platform agnostic driver for the Bosch BMP280 (temperature + pressure) and
//! BME280 (temperature + pressure + humidity) sensors via I2C through
//! [embedded-hal]. The sensor is operated exclusively in forced mode: every
//! reading is a one-shot conversion after which the chip goes back to sleep,
//! which keeps standby consumption in the sub-microamp range and fits
//! battery-powered loggers that sample on their own schedule.
//!
//! Factory calibration is read once at [`ForcedBmx280::init`] and the vendor's
//! fixed-point compensation runs on the host, so no floating point hardware is
//! required; the [`Temperature`], [`Pressure`] and [`Humidity`] results carry
//! hundredth-resolution integers with float accessors on top.
//!
//! [embedded-hal]: https://docs.rs/embedded-hal

#![no_std]

mod bus;
mod calibration;
mod codec;
mod compensate;
mod device;
mod measurement;
mod register;

pub use device::Capability;
pub use device::ChipId;
pub use device::Error;
pub use device::ForcedBmx280;
pub use device::Ready;
pub use device::Status;
pub use device::Uninitialized;
pub use device::{ADDRESS_PRIMARY, ADDRESS_SECONDARY};
pub use measurement::{Humidity, Pressure, Temperature};
pub use register::Register;

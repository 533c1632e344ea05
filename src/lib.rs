//! DHT11 Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic, bit-banged driver for the DHT11
//! temperature and humidity sensor. It needs nothing but one
//! direction-switchable GPIO pin and a free-running microsecond counter: no
//! UART, DMA or edge-capture interrupts.
//!
//! # Features
//! - Blocking synchronous API; every wait is a bounded busy poll
//! - Hardware access behind the small [`TimedLine`] trait, with an
//!   [`OpenDrainLine`] adapter for `embedded-hal` pins
//! - Re-tunable [`Timing`] for counters that do not tick at 1 µs
//! - [`IndicatorBank`] and [`Monitor`] for the classic "read, show, wait" loop
//! - Designed for `no_std` environments
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access
//! - [`DelayNs`] for the start signal and the pause between reads
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and emits log events
//!
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod dht11;
pub mod error;
pub mod line;
pub mod monitor;
pub mod reading;
pub mod report;

#[cfg(test)]
mod testing;

pub use config::{Ticks, Timing};
pub use dht11::Dht11;
pub use error::{DhtError, ErrorKind};
pub use line::{FreeRunningCounter, LineError, Mode, OpenDrainLine, TimedLine};
pub use monitor::{Monitor, MonitorConfig};
pub use reading::{Frame, Reading};
pub use report::{IndicatorBank, Report};

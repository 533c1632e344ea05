use crate::error::DhtError;

/// The five raw bytes of one transfer, in wire order.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Humidity, humidity fraction, temperature, temperature fraction, checksum.
    pub bytes: [u8; 5],
}

/// A checksum-validated DHT11 measurement.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reading {
    /// Relative humidity, integer percent.
    pub humidity_int: u8,
    /// Relative humidity, fractional part (tenths).
    pub humidity_frac: u8,
    /// Temperature, integer degrees Celsius.
    pub temp_int: u8,
    /// Temperature, fractional part (tenths).
    pub temp_frac: u8,
}

/// Sum of the four data bytes modulo 256.
pub fn checksum(data: [u8; 4]) -> u8 {
    data.iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
}

impl Frame {
    /// Wraps five bytes as received, checksum last.
    pub const fn new(bytes: [u8; 5]) -> Self {
        Frame { bytes }
    }

    /// The four data bytes, without the checksum.
    pub fn data(&self) -> [u8; 4] {
        let [h1, h2, t1, t2, _] = self.bytes;
        [h1, h2, t1, t2]
    }

    /// The checksum byte sent by the sensor.
    pub fn checksum(&self) -> u8 {
        self.bytes[4]
    }

    /// Checks the checksum byte and converts the frame into a [`Reading`].
    ///
    /// # Errors
    ///
    /// Returns `DhtError::ChecksumMismatch` if the checksum byte differs from
    /// the sum of the data bytes.
    pub fn validate<E>(&self) -> Result<Reading, DhtError<E>> {
        if checksum(self.data()) != self.checksum() {
            return Err(DhtError::ChecksumMismatch);
        }
        let [humidity_int, humidity_frac, temp_int, temp_frac] = self.data();
        Ok(Reading {
            humidity_int,
            humidity_frac,
            temp_int,
            temp_frac,
        })
    }
}

impl Reading {
    /// Integer-degree temperature, the value shown on the indicators.
    pub fn temperature(&self) -> u8 {
        self.temp_int
    }

    /// Temperature in degrees Celsius, fraction byte taken as tenths.
    pub fn temperature_celsius(&self) -> f32 {
        self.temp_int as f32 + self.temp_frac as f32 / 10.0
    }

    /// Relative humidity in percent, fraction byte taken as tenths.
    pub fn relative_humidity(&self) -> f32 {
        self.humidity_int as f32 + self.humidity_frac as f32 / 10.0
    }
}

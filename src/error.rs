use core::fmt;

/// Possible errors from the DHT11 driver.
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// A data bit did not complete within the per-bit bound.
    Timeout,
    /// The sensor did not acknowledge the start signal.
    NoResponse,
    /// Checksum did not match the received data.
    ChecksumMismatch,
    /// Error from the data line (pin or mode).
    Pin(E),
}

impl<E> DhtError<E> {
    /// Drops the line error payload, keeping only what went wrong.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DhtError::Timeout => ErrorKind::Timeout,
            DhtError::NoResponse => ErrorKind::NoResponse,
            DhtError::ChecksumMismatch => ErrorKind::ChecksumMismatch,
            DhtError::Pin(_) => ErrorKind::Pin,
        }
    }
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::Pin(value)
    }
}

impl<E: fmt::Debug> fmt::Display for DhtError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DhtError::Pin(err) => write!(f, "data line error: {:?}", err),
            other => fmt::Display::fmt(&other.kind(), f),
        }
    }
}

/// Payload-free error classification, handed to reporters.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A data bit did not complete in time.
    Timeout,
    /// No acknowledgement to the start signal.
    NoResponse,
    /// All bits arrived but the checksum disagrees.
    ChecksumMismatch,
    /// The data line itself failed.
    Pin,
}

impl ErrorKind {
    /// Numeric code shown on an indicator display.
    ///
    /// Every kind has its own code and all of them fit in five bits.
    pub const fn code(self) -> u8 {
        match self {
            ErrorKind::Timeout => 0x01,
            ErrorKind::NoResponse => 0x02,
            ErrorKind::ChecksumMismatch => 0x03,
            ErrorKind::Pin => 0x04,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Timeout => "timed out waiting for a data bit",
            ErrorKind::NoResponse => "sensor did not respond to the start signal",
            ErrorKind::ChecksumMismatch => "checksum did not match the received data",
            ErrorKind::Pin => "data line error",
        })
    }
}

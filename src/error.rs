use thiserror::Error;

/// Errors that can occur when talking to a uDMX interface.
///
/// The three variants separate the failure stages of a request: bad caller
/// input (no device I/O was attempted), failure to reach the device, and
/// failure of the control transfer itself. All of them are recoverable.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller input was rejected before any device interaction.
    #[error("Invalid channel range: {0}")]
    Validation(#[from] ValidationError),
    /// The device could not be found or opened.
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),
    /// The control transfer failed or timed out.
    #[error("Transfer failed: {0}")]
    Transport(#[from] TransportError),
}

impl Error {
    /// Returns `true` if the request was rejected before touching the device.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Returns `true` if the device could not be found or opened.
    pub fn is_device(&self) -> bool {
        matches!(self, Error::Device(_))
    }

    /// Returns `true` if the control transfer itself failed.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// Reasons an address/value pair of sequences cannot be packed into a
/// single contiguous channel range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// No addresses were supplied.
    #[error("Addresses must not be empty")]
    EmptyAddresses,
    /// No values were supplied.
    #[error("Channel values must not be empty")]
    EmptyValues,
    /// The two sequences differ in length.
    #[error(
        "Address and value sequences differ in length ({addresses} addresses, {values} values)"
    )]
    LengthMismatch {
        /// Number of addresses supplied.
        addresses: usize,
        /// Number of values supplied.
        values: usize,
    },
    /// More channels than a DMX512 frame can hold.
    #[error("A DMX512 frame holds at most {max} channels, got {actual}")]
    TooManyChannels {
        /// Channel limit of one universe.
        max: usize,
        /// Number of channels requested.
        actual: usize,
    },
    /// An address lies outside 1-512.
    #[error("Address {address} at position {index} is out of range (1-512)")]
    AddressOutOfRange {
        /// Position in the input sequence.
        index: usize,
        /// The offending address after numeric narrowing.
        address: i64,
    },
    /// A channel value lies outside 0-255.
    #[error("Value {value} at position {index} is out of range (0-255)")]
    ValueOutOfRange {
        /// Position in the input sequence.
        index: usize,
        /// The offending value after numeric narrowing.
        value: i64,
    },
    /// A fractional number was supplied while the policy rejects them.
    #[error("Input {input} at position {index} is not an integer")]
    NonIntegral {
        /// Position in the input sequence.
        index: usize,
        /// The raw host value.
        input: f64,
    },
    /// NaN or an infinity was supplied.
    #[error("Input {input} at position {index} is not a finite number")]
    NotFinite {
        /// Position in the input sequence.
        index: usize,
        /// The raw host value.
        input: f64,
    },
    /// Addresses do not increase one by one.
    #[error(
        "Addresses must increase one by one: position {index} holds {current} after {previous}"
    )]
    NonContiguous {
        /// Position of the first address that breaks the run.
        index: usize,
        /// The address before it.
        previous: i64,
        /// The address that breaks the run.
        current: i64,
    },
}

/// Failures locating or opening the uDMX device.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// No device with the profile's vendor/product ID is attached.
    #[error("Device not found with VID/PID {vendor_id:04X}:{product_id:04X}")]
    NotFound {
        /// Vendor ID searched for.
        vendor_id: u16,
        /// Product ID searched for.
        product_id: u16,
    },
    /// A matching device exists but none carries the requested serial number.
    #[error("Device not found with serial number '{serial}'")]
    NotFoundBySerial {
        /// The serial number that was searched for.
        serial: String,
    },
    /// libusb could not be initialised.
    #[error("Failed to initialise USB context: {0}")]
    Init(#[source] rusb::Error),
    /// The USB device list could not be read.
    #[error("Failed to enumerate USB devices: {0}")]
    Enumerate(#[source] rusb::Error),
    /// The device was found but could not be opened.
    #[error("Failed to open device: {0}")]
    Open(#[source] rusb::Error),
    /// A device descriptor could not be read.
    #[error("Failed to read device descriptor: {0}")]
    Descriptor(#[source] rusb::Error),
}

/// Failures of the vendor control transfer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The device did not complete the transfer within the timeout.
    #[error("Timeout waiting for device to accept the control transfer")]
    Timeout,
    /// The underlying USB stack reported an error.
    #[error("USB error: {0}")]
    Usb(rusb::Error),
    /// Fewer payload bytes were accepted than were sent.
    #[error("Short write: device accepted {actual} of {expected} bytes")]
    ShortWrite {
        /// Payload length sent.
        expected: usize,
        /// Bytes the device reported as transferred.
        actual: usize,
    },
}

impl From<rusb::Error> for TransportError {
    fn from(err: rusb::Error) -> Self {
        match err {
            rusb::Error::Timeout => TransportError::Timeout,
            other => TransportError::Usb(other),
        }
    }
}

/// Result type alias for uDMX operations.
pub type Result<T> = std::result::Result<T, Error>;

//! # udmx
//!
//! A Rust crate for writing DMX512 channel values through a uDMX USB
//! dongle (Anyma uDMX and compatible V-USB firmware).
//!
//! This crate uses the `rusb` crate (libusb) for cross-platform USB access.
//!
//! ## Features
//!
//! *   Device discovery (`list_devices`, `find_devices`).
//! *   Configurable device selection (`DeviceProfile`: VID/PID, serial number, timeout).
//! *   Channel range writes:
//!     *   1-based addresses (1-512) as printed on fixtures, 0-based on the wire.
//!     *   Strict validation: equal lengths, at most 512 channels, in-range
//!         addresses and values, addresses increasing one by one.
//!     *   One vendor control transfer per range (`send_channel_range`, `send`).
//! *   Single channel writes (`set_channel`).
//! *   Device probe (`probe`) and a fixed-sample communication test (`comm_test`).
//! *   A `Connector`/`ControlTransport` seam so the protocol logic can be
//!     driven without hardware.
//!
//! ## Protocol
//!
//! A channel range is sent as a host-to-device vendor control transfer:
//!
//! | Field           | Value                              |
//! |-----------------|------------------------------------|
//! | `bmRequestType` | `0x40` (OUT, vendor, device)       |
//! | `bRequest`      | `2` (set channel range)            |
//! | `wValue`        | channel count                      |
//! | `wIndex`        | 0-based start address              |
//! | `wLength`       | channel count                      |
//! | data            | one byte per channel, address order|
//!
//! The dongle firmware refreshes the DMX bus on its own; every call is a
//! one-shot write with no state kept between calls.
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! udmx = "0.1.0"
//! log = "0.4"          # Optional, for logging
//!
//! [dev-dependencies]   # For demos/tests
//! env_logger = "0.11"
//! ```
//!
//! libusb must be available on the system. See the [`rusb` crate documentation](https://docs.rs/rusb/).
//!
//! ## Basic Usage
//!
//! ```no_run
//! use udmx::{DeviceProfile, Result, Udmx};
//!
//! fn main() -> Result<()> {
//!     // Optional: Initialize logging
//!     // env_logger::init();
//!
//!     let udmx = Udmx::new(DeviceProfile::default())?;
//!
//!     // Fixture at address 100: dimmer, R, G, B, strobe.
//!     let sent = udmx.send_channels(&[100, 101, 102, 103, 104], &[10, 255, 255, 0, 0])?;
//!     println!("Transferred {} bytes", sent);
//!
//!     udmx.set_channel(1, 255)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Hardware Setup Notes
//!
//! *   **Linux udev Rules:** Grant user permission to the USB device. Create `/etc/udev/rules.d/99-udmx.rules`:
//!     ```udev
//!     SUBSYSTEM=="usb", ATTRS{idVendor}=="16c0", ATTRS{idProduct}=="05dc", MODE="0666", GROUP="plugdev"
//!     ```
//!     Reload: `sudo udevadm control --reload-rules && sudo udevadm trigger`
//! *   **Windows:** Bind the device to a libusb-compatible driver (e.g. libusbK or WinUSB via Zadig).
//!
//! ## License
//!
//! This project is licensed under the WTFPL.

mod channel;
mod config;
mod consts;
mod device;
mod error;
mod request;

pub use channel::{ChannelRange, DmxAddress, NumericPolicy};
pub use config::DeviceProfile;
pub use device::{
    find_devices, list_devices, Connector, Udmx, UdmxDeviceInfo, UsbConnector, UsbSession,
};
pub use error::{DeviceError, Error, Result, TransportError, ValidationError};
pub use request::{
    send_channel_range, transfer_channel_range, transfer_single_channel, ControlRequest,
    ControlTransport,
};
// Re-export only essential public constants
pub use consts::{DEFAULT_TRANSFER_TIMEOUT, DMX_UNIVERSE_SIZE, UDMX_PID, UDMX_VID};

/// Firmware opcodes, for callers building their own [`ControlRequest`]s.
pub mod opcodes {
    pub use crate::consts::cmd::{SET_CHANNEL_RANGE, SET_SINGLE_CHANNEL};
    pub use crate::consts::REQUEST_TYPE_VENDOR_OUT;
}

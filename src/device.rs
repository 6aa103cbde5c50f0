//! Device discovery, USB sessions and the [`Udmx`] handle.

use crate::channel::{ChannelRange, DmxAddress};
use crate::config::DeviceProfile;
use crate::error::{DeviceError, Result, TransportError};
use crate::request::{self, ControlRequest, ControlTransport};
use log::{debug, trace, warn};
use rusb::{Context, Device, DeviceHandle, UsbContext};
use std::fmt;
use std::time::Duration;

// Fixed sample for `Udmx::comm_test`: dimmer, R, G, B, strobe of a fixture at 100.
const COMM_TEST_ADDRESSES: [u16; 5] = [100, 101, 102, 103, 104];
const COMM_TEST_VALUES: [u8; 5] = [10, 255, 255, 0, 0];

/// Information about a USB device seen during enumeration.
///
/// String descriptors are `None` when the device could not be opened to read
/// them (commonly a permissions issue) or does not provide them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdmxDeviceInfo {
    pub bus_number: u8,
    pub address: u8,
    pub vendor_id: u16,
    pub product_id: u16,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
}

impl fmt::Display for UdmxDeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04X}:{:04X} (bus {:03} addr {:03}): {} - {}",
            self.vendor_id,
            self.product_id,
            self.bus_number,
            self.address,
            self.product.as_deref().unwrap_or("Unknown"),
            self.manufacturer.as_deref().unwrap_or("Unknown")
        )
    }
}

/// Lists every USB device visible to `context`.
/// An empty list is not an error.
pub fn list_devices<T: UsbContext>(context: &T) -> Result<Vec<UdmxDeviceInfo>> {
    let devices = context.devices().map_err(DeviceError::Enumerate)?;
    let mut infos = Vec::new();
    for device in devices.iter() {
        match describe(&device) {
            Ok(info) => infos.push(info),
            Err(e) => warn!(
                "Skipping device at bus {:03} addr {:03}: {}",
                device.bus_number(),
                device.address(),
                e
            ),
        }
    }
    Ok(infos)
}

/// Lists devices matching the profile's vendor/product ID and, if set, its
/// serial number.
pub fn find_devices<T: UsbContext>(
    context: &T,
    profile: &DeviceProfile,
) -> Result<Vec<UdmxDeviceInfo>> {
    Ok(select_devices(list_devices(context)?, profile))
}

fn select_devices(devices: Vec<UdmxDeviceInfo>, profile: &DeviceProfile) -> Vec<UdmxDeviceInfo> {
    devices
        .into_iter()
        .filter(|info| profile.matches_ids(info.vendor_id, info.product_id))
        .filter(|info| match &profile.serial_number {
            Some(serial) => info.serial_number.as_deref() == Some(serial.as_str()),
            None => true,
        })
        .inspect(|info| debug!("Found uDMX device: {}", info))
        .collect()
}

fn describe<T: UsbContext>(
    device: &Device<T>,
) -> std::result::Result<UdmxDeviceInfo, DeviceError> {
    let desc = device.device_descriptor().map_err(DeviceError::Descriptor)?;
    let mut info = UdmxDeviceInfo {
        bus_number: device.bus_number(),
        address: device.address(),
        vendor_id: desc.vendor_id(),
        product_id: desc.product_id(),
        manufacturer: None,
        product: None,
        serial_number: None,
    };
    match device.open() {
        Ok(handle) => {
            info.manufacturer = handle.read_manufacturer_string_ascii(&desc).ok();
            info.product = handle.read_product_string_ascii(&desc).ok();
            info.serial_number = handle.read_serial_number_string_ascii(&desc).ok();
        }
        Err(e) => trace!(
            "Cannot open {:04X}:{:04X} to read strings: {}",
            info.vendor_id,
            info.product_id,
            e
        ),
    }
    Ok(info)
}

/// Opens sessions to a DMX interface.
///
/// A session is closed when it is dropped, so every exit path of a caller
/// that owns one releases the device.
pub trait Connector {
    type Session: ControlTransport;

    /// Opens a session to the device described by `profile`.
    fn open_session(
        &self,
        profile: &DeviceProfile,
    ) -> std::result::Result<Self::Session, DeviceError>;
}

/// [`Connector`] backed by libusb.
pub struct UsbConnector {
    context: Context,
}

impl fmt::Debug for UsbConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsbConnector").finish_non_exhaustive()
    }
}

impl UsbConnector {
    /// Creates a connector with its own libusb context.
    pub fn new() -> Result<Self> {
        let context = Context::new().map_err(DeviceError::Init)?;
        Ok(UsbConnector { context })
    }

    /// Lists every USB device visible to this connector.
    pub fn list_devices(&self) -> Result<Vec<UdmxDeviceInfo>> {
        list_devices(&self.context)
    }

    /// Lists devices matching `profile`.
    pub fn find_devices(&self, profile: &DeviceProfile) -> Result<Vec<UdmxDeviceInfo>> {
        find_devices(&self.context, profile)
    }
}

impl Connector for UsbConnector {
    type Session = UsbSession;

    fn open_session(
        &self,
        profile: &DeviceProfile,
    ) -> std::result::Result<UsbSession, DeviceError> {
        let devices = self.context.devices().map_err(DeviceError::Enumerate)?;

        for device in devices.iter() {
            let desc = match device.device_descriptor() {
                Ok(desc) => desc,
                Err(e) => {
                    trace!("Skipping device without readable descriptor: {}", e);
                    continue;
                }
            };
            if !profile.matches_ids(desc.vendor_id(), desc.product_id()) {
                continue;
            }

            let handle = match device.open() {
                Ok(handle) => handle,
                // Another device may still carry the requested serial.
                Err(e) if profile.serial_number.is_some() => {
                    warn!("Cannot open candidate uDMX device: {}", e);
                    continue;
                }
                Err(e) => return Err(DeviceError::Open(e)),
            };
            if let Some(serial) = &profile.serial_number {
                match handle.read_serial_number_string_ascii(&desc) {
                    Ok(found) if &found == serial => {}
                    Ok(found) => {
                        debug!("Skipping uDMX device with serial '{}'", found);
                        continue;
                    }
                    Err(e) => {
                        debug!("Skipping uDMX device, serial unreadable: {}", e);
                        continue;
                    }
                }
            }

            debug!(
                "Opened uDMX device: VID={:04X}, PID={:04X}, Bus={:03}, Addr={:03}",
                desc.vendor_id(),
                desc.product_id(),
                device.bus_number(),
                device.address()
            );
            return Ok(UsbSession {
                handle,
                bus_number: device.bus_number(),
                address: device.address(),
            });
        }

        match &profile.serial_number {
            Some(serial) => Err(DeviceError::NotFoundBySerial {
                serial: serial.clone(),
            }),
            None => Err(DeviceError::NotFound {
                vendor_id: profile.vendor_id,
                product_id: profile.product_id,
            }),
        }
    }
}

/// An open libusb handle to a uDMX device. Closed on drop.
pub struct UsbSession {
    handle: DeviceHandle<Context>,
    bus_number: u8,
    address: u8,
}

impl fmt::Debug for UsbSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsbSession")
            .field("bus_number", &self.bus_number)
            .field("address", &self.address)
            .finish()
    }
}

impl ControlTransport for UsbSession {
    fn control_out(
        &mut self,
        request: &ControlRequest,
        payload: &[u8],
        timeout: Duration,
    ) -> std::result::Result<usize, TransportError> {
        debug_assert_eq!(request.length as usize, payload.len());
        Ok(self.handle.write_control(
            request.request_type,
            request.request,
            request.value,
            request.index,
            payload,
            timeout,
        )?)
    }
}

impl Drop for UsbSession {
    fn drop(&mut self) {
        trace!(
            "Closing uDMX session (bus {:03} addr {:03})",
            self.bus_number,
            self.address
        );
    }
}

/// A handle to a uDMX interface.
///
/// Holds no open device: every operation opens a session, performs at most
/// one control transfer and closes the session again before returning,
/// whether the transfer succeeded or not. Input is validated before the
/// session is opened. Concurrent callers must serialise access themselves.
#[derive(Debug)]
pub struct Udmx<C: Connector = UsbConnector> {
    connector: C,
    profile: DeviceProfile,
}

impl Udmx<UsbConnector> {
    /// Creates a handle talking to real hardware through libusb.
    pub fn new(profile: DeviceProfile) -> Result<Self> {
        Ok(Self::with_connector(UsbConnector::new()?, profile))
    }

    /// Lists attached devices matching this handle's profile.
    pub fn find_devices(&self) -> Result<Vec<UdmxDeviceInfo>> {
        self.connector.find_devices(&self.profile)
    }
}

impl<C: Connector> Udmx<C> {
    /// Creates a handle over any connector, e.g. a mock in tests.
    pub fn with_connector(connector: C, profile: DeviceProfile) -> Self {
        Udmx { connector, profile }
    }

    /// Gets the profile used to select and drive the device.
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Gets the underlying connector.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn open(&self) -> Result<C::Session> {
        Ok(self.connector.open_session(&self.profile)?)
    }

    /// Validates host numeric sequences (1-based addresses, 0-255 values) and
    /// writes them as one contiguous range.
    ///
    /// Returns the number of bytes transferred.
    ///
    /// # Example
    /// ```no_run
    /// # use udmx::{DeviceProfile, Udmx};
    /// # fn main() -> udmx::Result<()> {
    /// let udmx = Udmx::new(DeviceProfile::default())?;
    /// udmx.send_channel_range(&[100.0, 101.0, 102.0], &[255.0, 0.0, 128.0])?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn send_channel_range(&self, addresses: &[f64], values: &[f64]) -> Result<usize> {
        let range = ChannelRange::from_host(addresses, values, self.profile.numeric_policy)?;
        self.send(&range)
    }

    /// Integer variant of [`Udmx::send_channel_range`].
    pub fn send_channels(&self, addresses: &[u16], values: &[u8]) -> Result<usize> {
        let range = ChannelRange::new(addresses, values)?;
        self.send(&range)
    }

    /// Writes a validated range.
    pub fn send(&self, range: &ChannelRange) -> Result<usize> {
        debug!("Writing channel range {}", range);
        let mut session = self.open()?;
        request::transfer_channel_range(&mut session, range, self.profile.timeout)
    }

    /// Sets a single channel (1-512) using the single-channel opcode.
    pub fn set_channel(&self, address: u16, value: u8) -> Result<()> {
        let address = DmxAddress::new(address)?;
        debug!("Setting channel {} to {}", address, value);
        let mut session = self.open()?;
        request::transfer_single_channel(&mut session, address, value, self.profile.timeout)
    }

    /// Opens and immediately closes a session to check the device is reachable.
    pub fn probe(&self) -> Result<()> {
        let session = self.open()?;
        debug!("Device opened, all good.");
        drop(session);
        Ok(())
    }

    /// Sends a fixed five-channel sample (addresses 100-104) to check that
    /// the device accepts control transfers.
    pub fn comm_test(&self) -> Result<usize> {
        let range = ChannelRange::new(&COMM_TEST_ADDRESSES, &COMM_TEST_VALUES)?;
        self.send(&range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(vendor_id: u16, product_id: u16, serial: Option<&str>) -> UdmxDeviceInfo {
        UdmxDeviceInfo {
            bus_number: 1,
            address: 7,
            vendor_id,
            product_id,
            manufacturer: Some("www.anyma.ch".to_string()),
            product: Some("uDMX".to_string()),
            serial_number: serial.map(String::from),
        }
    }

    #[test]
    fn test_device_info_display() {
        let device = info(0x16C0, 0x05DC, None);
        assert_eq!(
            device.to_string(),
            "16C0:05DC (bus 001 addr 007): uDMX - www.anyma.ch"
        );

        let bare = UdmxDeviceInfo {
            manufacturer: None,
            product: None,
            ..info(0x1D6B, 0x0002, None)
        };
        assert_eq!(
            bare.to_string(),
            "1D6B:0002 (bus 001 addr 007): Unknown - Unknown"
        );
    }

    #[test]
    fn test_select_devices_by_ids() {
        let devices = vec![
            info(0x16C0, 0x05DC, Some("A")),
            info(0x1D6B, 0x0002, None),
            info(0x16C0, 0x05DC, None),
        ];
        let selected = select_devices(devices, &DeviceProfile::default());
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|d| d.vendor_id == 0x16C0));
    }

    #[test]
    fn test_select_devices_by_serial() {
        let devices = vec![
            info(0x16C0, 0x05DC, Some("A")),
            info(0x16C0, 0x05DC, Some("B")),
            info(0x16C0, 0x05DC, None),
            info(0x1234, 0x5678, Some("B")),
        ];
        let profile = DeviceProfile::default().with_serial_number("B");
        let selected = select_devices(devices.clone(), &profile);
        assert_eq!(selected, vec![info(0x16C0, 0x05DC, Some("B"))]);

        let profile = DeviceProfile::default().with_serial_number("missing");
        assert!(select_devices(devices, &profile).is_empty());
    }
}

//! Vendor control requests understood by the uDMX firmware.

use crate::channel::{ChannelRange, DmxAddress, NumericPolicy};
use crate::consts;
use crate::error::{Result, TransportError};
use log::{trace, warn};
use std::time::Duration;

/// Setup-packet fields of a vendor control transfer.
///
/// `length` is the size of the data stage that follows the setup packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlRequest {
    /// `bmRequestType`: always host-to-device, vendor, device recipient.
    pub request_type: u8,
    /// `bRequest`: the firmware opcode.
    pub request: u8,
    /// `wValue`
    pub value: u16,
    /// `wIndex`
    pub index: u16,
    /// `wLength`
    pub length: u16,
}

impl ControlRequest {
    /// Encodes "set channel range": `wValue` and `wLength` carry the channel
    /// count, `wIndex` the 0-based start address. The payload is
    /// [`ChannelRange::values`].
    pub fn set_channel_range(range: &ChannelRange) -> Self {
        ControlRequest {
            request_type: consts::REQUEST_TYPE_VENDOR_OUT,
            request: consts::cmd::SET_CHANNEL_RANGE,
            value: range.count(),
            index: range.start_address(),
            length: range.count(),
        }
    }

    /// Encodes "set single channel": the value travels in `wValue`, there is
    /// no data stage.
    pub fn set_single_channel(address: DmxAddress, value: u8) -> Self {
        ControlRequest {
            request_type: consts::REQUEST_TYPE_VENDOR_OUT,
            request: consts::cmd::SET_SINGLE_CHANNEL,
            value: value as u16,
            index: address.wire(),
            length: 0,
        }
    }
}

/// An open session able to issue host-to-device control transfers.
///
/// Implemented by [`crate::UsbSession`] for real hardware. Test code supplies
/// its own implementation to record requests without a device attached.
/// Dropping the session closes it.
pub trait ControlTransport {
    /// Sends one control transfer with `payload` as its data stage and
    /// returns the number of payload bytes the device accepted.
    fn control_out(
        &mut self,
        request: &ControlRequest,
        payload: &[u8],
        timeout: Duration,
    ) -> std::result::Result<usize, TransportError>;
}

/// Sends an already validated range in exactly one control transfer.
///
/// Returns the number of bytes transferred. A transfer that moves fewer
/// bytes than the range holds is reported as [`TransportError::ShortWrite`].
/// Nothing is retried.
pub fn transfer_channel_range<T: ControlTransport + ?Sized>(
    transport: &mut T,
    range: &ChannelRange,
    timeout: Duration,
) -> Result<usize> {
    let request = ControlRequest::set_channel_range(range);
    trace!(
        "Sending set channel range: bmRequestType=0x{:02X}, bRequest={}, wValue={}, wIndex={}, wLength={}, data={:02X?}",
        request.request_type,
        request.request,
        request.value,
        request.index,
        request.length,
        range.values()
    );

    let transferred = transport
        .control_out(&request, range.values(), timeout)
        .inspect_err(|e| warn!("Control transfer for range {} failed: {}", range, e))?;
    trace!("Transferred {} bytes", transferred);

    if transferred != range.values().len() {
        warn!(
            "Short control transfer for range {}: {} of {} bytes",
            range,
            transferred,
            range.values().len()
        );
        return Err(TransportError::ShortWrite {
            expected: range.values().len(),
            actual: transferred,
        }
        .into());
    }
    Ok(transferred)
}

/// Sets one channel with the single-channel opcode.
pub fn transfer_single_channel<T: ControlTransport + ?Sized>(
    transport: &mut T,
    address: DmxAddress,
    value: u8,
    timeout: Duration,
) -> Result<()> {
    let request = ControlRequest::set_single_channel(address, value);
    trace!(
        "Sending set single channel: wValue={}, wIndex={}",
        request.value,
        request.index
    );
    transport
        .control_out(&request, &[], timeout)
        .inspect_err(|e| warn!("Control transfer for channel {} failed: {}", address, e))?;
    Ok(())
}

/// Validates host sequences and writes them to `session` as one range.
///
/// Validation happens first; on failure the session is not touched.
///
/// # Example
/// ```no_run
/// use udmx::{send_channel_range, DeviceProfile, NumericPolicy, UsbConnector, Connector};
///
/// # fn main() -> udmx::Result<()> {
/// let profile = DeviceProfile::default();
/// let connector = UsbConnector::new()?;
/// let mut session = connector.open_session(&profile)?;
/// let sent = send_channel_range(
///     &mut session,
///     &[1.0, 2.0, 3.0],
///     &[255.0, 128.0, 0.0],
///     NumericPolicy::Truncate,
///     profile.timeout,
/// )?;
/// assert_eq!(sent, 3);
/// # Ok(())
/// # }
/// ```
pub fn send_channel_range<T: ControlTransport + ?Sized>(
    session: &mut T,
    addresses: &[f64],
    values: &[f64],
    policy: NumericPolicy,
    timeout: Duration,
) -> Result<usize> {
    let range = ChannelRange::from_host(addresses, values, policy)?;
    transfer_channel_range(session, &range, timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_type_is_vendor_out() {
        let expected = rusb::request_type(
            rusb::Direction::Out,
            rusb::RequestType::Vendor,
            rusb::Recipient::Device,
        );
        assert_eq!(consts::REQUEST_TYPE_VENDOR_OUT, expected);
    }

    #[test]
    fn test_encode_channel_range() {
        let range = ChannelRange::new(&[100, 101, 102, 103, 104], &[10, 255, 255, 0, 0]).unwrap();
        let request = ControlRequest::set_channel_range(&range);
        assert_eq!(
            request,
            ControlRequest {
                request_type: 0x40,
                request: 2,
                value: 5,
                index: 99,
                length: 5,
            }
        );
    }

    #[test]
    fn test_encode_single_channel() {
        let request = ControlRequest::set_single_channel(DmxAddress::new(1).unwrap(), 0xAB);
        assert_eq!(request.request_type, 0x40);
        assert_eq!(request.request, 1);
        assert_eq!(request.value, 0xAB);
        assert_eq!(request.index, 0);
        assert_eq!(request.length, 0);
    }

    #[test]
    fn test_timeout_error_mapping() {
        assert_eq!(
            TransportError::from(rusb::Error::Timeout),
            TransportError::Timeout
        );
        assert_eq!(
            TransportError::from(rusb::Error::Pipe),
            TransportError::Usb(rusb::Error::Pipe)
        );
    }
}

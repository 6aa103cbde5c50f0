//! Device selection and transfer settings.

use crate::channel::NumericPolicy;
use crate::consts;
use std::time::Duration;

/// Which USB device to talk to and how.
///
/// The default targets a stock uDMX (`16C0:05DC`) with the 5 s transfer
/// timeout used by the uDMX command-line tool.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use udmx::{DeviceProfile, NumericPolicy};
///
/// let profile = DeviceProfile::new(0x16C0, 0x05DC)
///     .with_serial_number("ILLUTZMINATOR001")
///     .with_timeout(Duration::from_millis(500))
///     .with_numeric_policy(NumericPolicy::Reject);
/// assert_eq!(profile.timeout, Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    /// USB vendor ID to match.
    pub vendor_id: u16,
    /// USB product ID to match.
    pub product_id: u16,
    /// Only open the device reporting this serial number, if set.
    pub serial_number: Option<String>,
    /// Bound on a single control transfer.
    pub timeout: Duration,
    /// Narrowing rule for host numeric input.
    pub numeric_policy: NumericPolicy,
}

impl DeviceProfile {
    /// A profile for custom vendor/product IDs with default settings otherwise.
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        DeviceProfile {
            vendor_id,
            product_id,
            ..Self::default()
        }
    }

    pub fn with_serial_number(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_numeric_policy(mut self, policy: NumericPolicy) -> Self {
        self.numeric_policy = policy;
        self
    }

    /// Returns `true` if the vendor/product pair matches this profile.
    pub fn matches_ids(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        DeviceProfile {
            vendor_id: consts::UDMX_VID,
            product_id: consts::UDMX_PID,
            serial_number: None,
            timeout: consts::DEFAULT_TRANSFER_TIMEOUT,
            numeric_policy: NumericPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = DeviceProfile::default();
        assert_eq!(profile.vendor_id, 0x16C0);
        assert_eq!(profile.product_id, 0x05DC);
        assert_eq!(profile.serial_number, None);
        assert_eq!(profile.timeout, Duration::from_secs(5));
        assert_eq!(profile.numeric_policy, NumericPolicy::Truncate);
    }

    #[test]
    fn test_custom_ids_keep_defaults() {
        let profile = DeviceProfile::new(0x1234, 0x5678);
        assert!(profile.matches_ids(0x1234, 0x5678));
        assert!(!profile.matches_ids(0x16C0, 0x05DC));
        assert_eq!(profile.timeout, consts::DEFAULT_TRANSFER_TIMEOUT);
    }
}

//! Internal constants: USB identifiers, firmware opcodes and protocol limits.

use std::time::Duration;

// Default Vendor/Product IDs
/// Shared V-USB vendor ID (van Ooijen Technische Informatica) used by uDMX.
pub const UDMX_VID: u16 = 0x16C0;
/// Shared V-USB product ID for vendor-class devices, used by uDMX.
pub const UDMX_PID: u16 = 0x05DC;

/// Number of channels in one DMX512 universe.
pub const DMX_UNIVERSE_SIZE: usize = 512;
/// Lowest user-facing (1-based) DMX address.
pub const DMX_ADDRESS_MIN: u16 = 1;
/// Highest user-facing (1-based) DMX address.
pub const DMX_ADDRESS_MAX: u16 = 512;

/// Default timeout for a control transfer. Matches the uDMX command-line tool.
pub const DEFAULT_TRANSFER_TIMEOUT: Duration = Duration::from_millis(5000);

// --- Vendor Requests (Control Transfer) ---
// bmRequestType: host-to-device | vendor | device recipient.
pub const REQUEST_TYPE_VENDOR_OUT: u8 = 0x40;

pub mod cmd {
    /// wValue = channel value, wIndex = 0-based channel, no data stage.
    pub const SET_SINGLE_CHANNEL: u8 = 1;
    /// wValue = channel count, wIndex = 0-based start channel, data = values.
    pub const SET_CHANNEL_RANGE: u8 = 2;
}

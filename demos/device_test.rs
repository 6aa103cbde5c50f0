//! Opens and closes the uDMX device.
//!
//! Run with: cargo run --example device_test

use udmx::{DeviceProfile, Result, Udmx};

fn main() -> Result<()> {
    env_logger::init();

    let udmx = Udmx::new(DeviceProfile::default())?;
    match udmx.probe() {
        Ok(()) => println!("✓ Device opened and closed."),
        Err(e) => {
            eprintln!("✗ Failed to open device: {}", e);
            eprintln!("Ensure the dongle is connected and permissions are set (e.g., udev rules on Linux).");
            return Err(e);
        }
    }
    Ok(())
}

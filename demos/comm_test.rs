//! Sends a fixed five-channel sample (DIM, R, G, B, STROBE at address 100).
//!
//! Run with: cargo run --example comm_test

use udmx::{DeviceProfile, Result, Udmx};

fn main() -> Result<()> {
    env_logger::init();

    let udmx = Udmx::new(DeviceProfile::default())?;
    println!("Sending data to the device.");
    let transferred = udmx.comm_test()?;
    println!("Transferred {} bytes.", transferred);
    Ok(())
}

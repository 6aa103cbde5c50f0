//! Lists USB devices and highlights the ones matching the default uDMX profile.
//!
//! Run with: cargo run --example list_devices

use udmx::{DeviceProfile, UsbConnector};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let connector = UsbConnector::new()?;
    let devices = connector.list_devices()?;
    if devices.is_empty() {
        println!("No USB devices detected.");
        return Ok(());
    }

    println!("\nFound the following USB devices:");
    for device in &devices {
        println!("  {}", device);
    }

    let profile = DeviceProfile::default();
    let matching = connector.find_devices(&profile)?;
    println!(
        "\n{} device(s) match {:04X}:{:04X}",
        matching.len(),
        profile.vendor_id,
        profile.product_id
    );
    for device in &matching {
        println!(
            "  Serial: {}",
            device.serial_number.as_deref().unwrap_or("N/A")
        );
    }
    Ok(())
}

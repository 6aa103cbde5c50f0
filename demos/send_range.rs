//! Writes a contiguous channel range given on the command line.
//!
//! Run with: cargo run --example send_range -- <start address> <value>...
//! e.g. `cargo run --example send_range -- 100 10 255 255 0 0`
//!
//! Values are parsed as numbers and narrowed like host numeric input, so
//! `127.9` is sent as `127`.

use std::env;
use std::process::ExitCode;
use udmx::{ChannelRange, DeviceProfile, Udmx};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("Usage: send_range <start address 1-512> <value 0-255>...");
        return ExitCode::FAILURE;
    }

    let numbers: Result<Vec<f64>, _> = args.iter().map(|a| a.parse::<f64>()).collect();
    let numbers = match numbers {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Arguments must be numbers: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let start = numbers[0];
    let values = &numbers[1..];
    let addresses: Vec<f64> = (0..values.len()).map(|i| start + i as f64).collect();

    let profile = DeviceProfile::default();
    // Dry run first so input mistakes are reported without touching USB.
    match ChannelRange::from_host(&addresses, values, profile.numeric_policy) {
        Ok(range) => println!("All sanity checks passed, converted address range: {}", range),
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    let result = Udmx::new(profile).and_then(|udmx| udmx.send_channel_range(&addresses, values));
    match result {
        Ok(sent) => {
            println!("Transferred {} bytes.", sent);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

//! Validation and packing of DMX channel ranges.
//!
//! Callers address channels the way DMX512 fixtures are labelled (1-512).
//! The dongle expects 0-based wire addresses (0-511) and a single contiguous
//! run per request, so everything here ends in a [`ChannelRange`].

use crate::consts;
use crate::error::ValidationError;
use std::fmt;

/// How fractional host numbers are narrowed to channel addresses and values.
///
/// Host runtimes that marshal numeric arrays typically hand over `f64`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericPolicy {
    /// Truncate toward zero (`100.7` becomes `100`, `-0.5` becomes `0`).
    #[default]
    Truncate,
    /// Reject any input with a fractional part.
    Reject,
}

/// Represents a valid user-facing DMX address (1-512).
/// Use `DmxAddress::new(num)` to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DmxAddress(u16);

impl DmxAddress {
    /// Creates a new DmxAddress, returning an error if the number is out of range (1-512).
    pub fn new(address: u16) -> Result<Self, ValidationError> {
        if (consts::DMX_ADDRESS_MIN..=consts::DMX_ADDRESS_MAX).contains(&address) {
            Ok(DmxAddress(address))
        } else {
            Err(ValidationError::AddressOutOfRange {
                index: 0,
                address: address as i64,
            })
        }
    }

    /// Returns the 1-based channel number.
    #[inline]
    pub fn number(&self) -> u16 {
        self.0
    }

    /// Returns the 0-based address the dongle uses on the wire.
    #[inline]
    pub fn wire(&self) -> u16 {
        self.0 - 1
    }
}

impl fmt::Display for DmxAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated, contiguous run of channel values ready to go on the wire.
///
/// Invariants: `1 <= count <= 512`, `start_address + count - 1 <= 511`, and
/// `values.len() == count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRange {
    start_address: u16,
    count: u16,
    values: Vec<u8>,
}

impl ChannelRange {
    /// Packs integer addresses (1-512) and values into a range.
    pub fn new(addresses: &[u16], values: &[u8]) -> Result<Self, ValidationError> {
        check_shape(addresses.len(), values.len())?;
        let addresses: Vec<i64> = addresses.iter().map(|&a| a as i64).collect();
        let values: Vec<i64> = values.iter().map(|&v| v as i64).collect();
        pack(&addresses, &values)
    }

    /// Packs host numeric sequences, narrowing them according to `policy`.
    ///
    /// Checks run in a fixed order and the first failure wins: emptiness,
    /// length mismatch, frame size, per-element range, then contiguity.
    ///
    /// # Example
    /// ```
    /// use udmx::{ChannelRange, NumericPolicy};
    ///
    /// let range = ChannelRange::from_host(
    ///     &[100.0, 101.0, 102.0, 103.0, 104.0],
    ///     &[10.0, 255.0, 255.0, 0.0, 0.0],
    ///     NumericPolicy::Truncate,
    /// )?;
    /// assert_eq!(range.start_address(), 99);
    /// assert_eq!(range.count(), 5);
    /// # Ok::<(), udmx::ValidationError>(())
    /// ```
    pub fn from_host(
        addresses: &[f64],
        values: &[f64],
        policy: NumericPolicy,
    ) -> Result<Self, ValidationError> {
        check_shape(addresses.len(), values.len())?;

        let mut narrowed_addresses = Vec::with_capacity(addresses.len());
        for (index, &input) in addresses.iter().enumerate() {
            let address = narrow(index, input, policy)?;
            check_address(index, address)?;
            narrowed_addresses.push(address);
        }
        let mut narrowed_values = Vec::with_capacity(values.len());
        for (index, &input) in values.iter().enumerate() {
            let value = narrow(index, input, policy)?;
            check_value(index, value)?;
            narrowed_values.push(value);
        }

        // Steps are measured on the caller's numbers, before narrowing.
        for (index, pair) in addresses.windows(2).enumerate() {
            if pair[1] - pair[0] != 1.0 {
                return Err(ValidationError::NonContiguous {
                    index: index + 1,
                    previous: narrowed_addresses[index],
                    current: narrowed_addresses[index + 1],
                });
            }
        }

        pack(&narrowed_addresses, &narrowed_values)
    }

    /// A one-channel range.
    pub fn single(address: DmxAddress, value: u8) -> Self {
        ChannelRange {
            start_address: address.wire(),
            count: 1,
            values: vec![value],
        }
    }

    /// 0-based wire address of the first channel.
    #[inline]
    pub fn start_address(&self) -> u16 {
        self.start_address
    }

    /// Number of contiguous channels.
    #[inline]
    pub fn count(&self) -> u16 {
        self.count
    }

    /// 0-based wire address of the last channel.
    #[inline]
    pub fn end_address(&self) -> u16 {
        self.start_address + self.count - 1
    }

    /// Channel values in address order.
    #[inline]
    pub fn values(&self) -> &[u8] {
        &self.values
    }
}

impl fmt::Display for ChannelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:03}-{:03} ({} channels)",
            self.start_address,
            self.end_address(),
            self.count
        )
    }
}

fn check_shape(addresses: usize, values: usize) -> Result<(), ValidationError> {
    if addresses == 0 {
        return Err(ValidationError::EmptyAddresses);
    }
    if values == 0 {
        return Err(ValidationError::EmptyValues);
    }
    if addresses != values {
        return Err(ValidationError::LengthMismatch { addresses, values });
    }
    if addresses > consts::DMX_UNIVERSE_SIZE {
        return Err(ValidationError::TooManyChannels {
            max: consts::DMX_UNIVERSE_SIZE,
            actual: addresses,
        });
    }
    Ok(())
}

fn narrow(index: usize, input: f64, policy: NumericPolicy) -> Result<i64, ValidationError> {
    if !input.is_finite() {
        return Err(ValidationError::NotFinite { index, input });
    }
    if policy == NumericPolicy::Reject && input.fract() != 0.0 {
        return Err(ValidationError::NonIntegral { index, input });
    }
    // `as` saturates, so huge inputs still fail the range check below.
    Ok(input.trunc() as i64)
}

fn check_address(index: usize, address: i64) -> Result<(), ValidationError> {
    if (consts::DMX_ADDRESS_MIN as i64..=consts::DMX_ADDRESS_MAX as i64).contains(&address) {
        Ok(())
    } else {
        Err(ValidationError::AddressOutOfRange { index, address })
    }
}

fn check_value(index: usize, value: i64) -> Result<(), ValidationError> {
    if (0..=u8::MAX as i64).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::ValueOutOfRange { index, value })
    }
}

// Shape has already been checked by the caller.
fn pack(addresses: &[i64], values: &[i64]) -> Result<ChannelRange, ValidationError> {
    for (index, &address) in addresses.iter().enumerate() {
        check_address(index, address)?;
    }
    for (index, &value) in values.iter().enumerate() {
        check_value(index, value)?;
    }

    for (index, pair) in addresses.windows(2).enumerate() {
        if pair[1] - pair[0] != 1 {
            return Err(ValidationError::NonContiguous {
                index: index + 1,
                previous: pair[0],
                current: pair[1],
            });
        }
    }

    // Lower to wire addresses (0-511).
    let start_address = (addresses[0] - 1) as u16;
    let count = if addresses.len() == 1 {
        1
    } else {
        let end_address = (addresses[addresses.len() - 1] - 1) as u16;
        end_address - start_address + 1
    };
    debug_assert_eq!(count as usize, values.len());
    debug_assert!(start_address as usize + count as usize <= consts::DMX_UNIVERSE_SIZE);

    Ok(ChannelRange {
        start_address,
        count,
        values: values.iter().map(|&v| v as u8).collect(),
    })
}

//! Platform-specific code for Graffiti Maps
//!
//! This crate exposes what the host platform reports about the device.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod device;

pub use device::{DeviceInfo, HostDeviceInfo, StaticDeviceInfo};

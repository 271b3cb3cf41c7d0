//! Input device boundary.
//!
//! The shell drives keyboards and pointers only through [`InputDevice`] and
//! observes physical key presses only through [`KeySource`]. Real OS
//! synthesis backends live outside this workspace; [`VirtualDevice`] is the
//! simulated device used by the binary and by tests.

mod services;
mod virtual_device;

pub use services::{InputDevice, KeySource};
pub use virtual_device::VirtualDevice;

//! Application core: fade logic and the host-facing light contract, zero I/O.
//!
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod controller;
pub mod entity;
pub mod fade;
pub mod ports;

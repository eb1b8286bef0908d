// msf_updates/src/lib.rs

// Concrete state definitions for sensor-fusion deployments, and the
// configuration layer that loads one from disk.
pub mod config;
pub mod definitions;
pub mod prelude;

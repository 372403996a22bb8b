//! Built-in ecosystem presets.
//!
//! Each preset module exposes its default dimensions, the profile helpers
//! (succession, carbon, resilience, restoration cost) and a `build`
//! function that assembles the full ecosystem.

pub mod costa_brava;
pub mod forest;
pub mod posidonia;

//! Preset ecosystems and report rendering for the `ecosim` binary.

pub mod cases;
pub mod report;

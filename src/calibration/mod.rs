//! Reference calibration data for sample classification
//!
//! The calibration set is a fixed table of hand-measured Lab colors, three
//! replicate measurements per concentration level.

pub mod reference;

pub use reference::{ReferenceEntry, ReferenceSet};

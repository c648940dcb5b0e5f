//! Hostile-input scenarios: attempts to extract value, exploit rounding,
//! or leave the engine inconsistent.

pub mod value_extraction;

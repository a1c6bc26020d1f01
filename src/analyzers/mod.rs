//! Day alignment and periodic aggregation of download series.
//!
//! Two daily series are joined by calendar day, then folded into fixed-length
//! periods whose ratio of series B to series A is reported as a percentage.

pub mod aggregate;
pub mod align;
pub mod types;
pub mod utility;

//! Transport trait and abstractions
//!
//! This module defines the narrow bus interface the SFDP detector and the
//! memory-slot command layer are written against.

mod traits;

pub use traits::*;
